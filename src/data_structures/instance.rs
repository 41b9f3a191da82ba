//! Instance transformation data for GPU rendering.
//!
//! An [`Instance`] places a shared [`Model`] in the world. The renderer turns
//! it into an [`InstanceRaw`] and streams those through an instance buffer.

use std::sync::Arc;

use cgmath::{Rad, SquareMatrix};

use crate::data_structures::model::{self, Model};

/// A positioned, rotated and scaled reference to a shared model.
///
/// `rotation` holds Euler angles in radians about X, Y and Z. They compose as
/// `Rx · Ry · Rz`, so on a column vector the Z rotation acts first.
/// Cloning yields an independent transform that still shares the model, so
/// anything that moves should own its own clone rather than mutate a scene
/// instance.
#[derive(Clone, Debug)]
pub struct Instance {
    pub model: Arc<Model>,
    pub position: cgmath::Vector3<f32>,
    pub rotation: cgmath::Vector3<f32>,
    pub scale: cgmath::Vector3<f32>,
}

impl Instance {
    /// Place `model` at `position` with no rotation and unit scale.
    pub fn new(model: Arc<Model>, position: cgmath::Vector3<f32>) -> Self {
        Self {
            model,
            position,
            rotation: cgmath::Vector3::new(0.0, 0.0, 0.0),
            scale: cgmath::Vector3::new(1.0, 1.0, 1.0),
        }
    }

    pub fn with_scale(mut self, scale: cgmath::Vector3<f32>) -> Self {
        self.scale = scale;
        self
    }

    pub fn rotate_x(&mut self, angle: impl Into<Rad<f32>>) {
        self.rotation.x += angle.into().0;
    }

    pub fn rotate_y(&mut self, angle: impl Into<Rad<f32>>) {
        self.rotation.y += angle.into().0;
    }

    pub fn rotate_z(&mut self, angle: impl Into<Rad<f32>>) {
        self.rotation.z += angle.into().0;
    }

    /// `Rx · Ry · Rz`.
    pub fn rotation_matrix(&self) -> cgmath::Matrix3<f32> {
        cgmath::Matrix3::from_angle_x(Rad(self.rotation.x))
            * cgmath::Matrix3::from_angle_y(Rad(self.rotation.y))
            * cgmath::Matrix3::from_angle_z(Rad(self.rotation.z))
    }

    pub fn to_matrix(&self) -> cgmath::Matrix4<f32> {
        cgmath::Matrix4::from_translation(self.position)
            * cgmath::Matrix4::from(self.rotation_matrix())
            * cgmath::Matrix4::from_nonuniform_scale(self.scale.x, self.scale.y, self.scale.z)
    }

    pub fn to_raw(&self) -> InstanceRaw {
        let world_matrix = self.to_matrix();
        let handedness = world_matrix.determinant().signum();
        InstanceRaw {
            model: world_matrix.into(),
            normal: self.rotation_matrix().into(),
            handedness,
        }
    }
}

/**
 * The raw instance is the actual data stored on the GPU
 */
#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct InstanceRaw {
    pub model: [[f32; 4]; 4],
    pub normal: [[f32; 3]; 3],
    pub handedness: f32,
}

/**
 * Stride layout: the world matrix as four vec4s, the normal matrix as three
 * vec3s, then the handedness sign. Locations 0..=2 belong to `ModelVertex`.
 */
impl model::Vertex for InstanceRaw {
    fn desc() -> wgpu::VertexBufferLayout<'static> {
        use std::mem;
        wgpu::VertexBufferLayout {
            array_stride: mem::size_of::<InstanceRaw>() as wgpu::BufferAddress,
            // Advance once per instance, not once per vertex
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 5,
                    format: wgpu::VertexFormat::Float32x4,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 4]>() as wgpu::BufferAddress,
                    shader_location: 6,
                    format: wgpu::VertexFormat::Float32x4,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 8]>() as wgpu::BufferAddress,
                    shader_location: 7,
                    format: wgpu::VertexFormat::Float32x4,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 12]>() as wgpu::BufferAddress,
                    shader_location: 8,
                    format: wgpu::VertexFormat::Float32x4,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 16]>() as wgpu::BufferAddress,
                    shader_location: 9,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 19]>() as wgpu::BufferAddress,
                    shader_location: 10,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 22]>() as wgpu::BufferAddress,
                    shader_location: 11,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 25]>() as wgpu::BufferAddress,
                    shader_location: 12,
                    format: wgpu::VertexFormat::Float32,
                },
            ],
        }
    }
}
