//! Models, parts and materials.
//!
//! A [`Model`] is what the loaders in [`crate::resources`] produce: a list of
//! single-material [`Part`]s plus the materials they reference. Models are
//! loaded once per asset name and shared read-only between instances.

use std::collections::HashMap;

use crate::resources::mtl::RawMaterial;

/// Reserved name of the fallback material injected into every model.
///
/// Faces that appear before any `usemtl` carry this name, and parts whose
/// material is missing from the library are re-pointed to it.
pub const DEFAULT_MATERIAL: &str = "__default";

/// Diffuse colour of [`DEFAULT_MATERIAL`] (a blueish tint).
pub const DEFAULT_DIFFUSE: [f32; 3] = [0.2, 0.5, 0.97];

/// Uniform prefix used by the renderer when binding material properties.
pub const UNIFORM_PREFIX: &str = "u_mat";

/// Anything that can describe its own GPU vertex layout.
pub trait Vertex {
    fn desc() -> wgpu::VertexBufferLayout<'static>;
}

/// Interleaved per-vertex data as uploaded to the GPU.
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ModelVertex {
    pub position: [f32; 3],
    pub tex_coords: [f32; 2],
    pub normal: [f32; 3],
}

impl Vertex for ModelVertex {
    fn desc() -> wgpu::VertexBufferLayout<'static> {
        use std::mem;
        wgpu::VertexBufferLayout {
            array_stride: mem::size_of::<ModelVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x2,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 5]>() as wgpu::BufferAddress,
                    shader_location: 2,
                    format: wgpu::VertexFormat::Float32x3,
                },
            ],
        }
    }
}

/**
 * The compiled buffer descriptor of a single part.
 *
 * `vertex_buffer` is `None` when the model was assembled without a GPU device
 * (see `HeadlessBufferBuilder`); the counts are always filled in.
 */
#[derive(Debug)]
pub struct BufferInfo {
    pub label: String,
    pub num_elements: u32,
    pub has_texcoords: bool,
    pub has_normals: bool,
    pub vertex_buffer: Option<wgpu::Buffer>,
}

/// One single-material chunk of a model.
#[derive(Debug)]
pub struct Part {
    pub buffers: BufferInfo,
    pub material: String,
}

/// Surface properties of a part. Fields absent from the library stay `None`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Material {
    pub diffuse: Option<[f32; 3]>,
    pub specular: Option<[f32; 3]>,
    pub ambient: Option<[f32; 3]>,
    pub emissive: Option<[f32; 3]>,
    pub shininess: Option<f32>,
    pub opacity: Option<f32>,
    pub optical_density: Option<f32>,
    pub illum: Option<i32>,
}

/// Value of a single material uniform.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum UniformValue {
    Vec3([f32; 3]),
    Float(f32),
    Int(i32),
}

impl Material {
    /// The fallback material stored under [`DEFAULT_MATERIAL`].
    pub fn fallback() -> Self {
        Self {
            diffuse: Some(DEFAULT_DIFFUSE),
            ..Default::default()
        }
    }

    /// Uniform names and values for every present property, e.g. `u_matDiffuse`.
    pub fn uniforms(&self, prefix: &str) -> Vec<(String, UniformValue)> {
        let vectors = [
            ("Diffuse", self.diffuse),
            ("Specular", self.specular),
            ("Ambient", self.ambient),
            ("Emissive", self.emissive),
        ];
        let scalars = [
            ("Shininess", self.shininess),
            ("Opacity", self.opacity),
            ("OpticalDensity", self.optical_density),
        ];

        let mut uniforms = Vec::new();
        for (name, value) in vectors {
            if let Some(v) = value {
                uniforms.push((format!("{prefix}{name}"), UniformValue::Vec3(v)));
            }
        }
        for (name, value) in scalars {
            if let Some(v) = value {
                uniforms.push((format!("{prefix}{name}"), UniformValue::Float(v)));
            }
        }
        if let Some(illum) = self.illum {
            uniforms.push((format!("{prefix}Illum"), UniformValue::Int(illum)));
        }
        uniforms
    }
}

impl From<RawMaterial> for Material {
    fn from(raw: RawMaterial) -> Self {
        Self {
            diffuse: raw.kd,
            specular: raw.ks,
            ambient: raw.ka,
            emissive: raw.ke,
            shininess: raw.ns,
            opacity: raw.d,
            optical_density: raw.ni,
            illum: raw.illum,
        }
    }
}

/// A loaded model: its parts in file order and the materials they use.
#[derive(Debug)]
pub struct Model {
    pub name: String,
    pub parts: Vec<Part>,
    pub materials: HashMap<String, Material>,
}

impl Model {
    /// Material of `part`, falling back to [`DEFAULT_MATERIAL`].
    pub fn material_for(&self, part: &Part) -> Option<&Material> {
        self.materials
            .get(&part.material)
            .or_else(|| self.materials.get(DEFAULT_MATERIAL))
    }

    /// Total number of vertices over all parts.
    pub fn num_elements(&self) -> u32 {
        self.parts.iter().map(|p| p.buffers.num_elements).sum()
    }
}
