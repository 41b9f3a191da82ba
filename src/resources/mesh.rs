use wgpu::util::DeviceExt;

use crate::{
    data_structures::model::{BufferInfo, ModelVertex},
    resources::obj::Geometry,
};

/**
 * Compiles the flat attribute lists of a [`Geometry`] into whatever the
 * renderer draws from. The loaders only ever see the returned [`BufferInfo`].
 */
pub trait BufferBuilder {
    fn build(&self, label: &str, geometry: &Geometry) -> anyhow::Result<BufferInfo>;
}

/**
 * A geometry's texcoord or normal channel is either aligned with its
 * positions or empty. Empty channels come out as zeros.
 */
pub fn interleave(geometry: &Geometry) -> Vec<ModelVertex> {
    let g = geometry;
    (0..g.vertex_count())
        .map(|i| ModelVertex {
            position: [
                g.positions[i * 3],
                g.positions[i * 3 + 1],
                g.positions[i * 3 + 2],
            ],
            tex_coords: [
                g.texcoords.get(i * 2).map_or(0.0, |f| *f),
                g.texcoords.get(i * 2 + 1).map_or(0.0, |f| *f),
            ],
            normal: [
                g.normals.get(i * 3).map_or(0.0, |f| *f),
                g.normals.get(i * 3 + 1).map_or(0.0, |f| *f),
                g.normals.get(i * 3 + 2).map_or(0.0, |f| *f),
            ],
        })
        .collect::<Vec<_>>()
}

fn describe(label: &str, geometry: &Geometry) -> anyhow::Result<BufferInfo> {
    Ok(BufferInfo {
        label: label.to_string(),
        num_elements: u32::try_from(geometry.vertex_count())?,
        has_texcoords: !geometry.texcoords.is_empty(),
        has_normals: !geometry.normals.is_empty(),
        vertex_buffer: None,
    })
}

/// Uploads interleaved [`ModelVertex`] data as a non-indexed vertex buffer.
pub struct WgpuBufferBuilder<'a> {
    pub device: &'a wgpu::Device,
}

impl BufferBuilder for WgpuBufferBuilder<'_> {
    fn build(&self, label: &str, geometry: &Geometry) -> anyhow::Result<BufferInfo> {
        let mut info = describe(label, geometry)?;
        let vertices = interleave(geometry);
        let vertex_buffer = self
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(&format!("{:?} Vertex Buffer", label)),
                contents: bytemuck::cast_slice(&vertices),
                usage: wgpu::BufferUsages::VERTEX,
            });
        info.vertex_buffer = Some(vertex_buffer);
        Ok(info)
    }
}

/// Records vertex counts without touching a GPU. Used for headless loading.
#[derive(Clone, Copy, Debug, Default)]
pub struct HeadlessBufferBuilder;

impl BufferBuilder for HeadlessBufferBuilder {
    fn build(&self, label: &str, geometry: &Geometry) -> anyhow::Result<BufferInfo> {
        describe(label, geometry)
    }
}
