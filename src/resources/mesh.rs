//! GPU mesh upload: materializes interleaved vertex and index arrays into
//! buffers owned by a [`Mesh`].

use wgpu::util::DeviceExt;

use crate::data_structures::model::{Mesh, ModelVertex};

/// Create the GPU-resident buffers for one mesh.
///
/// The vertex buffer is sized exactly to the interleaved vertex byte length,
/// the index buffer to `indices.len() * 2` bytes (16-bit indices). The
/// returned [`Mesh`] is immutable for its whole life.
pub fn upload_mesh(
    device: &wgpu::Device,
    label: &str,
    vertices: &[ModelVertex],
    indices: &[u16],
) -> Mesh {
    let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some(&format!("{label:?} Vertex Buffer")),
        contents: bytemuck::cast_slice(vertices),
        usage: wgpu::BufferUsages::VERTEX,
    });

    let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some(&format!("{label:?} Index Buffer")),
        contents: bytemuck::cast_slice(indices),
        usage: wgpu::BufferUsages::INDEX,
    });

    Mesh {
        name: label.to_string(),
        vertex_buffer,
        index_buffer,
        num_elements: indices.len() as u32,
    }
}
