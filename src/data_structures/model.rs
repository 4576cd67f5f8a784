//! Mesh and model definitions: GPU resources for imported geometry.
//!
//! A [`Mesh`] owns the vertex buffer, index buffer and index count for one
//! primitive; a [`Model`] is the ordered sequence of meshes produced by the
//! asset importer. Both are created once during scene setup and never mutated
//! afterwards.

use std::mem;

/// Trait for types that can describe their GPU vertex buffer layout.
pub trait Vertex {
    fn desc() -> wgpu::VertexBufferLayout<'static>;
}

/// One interleaved vertex: position, normal and texture coordinate.
///
/// The layout is fixed at 8 floats (32 bytes) per vertex with the attributes
/// at byte offsets 0, 12 and 24, matching what the importer emits and what
/// the shader expects.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ModelVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub tex_coords: [f32; 2],
}

impl Vertex for ModelVertex {
    fn desc() -> wgpu::VertexBufferLayout<'static> {
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
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 6]>() as wgpu::BufferAddress,
                    shader_location: 2,
                    format: wgpu::VertexFormat::Float32x2,
                },
            ],
        }
    }
}

/// A GPU-resident mesh: vertex buffer, index buffer and index count.
///
/// Immutable after creation. Dropping the struct releases all buffer handles
/// together.
#[derive(Debug)]
pub struct Mesh {
    pub name: String,
    pub vertex_buffer: wgpu::Buffer,
    pub index_buffer: wgpu::Buffer,
    pub num_elements: u32,
}

/// An imported model: an ordered sequence of meshes, one per primitive that
/// survived import.
#[derive(Debug, Default)]
pub struct Model {
    pub meshes: Vec<Mesh>,
}

/// Draw dispatch for meshes and models on a render pass.
///
/// One indexed triangle-list draw call per mesh; texture and material state
/// is the traversal engine's job and is bound before these are called.
pub trait DrawModel {
    fn draw_mesh(&mut self, mesh: &Mesh);
    fn draw_model(&mut self, model: &Model);
}

impl DrawModel for wgpu::RenderPass<'_> {
    fn draw_mesh(&mut self, mesh: &Mesh) {
        self.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
        self.set_index_buffer(mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint16);
        self.draw_indexed(0..mesh.num_elements, 0, 0..1);
    }

    fn draw_model(&mut self, model: &Model) {
        for mesh in &model.meshes {
            self.draw_mesh(mesh);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vertex_layout_is_interleaved_8_floats() {
        let desc = ModelVertex::desc();
        assert_eq!(desc.array_stride, 32);
        let offsets: Vec<u64> = desc.attributes.iter().map(|a| a.offset).collect();
        assert_eq!(offsets, vec![0, 12, 24]);
    }
}
