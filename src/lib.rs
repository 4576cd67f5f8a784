//! tableau
//!
//! A small rendering library for a static 3D tableau: a tabletop scene built
//! from textured primitive meshes and one imported binary glTF asset. The
//! crate centres on two pieces of machinery: a hierarchical scene graph whose
//! traversal composes parent-to-child transforms (and decomposes them back
//! into scale/rotation/position for the shader-facing transform interface),
//! and a binary asset importer that flattens glTF accessor/view/buffer
//! indirection into interleaved vertex data ready for GPU upload.
//!
//! High-level modules
//! - `camera`: view/projection camera and its shader uniform
//! - `data_structures`: meshes, materials, transforms and the scene graph
//! - `lighting`: directional and point light configuration and uniforms
//! - `pipeline`: the wgpu render pipeline and the wgpu-backed render sink
//! - `render`: the `RenderSink` seam between traversal and the GPU backend
//! - `resources`: asset import, GPU mesh upload, textures and shape meshes
//! - `scene`: preparation of the tabletop scene itself
//!

pub mod camera;
pub mod data_structures;
pub mod lighting;
pub mod pipeline;
pub mod render;
pub mod resources;
pub mod scene;

// Re-exports commonly used types for convenience in downstream code.
pub use cgmath::{Deg, Matrix4, Point3, Vector2, Vector3};

pub use data_structures::material::{Material, MaterialRegistry};
pub use data_structures::model::{Mesh, Model, ModelVertex};
pub use data_structures::scene_graph::{MeshKind, SceneNode, ShapeKind, render_scene};
pub use render::RenderSink;
pub use resources::texture::TextureRegistry;
