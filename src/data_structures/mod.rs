//! Core data types for scene representation.
//!
//! - `model` contains mesh and model definitions, GPU resources for imported geometry
//! - `material` contains surface material entries and the tag-keyed material registry
//! - `transform` contains transform composition and matrix decomposition
//! - `scene_graph` enables hierarchical scene organization and traversal

pub mod material;
pub mod model;
pub mod scene_graph;
pub mod transform;
