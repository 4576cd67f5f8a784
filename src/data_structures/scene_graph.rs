//! Scene graph and hierarchical traversal.
//!
//! A [`SceneNode`] is a plain data container: a local transform, the kind of
//! geometry it draws, texture/material tags and an owned list of children.
//! Ownership is strictly tree-shaped, so there are no cycles and no shared
//! nodes by construction.
//!
//! [`render_scene`] walks the tree depth-first in pre-order, composing
//! transforms top-down and issuing draws through a [`RenderSink`].

use cgmath::{Matrix4, SquareMatrix, Vector3};
use log::warn;

use crate::{
    data_structures::{material::MaterialRegistry, model::Model, transform},
    render::RenderSink,
    resources::texture::TextureRegistry,
};

/// The primitive shapes a node can draw.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ShapeKind {
    Plane,
    Box,
    Cylinder,
    Prism,
    TaperedCylinder,
}

/// Which geometry-drawing path a node invokes.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum MeshKind {
    /// Draws nothing; useful for pure grouping nodes.
    #[default]
    None,
    Shape(ShapeKind),
    /// Draws the node's imported [`Model`]; requires `model` to be set.
    Imported,
}

/// A node in the scene tree.
///
/// The local transform is relative to the parent: `scale` defaults to
/// (1,1,1), `rotation` is per-axis degrees defaulting to (0,0,0), `position`
/// defaults to the origin. `texture_tag` and `material_tag` key into the
/// registries at draw time; both lookups are allowed to miss.
#[derive(Debug)]
pub struct SceneNode {
    pub scale: Vector3<f32>,
    pub rotation: Vector3<f32>,
    pub position: Vector3<f32>,
    pub mesh: MeshKind,
    pub model: Option<Model>,
    pub texture_tag: Option<String>,
    pub material_tag: Option<String>,
    pub children: Vec<SceneNode>,
}

impl SceneNode {
    pub fn new() -> Self {
        Self {
            scale: Vector3::new(1.0, 1.0, 1.0),
            rotation: Vector3::new(0.0, 0.0, 0.0),
            position: Vector3::new(0.0, 0.0, 0.0),
            mesh: MeshKind::None,
            model: None,
            texture_tag: None,
            material_tag: None,
            children: Vec::new(),
        }
    }

    pub fn add_child(&mut self, child: SceneNode) {
        self.children.push(child);
    }
}

impl Default for SceneNode {
    fn default() -> Self {
        Self::new()
    }
}

/// Render the scene graph rooted at `root`.
///
/// A `None` root is a defined no-op: it logs a warning and issues zero draw
/// calls. Traversal is a plain synchronous recursion; registries and the
/// tree itself are read-only for its duration.
pub fn render_scene<T>(
    root: Option<&SceneNode>,
    sink: &mut dyn RenderSink,
    textures: &TextureRegistry<T>,
    materials: &MaterialRegistry,
) {
    let Some(root) = root else {
        warn!("render_scene called without a scene root; nothing to draw");
        return;
    };
    draw_node(root, Matrix4::identity(), sink, textures, materials);
}

fn draw_node<T>(
    node: &SceneNode,
    parent: Matrix4<f32>,
    sink: &mut dyn RenderSink,
    textures: &TextureRegistry<T>,
    materials: &MaterialRegistry,
) {
    // Children compose against this exact product; decomposition error below
    // never propagates down the tree.
    let composed = parent * transform::compose_local(node.scale, node.rotation, node.position);

    let parts = transform::decompose(&composed);
    sink.set_transformations(parts.scale, parts.rotation_deg, parts.position);

    let slot = node
        .texture_tag
        .as_deref()
        .and_then(|tag| textures.find_slot(tag));
    sink.set_texture_slot(slot.map(|s| s as u32));

    // A material miss binds the neutral default instead of leaving the
    // previous draw's material active.
    let material = node
        .material_tag
        .as_deref()
        .and_then(|tag| materials.find(tag))
        .cloned()
        .unwrap_or_default();
    sink.set_material(&material);

    match node.mesh {
        MeshKind::None => {}
        MeshKind::Shape(kind) => sink.draw_shape(kind),
        MeshKind::Imported => match &node.model {
            Some(model) => sink.draw_model(model),
            None => warn!("scene node is marked Imported but carries no model; skipping draw"),
        },
    }

    for child in &node.children {
        draw_node(child, composed, sink, textures, materials);
    }
}
