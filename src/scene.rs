//! Tabletop scene assembly: textures, materials, lights, shape meshes and
//! the node tree, gathered into a [`Tableau`] ready for rendering.

use std::path::Path;

use cgmath::Vector3;
use log::warn;

use crate::{
    data_structures::{
        material::{Material, MaterialRegistry},
        scene_graph::{render_scene, MeshKind, SceneNode, ShapeKind},
    },
    lighting::Lighting,
    render::RenderSink,
    resources::{
        self,
        shapes::ShapeMeshes,
        texture::{load_texture_file, TextureRegistry},
    },
};

/// Everything a frame needs: registries, lights, the shared shape meshes and
/// the scene root. Built once by [`Tableau::prepare`], read-only afterwards.
pub struct Tableau {
    pub textures: TextureRegistry,
    pub materials: MaterialRegistry,
    pub lighting: Lighting,
    pub shapes: ShapeMeshes,
    pub root: Option<SceneNode>,
    pub uv_scale: (f32, f32),
}

impl Tableau {
    /// Load textures and the planchette model from `asset_dir`, define the
    /// material and light tables and build the node tree.
    ///
    /// Asset failures are not fatal: a texture that fails to load leaves its
    /// tag unresolved (those draws fall back to solid color), and a missing
    /// model leaves its node drawing nothing. Both are logged.
    pub fn prepare(device: &wgpu::Device, queue: &wgpu::Queue, asset_dir: &Path) -> Self {
        let textures = load_scene_textures(device, queue, asset_dir);
        let materials = define_materials();
        let lighting = Lighting::tabletop();
        let shapes = ShapeMeshes::load(device);
        let root = Some(build_scene_tree(device, asset_dir));

        Self {
            textures,
            materials,
            lighting,
            shapes,
            root,
            uv_scale: (4.0, 4.0),
        }
    }

    /// Bind the frame-global state and walk the scene tree through `sink`.
    pub fn render(&self, sink: &mut dyn RenderSink) {
        sink.set_lighting(&self.lighting);
        sink.set_uv_scale(self.uv_scale.0, self.uv_scale.1);
        render_scene(self.root.as_ref(), sink, &self.textures, &self.materials);
    }
}

fn load_scene_textures(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    asset_dir: &Path,
) -> TextureRegistry {
    let table: [(&str, &str); 7] = [
        ("textures/dark-wood.png", "dark-wood"),
        ("textures/dark-cloth.jpg", "fabric"),
        ("textures/board.jpg", "board"),
        ("textures/card.jpg", "card"),
        ("textures/candle.jpg", "candle"),
        ("textures/stick.jpg", "stick"),
        ("textures/dirt.png", "dirt"),
    ];

    let mut registry = TextureRegistry::new();
    for (file, tag) in table {
        let path = asset_dir.join(file);
        if let Err(err) = load_texture_file(device, queue, &mut registry, &path, tag) {
            warn!("failed to load texture {}: {err:#}", path.display());
        }
    }
    registry
}

fn define_materials() -> MaterialRegistry {
    let mut materials = MaterialRegistry::new();
    materials.define(Material::new(
        "wood",
        Vector3::new(0.3, 0.2, 0.1),
        Vector3::new(0.1, 0.1, 0.1),
        0.3,
    ));
    materials.define(Material::new(
        "cloth",
        Vector3::new(0.02, 0.02, 0.02),
        Vector3::new(0.0, 0.0, 0.0),
        1.0,
    ));
    materials.define(Material::new(
        "glass",
        Vector3::new(0.3, 0.3, 0.3),
        Vector3::new(0.6, 0.6, 0.6),
        85.0,
    ));
    materials.define(Material::new(
        "gold",
        Vector3::new(0.3, 0.3, 0.2),
        Vector3::new(0.6, 0.5, 0.4),
        22.0,
    ));
    materials
}

fn build_scene_tree(device: &wgpu::Device, asset_dir: &Path) -> SceneNode {
    // Everything on the table parents to a single grouping node so the whole
    // arrangement can be moved as one.
    let mut table_parent = SceneNode::new();

    let mut surface = SceneNode::new();
    surface.mesh = MeshKind::Shape(ShapeKind::Plane);
    surface.scale = Vector3::new(9.0, 1.0, 9.0);
    surface.texture_tag = Some("fabric".into());
    surface.material_tag = Some("cloth".into());

    let mut board = SceneNode::new();
    board.mesh = MeshKind::Shape(ShapeKind::Box);
    board.scale = Vector3::new(1.2, 0.1, 0.7);
    board.position = Vector3::new(0.0, 0.1, 0.2);
    board.texture_tag = Some("board".into());
    board.material_tag = Some("wood".into());

    let mut planchette = SceneNode::new();
    planchette.mesh = MeshKind::Imported;
    planchette.scale = Vector3::new(0.01, 1.0, 0.01);
    planchette.position = Vector3::new(0.2, -2.0, 0.65);
    planchette.rotation = Vector3::new(0.0, 120.0, 0.0);
    planchette.texture_tag = Some("dark-wood".into());
    planchette.material_tag = Some("wood".into());
    let model_path = asset_dir.join("models/planchette.glb");
    match resources::load_model_gltf(&model_path, device) {
        Ok(model) => planchette.model = Some(model),
        Err(err) => warn!("failed to load model {}: {err:#}", model_path.display()),
    }
    board.add_child(planchette);

    let mut candle = SceneNode::new();
    candle.mesh = MeshKind::Shape(ShapeKind::Cylinder);
    candle.scale = Vector3::new(0.1, 3.0, 0.1);
    candle.position = Vector3::new(-0.6, 0.05, -0.4);
    candle.texture_tag = Some("candle".into());
    candle.material_tag = Some("glass".into());

    let mut tarot_box = SceneNode::new();
    tarot_box.mesh = MeshKind::Shape(ShapeKind::Box);
    tarot_box.scale = Vector3::new(0.3, 1.0, 0.1875);
    tarot_box.position = Vector3::new(-0.8, 0.55, 0.2);
    tarot_box.rotation = Vector3::new(0.0, 90.0, 0.0);
    tarot_box.texture_tag = Some("card".into());
    tarot_box.material_tag = Some("wood".into());

    let incense = |x: f32| {
        let mut stick = SceneNode::new();
        stick.mesh = MeshKind::Shape(ShapeKind::TaperedCylinder);
        stick.scale = Vector3::new(0.005, 0.5, 0.05);
        stick.position = Vector3::new(x, 0.1, -0.02);
        stick.rotation = Vector3::new(90.0, 0.0, 90.0);
        stick.texture_tag = Some("dirt".into());
        stick.material_tag = Some("wood".into());
        stick
    };

    surface.add_child(board);
    surface.add_child(candle);
    surface.add_child(tarot_box);
    surface.add_child(incense(0.8));
    surface.add_child(incense(0.85));
    table_parent.add_child(surface);
    table_parent
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn material_table_has_the_four_surfaces() {
        let materials = define_materials();
        for tag in ["wood", "cloth", "glass", "gold"] {
            assert!(materials.find(tag).is_some(), "missing material {tag:?}");
        }
        assert_eq!(materials.find("glass").unwrap().shininess, 85.0);
    }

    #[test]
    fn tabletop_lighting_is_enabled_with_three_lights() {
        let lighting = Lighting::tabletop();
        assert!(lighting.enabled);
        assert!(lighting.directional.active);
        let active_points = lighting.points.iter().filter(|p| p.active).count();
        assert_eq!(active_points, 2);
    }
}
