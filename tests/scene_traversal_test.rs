//! Traversal tests driving `render_scene` into a recording sink.

use cgmath::Vector3;
use tableau::{
    Material, MaterialRegistry, MeshKind, Model, SceneNode, ShapeKind, TextureRegistry,
    lighting::Lighting,
    render::RenderSink,
    render_scene,
};

#[derive(Debug, PartialEq)]
enum Event {
    Transform {
        scale: Vector3<f32>,
        rotation: Vector3<f32>,
        position: Vector3<f32>,
    },
    Color([f32; 4]),
    TextureSlot(Option<u32>),
    UvScale(f32, f32),
    Material(Material),
    Lighting,
    DrawShape(ShapeKind),
    DrawModel,
}

#[derive(Default)]
struct RecordingSink {
    events: Vec<Event>,
}

impl RecordingSink {
    fn draws(&self) -> Vec<&Event> {
        self.events
            .iter()
            .filter(|e| matches!(e, Event::DrawShape(_) | Event::DrawModel))
            .collect()
    }
}

impl RenderSink for RecordingSink {
    fn set_transformations(
        &mut self,
        scale: Vector3<f32>,
        rotation_deg: Vector3<f32>,
        position: Vector3<f32>,
    ) {
        self.events.push(Event::Transform {
            scale,
            rotation: rotation_deg,
            position,
        });
    }

    fn set_color(&mut self, rgba: [f32; 4]) {
        self.events.push(Event::Color(rgba));
    }

    fn set_texture_slot(&mut self, slot: Option<u32>) {
        self.events.push(Event::TextureSlot(slot));
    }

    fn set_uv_scale(&mut self, u: f32, v: f32) {
        self.events.push(Event::UvScale(u, v));
    }

    fn set_material(&mut self, material: &Material) {
        self.events.push(Event::Material(material.clone()));
    }

    fn set_lighting(&mut self, _lighting: &Lighting) {
        self.events.push(Event::Lighting);
    }

    fn draw_shape(&mut self, shape: ShapeKind) {
        self.events.push(Event::DrawShape(shape));
    }

    fn draw_model(&mut self, _model: &Model) {
        self.events.push(Event::DrawModel);
    }
}

fn shape_node(shape: ShapeKind) -> SceneNode {
    let mut node = SceneNode::new();
    node.mesh = MeshKind::Shape(shape);
    node
}

fn empty_registries() -> (TextureRegistry<u32>, MaterialRegistry) {
    (TextureRegistry::new(), MaterialRegistry::new())
}

#[test]
fn draws_depth_first_in_pre_order() {
    let mut surface = shape_node(ShapeKind::Plane);
    surface.add_child(shape_node(ShapeKind::Box));
    surface.add_child(shape_node(ShapeKind::Cylinder));

    let mut root = SceneNode::new();
    root.add_child(surface);
    root.add_child(shape_node(ShapeKind::Prism));

    let (textures, materials) = empty_registries();
    let mut sink = RecordingSink::default();
    render_scene(Some(&root), &mut sink, &textures, &materials);

    let draws = sink.draws();
    assert_eq!(
        draws,
        vec![
            &Event::DrawShape(ShapeKind::Plane),
            &Event::DrawShape(ShapeKind::Box),
            &Event::DrawShape(ShapeKind::Cylinder),
            &Event::DrawShape(ShapeKind::Prism),
        ],
    );
}

#[test]
fn missing_root_draws_nothing() {
    let _ = env_logger::try_init();
    let (textures, materials) = empty_registries();
    let mut sink = RecordingSink::default();
    render_scene(None, &mut sink, &textures, &materials);
    assert!(sink.events.is_empty());
}

#[test]
fn forwards_the_decomposed_transform() {
    let mut node = shape_node(ShapeKind::Box);
    node.scale = Vector3::new(2.0, 1.0, 1.0);
    node.rotation = Vector3::new(0.0, 90.0, 0.0);
    node.position = Vector3::new(5.0, 0.0, 0.0);

    let (textures, materials) = empty_registries();
    let mut sink = RecordingSink::default();
    render_scene(Some(&node), &mut sink, &textures, &materials);

    let Some(Event::Transform {
        scale,
        rotation,
        position,
    }) = sink.events.first()
    else {
        panic!("expected the transform to be set first");
    };
    let close = |a: &Vector3<f32>, b: Vector3<f32>| {
        (a.x - b.x).abs() < 1e-3 && (a.y - b.y).abs() < 1e-3 && (a.z - b.z).abs() < 1e-3
    };
    assert!(close(scale, Vector3::new(2.0, 1.0, 1.0)), "scale {scale:?}");
    assert!(
        close(rotation, Vector3::new(0.0, 90.0, 0.0)),
        "rotation {rotation:?}"
    );
    assert!(
        close(position, Vector3::new(5.0, 0.0, 0.0)),
        "position {position:?}"
    );
}

#[test]
fn nested_transforms_compose_top_down() {
    let mut child = shape_node(ShapeKind::Box);
    child.scale = Vector3::new(2.0, 1.0, 1.0);
    child.position = Vector3::new(1.0, 0.0, 0.0);

    let mut parent = SceneNode::new();
    parent.scale = Vector3::new(3.0, 2.0, 1.0);
    parent.add_child(child);

    let (textures, materials) = empty_registries();
    let mut sink = RecordingSink::default();
    render_scene(Some(&parent), &mut sink, &textures, &materials);

    let transforms: Vec<_> = sink
        .events
        .iter()
        .filter_map(|e| match e {
            Event::Transform {
                scale, position, ..
            } => Some((scale, position)),
            _ => None,
        })
        .collect();
    assert_eq!(transforms.len(), 2);

    let (scale, position) = transforms[1];
    assert_eq!(*scale, Vector3::new(6.0, 2.0, 1.0));
    assert_eq!(*position, Vector3::new(3.0, 0.0, 0.0));
}

#[test]
fn material_miss_binds_the_default() {
    let mut materials = MaterialRegistry::new();
    materials.define(Material::new(
        "wood",
        Vector3::new(0.3, 0.2, 0.1),
        Vector3::new(0.1, 0.1, 0.1),
        0.3,
    ));
    let textures: TextureRegistry<u32> = TextureRegistry::new();

    let mut node = shape_node(ShapeKind::Box);
    node.material_tag = Some("velvet".into());

    let mut sink = RecordingSink::default();
    render_scene(Some(&node), &mut sink, &textures, &materials);

    assert!(
        sink.events
            .contains(&Event::Material(Material::default())),
        "a missing material tag should bind the default material",
    );
}

#[test]
fn texture_tags_resolve_to_slots_or_none() {
    let mut textures: TextureRegistry<u32> = TextureRegistry::new();
    textures.register("fabric", 0).unwrap();
    textures.register("board", 1).unwrap();
    let materials = MaterialRegistry::new();

    let mut hit = shape_node(ShapeKind::Plane);
    hit.texture_tag = Some("board".into());
    let mut miss = shape_node(ShapeKind::Plane);
    miss.texture_tag = Some("velvet".into());

    let mut root = SceneNode::new();
    root.add_child(hit);
    root.add_child(miss);

    let mut sink = RecordingSink::default();
    render_scene(Some(&root), &mut sink, &textures, &materials);

    let slots: Vec<_> = sink
        .events
        .iter()
        .filter_map(|e| match e {
            Event::TextureSlot(slot) => Some(*slot),
            _ => None,
        })
        .collect();
    // Grouping root, then the hit, then the miss.
    assert_eq!(slots, vec![None, Some(1), None]);
}

#[test]
fn imported_node_without_model_is_skipped() {
    let mut node = SceneNode::new();
    node.mesh = MeshKind::Imported;

    let (textures, materials) = empty_registries();
    let mut sink = RecordingSink::default();
    render_scene(Some(&node), &mut sink, &textures, &materials);
    assert!(sink.draws().is_empty());
}
