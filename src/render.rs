//! The seam between scene traversal and the rendering backend.
//!
//! The traversal engine treats the backend as an opaque sink of shader state
//! and draw calls: it sets a decomposed model transform, binds texture and
//! material state, and dispatches draws. [`crate::pipeline::WgpuSink`] is the
//! GPU-backed implementation; tests substitute recording sinks to assert on
//! the emitted call sequence.

use cgmath::Vector3;

use crate::{
    data_structures::{material::Material, model::Model, scene_graph::ShapeKind},
    lighting::Lighting,
};

/// Shader-state and draw-call sink driven by the traversal engine.
pub trait RenderSink {
    /// Set the model transform from independent scale/rotation/position
    /// parts. Rotation is per-axis degrees; the backend recomposes its
    /// matrix as `Translate * Rz * Ry * Rx * Scale`.
    fn set_transformations(
        &mut self,
        scale: Vector3<f32>,
        rotation_deg: Vector3<f32>,
        position: Vector3<f32>,
    );

    /// Set a solid color for the next draw and clear the use-texture flag.
    fn set_color(&mut self, rgba: [f32; 4]);

    /// Select the sampler slot for the next draw. `None` clears the
    /// use-texture flag so the draw falls back to the solid-color path.
    fn set_texture_slot(&mut self, slot: Option<u32>);

    /// Set the texture coordinate scale applied in the fragment stage.
    fn set_uv_scale(&mut self, u: f32, v: f32);

    /// Bind material diffuse/specular/shininess state.
    fn set_material(&mut self, material: &Material);

    /// Upload the light configuration.
    fn set_lighting(&mut self, lighting: &Lighting);

    /// Issue the indexed draw for one of the fixed primitive shapes.
    fn draw_shape(&mut self, shape: ShapeKind);

    /// Issue the per-mesh draw sequence for an imported model.
    fn draw_model(&mut self, model: &Model);
}
