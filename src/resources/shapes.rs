//! Fixed primitive mesh generators for the tableau's basic shapes.
//!
//! These are data producers consumed by the traversal engine: each generator
//! emits interleaved vertices with outward normals and texture coordinates,
//! plus a 16-bit triangle-list index sequence. [`ShapeMeshes`] uploads all of
//! them once during scene setup.

use std::f32::consts::TAU;

use crate::data_structures::{
    model::{Mesh, ModelVertex},
    scene_graph::ShapeKind,
};

use super::mesh::upload_mesh;

/// Radial resolution for curved shapes.
const RADIAL_SEGMENTS: u32 = 24;

/// The uploaded set of primitive meshes, one per [`ShapeKind`].
#[derive(Debug)]
pub struct ShapeMeshes {
    plane: Mesh,
    cube: Mesh,
    cylinder: Mesh,
    prism: Mesh,
    tapered_cylinder: Mesh,
}

impl ShapeMeshes {
    pub fn load(device: &wgpu::Device) -> Self {
        let upload = |label: &str, (vertices, indices): (Vec<ModelVertex>, Vec<u16>)| {
            upload_mesh(device, label, &vertices, &indices)
        };
        Self {
            plane: upload("plane", plane()),
            cube: upload("box", cube()),
            cylinder: upload("cylinder", frustum(1.0)),
            prism: upload("prism", prism()),
            tapered_cylinder: upload("tapered cylinder", frustum(0.5)),
        }
    }

    pub fn get(&self, kind: ShapeKind) -> &Mesh {
        match kind {
            ShapeKind::Plane => &self.plane,
            ShapeKind::Box => &self.cube,
            ShapeKind::Cylinder => &self.cylinder,
            ShapeKind::Prism => &self.prism,
            ShapeKind::TaperedCylinder => &self.tapered_cylinder,
        }
    }
}

fn vertex(position: [f32; 3], normal: [f32; 3], tex_coords: [f32; 2]) -> ModelVertex {
    ModelVertex {
        position,
        normal,
        tex_coords,
    }
}

/// A 2x2 plane in XZ centered at the origin, normal facing +Y.
pub fn plane() -> (Vec<ModelVertex>, Vec<u16>) {
    let up = [0.0, 1.0, 0.0];
    let vertices = vec![
        vertex([-1.0, 0.0, -1.0], up, [0.0, 1.0]),
        vertex([-1.0, 0.0, 1.0], up, [0.0, 0.0]),
        vertex([1.0, 0.0, 1.0], up, [1.0, 0.0]),
        vertex([1.0, 0.0, -1.0], up, [1.0, 1.0]),
    ];
    let indices = vec![0, 1, 2, 0, 2, 3];
    (vertices, indices)
}

/// A unit cube centered at the origin, 24 vertices so every face gets flat
/// normals and its own texture coordinates.
pub fn cube() -> (Vec<ModelVertex>, Vec<u16>) {
    struct Face {
        normal: [f32; 3],
        corners: [[f32; 3]; 4],
    }
    let h = 0.5;
    let faces = [
        Face {
            normal: [0.0, 0.0, 1.0],
            corners: [[-h, -h, h], [h, -h, h], [h, h, h], [-h, h, h]],
        },
        Face {
            normal: [0.0, 0.0, -1.0],
            corners: [[h, -h, -h], [-h, -h, -h], [-h, h, -h], [h, h, -h]],
        },
        Face {
            normal: [-1.0, 0.0, 0.0],
            corners: [[-h, -h, -h], [-h, -h, h], [-h, h, h], [-h, h, -h]],
        },
        Face {
            normal: [1.0, 0.0, 0.0],
            corners: [[h, -h, h], [h, -h, -h], [h, h, -h], [h, h, h]],
        },
        Face {
            normal: [0.0, 1.0, 0.0],
            corners: [[-h, h, h], [h, h, h], [h, h, -h], [-h, h, -h]],
        },
        Face {
            normal: [0.0, -1.0, 0.0],
            corners: [[-h, -h, -h], [h, -h, -h], [h, -h, h], [-h, -h, h]],
        },
    ];
    let uvs = [[0.0, 1.0], [1.0, 1.0], [1.0, 0.0], [0.0, 0.0]];

    let mut vertices = Vec::with_capacity(24);
    let mut indices = Vec::with_capacity(36);
    for face in &faces {
        let base = vertices.len() as u16;
        for (corner, uv) in face.corners.iter().zip(uvs) {
            vertices.push(vertex(*corner, face.normal, uv));
        }
        indices.extend([base, base + 1, base + 2, base, base + 2, base + 3]);
    }
    (vertices, indices)
}

/// A cylinder frustum: bottom radius 1 at y=0, `top_radius` at y=1, with
/// both caps. `top_radius` 1.0 yields the straight cylinder, 0.5 the
/// tapered one.
pub fn frustum(top_radius: f32) -> (Vec<ModelVertex>, Vec<u16>) {
    let mut vertices = Vec::new();
    let mut indices: Vec<u16> = Vec::new();

    // Outward side normal tilts by the radius change over the unit height.
    let slope = 1.0 - top_radius;
    let normal_len = (1.0 + slope * slope).sqrt();

    // Side wall: rings of paired bottom/top vertices.
    for i in 0..=RADIAL_SEGMENTS {
        let u = i as f32 / RADIAL_SEGMENTS as f32;
        let theta = u * TAU;
        let (sin, cos) = theta.sin_cos();
        let normal = [cos / normal_len, slope / normal_len, sin / normal_len];
        vertices.push(vertex([cos, 0.0, sin], normal, [u, 1.0]));
        vertices.push(vertex([cos * top_radius, 1.0, sin * top_radius], normal, [u, 0.0]));
    }
    for i in 0..RADIAL_SEGMENTS as u16 {
        let (b0, t0) = (i * 2, i * 2 + 1);
        let (b1, t1) = (b0 + 2, t0 + 2);
        indices.extend([b0, t1, b1, b0, t0, t1]);
    }

    // Caps: a center fan each.
    let mut cap = |y: f32, radius: f32, normal: [f32; 3], flip: bool| {
        let center = vertices.len() as u16;
        vertices.push(vertex([0.0, y, 0.0], normal, [0.5, 0.5]));
        for i in 0..=RADIAL_SEGMENTS {
            let theta = i as f32 / RADIAL_SEGMENTS as f32 * TAU;
            let (sin, cos) = theta.sin_cos();
            vertices.push(vertex(
                [cos * radius, y, sin * radius],
                normal,
                [0.5 + 0.5 * cos, 0.5 + 0.5 * sin],
            ));
        }
        for i in 0..RADIAL_SEGMENTS as u16 {
            let (a, b) = (center + 1 + i, center + 2 + i);
            if flip {
                indices.extend([center, b, a]);
            } else {
                indices.extend([center, a, b]);
            }
        }
    };
    cap(0.0, 1.0, [0.0, -1.0, 0.0], false);
    cap(1.0, top_radius, [0.0, 1.0, 0.0], true);

    (vertices, indices)
}

/// A triangular prism: equilateral cross-section of circumradius 1 in XZ,
/// extruded from y=0 to y=1.
pub fn prism() -> (Vec<ModelVertex>, Vec<u16>) {
    let corners: Vec<[f32; 2]> = [90.0f32, 210.0, 330.0]
        .iter()
        .map(|deg| {
            let (sin, cos) = deg.to_radians().sin_cos();
            [cos, sin]
        })
        .collect();

    let mut vertices = Vec::new();
    let mut indices: Vec<u16> = Vec::new();

    // Three rectangular side faces with flat outward normals.
    for k in 0..3 {
        let [ax, az] = corners[k];
        let [bx, bz] = corners[(k + 1) % 3];
        let mid = [(ax + bx) * 0.5, (az + bz) * 0.5];
        let len = (mid[0] * mid[0] + mid[1] * mid[1]).sqrt();
        let normal = [mid[0] / len, 0.0, mid[1] / len];

        let base = vertices.len() as u16;
        let (u0, u1) = (k as f32 / 3.0, (k + 1) as f32 / 3.0);
        vertices.push(vertex([ax, 0.0, az], normal, [u0, 1.0]));
        vertices.push(vertex([ax, 1.0, az], normal, [u0, 0.0]));
        vertices.push(vertex([bx, 0.0, bz], normal, [u1, 1.0]));
        vertices.push(vertex([bx, 1.0, bz], normal, [u1, 0.0]));
        // base+0 bottom-a, +1 top-a, +2 bottom-b, +3 top-b
        indices.extend([base, base + 3, base + 2, base, base + 1, base + 3]);
    }

    // End caps.
    let mut cap = |y: f32, normal: [f32; 3], flip: bool| {
        let base = vertices.len() as u16;
        for [x, z] in &corners {
            vertices.push(vertex(
                [*x, y, *z],
                normal,
                [0.5 + 0.5 * x, 0.5 + 0.5 * z],
            ));
        }
        if flip {
            indices.extend([base, base + 2, base + 1]);
        } else {
            indices.extend([base, base + 1, base + 2]);
        }
    };
    cap(0.0, [0.0, -1.0, 0.0], false);
    cap(1.0, [0.0, 1.0, 0.0], true);

    (vertices, indices)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_well_formed((vertices, indices): (Vec<ModelVertex>, Vec<u16>)) {
        assert!(!vertices.is_empty());
        assert_eq!(indices.len() % 3, 0, "index count must form whole triangles");
        for &i in &indices {
            assert!((i as usize) < vertices.len(), "index {i} out of range");
        }
        for v in &vertices {
            let [x, y, z] = v.normal;
            let len = (x * x + y * y + z * z).sqrt();
            assert!((len - 1.0).abs() < 1e-4, "normal not unit length: {len}");
        }
    }

    #[test]
    fn plane_is_one_quad() {
        let (vertices, indices) = plane();
        assert_eq!(vertices.len(), 4);
        assert_eq!(indices.len(), 6);
        assert_well_formed((vertices, indices));
    }

    #[test]
    fn cube_has_flat_faces() {
        let (vertices, indices) = cube();
        assert_eq!(vertices.len(), 24);
        assert_eq!(indices.len(), 36);
        assert_well_formed((vertices, indices));
    }

    #[test]
    fn curved_shapes_are_well_formed() {
        assert_well_formed(frustum(1.0));
        assert_well_formed(frustum(0.5));
        assert_well_formed(prism());
    }

    #[test]
    fn tapered_cylinder_narrows_at_the_top() {
        let (vertices, _) = frustum(0.5);
        let top_max = vertices
            .iter()
            .filter(|v| v.position[1] == 1.0)
            .map(|v| (v.position[0].powi(2) + v.position[2].powi(2)).sqrt())
            .fold(0.0f32, f32::max);
        assert!((top_max - 0.5).abs() < 1e-4);
    }
}
