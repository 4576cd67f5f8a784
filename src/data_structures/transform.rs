//! Transform composition and matrix decomposition.
//!
//! The traversal engine composes each node's local matrix against its
//! parent's accumulated matrix, then decomposes the result back into
//! independent scale/rotation/position because the shader-facing transform
//! interface takes those parts rather than a matrix.
//!
//! The Euler extraction in [`decompose`] is deliberately the fixed, ad hoc
//! trigonometric form used by the transform-setting interface. It does not
//! round-trip arbitrary composed rotations and must not be replaced by a
//! general-purpose decomposition: downstream visual output depends on this
//! exact formula.

use cgmath::{Deg, InnerSpace, Matrix4, Vector3};

/// Compose a node's local transform matrix.
///
/// Fixed order: `Translate(position) * Rx(rot.x) * Ry(rot.y) * Rz(rot.z) *
/// Scale(scale)`, rotation angles in degrees.
pub fn compose_local(
    scale: Vector3<f32>,
    rotation_deg: Vector3<f32>,
    position: Vector3<f32>,
) -> Matrix4<f32> {
    Matrix4::from_translation(position)
        * Matrix4::from_angle_x(Deg(rotation_deg.x))
        * Matrix4::from_angle_y(Deg(rotation_deg.y))
        * Matrix4::from_angle_z(Deg(rotation_deg.z))
        * Matrix4::from_nonuniform_scale(scale.x, scale.y, scale.z)
}

/// Compose the model matrix the way the shader-facing transform interface
/// does from already-decomposed parts.
///
/// Note the rotation order differs from [`compose_local`]: here it is
/// `Translate * Rz * Ry * Rx * Scale`.
pub fn model_matrix(
    scale: Vector3<f32>,
    rotation_deg: Vector3<f32>,
    position: Vector3<f32>,
) -> Matrix4<f32> {
    Matrix4::from_translation(position)
        * Matrix4::from_angle_z(Deg(rotation_deg.z))
        * Matrix4::from_angle_y(Deg(rotation_deg.y))
        * Matrix4::from_angle_x(Deg(rotation_deg.x))
        * Matrix4::from_nonuniform_scale(scale.x, scale.y, scale.z)
}

/// Independent scale/rotation/translation extracted from a composed matrix.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Decomposed {
    pub scale: Vector3<f32>,
    /// Euler angles in degrees, per-axis.
    pub rotation_deg: Vector3<f32>,
    pub position: Vector3<f32>,
}

/// Decompose a composed transform matrix into scale, Euler rotation and
/// translation.
///
/// Scale is the length of each upper-left 3x3 column; the rotation block is
/// the columns divided by scale; angles come from the fixed extraction
/// (`R[row][col]` indexing):
///
/// ```text
/// rot_y = atan2(-R[2][0], R[0][0])
/// rot_x = asin(R[1][0])
/// rot_z = atan2(-R[1][2], R[1][1])
/// ```
pub fn decompose(m: &Matrix4<f32>) -> Decomposed {
    let position = m.w.truncate();

    let scale = Vector3::new(
        m.x.truncate().magnitude(),
        m.y.truncate().magnitude(),
        m.z.truncate().magnitude(),
    );

    // Rotation columns with scale divided out.
    let c0 = m.x.truncate() / scale.x;
    let c1 = m.y.truncate() / scale.y;
    let c2 = m.z.truncate() / scale.z;

    let rot_y = (-c0.z).atan2(c0.x);
    let rot_x = c0.y.asin();
    let rot_z = (-c2.y).atan2(c1.y);

    Decomposed {
        scale,
        rotation_deg: Vector3::new(
            rot_x.to_degrees(),
            rot_y.to_degrees(),
            rot_z.to_degrees(),
        ),
        position,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::SquareMatrix;

    const EPS: f32 = 1e-3;

    fn assert_vec3_near(actual: Vector3<f32>, expected: (f32, f32, f32)) {
        assert!(
            (actual.x - expected.0).abs() < EPS
                && (actual.y - expected.1).abs() < EPS
                && (actual.z - expected.2).abs() < EPS,
            "expected {:?}, got {:?}",
            expected,
            actual
        );
    }

    #[test]
    fn identity_decomposes_to_defaults() {
        let parts = decompose(&Matrix4::identity());
        assert_vec3_near(parts.scale, (1.0, 1.0, 1.0));
        assert_vec3_near(parts.rotation_deg, (0.0, 0.0, 0.0));
        assert_vec3_near(parts.position, (0.0, 0.0, 0.0));
    }

    #[test]
    fn translation_only_round_trips() {
        let m = compose_local(
            Vector3::new(1.0, 1.0, 1.0),
            Vector3::new(0.0, 0.0, 0.0),
            Vector3::new(-3.0, 2.5, 8.0),
        );
        let parts = decompose(&m);
        assert_vec3_near(parts.position, (-3.0, 2.5, 8.0));
        assert_vec3_near(parts.rotation_deg, (0.0, 0.0, 0.0));
    }

    #[test]
    fn scaled_y_rotation_round_trips() {
        // Scale (2,1,1), rotation (0,90,0) degrees, position (5,0,0) under an
        // identity parent must come back out within tolerance.
        let m = compose_local(
            Vector3::new(2.0, 1.0, 1.0),
            Vector3::new(0.0, 90.0, 0.0),
            Vector3::new(5.0, 0.0, 0.0),
        );
        let parts = decompose(&m);
        assert_vec3_near(parts.scale, (2.0, 1.0, 1.0));
        assert_vec3_near(parts.rotation_deg, (0.0, 90.0, 0.0));
        assert_vec3_near(parts.position, (5.0, 0.0, 0.0));
    }

    #[test]
    fn nested_scales_multiply() {
        let parent = compose_local(
            Vector3::new(2.0, 2.0, 2.0),
            Vector3::new(0.0, 0.0, 0.0),
            Vector3::new(0.0, 0.0, 0.0),
        );
        let child = compose_local(
            Vector3::new(3.0, 1.0, 0.5),
            Vector3::new(0.0, 0.0, 0.0),
            Vector3::new(1.0, 0.0, 0.0),
        );
        let parts = decompose(&(parent * child));
        assert_vec3_near(parts.scale, (6.0, 2.0, 1.0));
        // Child translation is scaled by the parent.
        assert_vec3_near(parts.position, (2.0, 0.0, 0.0));
    }

    #[test]
    fn model_matrix_applies_rotations_z_first() {
        // A point on +X under a 90 degree Y rotation lands on -Z.
        let m = model_matrix(
            Vector3::new(1.0, 1.0, 1.0),
            Vector3::new(0.0, 90.0, 0.0),
            Vector3::new(0.0, 0.0, 0.0),
        );
        let p = m * cgmath::Vector4::new(1.0, 0.0, 0.0, 1.0);
        assert!((p.x).abs() < EPS && (p.z + 1.0).abs() < EPS);
    }
}
