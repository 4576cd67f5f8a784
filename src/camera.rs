//! A fixed look-at camera and its view-projection uniform.

use cgmath::{Deg, Matrix4, Point3, Vector3, perspective};

/// Converts the OpenGL clip-space depth range (-1..1) to wgpu's (0..1).
#[rustfmt::skip]
pub const OPENGL_TO_WGPU_MATRIX: Matrix4<f32> = Matrix4::new(
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.0,
    0.0, 0.0, 0.5, 1.0,
);

/// Perspective look-at camera. The tableau is static, so the camera is set
/// once before rendering begins.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Camera {
    pub eye: Point3<f32>,
    pub target: Point3<f32>,
    pub up: Vector3<f32>,
    pub aspect: f32,
    pub fovy_deg: f32,
    pub znear: f32,
    pub zfar: f32,
}

impl Camera {
    /// Default vantage point over the tabletop.
    pub fn overlooking(aspect: f32) -> Self {
        Self {
            eye: Point3::new(0.0, 5.0, 9.0),
            target: Point3::new(0.0, 0.0, 0.0),
            up: Vector3::unit_y(),
            aspect,
            fovy_deg: 45.0,
            znear: 0.1,
            zfar: 100.0,
        }
    }

    pub fn view_projection(&self) -> Matrix4<f32> {
        let view = Matrix4::look_at_rh(self.eye, self.target, self.up);
        let proj = perspective(Deg(self.fovy_deg), self.aspect, self.znear, self.zfar);
        OPENGL_TO_WGPU_MATRIX * proj * view
    }

    pub fn to_raw(&self) -> CameraUniform {
        CameraUniform {
            view_proj: self.view_projection().into(),
            view_position: [self.eye.x, self.eye.y, self.eye.z, 1.0],
        }
    }
}

#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniform {
    pub view_proj: [[f32; 4]; 4],
    pub view_position: [f32; 4],
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn target_projects_into_clip_space() {
        let camera = Camera::overlooking(16.0 / 9.0);
        let clip = camera.view_projection() * cgmath::Vector4::new(0.0, 0.0, 0.0, 1.0);
        let depth = clip.z / clip.w;
        assert!(depth > 0.0 && depth < 1.0, "depth {depth} outside wgpu range");
    }
}
