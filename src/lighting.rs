//! Light configuration for the tableau and its GPU uniform layout.
//!
//! One directional light plus a small fixed set of point lights, each with
//! ambient/diffuse/specular terms and an active flag. Lighting is set up
//! once during scene preparation and uploaded as a single uniform block.

use cgmath::Vector3;

/// Number of point light slots in the uniform block.
pub const MAX_POINT_LIGHTS: usize = 4;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DirectionalLight {
    pub direction: Vector3<f32>,
    pub ambient: Vector3<f32>,
    pub diffuse: Vector3<f32>,
    pub specular: Vector3<f32>,
    pub active: bool,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointLight {
    pub position: Vector3<f32>,
    pub ambient: Vector3<f32>,
    pub diffuse: Vector3<f32>,
    pub specular: Vector3<f32>,
    pub active: bool,
}

impl Default for DirectionalLight {
    fn default() -> Self {
        Self {
            direction: Vector3::new(0.0, -1.0, 0.0),
            ambient: Vector3::new(0.0, 0.0, 0.0),
            diffuse: Vector3::new(0.0, 0.0, 0.0),
            specular: Vector3::new(0.0, 0.0, 0.0),
            active: false,
        }
    }
}

impl Default for PointLight {
    fn default() -> Self {
        Self {
            position: Vector3::new(0.0, 0.0, 0.0),
            ambient: Vector3::new(0.0, 0.0, 0.0),
            diffuse: Vector3::new(0.0, 0.0, 0.0),
            specular: Vector3::new(0.0, 0.0, 0.0),
            active: false,
        }
    }
}

/// The whole light setup. When `enabled` is false the shader skips lighting
/// and outputs surface color directly.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Lighting {
    pub directional: DirectionalLight,
    pub points: [PointLight; MAX_POINT_LIGHTS],
    pub enabled: bool,
}

impl Lighting {
    /// The tabletop's default mood: intense blue moonlight plus two warm
    /// candle-colored point lights.
    pub fn tabletop() -> Self {
        let mut points = [PointLight::default(); MAX_POINT_LIGHTS];
        points[0] = PointLight {
            position: Vector3::new(0.0, 5.0, 15.0),
            ambient: Vector3::new(0.03, 0.02, 0.01),
            diffuse: Vector3::new(0.9, 0.7, 0.2),
            specular: Vector3::new(0.8, 0.6, 0.2),
            active: true,
        };
        points[1] = PointLight {
            position: Vector3::new(0.0, 0.0, 0.0),
            ambient: Vector3::new(0.0, 0.0, 0.0),
            diffuse: Vector3::new(0.3, 0.9, 1.8),
            specular: Vector3::new(0.3, 0.9, 1.8),
            active: true,
        };
        Self {
            directional: DirectionalLight {
                direction: Vector3::new(0.0, -1.0, 0.0),
                ambient: Vector3::new(0.15, 0.2, 0.3),
                diffuse: Vector3::new(0.4, 0.5, 0.9),
                specular: Vector3::new(0.6, 0.8, 1.0),
                active: true,
            },
            points,
            enabled: true,
        }
    }

    pub fn to_raw(&self) -> LightingUniform {
        let raw = |vector: Vector3<f32>, ambient, diffuse, specular, active: bool| RawLight {
            vector: [vector.x, vector.y, vector.z, if active { 1.0 } else { 0.0 }],
            ambient: pad(ambient),
            diffuse: pad(diffuse),
            specular: pad(specular),
        };
        let d = &self.directional;
        LightingUniform {
            directional: raw(d.direction, d.ambient, d.diffuse, d.specular, d.active),
            points: self
                .points
                .map(|p| raw(p.position, p.ambient, p.diffuse, p.specular, p.active)),
            enabled: [u32::from(self.enabled), 0, 0, 0],
        }
    }
}

fn pad(v: Vector3<f32>) -> [f32; 4] {
    [v.x, v.y, v.z, 0.0]
}

/// One light in std140-compatible layout; the `w` of `vector` carries the
/// active flag.
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct RawLight {
    pub vector: [f32; 4],
    pub ambient: [f32; 4],
    pub diffuse: [f32; 4],
    pub specular: [f32; 4],
}

#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct LightingUniform {
    pub directional: RawLight,
    pub points: [RawLight; MAX_POINT_LIGHTS],
    pub enabled: [u32; 4],
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn active_flag_lands_in_vector_w() {
        let lighting = Lighting::tabletop();
        let raw = lighting.to_raw();
        assert_eq!(raw.directional.vector[3], 1.0);
        assert_eq!(raw.points[0].vector[3], 1.0);
        assert_eq!(raw.points[2].vector[3], 0.0);
        assert_eq!(raw.enabled[0], 1);
    }
}
