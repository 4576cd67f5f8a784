//! Surface materials and the tag-keyed material registry.

use cgmath::Vector3;

/// Phong-style material entry: diffuse and specular colors plus shininess,
/// keyed by a tag string.
#[derive(Clone, Debug, PartialEq)]
pub struct Material {
    pub tag: String,
    pub diffuse_color: Vector3<f32>,
    pub specular_color: Vector3<f32>,
    pub shininess: f32,
}

impl Material {
    pub fn new(
        tag: impl Into<String>,
        diffuse_color: Vector3<f32>,
        specular_color: Vector3<f32>,
        shininess: f32,
    ) -> Self {
        Self {
            tag: tag.into(),
            diffuse_color,
            specular_color,
            shininess,
        }
    }
}

impl Default for Material {
    /// Neutral matte grey. Bound whenever a material tag lookup misses so
    /// that a miss never leaves a previous draw's material state active.
    fn default() -> Self {
        Self {
            tag: String::new(),
            diffuse_color: Vector3::new(0.8, 0.8, 0.8),
            specular_color: Vector3::new(0.0, 0.0, 0.0),
            shininess: 1.0,
        }
    }
}

/// Unbounded list of materials with first-match lookup by tag.
///
/// Built once during scene preparation and read-only afterwards.
#[derive(Debug, Default)]
pub struct MaterialRegistry {
    materials: Vec<Material>,
}

impl MaterialRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn define(&mut self, material: Material) {
        self.materials.push(material);
    }

    /// Linear scan; the first material whose tag matches wins.
    pub fn find(&self, tag: &str) -> Option<&Material> {
        self.materials.iter().find(|m| m.tag == tag)
    }

    pub fn len(&self) -> usize {
        self.materials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.materials.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grey(tag: &str, level: f32) -> Material {
        Material::new(
            tag,
            Vector3::new(level, level, level),
            Vector3::new(0.0, 0.0, 0.0),
            1.0,
        )
    }

    #[test]
    fn find_returns_first_match() {
        let mut registry = MaterialRegistry::new();
        registry.define(grey("wood", 0.3));
        registry.define(grey("wood", 0.9));
        let found = registry.find("wood").unwrap();
        assert_eq!(found.diffuse_color.x, 0.3);
    }

    #[test]
    fn find_misses_unknown_tag() {
        let mut registry = MaterialRegistry::new();
        registry.define(grey("wood", 0.3));
        assert!(registry.find("velvet").is_none());
        assert!(MaterialRegistry::new().find("wood").is_none());
    }
}
