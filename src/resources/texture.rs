//! GPU textures, image decoding and the tag-keyed texture registry.
//!
//! The core consumes decoded pixel buffers from the `image` crate; only RGB
//! (3 channels) and RGBA (4 channels) images are supported. Registered
//! textures live in a fixed-capacity [`TextureRegistry`] whose slot indices
//! double as sampler slot numbers in the shader.

use std::path::Path;

use anyhow::{Context as _, Result, ensure};
use image::GenericImageView;
use log::info;

/// A GPU texture with its view and sampler.
#[derive(Debug)]
pub struct Texture {
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
    pub sampler: wgpu::Sampler,
}

impl Texture {
    /// Standard depth buffer texture format (32-bit float).
    pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

    /// Create a depth texture for depth-testing during rendering.
    pub fn create_depth_texture(device: &wgpu::Device, size: [u32; 2], label: &str) -> Self {
        let size = wgpu::Extent3d {
            width: size[0].max(1),
            height: size[1].max(1),
            depth_or_array_layers: 1,
        };
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: Self::DEPTH_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING,
            view_formats: &[Self::DEPTH_FORMAT],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            address_mode_u: wgpu::AddressMode::Repeat,
            address_mode_v: wgpu::AddressMode::Repeat,
            address_mode_w: wgpu::AddressMode::Repeat,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Nearest,
            compare: Some(wgpu::CompareFunction::LessEqual),
            lod_min_clamp: 0.0,
            lod_max_clamp: 100.0,
            ..Default::default()
        });

        Self {
            texture,
            view,
            sampler,
        }
    }

    /// Decode raw image file bytes and upload them as a texture.
    pub fn from_bytes(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        bytes: &[u8],
        label: &str,
    ) -> Result<Self> {
        let img = image::load_from_memory(bytes)
            .with_context(|| format!("could not decode image data for {label:?}"))?;
        Self::from_image(device, queue, &img, Some(label))
    }

    /// Upload a decoded image as a texture.
    ///
    /// Only 3-channel (RGB) and 4-channel (RGBA) images are accepted; RGB
    /// data is expanded to RGBA for upload since wgpu has no 24-bit format.
    pub fn from_image(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        img: &image::DynamicImage,
        label: Option<&str>,
    ) -> Result<Self> {
        let channels = img.color().channel_count();
        ensure!(
            channels == 3 || channels == 4,
            "unsupported image with {channels} channels (expected RGB or RGBA)"
        );

        let dimensions = img.dimensions();
        let rgba = img.to_rgba8();

        let size = wgpu::Extent3d {
            width: dimensions.0,
            height: dimensions.1,
            depth_or_array_layers: 1,
        };
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label,
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8UnormSrgb,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                aspect: wgpu::TextureAspect::All,
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
            },
            &rgba,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(4 * dimensions.0),
                rows_per_image: Some(dimensions.1),
            },
            size,
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            address_mode_u: wgpu::AddressMode::Repeat,
            address_mode_v: wgpu::AddressMode::Repeat,
            address_mode_w: wgpu::AddressMode::Repeat,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });

        Ok(Self {
            texture,
            view,
            sampler,
        })
    }
}

/// Fixed-capacity, insertion-ordered registry mapping texture tags to loaded
/// textures.
///
/// Slot indices are assigned in registration order and stay stable for the
/// registry's lifetime. Lookup is a linear scan; at 16 slots there is
/// nothing to optimize.
///
/// Generic over the stored handle so the bookkeeping can be exercised
/// without a GPU device; in the renderer `T` is always [`Texture`].
#[derive(Debug)]
pub struct TextureRegistry<T = Texture> {
    slots: Vec<(String, T)>,
}

impl<T> TextureRegistry<T> {
    /// Maximum number of texture slots, matching the sampler slot count the
    /// shader exposes.
    pub const MAX_TEXTURE_SLOTS: usize = 16;

    pub fn new() -> Self {
        Self { slots: Vec::new() }
    }

    /// Register a texture under `tag` and return its slot index.
    ///
    /// Fails without mutating the registry when it is at capacity or the tag
    /// is already taken.
    pub fn register(&mut self, tag: impl Into<String>, texture: T) -> Result<usize> {
        let tag = tag.into();
        ensure!(
            self.slots.len() < Self::MAX_TEXTURE_SLOTS,
            "texture limit ({}) reached; cannot register {tag:?}",
            Self::MAX_TEXTURE_SLOTS,
        );
        ensure!(
            self.find_slot(&tag).is_none(),
            "texture tag {tag:?} is already registered",
        );
        self.slots.push((tag, texture));
        Ok(self.slots.len() - 1)
    }

    /// Slot index for a previously registered tag, or `None` on a miss.
    pub fn find_slot(&self, tag: &str) -> Option<usize> {
        self.slots.iter().position(|(t, _)| t == tag)
    }

    pub fn get(&self, slot: usize) -> Option<&T> {
        self.slots.get(slot).map(|(_, texture)| texture)
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, &str, &T)> {
        self.slots
            .iter()
            .enumerate()
            .map(|(slot, (tag, texture))| (slot, tag.as_str(), texture))
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

impl<T> Default for TextureRegistry<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Load an image file and register it under `tag`, returning the slot.
///
/// Failures (unreadable file, unsupported channel count, registry full) are
/// reported to the caller; the scene simply proceeds without that texture.
pub fn load_texture_file(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    registry: &mut TextureRegistry,
    path: &Path,
    tag: &str,
) -> Result<usize> {
    let bytes = std::fs::read(path)
        .with_context(|| format!("could not read texture file {}", path.display()))?;
    let texture = Texture::from_bytes(device, queue, &bytes, tag)?;
    let slot = registry.register(tag, texture)?;
    info!(
        "loaded texture {} into slot {slot} as {tag:?}",
        path.display()
    );
    Ok(slot)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slots_follow_registration_order() {
        let mut registry: TextureRegistry<u32> = TextureRegistry::new();
        assert_eq!(registry.register("fabric", 10).unwrap(), 0);
        assert_eq!(registry.register("board", 11).unwrap(), 1);
        assert_eq!(registry.register("candle", 12).unwrap(), 2);

        assert_eq!(registry.find_slot("board"), Some(1));
        assert_eq!(registry.get(1), Some(&11));
    }

    #[test]
    fn lookup_miss_returns_none() {
        let mut registry: TextureRegistry<u32> = TextureRegistry::new();
        registry.register("fabric", 1).unwrap();
        assert_eq!(registry.find_slot("velvet"), None);
    }

    #[test]
    fn seventeenth_registration_fails_without_mutation() {
        let mut registry: TextureRegistry<u32> = TextureRegistry::new();
        for i in 0..16 {
            registry.register(format!("tex-{i}"), i).unwrap();
        }
        assert!(registry.register("one-too-many", 99).is_err());
        assert_eq!(registry.len(), 16);
        assert_eq!(registry.find_slot("one-too-many"), None);
    }

    #[test]
    fn duplicate_tag_is_rejected() {
        let mut registry: TextureRegistry<u32> = TextureRegistry::new();
        registry.register("fabric", 1).unwrap();
        assert!(registry.register("fabric", 2).is_err());
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get(0), Some(&1));
    }
}
