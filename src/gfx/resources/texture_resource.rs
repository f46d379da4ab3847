//! Texture resource management for wgpu
//!
//! Provides utilities for creating GPU textures, views and samplers: the depth
//! target and the sampled material maps.

use image::RgbaImage;

/// Role of a material map; decides its texel format and neutral value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextureKind {
    Color,
    AmbientOcclusion,
    Normal,
    Roughness,
}

impl TextureKind {
    pub const ALL: [TextureKind; 4] = [
        TextureKind::Color,
        TextureKind::AmbientOcclusion,
        TextureKind::Normal,
        TextureKind::Roughness,
    ];

    /// Only color data is authored in sRGB; the other maps hold linear values.
    pub fn format(self) -> wgpu::TextureFormat {
        match self {
            TextureKind::Color => wgpu::TextureFormat::Rgba8UnormSrgb,
            _ => wgpu::TextureFormat::Rgba8Unorm,
        }
    }

    /// Texel that leaves shading unchanged: white, or a flat tangent-space normal.
    pub fn neutral_pixel(self) -> [u8; 4] {
        match self {
            TextureKind::Normal => [128, 128, 255, 255],
            _ => [255, 255, 255, 255],
        }
    }

    /// 1×1 image filled with [`TextureKind::neutral_pixel`].
    pub fn neutral_image(self) -> RgbaImage {
        RgbaImage::from_pixel(1, 1, image::Rgba(self.neutral_pixel()))
    }

    pub fn label(self) -> &'static str {
        match self {
            TextureKind::Color => "color",
            TextureKind::AmbientOcclusion => "ambient occlusion",
            TextureKind::Normal => "normal",
            TextureKind::Roughness => "roughness",
        }
    }
}

/// GPU texture resource containing texture, view, and sampler
pub struct TextureResource {
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
    pub sampler: wgpu::Sampler,
}

impl TextureResource {
    /// Standard depth buffer format used throughout the engine
    pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

    /// Creates a depth texture matching the surface configuration
    pub fn create_depth_texture(
        device: &wgpu::Device,
        config: &wgpu::SurfaceConfiguration,
        label: &str,
    ) -> Self {
        let size = wgpu::Extent3d {
            width: config.width,
            height: config.height,
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
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some(label),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
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

    /// Uploads a decoded RGBA image as a sampled texture.
    ///
    /// `address_mode` applies to both U and V; material maps use
    /// [`wgpu::AddressMode::Repeat`] so UVs scaled past 1.0 tile the image.
    pub fn from_image(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        image: &RgbaImage,
        kind: TextureKind,
        address_mode: wgpu::AddressMode,
        label: &str,
    ) -> Self {
        let (width, height) = image.dimensions();
        let size = wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        };

        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: kind.format(),
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            image.as_raw(),
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(4 * width),
                rows_per_image: Some(height),
            },
            size,
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some(&format!("{} Sampler", label)),
            address_mode_u: address_mode,
            address_mode_v: address_mode,
            address_mode_w: address_mode,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });

        Self {
            texture,
            view,
            sampler,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_neutral_images_are_single_texel() {
        for kind in TextureKind::ALL {
            let image = kind.neutral_image();
            assert_eq!(image.dimensions(), (1, 1));
            assert_eq!(image.get_pixel(0, 0).0, kind.neutral_pixel());
        }
        assert_eq!(TextureKind::Normal.neutral_pixel(), [128, 128, 255, 255]);
    }

    #[test]
    fn test_only_color_maps_are_srgb() {
        assert!(TextureKind::Color.format().is_srgb());
        assert!(!TextureKind::Roughness.format().is_srgb());
        assert!(!TextureKind::Normal.format().is_srgb());
    }
}
