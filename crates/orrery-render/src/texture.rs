//! Name-keyed GPU textures.
//!
//! Decoded images arrive as a [`PixelBuffer`] and are uploaded once into a
//! [`TextureTable`]. Lookups by name fail with [`TextureError::Missing`] so a
//! misconfigured scene stops at startup instead of drawing nothing.

use std::collections::HashMap;

/// Channel layout of 8-bit pixel data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelLayout {
    R,
    Rgb,
    Rgba,
}

impl ChannelLayout {
    pub fn channels(self) -> usize {
        match self {
            ChannelLayout::R => 1,
            ChannelLayout::Rgb => 3,
            ChannelLayout::Rgba => 4,
        }
    }
}

/// Decoded image data handed over by a texture source.
#[derive(Debug, Clone, PartialEq)]
pub struct PixelBuffer {
    pub width: u32,
    pub height: u32,
    pub layout: ChannelLayout,
    pub data: Vec<u8>,
}

impl PixelBuffer {
    /// Single-color image.
    pub fn solid(width: u32, height: u32, rgba: [u8; 4]) -> Self {
        let data = rgba
            .iter()
            .copied()
            .cycle()
            .take(width as usize * height as usize * 4)
            .collect();
        Self {
            width,
            height,
            layout: ChannelLayout::Rgba,
            data,
        }
    }

    /// Expand to tightly packed RGBA8. Grey maps to all three color channels.
    pub fn to_rgba8(&self) -> Result<Vec<u8>, TextureError> {
        validate_dimensions(self.width, self.height)?;
        let pixels = self.width as usize * self.height as usize;
        let expected = pixels * self.layout.channels();
        if self.data.len() != expected {
            return Err(TextureError::DataSizeMismatch {
                actual: self.data.len(),
                expected,
                width: self.width,
                height: self.height,
            });
        }

        Ok(match self.layout {
            ChannelLayout::Rgba => self.data.clone(),
            ChannelLayout::Rgb => self
                .data
                .chunks_exact(3)
                .flat_map(|px| [px[0], px[1], px[2], 255])
                .collect(),
            ChannelLayout::R => self.data.iter().flat_map(|&v| [v, v, v, 255]).collect(),
        })
    }
}

/// Errors that can occur during texture creation or lookup.
#[derive(Debug, thiserror::Error)]
pub enum TextureError {
    /// Pixel data length doesn't match the dimensions and channel layout.
    #[error("texture data size ({actual}) does not match expected ({expected}) for {width}x{height}")]
    DataSizeMismatch {
        actual: usize,
        expected: usize,
        width: u32,
        height: u32,
    },

    /// Width or height is zero.
    #[error("texture dimensions must be non-zero, got {width}x{height}")]
    ZeroDimensions { width: u32, height: u32 },

    /// No texture was registered under this name.
    #[error("texture '{name}' is not loaded")]
    Missing { name: String },
}

/// How a texture is sampled at its edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SamplerMode {
    /// Wrap around; used for sphere maps.
    Repeat,
    /// Clamp to the border texel; used for the glyph atlas.
    ClampToEdge,
}

/// Color interpretation of the uploaded bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorSpace {
    /// Diffuse colors, decoded from sRGB when sampled.
    Srgb,
    /// Data textures such as normal maps.
    Linear,
}

impl ColorSpace {
    pub fn format(self) -> wgpu::TextureFormat {
        match self {
            ColorSpace::Srgb => wgpu::TextureFormat::Rgba8UnormSrgb,
            ColorSpace::Linear => wgpu::TextureFormat::Rgba8Unorm,
        }
    }
}

/// A GPU texture registered in the table.
pub struct GpuTexture {
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
    pub sampler_mode: SamplerMode,
    pub dimensions: (u32, u32),
}

/// Name-keyed textures plus the two shared samplers.
pub struct TextureTable {
    textures: HashMap<String, GpuTexture>,
    sampler_repeat: wgpu::Sampler,
    sampler_clamp: wgpu::Sampler,
}

impl TextureTable {
    pub fn new(device: &wgpu::Device) -> Self {
        let sampler_repeat = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("sampler-repeat"),
            address_mode_u: wgpu::AddressMode::Repeat,
            address_mode_v: wgpu::AddressMode::Repeat,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::MipmapFilterMode::Nearest,
            ..Default::default()
        });

        let sampler_clamp = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("sampler-clamp"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::MipmapFilterMode::Nearest,
            ..Default::default()
        });

        Self {
            textures: HashMap::new(),
            sampler_repeat,
            sampler_clamp,
        }
    }

    /// Upload `pixels` under `name`. A name already present is kept as is.
    pub fn insert(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        name: &str,
        pixels: &PixelBuffer,
        color_space: ColorSpace,
        sampler_mode: SamplerMode,
    ) -> Result<(), TextureError> {
        if self.textures.contains_key(name) {
            log::debug!("Texture '{name}' already loaded");
            return Ok(());
        }

        let rgba = pixels.to_rgba8()?;
        let size = wgpu::Extent3d {
            width: pixels.width,
            height: pixels.height,
            depth_or_array_layers: 1,
        };

        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(name),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: color_space.format(),
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
            &rgba,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(pixels.width * 4),
                rows_per_image: None,
            },
            size,
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        self.textures.insert(
            name.to_string(),
            GpuTexture {
                texture,
                view,
                sampler_mode,
                dimensions: (pixels.width, pixels.height),
            },
        );
        log::info!(
            "Created texture '{name}' ({}x{}, {color_space:?})",
            pixels.width,
            pixels.height
        );
        Ok(())
    }

    /// Look up a texture, failing loudly when it was never loaded.
    pub fn get(&self, name: &str) -> Result<&GpuTexture, TextureError> {
        self.textures.get(name).ok_or_else(|| TextureError::Missing {
            name: name.to_string(),
        })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.textures.contains_key(name)
    }

    pub fn sampler(&self, mode: SamplerMode) -> &wgpu::Sampler {
        match mode {
            SamplerMode::Repeat => &self.sampler_repeat,
            SamplerMode::ClampToEdge => &self.sampler_clamp,
        }
    }

    pub fn len(&self) -> usize {
        self.textures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.textures.is_empty()
    }
}

fn validate_dimensions(width: u32, height: u32) -> Result<(), TextureError> {
    if width == 0 || height == 0 {
        return Err(TextureError::ZeroDimensions { width, height });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gpu::create_test_device;

    #[test]
    fn test_rgb_expands_to_rgba() {
        let pixels = PixelBuffer {
            width: 2,
            height: 1,
            layout: ChannelLayout::Rgb,
            data: vec![10, 20, 30, 40, 50, 60],
        };
        assert_eq!(
            pixels.to_rgba8().unwrap(),
            vec![10, 20, 30, 255, 40, 50, 60, 255]
        );
    }

    #[test]
    fn test_grey_expands_to_rgba() {
        let pixels = PixelBuffer {
            width: 1,
            height: 1,
            layout: ChannelLayout::R,
            data: vec![77],
        };
        assert_eq!(pixels.to_rgba8().unwrap(), vec![77, 77, 77, 255]);
    }

    #[test]
    fn test_size_mismatch_rejected() {
        let pixels = PixelBuffer {
            width: 2,
            height: 2,
            layout: ChannelLayout::Rgb,
            data: vec![0; 11],
        };
        assert!(matches!(
            pixels.to_rgba8(),
            Err(TextureError::DataSizeMismatch {
                actual: 11,
                expected: 12,
                ..
            })
        ));
    }

    #[test]
    fn test_zero_dimensions_rejected() {
        let pixels = PixelBuffer {
            width: 0,
            height: 4,
            layout: ChannelLayout::Rgba,
            data: Vec::new(),
        };
        assert!(matches!(
            pixels.to_rgba8(),
            Err(TextureError::ZeroDimensions { .. })
        ));
    }

    #[test]
    fn test_solid_fills_every_pixel() {
        let pixels = PixelBuffer::solid(3, 2, [128, 128, 255, 255]);
        assert_eq!(pixels.data.len(), 24);
        assert!(pixels.data.chunks_exact(4).all(|px| px == [128, 128, 255, 255]));
    }

    #[test]
    fn test_color_space_formats() {
        assert!(ColorSpace::Srgb.format().is_srgb());
        assert!(!ColorSpace::Linear.format().is_srgb());
    }

    #[test]
    fn test_missing_lookup_names_texture() {
        let Some((device, queue)) = create_test_device() else {
            return;
        };
        let mut table = TextureTable::new(&device);
        table
            .insert(
                &device,
                &queue,
                "earth",
                &PixelBuffer::solid(4, 4, [0, 0, 255, 255]),
                ColorSpace::Srgb,
                SamplerMode::Repeat,
            )
            .unwrap();

        assert!(table.get("earth").is_ok());
        assert_eq!(table.get("earth").unwrap().dimensions, (4, 4));
        match table.get("earth_normal") {
            Err(TextureError::Missing { name }) => assert_eq!(name, "earth_normal"),
            _ => panic!("expected missing texture"),
        }
    }

    #[test]
    fn test_insert_is_idempotent() {
        let Some((device, queue)) = create_test_device() else {
            return;
        };
        let mut table = TextureTable::new(&device);
        let pixels = PixelBuffer::solid(2, 2, [255; 4]);
        for _ in 0..2 {
            table
                .insert(
                    &device,
                    &queue,
                    "font",
                    &pixels,
                    ColorSpace::Srgb,
                    SamplerMode::ClampToEdge,
                )
                .unwrap();
        }
        assert_eq!(table.len(), 1);
    }
}
