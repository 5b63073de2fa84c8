//! Where texture pixels come from.
//!
//! [`ImageDirSource`] decodes `<name>.png` / `<name>.jpg` files from a
//! directory with the `image` crate. [`ProceduralSource`] generates
//! placeholders so the viewer runs without any assets: grey banded surfaces
//! that take the body tint, bumpy normal maps, a speckled sky and a boxy
//! glyph atlas.

use std::path::{Path, PathBuf};

use image::DynamicImage;
use orrery_render::{ChannelLayout, PixelBuffer};

use crate::error::SceneError;
use crate::text::ATLAS_CELLS;

/// Provides decoded pixels for a texture name.
pub trait TextureSource {
    fn load(&self, name: &str) -> Result<PixelBuffer, SceneError>;

    /// Whether bodies should multiply their tint into these textures.
    /// Real photographs carry their own color; placeholders don't.
    fn tints(&self) -> bool;
}

/// Image files in one directory.
#[derive(Debug, Clone)]
pub struct ImageDirSource {
    dir: PathBuf,
}

impl ImageDirSource {
    const EXTENSIONS: [&'static str; 3] = ["png", "jpg", "jpeg"];

    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn find(&self, name: &str) -> Option<PathBuf> {
        Self::EXTENSIONS
            .iter()
            .map(|ext| self.dir.join(format!("{name}.{ext}")))
            .find(|path| path.is_file())
    }
}

impl TextureSource for ImageDirSource {
    fn load(&self, name: &str) -> Result<PixelBuffer, SceneError> {
        let path = self.find(name).ok_or_else(|| SceneError::MissingTexture {
            name: name.to_string(),
            dir: self.dir.clone(),
        })?;
        let image = image::open(&path).map_err(|source| SceneError::Decode {
            path: path.clone(),
            source,
        })?;
        log::debug!("Decoded {}", path.display());
        Ok(pixel_buffer(image))
    }

    fn tints(&self) -> bool {
        false
    }
}

/// Keep 8-bit grey and RGB data as is; convert everything else to RGBA8.
fn pixel_buffer(image: DynamicImage) -> PixelBuffer {
    let (width, height) = (image.width(), image.height());
    let (layout, data) = match image {
        DynamicImage::ImageLuma8(buffer) => (ChannelLayout::R, buffer.into_raw()),
        DynamicImage::ImageRgb8(buffer) => (ChannelLayout::Rgb, buffer.into_raw()),
        other => (ChannelLayout::Rgba, other.to_rgba8().into_raw()),
    };
    PixelBuffer {
        width,
        height,
        layout,
        data,
    }
}

/// Generated placeholder textures.
#[derive(Debug, Clone)]
pub struct ProceduralSource {
    font_atlas: String,
}

impl ProceduralSource {
    const SURFACE_SIZE: (u32, u32) = (128, 64);
    const SKY_SIZE: (u32, u32) = (512, 256);
    const GLYPH_PIXELS: u32 = 16;

    /// `font_atlas` is the texture name answered with the glyph atlas.
    pub fn new(font_atlas: impl Into<String>) -> Self {
        Self {
            font_atlas: font_atlas.into(),
        }
    }
}

impl TextureSource for ProceduralSource {
    fn load(&self, name: &str) -> Result<PixelBuffer, SceneError> {
        Ok(if name == self.font_atlas {
            glyph_atlas(Self::GLYPH_PIXELS)
        } else if name == "sky" {
            speckled_sky(Self::SKY_SIZE.0, Self::SKY_SIZE.1)
        } else if name.ends_with("_normal") {
            bump_normals(Self::SURFACE_SIZE.0, Self::SURFACE_SIZE.1)
        } else {
            banded_surface(Self::SURFACE_SIZE.0, Self::SURFACE_SIZE.1)
        })
    }

    fn tints(&self) -> bool {
        true
    }
}

/// Light grey latitude bands.
fn banded_surface(width: u32, height: u32) -> PixelBuffer {
    let data = (0..height)
        .flat_map(|y| {
            let v = y as f32 / height as f32;
            let band = (v * std::f32::consts::PI * 7.0).sin() * 0.5 + 0.5;
            let value = (180.0 + band * 60.0) as u8;
            std::iter::repeat_n(value, width as usize)
        })
        .collect();
    PixelBuffer {
        width,
        height,
        layout: ChannelLayout::R,
        data,
    }
}

/// Tangent-space normals of a sinusoidal height field, encoded as `n * 0.5 + 0.5`.
fn bump_normals(width: u32, height: u32) -> PixelBuffer {
    const AMPLITUDE: f32 = 0.6;
    const FREQUENCY: f32 = 8.0;
    let tau = std::f32::consts::TAU;

    let mut data = Vec::with_capacity((width * height * 4) as usize);
    for y in 0..height {
        let v = y as f32 / height as f32;
        for x in 0..width {
            let u = x as f32 / width as f32;
            let du = AMPLITUDE * (u * tau * FREQUENCY).cos() * (v * tau * FREQUENCY / 2.0).sin();
            let dv = AMPLITUDE * (u * tau * FREQUENCY).sin() * (v * tau * FREQUENCY / 2.0).cos();
            let (nx, ny, nz) = (-du, -dv, 1.0);
            let length = (nx * nx + ny * ny + nz * nz).sqrt();
            let encode = |c: f32| ((c / length * 0.5 + 0.5) * 255.0).round() as u8;
            data.extend_from_slice(&[encode(nx), encode(ny), encode(nz), 255]);
        }
    }
    PixelBuffer {
        width,
        height,
        layout: ChannelLayout::Rgba,
        data,
    }
}

/// Near-black with sparse bright specks from an integer hash.
fn speckled_sky(width: u32, height: u32) -> PixelBuffer {
    let data = (0..height)
        .flat_map(|y| (0..width).map(move |x| (x, y)))
        .map(|(x, y)| {
            let mut h = x.wrapping_mul(0x8da6_b343) ^ y.wrapping_mul(0xd816_3841);
            h ^= h >> 13;
            h = h.wrapping_mul(0x85eb_ca6b);
            h ^= h >> 16;
            match h % 211 {
                0 => 230,
                1..=3 => 90,
                _ => 6,
            }
        })
        .collect();
    PixelBuffer {
        width,
        height,
        layout: ChannelLayout::R,
        data,
    }
}

/// 16x16 cells of white box outlines for printable ASCII, transparent elsewhere.
fn glyph_atlas(cell: u32) -> PixelBuffer {
    let size = cell * ATLAS_CELLS;
    let mut data = vec![0u8; (size * size * 4) as usize];
    for code in 33u32..127 {
        let (cx, cy) = ((code % ATLAS_CELLS) * cell, (code / ATLAS_CELLS) * cell);
        let (x0, x1) = (cx + 2, cx + cell - 3);
        let (y0, y1) = (cy + 2, cy + cell - 3);
        for y in y0..=y1 {
            for x in x0..=x1 {
                if x == x0 || x == x1 || y == y0 || y == y1 {
                    let i = ((y * size + x) * 4) as usize;
                    data[i..i + 4].copy_from_slice(&[255, 255, 255, 255]);
                }
            }
        }
    }
    PixelBuffer {
        width: size,
        height: size,
        layout: ChannelLayout::Rgba,
        data,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_procedural_buffers_are_consistent() {
        let source = ProceduralSource::new("font");
        for name in ["earth", "earth_normal", "sky", "font"] {
            let pixels = source.load(name).unwrap();
            let rgba = pixels.to_rgba8().unwrap();
            assert_eq!(rgba.len(), (pixels.width * pixels.height * 4) as usize, "{name}");
        }
        assert!(source.tints());
    }

    #[test]
    fn test_normal_map_points_outward() {
        let pixels = ProceduralSource::new("font").load("mars_normal").unwrap();
        // Blue channel encodes +Z, which always dominates a gentle bump field.
        assert!(pixels.data.chunks_exact(4).all(|px| px[2] > 128));
    }

    #[test]
    fn test_glyph_atlas_space_is_empty() {
        let pixels = ProceduralSource::new("glyphs").load("glyphs").unwrap();
        assert_eq!(pixels.width, 256);
        // ' ' is code 32: column 0, row 2.
        let cell = 16;
        for y in 2 * cell..3 * cell {
            for x in 0..cell {
                let i = ((y * pixels.width + x) * 4 + 3) as usize;
                assert_eq!(pixels.data[i], 0);
            }
        }
        // 'A' has an outline.
        assert!(pixels.data.chunks_exact(4).any(|px| px[3] == 255));
    }

    #[test]
    fn test_image_dir_loads_png() {
        let dir = tempfile::tempdir().unwrap();
        let image = image::RgbImage::from_pixel(4, 2, image::Rgb([10, 20, 30]));
        image.save(dir.path().join("venus.png")).unwrap();

        let source = ImageDirSource::new(dir.path());
        let pixels = source.load("venus").unwrap();
        assert_eq!((pixels.width, pixels.height), (4, 2));
        assert_eq!(pixels.layout, ChannelLayout::Rgb);
        assert_eq!(&pixels.data[..3], &[10, 20, 30]);
        assert!(!source.tints());
    }

    #[test]
    fn test_image_dir_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let source = ImageDirSource::new(dir.path());
        assert!(matches!(
            source.load("pluto"),
            Err(SceneError::MissingTexture { .. })
        ));
    }
}
