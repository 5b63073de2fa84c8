//! Off-screen render target: a color texture plus depth buffer that the scene
//! renders into before the composite pass samples it.
//!
//! The target is validated when it is built. An attachment with a zero extent,
//! an extent past the device limit, or a format that cannot be rendered to is
//! rejected with [`OffscreenError`] instead of producing a target that fails
//! later inside a render pass.

use crate::depth::DepthBuffer;

/// Why an off-screen target could not be built.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum OffscreenError {
    #[error("{attachment} attachment has a zero extent ({width}x{height})")]
    ZeroExtent {
        attachment: &'static str,
        width: u32,
        height: u32,
    },

    #[error("{attachment} attachment {width}x{height} exceeds the device limit of {max}")]
    ExceedsLimit {
        attachment: &'static str,
        width: u32,
        height: u32,
        max: u32,
    },

    #[error("{attachment} attachment format {format:?} is not renderable")]
    NotRenderable {
        attachment: &'static str,
        format: wgpu::TextureFormat,
    },
}

/// Check one attachment against the device before creating it.
pub fn validate_attachment(
    attachment: &'static str,
    width: u32,
    height: u32,
    format: wgpu::TextureFormat,
    max_dimension: u32,
    features: wgpu::Features,
) -> Result<(), OffscreenError> {
    if width == 0 || height == 0 {
        return Err(OffscreenError::ZeroExtent {
            attachment,
            width,
            height,
        });
    }
    if width > max_dimension || height > max_dimension {
        return Err(OffscreenError::ExceedsLimit {
            attachment,
            width,
            height,
            max: max_dimension,
        });
    }
    let allowed = format.guaranteed_format_features(features).allowed_usages;
    if !allowed.contains(wgpu::TextureUsages::RENDER_ATTACHMENT) {
        return Err(OffscreenError::NotRenderable { attachment, format });
    }
    Ok(())
}

/// Fixed-size color + depth target for the first pass.
pub struct OffscreenTarget {
    pub color: wgpu::Texture,
    pub color_view: wgpu::TextureView,
    pub depth: DepthBuffer,
    pub sampler: wgpu::Sampler,
    format: wgpu::TextureFormat,
    width: u32,
    height: u32,
}

impl OffscreenTarget {
    /// Color format of the off-screen image.
    pub const COLOR_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8UnormSrgb;

    pub fn new(device: &wgpu::Device, width: u32, height: u32) -> Result<Self, OffscreenError> {
        Self::with_format(device, width, height, Self::COLOR_FORMAT)
    }

    /// Build a target with an explicit color format. Both attachments are
    /// validated before any GPU resource is created.
    pub fn with_format(
        device: &wgpu::Device,
        width: u32,
        height: u32,
        format: wgpu::TextureFormat,
    ) -> Result<Self, OffscreenError> {
        let max = device.limits().max_texture_dimension_2d;
        let features = device.features();
        validate_attachment("color", width, height, format, max, features)?;
        validate_attachment("depth", width, height, DepthBuffer::FORMAT, max, features)?;

        let color = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("offscreen-color"),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING,
            view_formats: &[],
        });
        let color_view = color.create_view(&wgpu::TextureViewDescriptor::default());
        let depth = DepthBuffer::new(device, width, height);

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("offscreen-sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });

        log::info!("Created off-screen target {width}x{height} ({format:?})");

        Ok(Self {
            color,
            color_view,
            depth,
            sampler,
            format,
            width,
            height,
        })
    }

    pub fn format(&self) -> wgpu::TextureFormat {
        self.format
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// One texel in UV units, for kernel offsets in the composite shader.
    pub fn texel_size(&self) -> [f32; 2] {
        [1.0 / self.width as f32, 1.0 / self.height as f32]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gpu::create_test_device;

    const MAX: u32 = 8192;

    #[test]
    fn test_zero_width_rejected() {
        let result = validate_attachment(
            "color",
            0,
            480,
            OffscreenTarget::COLOR_FORMAT,
            MAX,
            wgpu::Features::empty(),
        );
        assert_eq!(
            result,
            Err(OffscreenError::ZeroExtent {
                attachment: "color",
                width: 0,
                height: 480
            })
        );
    }

    #[test]
    fn test_oversized_rejected() {
        let result = validate_attachment(
            "depth",
            MAX + 1,
            16,
            DepthBuffer::FORMAT,
            MAX,
            wgpu::Features::empty(),
        );
        assert!(matches!(result, Err(OffscreenError::ExceedsLimit { .. })));
    }

    #[test]
    fn test_compressed_format_not_renderable() {
        let result = validate_attachment(
            "color",
            64,
            64,
            wgpu::TextureFormat::Bc1RgbaUnorm,
            MAX,
            wgpu::Features::empty(),
        );
        assert!(matches!(result, Err(OffscreenError::NotRenderable { .. })));
    }

    #[test]
    fn test_valid_attachments_accepted() {
        for format in [OffscreenTarget::COLOR_FORMAT, DepthBuffer::FORMAT] {
            assert!(
                validate_attachment("any", 640, 480, format, MAX, wgpu::Features::empty()).is_ok()
            );
        }
    }

    #[test]
    fn test_zero_sized_target_fails_on_device() {
        let Some((device, _queue)) = create_test_device() else {
            return;
        };
        assert!(OffscreenTarget::new(&device, 0, 0).is_err());
    }

    #[test]
    fn test_target_texel_size() {
        let Some((device, _queue)) = create_test_device() else {
            return;
        };
        let target = OffscreenTarget::new(&device, 640, 480).unwrap();
        assert_eq!(target.size(), (640, 480));
        let [x, y] = target.texel_size();
        assert!((x - 1.0 / 640.0).abs() < 1e-9);
        assert!((y - 1.0 / 480.0).abs() < 1e-9);
    }
}
