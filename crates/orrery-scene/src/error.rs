//! Scene initialization errors.

use std::path::PathBuf;

use orrery_render::{OffscreenError, ShaderError, TextureError};

/// Everything that can stop the scene from being built. All of these are
/// fatal: the composer is either complete or not created at all.
#[derive(Debug, thiserror::Error)]
pub enum SceneError {
    #[error(transparent)]
    Texture(#[from] TextureError),

    #[error(transparent)]
    Shader(#[from] ShaderError),

    #[error(transparent)]
    Offscreen(#[from] OffscreenError),

    /// A body that supports normal mapping has no normal map available.
    #[error("body '{body}' supports normal mapping but texture '{texture}' is missing")]
    MissingNormalMap {
        body: &'static str,
        texture: &'static str,
    },

    /// A texture source has no image for this name.
    #[error("no image found for texture '{name}' in {}", dir.display())]
    MissingTexture { name: String, dir: PathBuf },

    #[error("failed to decode {}: {source}", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}
