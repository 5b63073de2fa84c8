//! Application-level failures.

use orrery_config::ConfigError;
use orrery_input::BindingError;
use orrery_render::{RenderContextError, SurfaceError};
use orrery_scene::SceneError;

/// Anything that ends the viewer with a non-zero exit code.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("key bindings: {0}")]
    Bindings(#[from] BindingError),

    #[error("failed to create event loop: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),

    #[error("failed to create window: {0}")]
    Window(#[from] winit::error::OsError),

    #[error("GPU initialization failed: {0}")]
    Gpu(#[from] RenderContextError),

    #[error("scene initialization failed: {0}")]
    Scene(#[from] SceneError),

    #[error("rendering stopped: {0}")]
    Surface(#[from] SurfaceError),
}
