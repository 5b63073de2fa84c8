//! Configuration for the orrery.
//!
//! Settings persist to disk as a RON file with serde defaults on every
//! section, so older files keep loading as fields are added. Command-line
//! arguments parsed with clap override whatever was loaded.

mod cli;
mod config;
mod error;

pub use cli::CliArgs;
pub use config::{
    CameraConfig, Config, DebugConfig, InputConfig, RenderConfig, ResourceConfig, SceneConfig,
    WindowConfig, default_config_dir,
};
pub use error::ConfigError;
