//! Configuration structs with sensible defaults and RON persistence.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Top-level orrery configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Window settings.
    pub window: WindowConfig,
    /// Projection and frame settings.
    pub render: RenderConfig,
    /// Camera placement and motion.
    pub camera: CameraConfig,
    /// Procedural scene parameters.
    pub scene: SceneConfig,
    /// Where textures come from.
    pub resources: ResourceConfig,
    /// Input settings.
    pub input: InputConfig,
    /// Debug/development settings.
    pub debug: DebugConfig,
}

/// Window configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WindowConfig {
    /// Window width in logical pixels. Also the logical off-screen width.
    pub width: u32,
    /// Window height in logical pixels.
    pub height: u32,
    /// Enable vsync (PresentMode::Fifo).
    pub vsync: bool,
    /// Window title.
    pub title: String,
}

/// Rendering configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RenderConfig {
    /// Vertical field of view in degrees.
    pub fov_y_degrees: f32,
    /// Near clip plane distance.
    pub near: f32,
    /// Far clip plane distance. Must enclose the sky sphere.
    pub far: f32,
    /// Draw the status text overlay.
    pub overlay_text: bool,
    /// Off-screen clear color (linear RGBA).
    pub clear_color: [f64; 4],
}

/// Camera configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CameraConfig {
    /// Initial distance of the camera from the sun along +Z.
    pub start_distance: f32,
    /// Distance moved per dolly key event.
    pub dolly_step: f32,
    /// Mouse pixels per radian of pitch.
    pub pitch_divisor: f32,
}

/// Scene generation configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SceneConfig {
    /// Star field seed. `None` picks a fresh seed every run.
    pub star_seed: Option<u64>,
    /// Number of points on each orbit ring.
    pub orbit_segments: u32,
    /// Uniform scale of the sky sphere.
    pub sky_scale: f32,
    /// Multiplier applied to wall-clock seconds before animating orbits.
    pub time_scale: f32,
}

/// Texture source configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ResourceConfig {
    /// Directory holding `<name>.png` / `<name>.jpg` images. `None` uses
    /// procedural placeholder textures.
    pub texture_dir: Option<PathBuf>,
    /// Image name of the 16x16 glyph atlas.
    pub font_atlas: String,
}

/// Input configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct InputConfig {
    /// Keybinding overrides (action name -> key name).
    pub keybindings: HashMap<String, String>,
}

/// Debug/development configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DebugConfig {
    /// Log level override (e.g., "debug", "info", "warn").
    pub log_level: String,
}

// --- Default implementations ---

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 640,
            height: 480,
            vsync: true,
            title: "Orrery".to_string(),
        }
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            fov_y_degrees: 60.0,
            near: 0.1,
            far: 400.0,
            overlay_text: false,
            clear_color: [0.0, 0.0, 0.0, 1.0],
        }
    }
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            start_distance: 35.0,
            dolly_step: 0.1,
            pitch_divisor: 240.0,
        }
    }
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            star_seed: None,
            orbit_segments: 100,
            sky_scale: 150.0,
            time_scale: 1.0,
        }
    }
}

impl Default for ResourceConfig {
    fn default() -> Self {
        Self {
            texture_dir: None,
            font_atlas: "font".to_string(),
        }
    }
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

/// Platform config directory for the orrery, e.g. `~/.config/orrery`.
///
/// Falls back to the working directory when the platform has none.
pub fn default_config_dir() -> PathBuf {
    dirs::config_dir()
        .map(|dir| dir.join("orrery"))
        .unwrap_or_else(|| PathBuf::from("."))
}

// --- Load / Save / Validate ---

impl Config {
    /// Load config from the given directory, or create a default config file.
    pub fn load_or_create(config_dir: &Path) -> Result<Self, ConfigError> {
        let config_path = config_dir.join("config.ron");

        if config_path.exists() {
            let contents = std::fs::read_to_string(&config_path).map_err(ConfigError::ReadError)?;
            let config: Config = ron::from_str(&contents).map_err(ConfigError::ParseError)?;
            log::info!("Loaded config from {}", config_path.display());
            Ok(config)
        } else {
            let config = Config::default();
            config.save(config_dir)?;
            log::info!("Created default config at {}", config_path.display());
            Ok(config)
        }
    }

    /// Save config to the given directory as `config.ron`.
    pub fn save(&self, config_dir: &Path) -> Result<(), ConfigError> {
        std::fs::create_dir_all(config_dir).map_err(ConfigError::WriteError)?;

        let config_path = config_dir.join("config.ron");
        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(3)
            .separate_tuple_members(true)
            .enumerate_arrays(false);

        let serialized =
            ron::ser::to_string_pretty(self, pretty).map_err(ConfigError::SerializeError)?;

        std::fs::write(&config_path, serialized).map_err(ConfigError::WriteError)?;
        Ok(())
    }

    /// Reject values the renderer cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.window.width == 0 || self.window.height == 0 {
            return Err(ConfigError::InvalidValue {
                field: "window",
                reason: format!("{}x{} has a zero extent", self.window.width, self.window.height),
            });
        }
        if !(self.render.near > 0.0 && self.render.far > self.render.near) {
            return Err(ConfigError::InvalidValue {
                field: "render.far",
                reason: format!(
                    "clip range {}..{} is empty",
                    self.render.near, self.render.far
                ),
            });
        }
        if self.render.far <= self.scene.sky_scale {
            return Err(ConfigError::InvalidValue {
                field: "scene.sky_scale",
                reason: format!(
                    "sky radius {} lies beyond the far plane {}",
                    self.scene.sky_scale, self.render.far
                ),
            });
        }
        if !(self.render.fov_y_degrees > 0.0 && self.render.fov_y_degrees < 180.0) {
            return Err(ConfigError::InvalidValue {
                field: "render.fov_y_degrees",
                reason: format!("{} is outside (0, 180)", self.render.fov_y_degrees),
            });
        }
        if self.camera.pitch_divisor == 0.0 || !self.camera.pitch_divisor.is_finite() {
            return Err(ConfigError::InvalidValue {
                field: "camera.pitch_divisor",
                reason: "must be finite and non-zero".to_string(),
            });
        }
        if !self.camera.dolly_step.is_finite() {
            return Err(ConfigError::InvalidValue {
                field: "camera.dolly_step",
                reason: format!("{} is not finite", self.camera.dolly_step),
            });
        }
        if !self.scene.time_scale.is_finite() {
            return Err(ConfigError::InvalidValue {
                field: "scene.time_scale",
                reason: format!("{} is not finite", self.scene.time_scale),
            });
        }
        if self.scene.orbit_segments < 3 {
            return Err(ConfigError::InvalidValue {
                field: "scene.orbit_segments",
                reason: format!("{} points cannot form a ring", self.scene.orbit_segments),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_serializes() {
        let config = Config::default();
        let ron_str =
            ron::ser::to_string_pretty(&config, ron::ser::PrettyConfig::new().depth_limit(3))
                .unwrap();
        assert!(ron_str.contains("width: 640"));
        assert!(ron_str.contains("start_distance: 35.0"));
    }

    #[test]
    fn test_missing_section_uses_default() {
        let ron_str = "(window: (), render: ())";
        let config: Config = ron::from_str(ron_str).unwrap();
        assert_eq!(config.camera, CameraConfig::default());
        assert_eq!(config.scene.orbit_segments, 100);
    }

    #[test]
    fn test_extra_field_ignored() {
        let result: Result<Config, _> = ron::from_str("(future_setting: true)");
        assert!(result.is_ok());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.window.width = 1024;
        config.scene.star_seed = Some(7);
        config.resources.texture_dir = Some(PathBuf::from("/tmp/textures"));

        config.save(dir.path()).unwrap();
        let loaded = Config::load_or_create(dir.path()).unwrap();
        assert_eq!(config, loaded);
    }

    #[test]
    fn test_load_creates_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_or_create(dir.path()).unwrap();
        assert_eq!(config, Config::default());
        assert!(dir.path().join("config.ron").exists());
    }

    #[test]
    fn test_invalid_ron_produces_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("config.ron"), "{{not valid}}").unwrap();
        let result = Config::load_or_create(dir.path());
        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn test_default_validates() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_zero_window_rejected() {
        let mut config = Config::default();
        config.window.height = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { field: "window", .. })
        ));
    }

    #[test]
    fn test_sky_outside_far_plane_rejected() {
        let mut config = Config::default();
        config.render.far = 100.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_field_of_view_range() {
        for fov in [0.0, -10.0, 180.0, f32::NAN] {
            let mut config = Config::default();
            config.render.fov_y_degrees = fov;
            assert!(
                matches!(
                    config.validate(),
                    Err(ConfigError::InvalidValue {
                        field: "render.fov_y_degrees",
                        ..
                    })
                ),
                "fov {fov} accepted"
            );
        }
        let mut config = Config::default();
        config.render.fov_y_degrees = 179.0;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_non_finite_camera_and_time_rejected() {
        let mut config = Config::default();
        config.camera.dolly_step = f32::INFINITY;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue {
                field: "camera.dolly_step",
                ..
            })
        ));

        let mut config = Config::default();
        config.scene.time_scale = f32::NAN;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue {
                field: "scene.time_scale",
                ..
            })
        ));
    }
}
