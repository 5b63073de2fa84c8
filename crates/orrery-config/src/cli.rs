//! Command-line argument parsing.

use std::path::PathBuf;

use clap::Parser;

use crate::Config;

/// Orrery command-line arguments.
///
/// CLI values override settings loaded from `config.ron`.
#[derive(Parser, Debug, Default)]
#[command(name = "orrery", about = "Real-time solar system renderer")]
pub struct CliArgs {
    /// Window width.
    #[arg(long)]
    pub width: Option<u32>,

    /// Window height.
    #[arg(long)]
    pub height: Option<u32>,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Directory with body textures (`sun.png`, `earth_normal.png`, ...).
    #[arg(long)]
    pub textures: Option<PathBuf>,

    /// Draw the status text overlay.
    #[arg(long)]
    pub overlay: bool,

    /// Fixed star field seed.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Path to config directory (overrides default location).
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl Config {
    /// Apply CLI overrides to a loaded config.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(w) = args.width {
            self.window.width = w;
        }
        if let Some(h) = args.height {
            self.window.height = h;
        }
        if let Some(ref level) = args.log_level {
            self.debug.log_level = level.clone();
        }
        if let Some(ref dir) = args.textures {
            self.resources.texture_dir = Some(dir.clone());
        }
        if args.overlay {
            self.render.overlay_text = true;
        }
        if let Some(seed) = args.seed {
            self.scene.star_seed = Some(seed);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_override() {
        let mut config = Config::default();
        let args = CliArgs {
            width: Some(1920),
            textures: Some(PathBuf::from("res/textures")),
            overlay: true,
            ..Default::default()
        };
        config.apply_cli_overrides(&args);
        assert_eq!(config.window.width, 1920);
        assert_eq!(
            config.resources.texture_dir,
            Some(PathBuf::from("res/textures"))
        );
        assert!(config.render.overlay_text);
        // Non-overridden fields retain defaults
        assert_eq!(config.window.height, 480);
        assert_eq!(config.scene.star_seed, None);
    }

    #[test]
    fn test_cli_no_override() {
        let defaults = Config::default();
        let mut config = Config::default();
        config.apply_cli_overrides(&CliArgs::default());
        assert_eq!(config, defaults);
    }

    #[test]
    fn test_cli_parses_flags() {
        let args = CliArgs::parse_from(["orrery", "--seed", "42", "--overlay", "--width", "800"]);
        assert_eq!(args.seed, Some(42));
        assert!(args.overlay);
        assert_eq!(args.width, Some(800));
    }
}
