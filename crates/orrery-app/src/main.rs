//! Entry point for the `orrery` binary.

use clap::Parser;
use orrery_app::{error::AppError, window};
use orrery_config::{CliArgs, Config, default_config_dir};
use tracing::error;

fn main() {
    let args = CliArgs::parse();
    let config_dir = args.config.clone().unwrap_or_else(default_config_dir);

    let config = match Config::load_or_create(&config_dir) {
        Ok(mut config) => {
            config.apply_cli_overrides(&args);
            config
        }
        Err(e) => {
            orrery_log::init_logging(None, cfg!(debug_assertions), None);
            error!("Failed to load config from {}: {e}", config_dir.display());
            std::process::exit(1);
        }
    };

    let log_dir = config_dir.join("logs");
    orrery_log::init_logging(Some(&log_dir), cfg!(debug_assertions), Some(&config));

    let result = config
        .validate()
        .map_err(AppError::from)
        .and_then(|()| window::run(config));
    if let Err(e) = result {
        error!("{e}");
        std::process::exit(1);
    }
}
