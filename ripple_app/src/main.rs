//! Ripple mesh deformer
//!
//! Opens a window and draws a wireframe grid rippled by the vertex shader.
//! An optional first argument names a TOML or RON config file; otherwise
//! `ripple.toml` in the working directory is used when present.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use ripple_engine::prelude::*;

const DEFAULT_CONFIG: &str = "ripple.toml";

fn load_config(arg: Option<PathBuf>) -> Result<RippleConfig, ripple_engine::core::ConfigError> {
    match arg {
        Some(path) => {
            log::info!("Loading configuration from {}", path.display());
            RippleConfig::load_from_file(&path)
        }
        None if Path::new(DEFAULT_CONFIG).exists() => {
            log::info!("Loading configuration from {DEFAULT_CONFIG}");
            RippleConfig::load_from_file(DEFAULT_CONFIG)
        }
        None => {
            log::info!("No configuration file, using defaults");
            Ok(RippleConfig::default())
        }
    }
}

fn main() -> ExitCode {
    ripple_engine::foundation::logging::init();

    log::info!("Starting ripple deformer");

    let config = match load_config(std::env::args_os().nth(1).map(PathBuf::from)) {
        Ok(config) => config,
        Err(e) => {
            log::error!("Failed to load configuration: {e}");
            return ExitCode::FAILURE;
        }
    };

    match Engine::run(&config) {
        Ok(()) => {
            log::info!("Ripple deformer exited cleanly");
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("Ripple deformer failed: {e}");
            ExitCode::FAILURE
        }
    }
}
