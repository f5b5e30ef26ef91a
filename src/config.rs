// src/config.rs

//! Configuration loading utilities.
//!
//! A missing config file is not an error: the built-in defaults describe
//! the public contest data host. A file that exists but does not parse or
//! validate is.

use std::path::Path;

use crate::error::{AppError, Result};
use crate::models::Config;

/// Load configuration from a TOML file, falling back to defaults when the
/// file does not exist, and validate the result.
pub fn load_config(path: &Path) -> Result<Config> {
    let config = if path.exists() {
        log::debug!("Loading configuration from {}", path.display());
        Config::load(path)?
    } else {
        log::info!("No config file at {}, using defaults", path.display());
        Config::default()
    };

    config
        .validate()
        .map_err(|e| AppError::config(format!("Invalid configuration in {}: {e}", path.display())))?;

    Ok(config)
}
