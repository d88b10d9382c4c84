//! Application configuration - database settings and the `config.toml` seed file.

/// Database configuration and connection management
pub mod database;

/// Seed data loading from config.toml
pub mod seed;

use crate::errors::Result;
use seed::Config;
use std::path::Path;
use tracing::{info, warn};

/// Default location of the seed file.
pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// Loads the seed configuration from `CMS_CONFIG` or `./config.toml`.
///
/// A missing file is not an error: the application starts with no seed data.
pub fn load_app_configuration() -> Result<Config> {
    let path = std::env::var("CMS_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());

    if !Path::new(&path).exists() {
        warn!("No configuration file at {}, starting without seed data", path);
        return Ok(Config::default());
    }

    let config = seed::load_config(&path)?;
    info!(
        "Loaded {} sequences, {} departments and {} blocks from {}",
        config.sequences.len(),
        config.departments.len(),
        config.blocks.len(),
        path
    );
    Ok(config)
}
