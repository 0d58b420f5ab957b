pub mod config;
pub mod interactive;
pub mod lookup;
pub mod prompts;

use color_eyre::eyre::Context;
use color_eyre::Result;
use popcorn_config::{Config, PathManager};
use popcorn_core::ViewController;
use popcorn_sources::OmdbClient;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Resolve the config path: `--config` first, then `POPCORN_CONFIG`, then the platform default.
pub fn config_path(override_path: Option<&Path>) -> PathBuf {
    override_path
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathManager::default().config_file())
}

/// Load and validate the config, then build a controller over OMDb.
pub fn build_controller(config_override: Option<&Path>) -> Result<ViewController> {
    let path = config_path(config_override);
    let config = Config::load_or_default(&path)
        .map_err(|e| color_eyre::eyre::eyre!("Failed to load config from {}: {}", path.display(), e))?;
    config
        .validate()
        .map_err(|e| color_eyre::eyre::eyre!("{} (config file: {})", e, path.display()))?;

    let client = OmdbClient::from_config(&config.omdb).wrap_err("Failed to create OMDb client")?;
    Ok(ViewController::new(Arc::new(client), &config.search))
}
