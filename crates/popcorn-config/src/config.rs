use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::debug;

/// Environment variable that overrides `omdb.api_key`.
pub const API_KEY_ENV: &str = "POPCORN_OMDB_API_KEY";

/// Value written by `config init`; rejected by `validate`.
pub const API_KEY_PLACEHOLDER: &str = "YOUR_API_KEY";

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub omdb: OmdbConfig,
    #[serde(default)]
    pub search: SearchConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OmdbConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_api_key")]
    pub api_key: String,
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchConfig {
    /// Queries shorter than this (in characters) never reach the network.
    #[serde(default = "default_min_query_length")]
    pub min_query_length: usize,
}

fn default_base_url() -> String {
    "https://www.omdbapi.com/".to_string()
}

fn default_api_key() -> String {
    API_KEY_PLACEHOLDER.to_string()
}

fn default_timeout_seconds() -> u64 {
    10
}

fn default_min_query_length() -> usize {
    3
}

impl Default for OmdbConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key: default_api_key(),
            timeout_seconds: default_timeout_seconds(),
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            min_query_length: default_min_query_length(),
        }
    }
}

impl Config {
    pub fn load_from_file(path: &PathBuf) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Load the file if it exists (defaults otherwise), then apply the
    /// `POPCORN_OMDB_API_KEY` override.
    pub fn load_or_default(path: &PathBuf) -> anyhow::Result<Self> {
        let mut config = if path.exists() {
            Self::load_from_file(path)?
        } else {
            debug!("No config file at {}, using defaults", path.display());
            Self::default()
        };
        config.apply_api_key_override(std::env::var(API_KEY_ENV).ok());
        Ok(config)
    }

    pub fn apply_api_key_override(&mut self, api_key: Option<String>) {
        if let Some(key) = api_key.filter(|k| !k.trim().is_empty()) {
            debug!("Using OMDb API key from {}", API_KEY_ENV);
            self.omdb.api_key = key.trim().to_string();
        }
    }

    pub fn save_to_file(&self, path: &PathBuf) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if !self.is_api_key_configured() {
            return Err(anyhow::anyhow!(
                "omdb.api_key is not configured (set it in the config file or via {})",
                API_KEY_ENV
            ));
        }

        let url = url::Url::parse(&self.omdb.base_url)
            .map_err(|e| anyhow::anyhow!("omdb.base_url is not a valid URL: {}", e))?;
        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(anyhow::anyhow!("omdb.base_url must use http or https"));
        }

        if self.omdb.timeout_seconds == 0 {
            return Err(anyhow::anyhow!("omdb.timeout_seconds must be greater than zero"));
        }

        if self.search.min_query_length == 0 {
            return Err(anyhow::anyhow!("search.min_query_length must be greater than zero"));
        }

        Ok(())
    }

    pub fn is_api_key_configured(&self) -> bool {
        let key = self.omdb.api_key.trim();
        !key.is_empty() && key != API_KEY_PLACEHOLDER
    }

    /// API key with all but the last two characters hidden.
    pub fn masked_api_key(&self) -> String {
        let key = &self.omdb.api_key;
        let visible = key.chars().count().saturating_sub(2);
        key.chars()
            .enumerate()
            .map(|(i, c)| if i < visible { '*' } else { c })
            .collect()
    }
}
