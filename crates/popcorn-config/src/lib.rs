pub mod config;
pub mod paths;

pub use config::{Config, OmdbConfig, SearchConfig, API_KEY_ENV, API_KEY_PLACEHOLDER};
pub use paths::PathManager;
