use crate::error::SourceError;
use crate::omdb::api;
use crate::traits::MovieSource;
use async_trait::async_trait;
use popcorn_config::OmdbConfig;
use popcorn_models::{Movie, MovieDetail};
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

#[derive(Clone)]
pub struct OmdbClient {
    client: Arc<Client>,
    base_url: String,
    api_key: String,
}

impl OmdbClient {
    pub fn new(base_url: String, api_key: String, timeout: Duration) -> Result<Self, SourceError> {
        let client = Client::builder()
            .user_agent(concat!("popcorn/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client: Arc::new(client),
            base_url,
            api_key,
        })
    }

    pub fn from_config(config: &OmdbConfig) -> Result<Self, SourceError> {
        info!("Using OMDb endpoint {}", config.base_url);
        Self::new(
            config.base_url.clone(),
            config.api_key.clone(),
            Duration::from_secs(config.timeout_seconds),
        )
    }

}

#[async_trait]
impl MovieSource for OmdbClient {
    fn source_name(&self) -> &str {
        "omdb"
    }

    async fn search(&self, query: &str) -> Result<Vec<Movie>, SourceError> {
        api::search_movies(&self.client, &self.base_url, &self.api_key, query).await
    }

    async fn details(&self, imdb_id: &str) -> Result<MovieDetail, SourceError> {
        api::get_movie_details(&self.client, &self.base_url, &self.api_key, imdb_id).await
    }
}
