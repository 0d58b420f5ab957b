use async_trait::async_trait;
use popcorn_models::{Movie, MovieDetail};
use crate::error::SourceError;

#[async_trait]
pub trait MovieSource: Send + Sync {
    // Source metadata
    fn source_name(&self) -> &str;

    /// Free-text title search. A negative provider answer is `SourceError::NotFound`.
    async fn search(&self, query: &str) -> Result<Vec<Movie>, SourceError>;

    /// Full detail for one identifier.
    async fn details(&self, imdb_id: &str) -> Result<MovieDetail, SourceError>;
}
