use serde::{Deserialize, Serialize};

/// One row of a search response.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Movie {
    pub imdb_id: String,
    pub title: String,
    pub year: String, // Free text from the provider, e.g. "2010" or "2010–2014"
    pub poster: String,
}
