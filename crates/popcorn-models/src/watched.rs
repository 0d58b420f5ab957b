use serde::{Deserialize, Serialize};
use crate::detail::MovieDetail;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WatchedMovie {
    pub imdb_id: String,
    pub title: String,
    pub year: String,
    pub poster: String,
    pub imdb_rating: f64,
    pub runtime: u32,    // Minutes
    pub user_rating: u8, // 1-10, given when the movie was added
}

impl WatchedMovie {
    /// Build a watched entry from a loaded detail and the user's rating.
    pub fn from_detail(detail: &MovieDetail, user_rating: u8) -> Self {
        Self {
            imdb_id: detail.imdb_id.clone(),
            title: detail.title.clone(),
            year: detail.year.clone(),
            poster: detail.poster.clone(),
            imdb_rating: detail.imdb_rating,
            runtime: detail.runtime,
            user_rating,
        }
    }
}
