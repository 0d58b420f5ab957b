use serde::{Deserialize, Serialize};
use crate::detail::MovieDetail;
use crate::movie::Movie;

/// Derived search view: what the result list should show right now.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SearchState {
    pub query: String,
    pub movies: Vec<Movie>,
    pub is_loading: bool,
    pub error: Option<String>,
}

impl SearchState {
    pub fn result_count(&self) -> usize {
        self.movies.len()
    }
}

/// Detail view for the current selection.
///
/// `detail` is not cleared while a new fetch is loading, so it may briefly
/// belong to the previous selection. Compare `detail.imdb_id` with
/// `selected_id` before trusting it.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct DetailState {
    pub selected_id: Option<String>,
    pub detail: Option<MovieDetail>,
    pub is_loading: bool,
    pub error: Option<String>,
}

impl DetailState {
    /// The loaded detail, only if it belongs to the current selection.
    pub fn current(&self) -> Option<&MovieDetail> {
        match (&self.selected_id, &self.detail) {
            (Some(id), Some(detail)) if &detail.imdb_id == id => Some(detail),
            _ => None,
        }
    }
}
