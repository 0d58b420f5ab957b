use crate::detail::MovieDetailService;
use crate::search::MovieSearchService;
use crate::summary::{summarize, WatchedSummary};
use crate::watched::WatchedListStore;
use popcorn_config::SearchConfig;
use popcorn_models::{DetailState, SearchState, WatchedMovie};
use popcorn_sources::MovieSource;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

/// Window title when no loaded detail is open.
pub const DEFAULT_TITLE: &str = "usePopcorn";

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Selection {
    #[default]
    None,
    Selected(String),
}

impl Selection {
    pub fn id(&self) -> Option<&str> {
        match self {
            Selection::None => None,
            Selection::Selected(id) => Some(id.as_str()),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ControllerError {
    #[error("no movie is selected")]
    NothingSelected,

    #[error("details for {0} are not loaded yet")]
    DetailNotReady(String),

    #[error("rating must be between 1 and 10, got {0}")]
    InvalidRating(u8),

    #[error("{0} is already in the watched list")]
    AlreadyWatched(String),
}

/// Composes search, detail and the watched list behind one event API.
///
/// Every method is an event handler; derived views (`summary`, `window_title`)
/// are computed on read.
pub struct ViewController {
    query: String,
    search: MovieSearchService,
    detail: MovieDetailService,
    watched: WatchedListStore,
    selection: Selection,
}

impl ViewController {
    pub fn new(source: Arc<dyn MovieSource>, config: &SearchConfig) -> Self {
        Self {
            query: String::new(),
            search: MovieSearchService::new(Arc::clone(&source), config.min_query_length),
            detail: MovieDetailService::new(source),
            watched: WatchedListStore::new(),
            selection: Selection::None,
        }
    }

    /// New query text. Closes the open movie and restarts the search.
    pub fn set_query(&mut self, query: &str) {
        debug!("Query changed to {:?}", query);
        self.query = query.to_string();
        self.close();
        self.search.search(query);
    }

    /// Pick a search result or watched entry. Picking the open one closes it.
    pub fn select(&mut self, imdb_id: &str) {
        if self.selection.id() == Some(imdb_id) {
            debug!("Toggling {} closed", imdb_id);
            self.close();
            return;
        }

        debug!("Selected {}", imdb_id);
        self.selection = Selection::Selected(imdb_id.to_string());
        self.detail.load(imdb_id);
    }

    pub fn close(&mut self) {
        if self.selection != Selection::None {
            self.selection = Selection::None;
            self.detail.clear();
        }
    }

    /// The Escape action.
    pub fn cancel(&mut self) {
        debug!("Cancel requested");
        self.close();
    }

    /// Rate the open movie and add it to the watched list, then close it.
    pub fn add_watched(&mut self, user_rating: u8) -> Result<WatchedMovie, ControllerError> {
        let imdb_id = self
            .selection
            .id()
            .ok_or(ControllerError::NothingSelected)?
            .to_string();

        if !(1..=10).contains(&user_rating) {
            return Err(ControllerError::InvalidRating(user_rating));
        }
        if self.watched.contains(&imdb_id) {
            return Err(ControllerError::AlreadyWatched(imdb_id));
        }

        let state = self.detail.state();
        let detail = state
            .current()
            .ok_or_else(|| ControllerError::DetailNotReady(imdb_id.clone()))?;

        let movie = WatchedMovie::from_detail(detail, user_rating);
        self.watched.add(movie.clone());
        info!("Added {} ({}) rated {}", movie.title, imdb_id, user_rating);
        self.close();

        Ok(movie)
    }

    pub fn delete_watched(&mut self, imdb_id: &str) -> bool {
        let removed = self.watched.remove(imdb_id);
        if removed {
            info!("Deleted {} from watched list", imdb_id);
        }
        removed
    }

    /// Wait for outstanding search and detail requests.
    pub async fn settle(&mut self) {
        self.search.settle().await;
        self.detail.settle().await;
    }

    pub fn min_query_length(&self) -> usize {
        self.search.min_query_length()
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn search_state(&self) -> SearchState {
        self.search.state()
    }

    pub fn detail_state(&self) -> DetailState {
        self.detail.state()
    }

    pub fn watched(&self) -> &WatchedListStore {
        &self.watched
    }

    pub fn summary(&self) -> WatchedSummary {
        summarize(self.watched.as_slice())
    }

    pub fn result_count(&self) -> usize {
        self.search.state().result_count()
    }

    pub fn is_watched(&self, imdb_id: &str) -> bool {
        self.watched.contains(imdb_id)
    }

    pub fn watched_user_rating(&self, imdb_id: &str) -> Option<u8> {
        self.watched.user_rating(imdb_id)
    }

    pub fn window_title(&self) -> String {
        match self.detail.state().current() {
            Some(detail) if !detail.title.is_empty() => format!("Movie {}", detail.title),
            _ => DEFAULT_TITLE.to_string(),
        }
    }
}
