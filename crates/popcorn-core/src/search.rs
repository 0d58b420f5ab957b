use crate::cancel::CancelToken;
use crate::lock_state;
use popcorn_models::SearchState;
use popcorn_sources::MovieSource;
use std::sync::{Arc, Mutex};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Shown when the provider answers a search negatively.
pub const NOT_FOUND_MESSAGE: &str = "Movie not found";

/// Shown for transport failures and non-success statuses.
pub const SEARCH_ERROR_MESSAGE: &str = "Something went wrong while fetching movies";

struct InFlight {
    token: CancelToken,
    handle: JoinHandle<()>,
}

/// Search-as-you-type with at most one request in flight.
///
/// Every new query cancels the previous request's token before the new one is
/// marked loading. A cancelled request never writes to the state, so results,
/// errors and the loading flag always belong to the latest query.
///
/// `search` spawns onto the current tokio runtime and must be called from
/// within one.
pub struct MovieSearchService {
    source: Arc<dyn MovieSource>,
    min_query_length: usize,
    state: Arc<Mutex<SearchState>>,
    in_flight: Option<InFlight>,
}

impl MovieSearchService {
    pub fn new(source: Arc<dyn MovieSource>, min_query_length: usize) -> Self {
        Self {
            source,
            min_query_length,
            state: Arc::new(Mutex::new(SearchState::default())),
            in_flight: None,
        }
    }

    pub fn state(&self) -> SearchState {
        lock_state(&self.state).clone()
    }

    pub fn min_query_length(&self) -> usize {
        self.min_query_length
    }

    pub fn search(&mut self, query: &str) {
        // Cancel first: the old task re-checks its token under the state lock.
        self.cancel();

        if query.chars().count() < self.min_query_length {
            debug!("Query {:?} below {} characters, clearing results", query, self.min_query_length);
            let mut state = lock_state(&self.state);
            state.query = query.to_string();
            state.movies.clear();
            state.error = None;
            state.is_loading = false;
            return;
        }

        let token = CancelToken::new();
        {
            let mut state = lock_state(&self.state);
            state.query = query.to_string();
            state.error = None;
            state.is_loading = true;
        }

        debug!("Starting search for {:?}", query);
        let handle = tokio::spawn(run_search(
            Arc::clone(&self.source),
            query.to_string(),
            token.clone(),
            Arc::clone(&self.state),
        ));
        self.in_flight = Some(InFlight { token, handle });
    }

    /// Abort the in-flight request, if any. The loading flag is cleared.
    pub fn cancel(&mut self) {
        if let Some(in_flight) = self.in_flight.take() {
            in_flight.token.cancel();
            lock_state(&self.state).is_loading = false;
        }
    }

    /// Wait for the in-flight request to finish or observe its cancellation.
    pub async fn settle(&mut self) {
        if let Some(in_flight) = self.in_flight.take() {
            if let Err(e) = in_flight.handle.await {
                warn!("Search task failed: {}", e);
            }
        }
    }
}

impl Drop for MovieSearchService {
    fn drop(&mut self) {
        if let Some(in_flight) = self.in_flight.take() {
            in_flight.token.cancel();
        }
    }
}

async fn run_search(
    source: Arc<dyn MovieSource>,
    query: String,
    token: CancelToken,
    state: Arc<Mutex<SearchState>>,
) {
    let outcome = tokio::select! {
        biased;
        _ = token.cancelled() => {
            debug!("Search for {:?} cancelled", query);
            return;
        }
        outcome = source.search(&query) => outcome,
    };

    let mut state = lock_state(&state);
    if token.is_cancelled() {
        debug!("Discarding stale result for {:?}", query);
        return;
    }

    state.is_loading = false;
    match outcome {
        Ok(movies) => {
            debug!("Search for {:?} returned {} movies", query, movies.len());
            state.movies = movies;
            state.error = None;
        }
        Err(e) if e.is_not_found() => {
            debug!("No movies for {:?}: {}", query, e);
            state.movies.clear();
            state.error = Some(NOT_FOUND_MESSAGE.to_string());
        }
        Err(e) => {
            warn!("Search for {:?} failed via {}: {}", query, source.source_name(), e);
            state.movies.clear();
            state.error = Some(SEARCH_ERROR_MESSAGE.to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{movie, wait_for_calls, ScriptedSource};
    use popcorn_sources::SourceError;

    fn service(source: &Arc<ScriptedSource>) -> MovieSearchService {
        MovieSearchService::new(source.clone(), 3)
    }

    #[tokio::test]
    async fn test_short_query_skips_network() {
        let source = Arc::new(ScriptedSource::default());
        let mut search = service(&source);

        for query in ["", "a", "ab"] {
            search.search(query);
            search.settle().await;
            let state = search.state();
            assert!(state.movies.is_empty());
            assert_eq!(state.error, None);
            assert!(!state.is_loading);
            assert_eq!(state.query, query);
        }

        assert!(source.calls().is_empty());
    }

    #[tokio::test]
    async fn test_short_query_clears_previous_results() {
        let source = Arc::new(ScriptedSource::default());
        source.reply_search("matrix", Ok(vec![movie("tt0133093", "The Matrix")]));
        let mut search = service(&source);

        search.search("matrix");
        search.settle().await;
        assert_eq!(search.state().result_count(), 1);

        search.search("ma");
        assert_eq!(search.state().result_count(), 0);
        assert_eq!(source.calls(), vec!["s:matrix"]);
    }

    #[tokio::test]
    async fn test_short_query_while_search_in_flight() {
        let source = Arc::new(ScriptedSource::default());
        let gate = source.gate_search("matrix");
        let mut search = service(&source);

        search.search("matrix");
        wait_for_calls(&source, 1).await;
        search.search("ma");

        let _ = gate.send(Ok(vec![movie("tt0133093", "The Matrix")]));
        tokio::task::yield_now().await;
        search.settle().await;

        let state = search.state();
        assert_eq!(state.query, "ma");
        assert!(state.movies.is_empty());
        assert!(!state.is_loading);
        assert_eq!(state.error, None);
    }

    #[tokio::test]
    async fn test_successful_search() {
        let source = Arc::new(ScriptedSource::default());
        let gate = source.gate_search("inception");
        let mut search = service(&source);

        search.search("inception");
        assert!(search.state().is_loading);

        gate.send(Ok(vec![movie("tt1375666", "Inception")])).unwrap();
        search.settle().await;

        let state = search.state();
        assert!(!state.is_loading);
        assert_eq!(state.error, None);
        assert_eq!(state.movies, vec![movie("tt1375666", "Inception")]);
    }

    #[tokio::test]
    async fn test_negative_response_is_not_found() {
        let source = Arc::new(ScriptedSource::default());
        source.reply_search("qwerty", Err(SourceError::NotFound("Movie not found!".to_string())));
        let mut search = service(&source);

        search.search("qwerty");
        search.settle().await;

        let state = search.state();
        assert_eq!(state.error.as_deref(), Some(NOT_FOUND_MESSAGE));
        assert!(state.movies.is_empty());
        assert!(!state.is_loading);
    }

    #[tokio::test]
    async fn test_transport_failure_sets_generic_error() {
        let source = Arc::new(ScriptedSource::default());
        source.reply_search("matrix", Ok(vec![movie("tt0133093", "The Matrix")]));
        source.reply_search(
            "matrix reloaded",
            Err(SourceError::Status(reqwest::StatusCode::INTERNAL_SERVER_ERROR)),
        );
        let mut search = service(&source);

        search.search("matrix");
        search.settle().await;
        search.search("matrix reloaded");
        search.settle().await;

        let state = search.state();
        assert_eq!(state.error.as_deref(), Some(SEARCH_ERROR_MESSAGE));
        assert!(state.movies.is_empty());
    }

    #[tokio::test]
    async fn test_stale_response_is_discarded() {
        let source = Arc::new(ScriptedSource::default());
        let gate_a = source.gate_search("star");
        let gate_b = source.gate_search("star wars");
        let mut search = service(&source);

        search.search("star");
        wait_for_calls(&source, 1).await;
        search.search("star wars");
        wait_for_calls(&source, 2).await;

        // B resolves first, A afterwards
        gate_b.send(Ok(vec![movie("tt0076759", "Star Wars")])).unwrap();
        search.settle().await;
        let _ = gate_a.send(Ok(vec![movie("tt0000001", "Star")]));
        tokio::task::yield_now().await;

        let state = search.state();
        assert_eq!(state.query, "star wars");
        assert_eq!(state.movies, vec![movie("tt0076759", "Star Wars")]);
        assert_eq!(state.error, None);
        assert!(!state.is_loading);
        assert_eq!(source.calls(), vec!["s:star", "s:star wars"]);
    }

    #[tokio::test]
    async fn test_cancelled_request_does_not_reset_loading() {
        let source = Arc::new(ScriptedSource::default());
        let gate_a = source.gate_search("alien");
        let gate_b = source.gate_search("aliens");
        let mut search = service(&source);

        search.search("alien");
        wait_for_calls(&source, 1).await;
        search.search("aliens");
        wait_for_calls(&source, 2).await;

        // A would have failed, but it was superseded
        let _ = gate_a.send(Err(SourceError::NotFound("Movie not found!".to_string())));
        tokio::task::yield_now().await;
        tokio::task::yield_now().await;

        let state = search.state();
        assert!(state.is_loading);
        assert_eq!(state.error, None);

        gate_b.send(Ok(vec![movie("tt0090605", "Aliens")])).unwrap();
        search.settle().await;
        assert!(!search.state().is_loading);
        assert_eq!(search.state().result_count(), 1);
    }

    #[tokio::test]
    async fn test_cancel_stops_loading_without_result() {
        let source = Arc::new(ScriptedSource::default());
        let gate = source.gate_search("heat");
        let mut search = service(&source);

        search.search("heat");
        assert!(search.state().is_loading);
        search.cancel();
        assert!(!search.state().is_loading);

        let _ = gate.send(Ok(vec![movie("tt0113277", "Heat")]));
        tokio::task::yield_now().await;
        search.settle().await;
        assert!(search.state().movies.is_empty());
        assert!(!search.state().is_loading);
    }
}
