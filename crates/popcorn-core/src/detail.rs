use crate::cancel::CancelToken;
use crate::lock_state;
use popcorn_models::DetailState;
use popcorn_sources::{MovieSource, SourceError};
use std::sync::{Arc, Mutex};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Shown when a detail request fails in transport.
pub const DETAIL_ERROR_MESSAGE: &str = "Could not load movie details";

struct InFlight {
    token: CancelToken,
    handle: JoinHandle<()>,
}

/// Loads the detail for the selected movie.
///
/// The previous detail stays in place while the next one loads. Selecting a
/// new identifier cancels the older fetch, so the detail that lands last always
/// belongs to the most recent selection.
pub struct MovieDetailService {
    source: Arc<dyn MovieSource>,
    state: Arc<Mutex<DetailState>>,
    in_flight: Option<InFlight>,
}

impl MovieDetailService {
    pub fn new(source: Arc<dyn MovieSource>) -> Self {
        Self {
            source,
            state: Arc::new(Mutex::new(DetailState::default())),
            in_flight: None,
        }
    }

    pub fn state(&self) -> DetailState {
        lock_state(&self.state).clone()
    }

    pub fn load(&mut self, imdb_id: &str) {
        self.abort();

        let token = CancelToken::new();
        {
            let mut state = lock_state(&self.state);
            state.selected_id = Some(imdb_id.to_string());
            state.is_loading = true;
            state.error = None;
        }

        debug!("Loading details for {}", imdb_id);
        let handle = tokio::spawn(run_details(
            Arc::clone(&self.source),
            imdb_id.to_string(),
            token.clone(),
            Arc::clone(&self.state),
        ));
        self.in_flight = Some(InFlight { token, handle });
    }

    /// Drop the detail and cancel any fetch.
    pub fn clear(&mut self) {
        self.abort();
        *lock_state(&self.state) = DetailState::default();
    }

    pub async fn settle(&mut self) {
        if let Some(in_flight) = self.in_flight.take() {
            if let Err(e) = in_flight.handle.await {
                warn!("Detail task failed: {}", e);
            }
        }
    }

    fn abort(&mut self) {
        if let Some(in_flight) = self.in_flight.take() {
            in_flight.token.cancel();
        }
    }
}

impl Drop for MovieDetailService {
    fn drop(&mut self) {
        self.abort();
    }
}

async fn run_details(
    source: Arc<dyn MovieSource>,
    imdb_id: String,
    token: CancelToken,
    state: Arc<Mutex<DetailState>>,
) {
    let outcome = tokio::select! {
        biased;
        _ = token.cancelled() => {
            debug!("Detail fetch for {} cancelled", imdb_id);
            return;
        }
        outcome = source.details(&imdb_id) => outcome,
    };

    let mut state = lock_state(&state);
    if token.is_cancelled() {
        return;
    }

    state.is_loading = false;
    match outcome {
        Ok(mut detail) => {
            // Keyed by the requested id; the provider may echo a different spelling.
            if detail.imdb_id != imdb_id {
                debug!("Provider answered {} with id {}", imdb_id, detail.imdb_id);
                detail.imdb_id = imdb_id.clone();
            }
            state.detail = Some(detail);
            state.error = None;
        }
        Err(SourceError::NotFound(reason)) => {
            debug!("No details for {}: {}", imdb_id, reason);
            state.error = Some(reason);
        }
        Err(e) => {
            warn!("Detail fetch for {} failed: {}", imdb_id, e);
            state.error = Some(DETAIL_ERROR_MESSAGE.to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{detail, wait_for_calls, ScriptedSource};

    #[tokio::test]
    async fn test_load_detail() {
        let source = Arc::new(ScriptedSource::default());
        let gate = source.gate_details("tt1375666");
        let mut service = MovieDetailService::new(source.clone());

        service.load("tt1375666");
        let state = service.state();
        assert!(state.is_loading);
        assert_eq!(state.selected_id.as_deref(), Some("tt1375666"));

        gate.send(Ok(detail("tt1375666", "Inception", 8.8, 148))).unwrap();
        service.settle().await;

        let state = service.state();
        assert!(!state.is_loading);
        assert_eq!(state.current().map(|d| d.title.as_str()), Some("Inception"));
    }

    #[tokio::test]
    async fn test_detail_keyed_by_requested_id() {
        let source = Arc::new(ScriptedSource::default());
        source.reply_details("TT1375666", Ok(detail("tt1375666", "Inception", 8.8, 148)));
        let mut service = MovieDetailService::new(source.clone());

        service.load("TT1375666");
        service.settle().await;

        let state = service.state();
        assert!(!state.is_loading);
        assert_eq!(state.error, None);
        assert_eq!(state.current().map(|d| d.imdb_id.as_str()), Some("TT1375666"));
        assert_eq!(state.current().map(|d| d.title.as_str()), Some("Inception"));
    }

    #[tokio::test]
    async fn test_previous_detail_kept_while_loading() {
        let source = Arc::new(ScriptedSource::default());
        source.reply_details("tt1375666", Ok(detail("tt1375666", "Inception", 8.8, 148)));
        let _gate = source.gate_details("tt0816692");
        let mut service = MovieDetailService::new(source.clone());

        service.load("tt1375666");
        service.settle().await;
        service.load("tt0816692");

        let state = service.state();
        assert!(state.is_loading);
        assert_eq!(state.detail.as_ref().map(|d| d.imdb_id.as_str()), Some("tt1375666"));
        assert!(state.current().is_none());
    }

    #[tokio::test]
    async fn test_last_selection_wins() {
        let source = Arc::new(ScriptedSource::default());
        let gate_x = source.gate_details("tt0000001");
        let gate_y = source.gate_details("tt0000002");
        let mut service = MovieDetailService::new(source.clone());

        service.load("tt0000001");
        wait_for_calls(&source, 1).await;
        service.load("tt0000002");
        wait_for_calls(&source, 2).await;

        gate_y.send(Ok(detail("tt0000002", "Y", 7.0, 100))).unwrap();
        service.settle().await;
        let _ = gate_x.send(Ok(detail("tt0000001", "X", 6.0, 90)));
        tokio::task::yield_now().await;

        let state = service.state();
        assert_eq!(state.current().map(|d| d.title.as_str()), Some("Y"));
    }

    #[tokio::test]
    async fn test_not_found_keeps_provider_message() {
        let source = Arc::new(ScriptedSource::default());
        source.reply_details("bogus", Err(SourceError::NotFound("Incorrect IMDb ID.".to_string())));
        let mut service = MovieDetailService::new(source.clone());

        service.load("bogus");
        service.settle().await;

        let state = service.state();
        assert_eq!(state.error.as_deref(), Some("Incorrect IMDb ID."));
        assert!(state.detail.is_none());
        assert!(!state.is_loading);
    }

    #[tokio::test]
    async fn test_transport_failure_sets_generic_error() {
        let source = Arc::new(ScriptedSource::default());
        source.reply_details(
            "tt1375666",
            Err(SourceError::Status(reqwest::StatusCode::BAD_GATEWAY)),
        );
        let mut service = MovieDetailService::new(source.clone());

        service.load("tt1375666");
        service.settle().await;
        assert_eq!(service.state().error.as_deref(), Some(DETAIL_ERROR_MESSAGE));
    }

    #[tokio::test]
    async fn test_clear_discards_pending_fetch() {
        let source = Arc::new(ScriptedSource::default());
        let gate = source.gate_details("tt1375666");
        let mut service = MovieDetailService::new(source.clone());

        service.load("tt1375666");
        service.clear();
        let _ = gate.send(Ok(detail("tt1375666", "Inception", 8.8, 148)));
        tokio::task::yield_now().await;

        assert_eq!(service.state(), DetailState::default());
    }
}
