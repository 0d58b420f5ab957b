pub mod cancel;
pub mod controller;
pub mod detail;
pub mod search;
pub mod summary;
pub mod watched;

#[cfg(test)]
pub(crate) mod testing;

pub use cancel::CancelToken;
pub use controller::{ControllerError, Selection, ViewController, DEFAULT_TITLE};
pub use detail::{MovieDetailService, DETAIL_ERROR_MESSAGE};
pub use search::{MovieSearchService, NOT_FOUND_MESSAGE, SEARCH_ERROR_MESSAGE};
pub use summary::{summarize, WatchedSummary};
pub use watched::WatchedListStore;

use std::sync::{Mutex, MutexGuard};

/// Lock shared view state, recovering the data if a task panicked mid-update.
pub(crate) fn lock_state<T>(state: &Mutex<T>) -> MutexGuard<'_, T> {
    state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
