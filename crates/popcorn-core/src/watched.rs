use popcorn_models::WatchedMovie;
use tracing::debug;

/// Session-local watched list. Insertion order is display order.
///
/// Uniqueness per identifier is the caller's job; `add` always appends.
#[derive(Debug, Clone, Default)]
pub struct WatchedListStore {
    movies: Vec<WatchedMovie>,
}

impl WatchedListStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, movie: WatchedMovie) {
        debug!("Adding {} to watched list", movie.imdb_id);
        self.movies.push(movie);
    }

    /// Remove the first entry with this identifier. Returns whether one was found.
    pub fn remove(&mut self, imdb_id: &str) -> bool {
        match self.movies.iter().position(|m| m.imdb_id == imdb_id) {
            Some(index) => {
                self.movies.remove(index);
                debug!("Removed {} from watched list", imdb_id);
                true
            }
            None => false,
        }
    }

    pub fn contains(&self, imdb_id: &str) -> bool {
        self.get(imdb_id).is_some()
    }

    pub fn get(&self, imdb_id: &str) -> Option<&WatchedMovie> {
        self.movies.iter().find(|m| m.imdb_id == imdb_id)
    }

    pub fn user_rating(&self, imdb_id: &str) -> Option<u8> {
        self.get(imdb_id).map(|m| m.user_rating)
    }

    pub fn iter(&self) -> impl Iterator<Item = &WatchedMovie> {
        self.movies.iter()
    }

    pub fn as_slice(&self) -> &[WatchedMovie] {
        &self.movies
    }

    pub fn len(&self) -> usize {
        self.movies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.movies.is_empty()
    }
}
