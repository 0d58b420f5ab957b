pub mod detail;
pub mod movie;
pub mod state;
pub mod watched;

pub use detail::{parse_imdb_rating, parse_released, parse_runtime_minutes, MovieDetail};
pub use movie::Movie;
pub use state::{DetailState, SearchState};
pub use watched::WatchedMovie;
