use popcorn_models::WatchedMovie;
use serde::Serialize;
use std::fmt;

/// Averages over the watched list.
///
/// An empty list averages to `0.0` everywhere so the summary is always
/// renderable. Ratings are rounded to 2 decimals and runtime to 1.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WatchedSummary {
    pub count: usize,
    pub avg_imdb_rating: f64,
    pub avg_user_rating: f64,
    pub avg_runtime: f64,
}

pub fn summarize(watched: &[WatchedMovie]) -> WatchedSummary {
    WatchedSummary {
        count: watched.len(),
        avg_imdb_rating: round_to(average(watched.iter().map(|m| m.imdb_rating)), 2),
        avg_user_rating: round_to(average(watched.iter().map(|m| f64::from(m.user_rating))), 2),
        avg_runtime: round_to(average(watched.iter().map(|m| f64::from(m.runtime))), 1),
    }
}

fn average(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, count) = values.fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

impl fmt::Display for WatchedSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} movies | imdb {:.2} | you {:.2} | {:.1} min",
            self.count, self.avg_imdb_rating, self.avg_user_rating, self.avg_runtime
        )
    }
}
