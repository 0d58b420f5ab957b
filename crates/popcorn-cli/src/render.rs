use comfy_table::{Attribute, Cell, Color, Table};
use owo_colors::OwoColorize;
use popcorn_core::WatchedSummary;
use popcorn_models::{MovieDetail, Movie, WatchedMovie};

fn styled_table(headers: &[&str]) -> Table {
    let mut table = Table::new();
    table.load_preset(comfy_table::presets::UTF8_FULL);
    table.apply_modifier(comfy_table::modifiers::UTF8_ROUND_CORNERS);
    table.set_header(
        headers
            .iter()
            .map(|h| Cell::new(h).add_attribute(Attribute::Bold))
            .collect::<Vec<_>>(),
    );
    table
}

pub fn results_table(movies: &[Movie]) -> Table {
    let mut table = styled_table(&["#", "Title", "Year", "IMDb ID"]);
    for (i, movie) in movies.iter().enumerate() {
        table.add_row(vec![
            Cell::new(i + 1),
            Cell::new(&movie.title).fg(Color::Cyan),
            Cell::new(&movie.year),
            Cell::new(&movie.imdb_id),
        ]);
    }
    table
}

pub fn watched_table(watched: &[WatchedMovie]) -> Table {
    let mut table = styled_table(&["#", "Title", "IMDb", "You", "Runtime", "IMDb ID"]);
    for (i, movie) in watched.iter().enumerate() {
        table.add_row(vec![
            Cell::new(i + 1),
            Cell::new(&movie.title).fg(Color::Cyan),
            Cell::new(format!("{:.1}", movie.imdb_rating)),
            Cell::new(movie.user_rating),
            Cell::new(format!("{} min", movie.runtime)),
            Cell::new(&movie.imdb_id),
        ]);
    }
    table
}

pub fn found_line(count: usize) -> String {
    format!("Found {} results", count.to_string().bold())
}

pub fn summary_line(summary: &WatchedSummary) -> String {
    format!(
        "#️⃣ {} movies  ⭐️ {:.2}  🌟 {:.2}  ⏳ {:.1} min",
        summary.count, summary.avg_imdb_rating, summary.avg_user_rating, summary.avg_runtime
    )
}

/// Detail view. `watched_rating` is the user's rating when already watched.
pub fn detail_block(detail: &MovieDetail, watched_rating: Option<u8>) -> String {
    let mut lines = vec![
        format!("{} ({})", detail.title.bold(), detail.year),
        format!("{} • {} min • {}", detail.released, detail.runtime, detail.genre),
        format!("⭐️ {} IMDb rating", detail.imdb_rating),
        String::new(),
        detail.plot.italic().to_string(),
        format!("Starring {}", detail.actors),
        format!("Directed by {}", detail.director),
        String::new(),
    ];

    match watched_rating {
        Some(rating) => lines.push(format!("You rated this movie {}", rating)),
        None => lines.push("Rate it with `add <1-10>`".dimmed().to_string()),
    }
    lines.join("\n")
}
