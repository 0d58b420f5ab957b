use crate::error::SourceError;
use popcorn_models::{parse_imdb_rating, parse_released, parse_runtime_minutes, Movie, MovieDetail};
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};

/// Message used when the provider rejects a search without an error text.
pub const NOT_FOUND_MESSAGE: &str = "Movie not found";

#[derive(Debug, Deserialize)]
struct OmdbSearchItem {
    #[serde(rename = "Title")]
    title: String,
    #[serde(rename = "Year", default)]
    year: String,
    #[serde(rename = "imdbID")]
    imdb_id: String,
    #[serde(rename = "Poster", default)]
    poster: String,
}

#[derive(Debug, Deserialize)]
struct OmdbSearchResponse {
    #[serde(rename = "Response")]
    response: String,
    #[serde(rename = "Search", default)]
    search: Vec<OmdbSearchItem>,
    #[serde(rename = "Error")]
    error: Option<String>,
}

// Every field is optional; OMDb omits fields freely and uses "N/A" for unknowns.
#[derive(Debug, Deserialize)]
struct OmdbDetailResponse {
    #[serde(rename = "Response")]
    response: String,
    #[serde(rename = "Error")]
    error: Option<String>,
    #[serde(rename = "imdbID", default)]
    imdb_id: Option<String>,
    #[serde(rename = "Title", default)]
    title: Option<String>,
    #[serde(rename = "Year", default)]
    year: Option<String>,
    #[serde(rename = "Poster", default)]
    poster: Option<String>,
    #[serde(rename = "Runtime", default)]
    runtime: Option<String>,
    #[serde(rename = "imdbRating", default)]
    imdb_rating: Option<String>,
    #[serde(rename = "Plot", default)]
    plot: Option<String>,
    #[serde(rename = "Released", default)]
    released: Option<String>,
    #[serde(rename = "Actors", default)]
    actors: Option<String>,
    #[serde(rename = "Director", default)]
    director: Option<String>,
    #[serde(rename = "Genre", default)]
    genre: Option<String>,
}

fn is_positive(flag: &str) -> bool {
    flag.eq_ignore_ascii_case("true")
}

/// Decode a search body into result rows.
pub fn parse_search_response(body: &str) -> Result<Vec<Movie>, SourceError> {
    let parsed: OmdbSearchResponse =
        serde_json::from_str(body).map_err(|e| SourceError::Decode(e.to_string()))?;

    if !is_positive(&parsed.response) {
        let reason = parsed.error.unwrap_or_else(|| NOT_FOUND_MESSAGE.to_string());
        return Err(SourceError::NotFound(reason));
    }

    Ok(parsed
        .search
        .into_iter()
        .map(|item| Movie {
            imdb_id: item.imdb_id,
            title: item.title,
            year: item.year,
            poster: item.poster,
        })
        .collect())
}

/// Decode a detail body. `requested_id` fills in a missing `imdbID`.
pub fn parse_detail_response(body: &str, requested_id: &str) -> Result<MovieDetail, SourceError> {
    let parsed: OmdbDetailResponse =
        serde_json::from_str(body).map_err(|e| SourceError::Decode(e.to_string()))?;

    if !is_positive(&parsed.response) {
        let reason = parsed.error.unwrap_or_else(|| NOT_FOUND_MESSAGE.to_string());
        return Err(SourceError::NotFound(reason));
    }

    let runtime_raw = parsed.runtime.unwrap_or_default();
    let runtime = parse_runtime_minutes(&runtime_raw);
    if runtime == 0 && !runtime_raw.is_empty() {
        debug!("Unparsable runtime {:?} for {}, using 0", runtime_raw, requested_id);
    }

    let released = parsed.released.unwrap_or_default();
    Ok(MovieDetail {
        imdb_id: parsed.imdb_id.unwrap_or_else(|| requested_id.to_string()),
        title: parsed.title.unwrap_or_default(),
        year: parsed.year.unwrap_or_default(),
        poster: parsed.poster.unwrap_or_default(),
        runtime,
        imdb_rating: parse_imdb_rating(parsed.imdb_rating.as_deref().unwrap_or_default()),
        plot: parsed.plot.unwrap_or_default(),
        released_on: parse_released(&released),
        released,
        actors: parsed.actors.unwrap_or_default(),
        director: parsed.director.unwrap_or_default(),
        genre: parsed.genre.unwrap_or_default(),
    })
}

async fn fetch_body(client: &Client, base_url: &str, params: &[(&str, &str)]) -> Result<String, SourceError> {
    let response = client.get(base_url).query(params).send().await?;

    if !response.status().is_success() {
        let status = response.status();
        warn!("OMDb request failed with status {}", status);
        return Err(SourceError::Status(status));
    }

    Ok(response.text().await?)
}

/// `GET {base_url}?apikey=..&s=..`
pub async fn search_movies(
    client: &Client,
    base_url: &str,
    api_key: &str,
    query: &str,
) -> Result<Vec<Movie>, SourceError> {
    debug!("Searching OMDb for {:?}", query);
    let body = fetch_body(client, base_url, &[("apikey", api_key), ("s", query)]).await?;
    let movies = parse_search_response(&body)?;
    debug!("OMDb returned {} results for {:?}", movies.len(), query);
    Ok(movies)
}

/// `GET {base_url}?apikey=..&i=..`
pub async fn get_movie_details(
    client: &Client,
    base_url: &str,
    api_key: &str,
    imdb_id: &str,
) -> Result<MovieDetail, SourceError> {
    debug!("Fetching OMDb details for {}", imdb_id);
    let body = fetch_body(client, base_url, &[("apikey", api_key), ("i", imdb_id)]).await?;
    parse_detail_response(&body, imdb_id)
}
