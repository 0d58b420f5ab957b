use async_trait::async_trait;
use popcorn_models::{Movie, MovieDetail};
use popcorn_sources::{MovieSource, SourceError};
use std::collections::HashMap;
use std::sync::Mutex;
use tokio::sync::oneshot;

type SearchReply = Result<Vec<Movie>, SourceError>;
type DetailReply = Result<MovieDetail, SourceError>;

/// In-memory source whose replies are released by the test, one per call.
#[derive(Default)]
pub struct ScriptedSource {
    searches: Mutex<HashMap<String, oneshot::Receiver<SearchReply>>>,
    details: Mutex<HashMap<String, oneshot::Receiver<DetailReply>>>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedSource {
    /// Hold the next search for `query` until the returned sender fires.
    pub fn gate_search(&self, query: &str) -> oneshot::Sender<SearchReply> {
        let (tx, rx) = oneshot::channel();
        self.searches.lock().unwrap().insert(query.to_string(), rx);
        tx
    }

    pub fn reply_search(&self, query: &str, reply: SearchReply) {
        let _ = self.gate_search(query).send(reply);
    }

    pub fn gate_details(&self, imdb_id: &str) -> oneshot::Sender<DetailReply> {
        let (tx, rx) = oneshot::channel();
        self.details.lock().unwrap().insert(imdb_id.to_string(), rx);
        tx
    }

    pub fn reply_details(&self, imdb_id: &str, reply: DetailReply) {
        let _ = self.gate_details(imdb_id).send(reply);
    }

    /// Every request seen so far, as `s:<query>` or `i:<id>`.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl MovieSource for ScriptedSource {
    fn source_name(&self) -> &str {
        "scripted"
    }

    async fn search(&self, query: &str) -> Result<Vec<Movie>, SourceError> {
        self.calls.lock().unwrap().push(format!("s:{}", query));
        let rx = self.searches.lock().unwrap().remove(query);
        match rx {
            Some(rx) => rx.await.unwrap_or_else(|_| Err(SourceError::Decode("reply dropped".to_string()))),
            None => Err(SourceError::Decode(format!("unscripted search {:?}", query))),
        }
    }

    async fn details(&self, imdb_id: &str) -> Result<MovieDetail, SourceError> {
        self.calls.lock().unwrap().push(format!("i:{}", imdb_id));
        let rx = self.details.lock().unwrap().remove(imdb_id);
        match rx {
            Some(rx) => rx.await.unwrap_or_else(|_| Err(SourceError::Decode("reply dropped".to_string()))),
            None => Err(SourceError::Decode(format!("unscripted details {:?}", imdb_id))),
        }
    }
}

pub fn movie(imdb_id: &str, title: &str) -> Movie {
    Movie {
        imdb_id: imdb_id.to_string(),
        title: title.to_string(),
        year: "2010".to_string(),
        poster: "N/A".to_string(),
    }
}

pub fn detail(imdb_id: &str, title: &str, imdb_rating: f64, runtime: u32) -> MovieDetail {
    MovieDetail {
        imdb_id: imdb_id.to_string(),
        title: title.to_string(),
        year: "2010".to_string(),
        poster: "N/A".to_string(),
        runtime,
        imdb_rating,
        plot: "A plot.".to_string(),
        released: "16 Jul 2010".to_string(),
        released_on: None,
        actors: "Someone".to_string(),
        director: "Someone Else".to_string(),
        genre: "Drama".to_string(),
    }
}

/// Yield until the source has seen `count` requests.
pub async fn wait_for_calls(source: &ScriptedSource, count: usize) {
    for _ in 0..100 {
        if source.calls().len() >= count {
            return;
        }
        tokio::task::yield_now().await;
    }
    panic!("expected {} calls, saw {:?}", count, source.calls());
}
