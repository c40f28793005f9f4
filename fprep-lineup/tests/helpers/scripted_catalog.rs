//! Scripted in-memory catalog
//!
//! Artist search matches the exact term; everything unscripted returns an
//! empty result. Every call is recorded so tests can assert on lookup order.

use fprep_lineup::catalog::{CatalogApi, CatalogError};
use fprep_lineup::{Artist, Song};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Catalog id used for a scripted artist name
pub fn artist_id(name: &str) -> String {
    format!("id-{}", name.to_lowercase().replace(' ', "-"))
}

pub fn artist(name: &str) -> Artist {
    Artist::new(artist_id(name), name)
}

#[derive(Default)]
pub struct ScriptedCatalog {
    artist_results: HashMap<String, Result<Vec<Artist>, CatalogError>>,
    top_songs: HashMap<String, Result<Option<Vec<Song>>, CatalogError>>,
    song_results: HashMap<String, Result<Vec<Song>, CatalogError>>,
    detail_delays: HashMap<String, Duration>,
    song_delays: HashMap<String, Duration>,
    cancel_after: Option<(usize, CancellationToken)>,
    artist_calls: Mutex<Vec<String>>,
    detail_calls: Mutex<Vec<String>>,
    song_calls: Mutex<Vec<(String, usize)>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl ScriptedCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// `term` returns artists with these names, in this order
    pub fn artist(mut self, term: &str, names: &[&str]) -> Self {
        let artists = names.iter().map(|name| artist(name)).collect();
        self.artist_results.insert(term.to_string(), Ok(artists));
        self
    }

    /// Each term returns the single artist of the same name
    pub fn artists(mut self, terms: &[&str]) -> Self {
        for term in terms {
            self = self.artist(term, &[term]);
        }
        self
    }

    pub fn failing_artist(mut self, term: &str) -> Self {
        self.artist_results
            .insert(term.to_string(), Err(CatalogError::Network("connection reset".to_string())));
        self
    }

    /// Artist detail record with these top song titles
    pub fn top_songs(mut self, name: &str, titles: &[&str]) -> Self {
        let songs = titles.iter().map(|title| Song::new(*title, name)).collect();
        self.top_songs.insert(artist_id(name), Ok(Some(songs)));
        self
    }

    /// Artist detail record exists but has no top songs
    pub fn empty_top_songs(mut self, name: &str) -> Self {
        self.top_songs.insert(artist_id(name), Ok(Some(Vec::new())));
        self
    }

    pub fn failing_detail(mut self, name: &str) -> Self {
        self.top_songs.insert(artist_id(name), Err(CatalogError::RateLimited));
        self
    }

    /// Song search for `term` returns `(title, performer)` pairs in order
    pub fn song_search(mut self, term: &str, songs: &[(&str, &str)]) -> Self {
        let songs = songs
            .iter()
            .map(|(title, performer)| Song::new(*title, *performer))
            .collect();
        self.song_results.insert(term.to_string(), Ok(songs));
        self
    }

    pub fn failing_song_search(mut self, term: &str) -> Self {
        self.song_results
            .insert(term.to_string(), Err(CatalogError::Api(500, "internal".to_string())));
        self
    }

    /// Delay the detail call for an artist
    pub fn detail_delay(mut self, name: &str, delay: Duration) -> Self {
        self.detail_delays.insert(artist_id(name), delay);
        self
    }

    /// Delay the song search for a term
    pub fn song_delay(mut self, term: &str, delay: Duration) -> Self {
        self.song_delays.insert(term.to_string(), delay);
        self
    }

    /// Cancel `token` while serving the `calls`-th artist search
    pub fn cancel_after(mut self, calls: usize, token: CancellationToken) -> Self {
        self.cancel_after = Some((calls, token));
        self
    }

    pub fn artist_calls(&self) -> Vec<String> {
        self.artist_calls.lock().unwrap().clone()
    }

    pub fn detail_calls(&self) -> Vec<String> {
        self.detail_calls.lock().unwrap().clone()
    }

    pub fn song_calls(&self) -> Vec<(String, usize)> {
        self.song_calls.lock().unwrap().clone()
    }

    /// Highest number of detail calls observed in flight at once
    pub fn max_concurrent_details(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl CatalogApi for ScriptedCatalog {
    async fn search_artists(&self, term: &str, _limit: usize) -> Result<Vec<Artist>, CatalogError> {
        let calls = {
            let mut calls = self.artist_calls.lock().unwrap();
            calls.push(term.to_string());
            calls.len()
        };
        if let Some((after, token)) = &self.cancel_after {
            if calls >= *after {
                token.cancel();
            }
        }
        self.artist_results.get(term).cloned().unwrap_or(Ok(Vec::new()))
    }

    async fn artist_top_songs(&self, artist_id: &str) -> Result<Option<Vec<Song>>, CatalogError> {
        self.detail_calls.lock().unwrap().push(artist_id.to_string());

        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        let delay = self
            .detail_delays
            .get(artist_id)
            .copied()
            .unwrap_or(Duration::from_millis(5));
        tokio::time::sleep(delay).await;

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        self.top_songs.get(artist_id).cloned().unwrap_or(Ok(None))
    }

    async fn search_songs(&self, term: &str, limit: usize) -> Result<Vec<Song>, CatalogError> {
        self.song_calls.lock().unwrap().push((term.to_string(), limit));
        if let Some(delay) = self.song_delays.get(term) {
            tokio::time::sleep(*delay).await;
        }
        self.song_results.get(term).cloned().unwrap_or(Ok(Vec::new()))
    }
}
