//! Track Fetcher
//!
//! Retrieves up to three representative songs per confirmed artist.
//!
//! # Sources
//! 1. Primary: the artist detail record's curated top songs, in returned order.
//! 2. Fallback (no detail record, empty/absent top songs, or failed detail
//!    call): a song search on the artist's display name, keeping only songs
//!    whose performer credit contains that name (case-insensitive).
//!
//! Finding nothing is a valid terminal state, not an error.

use crate::catalog::{CatalogApi, CatalogError, SONG_SEARCH_LIMIT};
use crate::models::{Artist, ArtistWithSongs, Song, MAX_TRACKS_PER_ARTIST};
use futures::stream::{self, StreamExt};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Which source produced an artist's songs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackSource {
    TopSongs,
    SearchFallback,
    None,
}

#[derive(Clone)]
pub struct TrackFetcher {
    catalog: Arc<dyn CatalogApi>,
    timeout: Duration,
}

impl TrackFetcher {
    pub fn new(catalog: Arc<dyn CatalogApi>, timeout: Duration) -> Self {
        Self { catalog, timeout }
    }

    async fn with_deadline<T>(
        &self,
        call: impl Future<Output = Result<T, CatalogError>>,
    ) -> Result<T, CatalogError> {
        match tokio::time::timeout(self.timeout, call).await {
            Ok(result) => result,
            Err(_) => Err(CatalogError::Timeout(self.timeout.as_millis() as u64)),
        }
    }

    /// Songs for one artist (at most three) and the source that produced them
    pub async fn fetch_songs(&self, artist: &Artist) -> (Vec<Song>, TrackSource) {
        match self.with_deadline(self.catalog.artist_top_songs(&artist.id)).await {
            Ok(Some(top)) if !top.is_empty() => {
                let songs: Vec<Song> = top.into_iter().take(MAX_TRACKS_PER_ARTIST).collect();
                debug!(
                    artist = %artist.name,
                    songs = ?songs.iter().map(|s| s.title.as_str()).collect::<Vec<_>>(),
                    "Top songs"
                );
                return (songs, TrackSource::TopSongs);
            }
            Ok(Some(_)) => debug!(artist = %artist.name, "No top songs, falling back to search"),
            Ok(None) => debug!(artist = %artist.name, "Artist record not found, falling back to search"),
            Err(e) => warn!(artist = %artist.name, error = %e, "Artist detail lookup failed, falling back to search"),
        }

        let results = match self
            .with_deadline(self.catalog.search_songs(&artist.name, SONG_SEARCH_LIMIT))
            .await
        {
            Ok(results) => results,
            Err(e) => {
                warn!(artist = %artist.name, error = %e, "Song search failed");
                return (Vec::new(), TrackSource::None);
            }
        };

        let songs = filter_by_performer(results, &artist.name);
        debug!(
            artist = %artist.name,
            songs = ?songs.iter().map(|s| s.title.as_str()).collect::<Vec<_>>(),
            "Search fallback songs"
        );

        if songs.is_empty() {
            (songs, TrackSource::None)
        } else {
            (songs, TrackSource::SearchFallback)
        }
    }

    /// Fetch songs for every artist, preserving input order
    ///
    /// Up to `concurrency` fetches run at once. After cancellation, remaining
    /// artists are paired with no songs.
    pub async fn fetch_all(
        &self,
        artists: &[Artist],
        concurrency: usize,
        cancel: &CancellationToken,
    ) -> Vec<ArtistWithSongs> {
        stream::iter(artists.iter().cloned())
            .map(|artist| async move {
                if cancel.is_cancelled() {
                    return ArtistWithSongs::new(artist, Vec::new());
                }
                let (songs, source) = self.fetch_songs(&artist).await;
                info!(artist = %artist.name, count = songs.len(), source = ?source, "Songs fetched");
                ArtistWithSongs::new(artist, songs)
            })
            .buffered(concurrency.max(1))
            .collect()
            .await
    }
}

/// Keep songs whose performer credit contains `artist_name`, first three in order
pub fn filter_by_performer(songs: Vec<Song>, artist_name: &str) -> Vec<Song> {
    let needle = artist_name.to_lowercase();
    songs
        .into_iter()
        .filter(|song| song.artist_name.to_lowercase().contains(&needle))
        .take(MAX_TRACKS_PER_ARTIST)
        .collect()
}
