//! Catalog entities: artists, songs, and the final artist+songs pairing

use super::NormalizedKey;
use serde::{Deserialize, Serialize};

/// Maximum number of representative songs kept per artist
pub const MAX_TRACKS_PER_ARTIST: usize = 3;

/// Resolved performer identity from the catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artist {
    /// Catalog identifier (stable across lookups)
    pub id: String,
    /// Canonical display name as returned by the catalog
    pub name: String,
    /// Reference URL into the catalog, if the catalog provided one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl Artist {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            url: None,
        }
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Key derived from the canonical name, not from the text that found it
    pub fn key(&self) -> NormalizedKey {
        NormalizedKey::from_name(&self.name)
    }
}

/// A single track
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Song {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub title: String,
    /// Performer credit as the catalog spells it
    pub artist_name: String,
}

impl Song {
    pub fn new(title: impl Into<String>, artist_name: impl Into<String>) -> Self {
        Self {
            id: None,
            title: title.into(),
            artist_name: artist_name.into(),
        }
    }
}

/// Final output unit: one confirmed artist with up to three songs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtistWithSongs {
    pub artist: Artist,
    pub songs: Vec<Song>,
}

impl ArtistWithSongs {
    /// Pair an artist with songs, keeping at most [`MAX_TRACKS_PER_ARTIST`]
    pub fn new(artist: Artist, mut songs: Vec<Song>) -> Self {
        songs.truncate(MAX_TRACKS_PER_ARTIST);
        Self { artist, songs }
    }

    /// Identity of the pairing is the artist's catalog id
    pub fn id(&self) -> &str {
        &self.artist.id
    }
}
