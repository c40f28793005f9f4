//! Data models for lineup extraction

pub mod artist;
pub mod extraction_report;
pub mod normalized_key;

pub use artist::{Artist, ArtistWithSongs, Song, MAX_TRACKS_PER_ARTIST};
pub use extraction_report::{ExtractionReport, RunStats};
pub use normalized_key::NormalizedKey;
