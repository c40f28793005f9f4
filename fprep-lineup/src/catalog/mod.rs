//! External music catalog interface
//!
//! The extraction pipeline talks to the catalog only through [`CatalogApi`],
//! so the HTTP client can be swapped for an in-memory catalog in tests.

pub mod authorization;
pub mod http_client;

pub use authorization::{
    AuthorizationPolicy, AuthorizationStatus, CatalogAuthorizer, TokenAuthorizer,
};
pub use http_client::HttpCatalogClient;

use crate::models::{Artist, Song};
use thiserror::Error;

/// Maximum artist results requested per candidate
pub const ARTIST_SEARCH_LIMIT: usize = 5;

/// Maximum song results requested by the fallback track search
pub const SONG_SEARCH_LIMIT: usize = 10;

/// Catalog client errors
///
/// Every variant is a transient lookup failure from the pipeline's point of view.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CatalogError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Rate limit exceeded")]
    RateLimited,

    #[error("Catalog access not authorized (HTTP {0})")]
    Unauthorized(u16),

    #[error("API error {0}: {1}")]
    Api(u16, String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Request timed out after {0} ms")]
    Timeout(u64),
}

/// Catalog search and lookup operations
#[async_trait::async_trait]
pub trait CatalogApi: Send + Sync {
    /// Search artists by free text, in the catalog's relevance order
    async fn search_artists(&self, term: &str, limit: usize) -> Result<Vec<Artist>, CatalogError>;

    /// Fetch an artist's curated top songs
    ///
    /// `Ok(None)` means the artist record was not found; `Ok(Some(vec![]))`
    /// means the record exists but carries no top songs.
    async fn artist_top_songs(&self, artist_id: &str) -> Result<Option<Vec<Song>>, CatalogError>;

    /// Search songs by free text, in the catalog's relevance order
    async fn search_songs(&self, term: &str, limit: usize) -> Result<Vec<Song>, CatalogError>;
}
