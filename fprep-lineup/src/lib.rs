//! fprep-lineup library interface
//!
//! Extracts probable performer names from noisy poster text, resolves them
//! against a music catalog, and fetches representative songs per performer.

pub mod catalog;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod services;

pub use crate::config::LineupConfig;
pub use crate::error::{ScanError, ScanResult};
pub use crate::models::{Artist, ArtistWithSongs, ExtractionReport, NormalizedKey, Song};
pub use crate::services::LineupExtractor;

use crate::catalog::{HttpCatalogClient, TokenAuthorizer};
use std::sync::Arc;

/// Build an extractor backed by the HTTP catalog client
pub fn build_http_extractor(config: &LineupConfig) -> ScanResult<LineupExtractor> {
    config.validate()?;
    let catalog = Arc::new(HttpCatalogClient::new(config)?);
    let authorizer = Arc::new(TokenAuthorizer::new(config.developer_token.as_deref()));
    Ok(LineupExtractor::new(catalog, authorizer, config))
}
