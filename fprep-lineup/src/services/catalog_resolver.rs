//! Catalog Resolver
//!
//! Resolves one candidate string to at most one catalog artist. The catalog's
//! relevance order is trusted: the first equivalent result wins.

use crate::catalog::{CatalogApi, CatalogError, ARTIST_SEARCH_LIMIT};
use crate::models::normalized_key::ZERO_WIDTH_SPACE;
use crate::models::{Artist, NormalizedKey};
use crate::services::name_policy::NamePolicy;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Outcome of resolving one candidate
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupOutcome {
    /// An equivalent artist was found
    Matched(Artist),
    /// The call succeeded but nothing was equivalent
    NotFound,
    /// The call failed (network, rate limit, malformed response, timeout)
    Failed(String),
}

impl LookupOutcome {
    /// Collapse to the default "matched or not" view
    pub fn into_artist(self) -> Option<Artist> {
        match self {
            LookupOutcome::Matched(artist) => Some(artist),
            LookupOutcome::NotFound | LookupOutcome::Failed(_) => None,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, LookupOutcome::Failed(_))
    }
}

/// Trim and strip zero-width spaces from OCR text
pub fn clean_candidate(candidate: &str) -> String {
    candidate.replace(ZERO_WIDTH_SPACE, "").trim().to_string()
}

/// Pick the first result equivalent to the candidate key, in result order
pub fn select_match(candidate_key: &NormalizedKey, results: Vec<Artist>, policy: &NamePolicy) -> Option<Artist> {
    results
        .into_iter()
        .find(|artist| policy.equivalent(&artist.key(), candidate_key))
}

/// Wraps the catalog artist search with cleaning, equivalence, and a deadline
#[derive(Clone)]
pub struct CatalogResolver {
    catalog: Arc<dyn CatalogApi>,
    policy: NamePolicy,
    timeout: Duration,
}

impl CatalogResolver {
    pub fn new(catalog: Arc<dyn CatalogApi>, policy: NamePolicy, timeout: Duration) -> Self {
        Self {
            catalog,
            policy,
            timeout,
        }
    }

    /// Resolve a candidate string
    ///
    /// Never errors: failures are reported as [`LookupOutcome::Failed`].
    pub async fn resolve(&self, candidate: &str) -> LookupOutcome {
        let cleaned = clean_candidate(candidate);
        let key = NormalizedKey::from_name(&cleaned);
        if key.is_empty() {
            return LookupOutcome::NotFound;
        }

        debug!(candidate = %cleaned, "Searching catalog for artist");

        let search = self.catalog.search_artists(&cleaned, ARTIST_SEARCH_LIMIT);
        let result = match tokio::time::timeout(self.timeout, search).await {
            Ok(result) => result,
            Err(_) => Err(CatalogError::Timeout(self.timeout.as_millis() as u64)),
        };

        match result {
            Ok(results) => {
                debug!(
                    candidate = %cleaned,
                    results = ?results.iter().map(|a| a.name.as_str()).collect::<Vec<_>>(),
                    "Catalog search results"
                );
                match select_match(&key, results, &self.policy) {
                    Some(artist) => LookupOutcome::Matched(artist),
                    None => LookupOutcome::NotFound,
                }
            }
            Err(e) => {
                warn!(candidate = %cleaned, error = %e, "Artist search failed");
                LookupOutcome::Failed(e.to_string())
            }
        }
    }
}
