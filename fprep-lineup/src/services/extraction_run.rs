//! Extraction run orchestration
//!
//! # Phases
//! raw text → Line Filter → Candidate Matcher (sequential lookups, one fresh
//! ledger per run) → Track Fetcher (bounded concurrency, order preserved)
//!
//! Authorization is checked before any catalog call. Under the advisory
//! policy a denial is logged and the run proceeds; under the enforce policy
//! the run stops with [`ScanError::AuthorizationDenied`].

use crate::catalog::authorization::ensure_access;
use crate::catalog::{AuthorizationPolicy, CatalogApi, CatalogAuthorizer};
use crate::config::LineupConfig;
use crate::error::{ScanError, ScanResult};
use crate::models::{ExtractionReport, RunStats};
use crate::services::candidate_matcher::{CandidateMatcher, MatchOutput};
use crate::services::catalog_resolver::CatalogResolver;
use crate::services::dedup_ledger::DedupLedger;
use crate::services::line_filter::{count_nonempty_lines, LineFilter};
use crate::services::track_fetcher::TrackFetcher;
use chrono::Utc;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn, Instrument};
use uuid::Uuid;

/// Runs extraction passes against one catalog
///
/// Holds no per-run state: every call to [`LineupExtractor::run`] builds its
/// own ledger, so repeated or concurrent runs are isolated.
pub struct LineupExtractor {
    authorizer: Arc<dyn CatalogAuthorizer>,
    line_filter: LineFilter,
    resolver: CatalogResolver,
    track_fetcher: TrackFetcher,
    authorization_policy: AuthorizationPolicy,
    max_lookup_retries: u32,
    track_fetch_concurrency: usize,
}

impl LineupExtractor {
    pub fn new(
        catalog: Arc<dyn CatalogApi>,
        authorizer: Arc<dyn CatalogAuthorizer>,
        config: &LineupConfig,
    ) -> Self {
        Self {
            authorizer,
            line_filter: LineFilter::from_config(config),
            resolver: CatalogResolver::new(catalog.clone(), config.name_policy, config.lookup_timeout()),
            track_fetcher: TrackFetcher::new(catalog, config.lookup_timeout()),
            authorization_policy: config.authorization_policy,
            max_lookup_retries: config.max_lookup_retries,
            track_fetch_concurrency: config.track_fetch_concurrency,
        }
    }

    pub fn line_filter(&self) -> &LineFilter {
        &self.line_filter
    }

    /// Check catalog access according to the configured policy
    pub async fn authorize(&self) -> ScanResult<()> {
        let status = ensure_access(self.authorizer.as_ref()).await;
        if status.is_authorized() {
            return Ok(());
        }
        match self.authorization_policy {
            AuthorizationPolicy::Enforce => Err(ScanError::AuthorizationDenied(status)),
            AuthorizationPolicy::Advisory => {
                warn!(status = %status, "Catalog access not granted, proceeding anyway");
                Ok(())
            }
        }
    }

    /// Filter and match only: confirmed artists without tracks
    pub async fn extract_artists(
        &self,
        text: &str,
        stats: &mut RunStats,
        cancel: &CancellationToken,
    ) -> MatchOutput {
        let lines = self.line_filter.filter(text);
        stats.lines_total = count_nonempty_lines(text);
        stats.lines_kept = lines.len();
        info!(
            lines_total = stats.lines_total,
            lines_kept = stats.lines_kept,
            "Filtered input lines"
        );

        let mut ledger = DedupLedger::new();
        CandidateMatcher::new(&self.resolver, self.max_lookup_retries)
            .match_lines(&lines, &mut ledger, stats, cancel)
            .await
    }

    /// Full run: authorize, match, fetch songs
    pub async fn run(&self, text: &str, cancel: &CancellationToken) -> ScanResult<ExtractionReport> {
        let run_id = Uuid::new_v4();
        let span = tracing::info_span!("extraction_run", run_id = %run_id);
        self.run_inner(run_id, text, cancel).instrument(span).await
    }

    async fn run_inner(
        &self,
        run_id: Uuid,
        text: &str,
        cancel: &CancellationToken,
    ) -> ScanResult<ExtractionReport> {
        let started_at = Utc::now();
        info!("Starting extraction run");

        self.authorize().await?;

        let mut stats = RunStats::default();
        let matched = self.extract_artists(text, &mut stats, cancel).await;
        let artists = matched.artists();

        let results = self
            .track_fetcher
            .fetch_all(&artists, self.track_fetch_concurrency, cancel)
            .await;

        let report = ExtractionReport {
            run_id,
            started_at,
            finished_at: Utc::now(),
            artists,
            results,
            stats,
            cancelled: matched.cancelled || cancel.is_cancelled(),
        };

        info!(
            artists = report.artists.len(),
            lookups = report.stats.lookups,
            failed = report.stats.failed,
            cancelled = report.cancelled,
            duration_ms = report.duration_ms(),
            "Extraction run complete"
        );

        Ok(report)
    }
}
