//! Candidate Matcher
//!
//! Greedy, overlap-free, longest-span-first matching of content lines against
//! the catalog.
//!
//! # State Machine (per line)
//! - The cursor advances monotonically left to right.
//! - At each unclaimed position the matcher tries windows of
//!   `min(3, remaining)` words down to 1.
//! - The first accepted window is committed: its words are claimed and the
//!   cursor moves past it. No backtracking once committed.
//! - If no window is accepted the position is exhausted and the cursor moves by 1.
//!
//! Lookups are strictly sequential: each one observes the ledger state left by
//! every earlier lookup, including those from earlier lines.

use crate::models::{Artist, NormalizedKey, RunStats};
use crate::services::catalog_resolver::{CatalogResolver, LookupOutcome};
use crate::services::dedup_ledger::DedupLedger;
use std::ops::Range;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Longest candidate span, in words
pub const MAX_WINDOW_WORDS: usize = 3;

/// A confirmed artist and the words it claimed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchedSpan {
    /// Index into the filtered content lines
    pub line_index: usize,
    /// First word index within the line
    pub start: usize,
    /// Number of words claimed
    pub len: usize,
    pub artist: Artist,
}

impl MatchedSpan {
    pub fn words(&self) -> Range<usize> {
        self.start..self.start + self.len
    }
}

/// Output of the matching phase
#[derive(Debug, Clone, Default)]
pub struct MatchOutput {
    /// Confirmed spans in confirmation order
    pub spans: Vec<MatchedSpan>,
    /// True if matching stopped early on cancellation
    pub cancelled: bool,
}

impl MatchOutput {
    pub fn artists(&self) -> Vec<Artist> {
        self.spans.iter().map(|span| span.artist.clone()).collect()
    }
}

/// Split a line into trimmed, non-empty words
pub fn tokenize(line: &str) -> Vec<String> {
    line.split_whitespace().map(str::to_string).collect()
}

/// Cursor state over one tokenized line
#[derive(Debug)]
pub struct LineCursor {
    words: Vec<String>,
    used: Vec<bool>,
    position: usize,
}

impl LineCursor {
    pub fn new(line: &str) -> Self {
        let words = tokenize(line);
        let used = vec![false; words.len()];
        Self {
            words,
            used,
            position: 0,
        }
    }

    pub fn word_count(&self) -> usize {
        self.words.len()
    }

    /// Next unclaimed start position, skipping claimed words
    pub fn next_start(&mut self) -> Option<usize> {
        while self.position < self.words.len() {
            if !self.used[self.position] {
                return Some(self.position);
            }
            self.position += 1;
        }
        None
    }

    /// Windows at `start`, longest first, excluding any that touch claimed words
    pub fn windows_at(&self, start: usize) -> Vec<Range<usize>> {
        let remaining = self.words.len().saturating_sub(start);
        let longest = MAX_WINDOW_WORDS.min(remaining);
        (1..=longest)
            .rev()
            .map(|len| start..start + len)
            .filter(|window| !self.used[window.clone()].iter().any(|&u| u))
            .collect()
    }

    /// Window words joined by single spaces
    pub fn candidate(&self, window: &Range<usize>) -> String {
        self.words[window.clone()].join(" ")
    }

    /// Claim the window's words and move the cursor past it
    pub fn commit(&mut self, window: &Range<usize>) {
        for used in &mut self.used[window.clone()] {
            *used = true;
        }
        self.position = window.end;
    }

    /// No window accepted at the current position
    pub fn exhaust(&mut self) {
        self.position += 1;
    }
}

/// Walks content lines and commits confirmed spans
pub struct CandidateMatcher<'a> {
    resolver: &'a CatalogResolver,
    max_retries: u32,
}

impl<'a> CandidateMatcher<'a> {
    pub fn new(resolver: &'a CatalogResolver, max_retries: u32) -> Self {
        Self {
            resolver,
            max_retries,
        }
    }

    /// Match all lines in order, sharing one ledger
    pub async fn match_lines(
        &self,
        lines: &[String],
        ledger: &mut DedupLedger,
        stats: &mut RunStats,
        cancel: &CancellationToken,
    ) -> MatchOutput {
        let mut output = MatchOutput::default();

        for (line_index, line) in lines.iter().enumerate() {
            let finished = self
                .match_line(line_index, line, ledger, stats, cancel, &mut output.spans)
                .await;
            if !finished {
                info!(line_index, "Matching cancelled, returning partial results");
                output.cancelled = true;
                break;
            }
        }

        output
    }

    /// Match one line; returns false if cancelled before the line was finished
    async fn match_line(
        &self,
        line_index: usize,
        line: &str,
        ledger: &mut DedupLedger,
        stats: &mut RunStats,
        cancel: &CancellationToken,
        spans: &mut Vec<MatchedSpan>,
    ) -> bool {
        let mut cursor = LineCursor::new(line);
        debug!(line_index, words = cursor.word_count(), "Matching line");

        while let Some(start) = cursor.next_start() {
            let mut committed = None;

            for window in cursor.windows_at(start) {
                let chunk = cursor.candidate(&window);
                if ledger.contains(&NormalizedKey::from_name(&chunk)) {
                    debug!(candidate = %chunk, "Candidate already confirmed, skipping lookup");
                    continue;
                }

                if cancel.is_cancelled() {
                    return false;
                }

                debug!(candidate = %chunk, words = window.len(), "Trying candidate");
                let Some(artist) = self.lookup(&chunk, stats, cancel).await.into_artist() else {
                    continue;
                };

                if ledger.insert(artist.key()) {
                    info!(candidate = %chunk, artist = %artist.name, "Artist confirmed");
                    committed = Some((window, artist));
                    break;
                }
                debug!(candidate = %chunk, artist = %artist.name, "Artist already confirmed via another span");
            }

            match committed {
                Some((window, artist)) => {
                    cursor.commit(&window);
                    spans.push(MatchedSpan {
                        line_index,
                        start: window.start,
                        len: window.len(),
                        artist,
                    });
                }
                None => cursor.exhaust(),
            }
        }

        true
    }

    /// Resolve with up to `max_retries` extra attempts on failure only
    async fn lookup(&self, chunk: &str, stats: &mut RunStats, cancel: &CancellationToken) -> LookupOutcome {
        let mut attempt = 0;
        loop {
            stats.lookups += 1;
            let outcome = self.resolver.resolve(chunk).await;
            match &outcome {
                LookupOutcome::Matched(_) => stats.matched += 1,
                LookupOutcome::NotFound => stats.not_found += 1,
                LookupOutcome::Failed(reason) => {
                    stats.failed += 1;
                    if attempt < self.max_retries && !cancel.is_cancelled() {
                        attempt += 1;
                        stats.retried += 1;
                        debug!(candidate = %chunk, attempt, reason = %reason, "Retrying failed lookup");
                        continue;
                    }
                }
            }
            return outcome;
        }
    }
}
