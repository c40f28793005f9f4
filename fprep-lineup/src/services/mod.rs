//! Lineup extraction services
//!
//! Leaf-first: line filter, name policy, ledger, resolver, matcher, track
//! fetcher, and the run that ties them together.

pub mod candidate_matcher;
pub mod catalog_resolver;
pub mod dedup_ledger;
pub mod extraction_run;
pub mod line_filter;
pub mod name_policy;
pub mod track_fetcher;

pub use candidate_matcher::{CandidateMatcher, LineCursor, MatchOutput, MatchedSpan, MAX_WINDOW_WORDS};
pub use catalog_resolver::{CatalogResolver, LookupOutcome};
pub use dedup_ledger::DedupLedger;
pub use extraction_run::LineupExtractor;
pub use line_filter::LineFilter;
pub use name_policy::{names_equivalent, NamePolicy};
pub use track_fetcher::{TrackFetcher, TrackSource};
