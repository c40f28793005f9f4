//! Dedup Ledger
//!
//! Run-scoped set of normalized keys already confirmed. Grows monotonically;
//! construct a fresh ledger for every run.

use crate::models::NormalizedKey;
use std::collections::HashSet;

#[derive(Debug, Default)]
pub struct DedupLedger {
    keys: HashSet<NormalizedKey>,
}

impl DedupLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, key: &NormalizedKey) -> bool {
        self.keys.contains(key)
    }

    /// Returns false if the key was already present
    pub fn insert(&mut self, key: NormalizedKey) -> bool {
        self.keys.insert(key)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}
