//! Name equivalence policy
//!
//! Decides whether a catalog result name is "the same performer" as the
//! candidate text. Kept separate from the matcher so it can be swapped.

use crate::models::NormalizedKey;
use serde::{Deserialize, Serialize};

/// Equivalence policy on normalized keys
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NamePolicy {
    /// Equal keys, or either key contains the other
    #[default]
    Containment,
    /// Containment, or Jaro-Winkler similarity at or above `threshold`
    Similarity { threshold: f64 },
}

impl NamePolicy {
    /// Empty keys are never equivalent to anything
    pub fn equivalent(&self, a: &NormalizedKey, b: &NormalizedKey) -> bool {
        if a.is_empty() || b.is_empty() {
            return false;
        }
        let contained = a == b || a.contains(b) || b.contains(a);
        match self {
            NamePolicy::Containment => contained,
            NamePolicy::Similarity { threshold } => {
                contained || strsim::jaro_winkler(a.as_str(), b.as_str()) >= *threshold
            }
        }
    }
}

/// Default equivalence on display names
pub fn names_equivalent(a: &str, b: &str) -> bool {
    NamePolicy::Containment.equivalent(&NormalizedKey::from_name(a), &NormalizedKey::from_name(b))
}
