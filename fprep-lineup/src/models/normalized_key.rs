//! Normalized name keys
//!
//! Equality surrogate for artist names: two names with the same key are the
//! same performer regardless of display casing or spacing.

use serde::Serialize;
use std::fmt;

/// Zero-width space, a common OCR artifact
pub const ZERO_WIDTH_SPACE: char = '\u{200B}';

/// Lowercase, whitespace-free projection of a display name
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct NormalizedKey(String);

impl NormalizedKey {
    pub fn from_name(name: &str) -> Self {
        let key = name
            .chars()
            .filter(|c| !c.is_whitespace() && *c != ZERO_WIDTH_SPACE)
            .flat_map(char::to_lowercase)
            .collect();
        Self(key)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Substring containment on the normalized form
    pub fn contains(&self, other: &NormalizedKey) -> bool {
        self.0.contains(other.as_str())
    }
}

impl fmt::Display for NormalizedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
