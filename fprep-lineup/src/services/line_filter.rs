//! Line Filter
//!
//! Splits raw poster text into content lines: trims each line, drops empty
//! lines, and discards noise lines (venue boilerplate, stage names, dates).
//! Pure and total; filtering already-filtered output is a no-op.

use crate::config::LineupConfig;
use once_cell::sync::Lazy;
use regex::Regex;

/// Built-in noise phrases, matched case-insensitively as substrings
pub const DEFAULT_NOISE_PHRASES: &[&str] = &[
    "tokyo marine stadium",
    "summer sonic",
    "main stage",
    "line up",
    "line-up",
    "festival",
    "live nation",
    "olympic stadium",
    "tokyo station",
    "marine arena",
    "confirmed",
    "july",
    "august",
    "september",
];

/// A 4-digit run (year) or a day/month pair like `27-29`, `7.15`, `12/31`, `3 4`
static DATE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\d{4}|\d{1,2}[-./ ]\d{1,2}").expect("valid date pattern"));

/// Line separators recognised in poster text (`\r\n` splits into an empty line)
fn is_line_break(c: char) -> bool {
    matches!(c, '\n' | '\r' | '\u{0085}' | '\u{2028}' | '\u{2029}')
}

/// Split raw text on every line boundary, including a lone `\r` and Unicode separators
pub fn split_lines(text: &str) -> impl Iterator<Item = &str> {
    text.split(is_line_break)
}

/// Classifies raw lines as content or noise
#[derive(Debug, Clone)]
pub struct LineFilter {
    /// Lowercased noise phrases
    noise_phrases: Vec<String>,
}

impl Default for LineFilter {
    fn default() -> Self {
        Self::new()
    }
}

impl LineFilter {
    /// Filter with the built-in noise phrase list
    pub fn new() -> Self {
        Self {
            noise_phrases: DEFAULT_NOISE_PHRASES.iter().map(|p| p.to_string()).collect(),
        }
    }

    /// Built-in phrases plus the configured extras; needs no catalog access
    pub fn from_config(config: &LineupConfig) -> Self {
        Self::new().with_extra_phrases(&config.extra_noise_phrases)
    }

    /// Append extra noise phrases (blank entries are ignored)
    pub fn with_extra_phrases<I, S>(mut self, phrases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.noise_phrases.extend(
            phrases
                .into_iter()
                .map(|p| p.as_ref().trim().to_lowercase())
                .filter(|p| !p.is_empty()),
        );
        self
    }

    /// Ordered content lines surviving the filter
    pub fn filter(&self, text: &str) -> Vec<String> {
        split_lines(text)
            .map(str::trim)
            .filter(|line| !line.is_empty() && !self.is_noise(line))
            .map(str::to_string)
            .collect()
    }

    /// True if the line is venue/date boilerplate rather than performer names
    pub fn is_noise(&self, line: &str) -> bool {
        let lower = line.to_lowercase();
        self.noise_phrases.iter().any(|phrase| lower.contains(phrase.as_str()))
            || DATE_PATTERN.is_match(&lower)
    }
}

/// Number of non-empty lines in raw text
pub fn count_nonempty_lines(text: &str) -> usize {
    split_lines(text).filter(|line| !line.trim().is_empty()).count()
}
