//! Director name normalization.
//!
//! Every place that stores or compares a director goes through
//! [`DirectorName::parse`], so a name written by one load pass is always
//! found again by the next.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

static PARENTHETICAL: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\([^)]*\)").expect("valid regex"));

/// A director split into first and last name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DirectorName {
    pub first: String,
    /// Remaining tokens joined by single spaces; empty for one-word names.
    pub last: String,
}

impl DirectorName {
    /// Parse a director credit such as `"Chris Buck, Jennifer Lee"`.
    ///
    /// Only the first comma-separated credit is used. Parenthetical notes
    /// (`"(co-director)"`) and stray punctuation around tokens are dropped.
    /// Returns `None` for empty input and the API's `"N/A"`.
    pub fn parse(raw: &str) -> Option<Self> {
        let first_credit = raw.split(',').next().unwrap_or_default();
        let cleaned = PARENTHETICAL.replace_all(first_credit, " ");

        let mut tokens = cleaned
            .split_whitespace()
            .map(|t| t.trim_matches(|c: char| matches!(c, ';' | ':' | '"' | '(' | ')' | '[' | ']')))
            .filter(|t| !t.is_empty());

        let first = tokens.next()?;
        if first.eq_ignore_ascii_case("n/a") {
            return None;
        }
        let last = tokens.collect::<Vec<_>>().join(" ");

        Some(Self { first: first.to_string(), last })
    }

    /// Lookup key: `"First Last"`, or just the first name.
    pub fn key(&self) -> String {
        if self.last.is_empty() { self.first.clone() } else { format!("{} {}", self.first, self.last) }
    }
}

impl std::fmt::Display for DirectorName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.key())
    }
}
