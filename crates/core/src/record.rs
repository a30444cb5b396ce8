//! Metadata and scrape records produced by a title lookup.
//!
//! Fields that could not be extracted are `None` (or an empty list). The
//! accessor methods fall back to fixed placeholder text for display, and each
//! record keeps a diagnostic list naming what defaulted and why.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

pub const NO_TITLE: &str = "No title";
pub const NO_YEAR: &str = "No Year";
pub const NO_RATED: &str = "NR";
pub const NO_GENRE: &str = "No Genre";
pub const NO_PLOT: &str = "No Plot";
pub const NO_ID: &str = "No ID";
pub const NO_POSTER: &str = "No poster to display";

pub const NO_DIRECTOR: &str = "No Director/Creator";
pub const NO_RATING: &str = "No Rating";
pub const NO_REVIEWS: &str = "No Reviews";

/// Why a field fell back to its default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct FieldDiagnostic {
    pub field: String,
    pub reason: String,
}

impl FieldDiagnostic {
    pub fn new(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self { field: field.into(), reason: reason.into() }
    }
}

/// Normalized metadata API response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct MetadataRecord {
    pub title: Option<String>,
    pub year: Option<String>,
    pub rated: Option<String>,
    pub genre: Option<String>,
    pub plot: Option<String>,
    pub external_id: Option<String>,
    pub poster: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub diagnostics: Vec<FieldDiagnostic>,
}

impl MetadataRecord {
    pub fn title(&self) -> &str {
        self.title.as_deref().unwrap_or(NO_TITLE)
    }

    pub fn year(&self) -> &str {
        self.year.as_deref().unwrap_or(NO_YEAR)
    }

    pub fn rated(&self) -> &str {
        self.rated.as_deref().unwrap_or(NO_RATED)
    }

    pub fn genre(&self) -> &str {
        self.genre.as_deref().unwrap_or(NO_GENRE)
    }

    pub fn plot(&self) -> &str {
        self.plot.as_deref().unwrap_or(NO_PLOT)
    }

    pub fn external_id(&self) -> &str {
        self.external_id.as_deref().unwrap_or(NO_ID)
    }

    pub fn poster(&self) -> &str {
        self.poster.as_deref().unwrap_or(NO_POSTER)
    }

    /// All seven display fields, placeholders included.
    pub fn display_fields(&self) -> [&str; 7] {
        [self.title(), self.year(), self.rated(), self.genre(), self.plot(), self.external_id(), self.poster()]
    }
}

/// Fields scraped from a title's detail and trivia pages.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ScrapeRecord {
    pub director: Option<String>,
    /// Rating text as shown on the page; not validated as a number.
    pub rating: Option<String>,
    pub cast: Vec<String>,
    pub review: Option<String>,
    /// At most five facts, in page order.
    pub trivia: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub diagnostics: Vec<FieldDiagnostic>,
}

impl ScrapeRecord {
    pub fn director(&self) -> &str {
        self.director.as_deref().unwrap_or(NO_DIRECTOR)
    }

    pub fn rating(&self) -> &str {
        self.rating.as_deref().unwrap_or(NO_RATING)
    }

    pub fn review(&self) -> &str {
        self.review.as_deref().unwrap_or(NO_REVIEWS)
    }
}

/// Combined result of a title search.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct MovieReport {
    pub metadata: MetadataRecord,
    pub scrape: ScrapeRecord,
}

impl MovieReport {
    /// Every defaulted field across both records, metadata first.
    pub fn diagnostics(&self) -> impl Iterator<Item = &FieldDiagnostic> {
        self.metadata.diagnostics.iter().chain(self.scrape.diagnostics.iter())
    }

    /// Trivia lines numbered from 1, e.g. `[1] fact`.
    pub fn numbered_trivia(&self) -> Vec<String> {
        self.scrape
            .trivia
            .iter()
            .enumerate()
            .map(|(i, fact)| format!("[{}] {}", i + 1, fact))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_metadata_uses_placeholders() {
        let record = MetadataRecord::default();
        assert_eq!(
            record.display_fields(),
            ["No title", "No Year", "NR", "No Genre", "No Plot", "No ID", "No poster to display"]
        );
    }

    #[test]
    fn test_empty_scrape_uses_placeholders() {
        let record = ScrapeRecord::default();
        assert_eq!(record.director(), "No Director/Creator");
        assert_eq!(record.rating(), "No Rating");
        assert_eq!(record.review(), "No Reviews");
        assert!(record.cast.is_empty());
        assert!(record.trivia.is_empty());
    }

    #[test]
    fn test_report_diagnostics_and_trivia() {
        let report = MovieReport {
            metadata: MetadataRecord {
                diagnostics: vec![FieldDiagnostic::new("Poster", "absent")],
                ..Default::default()
            },
            scrape: ScrapeRecord {
                trivia: vec!["one".into(), "two".into()],
                diagnostics: vec![FieldDiagnostic::new("review", "no user comments block")],
                ..Default::default()
            },
        };

        let fields: Vec<_> = report.diagnostics().map(|d| d.field.as_str()).collect();
        assert_eq!(fields, vec!["Poster", "review"]);
        assert_eq!(report.numbered_trivia(), vec!["[1] one", "[2] two"]);
    }
}
