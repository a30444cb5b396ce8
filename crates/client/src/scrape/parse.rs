//! Field extraction from title detail and trivia pages.
//!
//! Every field is extracted independently; a missing element only affects
//! its own field and leaves a diagnostic behind.

use std::sync::LazyLock;

use reelscout_core::{FieldDiagnostic, ScrapeRecord};
use scraper::{ElementRef, Html, Selector};

/// Trivia facts kept per title.
pub const MAX_TRIVIA: usize = 5;

fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("invalid selector")
}

static CREDIT_SUMMARY: LazyLock<Selector> = LazyLock::new(|| selector("div.credit_summary_item"));
static LINK: LazyLock<Selector> = LazyLock::new(|| selector("a"));
static RATING_VALUE: LazyLock<Selector> = LazyLock::new(|| selector(r#"span[itemprop="ratingValue"]"#));
static UNCLASSED_CELL: LazyLock<Selector> = LazyLock::new(|| selector("td:not([class])"));
static USER_COMMENTS: LazyLock<Selector> = LazyLock::new(|| selector("div.user-comments"));
static UNCLASSED_PARAGRAPH: LazyLock<Selector> = LazyLock::new(|| selector("p:not([class])"));
static TRIVIA_ITEM: LazyLock<Selector> = LazyLock::new(|| selector("div.sodatext"));

/// Element text with whitespace runs collapsed; `None` when blank.
fn clean_text(element: ElementRef<'_>) -> Option<String> {
    let text = element.text().flat_map(str::split_whitespace).collect::<Vec<_>>().join(" ");
    if text.is_empty() { None } else { Some(text) }
}

fn first_link_text(element: ElementRef<'_>) -> Option<String> {
    element.select(&LINK).next().and_then(clean_text)
}

fn director(document: &Html) -> Result<String, &'static str> {
    let summary = document.select(&CREDIT_SUMMARY).next().ok_or("no credit summary")?;
    first_link_text(summary).ok_or("credit summary has no linked name")
}

fn rating(document: &Html) -> Result<String, &'static str> {
    let value = document.select(&RATING_VALUE).next().ok_or("no rating value element")?;
    clean_text(value).ok_or("rating value is empty")
}

fn cast(document: &Html) -> Result<Vec<String>, &'static str> {
    let mut cells = document.select(&UNCLASSED_CELL).peekable();
    if cells.peek().is_none() {
        return Err("no cast table cells");
    }
    Ok(cells.filter_map(first_link_text).collect())
}

fn review(document: &Html) -> Result<String, &'static str> {
    let comments = document.select(&USER_COMMENTS).next().ok_or("no user comments block")?;
    let paragraph = comments.select(&UNCLASSED_PARAGRAPH).next().ok_or("user comments have no review text")?;
    clean_text(paragraph).ok_or("review is empty")
}

/// Fill director, rating, cast, and review from a detail page.
pub fn parse_detail_page(html: &str, record: &mut ScrapeRecord) {
    let document = Html::parse_document(html);
    let diagnostics = &mut record.diagnostics;
    let mut note = |field: &str, reason: &str| diagnostics.push(FieldDiagnostic::new(field, reason));

    record.director = director(&document).map_err(|r| note("director", r)).ok();
    record.rating = rating(&document).map_err(|r| note("rating", r)).ok();
    record.cast = cast(&document).map_err(|r| note("cast", r)).unwrap_or_default();
    record.review = review(&document).map_err(|r| note("review", r)).ok();
}

/// Fill trivia from a trivia page: the first [`MAX_TRIVIA`] facts in page order.
pub fn parse_trivia_page(html: &str, record: &mut ScrapeRecord) {
    let document = Html::parse_document(html);
    record.trivia = document
        .select(&TRIVIA_ITEM)
        .take(MAX_TRIVIA)
        .filter_map(clean_text)
        .collect();

    if record.trivia.is_empty() {
        record.diagnostics.push(FieldDiagnostic::new("trivia", "no trivia items"));
    }
}
