//! Plain-text rendering for terminal output.

use std::fmt::Write;

use reelscout_core::{BarChart, LoadReport, MovieReport, MovieRow, RebuildReport};

const BAR_WIDTH: f64 = 40.0;

/// Labelled fields, then cast, review, and numbered trivia.
pub fn report(report: &MovieReport) -> String {
    let metadata = &report.metadata;
    let scrape = &report.scrape;
    let mut out = String::new();

    let labels = ["Title", "Year", "Rated", "Genre", "Plot", "IMDb ID", "Poster"];
    for (label, value) in labels.iter().zip(metadata.display_fields()) {
        let _ = writeln!(out, "{label:<9}{value}");
    }
    let _ = writeln!(out, "{:<9}{}", "Director", scrape.director());
    let _ = writeln!(out, "{:<9}{}", "Rating", scrape.rating());

    out.push_str("\nCast\n");
    if scrape.cast.is_empty() {
        out.push_str("  (none)\n");
    }
    for name in &scrape.cast {
        let _ = writeln!(out, "  {name}");
    }

    let _ = writeln!(out, "\nReview\n  {}", scrape.review());

    out.push_str("\nTrivia\n");
    if scrape.trivia.is_empty() {
        out.push_str("  (none)\n");
    }
    for line in report.numbered_trivia() {
        let _ = writeln!(out, "  {line}");
    }
    out
}

/// Outcome of `search --persist`, appended after the report.
pub fn persisted(result: &anyhow::Result<i64>) -> String {
    match result {
        Ok(id) => format!("\nSaved to catalog as movie {id}\n"),
        Err(e) => format!("\nNot saved to catalog: {e:#}\n"),
    }
}

/// One line per movie: ID, title, year, rating, director.
pub fn listing(rows: &[MovieRow]) -> String {
    let mut out = format!("{:>4}  {:<32} {:>4} {:>6}  {}\n", "ID", "Title", "Year", "Rating", "Director");
    for row in rows {
        let rating = row.rating.map_or_else(|| "-".to_string(), |r| format!("{r:.1}"));
        let _ = writeln!(
            out,
            "{:>4}  {:<32} {:>4} {:>6}  {}",
            row.id,
            row.title,
            row.year,
            rating,
            row.director()
        );
    }
    out
}

/// Horizontal bars scaled to the largest value.
pub fn bar_chart(chart: &BarChart) -> String {
    let max = chart.values.iter().copied().fold(0.0_f64, f64::max);
    let label_width = chart.labels.iter().map(|l| l.chars().count()).max().unwrap_or(0);

    let mut out = format!("{} by title\n", chart.field);
    for (label, value) in chart.labels.iter().zip(&chart.values) {
        let len = if max > 0.0 { (value / max * BAR_WIDTH).round() as usize } else { 0 };
        let _ = writeln!(out, "{label:<label_width$}  {} {value}", "#".repeat(len));
    }
    out
}

fn load_summary(name: &str, report: &LoadReport) -> String {
    let mut out = format!(
        "{name}: {} scanned, {} written, {} updated, {} skipped\n",
        report.scanned,
        report.written,
        report.updated,
        report.skipped.len()
    );
    for skipped in &report.skipped {
        let _ = writeln!(out, "  skipped {}: {}", skipped.key, skipped.reason);
    }
    out
}

pub fn rebuild(report: &RebuildReport) -> String {
    load_summary("directors", &report.directors) + &load_summary("movies", &report.movies)
}
