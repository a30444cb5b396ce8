//! Loading cached metadata responses into the catalog.
//!
//! A full load scans every cache entry whose key contains
//! [`METADATA_KEY_MARKER`], once for directors and once for movies. Entries
//! that cannot be loaded are skipped and reported in the [`LoadReport`].

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio_rusqlite::{params, rusqlite};

use super::connection::CatalogDb;
use super::names::DirectorName;
use crate::{DiskCache, Error};

/// Substring identifying metadata API responses among cache keys.
pub const METADATA_KEY_MARKER: &str = "omdb";

static LEADING_YEAR: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\s*(\d{4})").expect("valid regex"));

const INSERT_DIRECTOR: &str = "INSERT INTO Director (LastName, FirstName) VALUES (?1, ?2)";

const MOVIE_EXISTS: &str = "SELECT 1 FROM Movie WHERE Title = ?1 AND Year = ?2 AND DirectorId = ?3";

const UPSERT_MOVIE: &str = "INSERT INTO Movie (Title, Year, Rating, DirectorId) VALUES (?1, ?2, ?3, ?4)
     ON CONFLICT(Title, Year, DirectorId) DO UPDATE SET Rating = excluded.Rating";

/// A cache entry that was not loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct SkippedEntry {
    pub key: String,
    pub reason: String,
}

/// Outcome of one load pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct LoadReport {
    /// Metadata entries examined.
    pub scanned: usize,
    /// Rows inserted.
    pub written: usize,
    /// Existing rows whose rating was refreshed instead of inserting a duplicate.
    #[serde(default)]
    pub updated: usize,
    pub skipped: Vec<SkippedEntry>,
}

impl LoadReport {
    fn skip(&mut self, key: &str, reason: impl Into<String>) {
        let reason = reason.into();
        tracing::warn!(key, reason = %reason, "skipped cache entry");
        self.skipped.push(SkippedEntry { key: key.to_string(), reason });
    }
}

/// Reports for both passes of a rebuild.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct RebuildReport {
    pub directors: LoadReport,
    pub movies: LoadReport,
}

/// Movie columns pulled out of one metadata response.
#[derive(Debug, Clone, PartialEq)]
struct MovieFields {
    title: String,
    year: i64,
    rating: Option<f64>,
    director: DirectorName,
}

impl MovieFields {
    fn from_metadata(value: &Value) -> Result<Self, String> {
        let title = text_field(value, "Title").ok_or("missing Title")?;
        let year = text_field(value, "Year")
            .and_then(parse_year)
            .ok_or("missing or unparseable Year")?;
        let rating = text_field(value, "imdbRating").and_then(parse_rating);
        let director = director_of(value)?;

        Ok(Self { title: title.to_string(), year, rating, director })
    }
}

/// String field of a metadata response, treating `"N/A"` and blanks as absent.
fn text_field<'a>(value: &'a Value, field: &str) -> Option<&'a str> {
    value
        .get(field)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty() && *s != "N/A")
}

fn director_of(value: &Value) -> Result<DirectorName, String> {
    let raw = text_field(value, "Director").ok_or("missing Director")?;
    DirectorName::parse(raw).ok_or_else(|| format!("unusable Director {raw:?}"))
}

/// Leading four-digit year; `"2011–2019"` parses as 2011.
pub fn parse_year(raw: &str) -> Option<i64> {
    LEADING_YEAR.captures(raw).and_then(|c| c[1].parse().ok())
}

pub fn parse_rating(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|r| r.is_finite())
}

/// Owned copies of the metadata entries, for moving onto the database thread.
fn metadata_entries(cache: &DiskCache) -> Vec<(String, Value)> {
    cache
        .entries()
        .filter(|(key, _)| key.contains(METADATA_KEY_MARKER))
        .map(|(key, value)| (key.to_string(), value.clone()))
        .collect()
}

fn director_ids_in(conn: &rusqlite::Connection) -> Result<HashMap<String, i64>, rusqlite::Error> {
    let mut stmt = conn.prepare("SELECT Id, FirstName, LastName FROM Director ORDER BY Id")?;
    let rows = stmt.query_map([], |row| {
        let id: i64 = row.get(0)?;
        let name = DirectorName { first: row.get(1)?, last: row.get(2)? };
        Ok((name.key(), id))
    })?;

    let mut ids = HashMap::new();
    for row in rows {
        let (key, id) = row?;
        ids.entry(key).or_insert(id);
    }
    Ok(ids)
}

impl CatalogDb {
    /// Insert one Director row per cached metadata entry.
    ///
    /// Repeated directors produce repeated rows; [`CatalogDb::director_ids`]
    /// resolves each name to its lowest ID.
    pub async fn load_directors(&self, cache: &DiskCache) -> Result<LoadReport, Error> {
        let entries = metadata_entries(cache);

        let report = self
            .conn
            .call(move |conn| -> Result<LoadReport, Error> {
                let mut report = LoadReport::default();
                let tx = conn.transaction()?;
                {
                    let mut stmt = tx.prepare(INSERT_DIRECTOR)?;
                    for (key, value) in &entries {
                        report.scanned += 1;
                        match director_of(value) {
                            Ok(name) => {
                                stmt.execute(params![name.last, name.first])?;
                                report.written += 1;
                            }
                            Err(reason) => report.skip(key, reason),
                        }
                    }
                }
                tx.commit()?;
                Ok(report)
            })
            .await
            .map_err(Error::from)?;

        tracing::info!(
            scanned = report.scanned,
            written = report.written,
            skipped = report.skipped.len(),
            "loaded directors"
        );
        Ok(report)
    }

    /// Map of `"First Last"` to Director ID; the lowest ID wins for repeats.
    pub async fn director_ids(&self) -> Result<HashMap<String, i64>, Error> {
        self.conn
            .call(|conn| -> Result<HashMap<String, i64>, Error> { Ok(director_ids_in(conn)?) })
            .await
            .map_err(Error::from)
    }

    /// Insert one Movie row per cached metadata entry whose director resolves.
    pub async fn load_movies(&self, cache: &DiskCache) -> Result<LoadReport, Error> {
        let entries = metadata_entries(cache);

        let report = self
            .conn
            .call(move |conn| -> Result<LoadReport, Error> {
                let mut report = LoadReport::default();
                let tx = conn.transaction()?;
                {
                    let ids = director_ids_in(&tx)?;
                    let mut exists = tx.prepare(MOVIE_EXISTS)?;
                    let mut stmt = tx.prepare(UPSERT_MOVIE)?;
                    for (key, value) in &entries {
                        report.scanned += 1;
                        let fields = match MovieFields::from_metadata(value) {
                            Ok(fields) => fields,
                            Err(reason) => {
                                report.skip(key, reason);
                                continue;
                            }
                        };
                        let Some(director_id) = ids.get(&fields.director.key()) else {
                            report.skip(key, format!("director {} not found", fields.director));
                            continue;
                        };
                        let known = exists.exists(params![fields.title, fields.year, director_id])?;
                        stmt.execute(params![fields.title, fields.year, fields.rating, director_id])?;
                        if known {
                            report.updated += 1;
                        } else {
                            report.written += 1;
                        }
                    }
                }
                tx.commit()?;
                Ok(report)
            })
            .await
            .map_err(Error::from)?;

        tracing::info!(
            scanned = report.scanned,
            written = report.written,
            updated = report.updated,
            skipped = report.skipped.len(),
            "loaded movies"
        );
        Ok(report)
    }

    /// Drop the catalog and reload it from every cached metadata entry.
    pub async fn rebuild(&self, cache: &DiskCache) -> Result<RebuildReport, Error> {
        self.create_schema().await?;
        let directors = self.load_directors(cache).await?;
        let movies = self.load_movies(cache).await?;
        Ok(RebuildReport { directors, movies })
    }

    /// Insert or update a single movie from a raw metadata response.
    ///
    /// Keyed on (title, year, director): repeating the call changes nothing
    /// but the rating. Reuses the lowest-ID director with the same name, or
    /// inserts one. Returns the Movie ID.
    pub async fn upsert_movie(&self, metadata: &Value) -> Result<i64, Error> {
        let fields = MovieFields::from_metadata(metadata).map_err(Error::InvalidInput)?;

        self.conn
            .call(move |conn| -> Result<i64, Error> {
                let tx = conn.transaction()?;
                let existing: Option<i64> = tx.query_row(
                    "SELECT MIN(Id) FROM Director WHERE FirstName = ?1 AND LastName = ?2",
                    params![fields.director.first, fields.director.last],
                    |row| row.get(0),
                )?;
                let director_id = match existing {
                    Some(id) => id,
                    None => {
                        tx.execute(INSERT_DIRECTOR, params![fields.director.last, fields.director.first])?;
                        tx.last_insert_rowid()
                    }
                };

                tx.execute(UPSERT_MOVIE, params![fields.title, fields.year, fields.rating, director_id])?;
                let movie_id: i64 = tx.query_row(
                    "SELECT Id FROM Movie WHERE Title = ?1 AND Year = ?2 AND DirectorId = ?3",
                    params![fields.title, fields.year, director_id],
                    |row| row.get(0),
                )?;
                tx.commit()?;
                Ok(movie_id)
            })
            .await
            .map_err(Error::from)
    }
}
