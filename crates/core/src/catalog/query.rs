//! Read-side catalog queries: sorted listings and bar-chart series.

use std::fmt;
use std::str::FromStr;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::connection::CatalogDb;
use crate::Error;

/// Column a movie listing is ordered by.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    #[default]
    Title,
    Year,
    Rating,
    Director,
}

impl SortKey {
    fn columns(self) -> &'static [&'static str] {
        match self {
            SortKey::Title => &["m.Title"],
            SortKey::Year => &["m.Year"],
            SortKey::Rating => &["m.Rating"],
            SortKey::Director => &["d.LastName", "d.FirstName"],
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum SortDir {
    #[default]
    Asc,
    Desc,
}

impl SortDir {
    fn sql(self) -> &'static str {
        match self {
            SortDir::Asc => "ASC",
            SortDir::Desc => "DESC",
        }
    }
}

/// Which movie column a bar chart plots.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum ChartField {
    #[default]
    Rating,
    Year,
}

impl ChartField {
    fn column(self) -> &'static str {
        match self {
            ChartField::Rating => "Rating",
            ChartField::Year => "Year",
        }
    }
}

macro_rules! keyword_enum {
    ($ty:ty, $( $name:literal => $variant:expr ),+ $(,)?) => {
        impl FromStr for $ty {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim().to_ascii_lowercase().as_str() {
                    $( $name => Ok($variant), )+
                    other => Err(format!("unknown value {other:?}, expected one of: {}", [$($name),+].join(", "))),
                }
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                $( if *self == $variant { return f.write_str($name); } )+
                Ok(())
            }
        }
    };
}

keyword_enum!(SortKey, "title" => SortKey::Title, "year" => SortKey::Year, "rating" => SortKey::Rating, "director" => SortKey::Director);
keyword_enum!(SortDir, "asc" => SortDir::Asc, "desc" => SortDir::Desc);
keyword_enum!(ChartField, "rating" => ChartField::Rating, "year" => ChartField::Year);

/// Listing parameters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct MovieQuery {
    #[serde(default)]
    pub sort: SortKey,
    #[serde(default)]
    pub dir: SortDir,
}

impl MovieQuery {
    /// `ORDER BY` clause; NULLs always sort last, ties broken by insertion order.
    fn order_by(&self) -> String {
        let dir = self.dir.sql();
        let mut terms: Vec<String> = Vec::new();
        for column in self.sort.columns() {
            terms.push(format!("({column} IS NULL)"));
            terms.push(format!("{column} {dir}"));
        }
        terms.push("m.Id".to_string());
        terms.join(", ")
    }
}

/// One movie joined with its director.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct MovieRow {
    pub id: i64,
    pub title: String,
    pub year: i64,
    pub rating: Option<f64>,
    pub director_first: Option<String>,
    pub director_last: Option<String>,
}

impl MovieRow {
    pub fn director(&self) -> String {
        match (&self.director_first, &self.director_last) {
            (Some(first), Some(last)) if !last.is_empty() => format!("{first} {last}"),
            (Some(first), _) => first.clone(),
            _ => String::new(),
        }
    }
}

/// Data series for a bar chart: one bar per movie, in insertion order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct BarChart {
    pub field: ChartField,
    pub labels: Vec<String>,
    pub values: Vec<f64>,
}

impl CatalogDb {
    /// List every movie with its director, ordered per `query`.
    pub async fn list_movies(&self, query: MovieQuery) -> Result<Vec<MovieRow>, Error> {
        let sql = format!(
            "SELECT m.Id, m.Title, m.Year, m.Rating, d.FirstName, d.LastName
             FROM Movie m LEFT JOIN Director d ON d.Id = m.DirectorId
             ORDER BY {}",
            query.order_by()
        );

        self.conn
            .call(move |conn| -> Result<Vec<MovieRow>, Error> {
                let mut stmt = conn.prepare(&sql)?;
                let rows = stmt.query_map([], |row| {
                    Ok(MovieRow {
                        id: row.get(0)?,
                        title: row.get(1)?,
                        year: row.get(2)?,
                        rating: row.get(3)?,
                        director_first: row.get(4)?,
                        director_last: row.get(5)?,
                    })
                })?;
                Ok(rows.collect::<Result<Vec<_>, _>>()?)
            })
            .await
            .map_err(Error::from)
    }

    /// Title/value pairs for plotting `field`; movies without a value are left out.
    pub async fn chart(&self, field: ChartField) -> Result<BarChart, Error> {
        let column = field.column();
        let sql = format!("SELECT Title, {column} FROM Movie WHERE {column} IS NOT NULL ORDER BY Id");

        let (labels, values) = self
            .conn
            .call(move |conn| -> Result<(Vec<String>, Vec<f64>), Error> {
                let mut stmt = conn.prepare(&sql)?;
                let rows = stmt.query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, f64>(1)?)))?;

                let mut labels = Vec::new();
                let mut values = Vec::new();
                for row in rows {
                    let (label, value) = row?;
                    labels.push(label);
                    values.push(value);
                }
                Ok((labels, values))
            })
            .await
            .map_err(Error::from)?;

        Ok(BarChart { field, labels, values })
    }
}
