//! catalog_chart tool implementation.
//!
//! Returns bar-chart series (movie titles against rating or year); rendering
//! is left to the client.

use rmcp::{ErrorData as McpError, model::CallToolResult};
use reelscout_core::{BarChart, CatalogDb, ChartField, Error};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::tools::json_result;

/// Parameters for the catalog_chart tool.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct CatalogChartParams {
    /// Value to plot per movie: rating (default) or year.
    #[serde(default)]
    pub plot: ChartField,
}

pub async fn chart(catalog: &CatalogDb, params: CatalogChartParams) -> Result<BarChart, Error> {
    catalog.chart(params.plot).await
}

/// Implementation of the catalog_chart tool.
pub async fn chart_impl(catalog: &CatalogDb, params: CatalogChartParams) -> Result<CallToolResult, McpError> {
    let series = chart(catalog, params).await?;
    json_result(&series)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_chart_year_series() {
        let catalog = CatalogDb::open_in_memory().await.unwrap();
        for (title, year) in [("Frozen", "2013"), ("Alien", "1979")] {
            catalog
                .upsert_movie(&json!({"Title": title, "Year": year, "Director": "Some One"}))
                .await
                .unwrap();
        }

        let series = chart(&catalog, CatalogChartParams { plot: ChartField::Year }).await.unwrap();
        assert_eq!(series.labels, vec!["Frozen", "Alien"]);
        assert_eq!(series.values, vec![2013.0, 1979.0]);
    }

    #[tokio::test]
    async fn test_chart_rating_skips_unrated() {
        let catalog = CatalogDb::open_in_memory().await.unwrap();
        catalog
            .upsert_movie(&json!({"Title": "Frozen", "Year": "2013", "imdbRating": "7.4", "Director": "Chris Buck"}))
            .await
            .unwrap();
        catalog
            .upsert_movie(&json!({"Title": "Tangled", "Year": "2010", "Director": "Nathan Greno"}))
            .await
            .unwrap();

        let series = chart(&catalog, CatalogChartParams::default()).await.unwrap();
        assert_eq!(series.field, ChartField::Rating);
        assert_eq!(series.labels, vec!["Frozen"]);
        assert_eq!(series.values, vec![7.4]);
    }
}
