//! reelscout command-line entry point.
//!
//! Results go to stdout; logs go to stderr, filtered by `RUST_LOG`.

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use reelscout_client::{FetchClient, FetchConfig, MovieLookup};
use reelscout_core::{AppConfig, CatalogDb, ChartField, DiskCache, MovieQuery, SortDir, SortKey};
use tracing_subscriber::EnvFilter;

mod render;

#[derive(Parser)]
#[command(name = "reelscout", version, about = "Movie lookup with a local catalog")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Look up a movie by title and print everything found
    Search {
        title: String,
        /// Also add the movie to the catalog
        #[arg(long)]
        persist: bool,
    },
    /// Drop the catalog and reload it from the response cache
    Rebuild,
    /// List catalog movies
    List {
        /// title, year, rating, or director
        #[arg(long, default_value_t = SortKey::Title)]
        sort: SortKey,
        /// asc or desc
        #[arg(long, default_value_t = SortDir::Asc)]
        dir: SortDir,
    },
    /// Bar chart of catalog movies
    Chart {
        /// rating or year
        #[arg(long, default_value_t = ChartField::Rating)]
        plot: ChartField,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = AppConfig::load()?;

    let output = match cli.command {
        Command::Search { title, persist } => search(&config, &title, persist).await?,
        Command::Rebuild => {
            let cache = DiskCache::open(&config.cache_path).await;
            let catalog = open_catalog(&config).await?;
            render::rebuild(&catalog.rebuild(&cache).await?)
        }
        Command::List { sort, dir } => {
            let catalog = open_catalog(&config).await?;
            render::listing(&catalog.list_movies(MovieQuery { sort, dir }).await?)
        }
        Command::Chart { plot } => {
            let catalog = open_catalog(&config).await?;
            render::bar_chart(&catalog.chart(plot).await?)
        }
    };

    print!("{output}");
    Ok(())
}

async fn open_catalog(config: &AppConfig) -> Result<CatalogDb> {
    CatalogDb::open(&config.db_path)
        .await
        .with_context(|| format!("opening catalog {}", config.db_path.display()))
}

async fn search(config: &AppConfig, title: &str, persist: bool) -> Result<String> {
    let transport = Arc::new(FetchClient::new(FetchConfig::from(config))?);
    let lookup = MovieLookup::from_config(config, transport)?;
    let mut cache = DiskCache::open(&config.cache_path).await;

    let outcome = lookup.search(&mut cache, title).await?;
    for diagnostic in outcome.report.diagnostics() {
        tracing::info!(field = %diagnostic.field, "defaulted: {}", diagnostic.reason);
    }

    let mut text = render::report(&outcome.report);
    if persist {
        let saved = match &outcome.raw_metadata {
            Some(raw) => match open_catalog(config).await {
                Ok(catalog) => catalog.upsert_movie(raw).await.map_err(anyhow::Error::from),
                Err(e) => Err(e),
            },
            None => Err(anyhow::anyhow!("no metadata response to add")),
        };
        if let Err(e) = &saved {
            tracing::warn!(title, "not saved to catalog: {:#}", e);
        }
        text.push_str(&render::persisted(&saved));
    }
    Ok(text)
}
