//! # Text Acquire
//!
//! Command-line front end for the acquisition workflows.
//!
//! ## Usage
//!
//! ```sh
//! text_acquire blog                     # ./data/<date>/blog.json
//! text_acquire news business sports     # ./data/<date>/news.json
//! text_acquire spam                     # ./spam.csv (read-through cache)
//! ```
//!
//! Logging goes to stderr; set `RUST_LOG` to adjust verbosity.

use clap::Parser;
use std::error::Error;
use std::path::{Path, PathBuf};
use text_acquire::config::AcquireConfig;
use text_acquire::dataset::{SpamCache, SqlTableSource};
use text_acquire::fetch::{PageFetcher, blog_headers, news_headers};
use text_acquire::outputs::json;
use text_acquire::scrapers::{blog, news};
use tracing::{debug, error, info, instrument};
use tracing_subscriber::{EnvFilter, fmt as tfmt};
use url::Url;

mod cli;

use cli::{Cli, Command};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_writer(std::io::stderr)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    let args = Cli::parse();
    debug!(?args, "Parsed CLI arguments");

    let config = AcquireConfig::load_or_default(args.config.as_deref().map(Path::new)).await?;
    let output_dir = PathBuf::from(&args.output_dir);

    let result = run(args.command, &config, &output_dir).await;
    let elapsed = start_time.elapsed();
    match &result {
        Ok(()) => info!(elapsed_secs = elapsed.as_secs_f64(), "Done"),
        Err(e) => error!(elapsed_secs = elapsed.as_secs_f64(), error = %e, "Failed"),
    }
    result
}

#[instrument(level = "info", skip_all)]
async fn run(
    command: Command,
    config: &AcquireConfig,
    output_dir: &Path,
) -> Result<(), Box<dyn Error>> {
    let fetcher = PageFetcher::default();

    match command {
        Command::Blog { start_url } => {
            let start = Url::parse(start_url.as_deref().unwrap_or(&config.blog.start_url))?;
            let headers = blog_headers(&config.blog.user_agent)?;
            let articles = blog::collect(&fetcher, &start, &headers).await?;
            let path = json::write_records(&articles, output_dir, "blog").await?;
            info!(count = articles.len(), path = %path.display(), "Blog articles saved");
        }
        Command::News { categories } => {
            let categories = if categories.is_empty() {
                config.news.categories.clone()
            } else {
                categories
            };
            let items =
                news::collect(&fetcher, &config.news.url_template, &categories, &news_headers())
                    .await?;
            let path = json::write_records(&items, output_dir, "news").await?;
            info!(count = items.len(), path = %path.display(), "News items saved");
        }
        Command::Spam {
            database_url,
            database,
            cache_path,
        } => {
            let cache = SpamCache::new(
                cache_path
                    .map(PathBuf::from)
                    .unwrap_or_else(|| config.spam.cache_path.clone()),
            );
            let database = database.as_deref().unwrap_or(&config.spam.database);
            let source = database_url
                .as_deref()
                .map(|url| SqlTableSource::for_database(url, database))
                .transpose()?;
            let table = cache.load(&source).await?;
            info!(
                path = %cache.path().display(),
                columns = ?table.columns,
                rows = table.len(),
                "Spam table ready"
            );
        }
    }
    Ok(())
}
