//! Command-line interface.
//!
//! Every option can also come from the YAML config file (`--config`); values
//! given here win.

use clap::{Parser, Subcommand};

/// Acquire text datasets: blog articles, categorized news, and the spam table.
///
/// # Examples
///
/// ```sh
/// # Walk the whole blog
/// text_acquire blog
///
/// # Two news categories, custom output directory
/// text_acquire -o ./out news business sports
///
/// # Spam table, cached in ./spam.csv
/// DATABASE_URL=mysql://user:pw@db.example.com text_acquire spam
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Optional path to a YAML config file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Directory that receives dated JSON output
    #[arg(short, long, env = "ACQUIRE_OUTPUT_DIR", default_value = "./data")]
    pub output_dir: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Scrape every article of the paginated blog
    Blog {
        /// First listing page (defaults to the configured start URL)
        #[arg(long)]
        start_url: Option<String>,
    },

    /// Scrape news snippets for each category
    News {
        /// Categories to scrape, in order (defaults to the configured list)
        categories: Vec<String>,
    },

    /// Load the labeled spam table, querying the database on a cache miss
    Spam {
        /// Database server URL without the database name
        #[arg(long, env = "DATABASE_URL")]
        database_url: Option<String>,

        /// Database name (defaults to the configured one)
        #[arg(long)]
        database: Option<String>,

        /// Cache file path (defaults to the configured one)
        #[arg(long)]
        cache_path: Option<String>,
    },
}
