//! JSON output for scraped records.
//!
//! Files are grouped by the local date of the run:
//! ```text
//! output_dir/
//! └── 2025-05-06/
//!     ├── blog.json
//!     └── news.json
//! ```
//! A second run on the same day overwrites that day's file.

use crate::error::Result;
use crate::utils::ensure_writable_dir;
use chrono::{Local, NaiveDate};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{info, instrument};

/// `{output_dir}/{date}/{name}.json`
pub fn dated_path(output_dir: &Path, date: NaiveDate, name: &str) -> PathBuf {
    output_dir.join(date.to_string()).join(format!("{name}.json"))
}

/// Serialize `records` as a JSON array under today's directory.
///
/// Creates the dated directory if needed and overwrites any file of the same
/// name written earlier that day.
///
/// # Arguments
///
/// * `records` - The scraped records, written in order
/// * `output_dir` - Base directory for JSON output
/// * `name` - File stem, e.g. `"blog"` or `"news"`
///
/// # Returns
///
/// The path of the written file: `{output_dir}/{YYYY-MM-DD}/{name}.json`.
#[instrument(level = "info", skip(records), fields(output_dir = %output_dir.display(), count = records.len()))]
pub async fn write_records<T: Serialize>(
    records: &[T],
    output_dir: &Path,
    name: &str,
) -> Result<PathBuf> {
    let path = dated_path(output_dir, Local::now().date_naive(), name);
    if let Some(dir) = path.parent() {
        ensure_writable_dir(dir).await?;
    }
    let json = serde_json::to_string_pretty(records)?;
    fs::write(&path, json).await?;
    info!(path = %path.display(), "Wrote JSON");
    Ok(path)
}
