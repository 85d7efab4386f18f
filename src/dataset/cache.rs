//! Read-through file cache for the spam table.
//!
//! A present cache file is always trusted: there is no TTL and no
//! invalidation, so the only way to refresh is to delete the file. The
//! existence check and the write are not locked against other processes;
//! concurrent misses both query and the last write wins.

use super::source::TableSource;
use super::table::Table;
use crate::error::Result;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{info, instrument};

/// The one query issued on a cache miss.
pub const SPAM_QUERY: &str = "SELECT * FROM spam";

#[derive(Debug, Clone)]
pub struct SpamCache {
    path: PathBuf,
}

impl SpamCache {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Return the cached table, querying `source` and writing the cache
    /// first if the file doesn't exist yet.
    ///
    /// # Arguments
    ///
    /// * `source` - Consulted only on a miss, with [`SPAM_QUERY`]
    ///
    /// # Returns
    ///
    /// The table, cell-for-cell identical whether it came from the file or
    /// from `source`.
    ///
    /// # Errors
    ///
    /// [`AcquireError::Connection`](crate::AcquireError::Connection) if the
    /// query fails; `CacheIo`/`CacheFormat` if the file can't be read or
    /// written. A failed write leaves no cache file behind, so the next call
    /// queries again.
    #[instrument(level = "info", skip(self, source), fields(path = %self.path.display()))]
    pub async fn load<S: TableSource>(&self, source: &S) -> Result<Table> {
        if fs::try_exists(&self.path).await? {
            let table = Table::from_csv_path(&self.path).await?;
            info!(rows = table.len(), "Loaded table from cache");
            return Ok(table);
        }

        info!("Cache miss; querying database");
        let table = source.fetch_table(SPAM_QUERY).await?;
        table.to_csv_path(&self.path).await?;
        info!(rows = table.len(), "Wrote cache file");
        Ok(table)
    }
}
