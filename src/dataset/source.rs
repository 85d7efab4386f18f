//! Database side of the dataset cache.
//!
//! [`TableSource`] is the seam between the cache and whatever answers the
//! query. [`SqlTableSource`] is the real implementation: it opens one
//! connection per call through sqlx's `Any` driver, so MySQL, Postgres and
//! SQLite URLs all work.

use super::table::Table;
use crate::error::{AcquireError, Result};
use sqlx::any::{AnyRow, install_default_drivers};
use sqlx::{AnyConnection, Column, Connection, Executor, Row, Statement};
use std::time::Instant;
use tracing::{debug, info, instrument};
use url::Url;

/// Something that can answer a query with a whole table.
pub trait TableSource {
    async fn fetch_table(&self, query: &str) -> Result<Table>;
}

/// `None` stands for "no database configured": fine as long as the cache
/// never misses.
impl<T: TableSource> TableSource for Option<T> {
    async fn fetch_table(&self, query: &str) -> Result<Table> {
        match self {
            Some(source) => source.fetch_table(query).await,
            None => Err(AcquireError::Config(
                "no database URL configured for cache miss".to_string(),
            )),
        }
    }
}

/// Point `server_url` (scheme, credentials, host) at `database`.
///
/// `mysql://user:pw@db.example.com` and `spam_db` give
/// `mysql://user:pw@db.example.com/spam_db`. Any existing path is replaced.
pub fn connection_url(server_url: &str, database: &str) -> Result<String> {
    let mut url = Url::parse(server_url)?;
    url.set_path(&format!("/{database}"));
    Ok(url.to_string())
}

/// SQL-backed [`TableSource`].
#[derive(Clone)]
pub struct SqlTableSource {
    url: String,
}

impl std::fmt::Debug for SqlTableSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // The URL usually carries a password.
        let redacted = Url::parse(&self.url)
            .map(|mut u| {
                if u.password().is_some() {
                    let _ = u.set_password(Some("***"));
                }
                u.to_string()
            })
            .unwrap_or_else(|_| "<unparseable>".to_string());
        f.debug_struct("SqlTableSource").field("url", &redacted).finish()
    }
}

impl SqlTableSource {
    /// Use a complete connection URL as-is.
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }

    /// Connect to `database` on the server described by `server_url`.
    pub fn for_database(server_url: &str, database: &str) -> Result<Self> {
        Ok(Self::new(connection_url(server_url, database)?))
    }
}

/// Render one cell as text, trying the types every `Any` backend can decode.
fn cell_text(row: &AnyRow, index: usize) -> Result<String> {
    if let Ok(v) = row.try_get::<Option<String>, _>(index) {
        return Ok(v.unwrap_or_default());
    }
    if let Ok(v) = row.try_get::<Option<i64>, _>(index) {
        return Ok(v.map(|n| n.to_string()).unwrap_or_default());
    }
    if let Ok(v) = row.try_get::<Option<f64>, _>(index) {
        return Ok(v.map(|n| n.to_string()).unwrap_or_default());
    }
    let v = row.try_get::<Option<bool>, _>(index)?;
    Ok(v.map(|b| b.to_string()).unwrap_or_default())
}

impl TableSource for SqlTableSource {
    #[instrument(level = "info", skip(self), fields(source = ?self))]
    async fn fetch_table(&self, query: &str) -> Result<Table> {
        let t0 = Instant::now();
        install_default_drivers();
        let mut conn = AnyConnection::connect(&self.url).await?;
        debug!("Connected");

        let rows: Vec<AnyRow> = sqlx::query(query).fetch_all(&mut conn).await?;

        let columns: Vec<String> = match rows.first() {
            Some(row) => row.columns().iter().map(|c| c.name().to_string()).collect(),
            // No rows to read names from; ask the statement instead.
            None => (&mut conn)
                .prepare(query)
                .await?
                .columns()
                .iter()
                .map(|c| c.name().to_string())
                .collect(),
        };

        let mut table_rows = Vec::with_capacity(rows.len());
        for row in &rows {
            table_rows.push(
                (0..row.len())
                    .map(|i| cell_text(row, i))
                    .collect::<Result<Vec<_>>>()?,
            );
        }

        conn.close().await?;
        info!(
            rows = table_rows.len(),
            columns = columns.len(),
            elapsed_ms = t0.elapsed().as_millis() as u64,
            "Query complete"
        );
        Ok(Table::new(columns, table_rows))
    }
}
