//! Opaque tabular data and its CSV cache format.
//!
//! The on-disk layout carries a leading row-index column: the header row
//! starts with an empty name and each data row starts with its 0-based
//! position. The index column is written for compatibility and dropped on
//! read; it is never part of the payload.
//!
//! Files are replaced atomically: the CSV goes to a sibling `.tmp` file that
//! is then renamed over the target, so a failed write never leaves a
//! truncated cache behind.

use crate::error::Result;
use std::ffi::OsString;
use std::io;
use std::iter;
use std::path::{Path, PathBuf};
use tokio::fs;

/// Column names plus rows of text cells. SQL `NULL` is stored as an empty
/// cell, so `NULL` and `""` are indistinguishable once cached.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(columns: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { columns, rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Cells of the named column, top to bottom.
    pub fn column(&self, name: &str) -> Option<Vec<&str>> {
        let idx = self.columns.iter().position(|c| c == name)?;
        Some(
            self.rows
                .iter()
                .map(|row| row.get(idx).map(String::as_str).unwrap_or_default())
                .collect(),
        )
    }

    pub fn write_csv<W: io::Write>(&self, writer: W) -> Result<()> {
        let mut wtr = csv::Writer::from_writer(writer);
        wtr.write_record(iter::once("").chain(self.columns.iter().map(String::as_str)))?;
        for (i, row) in self.rows.iter().enumerate() {
            let index = i.to_string();
            wtr.write_record(
                iter::once(index.as_str()).chain(row.iter().map(String::as_str)),
            )?;
        }
        wtr.flush()?;
        Ok(())
    }

    /// Read a table written by [`Table::write_csv`], discarding the index column.
    pub fn read_csv<R: io::Read>(reader: R) -> Result<Self> {
        let mut rdr = csv::ReaderBuilder::new().has_headers(true).from_reader(reader);
        let columns = rdr.headers()?.iter().skip(1).map(String::from).collect();
        let mut rows = Vec::new();
        for record in rdr.records() {
            rows.push(record?.iter().skip(1).map(String::from).collect());
        }
        Ok(Self { columns, rows })
    }

    /// Write the table to `path`, replacing any existing file in one step.
    ///
    /// # Arguments
    ///
    /// * `path` - Destination file; its directory must already exist
    ///
    /// # Returns
    ///
    /// `Ok(())` once the file is in place. On error the previous file (if
    /// any) is untouched and the temporary file has been removed.
    pub async fn to_csv_path(&self, path: &Path) -> Result<()> {
        let mut buf = Vec::new();
        self.write_csv(&mut buf)?;

        let tmp = temp_path(path);
        fs::write(&tmp, &buf).await?;
        if let Err(e) = fs::rename(&tmp, path).await {
            let _ = fs::remove_file(&tmp).await;
            return Err(e.into());
        }
        Ok(())
    }

    pub async fn from_csv_path(path: &Path) -> Result<Self> {
        let bytes = fs::read(path).await?;
        Self::read_csv(bytes.as_slice())
    }
}

/// `spam.csv` -> `spam.csv.tmp`, in the same directory so the rename stays
/// on one filesystem.
fn temp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(OsString::from)
        .unwrap_or_else(|| OsString::from("table"));
    name.push(".tmp");
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AcquireError;

    fn sample() -> Table {
        Table::new(
            vec!["label".to_string(), "text".to_string()],
            vec![
                vec!["ham".to_string(), "Ok lar... Joking wif u oni...".to_string()],
                vec![
                    "spam".to_string(),
                    "WINNER!! Claim \"now\", call 09061701461\nT&C apply".to_string(),
                ],
                vec!["ham".to_string(), String::new()],
            ],
        )
    }

    #[test]
    fn test_csv_layout_has_index_column() {
        let mut buf = Vec::new();
        sample().write_csv(&mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some(",label,text"));
        assert_eq!(lines.next(), Some("0,ham,Ok lar... Joking wif u oni..."));
    }

    #[test]
    fn test_csv_round_trip_preserves_cells_and_order() {
        let table = sample();
        let mut buf = Vec::new();
        table.write_csv(&mut buf).unwrap();
        let back = Table::read_csv(buf.as_slice()).unwrap();
        assert_eq!(back, table);
    }

    #[test]
    fn test_read_drops_foreign_index_values() {
        let csv = ",label,text\n17,spam,Free entry\n42,ham,See you\n";
        let table = Table::read_csv(csv.as_bytes()).unwrap();
        assert_eq!(table.columns, vec!["label", "text"]);
        assert_eq!(table.column("label").unwrap(), vec!["spam", "ham"]);
        assert_eq!(table.column("missing"), None);
    }

    #[test]
    fn test_ragged_rows_are_format_errors() {
        let csv = ",label,text\n0,spam\n";
        assert!(matches!(
            Table::read_csv(csv.as_bytes()),
            Err(AcquireError::CacheFormat(_))
        ));
    }

    #[tokio::test]
    async fn test_path_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("spam.csv");
        sample().to_csv_path(&path).await.unwrap();
        assert_eq!(Table::from_csv_path(&path).await.unwrap(), sample());
        assert!(!dir.path().join("spam.csv.tmp").exists());
    }

    #[tokio::test]
    async fn test_overwrite_replaces_whole_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("spam.csv");
        sample().to_csv_path(&path).await.unwrap();

        let smaller = Table::new(vec!["label".to_string()], vec![vec!["ham".to_string()]]);
        smaller.to_csv_path(&path).await.unwrap();
        assert_eq!(Table::from_csv_path(&path).await.unwrap(), smaller);
    }

    #[tokio::test]
    async fn test_failed_write_leaves_no_partial_file() {
        let dir = tempfile::tempdir().unwrap();
        // A non-empty directory at the target path makes the final rename fail.
        let path = dir.path().join("spam.csv");
        std::fs::create_dir(&path).unwrap();
        std::fs::write(path.join("keep"), b"").unwrap();

        let err = sample().to_csv_path(&path).await.unwrap_err();
        assert!(matches!(err, AcquireError::CacheIo(_)));
        assert!(!dir.path().join("spam.csv.tmp").exists());
        assert!(path.join("keep").exists());
    }

    #[test]
    fn test_temp_path_is_sibling() {
        assert_eq!(
            temp_path(Path::new("/var/cache/spam.csv")),
            PathBuf::from("/var/cache/spam.csv.tmp")
        );
    }
}
