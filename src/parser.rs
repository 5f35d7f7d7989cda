//! Record sources
//!
//! The pipeline works on already-tokenized rows. This module produces them:
//! [`CsvFileSource`] reads a ledger export from disk, and any `Vec<RawRow>`
//! can stand in as an in-memory source.
//!
//! A source that cannot be read is fatal for the run: nothing is partially
//! computed. The CSV reader is strict about row length, so a row with a
//! different number of columns than the header makes the whole file
//! unreadable rather than silently shifting fields.

use crate::models::RawRow;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Anything that can hand the pipeline its full set of rows.
pub trait RecordSource {
    fn read_rows(&self) -> Result<Vec<RawRow>>;

    fn describe(&self) -> String;
}

#[derive(Debug, Clone)]
pub struct CsvFileSource {
    path: PathBuf,
}

impl CsvFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl RecordSource for CsvFileSource {
    fn read_rows(&self) -> Result<Vec<RawRow>> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(false)
            .from_path(&self.path)
            .with_context(|| format!("Failed to open ledger file: {}", self.path.display()))?;

        let mut rows = Vec::new();
        for (idx, result) in reader.records().enumerate() {
            let record = result.with_context(|| {
                format!(
                    "Failed to read row {} of ledger file: {}",
                    idx + 2,
                    self.path.display()
                )
            })?;
            rows.push(record.iter().map(str::to_string).collect());
        }

        if rows.is_empty() {
            warn!(path = %self.path.display(), "Ledger file contains no data rows");
        }
        debug!(path = %self.path.display(), rows = rows.len(), "Read ledger file");

        Ok(rows)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

impl RecordSource for Vec<RawRow> {
    fn read_rows(&self) -> Result<Vec<RawRow>> {
        Ok(self.clone())
    }

    fn describe(&self) -> String {
        "<memory>".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_csv(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_header_is_skipped() {
        let file = write_csv(
            "ComputerID,UserID,ApplicationID,ComputerType,Comment\n\
             1,1,374,LAPTOP,Exported from System A\n\
             2,1,374,DESKTOP,Exported from System A\n",
        );

        let rows = CsvFileSource::new(file.path()).read_rows().unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0], vec!["1", "1", "374", "LAPTOP", "Exported from System A"]);
    }

    #[test]
    fn test_missing_file_is_fatal() {
        let err = CsvFileSource::new("/nonexistent/ledger.csv")
            .read_rows()
            .unwrap_err();
        assert!(err.to_string().contains("Failed to open ledger file"));
    }

    #[test]
    fn test_inconsistent_row_length_is_fatal() {
        let file = write_csv(
            "ComputerID,UserID,ApplicationID,ComputerType,Comment\n\
             1,1,374,LAPTOP,ok\n\
             2,1,374\n",
        );

        let err = CsvFileSource::new(file.path()).read_rows().unwrap_err();
        assert!(err.to_string().contains("row 3"));
    }

    #[test]
    fn test_empty_file_has_no_rows() {
        let file = write_csv("");
        let rows = CsvFileSource::new(file.path()).read_rows().unwrap();
        assert!(rows.is_empty());
    }
}
