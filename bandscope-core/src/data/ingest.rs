//! CSV ingestion into a raw, untyped table.
//!
//! Every cell is kept as the string found in the file. Typing happens later,
//! after the validator has had a chance to report on the raw values.

use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Errors that make a file unusable as tabular data.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("the file is empty")]
    Empty,

    #[error("the file has a header row but no data rows")]
    NoRows,
}

impl LoadError {
    /// Remediation text shown next to the error.
    pub fn suggestion(&self) -> &'static str {
        match self {
            LoadError::Io { .. } => "Check that the file exists and is readable.",
            LoadError::Csv(_) => "Please ensure the file is a valid UTF-8 CSV with the same number of fields on every row.",
            LoadError::Empty => "Please upload a file with a header row and data.",
            LoadError::NoRows => "Please ensure the file contains at least one row of data.",
        }
    }
}

/// A header row plus string cells, exactly as read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawTable {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl RawTable {
    /// Build a table from parts. Short rows read as empty cells.
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { headers, rows }
    }

    /// Read a CSV file from disk.
    pub fn from_path(path: &Path) -> Result<Self, LoadError> {
        let file = File::open(path).map_err(|source| LoadError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let table = Self::from_reader(file)?;
        tracing::info!(
            path = %path.display(),
            rows = table.row_count(),
            columns = table.column_count(),
            "loaded CSV"
        );
        Ok(table)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, LoadError> {
        Self::from_reader(bytes)
    }

    /// Parse CSV from any reader. The first record is the header row.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, LoadError> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(false)
            .from_reader(reader);

        let headers: Vec<String> = reader
            .headers()?
            .iter()
            .enumerate()
            .map(|(i, h)| {
                if i == 0 {
                    h.trim_start_matches('\u{feff}').to_string()
                } else {
                    h.to_string()
                }
            })
            .collect();

        if headers.is_empty() || headers.iter().all(|h| h.trim().is_empty()) {
            return Err(LoadError::Empty);
        }

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record?;
            rows.push(record.iter().map(str::to_string).collect());
        }

        if rows.is_empty() {
            return Err(LoadError::NoRows);
        }

        Ok(Self { headers, rows })
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.headers.len()
    }

    /// Cell at (row, column); empty when out of range.
    pub fn cell(&self, row: usize, column: usize) -> &str {
        self.rows
            .get(row)
            .and_then(|r| r.get(column))
            .map(String::as_str)
            .unwrap_or("")
    }

    /// All cells of one column, top to bottom.
    pub fn column(&self, column: usize) -> impl Iterator<Item = &str> + '_ {
        (0..self.rows.len()).map(move |row| self.cell(row, column))
    }

    /// BLAKE3 digest over headers and cells.
    ///
    /// Fields are length-prefixed so that moving text between adjacent
    /// cells changes the digest.
    pub fn fingerprint(&self) -> String {
        let mut hasher = blake3::Hasher::new();
        hasher.update(&(self.headers.len() as u64).to_le_bytes());
        for header in &self.headers {
            hasher.update(&(header.len() as u64).to_le_bytes());
            hasher.update(header.as_bytes());
        }
        for row in &self.rows {
            hasher.update(&(row.len() as u64).to_le_bytes());
            for cell in row {
                hasher.update(&(cell.len() as u64).to_le_bytes());
                hasher.update(cell.as_bytes());
            }
        }
        hasher.finalize().to_hex().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_headers_and_rows() {
        let csv = "Year,Symbol,Close\n2023,AAPL,145.30\n2024,MSFT,410.00\n";
        let table = RawTable::from_bytes(csv.as_bytes()).unwrap();
        assert_eq!(table.headers(), &["Year", "Symbol", "Close"]);
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.cell(1, 1), "MSFT");
        assert_eq!(table.cell(9, 9), "");
        let closes: Vec<&str> = table.column(2).collect();
        assert_eq!(closes, vec!["145.30", "410.00"]);
    }

    #[test]
    fn strips_bom_from_first_header() {
        let csv = "\u{feff}年度,代號\n2023,2330\n";
        let table = RawTable::from_bytes(csv.as_bytes()).unwrap();
        assert_eq!(table.headers()[0], "年度");
    }

    #[test]
    fn quoted_fields_keep_commas() {
        let csv = "Symbol,Close\nAAPL,\"$1,234.56\"\n";
        let table = RawTable::from_bytes(csv.as_bytes()).unwrap();
        assert_eq!(table.cell(0, 1), "$1,234.56");
    }

    #[test]
    fn empty_file_is_rejected() {
        assert!(matches!(RawTable::from_bytes(b""), Err(LoadError::Empty)));
    }

    #[test]
    fn header_only_is_rejected() {
        let result = RawTable::from_bytes(b"Year,Symbol\n");
        assert!(matches!(result, Err(LoadError::NoRows)));
    }

    #[test]
    fn ragged_rows_are_rejected() {
        let csv = "Year,Symbol,Close\n2023,AAPL\n";
        let result = RawTable::from_bytes(csv.as_bytes());
        assert!(matches!(result, Err(LoadError::Csv(_))));
    }

    #[test]
    fn invalid_utf8_is_rejected() {
        let bytes = b"Year,Symbol\n2023,\xff\xfe\n";
        assert!(matches!(RawTable::from_bytes(bytes), Err(LoadError::Csv(_))));
    }

    #[test]
    fn missing_file_is_io_error() {
        let result = RawTable::from_path(Path::new("/nonexistent/valuations.csv"));
        assert!(matches!(result, Err(LoadError::Io { .. })));
    }

    #[test]
    fn fingerprint_is_stable_and_content_sensitive() {
        let a = RawTable::from_bytes(b"A,B\n1,2\n").unwrap();
        let b = RawTable::from_bytes(b"A,B\n1,2\n").unwrap();
        let c = RawTable::from_bytes(b"A,B\n12,\n").unwrap();
        assert_eq!(a.fingerprint(), b.fingerprint());
        assert_ne!(a.fingerprint(), c.fingerprint());
        assert_eq!(a.fingerprint().len(), 64);
    }
}
