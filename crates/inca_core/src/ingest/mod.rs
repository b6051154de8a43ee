use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// In-memory tabular input handed to the schema normalizer.
///
/// The engine owns no file or network I/O; the excluded loader layer produces either this
/// structure directly or CSV export text for [`parse_csv_table`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    /// Trimmed, non-empty cell at (row, column index). Ragged rows read as missing cells.
    pub fn cell(&self, row_idx: usize, col_idx: usize) -> Option<&str> {
        self.rows
            .get(row_idx)
            .and_then(|row| row.get(col_idx))
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }
}

/// Parse CSV export text into a [`RawTable`].
pub fn parse_csv_table(csv_text: &str) -> Result<RawTable, EngineError> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(csv_text.as_bytes());

    let headers = rdr
        .headers()
        .map_err(|e| {
            EngineError::new("INGEST_CSV_HEADERS_FAILED", "Failed to read CSV headers")
                .with_details(e.to_string())
        })?
        .iter()
        .map(|h| h.to_string())
        .collect::<Vec<_>>();

    let mut rows = Vec::new();
    for result in rdr.records() {
        let row = result.map_err(|e| {
            EngineError::new("INGEST_CSV_PARSE_FAILED", "Failed to parse CSV row")
                .with_details(e.to_string())
        })?;
        rows.push(row.iter().map(|v| v.to_string()).collect::<Vec<_>>());
    }

    Ok(RawTable { headers, rows })
}
