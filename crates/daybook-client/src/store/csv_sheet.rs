use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::dataset::Transaction;
use crate::state::{map_sheet_read_error, map_sheet_write_error};
use crate::store::{RawRecord, RecordStore, SHEET_HEADERS, cell_for};
use crate::{ClientError, ClientResult};

/// A worksheet exported as CSV: one header row, then one transaction per row.
#[derive(Debug, Clone)]
pub struct CsvSheetStore {
    path: PathBuf,
}

impl CsvSheetStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl RecordStore for CsvSheetStore {
    fn fetch_all(&self) -> ClientResult<Vec<RawRecord>> {
        let content = fs::read_to_string(&self.path)
            .map_err(|error| map_sheet_read_error(&self.path, &error))?;
        let records = parse_sheet(&content, &self.path)?;
        tracing::info!(
            sheet = %self.path.display(),
            rows = records.len(),
            "fetched sheet rows"
        );
        Ok(records)
    }

    fn append(&self, rows: &[Transaction]) -> ClientResult<usize> {
        let existing = fs::read_to_string(&self.path)
            .map_err(|error| map_sheet_write_error(&self.path, &error))?;
        let headers = read_headers(&existing, &self.path)?;

        let mut body = Vec::new();
        if !existing.is_empty() && !existing.ends_with('\n') {
            body.push(b'\n');
        }
        {
            let mut writer = csv::WriterBuilder::new()
                .has_headers(false)
                .from_writer(&mut body);
            if headers.is_none() {
                writer
                    .write_record(SHEET_HEADERS)
                    .map_err(|error| ClientError::sheet_append_failed(&self.path, &error.to_string()))?;
            }
            let columns = headers.unwrap_or_else(|| {
                SHEET_HEADERS
                    .iter()
                    .map(|value| value.to_string())
                    .collect::<Vec<String>>()
            });
            for transaction in rows {
                let record = columns
                    .iter()
                    .map(|column| cell_for(transaction, column))
                    .collect::<Vec<String>>();
                writer
                    .write_record(&record)
                    .map_err(|error| ClientError::sheet_append_failed(&self.path, &error.to_string()))?;
            }
            writer
                .flush()
                .map_err(|error| ClientError::sheet_append_failed(&self.path, &error.to_string()))?;
        }

        let mut file = OpenOptions::new()
            .append(true)
            .open(&self.path)
            .map_err(|error| map_sheet_write_error(&self.path, &error))?;
        file.write_all(&body)
            .map_err(|error| map_sheet_write_error(&self.path, &error))?;

        tracing::info!(
            sheet = %self.path.display(),
            rows = rows.len(),
            "appended sheet rows"
        );
        Ok(rows.len())
    }
}

fn parse_sheet(content: &str, path: &Path) -> ClientResult<Vec<RawRecord>> {
    if content.trim().is_empty() {
        return Ok(Vec::new());
    }

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(content.as_bytes());

    let headers = reader
        .headers()
        .map_err(|error| ClientError::sheet_unreadable(path, &error.to_string()))?
        .iter()
        .map(|value| value.trim().to_string())
        .collect::<Vec<String>>();

    let mut records = Vec::new();
    for (row_index, result_row) in reader.records().enumerate() {
        let row = (row_index as i64) + 1;
        let record = match result_row {
            Ok(value) => value,
            Err(error) => {
                tracing::warn!(row, %error, "skipping malformed sheet row");
                continue;
            }
        };

        let mut raw = RawRecord::new(row);
        for (index, header) in headers.iter().enumerate() {
            if header.is_empty() {
                continue;
            }
            let value = record.get(index).unwrap_or_default();
            raw.fields.insert(header.clone(), value.to_string());
        }
        records.push(raw);
    }

    Ok(records)
}

fn read_headers(content: &str, path: &Path) -> ClientResult<Option<Vec<String>>> {
    if content.trim().is_empty() {
        return Ok(None);
    }

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(content.as_bytes());
    let headers = reader
        .headers()
        .map_err(|error| ClientError::sheet_append_failed(path, &error.to_string()))?
        .iter()
        .map(|value| value.trim().to_string())
        .collect::<Vec<String>>();
    Ok(Some(headers))
}
