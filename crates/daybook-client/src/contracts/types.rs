use serde::Serialize;
use serde_json::{Map, Value};

use crate::dataset::NormalizeSummary;
use crate::report::{Alerts, ReportTable, TableColumn};

#[derive(Debug, Clone, Serialize)]
pub struct DayEntry {
    pub date: String,
    pub rows: i64,
    pub total: f64,
    pub quantity: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct DaysData {
    pub sheet_source: String,
    pub earliest: Option<String>,
    pub latest: Option<String>,
    pub days: Vec<DayEntry>,
    pub normalization: NormalizeSummary,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReportTableData {
    pub name: String,
    pub title: String,
    pub columns: Vec<TableColumn>,
    pub records: Vec<Map<String, Value>>,
}

impl From<&ReportTable> for ReportTableData {
    fn from(table: &ReportTable) -> Self {
        Self {
            name: table.report.as_str().to_string(),
            title: table.report.title().to_string(),
            columns: table.columns.clone(),
            records: table.to_records(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ReportData {
    pub date: String,
    pub previous_date: String,
    pub is_first_day: bool,
    pub current_rows: usize,
    pub previous_rows: usize,
    pub reports: Vec<ReportTableData>,
    pub alerts: Alerts,
}

#[derive(Debug, Clone, Serialize)]
pub struct AlertsData {
    pub date: String,
    pub is_first_day: bool,
    pub alert_count: usize,
    pub alerts: Alerts,
}

#[derive(Debug, Clone, Serialize)]
pub struct SimulateData {
    pub sheet_source: String,
    pub date: String,
    pub rows_appended: usize,
    pub total: f64,
    pub quantity: i64,
    pub seed: Option<u64>,
    /// Whether a fresh read of the sheet lists `date` among the selectable days.
    pub selectable: bool,
    pub next_step: String,
}

/// Payload of the automation endpoint when a request cannot be answered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiErrorPayload {
    pub erro: String,
}
