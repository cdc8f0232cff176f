use std::fs;
use std::path::{Path, PathBuf};

use daybook_client::SuccessEnvelope;
use daybook_client::store::SHEET_HEADERS;
use serde_json::Value;
use tempfile::{Builder, TempDir};

pub fn temp_home_in_tmp(prefix: &str) -> std::io::Result<(TempDir, PathBuf)> {
    let dir = Builder::new().prefix(prefix).tempdir_in("/tmp")?;
    let home = dir.path().join("daybook-home");
    fs::create_dir_all(&home)?;
    Ok((dir, home))
}

/// One sheet row; fields not named here get plausible defaults.
#[derive(Debug, Clone)]
pub struct SheetRow {
    pub city: String,
    pub customer_type: String,
    pub gender: String,
    pub product_line: String,
    pub payment: String,
    pub quantity: String,
    pub total: String,
    pub time: String,
    pub rating: String,
    pub date: String,
}

pub fn sale(date: &str, city: &str, total: f64, quantity: i64) -> SheetRow {
    SheetRow {
        city: city.to_string(),
        customer_type: "Normal".to_string(),
        gender: "Mulher".to_string(),
        product_line: "Moda".to_string(),
        payment: "Debito".to_string(),
        quantity: quantity.to_string(),
        total: total.to_string(),
        time: "10:30".to_string(),
        rating: "8.0".to_string(),
        date: date.to_string(),
    }
}

impl SheetRow {
    pub fn payment(mut self, payment: &str) -> Self {
        self.payment = payment.to_string();
        self
    }

    pub fn product_line(mut self, product_line: &str) -> Self {
        self.product_line = product_line.to_string();
        self
    }

    pub fn time(mut self, time: &str) -> Self {
        self.time = time.to_string();
        self
    }

    fn cells(&self, index: usize) -> Vec<String> {
        vec![
            format!("{:03}-00-{:04}", index % 1000, index),
            self.city.clone(),
            self.customer_type.clone(),
            self.gender.clone(),
            self.product_line.clone(),
            "10.00".to_string(),
            self.quantity.clone(),
            self.total.clone(),
            self.time.clone(),
            self.payment.clone(),
            self.rating.clone(),
            self.date.clone(),
        ]
    }
}

pub fn sheet_path(home: &Path) -> PathBuf {
    home.join("sales.csv")
}

pub fn write_sheet(home: &Path, rows: &[SheetRow]) -> std::io::Result<PathBuf> {
    let mut body = SHEET_HEADERS.join(",");
    body.push('\n');
    for (index, row) in rows.iter().enumerate() {
        let cells = row
            .cells(index + 1)
            .into_iter()
            .map(|cell| {
                if cell.contains(',') {
                    format!("\"{cell}\"")
                } else {
                    cell
                }
            })
            .collect::<Vec<String>>();
        body.push_str(&cells.join(","));
        body.push('\n');
    }
    let path = sheet_path(home);
    fs::write(&path, body)?;
    Ok(path)
}

pub fn envelope_value(result: daybook_client::ClientResult<SuccessEnvelope>) -> Value {
    assert!(result.is_ok());
    if let Ok(success) = result {
        let payload = serde_json::to_value(success);
        assert!(payload.is_ok());
        if let Ok(value) = payload {
            return value;
        }
    }
    Value::Null
}

/// The records of one named table inside a `report` payload.
pub fn report_records(payload: &Value, name: &str) -> Vec<Value> {
    payload["data"]["reports"]
        .as_array()
        .and_then(|reports| {
            reports
                .iter()
                .find(|report| report["name"].as_str() == Some(name))
        })
        .and_then(|report| report["records"].as_array().cloned())
        .unwrap_or_default()
}

pub fn record_for<'a>(records: &'a [Value], key: &str, value: &str) -> Option<&'a Value> {
    records
        .iter()
        .find(|record| record[key].as_str() == Some(value))
}
