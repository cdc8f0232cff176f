use std::io;

use daybook_client::report::{Cell, CellFormat, ColumnRole, TableColumn};
use serde_json::Value;

use super::format::{self, Align, Column};

pub fn render_report(data: &Value) -> io::Result<String> {
    let reports = data
        .get("reports")
        .and_then(Value::as_array)
        .ok_or_else(|| io::Error::other("report output requires reports"))?;

    let mut lines = render_day_header(data);
    for report in reports {
        lines.push(String::new());
        lines.extend(render_report_table(report)?);
    }

    lines.push(String::new());
    lines.extend(render_alert_sections(data));
    Ok(lines.join("\n"))
}

pub fn render_alerts(data: &Value) -> io::Result<String> {
    if data.get("alerts").is_none() {
        return Err(io::Error::other("alerts output requires alerts"));
    }
    let mut lines = render_day_header(data);
    lines.push(String::new());
    lines.extend(render_alert_sections(data));
    Ok(lines.join("\n"))
}

fn render_day_header(data: &Value) -> Vec<String> {
    let date = get_str(data, "date");
    let first_day = data
        .get("is_first_day")
        .and_then(Value::as_bool)
        .unwrap_or(false);

    let mut lines = vec![format!("Daily sales report for {date}.")];
    let mut entries = Vec::new();
    if let Some(rows) = data.get("current_rows").and_then(Value::as_u64) {
        entries.push(("Sales:", rows.to_string()));
    }
    if first_day {
        entries.push(("Compared with:", "no sales the day before (changes are N/A)".to_string()));
    } else if let Some(previous) = data.get("previous_date").and_then(Value::as_str) {
        let previous_rows = data
            .get("previous_rows")
            .and_then(Value::as_u64)
            .map(|rows| format!(" ({rows} sales)"))
            .unwrap_or_default();
        entries.push(("Compared with:", format!("{previous}{previous_rows}")));
    }
    if !entries.is_empty() {
        lines.push(String::new());
        lines.extend(format::key_value_rows(&entries, 2));
    }
    lines
}

fn render_report_table(report: &Value) -> io::Result<Vec<String>> {
    let title = get_str(report, "title");
    let columns = report
        .get("columns")
        .cloned()
        .map(serde_json::from_value::<Vec<TableColumn>>)
        .transpose()
        .map_err(io::Error::other)?
        .ok_or_else(|| io::Error::other("report table requires columns"))?;
    let records = report
        .get("records")
        .and_then(Value::as_array)
        .ok_or_else(|| io::Error::other("report table requires records"))?;

    let mut lines = vec![format!("{title}:")];
    if records.is_empty() {
        lines.push("  No rows.".to_string());
        return Ok(lines);
    }

    let layout = columns
        .iter()
        .map(|column| Column {
            name: column.name.as_str(),
            align: if column.format == CellFormat::Text {
                Align::Left
            } else {
                Align::Right
            },
        })
        .collect::<Vec<Column<'_>>>();
    let rows = records
        .iter()
        .map(|record| {
            columns
                .iter()
                .map(|column| render_cell(record.get(&column.name), column))
                .collect::<Vec<String>>()
        })
        .collect::<Vec<Vec<String>>>();

    lines.extend(format::render_table_or_blocks(
        &layout,
        &rows,
        format::terminal_width(),
        "Row",
    ));
    Ok(lines)
}

/// Renders from the same rounded value the JSON carries, so both surfaces agree.
fn render_cell(value: Option<&Value>, column: &TableColumn) -> String {
    let cell = Cell::from_json(value.unwrap_or(&Value::Null), column.format);
    cell.display(column.role == ColumnRole::Delta)
}

fn render_alert_sections(data: &Value) -> Vec<String> {
    let alerts = data.get("alerts").cloned().unwrap_or(Value::Null);
    let positive = string_items(&alerts, "positive");
    let negative = string_items(&alerts, "negative");

    if positive.is_empty() && negative.is_empty() {
        return vec!["Alerts:".to_string(), "  No alerts for this day.".to_string()];
    }

    let mut lines = Vec::new();
    if !positive.is_empty() {
        lines.push("Positive alerts:".to_string());
        lines.extend(positive.iter().map(|message| format!("  + {message}")));
    }
    if !negative.is_empty() {
        if !lines.is_empty() {
            lines.push(String::new());
        }
        lines.push("Negative alerts:".to_string());
        lines.extend(negative.iter().map(|message| format!("  - {message}")));
    }
    lines
}

fn string_items(value: &Value, key: &str) -> Vec<String> {
    value
        .get(key)
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

fn get_str(value: &Value, key: &str) -> String {
    value
        .get(key)
        .and_then(Value::as_str)
        .unwrap_or("")
        .to_string()
}
