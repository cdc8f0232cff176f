use std::io;

use serde_json::{Map, Value};

use super::format::{self, Align, Column};

pub fn render_days(data: &Value) -> io::Result<String> {
    let days = data
        .get("days")
        .and_then(Value::as_array)
        .ok_or_else(|| io::Error::other("days output requires days"))?;
    let source = get_str(data, "sheet_source");

    if days.is_empty() {
        return Ok([
            format!("No sales days found in {source}."),
            String::new(),
            "Append a synthetic day:".to_string(),
            "  daybook simulate".to_string(),
        ]
        .join("\n"));
    }

    let mut lines = vec![
        if days.len() == 1 {
            "1 day with sales.".to_string()
        } else {
            format!("{} days with sales.", days.len())
        },
        String::new(),
    ];

    let columns = [
        Column {
            name: "Date",
            align: Align::Left,
        },
        Column {
            name: "Rows",
            align: Align::Right,
        },
        Column {
            name: "Total",
            align: Align::Right,
        },
        Column {
            name: "Quantity",
            align: Align::Right,
        },
    ];
    let rows = days
        .iter()
        .map(|day| {
            vec![
                get_str(day, "date"),
                get_i64(day, "rows").to_string(),
                format!("R${:.2}", day.get("total").and_then(Value::as_f64).unwrap_or(0.0)),
                get_i64(day, "quantity").to_string(),
            ]
        })
        .collect::<Vec<Vec<String>>>();
    lines.extend(format::render_table_or_blocks(
        &columns,
        &rows,
        format::terminal_width(),
        "Day",
    ));

    if let Some(summary) = data.get("normalization").and_then(Value::as_object) {
        let dropped = get_field_i64(summary, "rows_read") - get_field_i64(summary, "rows_kept");
        lines.push(String::new());
        lines.push("Sheet:".to_string());
        lines.extend(format::key_value_rows(
            &[
                ("Source:", source),
                ("Rows read:", get_field_i64(summary, "rows_read").to_string()),
                ("Rows skipped:", dropped.to_string()),
            ],
            2,
        ));
    }

    lines.push(String::new());
    lines.push("What to do next:".to_string());
    lines.push("  daybook report --date <YYYY-MM-DD>".to_string());
    Ok(lines.join("\n"))
}

pub fn render_simulate(data: &Value) -> io::Result<String> {
    let date = data
        .get("date")
        .and_then(Value::as_str)
        .ok_or_else(|| io::Error::other("simulate output requires date"))?;
    let selectable = data
        .get("selectable")
        .and_then(Value::as_bool)
        .unwrap_or(false);

    let mut lines = vec![
        format!("Simulated sales for {date}."),
        String::new(),
        "Summary:".to_string(),
    ];
    let mut entries = vec![
        ("Sheet:", get_str(data, "sheet_source")),
        ("Rows appended:", get_i64(data, "rows_appended").to_string()),
        (
            "Total:",
            format!("R${:.2}", data.get("total").and_then(Value::as_f64).unwrap_or(0.0)),
        ),
        ("Quantity:", get_i64(data, "quantity").to_string()),
    ];
    if let Some(seed) = data.get("seed").and_then(Value::as_u64) {
        entries.push(("Seed:", seed.to_string()));
    }
    lines.extend(format::key_value_rows(&entries, 2));

    lines.push(String::new());
    if selectable {
        lines.push("What to do next:".to_string());
        lines.push(format!("  {}", get_str(data, "next_step")));
    } else {
        lines.push(format!(
            "{date} is not listed yet; run `daybook days` to check the sheet."
        ));
    }
    Ok(lines.join("\n"))
}

fn get_str(value: &Value, key: &str) -> String {
    value
        .get(key)
        .and_then(Value::as_str)
        .unwrap_or("")
        .to_string()
}

fn get_i64(value: &Value, key: &str) -> i64 {
    value.get(key).and_then(Value::as_i64).unwrap_or(0)
}

fn get_field_i64(map: &Map<String, Value>, key: &str) -> i64 {
    map.get(key).and_then(Value::as_i64).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{render_days, render_simulate};

    #[test]
    fn days_render_as_a_table_with_sheet_summary() {
        let data = json!({
            "sheet_source": "/tmp/sales.csv",
            "earliest": "2026-01-05",
            "latest": "2026-01-06",
            "days": [
                {"date": "2026-01-06", "rows": 2, "total": 150.5, "quantity": 3},
                {"date": "2026-01-05", "rows": 1, "total": 10.0, "quantity": 1}
            ],
            "normalization": {"rows_read": 4, "rows_kept": 3}
        });

        let rendered = render_days(&data);
        assert!(rendered.is_ok());
        if let Ok(text) = rendered {
            assert!(text.starts_with("2 days with sales."));
            assert!(text.contains("2026-01-06"));
            assert!(text.contains("R$150.50"));
            assert!(text.contains("Rows skipped:  1"));
        }
    }

    #[test]
    fn empty_sheet_points_at_simulate() {
        let rendered = render_days(&json!({"sheet_source": "/tmp/sales.csv", "days": []}));
        assert!(rendered.is_ok());
        if let Ok(text) = rendered {
            assert!(text.contains("No sales days found"));
            assert!(text.contains("daybook simulate"));
        }
    }

    #[test]
    fn simulate_summary_lists_next_step() {
        let data = json!({
            "sheet_source": "/tmp/sales.csv",
            "date": "2026-01-07",
            "rows_appended": 120,
            "total": 54321.5,
            "quantity": 960,
            "seed": 9,
            "selectable": true,
            "next_step": "daybook report --date 2026-01-07"
        });

        let rendered = render_simulate(&data);
        assert!(rendered.is_ok());
        if let Ok(text) = rendered {
            assert!(text.starts_with("Simulated sales for 2026-01-07."));
            assert!(text.contains("R$54321.50"));
            assert!(text.contains("Seed:"));
            assert!(text.contains("  daybook report --date 2026-01-07"));
        }
    }

    #[test]
    fn simulate_requires_a_date() {
        assert!(render_simulate(&json!({})).is_err());
    }
}
