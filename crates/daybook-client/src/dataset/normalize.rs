use chrono::NaiveDate;
use serde::Serialize;

use crate::dataset::date::{parse_fallback_date, parse_flexible_date};
use crate::dataset::{Dataset, Transaction};
use crate::store::{
    COLUMN_CITY, COLUMN_CUSTOMER_TYPE, COLUMN_DATE, COLUMN_GENDER, COLUMN_INVOICE_ID,
    COLUMN_PAYMENT, COLUMN_PRODUCT_LINE, COLUMN_QUANTITY, COLUMN_RATING, COLUMN_TIME,
    COLUMN_TOTAL, COLUMN_UNIT_PRICE, RawRecord,
};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NormalizeSummary {
    pub rows_read: i64,
    pub rows_kept: i64,
    pub dropped_blank: i64,
    pub dropped_invalid_date: i64,
    pub dropped_invalid_number: i64,
    pub dropped_non_positive_total: i64,
    pub dropped_summary_row: i64,
    pub used_fallback_date_format: bool,
}

impl NormalizeSummary {
    pub fn rows_dropped(&self) -> i64 {
        self.rows_read - self.rows_kept
    }
}

/// Coerces raw sheet rows into transactions. Bad rows are dropped and counted, never reported.
pub fn normalize(raw_rows: Vec<RawRecord>) -> Dataset {
    let mut summary = NormalizeSummary {
        rows_read: raw_rows.len() as i64,
        ..NormalizeSummary::default()
    };

    let rows = raw_rows
        .into_iter()
        .filter(|row| {
            let blank = row.is_blank();
            if blank {
                summary.dropped_blank += 1;
            }
            !blank
        })
        .collect::<Vec<RawRecord>>();

    let mut dates = rows
        .iter()
        .map(|row| row.get(COLUMN_DATE).and_then(parse_flexible_date))
        .collect::<Vec<Option<NaiveDate>>>();
    if !rows.is_empty() && dates.iter().all(Option::is_none) {
        dates = rows
            .iter()
            .map(|row| row.get(COLUMN_DATE).and_then(parse_fallback_date))
            .collect();
        summary.used_fallback_date_format = true;
    }

    let mut transactions = Vec::with_capacity(rows.len());
    for (row, date) in rows.iter().zip(dates) {
        let Some(date) = date else {
            summary.dropped_invalid_date += 1;
            continue;
        };

        let total = row.get(COLUMN_TOTAL).and_then(parse_number);
        let quantity = row.get(COLUMN_QUANTITY).and_then(parse_whole_number);
        let (Some(total), Some(quantity)) = (total, quantity) else {
            summary.dropped_invalid_number += 1;
            continue;
        };
        if total <= 0.0 {
            summary.dropped_non_positive_total += 1;
            continue;
        }

        let transaction = Transaction {
            invoice_id: text(row, COLUMN_INVOICE_ID),
            date,
            time: text(row, COLUMN_TIME).trim().to_string(),
            city: text(row, COLUMN_CITY),
            customer_type: text(row, COLUMN_CUSTOMER_TYPE),
            gender: text(row, COLUMN_GENDER),
            product_line: text(row, COLUMN_PRODUCT_LINE),
            payment_method: text(row, COLUMN_PAYMENT),
            unit_price: row.get(COLUMN_UNIT_PRICE).and_then(parse_number),
            quantity,
            total,
            rating: row.get(COLUMN_RATING).and_then(parse_number),
        };
        if transaction.is_summary_row() {
            summary.dropped_summary_row += 1;
            continue;
        }
        transactions.push(transaction);
    }

    summary.rows_kept = transactions.len() as i64;
    if summary.rows_dropped() > 0 {
        tracing::debug!(
            rows_read = summary.rows_read,
            rows_kept = summary.rows_kept,
            blank = summary.dropped_blank,
            invalid_date = summary.dropped_invalid_date,
            invalid_number = summary.dropped_invalid_number,
            non_positive_total = summary.dropped_non_positive_total,
            summary_rows = summary.dropped_summary_row,
            "dropped sheet rows during normalization"
        );
    }

    Dataset {
        transactions,
        summary,
    }
}

fn text(row: &RawRecord, column: &str) -> String {
    row.get(column).unwrap_or_default().to_string()
}

fn parse_number(value: &str) -> Option<f64> {
    let parsed = value.trim().parse::<f64>().ok()?;
    if !parsed.is_finite() {
        return None;
    }
    Some(parsed)
}

fn parse_whole_number(value: &str) -> Option<i64> {
    let trimmed = value.trim();
    if let Ok(whole) = trimmed.parse::<i64>() {
        return Some(whole);
    }
    let parsed = parse_number(trimmed)?;
    if parsed.fract() != 0.0 || parsed.abs() > i64::MAX as f64 {
        return None;
    }
    Some(parsed as i64)
}
