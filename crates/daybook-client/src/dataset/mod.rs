pub mod cache;
pub mod date;
pub mod normalize;

use chrono::NaiveDate;

pub use cache::DatasetCache;
pub use normalize::{NormalizeSummary, normalize};

/// One sale in canonical shape.
#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    pub invoice_id: String,
    pub date: NaiveDate,
    /// Time of day as recorded on the sheet, usually `HH:MM`.
    pub time: String,
    pub city: String,
    pub customer_type: String,
    pub gender: String,
    pub product_line: String,
    pub payment_method: String,
    pub unit_price: Option<f64>,
    pub quantity: i64,
    /// Taken as given from the sheet, never recomputed from price and quantity.
    pub total: f64,
    pub rating: Option<f64>,
}

impl Transaction {
    /// Spreadsheet summary rows carry "total"/"quantity" in a category column.
    pub fn is_summary_row(&self) -> bool {
        [
            &self.city,
            &self.customer_type,
            &self.gender,
            &self.product_line,
            &self.payment_method,
        ]
        .iter()
        .any(|value| is_summary_label(value))
    }
}

pub(crate) fn is_summary_label(value: &str) -> bool {
    value.eq_ignore_ascii_case("total") || value.eq_ignore_ascii_case("quantity")
}

#[derive(Debug, Clone, Default)]
pub struct Dataset {
    pub transactions: Vec<Transaction>,
    pub summary: NormalizeSummary,
}

impl Dataset {
    pub fn from_transactions(transactions: Vec<Transaction>) -> Self {
        let kept = transactions.len() as i64;
        Self {
            transactions,
            summary: NormalizeSummary {
                rows_read: kept,
                rows_kept: kept,
                ..NormalizeSummary::default()
            },
        }
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    /// Distinct days with data, newest first.
    pub fn days(&self) -> Vec<NaiveDate> {
        let mut days = self
            .transactions
            .iter()
            .map(|transaction| transaction.date)
            .collect::<Vec<NaiveDate>>();
        days.sort_unstable_by(|left, right| right.cmp(left));
        days.dedup();
        days
    }

    pub fn latest_day(&self) -> Option<NaiveDate> {
        self.transactions
            .iter()
            .map(|transaction| transaction.date)
            .max()
    }

    pub fn earliest_day(&self) -> Option<NaiveDate> {
        self.transactions
            .iter()
            .map(|transaction| transaction.date)
            .min()
    }

    pub fn rows_on(&self, day: NaiveDate) -> Vec<&Transaction> {
        self.transactions
            .iter()
            .filter(|transaction| transaction.date == day)
            .collect()
    }
}
