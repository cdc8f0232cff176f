mod csv_sheet;

use std::collections::BTreeMap;

pub use csv_sheet::CsvSheetStore;

use crate::ClientResult;
use crate::dataset::Transaction;

pub const COLUMN_INVOICE_ID: &str = "Invoice ID";
pub const COLUMN_CITY: &str = "City";
pub const COLUMN_CUSTOMER_TYPE: &str = "Customer type";
pub const COLUMN_GENDER: &str = "Gender";
pub const COLUMN_PRODUCT_LINE: &str = "Product line";
pub const COLUMN_UNIT_PRICE: &str = "Unit price";
pub const COLUMN_QUANTITY: &str = "Quantity";
pub const COLUMN_TOTAL: &str = "Total";
pub const COLUMN_TIME: &str = "Time";
pub const COLUMN_PAYMENT: &str = "Payment";
pub const COLUMN_RATING: &str = "Rating";
pub const COLUMN_DATE: &str = "Data";

/// Worksheet header row, in the order new sheets are written.
pub const SHEET_HEADERS: [&str; 12] = [
    COLUMN_INVOICE_ID,
    COLUMN_CITY,
    COLUMN_CUSTOMER_TYPE,
    COLUMN_GENDER,
    COLUMN_PRODUCT_LINE,
    COLUMN_UNIT_PRICE,
    COLUMN_QUANTITY,
    COLUMN_TOTAL,
    COLUMN_TIME,
    COLUMN_PAYMENT,
    COLUMN_RATING,
    COLUMN_DATE,
];

/// One worksheet row as header -> cell text. `row` is 1-based and excludes the header.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRecord {
    pub row: i64,
    pub fields: BTreeMap<String, String>,
}

impl RawRecord {
    pub fn new(row: i64) -> Self {
        Self {
            row,
            fields: BTreeMap::new(),
        }
    }

    pub fn with_field(mut self, column: &str, value: &str) -> Self {
        self.fields.insert(column.to_string(), value.to_string());
        self
    }

    pub fn get(&self, column: &str) -> Option<&str> {
        self.fields.get(column).map(String::as_str)
    }

    pub fn is_blank(&self) -> bool {
        self.fields.values().all(|value| value.trim().is_empty())
    }
}

/// The spreadsheet the dashboard reads from and appends simulated days to.
pub trait RecordStore: Send + Sync {
    fn fetch_all(&self) -> ClientResult<Vec<RawRecord>>;

    /// Appends rows after the last existing row and returns how many were written.
    fn append(&self, rows: &[Transaction]) -> ClientResult<usize>;
}

/// Cell text for `column` as written on append. Dates always use `YYYY-MM-DD`.
pub(crate) fn cell_for(transaction: &Transaction, column: &str) -> String {
    match column {
        COLUMN_INVOICE_ID => transaction.invoice_id.clone(),
        COLUMN_CITY => transaction.city.clone(),
        COLUMN_CUSTOMER_TYPE => transaction.customer_type.clone(),
        COLUMN_GENDER => transaction.gender.clone(),
        COLUMN_PRODUCT_LINE => transaction.product_line.clone(),
        COLUMN_UNIT_PRICE => transaction
            .unit_price
            .map(|value| value.to_string())
            .unwrap_or_default(),
        COLUMN_QUANTITY => transaction.quantity.to_string(),
        COLUMN_TOTAL => transaction.total.to_string(),
        COLUMN_TIME => transaction.time.clone(),
        COLUMN_PAYMENT => transaction.payment_method.clone(),
        COLUMN_RATING => transaction
            .rating
            .map(|value| value.to_string())
            .unwrap_or_default(),
        COLUMN_DATE => transaction.date.format("%Y-%m-%d").to_string(),
        _ => String::new(),
    }
}
