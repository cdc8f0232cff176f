use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

use crate::report::{
    Comparison, Crosstab, DailyReport, Delta, Dimension, MeanMetric, MeanTotals, ReportName,
    ReportView, SalesTotals,
};

pub const NOT_APPLICABLE: &str = "N/A";

const MONEY_DECIMALS: i32 = 2;
const RATING_DECIMALS: i32 = 1;

/// A presentation-ready value. Rounding happens when a cell is built, so every
/// surface that reads the cell shows the same number.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Text(String),
    Integer(i64),
    Money(f64),
    Rating(f64),
    NotApplicable,
}

impl Cell {
    pub fn money(value: f64) -> Self {
        Self::Money(round_to(value, MONEY_DECIMALS))
    }

    pub fn rating(value: f64) -> Self {
        Self::Rating(round_to(value, RATING_DECIMALS))
    }

    pub fn to_json(&self) -> Value {
        match self {
            Self::Text(value) => Value::String(value.clone()),
            Self::Integer(value) => json!(value),
            Self::Money(value) | Self::Rating(value) => json!(value),
            Self::NotApplicable => Value::String(NOT_APPLICABLE.to_string()),
        }
    }

    /// Rebuilds a cell from its JSON form. Numbers keep their already-rounded value.
    pub fn from_json(value: &Value, format: CellFormat) -> Self {
        if format != CellFormat::Text && value.as_str() == Some(NOT_APPLICABLE) {
            return Self::NotApplicable;
        }
        match format {
            CellFormat::Text => match value {
                Value::String(text) => Self::Text(text.clone()),
                Value::Null => Self::Text(String::new()),
                other => Self::Text(other.to_string()),
            },
            CellFormat::Integer => value
                .as_i64()
                .map(Self::Integer)
                .unwrap_or(Self::NotApplicable),
            CellFormat::Money => value.as_f64().map(Self::Money).unwrap_or(Self::NotApplicable),
            CellFormat::Rating => value
                .as_f64()
                .map(Self::Rating)
                .unwrap_or(Self::NotApplicable),
        }
    }

    /// Text rendering; `signed` prefixes positive numbers with `+`.
    pub fn display(&self, signed: bool) -> String {
        match (self, signed) {
            (Self::Text(value), _) => value.clone(),
            (Self::Integer(value), false) => value.to_string(),
            (Self::Integer(value), true) => format!("{value:+}"),
            (Self::Money(value), false) => format!("R${value:.2}"),
            (Self::Money(value), true) => format!("R${value:+.2}"),
            (Self::Rating(value), false) => format!("{value:.1}"),
            (Self::Rating(value), true) => format!("{value:+.1}"),
            (Self::NotApplicable, _) => NOT_APPLICABLE.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnRole {
    Key,
    Current,
    Delta,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CellFormat {
    Text,
    Integer,
    Money,
    Rating,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableColumn {
    pub name: String,
    pub role: ColumnRole,
    pub format: CellFormat,
}

impl TableColumn {
    fn new(name: impl Into<String>, role: ColumnRole, format: CellFormat) -> Self {
        Self {
            name: name.into(),
            role,
            format,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReportTable {
    pub report: ReportName,
    pub columns: Vec<TableColumn>,
    pub rows: Vec<Vec<Cell>>,
}

impl ReportTable {
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|column| column.name.as_str()).collect()
    }

    /// Flat records keyed by column name, one per row.
    pub fn to_records(&self) -> Vec<Map<String, Value>> {
        self.rows
            .iter()
            .map(|row| {
                self.columns
                    .iter()
                    .zip(row)
                    .map(|(column, cell)| (column.name.clone(), cell.to_json()))
                    .collect()
            })
            .collect()
    }

    pub fn to_json(&self) -> Value {
        Value::Array(self.to_records().into_iter().map(Value::Object).collect())
    }
}

pub fn report_table(report: &DailyReport, name: ReportName) -> ReportTable {
    match report.view(name) {
        ReportView::Totals {
            dimension,
            comparison,
        } => totals_table(
            name,
            TableColumn::new(dimension.label(), ColumnRole::Key, CellFormat::Text),
            comparison,
            |key| Cell::Text(key.clone()),
        ),
        ReportView::Hourly(comparison) => totals_table(
            name,
            TableColumn::new("Hour", ColumnRole::Key, CellFormat::Integer),
            comparison,
            |hour| Cell::Integer(i64::from(*hour)),
        ),
        ReportView::Mean {
            dimension,
            metric,
            comparison,
        } => mean_table(name, dimension, metric, comparison),
        ReportView::Crosstab(crosstab) => crosstab_table(name, crosstab),
    }
}

fn totals_table<K: Ord>(
    name: ReportName,
    key_column: TableColumn,
    comparison: &Comparison<K, SalesTotals>,
    key_cell: impl Fn(&K) -> Cell,
) -> ReportTable {
    let columns = vec![
        key_column,
        TableColumn::new("Total", ColumnRole::Current, CellFormat::Money),
        TableColumn::new("Quantity", ColumnRole::Current, CellFormat::Integer),
        TableColumn::new("Var. Total", ColumnRole::Delta, CellFormat::Money),
        TableColumn::new("Var. Quantity", ColumnRole::Delta, CellFormat::Integer),
    ];
    let rows = comparison
        .current
        .iter()
        .map(|(key, totals)| {
            let delta = comparison
                .delta
                .get(key)
                .copied()
                .unwrap_or(Delta::NotApplicable);
            let (delta_total, delta_quantity) = match delta {
                Delta::Change(change) => (Cell::money(change.total), Cell::Integer(change.quantity)),
                Delta::NotApplicable => (Cell::NotApplicable, Cell::NotApplicable),
            };
            vec![
                key_cell(key),
                Cell::money(totals.total),
                Cell::Integer(totals.quantity),
                delta_total,
                delta_quantity,
            ]
        })
        .collect();
    ReportTable {
        report: name,
        columns,
        rows,
    }
}

fn mean_table(
    name: ReportName,
    dimension: Dimension,
    metric: MeanMetric,
    comparison: &Comparison<String, MeanTotals>,
) -> ReportTable {
    let (format, cell): (CellFormat, fn(f64) -> Cell) = match metric {
        MeanMetric::Ticket => (CellFormat::Money, Cell::money),
        MeanMetric::Rating => (CellFormat::Rating, Cell::rating),
    };
    let columns = vec![
        TableColumn::new(dimension.label(), ColumnRole::Key, CellFormat::Text),
        TableColumn::new(metric.label(), ColumnRole::Current, format),
        TableColumn::new("Total", ColumnRole::Current, CellFormat::Money),
        TableColumn::new("Transactions", ColumnRole::Current, CellFormat::Integer),
        TableColumn::new(format!("Var. {}", metric.label()), ColumnRole::Delta, format),
        TableColumn::new("Var. Total", ColumnRole::Delta, CellFormat::Money),
        TableColumn::new("Var. Transactions", ColumnRole::Delta, CellFormat::Integer),
    ];
    let rows = comparison
        .current
        .iter()
        .map(|(key, value)| {
            let mut row = vec![
                Cell::Text(key.clone()),
                cell(value.mean),
                Cell::money(value.total),
                Cell::Integer(value.transactions),
            ];
            match comparison.delta.get(key) {
                Some(Delta::Change(change)) => row.extend([
                    cell(change.mean),
                    Cell::money(change.total),
                    Cell::Integer(change.transactions),
                ]),
                _ => row.extend([Cell::NotApplicable, Cell::NotApplicable, Cell::NotApplicable]),
            }
            row
        })
        .collect();
    ReportTable {
        report: name,
        columns,
        rows,
    }
}

fn crosstab_table(name: ReportName, crosstab: &Crosstab) -> ReportTable {
    let mut columns = crosstab
        .row_dimensions
        .iter()
        .map(|dimension| TableColumn::new(dimension.label(), ColumnRole::Key, CellFormat::Text))
        .collect::<Vec<TableColumn>>();

    let mut taken = columns
        .iter()
        .map(|column| column.name.clone())
        .collect::<BTreeSet<String>>();
    taken.extend(crosstab.column_keys.iter().map(|key| delta_column_name(key)));
    let value_names = crosstab
        .column_keys
        .iter()
        .map(|key| {
            if taken.contains(key) {
                format!("{}: {key}", crosstab.column_dimension.label())
            } else {
                key.clone()
            }
        })
        .collect::<Vec<String>>();

    columns.extend(
        value_names
            .iter()
            .map(|name| TableColumn::new(name.clone(), ColumnRole::Current, CellFormat::Integer)),
    );
    columns.extend(value_names.iter().map(|name| {
        TableColumn::new(delta_column_name(name), ColumnRole::Delta, CellFormat::Integer)
    }));

    let rows = crosstab
        .row_keys
        .iter()
        .zip(crosstab.current.iter().zip(&crosstab.delta))
        .map(|(row_key, (current, delta))| {
            let mut row = row_key
                .iter()
                .map(|value| Cell::Text(value.clone()))
                .collect::<Vec<Cell>>();
            row.extend(current.iter().map(|count| Cell::Integer(*count)));
            row.extend(delta.iter().map(|change| match change {
                Delta::Change(change) => Cell::Integer(*change),
                Delta::NotApplicable => Cell::NotApplicable,
            }));
            row
        })
        .collect();

    ReportTable {
        report: name,
        columns,
        rows,
    }
}

fn delta_column_name(value_column: &str) -> String {
    format!("{value_column} (Var)")
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10_f64.powi(decimals);
    let rounded = (value * factor).round() / factor;
    // Collapse -0.0 so tiny negative deltas do not render as "-0.00".
    if rounded == 0.0 { 0.0 } else { rounded }
}
