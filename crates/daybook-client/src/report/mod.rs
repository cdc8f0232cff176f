pub mod aggregate;
pub mod alerts;
pub mod table;

use std::collections::BTreeMap;
use std::ops::Sub;

use chrono::NaiveDate;

use crate::dataset::date::hour_of_day;
use crate::dataset::{Dataset, Transaction};
use crate::report::aggregate::{compare, compare_crosstab, count_matrix, mean_by, sum_by};

pub use alerts::{ALERT_POLICY_V1, AlertPolicy, Alerts, evaluate};
pub use table::{Cell, CellFormat, ColumnRole, ReportTable, TableColumn, report_table};

/// Day-over-day change for one cell.
///
/// `NotApplicable` only appears when the previous calendar day has no rows at
/// all; a category missing on one side still yields a numeric `Change`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Delta<T> {
    Change(T),
    NotApplicable,
}

impl<T: Copy> Delta<T> {
    pub fn value(self) -> Option<T> {
        match self {
            Self::Change(value) => Some(value),
            Self::NotApplicable => None,
        }
    }

    pub fn is_not_applicable(self) -> bool {
        matches!(self, Self::NotApplicable)
    }
}

/// Values a report can hold. `Default` is the fill value for a missing category.
pub trait Metric: Copy + Default + Sub<Output = Self> {}

impl Metric for f64 {}
impl Metric for i64 {}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SalesTotals {
    pub total: f64,
    pub quantity: i64,
}

impl Sub for SalesTotals {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self {
            total: self.total - rhs.total,
            quantity: self.quantity - rhs.quantity,
        }
    }
}

impl Metric for SalesTotals {}

/// A per-key mean plus the revenue and transaction count of the same rows.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MeanTotals {
    pub mean: f64,
    pub total: f64,
    pub transactions: i64,
}

impl Sub for MeanTotals {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self {
            mean: self.mean - rhs.mean,
            total: self.total - rhs.total,
            transactions: self.transactions - rhs.transactions,
        }
    }
}

impl Metric for MeanTotals {}

/// A keyed metric for the target day and its delta against the previous day.
#[derive(Debug, Clone, PartialEq)]
pub struct Comparison<K: Ord, V> {
    pub current: BTreeMap<K, V>,
    pub delta: BTreeMap<K, Delta<V>>,
}

impl<K: Ord, V: Copy> Comparison<K, V> {
    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.current.keys()
    }

    pub fn get(&self, key: &K) -> Option<(V, Delta<V>)> {
        let current = self.current.get(key)?;
        let delta = self.delta.get(key)?;
        Some((*current, *delta))
    }

    pub fn len(&self) -> usize {
        self.current.len()
    }

    pub fn is_empty(&self) -> bool {
        self.current.is_empty()
    }
}

/// Row-count matrix keyed by one or more row dimensions and one column dimension.
#[derive(Debug, Clone, PartialEq)]
pub struct Crosstab {
    pub row_dimensions: Vec<Dimension>,
    pub column_dimension: Dimension,
    pub row_keys: Vec<Vec<String>>,
    pub column_keys: Vec<String>,
    /// `current[row][column]`, aligned with `row_keys` and `column_keys`.
    pub current: Vec<Vec<i64>>,
    pub delta: Vec<Vec<Delta<i64>>>,
}

impl Crosstab {
    pub fn cell(&self, row_key: &[&str], column_key: &str) -> Option<(i64, Delta<i64>)> {
        let row = self.row_keys.iter().position(|key| {
            key.len() == row_key.len() && key.iter().zip(row_key).all(|(left, right)| left == right)
        })?;
        let column = self.column_keys.iter().position(|key| key == column_key)?;
        Some((self.current[row][column], self.delta[row][column]))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Dimension {
    City,
    CustomerType,
    Gender,
    ProductLine,
    Payment,
}

impl Dimension {
    /// Sheet header of the grouping column, also used as the record field name.
    pub const fn label(self) -> &'static str {
        match self {
            Self::City => "City",
            Self::CustomerType => "Customer type",
            Self::Gender => "Gender",
            Self::ProductLine => "Product line",
            Self::Payment => "Payment",
        }
    }

    pub fn value(self, transaction: &Transaction) -> &str {
        match self {
            Self::City => &transaction.city,
            Self::CustomerType => &transaction.customer_type,
            Self::Gender => &transaction.gender,
            Self::ProductLine => &transaction.product_line,
            Self::Payment => &transaction.payment_method,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeanMetric {
    Ticket,
    Rating,
}

impl MeanMetric {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Ticket => "Average Ticket",
            Self::Rating => "Average Rating",
        }
    }

    fn value(self, transaction: &Transaction) -> Option<f64> {
        match self {
            Self::Ticket => Some(transaction.total),
            Self::Rating => transaction.rating,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ReportName {
    ByCity,
    ByCustomerType,
    ByGender,
    ByProductLine,
    ByPayment,
    ByCityCustomerType,
    ByCityGenderCustomerType,
    ByCityProductLine,
    ByCityPaymentGender,
    SalesByHour,
    AverageTicketByCity,
    AverageTicketByCustomerType,
    AverageRatingByProductLine,
}

impl ReportName {
    pub const ALL: [ReportName; 13] = [
        Self::ByCity,
        Self::ByCustomerType,
        Self::ByGender,
        Self::ByProductLine,
        Self::ByPayment,
        Self::ByCityCustomerType,
        Self::ByCityGenderCustomerType,
        Self::ByCityProductLine,
        Self::ByCityPaymentGender,
        Self::SalesByHour,
        Self::AverageTicketByCity,
        Self::AverageTicketByCustomerType,
        Self::AverageRatingByProductLine,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ByCity => "by_city",
            Self::ByCustomerType => "by_customer_type",
            Self::ByGender => "by_gender",
            Self::ByProductLine => "by_product_line",
            Self::ByPayment => "by_payment",
            Self::ByCityCustomerType => "by_city_customer_type",
            Self::ByCityGenderCustomerType => "by_city_gender_customer_type",
            Self::ByCityProductLine => "by_city_product_line",
            Self::ByCityPaymentGender => "by_city_payment_gender",
            Self::SalesByHour => "sales_by_hour",
            Self::AverageTicketByCity => "average_ticket_by_city",
            Self::AverageTicketByCustomerType => "average_ticket_by_customer_type",
            Self::AverageRatingByProductLine => "average_rating_by_product_line",
        }
    }

    pub const fn title(self) -> &'static str {
        match self {
            Self::ByCity => "Sales by city",
            Self::ByCustomerType => "Sales by customer type",
            Self::ByGender => "Sales by gender",
            Self::ByProductLine => "Sales by product line",
            Self::ByPayment => "Sales by payment method",
            Self::ByCityCustomerType => "Customers by city and type",
            Self::ByCityGenderCustomerType => "Customers by city, gender and type",
            Self::ByCityProductLine => "Customers by city and product line",
            Self::ByCityPaymentGender => "Customers by city, payment and gender",
            Self::SalesByHour => "Sales by hour",
            Self::AverageTicketByCity => "Average ticket by city",
            Self::AverageTicketByCustomerType => "Average ticket by customer type",
            Self::AverageRatingByProductLine => "Average rating by product line",
        }
    }

    /// Accepts canonical names and the legacy automation keys.
    pub fn parse(value: &str) -> Option<Self> {
        let trimmed = value.trim();
        if let Some(name) = Self::ALL.iter().find(|name| name.as_str() == trimmed) {
            return Some(*name);
        }
        match trimmed {
            "total_por_cidade" => Some(Self::ByCity),
            "total_por_tipo_cliente" => Some(Self::ByCustomerType),
            "total_por_genero" => Some(Self::ByGender),
            "total_por_linha_produto" => Some(Self::ByProductLine),
            "total_por_payment" => Some(Self::ByPayment),
            "distribuicao_cidade_tipo" => Some(Self::ByCityCustomerType),
            "distribuicao_cidade_genero_tipo" => Some(Self::ByCityGenderCustomerType),
            "vendas_por_hora" => Some(Self::SalesByHour),
            "ticket_medio_tipo" => Some(Self::AverageTicketByCustomerType),
            "rating_faturamento" => Some(Self::AverageRatingByProductLine),
            _ => None,
        }
    }

    pub fn names() -> Vec<&'static str> {
        Self::ALL.iter().map(|name| name.as_str()).collect()
    }
}

/// One report borrowed from a [`DailyReport`], tagged by shape.
#[derive(Debug, Clone, Copy)]
pub enum ReportView<'a> {
    Totals {
        dimension: Dimension,
        comparison: &'a Comparison<String, SalesTotals>,
    },
    Hourly(&'a Comparison<u32, SalesTotals>),
    Mean {
        dimension: Dimension,
        metric: MeanMetric,
        comparison: &'a Comparison<String, MeanTotals>,
    },
    Crosstab(&'a Crosstab),
}

/// Every report for one target day, compared against the previous calendar day.
#[derive(Debug, Clone, PartialEq)]
pub struct DailyReport {
    pub day: NaiveDate,
    pub previous_day: NaiveDate,
    /// No rows at all on `previous_day`; every delta in the bundle is N/A.
    pub is_first_day: bool,
    pub current_rows: usize,
    pub previous_rows: usize,
    pub by_city: Comparison<String, SalesTotals>,
    pub by_customer_type: Comparison<String, SalesTotals>,
    pub by_gender: Comparison<String, SalesTotals>,
    pub by_product_line: Comparison<String, SalesTotals>,
    pub by_payment: Comparison<String, SalesTotals>,
    pub by_city_customer_type: Crosstab,
    pub by_city_gender_customer_type: Crosstab,
    pub by_city_product_line: Crosstab,
    pub by_city_payment_gender: Crosstab,
    pub sales_by_hour: Comparison<u32, SalesTotals>,
    pub average_ticket_by_city: Comparison<String, MeanTotals>,
    pub average_ticket_by_customer_type: Comparison<String, MeanTotals>,
    pub average_rating_by_product_line: Comparison<String, MeanTotals>,
}

impl DailyReport {
    pub fn view(&self, name: ReportName) -> ReportView<'_> {
        match name {
            ReportName::ByCity => totals_view(Dimension::City, &self.by_city),
            ReportName::ByCustomerType => {
                totals_view(Dimension::CustomerType, &self.by_customer_type)
            }
            ReportName::ByGender => totals_view(Dimension::Gender, &self.by_gender),
            ReportName::ByProductLine => totals_view(Dimension::ProductLine, &self.by_product_line),
            ReportName::ByPayment => totals_view(Dimension::Payment, &self.by_payment),
            ReportName::ByCityCustomerType => ReportView::Crosstab(&self.by_city_customer_type),
            ReportName::ByCityGenderCustomerType => {
                ReportView::Crosstab(&self.by_city_gender_customer_type)
            }
            ReportName::ByCityProductLine => ReportView::Crosstab(&self.by_city_product_line),
            ReportName::ByCityPaymentGender => ReportView::Crosstab(&self.by_city_payment_gender),
            ReportName::SalesByHour => ReportView::Hourly(&self.sales_by_hour),
            ReportName::AverageTicketByCity => ReportView::Mean {
                dimension: Dimension::City,
                metric: MeanMetric::Ticket,
                comparison: &self.average_ticket_by_city,
            },
            ReportName::AverageTicketByCustomerType => ReportView::Mean {
                dimension: Dimension::CustomerType,
                metric: MeanMetric::Ticket,
                comparison: &self.average_ticket_by_customer_type,
            },
            ReportName::AverageRatingByProductLine => ReportView::Mean {
                dimension: Dimension::ProductLine,
                metric: MeanMetric::Rating,
                comparison: &self.average_rating_by_product_line,
            },
        }
    }
}

fn totals_view(dimension: Dimension, comparison: &Comparison<String, SalesTotals>) -> ReportView<'_> {
    ReportView::Totals {
        dimension,
        comparison,
    }
}

/// Builds every report for `day`. `None` means the day has no usable rows.
pub fn build_report(day: NaiveDate, dataset: &Dataset) -> Option<DailyReport> {
    // NaiveDate::MIN has no predecessor and never comes out of the sheet parser.
    let previous_day = day.pred_opt()?;

    let current = partition(dataset, day);
    if current.is_empty() {
        return None;
    }
    let previous = partition(dataset, previous_day);
    let first_day = previous.is_empty();

    tracing::debug!(
        day = %day,
        current_rows = current.len(),
        previous_rows = previous.len(),
        first_day,
        "building daily report"
    );

    let totals = |dimension: Dimension| {
        let key = |row: &Transaction| dimension.value(row).to_string();
        compare(sum_by(&current, key), &sum_by(&previous, key), first_day)
    };
    let means = |dimension: Dimension, metric: MeanMetric| {
        let key = |row: &Transaction| dimension.value(row).to_string();
        let value = |row: &Transaction| metric.value(row);
        compare(
            mean_by(&current, key, value),
            &mean_by(&previous, key, value),
            first_day,
        )
    };
    let crosstab = |rows: &[Dimension], column: Dimension| {
        compare_crosstab(
            rows,
            column,
            count_matrix(&current, rows, column),
            &count_matrix(&previous, rows, column),
            first_day,
        )
    };
    let hour = |row: &Transaction| hour_of_day(&row.time);

    Some(DailyReport {
        day,
        previous_day,
        is_first_day: first_day,
        current_rows: current.len(),
        previous_rows: previous.len(),
        by_city: totals(Dimension::City),
        by_customer_type: totals(Dimension::CustomerType),
        by_gender: totals(Dimension::Gender),
        by_product_line: totals(Dimension::ProductLine),
        by_payment: totals(Dimension::Payment),
        by_city_customer_type: crosstab(&[Dimension::City], Dimension::CustomerType),
        by_city_gender_customer_type: crosstab(
            &[Dimension::City, Dimension::Gender],
            Dimension::CustomerType,
        ),
        by_city_product_line: crosstab(&[Dimension::City], Dimension::ProductLine),
        by_city_payment_gender: crosstab(
            &[Dimension::City, Dimension::Payment],
            Dimension::Gender,
        ),
        sales_by_hour: compare(sum_by(&current, hour), &sum_by(&previous, hour), first_day),
        average_ticket_by_city: means(Dimension::City, MeanMetric::Ticket),
        average_ticket_by_customer_type: means(Dimension::CustomerType, MeanMetric::Ticket),
        average_rating_by_product_line: means(Dimension::ProductLine, MeanMetric::Rating),
    })
}

fn partition(dataset: &Dataset, day: NaiveDate) -> Vec<&Transaction> {
    dataset
        .transactions
        .iter()
        .filter(|row| row.date == day && !row.is_summary_row())
        .collect()
}
