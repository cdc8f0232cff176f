use serde::Serialize;

use crate::report::{Comparison, DailyReport, Delta, SalesTotals};

/// v1 alert thresholds.
#[derive(Debug, Clone, Copy)]
pub struct AlertPolicy {
    /// Strict lower bound on a city's daily total for a positive alert.
    pub city_total_ceiling: f64,
    /// Percent change below which a city is flagged as dropping.
    pub city_drop_percent: f64,
    pub pix_growth_percent: f64,
    pub product_quantity_ceiling: i64,
    pub pix_label: &'static str,
}

pub const ALERT_POLICY_V1: AlertPolicy = AlertPolicy {
    city_total_ceiling: 30_000.0,
    city_drop_percent: -30.0,
    pix_growth_percent: 30.0,
    product_quantity_ceiling: 400,
    pix_label: "Pix",
};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Alerts {
    pub positive: Vec<String>,
    pub negative: Vec<String>,
}

impl Alerts {
    pub fn is_empty(&self) -> bool {
        self.positive.is_empty() && self.negative.is_empty()
    }

    pub fn len(&self) -> usize {
        self.positive.len() + self.negative.len()
    }
}

pub fn evaluate(report: &DailyReport) -> Alerts {
    evaluate_with_policy(report, ALERT_POLICY_V1)
}

pub fn evaluate_with_policy(report: &DailyReport, policy: AlertPolicy) -> Alerts {
    let mut alerts = Alerts::default();

    let high_cities = report
        .by_city
        .current
        .iter()
        .filter(|(_, totals)| totals.total > policy.city_total_ceiling)
        .map(|(city, _)| city.as_str())
        .collect::<Vec<&str>>();
    if !high_cities.is_empty() {
        alerts.positive.push(format!(
            "Cities {} exceeded R${} in total sales.",
            high_cities.join(", "),
            group_thousands(policy.city_total_ceiling)
        ));
    }

    let dropping_cities = report
        .by_city
        .keys()
        .filter(|city| {
            total_change_percent(&report.by_city, city)
                .is_some_and(|percent| percent < policy.city_drop_percent)
        })
        .map(String::as_str)
        .collect::<Vec<&str>>();
    if !dropping_cities.is_empty() {
        alerts.negative.push(format!(
            "Cities {} saw sales drop more than {}% from the previous day.",
            dropping_cities.join(", "),
            policy.city_drop_percent.abs()
        ));
    }

    if let Some(percent) = total_change_percent(&report.by_payment, policy.pix_label)
        && percent > policy.pix_growth_percent
    {
        alerts.positive.push(format!(
            "Payment method {} grew more than {}% ({percent:.1}%) in sales.",
            policy.pix_label, policy.pix_growth_percent
        ));
    }

    let busy_product_lines = report
        .by_product_line
        .current
        .iter()
        .filter(|(_, totals)| totals.quantity > policy.product_quantity_ceiling)
        .map(|(product_line, _)| product_line.as_str())
        .collect::<Vec<&str>>();
    if !busy_product_lines.is_empty() {
        alerts.positive.push(format!(
            "Product lines {} sold more than {} units.",
            busy_product_lines.join(", "),
            policy.product_quantity_ceiling
        ));
    }

    alerts
}

/// Percent change of the total, only when the implied previous total is positive.
fn total_change_percent(comparison: &Comparison<String, SalesTotals>, key: &str) -> Option<f64> {
    let (current, delta) = comparison.get(&key.to_string())?;
    let Delta::Change(delta) = delta else {
        return None;
    };
    let previous = current.total - delta.total;
    if previous <= 0.0 {
        return None;
    }
    Some(delta.total / previous * 100.0)
}

fn group_thousands(value: f64) -> String {
    let digits = format!("{:.0}", value.abs());
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, digit) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    if value < 0.0 {
        grouped.insert(0, '-');
    }
    grouped
}
