use chrono::NaiveDate;
use clap::{Parser, Subcommand};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IsoDate(pub String);

impl IsoDate {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

pub fn parse_iso_date(value: &str) -> Result<IsoDate, String> {
    if value.len() != 10 {
        return Err("date must use YYYY-MM-DD format".to_string());
    }

    let bytes = value.as_bytes();
    if bytes[4] != b'-' || bytes[7] != b'-' {
        return Err("date must use YYYY-MM-DD format".to_string());
    }

    for index in [0usize, 1, 2, 3, 5, 6, 8, 9] {
        if !bytes[index].is_ascii_digit() {
            return Err("date must use YYYY-MM-DD format".to_string());
        }
    }

    if NaiveDate::parse_from_str(value, "%Y-%m-%d").is_err() {
        return Err("date must use valid calendar values".to_string());
    }

    Ok(IsoDate(value.to_string()))
}

/// Extended help shown after `daybook report --help`.
pub const REPORT_AFTER_HELP: &str = "\
Reports:
  by_city                          Total and quantity per city
  by_customer_type                 Total and quantity per customer type
  by_gender                        Total and quantity per gender
  by_product_line                  Total and quantity per product line
  by_payment                       Total and quantity per payment method
  by_city_customer_type            Sales count per city and customer type
  by_city_gender_customer_type     Sales count per city, gender and customer type
  by_city_product_line             Sales count per city and product line
  by_city_payment_gender           Sales count per city, payment and gender
  sales_by_hour                    Total and quantity per hour of the day
  average_ticket_by_city           Mean ticket per city
  average_ticket_by_customer_type  Mean ticket per customer type
  average_rating_by_product_line   Mean rating per product line

  Every `Var.` column is the change against the previous calendar day.
  When that day has no sales, changes print as N/A.

What to do next:
  1. Run `daybook days` to see which days have data.
  2. Run `daybook report --date <YYYY-MM-DD> --name by_city`.
";

/// Extended help shown after `daybook api --help`.
pub const API_AFTER_HELP: &str = "\
Request format:
  request_type=get_report&target_date=<YYYY-MM-DD>&report_name=<report>

  Prints a JSON array of records, one object per table row.
  Requests that cannot be answered print {\"erro\": \"...\"} and still exit 0.

Example:
  daybook api \"request_type=get_report&target_date=2026-01-06&report_name=by_city\"
";

#[derive(Debug, Parser)]
#[command(
    name = "daybook",
    version,
    about = "daily sales reports from a shared sheet",
    disable_help_subcommand = true
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// List the days that have sales, newest first
    Days {
        /// Emit structured JSON object output for machine parsing
        #[arg(long)]
        json: bool,
    },
    /// Show the day's report tables and alerts
    #[command(after_help = REPORT_AFTER_HELP)]
    Report {
        /// Day to report on (YYYY-MM-DD); defaults to the latest day
        #[arg(long, value_parser = parse_iso_date)]
        date: Option<IsoDate>,
        /// Show a single report instead of all of them
        #[arg(long)]
        name: Option<String>,
        /// Emit structured JSON object output for machine parsing
        #[arg(long)]
        json: bool,
    },
    /// Show only the alerts raised for a day
    Alerts {
        /// Day to evaluate (YYYY-MM-DD); defaults to the latest day
        #[arg(long, value_parser = parse_iso_date)]
        date: Option<IsoDate>,
        /// Emit structured JSON object output for machine parsing
        #[arg(long)]
        json: bool,
    },
    /// Answer an automation request with a JSON report
    #[command(after_help = API_AFTER_HELP)]
    Api {
        /// URL query string, e.g. request_type=get_report&target_date=...&report_name=...
        query: String,
    },
    /// Append a synthetic day of sales to the sheet
    Simulate {
        /// Number of rows to generate (default: random between 100 and 300)
        #[arg(long)]
        count: Option<usize>,
        /// Seed for reproducible rows
        #[arg(long)]
        seed: Option<u64>,
        /// Emit structured JSON object output for machine parsing
        #[arg(long)]
        json: bool,
    },
}

pub fn parse_from<I, T>(itr: I) -> Result<Cli, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    Cli::try_parse_from(itr)
}
