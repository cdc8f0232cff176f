use std::path::Path;

use chrono::{Local, NaiveDate};

use crate::ClientResult;
use crate::contracts::envelope::{SuccessEnvelope, success};
use crate::contracts::types::SimulateData;
use crate::dataset::date::format_iso_date;
use crate::session::Session;
use crate::simulate::{
    default_row_count, generate_transactions, next_simulated_day, rng_from_seed,
    validate_row_count,
};

#[derive(Debug, Clone, Copy, Default)]
pub struct SimulateRunOptions<'a> {
    /// Rows to append; a random 100 to 300 when absent.
    pub count: Option<usize>,
    pub seed: Option<u64>,
    pub home_override: Option<&'a Path>,
    /// Day used when the sheet is empty; defaults to the local date.
    pub today: Option<NaiveDate>,
}

pub fn run(count: Option<usize>, seed: Option<u64>) -> ClientResult<SuccessEnvelope> {
    run_with_options(SimulateRunOptions {
        count,
        seed,
        ..SimulateRunOptions::default()
    })
}

#[doc(hidden)]
pub fn run_with_options(options: SimulateRunOptions<'_>) -> ClientResult<SuccessEnvelope> {
    let session = Session::open_with_home_override(options.home_override)?;
    run_in_session(&session, options)
}

pub fn run_in_session(
    session: &Session,
    options: SimulateRunOptions<'_>,
) -> ClientResult<SuccessEnvelope> {
    let count = options.count.map(validate_row_count).transpose()?;
    let today = options.today.unwrap_or_else(|| Local::now().date_naive());

    let dataset = session.dataset()?;
    let day = next_simulated_day(&dataset, today)?;

    let mut rng = rng_from_seed(options.seed);
    let count = count.unwrap_or_else(|| default_row_count(&mut rng));
    let rows = generate_transactions(&mut rng, day, count);
    let rows_appended = session.append(&rows)?;
    tracing::info!(day = %day, rows = rows_appended, "appended simulated day");

    let selectable = session.dataset()?.days().contains(&day);
    if !selectable {
        tracing::warn!(day = %day, "simulated day is not visible after reload");
    }

    let date = format_iso_date(&day);
    success(
        "simulate",
        SimulateData {
            sheet_source: session.source().to_string(),
            date: date.clone(),
            rows_appended,
            total: (rows.iter().map(|row| row.total).sum::<f64>() * 100.0).round() / 100.0,
            quantity: rows.iter().map(|row| row.quantity).sum(),
            seed: options.seed,
            selectable,
            next_step: format!("daybook report --date {date}"),
        },
    )
}
