use std::path::Path;

use crate::ClientResult;
use crate::contracts::envelope::{SuccessEnvelope, success};
use crate::contracts::types::{DayEntry, DaysData};
use crate::dataset::date::format_iso_date;
use crate::session::Session;

pub fn run() -> ClientResult<SuccessEnvelope> {
    run_with_home_override(None)
}

#[doc(hidden)]
pub fn run_with_home_override(home_override: Option<&Path>) -> ClientResult<SuccessEnvelope> {
    let session = Session::open_with_home_override(home_override)?;
    run_in_session(&session)
}

pub fn run_in_session(session: &Session) -> ClientResult<SuccessEnvelope> {
    success("days", days_data(session)?)
}

pub(crate) fn days_data(session: &Session) -> ClientResult<DaysData> {
    let dataset = session.dataset()?;
    let days = dataset
        .days()
        .into_iter()
        .map(|day| {
            let rows = dataset.rows_on(day);
            DayEntry {
                date: format_iso_date(&day),
                rows: rows.len() as i64,
                total: (rows.iter().map(|row| row.total).sum::<f64>() * 100.0).round() / 100.0,
                quantity: rows.iter().map(|row| row.quantity).sum(),
            }
        })
        .collect::<Vec<DayEntry>>();

    Ok(DaysData {
        sheet_source: session.source().to_string(),
        earliest: dataset.earliest_day().as_ref().map(format_iso_date),
        latest: dataset.latest_day().as_ref().map(format_iso_date),
        days,
        normalization: dataset.summary.clone(),
    })
}
