use std::path::Path;

use chrono::NaiveDate;

use crate::ClientResult;
use crate::dataset::Dataset;
use crate::dataset::date::{format_iso_date, parse_target_day};
use crate::error::ClientError;
use crate::report::{DailyReport, build_report};
use crate::session::Session;

/// Target day from `--date`, or the newest day in the sheet.
pub(crate) fn resolve_target_day(
    session: &Session,
    dataset: &Dataset,
    date: Option<&str>,
    command: &str,
) -> ClientResult<NaiveDate> {
    if let Some(value) = date {
        return parse_target_day(value, command);
    }
    dataset
        .latest_day()
        .ok_or_else(|| ClientError::sheet_empty(Path::new(session.source())))
}

pub(crate) fn report_for_day(dataset: &Dataset, day: NaiveDate) -> ClientResult<DailyReport> {
    build_report(day, dataset).ok_or_else(|| ClientError::no_data_for_day(&format_iso_date(&day)))
}
