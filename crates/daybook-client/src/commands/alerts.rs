use std::path::Path;

use crate::ClientResult;
use crate::commands::common::{report_for_day, resolve_target_day};
use crate::contracts::envelope::{SuccessEnvelope, success};
use crate::contracts::types::AlertsData;
use crate::dataset::date::format_iso_date;
use crate::report::evaluate;
use crate::session::Session;

pub fn run(date: Option<&str>) -> ClientResult<SuccessEnvelope> {
    run_with_home_override(date, None)
}

#[doc(hidden)]
pub fn run_with_home_override(
    date: Option<&str>,
    home_override: Option<&Path>,
) -> ClientResult<SuccessEnvelope> {
    let session = Session::open_with_home_override(home_override)?;
    run_in_session(&session, date)
}

pub fn run_in_session(session: &Session, date: Option<&str>) -> ClientResult<SuccessEnvelope> {
    let dataset = session.dataset()?;
    let day = resolve_target_day(session, &dataset, date, "alerts")?;
    let report = report_for_day(&dataset, day)?;
    let alerts = evaluate(&report);
    if !alerts.is_empty() {
        tracing::info!(
            day = %day,
            positive = alerts.positive.len(),
            negative = alerts.negative.len(),
            "alerts raised"
        );
    }

    success(
        "alerts",
        AlertsData {
            date: format_iso_date(&day),
            is_first_day: report.is_first_day,
            alert_count: alerts.len(),
            alerts,
        },
    )
}
