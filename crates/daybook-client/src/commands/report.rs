use std::path::Path;

use crate::ClientResult;
use crate::commands::common::{report_for_day, resolve_target_day};
use crate::contracts::envelope::{SuccessEnvelope, success};
use crate::contracts::types::{ReportData, ReportTableData};
use crate::dataset::date::format_iso_date;
use crate::error::ClientError;
use crate::report::{ReportName, evaluate, report_table};
use crate::session::Session;

#[derive(Debug, Clone, Copy, Default)]
pub struct ReportRunOptions<'a> {
    pub date: Option<&'a str>,
    pub name: Option<&'a str>,
    pub home_override: Option<&'a Path>,
}

pub fn run(date: Option<&str>, name: Option<&str>) -> ClientResult<SuccessEnvelope> {
    run_with_options(ReportRunOptions {
        date,
        name,
        home_override: None,
    })
}

#[doc(hidden)]
pub fn run_with_options(options: ReportRunOptions<'_>) -> ClientResult<SuccessEnvelope> {
    let session = Session::open_with_home_override(options.home_override)?;
    run_in_session(&session, options.date, options.name)
}

pub fn run_in_session(
    session: &Session,
    date: Option<&str>,
    name: Option<&str>,
) -> ClientResult<SuccessEnvelope> {
    let names = match name {
        Some(value) => vec![parse_report_name(value)?],
        None => ReportName::ALL.to_vec(),
    };

    let dataset = session.dataset()?;
    let day = resolve_target_day(session, &dataset, date, "report")?;
    let report = report_for_day(&dataset, day)?;
    tracing::info!(day = %day, reports = names.len(), "rendering report");

    let data = ReportData {
        date: format_iso_date(&report.day),
        previous_date: format_iso_date(&report.previous_day),
        is_first_day: report.is_first_day,
        current_rows: report.current_rows,
        previous_rows: report.previous_rows,
        reports: names
            .into_iter()
            .map(|name| ReportTableData::from(&report_table(&report, name)))
            .collect(),
        alerts: evaluate(&report),
    };
    success("report", data)
}

pub(crate) fn parse_report_name(value: &str) -> ClientResult<ReportName> {
    ReportName::parse(value).ok_or_else(|| {
        ClientError::invalid_argument_with_recovery(
            &format!("Unknown report `{}`.", value.trim()),
            vec![
                format!("Use one of: {}.", ReportName::names().join(", ")),
                "Run `daybook report --help` for usage.".to_string(),
            ],
        )
    })
}
