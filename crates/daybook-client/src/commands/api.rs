//! Automation endpoint: a URL query string in, a JSON array of flat records out.
//!
//! Requests that cannot be answered produce `{"erro": "..."}` rather than an
//! error; only store failures surface as [`ClientError`](crate::ClientError).

use std::collections::BTreeMap;
use std::path::Path;

use chrono::NaiveDate;
use serde_json::Value;

use crate::ClientResult;
use crate::contracts::envelope::api_error;
use crate::dataset::date::{parse_fallback_date, parse_flexible_date};
use crate::report::{ReportName, build_report, report_table};
use crate::session::Session;

pub const GET_REPORT: &str = "get_report";

const NO_DATA_MESSAGE: &str = "No data found for the requested date.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportRequest {
    pub target_date: NaiveDate,
    pub report_name: String,
}

pub fn run(query: &str) -> ClientResult<Value> {
    run_with_home_override(query, None)
}

#[doc(hidden)]
pub fn run_with_home_override(query: &str, home_override: Option<&Path>) -> ClientResult<Value> {
    let session = Session::open_with_home_override(home_override)?;
    run_in_session(&session, query)
}

pub fn run_in_session(session: &Session, query: &str) -> ClientResult<Value> {
    let request = match parse_request(query) {
        Ok(request) => request,
        Err(message) => {
            tracing::debug!(%message, "rejected api request");
            return api_error(&message);
        }
    };

    let dataset = session.dataset()?;
    let Some(report) = build_report(request.target_date, &dataset) else {
        return api_error(NO_DATA_MESSAGE);
    };
    let Some(name) = ReportName::parse(&request.report_name) else {
        return api_error(&format!(
            "Unknown report '{}'. Available reports: {}.",
            request.report_name,
            ReportName::names().join(", ")
        ));
    };

    tracing::info!(
        day = %request.target_date,
        report = name.as_str(),
        "answering api report request"
    );
    Ok(report_table(&report, name).to_json())
}

/// Parses `request_type=get_report&target_date=...&report_name=...`.
/// A leading URL or `?` is ignored; values are percent-decoded.
pub fn parse_request(query: &str) -> Result<ReportRequest, String> {
    let params = parse_query(query)?;

    match params.get("request_type").map(String::as_str) {
        Some(GET_REPORT) => {}
        Some(other) => return Err(format!("Unsupported request_type '{other}'.")),
        None => return Err("Missing request_type parameter.".to_string()),
    }

    let raw_date = params
        .get("target_date")
        .map(|value| value.trim())
        .filter(|value| !value.is_empty())
        .ok_or_else(|| "Missing target_date parameter.".to_string())?;
    let target_date = parse_flexible_date(raw_date)
        .or_else(|| parse_fallback_date(raw_date))
        .ok_or_else(|| format!("Invalid target_date '{raw_date}'."))?;

    let report_name = params
        .get("report_name")
        .map(|value| value.trim())
        .filter(|value| !value.is_empty())
        .ok_or_else(|| "Missing report_name parameter.".to_string())?
        .to_string();

    Ok(ReportRequest {
        target_date,
        report_name,
    })
}

fn parse_query(query: &str) -> Result<BTreeMap<String, String>, String> {
    let trimmed = query.trim();
    let query = match trimmed.split_once('?') {
        Some((_, rest)) => rest,
        None => trimmed,
    };
    let query = query.split('#').next().unwrap_or_default();

    let mut params = BTreeMap::new();
    for pair in query.split('&').filter(|pair| !pair.is_empty()) {
        let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
        let key = decode_component(key)?;
        let value = decode_component(value)?;
        // First occurrence wins.
        params.entry(key).or_insert(value);
    }
    Ok(params)
}

fn decode_component(raw: &str) -> Result<String, String> {
    urlencoding::decode(&raw.replace('+', " "))
        .map(|decoded| decoded.into_owned())
        .map_err(|_| format!("Query component '{raw}' is not valid UTF-8."))
}
