use std::fs;
use std::io::{BufRead, BufReader, Read};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use serde_json::Value;

const EXPECTED_ROOT_HELP: &str = "Daybook - daily sales reports from a shared sheet

Usage:
  daybook <command>

Start here:
  daybook days
  daybook report
  daybook --help
";

const SHEET_HEADER: &str = "Invoice ID,City,Customer type,Gender,Product line,Unit price,Quantity,Total,Time,Payment,Rating,Data";

const TWO_DAY_SHEET: &str = "\
Invoice ID,City,Customer type,Gender,Product line,Unit price,Quantity,Total,Time,Payment,Rating,Data
101-00-0001,Manaus,Normal,Mulher,Moda,250.00,4,1000.00,10:30,Pix,8.0,2026-01-05
101-00-0002,São Paulo,Membro,Homem,Casa,50.00,2,100.00,19:45,Debito,7.0,2026-01-05
101-00-0003,Manaus,Normal,Mulher,Moda,350.00,4,1400.00,11:15,Pix,9.0,2026-01-06
101-00-0004,Rio de Janeiro,Membro,Homem,Casa,40.00,1,40.00,12:00,Debito,6.0,2026-01-06
";

static TEST_COUNTER: AtomicU64 = AtomicU64::new(1);

fn unique_test_home() -> PathBuf {
    let mut path = std::env::temp_dir();
    let stamp = match SystemTime::now().duration_since(UNIX_EPOCH) {
        Ok(value) => value.as_nanos(),
        Err(_) => 0,
    };
    let sequence = TEST_COUNTER.fetch_add(1, Ordering::Relaxed);
    path.push(format!(
        "daybook-cli-test-{}-{stamp}-{sequence}",
        std::process::id()
    ));
    path
}

fn daybook_command(home: &Path, args: &[&str]) -> Command {
    let mut command = Command::new(env!("CARGO_BIN_EXE_daybook"));
    command.args(args);
    command.env("DAYBOOK_HOME", home);
    command.env_remove("DAYBOOK_SHEET");
    command.env_remove("DAYBOOK_LOG");
    command
}

fn run_cli_in_home(home: &Path, args: &[&str]) -> (Option<i32>, String) {
    let output = daybook_command(home, args).output();
    assert!(output.is_ok());
    if let Ok(result) = output {
        let stdout = String::from_utf8(result.stdout);
        assert!(stdout.is_ok());
        if let Ok(stdout_text) = stdout {
            return (result.status.code(), stdout_text);
        }
    }
    (None, String::new())
}

fn home_with_sheet(body: &str) -> PathBuf {
    let home = unique_test_home();
    assert!(fs::create_dir_all(&home).is_ok());
    assert!(fs::write(home.join("sales.csv"), body).is_ok());
    home
}

fn parse_json(body: &str) -> Value {
    let parsed = serde_json::from_str::<Value>(body);
    assert!(parsed.is_ok());
    if let Ok(value) = parsed {
        return value;
    }
    Value::Null
}

fn assert_text_error_contract(body: &str, code: &str) {
    assert!(body.contains("Something went wrong, but it's easy to fix."));
    assert!(body.contains(&format!("  Error:    {code}")));
    assert!(body.contains("  Details:"));
    assert!(body.contains("What to do next:"));
}

fn assert_json_error_contract(body: &str, code: &str) -> Value {
    let payload = parse_json(body);
    assert_eq!(payload["error"]["code"], Value::String(code.to_string()));
    assert!(payload["error"]["message"].is_string());
    assert!(payload["error"]["recovery_steps"].is_array());
    payload
}

#[test]
fn root_command_uses_short_plaintext_help() {
    let (code, body) = run_cli_in_home(&unique_test_home(), &[]);
    assert_eq!(code, Some(0));
    assert_eq!(body, EXPECTED_ROOT_HELP);
}

#[test]
fn help_and_version_return_success_output() {
    let home = unique_test_home();
    let (help_code, help_body) = run_cli_in_home(&home, &["--help"]);
    assert_eq!(help_code, Some(0));
    assert!(help_body.contains("daybook simulate"));
    assert!(help_body.contains("DAYBOOK_HOME"));

    let (report_code, report_body) = run_cli_in_home(&home, &["report", "--help"]);
    assert_eq!(report_code, Some(0));
    assert!(report_body.contains("by_city_payment_gender"));

    let (version_code, version_body) = run_cli_in_home(&home, &["--version"]);
    assert_eq!(version_code, Some(0));
    assert_eq!(version_body.trim(), "daybook 0.1.0");
}

#[test]
fn days_lists_sheet_days_in_text_and_json() {
    let home = home_with_sheet(TWO_DAY_SHEET);

    let (code, body) = run_cli_in_home(&home, &["days"]);
    assert_eq!(code, Some(0));
    assert!(body.starts_with("2 days with sales."));
    assert!(body.contains("2026-01-06"));

    let (json_code, json_body) = run_cli_in_home(&home, &["days", "--json"]);
    assert_eq!(json_code, Some(0));
    let payload = parse_json(&json_body);
    assert_eq!(payload["ok"], Value::Bool(true));
    assert_eq!(payload["command"], Value::String("days".to_string()));
    assert_eq!(
        payload["data"]["latest"],
        Value::String("2026-01-06".to_string())
    );
}

#[test]
fn report_text_and_json_show_the_same_values() {
    let home = home_with_sheet(TWO_DAY_SHEET);

    let (json_code, json_body) =
        run_cli_in_home(&home, &["report", "--name", "by_city", "--json"]);
    assert_eq!(json_code, Some(0));
    let payload = parse_json(&json_body);
    assert_eq!(payload["data"]["date"], Value::String("2026-01-06".to_string()));
    let records = payload["data"]["reports"][0]["records"]
        .as_array()
        .cloned()
        .unwrap_or_default();
    let manaus = records
        .iter()
        .find(|record| record["City"].as_str() == Some("Manaus"))
        .cloned()
        .unwrap_or(Value::Null);
    assert_eq!(manaus["Total"].as_f64(), Some(1400.0));
    assert_eq!(manaus["Var. Total"].as_f64(), Some(400.0));

    let (text_code, text_body) = run_cli_in_home(&home, &["report", "--name", "by_city"]);
    assert_eq!(text_code, Some(0));
    assert!(text_body.contains("Sales by city:"));
    assert!(text_body.contains("R$1400.00"));
    assert!(text_body.contains("R$+400.00"));
    assert!(text_body.contains("São Paulo"));
    assert!(text_body.contains("R$-100.00"));
    assert!(text_body.contains("Payment method Pix grew more than 30% (40.0%)"));
}

#[test]
fn first_day_report_prints_not_applicable_changes() {
    let home = home_with_sheet(TWO_DAY_SHEET);
    let (code, body) = run_cli_in_home(&home, &["report", "--date", "2026-01-05"]);
    assert_eq!(code, Some(0));
    assert!(body.contains("changes are N/A"));
    assert!(body.contains("N/A"));
    assert!(!body.contains("R$+"));
}

#[test]
fn alerts_json_counts_alerts() {
    let home = home_with_sheet(TWO_DAY_SHEET);
    let (code, body) = run_cli_in_home(&home, &["alerts", "--date", "2026-01-06", "--json"]);
    assert_eq!(code, Some(0));
    let payload = parse_json(&body);
    assert_eq!(payload["command"], Value::String("alerts".to_string()));
    assert!(payload["data"]["alert_count"].as_u64().is_some_and(|count| count >= 1));
}

#[test]
fn api_prints_bare_records_and_erro_payloads() {
    let home = home_with_sheet(TWO_DAY_SHEET);

    let (code, body) = run_cli_in_home(
        &home,
        &[
            "api",
            "request_type=get_report&target_date=2026-01-06&report_name=total_por_cidade",
        ],
    );
    assert_eq!(code, Some(0));
    let records = parse_json(&body);
    assert!(records.is_array());
    assert!(records.get(0).and_then(|record| record.get("Var. Total")).is_some());

    let (unknown_code, unknown_body) = run_cli_in_home(
        &home,
        &[
            "api",
            "request_type=get_report&target_date=2026-01-06&report_name=weather",
        ],
    );
    assert_eq!(unknown_code, Some(0));
    let unknown = parse_json(&unknown_body);
    assert!(unknown["erro"].is_string());
    assert!(unknown.get("ok").is_none());
}

#[test]
fn simulate_appends_a_selectable_next_day() {
    let home = home_with_sheet(TWO_DAY_SHEET);

    let (code, body) = run_cli_in_home(
        &home,
        &["simulate", "--count", "120", "--seed", "11", "--json"],
    );
    assert_eq!(code, Some(0));
    let payload = parse_json(&body);
    assert_eq!(payload["data"]["date"], Value::String("2026-01-07".to_string()));
    assert_eq!(payload["data"]["rows_appended"].as_u64(), Some(120));
    assert_eq!(payload["data"]["selectable"], Value::Bool(true));

    let (report_code, report_body) =
        run_cli_in_home(&home, &["report", "--name", "by_city", "--json"]);
    assert_eq!(report_code, Some(0));
    let report = parse_json(&report_body);
    assert_eq!(report["data"]["date"], Value::String("2026-01-07".to_string()));
    assert_eq!(report["data"]["current_rows"].as_u64(), Some(120));
}

#[test]
fn missing_sheet_is_a_user_error_in_both_modes() {
    let home = unique_test_home();
    assert!(fs::create_dir_all(&home).is_ok());

    let (code, body) = run_cli_in_home(&home, &["report"]);
    assert_eq!(code, Some(1));
    assert_text_error_contract(&body, "sheet_not_found");
    assert!(body.contains(SHEET_HEADER));

    let (json_code, json_body) = run_cli_in_home(&home, &["days", "--json"]);
    assert_eq!(json_code, Some(1));
    let payload = assert_json_error_contract(&json_body, "sheet_not_found");
    assert_eq!(payload["ok"], Value::Bool(false));
}

#[test]
fn unknown_report_and_missing_day_are_user_errors() {
    let home = home_with_sheet(TWO_DAY_SHEET);

    let (code, body) = run_cli_in_home(&home, &["report", "--name", "by_weather"]);
    assert_eq!(code, Some(1));
    assert_text_error_contract(&body, "invalid_argument");

    let (day_code, day_body) =
        run_cli_in_home(&home, &["alerts", "--date", "2026-02-01", "--json"]);
    assert_eq!(day_code, Some(1));
    assert_json_error_contract(&day_body, "no_data_for_day");
}

#[test]
fn clap_errors_use_the_error_contract() {
    let home = unique_test_home();

    let (code, body) = run_cli_in_home(&home, &["report", "--date", "06/01/2026"]);
    assert_eq!(code, Some(1));
    assert_text_error_contract(&body, "invalid_argument");
    assert!(body.contains("daybook report --help"));
    assert!(!body.contains("For more information"));

    let (json_code, json_body) = run_cli_in_home(&home, &["days", "--nope", "--json"]);
    assert_eq!(json_code, Some(1));
    assert_json_error_contract(&json_body, "invalid_argument");
}

#[test]
fn debug_logs_go_to_stderr_only() {
    let home = home_with_sheet(TWO_DAY_SHEET);
    let mut command = daybook_command(&home, &["days", "--json"]);
    command.env("DAYBOOK_LOG", "debug");
    let output = command.output();
    assert!(output.is_ok());
    if let Ok(result) = output {
        assert!(result.status.success());
        let stdout = String::from_utf8(result.stdout).unwrap_or_default();
        assert_eq!(parse_json(&stdout)["ok"], Value::Bool(true));
    }
}

#[test]
fn success_output_pipe_close_does_not_panic() {
    let home = home_with_sheet(TWO_DAY_SHEET);
    let mut producer = daybook_command(&home, &["report"]);
    producer.stdout(Stdio::piped());
    producer.stderr(Stdio::piped());

    let producer_spawn = producer.spawn();
    assert!(producer_spawn.is_ok());
    if let Ok(mut producer_child) = producer_spawn {
        let producer_stdout = producer_child.stdout.take();
        let producer_stderr = producer_child.stderr.take();
        assert!(producer_stdout.is_some());

        if let Some(stdout_pipe) = producer_stdout {
            let mut reader = BufReader::new(stdout_pipe);
            let mut first_line = String::new();
            let read_result = reader.read_line(&mut first_line);
            assert!(read_result.is_ok());
            assert!(!first_line.is_empty());
            drop(reader);
        }

        let status = producer_child.wait();
        assert!(status.is_ok());

        if let Some(mut stderr_pipe) = producer_stderr {
            let mut stderr_bytes = Vec::new();
            assert!(stderr_pipe.read_to_end(&mut stderr_bytes).is_ok());
            let stderr_text = String::from_utf8(stderr_bytes).unwrap_or_default();
            assert!(!stderr_text.contains("Broken pipe"));
            assert!(!stderr_text.contains("panicked"));
        }
    }
}
