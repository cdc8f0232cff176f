mod support;

use chrono::NaiveDate;
use daybook_client::Session;
use daybook_client::commands::report;
use daybook_client::commands::simulate::{self, SimulateRunOptions};
use serde_json::Value;

use support::sheet_testkit::{envelope_value, sale, temp_home_in_tmp, write_sheet};

#[test]
fn simulated_day_becomes_selectable_through_a_warm_cache() {
    let temp = temp_home_in_tmp("daybook-simulate-warm");
    assert!(temp.is_ok());
    if let Ok((_dir, home)) = temp {
        let rows = [
            sale("2026-01-05", "Manaus", 100.0, 2),
            sale("2026-01-06", "Manaus", 120.0, 3),
        ];
        assert!(write_sheet(&home, &rows).is_ok());

        let session = Session::open_at(&home);
        assert!(session.is_ok());
        if let Ok(session) = session {
            let before = session.dataset();
            assert!(before.is_ok());
            if let Ok(dataset) = before {
                assert_eq!(dataset.days().len(), 2);
            }

            let payload = envelope_value(simulate::run_in_session(
                &session,
                SimulateRunOptions {
                    count: Some(120),
                    seed: Some(9),
                    ..SimulateRunOptions::default()
                },
            ));
            assert_eq!(payload["data"]["date"], Value::String("2026-01-07".to_string()));
            assert_eq!(payload["data"]["rows_appended"].as_u64(), Some(120));
            assert_eq!(payload["data"]["selectable"], Value::Bool(true));

            let after = session.dataset();
            assert!(after.is_ok());
            if let Ok(dataset) = after {
                assert_eq!(dataset.latest_day(), NaiveDate::from_ymd_opt(2026, 1, 7));
                assert_eq!(dataset.rows_on(dataset.days()[0]).len(), 120);
            }

            let report = envelope_value(report::run_in_session(
                &session,
                Some("2026-01-07"),
                Some("by_city"),
            ));
            assert_eq!(report["data"]["is_first_day"], Value::Bool(false));
            assert_eq!(report["data"]["current_rows"].as_u64(), Some(120));
        }
    }
}

#[test]
fn empty_sheet_simulates_tomorrow_with_default_count() {
    let temp = temp_home_in_tmp("daybook-simulate-empty");
    assert!(temp.is_ok());
    if let Ok((_dir, home)) = temp {
        assert!(write_sheet(&home, &[]).is_ok());
        let payload = envelope_value(simulate::run_with_options(SimulateRunOptions {
            seed: Some(1),
            home_override: Some(home.as_path()),
            today: NaiveDate::from_ymd_opt(2026, 3, 10),
            ..SimulateRunOptions::default()
        }));
        assert_eq!(payload["data"]["date"], Value::String("2026-03-11".to_string()));
        let appended = payload["data"]["rows_appended"].as_u64().unwrap_or_default();
        assert!((100..=300).contains(&appended));
    }
}

#[test]
fn invalid_count_and_missing_sheet_fail_without_writing() {
    let temp = temp_home_in_tmp("daybook-simulate-errors");
    assert!(temp.is_ok());
    if let Ok((_dir, home)) = temp {
        let missing = simulate::run_with_options(SimulateRunOptions {
            count: Some(10),
            home_override: Some(home.as_path()),
            ..SimulateRunOptions::default()
        });
        assert!(missing.is_err());
        if let Err(error) = missing {
            assert_eq!(error.code, "sheet_not_found");
        }

        assert!(write_sheet(&home, &[sale("2026-01-05", "Manaus", 10.0, 1)]).is_ok());
        let zero = simulate::run_with_options(SimulateRunOptions {
            count: Some(0),
            home_override: Some(home.as_path()),
            ..SimulateRunOptions::default()
        });
        assert!(zero.is_err());
        if let Err(error) = zero {
            assert_eq!(error.code, "invalid_argument");
        }

        let session = Session::open_at(&home);
        assert!(session.is_ok());
        if let Ok(session) = session {
            let dataset = session.dataset();
            assert!(dataset.is_ok());
            if let Ok(dataset) = dataset {
                assert_eq!(dataset.transactions.len(), 1);
            }
        }
    }
}
