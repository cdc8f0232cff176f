use crate::cli::Commands;

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum OutputMode {
    Text,
    Json,
}

pub fn mode_for_command(command: &Commands) -> OutputMode {
    match command {
        Commands::Days { json }
        | Commands::Report { json, .. }
        | Commands::Alerts { json, .. }
        | Commands::Simulate { json, .. } => {
            if *json {
                OutputMode::Json
            } else {
                OutputMode::Text
            }
        }
        Commands::Api { .. } => OutputMode::Json,
    }
}

#[cfg(test)]
mod tests {
    use super::{OutputMode, mode_for_command};
    use crate::cli::parse_from;

    #[test]
    fn mode_uses_json_when_flag_is_present() {
        let cases: [&[&str]; 4] = [
            &["daybook", "days", "--json"],
            &["daybook", "report", "--name", "by_city", "--json"],
            &["daybook", "alerts", "--json"],
            &["daybook", "simulate", "--count", "120", "--json"],
        ];
        for args in cases {
            let parsed = parse_from(args);
            assert!(parsed.is_ok());
            if let Ok(cli) = parsed {
                assert_eq!(mode_for_command(&cli.command), OutputMode::Json);
            }
        }
    }

    #[test]
    fn api_always_answers_in_json() {
        let parsed = parse_from(["daybook", "api", "request_type=get_report"]);
        assert!(parsed.is_ok());
        if let Ok(cli) = parsed {
            assert_eq!(mode_for_command(&cli.command), OutputMode::Json);
        }
    }

    #[test]
    fn mode_uses_text_for_commands_without_json_flag() {
        let cases: [&[&str]; 3] = [
            &["daybook", "days"],
            &["daybook", "report"],
            &["daybook", "simulate"],
        ];
        for args in cases {
            let parsed = parse_from(args);
            assert!(parsed.is_ok());
            if let Ok(cli) = parsed {
                assert_eq!(mode_for_command(&cli.command), OutputMode::Text);
            }
        }
    }
}
