use daybook_client::ClientError;
use serde_json::Value;

pub fn render_error(error: &ClientError) -> String {
    let mut lines = vec![
        "Something went wrong, but it's easy to fix.".to_string(),
        String::new(),
        format!("  Error:    {}", error.code),
        format!("  Details:  {}", error.message),
    ];

    if let Some(data) = &error.data {
        if let Some(path) = data.get("sheet_path").and_then(Value::as_str) {
            lines.push(format!("  Sheet:    {path}"));
        }
        if let Some(day) = data.get("target_date").and_then(Value::as_str) {
            lines.push(format!("  Date:     {day}"));
        }
    }

    lines.push(String::new());
    lines.push("What to do next:".to_string());
    if error.recovery_steps.is_empty() {
        lines.push("  1. Retry the command.".to_string());
    } else {
        for (index, step) in error.recovery_steps.iter().enumerate() {
            lines.push(format!("  {}. {step}", index + 1));
        }
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use daybook_client::ClientError;

    use super::render_error;

    #[test]
    fn renders_standard_error_layout() {
        let error = ClientError::invalid_argument_with_recovery(
            "bad input",
            vec!["run daybook --help".to_string()],
        );

        let rendered = render_error(&error);
        assert!(rendered.starts_with("Something went wrong, but it's easy to fix."));
        assert!(rendered.contains("  Error:    invalid_argument"));
        assert!(rendered.contains("  Details:  bad input"));
        assert!(rendered.contains("What to do next:"));
        assert!(rendered.contains("  1. run daybook --help"));
        assert!(!rendered.contains("  Sheet:"));
    }

    #[test]
    fn shows_sheet_location_and_day_from_error_data() {
        let missing = render_error(&ClientError::sheet_not_found(Path::new("/tmp/sales.csv")));
        assert!(missing.contains("  Sheet:    /tmp/sales.csv"));

        let no_data = render_error(&ClientError::no_data_for_day("2026-01-06"));
        assert!(no_data.contains("  Date:     2026-01-06"));
        assert!(no_data.contains("  2. Run `daybook simulate`"));
    }

    #[test]
    fn falls_back_to_a_retry_step() {
        let rendered = render_error(&ClientError::internal_serialization("boom"));
        assert!(rendered.contains("  1. Retry the command."));
    }
}
