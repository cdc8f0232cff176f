use daybook_client::commands;
use daybook_client::{ClientResult, SuccessEnvelope};
use serde_json::Value;

use crate::cli::{Cli, Commands};

/// What a command produced: a standard envelope, or the endpoint's bare payload.
#[derive(Debug)]
pub enum Dispatched {
    Envelope(SuccessEnvelope),
    Payload(Value),
}

pub fn dispatch(cli: &Cli) -> ClientResult<Dispatched> {
    let envelope = match &cli.command {
        Commands::Days { .. } => commands::days::run(),
        Commands::Report { date, name, .. } => {
            let date_value = date.as_ref().map(|value| value.as_str());
            commands::report::run(date_value, name.as_deref())
        }
        Commands::Alerts { date, .. } => {
            let date_value = date.as_ref().map(|value| value.as_str());
            commands::alerts::run(date_value)
        }
        Commands::Api { query } => return commands::api::run(query).map(Dispatched::Payload),
        Commands::Simulate { count, seed, .. } => commands::simulate::run(*count, *seed),
    };
    envelope.map(Dispatched::Envelope)
}
