pub mod commands;
pub mod config;
pub mod contracts;
pub mod dataset;
pub mod error;
pub mod report;
pub mod session;
pub mod setup;
pub mod simulate;
pub mod state;
pub mod store;

pub use contracts::envelope::{FailureEnvelope, SuccessEnvelope};
pub use error::{ClientError, ClientResult};
pub use session::Session;

pub const API_VERSION: &str = env!("CARGO_PKG_VERSION");
