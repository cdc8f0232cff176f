pub mod alerts;
pub mod api;
pub(crate) mod common;
pub mod days;
pub mod report;
pub mod simulate;
