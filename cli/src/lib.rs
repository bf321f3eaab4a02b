//! Library half of the `vetting` binary: configuration and the demo session.

pub mod config;
pub mod demo;
pub mod error;

pub use config::VettingConfig;
pub use demo::{run_demo, DemoOptions, DemoReport};
pub use error::CliError;
