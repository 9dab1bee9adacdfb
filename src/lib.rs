//! sql-size-policy library crate
//!
//! An admission policy that restricts `spec.parameters.size` of Sql resources
//! to an operator supplied allow-list.
//!
//! The policy itself is two pure entry points in [`policy`]; the remaining
//! modules host them behind an HTTP server with probes and metrics.

pub mod config;
pub mod crd;
pub mod error;
pub mod health;
pub mod policy;
pub mod server;
pub mod settings;

pub use config::ServerConfig;
pub use error::{Error, Result};
pub use health::HealthState;
pub use policy::{validate, validate_settings};
pub use server::{ServerError, run_policy_server};
pub use settings::Settings;
