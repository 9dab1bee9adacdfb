//! Resource types inspected by the policy.
//!
//! - `Sql`: database claim whose `spec.parameters.size` is restricted

mod sql;

pub use sql::*;
