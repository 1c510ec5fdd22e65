//! TenderHub Server — configuration errors and service wiring for the
//! `tenderhub` binary.

pub mod error;
pub mod services;

pub use error::{ServerError, ServerResult};
pub use services::Services;
