//! Domain models for TenderHub.
//!
//! These are the core types shared across all crates.

pub mod bid;
pub mod decision;
pub mod organization;
pub mod review;
pub mod tender;
pub mod user;
