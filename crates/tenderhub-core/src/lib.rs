//! TenderHub Core — domain models, status machines, versioning
//! abstractions, repository traits, and the error taxonomy.

pub mod error;
pub mod models;
pub mod repository;
pub mod status;
pub mod versioning;
