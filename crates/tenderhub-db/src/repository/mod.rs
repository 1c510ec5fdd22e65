//! SurrealDB repository implementations.

mod bid;
mod decision;
mod organization;
mod review;
mod tender;
mod user;
mod versioned;

pub use bid::SurrealBidRepository;
pub use decision::SurrealDecisionRepository;
pub use organization::SurrealOrganizationRepository;
pub use review::SurrealReviewRepository;
pub use tender::SurrealTenderRepository;
pub use user::SurrealUserRepository;

use surrealdb_types::SurrealValue;
use tenderhub_core::status::StringEnum;
use uuid::Uuid;

use crate::error::DbError;

/// Row struct for count queries.
#[derive(Debug, SurrealValue)]
pub(crate) struct CountRow {
    pub(crate) total: u64,
}

pub(crate) fn parse_uuid(value: &str, field: &str) -> Result<Uuid, DbError> {
    Uuid::parse_str(value).map_err(|e| DbError::Decode(format!("invalid {field} UUID: {e}")))
}

pub(crate) fn parse_enum<E: StringEnum>(value: &str) -> Result<E, DbError> {
    E::parse(value).map_err(|e| DbError::Decode(e.to_string()))
}
