//! Database-specific error types and conversions.

use tenderhub_core::error::TenderHubError;

/// Database-layer error type.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("SurrealDB error: {0}")]
    Surreal(#[from] surrealdb::Error),

    #[error("Migration failed: {0}")]
    Migration(String),

    #[error("Query failed: {0}")]
    Query(String),

    #[error("Malformed record: {0}")]
    Decode(String),

    #[error("Record not found: {entity} with id {id}")]
    NotFound { entity: String, id: String },

    #[error("History not found: {entity} {id} version {version}")]
    HistoryNotFound {
        entity: String,
        id: String,
        version: u32,
    },
}

impl From<DbError> for TenderHubError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => TenderHubError::NotFound { entity, id },
            DbError::HistoryNotFound {
                entity,
                id,
                version,
            } => TenderHubError::HistoryNotFound {
                entity,
                id,
                version,
            },
            other => TenderHubError::Database(other.to_string()),
        }
    }
}
