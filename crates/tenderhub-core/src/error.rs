//! Error types for the TenderHub system.

use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum TenderHubError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: String, id: String },

    #[error("User not found: {username}")]
    UserNotFound { username: String },

    #[error("History not found: {entity} {id} has no version {version}")]
    HistoryNotFound {
        entity: String,
        id: String,
        version: u32,
    },

    #[error("User is not responsible for organization {organization_id}")]
    NotResponsible { organization_id: Uuid },

    /// The user is not responsible for any organization, so there is
    /// nobody to act on behalf of.
    #[error("User {user} is not responsible for any organization")]
    NoOrganization { user: String },

    /// The author is a responsible user of the organization that owns
    /// the tender being bid on.
    #[error("Responsible users of the tender's organization cannot bid on tender {tender_id}")]
    SelfBid { tender_id: Uuid },

    #[error("Invalid value for {field}: {value:?}")]
    InvalidValue { field: String, value: String },

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Bid {id} is canceled")]
    BidCanceled { id: Uuid },

    #[error("Database error: {0}")]
    Database(String),
}

pub type TenderHubResult<T> = Result<T, TenderHubError>;

/// Coarse error classification handed to the transport layer, which
/// owns the mapping from kind to protocol status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    Unauthorized,
    InvalidValue,
    TerminalStateViolation,
    Unknown,
}

impl TenderHubError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            TenderHubError::NotFound { .. }
            | TenderHubError::UserNotFound { .. }
            | TenderHubError::HistoryNotFound { .. } => ErrorKind::NotFound,
            TenderHubError::NotResponsible { .. }
            | TenderHubError::NoOrganization { .. }
            | TenderHubError::SelfBid { .. } => ErrorKind::Unauthorized,
            TenderHubError::InvalidValue { .. } | TenderHubError::Validation { .. } => {
                ErrorKind::InvalidValue
            }
            TenderHubError::BidCanceled { .. } => ErrorKind::TerminalStateViolation,
            TenderHubError::Database(_) => ErrorKind::Unknown,
        }
    }

    pub fn invalid_value(field: &str, value: &str) -> Self {
        TenderHubError::InvalidValue {
            field: field.into(),
            value: value.into(),
        }
    }

    pub fn required(field: &str) -> Self {
        TenderHubError::Validation {
            message: format!("{field} is required"),
        }
    }

    /// Whether the error is an unclassified store failure.
    pub fn is_unknown(&self) -> bool {
        self.kind() == ErrorKind::Unknown
    }
}
