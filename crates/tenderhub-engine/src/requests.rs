//! Request records accepted from the transport layer.
//!
//! Field names follow the wire format (camelCase). Enumerated values
//! (statuses, author types, decisions) arrive as strings and are parsed
//! by the services before any store access.

use serde::Deserialize;
use uuid::Uuid;

use tenderhub_core::error::{TenderHubError, TenderHubResult};

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTenderRequest {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub service_type: String,
    pub status: String,
    pub organization_id: Uuid,
    pub creator_username: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListTendersRequest {
    #[serde(default)]
    pub service_types: Vec<String>,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}

/// Paging for lists scoped to the acting user.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListMineRequest {
    pub username: String,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}

/// Partial tender edit. Omitted and empty fields stay unchanged.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditTenderRequest {
    pub tender_id: Uuid,
    pub username: String,
    pub name: Option<String>,
    pub description: Option<String>,
    pub service_type: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBidRequest {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub tender_id: Uuid,
    pub author_type: String,
    pub author_id: Uuid,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListTenderBidsRequest {
    pub tender_id: Uuid,
    pub username: String,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}

/// Partial bid edit. Omitted and empty fields stay unchanged.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditBidRequest {
    pub bid_id: Uuid,
    pub username: String,
    pub name: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitDecisionRequest {
    pub bid_id: Uuid,
    pub decision: String,
    pub username: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddReviewRequest {
    pub bid_id: Uuid,
    pub username: String,
    pub content: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListReviewsRequest {
    pub bid_id: Uuid,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    pub username: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrganizationRequest {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

/// Fails with a `Validation` error when a required field is blank.
pub(crate) fn require(field: &str, value: &str) -> TenderHubResult<()> {
    if value.trim().is_empty() {
        return Err(TenderHubError::required(field));
    }
    Ok(())
}

/// Treats an empty or whitespace-only string like an omitted field.
pub(crate) fn supplied(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
