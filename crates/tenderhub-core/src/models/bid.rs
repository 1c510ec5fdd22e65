//! Bid (offer) domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{TenderHubError, TenderHubResult};
use crate::status::{DocumentStatus, StringEnum};
use crate::versioning::{DocumentPatch, Snapshot, Versioned, push_change};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum BidStatus {
    Created,
    Published,
    Canceled,
}

impl StringEnum for BidStatus {
    const FIELD: &'static str = "status";
    const ALL: &'static [Self] = &[Self::Created, Self::Published, Self::Canceled];

    fn as_str(&self) -> &'static str {
        match self {
            BidStatus::Created => "Created",
            BidStatus::Published => "Published",
            BidStatus::Canceled => "Canceled",
        }
    }
}

impl DocumentStatus for BidStatus {
    fn is_terminal(&self) -> bool {
        matches!(self, BidStatus::Canceled)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum AuthorType {
    User,
    Organization,
}

impl StringEnum for AuthorType {
    const FIELD: &'static str = "authorType";
    const ALL: &'static [Self] = &[Self::User, Self::Organization];

    fn as_str(&self) -> &'static str {
        match self {
            AuthorType::User => "User",
            AuthorType::Organization => "Organization",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bid {
    pub id: Uuid,
    pub tender_id: Uuid,
    pub creator_id: Uuid,
    /// The bidder's own organization, fixed at creation.
    pub organization_id: Uuid,
    pub author_type: AuthorType,
    pub status: BidStatus,
    pub version: u32,
    pub name: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Bid {
    /// Fails with `BidCanceled` once the bid has reached its terminal status.
    pub fn ensure_open(&self) -> TenderHubResult<()> {
        if self.status.is_terminal() {
            return Err(TenderHubError::BidCanceled { id: self.id });
        }
        Ok(())
    }
}

impl Versioned for Bid {
    type Patch = BidPatch;
    type Snapshot = BidSnapshot;

    const ENTITY: &'static str = "bid";

    fn id(&self) -> Uuid {
        self.id
    }

    fn version(&self) -> u32 {
        self.version
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateBid {
    pub tender_id: Uuid,
    pub creator_id: Uuid,
    pub organization_id: Uuid,
    pub author_type: AuthorType,
    pub name: String,
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct BidPatch {
    pub name: Option<String>,
    pub description: Option<String>,
}

impl DocumentPatch for BidPatch {
    fn changes(&self) -> Vec<(&'static str, String)> {
        let mut changes = Vec::new();
        push_change(&mut changes, "name", &self.name);
        push_change(&mut changes, "description", &self.description);
        changes
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BidSnapshot {
    pub offer_id: Uuid,
    pub creator_id: Uuid,
    pub name: String,
    pub description: String,
    pub version: u32,
}

impl Snapshot for BidSnapshot {
    type Patch = BidPatch;

    fn version(&self) -> u32 {
        self.version
    }

    fn into_patch(self) -> BidPatch {
        BidPatch {
            name: Some(self.name),
            description: Some(self.description),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bid(status: BidStatus) -> Bid {
        Bid {
            id: Uuid::new_v4(),
            tender_id: Uuid::new_v4(),
            creator_id: Uuid::new_v4(),
            organization_id: Uuid::new_v4(),
            author_type: AuthorType::User,
            status,
            version: 1,
            name: "Asphalt".into(),
            description: String::new(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn only_canceled_bids_are_closed_for_changes() {
        assert!(bid(BidStatus::Created).ensure_open().is_ok());
        assert!(bid(BidStatus::Published).ensure_open().is_ok());

        let canceled = bid(BidStatus::Canceled);
        assert!(matches!(
            canceled.ensure_open(),
            Err(TenderHubError::BidCanceled { id }) if id == canceled.id
        ));
    }

    #[test]
    fn bid_patch_lists_supplied_fields() {
        let patch = BidPatch {
            description: Some("cheaper".into()),
            ..Default::default()
        };
        assert_eq!(patch.changes(), vec![("description", "cheaper".to_string())]);
    }
}
