//! Response records handed to the transport layer.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use tenderhub_core::models::bid::{AuthorType, Bid, BidStatus};
use tenderhub_core::models::decision::{Decision, DecisionKind};
use tenderhub_core::models::organization::Organization;
use tenderhub_core::models::review::Review;
use tenderhub_core::models::tender::{Tender, TenderStatus};
use tenderhub_core::models::user::User;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TenderView {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub status: TenderStatus,
    pub service_type: String,
    pub version: u32,
    pub created_at: DateTime<Utc>,
}

impl From<Tender> for TenderView {
    fn from(tender: Tender) -> Self {
        Self {
            id: tender.id,
            name: tender.name,
            description: tender.description,
            status: tender.status,
            service_type: tender.service_type,
            version: tender.version,
            created_at: tender.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BidView {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub status: BidStatus,
    pub tender_id: Uuid,
    pub author_type: AuthorType,
    pub author_id: Uuid,
    pub version: u32,
    pub created_at: DateTime<Utc>,
}

impl From<Bid> for BidView {
    fn from(bid: Bid) -> Self {
        Self {
            id: bid.id,
            name: bid.name,
            description: bid.description,
            status: bid.status,
            tender_id: bid.tender_id,
            author_type: bid.author_type,
            author_id: bid.creator_id,
            version: bid.version,
            created_at: bid.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DecisionView {
    pub id: Uuid,
    pub bid_id: Uuid,
    pub decision: DecisionKind,
    pub created_at: DateTime<Utc>,
}

impl From<Decision> for DecisionView {
    fn from(decision: Decision) -> Self {
        Self {
            id: decision.id,
            bid_id: decision.offer_id,
            decision: decision.decision,
            created_at: decision.created_at,
        }
    }
}

/// Approval facts for a bid. Nothing in the engine acts on `reached`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuorumView {
    pub approvals: u64,
    pub responsible_users: u64,
    pub reached: bool,
}

impl QuorumView {
    pub fn new(approvals: u64, responsible_users: u64) -> Self {
        Self {
            approvals,
            responsible_users,
            reached: responsible_users > 0 && approvals >= responsible_users,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewView {
    pub id: Uuid,
    pub bid_id: Uuid,
    pub author_id: Uuid,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl From<Review> for ReviewView {
    fn from(review: Review) -> Self {
        Self {
            id: review.id,
            bid_id: review.offer_id,
            author_id: review.creator_id,
            content: review.content,
            created_at: review.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserView {
    pub id: Uuid,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
}

impl From<User> for UserView {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            first_name: user.first_name,
            last_name: user.last_name,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrganizationView {
    pub id: Uuid,
    pub name: String,
    pub description: String,
}

impl From<Organization> for OrganizationView {
    fn from(organization: Organization) -> Self {
        Self {
            id: organization.id,
            name: organization.name,
            description: organization.description,
        }
    }
}
