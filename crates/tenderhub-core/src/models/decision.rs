//! Approval decision domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::status::StringEnum;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum DecisionKind {
    Approved,
    Rejected,
}

impl StringEnum for DecisionKind {
    const FIELD: &'static str = "decision";
    const ALL: &'static [Self] = &[Self::Approved, Self::Rejected];

    fn as_str(&self) -> &'static str {
        match self {
            DecisionKind::Approved => "Approved",
            DecisionKind::Rejected => "Rejected",
        }
    }
}

/// One responsible user's vote on a bid.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Decision {
    pub id: Uuid,
    pub offer_id: Uuid,
    pub user_id: Uuid,
    pub decision: DecisionKind,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateDecision {
    pub offer_id: Uuid,
    pub user_id: Uuid,
    pub decision: DecisionKind,
}
