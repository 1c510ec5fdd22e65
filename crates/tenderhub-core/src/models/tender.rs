//! Tender domain model.
//!
//! A tender is a procurement request published by an organization. It is
//! mutated only by responsible users of that organization.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::status::{DocumentStatus, StringEnum};
use crate::versioning::{DocumentPatch, Snapshot, Versioned, push_change};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum TenderStatus {
    Created,
    Published,
    Closed,
}

impl StringEnum for TenderStatus {
    const FIELD: &'static str = "status";
    const ALL: &'static [Self] = &[Self::Created, Self::Published, Self::Closed];

    fn as_str(&self) -> &'static str {
        match self {
            TenderStatus::Created => "Created",
            TenderStatus::Published => "Published",
            TenderStatus::Closed => "Closed",
        }
    }
}

impl DocumentStatus for TenderStatus {}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tender {
    pub id: Uuid,
    pub organization_id: Uuid,
    pub creator_id: Uuid,
    pub status: TenderStatus,
    pub version: u32,
    pub service_type: String,
    pub name: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Versioned for Tender {
    type Patch = TenderPatch;
    type Snapshot = TenderSnapshot;

    const ENTITY: &'static str = "tender";

    fn id(&self) -> Uuid {
        self.id
    }

    fn version(&self) -> u32 {
        self.version
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTender {
    pub organization_id: Uuid,
    pub creator_id: Uuid,
    pub status: TenderStatus,
    pub service_type: String,
    pub name: String,
    pub description: String,
}

/// Editable tender fields; `None` leaves the field unchanged.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct TenderPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub service_type: Option<String>,
}

impl DocumentPatch for TenderPatch {
    fn changes(&self) -> Vec<(&'static str, String)> {
        let mut changes = Vec::new();
        push_change(&mut changes, "name", &self.name);
        push_change(&mut changes, "description", &self.description);
        push_change(&mut changes, "service_type", &self.service_type);
        changes
    }
}

/// Tender field values as they were immediately before the edit that
/// produced `version + 1`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TenderSnapshot {
    pub tender_id: Uuid,
    pub creator_id: Uuid,
    pub service_type: String,
    pub name: String,
    pub description: String,
    pub version: u32,
}

impl Snapshot for TenderSnapshot {
    type Patch = TenderPatch;

    fn version(&self) -> u32 {
        self.version
    }

    fn into_patch(self) -> TenderPatch {
        TenderPatch {
            name: Some(self.name),
            description: Some(self.description),
            service_type: Some(self.service_type),
        }
    }
}

/// Filter for the public tender listing.
#[derive(Debug, Clone, Default)]
pub struct TenderFilter {
    /// Match any of these service types; empty matches all.
    pub service_types: Vec<String>,
}
