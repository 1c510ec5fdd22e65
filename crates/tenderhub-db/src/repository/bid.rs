//! SurrealDB implementation of [`BidRepository`].
//!
//! Bids are stored in the `offer` table, their history in
//! `offer_history`.

use chrono::{DateTime, Utc};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use tenderhub_core::error::TenderHubResult;
use tenderhub_core::models::bid::{Bid, BidPatch, BidSnapshot, BidStatus, CreateBid};
use tenderhub_core::repository::{BidRepository, Pagination, VersionedRepository};
use tenderhub_core::status::StringEnum;
use tenderhub_core::versioning::{DocumentPatch, INITIAL_VERSION};
use uuid::Uuid;

use super::versioned::{CurrentRevision, HistoryTable, snapshot_then_update};
use super::{parse_enum, parse_uuid};
use crate::error::DbError;

const OFFER_HISTORY: HistoryTable = HistoryTable {
    document: "offer",
    history: "offer_history",
    key_field: "offer_id",
};

#[derive(Debug, SurrealValue)]
struct OfferRow {
    tender_id: String,
    creator_id: String,
    organization_id: String,
    author_type: String,
    status: String,
    version: u32,
    name: String,
    description: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl OfferRow {
    fn into_bid(self, id: Uuid) -> Result<Bid, DbError> {
        Ok(Bid {
            id,
            tender_id: parse_uuid(&self.tender_id, "tender")?,
            creator_id: parse_uuid(&self.creator_id, "creator")?,
            organization_id: parse_uuid(&self.organization_id, "organization")?,
            author_type: parse_enum(&self.author_type)?,
            status: parse_enum(&self.status)?,
            version: self.version,
            name: self.name,
            description: self.description,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(Debug, SurrealValue)]
struct OfferRowWithId {
    record_id: String,
    tender_id: String,
    creator_id: String,
    organization_id: String,
    author_type: String,
    status: String,
    version: u32,
    name: String,
    description: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl OfferRowWithId {
    fn try_into_bid(self) -> Result<Bid, DbError> {
        let id = parse_uuid(&self.record_id, "offer")?;
        OfferRow {
            tender_id: self.tender_id,
            creator_id: self.creator_id,
            organization_id: self.organization_id,
            author_type: self.author_type,
            status: self.status,
            version: self.version,
            name: self.name,
            description: self.description,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
        .into_bid(id)
    }
}

#[derive(Debug, SurrealValue)]
struct OfferHistoryRow {
    offer_id: String,
    creator_id: String,
    name: String,
    description: String,
    version: u32,
}

fn into_bids(rows: Vec<OfferRowWithId>) -> Result<Vec<Bid>, DbError> {
    rows.into_iter()
        .map(|row| row.try_into_bid())
        .collect::<Result<Vec<_>, DbError>>()
}

/// SurrealDB implementation of the Bid repository.
#[derive(Clone)]
pub struct SurrealBidRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealBidRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }

    async fn fetch(&self, id: Uuid) -> Result<Bid, DbError> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query("SELECT * FROM type::record('offer', $id)")
            .bind(("id", id_str.clone()))
            .await?;

        let rows: Vec<OfferRow> = result.take(0)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "bid".into(),
            id: id_str,
        })?;

        row.into_bid(id)
    }
}

impl<C: Connection> VersionedRepository<Bid> for SurrealBidRepository<C> {
    async fn edit(&self, id: Uuid, patch: BidPatch) -> TenderHubResult<Bid> {
        let current = self.fetch(id).await?;
        let changes = patch.changes();
        if changes.is_empty() {
            return Ok(current);
        }

        let revision = CurrentRevision {
            creator_id: current.creator_id.to_string(),
            version: current.version,
            fields: vec![
                ("name", current.name),
                ("description", current.description),
            ],
        };
        snapshot_then_update(&self.db, &OFFER_HISTORY, &id.to_string(), revision, changes).await?;

        Ok(self.fetch(id).await?)
    }

    async fn get_history(&self, id: Uuid, version: u32) -> TenderHubResult<BidSnapshot> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query(
                "SELECT * FROM offer_history \
                 WHERE offer_id = $id AND version = $version LIMIT 1",
            )
            .bind(("id", id_str.clone()))
            .bind(("version", version))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<OfferHistoryRow> = result.take(0).map_err(DbError::from)?;
        let row = rows
            .into_iter()
            .next()
            .ok_or_else(|| DbError::HistoryNotFound {
                entity: "bid".into(),
                id: id_str,
                version,
            })?;

        Ok(BidSnapshot {
            offer_id: parse_uuid(&row.offer_id, "offer")?,
            creator_id: parse_uuid(&row.creator_id, "creator")?,
            name: row.name,
            description: row.description,
            version: row.version,
        })
    }
}

impl<C: Connection> BidRepository for SurrealBidRepository<C> {
    async fn create(&self, input: CreateBid) -> TenderHubResult<Bid> {
        let id = Uuid::new_v4();
        let id_str = id.to_string();

        let result = self
            .db
            .query(
                "CREATE type::record('offer', $id) SET \
                 tender_id = $tender_id, creator_id = $creator_id, \
                 organization_id = $organization_id, \
                 author_type = $author_type, \
                 status = $status, version = $version, \
                 name = $name, description = $description",
            )
            .bind(("id", id_str.clone()))
            .bind(("tender_id", input.tender_id.to_string()))
            .bind(("creator_id", input.creator_id.to_string()))
            .bind(("organization_id", input.organization_id.to_string()))
            .bind(("author_type", input.author_type.as_str()))
            .bind(("status", BidStatus::Created.as_str()))
            .bind(("version", INITIAL_VERSION))
            .bind(("name", input.name))
            .bind(("description", input.description))
            .await
            .map_err(DbError::from)?;

        let mut result = result
            .check()
            .map_err(|e| DbError::Query(e.to_string()))?;

        let rows: Vec<OfferRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "bid".into(),
            id: id_str,
        })?;

        Ok(row.into_bid(id)?)
    }

    async fn get_by_id(&self, id: Uuid) -> TenderHubResult<Bid> {
        Ok(self.fetch(id).await?)
    }

    async fn list_by_creator(
        &self,
        creator_id: Uuid,
        pagination: Pagination,
    ) -> TenderHubResult<Vec<Bid>> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM offer \
                 WHERE creator_id = $creator_id \
                 ORDER BY name ASC \
                 LIMIT $limit START $offset",
            )
            .bind(("creator_id", creator_id.to_string()))
            .bind(("limit", pagination.limit))
            .bind(("offset", pagination.offset))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<OfferRowWithId> = result.take(0).map_err(DbError::from)?;
        Ok(into_bids(rows)?)
    }

    async fn list_by_tender(
        &self,
        tender_id: Uuid,
        status: BidStatus,
        pagination: Pagination,
    ) -> TenderHubResult<Vec<Bid>> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM offer \
                 WHERE tender_id = $tender_id AND status = $status \
                 ORDER BY name ASC \
                 LIMIT $limit START $offset",
            )
            .bind(("tender_id", tender_id.to_string()))
            .bind(("status", status.as_str()))
            .bind(("limit", pagination.limit))
            .bind(("offset", pagination.offset))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<OfferRowWithId> = result.take(0).map_err(DbError::from)?;
        Ok(into_bids(rows)?)
    }

    async fn set_status(&self, id: Uuid, status: BidStatus) -> TenderHubResult<Bid> {
        let id_str = id.to_string();

        let result = self
            .db
            .query(
                "UPDATE type::record('offer', $id) SET \
                 status = $status, updated_at = time::now()",
            )
            .bind(("id", id_str.clone()))
            .bind(("status", status.as_str()))
            .await
            .map_err(DbError::from)?;

        let mut result = result
            .check()
            .map_err(|e| DbError::Query(e.to_string()))?;

        let rows: Vec<OfferRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "bid".into(),
            id: id_str,
        })?;

        Ok(row.into_bid(id)?)
    }
}
