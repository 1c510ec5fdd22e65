//! SurrealDB implementation of [`TenderRepository`].

use chrono::{DateTime, Utc};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use tenderhub_core::error::TenderHubResult;
use tenderhub_core::models::tender::{
    CreateTender, Tender, TenderFilter, TenderPatch, TenderSnapshot, TenderStatus,
};
use tenderhub_core::repository::{Pagination, TenderRepository, VersionedRepository};
use tenderhub_core::status::StringEnum;
use tenderhub_core::versioning::{DocumentPatch, INITIAL_VERSION};
use uuid::Uuid;

use super::versioned::{CurrentRevision, HistoryTable, snapshot_then_update};
use super::{parse_enum, parse_uuid};
use crate::error::DbError;

const TENDER_HISTORY: HistoryTable = HistoryTable {
    document: "tender",
    history: "tender_history",
    key_field: "tender_id",
};

/// DB-side row struct for queries where the UUID is already known.
#[derive(Debug, SurrealValue)]
struct TenderRow {
    organization_id: String,
    creator_id: String,
    status: String,
    version: u32,
    service_type: String,
    name: String,
    description: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TenderRow {
    fn into_tender(self, id: Uuid) -> Result<Tender, DbError> {
        Ok(Tender {
            id,
            organization_id: parse_uuid(&self.organization_id, "organization")?,
            creator_id: parse_uuid(&self.creator_id, "creator")?,
            status: parse_enum(&self.status)?,
            version: self.version,
            service_type: self.service_type,
            name: self.name,
            description: self.description,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// DB-side row struct that includes the record ID via `meta::id(id)`.
#[derive(Debug, SurrealValue)]
struct TenderRowWithId {
    record_id: String,
    organization_id: String,
    creator_id: String,
    status: String,
    version: u32,
    service_type: String,
    name: String,
    description: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TenderRowWithId {
    fn try_into_tender(self) -> Result<Tender, DbError> {
        let id = parse_uuid(&self.record_id, "tender")?;
        TenderRow {
            organization_id: self.organization_id,
            creator_id: self.creator_id,
            status: self.status,
            version: self.version,
            service_type: self.service_type,
            name: self.name,
            description: self.description,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
        .into_tender(id)
    }
}

#[derive(Debug, SurrealValue)]
struct TenderHistoryRow {
    tender_id: String,
    creator_id: String,
    service_type: String,
    name: String,
    description: String,
    version: u32,
}

/// SurrealDB implementation of the Tender repository.
#[derive(Clone)]
pub struct SurrealTenderRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealTenderRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }

    async fn fetch(&self, id: Uuid) -> Result<Tender, DbError> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query("SELECT * FROM type::record('tender', $id)")
            .bind(("id", id_str.clone()))
            .await?;

        let rows: Vec<TenderRow> = result.take(0)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "tender".into(),
            id: id_str,
        })?;

        row.into_tender(id)
    }
}

fn into_tenders(rows: Vec<TenderRowWithId>) -> Result<Vec<Tender>, DbError> {
    rows.into_iter()
        .map(|row| row.try_into_tender())
        .collect::<Result<Vec<_>, DbError>>()
}

impl<C: Connection> VersionedRepository<Tender> for SurrealTenderRepository<C> {
    async fn edit(&self, id: Uuid, patch: TenderPatch) -> TenderHubResult<Tender> {
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
                ("service_type", current.service_type),
            ],
        };
        snapshot_then_update(&self.db, &TENDER_HISTORY, &id.to_string(), revision, changes)
            .await?;

        Ok(self.fetch(id).await?)
    }

    async fn get_history(&self, id: Uuid, version: u32) -> TenderHubResult<TenderSnapshot> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query(
                "SELECT * FROM tender_history \
                 WHERE tender_id = $id AND version = $version LIMIT 1",
            )
            .bind(("id", id_str.clone()))
            .bind(("version", version))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<TenderHistoryRow> = result.take(0).map_err(DbError::from)?;
        let row = rows
            .into_iter()
            .next()
            .ok_or_else(|| DbError::HistoryNotFound {
                entity: "tender".into(),
                id: id_str,
                version,
            })?;

        Ok(TenderSnapshot {
            tender_id: parse_uuid(&row.tender_id, "tender")?,
            creator_id: parse_uuid(&row.creator_id, "creator")?,
            service_type: row.service_type,
            name: row.name,
            description: row.description,
            version: row.version,
        })
    }
}

impl<C: Connection> TenderRepository for SurrealTenderRepository<C> {
    async fn create(&self, input: CreateTender) -> TenderHubResult<Tender> {
        let id = Uuid::new_v4();
        let id_str = id.to_string();

        let result = self
            .db
            .query(
                "CREATE type::record('tender', $id) SET \
                 organization_id = $organization_id, \
                 creator_id = $creator_id, \
                 status = $status, version = $version, \
                 service_type = $service_type, \
                 name = $name, description = $description",
            )
            .bind(("id", id_str.clone()))
            .bind(("organization_id", input.organization_id.to_string()))
            .bind(("creator_id", input.creator_id.to_string()))
            .bind(("status", input.status.as_str()))
            .bind(("version", INITIAL_VERSION))
            .bind(("service_type", input.service_type))
            .bind(("name", input.name))
            .bind(("description", input.description))
            .await
            .map_err(DbError::from)?;

        let mut result = result
            .check()
            .map_err(|e| DbError::Query(e.to_string()))?;

        let rows: Vec<TenderRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "tender".into(),
            id: id_str,
        })?;

        Ok(row.into_tender(id)?)
    }

    async fn get_by_id(&self, id: Uuid) -> TenderHubResult<Tender> {
        Ok(self.fetch(id).await?)
    }

    async fn list_published(
        &self,
        filter: TenderFilter,
        pagination: Pagination,
    ) -> TenderHubResult<Vec<Tender>> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM tender \
                 WHERE status = $status \
                 AND (array::len($service_types) = 0 \
                      OR service_type IN $service_types) \
                 ORDER BY name ASC \
                 LIMIT $limit START $offset",
            )
            .bind(("status", TenderStatus::Published.as_str()))
            .bind(("service_types", filter.service_types))
            .bind(("limit", pagination.limit))
            .bind(("offset", pagination.offset))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<TenderRowWithId> = result.take(0).map_err(DbError::from)?;
        Ok(into_tenders(rows)?)
    }

    async fn list_by_creator(
        &self,
        creator_id: Uuid,
        pagination: Pagination,
    ) -> TenderHubResult<Vec<Tender>> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM tender \
                 WHERE creator_id = $creator_id \
                 ORDER BY name ASC \
                 LIMIT $limit START $offset",
            )
            .bind(("creator_id", creator_id.to_string()))
            .bind(("limit", pagination.limit))
            .bind(("offset", pagination.offset))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<TenderRowWithId> = result.take(0).map_err(DbError::from)?;
        Ok(into_tenders(rows)?)
    }

    async fn set_status(&self, id: Uuid, status: TenderStatus) -> TenderHubResult<Tender> {
        let id_str = id.to_string();

        let result = self
            .db
            .query(
                "UPDATE type::record('tender', $id) SET \
                 status = $status, updated_at = time::now()",
            )
            .bind(("id", id_str.clone()))
            .bind(("status", status.as_str()))
            .await
            .map_err(DbError::from)?;

        let mut result = result
            .check()
            .map_err(|e| DbError::Query(e.to_string()))?;

        let rows: Vec<TenderRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "tender".into(),
            id: id_str,
        })?;

        Ok(row.into_tender(id)?)
    }
}
