//! SurrealDB implementation of [`OrganizationRepository`].
//!
//! Responsibility is stored as a `responsible_for` edge from a user to
//! an organization.

use chrono::{DateTime, Utc};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use tenderhub_core::error::TenderHubResult;
use tenderhub_core::models::organization::{CreateOrganization, Organization};
use tenderhub_core::repository::OrganizationRepository;
use tracing::debug;
use uuid::Uuid;

use super::{CountRow, parse_uuid};
use crate::error::DbError;

#[derive(Debug, SurrealValue)]
struct OrganizationRow {
    name: String,
    description: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl OrganizationRow {
    fn into_organization(self, id: Uuid) -> Organization {
        Organization {
            id,
            name: self.name,
            description: self.description,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// Target of a `responsible_for` edge.
#[derive(Debug, SurrealValue)]
struct ResponsibilityRow {
    organization_id: String,
    #[allow(dead_code)]
    created_at: DateTime<Utc>,
}

/// SurrealDB implementation of the Organization repository.
#[derive(Clone)]
pub struct SurrealOrganizationRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealOrganizationRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }

    async fn edge_count(&self, organization_id: Uuid, user_id: Uuid) -> Result<u64, DbError> {
        let mut result = self
            .db
            .query(
                "SELECT count() AS total FROM responsible_for \
                 WHERE in = type::record('user', $user_id) \
                 AND out = type::record('organization', $org_id) GROUP ALL",
            )
            .bind(("user_id", user_id.to_string()))
            .bind(("org_id", organization_id.to_string()))
            .await?;

        let rows: Vec<CountRow> = result.take(0)?;
        Ok(rows.first().map(|r| r.total).unwrap_or(0))
    }
}

impl<C: Connection> OrganizationRepository for SurrealOrganizationRepository<C> {
    async fn create(&self, input: CreateOrganization) -> TenderHubResult<Organization> {
        let id = Uuid::new_v4();
        let id_str = id.to_string();

        let result = self
            .db
            .query(
                "CREATE type::record('organization', $id) SET \
                 name = $name, description = $description",
            )
            .bind(("id", id_str.clone()))
            .bind(("name", input.name))
            .bind(("description", input.description))
            .await
            .map_err(DbError::from)?;

        let mut result = result
            .check()
            .map_err(|e| DbError::Query(e.to_string()))?;

        let rows: Vec<OrganizationRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "organization".into(),
            id: id_str,
        })?;

        Ok(row.into_organization(id))
    }

    async fn get_by_id(&self, id: Uuid) -> TenderHubResult<Organization> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query("SELECT * FROM type::record('organization', $id)")
            .bind(("id", id_str.clone()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<OrganizationRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "organization".into(),
            id: id_str,
        })?;

        Ok(row.into_organization(id))
    }

    async fn add_responsible(&self, organization_id: Uuid, user_id: Uuid) -> TenderHubResult<()> {
        let user_id_str = user_id.to_string();
        let org_id_str = organization_id.to_string();

        // Verify both ends exist before relating them.
        let mut check = self
            .db
            .query(
                "SELECT count() AS total FROM user \
                 WHERE id = type::record('user', $user_id) GROUP ALL; \
                 SELECT count() AS total FROM organization \
                 WHERE id = type::record('organization', $org_id) GROUP ALL;",
            )
            .bind(("user_id", user_id_str.clone()))
            .bind(("org_id", org_id_str.clone()))
            .await
            .map_err(DbError::from)?;

        let user_count: Vec<CountRow> = check.take(0).map_err(DbError::from)?;
        if user_count.first().map(|r| r.total).unwrap_or(0) == 0 {
            return Err(DbError::NotFound {
                entity: "user".into(),
                id: user_id_str,
            }
            .into());
        }

        let org_count: Vec<CountRow> = check.take(1).map_err(DbError::from)?;
        if org_count.first().map(|r| r.total).unwrap_or(0) == 0 {
            return Err(DbError::NotFound {
                entity: "organization".into(),
                id: org_id_str,
            }
            .into());
        }

        if self.edge_count(organization_id, user_id).await? > 0 {
            debug!(%organization_id, %user_id, "Responsibility already registered");
            return Ok(());
        }

        let query = format!(
            "RELATE user:`{user_id_str}` -> responsible_for -> organization:`{org_id_str}`;"
        );

        self.db
            .query(query)
            .await
            .map_err(DbError::from)?
            .check()
            .map_err(|e| DbError::Query(e.to_string()))?;

        Ok(())
    }

    async fn is_responsible(&self, organization_id: Uuid, user_id: Uuid) -> TenderHubResult<bool> {
        Ok(self.edge_count(organization_id, user_id).await? > 0)
    }

    async fn organization_of(&self, user_id: Uuid) -> TenderHubResult<Uuid> {
        let user_id_str = user_id.to_string();

        let mut result = self
            .db
            .query(
                "SELECT meta::id(out) AS organization_id, created_at \
                 FROM responsible_for \
                 WHERE in = type::record('user', $user_id) \
                 ORDER BY created_at ASC LIMIT 1",
            )
            .bind(("user_id", user_id_str.clone()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<ResponsibilityRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "organization".into(),
            id: format!("responsible_user={user_id_str}"),
        })?;

        Ok(parse_uuid(&row.organization_id, "organization")?)
    }

    async fn responsible_count(&self, organization_id: Uuid) -> TenderHubResult<u64> {
        let mut result = self
            .db
            .query(
                "SELECT count() AS total FROM responsible_for \
                 WHERE out = type::record('organization', $org_id) GROUP ALL",
            )
            .bind(("org_id", organization_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<CountRow> = result.take(0).map_err(DbError::from)?;
        Ok(rows.first().map(|r| r.total).unwrap_or(0))
    }
}
