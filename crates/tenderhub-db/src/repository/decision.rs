//! SurrealDB implementation of [`DecisionRepository`] (append-only).

use chrono::{DateTime, Utc};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use tenderhub_core::error::TenderHubResult;
use tenderhub_core::models::decision::{CreateDecision, Decision, DecisionKind};
use tenderhub_core::repository::DecisionRepository;
use tenderhub_core::status::StringEnum;
use uuid::Uuid;

use super::{CountRow, parse_enum, parse_uuid};
use crate::error::DbError;

#[derive(Debug, SurrealValue)]
struct DecisionRow {
    offer_id: String,
    user_id: String,
    decision: String,
    created_at: DateTime<Utc>,
}

#[derive(Debug, SurrealValue)]
struct DecisionRowWithId {
    record_id: String,
    offer_id: String,
    user_id: String,
    decision: String,
    created_at: DateTime<Utc>,
}

impl DecisionRow {
    fn into_decision(self, id: Uuid) -> Result<Decision, DbError> {
        Ok(Decision {
            id,
            offer_id: parse_uuid(&self.offer_id, "offer")?,
            user_id: parse_uuid(&self.user_id, "user")?,
            decision: parse_enum(&self.decision)?,
            created_at: self.created_at,
        })
    }
}

/// SurrealDB implementation of the Decision repository.
#[derive(Clone)]
pub struct SurrealDecisionRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealDecisionRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> DecisionRepository for SurrealDecisionRepository<C> {
    async fn record(&self, input: CreateDecision) -> TenderHubResult<Decision> {
        // Time-ordered so rows sharing a timestamp still list in insertion order.
        let id = Uuid::now_v7();
        let id_str = id.to_string();

        let result = self
            .db
            .query(
                "CREATE type::record('decision', $id) SET \
                 offer_id = $offer_id, user_id = $user_id, \
                 decision = $decision",
            )
            .bind(("id", id_str.clone()))
            .bind(("offer_id", input.offer_id.to_string()))
            .bind(("user_id", input.user_id.to_string()))
            .bind(("decision", input.decision.as_str()))
            .await
            .map_err(DbError::from)?;

        let mut result = result
            .check()
            .map_err(|e| DbError::Query(e.to_string()))?;

        let rows: Vec<DecisionRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "decision".into(),
            id: id_str,
        })?;

        Ok(row.into_decision(id)?)
    }

    async fn approval_count(&self, offer_id: Uuid) -> TenderHubResult<u64> {
        let mut result = self
            .db
            .query(
                "SELECT count() AS total FROM decision \
                 WHERE offer_id = $offer_id AND decision = $decision \
                 GROUP ALL",
            )
            .bind(("offer_id", offer_id.to_string()))
            .bind(("decision", DecisionKind::Approved.as_str()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<CountRow> = result.take(0).map_err(DbError::from)?;
        Ok(rows.first().map(|r| r.total).unwrap_or(0))
    }

    async fn list_by_offer(&self, offer_id: Uuid) -> TenderHubResult<Vec<Decision>> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM decision \
                 WHERE offer_id = $offer_id \
                 ORDER BY created_at ASC, id ASC",
            )
            .bind(("offer_id", offer_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<DecisionRowWithId> = result.take(0).map_err(DbError::from)?;

        let decisions = rows
            .into_iter()
            .map(|row| {
                let id = parse_uuid(&row.record_id, "decision")?;
                DecisionRow {
                    offer_id: row.offer_id,
                    user_id: row.user_id,
                    decision: row.decision,
                    created_at: row.created_at,
                }
                .into_decision(id)
            })
            .collect::<Result<Vec<_>, DbError>>()?;

        Ok(decisions)
    }
}
