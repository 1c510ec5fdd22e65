//! SurrealDB implementation of [`ReviewRepository`] (append-only).

use chrono::{DateTime, Utc};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use tenderhub_core::error::TenderHubResult;
use tenderhub_core::models::review::{CreateReview, Review};
use tenderhub_core::repository::{Pagination, ReviewRepository};
use uuid::Uuid;

use super::parse_uuid;
use crate::error::DbError;

#[derive(Debug, SurrealValue)]
struct ReviewRow {
    offer_id: String,
    creator_id: String,
    content: String,
    created_at: DateTime<Utc>,
}

#[derive(Debug, SurrealValue)]
struct ReviewRowWithId {
    record_id: String,
    offer_id: String,
    creator_id: String,
    content: String,
    created_at: DateTime<Utc>,
}

impl ReviewRowWithId {
    fn try_into_review(self) -> Result<Review, DbError> {
        Ok(Review {
            id: parse_uuid(&self.record_id, "review")?,
            offer_id: parse_uuid(&self.offer_id, "offer")?,
            creator_id: parse_uuid(&self.creator_id, "creator")?,
            content: self.content,
            created_at: self.created_at,
        })
    }
}

/// SurrealDB implementation of the Review repository.
#[derive(Clone)]
pub struct SurrealReviewRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealReviewRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> ReviewRepository for SurrealReviewRepository<C> {
    async fn append(&self, input: CreateReview) -> TenderHubResult<Review> {
        // Time-ordered so rows sharing a timestamp still list in insertion order.
        let id = Uuid::now_v7();
        let id_str = id.to_string();

        let result = self
            .db
            .query(
                "CREATE type::record('review', $id) SET \
                 offer_id = $offer_id, creator_id = $creator_id, \
                 content = $content",
            )
            .bind(("id", id_str.clone()))
            .bind(("offer_id", input.offer_id.to_string()))
            .bind(("creator_id", input.creator_id.to_string()))
            .bind(("content", input.content))
            .await
            .map_err(DbError::from)?;

        let mut result = result
            .check()
            .map_err(|e| DbError::Query(e.to_string()))?;

        let rows: Vec<ReviewRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "review".into(),
            id: id_str,
        })?;

        Ok(Review {
            id,
            offer_id: parse_uuid(&row.offer_id, "offer")?,
            creator_id: parse_uuid(&row.creator_id, "creator")?,
            content: row.content,
            created_at: row.created_at,
        })
    }

    async fn list_by_offer(
        &self,
        offer_id: Uuid,
        pagination: Pagination,
    ) -> TenderHubResult<Vec<Review>> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM review \
                 WHERE offer_id = $offer_id \
                 ORDER BY created_at ASC, id ASC \
                 LIMIT $limit START $offset",
            )
            .bind(("offer_id", offer_id.to_string()))
            .bind(("limit", pagination.limit))
            .bind(("offset", pagination.offset))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<ReviewRowWithId> = result.take(0).map_err(DbError::from)?;

        let reviews = rows
            .into_iter()
            .map(|row| row.try_into_review())
            .collect::<Result<Vec<_>, DbError>>()?;

        Ok(reviews)
    }
}
