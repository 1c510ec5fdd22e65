//! Repository trait definitions for data access abstraction.
//!
//! All repository operations are async. A "no rows" condition surfaces
//! as [`TenderHubError::NotFound`](crate::error::TenderHubError::NotFound)
//! (or `HistoryNotFound` for snapshots); any other store failure as
//! `Database`.

use uuid::Uuid;

use crate::error::TenderHubResult;
use crate::models::{
    bid::{Bid, BidStatus, CreateBid},
    decision::{CreateDecision, Decision},
    organization::{CreateOrganization, Organization},
    review::{CreateReview, Review},
    tender::{CreateTender, Tender, TenderFilter, TenderStatus},
    user::{CreateUser, User},
};
use crate::versioning::Versioned;

/// Pagination parameters for list queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub offset: u64,
    pub limit: u64,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            offset: 0,
            limit: 5,
        }
    }
}

// ---------------------------------------------------------------------------
// Identity
// ---------------------------------------------------------------------------

pub trait UserRepository: Send + Sync {
    fn create(&self, input: CreateUser) -> impl Future<Output = TenderHubResult<User>> + Send;
    fn get_by_id(&self, id: Uuid) -> impl Future<Output = TenderHubResult<User>> + Send;
    fn get_by_username(
        &self,
        username: &str,
    ) -> impl Future<Output = TenderHubResult<User>> + Send;
}

pub trait OrganizationRepository: Send + Sync {
    fn create(
        &self,
        input: CreateOrganization,
    ) -> impl Future<Output = TenderHubResult<Organization>> + Send;
    fn get_by_id(&self, id: Uuid) -> impl Future<Output = TenderHubResult<Organization>> + Send;

    /// Register a user as responsible for an organization (creates a
    /// `responsible_for` edge). Registering twice is a no-op.
    fn add_responsible(
        &self,
        organization_id: Uuid,
        user_id: Uuid,
    ) -> impl Future<Output = TenderHubResult<()>> + Send;

    /// Whether the user is one of the organization's responsible users.
    fn is_responsible(
        &self,
        organization_id: Uuid,
        user_id: Uuid,
    ) -> impl Future<Output = TenderHubResult<bool>> + Send;

    /// The organization a user is responsible for.
    fn organization_of(&self, user_id: Uuid) -> impl Future<Output = TenderHubResult<Uuid>> + Send;

    fn responsible_count(
        &self,
        organization_id: Uuid,
    ) -> impl Future<Output = TenderHubResult<u64>> + Send;
}

// ---------------------------------------------------------------------------
// Versioned documents
// ---------------------------------------------------------------------------

/// Storage half of the versioned document pattern.
pub trait VersionedRepository<D: Versioned>: Send + Sync {
    /// Apply a patch as one atomic unit: write a history snapshot of the
    /// current values tagged with the current version, update the live
    /// document, increment its version, and stamp `updated_at`.
    ///
    /// An empty patch writes nothing and returns the document unchanged.
    fn edit(&self, id: Uuid, patch: D::Patch) -> impl Future<Output = TenderHubResult<D>> + Send;

    /// Exact-version snapshot lookup.
    fn get_history(
        &self,
        id: Uuid,
        version: u32,
    ) -> impl Future<Output = TenderHubResult<D::Snapshot>> + Send;
}

pub trait TenderRepository: VersionedRepository<Tender> {
    fn create(&self, input: CreateTender) -> impl Future<Output = TenderHubResult<Tender>> + Send;
    fn get_by_id(&self, id: Uuid) -> impl Future<Output = TenderHubResult<Tender>> + Send;

    /// Published tenders matching the filter, ordered by name.
    fn list_published(
        &self,
        filter: TenderFilter,
        pagination: Pagination,
    ) -> impl Future<Output = TenderHubResult<Vec<Tender>>> + Send;

    fn list_by_creator(
        &self,
        creator_id: Uuid,
        pagination: Pagination,
    ) -> impl Future<Output = TenderHubResult<Vec<Tender>>> + Send;

    /// Status changes are not versioned.
    fn set_status(
        &self,
        id: Uuid,
        status: TenderStatus,
    ) -> impl Future<Output = TenderHubResult<Tender>> + Send;
}

pub trait BidRepository: VersionedRepository<Bid> {
    fn create(&self, input: CreateBid) -> impl Future<Output = TenderHubResult<Bid>> + Send;
    fn get_by_id(&self, id: Uuid) -> impl Future<Output = TenderHubResult<Bid>> + Send;

    fn list_by_creator(
        &self,
        creator_id: Uuid,
        pagination: Pagination,
    ) -> impl Future<Output = TenderHubResult<Vec<Bid>>> + Send;

    fn list_by_tender(
        &self,
        tender_id: Uuid,
        status: BidStatus,
        pagination: Pagination,
    ) -> impl Future<Output = TenderHubResult<Vec<Bid>>> + Send;

    fn set_status(
        &self,
        id: Uuid,
        status: BidStatus,
    ) -> impl Future<Output = TenderHubResult<Bid>> + Send;
}

// ---------------------------------------------------------------------------
// Decisions & reviews (append-only)
// ---------------------------------------------------------------------------

pub trait DecisionRepository: Send + Sync {
    /// Append one vote. Repeated votes by the same user are kept.
    fn record(
        &self,
        input: CreateDecision,
    ) -> impl Future<Output = TenderHubResult<Decision>> + Send;

    /// Number of `Approved` decisions on the bid.
    fn approval_count(&self, offer_id: Uuid) -> impl Future<Output = TenderHubResult<u64>> + Send;

    fn list_by_offer(
        &self,
        offer_id: Uuid,
    ) -> impl Future<Output = TenderHubResult<Vec<Decision>>> + Send;
}

pub trait ReviewRepository: Send + Sync {
    fn append(&self, input: CreateReview) -> impl Future<Output = TenderHubResult<Review>> + Send;

    /// Reviews of a bid in insertion order.
    fn list_by_offer(
        &self,
        offer_id: Uuid,
        pagination: Pagination,
    ) -> impl Future<Output = TenderHubResult<Vec<Review>>> + Send;
}
