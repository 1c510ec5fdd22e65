//! Bid service: submission, listings, versioned edits, rollback, and
//! status changes.
//!
//! Bids are governed by the bidder's organization, captured at
//! creation. A canceled bid accepts no further changes.

use tenderhub_core::error::{TenderHubError, TenderHubResult};
use tenderhub_core::models::bid::{AuthorType, Bid, BidPatch, BidSnapshot, BidStatus, CreateBid};
use tenderhub_core::models::user::User;
use tenderhub_core::repository::{
    BidRepository, OrganizationRepository, TenderRepository, UserRepository,
};
use tenderhub_core::status::{DocumentStatus, StringEnum};
use tracing::{info, warn};
use uuid::Uuid;

use crate::config::EngineConfig;
use crate::error::LogUnknown;
use crate::gate::AuthorizationGate;
use crate::requests::{
    CreateBidRequest, EditBidRequest, ListMineRequest, ListTenderBidsRequest, require, supplied,
};
use crate::versioning;
use crate::views::BidView;

pub struct BidService<U, O, T, B>
where
    U: UserRepository,
    O: OrganizationRepository,
    T: TenderRepository,
    B: BidRepository,
{
    gate: AuthorizationGate<U, O>,
    tenders: T,
    bids: B,
    config: EngineConfig,
}

impl<U, O, T, B> BidService<U, O, T, B>
where
    U: UserRepository,
    O: OrganizationRepository,
    T: TenderRepository,
    B: BidRepository,
{
    pub fn new(gate: AuthorizationGate<U, O>, tenders: T, bids: B, config: EngineConfig) -> Self {
        Self {
            gate,
            tenders,
            bids,
            config,
        }
    }

    /// Resolve the user and the bid, and require the user to act for the
    /// bidder's organization.
    async fn authorize(&self, bid_id: Uuid, username: &str) -> TenderHubResult<(User, Bid)> {
        let user = self.gate.resolve_user(username).await?;
        let bid = self.bids.get_by_id(bid_id).await?;
        self.gate
            .require_responsible(bid.organization_id, &user)
            .await?;
        Ok((user, bid))
    }

    /// Submit a bid on a tender. Responsible users of the tender's own
    /// organization may not bid on it.
    pub async fn create_bid(&self, request: CreateBidRequest) -> TenderHubResult<BidView> {
        let result: TenderHubResult<BidView> = async {
            let author_type = AuthorType::parse(&request.author_type)?;
            require("name", &request.name)?;

            let author = self.gate.resolve_user_id(request.author_id).await?;
            let tender = self.tenders.get_by_id(request.tender_id).await?;

            if self
                .gate
                .is_responsible(tender.organization_id, author.id)
                .await?
            {
                warn!(
                    tender_id = %tender.id,
                    author = %author.username,
                    "Denied: bid on own organization's tender"
                );
                return Err(TenderHubError::SelfBid {
                    tender_id: tender.id,
                });
            }

            let organization_id = self.gate.organization_of(&author).await?;

            let bid = self
                .bids
                .create(CreateBid {
                    tender_id: tender.id,
                    creator_id: author.id,
                    organization_id,
                    author_type,
                    name: request.name,
                    description: request.description,
                })
                .await?;

            info!(
                bid_id = %bid.id,
                tender_id = %bid.tender_id,
                %organization_id,
                author = %author.username,
                "Bid created"
            );
            Ok(bid.into())
        }
        .await;
        result.log_unknown("create_bid")
    }

    pub async fn list_mine(&self, request: ListMineRequest) -> TenderHubResult<Vec<BidView>> {
        let result: TenderHubResult<Vec<BidView>> = async {
            let user = self.gate.resolve_user(&request.username).await?;
            let pagination = self.config.page(request.limit, request.offset);
            let bids = self.bids.list_by_creator(user.id, pagination).await?;
            Ok(bids.into_iter().map(BidView::from).collect())
        }
        .await;
        result.log_unknown("list_my_bids")
    }

    /// Published bids on a tender, for the tender organization's
    /// responsible users.
    pub async fn list_for_tender(
        &self,
        request: ListTenderBidsRequest,
    ) -> TenderHubResult<Vec<BidView>> {
        let result: TenderHubResult<Vec<BidView>> = async {
            let user = self.gate.resolve_user(&request.username).await?;
            let tender = self.tenders.get_by_id(request.tender_id).await?;
            self.gate
                .require_responsible(tender.organization_id, &user)
                .await?;

            let pagination = self.config.page(request.limit, request.offset);
            let bids = self
                .bids
                .list_by_tender(tender.id, BidStatus::Published, pagination)
                .await?;
            Ok(bids.into_iter().map(BidView::from).collect())
        }
        .await;
        result.log_unknown("list_tender_bids")
    }

    /// Visible to the bid's author and to the bidder organization's
    /// responsible users.
    pub async fn get_status(&self, bid_id: Uuid, username: &str) -> TenderHubResult<BidStatus> {
        let result: TenderHubResult<BidStatus> = async {
            let user = self.gate.resolve_user(username).await?;
            let bid = self.bids.get_by_id(bid_id).await?;
            if bid.creator_id != user.id {
                self.gate
                    .require_responsible(bid.organization_id, &user)
                    .await?;
            }
            Ok(bid.status)
        }
        .await;
        result.log_unknown("get_bid_status")
    }

    /// The status value is checked before any lookup.
    pub async fn change_status(
        &self,
        bid_id: Uuid,
        status: &str,
        username: &str,
    ) -> TenderHubResult<BidView> {
        let result: TenderHubResult<BidView> = async {
            let status = BidStatus::parse(status)?;
            let (user, bid) = self.authorize(bid_id, username).await?;

            if !bid.status.can_transition_to(status) {
                warn!(%bid_id, to = status.as_str(), "Rejected: bid is canceled");
                return Err(TenderHubError::BidCanceled { id: bid.id });
            }

            let updated = self.bids.set_status(bid.id, status).await?;
            info!(
                %bid_id,
                from = bid.status.as_str(),
                to = status.as_str(),
                by = %user.username,
                "Bid status changed"
            );
            Ok(updated.into())
        }
        .await;
        result.log_unknown("change_bid_status")
    }

    pub async fn edit(&self, request: EditBidRequest) -> TenderHubResult<BidView> {
        let result: TenderHubResult<BidView> = async {
            let (_, bid) = self.authorize(request.bid_id, &request.username).await?;
            bid.ensure_open()?;
            let patch = BidPatch {
                name: supplied(request.name),
                description: supplied(request.description),
            };
            let edited = versioning::edit(&self.bids, &bid, patch).await?;
            Ok(edited.into())
        }
        .await;
        result.log_unknown("edit_bid")
    }

    pub async fn rollback(
        &self,
        bid_id: Uuid,
        version: u32,
        username: &str,
    ) -> TenderHubResult<BidView> {
        let result: TenderHubResult<BidView> = async {
            let (_, bid) = self.authorize(bid_id, username).await?;
            bid.ensure_open()?;
            let restored = versioning::roll_back(&self.bids, &bid, version).await?;
            Ok(restored.into())
        }
        .await;
        result.log_unknown("rollback_bid")
    }

    pub async fn history(
        &self,
        bid_id: Uuid,
        version: u32,
        username: &str,
    ) -> TenderHubResult<BidSnapshot> {
        let result: TenderHubResult<BidSnapshot> = async {
            let (_, bid) = self.authorize(bid_id, username).await?;
            self.bids.get_history(bid.id, version).await
        }
        .await;
        result.log_unknown("get_bid_history")
    }
}
