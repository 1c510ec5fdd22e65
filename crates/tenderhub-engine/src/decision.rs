//! Approval tally: decisions cast on a bid by the responsible users of
//! the tender's organization.
//!
//! The tally only reports facts. Whether a quorum should move the bid
//! to another status is left to the calling workflow.

use tenderhub_core::error::TenderHubResult;
use tenderhub_core::models::decision::{CreateDecision, DecisionKind};
use tenderhub_core::repository::{
    BidRepository, DecisionRepository, OrganizationRepository, TenderRepository, UserRepository,
};
use tenderhub_core::status::StringEnum;
use tracing::info;
use uuid::Uuid;

use crate::error::LogUnknown;
use crate::gate::AuthorizationGate;
use crate::requests::SubmitDecisionRequest;
use crate::views::{DecisionView, QuorumView};

pub struct DecisionService<U, O, T, B, D>
where
    U: UserRepository,
    O: OrganizationRepository,
    T: TenderRepository,
    B: BidRepository,
    D: DecisionRepository,
{
    gate: AuthorizationGate<U, O>,
    tenders: T,
    bids: B,
    decisions: D,
}

impl<U, O, T, B, D> DecisionService<U, O, T, B, D>
where
    U: UserRepository,
    O: OrganizationRepository,
    T: TenderRepository,
    B: BidRepository,
    D: DecisionRepository,
{
    pub fn new(gate: AuthorizationGate<U, O>, tenders: T, bids: B, decisions: D) -> Self {
        Self {
            gate,
            tenders,
            bids,
            decisions,
        }
    }

    /// Record one vote. Repeated votes by the same user are stored as
    /// separate decisions.
    pub async fn submit(&self, request: SubmitDecisionRequest) -> TenderHubResult<DecisionView> {
        let result: TenderHubResult<DecisionView> = async {
            let decision = DecisionKind::parse(&request.decision)?;

            let user = self.gate.resolve_user(&request.username).await?;
            let bid = self.bids.get_by_id(request.bid_id).await?;
            let tender = self.tenders.get_by_id(bid.tender_id).await?;
            self.gate
                .require_responsible(tender.organization_id, &user)
                .await?;
            bid.ensure_open()?;

            let recorded = self
                .decisions
                .record(CreateDecision {
                    offer_id: bid.id,
                    user_id: user.id,
                    decision,
                })
                .await?;

            info!(
                bid_id = %bid.id,
                decision = decision.as_str(),
                by = %user.username,
                "Decision recorded"
            );
            Ok(recorded.into())
        }
        .await;
        result.log_unknown("submit_decision")
    }

    /// Every vote cast on a bid, oldest first. Visible to the same
    /// responsible users who may vote.
    pub async fn list(&self, bid_id: Uuid, username: &str) -> TenderHubResult<Vec<DecisionView>> {
        let result: TenderHubResult<Vec<DecisionView>> = async {
            let user = self.gate.resolve_user(username).await?;
            let bid = self.bids.get_by_id(bid_id).await?;
            let tender = self.tenders.get_by_id(bid.tender_id).await?;
            self.gate
                .require_responsible(tender.organization_id, &user)
                .await?;

            let decisions = self.decisions.list_by_offer(bid.id).await?;
            Ok(decisions.into_iter().map(DecisionView::from).collect::<Vec<_>>())
        }
        .await;
        result.log_unknown("list_decisions")
    }

    pub async fn approval_count(&self, bid_id: Uuid) -> TenderHubResult<u64> {
        self.decisions
            .approval_count(bid_id)
            .await
            .log_unknown("approval_count")
    }

    /// Approvals against the responsible-user count of the bidder's
    /// organization.
    pub async fn quorum(&self, bid_id: Uuid) -> TenderHubResult<QuorumView> {
        let result: TenderHubResult<QuorumView> = async {
            let bid = self.bids.get_by_id(bid_id).await?;
            let approvals = self.decisions.approval_count(bid.id).await?;
            let responsible_users = self.gate.responsible_count(bid.organization_id).await?;
            Ok(QuorumView::new(approvals, responsible_users))
        }
        .await;
        result.log_unknown("quorum")
    }
}
