//! Review ledger: append-only feedback on bids.

use tenderhub_core::error::TenderHubResult;
use tenderhub_core::models::review::CreateReview;
use tenderhub_core::repository::{BidRepository, ReviewRepository, UserRepository};
use tracing::info;

use crate::config::EngineConfig;
use crate::error::LogUnknown;
use crate::gate::resolve_username;
use crate::requests::{AddReviewRequest, ListReviewsRequest, require};
use crate::views::ReviewView;

/// Reviews need a known author and nothing more.
pub struct ReviewService<U: UserRepository, B: BidRepository, R: ReviewRepository> {
    users: U,
    bids: B,
    reviews: R,
    config: EngineConfig,
}

impl<U, B, R> ReviewService<U, B, R>
where
    U: UserRepository,
    B: BidRepository,
    R: ReviewRepository,
{
    pub fn new(users: U, bids: B, reviews: R, config: EngineConfig) -> Self {
        Self {
            users,
            bids,
            reviews,
            config,
        }
    }

    pub async fn add(&self, request: AddReviewRequest) -> TenderHubResult<ReviewView> {
        let result: TenderHubResult<ReviewView> = async {
            require("content", &request.content)?;
            let user = resolve_username(&self.users, &request.username).await?;
            let bid = self.bids.get_by_id(request.bid_id).await?;

            let review = self
                .reviews
                .append(CreateReview {
                    offer_id: bid.id,
                    creator_id: user.id,
                    content: request.content,
                })
                .await?;

            info!(bid_id = %bid.id, review_id = %review.id, "Review added");
            Ok(review.into())
        }
        .await;
        result.log_unknown("add_review")
    }

    /// Reviews of a bid in insertion order.
    pub async fn list(&self, request: ListReviewsRequest) -> TenderHubResult<Vec<ReviewView>> {
        let pagination = self.config.page(request.limit, request.offset);
        self.reviews
            .list_by_offer(request.bid_id, pagination)
            .await
            .map(|reviews| reviews.into_iter().map(ReviewView::from).collect::<Vec<_>>())
            .log_unknown("list_reviews")
    }
}
