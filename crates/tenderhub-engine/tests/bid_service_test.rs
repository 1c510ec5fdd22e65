//! Integration tests for bids, decisions, and reviews.

mod common;

use tenderhub_core::error::{ErrorKind, TenderHubError};
use tenderhub_core::models::bid::{AuthorType, BidStatus};
use tenderhub_core::models::decision::DecisionKind;
use tenderhub_engine::requests::{
    AddReviewRequest, CreateBidRequest, EditBidRequest, ListMineRequest, ListReviewsRequest,
    ListTenderBidsRequest, SubmitDecisionRequest,
};
use uuid::Uuid;

use common::harness;

fn approve(bid_id: Uuid, username: &str) -> SubmitDecisionRequest {
    SubmitDecisionRequest {
        bid_id,
        decision: "Approved".into(),
        username: username.into(),
    }
}

#[tokio::test]
async fn responsible_user_cannot_bid_on_own_tender() {
    let h = harness().await;
    let org_1 = h.organization("org-1").await;
    let alice = h.member("alice", org_1).await;
    let tender = h.road_repair(org_1, "alice").await;

    let err = h
        .bids
        .create_bid(CreateBidRequest {
            name: "Self deal".into(),
            description: String::new(),
            tender_id: tender.id,
            author_type: "User".into(),
            author_id: alice,
        })
        .await
        .unwrap_err();
    assert!(matches!(err, TenderHubError::SelfBid { tender_id } if tender_id == tender.id));
    assert_eq!(err.kind(), ErrorKind::Unauthorized);
}

#[tokio::test]
async fn bidder_needs_an_organization() {
    let h = harness().await;
    let org_1 = h.organization("org-1").await;
    h.member("alice", org_1).await;
    let loner = h.user("loner").await;
    let tender = h.road_repair(org_1, "alice").await;

    let err = h
        .bids
        .create_bid(CreateBidRequest {
            name: "Offer".into(),
            description: String::new(),
            tender_id: tender.id,
            author_type: "User".into(),
            author_id: loner,
        })
        .await
        .unwrap_err();
    assert!(matches!(err, TenderHubError::NoOrganization { .. }));
}

#[tokio::test]
async fn create_bid_validates_author_type_and_tender() {
    let h = harness().await;
    let org_2 = h.organization("org-2").await;
    let bob = h.member("bob", org_2).await;

    let err = h
        .bids
        .create_bid(CreateBidRequest {
            name: "Offer".into(),
            description: String::new(),
            tender_id: Uuid::new_v4(),
            author_type: "Company".into(),
            author_id: bob,
        })
        .await
        .unwrap_err();
    assert!(matches!(err, TenderHubError::InvalidValue { ref field, .. } if field == "authorType"));

    let err = h
        .bids
        .create_bid(CreateBidRequest {
            name: "Offer".into(),
            description: String::new(),
            tender_id: Uuid::new_v4(),
            author_type: "Organization".into(),
            author_id: bob,
        })
        .await
        .unwrap_err();
    assert!(matches!(err, TenderHubError::NotFound { .. }));

    let err = h
        .bids
        .create_bid(CreateBidRequest {
            name: "Offer".into(),
            description: String::new(),
            tender_id: Uuid::new_v4(),
            author_type: "User".into(),
            author_id: Uuid::new_v4(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, TenderHubError::UserNotFound { .. }));
}

#[tokio::test]
async fn bid_carries_bidder_organization() {
    let h = harness().await;
    let org_1 = h.organization("org-1").await;
    let org_2 = h.organization("org-2").await;
    h.member("alice", org_1).await;
    let bob = h.member("bob", org_2).await;
    let tender = h.road_repair(org_1, "alice").await;

    let bid = h.bid(tender.id, bob).await;
    assert_eq!(bid.version, 1);
    assert_eq!(bid.status, BidStatus::Created);
    assert_eq!(bid.author_type, AuthorType::User);
    assert_eq!(bid.author_id, bob);

    // Bids are governed by the bidder's organization, not the tender's.
    let err = h
        .bids
        .change_status(bid.id, "Published", "alice")
        .await
        .unwrap_err();
    assert!(matches!(err, TenderHubError::NotResponsible { organization_id } if organization_id == org_2));

    let published = h
        .bids
        .change_status(bid.id, "Published", "bob")
        .await
        .unwrap();
    assert_eq!(published.status, BidStatus::Published);
}

#[tokio::test]
async fn canceled_bid_rejects_further_changes() {
    let h = harness().await;
    let org_1 = h.organization("org-1").await;
    let org_2 = h.organization("org-2").await;
    h.member("alice", org_1).await;
    let bob = h.member("bob", org_2).await;
    let tender = h.road_repair(org_1, "alice").await;
    let bid = h.bid(tender.id, bob).await;

    h.bids
        .change_status(bid.id, "Canceled", "bob")
        .await
        .unwrap();

    for status in ["Published", "Created", "Canceled"] {
        let err = h
            .bids
            .change_status(bid.id, status, "bob")
            .await
            .unwrap_err();
        assert!(matches!(err, TenderHubError::BidCanceled { id } if id == bid.id));
        assert_eq!(err.kind(), ErrorKind::TerminalStateViolation);
    }

    let err = h
        .bids
        .edit(EditBidRequest {
            bid_id: bid.id,
            username: "bob".into(),
            name: Some("Revived".into()),
            description: None,
        })
        .await
        .unwrap_err();
    assert!(matches!(err, TenderHubError::BidCanceled { .. }));

    let err = h.decisions.submit(approve(bid.id, "alice")).await.unwrap_err();
    assert!(matches!(err, TenderHubError::BidCanceled { .. }));

    // An invalid value is still reported as such.
    let err = h
        .bids
        .change_status(bid.id, "Closed", "bob")
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidValue);
}

#[tokio::test]
async fn bid_edit_and_rollback() {
    let h = harness().await;
    let org_1 = h.organization("org-1").await;
    let org_2 = h.organization("org-2").await;
    h.member("alice", org_1).await;
    let bob = h.member("bob", org_2).await;
    let tender = h.road_repair(org_1, "alice").await;
    let bid = h.bid(tender.id, bob).await;

    let edited = h
        .bids
        .edit(EditBidRequest {
            bid_id: bid.id,
            username: "bob".into(),
            name: None,
            description: Some("Cold mix".into()),
        })
        .await
        .unwrap();
    assert_eq!(edited.version, 2);
    assert_eq!(edited.description, "Cold mix");

    let snapshot = h.bids.history(bid.id, 1, "bob").await.unwrap();
    assert_eq!(snapshot.description, "Hot mix");

    let restored = h.bids.rollback(bid.id, 1, "bob").await.unwrap();
    assert_eq!(restored.version, 3);
    assert_eq!(restored.description, "Hot mix");

    let err = h.bids.history(bid.id, 9, "bob").await.unwrap_err();
    assert!(matches!(err, TenderHubError::HistoryNotFound { .. }));
}

#[tokio::test]
async fn bid_listings_and_status_visibility() {
    let h = harness().await;
    let org_1 = h.organization("org-1").await;
    let org_2 = h.organization("org-2").await;
    h.member("alice", org_1).await;
    let bob = h.member("bob", org_2).await;
    h.user("carol").await;
    let tender = h.road_repair(org_1, "alice").await;

    let draft = h.bid(tender.id, bob).await;
    let offered = h.bid(tender.id, bob).await;
    h.bids
        .change_status(offered.id, "Published", "bob")
        .await
        .unwrap();

    let mine = h
        .bids
        .list_mine(ListMineRequest {
            username: "bob".into(),
            limit: None,
            offset: None,
        })
        .await
        .unwrap();
    assert_eq!(mine.len(), 2);

    let on_tender = h
        .bids
        .list_for_tender(ListTenderBidsRequest {
            tender_id: tender.id,
            username: "alice".into(),
            limit: None,
            offset: None,
        })
        .await
        .unwrap();
    assert_eq!(on_tender.len(), 1);
    assert_eq!(on_tender[0].id, offered.id);

    let err = h
        .bids
        .list_for_tender(ListTenderBidsRequest {
            tender_id: tender.id,
            username: "bob".into(),
            limit: None,
            offset: None,
        })
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Unauthorized);

    assert_eq!(
        h.bids.get_status(draft.id, "bob").await.unwrap(),
        BidStatus::Created
    );
    let err = h.bids.get_status(draft.id, "carol").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Unauthorized);
}

#[tokio::test]
async fn approvals_are_counted() {
    let h = harness().await;
    let org_1 = h.organization("org-1").await;
    let org_2 = h.organization("org-2").await;
    h.member("alice", org_1).await;
    h.member("dave", org_1).await;
    let bob = h.member("bob", org_2).await;
    let tender = h.road_repair(org_1, "alice").await;
    let bid = h.bid(tender.id, bob).await;

    assert_eq!(h.decisions.approval_count(bid.id).await.unwrap(), 0);

    h.decisions.submit(approve(bid.id, "alice")).await.unwrap();
    h.decisions.submit(approve(bid.id, "dave")).await.unwrap();

    assert_eq!(h.decisions.approval_count(bid.id).await.unwrap(), 2);

    // Quorum is measured against the bidder organization's responsible
    // users and never changes the bid.
    let quorum = h.decisions.quorum(bid.id).await.unwrap();
    assert_eq!(quorum.approvals, 2);
    assert_eq!(quorum.responsible_users, 1);
    assert!(quorum.reached);
    assert_eq!(
        h.bids.get_status(bid.id, "bob").await.unwrap(),
        BidStatus::Created
    );
}

#[tokio::test]
async fn decisions_require_tender_authority_and_valid_value() {
    let h = harness().await;
    let org_1 = h.organization("org-1").await;
    let org_2 = h.organization("org-2").await;
    h.member("alice", org_1).await;
    let bob = h.member("bob", org_2).await;
    let tender = h.road_repair(org_1, "alice").await;
    let bid = h.bid(tender.id, bob).await;

    let err = h.decisions.submit(approve(bid.id, "bob")).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Unauthorized);

    let err = h
        .decisions
        .submit(SubmitDecisionRequest {
            bid_id: bid.id,
            decision: "Maybe".into(),
            username: "alice".into(),
        })
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidValue);

    let rejected = h
        .decisions
        .submit(SubmitDecisionRequest {
            bid_id: bid.id,
            decision: "Rejected".into(),
            username: "alice".into(),
        })
        .await
        .unwrap();
    assert_eq!(rejected.bid_id, bid.id);
    assert_eq!(h.decisions.approval_count(bid.id).await.unwrap(), 0);
}

#[tokio::test]
async fn decisions_are_listed_for_tender_authority_only() {
    let h = harness().await;
    let org_1 = h.organization("org-1").await;
    let org_2 = h.organization("org-2").await;
    h.member("alice", org_1).await;
    h.member("dave", org_1).await;
    let bob = h.member("bob", org_2).await;
    let tender = h.road_repair(org_1, "alice").await;
    let bid = h.bid(tender.id, bob).await;

    assert!(h.decisions.list(bid.id, "alice").await.unwrap().is_empty());

    h.decisions.submit(approve(bid.id, "alice")).await.unwrap();
    h.decisions
        .submit(SubmitDecisionRequest {
            bid_id: bid.id,
            decision: "Rejected".into(),
            username: "dave".into(),
        })
        .await
        .unwrap();

    let listed = h.decisions.list(bid.id, "dave").await.unwrap();
    let kinds: Vec<_> = listed.iter().map(|d| d.decision).collect();
    assert_eq!(kinds, vec![DecisionKind::Approved, DecisionKind::Rejected]);
    assert!(listed.iter().all(|d| d.bid_id == bid.id));

    let err = h.decisions.list(bid.id, "bob").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Unauthorized);

    let err = h.decisions.list(bid.id, "ghost").await.unwrap_err();
    assert!(matches!(err, TenderHubError::UserNotFound { .. }));

    let err = h.decisions.list(Uuid::new_v4(), "alice").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[tokio::test]
async fn reviews_are_appended_and_listed() {
    let h = harness().await;
    let org_1 = h.organization("org-1").await;
    let org_2 = h.organization("org-2").await;
    h.member("alice", org_1).await;
    let bob = h.member("bob", org_2).await;
    h.user("carol").await;
    let tender = h.road_repair(org_1, "alice").await;
    let bid = h.bid(tender.id, bob).await;

    let review = h
        .reviews
        .add(AddReviewRequest {
            bid_id: bid.id,
            username: "carol".into(),
            content: "Solid offer".into(),
        })
        .await
        .unwrap();
    assert_eq!(review.bid_id, bid.id);

    let err = h
        .reviews
        .add(AddReviewRequest {
            bid_id: bid.id,
            username: "carol".into(),
            content: String::new(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, TenderHubError::Validation { .. }));

    let err = h
        .reviews
        .add(AddReviewRequest {
            bid_id: Uuid::new_v4(),
            username: "carol".into(),
            content: "Lost".into(),
        })
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);

    let listed = h
        .reviews
        .list(ListReviewsRequest {
            bid_id: bid.id,
            limit: None,
            offset: None,
        })
        .await
        .unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].content, "Solid offer");
}
