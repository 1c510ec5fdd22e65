//! Shared fixture: an in-memory store with every engine service wired.

#![allow(dead_code)]

use surrealdb::Surreal;
use surrealdb::engine::local::{Db, Mem};
use tenderhub_engine::requests::{
    CreateBidRequest, CreateOrganizationRequest, CreateTenderRequest, CreateUserRequest,
};
use tenderhub_engine::views::{BidView, TenderView};
use tenderhub_engine::{
    AuthorizationGate, BidService, DecisionService, EngineConfig, IdentityService, ReviewService,
    TenderService,
};
use tenderhub_db::repository::{
    SurrealBidRepository, SurrealDecisionRepository, SurrealOrganizationRepository,
    SurrealReviewRepository, SurrealTenderRepository, SurrealUserRepository,
};
use uuid::Uuid;

type Users = SurrealUserRepository<Db>;
type Orgs = SurrealOrganizationRepository<Db>;
type Tenders = SurrealTenderRepository<Db>;
type Bids = SurrealBidRepository<Db>;

pub struct Harness {
    pub identity: IdentityService<Users, Orgs>,
    pub tenders: TenderService<Users, Orgs, Tenders>,
    pub bids: BidService<Users, Orgs, Tenders, Bids>,
    pub decisions: DecisionService<Users, Orgs, Tenders, Bids, SurrealDecisionRepository<Db>>,
    pub reviews: ReviewService<Users, Bids, SurrealReviewRepository<Db>>,
}

fn gate(db: &Surreal<Db>) -> AuthorizationGate<Users, Orgs> {
    AuthorizationGate::new(
        SurrealUserRepository::new(db.clone()),
        SurrealOrganizationRepository::new(db.clone()),
    )
}

pub async fn harness() -> Harness {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    tenderhub_db::run_migrations(&db).await.unwrap();

    let config = EngineConfig::default();
    Harness {
        identity: IdentityService::new(
            SurrealUserRepository::new(db.clone()),
            SurrealOrganizationRepository::new(db.clone()),
        ),
        tenders: TenderService::new(
            gate(&db),
            SurrealTenderRepository::new(db.clone()),
            config.clone(),
        ),
        bids: BidService::new(
            gate(&db),
            SurrealTenderRepository::new(db.clone()),
            SurrealBidRepository::new(db.clone()),
            config.clone(),
        ),
        decisions: DecisionService::new(
            gate(&db),
            SurrealTenderRepository::new(db.clone()),
            SurrealBidRepository::new(db.clone()),
            SurrealDecisionRepository::new(db.clone()),
        ),
        reviews: ReviewService::new(
            SurrealUserRepository::new(db.clone()),
            SurrealBidRepository::new(db.clone()),
            SurrealReviewRepository::new(db.clone()),
            config,
        ),
    }
}

impl Harness {
    pub async fn user(&self, username: &str) -> Uuid {
        self.identity
            .create_user(CreateUserRequest {
                username: username.into(),
                first_name: String::new(),
                last_name: String::new(),
            })
            .await
            .unwrap()
            .id
    }

    pub async fn organization(&self, name: &str) -> Uuid {
        self.identity
            .create_organization(CreateOrganizationRequest {
                name: name.into(),
                description: String::new(),
            })
            .await
            .unwrap()
            .id
    }

    /// A user registered as responsible for the organization.
    pub async fn member(&self, username: &str, organization_id: Uuid) -> Uuid {
        let user_id = self.user(username).await;
        self.identity
            .add_responsible(organization_id, user_id)
            .await
            .unwrap();
        user_id
    }

    pub async fn road_repair(&self, organization_id: Uuid, creator: &str) -> TenderView {
        self.tenders
            .create_tender(CreateTenderRequest {
                name: "Road repair".into(),
                description: "Fix potholes".into(),
                service_type: "Construction".into(),
                status: "Created".into(),
                organization_id,
                creator_username: creator.into(),
            })
            .await
            .unwrap()
    }

    pub async fn bid(&self, tender_id: Uuid, author_id: Uuid) -> BidView {
        self.bids
            .create_bid(CreateBidRequest {
                name: "Asphalt offer".into(),
                description: "Hot mix".into(),
                tender_id,
                author_type: "User".into(),
                author_id,
            })
            .await
            .unwrap()
    }
}
