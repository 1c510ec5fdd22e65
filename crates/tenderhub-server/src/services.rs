//! Service wiring over a single SurrealDB client.

use surrealdb::Surreal;
use surrealdb::engine::any::Any;
use tenderhub_db::repository::{
    SurrealBidRepository, SurrealDecisionRepository, SurrealOrganizationRepository,
    SurrealReviewRepository, SurrealTenderRepository, SurrealUserRepository,
};
use tenderhub_engine::{
    AuthorizationGate, BidService, DecisionService, EngineConfig, IdentityService, ReviewService,
    TenderService,
};

type Users = SurrealUserRepository<Any>;
type Organizations = SurrealOrganizationRepository<Any>;
type Tenders = SurrealTenderRepository<Any>;
type Bids = SurrealBidRepository<Any>;

/// Every lifecycle service, ready to be handed to a transport.
pub struct Services {
    pub identity: IdentityService<Users, Organizations>,
    pub tenders: TenderService<Users, Organizations, Tenders>,
    pub bids: BidService<Users, Organizations, Tenders, Bids>,
    pub decisions:
        DecisionService<Users, Organizations, Tenders, Bids, SurrealDecisionRepository<Any>>,
    pub reviews: ReviewService<Users, Bids, SurrealReviewRepository<Any>>,
}

impl Services {
    pub fn new(db: &Surreal<Any>, config: EngineConfig) -> Self {
        let gate = || {
            AuthorizationGate::new(
                SurrealUserRepository::new(db.clone()),
                SurrealOrganizationRepository::new(db.clone()),
            )
        };

        Self {
            identity: IdentityService::new(
                SurrealUserRepository::new(db.clone()),
                SurrealOrganizationRepository::new(db.clone()),
            ),
            tenders: TenderService::new(
                gate(),
                SurrealTenderRepository::new(db.clone()),
                config.clone(),
            ),
            bids: BidService::new(
                gate(),
                SurrealTenderRepository::new(db.clone()),
                SurrealBidRepository::new(db.clone()),
                config.clone(),
            ),
            decisions: DecisionService::new(
                gate(),
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
}

#[cfg(test)]
mod tests {
    use tenderhub_db::{DbConfig, DbManager};
    use tenderhub_engine::requests::{
        CreateOrganizationRequest, CreateTenderRequest, CreateUserRequest, ListTendersRequest,
    };

    use super::*;

    #[tokio::test]
    async fn wired_services_share_one_store() {
        let manager = DbManager::connect(&DbConfig {
            url: "mem://".into(),
            credentials: None,
            ..Default::default()
        })
        .await
        .unwrap();
        manager.migrate().await.unwrap();
        let services = Services::new(manager.client(), EngineConfig::default());

        let alice = services
            .identity
            .create_user(CreateUserRequest {
                username: "alice".into(),
                first_name: "Alice".into(),
                last_name: String::new(),
            })
            .await
            .unwrap();
        let org = services
            .identity
            .create_organization(CreateOrganizationRequest {
                name: "org-1".into(),
                description: String::new(),
            })
            .await
            .unwrap();
        services
            .identity
            .add_responsible(org.id, alice.id)
            .await
            .unwrap();

        let tender = services
            .tenders
            .create_tender(CreateTenderRequest {
                name: "Road repair".into(),
                description: String::new(),
                service_type: "Construction".into(),
                status: "Published".into(),
                organization_id: org.id,
                creator_username: "alice".into(),
            })
            .await
            .unwrap();

        let listed = services
            .tenders
            .list_published(ListTendersRequest::default())
            .await
            .unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, tender.id);
    }
}
