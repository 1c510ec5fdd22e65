//! Integration tests for the Tender repository using in-memory SurrealDB.

use tenderhub_core::error::TenderHubError;
use tenderhub_core::models::tender::{CreateTender, TenderFilter, TenderPatch, TenderStatus};
use tenderhub_core::repository::{Pagination, TenderRepository, VersionedRepository};
use tenderhub_core::versioning::Snapshot;
use tenderhub_db::repository::SurrealTenderRepository;
use surrealdb::Surreal;
use surrealdb::engine::local::{Db, Mem};
use uuid::Uuid;

async fn setup() -> SurrealTenderRepository<Db> {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    tenderhub_db::run_migrations(&db).await.unwrap();
    SurrealTenderRepository::new(db)
}

fn road_repair(organization_id: Uuid, creator_id: Uuid) -> CreateTender {
    CreateTender {
        organization_id,
        creator_id,
        status: TenderStatus::Created,
        service_type: "Construction".into(),
        name: "Road repair".into(),
        description: "Fix potholes".into(),
    }
}

#[tokio::test]
async fn create_starts_at_version_one() {
    let repo = setup().await;
    let (org, alice) = (Uuid::new_v4(), Uuid::new_v4());

    let tender = repo.create(road_repair(org, alice)).await.unwrap();
    assert_eq!(tender.version, 1);
    assert_eq!(tender.status, TenderStatus::Created);
    assert_eq!(tender.organization_id, org);

    let fetched = repo.get_by_id(tender.id).await.unwrap();
    assert_eq!(fetched.name, "Road repair");

    // No history exists for the initial revision.
    let err = repo.get_history(tender.id, 1).await.unwrap_err();
    assert!(matches!(err, TenderHubError::HistoryNotFound { version: 1, .. }));
}

#[tokio::test]
async fn edit_snapshots_previous_revision() {
    let repo = setup().await;
    let tender = repo
        .create(road_repair(Uuid::new_v4(), Uuid::new_v4()))
        .await
        .unwrap();

    let edited = repo
        .edit(
            tender.id,
            TenderPatch {
                name: Some("Road repair v2".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(edited.version, 2);
    assert_eq!(edited.name, "Road repair v2");
    assert_eq!(edited.description, "Fix potholes");
    assert_eq!(edited.service_type, "Construction");
    assert!(edited.updated_at >= tender.updated_at);

    let snapshot = repo.get_history(tender.id, 1).await.unwrap();
    assert_eq!(snapshot.version(), 1);
    assert_eq!(snapshot.tender_id, tender.id);
    assert_eq!(snapshot.name, "Road repair");
    assert_eq!(snapshot.description, "Fix potholes");
}

#[tokio::test]
async fn empty_patch_is_a_no_op() {
    let repo = setup().await;
    let tender = repo
        .create(road_repair(Uuid::new_v4(), Uuid::new_v4()))
        .await
        .unwrap();

    let unchanged = repo.edit(tender.id, TenderPatch::default()).await.unwrap();
    assert_eq!(unchanged.version, 1);

    let err = repo.get_history(tender.id, 1).await.unwrap_err();
    assert!(matches!(err, TenderHubError::HistoryNotFound { .. }));
}

#[tokio::test]
async fn reapplying_a_snapshot_moves_version_forward() {
    let repo = setup().await;
    let tender = repo
        .create(road_repair(Uuid::new_v4(), Uuid::new_v4()))
        .await
        .unwrap();

    repo.edit(
        tender.id,
        TenderPatch {
            name: Some("Road repair v2".into()),
            description: Some("Resurface".into()),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    let snapshot = repo.get_history(tender.id, 1).await.unwrap();
    let restored = repo.edit(tender.id, snapshot.into_patch()).await.unwrap();

    assert_eq!(restored.version, 3);
    assert_eq!(restored.name, "Road repair");
    assert_eq!(restored.description, "Fix potholes");

    let superseded = repo.get_history(tender.id, 2).await.unwrap();
    assert_eq!(superseded.name, "Road repair v2");
}

#[tokio::test]
async fn edit_of_missing_tender_is_not_found() {
    let repo = setup().await;
    let err = repo
        .edit(
            Uuid::new_v4(),
            TenderPatch {
                name: Some("x".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, TenderHubError::NotFound { .. }));
}

#[tokio::test]
async fn status_change_is_not_versioned() {
    let repo = setup().await;
    let tender = repo
        .create(road_repair(Uuid::new_v4(), Uuid::new_v4()))
        .await
        .unwrap();

    let published = repo
        .set_status(tender.id, TenderStatus::Published)
        .await
        .unwrap();
    assert_eq!(published.status, TenderStatus::Published);
    assert_eq!(published.version, 1);
}

#[tokio::test]
async fn list_published_filters_and_orders_by_name() {
    let repo = setup().await;
    let (org, alice) = (Uuid::new_v4(), Uuid::new_v4());

    for (name, service_type, status) in [
        ("Snow removal", "Delivery", TenderStatus::Published),
        ("Bridge paint", "Construction", TenderStatus::Published),
        ("Asphalt", "Construction", TenderStatus::Published),
        ("Draft", "Construction", TenderStatus::Created),
        ("Old", "Manufacture", TenderStatus::Closed),
    ] {
        repo.create(CreateTender {
            organization_id: org,
            creator_id: alice,
            status,
            service_type: service_type.into(),
            name: name.into(),
            description: String::new(),
        })
        .await
        .unwrap();
    }

    let all = repo
        .list_published(TenderFilter::default(), Pagination::default())
        .await
        .unwrap();
    let names: Vec<_> = all.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, vec!["Asphalt", "Bridge paint", "Snow removal"]);

    let construction = repo
        .list_published(
            TenderFilter {
                service_types: vec!["Construction".into()],
            },
            Pagination::default(),
        )
        .await
        .unwrap();
    assert_eq!(construction.len(), 2);

    let second_page = repo
        .list_published(
            TenderFilter::default(),
            Pagination {
                offset: 1,
                limit: 1,
            },
        )
        .await
        .unwrap();
    assert_eq!(second_page.len(), 1);
    assert_eq!(second_page[0].name, "Bridge paint");
}

#[tokio::test]
async fn list_by_creator_returns_only_own_tenders() {
    let repo = setup().await;
    let org = Uuid::new_v4();
    let (alice, bob) = (Uuid::new_v4(), Uuid::new_v4());

    repo.create(road_repair(org, alice)).await.unwrap();
    repo.create(road_repair(org, bob)).await.unwrap();

    let mine = repo
        .list_by_creator(alice, Pagination::default())
        .await
        .unwrap();
    assert_eq!(mine.len(), 1);
    assert_eq!(mine[0].creator_id, alice);
}

#[tokio::test]
async fn failed_edit_leaves_live_row_untouched() {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    tenderhub_db::run_migrations(&db).await.unwrap();
    let repo = SurrealTenderRepository::new(db.clone());

    let tender = repo
        .create(road_repair(Uuid::new_v4(), Uuid::new_v4()))
        .await
        .unwrap();

    // Occupy the history slot the edit is about to write.
    db.query(
        "CREATE tender_history SET tender_id = $id, creator_id = 'other', \
         service_type = 'Construction', name = 'Stale', description = '', \
         version = 1",
    )
    .bind(("id", tender.id.to_string()))
    .await
    .unwrap()
    .check()
    .unwrap();

    let err = repo
        .edit(
            tender.id,
            TenderPatch {
                name: Some("Road repair v2".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, TenderHubError::Database(_)));

    let current = repo.get_by_id(tender.id).await.unwrap();
    assert_eq!(current.version, 1);
    assert_eq!(current.name, "Road repair");

    let snapshot = repo.get_history(tender.id, 1).await.unwrap();
    assert_eq!(snapshot.name, "Stale");
}
