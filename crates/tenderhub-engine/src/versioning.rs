//! Edit and rollback over any versioned repository.
//!
//! A rollback fetches the exact-version snapshot and re-applies it
//! through the ordinary edit path, so the live values become a new
//! history row and the version keeps moving forward.

use tenderhub_core::error::TenderHubResult;
use tenderhub_core::repository::VersionedRepository;
use tenderhub_core::versioning::{DocumentPatch, Snapshot, Versioned};
use tracing::{debug, info};

pub(crate) async fn edit<D, R>(repo: &R, current: &D, patch: D::Patch) -> TenderHubResult<D>
where
    D: Versioned,
    R: VersionedRepository<D>,
{
    if patch.is_empty() {
        debug!(entity = D::ENTITY, id = %current.id(), "Empty patch, nothing to edit");
    }
    let edited = repo.edit(current.id(), patch).await?;
    if edited.version() != current.version() {
        info!(
            entity = D::ENTITY,
            id = %edited.id(),
            version = edited.version(),
            "Document edited"
        );
    }
    Ok(edited)
}

pub(crate) async fn roll_back<D, R>(repo: &R, current: &D, target_version: u32) -> TenderHubResult<D>
where
    D: Versioned,
    R: VersionedRepository<D>,
{
    let snapshot = repo.get_history(current.id(), target_version).await?;
    let restored = repo.edit(current.id(), snapshot.into_patch()).await?;
    info!(
        entity = D::ENTITY,
        id = %restored.id(),
        restored_from = target_version,
        version = restored.version(),
        "Document rolled back"
    );
    Ok(restored)
}
