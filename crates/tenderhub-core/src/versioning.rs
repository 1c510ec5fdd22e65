//! Versioned document abstractions shared by tenders and bids.
//!
//! A versioned document carries a monotonic `version` starting at 1.
//! Every edit first writes a history snapshot of the pre-edit field
//! values tagged with the version being superseded, then updates the
//! live document and increments the version. A rollback re-applies a
//! snapshot as an ordinary edit, so version numbers never repeat.

use uuid::Uuid;

/// Version assigned to a freshly created document.
pub const INITIAL_VERSION: u32 = 1;

/// A partial update of a document's editable fields.
///
/// `None` means "leave unchanged". A patch with no supplied fields is a
/// no-op and never produces a new revision.
pub trait DocumentPatch: Send {
    /// Supplied fields as `(column, value)` pairs, in a stable order.
    fn changes(&self) -> Vec<(&'static str, String)>;

    fn is_empty(&self) -> bool {
        self.changes().is_empty()
    }
}

/// An immutable history record of a document's editable fields.
pub trait Snapshot: Send {
    type Patch: DocumentPatch;

    /// The version this snapshot superseded.
    fn version(&self) -> u32;

    /// A patch that restores every editable field to the snapshot value.
    fn into_patch(self) -> Self::Patch;
}

/// A document whose edits are captured as immutable history.
pub trait Versioned: Send + Sync {
    type Patch: DocumentPatch;
    type Snapshot: Snapshot<Patch = Self::Patch>;

    /// Entity name used in errors and log fields.
    const ENTITY: &'static str;

    fn id(&self) -> Uuid;
    fn version(&self) -> u32;
}

/// Pushes `(column, value)` when the value is present.
pub(crate) fn push_change(
    changes: &mut Vec<(&'static str, String)>,
    column: &'static str,
    value: &Option<String>,
) {
    if let Some(value) = value {
        changes.push((column, value.clone()));
    }
}
