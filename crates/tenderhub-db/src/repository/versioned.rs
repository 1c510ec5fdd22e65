//! The transactional snapshot-then-update primitive shared by every
//! versioned table.

use surrealdb::{Connection, Surreal};
use tracing::debug;

use crate::error::DbError;

/// Where a versioned document and its history live.
pub(crate) struct HistoryTable {
    pub(crate) document: &'static str,
    pub(crate) history: &'static str,
    /// History column holding the document id.
    pub(crate) key_field: &'static str,
}

/// The live revision about to be superseded.
pub(crate) struct CurrentRevision {
    pub(crate) creator_id: String,
    pub(crate) version: u32,
    /// Every editable column with its current value.
    pub(crate) fields: Vec<(&'static str, String)>,
}

/// Write a history row for `current` and apply `changes` to the live row
/// in a single transaction.
///
/// Column names come from the compile-time field lists of the
/// repositories; values are always bound as parameters. The unique
/// `(key_field, version)` index makes a concurrent edit of the same
/// revision abort the whole transaction.
pub(crate) async fn snapshot_then_update<C: Connection>(
    db: &Surreal<C>,
    table: &HistoryTable,
    id: &str,
    current: CurrentRevision,
    changes: Vec<(&'static str, String)>,
) -> Result<(), DbError> {
    let mut history_sets = vec![
        format!("{} = $id", table.key_field),
        "creator_id = $creator_id".to_string(),
        "version = $version".to_string(),
    ];
    history_sets.extend(
        current
            .fields
            .iter()
            .map(|(column, _)| format!("{column} = $old_{column}")),
    );

    let mut update_sets: Vec<String> = changes
        .iter()
        .map(|(column, _)| format!("{column} = $new_{column}"))
        .collect();
    update_sets.push("version = $next_version".to_string());
    update_sets.push("updated_at = time::now()".to_string());

    let query = format!(
        "BEGIN TRANSACTION; \
         CREATE {history} SET {history_sets}; \
         UPDATE type::record('{document}', $id) SET {update_sets}; \
         COMMIT TRANSACTION;",
        history = table.history,
        history_sets = history_sets.join(", "),
        document = table.document,
        update_sets = update_sets.join(", "),
    );

    let next_version = current.version + 1;
    let mut builder = db
        .query(query)
        .bind(("id", id.to_string()))
        .bind(("creator_id", current.creator_id))
        .bind(("version", current.version))
        .bind(("next_version", next_version));

    for (column, value) in current.fields {
        builder = builder.bind((format!("old_{column}"), value));
    }
    for (column, value) in changes {
        builder = builder.bind((format!("new_{column}"), value));
    }

    builder
        .await?
        .check()
        .map_err(|e| DbError::Query(format!("{} {id} edit aborted: {e}", table.document)))?;

    debug!(
        table = table.document,
        id,
        superseded = current.version,
        version = next_version,
        "Revision written"
    );

    Ok(())
}
