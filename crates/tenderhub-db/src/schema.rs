//! Schema definitions and migration runner for SurrealDB.
//!
//! All table definitions use SCHEMAFULL mode. UUIDs are stored as
//! strings; enumerations are stored as strings guarded by ASSERT.

use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use tracing::info;

use crate::error::DbError;

// -----------------------------------------------------------------------
// Migration tracking
// -----------------------------------------------------------------------

const MIGRATION_TABLE_DDL: &str = "\
DEFINE TABLE IF NOT EXISTS _migration SCHEMAFULL;
DEFINE FIELD IF NOT EXISTS version ON TABLE _migration TYPE int;
DEFINE FIELD IF NOT EXISTS name ON TABLE _migration TYPE string;
DEFINE FIELD IF NOT EXISTS applied_at ON TABLE _migration TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX IF NOT EXISTS idx_migration_version ON TABLE _migration \
    COLUMNS version UNIQUE;
";

#[derive(Debug, SurrealValue)]
struct MigrationRecord {
    version: u32,
    #[allow(dead_code)]
    name: String,
}

struct Migration {
    version: u32,
    name: &'static str,
    sql: &'static str,
}

static MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    name: "initial_schema",
    sql: SCHEMA_V1,
}];

// -----------------------------------------------------------------------
// Schema v1
// -----------------------------------------------------------------------

const SCHEMA_V1: &str = "\
-- =======================================================================
-- Users
-- =======================================================================
DEFINE TABLE user SCHEMAFULL;
DEFINE FIELD username ON TABLE user TYPE string;
DEFINE FIELD first_name ON TABLE user TYPE string DEFAULT '';
DEFINE FIELD last_name ON TABLE user TYPE string DEFAULT '';
DEFINE FIELD created_at ON TABLE user TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE user TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_user_username ON TABLE user COLUMNS username UNIQUE;

-- =======================================================================
-- Organizations
-- =======================================================================
DEFINE TABLE organization SCHEMAFULL;
DEFINE FIELD name ON TABLE organization TYPE string;
DEFINE FIELD description ON TABLE organization TYPE string DEFAULT '';
DEFINE FIELD created_at ON TABLE organization TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE organization TYPE datetime \
    DEFAULT time::now();

-- User -> Organization responsibility
DEFINE TABLE responsible_for TYPE RELATION SCHEMAFULL;
DEFINE FIELD created_at ON TABLE responsible_for TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_responsible_pair ON TABLE responsible_for \
    COLUMNS in, out UNIQUE;

-- =======================================================================
-- Tenders (versioned)
-- =======================================================================
DEFINE TABLE tender SCHEMAFULL;
DEFINE FIELD organization_id ON TABLE tender TYPE string;
DEFINE FIELD creator_id ON TABLE tender TYPE string;
DEFINE FIELD status ON TABLE tender TYPE string \
    ASSERT $value IN ['Created', 'Published', 'Closed'];
DEFINE FIELD version ON TABLE tender TYPE int ASSERT $value >= 1;
DEFINE FIELD service_type ON TABLE tender TYPE string;
DEFINE FIELD name ON TABLE tender TYPE string;
DEFINE FIELD description ON TABLE tender TYPE string;
DEFINE FIELD created_at ON TABLE tender TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE tender TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_tender_status ON TABLE tender COLUMNS status;
DEFINE INDEX idx_tender_creator ON TABLE tender COLUMNS creator_id;

DEFINE TABLE tender_history SCHEMAFULL
    PERMISSIONS
        FOR create FULL
        FOR select FULL
        FOR update NONE
        FOR delete NONE;
DEFINE FIELD tender_id ON TABLE tender_history TYPE string;
DEFINE FIELD creator_id ON TABLE tender_history TYPE string;
DEFINE FIELD service_type ON TABLE tender_history TYPE string;
DEFINE FIELD name ON TABLE tender_history TYPE string;
DEFINE FIELD description ON TABLE tender_history TYPE string;
DEFINE FIELD version ON TABLE tender_history TYPE int;
DEFINE FIELD created_at ON TABLE tender_history TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_tender_history_version ON TABLE tender_history \
    COLUMNS tender_id, version UNIQUE;

-- =======================================================================
-- Offers / bids (versioned)
-- =======================================================================
DEFINE TABLE offer SCHEMAFULL;
DEFINE FIELD tender_id ON TABLE offer TYPE string;
DEFINE FIELD creator_id ON TABLE offer TYPE string;
DEFINE FIELD organization_id ON TABLE offer TYPE string;
DEFINE FIELD author_type ON TABLE offer TYPE string \
    ASSERT $value IN ['User', 'Organization'];
DEFINE FIELD status ON TABLE offer TYPE string \
    ASSERT $value IN ['Created', 'Published', 'Canceled'];
DEFINE FIELD version ON TABLE offer TYPE int ASSERT $value >= 1;
DEFINE FIELD name ON TABLE offer TYPE string;
DEFINE FIELD description ON TABLE offer TYPE string;
DEFINE FIELD created_at ON TABLE offer TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE offer TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_offer_tender ON TABLE offer COLUMNS tender_id;
DEFINE INDEX idx_offer_creator ON TABLE offer COLUMNS creator_id;

DEFINE TABLE offer_history SCHEMAFULL
    PERMISSIONS
        FOR create FULL
        FOR select FULL
        FOR update NONE
        FOR delete NONE;
DEFINE FIELD offer_id ON TABLE offer_history TYPE string;
DEFINE FIELD creator_id ON TABLE offer_history TYPE string;
DEFINE FIELD name ON TABLE offer_history TYPE string;
DEFINE FIELD description ON TABLE offer_history TYPE string;
DEFINE FIELD version ON TABLE offer_history TYPE int;
DEFINE FIELD created_at ON TABLE offer_history TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_offer_history_version ON TABLE offer_history \
    COLUMNS offer_id, version UNIQUE;

-- =======================================================================
-- Decisions (append-only votes)
-- =======================================================================
DEFINE TABLE decision SCHEMAFULL
    PERMISSIONS
        FOR create FULL
        FOR select FULL
        FOR update NONE
        FOR delete NONE;
DEFINE FIELD offer_id ON TABLE decision TYPE string;
DEFINE FIELD user_id ON TABLE decision TYPE string;
DEFINE FIELD decision ON TABLE decision TYPE string \
    ASSERT $value IN ['Approved', 'Rejected'];
DEFINE FIELD created_at ON TABLE decision TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_decision_offer ON TABLE decision COLUMNS offer_id;

-- =======================================================================
-- Reviews (append-only)
-- =======================================================================
DEFINE TABLE review SCHEMAFULL
    PERMISSIONS
        FOR create FULL
        FOR select FULL
        FOR update NONE
        FOR delete NONE;
DEFINE FIELD offer_id ON TABLE review TYPE string;
DEFINE FIELD creator_id ON TABLE review TYPE string;
DEFINE FIELD content ON TABLE review TYPE string;
DEFINE FIELD created_at ON TABLE review TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_review_offer_time ON TABLE review \
    COLUMNS offer_id, created_at;
";

// -----------------------------------------------------------------------
// Public API
// -----------------------------------------------------------------------

/// Run all pending migrations against the given SurrealDB client.
///
/// Creates a `_migration` tracking table on first run, then applies
/// each migration whose version exceeds the current maximum.
pub async fn run_migrations<C: Connection>(db: &Surreal<C>) -> Result<(), DbError> {
    db.query(MIGRATION_TABLE_DDL)
        .await?
        .check()
        .map_err(|e| DbError::Migration(e.to_string()))?;

    let mut result = db
        .query("SELECT * FROM _migration ORDER BY version DESC LIMIT 1")
        .await?;
    let records: Vec<MigrationRecord> = result.take(0)?;
    let current_version = records.first().map(|m| m.version).unwrap_or(0);

    for migration in MIGRATIONS {
        if migration.version <= current_version {
            continue;
        }

        info!(
            version = migration.version,
            name = migration.name,
            "Applying migration"
        );
        db.query(migration.sql).await?.check().map_err(|e| {
            DbError::Migration(format!(
                "Migration v{} '{}' failed: {}",
                migration.version, migration.name, e,
            ))
        })?;

        db.query(
            "CREATE _migration SET version = $version, \
             name = $name",
        )
        .bind(("version", migration.version))
        .bind(("name", migration.name))
        .await?
        .check()
        .map_err(|e| {
            DbError::Migration(format!(
                "Failed to record migration v{}: {}",
                migration.version, e,
            ))
        })?;

        info!(version = migration.version, "Migration applied");
    }

    Ok(())
}

/// Returns the raw schema DDL for version 1.
pub fn schema_v1() -> &'static str {
    SCHEMA_V1
}
