//! SurrealDB schema initialization
//!
//! Sets up the `repair_category` table with its constraints and indexes.

use crate::error::StoreError;
use crate::store::StoreResult;
use surrealdb::engine::any::Any;
use surrealdb::Surreal;
use tracing::{debug, info};

/// Initialize all MecaBot tables in SurrealDB
///
/// Called on every connection. Safe to call multiple times (idempotent).
pub async fn init_schema(db: &Surreal<Any>) -> StoreResult<()> {
    info!("Initializing MecaBot SurrealDB schema");

    init_repair_category_table(db).await?;

    info!("MecaBot schema initialization complete");
    Ok(())
}

/// Initialize `repair_category` table with constraints and indexes
///
/// Schema:
/// ```text
/// TABLE repair_category {
///   name:         STRING (display name)
///   name_key:     STRING (lower-cased name, unique)
///   avg_minutes:  INT (>= 0)
///   created_at:   DATETIME
/// }
/// ```
///
/// Constraints:
/// - `name_key` is unique, which makes `name` unique ignoring case
/// - `avg_minutes` is never negative
async fn init_repair_category_table(db: &Surreal<Any>) -> StoreResult<()> {
    debug!("Initializing repair_category table");

    let sql = r#"
        DEFINE TABLE IF NOT EXISTS repair_category SCHEMAFULL;
        DEFINE FIELD IF NOT EXISTS name ON repair_category TYPE string;
        DEFINE FIELD IF NOT EXISTS name_key ON repair_category TYPE string;
        DEFINE FIELD IF NOT EXISTS avg_minutes ON repair_category TYPE int ASSERT $value >= 0;
        DEFINE FIELD IF NOT EXISTS created_at ON repair_category TYPE datetime;

        -- Case-insensitive uniqueness of the display name
        DEFINE INDEX IF NOT EXISTS idx_repair_category_name_key ON TABLE repair_category COLUMNS name_key UNIQUE;
    "#;

    db.query(sql)
        .await
        .and_then(|response| response.check())
        .map_err(|e| StoreError::SchemaSetup(e.to_string()))?;

    debug!("repair_category table initialized");
    Ok(())
}
