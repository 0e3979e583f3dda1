//! Forward-only schema migrations for the position store.
//!
//! The schema version lives in `PRAGMA user_version`. Each step runs in the
//! same transaction as its version bump.

use crate::db::{StoreError, StoreResult};
use rusqlite::Connection;

/// Ordered `(version, sql)` steps, strictly increasing.
const STEPS: [(u32, &str); 1] = [(1, include_str!("0001_positions.sql"))];

/// Schema version this build writes and expects.
pub fn latest_version() -> u32 {
    STEPS.last().map_or(0, |(version, _)| *version)
}

/// Reads `PRAGMA user_version`.
pub fn schema_version(conn: &Connection) -> StoreResult<u32> {
    Ok(conn.pragma_query_value(None, "user_version", |row| row.get(0))?)
}

/// Brings `conn` up to [`latest_version`] and returns the version found
/// before migrating.
pub fn apply_migrations(conn: &mut Connection) -> StoreResult<u32> {
    let found = schema_version(conn)?;
    let supported = latest_version();
    if found > supported {
        return Err(StoreError::SchemaTooNew { found, supported });
    }

    let pending: Vec<_> = STEPS.iter().filter(|(version, _)| *version > found).collect();
    if pending.is_empty() {
        return Ok(found);
    }

    let tx = conn.transaction()?;
    for (version, sql) in pending {
        tx.execute_batch(sql)?;
        tx.pragma_update(None, "user_version", version)?;
    }
    tx.commit()?;
    Ok(found)
}
