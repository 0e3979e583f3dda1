//! Structural checks a connection must pass before positions are read or
//! written through it.
//!
//! Constraint decoding in the repository assumes the store itself rejects
//! duplicate names and dangling parents; these checks make that assumption
//! explicit.

use crate::db::migrations::{latest_version, schema_version};
use crate::db::{StoreError, StoreResult};
use rusqlite::Connection;
use std::cmp::Ordering;

const TABLE: &str = "positions";
const COLUMNS: [&str; 5] = ["id", "name", "description", "created_at", "parent_id"];

/// Verifies schema version, table layout, the unique name index and foreign
/// key enforcement on `conn`.
pub fn ensure_position_schema(conn: &Connection) -> StoreResult<()> {
    let found = schema_version(conn)?;
    let expected = latest_version();
    match found.cmp(&expected) {
        Ordering::Less => return Err(StoreError::SchemaBehind { found, expected }),
        Ordering::Greater => {
            return Err(StoreError::SchemaTooNew {
                found,
                supported: expected,
            })
        }
        Ordering::Equal => {}
    }

    let columns = table_columns(conn)?;
    if columns.is_empty() {
        return Err(StoreError::MissingTable(TABLE));
    }
    if let Some(missing) = COLUMNS
        .iter()
        .find(|column| !columns.iter().any(|present| present == *column))
    {
        return Err(StoreError::MissingColumn(*missing));
    }

    if !has_unique_name_index(conn)? {
        return Err(StoreError::NameNotUnique);
    }

    let enforced: bool = conn.pragma_query_value(None, "foreign_keys", |row| row.get(0))?;
    if !enforced {
        return Err(StoreError::ForeignKeysDisabled);
    }
    Ok(())
}

fn table_columns(conn: &Connection) -> StoreResult<Vec<String>> {
    let mut columns = Vec::new();
    conn.pragma(None, "table_info", TABLE, |row| {
        columns.push(row.get::<_, String>("name")?);
        Ok(())
    })?;
    Ok(columns)
}

fn has_unique_name_index(conn: &Connection) -> StoreResult<bool> {
    let mut unique_indexes = Vec::new();
    conn.pragma(None, "index_list", TABLE, |row| {
        if row.get::<_, bool>("unique")? {
            unique_indexes.push(row.get::<_, String>("name")?);
        }
        Ok(())
    })?;

    for index in unique_indexes {
        let mut indexed = Vec::new();
        conn.pragma(None, "index_info", &index, |row| {
            indexed.push(row.get::<_, Option<String>>("name")?.unwrap_or_default());
            Ok(())
        })?;
        if indexed == ["name"] {
            return Ok(true);
        }
    }
    Ok(false)
}
