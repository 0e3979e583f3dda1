//! Position repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide the Record Store primitives the tree logic and coordinator use.
//! - Keep SQL details and constraint decoding inside the repository boundary.
//!
//! # Invariants
//! - `id` is generated here on insert and never rewritten.
//! - Store-level constraint failures (unique name, parent foreign key) are
//!   reported as semantic errors, never as raw driver errors.
//! - Listing order is deterministic: `created_at ASC, id ASC`.

use crate::db::{ensure_position_schema, StoreError};
use crate::model::position::{NewPosition, Position, PositionChanges, PositionId};
use rusqlite::{ffi, params, Connection, ErrorCode, Row, ToSql};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::os::raw::c_int;
use uuid::Uuid;

const POSITION_SELECT_SQL: &str = "SELECT
    id,
    name,
    description,
    created_at,
    parent_id
FROM positions";

/// Result type used by position repository operations.
pub type PositionRepoResult<T> = Result<T, PositionRepoError>;

/// Errors from position repository operations.
#[derive(Debug)]
pub enum PositionRepoError {
    /// Store failure: driver error or a connection that fails schema checks.
    Store(StoreError),
    /// Update target does not exist.
    NotFound(PositionId),
    /// Unique name constraint rejected the write.
    DuplicateName(String),
    /// Parent foreign key rejected the write.
    ParentMissing(PositionId),
    /// Persisted data cannot be converted to a valid record.
    InvalidData(String),
}

impl Display for PositionRepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Store(err) => write!(f, "position store: {err}"),
            Self::NotFound(id) => write!(f, "position not found: {id}"),
            Self::DuplicateName(name) => write!(f, "position name already exists: `{name}`"),
            Self::ParentMissing(id) => write!(f, "parent position not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted position data: {message}"),
        }
    }
}

impl Error for PositionRepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Store(err) => Some(err),
            _ => None,
        }
    }
}

impl From<StoreError> for PositionRepoError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

impl From<rusqlite::Error> for PositionRepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Store(StoreError::Sqlite(value))
    }
}

/// Result of a delete request against the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// Row removed.
    Deleted,
    /// No row with that id.
    NotFound,
    /// Referential integrity check refused the delete: children exist.
    HasChildren,
}

/// Record Store interface for positions.
pub trait PositionRepository {
    /// Point lookup by id.
    fn find_by_id(&self, id: PositionId) -> PositionRepoResult<Option<Position>>;
    /// Point lookup by exact name.
    fn find_by_name(&self, name: &str) -> PositionRepoResult<Option<Position>>;
    /// Direct children of one position.
    fn find_children_of(&self, id: PositionId) -> PositionRepoResult<Vec<Position>>;
    /// Full scan.
    fn find_all(&self) -> PositionRepoResult<Vec<Position>>;
    /// Number of stored positions.
    fn count(&self) -> PositionRepoResult<u64>;
    /// Inserts one position and returns it with assigned `id`/`created_at`.
    fn insert(&self, position: &NewPosition) -> PositionRepoResult<Position>;
    /// Writes only the fields set in `changes` and returns the stored row.
    fn update(&self, id: PositionId, changes: &PositionChanges) -> PositionRepoResult<Position>;
    /// Deletes one position, honoring `ON DELETE RESTRICT`.
    fn delete(&self, id: PositionId) -> PositionRepoResult<DeleteOutcome>;
}

/// SQLite-backed position repository.
pub struct SqlitePositionRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqlitePositionRepository<'conn> {
    /// Creates repository from migrated connection.
    pub fn try_new(conn: &'conn Connection) -> PositionRepoResult<Self> {
        ensure_position_schema(conn)?;
        Ok(Self { conn })
    }

    fn query_many(
        &self,
        sql: &str,
        params: &[&dyn ToSql],
    ) -> PositionRepoResult<Vec<Position>> {
        let mut stmt = self.conn.prepare(sql)?;
        let mut rows = stmt.query(params)?;
        let mut items = Vec::new();
        while let Some(row) = rows.next()? {
            items.push(parse_position_row(row)?);
        }
        Ok(items)
    }

    fn query_one(
        &self,
        sql: &str,
        params: &[&dyn ToSql],
    ) -> PositionRepoResult<Option<Position>> {
        let mut stmt = self.conn.prepare(sql)?;
        let mut rows = stmt.query(params)?;
        match rows.next()? {
            Some(row) => Ok(Some(parse_position_row(row)?)),
            None => Ok(None),
        }
    }

    fn load_required(&self, id: PositionId) -> PositionRepoResult<Position> {
        self.find_by_id(id)?.ok_or(PositionRepoError::NotFound(id))
    }
}

impl PositionRepository for SqlitePositionRepository<'_> {
    fn find_by_id(&self, id: PositionId) -> PositionRepoResult<Option<Position>> {
        self.query_one(
            &format!("{POSITION_SELECT_SQL} WHERE id = ?1;"),
            params![id.to_string()],
        )
    }

    fn find_by_name(&self, name: &str) -> PositionRepoResult<Option<Position>> {
        self.query_one(
            &format!("{POSITION_SELECT_SQL} WHERE name = ?1;"),
            params![name],
        )
    }

    fn find_children_of(&self, id: PositionId) -> PositionRepoResult<Vec<Position>> {
        self.query_many(
            &format!("{POSITION_SELECT_SQL} WHERE parent_id = ?1 ORDER BY created_at ASC, id ASC;"),
            params![id.to_string()],
        )
    }

    fn find_all(&self) -> PositionRepoResult<Vec<Position>> {
        self.query_many(
            &format!("{POSITION_SELECT_SQL} ORDER BY created_at ASC, id ASC;"),
            params![],
        )
    }

    fn count(&self) -> PositionRepoResult<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM positions;", [], |row| row.get(0))?;
        u64::try_from(count)
            .map_err(|_| PositionRepoError::InvalidData(format!("negative row count `{count}`")))
    }

    fn insert(&self, position: &NewPosition) -> PositionRepoResult<Position> {
        let id = Uuid::new_v4();
        self.conn
            .execute(
                "INSERT INTO positions (id, name, description, parent_id)
                 VALUES (?1, ?2, ?3, ?4);",
                params![
                    id.to_string(),
                    position.name.as_str(),
                    position.description.as_str(),
                    position.parent_id.map(|value| value.to_string()),
                ],
            )
            .map_err(|err| map_write_error(err, Some(&position.name), position.parent_id))?;
        self.load_required(id)
    }

    fn update(&self, id: PositionId, changes: &PositionChanges) -> PositionRepoResult<Position> {
        // Unset fields keep the stored value, so concurrent edits to other
        // columns survive.
        let changed = self
            .conn
            .execute(
                "UPDATE positions
                 SET name = COALESCE(?2, name),
                     description = COALESCE(?3, description),
                     parent_id = COALESCE(?4, parent_id)
                 WHERE id = ?1;",
                params![
                    id.to_string(),
                    changes.name.as_deref(),
                    changes.description.as_deref(),
                    changes.parent_id.map(|value| value.to_string()),
                ],
            )
            .map_err(|err| map_write_error(err, changes.name.as_deref(), changes.parent_id))?;
        if changed == 0 {
            return Err(PositionRepoError::NotFound(id));
        }
        self.load_required(id)
    }

    fn delete(&self, id: PositionId) -> PositionRepoResult<DeleteOutcome> {
        match self
            .conn
            .execute("DELETE FROM positions WHERE id = ?1;", [id.to_string()])
        {
            Ok(0) => Ok(DeleteOutcome::NotFound),
            Ok(_) => Ok(DeleteOutcome::Deleted),
            Err(err) if constraint_code(&err) == Some(ffi::SQLITE_CONSTRAINT_FOREIGNKEY) => {
                Ok(DeleteOutcome::HasChildren)
            }
            Err(err) => Err(err.into()),
        }
    }
}

fn map_write_error(
    err: rusqlite::Error,
    name: Option<&str>,
    parent_id: Option<PositionId>,
) -> PositionRepoError {
    match (constraint_code(&err), name, parent_id) {
        (Some(ffi::SQLITE_CONSTRAINT_UNIQUE), Some(name), _) => {
            PositionRepoError::DuplicateName(name.to_string())
        }
        (Some(ffi::SQLITE_CONSTRAINT_FOREIGNKEY), _, Some(parent_id)) => {
            PositionRepoError::ParentMissing(parent_id)
        }
        _ => err.into(),
    }
}

fn constraint_code(err: &rusqlite::Error) -> Option<c_int> {
    match err {
        rusqlite::Error::SqliteFailure(failure, _)
            if failure.code == ErrorCode::ConstraintViolation =>
        {
            Some(failure.extended_code)
        }
        _ => None,
    }
}

fn parse_position_row(row: &Row<'_>) -> PositionRepoResult<Position> {
    let id_text: String = row.get("id")?;
    let parent_id = row
        .get::<_, Option<String>>("parent_id")?
        .map(|value| parse_uuid(&value, "positions.parent_id"))
        .transpose()?;

    Ok(Position {
        id: parse_uuid(&id_text, "positions.id")?,
        name: row.get("name")?,
        description: row.get("description")?,
        created_at: row.get("created_at")?,
        parent_id,
    })
}

fn parse_uuid(value: &str, column: &'static str) -> PositionRepoResult<Uuid> {
    Uuid::parse_str(value)
        .map_err(|_| PositionRepoError::InvalidData(format!("invalid uuid `{value}` in {column}")))
}
