//! Error taxonomy shared by the tree validator and the mutation coordinator.
//!
//! # Invariants
//! - Validation failures keep their specific kind; only unexpected store
//!   failures collapse to `Internal`.
//! - `Internal` never renders storage detail through `Display`; the cause
//!   stays reachable through `Error::source()` for diagnostics.

use crate::model::position::PositionId;
use crate::repo::position_repo::PositionRepoError;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Result type for position use-cases.
pub type PositionResult<T> = Result<T, PositionError>;

/// Errors surfaced by position validation and mutation.
#[derive(Debug)]
pub enum PositionError {
    /// Missing or malformed field, or missing parent on non-root create.
    InvalidInput(String),
    /// Name collides with an existing position.
    DuplicateName(String),
    /// Referenced parent does not exist.
    ParentNotFound(PositionId),
    /// Target position does not exist.
    NotFound(PositionId),
    /// Update carries no actual change.
    NoOp,
    /// Position designated as its own parent.
    SelfParent(PositionId),
    /// Proposed parent lies inside the subtree of the updated position.
    CyclicParent {
        id: PositionId,
        parent_id: PositionId,
    },
    /// The root can never acquire a parent.
    CannotReparentRoot(PositionId),
    /// Delete blocked because children exist.
    HasChildren(PositionId),
    /// Unexpected store or infrastructure failure.
    Internal(PositionRepoError),
}

/// Fieldless error kind, for transport mapping tables and log lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidInput,
    DuplicateName,
    ParentNotFound,
    NotFound,
    NoOp,
    SelfParent,
    CyclicParent,
    CannotReparentRoot,
    HasChildren,
    Internal,
}

impl ErrorKind {
    /// Every kind, in taxonomy order.
    pub const ALL: [ErrorKind; 10] = [
        ErrorKind::InvalidInput,
        ErrorKind::DuplicateName,
        ErrorKind::ParentNotFound,
        ErrorKind::NotFound,
        ErrorKind::NoOp,
        ErrorKind::SelfParent,
        ErrorKind::CyclicParent,
        ErrorKind::CannotReparentRoot,
        ErrorKind::HasChildren,
        ErrorKind::Internal,
    ];

    /// Stable snake_case code.
    pub fn code(self) -> &'static str {
        match self {
            Self::InvalidInput => "invalid_input",
            Self::DuplicateName => "duplicate_name",
            Self::ParentNotFound => "parent_not_found",
            Self::NotFound => "not_found",
            Self::NoOp => "no_op",
            Self::SelfParent => "self_parent",
            Self::CyclicParent => "cyclic_parent",
            Self::CannotReparentRoot => "cannot_reparent_root",
            Self::HasChildren => "has_children",
            Self::Internal => "internal",
        }
    }
}

impl PositionError {
    /// Returns the taxonomy kind of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidInput(_) => ErrorKind::InvalidInput,
            Self::DuplicateName(_) => ErrorKind::DuplicateName,
            Self::ParentNotFound(_) => ErrorKind::ParentNotFound,
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::NoOp => ErrorKind::NoOp,
            Self::SelfParent(_) => ErrorKind::SelfParent,
            Self::CyclicParent { .. } => ErrorKind::CyclicParent,
            Self::CannotReparentRoot(_) => ErrorKind::CannotReparentRoot,
            Self::HasChildren(_) => ErrorKind::HasChildren,
            Self::Internal(_) => ErrorKind::Internal,
        }
    }

    pub(crate) fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }
}

impl Display for PositionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidInput(message) => write!(f, "invalid input: {message}"),
            Self::DuplicateName(name) => write!(f, "position already exists: `{name}`"),
            Self::ParentNotFound(id) => write!(f, "parent position not found: {id}"),
            Self::NotFound(id) => write!(f, "position not found: {id}"),
            Self::NoOp => write!(
                f,
                "nothing to update, specify at least one changed property"
            ),
            Self::SelfParent(id) => write!(f, "position cannot be its own parent: {id}"),
            Self::CyclicParent { id, parent_id } => write!(
                f,
                "parent {parent_id} is a descendant of position {id}"
            ),
            Self::CannotReparentRoot(id) => {
                write!(f, "root position cannot have a parent: {id}")
            }
            Self::HasChildren(id) => {
                write!(f, "position has child positions, cannot be deleted: {id}")
            }
            Self::Internal(_) => write!(f, "internal storage failure"),
        }
    }
}

impl From<PositionRepoError> for PositionError {
    fn from(value: PositionRepoError) -> Self {
        match value {
            PositionRepoError::NotFound(id) => Self::NotFound(id),
            PositionRepoError::DuplicateName(name) => Self::DuplicateName(name),
            PositionRepoError::ParentMissing(id) => Self::ParentNotFound(id),
            other => Self::Internal(other),
        }
    }
}

impl Error for PositionError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Internal(err) => Some(err),
            _ => None,
        }
    }
}
