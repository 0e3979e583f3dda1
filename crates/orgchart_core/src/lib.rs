//! Core domain logic for the position hierarchy.
//! This crate is the single source of truth for tree invariants.

pub mod db;
pub mod error;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod tree;

pub use error::{ErrorKind, PositionError, PositionResult};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::position::{
    NewPosition, Position, PositionChanges, PositionId, PositionNode, PositionUpdate,
};
pub use repo::position_repo::{
    DeleteOutcome, PositionRepoError, PositionRepoResult, PositionRepository,
    SqlitePositionRepository,
};
pub use service::position_service::PositionService;
pub use tree::integrity::IntegrityIssue;
pub use tree::TreeSnapshot;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
