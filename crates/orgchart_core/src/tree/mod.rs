//! Pure tree logic over in-memory snapshots.
//!
//! # Responsibility
//! - Validate proposed create/update/delete mutations against tree invariants.
//! - Walk descendants and ancestors without store round-trips.
//! - Assemble nested trees from flat parent-pointer rows.
//!
//! # Invariants
//! - Nothing here performs I/O or holds state across calls.
//! - Traversals visit each position at most once, so corrupt data cannot
//!   cause unbounded loops.

pub mod ancestry;
pub mod assemble;
pub mod integrity;
mod snapshot;
pub mod validate;

pub use snapshot::TreeSnapshot;
