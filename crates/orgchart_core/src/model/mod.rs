//! Domain model for the position hierarchy.
//!
//! # Responsibility
//! - Define the persisted `Position` record and the assembled tree shape.
//! - Own field-level rules shared by create and update validation.
//!
//! # Invariants
//! - Every position is identified by a stable `PositionId`.
//! - Deletion is a hard delete, only allowed for childless positions.

pub mod position;
