//! Record Store abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the store primitives the core depends on.
//! - Isolate SQLite query details from validation and orchestration.
//!
//! # Invariants
//! - Repository APIs return semantic errors (`NotFound`, `DuplicateName`,
//!   `ParentMissing`) in addition to DB transport errors.

pub mod position_repo;
