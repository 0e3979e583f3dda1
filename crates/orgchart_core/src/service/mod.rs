//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate snapshot reads, tree validation and repository writes.
//! - Keep transport layers decoupled from storage details.

pub mod position_service;
