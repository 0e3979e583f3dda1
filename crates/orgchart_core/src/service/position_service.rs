//! Position use-case service (mutation coordinator).
//!
//! # Responsibility
//! - Read a store snapshot, run the tree validator, then issue the write.
//! - Translate store-level constraint failures that slip through the
//!   validate-then-write window into the same error kinds as validation.
//!
//! # Invariants
//! - Every mutation is validated against a fresh bulk snapshot.
//! - Only unexpected store failures surface as `PositionError::Internal`.
//! - No retries; store errors are reported once.

use crate::error::{PositionError, PositionResult};
use crate::model::position::{Position, PositionId, PositionNode, PositionUpdate};
use crate::repo::position_repo::{DeleteOutcome, PositionRepository};
use crate::tree::assemble::assemble;
use crate::tree::integrity::{audit, IntegrityIssue};
use crate::tree::validate::{validate_create, validate_delete, validate_update};
use crate::tree::TreeSnapshot;
use log::{error, info, warn};
use std::error::Error;
use std::time::Instant;

/// Position hierarchy service facade.
pub struct PositionService<R: PositionRepository> {
    repo: R,
}

impl<R: PositionRepository> PositionService<R> {
    /// Creates service from repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Creates one position and returns its id.
    ///
    /// The first position in an empty store becomes the root and must not
    /// name a parent; every later position must.
    pub fn create_position(
        &self,
        name: &str,
        description: &str,
        parent_id: Option<PositionId>,
    ) -> PositionResult<PositionId> {
        let started_at = Instant::now();
        let result = self.snapshot().and_then(|snapshot| {
            let accepted = validate_create(&snapshot, name, description, parent_id)?;
            let created = self.repo.insert(&accepted)?;
            Ok(created.id)
        });
        finish("position_create", started_at, result)
    }

    /// Applies a partial update and returns the updated id.
    pub fn update_position(
        &self,
        id: PositionId,
        update: &PositionUpdate,
    ) -> PositionResult<PositionId> {
        let started_at = Instant::now();
        let result = self.snapshot().and_then(|snapshot| {
            let changes = validate_update(&snapshot, id, update)?;
            let updated = self.repo.update(id, &changes)?;
            Ok(updated.id)
        });
        finish("position_update", started_at, result)
    }

    /// Deletes one childless position.
    pub fn delete_position(&self, id: PositionId) -> PositionResult<()> {
        let started_at = Instant::now();
        let result = self.snapshot().and_then(|snapshot| {
            validate_delete(&snapshot, id)?;
            match self.repo.delete(id)? {
                DeleteOutcome::Deleted => Ok(()),
                DeleteOutcome::NotFound => Err(PositionError::NotFound(id)),
                DeleteOutcome::HasChildren => Err(PositionError::HasChildren(id)),
            }
        });
        finish("position_delete", started_at, result)
    }

    /// Assembles the whole hierarchy. `None` when the store is empty.
    pub fn get_tree(&self) -> PositionResult<Option<PositionNode>> {
        let started_at = Instant::now();
        let result = self
            .repo
            .find_all()
            .map(|records| assemble(&records))
            .map_err(PositionError::from);
        finish("position_tree", started_at, result)
    }

    /// Lists direct children of an existing position.
    pub fn get_children(&self, id: PositionId) -> PositionResult<Vec<Position>> {
        let started_at = Instant::now();
        let result = self.get_position(id).and_then(|_| {
            self.repo
                .find_children_of(id)
                .map_err(PositionError::from)
        });
        finish("position_children", started_at, result)
    }

    /// Loads one position.
    pub fn get_position(&self, id: PositionId) -> PositionResult<Position> {
        self.repo.find_by_id(id)?.ok_or(PositionError::NotFound(id))
    }

    /// Lists every position as flat records.
    pub fn list_positions(&self) -> PositionResult<Vec<Position>> {
        self.repo.find_all().map_err(Into::into)
    }

    /// Audits stored data for hierarchy invariant breaches.
    pub fn audit(&self) -> PositionResult<Vec<IntegrityIssue>> {
        let issues = audit(&self.snapshot()?);
        if !issues.is_empty() {
            warn!(
                "event=position_audit module=service status=degraded issue_count={}",
                issues.len()
            );
        }
        Ok(issues)
    }

    fn snapshot(&self) -> PositionResult<TreeSnapshot> {
        Ok(TreeSnapshot::from_records(self.repo.find_all()?))
    }
}

fn finish<T>(
    event: &'static str,
    started_at: Instant,
    result: PositionResult<T>,
) -> PositionResult<T> {
    let duration_ms = started_at.elapsed().as_millis();
    match &result {
        Ok(_) => info!("event={event} module=service status=ok duration_ms={duration_ms}"),
        Err(err @ PositionError::Internal(_)) => error!(
            "event={event} module=service status=error duration_ms={duration_ms} error_code={} error={}",
            err.kind().code(),
            err.source().map_or_else(|| err.to_string(), ToString::to_string)
        ),
        Err(err) => info!(
            "event={event} module=service status=rejected duration_ms={duration_ms} error_code={}",
            err.kind().code()
        ),
    }
    result
}
