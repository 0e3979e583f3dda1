//! Tree validator.
//!
//! # Responsibility
//! - Decide whether a proposed create/update/delete keeps the hierarchy a
//!   single-rooted, acyclic tree with unique names.
//!
//! # Invariants
//! - Checks run against the snapshot passed in; nothing is cached.
//! - Rejections use the specific `PositionError` kind, never `Internal`.

use crate::error::{PositionError, PositionResult};
use crate::model::position::{
    normalize_description, normalize_name, NewPosition, Position, PositionChanges, PositionId,
    PositionUpdate,
};
use crate::tree::ancestry::is_self_or_descendant;
use crate::tree::TreeSnapshot;

/// Validates a create request.
///
/// An empty snapshot accepts only a parentless position, which becomes the
/// root. Otherwise a resolvable parent is mandatory.
pub fn validate_create(
    snapshot: &TreeSnapshot,
    name: &str,
    description: &str,
    parent_id: Option<PositionId>,
) -> PositionResult<NewPosition> {
    let name =
        normalize_name(name).map_err(|rule| PositionError::invalid_input(rule.message()))?;
    let description = normalize_description(description)
        .map_err(|rule| PositionError::invalid_input(rule.message()))?;

    if snapshot.find_by_name(&name).is_some() {
        return Err(PositionError::DuplicateName(name));
    }

    match (snapshot.is_empty(), parent_id) {
        (true, Some(_)) => {
            return Err(PositionError::invalid_input(
                "no positions exist yet, the first position must not have a parent",
            ))
        }
        (false, None) => {
            return Err(PositionError::invalid_input(
                "parent position must be provided",
            ))
        }
        (false, Some(parent_id)) if !snapshot.contains(parent_id) => {
            return Err(PositionError::ParentNotFound(parent_id))
        }
        _ => {}
    }

    Ok(NewPosition {
        name,
        description,
        parent_id,
    })
}

/// Validates a partial update and returns the fields that really change.
pub fn validate_update(
    snapshot: &TreeSnapshot,
    id: PositionId,
    update: &PositionUpdate,
) -> PositionResult<PositionChanges> {
    let current = snapshot.get(id).ok_or(PositionError::NotFound(id))?;
    if update.is_empty() {
        return Err(PositionError::NoOp);
    }

    let mut changes = PositionChanges::default();

    if let Some(name) = update.name.as_deref() {
        let name =
            normalize_name(name).map_err(|rule| PositionError::invalid_input(rule.message()))?;
        if snapshot
            .find_by_name(&name)
            .is_some_and(|existing| existing.id != id)
        {
            return Err(PositionError::DuplicateName(name));
        }
        if name != current.name {
            changes.name = Some(name);
        }
    }

    if let Some(description) = update.description.as_deref() {
        let description = normalize_description(description)
            .map_err(|rule| PositionError::invalid_input(rule.message()))?;
        if description != current.description {
            changes.description = Some(description);
        }
    }

    if let Some(parent_id) = update.parent_id {
        check_reparent(snapshot, current, parent_id)?;
        if current.parent_id != Some(parent_id) {
            changes.parent_id = Some(parent_id);
        }
    }

    if changes.is_empty() {
        return Err(PositionError::NoOp);
    }
    Ok(changes)
}

fn check_reparent(
    snapshot: &TreeSnapshot,
    current: &Position,
    parent_id: PositionId,
) -> PositionResult<()> {
    if current.is_root() {
        return Err(PositionError::CannotReparentRoot(current.id));
    }
    if parent_id == current.id {
        return Err(PositionError::SelfParent(current.id));
    }
    if !snapshot.contains(parent_id) {
        return Err(PositionError::ParentNotFound(parent_id));
    }
    if is_self_or_descendant(snapshot, current.id, parent_id) {
        return Err(PositionError::CyclicParent {
            id: current.id,
            parent_id,
        });
    }
    Ok(())
}

/// Validates a delete. Deletion is blocked, never cascaded, while children
/// exist.
pub fn validate_delete(snapshot: &TreeSnapshot, id: PositionId) -> PositionResult<()> {
    if !snapshot.contains(id) {
        return Err(PositionError::NotFound(id));
    }
    if snapshot.has_children(id) {
        return Err(PositionError::HasChildren(id));
    }
    Ok(())
}
