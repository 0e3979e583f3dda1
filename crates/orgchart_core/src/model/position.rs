//! Position domain model.
//!
//! # Invariants
//! - `id` and `created_at` never change after insert.
//! - `parent_id == None` marks the single root of the hierarchy.
//! - `name` is unique across the store.

use serde::Serialize;
use uuid::Uuid;

/// Stable identifier for one position.
pub type PositionId = Uuid;

/// Minimum accepted `name` length, counted in chars after trimming.
pub const MIN_NAME_CHARS: usize = 2;
/// Minimum accepted `description` length, counted in chars after trimming.
pub const MIN_DESCRIPTION_CHARS: usize = 6;

/// Persisted position record. Knows only its direct parent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Position {
    pub id: PositionId,
    pub name: String,
    pub description: String,
    /// Unix epoch milliseconds, assigned by the store.
    pub created_at: i64,
    /// `None` only for the root.
    pub parent_id: Option<PositionId>,
}

impl Position {
    /// Returns whether this position is the hierarchy root.
    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }
}

/// Insert payload accepted by the Record Store. The store assigns `id` and
/// `created_at`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPosition {
    pub name: String,
    pub description: String,
    pub parent_id: Option<PositionId>,
}

/// Partial update request. `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PositionUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub parent_id: Option<PositionId>,
}

impl PositionUpdate {
    /// Returns whether no field was supplied at all.
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.description.is_none() && self.parent_id.is_none()
    }
}

/// Fields an accepted update actually changes. `None` keeps the stored
/// value, so the store writes only the columns named here.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PositionChanges {
    pub name: Option<String>,
    pub description: Option<String>,
    pub parent_id: Option<PositionId>,
}

impl PositionChanges {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.description.is_none() && self.parent_id.is_none()
    }

    /// Returns `current` with the changed fields applied.
    pub fn apply(&self, current: &Position) -> Position {
        let mut next = current.clone();
        if let Some(name) = &self.name {
            next.name.clone_from(name);
        }
        if let Some(description) = &self.description {
            next.description.clone_from(description);
        }
        if let Some(parent_id) = self.parent_id {
            next.parent_id = Some(parent_id);
        }
        next
    }
}

/// Nested tree node produced by the assembler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PositionNode {
    pub id: PositionId,
    pub name: String,
    pub description: String,
    pub created_at: i64,
    pub children: Vec<PositionNode>,
}

impl PositionNode {
    /// Creates a leaf node from a flat record.
    pub fn leaf(position: &Position) -> Self {
        Self {
            id: position.id,
            name: position.name.clone(),
            description: position.description.clone(),
            created_at: position.created_at,
            children: Vec::new(),
        }
    }

    /// Flattens this subtree back into parent-pointer records, pre-order.
    ///
    /// The node itself receives `parent_id`; descendants point at their
    /// enclosing node.
    pub fn flatten(&self, parent_id: Option<PositionId>) -> Vec<Position> {
        let mut out = Vec::new();
        let mut stack = vec![(self, parent_id)];
        while let Some((node, parent_id)) = stack.pop() {
            out.push(Position {
                id: node.id,
                name: node.name.clone(),
                description: node.description.clone(),
                created_at: node.created_at,
                parent_id,
            });
            for child in node.children.iter().rev() {
                stack.push((child, Some(node.id)));
            }
        }
        out
    }

    /// Number of nodes in this subtree, including itself.
    pub fn node_count(&self) -> usize {
        let mut count = 0;
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            count += 1;
            stack.extend(node.children.iter());
        }
        count
    }
}

/// Field-level rule failure for `name` or `description`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldRule {
    NameTooShort,
    DescriptionTooShort,
}

impl FieldRule {
    /// Human-readable message for the violated rule.
    pub fn message(self) -> String {
        match self {
            Self::NameTooShort => {
                format!("name must be at least {MIN_NAME_CHARS} characters long")
            }
            Self::DescriptionTooShort => format!(
                "description must be at least {MIN_DESCRIPTION_CHARS} characters long"
            ),
        }
    }
}

/// Trims and checks a candidate `name`.
pub fn normalize_name(value: &str) -> Result<String, FieldRule> {
    normalize_min_chars(value, MIN_NAME_CHARS).ok_or(FieldRule::NameTooShort)
}

/// Trims and checks a candidate `description`.
pub fn normalize_description(value: &str) -> Result<String, FieldRule> {
    normalize_min_chars(value, MIN_DESCRIPTION_CHARS).ok_or(FieldRule::DescriptionTooShort)
}

fn normalize_min_chars(value: &str, min_chars: usize) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.chars().count() < min_chars {
        return None;
    }
    Some(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_name_trims_and_enforces_length() {
        assert_eq!(normalize_name("  CEO ").unwrap(), "CEO");
        assert_eq!(normalize_name(" A "), Err(FieldRule::NameTooShort));
        assert_eq!(normalize_name("   "), Err(FieldRule::NameTooShort));
    }

    #[test]
    fn normalize_description_counts_chars_not_bytes() {
        assert_eq!(
            normalize_description("ééééé"),
            Err(FieldRule::DescriptionTooShort)
        );
        assert_eq!(normalize_description("éééééé").unwrap(), "éééééé");
    }

    #[test]
    fn flatten_assigns_enclosing_parent() {
        let root_id = Uuid::new_v4();
        let child_id = Uuid::new_v4();
        let tree = PositionNode {
            id: root_id,
            name: "Root".to_string(),
            description: "root node".to_string(),
            created_at: 1,
            children: vec![PositionNode {
                id: child_id,
                name: "Child".to_string(),
                description: "child node".to_string(),
                created_at: 2,
                children: Vec::new(),
            }],
        };

        let flat = tree.flatten(None);
        assert_eq!(flat.len(), 2);
        assert_eq!(flat[0].id, root_id);
        assert_eq!(flat[0].parent_id, None);
        assert_eq!(flat[1].id, child_id);
        assert_eq!(flat[1].parent_id, Some(root_id));
        assert_eq!(tree.node_count(), 2);
    }
}
