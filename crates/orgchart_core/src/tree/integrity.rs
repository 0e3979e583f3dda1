//! Read-only audit of stored hierarchy invariants.
//!
//! The validator keeps these invariants on every write; the audit exists to
//! spot data written around it (manual SQL, imports, races the store
//! constraints could not catch). It never repairs anything.

use crate::model::position::PositionId;
use crate::tree::ancestry::{ancestors_of, AncestorWalk};
use crate::tree::TreeSnapshot;
use serde::Serialize;
use std::collections::HashMap;

/// One invariant breach found in stored data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "issue", content = "detail", rename_all = "snake_case")]
pub enum IntegrityIssue {
    /// Positions exist but none is parentless.
    NoRoot,
    /// More than one parentless position.
    MultipleRoots(Vec<PositionId>),
    /// `parent_id` points at a missing position.
    DanglingParent {
        id: PositionId,
        parent_id: PositionId,
    },
    /// Following `parent_id` from `id` loops.
    Cycle { id: PositionId },
    /// Two positions share one name.
    DuplicateName { name: String, ids: Vec<PositionId> },
}

/// Reports every invariant breach in `snapshot`, in a stable order.
pub fn audit(snapshot: &TreeSnapshot) -> Vec<IntegrityIssue> {
    let mut issues = Vec::new();
    if snapshot.is_empty() {
        return issues;
    }

    let roots: Vec<PositionId> = snapshot.roots().map(|root| root.id).collect();
    match roots.len() {
        0 => issues.push(IntegrityIssue::NoRoot),
        1 => {}
        _ => issues.push(IntegrityIssue::MultipleRoots(roots)),
    }

    for record in snapshot.records() {
        if let Some(parent_id) = record.parent_id {
            if !snapshot.contains(parent_id) {
                issues.push(IntegrityIssue::DanglingParent {
                    id: record.id,
                    parent_id,
                });
                continue;
            }
        }
        if let Some(AncestorWalk::Cycle { .. }) = ancestors_of(snapshot, record.id) {
            issues.push(IntegrityIssue::Cycle { id: record.id });
        }
    }

    let mut by_name: HashMap<&str, Vec<PositionId>> = HashMap::new();
    for record in snapshot.records() {
        by_name.entry(record.name.as_str()).or_default().push(record.id);
    }
    let mut duplicates: Vec<_> = by_name
        .into_iter()
        .filter(|(_, ids)| ids.len() > 1)
        .collect();
    duplicates.sort_by_key(|(name, _)| *name);
    issues.extend(
        duplicates
            .into_iter()
            .map(|(name, ids)| IntegrityIssue::DuplicateName {
                name: name.to_string(),
                ids,
            }),
    );

    issues
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::position::Position;
    use uuid::Uuid;

    fn record(name: &str, parent_id: Option<PositionId>) -> Position {
        Position {
            id: Uuid::new_v4(),
            name: name.to_string(),
            description: format!("{name} description"),
            created_at: 0,
            parent_id,
        }
    }

    #[test]
    fn consistent_tree_has_no_issues() {
        let root = record("Root", None);
        let child = record("Child", Some(root.id));
        let snapshot = TreeSnapshot::from_records(vec![root, child]);
        assert!(audit(&snapshot).is_empty());
        assert!(audit(&TreeSnapshot::default()).is_empty());
    }

    #[test]
    fn reports_multiple_roots_and_dangling_parent() {
        let first = record("First", None);
        let second = record("Second", None);
        let missing = Uuid::new_v4();
        let orphan = record("Orphan", Some(missing));
        let ids = (first.id, second.id, orphan.id);
        let snapshot = TreeSnapshot::from_records(vec![first, second, orphan]);

        assert_eq!(
            audit(&snapshot),
            vec![
                IntegrityIssue::MultipleRoots(vec![ids.0, ids.1]),
                IntegrityIssue::DanglingParent {
                    id: ids.2,
                    parent_id: missing
                },
            ]
        );
    }

    #[test]
    fn reports_cycles_without_a_root() {
        let mut a = record("Alpha", None);
        let b = record("Beta", Some(a.id));
        a.parent_id = Some(b.id);
        let snapshot = TreeSnapshot::from_records(vec![a, b]);

        let issues = audit(&snapshot);
        assert_eq!(issues[0], IntegrityIssue::NoRoot);
        assert_eq!(
            issues
                .iter()
                .filter(|issue| matches!(issue, IntegrityIssue::Cycle { .. }))
                .count(),
            2
        );
    }

    #[test]
    fn reports_duplicate_names() {
        let root = record("Root", None);
        let one = record("Twin", Some(root.id));
        let two = record("Twin", Some(root.id));
        let ids = vec![one.id, two.id];
        let snapshot = TreeSnapshot::from_records(vec![root, one, two]);

        assert_eq!(
            audit(&snapshot),
            vec![IntegrityIssue::DuplicateName {
                name: "Twin".to_string(),
                ids
            }]
        );
    }
}
