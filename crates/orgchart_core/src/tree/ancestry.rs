//! Ancestry walker.
//!
//! Breadth-first over the snapshot's children index. Each position is
//! visited at most once, so cost is O(n) in the snapshot size.

use crate::model::position::PositionId;
use crate::tree::TreeSnapshot;
use std::collections::{HashSet, VecDeque};

/// Returns every position transitively below `id`, excluding `id` itself.
///
/// Unknown ids have no descendants.
pub fn descendants_of(snapshot: &TreeSnapshot, id: PositionId) -> HashSet<PositionId> {
    let mut seen = HashSet::new();
    let mut queue = VecDeque::from([id]);
    while let Some(current) = queue.pop_front() {
        for child in snapshot.children_of(current) {
            if child.id != id && seen.insert(child.id) {
                queue.push_back(child.id);
            }
        }
    }
    seen
}

/// Returns whether `candidate` is `id` itself or one of its descendants.
pub fn is_self_or_descendant(
    snapshot: &TreeSnapshot,
    id: PositionId,
    candidate: PositionId,
) -> bool {
    candidate == id || descendants_of(snapshot, id).contains(&candidate)
}

/// Outcome of following `parent_id` links upward.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AncestorWalk {
    /// Reached a record without parent. Holds ancestors nearest-first,
    /// ending with that root.
    Rooted(Vec<PositionId>),
    /// A `parent_id` points at an id missing from the snapshot.
    Dangling {
        ancestors: Vec<PositionId>,
        missing: PositionId,
    },
    /// The walk came back to an already visited record.
    Cycle { ancestors: Vec<PositionId> },
}

/// Follows `parent_id` links from `id` upward, at most once per record.
///
/// Returns `None` when `id` itself is not in the snapshot.
pub fn ancestors_of(snapshot: &TreeSnapshot, id: PositionId) -> Option<AncestorWalk> {
    let start = snapshot.get(id)?;
    let mut visited = HashSet::from([id]);
    let mut ancestors = Vec::new();
    let mut cursor = start.parent_id;

    while let Some(current) = cursor {
        if !visited.insert(current) {
            return Some(AncestorWalk::Cycle { ancestors });
        }
        let Some(record) = snapshot.get(current) else {
            return Some(AncestorWalk::Dangling {
                ancestors,
                missing: current,
            });
        };
        ancestors.push(current);
        cursor = record.parent_id;
    }

    Some(AncestorWalk::Rooted(ancestors))
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
            description: format!("{name} position"),
            created_at: 0,
            parent_id,
        }
    }

    #[test]
    fn descendants_cover_whole_subtree() {
        let root = record("Root", None);
        let child_a = record("ChildA", Some(root.id));
        let child_b = record("ChildB", Some(root.id));
        let grandchild = record("Grandchild", Some(child_a.id));
        let ids = (root.id, child_a.id, child_b.id, grandchild.id);
        let snapshot = TreeSnapshot::from_records(vec![root, child_a, child_b, grandchild]);

        let below_root = descendants_of(&snapshot, ids.0);
        assert_eq!(below_root, HashSet::from([ids.1, ids.2, ids.3]));

        let below_a = descendants_of(&snapshot, ids.1);
        assert_eq!(below_a, HashSet::from([ids.3]));

        assert!(descendants_of(&snapshot, ids.3).is_empty());
        assert!(descendants_of(&snapshot, Uuid::new_v4()).is_empty());
    }

    #[test]
    fn descendants_terminate_on_corrupt_cycle() {
        let mut a = record("Alpha", None);
        let b = record("Beta", Some(a.id));
        a.parent_id = Some(b.id);
        let (a_id, b_id) = (a.id, b.id);
        let snapshot = TreeSnapshot::from_records(vec![a, b]);

        assert_eq!(descendants_of(&snapshot, a_id), HashSet::from([b_id]));
        assert!(is_self_or_descendant(&snapshot, a_id, a_id));
        assert!(is_self_or_descendant(&snapshot, a_id, b_id));
    }

    #[test]
    fn ancestors_walk_to_root() {
        let root = record("Root", None);
        let child = record("Child", Some(root.id));
        let grandchild = record("Grandchild", Some(child.id));
        let ids = (root.id, child.id, grandchild.id);
        let snapshot = TreeSnapshot::from_records(vec![root, child, grandchild]);

        assert_eq!(
            ancestors_of(&snapshot, ids.2),
            Some(AncestorWalk::Rooted(vec![ids.1, ids.0]))
        );
        assert_eq!(
            ancestors_of(&snapshot, ids.0),
            Some(AncestorWalk::Rooted(Vec::new()))
        );
        assert_eq!(ancestors_of(&snapshot, Uuid::new_v4()), None);
    }

    #[test]
    fn ancestors_report_dangling_and_cycles() {
        let missing = Uuid::new_v4();
        let orphan = record("Orphan", Some(missing));
        let orphan_id = orphan.id;

        let mut a = record("Alpha", None);
        let b = record("Beta", Some(a.id));
        a.parent_id = Some(b.id);
        let a_id = a.id;

        let snapshot = TreeSnapshot::from_records(vec![orphan, a, b]);
        assert_eq!(
            ancestors_of(&snapshot, orphan_id),
            Some(AncestorWalk::Dangling {
                ancestors: Vec::new(),
                missing
            })
        );
        assert!(matches!(
            ancestors_of(&snapshot, a_id),
            Some(AncestorWalk::Cycle { .. })
        ));
    }
}
