//! Tree assembler.
//!
//! Groups flat records by `parent_id` once, sorts each sibling list, then
//! builds nodes depth-first from that index with an explicit stack, so chain
//! depth is bounded by heap rather than call stack.
//! Input records are only read; nodes are built from clones.

use crate::model::position::{Position, PositionId, PositionNode};
use std::cmp::Ordering;
use std::collections::HashMap;
use std::slice::Iter;

type ByParent<'a> = HashMap<Option<PositionId>, Vec<&'a Position>>;

/// Builds the nested tree under the root.
///
/// Returns `None` for an empty input. The single-root invariant is not
/// re-checked: on inconsistent data the earliest-created root wins and the
/// rest are only visible through [`assemble_forest`].
pub fn assemble(records: &[Position]) -> Option<PositionNode> {
    assemble_forest(records).into_iter().next()
}

/// Builds one nested tree per parentless record, earliest-created first.
///
/// Records whose parent chain never reaches a root are left out.
pub fn assemble_forest(records: &[Position]) -> Vec<PositionNode> {
    let mut by_parent: ByParent<'_> = HashMap::new();
    for record in records {
        by_parent.entry(record.parent_id).or_default().push(record);
    }
    for siblings in by_parent.values_mut() {
        siblings.sort_by(|left, right| creation_order(left, right));
    }

    by_parent
        .get(&None)
        .map(|roots| {
            roots
                .iter()
                .filter_map(|root| build_tree(root, &by_parent))
                .collect()
        })
        .unwrap_or_default()
}

fn build_tree(root: &Position, by_parent: &ByParent<'_>) -> Option<PositionNode> {
    // Each frame holds a node under construction and its unvisited children.
    let mut stack = vec![(PositionNode::leaf(root), pending_children(root, by_parent))];
    let mut finished = None;
    while let Some((_, pending)) = stack.last_mut() {
        if let Some(child) = pending.next() {
            stack.push((PositionNode::leaf(child), pending_children(child, by_parent)));
            continue;
        }
        if let Some((done, _)) = stack.pop() {
            match stack.last_mut() {
                Some((parent, _)) => parent.children.push(done),
                None => finished = Some(done),
            }
        }
    }
    finished
}

fn pending_children<'a>(
    position: &Position,
    by_parent: &'a ByParent<'a>,
) -> Iter<'a, &'a Position> {
    by_parent
        .get(&Some(position.id))
        .map(|children| children.iter())
        .unwrap_or_default()
}

fn creation_order(left: &Position, right: &Position) -> Ordering {
    left.created_at
        .cmp(&right.created_at)
        .then_with(|| left.id.cmp(&right.id))
}
