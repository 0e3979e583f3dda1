use crate::model::position::{Position, PositionId};
use std::collections::HashMap;

/// Immutable view of every stored position, indexed for tree checks.
///
/// Built from a single bulk `find_all`. Children lists keep the input order.
#[derive(Debug, Clone, Default)]
pub struct TreeSnapshot {
    records: Vec<Position>,
    by_id: HashMap<PositionId, usize>,
    by_name: HashMap<String, usize>,
    children: HashMap<PositionId, Vec<usize>>,
    roots: Vec<usize>,
}

impl TreeSnapshot {
    /// Indexes `records` by id, name and parent.
    pub fn from_records(records: Vec<Position>) -> Self {
        let mut by_id = HashMap::with_capacity(records.len());
        let mut by_name = HashMap::with_capacity(records.len());
        let mut children: HashMap<PositionId, Vec<usize>> = HashMap::new();
        let mut roots = Vec::new();

        for (index, record) in records.iter().enumerate() {
            by_id.insert(record.id, index);
            by_name.insert(record.name.clone(), index);
            match record.parent_id {
                Some(parent_id) => children.entry(parent_id).or_default().push(index),
                None => roots.push(index),
            }
        }

        Self {
            records,
            by_id,
            by_name,
            children,
            roots,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn get(&self, id: PositionId) -> Option<&Position> {
        self.by_id.get(&id).map(|&index| &self.records[index])
    }

    pub fn contains(&self, id: PositionId) -> bool {
        self.by_id.contains_key(&id)
    }

    pub fn find_by_name(&self, name: &str) -> Option<&Position> {
        self.by_name.get(name).map(|&index| &self.records[index])
    }

    /// Direct children of `id`; empty when `id` has none or is unknown.
    pub fn children_of(&self, id: PositionId) -> impl Iterator<Item = &Position> + '_ {
        self.children
            .get(&id)
            .into_iter()
            .flatten()
            .map(|&index| &self.records[index])
    }

    pub fn has_children(&self, id: PositionId) -> bool {
        self.children.get(&id).is_some_and(|list| !list.is_empty())
    }

    /// Records without a parent. A consistent store has at most one.
    pub fn roots(&self) -> impl Iterator<Item = &Position> + '_ {
        self.roots.iter().map(|&index| &self.records[index])
    }

    pub fn records(&self) -> &[Position] {
        &self.records
    }
}
