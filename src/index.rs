use std::collections::{HashMap, HashSet};

use crate::{NodeIndex, NodeRef};

/// Auxiliary lookups kept alongside the node graph of a [`Tree`](crate::Tree).
///
/// `taken` holds every index reachable from the root, `leaves` exactly the nodes
/// without children. Both are updated by the tree on every mutation.
#[derive(Debug, Default)]
pub(crate) struct TreeIndex {
    leaves: HashMap<NodeIndex, NodeRef>,
    taken: HashSet<NodeIndex>,
}

impl TreeIndex {
    pub fn contains(&self, index: NodeIndex) -> bool {
        self.taken.contains(&index)
    }

    pub fn len(&self) -> usize {
        self.taken.len()
    }

    pub fn leaf(&self, index: NodeIndex) -> Option<&NodeRef> {
        self.leaves.get(&index)
    }

    pub fn is_leaf(&self, index: NodeIndex) -> bool {
        self.leaves.contains_key(&index)
    }

    pub fn leaf_indexes(&self) -> impl Iterator<Item = NodeIndex> + '_ {
        self.leaves.keys().copied()
    }

    /// Register a node, tracking it as a leaf if it has no children
    pub fn insert(&mut self, node: NodeRef) {
        let index = node.index();
        self.taken.insert(index);
        if node.is_leaf() {
            self.leaves.insert(index, node);
        }
    }

    /// The node gained a child
    pub fn demote(&mut self, index: NodeIndex) {
        self.leaves.remove(&index);
    }

    /// The node lost its last child
    pub fn promote(&mut self, node: NodeRef) {
        self.leaves.insert(node.index(), node);
    }

    /// Forget a leaf entirely. Returns `None` if the index is not a leaf.
    pub fn remove_leaf(&mut self, index: NodeIndex) -> Option<NodeRef> {
        let node = self.leaves.remove(&index)?;
        self.taken.remove(&index);
        Some(node)
    }

    pub fn clear(&mut self) {
        self.leaves.clear();
        self.taken.clear();
    }
}
