use std::{
    cell::RefCell,
    rc::{Rc, Weak},
};

use crate::{noderef::NodeRef, NodeIndex};

pub(crate) type SharedNode = Rc<RefCell<Node>>;

/// A single vertex of a [`Tree`](crate::Tree).
///
/// A node owns its children and holds a non-owning back-reference to its parent,
/// so the parent/child wiring never forms an ownership cycle. Children keep the
/// order in which they were added.
pub struct Node {
    index: NodeIndex,
    parent: Option<Weak<RefCell<Node>>>,
    children: Vec<NodeRef>,
}

impl Node {
    pub(crate) fn new(index: NodeIndex) -> Self {
        Self {
            index,
            parent: None,
            children: Vec::new(),
        }
    }

    pub(crate) fn with_parent(mut self, parent: &NodeRef) -> Self {
        self.parent = Some(parent.downgrade());
        self
    }

    pub fn index(&self) -> NodeIndex {
        self.index
    }

    /// Parent of this node, `None` for the root or a detached node
    pub fn parent(&self) -> Option<NodeRef> {
        self.parent
            .as_ref()
            .and_then(Weak::upgrade)
            .map(NodeRef::from_rc)
    }

    pub fn children(&self) -> &[NodeRef] {
        &self.children
    }

    /// Return the number of child nodes for this node
    pub fn num_children(&self) -> usize {
        self.children.len()
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    pub fn child_indexes(&self) -> impl Iterator<Item = NodeIndex> + '_ {
        self.children.iter().map(NodeRef::index)
    }

    /// Add a new child node to this node
    pub(crate) fn push_child(&mut self, node: NodeRef) {
        self.children.push(node);
    }

    /// Remove the child with the given index, returning it if it was present
    pub(crate) fn remove_child(&mut self, index: NodeIndex) -> Option<NodeRef> {
        let position = self.children.iter().position(|child| child.index() == index)?;
        Some(self.children.remove(position))
    }

    pub(crate) fn take_children(&mut self) -> Vec<NodeRef> {
        std::mem::take(&mut self.children)
    }

    pub(crate) fn detach(&mut self) {
        self.parent = None;
    }
}

impl std::fmt::Debug for Node {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Node")
            .field("index", &self.index)
            .field("parent", &self.parent().map(|parent| parent.index()))
            .field("children", &self.child_indexes().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use crate::{noderef::NodeRef, Node};

    #[test]
    fn parent_is_not_owned() {
        let parent = NodeRef::new(Node::new(1));
        let child = NodeRef::new(Node::new(2).with_parent(&parent));

        assert_eq!(child.parent().map(|p| p.index()), Some(1));

        drop(parent);
        assert!(child.parent().is_none());
    }

    #[test]
    fn remove_child_keeps_sibling_order() {
        let mut parent = NodeRef::new(Node::new(1));
        for index in [4, 2, 9] {
            let child = NodeRef::new(Node::new(index).with_parent(&parent));
            parent.node_mut().push_child(child);
        }

        let removed = parent.node_mut().remove_child(2);
        assert_eq!(removed.map(|node| node.index()), Some(2));
        assert!(parent.node_mut().remove_child(2).is_none());

        let remaining: Vec<_> = parent.node().child_indexes().collect();
        assert_eq!(remaining, vec![4, 9]);
        assert!(!parent.node().is_leaf());
    }
}
