use std::{
    cell::{Ref, RefCell, RefMut},
    rc::{Rc, Weak},
};

use crate::{
    display::TreeDisplay,
    iterator::{BreadthFirstIter, IterNode, NodeRefIter, PostOrderIter},
    node::SharedNode,
    Node, NodeIndex,
};

/// Shared handle to a [`Node`] inside a [`Tree`](crate::Tree).
///
/// Handles compare by identity: two handles are equal only when they point at
/// the same node allocation.
pub struct NodeRef {
    node_ref: SharedNode,
}

impl NodeRef {
    pub(crate) fn new(node: Node) -> Self {
        Self {
            node_ref: Rc::new(RefCell::new(node)),
        }
    }

    pub(crate) fn from_rc(node_ref: SharedNode) -> Self {
        Self { node_ref }
    }

    pub(crate) fn downgrade(&self) -> Weak<RefCell<Node>> {
        Rc::downgrade(&self.node_ref)
    }

    /// True when no other handle shares this node
    pub(crate) fn is_unique(&self) -> bool {
        Rc::strong_count(&self.node_ref) == 1
    }

    /// Get a reference to the inner node
    pub fn node(&self) -> Ref<'_, Node> {
        self.node_ref.borrow()
    }

    /// Get a mutable reference to the inner node
    pub(crate) fn node_mut(&mut self) -> RefMut<'_, Node> {
        self.node_ref.borrow_mut()
    }

    pub fn index(&self) -> NodeIndex {
        self.node().index()
    }

    pub fn parent(&self) -> Option<NodeRef> {
        self.node().parent()
    }

    /// Handles to the children of this node, in insertion order
    pub fn children(&self) -> Vec<NodeRef> {
        self.node().children().to_vec()
    }

    pub fn is_leaf(&self) -> bool {
        self.node().is_leaf()
    }

    /// Depth-first pre-order iteration over this subtree
    pub fn iter(&self) -> NodeRefIter {
        NodeRefIter::new(self.clone())
    }

    /// Breadth-first iteration over this subtree
    pub fn breadth_first(&self) -> BreadthFirstIter {
        BreadthFirstIter::new(Some(self.clone()))
    }

    /// Post-order iteration: every descendant before its parent
    pub fn post_order(&self) -> PostOrderIter {
        PostOrderIter::new(self.clone())
    }
}

impl Clone for NodeRef {
    fn clone(&self) -> Self {
        Self {
            node_ref: self.node_ref.clone(),
        }
    }
}

impl PartialEq for NodeRef {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.node_ref, &other.node_ref)
    }
}

impl Eq for NodeRef {}

impl IntoIterator for NodeRef {
    type Item = IterNode;
    type IntoIter = NodeRefIter;

    fn into_iter(self) -> Self::IntoIter {
        NodeRefIter::new(self)
    }
}

impl std::fmt::Display for NodeRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        TreeDisplay::format(self, f)
    }
}

impl std::fmt::Debug for NodeRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.node_ref.try_borrow() {
            Ok(node) => f
                .debug_struct("NodeRef")
                .field("index", &node.index())
                .field("children", &node.child_indexes().collect::<Vec<_>>())
                .finish(),
            Err(_) => f.write_str("NodeRef { <borrowed> }"),
        }
    }
}
