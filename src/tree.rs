use std::collections::VecDeque;

use tracing::trace;

use crate::{
    display::TreeDisplay, index::TreeIndex, iterator::BreadthFirstIter, Node, NodeIndex, NodeRef,
    Result, TreeError,
};

/// A rooted tree of uniquely indexed nodes.
///
/// Every index appears at most once in the whole tree. Nodes are created by
/// attaching a child to an existing node and destroyed by removing a leaf.
/// The first [`add_node`](Tree::add_node) on an empty tree promotes the parent
/// index to root.
#[derive(Default)]
pub struct Tree {
    root: Option<NodeRef>,
    index: TreeIndex,
}

impl Tree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn root(&self) -> Option<NodeRef> {
        self.root.clone()
    }

    pub fn root_ref(&self) -> Option<&NodeRef> {
        self.root.as_ref()
    }

    pub fn root_index(&self) -> Option<NodeIndex> {
        self.root.as_ref().map(NodeRef::index)
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Number of nodes in the tree
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn contains(&self, index: NodeIndex) -> bool {
        self.index.contains(index)
    }

    pub fn is_leaf(&self, index: NodeIndex) -> bool {
        self.index.is_leaf(index)
    }

    /// Indexes of all nodes without children, ascending
    pub fn leaf_indexes(&self) -> Vec<NodeIndex> {
        let mut leaves: Vec<_> = self.index.leaf_indexes().collect();
        leaves.sort_unstable();
        leaves
    }

    /// Create the root of an empty tree
    pub(crate) fn insert_root(&mut self, index: NodeIndex) -> Result<NodeRef> {
        if let Some(root) = &self.root {
            return Err(TreeError::InvalidStructure(format!(
                "tree already has root {}",
                root.index()
            )));
        }

        let root = NodeRef::new(Node::new(index));
        self.index.insert(root.clone());
        self.root = Some(root.clone());
        Ok(root)
    }

    /// Attach a new node `child` under the node `parent`.
    ///
    /// On an empty tree `parent` becomes the root. Fails with
    /// [`TreeError::ParentNotFound`] if the tree is not empty and `parent` is not
    /// in it, or [`TreeError::NodeAlreadyExists`] if `child` is already anywhere
    /// in the tree. A failed call leaves the tree untouched.
    pub fn add_node(&mut self, parent: NodeIndex, child: NodeIndex) -> Result<NodeRef> {
        let implicit_root = !self.index.contains(parent);
        if implicit_root && self.root.is_some() {
            return Err(TreeError::ParentNotFound(parent));
        }
        if self.index.contains(child) || (implicit_root && parent == child) {
            return Err(TreeError::NodeAlreadyExists(child));
        }

        let mut parent_ref = if implicit_root {
            trace!(parent, "Implicit root");
            self.insert_root(parent)?
        } else {
            self.find_existing(parent)?
        };

        let child_ref = NodeRef::new(Node::new(child).with_parent(&parent_ref));
        parent_ref.node_mut().push_child(child_ref.clone());

        self.index.demote(parent);
        self.index.insert(child_ref.clone());

        trace!(parent, child, "Added node");
        Ok(child_ref)
    }

    /// Remove the leaf `index`. Removing the last node empties the tree.
    ///
    /// Fails with [`TreeError::NotALeaf`] both when the node still has children
    /// and when it is not in the tree.
    pub fn remove_node(&mut self, index: NodeIndex) -> Result<()> {
        let mut node = self
            .index
            .remove_leaf(index)
            .ok_or(TreeError::NotALeaf(index))?;

        match node.parent() {
            None => self.root = None,
            Some(mut parent) => {
                let now_leaf = {
                    let mut parent_node = parent.node_mut();
                    parent_node.remove_child(index);
                    parent_node.is_leaf()
                };

                if now_leaf {
                    self.index.promote(parent);
                }
            }
        }

        node.node_mut().detach();

        trace!(index, "Removed node");
        Ok(())
    }

    /// Breadth-first search for the node with `index`
    pub fn get_node(&self, index: NodeIndex) -> Option<NodeRef> {
        // Avoid walking the tree for indexes we know are absent
        if !self.index.contains(index) {
            return None;
        }

        self.breadth_first().find(|node| node.index() == index)
    }

    fn find_existing(&self, index: NodeIndex) -> Result<NodeRef> {
        // Leaves are directly addressable, inner nodes need a walk
        self.index
            .leaf(index)
            .cloned()
            .or_else(|| self.get_node(index))
            .ok_or(TreeError::ParentNotFound(index))
    }

    pub fn breadth_first(&self) -> BreadthFirstIter {
        BreadthFirstIter::new(self.root.clone())
    }

    /// Indexes of the whole tree in post-order, root last
    pub fn post_order(&self) -> Vec<NodeIndex> {
        self.root
            .as_ref()
            .map(|root| root.post_order().map(|node| node.index()).collect())
            .unwrap_or_default()
    }

    /// All `(parent, child)` edges in breadth-first order
    pub fn edges(&self) -> Vec<(NodeIndex, NodeIndex)> {
        self.breadth_first()
            .flat_map(|node| {
                let parent = node.index();
                let edges: Vec<_> = node
                    .node()
                    .child_indexes()
                    .map(|child| (parent, child))
                    .collect();
                edges
            })
            .collect()
    }
}

impl Clone for Tree {
    /// Deep copy of the node graph
    fn clone(&self) -> Self {
        let mut tree = Tree::new();
        let Some(root) = &self.root else {
            return tree;
        };

        let copy = NodeRef::new(Node::new(root.index()));
        tree.root = Some(copy.clone());

        let mut queue = VecDeque::from([(root.clone(), copy)]);
        while let Some((source, mut copy)) = queue.pop_front() {
            for child in source.children() {
                let child_copy = NodeRef::new(Node::new(child.index()).with_parent(&copy));
                copy.node_mut().push_child(child_copy.clone());
                queue.push_back((child, child_copy));
            }
            tree.index.insert(copy);
        }

        tree
    }
}

impl Drop for Tree {
    fn drop(&mut self) {
        self.index.clear();

        // Unlink nodes iteratively so a deep tree does not recurse on drop.
        // Subtrees still referenced from outside are left intact.
        let mut stack: Vec<NodeRef> = self.root.take().into_iter().collect();
        while let Some(mut node) = stack.pop() {
            if node.is_unique() {
                stack.extend(node.node_mut().take_children());
            }
        }
    }
}

impl std::fmt::Display for Tree {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.root {
            Some(root) => TreeDisplay::format(root, f),
            None => Ok(()),
        }
    }
}

impl std::fmt::Debug for Tree {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Tree")
            .field("root", &self.root_index())
            .field("edges", &self.edges())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use tracing_test::traced_test;

    use crate::{
        test::{assert_invariants, sample_tree},
        Tree, TreeError,
    };

    #[traced_test]
    #[test]
    fn remove_node() {
        let mut tree = Tree::new();
        tree.add_node(1, 2).unwrap();

        assert!(matches!(tree.remove_node(1), Err(TreeError::NotALeaf(1))));
        tree.remove_node(2).unwrap();
        assert!(tree.get_node(2).is_none());
        assert!(tree.is_leaf(1));

        tree.remove_node(1).unwrap();
        assert!(tree.get_node(1).is_none());
        assert!(tree.root().is_none());
        assert!(tree.is_empty());
        assert_invariants(&tree);

        tree.add_node(1, 3).unwrap();
        tree.add_node(3, 4).unwrap();
        tree.add_node(3, 5).unwrap();
        assert!(matches!(tree.remove_node(3), Err(TreeError::NotALeaf(3))));
        assert_invariants(&tree);
    }

    #[test]
    fn remove_missing_node_is_not_a_leaf() {
        let mut tree = sample_tree();
        assert!(matches!(tree.remove_node(42), Err(TreeError::NotALeaf(42))));
        assert!(matches!(Tree::new().remove_node(1), Err(TreeError::NotALeaf(1))));
    }

    #[test]
    fn get_node() {
        let mut tree = Tree::new();
        let node = tree.add_node(1, 2).unwrap();

        assert_eq!(Some(node), tree.get_node(2));
        assert!(tree.get_node(3).is_none());
        assert_eq!(tree.get_node(1), tree.root());
    }

    #[test]
    fn add_node_implicit_root() {
        let mut tree = Tree::new();
        let child = tree.add_node(10, 20).unwrap();

        assert_eq!(tree.root_index(), Some(10));
        assert_eq!(child.parent().map(|p| p.index()), Some(10));
        assert_eq!(tree.leaf_indexes(), vec![20]);
        assert_eq!(tree.len(), 2);

        // A second unknown parent cannot become another root
        assert!(matches!(
            tree.add_node(30, 40),
            Err(TreeError::ParentNotFound(30))
        ));
        assert_invariants(&tree);
    }

    #[test]
    fn add_node_duplicate_is_rejected_anywhere() {
        let mut tree = sample_tree();
        let before = tree.clone();

        // 8 lives under 9, not under 6
        assert!(matches!(
            tree.add_node(6, 8),
            Err(TreeError::NodeAlreadyExists(8))
        ));
        assert!(matches!(
            tree.add_node(6, 1),
            Err(TreeError::NodeAlreadyExists(1))
        ));
        assert_eq!(tree, before);
        assert_eq!(tree.len(), before.len());
        assert_invariants(&tree);
    }

    #[test]
    fn self_edge_on_empty_tree_leaves_it_empty() {
        let mut tree = Tree::new();
        assert!(matches!(
            tree.add_node(3, 3),
            Err(TreeError::NodeAlreadyExists(3))
        ));
        assert!(tree.is_empty());
        assert_eq!(tree.len(), 0);
    }

    #[test]
    fn leaves_follow_mutations() {
        let mut tree = sample_tree();
        assert_eq!(tree.leaf_indexes(), vec![2, 5, 7, 8]);

        tree.add_node(7, 11).unwrap();
        assert_eq!(tree.leaf_indexes(), vec![2, 5, 8, 11]);
        assert_invariants(&tree);

        tree.remove_node(5).unwrap();
        tree.remove_node(2).unwrap();
        assert_eq!(tree.leaf_indexes(), vec![6, 8, 11]);
        assert_invariants(&tree);
    }

    #[test]
    fn remove_everything_bottom_up() {
        let mut tree = sample_tree();
        for index in tree.post_order() {
            tree.remove_node(index).unwrap();
            assert_invariants(&tree);
        }
        assert!(tree.is_empty());
        assert_eq!(tree, Tree::new());
    }

    #[test]
    fn edges_breadth_first() {
        let tree = sample_tree();
        assert_eq!(
            tree.edges(),
            vec![(1, 9), (1, 6), (1, 7), (9, 8), (6, 5), (6, 2)]
        );
    }

    #[test]
    fn clone_is_deep() {
        let tree = sample_tree();
        let mut copy = tree.clone();

        assert_eq!(tree, copy);
        assert_ne!(tree.root(), copy.root());
        assert_invariants(&copy);

        copy.remove_node(8).unwrap();
        assert!(tree.contains(8));
        assert_ne!(tree, copy);
    }

    #[test]
    fn handles_outlive_tree() {
        let node = {
            let tree = sample_tree();
            tree.get_node(6).unwrap()
        };

        assert_eq!(node.node().child_indexes().collect::<Vec<_>>(), vec![5, 2]);
        assert!(node.parent().is_none());
    }
}
