//! Builders for constructing trees.
//!
//! [`TreeBuilder`] builds a tree programmatically through nested closures, while
//! [`Tree::from_edges`] builds one from an unordered collection of
//! `(parent, child)` pairs, validating that they describe a single rooted tree.

use std::collections::{HashMap, HashSet, VecDeque};

use tracing::{debug, debug_span};

use crate::{NodeIndex, Result, Tree, TreeError};

/// A builder for adding children below one node.
///
/// Handed to the closures passed to [`TreeBuilder::root`] and [`NodeBuilder::child`].
pub struct NodeBuilder<'a> {
    tree: &'a mut Tree,
    index: NodeIndex,
}

impl<'a> NodeBuilder<'a> {
    /// Adds a child to the current node.
    ///
    /// # Arguments
    ///
    /// * `index`: The index of the new child.
    /// * `f`: A closure that takes the child builder and adds its own children.
    pub fn child<F>(&mut self, index: NodeIndex, f: F) -> Result<()>
    where
        F: FnOnce(&mut NodeBuilder<'_>) -> Result<()>,
    {
        self.tree.add_node(self.index, index)?;

        let mut node_builder = NodeBuilder {
            tree: &mut *self.tree,
            index,
        };

        // Call the supplied closure with the NodeBuilder to add this node's children
        f(&mut node_builder)
    }

    pub fn index(&self) -> NodeIndex {
        self.index
    }
}

/// A builder for constructing trees.
///
/// The `root` method adds the root node and calls the provided closure with a
/// [`NodeBuilder`] that recursively adds children. Closures return
/// `Result<(), TreeError>` so duplicate indexes propagate out of the builder.
///
/// # Examples
///
/// ```
/// use tree_transformer::TreeBuilder;
///
/// let tree = TreeBuilder::new()
///     .root(1, |root| {
///         root.child(2, |two| two.child(3, |_| Ok(())))?;
///         root.child(4, |_| Ok(()))
///     })?
///     .done();
///
/// assert_eq!(tree.edges(), vec![(1, 2), (1, 4), (2, 3)]);
/// # Ok::<(), tree_transformer::TreeError>(())
/// ```
#[derive(Debug)]
pub struct TreeBuilder {
    tree: Tree,
    debug_span: tracing::Span,
}

impl Default for TreeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TreeBuilder {
    /// Creates a new `TreeBuilder` instance.
    pub fn new() -> Self {
        let debug_span = debug_span!("TreeBuilder");
        debug_span.in_scope(|| debug!("Created new TreeBuilder"));

        Self {
            tree: Tree::new(),
            debug_span,
        }
    }

    /// Adds a root node to the tree and returns the updated builder.
    ///
    /// Fails if the builder already has a root.
    pub fn root<F>(mut self, index: NodeIndex, f: F) -> Result<Self>
    where
        F: FnOnce(&mut NodeBuilder<'_>) -> Result<()>,
    {
        self.debug_span.in_scope(|| {
            self.tree.insert_root(index)?;
            debug!(index, "Added root");

            let mut node_builder = NodeBuilder {
                tree: &mut self.tree,
                index,
            };
            f(&mut node_builder)
        })?;

        Ok(self)
    }

    /// Returns the constructed tree when finished building it.
    pub fn done(self) -> Tree {
        self.debug_span.in_scope(|| debug!("Finished building tree"));
        self.tree
    }
}

/// Adjacency description of a tree, validated but not yet instantiated
#[derive(Debug)]
pub(crate) struct TreeDefinition {
    root: NodeIndex,
    // Children of each parent, in the order the edges were given
    adjacency: HashMap<NodeIndex, Vec<NodeIndex>>,
    nodes: HashSet<NodeIndex>,
}

impl TreeDefinition {
    /// Validate an edge collection. Returns `None` if there are no edges.
    pub fn from_edges<I>(edges: I) -> Result<Option<Self>>
    where
        I: IntoIterator<Item = (NodeIndex, NodeIndex)>,
    {
        let mut adjacency: HashMap<NodeIndex, Vec<NodeIndex>> = HashMap::new();
        let mut children: HashSet<NodeIndex> = HashSet::new();
        let mut root_candidates: HashSet<NodeIndex> = HashSet::new();
        let mut nodes: HashSet<NodeIndex> = HashSet::new();

        for (parent, child) in edges {
            let reverse = adjacency
                .get(&child)
                .is_some_and(|grandchildren| grandchildren.contains(&parent));
            if parent == child || reverse {
                return Err(TreeError::InvalidStructure(format!(
                    "edge [{parent},{child}] introduces a cycle"
                )));
            }

            let siblings = adjacency.entry(parent).or_default();
            if !siblings.contains(&child) {
                siblings.push(child);
            }

            // A node that is a child of any other node cannot be the root
            if !children.contains(&parent) {
                root_candidates.insert(parent);
            }
            root_candidates.remove(&child);
            children.insert(child);

            nodes.insert(parent);
            nodes.insert(child);
        }

        if nodes.is_empty() {
            return Ok(None);
        }

        let mut candidates: Vec<_> = root_candidates.into_iter().collect();
        candidates.sort_unstable();

        match candidates.as_slice() {
            [] => Err(TreeError::InvalidStructure(
                "no root can be selected".to_string(),
            )),
            [root] => Ok(Some(Self {
                root: *root,
                adjacency,
                nodes,
            })),
            _ => Err(TreeError::InvalidStructure(format!(
                "tree is not connected, multiple roots exist: {candidates:?}"
            ))),
        }
    }

    /// Instantiate the tree top-down from the root
    pub fn build(self) -> Result<Tree> {
        debug_span!("TreeDefinition", root = self.root).in_scope(|| {
            let mut tree = Tree::new();
            tree.insert_root(self.root)?;

            let mut queue = VecDeque::from([self.root]);
            while let Some(current) = queue.pop_front() {
                let Some(children) = self.adjacency.get(&current) else {
                    // Leaf
                    continue;
                };

                for &child in children {
                    tree.add_node(current, child)?;
                    queue.push_back(child);
                }
            }

            if tree.len() != self.nodes.len() {
                return Err(TreeError::InvalidStructure(format!(
                    "{} nodes are not reachable from root {}",
                    self.nodes.len() - tree.len(),
                    self.root
                )));
            }

            debug!(nodes = tree.len(), "Built tree");
            Ok(tree)
        })
    }
}

impl Tree {
    /// Build a tree from `(parent, child)` edges given in any order.
    ///
    /// The edges must describe exactly one tree: a single node that is never a
    /// child, no cycles and no node under two parents. Repeating an identical
    /// edge is harmless. No edges at all give the empty tree.
    pub fn from_edges<I>(edges: I) -> Result<Tree>
    where
        I: IntoIterator<Item = (NodeIndex, NodeIndex)>,
    {
        match TreeDefinition::from_edges(edges)? {
            Some(definition) => definition.build(),
            None => Ok(Tree::new()),
        }
    }
}
