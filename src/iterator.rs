use std::{collections::VecDeque, ops::Deref};

use crate::NodeRef;

/// Node yielded by [`NodeRefIter`], carrying its position relative to the start node
pub struct IterNode {
    depth: usize,
    last: bool,
    node: NodeRef,
}

impl IterNode {
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// True if this node is the last child of its parent. The start node is always last.
    pub fn is_last(&self) -> bool {
        self.last
    }
}

impl Deref for IterNode {
    type Target = NodeRef;

    fn deref(&self) -> &Self::Target {
        &self.node
    }
}

/// Depth-first pre-order iterator
pub struct NodeRefIter {
    stack: VecDeque<IterNode>,
}

impl NodeRefIter {
    pub fn new(node: NodeRef) -> Self {
        Self {
            stack: VecDeque::from([IterNode {
                depth: 0,
                last: true,
                node,
            }]),
        }
    }
}

impl Iterator for NodeRefIter {
    type Item = IterNode;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.stack.pop_front()?;

        {
            let node = current.node.node();
            let count = node.num_children();

            // Push in reverse so the first child is popped next
            node.children()
                .iter()
                .enumerate()
                .rev()
                .for_each(|(position, child)| {
                    self.stack.push_front(IterNode {
                        depth: current.depth + 1,
                        last: position + 1 == count,
                        node: child.clone(),
                    })
                });
        }

        Some(current)
    }
}

/// Breadth-first iterator, level by level, children in insertion order
pub struct BreadthFirstIter {
    queue: VecDeque<NodeRef>,
}

impl BreadthFirstIter {
    pub(crate) fn new(start: Option<NodeRef>) -> Self {
        Self {
            queue: start.into_iter().collect(),
        }
    }
}

impl Iterator for BreadthFirstIter {
    type Item = NodeRef;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.queue.pop_front()?;
        self.queue.extend(current.node().children().iter().cloned());
        Some(current)
    }
}

/// Post-order iterator using an explicit stack, so tree height is not bounded by
/// the call stack.
pub struct PostOrderIter {
    // Each entry records whether its children have already been pushed
    stack: Vec<(NodeRef, bool)>,
}

impl PostOrderIter {
    pub fn new(node: NodeRef) -> Self {
        Self {
            stack: vec![(node, false)],
        }
    }
}

impl Iterator for PostOrderIter {
    type Item = NodeRef;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let (node, expanded) = self.stack.pop()?;
            if expanded {
                return Some(node);
            }

            let children = node.children();
            self.stack.push((node, true));
            self.stack
                .extend(children.into_iter().rev().map(|child| (child, false)));
        }
    }
}
