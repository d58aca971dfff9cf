use std::collections::{HashMap, VecDeque};

use crate::{NodeIndex, NodeRef, Tree};

/// Structural tree comparison.
///
/// Two trees are equal when their roots carry the same index and every pair of
/// corresponding nodes has the same set of child indexes. Child order and node
/// identity are ignored.
impl PartialEq for Tree {
    fn eq(&self, other: &Self) -> bool {
        let (ours, theirs) = match (self.root_ref(), other.root_ref()) {
            (None, None) => return true,
            (Some(ours), Some(theirs)) => (ours, theirs),
            _ => return false,
        };

        if ours.index() != theirs.index() || self.len() != other.len() {
            return false;
        }

        // Walk both trees in lockstep over pairs of nodes with the same index
        let mut queue = VecDeque::from([(ours.clone(), theirs.clone())]);

        while let Some((ours, theirs)) = queue.pop_front() {
            let mut unmatched: HashMap<NodeIndex, NodeRef> = theirs
                .children()
                .into_iter()
                .map(|child| (child.index(), child))
                .collect();

            for child in ours.children() {
                match unmatched.remove(&child.index()) {
                    Some(counterpart) => queue.push_back((child, counterpart)),
                    None => return false,
                }
            }

            if !unmatched.is_empty() {
                return false;
            }
        }

        true
    }
}

impl Eq for Tree {}
