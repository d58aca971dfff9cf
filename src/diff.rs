use std::collections::{HashMap, VecDeque};

use colored::Colorize;
use tracing::{debug, debug_span, trace};

use crate::{Edit, EditScript, NodeIndex, NodeRef, Tree};

/// Computes the [`EditScript`] that turns a given tree into a desired tree.
///
/// Replaying the script on the given tree through [`Tree::add_node`] and
/// [`Tree::remove_node`] yields a tree structurally equal to the desired one.
/// All removals come first, each subtree bottom-up, followed by all additions,
/// each subtree top-down. The script is correct but not necessarily minimal:
/// a subtree moved to another parent is removed and created again.
///
/// The one exception to removals-first ordering is a desired tree that is a
/// lone root and has to be created from nothing. No `Add` can imply a root
/// without a child, so the script ends with `Add(root, root + 1)` followed by
/// `Remove(root + 1)`.
pub struct TreeDiff<'a> {
    given: &'a Tree,
    desired: &'a Tree,
}

impl<'a> TreeDiff<'a> {
    pub fn new(given: &'a Tree, desired: &'a Tree) -> Self {
        Self { given, desired }
    }

    pub fn diff(&self) -> EditScript {
        debug_span!("diff").in_scope(|| {
            let mut removals = Vec::new();
            let mut additions = Vec::new();

            match (self.given.root_ref(), self.desired.root_ref()) {
                (None, None) => {
                    debug!("Both trees are empty");
                }
                (None, Some(desired)) => {
                    debug!("Given tree is empty, creating desired tree");
                    Self::create_tree(desired, &mut additions);
                }
                (Some(given), None) => {
                    debug!("Desired tree is empty, removing given tree");
                    Self::remove_subtree(given, &mut removals);
                }
                (Some(given), Some(desired)) if given.index() != desired.index() => {
                    // Nothing below a replaced root can be aligned, rebuild from scratch
                    debug!(
                        "{} given: {} desired: {}",
                        "Root mismatch".yellow(),
                        given.index(),
                        desired.index()
                    );
                    Self::remove_subtree(given, &mut removals);
                    Self::create_tree(desired, &mut additions);
                }
                (Some(given), Some(desired)) => {
                    Self::align(given, desired, &mut removals, &mut additions)
                }
            }

            debug!(
                removals = removals.len(),
                additions = additions.len(),
                "Finished diff"
            );

            removals
                .into_iter()
                .chain(additions)
                .collect::<EditScript>()
        })
    }

    /// Walk pairs of nodes sharing an index, starting at the matching roots
    fn align(
        given: &NodeRef,
        desired: &NodeRef,
        removals: &mut Vec<Edit>,
        additions: &mut Vec<Edit>,
    ) {
        let mut queue = VecDeque::from([(desired.clone(), given.clone())]);

        while let Some((desired_node, given_node)) = queue.pop_front() {
            let desired_children = desired_node.children();
            let mut unmatched: HashMap<NodeIndex, &NodeRef> = desired_children
                .iter()
                .map(|child| (child.index(), child))
                .collect();

            for child in given_node.children() {
                match unmatched.remove(&child.index()) {
                    Some(counterpart) => queue.push_back((counterpart.clone(), child)),
                    None => {
                        debug!("{} {}", "Obsolete subtree".red(), child.index());
                        Self::remove_subtree(&child, removals);
                    }
                }
            }

            // Children left over only exist in the desired tree. Their additions are
            // buffered so every parent they reference exists once they are replayed.
            for child in desired_children
                .iter()
                .filter(|child| unmatched.contains_key(&child.index()))
            {
                debug!("{} {}", "Missing subtree".green(), child.index());
                Self::create_subtree(child, Some(desired_node.index()), additions);
            }
        }
    }

    /// Removal of every node below and including `root`, bottom-up
    fn remove_subtree(root: &NodeRef, edits: &mut Vec<Edit>) {
        edits.extend(root.post_order().map(|node| {
            trace!(index = node.index(), "Remove");
            Edit::Remove {
                index: node.index(),
            }
        }));
    }

    /// Creation of `root` under `parent` and of everything below it, top-down.
    /// Without a parent the root itself is expected to be implied by its first child.
    fn create_subtree(root: &NodeRef, parent: Option<NodeIndex>, edits: &mut Vec<Edit>) {
        if let Some(parent) = parent {
            edits.push(Edit::Add {
                parent,
                child: root.index(),
            });
        }

        for node in root.breadth_first() {
            let parent = node.index();
            edits.extend(node.node().child_indexes().map(|child| {
                trace!(parent, child, "Add");
                Edit::Add { parent, child }
            }));
        }
    }

    /// Creation of a whole tree on an empty one
    fn create_tree(root: &NodeRef, edits: &mut Vec<Edit>) {
        if root.is_leaf() {
            // A lone root has no edge to imply it. Seed it through a temporary child.
            let placeholder = root.index().wrapping_add(1);
            edits.push(Edit::Add {
                parent: root.index(),
                child: placeholder,
            });
            edits.push(Edit::Remove { index: placeholder });
            return;
        }

        Self::create_subtree(root, None, edits);
    }
}

/// Compute the [`EditScript`] transforming `given` into `desired`
pub fn diff(given: &Tree, desired: &Tree) -> EditScript {
    TreeDiff::new(given, desired).diff()
}
