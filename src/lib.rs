//! # Tree Transformer
//!
//! Rooted trees of uniquely indexed nodes, and the edit scripts that turn one
//! such tree into another.
//!
//! ## Overview
//!
//! A [`Tree`] is built from an edge list such as `[1,2][2,3][1,4]`, through
//! [`TreeBuilder`], or one node at a time with [`Tree::add_node`]. Nodes are
//! only ever created under an existing parent and only ever destroyed as
//! leaves, and the tree keeps an index of taken indexes and current leaves in
//! step with every mutation.
//!
//! [`diff`] walks a given and a desired tree side by side and produces an
//! [`EditScript`] of `Remove(index)` and `Add(parent, child)` instructions.
//! Replaying that script on the given tree yields a tree equal to the desired
//! one.
//!
//! ```
//! use tree_transformer::{diff, Tree};
//!
//! let given: Tree = "[1,2][2,3]".parse()?;
//! let desired: Tree = "[1,2][1,3]".parse()?;
//!
//! let script = diff(&given, &desired);
//! assert_eq!(script.to_string(), "Remove(3), Add(1, 3)");
//!
//! let mut patched = given.clone();
//! script.apply(&mut patched)?;
//! assert_eq!(patched, desired);
//! # Ok::<(), tree_transformer::TreeError>(())
//! ```

mod builder;
mod compare;
mod diff;
mod display;
mod edit;
mod error;
mod index;
mod iterator;
mod parse;
mod serialize;
mod session;
mod tree;

pub mod node;
pub mod noderef;


pub use builder::{NodeBuilder, TreeBuilder};
pub use diff::{diff, TreeDiff};
pub use edit::{Edit, EditScript};
pub use error::{Result, TreeError};
pub use iterator::{BreadthFirstIter, IterNode, NodeRefIter, PostOrderIter};
pub use parse::{parse_edges, parse_index, read_edge_file};
pub use serialize::EXTENSION;
pub use session::{Command, Session};
pub use tree::Tree;

pub use node::Node;
pub use noderef::NodeRef;

/// Identity of a node, unique within its tree
pub type NodeIndex = i64;
