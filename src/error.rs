//! Error types for tree construction, mutation and persistence.

use std::path::PathBuf;

use thiserror::Error;

use crate::NodeIndex;

/// Result type alias for tree operations.
pub type Result<T> = std::result::Result<T, TreeError>;

/// Errors raised by [`Tree`](crate::Tree) and the layers built on top of it.
#[derive(Error, Debug)]
pub enum TreeError {
    /// `add_node` referenced a parent that is not in a non-empty tree.
    #[error("cannot add node to {0}: it is not present in the tree")]
    ParentNotFound(NodeIndex),

    /// The index is already taken somewhere in the tree.
    #[error("cannot add node {0}: it is already present in the tree")]
    NodeAlreadyExists(NodeIndex),

    /// The node has children, or does not exist at all.
    #[error("cannot remove node {0}: it is not a leaf")]
    NotALeaf(NodeIndex),

    /// Malformed edge syntax, zero or several roots, or a cycle.
    #[error("incorrect tree structure: {0}")]
    InvalidStructure(String),

    /// A token expected to be a node index is not an integer.
    #[error("invalid node index: {0:?}")]
    InvalidIndex(String),

    /// An edit instruction could not be parsed.
    #[error("invalid edit instruction: {0:?}")]
    InvalidEdit(String),

    /// An interactive command could not be parsed.
    #[error("invalid command: {0:?}")]
    InvalidCommand(String),

    /// Serialized trees must live in `.tt` files.
    #[error("unsupported file {0:?}: only .tt files are supported")]
    UnsupportedExtension(PathBuf),

    /// I/O error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
