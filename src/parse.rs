//! Textual edge-list syntax: `[<parent>,<child>]` groups such as `[1,2][2,3][1,4]`.

use std::{path::Path, str::FromStr};

use tracing::debug;

use crate::{NodeIndex, Result, Tree, TreeError};

/// Parse a single node index, ignoring surrounding whitespace
pub fn parse_index(token: &str) -> Result<NodeIndex> {
    token
        .trim()
        .parse()
        .map_err(|_| TreeError::InvalidIndex(token.trim().to_string()))
}

/// Split `s` into the contents of its bracketed groups.
///
/// Brackets must alternate open/close without nesting. Whitespace between
/// groups is ignored, anything else outside a group is rejected.
fn bracket_groups(s: &str) -> Result<Vec<&str>> {
    let malformed = |reason: &str| {
        TreeError::InvalidStructure(format!("{reason} in edge list {s:?}"))
    };

    let mut groups = Vec::new();
    let mut open: Option<usize> = None;

    for (position, c) in s.char_indices() {
        match c {
            '[' if open.is_some() => return Err(malformed("nested '['")),
            '[' => open = Some(position),
            ']' => match open.take() {
                Some(start) => groups.push(&s[start + 1..position]),
                None => return Err(malformed("unmatched ']'")),
            },
            c if open.is_none() && !c.is_whitespace() => {
                return Err(malformed("unexpected character outside brackets"))
            }
            _ => {}
        }
    }

    if open.is_some() {
        return Err(malformed("unterminated '['"));
    }

    Ok(groups)
}

fn parse_edge(group: &str) -> Result<(NodeIndex, NodeIndex)> {
    let mut tokens = group.split(',');

    match (tokens.next(), tokens.next(), tokens.next()) {
        (Some(parent), Some(child), None) => Ok((parse_index(parent)?, parse_index(child)?)),
        _ => Err(TreeError::InvalidStructure(format!(
            "edge [{group}] is invalid"
        ))),
    }
}

/// Parse an edge list into `(parent, child)` pairs without validating the tree shape
pub fn parse_edges(s: &str) -> Result<Vec<(NodeIndex, NodeIndex)>> {
    bracket_groups(s)?.into_iter().map(parse_edge).collect()
}

impl FromStr for Tree {
    type Err = TreeError;

    /// Parse an edge list. An empty string is the empty tree.
    fn from_str(s: &str) -> Result<Self> {
        if s.trim().is_empty() {
            return Ok(Tree::new());
        }

        let edges = parse_edges(s)?;
        debug!(edges = edges.len(), "Parsed edge list");
        Tree::from_edges(edges)
    }
}

/// Read an edge list from a file. Lines are joined before parsing.
pub fn read_edge_file(path: impl AsRef<Path>) -> Result<Tree> {
    let contents = std::fs::read_to_string(path.as_ref())?;
    let joined: String = contents.lines().collect();
    joined.parse()
}
