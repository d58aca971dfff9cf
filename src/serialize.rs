//! Line-oriented `.tt` persistence.
//!
//! The first line holds the root index, every following line lists one parent
//! with its children as `<parent>:<child1>,<child2>,...` in breadth-first order.
//! Leaves get no line of their own and the empty tree is the empty document.

use std::path::Path;

use tracing::debug;

use crate::{parse::parse_index, Result, Tree, TreeError};

/// Extension required for serialized trees
pub const EXTENSION: &str = "tt";

fn check_extension(path: &Path) -> Result<()> {
    if path.extension().is_some_and(|ext| ext == EXTENSION) {
        Ok(())
    } else {
        Err(TreeError::UnsupportedExtension(path.to_path_buf()))
    }
}

impl Tree {
    pub fn to_tt_string(&self) -> String {
        let Some(root) = self.root_index() else {
            return String::new();
        };

        let mut lines = vec![root.to_string()];
        for node in self.breadth_first() {
            let node = node.node();
            if node.is_leaf() {
                continue;
            }

            let children: Vec<String> = node.child_indexes().map(|c| c.to_string()).collect();
            lines.push(format!("{}:{}", node.index(), children.join(",")));
        }

        lines.push(String::new());
        lines.join("\n")
    }

    pub fn from_tt_str(s: &str) -> Result<Tree> {
        let mut tree = Tree::new();

        // Whitespace carries no meaning anywhere in a line
        let mut lines = s
            .lines()
            .map(|line| line.split_whitespace().collect::<String>())
            .filter(|line| !line.is_empty());

        let Some(root) = lines.next() else {
            return Ok(tree);
        };
        tree.insert_root(parse_index(&root)?)?;

        for line in lines {
            let (parent, children) = match line.split_once(':') {
                Some((parent, children)) if !children.is_empty() && !children.contains(':') => {
                    (parent, children)
                }
                _ => {
                    return Err(TreeError::InvalidStructure(format!(
                        "invalid serialized line {line:?}"
                    )))
                }
            };

            let parent = parse_index(parent)?;
            let children = children.strip_suffix(',').unwrap_or(children);
            for child in children.split(',') {
                tree.add_node(parent, parse_index(child)?)?;
            }
        }

        Ok(tree)
    }

    /// Write the tree to a `.tt` file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        check_extension(path)?;

        std::fs::write(path, self.to_tt_string())?;
        debug!(path = %path.display(), nodes = self.len(), "Saved tree");
        Ok(())
    }

    /// Read a tree from a `.tt` file
    pub fn load(path: impl AsRef<Path>) -> Result<Tree> {
        let path = path.as_ref();
        check_extension(path)?;

        let tree = Tree::from_tt_str(&std::fs::read_to_string(path)?)?;
        debug!(path = %path.display(), nodes = tree.len(), "Loaded tree");
        Ok(tree)
    }
}
