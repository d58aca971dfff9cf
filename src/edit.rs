use std::str::FromStr;

use colored::Colorize;
use tracing::{debug, debug_span};

use crate::{parse::parse_index, NodeIndex, Result, Tree, TreeError};

/// Single structural edit on a [`Tree`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Edit {
    /// Attach a new node `child` under the existing node `parent`
    Add { parent: NodeIndex, child: NodeIndex },
    /// Remove the leaf `index`
    Remove { index: NodeIndex },
}

impl Edit {
    pub fn apply(&self, tree: &mut Tree) -> Result<()> {
        match *self {
            Edit::Add { parent, child } => tree.add_node(parent, child).map(|_| ()),
            Edit::Remove { index } => tree.remove_node(index),
        }
    }
}

impl std::fmt::Display for Edit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Edit::Add { parent, child } => write!(f, "Add({parent}, {child})"),
            Edit::Remove { index } => write!(f, "Remove({index})"),
        }
    }
}

impl FromStr for Edit {
    type Err = TreeError;

    /// Parse `Add(<parent>, <child>)` or `Remove(<index>)`, keywords in any case
    fn from_str(s: &str) -> Result<Self> {
        let invalid = || TreeError::InvalidEdit(s.trim().to_string());

        let (keyword, rest) = s.trim().split_once('(').ok_or_else(invalid)?;
        let arguments = rest.strip_suffix(')').ok_or_else(invalid)?;
        let arguments: Vec<&str> = arguments.split(',').collect();

        match (keyword.trim().to_ascii_lowercase().as_str(), arguments.as_slice()) {
            ("add", [parent, child]) => Ok(Edit::Add {
                parent: parse_index(parent)?,
                child: parse_index(child)?,
            }),
            ("remove", [index]) => Ok(Edit::Remove {
                index: parse_index(index)?,
            }),
            _ => Err(invalid()),
        }
    }
}

/// Ordered sequence of [`Edit`]s that transforms one tree into another
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditScript {
    edits: Vec<Edit>,
}

impl EditScript {
    pub fn new(edits: Vec<Edit>) -> Self {
        Self { edits }
    }

    pub fn len(&self) -> usize {
        self.edits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edits.is_empty()
    }

    pub fn edits(&self) -> &[Edit] {
        &self.edits
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Edit> {
        self.edits.iter()
    }

    /// Replay the script on `tree`, stopping at the first failing edit
    pub fn apply(&self, tree: &mut Tree) -> Result<()> {
        debug_span!("patch").in_scope(|| {
            for edit in &self.edits {
                debug!("{} {}", "Patching".bright_purple(), edit);
                edit.apply(tree)?;
            }
            Ok(())
        })
    }
}

impl From<Vec<Edit>> for EditScript {
    fn from(edits: Vec<Edit>) -> Self {
        Self::new(edits)
    }
}

impl FromIterator<Edit> for EditScript {
    fn from_iter<T: IntoIterator<Item = Edit>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl IntoIterator for EditScript {
    type Item = Edit;
    type IntoIter = std::vec::IntoIter<Edit>;

    fn into_iter(self) -> Self::IntoIter {
        self.edits.into_iter()
    }
}

impl<'a> IntoIterator for &'a EditScript {
    type Item = &'a Edit;
    type IntoIter = std::slice::Iter<'a, Edit>;

    fn into_iter(self) -> Self::IntoIter {
        self.edits.iter()
    }
}

impl std::fmt::Display for EditScript {
    /// Instructions separated by `", "`, without a trailing separator
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (position, edit) in self.edits.iter().enumerate() {
            if position > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{edit}")?;
        }
        Ok(())
    }
}

impl FromStr for EditScript {
    type Err = TreeError;

    /// Parse a rendered script. Separators between instructions may be commas,
    /// whitespace or newlines.
    fn from_str(s: &str) -> Result<Self> {
        let mut edits: Vec<Edit> = Vec::new();
        let mut rest = s;

        loop {
            rest = rest.trim_start_matches(|c: char| c == ',' || c.is_whitespace());
            if rest.is_empty() {
                break;
            }

            let end = rest
                .find(')')
                .ok_or_else(|| TreeError::InvalidEdit(rest.trim().to_string()))?;
            edits.push(rest[..=end].parse::<Edit>()?);
            rest = &rest[end + 1..];
        }

        Ok(Self::new(edits))
    }
}

#[cfg(test)]
mod tests {
    use tracing_test::traced_test;

    use super::{Edit, EditScript};
    use crate::{
        test::{assert_invariants, sample_tree},
        Tree, TreeError,
    };

    #[test]
    fn render() {
        let script = EditScript::new(vec![
            Edit::Remove { index: 2 },
            Edit::Add { parent: 6, child: 3 },
        ]);
        assert_eq!(script.to_string(), "Remove(2), Add(6, 3)");
        assert_eq!(EditScript::default().to_string(), "");
        assert_eq!(Edit::Add { parent: -1, child: 4 }.to_string(), "Add(-1, 4)");
    }

    #[test]
    fn conversions() {
        let edits = vec![Edit::Remove { index: 8 }, Edit::Add { parent: 1, child: 3 }];

        let from_vec = EditScript::from(edits.clone());
        let collected: EditScript = edits.iter().copied().collect();
        assert_eq!(from_vec, collected);
        assert_eq!(from_vec.edits(), edits.as_slice());

        let owned: Vec<Edit> = collected.into_iter().collect();
        assert_eq!(owned, edits);
    }

    #[test]
    fn parse_edit() {
        assert_eq!(
            "Add(1, 2)".parse::<Edit>().unwrap(),
            Edit::Add { parent: 1, child: 2 }
        );
        assert_eq!(
            "  remove( 7 ) ".parse::<Edit>().unwrap(),
            Edit::Remove { index: 7 }
        );
        assert_eq!(
            "ADD(3,4)".parse::<Edit>().unwrap(),
            Edit::Add { parent: 3, child: 4 }
        );

        assert!(matches!("Add(1)".parse::<Edit>(), Err(TreeError::InvalidEdit(_))));
        assert!(matches!("Move(1, 2)".parse::<Edit>(), Err(TreeError::InvalidEdit(_))));
        assert!(matches!("Remove(1".parse::<Edit>(), Err(TreeError::InvalidEdit(_))));
        assert!(matches!("Remove(x)".parse::<Edit>(), Err(TreeError::InvalidIndex(_))));
    }

    #[test]
    fn parse_script() {
        let script: EditScript = "Remove(8), Remove(9), Add(1, 3), Add(3, 4)".parse().unwrap();
        assert_eq!(
            script.edits(),
            &[
                Edit::Remove { index: 8 },
                Edit::Remove { index: 9 },
                Edit::Add { parent: 1, child: 3 },
                Edit::Add { parent: 3, child: 4 },
            ]
        );
        assert_eq!(script.to_string().parse::<EditScript>().unwrap(), script);

        let by_line: EditScript = "Remove(8)\nRemove(9)\n".parse().unwrap();
        assert_eq!(by_line.len(), 2);

        assert!("".parse::<EditScript>().unwrap().is_empty());
        assert!(matches!(
            "Remove(8), Add(1".parse::<EditScript>(),
            Err(TreeError::InvalidEdit(_))
        ));
    }

    #[traced_test]
    #[test]
    fn apply_script() {
        let mut tree = sample_tree();
        let script: EditScript = "Remove(2), Add(6, 3), Add(3, 4)".parse().unwrap();

        script.apply(&mut tree).unwrap();

        let expected: Tree = "[1,9][9,8][1,6][6,5][6,3][3,4][1,7]".parse().unwrap();
        assert_eq!(tree, expected);
        assert_invariants(&tree);
    }

    #[test]
    fn apply_stops_at_first_failure() {
        let mut tree = sample_tree();
        let script: EditScript = "Remove(8), Remove(6), Remove(9)".parse().unwrap();

        assert!(matches!(
            script.apply(&mut tree),
            Err(TreeError::NotALeaf(6))
        ));
        // The first edit went through, the last never ran
        assert!(!tree.contains(8));
        assert!(tree.contains(9));
    }
}
