use std::fmt::Write;

use crate::NodeRef;

pub struct TreeDisplay;

impl TreeDisplay {
    /// Render the subtree below `node`, one index per line:
    ///
    /// ```text
    /// └──1
    ///    ├──9
    ///    │  └──8
    ///    └──7
    /// ```
    pub fn format(node: &NodeRef, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // For each ancestor depth, whether that ancestor was the last of its siblings
        let mut lasts: Vec<bool> = Vec::new();

        for node in node.clone() {
            lasts.truncate(node.depth());

            for last in &lasts {
                if *last {
                    f.write_str("   ")?;
                } else {
                    f.write_str("│  ")?;
                }
            }

            if node.is_last() {
                f.write_str("└──")?;
            } else {
                f.write_str("├──")?;
            }

            write!(f, "{}", node.index())?;
            f.write_char('\n')?;

            lasts.push(node.is_last());
        }

        Ok(())
    }
}
