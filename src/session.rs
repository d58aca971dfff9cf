//! Line-oriented interactive editing of a single tree.

use std::{
    io::{BufRead, Write},
    path::PathBuf,
    str::FromStr,
};

use colored::Colorize;
use tracing::{debug, debug_span};

use crate::{Edit, Result, Tree, TreeError};

pub const GREETING: &str = "Welcome to the interactive mode of Tree Transformer!";

pub const HELP: &str = "Tree Transformer supports the following commands:
ADD(<int: parent_index>, <int: child_index>), REMOVE(<int: leaf index>), SAVE <filename>.tt, LOAD <filename>.tt, EXIT
Please enter your command:";

/// One line of interactive input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Edit(Edit),
    Save(PathBuf),
    Load(PathBuf),
    Exit,
}

impl FromStr for Command {
    type Err = TreeError;

    /// Keywords are matched in any case. File names keep their case. An edit
    /// keyword whose arguments do not parse is an invalid command as a whole.
    fn from_str(s: &str) -> Result<Self> {
        let line = s.trim();
        let invalid = || TreeError::InvalidCommand(line.to_string());

        let keyword_end = line
            .find(|c: char| c == '(' || c.is_whitespace())
            .unwrap_or(line.len());
        let (keyword, argument) = line.split_at(keyword_end);
        let argument = argument.trim();

        match keyword.to_ascii_lowercase().as_str() {
            "add" | "remove" => line
                .parse::<Edit>()
                .map(Command::Edit)
                .map_err(|_| invalid()),
            "save" if !argument.is_empty() => Ok(Command::Save(PathBuf::from(argument))),
            "load" if !argument.is_empty() => Ok(Command::Load(PathBuf::from(argument))),
            "exit" if argument.is_empty() => Ok(Command::Exit),
            _ => Err(invalid()),
        }
    }
}

impl std::fmt::Display for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Command::Edit(edit) => write!(f, "{edit}"),
            Command::Save(path) => write!(f, "save {}", path.display()),
            Command::Load(path) => write!(f, "load {}", path.display()),
            Command::Exit => f.write_str("exit"),
        }
    }
}

/// Interactive session owning the tree being edited
#[derive(Debug, Default)]
pub struct Session {
    tree: Tree,
}

impl Session {
    pub fn new(tree: Tree) -> Self {
        Self { tree }
    }

    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    pub fn into_tree(self) -> Tree {
        self.tree
    }

    /// Run a single command against the current tree.
    ///
    /// A failed load keeps the current tree. [`Command::Exit`] is a no-op here,
    /// ending the session is up to the caller.
    pub fn execute(&mut self, command: &Command) -> Result<()> {
        debug!("{} {}", "Executing".cyan(), command);

        match command {
            Command::Edit(edit) => edit.apply(&mut self.tree),
            Command::Save(path) => self.tree.save(path),
            Command::Load(path) => {
                self.tree = Tree::load(path)?;
                Ok(())
            }
            Command::Exit => Ok(()),
        }
    }

    /// Read commands from `input` until `exit` or end of input and return the
    /// resulting tree. Trees go to `out`, diagnostics to `err`.
    pub fn run<I, O, E>(mut self, input: I, mut out: O, mut err: E) -> Result<Tree>
    where
        I: BufRead,
        O: Write,
        E: Write,
    {
        let span = debug_span!("session");
        let _enter = span.enter();

        writeln!(out, "{GREETING}")?;
        writeln!(out, "{HELP}")?;

        for line in input.lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }

            match line.parse::<Command>() {
                Ok(Command::Exit) => break,
                Ok(command) => match self.execute(&command) {
                    Ok(()) => write!(out, "{}", self.tree)?,
                    Err(e) => {
                        debug!("{} {}: {}", "Failed".red(), command, e);
                        writeln!(err, "Command execution failed! {e}")?;
                    }
                },
                Err(e) => {
                    debug!(error = %e, "Invalid command");
                    writeln!(err, "Invalid command received!")?;
                }
            }

            writeln!(out, "{HELP}")?;
        }

        debug!(nodes = self.tree.len(), "Session finished");
        Ok(self.tree)
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use tracing_test::traced_test;

    use super::{Command, Session, GREETING, HELP};
    use crate::{
        diff,
        test::{assert_invariants, sample_tree},
        Edit, Tree, TreeError,
    };

    /// Run a session over `script` and return the final tree with both outputs
    fn run(tree: Tree, script: &str) -> (Tree, String, String) {
        let mut out = Vec::new();
        let mut err = Vec::new();

        let tree = Session::new(tree)
            .run(script.as_bytes(), &mut out, &mut err)
            .unwrap();

        (
            tree,
            String::from_utf8(out).unwrap(),
            String::from_utf8(err).unwrap(),
        )
    }

    #[test]
    fn parse_commands() {
        assert_eq!(
            "ADD(1, 2)".parse::<Command>().unwrap(),
            Command::Edit(Edit::Add { parent: 1, child: 2 })
        );
        assert_eq!(
            " remove(3) ".parse::<Command>().unwrap(),
            Command::Edit(Edit::Remove { index: 3 })
        );
        assert_eq!(
            "SAVE Trees/Sample.tt".parse::<Command>().unwrap(),
            Command::Save(PathBuf::from("Trees/Sample.tt"))
        );
        assert_eq!(
            "load  other.tt".parse::<Command>().unwrap(),
            Command::Load(PathBuf::from("other.tt"))
        );
        assert_eq!("Exit".parse::<Command>().unwrap(), Command::Exit);

        for invalid in ["jump(1)", "save", "load   ", "exit now", "addition"] {
            assert!(
                matches!(invalid.parse::<Command>(), Err(TreeError::InvalidCommand(_))),
                "{invalid} should not be a command"
            );
        }
        for malformed_edit in ["add(1)", "add(1, x)", "remove()", "REMOVE(7, 8)"] {
            assert!(
                matches!(
                    malformed_edit.parse::<Command>(),
                    Err(TreeError::InvalidCommand(command)) if command == malformed_edit
                ),
                "{malformed_edit} should be an invalid command"
            );
        }
    }

    #[traced_test]
    #[test]
    fn edit_interactively() {
        let (tree, out, err) = run(Tree::new(), "add(1, 2)\nADD(1, 3)\nremove(2)\nexit\nadd(3, 4)\n");

        let expected: Tree = "[1,3]".parse().unwrap();
        assert_eq!(tree, expected);
        assert!(err.is_empty());

        assert!(out.starts_with(&format!("{GREETING}\n{HELP}\n")));
        assert_eq!(out.matches(HELP).count(), 4);
        assert!(out.contains("└──1\n   └──3\n"));
    }

    #[test]
    fn end_of_input_ends_session() {
        let (tree, _, err) = run(sample_tree(), "remove(8)\n");
        assert!(!tree.contains(8));
        assert!(err.is_empty());
        assert_invariants(&tree);
    }

    #[traced_test]
    #[test]
    fn failures_are_reported_and_skipped() {
        let (tree, out, err) = run(
            sample_tree(),
            "remove(6)\nfly(1)\n\nadd(42, 43)\nadd(1, x)\nremove(7)\nexit\n",
        );

        let mut expected = sample_tree();
        expected.remove_node(7).unwrap();
        assert_eq!(tree, expected);

        let errors: Vec<&str> = err.lines().collect();
        assert_eq!(errors.len(), 4);
        assert!(errors[0].starts_with("Command execution failed! "));
        assert_eq!(errors[1], "Invalid command received!");
        assert!(errors[2].starts_with("Command execution failed! "));
        // Arguments that are not indexes make the whole line invalid
        assert_eq!(errors[3], "Invalid command received!");

        // Blank lines are skipped without printing help
        assert_eq!(out.matches(HELP).count(), 6);
    }

    #[test]
    fn save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let saved = dir.path().join("saved.tt");
        let bad = dir.path().join("saved.txt");

        let script = format!(
            "save {}\nsave {}\nremove(8)\nload {}\nexit\n",
            saved.display(),
            bad.display(),
            saved.display()
        );
        let (tree, _, err) = run(sample_tree(), &script);

        assert_eq!(tree, sample_tree());
        assert_eq!(Tree::load(&saved).unwrap(), sample_tree());
        assert!(!bad.exists());
        assert_eq!(err.lines().count(), 1);
    }

    #[test]
    fn failed_load_keeps_tree() {
        let mut session = Session::new(sample_tree());
        let result = session.execute(&Command::Load(PathBuf::from("does/not/exist.tt")));

        assert!(matches!(result, Err(TreeError::Io(_))));
        assert_eq!(session.tree(), &sample_tree());
        assert_eq!(session.into_tree(), sample_tree());
    }

    #[test]
    fn replay_diff_line_by_line() {
        let given = sample_tree();
        let desired: Tree = "[1,9][9,6][6,5][1,3][3,4][4,2]".parse().unwrap();

        let commands: String = diff(&given, &desired)
            .iter()
            .map(|edit| format!("{edit}\n"))
            .collect();

        let (tree, _, err) = run(given, &commands);
        assert!(err.is_empty(), "{err}");
        assert_eq!(tree, desired);
        assert_invariants(&tree);
    }
}
