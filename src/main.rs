//! Command-line front end.
//!
//! With two edge-list files prints the edit script that turns the first tree
//! into the second. Without arguments starts an interactive editing session.

use std::{
    io,
    path::{Path, PathBuf},
    process::ExitCode,
};

use clap::{Parser, ValueEnum};
use colored::Colorize;
use tracing::debug;

use tree_transformer::{diff, read_edge_file, EditScript, Session, Tree};

const FAREWELL: &str = "Thanks for using Tree Transformer! Hope to see you soon! :)";

#[derive(Parser, Debug)]
#[command(
    name = "tree-transformer",
    version,
    about = "Compute the edits that transform one indexed tree into another"
)]
struct Cli {
    /// Edge-list file describing the given tree, e.g. `[1,2][2,3][1,4]`.
    #[arg(requires = "desired")]
    given: Option<PathBuf>,

    /// Edge-list file describing the desired tree.
    desired: Option<PathBuf>,

    /// Log level for tracing output. `RUST_LOG` takes precedence.
    #[arg(long, value_enum, default_value = "warn")]
    log_level: LogLevel,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    fn to_tracing_level(self) -> tracing::Level {
        match self {
            LogLevel::Trace => tracing::Level::TRACE,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Error => tracing::Level::ERROR,
        }
    }
}

fn init_tracing(level: LogLevel) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.to_tracing_level().to_string()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

/// Read both trees and diff them
fn transform(
    given: &Path,
    desired: &Path,
) -> tree_transformer::Result<(Tree, Tree, EditScript)> {
    let given_tree = read_edge_file(given)?;
    let desired_tree = read_edge_file(desired)?;
    debug!(
        given = given_tree.len(),
        desired = desired_tree.len(),
        "Read trees"
    );

    let script = diff(&given_tree, &desired_tree);
    Ok((given_tree, desired_tree, script))
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.log_level);

    let code = match (&cli.given, &cli.desired) {
        (Some(given), Some(desired)) => match transform(given, desired) {
            Ok((given_tree, desired_tree, script)) => {
                println!("{}\n{}", "Given tree:".green(), given_tree);
                println!("{}\n{}", "Desired tree:".green(), desired_tree);
                println!("{}\n{}", "Transformations:".green(), script);
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("{} {}", "Transformation failed!".red(), e);
                ExitCode::FAILURE
            }
        },
        _ => {
            let session = Session::default();
            match session.run(io::stdin().lock(), io::stdout(), io::stderr()) {
                Ok(tree) => {
                    debug!(nodes = tree.len(), "Interactive session ended");
                    ExitCode::SUCCESS
                }
                Err(e) => {
                    eprintln!("{} {}", "Session failed!".red(), e);
                    ExitCode::FAILURE
                }
            }
        }
    };

    println!("{FAREWELL}");
    code
}
