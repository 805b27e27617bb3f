use std::env;
use std::io::{self, stdout};
use std::process::ExitCode;

use clap::Parser;
use itertools::Itertools;
use log::{debug, info};

use cmd_walk_cli::cli_args::Args;
use cmd_walk_cli::console::StyledConsole;
use cmd_walk_cli::selection::FuzzySelector;
use cmd_walk_core::command_tree::{CommandNode, CommandTree};
use cmd_walk_core::config::DEFAULT_SHELL;
use cmd_walk_core::error::Result;
use cmd_walk_core::history::FileHistoryStore;
use cmd_walk_core::session::{BufReadLines, Session};
use cmd_walk_core::walker::{run_interactive, CollectedInvocation, WalkOutcome};
use cmd_walk_core::{config, execution, file_handling, interpolation};

/// Opens the flag history unless disabled.
fn open_history(args: &Args) -> Result<Option<FileHistoryStore>> {
    if args.no_history {
        info!("History is disabled.");
        return Ok(None);
    }

    let history = match args.history_dir() {
        Some(history_dir) => FileHistoryStore::with_dir(history_dir)?,
        None => FileHistoryStore::new(&args.app_name)?,
    };
    debug!("History directory: `{}`", history.history_dir().display());

    Ok(Some(history))
}

fn load_tree(args: &Args) -> Result<CommandTree> {
    let tree_path = config::get_tree_path(&args.tree_path);
    debug!("Tree path: `{}`", tree_path);

    file_handling::get_command_tree(&tree_path)
}

fn print_command_and_environment(command_line: &str, node: &CommandNode) {
    println!("Executing command:\n{command_line}");

    if let Some(environment) = node.environment.as_ref() {
        println!("With environment:");
        for (key, value) in environment.iter().sorted() {
            println!("\t\"{key}\": \"{value}\"");
        }
    }
}

/// Runs the `run` template of the resolved leaf through the user's shell.
fn run_invocation(args: &Args, tree: &CommandTree, invocation: &CollectedInvocation) -> Result<()> {
    let Some(run) = interpolation::render_run_command(tree, &invocation.chain)? else {
        info!("`{}` defines nothing to run.", invocation.chain_text);
        return Ok(());
    };

    let leaf = tree.node(invocation.leaf);
    let command_line = run.join(" ");
    print_command_and_environment(&command_line, leaf);

    if args.dry_run {
        println!("Dry run is specified, exiting without executing.");
        return Ok(());
    }

    let shell = env::var("SHELL").unwrap_or_else(|_| DEFAULT_SHELL.to_string());
    let command = execution::shell_command(&shell, &command_line, leaf.working_directory.as_ref());

    execution::execute_command(command, leaf.environment.as_ref())
}

fn execute() -> Result<()> {
    let args = Args::parse();

    let mut tree = load_tree(&args)?;
    let mut history = open_history(&args)?;

    let stdin = io::stdin();
    let mut reader = BufReadLines::new(stdin.lock());
    let mut selector = FuzzySelector::new();
    let mut console = StyledConsole::new(stdout());

    let mut session = Session::new(&mut reader, &mut selector, &mut console);
    if let Some(history) = history.as_mut() {
        session = session.with_history(history);
    }

    match run_interactive(&mut tree, session)? {
        WalkOutcome::Resolved(invocation) => {
            debug!("Resolved `{}`", invocation.command_line());
            run_invocation(&args, &tree, &invocation)
        }
        WalkOutcome::Help(_) => {
            print!("{}", tree.overview(tree.root()));
            Ok(())
        }
        WalkOutcome::Cancelled => Ok(()),
    }
}

fn main() -> ExitCode {
    env_logger::init();

    match execute() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}
