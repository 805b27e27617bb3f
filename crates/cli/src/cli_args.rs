//! Command-line argument parsing.
//!
//! This module defines the command-line interface of the `cw` binary using
//! the `clap` crate.

use std::path::PathBuf;

use clap::Parser;
use cmd_walk_core::config;

/// Command-line arguments for the cmd-walk CLI tool.
///
/// # Examples
///
/// ```rust
/// use clap::Parser;
/// use cmd_walk_cli::cli_args::Args;
///
/// let args = Args::parse_from(["cw", "--dry-run"]);
/// assert!(args.dry_run);
/// ```
#[derive(Parser, Debug)] // requires `derive` feature
#[command(term_width = 0)] // Just to make testing across clap features easier
pub struct Args {
    /// Path to the command tree definition YAML.
    ///
    /// If not provided, defaults to `~/.cmd-walk/commands.yml`.
    #[arg(long, short = 'c')]
    pub tree_path: Option<String>,

    /// Application name used to namespace the flag history.
    #[arg(long, short = 'a', default_value = config::DEFAULT_APP_NAME)]
    pub app_name: String,

    /// Directory holding the flag history files.
    ///
    /// Overrides `<config dir>/<app name>/history`.
    #[arg(long)]
    pub history_dir: Option<String>,

    /// Neither offer nor record previously entered flag values.
    #[arg(long, short = 'n', action, conflicts_with = "history_dir")]
    pub no_history: bool,

    /// Perform a dry run, which just prints out the command but does not execute it.
    #[arg(long, short = 'd', action)]
    pub dry_run: bool,
}

impl Args {
    /// The explicitly configured history directory, `~` expanded.
    #[must_use]
    pub fn history_dir(&self) -> Option<PathBuf> {
        config::get_history_dir(&self.history_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_args_default_values() {
        let args = Args::parse_from(["cw"]);

        assert!(args.tree_path.is_none());
        assert_eq!(args.app_name, "cmd-walk");
        assert!(args.history_dir.is_none());
        assert!(!args.no_history);
        assert!(!args.dry_run);
    }

    #[test]
    fn test_args_short_flags() {
        let args = Args::parse_from(["cw", "-c", "/custom/tree.yml", "-a", "ops", "-n", "-d"]);

        assert_eq!(args.tree_path, Some("/custom/tree.yml".to_string()));
        assert_eq!(args.app_name, "ops");
        assert!(args.no_history);
        assert!(args.dry_run);
    }

    #[test]
    fn test_args_long_flags() {
        let args = Args::parse_from([
            "cw",
            "--tree-path",
            "/custom/tree.yml",
            "--app-name",
            "ops",
            "--history-dir",
            "/tmp/ops-history",
            "--dry-run",
        ]);

        assert_eq!(args.tree_path, Some("/custom/tree.yml".to_string()));
        assert_eq!(args.app_name, "ops");
        assert_eq!(args.history_dir(), Some(PathBuf::from("/tmp/ops-history")));
        assert!(!args.no_history);
        assert!(args.dry_run);
    }

    #[test]
    fn test_no_history_conflicts_with_history_dir() {
        let result = Args::try_parse_from(["cw", "--no-history", "--history-dir", "/tmp/h"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_history_dir_expands_tilde() {
        let args = Args::parse_from(["cw", "--history-dir", "~/walk"]);
        let dir = args.history_dir().unwrap();
        assert!(!dir.starts_with("~"));
        assert!(dir.ends_with("walk"));
    }
}
