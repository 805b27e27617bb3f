//! Configuration path utilities for cmd-walk.
//!
//! This module provides functions for resolving configuration file paths
//! and expanding shell variables like `~` in paths.

use std::path::PathBuf;

/// Default path for the command tree definition file
const DEFAULT_TREE_PATH: &str = "~/.cmd-walk/commands.yml";

/// Default namespace for the flag history below the user config directory
pub const DEFAULT_APP_NAME: &str = "cmd-walk";

/// Default shell to use for command execution
pub const DEFAULT_SHELL: &str = "/bin/bash";

/// Resolves the command tree definition path.
///
/// If a custom path is provided, uses that path. Otherwise, uses the default
/// tree path. Shell expansions like `~` are resolved.
///
/// # Examples
///
/// ```
/// use cmd_walk_core::config::get_tree_path;
///
/// // Use default path
/// let default_path = get_tree_path(&None);
///
/// // Use custom path
/// let custom_path = get_tree_path(&Some("/path/to/commands.yml".to_string()));
/// ```
pub fn get_tree_path(tree_path_arg: &Option<String>) -> String {
    let tree_path = match tree_path_arg {
        Some(tree_path) => tree_path,
        None => DEFAULT_TREE_PATH,
    };

    shellexpand::tilde(tree_path).to_string()
}

/// Resolves an explicitly configured history directory, if any.
///
/// Without one, the history lives below the user config directory and is
/// namespaced by the application name.
pub fn get_history_dir(history_dir_arg: &Option<String>) -> Option<PathBuf> {
    history_dir_arg
        .as_ref()
        .map(|dir| PathBuf::from(shellexpand::tilde(dir).to_string()))
}

/// Expands shell variables in a working directory path.
///
/// Returns None if no working directory is provided.
///
/// # Examples
///
/// ```
/// use cmd_walk_core::config::expand_working_directory;
///
/// let expanded = expand_working_directory(&Some("~/projects".to_string()));
/// assert!(expanded.is_some());
///
/// let none_result = expand_working_directory(&None);
/// assert!(none_result.is_none());
/// ```
pub fn expand_working_directory(working_directory: &Option<String>) -> Option<String> {
    working_directory
        .as_ref()
        .map(|working_directory| shellexpand::tilde(working_directory).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_tree_path_with_custom_path() {
        let custom_path = Some("/custom/path/commands.yml".to_string());
        let result = get_tree_path(&custom_path);
        assert_eq!(result, "/custom/path/commands.yml");
    }

    #[test]
    fn test_get_tree_path_with_none() {
        let result = get_tree_path(&None);
        // Should expand the tilde in the default path
        assert!(result.ends_with(".cmd-walk/commands.yml"));
        assert!(!result.starts_with('~'));
    }

    #[test]
    fn test_get_history_dir() {
        assert!(get_history_dir(&None).is_none());

        let expanded = get_history_dir(&Some("~/walk-history".to_string())).unwrap();
        assert!(!expanded.starts_with("~"));
        assert!(expanded.ends_with("walk-history"));

        let absolute = get_history_dir(&Some("/var/tmp/hist".to_string())).unwrap();
        assert_eq!(absolute, PathBuf::from("/var/tmp/hist"));
    }

    #[test]
    fn test_expand_working_directory_with_some() {
        let working_dir = Some("~/projects/cmd-walk".to_string());
        let expanded = expand_working_directory(&working_dir).unwrap();

        assert!(!expanded.starts_with('~'));
        assert!(expanded.ends_with("projects/cmd-walk"));
    }

    #[test]
    fn test_expand_working_directory_with_none() {
        assert!(expand_working_directory(&None).is_none());
    }

    #[test]
    fn test_default_constants() {
        assert_eq!(DEFAULT_SHELL, "/bin/bash");
        assert_eq!(DEFAULT_APP_NAME, "cmd-walk");
    }
}
