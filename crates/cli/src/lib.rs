//! cmd-walk CLI Library
//!
//! This crate provides the `cw` binary: an interactive front end for command
//! trees defined in YAML. It supplies the terminal side of a walk (the fuzzy
//! selector, a colourised console and argument parsing) and hands the
//! traversal itself to `cmd_walk_core`.
//!
//! # Architecture
//!
//! - [`cli_args`]: Command-line argument parsing
//! - [`console`]: Styled output for prompts, warnings and the final invocation
//! - [`selection`]: Full-screen fuzzy selection of sub commands and history values
//!
//! # Examples
//!
//! ```bash
//! # Walk the default tree (~/.cmd-walk/commands.yml)
//! cw
//!
//! # Walk another tree, keeping its history apart
//! cw --tree-path ./ops.yml --app-name ops
//!
//! # Only show the resulting command, without history
//! cw --dry-run --no-history
//! ```

pub mod cli_args;
pub mod console;
pub mod selection;
