//! cmd-walk Core Library
//!
//! This crate provides an interactive mode for hierarchical command-line tools:
//! instead of typing a full command line, the user fuzzy-selects a path through
//! the command tree and is then prompted, flag by flag, for values. Previously
//! accepted values can be recalled from a per-flag history.
//!
//! # Key Features
//!
//! - **Command Tree**: Arena-backed tree of commands with typed flags
//! - **Command Walker**: Selection loop down to a leaf, flag collection and confirmation
//! - **Flag Collector**: Required, optional and repeatable flags with per-value validation
//! - **History**: Per-flag, per-application history of accepted values
//! - **Tree Definitions**: Load command trees from YAML and run the resolved command
//!
//! # Examples
//!
//! Walking a tree with scripted input:
//!
//! ```
//! use std::io::Cursor;
//! use cmd_walk_core::command_tree::CommandTree;
//! use cmd_walk_core::error::{Error, Result};
//! use cmd_walk_core::flag::{Flag, FlagType};
//! use cmd_walk_core::session::{BufReadLines, PlainConsole, Selector, Session};
//! use cmd_walk_core::walker::{run_interactive, WalkOutcome};
//!
//! struct First;
//!
//! impl Selector for First {
//!     fn select(&mut self, _prompt: &str, options: &[String]) -> Result<String> {
//!         options.first().cloned().ok_or(Error::SelectionAborted)
//!     }
//! }
//!
//! let mut tree = CommandTree::new("app");
//! let greet = tree.add_command(tree.root(), "greet")?;
//! tree.add_flag(greet, Flag::new("name", FlagType::String).required())?;
//!
//! let mut reader = BufReadLines::new(Cursor::new("World\nyes\n"));
//! let mut selector = First;
//! let mut console = PlainConsole::new(Vec::new());
//! let session = Session::new(&mut reader, &mut selector, &mut console);
//!
//! match run_interactive(&mut tree, session)? {
//!     WalkOutcome::Resolved(invocation) => {
//!         assert_eq!(invocation.command_line(), "app greet  --name World");
//!     }
//!     _ => unreachable!(),
//! }
//! # Ok::<(), Error>(())
//! ```

pub mod collector;
pub mod command_definitions;
pub mod command_tree;
pub mod config;
pub mod error;
pub mod execution;
pub mod file_handling;
pub mod flag;
pub mod history;
pub mod interpolation;
pub mod render;
pub mod session;
pub mod walker;
