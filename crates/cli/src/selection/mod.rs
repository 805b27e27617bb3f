//! Full-screen fuzzy selection of one option out of a list.
//!
//! Used both to pick the next sub command and to pick a previously entered
//! flag value from the history.
//!
//! # User Interface
//!
//! - Typing filters the options (fuzzy search), Backspace edits the filter
//! - Arrow keys or the mouse wheel move the selection
//! - Enter or a left click chooses an option
//! - Escape or Ctrl-C cancels the selection

pub mod types;
pub mod ui;

pub use types::{CycleDirection, SelectionChoice, UiState, ViewportState};
pub use ui::{prompt_for_choice, FuzzySelector};
