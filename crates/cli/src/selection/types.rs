//! Type definitions for the fuzzy selection UI state.

/// What the user decided in the selection UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionChoice {
    /// Index into the options passed to the selector.
    Option(usize),
    Abort,
}

/// Direction to cycle through the options in the selection UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleDirection {
    Up,
    Down,
}

/// Rows above and below the option list: header and filter line.
pub const RESERVED_ROWS: u16 = 2;

/// State for the UI viewport.
///
/// Tracks the visible portion of the option list when there are more
/// options than can fit on screen.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct ViewportState {
    pub offset: usize,
    pub height: u16,
    pub width: u16,
}

/// Complete UI state for the selection interface.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct UiState {
    /// Position of the highlighted option among the displayed (filtered) ones
    pub selected_index: usize,
    /// Viewport state for scrolling
    pub viewport: ViewportState,
    /// Current filter text, typed directly
    pub filter_text: String,
}

impl UiState {
    /// Initial state for a terminal of `width` x `height` cells.
    #[must_use]
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            selected_index: 0,
            viewport: ViewportState {
                offset: 0,
                height: height.saturating_sub(RESERVED_ROWS),
                width,
            },
            filter_text: String::new(),
        }
    }

    /// Same viewport size, new filter, selection back at the top.
    #[must_use]
    pub fn with_filter(&self, filter_text: String) -> Self {
        Self {
            selected_index: 0,
            viewport: ViewportState {
                offset: 0,
                ..self.viewport.clone()
            },
            filter_text,
        }
    }
}
