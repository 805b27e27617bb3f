use std::fmt::Display;
use std::io::{stdout, Write};
use std::time::Duration;

use cmd_walk_core::error::{Error, Result};
use cmd_walk_core::session::Selector;
use crossterm::cursor::MoveTo;
use crossterm::event::{
    DisableMouseCapture, Event, KeyCode, KeyEventKind, KeyModifiers, MouseButton, MouseEvent,
    MouseEventKind,
};
use crossterm::style::Color::{DarkBlue, DarkGreen, Reset, Yellow};
use crossterm::style::{
    Attribute, Color, Print, SetAttribute, SetBackgroundColor, SetForegroundColor,
};
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::{event, execute, queue, terminal, ExecutableCommand};
use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;
use log::debug;

use super::types::CycleDirection::{Down, Up};
use super::types::{CycleDirection, SelectionChoice, UiState, ViewportState, RESERVED_ROWS};

struct RawModeGuard;

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        // Disable raw mode on drop
        let _ = disable_raw_mode();
        let mut stdout = stdout();
        let _ = stdout.execute(DisableMouseCapture);
        let _ = stdout.execute(LeaveAlternateScreen);
    }
}

/// [`Selector`] backed by the full-screen fuzzy selection UI.
#[derive(Debug, Default)]
pub struct FuzzySelector;

impl FuzzySelector {
    pub fn new() -> Self {
        Self
    }
}

impl Selector for FuzzySelector {
    fn select(&mut self, prompt: &str, options: &[String]) -> Result<String> {
        let index = prompt_for_choice(prompt, options)?;
        debug!("Chose option {index} for `{prompt}`");

        options
            .get(index)
            .cloned()
            .ok_or_else(|| Error::Selection(format!("no option at index {index}")))
    }
}

fn redraw_ui(
    prompt: &str,
    ui_state: &UiState,
    indexes_to_display: &[usize],
    options: &[String],
) -> Result<()> {
    let mut stdout = stdout();

    queue!(stdout, Clear(ClearType::All), MoveTo(0, 0))?;

    print_header(prompt, ui_state, indexes_to_display.len())?;

    if indexes_to_display.is_empty() {
        queue!(
            stdout,
            MoveTo(0, 1),
            SetForegroundColor(Color::Red),
            Print("No matching options!".to_string()),
            SetAttribute(Attribute::Reset),
            SetForegroundColor(Reset),
        )?;
    } else {
        print_options_with_selection(ui_state, options, indexes_to_display)?;
    }

    queue!(
        stdout,
        MoveTo(0, ui_state.viewport.height + 1),
        SetAttribute(Attribute::Bold),
        Print(format!("Filter: {}", ui_state.filter_text)),
        SetAttribute(Attribute::Reset)
    )?;

    stdout.flush()?;
    Ok(())
}

/// Prompts the user to choose one of `options`.
///
/// Returns the index of the chosen option in `options`.
///
/// # Errors
///
/// Returns [`Error::SelectionAborted`] if the user cancels, and
/// [`Error::Selection`] if there is nothing to choose from.
pub fn prompt_for_choice(prompt: &str, options: &[String]) -> Result<usize> {
    if options.is_empty() {
        return Err(Error::Selection("nothing to select".to_string()));
    }

    let mut stdout = stdout();

    stdout.execute(EnterAlternateScreen)?;
    enable_raw_mode()?;

    let _raw_mode_guard = RawModeGuard; // When this goes out of scope, raw mode and mouse capture is disabled
    stdout.execute(event::EnableMouseCapture)?;

    let (width, height) = terminal::size()?;
    let mut ui_state = UiState::new(width, height);
    let mut indexes_to_display = filter_option_indexes(options, &ui_state.filter_text);

    redraw_ui(prompt, &ui_state, &indexes_to_display, options)?;

    let mut down_row: Option<u16> = None;

    loop {
        if !event::poll(Duration::from_millis(500))? {
            continue;
        }

        let mut new_ui_state: Option<UiState> = None;
        let mut index_change_direction: Option<CycleDirection> = None;

        match event::read()? {
            Event::Mouse(MouseEvent {
                kind,
                row,
                modifiers,
                ..
            }) if modifiers == KeyModifiers::NONE => match kind {
                MouseEventKind::Down(MouseButton::Left) => down_row = Some(row),
                MouseEventKind::Up(MouseButton::Left) => {
                    let clicked = down_row
                        .take()
                        .and_then(|row| clicked_index(row, &ui_state, indexes_to_display.len()));

                    if let Some(clicked) = clicked {
                        return Ok(indexes_to_display[clicked]);
                    }
                }
                MouseEventKind::ScrollDown => index_change_direction = Some(Down),
                MouseEventKind::ScrollUp => index_change_direction = Some(Up),
                _ => {}
            },
            Event::Key(key_event) => {
                let (choice, new_state, new_direction) =
                    handle_key_event(key_event, &ui_state, &indexes_to_display)?;

                match choice {
                    Some(SelectionChoice::Option(index)) => return Ok(index),
                    Some(SelectionChoice::Abort) => return Err(Error::SelectionAborted),
                    None => {}
                }

                new_ui_state = new_state;
                index_change_direction = new_direction;
            }
            Event::Resize(width, height) => {
                new_ui_state = Some(handle_resize(
                    width,
                    height,
                    &ui_state,
                    indexes_to_display.len(),
                ));
            }
            _ => {}
        }

        if let Some(direction) = index_change_direction {
            let current = new_ui_state.as_ref().unwrap_or(&ui_state);
            new_ui_state = Some(move_selected_index(
                current,
                indexes_to_display.len(),
                direction,
            ));
        }

        if let Some(state) = new_ui_state {
            if state != ui_state {
                if state.filter_text != ui_state.filter_text {
                    indexes_to_display = filter_option_indexes(options, &state.filter_text);
                }
                ui_state = state;
                redraw_ui(prompt, &ui_state, &indexes_to_display, options)?;
            }
        }
    }
}

/// Handle keyboard events in the selection UI
fn handle_key_event(
    key_event: event::KeyEvent,
    ui_state: &UiState,
    indexes_to_display: &[usize],
) -> Result<(
    Option<SelectionChoice>,
    Option<UiState>,
    Option<CycleDirection>,
)> {
    if key_event.kind != KeyEventKind::Press {
        return Ok((None, None, None));
    }

    match key_event.code {
        KeyCode::Up => Ok((None, None, Some(Up))),
        KeyCode::Down => Ok((None, None, Some(Down))),
        KeyCode::Enter => {
            if let Some(option_index) = indexes_to_display.get(ui_state.selected_index) {
                return Ok((Some(SelectionChoice::Option(*option_index)), None, None));
            }
            execute!(stdout(), Print("\x07"))?;
            Ok((None, None, None))
        }
        KeyCode::Esc => Ok((Some(SelectionChoice::Abort), None, None)),
        KeyCode::Char('c') if key_event.modifiers.contains(KeyModifiers::CONTROL) => {
            Ok((Some(SelectionChoice::Abort), None, None))
        }
        KeyCode::Backspace => {
            if ui_state.filter_text.is_empty() {
                return Ok((None, None, None));
            }
            let mut filter_text = ui_state.filter_text.clone();
            filter_text.pop();
            Ok((None, Some(ui_state.with_filter(filter_text)), None))
        }
        KeyCode::Char(c) if !key_event.modifiers.contains(KeyModifiers::CONTROL) => {
            let mut filter_text = ui_state.filter_text.clone();
            filter_text.push(c);
            Ok((None, Some(ui_state.with_filter(filter_text)), None))
        }
        _ => Ok((None, None, None)),
    }
}

/// Position among the displayed options of a click on terminal `row`.
fn clicked_index(row: u16, ui_state: &UiState, displayed_count: usize) -> Option<usize> {
    if row == 0 || row > ui_state.viewport.height {
        // Header or filter line
        return None;
    }

    let clicked = (row - 1) as usize + ui_state.viewport.offset;
    (clicked < displayed_count).then_some(clicked)
}

/// Handle window resize events
fn handle_resize(width: u16, height: u16, ui_state: &UiState, displayed_count: usize) -> UiState {
    let new_height = height.saturating_sub(RESERVED_ROWS);
    let selected_index = ui_state.selected_index;
    let mut ui_state = ui_state.clone();
    let mut new_viewport = ViewportState {
        width,
        height: new_height,
        offset: ui_state.viewport.offset,
    };

    // If growing taller, try to show more items above current selection
    match new_height.cmp(&ui_state.viewport.height) {
        std::cmp::Ordering::Greater if new_viewport.offset > 0 => {
            let height_increase = new_height - ui_state.viewport.height;
            new_viewport.offset = new_viewport.offset.saturating_sub(height_increase as usize);
        }
        std::cmp::Ordering::Less if selected_index >= new_viewport.offset + new_height as usize => {
            new_viewport.offset = selected_index.saturating_sub((new_height as usize).saturating_sub(1));

            if new_viewport.offset + new_height as usize > displayed_count {
                new_viewport.offset = displayed_count.saturating_sub(new_height as usize);
            }
        }
        _ => {}
    }

    ui_state.viewport = new_viewport;
    ui_state
}

fn header_text(prompt: &str, ui_state: &UiState, displayed_count: usize) -> String {
    let position = if displayed_count == 0 {
        0
    } else {
        ui_state.selected_index + 1
    };

    format!(
        "{prompt}  |   {}/{}   |   <esc>: Cancel",
        pad_to_width_of(position, displayed_count),
        displayed_count
    )
}

/// Print the header for the selection UI
fn print_header(prompt: &str, ui_state: &UiState, displayed_count: usize) -> Result<()> {
    let mut stdout = stdout();
    let width = ui_state.viewport.width as usize;

    let left_padding_size = 2usize;

    let left_padding = " ".repeat(left_padding_size);

    let instructions = header_text(prompt, ui_state, displayed_count);

    let right_padding = " ".repeat(
        width
            .saturating_sub(left_padding_size)
            .saturating_sub(instructions.chars().count()),
    );

    queue!(
        stdout,
        MoveTo(0, 0),
        SetBackgroundColor(DarkGreen),
        Print(left_padding),
        Print(instructions),
        Print(right_padding),
        SetBackgroundColor(Reset),
        SetForegroundColor(Reset),
    )?;

    Ok(())
}

/// Pad a value to match the width of the largest value
fn pad_to_width_of<T: Display>(value: T, max_number: usize) -> String {
    let width = format!("{}", max_number).len();
    format!("{:>width$}", value.to_string())
}

fn option_row_content(number: usize, total: usize, option: &str) -> String {
    format!("[{}] {option}", pad_to_width_of(number, total))
}

/// Clear and write an option row in the selection UI
fn clear_and_write_option_row(
    row: u16,
    content: &str,
    is_selected: bool,
    terminal_width: u16,
) -> Result<()> {
    let mut stdout = stdout();

    queue!(stdout, MoveTo(0, row), Clear(ClearType::CurrentLine))?;

    let padding = " ".repeat((terminal_width as usize).saturating_sub(content.chars().count()));

    if is_selected {
        queue!(
            stdout,
            SetAttribute(Attribute::Bold),
            SetBackgroundColor(DarkBlue),
            SetForegroundColor(Yellow),
        )?;
    }

    queue!(stdout, Print(content), Print(padding))?;

    queue!(
        stdout,
        SetAttribute(Attribute::Reset),
        SetBackgroundColor(Reset),
        SetForegroundColor(Reset),
    )?;

    Ok(())
}

/// Print the visible options with the selected one highlighted
fn print_options_with_selection(
    ui_state: &UiState,
    options: &[String],
    indexes_to_display: &[usize],
) -> Result<()> {
    let viewport = &ui_state.viewport;

    let visible_options = indexes_to_display
        .iter()
        .enumerate()
        .skip(viewport.offset)
        .take(viewport.height as usize);

    for (row, (position, option_index)) in visible_options.enumerate() {
        let content = option_row_content(*option_index + 1, options.len(), &options[*option_index]);

        clear_and_write_option_row(
            row as u16 + 1,
            &content,
            position == ui_state.selected_index,
            viewport.width,
        )?;
    }

    Ok(())
}

/// Move the selected index in the given direction
fn move_selected_index(
    ui_state: &UiState,
    displayed_count: usize,
    direction: CycleDirection,
) -> UiState {
    if displayed_count == 0 {
        return ui_state.clone();
    }

    let visible_rows = (ui_state.viewport.height as usize).max(1);
    let mut new_index = ui_state.selected_index;
    let mut ui_state = ui_state.clone();

    match direction {
        Up => {
            if new_index == 0 {
                new_index = displayed_count - 1;
                ui_state.viewport.offset = new_index.saturating_sub(visible_rows - 1);
            } else {
                new_index -= 1;
                if new_index < ui_state.viewport.offset {
                    ui_state.viewport.offset = new_index;
                }
            }
        }
        Down => {
            new_index = (new_index + 1) % displayed_count;
            if new_index < ui_state.selected_index {
                ui_state.viewport.offset = 0;
            } else if new_index >= ui_state.viewport.offset + visible_rows {
                ui_state.viewport.offset = new_index + 1 - visible_rows;
            }
        }
    }

    ui_state.selected_index = new_index;
    ui_state
}

/// Indexes of the options matching `predicate`, in their original order.
fn filter_option_indexes(options: &[String], predicate: &str) -> Vec<usize> {
    if predicate.is_empty() {
        return (0..options.len()).collect();
    }

    let matcher = SkimMatcherV2::default();

    options
        .iter()
        .enumerate()
        .filter_map(|(i, option)| matcher.fuzzy_match(option, predicate).map(|_| i))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEvent;

    fn options(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    fn state(selected_index: usize, offset: usize, height: u16) -> UiState {
        UiState {
            selected_index,
            viewport: ViewportState {
                offset,
                height,
                width: 80,
            },
            filter_text: String::new(),
        }
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_filter_keeps_option_order() {
        let options = options(&["deploy", "status", "destroy", "describe"]);

        assert_eq!(filter_option_indexes(&options, ""), vec![0, 1, 2, 3]);
        assert_eq!(filter_option_indexes(&options, "des"), vec![2, 3]);
        assert_eq!(filter_option_indexes(&options, "dy"), vec![0, 2]);
        assert!(filter_option_indexes(&options, "zzz").is_empty());
    }

    #[test]
    fn test_move_down_scrolls_and_wraps() {
        let moved = move_selected_index(&state(2, 0, 3), 5, Down);
        assert_eq!(moved.selected_index, 3);
        assert_eq!(moved.viewport.offset, 1);

        let wrapped = move_selected_index(&state(4, 2, 3), 5, Down);
        assert_eq!(wrapped.selected_index, 0);
        assert_eq!(wrapped.viewport.offset, 0);
    }

    #[test]
    fn test_move_up_scrolls_and_wraps() {
        let moved = move_selected_index(&state(1, 1, 3), 5, Up);
        assert_eq!(moved.selected_index, 0);
        assert_eq!(moved.viewport.offset, 0);

        let wrapped = move_selected_index(&state(0, 0, 3), 5, Up);
        assert_eq!(wrapped.selected_index, 4);
        assert_eq!(wrapped.viewport.offset, 2);
    }

    #[test]
    fn test_move_without_options_is_noop() {
        let current = state(0, 0, 3);
        assert_eq!(move_selected_index(&current, 0, Down), current);
    }

    #[test]
    fn test_enter_chooses_original_index() {
        let current = state(1, 0, 10);
        let (choice, new_state, direction) =
            handle_key_event(key(KeyCode::Enter), &current, &[3, 7]).unwrap();

        assert_eq!(choice, Some(SelectionChoice::Option(7)));
        assert!(new_state.is_none());
        assert!(direction.is_none());
    }

    #[test]
    fn test_escape_and_ctrl_c_abort() {
        let current = state(0, 0, 10);

        let (choice, _, _) = handle_key_event(key(KeyCode::Esc), &current, &[0]).unwrap();
        assert_eq!(choice, Some(SelectionChoice::Abort));

        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        let (choice, _, _) = handle_key_event(ctrl_c, &current, &[0]).unwrap();
        assert_eq!(choice, Some(SelectionChoice::Abort));
    }

    #[test]
    fn test_typing_edits_filter_and_resets_selection() {
        let mut current = state(3, 2, 10);
        current.filter_text = "de".to_string();

        let (_, typed, _) = handle_key_event(key(KeyCode::Char('p')), &current, &[0]).unwrap();
        let typed = typed.unwrap();
        assert_eq!(typed.filter_text, "dep");
        assert_eq!(typed.selected_index, 0);
        assert_eq!(typed.viewport.offset, 0);

        let (_, erased, _) = handle_key_event(key(KeyCode::Backspace), &current, &[0]).unwrap();
        assert_eq!(erased.unwrap().filter_text, "d");

        let empty = state(0, 0, 10);
        let (_, unchanged, _) = handle_key_event(key(KeyCode::Backspace), &empty, &[0]).unwrap();
        assert!(unchanged.is_none());
    }

    #[test]
    fn test_arrows_request_direction() {
        let current = state(0, 0, 10);
        let (_, _, up) = handle_key_event(key(KeyCode::Up), &current, &[0, 1]).unwrap();
        let (_, _, down) = handle_key_event(key(KeyCode::Down), &current, &[0, 1]).unwrap();
        assert_eq!(up, Some(Up));
        assert_eq!(down, Some(Down));
    }

    #[test]
    fn test_clicked_index() {
        let current = state(0, 2, 3);
        assert_eq!(clicked_index(0, &current, 10), None);
        assert_eq!(clicked_index(1, &current, 10), Some(2));
        assert_eq!(clicked_index(3, &current, 10), Some(4));
        assert_eq!(clicked_index(4, &current, 10), None);
        assert_eq!(clicked_index(3, &current, 4), None);
    }

    #[test]
    fn test_handle_resize() {
        // Shrinking keeps the selection visible
        let shrunk = handle_resize(80, 5, &state(8, 0, 10), 20);
        assert_eq!(shrunk.viewport.height, 3);
        assert_eq!(shrunk.viewport.offset, 6);

        // Growing reveals rows above the current offset
        let grown = handle_resize(100, 12, &state(8, 6, 3), 20);
        assert_eq!(grown.viewport.height, 10);
        assert_eq!(grown.viewport.width, 100);
        assert_eq!(grown.viewport.offset, 0);
    }

    #[test]
    fn test_row_and_header_text() {
        assert_eq!(pad_to_width_of(3, 12), " 3");
        assert_eq!(option_row_content(3, 12, "deploy"), "[ 3] deploy");
        assert_eq!(
            header_text("Select the sub command to use: ", &state(1, 0, 10), 12),
            "Select the sub command to use:   |    2/12   |   <esc>: Cancel"
        );
        assert!(header_text("pick", &state(0, 0, 10), 0).contains("0/0"));
    }
}
