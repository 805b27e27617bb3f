//! Prompt/validate/set loop for a single flag.
//!
//! Scalar flags exit on the first accepted value (or on empty input when they
//! are optional). Repeatable flags keep asking until an empty line is entered.
//! When the session carries a history store, stored values are offered
//! through the selector before falling back to free text.

use std::fmt::{Display, Formatter};

use log::{debug, warn};

use crate::error::{Error, Result};
use crate::flag::{Flag, FlagKind};
use crate::render::{flag_fragment, normalize_input};
use crate::session::Session;

/// Inputs that print the flag usage instead of being used as a value.
pub const HELP_TOKENS: [&str; 3] = ["?", "help", "--help"];

const NEXT_VALUE_PROMPT: &str = "\nnext value, empty input to finish: ";

#[must_use]
pub fn is_help_token(input: &str) -> bool {
    HELP_TOKENS.contains(&input)
}

/// Text shown next to the flag name: `(required)`, `(default x)` or nothing.
#[must_use]
pub fn default_text(flag: &Flag) -> String {
    if flag.required {
        "(required)".to_string()
    } else if !flag.default_value.is_empty() {
        format!("(default {})", flag.default_value)
    } else {
        String::new()
    }
}

/// Position of a flag among all flags collected for a chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    pub current: usize,
    pub total: usize,
}

impl Display for Progress {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}/{}]", self.current, self.total)
    }
}

pub struct FlagCollector<'s, 'a> {
    session: &'s mut Session<'a>,
}

impl<'s, 'a> FlagCollector<'s, 'a> {
    pub fn new(session: &'s mut Session<'a>) -> Self {
        Self { session }
    }

    /// Collects the value(s) of `flag` and returns their rendered fragments.
    ///
    /// Returns an empty string when an optional flag was skipped.
    ///
    /// # Errors
    ///
    /// Fails if the input ends before collection is complete or an output
    /// write fails. Rejected values are reported and re-prompted, not returned.
    pub fn collect(&mut self, flag: &mut Flag, progress: Progress) -> Result<String> {
        debug!("Collecting `--{}` {progress}", flag.name());
        match flag.kind() {
            FlagKind::Scalar => self.collect_scalar(flag, progress),
            FlagKind::Repeatable => self.collect_repeated(flag, progress),
        }
    }

    fn collect_scalar(&mut self, flag: &mut Flag, progress: Progress) -> Result<String> {
        let prompt = format!("\n{progress} {}: ", label(flag));
        let mut offer_history = self.session.has_history();

        loop {
            let input = self.next_input(flag, &prompt, &mut offer_history, &[])?;

            if input.is_empty() {
                if flag.required {
                    self.session.console.warn(&format!(
                        "Flag {} is required, so input is needed!\n",
                        flag.name()
                    ))?;
                    continue;
                }
                return Ok(String::new());
            }

            if is_help_token(&input) {
                self.print_usage(flag)?;
                continue;
            }

            if self.apply(flag, &input)? {
                return Ok(flag_fragment(flag.name(), &input));
            }
        }
    }

    fn collect_repeated(&mut self, flag: &mut Flag, progress: Progress) -> Result<String> {
        let first_prompt = format!(
            "\n{progress} {}\nmultiple values possible, leave empty to skip or finish: ",
            label(flag)
        );
        let mut offer_history = self.session.has_history();
        let mut accepted: Vec<String> = Vec::new();
        let mut rendered = String::new();

        loop {
            let prompt = if accepted.is_empty() {
                first_prompt.as_str()
            } else {
                NEXT_VALUE_PROMPT
            };
            let input = self.next_input(flag, prompt, &mut offer_history, &accepted)?;

            if input.is_empty() {
                return Ok(rendered);
            }

            if is_help_token(&input) {
                self.print_usage(flag)?;
                continue;
            }

            if self.apply(flag, &input)? {
                rendered.push_str(&flag_fragment(flag.name(), &input));
                accepted.push(input);
            }
        }
    }

    /// Next normalised input: a history choice while offered, free text otherwise.
    ///
    /// Escaping the history selection switches to free text for the rest of
    /// this flag.
    fn next_input(
        &mut self,
        flag: &Flag,
        prompt: &str,
        offer_history: &mut bool,
        accepted: &[String],
    ) -> Result<String> {
        if *offer_history {
            match self.history_choice(flag, accepted)? {
                Some(choice) => return Ok(normalize_input(&choice)),
                None => *offer_history = false,
            }
        }

        self.session.console.print(prompt)?;
        let line = self.session.require_line()?;
        Ok(normalize_input(&line))
    }

    fn history_choice(&mut self, flag: &Flag, accepted: &[String]) -> Result<Option<String>> {
        let Some(history) = self.session.history.as_deref_mut() else {
            return Ok(None);
        };
        if !history.has_history(flag.name()) {
            return Ok(None);
        }

        let options: Vec<String> = match history.history_values(flag.name()) {
            Ok(values) => values
                .into_iter()
                .filter(|value| !value.is_empty() && !accepted.contains(value))
                .collect(),
            Err(e) => {
                warn!("Ignoring history of `--{}`: {e}", flag.name());
                return Ok(None);
            }
        };
        if options.is_empty() {
            return Ok(None);
        }

        let prompt = format!(
            "'--{}' {} ({}), to enter new value press ESC: ",
            flag.name(),
            default_text(flag),
            flag.usage
        );
        match self.session.selector.select(&prompt, &options) {
            Ok(choice) => Ok(Some(choice)),
            Err(Error::SelectionAborted) => Ok(None),
            Err(e) => {
                warn!("History selection for `--{}` failed: {e}", flag.name());
                Ok(None)
            }
        }
    }

    /// Applies `input` to the flag. Returns false if the value was rejected.
    fn apply(&mut self, flag: &mut Flag, input: &str) -> Result<bool> {
        match flag.set(input) {
            Ok(()) => {
                self.session
                    .console
                    .print(&format!("\nSet value: --{} {input}\n", flag.name()))?;
                self.remember(flag.name(), input)?;
                Ok(true)
            }
            Err(e @ Error::InvalidFlagValue { .. }) => {
                self.session
                    .console
                    .warn(&format!("Could not set flag {}: {e}\n", flag.name()))?;
                Ok(false)
            }
            Err(e) => Err(e),
        }
    }

    fn remember(&mut self, flag_name: &str, value: &str) -> Result<()> {
        let Some(history) = self.session.history.as_deref_mut() else {
            return Ok(());
        };

        if let Err(e) = history.append(flag_name, value) {
            warn!("Could not store history for `--{flag_name}`: {e}");
            self.session
                .console
                .warn(&format!("Could not store history for --{flag_name}: {e}\n"))?;
        }
        Ok(())
    }

    fn print_usage(&mut self, flag: &Flag) -> Result<()> {
        self.session
            .console
            .print(&format!("  Expected input: {}\n", flag.usage))
    }
}

fn label(flag: &Flag) -> String {
    let default_text = default_text(flag);
    if default_text.is_empty() {
        format!("--{}", flag.name())
    } else {
        format!("--{} {default_text}", flag.name())
    }
}
