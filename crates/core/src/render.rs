//! Flag text rendering and input normalisation.

use itertools::Itertools;

/// Renders one accepted value as ` --name value`.
///
/// Backslashes in the value become `\\` and spaces `\ `.
#[must_use]
pub fn flag_fragment(name: &str, value: &str) -> String {
    let escaped = value.replace('\\', "\\\\").replace(' ', "\\ ");
    format!(" --{name} {escaped}")
}

/// Trims the input, turns tabs into spaces and collapses runs of spaces.
#[must_use]
pub fn normalize_input(input: &str) -> String {
    input
        .trim()
        .replace('\t', " ")
        .split(' ')
        .filter(|part| !part.is_empty())
        .join(" ")
}

/// Splits rendered flag text on unescaped spaces, undoing [`flag_fragment`] escapes.
#[must_use]
pub fn split_escaped(text: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut chars = text.chars();

    while let Some(c) = chars.next() {
        match c {
            '\\' => match chars.next() {
                Some(escaped) => current.push(escaped),
                None => current.push('\\'),
            },
            ' ' => {
                if !current.is_empty() {
                    tokens.push(std::mem::take(&mut current));
                }
            }
            _ => current.push(c),
        }
    }

    if !current.is_empty() {
        tokens.push(current);
    }

    tokens
}
