//! Typed flags attached to command nodes.
//!
//! A [`Flag`] knows how to validate and apply a raw string through its
//! [`FlagType`]. List types are repeatable: every accepted value is appended
//! instead of replacing the previous one.

use std::fmt::{Display, Formatter};

use itertools::Itertools;
use serde::Deserialize;

use crate::error::{Error, Result};

/// Name of the flag that is never prompted for.
pub const HELP_FLAG: &str = "help";

/// Separator used for default values of list flags (`a,b,c`).
const LIST_DEFAULT_SEPARATOR: char = ',';

#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum FlagType {
    #[default]
    String,
    Int,
    Float,
    Bool,
    StringList,
    IntList,
    FloatList,
    BoolList,
}

/// Cardinality of a flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlagKind {
    Scalar,
    Repeatable,
}

impl FlagType {
    #[must_use]
    pub fn kind(self) -> FlagKind {
        match self {
            FlagType::String | FlagType::Int | FlagType::Float | FlagType::Bool => {
                FlagKind::Scalar
            }
            FlagType::StringList
            | FlagType::IntList
            | FlagType::FloatList
            | FlagType::BoolList => FlagKind::Repeatable,
        }
    }

    /// Parses a single element of this type.
    fn parse(self, raw: &str) -> std::result::Result<FlagValue, String> {
        match self {
            FlagType::String | FlagType::StringList => Ok(FlagValue::Text(raw.to_string())),
            FlagType::Int | FlagType::IntList => raw
                .parse::<i64>()
                .map(FlagValue::Int)
                .map_err(|e| e.to_string()),
            FlagType::Float | FlagType::FloatList => raw
                .parse::<f64>()
                .map(FlagValue::Float)
                .map_err(|e| e.to_string()),
            FlagType::Bool | FlagType::BoolList => parse_bool(raw).map(FlagValue::Bool),
        }
    }
}

fn parse_bool(raw: &str) -> std::result::Result<bool, String> {
    match raw.to_lowercase().as_str() {
        "true" | "t" | "1" | "yes" => Ok(true),
        "false" | "f" | "0" | "no" => Ok(false),
        _ => Err(format!("`{raw}` is not a boolean")),
    }
}

/// A parsed flag value.
#[derive(Debug, Clone, PartialEq)]
pub enum FlagValue {
    Text(String),
    Int(i64),
    Float(f64),
    Bool(bool),
}

impl Display for FlagValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            FlagValue::Text(text) => f.write_str(text),
            FlagValue::Int(i) => write!(f, "{i}"),
            FlagValue::Float(x) => write!(f, "{x}"),
            FlagValue::Bool(b) => write!(f, "{b}"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Flag {
    name: String,
    value_type: FlagType,
    pub usage: String,
    pub default_value: String,
    pub required: bool,
    values: Vec<FlagValue>,
    changed: bool,
}

impl Flag {
    pub fn new(name: impl Into<String>, value_type: FlagType) -> Self {
        Self {
            name: name.into(),
            value_type,
            usage: String::new(),
            default_value: String::new(),
            required: false,
            values: Vec::new(),
            changed: false,
        }
    }

    #[must_use]
    pub fn with_usage(mut self, usage: impl Into<String>) -> Self {
        self.usage = usage.into();
        self
    }

    #[must_use]
    pub fn with_default(mut self, default_value: impl Into<String>) -> Self {
        self.default_value = default_value.into();
        self
    }

    #[must_use]
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> FlagKind {
        self.value_type.kind()
    }

    pub fn is_repeatable(&self) -> bool {
        self.kind() == FlagKind::Repeatable
    }

    pub fn is_help(&self) -> bool {
        self.name == HELP_FLAG
    }

    /// Whether a value was set since the flag was declared.
    pub fn is_set(&self) -> bool {
        self.changed
    }

    /// Validates `raw` against the flag type and applies it.
    ///
    /// Scalar flags replace their value, repeatable flags append to it. The
    /// first value set on a repeatable flag drops its default values.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidFlagValue`] if `raw` does not parse as the
    /// flag's type. The flag is left untouched in that case.
    pub fn set(&mut self, raw: &str) -> Result<()> {
        let value = self
            .value_type
            .parse(raw)
            .map_err(|reason| Error::invalid_flag_value(&self.name, raw, reason))?;

        match self.kind() {
            FlagKind::Scalar => self.values = vec![value],
            FlagKind::Repeatable => {
                if !self.changed {
                    self.values.clear();
                }
                self.values.push(value);
            }
        }
        self.changed = true;
        Ok(())
    }

    /// Current values: the set values, or the parsed default when nothing was set.
    pub fn values(&self) -> Vec<FlagValue> {
        if self.changed {
            return self.values.clone();
        }
        self.default_items()
            .filter_map(|raw| self.value_type.parse(raw).ok())
            .collect()
    }

    /// Current values as a single space separated string.
    pub fn value_text(&self) -> String {
        self.values().iter().join(" ")
    }

    /// Checks that the declared default parses as the flag type.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidFlagValue`] for the first default item that
    /// does not parse.
    pub fn check_default(&self) -> Result<()> {
        for raw in self.default_items() {
            self.value_type
                .parse(raw)
                .map_err(|reason| Error::invalid_flag_value(&self.name, raw, reason))?;
        }
        Ok(())
    }

    fn default_items(&self) -> Box<dyn Iterator<Item = &str> + '_> {
        let default_value = self.default_value.trim();
        if default_value.is_empty() {
            return Box::new(std::iter::empty());
        }
        match self.kind() {
            FlagKind::Scalar => Box::new(std::iter::once(default_value)),
            FlagKind::Repeatable => Box::new(
                default_value
                    .split(LIST_DEFAULT_SEPARATOR)
                    .map(str::trim)
                    .filter(|item| !item.is_empty()),
            ),
        }
    }
}
