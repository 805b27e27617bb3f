use leon::{ParseError, RenderError};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Command `{}` has no sub commands to choose from.", .0)]
    NoChildren(String),

    #[error("Selection was aborted.")]
    SelectionAborted,

    #[error("Error in interactive selection: {}", .0)]
    Selection(String),

    #[error("Error finding selected sub command `{}` below `{}`.", .child, .parent)]
    CommandNotFound { parent: String, child: String },

    #[error("Invalid value `{}` for flag `--{}`: {}", .value, .flag, .reason)]
    InvalidFlagValue {
        flag: String,
        value: String,
        reason: String,
    },

    #[error("Input was closed while waiting for a value.")]
    InputClosed,

    #[error("No history recorded for flag `--{}`.", .0)]
    HistoryNotFound(String),

    #[error("Could not determine the user config directory.")]
    NoConfigDir,

    #[error("The sub process exiting with non-success code.")]
    SubProcessExit,

    #[error("STDIO error: {}", .0)]
    Stdio(#[from] std::io::Error),

    #[error("Error {} {} file at `{}`: {}", .action, .file_description, .path, .original)]
    Yaml {
        action: String,
        file_description: String,
        path: String,
        original: serde_yaml::Error,
    },

    #[error("IO error with {} file at path `{}`: {}", .file_description, .path, .original)]
    Io {
        file_description: String,
        path: String,
        original: std::io::Error,
    },

    #[error("Error parsing placeholder string: {}", .0)]
    Parse(#[from] ParseError),

    #[error("Error placeholder template string: {}", .0)]
    Render(#[from] RenderError),

    #[error("Could not quote flag value for the shell: {}", .0)]
    Quote(#[from] shlex::QuoteError),

    #[error("Found a non-unique command name below `{}`: `{}`", .0, .1)]
    NonUniqueCommandName(String, String),

    #[error("Found a non-unique flag name on command `{}`: `{}`", .0, .1)]
    NonUniqueFlagName(String, String),

    #[error("Command `{}` runs with placeholder `{}` but no such flag is in its chain", .0, .1)]
    UnknownPlaceholder(String, String),

    #[error("Invalid name: name may not be empty")]
    EmptyName,

    #[error("Invalid name `{}`: name may not contain spaces", .0)]
    NameWithSpace(String),

    #[error("Invalid name `{}`: name may not contain a colon or a slash", .0)]
    NameWithSeparator(String),

    #[error("Invalid name `{}`: name cannot be purely numeric", .0)]
    NumericName(String),
}

impl Error {
    pub fn invalid_flag_value(flag: &str, value: &str, reason: impl Into<String>) -> Self {
        Self::InvalidFlagValue {
            flag: flag.to_string(),
            value: value.to_string(),
            reason: reason.into(),
        }
    }

    pub fn yaml_error(
        action: String,
        file_description: String,
        path: String,
        original: serde_yaml::Error,
    ) -> Self {
        Self::Yaml {
            action,
            file_description,
            path,
            original,
        }
    }

    pub fn io_error(file_description: String, path: String, original: std::io::Error) -> Self {
        Self::Io {
            file_description,
            path,
            original,
        }
    }
}
