//! Per-flag history of previously accepted values.
//!
//! The file backed store keeps one append-only file per flag name below an
//! application namespaced directory:
//! `<user-config-root>/<app_name>/history/<flag_name>.hist`.

use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use log::debug;

use crate::error::{Error, Result};

const HISTORY_DIR: &str = "history";
const HISTORY_EXTENSION: &str = "hist";

pub trait HistoryStore {
    fn has_history(&self, flag_name: &str) -> bool;

    /// Stored values in insertion order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::HistoryNotFound`] if nothing was recorded for the flag.
    fn history_values(&self, flag_name: &str) -> Result<Vec<String>>;

    /// Appends `value` unless it is already stored.
    ///
    /// # Errors
    ///
    /// Returns an error if the value could not be persisted.
    fn append(&mut self, flag_name: &str, value: &str) -> Result<()>;
}

/// Directory holding the history files of `app_name` below `config_root`.
pub fn history_dir_for(config_root: &Path, app_name: &str) -> PathBuf {
    config_root.join(app_name).join(HISTORY_DIR)
}

#[derive(Debug, Clone)]
pub struct FileHistoryStore {
    history_dir: PathBuf,
}

impl FileHistoryStore {
    /// Opens the history of `app_name` inside the user config directory.
    ///
    /// # Errors
    ///
    /// Fails if there is no user config directory or the history directory
    /// cannot be created.
    pub fn new(app_name: &str) -> Result<Self> {
        let config_root = dirs::config_dir().ok_or(Error::NoConfigDir)?;
        Self::with_dir(history_dir_for(&config_root, app_name))
    }

    /// Opens a history rooted at an explicit directory, creating it if needed.
    ///
    /// # Errors
    ///
    /// Fails if the directory cannot be created.
    pub fn with_dir(history_dir: impl Into<PathBuf>) -> Result<Self> {
        let history_dir = history_dir.into();
        if !history_dir.is_dir() {
            create_private_dir(&history_dir).map_err(|e| {
                Error::io_error(
                    "history directory".to_string(),
                    history_dir.display().to_string(),
                    e,
                )
            })?;
        }
        debug!("Using history directory `{}`", history_dir.display());

        Ok(Self { history_dir })
    }

    pub fn history_dir(&self) -> &Path {
        &self.history_dir
    }

    pub fn history_file(&self, flag_name: &str) -> PathBuf {
        self.history_dir
            .join(format!("{flag_name}.{HISTORY_EXTENSION}"))
    }

    fn io_error(&self, flag_name: &str, original: std::io::Error) -> Error {
        Error::io_error(
            "history".to_string(),
            self.history_file(flag_name).display().to_string(),
            original,
        )
    }
}

impl HistoryStore for FileHistoryStore {
    fn has_history(&self, flag_name: &str) -> bool {
        self.history_file(flag_name).is_file()
    }

    fn history_values(&self, flag_name: &str) -> Result<Vec<String>> {
        match fs::read_to_string(self.history_file(flag_name)) {
            Ok(content) => Ok(content.lines().map(str::to_string).collect()),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                Err(Error::HistoryNotFound(flag_name.to_string()))
            }
            Err(e) => Err(self.io_error(flag_name, e)),
        }
    }

    fn append(&mut self, flag_name: &str, value: &str) -> Result<()> {
        match self.history_values(flag_name) {
            Ok(values) if values.iter().any(|v| v == value) => return Ok(()),
            Ok(_) | Err(Error::HistoryNotFound(_)) => {}
            Err(e) => return Err(e),
        }

        let path = self.history_file(flag_name);
        let mut file = open_for_append(&path).map_err(|e| self.io_error(flag_name, e))?;
        writeln!(file, "{value}").map_err(|e| self.io_error(flag_name, e))?;
        file.sync_all().map_err(|e| self.io_error(flag_name, e))?;

        debug!("Stored `{value}` in history of `--{flag_name}`");
        Ok(())
    }
}

#[cfg(unix)]
fn create_private_dir(path: &Path) -> std::io::Result<()> {
    use std::os::unix::fs::DirBuilderExt;

    fs::DirBuilder::new().recursive(true).mode(0o700).create(path)
}

#[cfg(not(unix))]
fn create_private_dir(path: &Path) -> std::io::Result<()> {
    fs::create_dir_all(path)
}

fn open_for_append(path: &Path) -> std::io::Result<fs::File> {
    let mut options = OpenOptions::new();
    options.append(true).create(true);

    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }

    options.open(path)
}

/// History kept only for the lifetime of the process.
#[derive(Debug, Default, Clone)]
pub struct MemoryHistoryStore {
    entries: IndexMap<String, Vec<String>>,
}

impl MemoryHistoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl HistoryStore for MemoryHistoryStore {
    fn has_history(&self, flag_name: &str) -> bool {
        self.entries.contains_key(flag_name)
    }

    fn history_values(&self, flag_name: &str) -> Result<Vec<String>> {
        self.entries
            .get(flag_name)
            .cloned()
            .ok_or_else(|| Error::HistoryNotFound(flag_name.to_string()))
    }

    fn append(&mut self, flag_name: &str, value: &str) -> Result<()> {
        let values = self.entries.entry(flag_name.to_string()).or_default();
        if !values.iter().any(|v| v == value) {
            values.push(value.to_string());
        }
        Ok(())
    }
}
