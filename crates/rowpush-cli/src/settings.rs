//! Persisted settings
//!
//! Each setting lives in its own plain-text file (a "slot") inside the
//! settings directory, `<config dir>/rowpush` unless overridden.

use clap::ValueEnum;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::{CliError, Result};

/// A named setting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum)]
pub enum Slot {
    /// Sink endpoint that receives the chunks
    Url,
    /// Database server variant (default or express)
    Server,
}

impl Slot {
    pub const ALL: [Slot; 2] = [Slot::Url, Slot::Server];

    pub fn file_name(self) -> &'static str {
        match self {
            Slot::Url => "url",
            Slot::Server => "server",
        }
    }
}

impl std::fmt::Display for Slot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.file_name())
    }
}

#[derive(Debug, Clone)]
pub struct SettingsStore {
    dir: PathBuf,
}

impl SettingsStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Store at `dir`, or in the user's config directory when `None`
    pub fn open(dir: Option<PathBuf>) -> Result<Self> {
        match dir {
            Some(dir) => Ok(Self::new(dir)),
            None => Ok(Self::new(Self::default_dir()?)),
        }
    }

    pub fn default_dir() -> Result<PathBuf> {
        Ok(dirs::config_dir()
            .ok_or_else(|| CliError::config("Could not determine config directory"))?
            .join("rowpush"))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path(&self, slot: Slot) -> PathBuf {
        self.dir.join(slot.file_name())
    }

    /// Trimmed slot content; `None` when the slot is missing or blank
    pub fn read(&self, slot: Slot) -> Result<Option<String>> {
        match fs::read_to_string(self.path(slot)) {
            Ok(content) => {
                let value = content.trim();
                Ok((!value.is_empty()).then(|| value.to_string()))
            },
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    pub fn write(&self, slot: Slot, value: &str) -> Result<()> {
        fs::create_dir_all(&self.dir)?;
        fs::write(self.path(slot), value.trim())?;
        debug!(slot = %slot, dir = %self.dir.display(), "Saved setting");
        Ok(())
    }

    pub fn clear(&self, slot: Slot) -> Result<()> {
        match fs::remove_file(self.path(slot)) {
            Err(e) if e.kind() != ErrorKind::NotFound => Err(e.into()),
            _ => Ok(()),
        }
    }
}
