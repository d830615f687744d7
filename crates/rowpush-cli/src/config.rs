//! Startup configuration for the rowpush CLI
//!
//! [`Settings`] is read from the [`SettingsStore`] once, in `main`, and passed
//! to the commands that need it. Flags always win over saved values. When a
//! required value is missing everywhere and the CLI runs on a terminal, the
//! user is prompted and the answer is saved for next time.

use inquire::{Select, Text};
use rowpush_common::ServerVariant;
use std::io::{self, IsTerminal};
use tracing::debug;

use crate::error::{CliError, Result};
use crate::settings::{SettingsStore, Slot};

#[derive(Debug, Clone)]
pub struct Settings {
    store: SettingsStore,
    sink_url: Option<String>,
    server: Option<String>,
}

impl Settings {
    /// Read every slot once
    pub fn load(store: SettingsStore) -> Result<Self> {
        let sink_url = store.read(Slot::Url)?;
        let server = store.read(Slot::Server)?;
        debug!(
            dir = %store.dir().display(),
            sink_url = sink_url.is_some(),
            server = server.is_some(),
            "Loaded settings"
        );
        Ok(Self {
            store,
            sink_url,
            server,
        })
    }

    pub fn store(&self) -> &SettingsStore {
        &self.store
    }

    /// Saved value of `slot` as loaded at startup
    pub fn get(&self, slot: Slot) -> Option<&str> {
        match slot {
            Slot::Url => self.sink_url.as_deref(),
            Slot::Server => self.server.as_deref(),
        }
    }

    /// Sink URL from the flag, the saved setting, or a prompt
    pub fn resolve_sink_url(&mut self, flag: Option<&str>) -> Result<String> {
        if let Some(url) = flag.map(str::trim).filter(|u| !u.is_empty()) {
            return Ok(url.to_string());
        }
        if let Some(url) = &self.sink_url {
            return Ok(url.clone());
        }
        if !interactive() {
            return Err(CliError::configuration_missing("sink URL is not set"));
        }

        let url = Text::new("Sink URL:")
            .with_help_message("Chunks are POSTed here as JSON arrays; saved for next time")
            .prompt()?;
        let url = url.trim().to_string();
        if url.is_empty() {
            return Err(CliError::configuration_missing("sink URL is not set"));
        }

        self.store.write(Slot::Url, &url)?;
        self.sink_url = Some(url.clone());
        Ok(url)
    }

    /// Server variant from the flag, the saved setting, or a prompt
    pub fn resolve_server(&mut self, flag: Option<ServerVariant>) -> Result<ServerVariant> {
        if let Some(variant) = flag {
            return Ok(variant);
        }
        if let Some(saved) = &self.server {
            return Ok(saved.parse()?);
        }
        if !interactive() {
            return Err(CliError::configuration_missing("server variant is not set"));
        }

        let variant = Select::new("Database server:", ServerVariant::ALL.to_vec()).prompt()?;
        self.store.write(Slot::Server, &variant.to_string())?;
        self.server = Some(variant.to_string());
        Ok(variant)
    }
}

/// True when prompts can be answered
pub fn interactive() -> bool {
    io::stdin().is_terminal() && io::stdout().is_terminal()
}
