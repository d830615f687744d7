//! `rowpush config` command implementation
//!
//! Reads and writes the saved settings slots.

use colored::Colorize;
use rowpush_common::ServerVariant;
use rowpush_ingest::HttpSink;
use std::time::Duration;

use crate::config::Settings;
use crate::error::Result;
use crate::settings::Slot;

/// Print a saved value; prints nothing when the slot is empty
pub async fn get(settings: &Settings, key: Slot) -> Result<()> {
    if let Some(value) = settings.get(key) {
        println!("{}", value);
    }
    Ok(())
}

/// Validate and save a value; an empty value clears the slot
pub async fn set(settings: &Settings, key: Slot, value: String) -> Result<()> {
    let store = settings.store();
    let value = value.trim();

    if value.is_empty() {
        store.clear(key)?;
        println!("{} Cleared {}", "✓".green(), key);
        return Ok(());
    }

    let value = match key {
        Slot::Url => {
            HttpSink::new(value, Duration::from_secs(1))?;
            value.to_string()
        },
        Slot::Server => value.parse::<ServerVariant>()?.to_string(),
    };

    store.write(key, &value)?;
    println!("{} Saved {} = {}", "✓".green(), key, value);
    Ok(())
}

/// Show all settings
pub async fn show(settings: &Settings) -> Result<()> {
    println!("{}", "rowpush settings:".cyan().bold());
    println!();
    for slot in Slot::ALL {
        let value = settings.get(slot).unwrap_or("(not set)");
        println!("{:<8} {}", format!("{}:", slot), value);
    }
    println!();
    println!("{:<8} {}", "dir:", settings.store().dir().display());
    Ok(())
}
