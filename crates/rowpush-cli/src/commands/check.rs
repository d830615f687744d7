//! `rowpush check` command implementation
//!
//! Probes every built-in server variant (or one explicit URL) and reports
//! which accept connections.

use colored::Colorize;
use rowpush_common::ServerVariant;
use rowpush_ingest::source::postgres::DEFAULT_TABLE;
use rowpush_ingest::source::PostgresSource;
use rowpush_ingest::RecordSource;
use std::time::Duration;
use tracing::debug;

use crate::error::{CliError, Result};

const CHECK_TIMEOUT: Duration = Duration::from_secs(5);

pub async fn run(server_url: Option<String>) -> Result<()> {
    let mut targets = Vec::new();
    match server_url {
        Some(url) => targets.push(("custom".to_string(), PostgresSource::new(&url, DEFAULT_TABLE)?)),
        None => {
            for variant in ServerVariant::ALL {
                targets.push((variant.to_string(), PostgresSource::for_variant(variant, DEFAULT_TABLE)?));
            }
        },
    }

    let mut reachable = 0;
    for (name, source) in targets {
        let source = source.with_connect_timeout(CHECK_TIMEOUT);
        match source.ping().await {
            Ok(()) => {
                reachable += 1;
                println!("{} {} ({})", "✓".green(), name, source.describe());
            },
            Err(e) => {
                debug!(server = %name, error = %e, "Server unreachable");
                println!("{} {} ({}): {}", "✗".red(), name, source.describe(), e);
            },
        }
    }

    if reachable == 0 {
        return Err(CliError::Source("no database server accepted a connection".to_string()));
    }
    Ok(())
}
