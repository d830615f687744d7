//! CLI command implementations
//!
//! Each subcommand has its own module with a `run` function. Helpers shared
//! by the delivering commands live here.

pub mod check;
pub mod config;
pub mod databases;
pub mod preview;
pub mod push;
pub mod push_all;
pub mod send;

use inquire::Select;
use rowpush_ingest::source::PostgresSource;
use rowpush_ingest::{DeliveryEngine, DeliveryReport, HttpSink, RecordSource};
use tracing::info;

use crate::config::{interactive, Settings};
use crate::error::{CliError, Result};
use crate::{DeliveryArgs, OutputFormat, SourceArgs};

/// Engine for the resolved sink URL; fails before any database is touched
pub(crate) fn build_engine(
    settings: &mut Settings,
    delivery: &DeliveryArgs,
) -> Result<DeliveryEngine<HttpSink>> {
    let config = delivery.delivery_config()?;
    let url = settings.resolve_sink_url(delivery.url.as_deref())?;
    let sink = HttpSink::new(&url, config.timeout)?;
    info!(sink = %sink.endpoint(), chunk_size = config.chunk_size, "Sink ready");
    Ok(DeliveryEngine::new(sink, config)?)
}

/// Postgres reader for `--server-url`, or for the resolved server variant
pub(crate) fn postgres_source(settings: &mut Settings, source: &SourceArgs) -> Result<PostgresSource> {
    match source.server_url.as_deref().filter(|u| !u.trim().is_empty()) {
        Some(url) => Ok(PostgresSource::new(url, &source.table)?),
        None => {
            let variant = settings.resolve_server(source.server)?;
            Ok(PostgresSource::for_variant(variant, &source.table)?)
        },
    }
}

/// The named database, or one picked interactively from the server's list
pub(crate) async fn choose_database(
    reader: &PostgresSource,
    database: Option<String>,
) -> Result<String> {
    if let Some(name) = database.filter(|d| !d.trim().is_empty()) {
        return Ok(name);
    }
    if !interactive() {
        return Err(CliError::configuration_missing("no database given (use --database)"));
    }

    let names = reader.list_sources().await?;
    if names.is_empty() {
        return Err(CliError::Source(format!("no databases found on {}", reader.describe())));
    }
    Ok(Select::new("Database:", names).with_page_size(15).prompt()?)
}

/// Print the report; a run that lost records is an error for the exit code
pub(crate) fn finish(report: &DeliveryReport, output: OutputFormat) -> Result<()> {
    crate::render::print_report(report, output)?;

    if report.is_complete() {
        Ok(())
    } else {
        Err(CliError::Incomplete {
            status: report.status().to_string(),
            failed_chunks: report.failed_chunks().len(),
            failed_sources: report.source_errors().len(),
        })
    }
}
