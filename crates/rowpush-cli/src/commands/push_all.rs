//! `rowpush push-all` command implementation
//!
//! Delivers several databases in one run. Without `--database` every
//! database on the server is pushed.

use rowpush_ingest::{Coordinator, RecordSource};
use tracing::info;

use super::{build_engine, finish, postgres_source};
use crate::config::Settings;
use crate::error::Result;
use crate::progress::create_spinner;
use crate::{DeliveryArgs, FilterArgs, SourceArgs};

pub async fn run(
    settings: &mut Settings,
    databases: Vec<String>,
    source: &SourceArgs,
    filter: &FilterArgs,
    delivery: &DeliveryArgs,
) -> Result<()> {
    let engine = build_engine(settings, delivery)?;
    let reader = postgres_source(settings, source)?;

    let databases = if databases.is_empty() {
        let found = reader.list_sources().await?;
        info!(count = found.len(), "Discovered databases");
        found
    } else {
        databases
    };

    let coordinator = Coordinator::new(reader, filter.normalizer(), engine);
    let spinner = create_spinner(&format!("Pushing {} database(s)...", databases.len()));
    let report = coordinator.run(&databases).await;
    spinner.finish_and_clear();

    finish(&report?, delivery.output)
}
