//! `rowpush push` command implementation
//!
//! Delivers every row of one database.

use rowpush_ingest::Coordinator;

use super::{build_engine, choose_database, finish, postgres_source};
use crate::config::Settings;
use crate::error::Result;
use crate::progress::create_spinner;
use crate::{DeliveryArgs, FilterArgs, SourceArgs};

pub async fn run(
    settings: &mut Settings,
    database: Option<String>,
    source: &SourceArgs,
    filter: &FilterArgs,
    delivery: &DeliveryArgs,
) -> Result<()> {
    let engine = build_engine(settings, delivery)?;
    let reader = postgres_source(settings, source)?;
    let database = choose_database(&reader, database).await?;

    let coordinator = Coordinator::new(reader, filter.normalizer(), engine);
    let spinner = create_spinner(&format!("Pushing {}...", database));
    let report = coordinator.run(&[database]).await;
    spinner.finish_and_clear();

    finish(&report?, delivery.output)
}
