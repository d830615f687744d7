//! `rowpush send` command implementation
//!
//! Delivers JSON export files; each file is one source and its path is the
//! source tag.

use rowpush_ingest::source::JsonFileSource;
use rowpush_ingest::Coordinator;
use std::path::PathBuf;

use super::{build_engine, finish};
use crate::config::Settings;
use crate::error::Result;
use crate::progress::create_spinner;
use crate::{DeliveryArgs, FilterArgs};

pub async fn run(
    settings: &mut Settings,
    files: &[PathBuf],
    filter: &FilterArgs,
    delivery: &DeliveryArgs,
) -> Result<()> {
    let engine = build_engine(settings, delivery)?;
    let sources: Vec<String> = files
        .iter()
        .map(|path| path.to_string_lossy().into_owned())
        .collect();

    let coordinator = Coordinator::new(JsonFileSource, filter.normalizer(), engine);
    let spinner = create_spinner(&format!("Sending {} file(s)...", sources.len()));
    let report = coordinator.run(&sources).await;
    spinner.finish_and_clear();

    finish(&report?, delivery.output)
}
