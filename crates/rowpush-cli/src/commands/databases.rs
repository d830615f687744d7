//! `rowpush databases` command implementation

use rowpush_ingest::RecordSource;

use super::postgres_source;
use crate::config::Settings;
use crate::error::Result;
use crate::render::print_databases;
use crate::{OutputFormat, SourceArgs};

/// List online databases on the selected server
pub async fn run(settings: &mut Settings, source: &SourceArgs, output: OutputFormat) -> Result<()> {
    let reader = postgres_source(settings, source)?;
    let names = reader.list_sources().await?;
    print_databases(&names, output)
}
