//! `rowpush preview` command implementation
//!
//! Reads and normalizes up to `--limit` rows and prints them as the JSON the
//! sink would receive. Nothing is sent.

use rowpush_ingest::RecordSource;

use super::{choose_database, postgres_source};
use crate::config::Settings;
use crate::error::Result;
use crate::render::print_records;
use crate::{FilterArgs, SourceArgs};

pub async fn run(
    settings: &mut Settings,
    database: Option<String>,
    limit: u32,
    source: &SourceArgs,
    filter: &FilterArgs,
) -> Result<()> {
    let reader = postgres_source(settings, source)?.with_limit(limit);
    let database = choose_database(&reader, database).await?;

    let rows = reader.fetch(&database).await?;
    let records = filter.normalizer().normalize_all(&database, rows);
    print_records(&records)
}
