//! Multi-source coordination
//!
//! Sources are read one after another. A source that fails is recorded as a
//! [`SourceError`] and skipped; it never stops the sources after it.

use rowpush_common::{Result, SyncError};
use std::collections::HashSet;
use tracing::{info, info_span, warn, Instrument};

use crate::engine::DeliveryEngine;
use crate::normalize::Normalizer;
use crate::record::Record;
use crate::report::{DeliveryReport, ReportBuilder, SourceError};
use crate::sink::Sink;
use crate::source::RecordSource;

/// Read and normalize every source in order.
///
/// Repeated ids are read once, at their first position. Returns the combined
/// records and one error per source that could not be read.
pub async fn collect_records<R>(
    source: &R,
    normalizer: &Normalizer,
    sources: &[String],
) -> (Vec<Record>, Vec<SourceError>)
where
    R: RecordSource + ?Sized,
{
    let mut seen = HashSet::new();
    let mut records = Vec::new();
    let mut errors = Vec::new();

    for source_id in sources.iter().filter(|id| seen.insert(id.as_str())) {
        match source
            .fetch(source_id)
            .instrument(info_span!("source", id = %source_id))
            .await
        {
            Ok(rows) => {
                let before = records.len();
                records.extend(normalizer.normalize_all(source_id, rows));
                info!(source = %source_id, records = records.len() - before, "Source read");
            },
            Err(err) => {
                let message = match err {
                    SyncError::SourceRead { message, .. } => message,
                    other => other.to_string(),
                };
                let error = SourceError::new(source_id.as_str(), message);
                warn!("{}", error);
                errors.push(error);
            },
        }
    }

    (records, errors)
}

/// Reads sources, then delivers everything they yielded in one run
pub struct Coordinator<R, S> {
    source: R,
    normalizer: Normalizer,
    engine: DeliveryEngine<S>,
}

impl<R: RecordSource, S: Sink> Coordinator<R, S> {
    pub fn new(source: R, normalizer: Normalizer, engine: DeliveryEngine<S>) -> Self {
        Self {
            source,
            normalizer,
            engine,
        }
    }

    pub fn source(&self) -> &R {
        &self.source
    }

    pub fn engine(&self) -> &DeliveryEngine<S> {
        &self.engine
    }

    /// Read `sources` and deliver the combined records.
    ///
    /// When no source yields a record the sink is never contacted and the
    /// report holds only the source errors.
    pub async fn run(&self, sources: &[String]) -> Result<DeliveryReport> {
        info!(
            sources = sources.len(),
            reader = %self.source.describe(),
            "Collecting records"
        );
        let (records, source_errors) = collect_records(&self.source, &self.normalizer, sources).await;

        if records.is_empty() {
            info!(failed_sources = source_errors.len(), "No records collected, skipping delivery");
            return Ok(ReportBuilder::new(0).with_source_errors(source_errors).finish());
        }

        let builder = ReportBuilder::new(records.len()).with_source_errors(source_errors);
        self.engine.deliver_into(records, builder).await
    }
}
