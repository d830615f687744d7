//! Batch delivery engine
//!
//! Chunks are sent strictly one after another: chunk `k + 1` is not touched
//! until chunk `k` has a terminal outcome. A failed chunk is recorded and the
//! run moves on, so a started run always ends with a report.

use rowpush_common::Result;
use tracing::{debug, error, info, info_span, Instrument};

use crate::chunk::chunk;
use crate::config::DeliveryConfig;
use crate::record::Record;
use crate::report::{ChunkOutcome, DeliveryReport, ReportBuilder};
use crate::sink::Sink;

pub struct DeliveryEngine<S> {
    sink: S,
    config: DeliveryConfig,
}

impl<S: Sink> DeliveryEngine<S> {
    /// Validates `config`; an invalid one never reaches the sink
    pub fn new(sink: S, config: DeliveryConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { sink, config })
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn config(&self) -> &DeliveryConfig {
        &self.config
    }

    /// Deliver `records` and report on every chunk
    pub async fn deliver(&self, records: Vec<Record>) -> Result<DeliveryReport> {
        let builder = ReportBuilder::new(records.len());
        self.deliver_into(records, builder).await
    }

    /// Like [`deliver`](Self::deliver), continuing a report that may already
    /// hold source errors
    pub async fn deliver_into(
        &self,
        records: Vec<Record>,
        builder: ReportBuilder,
    ) -> Result<DeliveryReport> {
        let span = info_span!(
            "deliver",
            run_id = %builder.run_id(),
            records = records.len(),
            chunk_size = self.config.chunk_size,
        );
        self.run(records, builder).instrument(span).await
    }

    async fn run(&self, records: Vec<Record>, mut builder: ReportBuilder) -> Result<DeliveryReport> {
        if records.is_empty() {
            info!("Nothing to deliver");
            return Ok(builder.finish());
        }

        let policy = self.config.retry_policy();
        let sink = &self.sink;
        info!(sink = %sink.describe(), "Starting delivery");

        for current in chunk(records, self.config.chunk_size)? {
            let current = &current;
            debug!(chunk = current.index(), rows = current.len(), "Sending chunk");

            let outcome = policy
                .run(move |attempt| {
                    debug!(chunk = current.index(), attempt, "Attempt");
                    sink.send(current)
                })
                .await;

            match &outcome {
                ChunkOutcome::Success { status_code, attempts, .. } => {
                    info!(
                        chunk = current.index(),
                        rows = current.len(),
                        status = status_code,
                        attempts,
                        "Chunk delivered"
                    );
                },
                ChunkOutcome::Failure { last_error, attempts_made } => {
                    error!(
                        chunk = current.index(),
                        rows = current.len(),
                        error = %last_error,
                        attempts = attempts_made,
                        "Chunk failed permanently"
                    );
                },
            }

            builder.record_chunk(current.index(), current.len(), outcome);
        }

        let report = builder.finish();
        info!(
            status = %report.status(),
            delivered = report.records_delivered(),
            failed_chunks = report.failed_chunks().len(),
            "Delivery finished"
        );
        Ok(report)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::chunk::Chunk;
    use crate::record::FieldValue;
    use crate::report::RunStatus;
    use crate::sink::{SinkResponse, TransmissionError};
    use async_trait::async_trait;
    use std::sync::Mutex;
    use std::time::Duration;

    /// Records every call; fails the chunks listed in `failing` every time
    #[derive(Default)]
    struct ScriptedSink {
        failing: Vec<usize>,
        calls: Mutex<Vec<(usize, usize)>>,
    }

    #[async_trait]
    impl Sink for ScriptedSink {
        async fn send(&self, chunk: &Chunk) -> std::result::Result<SinkResponse, TransmissionError> {
            self.calls.lock().unwrap().push((chunk.index(), chunk.len()));
            if self.failing.contains(&chunk.index()) {
                Err(TransmissionError::Status {
                    status: 500,
                    body_excerpt: "boom".into(),
                })
            } else {
                Ok(SinkResponse {
                    status: 200,
                    body_excerpt: format!("chunk {}", chunk.index()),
                })
            }
        }

        fn describe(&self) -> String {
            "scripted".into()
        }
    }

    fn records(n: usize) -> Vec<Record> {
        (0..n)
            .map(|i| Record::new("ED-02", vec![("n".into(), FieldValue::Int(i as i64))]))
            .collect()
    }

    fn config(chunk_size: usize, max_retries: u32) -> DeliveryConfig {
        DeliveryConfig::default()
            .with_chunk_size(chunk_size)
            .with_max_retries(max_retries)
            .with_base_delay(Duration::from_millis(10))
    }

    #[tokio::test]
    async fn test_empty_input_sends_nothing() {
        let engine = DeliveryEngine::new(ScriptedSink::default(), config(10, 2)).unwrap();
        let report = engine.deliver(Vec::new()).await.unwrap();

        assert!(report.is_nothing_to_deliver());
        assert_eq!(report.chunks_attempted(), 0);
        assert!(engine.sink().calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_chunks_sent_in_order() {
        let engine = DeliveryEngine::new(ScriptedSink::default(), config(1000, 2)).unwrap();
        let report = engine.deliver(records(2500)).await.unwrap();

        assert_eq!(
            *engine.sink().calls.lock().unwrap(),
            vec![(1, 1000), (2, 1000), (3, 500)]
        );
        assert_eq!(report.status(), RunStatus::Delivered);
        assert_eq!(report.records_delivered(), 2500);
        assert_eq!(report.total_records(), 2500);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_chunk_does_not_block_the_rest() {
        let sink = ScriptedSink {
            failing: vec![2],
            ..Default::default()
        };
        let engine = DeliveryEngine::new(sink, config(10, 2)).unwrap();
        let report = engine.deliver(records(30)).await.unwrap();

        let calls = engine.sink().calls.lock().unwrap().clone();
        assert_eq!(
            calls.iter().map(|(i, _)| *i).collect::<Vec<_>>(),
            vec![1, 2, 2, 2, 3]
        );
        assert_eq!(report.status(), RunStatus::Partial);
        assert_eq!(report.failed_chunks().len(), 1);
        assert_eq!(report.failed_chunks()[0].index, 2);
        assert_eq!(report.failed_chunks()[0].attempts_made, 3);
        assert_eq!(report.records_delivered(), 20);
        assert_eq!(report.outcomes().len(), 3);
    }

    #[test]
    fn test_invalid_config_rejected_up_front() {
        assert!(DeliveryEngine::new(ScriptedSink::default(), config(0, 2)).is_err());
    }
}
