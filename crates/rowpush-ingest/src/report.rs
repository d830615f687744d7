//! Delivery reports
//!
//! A [`ReportBuilder`] accumulates one terminal [`ChunkOutcome`] per chunk and
//! the source-level errors of a run; [`ReportBuilder::finish`] freezes it into
//! an immutable [`DeliveryReport`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Terminal result of delivering one chunk
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ChunkOutcome {
    Success {
        status_code: u16,
        response_excerpt: String,
        attempts: u32,
    },
    Failure {
        last_error: String,
        attempts_made: u32,
    },
}

impl ChunkOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, ChunkOutcome::Success { .. })
    }

    /// Number of transmissions it took to reach this outcome
    pub fn attempts(&self) -> u32 {
        match self {
            ChunkOutcome::Success { attempts, .. } => *attempts,
            ChunkOutcome::Failure { attempts_made, .. } => *attempts_made,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkReport {
    /// 1-based chunk index
    pub index: usize,
    pub rows: usize,
    #[serde(flatten)]
    pub outcome: ChunkOutcome,
}

/// A chunk that was given up on
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailedChunk {
    pub index: usize,
    pub rows: usize,
    pub error: String,
    pub attempts_made: u32,
}

/// A source that could not be read
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceError {
    #[serde(rename = "source")]
    pub source_id: String,
    pub message: String,
}

impl SourceError {
    pub fn new(source_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            source_id: source_id.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for SourceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Error processing {}: {}", self.source_id, self.message)
    }
}

/// Overall result of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    /// No records reached the engine, so nothing was sent
    NothingToDeliver,
    /// Every chunk was delivered and every source was read
    Delivered,
    /// Some chunks were delivered, but a chunk or a source failed
    Partial,
    /// No chunk was delivered
    Failed,
}

impl RunStatus {
    fn classify(outcomes: &[ChunkReport], source_errors: &[SourceError]) -> Self {
        if outcomes.is_empty() {
            return RunStatus::NothingToDeliver;
        }

        let delivered = outcomes.iter().filter(|c| c.outcome.is_success()).count();
        if delivered == 0 {
            RunStatus::Failed
        } else if delivered == outcomes.len() && source_errors.is_empty() {
            RunStatus::Delivered
        } else {
            RunStatus::Partial
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RunStatus::NothingToDeliver => "nothing_to_deliver",
            RunStatus::Delivered => "delivered",
            RunStatus::Partial => "partial",
            RunStatus::Failed => "failed",
        }
    }

    /// True when every chunk was delivered or there was nothing to send
    pub fn is_complete(&self) -> bool {
        matches!(self, RunStatus::Delivered | RunStatus::NothingToDeliver)
    }
}

impl std::fmt::Display for RunStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Frozen summary of one delivery run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeliveryReport {
    run_id: Uuid,
    status: RunStatus,
    started_at: DateTime<Utc>,
    finished_at: DateTime<Utc>,
    total_records: usize,
    records_delivered: usize,
    chunks_attempted: usize,
    outcomes: Vec<ChunkReport>,
    failed_chunks: Vec<FailedChunk>,
    source_errors: Vec<SourceError>,
}

impl DeliveryReport {
    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    pub fn status(&self) -> RunStatus {
        self.status
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn finished_at(&self) -> DateTime<Utc> {
        self.finished_at
    }

    pub fn duration(&self) -> chrono::Duration {
        self.finished_at - self.started_at
    }

    /// Records handed to the run
    pub fn total_records(&self) -> usize {
        self.total_records
    }

    /// Records inside chunks the sink accepted
    pub fn records_delivered(&self) -> usize {
        self.records_delivered
    }

    pub fn chunks_attempted(&self) -> usize {
        self.chunks_attempted
    }

    /// Per-chunk outcomes in chunk order
    pub fn outcomes(&self) -> &[ChunkReport] {
        &self.outcomes
    }

    pub fn failed_chunks(&self) -> &[FailedChunk] {
        &self.failed_chunks
    }

    pub fn source_errors(&self) -> &[SourceError] {
        &self.source_errors
    }

    /// True when the engine never had anything to send
    pub fn is_nothing_to_deliver(&self) -> bool {
        self.status == RunStatus::NothingToDeliver
    }

    /// True when nothing was lost in this run
    pub fn is_complete(&self) -> bool {
        self.status.is_complete() && self.source_errors.is_empty()
    }
}

/// Mutable accumulator owned by exactly one run
#[derive(Debug)]
pub struct ReportBuilder {
    run_id: Uuid,
    started_at: DateTime<Utc>,
    total_records: usize,
    outcomes: Vec<ChunkReport>,
    source_errors: Vec<SourceError>,
}

impl ReportBuilder {
    pub fn new(total_records: usize) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            started_at: Utc::now(),
            total_records,
            outcomes: Vec::new(),
            source_errors: Vec::new(),
        }
    }

    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    pub fn with_source_errors(mut self, errors: Vec<SourceError>) -> Self {
        self.source_errors.extend(errors);
        self
    }

    pub fn record_source_error(&mut self, error: SourceError) {
        self.source_errors.push(error);
    }

    pub fn record_chunk(&mut self, index: usize, rows: usize, outcome: ChunkOutcome) {
        self.outcomes.push(ChunkReport {
            index,
            rows,
            outcome,
        });
    }

    pub fn chunks_recorded(&self) -> usize {
        self.outcomes.len()
    }

    /// Freeze the run
    pub fn finish(self) -> DeliveryReport {
        let status = RunStatus::classify(&self.outcomes, &self.source_errors);

        let records_delivered = self
            .outcomes
            .iter()
            .filter(|c| c.outcome.is_success())
            .map(|c| c.rows)
            .sum();

        let failed_chunks = self
            .outcomes
            .iter()
            .filter_map(|c| match &c.outcome {
                ChunkOutcome::Failure {
                    last_error,
                    attempts_made,
                } => Some(FailedChunk {
                    index: c.index,
                    rows: c.rows,
                    error: last_error.clone(),
                    attempts_made: *attempts_made,
                }),
                ChunkOutcome::Success { .. } => None,
            })
            .collect();

        DeliveryReport {
            run_id: self.run_id,
            status,
            started_at: self.started_at,
            finished_at: Utc::now(),
            total_records: self.total_records,
            records_delivered,
            chunks_attempted: self.outcomes.len(),
            outcomes: self.outcomes,
            failed_chunks,
            source_errors: self.source_errors,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn success() -> ChunkOutcome {
        ChunkOutcome::Success {
            status_code: 200,
            response_excerpt: "ok".into(),
            attempts: 1,
        }
    }

    fn failure() -> ChunkOutcome {
        ChunkOutcome::Failure {
            last_error: "HTTP 500".into(),
            attempts_made: 3,
        }
    }

    #[test]
    fn test_empty_run_is_nothing_to_deliver() {
        let report = ReportBuilder::new(0).finish();
        assert_eq!(report.status(), RunStatus::NothingToDeliver);
        assert_eq!(report.chunks_attempted(), 0);
        assert!(report.is_complete());
    }

    #[test]
    fn test_all_chunks_delivered() {
        let mut builder = ReportBuilder::new(15);
        builder.record_chunk(1, 10, success());
        builder.record_chunk(2, 5, success());
        let report = builder.finish();

        assert_eq!(report.status(), RunStatus::Delivered);
        assert_eq!(report.records_delivered(), 15);
        assert!(report.failed_chunks().is_empty());
    }

    #[test]
    fn test_partial_run_lists_failed_chunks() {
        let mut builder = ReportBuilder::new(25);
        builder.record_chunk(1, 10, success());
        builder.record_chunk(2, 10, failure());
        builder.record_chunk(3, 5, success());
        let report = builder.finish();

        assert_eq!(report.status(), RunStatus::Partial);
        assert_eq!(report.records_delivered(), 15);
        assert_eq!(
            report.failed_chunks(),
            &[FailedChunk {
                index: 2,
                rows: 10,
                error: "HTTP 500".into(),
                attempts_made: 3,
            }]
        );
        assert!(!report.is_complete());
    }

    #[test]
    fn test_source_errors_make_successful_run_partial() {
        let mut builder =
            ReportBuilder::new(10).with_source_errors(vec![SourceError::new("ED-02", "offline")]);
        builder.record_chunk(1, 10, success());
        assert_eq!(builder.finish().status(), RunStatus::Partial);
    }

    #[test]
    fn test_every_chunk_failing_is_failed() {
        let mut builder = ReportBuilder::new(10);
        builder.record_chunk(1, 10, failure());
        let report = builder.finish();
        assert_eq!(report.status(), RunStatus::Failed);
        assert_eq!(report.records_delivered(), 0);
    }

    #[test]
    fn test_report_json_shape() {
        let mut builder = ReportBuilder::new(10);
        builder.record_chunk(1, 10, failure());
        builder.record_source_error(SourceError::new("ED-03", "login failed"));
        let json = serde_json::to_value(builder.finish()).unwrap();

        assert_eq!(json["status"], "failed");
        assert_eq!(json["outcomes"][0]["index"], 1);
        assert_eq!(json["outcomes"][0]["outcome"], "failure");
        assert_eq!(json["outcomes"][0]["attempts_made"], 3);
        assert_eq!(json["source_errors"][0]["source"], "ED-03");
    }

    #[test]
    fn test_source_error_display() {
        let err = SourceError::new("ED-04", "timeout");
        assert_eq!(err.to_string(), "Error processing ED-04: timeout");
    }
}
