//! rowpush ingest library
#![deny(clippy::unwrap_used, clippy::expect_used)]
//!
//! Reads rows from named sources, normalizes them and delivers them to an
//! HTTP sink in fixed-size chunks with bounded exponential-backoff retries.
//!
//! # Pipeline
//!
//! - **Read** ([`source`]): a [`RecordSource`] yields raw rows per source id
//!   (Postgres databases, JSON export files)
//! - **Normalize** ([`normalize`]): raw rows become [`Record`]s with an
//!   allow-listed set of fields and a source tag
//! - **Chunk** ([`chunk`]): records are split into ordered, fixed-size chunks
//! - **Send** ([`sink`]): each chunk is one HTTP POST of a JSON array
//! - **Retry** ([`retry`]): failed sends are retried with exponential backoff
//! - **Deliver** ([`engine`]): chunks go out strictly one after another and
//!   every chunk ends up in the [`DeliveryReport`]
//! - **Coordinate** ([`coordinator`]): several sources are read in order,
//!   a failing source is recorded and skipped
//!
//! # Example
//!
//! ```no_run
//! use rowpush_ingest::{
//!     Coordinator, DeliveryConfig, DeliveryEngine, HttpSink, Normalizer,
//!     source::JsonFileSource,
//! };
//!
//! #[tokio::main]
//! async fn main() -> rowpush_common::Result<()> {
//!     let config = DeliveryConfig::default();
//!     let sink = HttpSink::new("https://sink.example.com/exec", config.timeout)?;
//!     let engine = DeliveryEngine::new(sink, config)?;
//!     let coordinator = Coordinator::new(JsonFileSource, Normalizer::default(), engine);
//!
//!     let report = coordinator.run(&["export.json".to_string()]).await?;
//!     println!("{} of {} records delivered", report.records_delivered(), report.total_records());
//!     Ok(())
//! }
//! ```

pub mod chunk;
pub mod config;
pub mod coordinator;
pub mod engine;
pub mod normalize;
pub mod record;
pub mod report;
pub mod retry;
pub mod sink;
pub mod source;

pub use chunk::{chunk, Chunk, Chunks};
pub use config::DeliveryConfig;
pub use coordinator::{collect_records, Coordinator};
pub use engine::DeliveryEngine;
pub use normalize::{cleanse_phone, Normalizer};
pub use record::{FieldValue, RawRow, RawValue, Record, SOURCE_TAG_KEY};
pub use report::{ChunkOutcome, ChunkReport, DeliveryReport, FailedChunk, ReportBuilder, RunStatus, SourceError};
pub use retry::RetryPolicy;
pub use sink::{HttpSink, Sink, SinkResponse, TransmissionError};
pub use source::RecordSource;
