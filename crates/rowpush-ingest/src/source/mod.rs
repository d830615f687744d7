//! Record sources
//!
//! A [`RecordSource`] turns a source id into raw rows. The coordinator only
//! ever talks to this trait, so the Postgres reader, the JSON file reader and
//! the in-memory test double are interchangeable.

use async_trait::async_trait;
use rowpush_common::Result;

use crate::record::RawRow;

pub mod json_file;
pub mod memory;
#[cfg(feature = "database")]
pub mod postgres;

pub use json_file::JsonFileSource;
pub use memory::MemorySource;
#[cfg(feature = "database")]
pub use postgres::PostgresSource;

/// Yields raw rows for a named source
#[async_trait]
pub trait RecordSource: Send + Sync {
    /// Read every row of `source_id`.
    ///
    /// Failures should be [`rowpush_common::SyncError::SourceRead`]; the
    /// coordinator records them and moves on to the next source.
    async fn fetch(&self, source_id: &str) -> Result<Vec<RawRow>>;

    /// Source ids this reader can currently serve, in a stable order
    async fn list_sources(&self) -> Result<Vec<String>>;

    /// Human-readable name for logs
    fn describe(&self) -> String;
}
