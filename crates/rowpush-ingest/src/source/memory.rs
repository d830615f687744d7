//! In-memory source

use async_trait::async_trait;
use rowpush_common::{Result, SyncError};
use std::collections::BTreeMap;

use super::RecordSource;
use crate::record::RawRow;

/// Rows (or a canned failure) per source id, held in memory
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    sources: BTreeMap<String, std::result::Result<Vec<RawRow>, String>>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rows(mut self, source_id: impl Into<String>, rows: Vec<RawRow>) -> Self {
        self.sources.insert(source_id.into(), Ok(rows));
        self
    }

    /// Make `source_id` fail with `message` on every fetch
    pub fn with_failure(mut self, source_id: impl Into<String>, message: impl Into<String>) -> Self {
        self.sources.insert(source_id.into(), Err(message.into()));
        self
    }
}

#[async_trait]
impl RecordSource for MemorySource {
    async fn fetch(&self, source_id: &str) -> Result<Vec<RawRow>> {
        match self.sources.get(source_id) {
            Some(Ok(rows)) => Ok(rows.clone()),
            Some(Err(message)) => Err(SyncError::source_read(source_id, message)),
            None => Err(SyncError::source_read(source_id, "unknown source")),
        }
    }

    async fn list_sources(&self) -> Result<Vec<String>> {
        Ok(self.sources.keys().cloned().collect())
    }

    fn describe(&self) -> String {
        format!("memory ({} sources)", self.sources.len())
    }
}
