//! Error types for rowpush
//!
//! Configuration problems fail a run before any work starts. Source read and
//! transmission failures are normally captured into a delivery report rather
//! than returned, but they still have variants here so that collaborators can
//! describe them with the same vocabulary.

use thiserror::Error;

/// Result type alias for rowpush operations
pub type Result<T> = std::result::Result<T, SyncError>;

/// Main error type for rowpush
#[derive(Error, Debug)]
pub enum SyncError {
    /// Required configuration (sink URL, server variant) is absent
    #[error("Configuration missing: {0}")]
    ConfigurationMissing(String),

    /// A caller supplied an out-of-range parameter
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// A named source failed to yield rows
    #[error("Failed to read source '{source_id}': {message}")]
    SourceRead { source_id: String, message: String },

    /// A chunk could not be transmitted to the sink
    #[error("Transmission error: {0}")]
    Transmission(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl SyncError {
    pub fn configuration_missing(what: impl Into<String>) -> Self {
        Self::ConfigurationMissing(what.into())
    }

    pub fn invalid_configuration(msg: impl Into<String>) -> Self {
        Self::InvalidConfiguration(msg.into())
    }

    pub fn source_read(source_id: impl Into<String>, message: impl ToString) -> Self {
        Self::SourceRead {
            source_id: source_id.into(),
            message: message.to_string(),
        }
    }

    /// True for errors that must stop a run before it starts
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::ConfigurationMissing(_) | Self::InvalidConfiguration(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configuration_errors_are_flagged() {
        assert!(SyncError::configuration_missing("sink url").is_configuration());
        assert!(SyncError::invalid_configuration("chunk_size must be >= 1").is_configuration());
        assert!(!SyncError::source_read("ED-02", "login failed").is_configuration());
        assert!(!SyncError::Transmission("timeout".into()).is_configuration());
    }

    #[test]
    fn test_source_read_message_names_source() {
        let err = SyncError::source_read("ED-03", "connection refused");
        assert_eq!(
            err.to_string(),
            "Failed to read source 'ED-03': connection refused"
        );
    }
}
