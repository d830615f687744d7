//! Error types for the rowpush CLI
//!
//! Messages are user-facing and say what to do next where there is a clear
//! next step.

use rowpush_common::SyncError;
use thiserror::Error;

/// Result type alias for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Error, Debug)]
pub enum CliError {
    /// Sink URL or server variant is not set anywhere
    #[error("Configuration missing: {0}. Pass it on the command line or save it with 'rowpush config set'.")]
    ConfigurationMissing(String),

    /// A flag or saved setting has an unusable value
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// A database or file could not be read
    #[error("Source error: {0}. Check the server URL, credentials and that the database is online (try 'rowpush check').")]
    Source(String),

    #[error("Transmission error: {0}")]
    Transmission(String),

    /// The run finished but lost records
    #[error("Delivery {status}: {failed_chunks} chunk(s) and {failed_sources} source(s) failed, see the report above")]
    Incomplete {
        status: String,
        failed_chunks: usize,
        failed_sources: usize,
    },

    /// Settings directory problems
    #[error("Configuration error: {0}. Check ROWPUSH_CONFIG_DIR and the directory permissions.")]
    Config(String),

    #[error("Prompt failed: {0}")]
    Prompt(#[from] inquire::InquireError),

    #[error("File operation failed: {0}. Check file permissions and disk space.")]
    Io(#[from] std::io::Error),

    #[error("Failed to encode JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl CliError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn configuration_missing(msg: impl Into<String>) -> Self {
        Self::ConfigurationMissing(msg.into())
    }
}

impl From<SyncError> for CliError {
    fn from(err: SyncError) -> Self {
        match err {
            SyncError::ConfigurationMissing(msg) => Self::ConfigurationMissing(msg),
            SyncError::InvalidConfiguration(msg) => Self::InvalidConfiguration(msg),
            err @ SyncError::SourceRead { .. } => Self::Source(err.to_string()),
            SyncError::Transmission(msg) => Self::Transmission(msg),
            SyncError::Io(e) => Self::Io(e),
            SyncError::Serialization(e) => Self::Json(e),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_configuration_message() {
        let err = CliError::from(SyncError::configuration_missing("sink URL is not set"));
        let message = err.to_string();
        assert!(message.starts_with("Configuration missing: sink URL is not set"));
        assert!(message.contains("rowpush config set"));
    }

    #[test]
    fn test_source_read_keeps_source_name() {
        let err = CliError::from(SyncError::source_read("ED-02", "connection refused"));
        assert!(matches!(err, CliError::Source(_)));
        assert!(err.to_string().contains("ED-02"));
    }

    #[test]
    fn test_io_and_serialization_keep_their_kind() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only");
        assert!(matches!(CliError::from(SyncError::Io(io)), CliError::Io(_)));

        let json = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        assert!(matches!(CliError::from(SyncError::Serialization(json)), CliError::Json(_)));
    }

    #[test]
    fn test_incomplete_message() {
        let err = CliError::Incomplete {
            status: "partial".into(),
            failed_chunks: 1,
            failed_sources: 2,
        };
        assert_eq!(
            err.to_string(),
            "Delivery partial: 1 chunk(s) and 2 source(s) failed, see the report above"
        );
    }
}
