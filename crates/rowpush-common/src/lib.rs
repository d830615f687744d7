//! rowpush common library
#![deny(clippy::unwrap_used, clippy::expect_used)]
//!
//! Shared error taxonomy, logging setup and small domain types used by every
//! rowpush workspace member.
//!
//! - **Error Handling**: [`SyncError`] and the [`Result`] alias
//! - **Logging**: [`logging::LogConfig`] and [`logging::init_logging`]
//! - **Types**: [`types::ServerVariant`]
//!
//! # Example
//!
//! ```no_run
//! use rowpush_common::{Result, SyncError};
//!
//! fn require_url(url: Option<&str>) -> Result<&str> {
//!     url.filter(|u| !u.trim().is_empty())
//!         .ok_or_else(|| SyncError::configuration_missing("sink url"))
//! }
//! ```

pub mod error;
pub mod logging;
pub mod types;

pub use error::{Result, SyncError};
pub use types::ServerVariant;
