//! Error types for the tab bridge.
//!
//! This module defines all error types used throughout the crate.
//!
//! # Usage
//!
//! All fallible operations return [`Result<T>`] which uses [`Error`]:
//!
//! ```ignore
//! use tab_bridge::{Result, Error};
//!
//! async fn example(tabs: &dyn TabCapability) -> Result<()> {
//!     let all = tabs.list(&QueryFilter::empty()).await?;
//!     Ok(())
//! }
//! ```
//!
//! # Error Categories
//!
//! | Category | Variants |
//! |----------|----------|
//! | Decoding | [`Error::Decode`] |
//! | Capability | [`Error::Api`], [`Error::Script`] |
//! | Templates | [`Error::Template`] |
//! | Channel | [`Error::Connection`], [`Error::ConnectionClosed`] |
//! | Configuration | [`Error::Config`] |
//! | External | [`Error::Json`], [`Error::WebSocket`] |

// ============================================================================
// Imports
// ============================================================================

use std::result::Result as StdResult;

use thiserror::Error;
use tokio_tungstenite::tungstenite::Error as WsError;

// ============================================================================
// Result Alias
// ============================================================================

/// Result type alias using crate [`enum@Error`].
///
/// All fallible operations in this crate return this type.
pub type Result<T> = StdResult<T, Error>;

// ============================================================================
// Error Enum
// ============================================================================

/// Main error type for the crate.
///
/// Each variant includes relevant context for debugging.
#[derive(Error, Debug)]
pub enum Error {
    // ========================================================================
    // Decoding Errors
    // ========================================================================
    /// Malformed inbound data.
    ///
    /// Returned when an encoded query filter or a command payload
    /// cannot be decoded.
    #[error("Decode error: {message}")]
    Decode {
        /// Description of the decode failure.
        message: String,
    },

    // ========================================================================
    // Capability Errors
    // ========================================================================
    /// A tab-capability call was rejected by the vendor API.
    ///
    /// Returned when the underlying browser primitive signals failure,
    /// either through its settled future or through the out-of-band
    /// last-error slot.
    #[error("API error in {operation}: {message}")]
    Api {
        /// The vendor operation that failed (e.g. `tabs.move`).
        operation: String,
        /// Error message from the vendor API.
        message: String,
    },

    /// Content-script injection or execution failed on a tab.
    #[error("Script error: {message}")]
    Script {
        /// Error message from script execution.
        message: String,
    },

    // ========================================================================
    // Template Errors
    // ========================================================================
    /// A template substitution value was rejected.
    ///
    /// Returned when a caller-supplied slot value is not a JavaScript
    /// regex or string literal and would otherwise be injected verbatim.
    #[error("Template error: {message}")]
    Template {
        /// Description of the rejected value.
        message: String,
    },

    // ========================================================================
    // Channel Errors
    // ========================================================================
    /// Channel connection failed.
    ///
    /// Returned when the WebSocket connection to the host cannot be
    /// established.
    #[error("Connection failed: {message}")]
    Connection {
        /// Description of the connection error.
        message: String,
    },

    /// Channel connection closed.
    ///
    /// Returned when the connection to the host is lost mid-operation.
    #[error("Connection closed")]
    ConnectionClosed,

    // ========================================================================
    // Configuration Errors
    // ========================================================================
    /// Configuration error.
    ///
    /// Returned when session options are invalid or no vendor capability
    /// surface is present.
    #[error("Configuration error: {message}")]
    Config {
        /// Description of the configuration error.
        message: String,
    },

    // ========================================================================
    // External Errors
    // ========================================================================
    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// WebSocket error.
    #[error("WebSocket error: {0}")]
    WebSocket(#[from] WsError),
}

// ============================================================================
// Error Constructors
// ============================================================================

impl Error {
    /// Creates a decode error.
    #[inline]
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    /// Creates an API error for a vendor operation.
    #[inline]
    pub fn api(operation: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Api {
            operation: operation.into(),
            message: message.into(),
        }
    }

    /// Creates a script error.
    #[inline]
    pub fn script(message: impl Into<String>) -> Self {
        Self::Script {
            message: message.into(),
        }
    }

    /// Creates a template error.
    #[inline]
    pub fn template(message: impl Into<String>) -> Self {
        Self::Template {
            message: message.into(),
        }
    }

    /// Creates a connection error.
    #[inline]
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Creates a configuration error.
    #[inline]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }
}

// ============================================================================
// Error Predicates
// ============================================================================

impl Error {
    /// Returns `true` if this is a channel-level error.
    ///
    /// Channel errors trigger reconnection; everything else is handled
    /// locally by the affected operation.
    #[inline]
    #[must_use]
    pub fn is_channel_error(&self) -> bool {
        matches!(
            self,
            Self::Connection { .. } | Self::ConnectionClosed | Self::WebSocket(_)
        )
    }

    /// Returns `true` if this error is recovered inside a fan-out.
    ///
    /// Per-tab API and script failures are converted to an omitted or
    /// empty contribution; the batch continues.
    #[inline]
    #[must_use]
    pub fn is_per_tab_error(&self) -> bool {
        matches!(self, Self::Api { .. } | Self::Script { .. })
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::connection("host unreachable");
        assert_eq!(err.to_string(), "Connection failed: host unreachable");
    }

    #[test]
    fn test_api_error_display() {
        let err = Error::api("tabs.move", "no tab with id");
        assert_eq!(err.to_string(), "API error in tabs.move: no tab with id");
    }

    #[test]
    fn test_is_channel_error() {
        let conn_err = Error::connection("test");
        let closed_err = Error::ConnectionClosed;
        let other_err = Error::decode("test");

        assert!(conn_err.is_channel_error());
        assert!(closed_err.is_channel_error());
        assert!(!other_err.is_channel_error());
    }

    #[test]
    fn test_is_per_tab_error() {
        assert!(Error::api("tabs.update", "boom").is_per_tab_error());
        assert!(Error::script("threw").is_per_tab_error());
        assert!(!Error::decode("bad base64").is_per_tab_error());
        assert!(!Error::ConnectionClosed.is_per_tab_error());
    }

    #[test]
    fn test_from_json_error() {
        let json_err = serde_json::from_str::<String>("invalid").unwrap_err();
        let err: Error = json_err.into();
        assert!(matches!(err, Error::Json(_)));
    }
}
