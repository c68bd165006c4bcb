//! Session configuration.

// ============================================================================
// Imports
// ============================================================================

use url::Url;

use crate::error::{Error, Result};

// ============================================================================
// Constants
// ============================================================================

/// Default host endpoint: the conventional local mediator port.
pub const DEFAULT_ENDPOINT: &str = "ws://127.0.0.1:4625/";

// ============================================================================
// SessionOptions
// ============================================================================

/// Channel session configuration.
///
/// # Example
///
/// ```
/// use tab_bridge::SessionOptions;
///
/// let options = SessionOptions::new()
///     .with_endpoint("ws://127.0.0.1:4626/")
///     .unwrap();
/// assert_eq!(options.endpoint().port(), Some(4626));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionOptions {
    /// Host endpoint the bridge dials.
    endpoint: Url,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            endpoint: Url::parse(DEFAULT_ENDPOINT).expect("static endpoint"),
        }
    }
}

impl SessionOptions {
    /// Creates options with the default endpoint.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the host endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] when the endpoint does not parse or
    /// is not a `ws`/`wss` URL.
    pub fn with_endpoint(mut self, endpoint: impl AsRef<str>) -> Result<Self> {
        let url = Url::parse(endpoint.as_ref())
            .map_err(|e| Error::config(format!("bad endpoint: {e}")))?;

        match url.scheme() {
            "ws" | "wss" => {}
            other => {
                return Err(Error::config(format!(
                    "unsupported channel scheme: {other}"
                )));
            }
        }

        self.endpoint = url;
        Ok(self)
    }

    /// Returns the configured endpoint.
    #[inline]
    #[must_use]
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

// ============================================================================
// Tests
// ============================================================================
