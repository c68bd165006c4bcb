//! Channel session lifecycle.
//!
//! The session owns the WebSocket connection to the host process:
//! CONNECTING → CONNECTED → DISCONNECTED → CONNECTING, forever. On any
//! disconnect the close reason (when one was given) is logged and the
//! session immediately re-enters CONNECTING — no delay, no retry
//! ceiling. The host is expected to be local and near-instantly
//! reachable; under a genuinely flaky channel this loop spins hot.
//!
//! The vendor capability is detected once, at construction, and the
//! same instance serves every connection the session ever makes.
//!
//! The channel carries one logical command at a time: the pump
//! dispatches a frame to completion and sends its reply before reading
//! the next frame. Nothing here enforces mutual exclusion beyond that;
//! the host waits for each response by convention.

// ============================================================================
// Modules
// ============================================================================

/// Session configuration.
pub mod options;

// ============================================================================
// Imports
// ============================================================================

use std::sync::Arc;

use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use tracing::{debug, info, trace, warn};
use uuid::Uuid;

use crate::capability::{TabCapability, VendorSurfaces};
use crate::dispatch::Dispatcher;
use crate::error::{Error, Result};

pub use options::SessionOptions;

// ============================================================================
// SessionState
// ============================================================================

/// Where the session is in its connection loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Dialing the host.
    Connecting,
    /// Channel established, pumping commands.
    Connected,
    /// Channel lost; about to redial.
    Disconnected,
}

// ============================================================================
// ChannelSession
// ============================================================================

/// The bridge's connection to the host process.
pub struct ChannelSession {
    /// Session configuration.
    options: SessionOptions,
    /// Vendor capability, created once and kept across reconnects.
    tabs: Arc<dyn TabCapability>,
    /// Current lifecycle state.
    state: SessionState,
}

impl ChannelSession {
    /// Creates a session, detecting the vendor capability surface.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] when no vendor surface is present; the
    /// session then never exists, never connects, and no commands are
    /// ever processed.
    pub fn new(options: SessionOptions, surfaces: VendorSurfaces) -> Result<Self> {
        let tabs = surfaces
            .detect()
            .ok_or_else(|| Error::config("no vendor tab surface detected"))?;
        info!(browser = tabs.browser_name(), "Vendor surface detected");

        Ok(Self {
            options,
            tabs,
            state: SessionState::Connecting,
        })
    }

    /// Returns the session's capability.
    #[inline]
    #[must_use]
    pub fn capability(&self) -> Arc<dyn TabCapability> {
        Arc::clone(&self.tabs)
    }

    /// Returns the current lifecycle state.
    #[inline]
    #[must_use]
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Runs the connection loop. Never returns.
    ///
    /// Each disconnect produces exactly one new connection attempt;
    /// there are never two connections alive at once.
    pub async fn run(&mut self) {
        loop {
            self.state = SessionState::Connecting;
            let endpoint = self.options.endpoint().clone();
            debug!(endpoint = %endpoint, "Connecting to host");

            match connect_async(endpoint.as_str()).await {
                Ok((stream, _response)) => {
                    let session_id = Uuid::new_v4();
                    self.state = SessionState::Connected;
                    info!(%session_id, endpoint = %endpoint, "Connected to host");

                    match self.pump(stream).await {
                        Some(reason) => warn!(%session_id, %reason, "Disconnected"),
                        None => warn!(%session_id, "Disconnected, no reason given"),
                    }
                }
                Err(e) => {
                    let error = Error::from(e);
                    warn!(endpoint = %endpoint, error = %error, "Connection to host failed");
                }
            }

            self.state = SessionState::Disconnected;
            debug!("Trying to reconnect");
        }
    }

    /// Pumps command frames until the connection dies.
    ///
    /// Returns the close reason, when the peer supplied one.
    async fn pump(&self, stream: WebSocketStream<MaybeTlsStream<TcpStream>>) -> Option<String> {
        let dispatcher = Dispatcher::new(Arc::clone(&self.tabs));
        let (mut sink, mut source) = stream.split();

        while let Some(message) = source.next().await {
            match message {
                Ok(Message::Text(text)) => {
                    trace!(frame = %text, "Received command frame");

                    if let Some(reply) = dispatcher.dispatch_frame(&text).await {
                        let frame = reply.to_frame();
                        if let Err(e) = sink.send(Message::Text(frame.into())).await {
                            return Some(e.to_string());
                        }
                    }
                }

                Ok(Message::Close(frame)) => {
                    debug!("Channel closed by host");
                    return frame.map(|f| f.reason.to_string());
                }

                // Ignore Binary, Ping, Pong
                Ok(_) => {}

                Err(e) => return Some(e.to_string()),
            }
        }

        None
    }
}

// ============================================================================
// Tests
// ============================================================================
