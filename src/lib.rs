//! Tab Bridge - browser tab command bridge.
//!
//! This library implements the in-page command bridge of a
//! tab-management tool: it holds a persistent bidirectional channel to
//! an external host process, turns inbound control commands into
//! browser tab operations, and turns the (often multi-tab,
//! asynchronous) results back into deterministic responses.
//!
//! # Architecture
//!
//! The bridge sits between two collaborators it does not own:
//!
//! - **Host process**: sends one JSON command per WebSocket text frame
//!   and blocks for the reply before sending the next.
//! - **Vendor tab surface**: the browser's tab primitives, injected as
//!   one of two trait shapes — future-settled or callback-settled with
//!   an out-of-band last-error check.
//!
//! Key design principles:
//!
//! - One capability contract ([`TabCapability`]), two vendor adapters;
//!   callers never know which is active
//! - Commands decoded exactly once, at the channel boundary, into a
//!   closed union; unknown names are dropped, not errored
//! - Parallel fan-out with per-tab failure isolation everywhere except
//!   the move batch, which is a strict sequential chain
//! - Multi-tab responses in canonical (window, index) order, always,
//!   independent of async completion order
//! - Channel loss triggers immediate, unconditional, unbounded
//!   reconnection
//!
//! # Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use tab_bridge::{ChannelSession, SessionOptions, VendorSurfaces};
//! use tab_bridge::capability::mock::MockTabStore;
//!
//! #[tokio::main]
//! async fn main() -> tab_bridge::Result<()> {
//!     // A vendor surface is injected; the mock store works for demos.
//!     let surface = Arc::new(MockTabStore::new());
//!
//!     let options = SessionOptions::new().with_endpoint("ws://127.0.0.1:4625/")?;
//!     let mut session = ChannelSession::new(options, VendorSurfaces::future(surface))?;
//!
//!     // Serve commands until the process is killed.
//!     session.run().await;
//!     Ok(())
//! }
//! ```
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`aggregate`] | Fan-out/fan-in and sequential-chain primitives |
//! | [`capability`] | [`TabCapability`] contract and vendor adapters |
//! | [`dispatch`] | Command routing |
//! | [`error`] | Error types and [`Result`] alias |
//! | [`identifiers`] | Type-safe tab/window IDs and composite refs |
//! | [`protocol`] | Command, filter and reply wire types |
//! | [`scripts`] | Extraction script templates |
//! | [`session`] | Channel lifecycle and reconnection |

// ============================================================================
// Modules
// ============================================================================

/// Fan-out/fan-in and sequential-chain primitives.
pub mod aggregate;

/// Tab capability contract and the two vendor adapters.
pub mod capability;

/// Command dispatch.
pub mod dispatch;

/// Error types and result aliases.
///
/// All fallible operations return [`Result<T>`] which uses [`Error`].
pub mod error;

/// Type-safe identifiers for tabs and windows.
///
/// Newtype wrappers prevent mixing incompatible IDs at compile time.
pub mod identifiers;

/// Channel protocol: commands, filters, replies.
pub mod protocol;

/// Extraction script templates and slot validation.
pub mod scripts;

/// Channel session lifecycle.
pub mod session;

mod handlers;

// ============================================================================
// Re-exports
// ============================================================================

// Capability types
pub use capability::{
    CallbackBackedTabs, CallbackTabApi, CreateOptions, FutureBackedTabs, FutureTabApi,
    MoveOptions, QueryFilter, Tab, TabCapability, UpdateProps, VendorError, VendorSurfaces,
};

// Dispatch types
pub use dispatch::Dispatcher;

// Error types
pub use error::{Error, Result};

// Identifier types
pub use identifiers::{TabId, TabRef, WindowId};

// Protocol types
pub use protocol::{Command, MoveTriplet, Reply, UpdateSpec};

// Session types
pub use session::{ChannelSession, SessionOptions, SessionState};
