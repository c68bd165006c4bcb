//! Channel protocol types.
//!
//! The host speaks JSON, one value per WebSocket text frame: inbound
//! command records discriminated by their `name` field, outbound
//! replies in one of a small set of fixed shapes. Decoding happens
//! exactly once, at the channel boundary.

// ============================================================================
// Modules
// ============================================================================

/// Inbound command records.
pub mod command;
/// Encoded query-filter decoding and coercion.
pub mod filter;
/// Outbound reply shapes.
pub mod reply;

// ============================================================================
// Re-exports
// ============================================================================

pub use command::{Command, MoveTriplet, UpdateSpec};
pub use filter::decode_query;
pub use reply::{tab_line, tab_line_with, Reply};
