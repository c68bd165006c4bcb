//! Operation handlers.
//!
//! One async function per command kind, built on the capability
//! surface, the aggregation primitives and the script templates. A
//! handler owns its operation's failure policy: batch members recover
//! locally, top-level failures degrade to the operation's empty shape
//! so the host is never left waiting on a response that will not come.

// ============================================================================
// Modules
// ============================================================================

/// Word/text/HTML extraction and the vendor name.
pub(crate) mod extract;
/// Tab listings: list, query, active tabs.
pub(crate) mod listing;
/// Tab mutation: move, close, open, create, update, activate.
pub(crate) mod mutate;
