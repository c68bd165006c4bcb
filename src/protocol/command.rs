//! Inbound command records.
//!
//! A command is a discriminated JSON object: the `name` field selects
//! the variant, the remaining fields are the variant's payload. The
//! union is closed — a frame whose name matches no variant fails to
//! decode and is dropped by the dispatcher.

// ============================================================================
// Imports
// ============================================================================

use serde::Deserialize;

use crate::capability::UpdateProps;
use crate::error::{Error, Result};
use crate::identifiers::{TabId, WindowId};

// ============================================================================
// Command
// ============================================================================

/// All commands the host can issue.
///
/// # Wire Format
///
/// ```json
/// {"name": "move_tabs", "move_triplets": [[1, 10, 0], [2, 10, 1]]}
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "name", rename_all = "snake_case")]
pub enum Command {
    /// Enumerate all tabs.
    ListTabs,

    /// Query tabs with an encoded filter.
    QueryTabs {
        /// Base64-encoded JSON filter object.
        query_info: String,
    },

    /// Close a set of tabs.
    CloseTabs {
        /// Tabs to remove.
        tab_ids: Vec<TabId>,
    },

    /// Move tabs, strictly in batch order.
    MoveTabs {
        /// Ordered `(tabId, windowId, newIndex)` triplets.
        move_triplets: Vec<MoveTriplet>,
    },

    /// Open several URLs as new tabs.
    OpenUrls {
        /// URLs to open.
        urls: Vec<String>,
        /// Target window; vendor default when absent.
        #[serde(default)]
        window_id: Option<WindowId>,
    },

    /// Open one URL as a new tab.
    NewTab {
        /// URL to open.
        url: String,
    },

    /// Update properties on a batch of tabs.
    UpdateTabs {
        /// Independent per-tab updates.
        updates: Vec<UpdateSpec>,
    },

    /// Make a tab active and focus its window.
    ActivateTab {
        /// Tab to activate.
        tab_id: TabId,
        /// Whether the owning window should take focus.
        #[serde(default)]
        focused: bool,
    },

    /// Report the active tab of each window.
    GetActiveTabs,

    /// Extract words from a tab, or from the active tabs.
    GetWords {
        /// Target tab; active tabs when absent.
        #[serde(default)]
        tab_id: Option<TabId>,
        /// Word pattern slot.
        match_regex: String,
        /// Join slot.
        join_with: String,
    },

    /// Extract flattened text from all eligible tabs.
    GetText {
        /// Delimiter pattern slot.
        delimiter_regex: String,
        /// Replacement slot.
        replace_with: String,
    },

    /// Extract flattened markup from all eligible tabs.
    GetHtml {
        /// Delimiter pattern slot.
        delimiter_regex: String,
        /// Replacement slot.
        replace_with: String,
    },

    /// Report the vendor name.
    GetBrowser,
}

impl Command {
    /// Decodes one command frame.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Decode`] for malformed JSON, an unknown `name`,
    /// or a payload that does not match the named variant.
    pub fn decode(frame: &str) -> Result<Self> {
        serde_json::from_str(frame).map_err(|e| Error::decode(format!("bad command frame: {e}")))
    }
}

// ============================================================================
// MoveTriplet
// ============================================================================

/// One step of a move batch: `(tabId, windowId, newIndex)`.
///
/// Position in the batch encodes required execution order: a later
/// index is only meaningful once the earlier moves have settled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct MoveTriplet(pub TabId, pub WindowId, pub u32);

// ============================================================================
// UpdateSpec
// ============================================================================

/// One item of an update batch, independent of its siblings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct UpdateSpec {
    /// Tab to update.
    pub tab_id: TabId,
    /// Vendor-understood properties, passed through untouched.
    #[serde(default)]
    pub properties: UpdateProps,
}

// ============================================================================
// Tests
// ============================================================================
