//! Tab capability surface.
//!
//! One uniform contract over the browser's tab primitives, with two
//! adapters bridging the two incompatible vendor API shapes:
//!
//! - [`FutureBackedTabs`] wraps a vendor surface whose primitives are
//!   settled futures ([`FutureTabApi`]).
//! - [`CallbackBackedTabs`] wraps a vendor surface whose primitives
//!   complete through one-shot callbacks plus an out-of-band last-error
//!   check ([`CallbackTabApi`]).
//!
//! Callers hold an `Arc<dyn TabCapability>` and cannot tell which
//! variant is active. The capability is created once per session and
//! persists across channel reconnects.

// ============================================================================
// Modules
// ============================================================================

/// Adapter for the callback-settled vendor surface.
pub mod callback;
/// Adapter for the future-settled vendor surface.
pub mod future;
/// In-memory vendor surface for tests and downstream integration.
pub mod mock;
/// Vendor-surface traits and detection.
pub mod vendor;

// ============================================================================
// Imports
// ============================================================================

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::Result;
use crate::identifiers::{TabId, TabRef, WindowId};

pub use callback::CallbackBackedTabs;
pub use future::FutureBackedTabs;
pub use vendor::{CallbackTabApi, FutureTabApi, VendorError, VendorSurfaces};

// ============================================================================
// Tab
// ============================================================================

/// A browser tab as reported by the vendor surface.
///
/// Identity within a browsing session is the (window, tab) pair; see
/// [`TabRef`] for the external rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tab {
    /// Tab identifier.
    pub id: TabId,

    /// Owning window.
    #[serde(rename = "windowId")]
    pub window_id: WindowId,

    /// Position of the tab within its window.
    pub index: u32,

    /// Page title.
    #[serde(default)]
    pub title: String,

    /// Page URL.
    #[serde(default)]
    pub url: String,

    /// Whether the tab is the active one in its window.
    #[serde(default)]
    pub active: bool,

    /// Whether the tab is pinned.
    #[serde(default)]
    pub pinned: bool,

    /// Whether the tab has been unloaded from memory.
    #[serde(default)]
    pub discarded: bool,
}

impl Tab {
    /// Returns the composite external reference for this tab.
    #[inline]
    #[must_use]
    pub const fn tab_ref(&self) -> TabRef {
        TabRef::new(self.window_id, self.id)
    }
}

/// Sorts tabs into canonical order: window ascending, index ascending.
///
/// Every multi-tab listing response uses this order, independent of the
/// order in which the underlying async calls settled.
pub fn sort_canonical(tabs: &mut [Tab]) {
    tabs.sort_by(|a, b| {
        a.window_id
            .cmp(&b.window_id)
            .then_with(|| a.index.cmp(&b.index))
    });
}

// ============================================================================
// Operation Arguments
// ============================================================================

/// Filter passed to vendor `query`/`list` primitives.
///
/// Stored as the raw JSON object the vendor expects. Constructors cover
/// the fixed filters the bridge itself issues; host-supplied filters
/// are decoded by [`crate::protocol::decode_query`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryFilter(Map<String, Value>);

impl QueryFilter {
    /// No filtering: every tab matches.
    #[inline]
    #[must_use]
    pub fn empty() -> Self {
        Self(Map::new())
    }

    /// Only currently active tabs (one per window).
    #[must_use]
    pub fn active_only() -> Self {
        let mut map = Map::new();
        map.insert("active".to_string(), Value::Bool(true));
        Self(map)
    }

    /// Only eligible tabs: those not unloaded from memory.
    #[must_use]
    pub fn not_discarded() -> Self {
        let mut map = Map::new();
        map.insert("discarded".to_string(), Value::Bool(false));
        Self(map)
    }

    /// Wraps an already-coerced filter object.
    #[inline]
    #[must_use]
    pub fn from_map(map: Map<String, Value>) -> Self {
        Self(map)
    }

    /// Returns the vendor-facing JSON object.
    #[inline]
    #[must_use]
    pub fn to_value(&self) -> Value {
        Value::Object(self.0.clone())
    }

    /// Read access for tests and diagnostics.
    #[inline]
    #[must_use]
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }
}

/// Target position for a tab move.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct MoveOptions {
    /// New index within the target window.
    pub index: u32,

    /// Target window.
    #[serde(rename = "windowId")]
    pub window_id: WindowId,
}

/// Properties for tab creation.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CreateOptions {
    /// URL the new tab opens.
    pub url: String,

    /// Window to create the tab in; vendor default when absent.
    #[serde(rename = "windowId", skip_serializing_if = "Option::is_none")]
    pub window_id: Option<WindowId>,
}

impl CreateOptions {
    /// Creates options for a URL in the vendor-chosen window.
    #[inline]
    #[must_use]
    pub fn for_url(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            window_id: None,
        }
    }

    /// Pins the new tab to a specific window.
    #[inline]
    #[must_use]
    pub fn in_window(mut self, window_id: WindowId) -> Self {
        self.window_id = Some(window_id);
        self
    }
}

/// Opaque property bag for tab updates.
///
/// The host sends arbitrary vendor-understood properties; the bridge
/// passes them through without interpretation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UpdateProps(Value);

impl UpdateProps {
    /// Wraps a raw properties value.
    #[inline]
    #[must_use]
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    /// Returns the vendor-facing JSON value.
    #[inline]
    #[must_use]
    pub fn to_value(&self) -> Value {
        self.0.clone()
    }
}

// ============================================================================
// TabCapability
// ============================================================================

/// Uniform contract over the browser tab primitives.
///
/// Every operation either succeeds with the expected value or fails
/// with the underlying API error; adapters never produce a
/// wrong-shaped success.
#[async_trait]
pub trait TabCapability: Send + Sync {
    /// Enumerates tabs matching the filter.
    async fn list(&self, filter: &QueryFilter) -> Result<Vec<Tab>>;

    /// Queries tabs matching the filter.
    async fn query(&self, filter: &QueryFilter) -> Result<Vec<Tab>>;

    /// Removes the given tabs.
    async fn close(&self, tab_ids: &[TabId]) -> Result<()>;

    /// Moves one tab to a new window/index position.
    async fn move_tab(&self, tab_id: TabId, to: MoveOptions) -> Result<Tab>;

    /// Updates properties of one tab.
    async fn update(&self, tab_id: TabId, props: &UpdateProps) -> Result<Tab>;

    /// Creates a tab.
    async fn create(&self, opts: CreateOptions) -> Result<Tab>;

    /// Makes a tab active and focuses its window.
    ///
    /// Compound operation, strictly ordered: set the tab active, read
    /// the tab back to learn its window, then ask for that window to be
    /// focused. Setting a tab active alone does not focus its window.
    async fn activate(&self, tab_id: TabId, focused: bool) -> Result<()>;

    /// Returns the active tab of each window.
    async fn get_active(&self) -> Result<Vec<Tab>>;

    /// Injects and runs a content script in one tab.
    ///
    /// The result is the vendor's raw value: an array with one entry
    /// per frame the script ran in.
    async fn run_script(&self, tab_id: TabId, code: &str) -> Result<Value>;

    /// Static vendor name.
    fn browser_name(&self) -> &'static str;
}

// ============================================================================
// Tests
// ============================================================================
