//! Vendor-surface traits.
//!
//! The two underlying tab APIs are shaped differently and cannot be
//! unified below this point:
//!
//! - [`FutureTabApi`]: every primitive settles a future; failure
//!   travels inside the settlement.
//! - [`CallbackTabApi`]: every primitive completes through a one-shot
//!   callback, and failure is only visible through the out-of-band
//!   [`CallbackTabApi::last_error`] slot, which must be consulted after
//!   the callback has fired.
//!
//! Both speak raw vendor JSON ([`serde_json::Value`]); shaping into
//! [`super::Tab`] happens in the adapters.

// ============================================================================
// Imports
// ============================================================================

use std::fmt;
use std::result::Result as StdResult;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::identifiers::{TabId, WindowId};

use super::callback::CallbackBackedTabs;
use super::future::FutureBackedTabs;
use super::TabCapability;

// ============================================================================
// VendorError
// ============================================================================

/// Failure reported by a vendor primitive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VendorError {
    /// Vendor-provided failure message.
    pub message: String,
}

impl VendorError {
    /// Creates a vendor error.
    #[inline]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for VendorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Result of a future-settled vendor primitive.
pub type VendorResult = StdResult<Value, VendorError>;

// ============================================================================
// FutureTabApi
// ============================================================================

/// Vendor surface whose primitives are settled futures.
#[async_trait]
pub trait FutureTabApi: Send + Sync {
    /// Queries tabs matching a filter object.
    async fn query(&self, info: Value) -> VendorResult;

    /// Removes tabs by id.
    async fn remove(&self, tab_ids: Value) -> VendorResult;

    /// Moves a tab to a new position.
    async fn move_tab(&self, tab_id: TabId, opts: Value) -> VendorResult;

    /// Updates properties of a tab, returning the updated tab.
    async fn update(&self, tab_id: TabId, props: Value) -> VendorResult;

    /// Creates a tab, returning it.
    async fn create(&self, props: Value) -> VendorResult;

    /// Reads one tab back by id.
    async fn get(&self, tab_id: TabId) -> VendorResult;

    /// Updates window state (focus).
    async fn update_window(&self, window_id: WindowId, focused: bool) -> VendorResult;

    /// Injects and runs a content script in a tab.
    async fn execute_script(&self, tab_id: TabId, code: String) -> VendorResult;
}

// ============================================================================
// CallbackTabApi
// ============================================================================

/// One-shot completion callback of a callback-settled primitive.
///
/// The callback receives the raw result value; `Value::Null` when the
/// primitive produces none. Whether the call actually succeeded is
/// decided by [`CallbackTabApi::last_error`] afterwards.
pub type Completion = Box<dyn FnOnce(Value) + Send + 'static>;

/// Vendor surface whose primitives complete through callbacks.
///
/// The surface may also drop a completion without firing it; adapters
/// must treat that as a failed call rather than hanging forever.
pub trait CallbackTabApi: Send + Sync {
    /// Queries tabs matching a filter object.
    fn query(&self, info: Value, done: Completion);

    /// Removes tabs by id.
    fn remove(&self, tab_ids: Value, done: Completion);

    /// Moves a tab to a new position.
    fn move_tab(&self, tab_id: TabId, opts: Value, done: Completion);

    /// Updates properties of a tab.
    fn update(&self, tab_id: TabId, props: Value, done: Completion);

    /// Creates a tab.
    fn create(&self, props: Value, done: Completion);

    /// Reads one tab back by id.
    fn get(&self, tab_id: TabId, done: Completion);

    /// Updates window state (focus).
    fn update_window(&self, window_id: WindowId, focused: bool, done: Completion);

    /// Injects and runs a content script in a tab.
    fn execute_script(&self, tab_id: TabId, code: String, done: Completion);

    /// Out-of-band failure slot for the most recent completed call.
    ///
    /// Valid only when read inside the completion turn, before the next
    /// primitive is issued.
    fn last_error(&self) -> Option<String>;
}

// ============================================================================
// VendorSurfaces
// ============================================================================

/// The vendor surfaces present in this environment.
///
/// At most one is expected; when both are present the future-settled
/// surface wins, matching the original probe order.
#[derive(Default)]
pub struct VendorSurfaces {
    /// Future-settled surface, if present.
    pub future_api: Option<Arc<dyn FutureTabApi>>,
    /// Callback-settled surface, if present.
    pub callback_api: Option<Arc<dyn CallbackTabApi>>,
}

impl VendorSurfaces {
    /// Declares a future-settled surface.
    #[must_use]
    pub fn future(api: Arc<dyn FutureTabApi>) -> Self {
        Self {
            future_api: Some(api),
            callback_api: None,
        }
    }

    /// Declares a callback-settled surface.
    #[must_use]
    pub fn callback(api: Arc<dyn CallbackTabApi>) -> Self {
        Self {
            future_api: None,
            callback_api: Some(api),
        }
    }

    /// Selects the matching capability adapter.
    ///
    /// Returns `None` when no surface is present; the session then
    /// never connects and no commands are processed.
    #[must_use]
    pub fn detect(self) -> Option<Arc<dyn TabCapability>> {
        if let Some(api) = self.future_api {
            return Some(Arc::new(FutureBackedTabs::new(api)));
        }
        if let Some(api) = self.callback_api {
            return Some(Arc::new(CallbackBackedTabs::new(api)));
        }
        None
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use crate::capability::mock::MockTabStore;

    #[test]
    fn test_detect_prefers_future_surface() {
        let store = Arc::new(MockTabStore::new());
        let surfaces = VendorSurfaces {
            future_api: Some(store.clone()),
            callback_api: Some(store),
        };

        let capability = surfaces.detect().expect("surface present");
        assert_eq!(capability.browser_name(), "firefox");
    }

    #[test]
    fn test_detect_falls_back_to_callback_surface() {
        let store = Arc::new(MockTabStore::new());
        let capability = VendorSurfaces::callback(store).detect().expect("present");
        assert_eq!(capability.browser_name(), "chrome/chromium");
    }

    #[test]
    fn test_detect_none_when_no_surface() {
        assert!(VendorSurfaces::default().detect().is_none());
    }
}
