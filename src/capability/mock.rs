//! In-memory vendor surface for tests.
//!
//! [`MockTabStore`] keeps a small tab table and implements both vendor
//! traits over it, so the same scenario can drive either adapter. It
//! supports targeted failure injection and records vendor calls for
//! ordering assertions.

// ============================================================================
// Imports
// ============================================================================

use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;
use rustc_hash::FxHashSet;
use serde_json::{json, Value};

use crate::identifiers::{TabId, WindowId};

use super::vendor::{CallbackTabApi, Completion, FutureTabApi, VendorError, VendorResult};
use super::Tab;

// ============================================================================
// MockTabStore
// ============================================================================

/// Shared mutable state of the store.
#[derive(Default)]
struct Inner {
    /// Tabs in vendor order.
    tabs: Vec<Tab>,
    /// Per-tab script results; tabs without an entry get a default.
    script_results: Vec<(TabId, Value)>,
    /// Tabs whose updates fail.
    failing_updates: FxHashSet<TabId>,
    /// Tabs whose script injections fail.
    failing_scripts: FxHashSet<TabId>,
    /// URLs whose creation fails.
    failing_urls: FxHashSet<String>,
    /// Last window-focus request.
    window_focus: Option<(WindowId, bool)>,
    /// Vendor operations in issue order.
    call_log: Vec<&'static str>,
    /// Moves in settlement order.
    move_log: Vec<(TabId, WindowId, u32)>,
    /// Out-of-band failure slot for the callback surface.
    last_error: Option<String>,
}

/// An in-memory tab table implementing both vendor surfaces.
#[derive(Default)]
pub struct MockTabStore {
    inner: Mutex<Inner>,
    next_tab_id: AtomicU32,
    /// When set, callback primitives drop their completion unfired.
    drop_completions: AtomicBool,
    /// Set while a move is pending; a second pending move is an overlap.
    move_in_flight: AtomicBool,
    /// Latches whether two moves were ever pending at once.
    move_overlap: AtomicBool,
}

impl MockTabStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        let store = Self::default();
        store.next_tab_id.store(100, Ordering::SeqCst);
        store
    }

    /// Creates a store seeded with `(window, id, title, url)` tabs.
    ///
    /// Index within each window follows the seeding order.
    #[must_use]
    pub fn with_tabs(seed: Vec<(u32, u32, &str, &str)>) -> Self {
        let store = Self::new();
        {
            let mut inner = store.inner.lock();
            for (window, id, title, url) in seed {
                let index = inner
                    .tabs
                    .iter()
                    .filter(|t| t.window_id == WindowId::new(window))
                    .count() as u32;
                inner.tabs.push(Tab {
                    id: TabId::new(id),
                    window_id: WindowId::new(window),
                    index,
                    title: title.to_string(),
                    url: url.to_string(),
                    active: false,
                    pinned: false,
                    discarded: false,
                });
            }
        }
        store
    }

    // ------------------------------------------------------------------------
    // Scenario configuration
    // ------------------------------------------------------------------------

    /// Marks a tab as active, clearing the flag on its window siblings.
    pub fn set_active(&self, tab_id: TabId) {
        let mut inner = self.inner.lock();
        let window = inner
            .tabs
            .iter()
            .find(|t| t.id == tab_id)
            .map(|t| t.window_id);
        if let Some(window) = window {
            for tab in &mut inner.tabs {
                if tab.window_id == window {
                    tab.active = tab.id == tab_id;
                }
            }
        }
    }

    /// Marks a tab as discarded.
    pub fn set_discarded(&self, tab_id: TabId) {
        let mut inner = self.inner.lock();
        if let Some(tab) = inner.tabs.iter_mut().find(|t| t.id == tab_id) {
            tab.discarded = true;
        }
    }

    /// Sets the script result delivered for a tab.
    pub fn set_script_result(&self, tab_id: TabId, result: Value) {
        self.inner.lock().script_results.push((tab_id, result));
    }

    /// Makes updates fail for a tab.
    pub fn fail_updates_on(&self, tab_id: TabId) {
        self.inner.lock().failing_updates.insert(tab_id);
    }

    /// Makes script injection fail for a tab.
    pub fn fail_scripts_on(&self, tab_id: TabId) {
        self.inner.lock().failing_scripts.insert(tab_id);
    }

    /// Makes creation fail for a URL.
    pub fn fail_create_for(&self, url: impl Into<String>) {
        self.inner.lock().failing_urls.insert(url.into());
    }

    /// Makes callback primitives drop their completion without firing.
    pub fn drop_completions(&self) {
        self.drop_completions.store(true, Ordering::SeqCst);
    }

    // ------------------------------------------------------------------------
    // Observations
    // ------------------------------------------------------------------------

    /// Tabs currently in the store, vendor order.
    #[must_use]
    pub fn tabs(&self) -> Vec<Tab> {
        self.inner.lock().tabs.clone()
    }

    /// Window of the last focus request, if any.
    #[must_use]
    pub fn focused_window(&self) -> Option<WindowId> {
        self.inner.lock().window_focus.map(|(w, _)| w)
    }

    /// Vendor operations in issue order.
    #[must_use]
    pub fn call_log(&self) -> Vec<String> {
        self.inner
            .lock()
            .call_log
            .iter()
            .map(|s| (*s).to_string())
            .collect()
    }

    /// Settled moves in settlement order.
    #[must_use]
    pub fn move_log(&self) -> Vec<(TabId, WindowId, u32)> {
        self.inner.lock().move_log.clone()
    }

    /// Whether two moves were ever pending at the same time.
    #[must_use]
    pub fn move_overlap_detected(&self) -> bool {
        self.move_overlap.load(Ordering::SeqCst)
    }

    // ------------------------------------------------------------------------
    // Shared operations
    // ------------------------------------------------------------------------

    fn log(&self, operation: &'static str) {
        self.inner.lock().call_log.push(operation);
    }

    fn op_query(&self, info: &Value) -> VendorResult {
        let inner = self.inner.lock();
        let matches = |tab: &Tab| -> bool {
            let Some(filter) = info.as_object() else {
                return true;
            };
            filter.iter().all(|(key, value)| match key.as_str() {
                "active" => Some(tab.active) == value.as_bool(),
                "pinned" => Some(tab.pinned) == value.as_bool(),
                "discarded" => Some(tab.discarded) == value.as_bool(),
                "windowId" => Some(u64::from(tab.window_id.get())) == value.as_u64(),
                "index" => Some(u64::from(tab.index)) == value.as_u64(),
                _ => true,
            })
        };

        let selected: Vec<&Tab> = inner.tabs.iter().filter(|t| matches(t)).collect();
        Ok(serde_json::to_value(selected).expect("tabs serialize"))
    }

    fn op_remove(&self, tab_ids: &Value) -> VendorResult {
        let ids: Vec<TabId> = serde_json::from_value(tab_ids.clone())
            .map_err(|e| VendorError::new(format!("bad id list: {e}")))?;
        let mut inner = self.inner.lock();
        inner.tabs.retain(|t| !ids.contains(&t.id));
        Ok(Value::Null)
    }

    fn op_move(&self, tab_id: TabId, opts: &Value) -> VendorResult {
        let mut inner = self.inner.lock();
        let window_id = opts
            .get("windowId")
            .and_then(Value::as_u64)
            .map(|w| WindowId::new(w as u32));
        let index = opts.get("index").and_then(Value::as_u64).map(|i| i as u32);

        let tab = inner
            .tabs
            .iter_mut()
            .find(|t| t.id == tab_id)
            .ok_or_else(|| VendorError::new(format!("no tab with id {tab_id}")))?;

        if let Some(window_id) = window_id {
            tab.window_id = window_id;
        }
        if let Some(index) = index {
            tab.index = index;
        }
        let moved = tab.clone();
        inner
            .move_log
            .push((moved.id, moved.window_id, moved.index));
        Ok(serde_json::to_value(&moved).expect("tab serializes"))
    }

    fn op_update(&self, tab_id: TabId, props: &Value) -> VendorResult {
        let mut inner = self.inner.lock();
        if inner.failing_updates.contains(&tab_id) {
            return Err(VendorError::new(format!("cannot update tab {tab_id}")));
        }

        let tab = inner
            .tabs
            .iter_mut()
            .find(|t| t.id == tab_id)
            .ok_or_else(|| VendorError::new(format!("no tab with id {tab_id}")))?;

        if let Some(props) = props.as_object() {
            if let Some(active) = props.get("active").and_then(Value::as_bool) {
                tab.active = active;
            }
            if let Some(pinned) = props.get("pinned").and_then(Value::as_bool) {
                tab.pinned = pinned;
            }
            if let Some(url) = props.get("url").and_then(Value::as_str) {
                tab.url = url.to_string();
            }
        }
        let updated = tab.clone();
        Ok(serde_json::to_value(&updated).expect("tab serializes"))
    }

    fn op_create(&self, props: &Value) -> VendorResult {
        let url = props
            .get("url")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        let window_id = props
            .get("windowId")
            .and_then(Value::as_u64)
            .map_or(WindowId::new(1), |w| WindowId::new(w as u32));

        let mut inner = self.inner.lock();
        if inner.failing_urls.contains(&url) {
            return Err(VendorError::new(format!("cannot open {url}")));
        }

        let id = TabId::new(self.next_tab_id.fetch_add(1, Ordering::SeqCst));
        let index = inner
            .tabs
            .iter()
            .filter(|t| t.window_id == window_id)
            .count() as u32;
        let tab = Tab {
            id,
            window_id,
            index,
            title: String::new(),
            url,
            active: false,
            pinned: false,
            discarded: false,
        };
        inner.tabs.push(tab.clone());
        Ok(serde_json::to_value(&tab).expect("tab serializes"))
    }

    fn op_get(&self, tab_id: TabId) -> VendorResult {
        let inner = self.inner.lock();
        inner
            .tabs
            .iter()
            .find(|t| t.id == tab_id)
            .map(|t| serde_json::to_value(t).expect("tab serializes"))
            .ok_or_else(|| VendorError::new(format!("no tab with id {tab_id}")))
    }

    fn op_update_window(&self, window_id: WindowId, focused: bool) -> VendorResult {
        self.inner.lock().window_focus = Some((window_id, focused));
        Ok(Value::Null)
    }

    fn op_execute_script(&self, tab_id: TabId) -> VendorResult {
        let inner = self.inner.lock();
        if inner.failing_scripts.contains(&tab_id) {
            return Err(VendorError::new(format!(
                "script injection refused on tab {tab_id}"
            )));
        }
        if !inner.tabs.iter().any(|t| t.id == tab_id) {
            return Err(VendorError::new(format!("no tab with id {tab_id}")));
        }

        let configured = inner
            .script_results
            .iter()
            .rev()
            .find(|(id, _)| *id == tab_id)
            .map(|(_, value)| value.clone());
        Ok(configured.unwrap_or_else(|| json!([format!("content of tab {tab_id}")])))
    }
}

// ============================================================================
// FutureTabApi Implementation
// ============================================================================

#[async_trait]
impl FutureTabApi for MockTabStore {
    async fn query(&self, info: Value) -> VendorResult {
        self.log("tabs.query");
        self.op_query(&info)
    }

    async fn remove(&self, tab_ids: Value) -> VendorResult {
        self.log("tabs.remove");
        self.op_remove(&tab_ids)
    }

    async fn move_tab(&self, tab_id: TabId, opts: Value) -> VendorResult {
        self.log("tabs.move");
        if self.move_in_flight.swap(true, Ordering::SeqCst) {
            self.move_overlap.store(true, Ordering::SeqCst);
        }
        // Let concurrently issued moves interleave so overlap is visible.
        tokio::task::yield_now().await;
        let result = self.op_move(tab_id, &opts);
        self.move_in_flight.store(false, Ordering::SeqCst);
        result
    }

    async fn update(&self, tab_id: TabId, props: Value) -> VendorResult {
        self.log("tabs.update");
        self.op_update(tab_id, &props)
    }

    async fn create(&self, props: Value) -> VendorResult {
        self.log("tabs.create");
        self.op_create(&props)
    }

    async fn get(&self, tab_id: TabId) -> VendorResult {
        self.log("tabs.get");
        self.op_get(tab_id)
    }

    async fn update_window(&self, window_id: WindowId, focused: bool) -> VendorResult {
        self.log("windows.update");
        self.op_update_window(window_id, focused)
    }

    async fn execute_script(&self, tab_id: TabId, _code: String) -> VendorResult {
        self.log("tabs.executeScript");
        self.op_execute_script(tab_id)
    }
}

// ============================================================================
// CallbackTabApi Implementation
// ============================================================================

impl MockTabStore {
    /// Completes one callback primitive, filling the last-error slot.
    fn complete(&self, result: VendorResult, done: Completion) {
        if self.drop_completions.load(Ordering::SeqCst) {
            return;
        }
        let (value, error) = match result {
            Ok(value) => (value, None),
            Err(e) => (Value::Null, Some(e.message)),
        };
        self.inner.lock().last_error = error;
        done(value);
    }
}

impl CallbackTabApi for MockTabStore {
    fn query(&self, info: Value, done: Completion) {
        self.log("tabs.query");
        self.complete(self.op_query(&info), done);
    }

    fn remove(&self, tab_ids: Value, done: Completion) {
        self.log("tabs.remove");
        self.complete(self.op_remove(&tab_ids), done);
    }

    fn move_tab(&self, tab_id: TabId, opts: Value, done: Completion) {
        self.log("tabs.move");
        self.complete(self.op_move(tab_id, &opts), done);
    }

    fn update(&self, tab_id: TabId, props: Value, done: Completion) {
        self.log("tabs.update");
        self.complete(self.op_update(tab_id, &props), done);
    }

    fn create(&self, props: Value, done: Completion) {
        self.log("tabs.create");
        self.complete(self.op_create(&props), done);
    }

    fn get(&self, tab_id: TabId, done: Completion) {
        self.log("tabs.get");
        self.complete(self.op_get(tab_id), done);
    }

    fn update_window(&self, window_id: WindowId, focused: bool, done: Completion) {
        self.log("windows.update");
        self.complete(self.op_update_window(window_id, focused), done);
    }

    fn execute_script(&self, tab_id: TabId, _code: String, done: Completion) {
        self.log("tabs.executeScript");
        self.complete(self.op_execute_script(tab_id), done);
    }

    fn last_error(&self) -> Option<String> {
        self.inner.lock().last_error.clone()
    }
}

// ============================================================================
// Tests
// ============================================================================
