//! Adapter for the future-settled vendor surface.

// ============================================================================
// Imports
// ============================================================================

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::debug;

use crate::error::{Error, Result};
use crate::identifiers::TabId;

use super::vendor::FutureTabApi;
use super::{CreateOptions, MoveOptions, QueryFilter, Tab, TabCapability, UpdateProps};

// ============================================================================
// FutureBackedTabs
// ============================================================================

/// [`TabCapability`] over a [`FutureTabApi`] surface.
///
/// Settlement already carries success or failure, so adaptation is a
/// straight await plus error mapping and result shaping.
pub struct FutureBackedTabs {
    /// The wrapped vendor surface.
    api: Arc<dyn FutureTabApi>,
}

impl FutureBackedTabs {
    /// Wraps a future-settled vendor surface.
    #[inline]
    #[must_use]
    pub fn new(api: Arc<dyn FutureTabApi>) -> Self {
        Self { api }
    }

    /// Shapes a vendor tab-array value into typed tabs.
    fn tabs_from(value: Value) -> Result<Vec<Tab>> {
        Ok(serde_json::from_value(value)?)
    }

    /// Shapes a vendor tab value into a typed tab.
    fn tab_from(value: Value) -> Result<Tab> {
        Ok(serde_json::from_value(value)?)
    }
}

#[async_trait]
impl TabCapability for FutureBackedTabs {
    async fn list(&self, filter: &QueryFilter) -> Result<Vec<Tab>> {
        let raw = self
            .api
            .query(filter.to_value())
            .await
            .map_err(|e| Error::api("tabs.query", e.to_string()))?;
        Self::tabs_from(raw)
    }

    async fn query(&self, filter: &QueryFilter) -> Result<Vec<Tab>> {
        self.list(filter).await
    }

    async fn close(&self, tab_ids: &[TabId]) -> Result<()> {
        self.api
            .remove(json!(tab_ids))
            .await
            .map_err(|e| Error::api("tabs.remove", e.to_string()))?;
        Ok(())
    }

    async fn move_tab(&self, tab_id: TabId, to: MoveOptions) -> Result<Tab> {
        let raw = self
            .api
            .move_tab(tab_id, serde_json::to_value(to)?)
            .await
            .map_err(|e| Error::api("tabs.move", e.to_string()))?;
        Self::tab_from(raw)
    }

    async fn update(&self, tab_id: TabId, props: &UpdateProps) -> Result<Tab> {
        let raw = self
            .api
            .update(tab_id, props.to_value())
            .await
            .map_err(|e| Error::api("tabs.update", e.to_string()))?;
        Self::tab_from(raw)
    }

    async fn create(&self, opts: CreateOptions) -> Result<Tab> {
        let raw = self
            .api
            .create(serde_json::to_value(&opts)?)
            .await
            .map_err(|e| Error::api("tabs.create", e.to_string()))?;
        Self::tab_from(raw)
    }

    async fn activate(&self, tab_id: TabId, focused: bool) -> Result<()> {
        // Three vendor calls, strictly in this order: activating the tab
        // does not focus its window, and the window is only known after
        // reading the tab back.
        self.api
            .update(tab_id, json!({"active": true}))
            .await
            .map_err(|e| Error::api("tabs.update", e.to_string()))?;

        let tab = Self::tab_from(
            self.api
                .get(tab_id)
                .await
                .map_err(|e| Error::api("tabs.get", e.to_string()))?,
        )?;

        self.api
            .update_window(tab.window_id, focused)
            .await
            .map_err(|e| Error::api("windows.update", e.to_string()))?;

        debug!(%tab_id, window_id = %tab.window_id, focused, "Tab activated");
        Ok(())
    }

    async fn get_active(&self) -> Result<Vec<Tab>> {
        let raw = self
            .api
            .query(QueryFilter::active_only().to_value())
            .await
            .map_err(|e| Error::api("tabs.query", e.to_string()))?;
        Self::tabs_from(raw)
    }

    async fn run_script(&self, tab_id: TabId, code: &str) -> Result<Value> {
        self.api
            .execute_script(tab_id, code.to_string())
            .await
            .map_err(|e| Error::script(e.to_string()))
    }

    fn browser_name(&self) -> &'static str {
        "firefox"
    }
}

// ============================================================================
// Tests
// ============================================================================
