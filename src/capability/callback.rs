//! Adapter for the callback-settled vendor surface.
//!
//! The vendor primitive fires a one-shot callback and reports failure
//! only through an out-of-band last-error slot. The adapter bridges
//! each call onto a oneshot channel, awaits the completion, then
//! consults the slot — exactly once, before issuing anything else.

// ============================================================================
// Imports
// ============================================================================

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};
use tokio::sync::oneshot;
use tracing::debug;

use crate::error::{Error, Result};
use crate::identifiers::TabId;

use super::vendor::{CallbackTabApi, Completion};
use super::{CreateOptions, MoveOptions, QueryFilter, Tab, TabCapability, UpdateProps};

// ============================================================================
// CallbackBackedTabs
// ============================================================================

/// [`TabCapability`] over a [`CallbackTabApi`] surface.
pub struct CallbackBackedTabs {
    /// The wrapped vendor surface.
    api: Arc<dyn CallbackTabApi>,
}

impl CallbackBackedTabs {
    /// Wraps a callback-settled vendor surface.
    #[inline]
    #[must_use]
    pub fn new(api: Arc<dyn CallbackTabApi>) -> Self {
        Self { api }
    }

    /// Issues one vendor primitive and awaits its completion.
    ///
    /// The last-error slot is read after the callback fires; a set slot
    /// means the call failed regardless of the value delivered. A
    /// completion dropped without firing also fails the call.
    async fn call<F>(&self, operation: &'static str, issue: F) -> Result<Value>
    where
        F: FnOnce(Completion),
    {
        let (tx, rx) = oneshot::channel();
        issue(Box::new(move |value| {
            let _ = tx.send(value);
        }));

        let value = rx
            .await
            .map_err(|_| Error::api(operation, "completion dropped without firing"))?;

        if let Some(message) = self.api.last_error() {
            return Err(Error::api(operation, message));
        }
        Ok(value)
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
impl TabCapability for CallbackBackedTabs {
    async fn list(&self, filter: &QueryFilter) -> Result<Vec<Tab>> {
        let info = filter.to_value();
        let raw = self
            .call("tabs.query", |done| self.api.query(info, done))
            .await?;
        Self::tabs_from(raw)
    }

    async fn query(&self, filter: &QueryFilter) -> Result<Vec<Tab>> {
        self.list(filter).await
    }

    async fn close(&self, tab_ids: &[TabId]) -> Result<()> {
        let ids = json!(tab_ids);
        self.call("tabs.remove", |done| self.api.remove(ids, done))
            .await?;
        Ok(())
    }

    async fn move_tab(&self, tab_id: TabId, to: MoveOptions) -> Result<Tab> {
        let opts = serde_json::to_value(to)?;
        let raw = self
            .call("tabs.move", |done| self.api.move_tab(tab_id, opts, done))
            .await?;
        Self::tab_from(raw)
    }

    async fn update(&self, tab_id: TabId, props: &UpdateProps) -> Result<Tab> {
        let props = props.to_value();
        let raw = self
            .call("tabs.update", |done| self.api.update(tab_id, props, done))
            .await?;
        Self::tab_from(raw)
    }

    async fn create(&self, opts: CreateOptions) -> Result<Tab> {
        let props = serde_json::to_value(&opts)?;
        let raw = self
            .call("tabs.create", |done| self.api.create(props, done))
            .await?;
        Self::tab_from(raw)
    }

    async fn activate(&self, tab_id: TabId, focused: bool) -> Result<()> {
        // Same strict three-step order as the future-settled adapter.
        self.call("tabs.update", |done| {
            self.api.update(tab_id, json!({"active": true}), done)
        })
        .await?;

        let tab = Self::tab_from(self.call("tabs.get", |done| self.api.get(tab_id, done)).await?)?;

        self.call("windows.update", |done| {
            self.api.update_window(tab.window_id, focused, done)
        })
        .await?;

        debug!(%tab_id, window_id = %tab.window_id, focused, "Tab activated");
        Ok(())
    }

    async fn get_active(&self) -> Result<Vec<Tab>> {
        let info = QueryFilter::active_only().to_value();
        let raw = self
            .call("tabs.query", |done| self.api.query(info, done))
            .await?;
        Self::tabs_from(raw)
    }

    async fn run_script(&self, tab_id: TabId, code: &str) -> Result<Value> {
        let code = code.to_string();
        self.call("tabs.executeScript", |done| {
            self.api.execute_script(tab_id, code, done)
        })
        .await
        .map_err(|e| match e {
            Error::Api { message, .. } => Error::script(message),
            other => other,
        })
    }

    fn browser_name(&self) -> &'static str {
        "chrome/chromium"
    }
}

// ============================================================================
// Tests
// ============================================================================
