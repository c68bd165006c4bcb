//! Mutation handlers: move, close, open, create, update, activate.

// ============================================================================
// Imports
// ============================================================================

use tracing::{debug, warn};

use crate::aggregate::{chain, gather};
use crate::capability::{CreateOptions, MoveOptions, TabCapability};
use crate::identifiers::{TabId, WindowId};
use crate::protocol::{MoveTriplet, Reply, UpdateSpec};

// ============================================================================
// Handlers
// ============================================================================

/// Applies a move batch strictly in order, then acknowledges.
///
/// Later triplets are positioned relative to the state earlier moves
/// produce, so move *i+1* is only issued after move *i* has settled.
/// An empty batch still acknowledges — the host blocks on the reply —
/// with zero vendor calls.
pub(crate) async fn move_tabs(tabs: &dyn TabCapability, move_triplets: Vec<MoveTriplet>) -> Reply {
    debug!(count = move_triplets.len(), "Moving tabs");

    let result = chain(move_triplets, |MoveTriplet(tab_id, window_id, index)| {
        async move {
            tabs.move_tab(tab_id, MoveOptions { index, window_id }).await?;
            Ok(())
        }
    })
    .await;

    if let Err(e) = result {
        // Remaining triplets were computed against positions that no
        // longer exist; the chain stops rather than guessing.
        warn!(error = %e, "Move chain stopped early");
    }
    Reply::Ok
}

/// Removes a set of tabs, then acknowledges.
pub(crate) async fn close_tabs(tabs: &dyn TabCapability, tab_ids: Vec<TabId>) -> Reply {
    debug!(?tab_ids, "Closing tabs");
    if let Err(e) = tabs.close(&tab_ids).await {
        warn!(error = %e, "Error removing tabs");
    }
    Reply::Ok
}

/// Opens URLs as new tabs in parallel.
///
/// The join barrier waits for every creation; failures are logged and
/// omitted from the result. An empty input performs no vendor calls.
/// The id order is not guaranteed to match the input order.
pub(crate) async fn open_urls(
    tabs: &dyn TabCapability,
    urls: Vec<String>,
    window_id: Option<WindowId>,
) -> Reply {
    if urls.is_empty() {
        debug!("Opening urls done");
        return Reply::empty();
    }

    let units: Vec<_> = urls
        .into_iter()
        .map(|url| {
            debug!(%url, "Opening url");
            tabs.create(CreateOptions { url, window_id })
        })
        .collect();

    let mut ids = Vec::new();
    for result in gather(units).await {
        match result {
            Ok(tab) => ids.push(tab.tab_ref().to_string()),
            Err(e) => warn!(error = %e, "Error opening url"),
        }
    }
    debug!(count = ids.len(), "Opened urls");
    Reply::Lines(ids)
}

/// Opens a single URL as a new tab.
pub(crate) async fn new_tab(tabs: &dyn TabCapability, url: String) -> Reply {
    match tabs.create(CreateOptions::for_url(url)).await {
        Ok(tab) => {
            debug!(id = %tab.id, "Created new tab");
            Reply::Lines(vec![tab.tab_ref().to_string()])
        }
        Err(e) => {
            warn!(error = %e, "Error creating tab");
            Reply::empty()
        }
    }
}

/// Applies independent tab updates in parallel.
///
/// A failing item is logged and omitted from the result — no
/// placeholder, no retry. Successes are returned as composite ids,
/// order not guaranteed.
pub(crate) async fn update_tabs(tabs: &dyn TabCapability, updates: Vec<UpdateSpec>) -> Reply {
    if updates.is_empty() {
        debug!("Updating tabs done");
        return Reply::empty();
    }

    let units: Vec<_> = updates
        .iter()
        .map(|spec| async move { tabs.update(spec.tab_id, &spec.properties).await })
        .collect();

    let mut ids = Vec::new();
    for (spec, result) in updates.iter().zip(gather(units).await) {
        match result {
            Ok(tab) => ids.push(tab.tab_ref().to_string()),
            Err(e) => warn!(tab_id = %spec.tab_id, error = %e, "Could not update tab"),
        }
    }
    debug!(count = ids.len(), "Updated tabs");
    Reply::Lines(ids)
}

/// Makes a tab active and focuses its window. Best-effort: no reply.
pub(crate) async fn activate_tab(tabs: &dyn TabCapability, tab_id: TabId, focused: bool) {
    if let Err(e) = tabs.activate(tab_id, focused).await {
        warn!(%tab_id, error = %e, "Error activating tab");
    }
}

// ============================================================================
// Tests
// ============================================================================
