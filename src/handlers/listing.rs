//! Listing handlers: list_tabs, query_tabs, get_active_tabs.

// ============================================================================
// Imports
// ============================================================================

use tracing::{debug, warn};

use crate::capability::{sort_canonical, QueryFilter, Tab, TabCapability};
use crate::protocol::{decode_query, tab_line, Reply};

// ============================================================================
// Handlers
// ============================================================================

/// Enumerates every tab as canonically ordered listing lines.
pub(crate) async fn list_tabs(tabs: &dyn TabCapability) -> Reply {
    match tabs.list(&QueryFilter::empty()).await {
        Ok(all) => lines_for(all),
        Err(e) => {
            warn!(error = %e, "Error listing tabs");
            Reply::empty()
        }
    }
}

/// Queries tabs with a host-encoded filter.
///
/// Decode and query failures both collapse to the empty response; the
/// host cannot distinguish a bad filter from one that matches nothing.
pub(crate) async fn query_tabs(tabs: &dyn TabCapability, query_info: &str) -> Reply {
    let filter = match decode_query(query_info) {
        Ok(filter) => filter,
        Err(e) => {
            warn!(error = %e, "Error decoding tab query");
            return Reply::empty();
        }
    };

    match tabs.query(&filter).await {
        Ok(matched) => lines_for(matched),
        Err(e) => {
            warn!(error = %e, "Error executing tab query");
            Reply::empty()
        }
    }
}

/// Reports the active tab of each window as a comma-joined id string.
pub(crate) async fn get_active_tabs(tabs: &dyn TabCapability) -> Reply {
    match tabs.get_active().await {
        Ok(active) => {
            let ids: Vec<String> = active.iter().map(|t| t.tab_ref().to_string()).collect();
            let joined = ids.join(",");
            debug!(active = %joined, "Active tabs");
            Reply::Text(joined)
        }
        Err(e) => {
            warn!(error = %e, "Error getting active tabs");
            Reply::Text(String::new())
        }
    }
}

/// Sorts canonically and renders listing lines.
fn lines_for(mut tabs: Vec<Tab>) -> Reply {
    sort_canonical(&mut tabs);
    Reply::Lines(tabs.iter().map(tab_line).collect())
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use base64::engine::general_purpose::STANDARD as Base64Standard;
    use base64::Engine;
    use serde_json::json;

    use crate::capability::mock::MockTabStore;
    use crate::capability::FutureBackedTabs;
    use crate::identifiers::TabId;

    use std::sync::Arc;

    fn seeded() -> (Arc<MockTabStore>, FutureBackedTabs) {
        let store = Arc::new(MockTabStore::with_tabs(vec![
            (2, 20, "late", "http://late.example"),
            (1, 11, "second", "http://second.example"),
            (1, 10, "first", "http://first.example"),
        ]));
        let adapter = FutureBackedTabs::new(store.clone());
        (store, adapter)
    }

    fn window_order(reply: &Reply) -> Vec<(u32, u32)> {
        let Reply::Lines(lines) = reply else {
            panic!("expected lines");
        };
        lines
            .iter()
            .map(|line| {
                let id = line.split('\t').next().expect("id column");
                let r: crate::identifiers::TabRef = id.parse().expect("composite id");
                (r.window_id.get(), r.tab_id.get())
            })
            .collect()
    }

    #[tokio::test]
    async fn test_list_tabs_canonical_order() {
        let (_, tabs) = seeded();
        let reply = list_tabs(&tabs).await;

        // Window ascending; index ascending within a window. The seed
        // order put window 2 first and reversed window 1.
        let order = window_order(&reply);
        assert_eq!(order, vec![(1, 11), (1, 10), (2, 20)]);

        let windows: Vec<u32> = order.iter().map(|(w, _)| *w).collect();
        let mut sorted = windows.clone();
        sorted.sort_unstable();
        assert_eq!(windows, sorted);
    }

    #[tokio::test]
    async fn test_list_tabs_line_shape() {
        let (_, tabs) = seeded();
        let Reply::Lines(lines) = list_tabs(&tabs).await else {
            panic!("expected lines");
        };
        assert_eq!(lines[0], "1.11\tsecond\thttp://second.example");
    }

    #[tokio::test]
    async fn test_query_tabs_coerced_filter() {
        let (store, tabs) = seeded();
        store.set_active(TabId::new(10));

        let encoded = Base64Standard.encode(json!({"active": "TRUE"}).to_string());
        let Reply::Lines(lines) = query_tabs(&tabs, &encoded).await else {
            panic!("expected lines");
        };
        assert_eq!(lines.len(), 1);
        assert!(lines[0].starts_with("1.10\t"));
    }

    #[tokio::test]
    async fn test_query_tabs_bad_encoding_yields_empty() {
        let (_, tabs) = seeded();
        let reply = query_tabs(&tabs, "!!definitely not base64!!").await;
        assert_eq!(reply, Reply::empty());
    }

    #[tokio::test]
    async fn test_query_tabs_by_window() {
        let (_, tabs) = seeded();
        let encoded = Base64Standard.encode(json!({"windowId": "2"}).to_string());
        let Reply::Lines(lines) = query_tabs(&tabs, &encoded).await else {
            panic!("expected lines");
        };
        assert_eq!(lines.len(), 1);
        assert!(lines[0].starts_with("2.20\t"));
    }

    #[tokio::test]
    async fn test_get_active_tabs_comma_joined() {
        let (store, tabs) = seeded();
        store.set_active(TabId::new(10));
        store.set_active(TabId::new(20));

        let Reply::Text(joined) = get_active_tabs(&tabs).await else {
            panic!("expected text");
        };
        let mut ids: Vec<&str> = joined.split(',').collect();
        ids.sort_unstable();
        assert_eq!(ids, vec!["1.10", "2.20"]);
    }

    #[tokio::test]
    async fn test_get_active_tabs_none_active() {
        let (_, tabs) = seeded();
        let reply = get_active_tabs(&tabs).await;
        assert_eq!(reply, Reply::Text(String::new()));
    }
}
