//! Command dispatch.
//!
//! One decoded command in, at most one reply out. The union of
//! commands is closed and matched exhaustively; a frame that does not
//! decode — unknown name, malformed payload — is dropped with no
//! response and no error report. That silence is a documented protocol
//! gap, not an accident: the host owns command sequencing and treats a
//! missing reply as its own bug to find.

// ============================================================================
// Imports
// ============================================================================

use std::sync::Arc;

use tracing::debug;

use crate::capability::TabCapability;
use crate::handlers::{extract, listing, mutate};
use crate::protocol::{Command, Reply};

// ============================================================================
// Dispatcher
// ============================================================================

/// Routes inbound commands to their operation handlers.
///
/// Holds the session's capability; command records are never mutated,
/// only consumed.
pub struct Dispatcher {
    /// The session's tab capability.
    tabs: Arc<dyn TabCapability>,
}

impl Dispatcher {
    /// Creates a dispatcher over a capability.
    #[inline]
    #[must_use]
    pub fn new(tabs: Arc<dyn TabCapability>) -> Self {
        Self { tabs }
    }

    /// Decodes one channel frame and dispatches it.
    ///
    /// Returns `None` both for commands that never reply and for
    /// frames that fail to decode.
    pub async fn dispatch_frame(&self, frame: &str) -> Option<Reply> {
        match Command::decode(frame) {
            Ok(command) => {
                debug!(?command, "Received command");
                self.dispatch(command).await
            }
            Err(e) => {
                // Unknown command names land here: dropped, no reply.
                debug!(error = %e, "Dropping undecodable command frame");
                None
            }
        }
    }

    /// Dispatches one decoded command.
    pub async fn dispatch(&self, command: Command) -> Option<Reply> {
        let tabs = self.tabs.as_ref();
        match command {
            Command::ListTabs => Some(listing::list_tabs(tabs).await),
            Command::QueryTabs { query_info } => {
                Some(listing::query_tabs(tabs, &query_info).await)
            }
            Command::CloseTabs { tab_ids } => Some(mutate::close_tabs(tabs, tab_ids).await),
            Command::MoveTabs { move_triplets } => {
                Some(mutate::move_tabs(tabs, move_triplets).await)
            }
            Command::OpenUrls { urls, window_id } => {
                Some(mutate::open_urls(tabs, urls, window_id).await)
            }
            Command::NewTab { url } => Some(mutate::new_tab(tabs, url).await),
            Command::UpdateTabs { updates } => Some(mutate::update_tabs(tabs, updates).await),
            Command::ActivateTab { tab_id, focused } => {
                mutate::activate_tab(tabs, tab_id, focused).await;
                None
            }
            Command::GetActiveTabs => Some(listing::get_active_tabs(tabs).await),
            Command::GetWords {
                tab_id,
                match_regex,
                join_with,
            } => extract::get_words(tabs, tab_id, &match_regex, &join_with).await,
            Command::GetText {
                delimiter_regex,
                replace_with,
            } => Some(extract::get_text(tabs, &delimiter_regex, &replace_with).await),
            Command::GetHtml {
                delimiter_regex,
                replace_with,
            } => Some(extract::get_html(tabs, &delimiter_regex, &replace_with).await),
            Command::GetBrowser => Some(extract::get_browser(tabs).await),
        }
    }
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
    use crate::capability::{CallbackBackedTabs, FutureBackedTabs};
    use crate::identifiers::TabId;

    fn dispatcher_over(store: Arc<MockTabStore>) -> Dispatcher {
        Dispatcher::new(Arc::new(FutureBackedTabs::new(store)))
    }

    fn seeded_store() -> Arc<MockTabStore> {
        Arc::new(MockTabStore::with_tabs(vec![
            (1, 10, "docs", "http://docs.example"),
            (1, 11, "mail", "http://mail.example"),
            (2, 20, "news", "http://news.example"),
        ]))
    }

    #[tokio::test]
    async fn test_unknown_command_dropped_silently() {
        let dispatcher = dispatcher_over(seeded_store());
        let reply = dispatcher
            .dispatch_frame(r#"{"name": "rewind_history"}"#)
            .await;
        assert_eq!(reply, None);
    }

    #[tokio::test]
    async fn test_malformed_frame_dropped_silently() {
        let dispatcher = dispatcher_over(seeded_store());
        assert_eq!(dispatcher.dispatch_frame("{{{{").await, None);
        assert_eq!(dispatcher.dispatch_frame(r#"{"no_name": 1}"#).await, None);
    }

    #[tokio::test]
    async fn test_list_tabs_end_to_end() {
        let dispatcher = dispatcher_over(seeded_store());
        let reply = dispatcher
            .dispatch_frame(r#"{"name": "list_tabs"}"#)
            .await
            .expect("reply");

        assert_eq!(
            reply.to_value(),
            json!([
                "1.10\tdocs\thttp://docs.example",
                "1.11\tmail\thttp://mail.example",
                "2.20\tnews\thttp://news.example"
            ])
        );
    }

    #[tokio::test]
    async fn test_query_tabs_end_to_end() {
        let store = seeded_store();
        store.set_active(TabId::new(11));
        let dispatcher = dispatcher_over(store);

        let encoded = Base64Standard.encode(json!({"active": "TRUE"}).to_string());
        let frame = json!({"name": "query_tabs", "query_info": encoded}).to_string();
        let reply = dispatcher.dispatch_frame(&frame).await.expect("reply");

        assert_eq!(reply.to_value(), json!(["1.11\tmail\thttp://mail.example"]));
    }

    #[tokio::test]
    async fn test_move_tabs_end_to_end() {
        let store = seeded_store();
        let dispatcher = dispatcher_over(store.clone());

        let frame = r#"{"name": "move_tabs", "move_triplets": [[10, 1, 1], [11, 1, 0]]}"#;
        let reply = dispatcher.dispatch_frame(frame).await.expect("reply");

        assert_eq!(reply.to_value(), json!("OK"));
        assert!(!store.move_overlap_detected());
        assert_eq!(store.move_log().len(), 2);
    }

    #[tokio::test]
    async fn test_activate_tab_has_no_reply() {
        let store = seeded_store();
        let dispatcher = dispatcher_over(store.clone());

        let reply = dispatcher
            .dispatch_frame(r#"{"name": "activate_tab", "tab_id": 20, "focused": true}"#)
            .await;

        assert_eq!(reply, None);
        assert!(store.focused_window().is_some());
    }

    #[tokio::test]
    async fn test_get_browser_over_callback_adapter() {
        let store = seeded_store();
        let dispatcher = Dispatcher::new(Arc::new(CallbackBackedTabs::new(store)));

        let reply = dispatcher
            .dispatch_frame(r#"{"name": "get_browser"}"#)
            .await
            .expect("reply");
        assert_eq!(reply.to_value(), json!("chrome/chromium"));
    }

    #[tokio::test]
    async fn test_get_active_tabs_end_to_end() {
        let store = seeded_store();
        store.set_active(TabId::new(10));
        store.set_active(TabId::new(20));
        let dispatcher = dispatcher_over(store);

        let reply = dispatcher
            .dispatch_frame(r#"{"name": "get_active_tabs"}"#)
            .await
            .expect("reply");

        let Reply::Text(joined) = reply else {
            panic!("expected text");
        };
        let mut ids: Vec<&str> = joined.split(',').collect();
        ids.sort_unstable();
        assert_eq!(ids, vec!["1.10", "2.20"]);
    }

    #[tokio::test]
    async fn test_command_pipeline_is_stateless_between_frames() {
        let dispatcher = dispatcher_over(seeded_store());

        let first = dispatcher
            .dispatch_frame(r#"{"name": "new_tab", "url": "http://a.example"}"#)
            .await
            .expect("reply");
        let second = dispatcher
            .dispatch_frame(r#"{"name": "new_tab", "url": "http://b.example"}"#)
            .await
            .expect("reply");

        let (Reply::Lines(a), Reply::Lines(b)) = (first, second) else {
            panic!("expected lines");
        };
        assert_ne!(a, b);
    }
}
