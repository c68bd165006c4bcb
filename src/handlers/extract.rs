//! Extraction handlers: get_words, get_text, get_html, get_browser.

// ============================================================================
// Imports
// ============================================================================

use serde_json::Value;
use tracing::{debug, warn};

use crate::aggregate::gather;
use crate::capability::{sort_canonical, QueryFilter, TabCapability};
use crate::error::Result;
use crate::identifiers::TabId;
use crate::protocol::{tab_line_with, Reply};
use crate::scripts;

// ============================================================================
// Script Result Shaping
// ============================================================================

/// Normalizes a raw script result into its item list.
///
/// The vendor delivers one entry per frame the script ran in; a single
/// null entry means the script produced nothing.
fn list_or(value: Value) -> Vec<Value> {
    match value {
        Value::Array(items) => {
            if items.len() == 1 && items[0].is_null() {
                Vec::new()
            } else {
                items
            }
        }
        Value::Null => Vec::new(),
        other => vec![other],
    }
}

/// Extracts the top-frame payload of a script result.
fn first_string(value: &Value) -> String {
    match value {
        Value::Array(items) => items
            .first()
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
        Value::String(text) => text.clone(),
        _ => String::new(),
    }
}

// ============================================================================
// get_words
// ============================================================================

/// Extracts words from one tab, or from the currently active tabs.
///
/// With a tab id the raw extracted value is returned as-is; a failed
/// injection reports nothing at all. Without a tab id the script runs
/// on every active tab in parallel and the extracted values are
/// concatenated into one flat response; failing tabs contribute
/// nothing.
pub(crate) async fn get_words(
    tabs: &dyn TabCapability,
    tab_id: Option<TabId>,
    match_regex: &str,
    join_with: &str,
) -> Option<Reply> {
    let script = match scripts::words_script(match_regex, join_with) {
        Ok(script) => script,
        Err(e) => {
            warn!(error = %e, "Rejected word-extraction slot values");
            return match tab_id {
                Some(_) => None,
                None => Some(Reply::Values(Vec::new())),
            };
        }
    };

    match tab_id {
        Some(tab_id) => {
            debug!(%tab_id, "Getting words from tab");
            match tabs.run_script(tab_id, &script).await {
                Ok(value) => Some(Reply::Values(list_or(value))),
                Err(e) => {
                    warn!(%tab_id, error = %e, "Could not get words from tab");
                    None
                }
            }
        }
        None => {
            debug!("Getting words for active tabs");
            let active = match tabs.get_active().await {
                Ok(active) => active,
                Err(e) => {
                    warn!(error = %e, "Error getting active tabs");
                    return Some(Reply::Values(Vec::new()));
                }
            };

            let units: Vec<_> = active
                .iter()
                .map(|tab| {
                    let script = &script;
                    async move { tabs.run_script(tab.id, script).await }
                })
                .collect();

            let mut words = Vec::new();
            for result in gather(units).await {
                match result {
                    Ok(value) => words.extend(list_or(value)),
                    Err(e) => warn!(error = %e, "Could not get words from tab"),
                }
            }
            debug!(count = words.len(), "Total number of words");
            Some(Reply::Values(words))
        }
    }
}

// ============================================================================
// get_text / get_html
// ============================================================================

/// Extracts flattened text from every eligible tab.
pub(crate) async fn get_text(
    tabs: &dyn TabCapability,
    delimiter_regex: &str,
    replace_with: &str,
) -> Reply {
    extract_pages(tabs, scripts::text_script, delimiter_regex, replace_with).await
}

/// Extracts flattened markup from every eligible tab.
pub(crate) async fn get_html(
    tabs: &dyn TabCapability,
    delimiter_regex: &str,
    replace_with: &str,
) -> Reply {
    extract_pages(tabs, scripts::html_script, delimiter_regex, replace_with).await
}

/// Shared text/HTML extraction.
///
/// Eligible tabs (not discarded) are sorted canonically before the
/// fan-out; the gather preserves that order regardless of completion
/// order. Every eligible tab yields exactly one line — a failing or
/// empty script contributes an empty payload column, never a missing
/// line.
async fn extract_pages(
    tabs: &dyn TabCapability,
    template: fn(&str, &str) -> Result<String>,
    delimiter_regex: &str,
    replace_with: &str,
) -> Reply {
    let script = match template(delimiter_regex, replace_with) {
        Ok(script) => script,
        Err(e) => {
            warn!(error = %e, "Rejected extraction slot values");
            return Reply::empty();
        }
    };

    let mut eligible = match tabs.list(&QueryFilter::not_discarded()).await {
        Ok(eligible) => eligible,
        Err(e) => {
            warn!(error = %e, "Error listing eligible tabs");
            return Reply::empty();
        }
    };
    sort_canonical(&mut eligible);
    debug!(count = eligible.len(), "Extracting from tabs");

    let units: Vec<_> = eligible
        .iter()
        .map(|tab| {
            let script = &script;
            async move { tabs.run_script(tab.id, script).await }
        })
        .collect();

    let results = gather(units).await;
    let lines = eligible
        .iter()
        .zip(results)
        .map(|(tab, result)| {
            let payload = match result {
                Ok(value) => first_string(&value),
                Err(e) => {
                    debug!(tab_id = %tab.id, error = %e, "Could not extract from tab");
                    String::new()
                }
            };
            tab_line_with(tab, &payload)
        })
        .collect();
    Reply::Lines(lines)
}

// ============================================================================
// get_browser
// ============================================================================

/// Reports the vendor name.
pub(crate) async fn get_browser(tabs: &dyn TabCapability) -> Reply {
    let name = tabs.browser_name();
    debug!(name, "Sending browser name");
    Reply::Text(name.to_string())
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::Arc;

    use serde_json::json;

    use crate::capability::mock::MockTabStore;
    use crate::capability::FutureBackedTabs;

    fn seeded() -> (Arc<MockTabStore>, FutureBackedTabs) {
        let store = Arc::new(MockTabStore::with_tabs(vec![
            (1, 10, "first", "http://first.example"),
            (1, 11, "second", "http://second.example"),
            (2, 20, "third", "http://third.example"),
        ]));
        let adapter = FutureBackedTabs::new(store.clone());
        (store, adapter)
    }

    #[test]
    fn test_list_or_single_null_means_empty() {
        assert!(list_or(json!([null])).is_empty());
        assert_eq!(list_or(json!(["a"])), vec![json!("a")]);
        assert_eq!(list_or(json!(["a", "b"])).len(), 2);
        assert!(list_or(Value::Null).is_empty());
    }

    #[test]
    fn test_first_string_takes_top_frame() {
        assert_eq!(first_string(&json!(["top", "frame"])), "top");
        assert_eq!(first_string(&json!([])), "");
        assert_eq!(first_string(&json!([null])), "");
        assert_eq!(first_string(&json!("bare")), "bare");
    }

    #[tokio::test]
    async fn test_get_words_single_tab_raw_value() {
        let (store, tabs) = seeded();
        store.set_script_result(TabId::new(10), json!(["alpha\nbeta"]));

        let reply = get_words(&tabs, Some(TabId::new(10)), r"/\w+/g", r"'\n'").await;
        assert_eq!(reply, Some(Reply::Values(vec![json!("alpha\nbeta")])));
    }

    #[tokio::test]
    async fn test_get_words_single_tab_failure_is_silent() {
        let (store, tabs) = seeded();
        store.fail_scripts_on(TabId::new(10));

        let reply = get_words(&tabs, Some(TabId::new(10)), r"/\w+/g", r"'\n'").await;
        assert_eq!(reply, None);
    }

    #[tokio::test]
    async fn test_get_words_active_tabs_only() {
        let (store, tabs) = seeded();
        store.set_active(TabId::new(11));
        store.set_active(TabId::new(20));
        store.set_script_result(TabId::new(11), json!(["from-second"]));
        store.set_script_result(TabId::new(20), json!(["from-third"]));

        let Some(Reply::Values(words)) = get_words(&tabs, None, r"/\w+/g", r"'\n'").await else {
            panic!("expected values");
        };

        // Two active tabs contribute; the inactive tab 10 does not.
        assert_eq!(words.len(), 2);
        assert!(words.contains(&json!("from-second")));
        assert!(words.contains(&json!("from-third")));
    }

    #[tokio::test]
    async fn test_get_words_active_failure_contributes_nothing() {
        let (store, tabs) = seeded();
        store.set_active(TabId::new(11));
        store.set_active(TabId::new(20));
        store.set_script_result(TabId::new(11), json!(["ok"]));
        store.fail_scripts_on(TabId::new(20));

        let Some(Reply::Values(words)) = get_words(&tabs, None, r"/\w+/g", r"'\n'").await else {
            panic!("expected values");
        };
        assert_eq!(words, vec![json!("ok")]);
    }

    #[tokio::test]
    async fn test_get_words_rejected_slots() {
        let (_, tabs) = seeded();

        // Single-tab form stays silent, batch form answers empty.
        let single = get_words(&tabs, Some(TabId::new(10)), "alert(1)", r"'\n'").await;
        assert_eq!(single, None);

        let batch = get_words(&tabs, None, "alert(1)", r"'\n'").await;
        assert_eq!(batch, Some(Reply::Values(Vec::new())));
    }

    #[tokio::test]
    async fn test_get_text_line_per_eligible_tab() {
        let (store, tabs) = seeded();
        store.set_script_result(TabId::new(10), json!(["text one"]));
        store.set_script_result(TabId::new(11), json!(["text two"]));
        store.set_script_result(TabId::new(20), json!(["text three"]));

        let Reply::Lines(lines) = get_text(&tabs, r"/\n|\r|\t/g", r#"" ""#).await else {
            panic!("expected lines");
        };
        assert_eq!(
            lines,
            vec![
                "1.10\tfirst\thttp://first.example\ttext one",
                "1.11\tsecond\thttp://second.example\ttext two",
                "2.20\tthird\thttp://third.example\ttext three",
            ]
        );
    }

    #[tokio::test]
    async fn test_get_text_excludes_discarded_tabs() {
        let (store, tabs) = seeded();
        store.set_discarded(TabId::new(11));

        let Reply::Lines(lines) = get_text(&tabs, r"/\n/g", r#"" ""#).await else {
            panic!("expected lines");
        };
        assert_eq!(lines.len(), 2);
        assert!(lines.iter().all(|line| !line.contains("1.11\t")));
    }

    #[tokio::test]
    async fn test_get_text_failed_tab_keeps_its_line() {
        let (store, tabs) = seeded();
        store.set_script_result(TabId::new(10), json!(["good"]));
        store.fail_scripts_on(TabId::new(11));
        store.set_script_result(TabId::new(20), json!(["also good"]));

        let Reply::Lines(lines) = get_text(&tabs, r"/\n/g", r#"" ""#).await else {
            panic!("expected lines");
        };

        // Line count equals the eligible-tab count, never fewer.
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[1], "1.11\tsecond\thttp://second.example\t");
    }

    #[tokio::test]
    async fn test_get_html_uses_markup_template() {
        let (store, tabs) = seeded();
        store.set_script_result(TabId::new(10), json!(["<p>hi</p>"]));

        let Reply::Lines(lines) = get_html(&tabs, r"/\n/g", "' '").await else {
            panic!("expected lines");
        };
        assert!(lines[0].ends_with("\t<p>hi</p>"));
    }

    #[tokio::test]
    async fn test_get_browser_name() {
        let (_, tabs) = seeded();
        assert_eq!(
            get_browser(&tabs).await,
            Reply::Text("firefox".to_string())
        );
    }
}
