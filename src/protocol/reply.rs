//! Outbound reply shapes.
//!
//! Every command that answers at all answers with exactly one of these
//! shapes, serialized as a single JSON text frame. Multi-tab line
//! responses are already in canonical order by the time they get here;
//! this module only renders.

// ============================================================================
// Imports
// ============================================================================

use serde_json::Value;

use crate::capability::Tab;

// ============================================================================
// Reply
// ============================================================================

/// One response frame to the host.
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    /// An ordered sequence of lines: tab records or composite ids.
    ///
    /// The empty response is the empty sequence.
    Lines(Vec<String>),

    /// Raw extracted values, flattened across tabs.
    Values(Vec<Value>),

    /// The bare acknowledgment sentinel, `"OK"`.
    Ok,

    /// A bare string: comma-joined composite ids, or the vendor name.
    Text(String),
}

impl Reply {
    /// The empty line sequence.
    #[inline]
    #[must_use]
    pub fn empty() -> Self {
        Self::Lines(Vec::new())
    }

    /// Renders the reply as its wire value.
    #[must_use]
    pub fn to_value(&self) -> Value {
        match self {
            Self::Lines(lines) => Value::Array(
                lines
                    .iter()
                    .map(|line| Value::String(line.clone()))
                    .collect(),
            ),
            Self::Values(values) => Value::Array(values.clone()),
            Self::Ok => Value::String("OK".to_string()),
            Self::Text(text) => Value::String(text.clone()),
        }
    }

    /// Renders the reply as one JSON text frame.
    #[inline]
    #[must_use]
    pub fn to_frame(&self) -> String {
        self.to_value().to_string()
    }
}

// ============================================================================
// Line Formatting
// ============================================================================

/// Formats the listing line for a tab: `"<win>.<id>\t<title>\t<url>"`.
#[must_use]
pub fn tab_line(tab: &Tab) -> String {
    format!("{}\t{}\t{}", tab.tab_ref(), tab.title, tab.url)
}

/// Formats the extraction line for a tab: the listing line plus the
/// extracted payload in a fourth column.
#[must_use]
pub fn tab_line_with(tab: &Tab, payload: &str) -> String {
    format!("{}\t{}\t{}\t{}", tab.tab_ref(), tab.title, tab.url, payload)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use serde_json::json;

    use crate::identifiers::{TabId, WindowId};

    fn tab() -> Tab {
        Tab {
            id: TabId::new(4),
            window_id: WindowId::new(2),
            index: 0,
            title: "Example".to_string(),
            url: "http://example.com".to_string(),
            active: false,
            pinned: false,
            discarded: false,
        }
    }

    #[test]
    fn test_ok_frame() {
        assert_eq!(Reply::Ok.to_frame(), r#""OK""#);
    }

    #[test]
    fn test_lines_frame() {
        let reply = Reply::Lines(vec!["1.2\ta\tb".to_string()]);
        assert_eq!(reply.to_frame(), r#"["1.2\ta\tb"]"#);
    }

    #[test]
    fn test_empty_frame() {
        assert_eq!(Reply::empty().to_frame(), "[]");
    }

    #[test]
    fn test_values_frame() {
        let reply = Reply::Values(vec![json!("alpha"), json!("beta")]);
        assert_eq!(reply.to_frame(), r#"["alpha","beta"]"#);
    }

    #[test]
    fn test_text_frame() {
        assert_eq!(Reply::Text("1.2,1.3".to_string()).to_frame(), r#""1.2,1.3""#);
    }

    #[test]
    fn test_tab_line() {
        assert_eq!(tab_line(&tab()), "2.4\tExample\thttp://example.com");
    }

    #[test]
    fn test_tab_line_with_payload() {
        assert_eq!(
            tab_line_with(&tab(), "page text"),
            "2.4\tExample\thttp://example.com\tpage text"
        );
    }

    #[test]
    fn test_tab_line_with_empty_payload_keeps_column() {
        assert_eq!(
            tab_line_with(&tab(), ""),
            "2.4\tExample\thttp://example.com\t"
        );
    }
}
