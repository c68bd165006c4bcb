//! Type-safe identifiers for browser tabs and windows.
//!
//! Newtype wrappers prevent mixing incompatible IDs at compile time.
//! [`TabRef`] is the composite identifier the host sees: a tab is only
//! unique within its browsing session as the pair (window, tab), and it
//! is rendered externally as `"<windowId>.<tabId>"`.

// ============================================================================
// Imports
// ============================================================================

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

// ============================================================================
// TabId
// ============================================================================

/// Identifier of a single tab, as assigned by the browser.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TabId(pub u32);

impl TabId {
    /// Creates a tab ID from a raw value.
    #[inline]
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Returns the raw value.
    #[inline]
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }
}

impl fmt::Display for TabId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for TabId {
    #[inline]
    fn from(id: u32) -> Self {
        Self(id)
    }
}

// ============================================================================
// WindowId
// ============================================================================

/// Identifier of a browser window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WindowId(pub u32);

impl WindowId {
    /// Creates a window ID from a raw value.
    #[inline]
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Returns the raw value.
    #[inline]
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }
}

impl fmt::Display for WindowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for WindowId {
    #[inline]
    fn from(id: u32) -> Self {
        Self(id)
    }
}

// ============================================================================
// TabRef
// ============================================================================

/// Composite tab identifier: window and tab together.
///
/// This is the only externally visible tab reference. It formats as
/// `"<windowId>.<tabId>"` and parses the same string back exactly.
///
/// # Example
///
/// ```
/// use tab_bridge::identifiers::TabRef;
///
/// let r: TabRef = "3.17".parse().unwrap();
/// assert_eq!(r.to_string(), "3.17");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TabRef {
    /// Window owning the tab.
    pub window_id: WindowId,
    /// The tab itself.
    pub tab_id: TabId,
}

impl TabRef {
    /// Creates a composite reference.
    #[inline]
    #[must_use]
    pub const fn new(window_id: WindowId, tab_id: TabId) -> Self {
        Self { window_id, tab_id }
    }
}

impl fmt::Display for TabRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.window_id, self.tab_id)
    }
}

impl FromStr for TabRef {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (window, tab) = s
            .split_once('.')
            .ok_or_else(|| Error::decode(format!("tab reference without separator: {s}")))?;

        let window_id: u32 = window
            .parse()
            .map_err(|_| Error::decode(format!("bad window id in tab reference: {s}")))?;
        let tab_id: u32 = tab
            .parse()
            .map_err(|_| Error::decode(format!("bad tab id in tab reference: {s}")))?;

        Ok(Self::new(WindowId::new(window_id), TabId::new(tab_id)))
    }
}

// ============================================================================
// Tests
// ============================================================================
