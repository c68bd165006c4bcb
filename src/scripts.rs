//! Extraction script templates.
//!
//! The bridge never composes JavaScript ad hoc: the three extraction
//! scripts live here as fixed templates with two placeholder slots
//! each, and handlers fill the slots with caller-supplied values.
//!
//! Slot values are validated before substitution. The pattern slot must
//! be a JavaScript regex literal (`/…/flags`) or string literal; the
//! join/replace slot must be a string literal. Anything else would be
//! spliced into the page verbatim, so it is rejected with
//! [`Error::Template`] instead of injected.

// ============================================================================
// Imports
// ============================================================================

use std::sync::LazyLock;

use regex::Regex;

use crate::error::{Error, Result};

// ============================================================================
// Templates
// ============================================================================

/// Collects the unique words of the page, sorted, joined.
const WORDS_TEMPLATE: &str =
    "[...new Set(document.documentElement.innerText.match(#match_regex#))].sort().join(#join_with#);";

/// Flattens the page text by replacing the delimiter pattern.
const TEXT_TEMPLATE: &str =
    "document.documentElement.innerText.replace(#delimiter_regex#, #replace_with#);";

/// Flattens the page markup by replacing the delimiter pattern.
const HTML_TEMPLATE: &str =
    "document.documentElement.innerHTML.replace(#delimiter_regex#, #replace_with#);";

// ============================================================================
// Slot Validation
// ============================================================================

/// JavaScript regex literal: `/body/flags`, no raw newlines.
static REGEX_LITERAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^/(?:[^/\\\n]|\\.)+/[a-zA-Z]*$").expect("static pattern"));

/// JavaScript string literal, single or double quoted, no raw newlines.
static STRING_LITERAL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^'(?:[^'\\\n]|\\.)*'$|^"(?:[^"\\\n]|\\.)*"$"#).expect("static pattern")
});

/// Checks that a pattern slot value is a regex or string literal.
fn check_pattern_slot(value: &str) -> Result<()> {
    if REGEX_LITERAL.is_match(value) || STRING_LITERAL.is_match(value) {
        Ok(())
    } else {
        Err(Error::template(format!(
            "pattern slot is not a regex or string literal: {value}"
        )))
    }
}

/// Checks that a replacement slot value is a string literal.
fn check_string_slot(value: &str) -> Result<()> {
    if STRING_LITERAL.is_match(value) {
        Ok(())
    } else {
        Err(Error::template(format!(
            "replacement slot is not a string literal: {value}"
        )))
    }
}

// ============================================================================
// Rendering
// ============================================================================

/// Builds the word-extraction script.
///
/// `match_regex` fills `#match_regex#`, `join_with` fills `#join_with#`.
///
/// # Errors
///
/// Returns [`Error::Template`] if either slot value fails validation.
pub fn words_script(match_regex: &str, join_with: &str) -> Result<String> {
    check_pattern_slot(match_regex)?;
    check_string_slot(join_with)?;

    Ok(WORDS_TEMPLATE
        .replace("#match_regex#", match_regex)
        .replace("#join_with#", join_with))
}

/// Builds the text-extraction script.
///
/// # Errors
///
/// Returns [`Error::Template`] if either slot value fails validation.
pub fn text_script(delimiter_regex: &str, replace_with: &str) -> Result<String> {
    check_pattern_slot(delimiter_regex)?;
    check_string_slot(replace_with)?;

    Ok(TEXT_TEMPLATE
        .replace("#delimiter_regex#", delimiter_regex)
        .replace("#replace_with#", replace_with))
}

/// Builds the HTML-extraction script.
///
/// # Errors
///
/// Returns [`Error::Template`] if either slot value fails validation.
pub fn html_script(delimiter_regex: &str, replace_with: &str) -> Result<String> {
    check_pattern_slot(delimiter_regex)?;
    check_string_slot(replace_with)?;

    Ok(HTML_TEMPLATE
        .replace("#delimiter_regex#", delimiter_regex)
        .replace("#replace_with#", replace_with))
}

// ============================================================================
// Tests
// ============================================================================
