//! Canonicalization of the control plane's "empty/unset" encodings.
//!
//! The remote API encodes an unset string as the literal sentinel `"none"`,
//! reports "no restriction" filter lists as empty arrays, and does not
//! distinguish an explicit zero retry cap from an unset one. All read paths
//! funnel snapshot values through these helpers so two reads of an unchanged
//! resource always normalize identically.

/// The control plane's literal encoding of an unset string field.
pub const UNSET_SENTINEL: &str = "none";

/// Collapses the sentinel token and the empty string to absent.
pub fn string_value(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty() && v != UNSET_SENTINEL)
}

/// Collapses the empty string to absent, keeping every other value verbatim.
///
/// For fields where the sentinel token would be a legitimate value.
pub fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// Collapses an empty list to absent.
///
/// Only valid for fields where the control plane treats an empty list as "no
/// restriction" (the source-filter lists).
pub fn list_value(value: Option<Vec<String>>) -> Option<Vec<String>> {
    value.filter(|v| !v.is_empty())
}

/// Collapses zero to absent.
///
/// Only valid for scalars where the control plane does not distinguish an
/// explicit zero from unset (the retry cap).
pub fn zero_as_absent(value: Option<u32>) -> Option<u32> {
    value.filter(|v| *v != 0)
}
