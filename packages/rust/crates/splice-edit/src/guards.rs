//! Idempotency guards.
//!
//! Every mutating entry point checks one of these before planning an edit,
//! so re-running a patch over already-patched content is a no-op. Token
//! checks always compare whole delimited units, never substrings.

use serde_json::Value;

/// Delimiters separating tokens in a file path (besides whitespace).
pub const PATH_DELIMITERS: [char; 3] = ['/', '\\', '.'];

/// Whether `content` already contains `fragment` verbatim.
///
/// An empty fragment is trivially present.
#[must_use]
pub fn contains_fragment(content: &str, fragment: &str) -> bool {
    content.contains(fragment)
}

/// Whether `token` is one of the whitespace-separated units of `value`.
#[must_use]
pub fn has_whitespace_token(value: &str, token: &str) -> bool {
    value.split_whitespace().any(|part| part == token)
}

/// Whether `token` is a whole unit of `value` split on whitespace and
/// `delimiters`.
#[must_use]
pub fn has_delimited_token(value: &str, token: &str, delimiters: &[char]) -> bool {
    value
        .split(|c: char| c.is_whitespace() || delimiters.contains(&c))
        .any(|part| !part.is_empty() && part == token)
}

/// Whether `token` is a whole segment of a path such as
/// `node_modules/bootstrap/dist/css/bootstrap.min.css`.
#[must_use]
pub fn has_path_token(path: &str, token: &str) -> bool {
    has_delimited_token(path, token, &PATH_DELIMITERS)
}

/// Input path of a style entry: either a bare string or `{ "input": ... }`.
#[must_use]
pub fn style_input(entry: &Value) -> Option<&str> {
    match entry {
        Value::String(path) => Some(path),
        Value::Object(map) => map.get("input").and_then(Value::as_str),
        _ => None,
    }
}

/// Whether a JSON array already holds an entry equal to `entry`.
///
/// Style entries compare by input path, so `"a.css"` and
/// `{ "input": "a.css" }` count as the same entry.
#[must_use]
pub fn json_array_contains(array: &[Value], entry: &Value) -> bool {
    let wanted = style_input(entry);
    array.iter().any(|existing| {
        existing == entry || (wanted.is_some() && style_input(existing) == wanted)
    })
}
