//! Diff generation utilities.
//!
//! Renders patch results as unified diffs using the `similar` crate.

use similar::TextDiff;

/// Generate a unified diff between two versions of `path`.
///
/// Returns an empty string when the contents are identical.
#[must_use]
pub fn generate_unified_diff(path: &str, original: &str, modified: &str) -> String {
    if original == modified {
        return String::new();
    }
    TextDiff::from_lines(original, modified)
        .unified_diff()
        .context_radius(3)
        .header(&format!("a/{path}"), &format!("b/{path}"))
        .to_string()
}
