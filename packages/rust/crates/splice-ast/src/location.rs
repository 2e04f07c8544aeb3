//! Source positions reported by the locators.
//!
//! All offsets are byte offsets into the snapshot the location was derived
//! from. A location must not be reused once an edit has been committed
//! against that snapshot.

use std::collections::BTreeMap;

use serde::Serialize;

/// Half-open byte range `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Span {
    /// First byte.
    pub start: usize,
    /// One past the last byte.
    pub end: usize,
}

impl Span {
    /// Create a span.
    #[must_use]
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Length in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// Whether the span covers no bytes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Where a construct sits in its document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceLocation {
    /// Construct identifier (lowercased tag name for markup).
    pub name: String,
    /// Opening delimiter, e.g. `<body class="a">`.
    pub start_tag: Span,
    /// Closing delimiter; `None` for void and self-closing constructs and
    /// for elements closed implicitly.
    pub end_tag: Option<Span>,
    /// Attribute name to the span of the whole `name="value"` text.
    pub attrs: BTreeMap<String, Span>,
    /// Character column of the opening delimiter (0-based).
    pub column: usize,
}

/// Character column (0-based) of `offset` within `text`.
#[must_use]
pub fn column_of(text: &str, offset: usize) -> usize {
    let offset = offset.min(text.len());
    let Some(prefix) = text.get(..offset) else {
        return 0;
    };
    let line_start = prefix.rfind('\n').map_or(0, |i| i + 1);
    prefix[line_start..].chars().count()
}

/// Leading spaces and tabs of the line containing `offset`.
#[must_use]
pub fn line_indent(text: &str, offset: usize) -> &str {
    let offset = offset.min(text.len());
    let Some(prefix) = text.get(..offset) else {
        return "";
    };
    let line_start = prefix.rfind('\n').map_or(0, |i| i + 1);
    let line = &text[line_start..];
    let width = line
        .char_indices()
        .find(|(_, c)| *c != ' ' && *c != '\t')
        .map_or(line.len(), |(i, _)| i);
    &line[..width]
}
