//! Error types for structural locators.
//!
//! Library crates use `thiserror` for explicit error enums. A search that
//! finds nothing is never an error here; it is returned as `None`.

use thiserror::Error;

/// Error types for locating constructs in source text.
#[derive(Error, Debug)]
pub enum LocateError {
    /// The tree-sitter grammar could not be loaded.
    #[error("Failed to load {lang} grammar: {reason}")]
    Grammar {
        /// Language name.
        lang: &'static str,
        /// Loader message.
        reason: String,
    },

    /// The parser could not make sense of the input.
    #[error("Malformed {lang} input: {reason}")]
    MalformedInput {
        /// Language name.
        lang: &'static str,
        /// Where the parser gave up.
        reason: String,
    },

    /// A required anchor (declaration list, decorator, object literal) is
    /// absent and there is no safe place to insert instead.
    #[error("Structural anchor not found: {0}")]
    StructuralNotFound(String),

    /// Language name or extension not handled by the locators.
    #[error("Unsupported language: {0}")]
    UnsupportedLanguage(String),
}
