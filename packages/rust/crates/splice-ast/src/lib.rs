//! splice-ast - Structural locators for the splice patch engine
//!
//! Read-only queries that parse text with tree-sitter and return byte
//! positions of the constructs a patch needs to touch.
//!
//! ## Architecture
//!
//! ```text
//! splice-ast/src/
//! ├── lib.rs        # Re-exports (entry point)
//! ├── error.rs      # LocateError enum
//! ├── lang.rs       # Lang enum and grammar selection
//! ├── location.rs   # Span, SourceLocation, column helpers
//! ├── html.rs       # HTML element lookup
//! ├── module.rs     # Import and declaration-list lookup
//! └── paths.rs      # Module specifier normalization
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use splice_ast::{find_element_by_tag, has_attribute_value_token};
//!
//! let body = find_element_by_tag(r#"<body class="a"></body>"#, "body")
//!     .unwrap()
//!     .unwrap();
//! assert!(has_attribute_value_token(&body, "class", "a"));
//! ```

// ============================================================================
// Module Declarations
// ============================================================================

mod error;
mod html;
mod lang;
mod location;
mod module;
mod paths;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::LocateError;
pub use lang::Lang;
pub use location::{SourceLocation, Span, column_of, line_indent};

// HTML locator
pub use html::{
    HtmlAttribute, HtmlDocument, HtmlElement, HtmlNode, TextNode, compute_child_indentation,
    find_element_by_tag, has_attribute_value_token,
};

// Module locator
pub use module::{
    ImportBinding, ImportResolution, ImportSpecifier, Insertion, ModuleSource, NG_MODULE_DECORATOR,
    NamedImports, QuoteStyle,
};

// Path helpers
pub use paths::{build_relative_path, normalize_module_specifier};
