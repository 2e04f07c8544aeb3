//! Languages understood by the locators.
//!
//! Each language maps to a tree-sitter grammar. Module source must parse
//! cleanly. Markup keeps the recovered tree: real pages carry bare `&` and
//! stray tags, so the HTML locator checks error nodes only where it edits.

use std::path::Path;

use tree_sitter::{Language, Node, Parser, Tree};

use crate::error::LocateError;
use crate::location::Span;

/// Supported languages for structural location.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lang {
    /// HTML markup
    Html,
    /// TypeScript module source
    TypeScript,
    /// TypeScript with JSX
    Tsx,
}

impl Lang {
    /// Short language name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Html => "html",
            Self::TypeScript => "ts",
            Self::Tsx => "tsx",
        }
    }

    /// Try to detect language from file extension
    #[must_use]
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_lowercase();
        Self::from_extension(&ext)
    }

    /// Try to detect language from extension string
    #[must_use]
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext {
            "html" | "htm" => Some(Self::Html),
            "ts" | "mts" | "cts" | "js" | "mjs" | "cjs" => Some(Self::TypeScript),
            "tsx" | "jsx" => Some(Self::Tsx),
            _ => None,
        }
    }

    fn grammar(self) -> Language {
        match self {
            Self::Html => tree_sitter_html::LANGUAGE.into(),
            Self::TypeScript => tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into(),
            Self::Tsx => tree_sitter_typescript::LANGUAGE_TSX.into(),
        }
    }

    /// Parse `text` into a syntax tree.
    ///
    /// # Errors
    /// `Grammar` when the grammar cannot be loaded. `MalformedInput` when the
    /// parser produced no tree, when the whole document is an error node, or
    /// (for module source) when the tree contains any error or missing node.
    pub fn parse(self, text: &str) -> Result<Tree, LocateError> {
        let mut parser = Parser::new();
        parser
            .set_language(&self.grammar())
            .map_err(|e| LocateError::Grammar {
                lang: self.as_str(),
                reason: e.to_string(),
            })?;

        let tree = parser
            .parse(text, None)
            .ok_or_else(|| LocateError::MalformedInput {
                lang: self.as_str(),
                reason: "parser produced no tree".to_string(),
            })?;

        let root = tree.root_node();
        let rejected = root.is_error() || (self != Self::Html && root.has_error());
        if rejected {
            let reason = match error_nodes(root).first() {
                Some(node) => {
                    let pos = node.start_position();
                    format!("syntax error at line {}, column {}", pos.row + 1, pos.column + 1)
                }
                None => "syntax error".to_string(),
            };
            return Err(LocateError::MalformedInput {
                lang: self.as_str(),
                reason,
            });
        }

        Ok(tree)
    }
}

impl TryFrom<&str> for Lang {
    type Error = LocateError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        match s.to_lowercase().as_str() {
            "html" | "htm" => Ok(Self::Html),
            "ts" | "typescript" | "js" | "javascript" => Ok(Self::TypeScript),
            "tsx" | "jsx" => Ok(Self::Tsx),
            _ => Err(LocateError::UnsupportedLanguage(s.to_string())),
        }
    }
}

/// Spans of the error and missing nodes under `root`, in document order.
pub(crate) fn error_spans(root: Node<'_>) -> Vec<Span> {
    error_nodes(root)
        .into_iter()
        .map(|node| Span::new(node.start_byte(), node.end_byte()))
        .collect()
}

fn error_nodes(root: Node<'_>) -> Vec<Node<'_>> {
    let mut found = Vec::new();
    let mut stack = vec![root];
    while let Some(node) = stack.pop() {
        if node.is_error() || node.is_missing() {
            found.push(node);
            continue;
        }
        if node.has_error() {
            let mut cursor = node.walk();
            let children: Vec<_> = node.children(&mut cursor).collect();
            stack.extend(children.into_iter().rev());
        }
    }
    found
}
