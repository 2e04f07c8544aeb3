//! Module source locator.
//!
//! Finds where a new import and a new declaration-list entry belong in a
//! TypeScript module, without duplicating what is already there. Imports are
//! matched by resolved module path, so an existing aliased import is reused
//! instead of adding a second one. Type-only imports never satisfy a value
//! symbol; they are promoted to value imports in place.

use serde::{Deserialize, Serialize};
use tree_sitter::{Node, Tree};

use crate::error::LocateError;
use crate::lang::Lang;
use crate::location::{Span, line_indent};
use crate::paths::normalize_module_specifier;

/// Decorator holding the Angular module metadata.
pub const NG_MODULE_DECORATOR: &str = "NgModule";

/// Quote character used in generated string literals.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuoteStyle {
    /// `'...'`
    #[default]
    Single,
    /// `"..."`
    Double,
}

impl QuoteStyle {
    /// The quote character.
    #[must_use]
    pub fn as_char(self) -> char {
        match self {
            Self::Single => '\'',
            Self::Double => '"',
        }
    }

    /// Wrap `text` in quotes, escaping embedded quotes and backslashes.
    #[must_use]
    pub fn quote(self, text: &str) -> String {
        let q = self.as_char();
        let mut out = String::with_capacity(text.len() + 2);
        out.push(q);
        for c in text.chars() {
            if c == q || c == '\\' {
                out.push('\\');
            }
            out.push(c);
        }
        out.push(q);
        out
    }
}

/// Text to insert at an offset of the original snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Insertion {
    /// Byte offset into the snapshot.
    pub offset: usize,
    /// Text to insert.
    pub text: String,
}

/// Outcome of looking for an import.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum ImportResolution {
    /// The symbol is already reachable under `local_name`.
    Existing {
        /// Name to reference the symbol by (alias or `ns.Symbol`).
        local_name: String,
    },
    /// The import must be added.
    Insert {
        /// Where and what to insert.
        insertion: Insertion,
        /// Name to reference the symbol by once inserted.
        local_name: String,
    },
    /// The symbol is imported as a type only; dropping `type` keywords makes
    /// it a value import.
    Promote {
        /// `type ` keywords to delete.
        removals: Vec<Span>,
        /// `type ` keywords for sibling specifiers that must stay type-only.
        insertions: Vec<Insertion>,
        /// Name to reference the symbol by once promoted.
        local_name: String,
    },
}

impl ImportResolution {
    /// Name under which the symbol is referenced.
    #[must_use]
    pub fn local_name(&self) -> &str {
        match self {
            Self::Existing { local_name }
            | Self::Insert { local_name, .. }
            | Self::Promote { local_name, .. } => local_name,
        }
    }

    /// The pending new import text, if any.
    #[must_use]
    pub fn insertion(&self) -> Option<&Insertion> {
        match self {
            Self::Existing { .. } | Self::Promote { .. } => None,
            Self::Insert { insertion, .. } => Some(insertion),
        }
    }

    /// Whether the source must change for the symbol to be usable as a value.
    #[must_use]
    pub fn needs_edit(&self) -> bool {
        !matches!(self, Self::Existing { .. })
    }
}

/// One `name` or `name as alias` entry of an import's braces.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportSpecifier {
    /// Exported name.
    pub imported: String,
    /// Local binding.
    pub local: String,
    /// `type ` modifier in front of the name, if present.
    pub type_keyword: Option<Span>,
    /// Span of the whole specifier.
    pub span: Span,
}

impl ImportSpecifier {
    /// Whether the specifier binds a type only.
    #[must_use]
    pub fn is_type_only(&self) -> bool {
        self.type_keyword.is_some()
    }
}

/// `{ ... }` clause of an import statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NamedImports {
    /// Specifiers in source order.
    pub specifiers: Vec<ImportSpecifier>,
    /// Span of the braces.
    pub span: Span,
    /// End of the last specifier, if any.
    pub last_specifier_end: Option<usize>,
}

/// A top-level import statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportBinding {
    /// Module specifier as written.
    pub specifier: String,
    /// Normalized specifier used for comparisons.
    pub resolved: String,
    /// Default import binding with its span.
    pub default: Option<(String, Span)>,
    /// `* as name` binding.
    pub namespace: Option<String>,
    /// `{ ... }` bindings.
    pub named: Option<NamedImports>,
    /// `type ` keyword of an `import type ...` statement, if present.
    pub type_keyword: Option<Span>,
    /// Span of the whole statement.
    pub span: Span,
}

impl ImportBinding {
    /// Whether the whole statement imports types only.
    #[must_use]
    pub fn is_type_only(&self) -> bool {
        self.type_keyword.is_some()
    }

    /// Specifier importing `symbol`, value or type-only.
    #[must_use]
    pub fn specifier_of(&self, symbol: &str) -> Option<&ImportSpecifier> {
        self.named
            .as_ref()?
            .specifiers
            .iter()
            .find(|spec| spec.imported == symbol)
    }

    /// Local name under which this import binds `symbol` as a value, if any.
    #[must_use]
    pub fn local_name_of(&self, symbol: &str) -> Option<String> {
        if self.is_type_only() {
            return None;
        }
        if let Some(spec) = self.specifier_of(symbol).filter(|spec| !spec.is_type_only()) {
            return Some(spec.local.clone());
        }
        self.namespace.as_ref().map(|ns| format!("{ns}.{symbol}"))
    }

    /// Edits that turn a type-only import of `symbol` into a value import.
    fn promotion(&self, symbol: &str) -> Option<ImportResolution> {
        let spec = self.specifier_of(symbol)?;
        let local_name = spec.local.clone();

        if let Some(keyword) = spec.type_keyword {
            return Some(ImportResolution::Promote {
                removals: vec![keyword],
                insertions: Vec::new(),
                local_name,
            });
        }

        // `import type D, { ... }` is not valid; leave it alone.
        let keyword = self.type_keyword.filter(|_| self.default.is_none())?;
        let insertions = self
            .named
            .iter()
            .flat_map(|named| &named.specifiers)
            .filter(|other| other.imported != symbol)
            .map(|other| Insertion {
                offset: other.span.start,
                text: "type ".to_string(),
            })
            .collect();
        Some(ImportResolution::Promote {
            removals: vec![keyword],
            insertions,
            local_name,
        })
    }
}

/// A parsed module source.
pub struct ModuleSource {
    text: String,
    tree: Tree,
    quote: QuoteStyle,
}

impl std::fmt::Debug for ModuleSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModuleSource")
            .field("len", &self.text.len())
            .field("quote", &self.quote)
            .finish_non_exhaustive()
    }
}

impl ModuleSource {
    /// Parse TypeScript source.
    ///
    /// # Errors
    /// `MalformedInput` when the source does not parse cleanly.
    pub fn parse(text: impl Into<String>) -> Result<Self, LocateError> {
        Self::parse_as(text, Lang::TypeScript)
    }

    /// Parse source with an explicit grammar.
    ///
    /// # Errors
    /// `UnsupportedLanguage` for markup, `MalformedInput` when the source does
    /// not parse cleanly.
    pub fn parse_as(text: impl Into<String>, lang: Lang) -> Result<Self, LocateError> {
        if lang == Lang::Html {
            return Err(LocateError::UnsupportedLanguage(lang.as_str().to_string()));
        }
        let text = text.into();
        let tree = lang.parse(&text)?;
        let mut source = Self {
            text,
            tree,
            quote: QuoteStyle::default(),
        };
        source.quote = source.detect_quote().unwrap_or_default();
        Ok(source)
    }

    /// Fallback quote style for files without imports to learn from.
    #[must_use]
    pub fn prefer_quote(mut self, quote: QuoteStyle) -> Self {
        if self.detect_quote().is_none() {
            self.quote = quote;
        }
        self
    }

    /// The snapshot this tree was parsed from.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Quote style used for generated literals.
    #[must_use]
    pub fn quote_style(&self) -> QuoteStyle {
        self.quote
    }

    fn detect_quote(&self) -> Option<QuoteStyle> {
        let first = self.import_nodes().into_iter().next()?;
        let source = first.child_by_field_name("source")?;
        match self.node_text(source).chars().next()? {
            '"' => Some(QuoteStyle::Double),
            _ => Some(QuoteStyle::Single),
        }
    }

    fn node_text(&self, node: Node<'_>) -> &str {
        self.text
            .get(node.start_byte()..node.end_byte())
            .unwrap_or_default()
    }

    fn import_nodes(&self) -> Vec<Node<'_>> {
        named_children(self.tree.root_node())
            .into_iter()
            .filter(|node| node.kind() == "import_statement")
            .collect()
    }

    /// Top-level import statements in source order.
    #[must_use]
    pub fn imports(&self) -> Vec<ImportBinding> {
        self.import_nodes()
            .into_iter()
            .filter_map(|node| self.import_binding(node))
            .collect()
    }

    fn import_binding(&self, node: Node<'_>) -> Option<ImportBinding> {
        let source = node.child_by_field_name("source")?;
        let specifier = unquote(self.node_text(source)).to_string();

        let mut default = None;
        let mut namespace = None;
        let mut named = None;

        let clause = named_children(node)
            .into_iter()
            .find(|child| child.kind() == "import_clause");
        for part in clause.map(named_children).unwrap_or_default() {
            match part.kind() {
                "identifier" => {
                    default = Some((self.node_text(part).to_string(), span_of(part)));
                }
                "namespace_import" => {
                    namespace = named_children(part)
                        .into_iter()
                        .find(|n| n.kind() == "identifier")
                        .map(|n| self.node_text(n).to_string());
                }
                "named_imports" => named = Some(self.named_imports(part)),
                _ => {}
            }
        }

        Some(ImportBinding {
            resolved: normalize_module_specifier(&specifier),
            specifier,
            default,
            namespace,
            named,
            type_keyword: type_keyword(node),
            span: span_of(node),
        })
    }

    fn named_imports(&self, node: Node<'_>) -> NamedImports {
        let mut specifiers = Vec::new();
        let mut last_specifier_end = None;
        for spec in named_children(node)
            .into_iter()
            .filter(|n| n.kind() == "import_specifier")
        {
            let Some(name) = spec.child_by_field_name("name") else {
                continue;
            };
            let imported = unquote(self.node_text(name)).to_string();
            let local = spec
                .child_by_field_name("alias")
                .map_or_else(|| imported.clone(), |alias| self.node_text(alias).to_string());
            specifiers.push(ImportSpecifier {
                imported,
                local,
                type_keyword: type_keyword(spec),
                span: span_of(spec),
            });
            last_specifier_end = Some(spec.end_byte());
        }
        NamedImports {
            specifiers,
            span: span_of(node),
            last_specifier_end,
        }
    }

    /// Where to import `symbol` from `module_path`.
    ///
    /// An import whose specifier resolves to the same module is reused: an
    /// existing value binding (possibly aliased, possibly a namespace)
    /// yields `Existing`, a type-only binding yields `Promote`, and
    /// otherwise the symbol is added to the braces of a value import. Only
    /// when no value import of the module exists is a new statement placed
    /// after the last import (or at the top of the file).
    #[must_use]
    pub fn locate_import_insertion_point(&self, module_path: &str, symbol: &str) -> ImportResolution {
        let target = normalize_module_specifier(module_path);
        let imports = self.imports();
        let same_module: Vec<&ImportBinding> =
            imports.iter().filter(|imp| imp.resolved == target).collect();

        if let Some(local_name) = same_module.iter().find_map(|imp| imp.local_name_of(symbol)) {
            return ImportResolution::Existing { local_name };
        }
        if let Some(promotion) = same_module.iter().find_map(|imp| imp.promotion(symbol)) {
            return promotion;
        }

        let local_name = symbol.to_string();
        let value_imports = || same_module.iter().filter(|imp| !imp.is_type_only());

        if let Some(named) = value_imports().find_map(|imp| imp.named.as_ref()) {
            let insertion = match named.last_specifier_end {
                Some(end) => Insertion {
                    offset: end,
                    text: format!(", {symbol}"),
                },
                None => Insertion {
                    offset: named.span.start + 1,
                    text: format!(" {symbol} "),
                },
            };
            return ImportResolution::Insert { insertion, local_name };
        }

        if let Some((_, default_span)) = value_imports().find_map(|imp| imp.default.as_ref()) {
            return ImportResolution::Insert {
                insertion: Insertion {
                    offset: default_span.end,
                    text: format!(", {{ {symbol} }}"),
                },
                local_name,
            };
        }

        let statement = format!(
            "import {{ {symbol} }} from {};",
            self.quote.quote(module_path)
        );
        let insertion = match imports.last() {
            Some(last) => Insertion {
                offset: last.span.end,
                text: format!("\n{statement}"),
            },
            None => Insertion {
                offset: 0,
                text: format!("{statement}\n"),
            },
        };
        ImportResolution::Insert { insertion, local_name }
    }

    /// Where to add `symbol` to the `list_name` array of `@NgModule`.
    ///
    /// Returns `Ok(None)` when the symbol is already listed.
    ///
    /// # Errors
    /// `StructuralNotFound` when the decorator or the list is missing.
    pub fn locate_declaration_list_insertion_point(
        &self,
        list_name: &str,
        symbol: &str,
    ) -> Result<Option<Insertion>, LocateError> {
        self.locate_decorator_list_insertion_point(NG_MODULE_DECORATOR, list_name, symbol)
    }

    /// Where to add `symbol` to the `list_name` array inside the object
    /// argument of `@decorator(...)`.
    ///
    /// # Errors
    /// `StructuralNotFound` when the decorator or the list is missing.
    pub fn locate_decorator_list_insertion_point(
        &self,
        decorator: &str,
        list_name: &str,
        symbol: &str,
    ) -> Result<Option<Insertion>, LocateError> {
        let metadata = self
            .decorator_object(decorator)
            .ok_or_else(|| LocateError::StructuralNotFound(format!("@{decorator} decorator")))?;

        let array = self
            .property_value(metadata, list_name)
            .filter(|value| value.kind() == "array")
            .ok_or_else(|| {
                LocateError::StructuralNotFound(format!("`{list_name}` list in @{decorator}"))
            })?;

        Ok(self.array_insertion(array, symbol))
    }

    /// Where to add `key: 'value'` as the first property of the object
    /// literal assigned to `variable`.
    ///
    /// Returns `Ok(None)` when the key already exists.
    ///
    /// # Errors
    /// `StructuralNotFound` when no such object literal exists.
    pub fn locate_object_property_insertion_point(
        &self,
        variable: &str,
        key: &str,
        value: &str,
    ) -> Result<Option<Insertion>, LocateError> {
        let object = descendants(self.tree.root_node())
            .into_iter()
            .filter(|node| node.kind() == "variable_declarator")
            .filter(|node| {
                node.child_by_field_name("name")
                    .is_some_and(|name| self.node_text(name) == variable)
            })
            .find_map(|node| node.child_by_field_name("value"))
            .filter(|value| value.kind() == "object")
            .ok_or_else(|| {
                LocateError::StructuralNotFound(format!("`{variable}` object literal"))
            })?;

        if self.property_value_or_shorthand(object, key) {
            return Ok(None);
        }

        Ok(Some(Insertion {
            offset: object.start_byte() + 1,
            text: format!("\n  {key}: {},", self.quote.quote(value)),
        }))
    }

    fn decorator_object(&self, decorator: &str) -> Option<Node<'_>> {
        descendants(self.tree.root_node())
            .into_iter()
            .filter(|node| node.kind() == "decorator")
            .filter_map(|node| {
                named_children(node)
                    .into_iter()
                    .find(|child| child.kind() == "call_expression")
            })
            .filter(|call| {
                call.child_by_field_name("function")
                    .is_some_and(|function| self.node_text(function) == decorator)
            })
            .filter_map(|call| call.child_by_field_name("arguments"))
            .find_map(|args| {
                named_children(args)
                    .into_iter()
                    .find(|arg| arg.kind() == "object")
            })
    }

    fn property_value<'t>(&self, object: Node<'t>, key: &str) -> Option<Node<'t>> {
        named_children(object)
            .into_iter()
            .filter(|child| child.kind() == "pair")
            .find(|pair| {
                pair.child_by_field_name("key")
                    .is_some_and(|k| unquote(self.node_text(k)) == key)
            })
            .and_then(|pair| pair.child_by_field_name("value"))
    }

    fn property_value_or_shorthand(&self, object: Node<'_>, key: &str) -> bool {
        self.property_value(object, key).is_some()
            || named_children(object).into_iter().any(|child| {
                child.kind() == "shorthand_property_identifier" && self.node_text(child) == key
            })
    }

    fn array_insertion(&self, array: Node<'_>, symbol: &str) -> Option<Insertion> {
        let elements: Vec<Node<'_>> = named_children(array)
            .into_iter()
            .filter(|n| n.kind() != "comment")
            .collect();

        if elements.iter().any(|e| self.node_text(*e).trim() == symbol) {
            return None;
        }

        let Some(last) = elements.last() else {
            return Some(Insertion {
                offset: array.start_byte() + 1,
                text: symbol.to_string(),
            });
        };

        let first_start = elements.first().map_or(last.start_byte(), Node::start_byte);
        let multiline = self
            .text
            .get(array.start_byte()..first_start)
            .is_some_and(|gap| gap.contains('\n'));

        let text = if multiline {
            format!(",\n{}{symbol}", line_indent(&self.text, last.start_byte()))
        } else {
            format!(", {symbol}")
        };

        Some(Insertion {
            offset: last.end_byte(),
            text,
        })
    }
}

/// `type ` modifier of an import statement or specifier, up to the next
/// token.
fn type_keyword(node: Node<'_>) -> Option<Span> {
    let mut cursor = node.walk();
    let keyword = node
        .children(&mut cursor)
        .find(|child| !child.is_named() && child.kind() == "type")?;
    let end = keyword
        .next_sibling()
        .map_or(keyword.end_byte(), |next| next.start_byte());
    Some(Span::new(keyword.start_byte(), end))
}

fn unquote(text: &str) -> &str {
    text.trim_matches(|c| c == '\'' || c == '"' || c == '`')
}

fn span_of(node: Node<'_>) -> Span {
    Span::new(node.start_byte(), node.end_byte())
}

fn named_children(node: Node<'_>) -> Vec<Node<'_>> {
    let mut cursor = node.walk();
    node.named_children(&mut cursor).collect()
}

/// Pre-order walk over every node below (and including) `root`.
fn descendants(root: Node<'_>) -> Vec<Node<'_>> {
    let mut out = Vec::new();
    let mut stack = vec![root];
    while let Some(node) = stack.pop() {
        out.push(node);
        let mut cursor = node.walk();
        let children: Vec<_> = node.children(&mut cursor).collect();
        stack.extend(children.into_iter().rev());
    }
    out
}
