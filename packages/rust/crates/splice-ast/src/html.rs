//! HTML structural locator.
//!
//! Markup is parsed with tree-sitter and converted into an owned tree of
//! [`HtmlNode`]s. Every element carries a [`SourceLocation`] with byte
//! offsets for its start tag, end tag and attributes, so callers can plan
//! insertions without re-scanning the text.
//!
//! Recovered parse errors are kept as damage spans. Text like `a & b` does
//! not block a patch; damage inside the tags of the element being located
//! does.

use std::collections::{BTreeMap, VecDeque};

use serde::Serialize;
use tree_sitter::Node;

use crate::error::LocateError;
use crate::lang::{Lang, error_spans};
use crate::location::{SourceLocation, Span, column_of};

/// A node of parsed markup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum HtmlNode {
    /// An element with its tags, attributes and children.
    Element(HtmlElement),
    /// Character data (including raw script/style bodies).
    Text(TextNode),
    /// `<!-- ... -->`
    Comment(TextNode),
}

/// Text or comment content with its span.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TextNode {
    /// Raw source text.
    pub text: String,
    /// Where the text sits.
    pub span: Span,
}

/// A single attribute of a start tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HtmlAttribute {
    /// Lowercased attribute name.
    pub name: String,
    /// Attribute value without quotes; `None` for valueless attributes.
    pub value: Option<String>,
    /// Span of the value without its quotes.
    pub value_span: Option<Span>,
    /// Whether the value is wrapped in quotes.
    pub quoted: bool,
    /// Span of the whole `name="value"` text.
    pub span: Span,
}

/// An element and its source positions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HtmlElement {
    /// Lowercased tag name.
    pub tag_name: String,
    /// Attributes in source order.
    pub attributes: Vec<HtmlAttribute>,
    /// Child nodes in source order.
    pub children: Vec<HtmlNode>,
    /// Tag and attribute offsets.
    pub location: SourceLocation,
    /// End of the tag name inside the start tag.
    pub name_end: usize,
}

impl HtmlElement {
    /// First attribute called `name` (case-insensitive).
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&HtmlAttribute> {
        self.attributes
            .iter()
            .find(|attr| attr.name.eq_ignore_ascii_case(name))
    }

    /// Child elements, skipping text and comments.
    pub fn child_elements(&self) -> impl Iterator<Item = &HtmlElement> {
        self.children.iter().filter_map(|node| match node {
            HtmlNode::Element(element) => Some(element),
            HtmlNode::Text(_) | HtmlNode::Comment(_) => None,
        })
    }

    /// Offset right after the last attribute (or the tag name), where a new
    /// attribute can be inserted with a leading space.
    #[must_use]
    pub fn attribute_insertion_offset(&self) -> usize {
        self.attributes
            .last()
            .map_or(self.name_end, |attr| attr.span.end)
    }

    /// Bytes between the end of the start tag and the start of the end tag.
    #[must_use]
    pub fn content_span(&self) -> Option<Span> {
        let end_tag = self.location.end_tag?;
        Some(Span::new(self.location.start_tag.end, end_tag.start))
    }
}

/// Parsed markup document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HtmlDocument {
    /// Top-level nodes.
    pub nodes: Vec<HtmlNode>,
    /// Spans of error and missing nodes the parser recovered from.
    pub damage: Vec<Span>,
}

impl HtmlDocument {
    /// Parse markup into an owned tree.
    ///
    /// # Errors
    /// `MalformedInput` when the markup cannot be tokenized at all.
    pub fn parse(markup: &str) -> Result<Self, LocateError> {
        let tree = Lang::Html.parse(markup)?;
        let root = tree.root_node();
        let damage = error_spans(root);
        if !damage.is_empty() {
            tracing::debug!(spans = damage.len(), "markup parsed with recovered errors");
        }
        let mut nodes = Vec::new();
        convert_children(root, markup, &mut nodes);
        Ok(Self { nodes, damage })
    }

    /// First element named `tag_name` in breadth-first order.
    ///
    /// Elements on a shallower nesting level win; within a level, document
    /// order wins. Damage is not consulted; see [`Self::locate`].
    #[must_use]
    pub fn find_element_by_tag(&self, tag_name: &str) -> Option<&HtmlElement> {
        let mut queue: VecDeque<&HtmlNode> = self.nodes.iter().collect();
        while let Some(node) = queue.pop_front() {
            match node {
                HtmlNode::Element(element) => {
                    if element.tag_name.eq_ignore_ascii_case(tag_name) {
                        return Some(element);
                    }
                    queue.extend(element.children.iter());
                }
                HtmlNode::Text(_) | HtmlNode::Comment(_) => {}
            }
        }
        None
    }

    /// Like [`Self::find_element_by_tag`], but refuses elements whose
    /// offsets the parser could not vouch for.
    ///
    /// # Errors
    /// `MalformedInput` when damage overlaps the start or end tag of the
    /// match, or when nothing matched and the markup has damage that may
    /// hide the element.
    pub fn locate(&self, tag_name: &str) -> Result<Option<&HtmlElement>, LocateError> {
        let Some(element) = self.find_element_by_tag(tag_name) else {
            return match self.damage.first() {
                Some(span) => Err(LocateError::MalformedInput {
                    lang: Lang::Html.as_str(),
                    reason: format!("no <{tag_name}> element; syntax error at byte {}", span.start),
                }),
                None => Ok(None),
            };
        };

        let tags = [Some(element.location.start_tag), element.location.end_tag];
        let hit = self
            .damage
            .iter()
            .find(|damage| tags.iter().flatten().any(|tag| overlaps(**damage, *tag)));
        match hit {
            Some(span) => Err(LocateError::MalformedInput {
                lang: Lang::Html.as_str(),
                reason: format!("syntax error at byte {} in a <{tag_name}> tag", span.start),
            }),
            None => Ok(Some(element)),
        }
    }
}

/// Parse `markup` and return the first element named `tag_name`.
///
/// # Errors
/// `MalformedInput` when the markup cannot be tokenized or the element's
/// tags are damaged. A missing element is `Ok(None)`.
pub fn find_element_by_tag(markup: &str, tag_name: &str) -> Result<Option<HtmlElement>, LocateError> {
    let document = HtmlDocument::parse(markup)?;
    Ok(document.locate(tag_name)?.cloned())
}

/// Indentation new child markup should use: the column of the first child
/// element, or zero when there is none.
#[must_use]
pub fn compute_child_indentation(element: &HtmlElement) -> usize {
    element
        .child_elements()
        .next()
        .map_or(0, |child| child.location.column)
}

/// Whether `attr_name`'s value contains `token` as a whole
/// whitespace-delimited unit.
#[must_use]
pub fn has_attribute_value_token(element: &HtmlElement, attr_name: &str, token: &str) -> bool {
    element
        .attribute(attr_name)
        .and_then(|attr| attr.value.as_deref())
        .is_some_and(|value| value.split_whitespace().any(|part| part == token))
}

// ============================================================================
// tree-sitter conversion
// ============================================================================

// Zero-width damage (a missing node) counts when it sits inside the tag.
fn overlaps(damage: Span, tag: Span) -> bool {
    damage.start < tag.end && tag.start < damage.end.max(damage.start + 1)
}

fn span_of(node: Node<'_>) -> Span {
    Span::new(node.start_byte(), node.end_byte())
}

fn text_of(node: Node<'_>, source: &str) -> String {
    source
        .get(node.start_byte()..node.end_byte())
        .unwrap_or_default()
        .to_string()
}

fn named_children(node: Node<'_>) -> Vec<Node<'_>> {
    let mut cursor = node.walk();
    node.named_children(&mut cursor).collect()
}

fn convert_children(parent: Node<'_>, source: &str, out: &mut Vec<HtmlNode>) {
    for child in named_children(parent) {
        match child.kind() {
            "element" | "script_element" | "style_element" => {
                if let Some(element) = convert_element(child, source) {
                    out.push(HtmlNode::Element(element));
                }
            }
            "comment" => out.push(HtmlNode::Comment(TextNode {
                text: text_of(child, source),
                span: span_of(child),
            })),
            "text" | "raw_text" | "entity" => out.push(HtmlNode::Text(TextNode {
                text: text_of(child, source),
                span: span_of(child),
            })),
            // doctype, tags, stray end tags
            _ => {}
        }
    }
}

fn convert_element(node: Node<'_>, source: &str) -> Option<HtmlElement> {
    let mut start_tag = None;
    let mut end_tag = None;
    for child in named_children(node) {
        match child.kind() {
            "start_tag" | "self_closing_tag" => start_tag = Some(child),
            "end_tag" => end_tag = Some(span_of(child)),
            _ => {}
        }
    }

    // Tags themselves fall through the `_` arm of `convert_children`.
    let mut children = Vec::new();
    convert_children(node, source, &mut children);

    let start_tag = start_tag?;
    let mut tag_name = String::new();
    let mut name_end = start_tag.start_byte() + 1;
    let mut attributes = Vec::new();

    for part in named_children(start_tag) {
        match part.kind() {
            "tag_name" => {
                tag_name = text_of(part, source).to_ascii_lowercase();
                name_end = part.end_byte();
            }
            "attribute" => attributes.push(convert_attribute(part, source)),
            _ => {}
        }
    }

    let mut attrs = BTreeMap::new();
    for attr in &attributes {
        attrs.entry(attr.name.clone()).or_insert(attr.span);
    }

    Some(HtmlElement {
        location: SourceLocation {
            name: tag_name.clone(),
            start_tag: span_of(start_tag),
            end_tag,
            attrs,
            column: column_of(source, node.start_byte()),
        },
        tag_name,
        attributes,
        children,
        name_end,
    })
}

fn convert_attribute(node: Node<'_>, source: &str) -> HtmlAttribute {
    let mut name = String::new();
    let mut value_span = None;
    let mut quoted = false;

    for part in named_children(node) {
        match part.kind() {
            "attribute_name" => name = text_of(part, source).to_ascii_lowercase(),
            "attribute_value" => value_span = Some(span_of(part)),
            "quoted_attribute_value" => {
                quoted = true;
                let outer = span_of(part);
                let inner_end = outer.end.saturating_sub(1).max(outer.start + 1);
                value_span = Some(Span::new(outer.start + 1, inner_end));
            }
            _ => {}
        }
    }

    let value = value_span.map(|span| {
        source
            .get(span.start..span.end)
            .unwrap_or_default()
            .to_string()
    });

    HtmlAttribute {
        name,
        value,
        value_span,
        quoted,
        span: span_of(node),
    }
}
