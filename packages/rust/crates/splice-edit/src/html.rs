//! Markup patch planners.
//!
//! Pure functions from a snapshot to an [`EditBatch`]. `Ok(None)` means the
//! effect is already present and nothing needs to change.

use splice_ast::{
    HtmlDocument, HtmlElement, LocateError, compute_child_indentation, has_attribute_value_token,
};

use crate::batch::{Bias, EditBatch};
use crate::error::EditError;
use crate::guards::contains_fragment;
use crate::types::BodySide;

fn require_element<'d>(document: &'d HtmlDocument, tag_name: &str) -> Result<&'d HtmlElement, EditError> {
    document
        .locate(tag_name)?
        .ok_or_else(|| LocateError::StructuralNotFound(format!("<{tag_name}> element")).into())
}

/// Plan appending `fragment` inside the first `<tag_name>` element.
///
/// `Right` inserts before the end tag, `Left` right after the start tag.
/// When the element content spans several lines the fragment is indented
/// like the existing children and kept on its own line.
///
/// # Errors
/// `Locate` when the markup is malformed, the element is missing, or (for
/// `Right`) the element has no end tag.
pub fn plan_append_to_element(
    content: &str,
    tag_name: &str,
    fragment: &str,
    side: BodySide,
) -> Result<Option<EditBatch>, EditError> {
    if contains_fragment(content, fragment) {
        return Ok(None);
    }

    let document = HtmlDocument::parse(content)?;
    let element = require_element(&document, tag_name)?;

    let multiline = element
        .content_span()
        .and_then(|span| content.get(span.start..span.end))
        .is_some_and(|inner| inner.contains('\n'));
    let indent = if multiline {
        " ".repeat(compute_child_indentation(element))
    } else {
        String::new()
    };

    let mut batch = EditBatch::open(content);
    match side {
        BodySide::Right => {
            let end_tag = element.location.end_tag.ok_or_else(|| {
                LocateError::StructuralNotFound(format!("</{tag_name}> end tag"))
            })?;
            if multiline {
                // Start of the end tag's line when only indentation precedes it.
                let line_start = content[..end_tag.start].rfind('\n').map_or(0, |nl| nl + 1);
                let at_line_start = content[line_start..end_tag.start].trim().is_empty();
                if at_line_start {
                    batch.insert(line_start, format!("{indent}{fragment}\n"), Bias::Right)?;
                } else {
                    batch.insert(end_tag.start, format!("\n{indent}{fragment}\n"), Bias::Right)?;
                }
            } else {
                batch.insert(end_tag.start, fragment.to_string(), Bias::Right)?;
            }
        }
        BodySide::Left => {
            let text = if multiline {
                format!("\n{indent}{fragment}")
            } else {
                fragment.to_string()
            };
            batch.insert(element.location.start_tag.end, text, Bias::Left)?;
        }
    }
    Ok(Some(batch))
}

/// Plan appending `fragment` to `<body>`.
///
/// # Errors
/// See [`plan_append_to_element`].
pub fn plan_append_to_body(
    content: &str,
    fragment: &str,
    side: BodySide,
) -> Result<Option<EditBatch>, EditError> {
    plan_append_to_element(content, "body", fragment, side)
}

/// Plan adding `class_name` to the `class` attribute of `<tag_name>`.
///
/// Existing quoted values are extended in place, unquoted values are
/// quoted, and a missing attribute is added after the last attribute.
///
/// # Errors
/// `Locate` when the markup is malformed or the element is missing.
pub fn plan_add_class(
    content: &str,
    tag_name: &str,
    class_name: &str,
) -> Result<Option<EditBatch>, EditError> {
    let document = HtmlDocument::parse(content)?;
    let element = require_element(&document, tag_name)?;

    if has_attribute_value_token(element, "class", class_name) {
        return Ok(None);
    }

    let mut batch = EditBatch::open(content);
    match element.attribute("class") {
        Some(attr) => match (attr.value_span, attr.value.as_deref()) {
            (Some(span), Some(value)) if attr.quoted => {
                let text = if value.trim().is_empty() {
                    class_name.to_string()
                } else {
                    format!(" {class_name}")
                };
                batch.insert(span.end, text, Bias::Right)?;
            }
            (Some(span), _) => {
                batch
                    .insert(span.start, "\"", Bias::Left)?
                    .insert(span.end, format!(" {class_name}\""), Bias::Right)?;
            }
            (None, _) => {
                batch.insert(attr.span.end, format!("=\"{class_name}\""), Bias::Right)?;
            }
        },
        None => {
            batch.insert(
                element.attribute_insertion_offset(),
                format!(" class=\"{class_name}\""),
                Bias::Right,
            )?;
        }
    }
    Ok(Some(batch))
}

/// Plan adding `class_name` to `<body>`.
///
/// # Errors
/// See [`plan_add_class`].
pub fn plan_add_body_class(content: &str, class_name: &str) -> Result<Option<EditBatch>, EditError> {
    plan_add_class(content, "body", class_name)
}
