//! Module source patch planners.

use splice_ast::{ImportResolution, Lang, ModuleSource, QuoteStyle};

use crate::batch::{Bias, EditBatch};
use crate::error::EditError;

/// Variable holding the environment settings object.
pub const ENVIRONMENT_VARIABLE: &str = "environment";

/// Plan importing `symbol` from `import_path` and adding it to the
/// `list_name` array of `@NgModule`, in one batch.
///
/// The list is located before anything is planned: a missing list aborts
/// the whole operation. An existing import of the same module is reused,
/// including its alias; a type-only import of the symbol is promoted to a
/// value import.
///
/// # Errors
/// `Locate` when the source does not parse or the list is missing.
pub fn plan_add_symbol(
    content: &str,
    lang: Lang,
    list_name: &str,
    symbol: &str,
    import_path: &str,
    quote: QuoteStyle,
) -> Result<Option<EditBatch>, EditError> {
    let source = ModuleSource::parse_as(content, lang)?.prefer_quote(quote);

    let import = source.locate_import_insertion_point(import_path, symbol);
    let declaration =
        source.locate_declaration_list_insertion_point(list_name, import.local_name())?;

    if !import.needs_edit() && declaration.is_none() {
        return Ok(None);
    }

    let mut batch = EditBatch::open(content);
    match &import {
        ImportResolution::Existing { .. } => {}
        ImportResolution::Insert { insertion, .. } => {
            batch.insert(insertion.offset, insertion.text.clone(), Bias::Left)?;
        }
        ImportResolution::Promote {
            removals, insertions, ..
        } => {
            for span in removals {
                batch.remove(span.start, span.end)?;
            }
            for insertion in insertions {
                batch.insert(insertion.offset, insertion.text.clone(), Bias::Left)?;
            }
        }
    }
    if let Some(insertion) = declaration {
        batch.insert(insertion.offset, insertion.text, Bias::Left)?;
    }
    Ok(Some(batch))
}

/// Path of the environment file for `env` (`None` for the default one).
#[must_use]
pub fn environment_file_path(app_path: &str, env: Option<&str>) -> String {
    let app_path = app_path.trim_end_matches('/');
    match env.filter(|e| !e.is_empty()) {
        Some(env) => format!("{app_path}/environments/environment.{env}.ts"),
        None => format!("{app_path}/environments/environment.ts"),
    }
}

/// Plan adding `key: 'value'` to the `environment` object literal.
///
/// # Errors
/// `Locate` when the source does not parse or has no `environment` object.
pub fn plan_add_environment_var(
    content: &str,
    key: &str,
    value: &str,
    quote: QuoteStyle,
) -> Result<Option<EditBatch>, EditError> {
    let source = ModuleSource::parse(content)?.prefer_quote(quote);
    let Some(insertion) =
        source.locate_object_property_insertion_point(ENVIRONMENT_VARIABLE, key, value)?
    else {
        return Ok(None);
    };

    let mut batch = EditBatch::open(content);
    batch.insert(insertion.offset, insertion.text, Bias::Right)?;
    Ok(Some(batch))
}
