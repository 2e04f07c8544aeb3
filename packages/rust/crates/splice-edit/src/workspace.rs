//! Workspace configuration transforms.
//!
//! Pure functions over the parsed `angular.json` document: each takes the
//! current config and returns the new one, leaving I/O to the caller.

use serde_json::{Map, Value, json};

use crate::error::EditError;
use crate::guards::{has_path_token, json_array_contains, style_input};
use crate::types::PatchOutcome;

/// Builder used by browser application projects.
pub const BROWSER_BUILDER: &str = "@angular-devkit/build-angular:browser";

fn is_browser_application(project: &Value) -> bool {
    project.get("projectType").and_then(Value::as_str) == Some("application")
        && project
            .pointer("/architect/build/builder")
            .and_then(Value::as_str)
            == Some(BROWSER_BUILDER)
}

/// First browser application project, in document order.
#[must_use]
pub fn find_browser_app(config: &Value) -> Option<(&str, &Value)> {
    config
        .get("projects")?
        .as_object()?
        .iter()
        .find(|(_, project)| is_browser_application(project))
        .map(|(name, project)| (name.as_str(), project))
}

/// Name of the first browser application project.
#[must_use]
pub fn browser_app_name(config: &Value) -> Option<String> {
    find_browser_app(config).map(|(name, _)| name.to_string())
}

fn app_styles(project: &Value) -> impl Iterator<Item = &Value> {
    project
        .pointer("/architect/build/options/styles")
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
}

/// Append `{ "input": style_path }` to the browser app's build styles.
///
/// Returns the config unchanged with `AlreadyPresent` when an entry with the
/// same input exists, and with `NotFound` when there is no browser app.
#[must_use]
pub fn add_style(config: &Value, style_path: &str) -> (Value, PatchOutcome) {
    let Some(name) = browser_app_name(config) else {
        return (config.clone(), PatchOutcome::NotFound);
    };

    let entry = json!({ "input": style_path });
    let mut updated = config.clone();

    let Some(build) = updated
        .get_mut("projects")
        .and_then(|projects| projects.get_mut(&name))
        .and_then(|project| project.pointer_mut("/architect/build"))
        .and_then(Value::as_object_mut)
    else {
        return (config.clone(), PatchOutcome::NotFound);
    };

    let Some(options) = build
        .entry("options")
        .or_insert_with(|| Value::Object(Map::new()))
        .as_object_mut()
    else {
        return (config.clone(), PatchOutcome::NotFound);
    };

    let Some(styles) = options
        .entry("styles")
        .or_insert_with(|| Value::Array(Vec::new()))
        .as_array_mut()
    else {
        return (config.clone(), PatchOutcome::NotFound);
    };

    if json_array_contains(styles, &entry) {
        return (config.clone(), PatchOutcome::AlreadyPresent);
    }

    styles.push(entry);
    (updated, PatchOutcome::Inserted)
}

/// Whether any browser-app style path contains `token` as a whole path
/// segment (`bootstrap` matches `node_modules/bootstrap/...` but not
/// `my-bootstrap-theme.scss`).
#[must_use]
pub fn has_style_token(config: &Value, token: &str) -> bool {
    find_browser_app(config).is_some_and(|(_, project)| {
        app_styles(project)
            .filter_map(style_input)
            .any(|path| has_path_token(path, token))
    })
}

/// Parse workspace config text.
///
/// # Errors
/// `EditError::Config` when the text is not JSON.
pub fn parse_workspace_config(path: &str, raw: &str) -> Result<Value, EditError> {
    serde_json::from_str(raw).map_err(|e| EditError::Config {
        path: path.to_string(),
        reason: e.to_string(),
    })
}

/// Render workspace config with two-space indentation.
///
/// # Errors
/// `EditError::Config` when serialization fails.
pub fn render_workspace_config(path: &str, config: &Value) -> Result<String, EditError> {
    serde_json::to_string_pretty(config).map_err(|e| EditError::Config {
        path: path.to_string(),
        reason: e.to_string(),
    })
}
