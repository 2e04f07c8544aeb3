//! Tests for workspace module - angular.json transforms.

use serde_json::{Value, json};
use splice_edit::PatchOutcome;
use splice_edit::workspace::{
    add_style, browser_app_name, find_browser_app, has_style_token, parse_workspace_config,
    render_workspace_config,
};

const ANGULAR_JSON: &str = r#"{
  "version": 1,
  "projects": {
    "ui-lib": {
      "projectType": "library",
      "architect": {
        "build": { "builder": "@angular-devkit/build-angular:ng-packagr" }
      }
    },
    "web": {
      "projectType": "application",
      "architect": {
        "build": {
          "builder": "@angular-devkit/build-angular:browser",
          "options": { "styles": ["src/styles.css"] }
        }
      }
    }
  },
  "defaultProject": "web"
}"#;

fn config() -> Value {
    parse_workspace_config("angular.json", ANGULAR_JSON).expect("Should parse fixture")
}

#[test]
fn test_find_browser_app() {
    let config = config();
    let (name, project) = find_browser_app(&config).unwrap();
    assert_eq!(name, "web");
    assert_eq!(project["projectType"], "application");
    assert_eq!(browser_app_name(&config).as_deref(), Some("web"));
}

#[test]
fn test_add_style_is_pure_and_idempotent() {
    let original = config();
    let bootstrap = "node_modules/bootstrap/dist/css/bootstrap.min.css";

    let (updated, outcome) = add_style(&original, bootstrap);
    assert_eq!(outcome, PatchOutcome::Inserted);
    assert_eq!(
        updated.pointer("/projects/web/architect/build/options/styles"),
        Some(&json!(["src/styles.css", { "input": bootstrap }]))
    );
    // input untouched
    assert_eq!(original, config());

    let (again, outcome) = add_style(&updated, bootstrap);
    assert_eq!(outcome, PatchOutcome::AlreadyPresent);
    assert_eq!(again, updated);
}

#[test]
fn test_existing_string_entry_counts_as_present() {
    let (_, outcome) = add_style(&config(), "src/styles.css");
    assert_eq!(outcome, PatchOutcome::AlreadyPresent);
}

#[test]
fn test_no_browser_app() {
    let config = json!({ "projects": { "ui-lib": { "projectType": "library" } } });
    let (unchanged, outcome) = add_style(&config, "a.css");
    assert_eq!(outcome, PatchOutcome::NotFound);
    assert_eq!(unchanged, config);
    assert!(!has_style_token(&config, "a"));
}

#[test]
fn test_style_token_is_whole_segment() {
    let (with_theme, _) = add_style(&config(), "src/styles/my-bootstrap-theme.scss");
    assert!(!has_style_token(&with_theme, "bootstrap"));

    let (with_bootstrap, _) = add_style(&with_theme, "node_modules/bootstrap/dist/css/bootstrap.min.css");
    assert!(has_style_token(&with_bootstrap, "bootstrap"));
    assert!(has_style_token(&with_bootstrap, "styles"));
}

#[test]
fn test_render_keeps_key_order() {
    let (updated, _) = add_style(&config(), "src/theme.scss");
    let rendered = render_workspace_config("angular.json", &updated).unwrap();

    let version = rendered.find("\"version\"").unwrap();
    let projects = rendered.find("\"projects\"").unwrap();
    let default_project = rendered.find("\"defaultProject\"").unwrap();
    assert!(version < projects && projects < default_project);
    assert!(rendered.contains("\n  \"version\": 1,"));
}

#[test]
fn test_invalid_json() {
    assert!(parse_workspace_config("angular.json", "{ not json").is_err());
}
