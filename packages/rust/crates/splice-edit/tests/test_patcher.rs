//! Tests for patcher module - file-level operations over a FileTree.

use std::fs;
use std::path::Path;

use splice_edit::{BodySide, EditError, PatchConfig, PatchOutcome, Patcher};
use splice_io::{FileTree, IoError, MemoryTree};
use tempfile::TempDir;

const INDEX_HTML: &str = "<!doctype html>\n<html>\n<body>\n  <app-root></app-root>\n</body>\n</html>\n";

const APP_MODULE: &str = "import { NgModule } from '@angular/core';\n\n@NgModule({\n  providers: []\n})\nexport class AppModule {}\n";

const ANGULAR_JSON: &str = r#"{
  "projects": {
    "web": {
      "projectType": "application",
      "architect": {
        "build": {
          "builder": "@angular-devkit/build-angular:browser",
          "options": {}
        }
      }
    }
  }
}"#;

fn workspace() -> MemoryTree {
    let mut tree = MemoryTree::new();
    tree.insert("src/index.html", INDEX_HTML);
    tree.insert("src/app/app.module.ts", APP_MODULE);
    tree.insert(
        "src/environments/environment.ts",
        "export const environment = {\n  production: false\n};\n",
    );
    tree.insert("src/main.server.ts", "export { AppServerModule } from './app/app.server.module';\n");
    tree.insert("angular.json", ANGULAR_JSON);
    tree
}

#[test]
fn test_append_to_body_writes_once() {
    let mut tree = workspace();
    let mut patcher = Patcher::new(&mut tree);

    let first = patcher
        .append_html_element_to_body("src/index.html", "<app-toast></app-toast>", BodySide::Right)
        .unwrap();
    assert_eq!(first.outcome, PatchOutcome::Inserted);
    assert!(first.written);
    assert_eq!(first.edits, 1);
    assert!(first.diff.contains("+  <app-toast></app-toast>"));

    let second = patcher
        .append_html_element_to_body("/src/index.html", "<app-toast></app-toast>", BodySide::Right)
        .unwrap();
    assert_eq!(second.outcome, PatchOutcome::AlreadyPresent);
    assert!(!second.written);
    assert!(second.diff.is_empty());

    assert_eq!(
        tree.get("src/index.html"),
        Some("<!doctype html>\n<html>\n<body>\n  <app-root></app-root>\n  <app-toast></app-toast>\n</body>\n</html>\n")
    );
}

#[test]
fn test_add_body_class() {
    let mut tree = workspace();
    let result = Patcher::new(&mut tree)
        .add_body_class("src/index.html", "mat-typography")
        .unwrap();

    assert_eq!(result.outcome, PatchOutcome::Inserted);
    assert!(tree.get("src/index.html").unwrap().contains(r#"<body class="mat-typography">"#));
}

#[test]
fn test_add_symbol_to_module_and_rerun() {
    let mut tree = workspace();
    let mut patcher = Patcher::new(&mut tree);

    let first = patcher
        .add_symbol_to_module("src/app/app.module.ts", "providers", "Foo", "./foo")
        .unwrap();
    assert_eq!(first.outcome, PatchOutcome::Inserted);
    assert_eq!(first.edits, 2);

    let second = patcher
        .add_symbol_to_module("src/app/app.module.ts", "providers", "Foo", "./foo")
        .unwrap();
    assert_eq!(second.outcome, PatchOutcome::AlreadyPresent);

    assert_eq!(
        tree.get("src/app/app.module.ts"),
        Some("import { NgModule } from '@angular/core';\nimport { Foo } from './foo';\n\n@NgModule({\n  providers: [Foo]\n})\nexport class AppModule {}\n")
    );
}

#[test]
fn test_missing_list_names_file_and_anchor() {
    let mut tree = workspace();
    let err = Patcher::new(&mut tree)
        .add_symbol_to_module("src/app/app.module.ts", "declarations", "Foo", "./foo")
        .unwrap_err();

    match err {
        EditError::StructuralNotFound { path, anchor } => {
            assert_eq!(path, "src/app/app.module.ts");
            assert!(anchor.contains("declarations"));
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(tree.get("src/app/app.module.ts"), Some(APP_MODULE));
}

#[test]
fn test_malformed_module() {
    let mut tree = MemoryTree::new();
    tree.insert("broken.module.ts", "export class {{{ ");

    let err = Patcher::new(&mut tree)
        .add_symbol_to_module("broken.module.ts", "providers", "Foo", "./foo")
        .unwrap_err();
    assert!(matches!(err, EditError::MalformedInput { .. }));
}

#[test]
fn test_markup_with_bare_ampersand() {
    let mut tree = MemoryTree::new();
    tree.insert("src/index.html", "<html><body>a & b</body></html>");

    let result = Patcher::new(&mut tree)
        .add_body_class("src/index.html", "zz")
        .unwrap();
    assert_eq!(result.outcome, PatchOutcome::Inserted);
    assert_eq!(
        tree.get("src/index.html"),
        Some(r#"<html><body class="zz">a & b</body></html>"#)
    );
}

#[test]
fn test_file_not_found() {
    let mut tree = MemoryTree::new();
    let err = Patcher::new(&mut tree)
        .add_body_class("src/index.html", "x")
        .unwrap_err();

    assert!(matches!(err, EditError::FileNotFound(ref path) if path == "src/index.html"));
    assert!(err.to_string().contains("src/index.html"));
}

#[test]
fn test_append_to_start_file() {
    let mut tree = MemoryTree::new();
    tree.insert("src/main.ts", "bootstrap();\n");
    let mut patcher = Patcher::new(&mut tree);

    let first = patcher.append_to_start_file("src/main.ts", "import 'zone.js';").unwrap();
    let second = patcher.append_to_start_file("src/main.ts", "import 'zone.js';").unwrap();

    assert_eq!(first.outcome, PatchOutcome::Inserted);
    assert_eq!(second.outcome, PatchOutcome::AlreadyPresent);
    assert_eq!(tree.get("src/main.ts"), Some("import 'zone.js';\nbootstrap();\n"));
}

#[test]
fn test_remove_content_from_file() {
    let mut tree = workspace();
    let mut patcher = Patcher::new(&mut tree);

    let first = patcher.remove_content_from_file("src/main.server.ts").unwrap();
    assert_eq!(first.outcome, PatchOutcome::Cleared);
    assert!(first.diff.contains("-export { AppServerModule }"));

    let second = patcher.remove_content_from_file("src/main.server.ts").unwrap();
    assert_eq!(second.outcome, PatchOutcome::AlreadyPresent);

    assert_eq!(tree.get("src/main.server.ts"), Some(""));
}

#[test]
fn test_add_environment_var() {
    let mut tree = workspace();
    let result = Patcher::new(&mut tree)
        .add_environment_var("src", None, "apiUrl", "https://api.example.com")
        .unwrap();

    assert_eq!(result.path, "src/environments/environment.ts");
    assert_eq!(
        tree.get("src/environments/environment.ts"),
        Some("export const environment = {\n  apiUrl: 'https://api.example.com',\n  production: false\n};\n")
    );
}

#[test]
fn test_missing_environment_file() {
    let mut tree = workspace();
    let err = Patcher::new(&mut tree)
        .add_environment_var("src", Some("prod"), "apiUrl", "/api")
        .unwrap_err();
    assert!(matches!(err, EditError::FileNotFound(ref path) if path == "src/environments/environment.prod.ts"));
}

#[test]
fn test_add_style_and_token_check() {
    let mut tree = workspace();
    let mut patcher = Patcher::new(&mut tree);

    assert!(!patcher.has_style_token("bootstrap").unwrap());
    let result = patcher
        .add_style("node_modules/bootstrap/dist/css/bootstrap.min.css")
        .unwrap();
    assert_eq!(result.outcome, PatchOutcome::Inserted);
    assert!(patcher.has_style_token("bootstrap").unwrap());

    let again = patcher
        .add_style("node_modules/bootstrap/dist/css/bootstrap.min.css")
        .unwrap();
    assert_eq!(again.outcome, PatchOutcome::AlreadyPresent);

    let written = tree.get("angular.json").unwrap();
    assert!(written.contains("\"input\": \"node_modules/bootstrap/dist/css/bootstrap.min.css\""));
}

#[test]
fn test_add_style_without_browser_app() {
    let mut tree = MemoryTree::new();
    tree.insert("angular.json", r#"{ "projects": {} }"#);

    let result = Patcher::new(&mut tree).add_style("a.css").unwrap();
    assert_eq!(result.outcome, PatchOutcome::NotFound);
    assert_eq!(tree.get("angular.json"), Some(r#"{ "projects": {} }"#));
}

#[test]
fn test_invalid_workspace_config() {
    let mut tree = MemoryTree::new();
    tree.insert("angular.json", "{");

    let err = Patcher::new(&mut tree).add_style("a.css").unwrap_err();
    assert!(matches!(err, EditError::Config { .. }));
}

#[test]
fn test_preview_only_leaves_tree_untouched() {
    let mut tree = workspace();
    let config = PatchConfig {
        preview_only: true,
        ..PatchConfig::default()
    };
    let result = Patcher::with_config(&mut tree, config)
        .add_body_class("src/index.html", "dark")
        .unwrap();

    assert_eq!(result.outcome, PatchOutcome::Inserted);
    assert!(!result.written);
    assert!(result.modified.contains(r#"class="dark""#));
    assert!(result.diff.contains("+<body class=\"dark\">"));
    assert_eq!(tree.get("src/index.html"), Some(INDEX_HTML));
}

#[test]
fn test_disk_tree_roundtrip() {
    let dir = TempDir::new().expect("Should create temp dir");
    fs::create_dir_all(dir.path().join("src")).unwrap();
    fs::write(dir.path().join("src/index.html"), "<body></body>").unwrap();

    let config = PatchConfig::default();
    let mut tree = config.disk_tree(dir.path());
    let result = Patcher::with_config(&mut tree, config)
        .append_html_element_to_body("src/index.html", "<script>x</script>", BodySide::Right)
        .unwrap();

    assert!(result.written);
    assert_eq!(
        fs::read_to_string(dir.path().join("src/index.html")).unwrap(),
        "<body><script>x</script></body>"
    );
}

#[test]
fn test_disk_tree_size_limit() {
    let dir = TempDir::new().expect("Should create temp dir");
    fs::write(dir.path().join("big.html"), "<body>".repeat(64) + "</body>").unwrap();

    let config = PatchConfig {
        max_file_size: 16,
        ..PatchConfig::default()
    };
    let mut tree = config.disk_tree(dir.path());
    assert!(!tree.exists(Path::new("missing.html")));

    let err = Patcher::with_config(&mut tree, config)
        .add_body_class("big.html", "x")
        .unwrap_err();
    assert!(matches!(
        err,
        EditError::Io(IoError::TooLarge { ref path, limit: 16, .. }) if path == "big.html"
    ));
}

#[test]
fn test_disk_tree_strict_utf8() {
    let dir = TempDir::new().expect("Should create temp dir");
    fs::write(dir.path().join("index.html"), b"<body>caf\xe9</body>").unwrap();

    let config = PatchConfig {
        strict_utf8: true,
        ..PatchConfig::default()
    };
    let mut tree = config.disk_tree(dir.path());
    let err = Patcher::with_config(&mut tree, config)
        .add_body_class("index.html", "x")
        .unwrap_err();
    assert!(matches!(
        err,
        EditError::Io(IoError::InvalidUtf8 { valid_up_to: 9, .. })
    ));
    assert_eq!(
        fs::read(dir.path().join("index.html")).unwrap(),
        b"<body>caf\xe9</body>"
    );
}
