//! Tests for lang module - language detection and grammar parsing.

use std::path::Path;

use splice_ast::{Lang, LocateError};

#[test]
fn test_from_path() {
    assert_eq!(Lang::from_path(Path::new("src/index.html")), Some(Lang::Html));
    assert_eq!(
        Lang::from_path(Path::new("src/app/app.module.ts")),
        Some(Lang::TypeScript)
    );
    assert_eq!(Lang::from_path(Path::new("App.tsx")), Some(Lang::Tsx));
    assert_eq!(Lang::from_path(Path::new("angular.json")), None);
}

#[test]
fn test_try_from() {
    assert_eq!(Lang::try_from("TypeScript").unwrap(), Lang::TypeScript);
    assert!(matches!(
        Lang::try_from("cobol"),
        Err(LocateError::UnsupportedLanguage(_))
    ));
}

#[test]
fn test_parse_rejects_broken_source() {
    let result = Lang::TypeScript.parse("import { from ;;; {{");
    assert!(matches!(result, Err(LocateError::MalformedInput { .. })));
}

#[test]
fn test_markup_parse_keeps_recovered_tree() {
    assert!(Lang::Html.parse("<p>a & b</p>").is_ok());
    assert!(Lang::TypeScript.parse("const a = 1 &;").is_err());
}
