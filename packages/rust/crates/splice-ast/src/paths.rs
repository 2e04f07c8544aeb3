//! Module specifier helpers.
//!
//! Imports are compared by resolved path, never by raw text, so that
//! `./foo`, `./foo.ts` and `./bar/../foo` all name the same module.

const SCRIPT_EXTENSIONS: [&str; 6] = [".ts", ".tsx", ".mts", ".js", ".mjs", ".jsx"];

fn is_relative(specifier: &str) -> bool {
    specifier == "."
        || specifier == ".."
        || specifier.starts_with("./")
        || specifier.starts_with("../")
}

/// Lexically normalize a module specifier.
///
/// Package specifiers (`@angular/core`) are returned trimmed but otherwise
/// unchanged. Relative specifiers lose their script extension and redundant
/// `.`/`..` segments, and always start with `./` or `../`.
#[must_use]
pub fn normalize_module_specifier(specifier: &str) -> String {
    let specifier = specifier.trim();
    if !is_relative(specifier) {
        return specifier.to_string();
    }

    let stem = SCRIPT_EXTENSIONS
        .iter()
        .find_map(|ext| specifier.strip_suffix(ext))
        .unwrap_or(specifier);

    let mut parts: Vec<&str> = Vec::new();
    for segment in stem.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                if matches!(parts.last(), Some(last) if *last != "..") {
                    parts.pop();
                } else {
                    parts.push("..");
                }
            }
            other => parts.push(other),
        }
    }

    let joined = parts.join("/");
    if joined.starts_with("..") {
        joined
    } else {
        format!("./{joined}")
    }
}

/// Relative import path from the file `from` to the module `to`.
///
/// Both are tree paths (`/src/app/app.module.ts`); the result always starts
/// with `./` or `../`.
#[must_use]
pub fn build_relative_path(from: &str, to: &str) -> String {
    let segments = |path: &str| -> Vec<String> {
        path.split('/')
            .filter(|s| !s.is_empty() && *s != ".")
            .map(str::to_string)
            .collect()
    };

    let mut from_dirs = segments(from);
    from_dirs.pop();
    let mut to_dirs = segments(to);
    let file = to_dirs.pop().unwrap_or_default();

    let common = from_dirs
        .iter()
        .zip(&to_dirs)
        .take_while(|(a, b)| a == b)
        .count();

    let mut parts: Vec<String> = vec!["..".to_string(); from_dirs.len() - common];
    parts.extend(to_dirs[common..].iter().cloned());
    parts.push(file);

    let joined = parts.join("/");
    if joined.starts_with("..") {
        joined
    } else {
        format!("./{joined}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_package_specifier_untouched() {
        assert_eq!(normalize_module_specifier("@angular/core"), "@angular/core");
    }

    #[test]
    fn test_relative_specifier_normalized() {
        assert_eq!(normalize_module_specifier("./foo"), "./foo");
        assert_eq!(normalize_module_specifier("./foo.ts"), "./foo");
        assert_eq!(normalize_module_specifier("./bar/../foo"), "./foo");
        assert_eq!(normalize_module_specifier(".//lib/./foo"), "./lib/foo");
        assert_eq!(normalize_module_specifier("../shared/x.js"), "../shared/x");
        assert_eq!(normalize_module_specifier("./a/../../b"), "../b");
    }
}
