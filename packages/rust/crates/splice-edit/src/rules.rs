//! Patch plans - ordered rule lists applied to one file tree.
//!
//! A plan is usually loaded from YAML:
//!
//! ```yaml
//! rules:
//!   - rule: add_body_class
//!     path: src/index.html
//!     class_name: mat-typography
//!   - rule: add_module_symbol
//!     module: src/app/app.module.ts
//!     list: imports
//!     symbol: MatButtonModule
//!     import_path: "@angular/material/button"
//! ```
//!
//! Rules run in order. A failing rule is recorded against its file and the
//! run continues; files already written stay written.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use splice_ast::{build_relative_path, normalize_module_specifier};
use splice_io::FileTree;

use crate::error::EditError;
use crate::module::environment_file_path;
use crate::patcher::Patcher;
use crate::types::{BodySide, PatchOutcome, PatchResult};

/// Where an imported symbol comes from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SymbolSource {
    /// Module specifier used verbatim (`@angular/material/button`).
    ImportPath {
        /// Specifier as written in the import.
        import_path: String,
    },
    /// Tree path of the declaring file; the specifier is made relative to
    /// the patched module.
    SymbolFile {
        /// Declaring file (`src/app/foo/foo.component.ts`).
        symbol_file: String,
    },
}

/// One patch operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum PatchRule {
    /// Append markup to `<body>`.
    AppendToBody {
        /// HTML document.
        path: String,
        /// Markup fragment.
        html: String,
        /// Start or end of the body.
        #[serde(default)]
        side: BodySide,
    },
    /// Add a class token to `<body>`.
    AddBodyClass {
        /// HTML document.
        path: String,
        /// Class token.
        class_name: String,
    },
    /// Import a symbol and register it in an `@NgModule` list.
    AddModuleSymbol {
        /// Module source file.
        module: String,
        /// Decorator list (`imports`, `declarations`, ...).
        list: String,
        /// Exported symbol.
        symbol: String,
        /// Import specifier or declaring file.
        #[serde(flatten)]
        source: SymbolSource,
    },
    /// Put a fragment on the first line of a file.
    AppendToStartFile {
        /// Target file.
        path: String,
        /// Fragment, inserted with a trailing newline.
        fragment: String,
    },
    /// Empty a file.
    RemoveContent {
        /// Target file.
        path: String,
    },
    /// Add a property to an application's environment object.
    AddEnvironmentVar {
        /// Application source root (`src`).
        app_path: String,
        /// Environment name; the default environment when absent.
        #[serde(default)]
        env: Option<String>,
        /// Property key.
        key: String,
        /// Property value, written as a string literal.
        value: String,
    },
    /// Register a global stylesheet in the workspace config.
    AddStyle {
        /// Stylesheet path relative to the workspace.
        style_path: String,
    },
}

impl PatchRule {
    /// File this rule writes to.
    #[must_use]
    pub fn target(&self, workspace_config: &Path) -> String {
        match self {
            Self::AppendToBody { path, .. }
            | Self::AddBodyClass { path, .. }
            | Self::AppendToStartFile { path, .. }
            | Self::RemoveContent { path } => path.clone(),
            Self::AddModuleSymbol { module, .. } => module.clone(),
            Self::AddEnvironmentVar { app_path, env, .. } => {
                environment_file_path(app_path, env.as_deref())
            }
            Self::AddStyle { .. } => workspace_config.display().to_string(),
        }
    }

    /// Import specifier for `AddModuleSymbol`.
    fn import_specifier(module: &str, source: &SymbolSource) -> String {
        match source {
            SymbolSource::ImportPath { import_path } => import_path.clone(),
            SymbolSource::SymbolFile { symbol_file } => {
                normalize_module_specifier(&build_relative_path(module, symbol_file))
            }
        }
    }
}

/// An ordered list of rules.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatchPlan {
    /// Rules in application order.
    #[serde(default)]
    pub rules: Vec<PatchRule>,
}

impl PatchPlan {
    /// Parse a YAML plan.
    ///
    /// # Errors
    /// `EditError::Plan` when the YAML does not describe a plan.
    pub fn from_yaml_str(raw: &str) -> Result<Self, EditError> {
        serde_yaml::from_str(raw).map_err(|e| EditError::Plan(e.to_string()))
    }

    /// Load a YAML plan from disk.
    ///
    /// # Errors
    /// `EditError::Plan` when the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, EditError> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| EditError::Plan(format!("{}: {e}", path.display())))?;
        Self::from_yaml_str(&raw)
    }
}

/// Statistics for one plan run.
#[derive(Debug, Default)]
pub struct PatchRunStats {
    /// Rules that ran without error.
    pub rules_applied: usize,
    /// Rules that changed their file.
    pub files_changed: usize,
    /// Rules whose effect was already present.
    pub already_present: usize,
    /// Rules whose optional target was absent.
    pub not_found: usize,
    /// Errors encountered (path -> error message)
    pub errors: HashMap<String, String>,
    /// Modified files, in first-change order.
    pub modified_files: Vec<String>,
    /// Per-rule results, in rule order.
    pub results: Vec<PatchResult>,
}

impl PatchRunStats {
    fn record(&mut self, result: PatchResult) {
        self.rules_applied += 1;
        match result.outcome {
            PatchOutcome::Inserted | PatchOutcome::Cleared => {
                self.files_changed += 1;
                if !self.modified_files.contains(&result.path) {
                    self.modified_files.push(result.path.clone());
                }
            }
            PatchOutcome::AlreadyPresent => self.already_present += 1,
            PatchOutcome::NotFound => self.not_found += 1,
        }
        self.results.push(result);
    }

    /// Whether every rule ran without error.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.errors.is_empty()
    }
}

impl<T: FileTree + ?Sized> Patcher<'_, T> {
    /// Apply a single rule.
    ///
    /// # Errors
    /// Whatever the underlying operation returns.
    pub fn apply_rule(&mut self, rule: &PatchRule) -> Result<PatchResult, EditError> {
        match rule {
            PatchRule::AppendToBody { path, html, side } => {
                self.append_html_element_to_body(path, html, *side)
            }
            PatchRule::AddBodyClass { path, class_name } => self.add_body_class(path, class_name),
            PatchRule::AddModuleSymbol {
                module,
                list,
                symbol,
                source,
            } => {
                let specifier = PatchRule::import_specifier(module, source);
                self.add_symbol_to_module(module, list, symbol, &specifier)
            }
            PatchRule::AppendToStartFile { path, fragment } => {
                self.append_to_start_file(path, fragment)
            }
            PatchRule::RemoveContent { path } => self.remove_content_from_file(path),
            PatchRule::AddEnvironmentVar {
                app_path,
                env,
                key,
                value,
            } => self.add_environment_var(app_path, env.as_deref(), key, value),
            PatchRule::AddStyle { style_path } => self.add_style(style_path),
        }
    }

    /// Apply every rule of `plan` in order.
    ///
    /// Once a rule fails for a file, later rules for that file are skipped;
    /// other files keep going.
    pub fn apply_plan(&mut self, plan: &PatchPlan) -> PatchRunStats {
        let mut stats = PatchRunStats::default();
        let workspace_config = self.config().workspace_config_path.clone();

        for rule in &plan.rules {
            let target = rule.target(&workspace_config);
            if stats.errors.contains_key(&target) {
                tracing::debug!(path = %target, "skipping rule for failed file");
                continue;
            }
            match self.apply_rule(rule) {
                Ok(result) => stats.record(result),
                Err(error) => {
                    tracing::warn!(path = %target, error = %error, "patch rule failed");
                    stats.errors.insert(target, error.to_string());
                }
            }
        }

        tracing::info!(
            rules = plan.rules.len(),
            applied = stats.rules_applied,
            changed = stats.files_changed,
            errors = stats.errors.len(),
            "patch plan finished"
        );
        stats
    }
}
