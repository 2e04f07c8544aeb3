//! File-level patch operations.
//!
//! Each operation reads one document from the tree, runs its idempotency
//! guard, plans an [`EditBatch`] against the snapshot, commits it, and writes
//! the result back at most once.

use std::path::Path;

use splice_ast::Lang;
use splice_io::FileTree;

use crate::batch::EditBatch;
use crate::config::PatchConfig;
use crate::diff::generate_unified_diff;
use crate::error::EditError;
use crate::guards::contains_fragment;
use crate::html::{plan_add_body_class, plan_append_to_body};
use crate::module::{environment_file_path, plan_add_environment_var, plan_add_symbol};
use crate::types::{BodySide, PatchOutcome, PatchResult};
use crate::workspace;

/// Patch engine bound to one file tree.
///
/// # Example
///
/// ```rust
/// use splice_edit::{BodySide, PatchOutcome, Patcher};
/// use splice_io::MemoryTree;
///
/// let mut tree = MemoryTree::new();
/// tree.insert("src/index.html", "<body></body>");
///
/// let mut patcher = Patcher::new(&mut tree);
/// let result = patcher
///     .append_html_element_to_body("src/index.html", "<script>x</script>", BodySide::Right)
///     .unwrap();
/// assert_eq!(result.outcome, PatchOutcome::Inserted);
/// assert_eq!(tree.get("src/index.html"), Some("<body><script>x</script></body>"));
/// ```
pub struct Patcher<'a, T: FileTree + ?Sized> {
    tree: &'a mut T,
    config: PatchConfig,
}

impl<'a, T: FileTree + ?Sized> Patcher<'a, T> {
    /// Create a patcher with default configuration.
    pub fn new(tree: &'a mut T) -> Self {
        Self::with_config(tree, PatchConfig::default())
    }

    /// Create a patcher with explicit configuration.
    pub fn with_config(tree: &'a mut T, config: PatchConfig) -> Self {
        Self { tree, config }
    }

    /// Active configuration.
    #[must_use]
    pub fn config(&self) -> &PatchConfig {
        &self.config
    }

    fn read_required(&self, path: &Path) -> Result<String, EditError> {
        self.tree
            .read(path)?
            .ok_or_else(|| EditError::FileNotFound(path.display().to_string()))
    }

    fn unchanged(path: &Path, original: String, outcome: PatchOutcome) -> PatchResult {
        tracing::debug!(path = %path.display(), ?outcome, "nothing to patch");
        PatchResult {
            path: path.display().to_string(),
            outcome,
            modified: original,
            diff: String::new(),
            edits: 0,
            written: false,
        }
    }

    fn store(
        &mut self,
        path: &Path,
        original: &str,
        modified: String,
        outcome: PatchOutcome,
        edits: usize,
    ) -> Result<PatchResult, EditError> {
        let shown = path.display().to_string();
        let diff = generate_unified_diff(&shown, original, &modified);

        let written = !self.config.preview_only;
        if written {
            self.tree.overwrite(path, &modified)?;
        }
        tracing::info!(path = %shown, ?outcome, edits, written, "patched");

        Ok(PatchResult {
            path: shown,
            outcome,
            modified,
            diff,
            edits,
            written,
        })
    }

    fn finish(
        &mut self,
        path: &Path,
        original: String,
        planned: Option<EditBatch>,
        outcome: PatchOutcome,
    ) -> Result<PatchResult, EditError> {
        let Some(mut batch) = planned else {
            return Ok(Self::unchanged(path, original, PatchOutcome::AlreadyPresent));
        };
        let edits = batch.len();
        let modified = batch.commit()?;
        self.store(path, &original, modified, outcome, edits)
    }

    /// Append an HTML fragment to the `<body>` of `path`.
    ///
    /// # Errors
    /// `FileNotFound`, `MalformedInput`, or `StructuralNotFound` when the
    /// document has no `<body>` (or no `</body>` for `BodySide::Right`).
    pub fn append_html_element_to_body(
        &mut self,
        path: impl AsRef<Path>,
        element_html: &str,
        side: BodySide,
    ) -> Result<PatchResult, EditError> {
        let path = path.as_ref();
        let content = self.read_required(path)?;
        let planned =
            plan_append_to_body(&content, element_html, side).map_err(|e| e.in_file(path))?;
        self.finish(path, content, planned, PatchOutcome::Inserted)
    }

    /// Add a class token to the `<body>` of `path`.
    ///
    /// # Errors
    /// `FileNotFound`, `MalformedInput`, or `StructuralNotFound` when the
    /// document has no `<body>`.
    pub fn add_body_class(
        &mut self,
        path: impl AsRef<Path>,
        class_name: &str,
    ) -> Result<PatchResult, EditError> {
        let path = path.as_ref();
        let content = self.read_required(path)?;
        let planned = plan_add_body_class(&content, class_name).map_err(|e| e.in_file(path))?;
        self.finish(path, content, planned, PatchOutcome::Inserted)
    }

    /// Import `symbol` from `import_path` into the module at `module_path`
    /// and add it to the `list_name` array of its `@NgModule`.
    ///
    /// # Errors
    /// `FileNotFound`, `MalformedInput`, or `StructuralNotFound` when the
    /// decorator or the list is missing.
    pub fn add_symbol_to_module(
        &mut self,
        module_path: impl AsRef<Path>,
        list_name: &str,
        symbol: &str,
        import_path: &str,
    ) -> Result<PatchResult, EditError> {
        let path = module_path.as_ref();
        let content = self.read_required(path)?;
        let lang = Lang::from_path(path)
            .filter(|lang| *lang != Lang::Html)
            .unwrap_or(Lang::TypeScript);
        let planned = plan_add_symbol(&content, lang, list_name, symbol, import_path, self.config.quote)
            .map_err(|e| e.in_file(path))?;
        self.finish(path, content, planned, PatchOutcome::Inserted)
    }

    /// Insert `fragment` on its own line at the top of `path`.
    ///
    /// # Errors
    /// `FileNotFound` when the file is absent.
    pub fn append_to_start_file(
        &mut self,
        path: impl AsRef<Path>,
        fragment: &str,
    ) -> Result<PatchResult, EditError> {
        let path = path.as_ref();
        let content = self.read_required(path)?;
        if contains_fragment(&content, fragment) {
            return Ok(Self::unchanged(path, content, PatchOutcome::AlreadyPresent));
        }
        let mut batch = EditBatch::open(content.as_str());
        batch.insert_right(0, format!("{fragment}\n"))?;
        self.finish(path, content, Some(batch), PatchOutcome::Inserted)
    }

    /// Remove the whole content of `path`.
    ///
    /// # Errors
    /// `FileNotFound` when the file is absent.
    pub fn remove_content_from_file(&mut self, path: impl AsRef<Path>) -> Result<PatchResult, EditError> {
        let path = path.as_ref();
        let content = self.read_required(path)?;
        if content.is_empty() {
            return Ok(Self::unchanged(path, content, PatchOutcome::AlreadyPresent));
        }
        let mut batch = EditBatch::open(content.as_str());
        batch.remove_all()?;
        self.finish(path, content, Some(batch), PatchOutcome::Cleared)
    }

    /// Add `key: 'value'` to the environment file of `app_path`.
    ///
    /// # Errors
    /// `FileNotFound`, `MalformedInput`, or `StructuralNotFound` when the
    /// file has no `environment` object literal.
    pub fn add_environment_var(
        &mut self,
        app_path: &str,
        env: Option<&str>,
        key: &str,
        value: &str,
    ) -> Result<PatchResult, EditError> {
        let file = environment_file_path(app_path, env);
        let path = Path::new(&file);
        let content = self.read_required(path)?;
        let planned = plan_add_environment_var(&content, key, value, self.config.quote)
            .map_err(|e| e.in_file(path))?;
        self.finish(path, content, planned, PatchOutcome::Inserted)
    }

    fn read_workspace_config(&self) -> Result<(String, serde_json::Value), EditError> {
        let path = self.config.workspace_config_path.clone();
        let raw = self.read_required(&path)?;
        let config = workspace::parse_workspace_config(&path.display().to_string(), &raw)?;
        Ok((raw, config))
    }

    /// Add a global stylesheet to the browser application in the workspace
    /// config.
    ///
    /// Returns `NotFound` (without error) when the workspace has no browser
    /// application.
    ///
    /// # Errors
    /// `FileNotFound` or `Config` when the workspace config is absent or not
    /// JSON.
    pub fn add_style(&mut self, style_path: &str) -> Result<PatchResult, EditError> {
        let path = self.config.workspace_config_path.clone();
        let (raw, config) = self.read_workspace_config()?;

        let (updated, outcome) = workspace::add_style(&config, style_path);
        if !outcome.changed() {
            if outcome == PatchOutcome::NotFound {
                tracing::warn!(path = %path.display(), "no browser application in workspace config");
            }
            return Ok(Self::unchanged(&path, raw, outcome));
        }

        let rendered = workspace::render_workspace_config(&path.display().to_string(), &updated)?;
        self.store(&path, &raw, rendered, outcome, 1)
    }

    /// Whether the browser application already uses a stylesheet whose path
    /// contains `token` as a whole segment.
    ///
    /// # Errors
    /// `FileNotFound` or `Config` when the workspace config is absent or not
    /// JSON.
    pub fn has_style_token(&self, token: &str) -> Result<bool, EditError> {
        let (_, config) = self.read_workspace_config()?;
        Ok(workspace::has_style_token(&config, token))
    }
}
