//! Module discovery
//!
//! Modules are enumerated from the shape of the source tree rather than from a
//! manifest: every entry directly below `<root>/<language>/` is one module.
//!
//! ```text
//! src/
//!   kotlin/
//!     foo/   -> :src:kotlin:foo   (deletion key kotlin.foo)
//!     bar/   -> :src:kotlin:bar   (deletion key kotlin.bar)
//!   en/
//!     baz/   -> :src:en:baz       (deletion key en.baz)
//! ```

pub mod changes;
mod filter;

pub use changes::{ChangeDetector, ChangeKind};
pub use filter::DiscoveryFilter;

use crate::fs::FileSystem;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

pub const DEFAULT_NAMESPACE: &str = "src";

/// One buildable unit, identified by its language and extension directories
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Module {
    pub namespace: String,
    pub language: String,
    pub extension: String,
}

impl Module {
    pub fn new(
        namespace: impl Into<String>,
        language: impl Into<String>,
        extension: impl Into<String>,
    ) -> Self {
        Self {
            namespace: namespace.into(),
            language: language.into(),
            extension: extension.into(),
        }
    }

    /// Build-tool project path, e.g. `:src:kotlin:foo`.
    pub fn identifier(&self) -> String {
        format!(":{}:{}:{}", self.namespace, self.language, self.extension)
    }

    /// Key used downstream to prune stale artifacts, e.g. `kotlin.foo`.
    pub fn deletion_key(&self) -> String {
        format!("{}.{}", self.language, self.extension)
    }
}

/// Result of a discovery pass
///
/// `modules` are built; `removed` only contribute deletion keys. Full-tree
/// discovery never produces removed modules.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Discovery {
    pub modules: Vec<Module>,
    pub removed: Vec<Module>,
}

impl Discovery {
    pub fn identifiers(&self) -> Vec<String> {
        self.modules.iter().map(Module::identifier).collect()
    }

    pub fn deletion_keys(&self) -> Vec<String> {
        self.modules
            .iter()
            .chain(self.removed.iter())
            .map(Module::deletion_key)
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty() && self.removed.is_empty()
    }
}

/// Final path component of the discovery root, used as the identifier namespace.
pub fn namespace_for(root: &Path) -> String {
    root.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .filter(|n| !n.is_empty())
        .unwrap_or_else(|| DEFAULT_NAMESPACE.to_string())
}

pub struct ModuleDiscoverer {
    fs: Arc<dyn FileSystem>,
    root: PathBuf,
    namespace: String,
    filter: DiscoveryFilter,
}

impl ModuleDiscoverer {
    pub fn new(fs: Arc<dyn FileSystem>, root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let namespace = namespace_for(&root);
        Self {
            fs,
            root,
            namespace,
            filter: DiscoveryFilter::default(),
        }
    }

    pub fn with_filter(mut self, filter: DiscoveryFilter) -> Self {
        self.filter = filter;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Walks `<root>/<language>/<extension>` and returns every module in
    /// traversal order.
    pub fn discover_all(&self) -> Result<Discovery> {
        info!(
            root = %self.root.display(),
            filter = ?self.filter,
            "Discovering modules"
        );

        let languages = self
            .fs
            .read_dir(&self.root)
            .with_context(|| format!("Failed to list languages in {}", self.root.display()))?;

        let mut modules = Vec::new();
        for language in languages.iter().filter(|e| self.filter.accepts(e)) {
            let extensions = self.fs.read_dir(language.path()).with_context(|| {
                format!("Failed to list extensions in {}", language.path().display())
            })?;

            for extension in extensions.iter().filter(|e| self.filter.accepts(e)) {
                let module = Module::new(
                    self.namespace.as_str(),
                    language.file_name(),
                    extension.file_name(),
                );
                debug!(module = %module.identifier(), "Discovered module");
                modules.push(module);
            }
        }

        info!(count = modules.len(), "Module discovery complete");

        Ok(Discovery {
            modules,
            removed: Vec::new(),
        })
    }

    /// Whether the module's directory is still present under the root.
    pub fn module_exists(&self, module: &Module) -> bool {
        self.fs.is_dir(
            &self
                .root
                .join(&module.language)
                .join(&module.extension),
        )
    }
}
