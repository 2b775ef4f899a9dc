//! Discovery of modules changed since a git reference
//!
//! Changed paths come from `git diff --name-only <reference>` and are relative
//! to the repository top, so the source root's own position in the repository
//! is resolved first with `git rev-parse --show-prefix`. Both commands run with
//! the source root as working directory. A change to the shared build
//! infrastructure or to a shared library can affect any module, so either one
//! falls back to full discovery.

use super::{Discovery, Module, ModuleDiscoverer};
use crate::runner::CommandRunner;
use anyhow::Result;
use regex::Regex;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info};

const CORE_FILES_PATTERN: &str = r"^(buildSrc/|core/|gradle/|build\.gradle\.kts|common\.gradle|gradle\.properties|settings\.gradle\.kts|utils/)";
const MULTISRC_LIB_PATTERN: &str = r"^lib-multisrc/(?P<multisrc>\w+)";
const LIB_PATTERN: &str = r"^lib/(?P<lib>\w+)";

/// Prints the working directory relative to the repository top, with a trailing slash.
pub const ROOT_PREFIX_COMMAND: &str = "git rev-parse --show-prefix";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChangeKind {
    /// Build infrastructure shared by every module
    Core,
    /// A shared library or multi-source template
    Library(String),
    Module { language: String, extension: String },
    Unrelated,
}

impl ChangeKind {
    pub fn requires_full_rebuild(&self) -> bool {
        matches!(self, ChangeKind::Core | ChangeKind::Library(_))
    }
}

pub struct ChangeClassifier {
    core: Regex,
    multisrc: Regex,
    lib: Regex,
    module: Regex,
}

impl ChangeClassifier {
    /// `root_prefix` is the source root relative to the repository top, such as
    /// `src` or `sub/src/`. An empty prefix means the source root is the top itself.
    pub fn new(root_prefix: &str) -> Self {
        let root_prefix = root_prefix.trim().trim_matches('/');
        let module_pattern = if root_prefix.is_empty() {
            r"^(?P<lang>\w+)/(?P<extension>\w+)".to_string()
        } else {
            format!(
                r"^{}/(?P<lang>\w+)/(?P<extension>\w+)",
                regex::escape(root_prefix)
            )
        };

        Self {
            core: Regex::new(CORE_FILES_PATTERN).expect("valid regex"),
            multisrc: Regex::new(MULTISRC_LIB_PATTERN).expect("valid regex"),
            lib: Regex::new(LIB_PATTERN).expect("valid regex"),
            module: Regex::new(&module_pattern).expect("escaped prefix forms a valid regex"),
        }
    }

    pub fn classify(&self, path: &str) -> ChangeKind {
        if self.core.is_match(path) {
            return ChangeKind::Core;
        }
        if let Some(caps) = self.multisrc.captures(path) {
            return ChangeKind::Library(format!("lib-multisrc/{}", &caps["multisrc"]));
        }
        if let Some(caps) = self.lib.captures(path) {
            return ChangeKind::Library(format!("lib/{}", &caps["lib"]));
        }
        if let Some(caps) = self.module.captures(path) {
            return ChangeKind::Module {
                language: caps["lang"].to_string(),
                extension: caps["extension"].to_string(),
            };
        }
        ChangeKind::Unrelated
    }
}

/// Expects `runner` to execute commands inside the discoverer's source root.
pub struct ChangeDetector {
    runner: Arc<dyn CommandRunner>,
    discoverer: ModuleDiscoverer,
}

impl ChangeDetector {
    pub fn new(runner: Arc<dyn CommandRunner>, discoverer: ModuleDiscoverer) -> Self {
        Self { runner, discoverer }
    }

    pub fn detect(&self, reference: &str) -> Result<Discovery> {
        let root_prefix = self.runner.run(ROOT_PREFIX_COMMAND)?;
        debug!(
            root = %self.discoverer.root().display(),
            prefix = %root_prefix.trim(),
            "Resolved source root within repository"
        );
        let classifier = ChangeClassifier::new(&root_prefix);

        let command = format!("git diff --name-only {}", shell_quote(reference));
        let output = self.runner.run(&command)?;

        let changed: Vec<&str> = output.lines().filter(|l| !l.trim().is_empty()).collect();
        info!(reference, files = changed.len(), "Collected changed files");

        let mut built = Vec::new();
        let mut removed = Vec::new();
        let mut seen = HashSet::new();

        for path in changed {
            match classifier.classify(path) {
                kind if kind.requires_full_rebuild() => {
                    info!(path, kind = ?kind, "Shared change detected, rebuilding all modules");
                    return self.discoverer.discover_all();
                }
                ChangeKind::Module {
                    language,
                    extension,
                } => {
                    let module = Module::new(self.discoverer.namespace(), language, extension);
                    if !seen.insert(module.clone()) {
                        continue;
                    }
                    if self.discoverer.module_exists(&module) {
                        debug!(module = %module.identifier(), "Module changed");
                        built.push(module);
                    } else {
                        debug!(module = %module.identifier(), "Module removed");
                        removed.push(module);
                    }
                }
                _ => debug!(path, "Ignoring change outside modules"),
            }
        }

        info!(
            changed = built.len(),
            removed = removed.len(),
            "Change detection complete"
        );

        Ok(Discovery {
            modules: built,
            removed,
        })
    }
}

fn shell_quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', r"'\''"))
}
