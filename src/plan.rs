//! Build plan serialization
//!
//! The plan is written twice: a pretty report on stdout for humans reading CI
//! logs, and compact `key=value` lines appended to the CI output sink for the
//! downstream matrix job.

use crate::batch::{self, Chunk};
use crate::discovery::Discovery;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs::OpenOptions;
use std::io::Write;
use std::num::NonZeroUsize;
use std::path::PathBuf;
use tracing::info;

pub const PLAN_HEADER: &str = "Module chunks to build:";
pub const DELETE_HEADER: &str = "Module to delete:";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildPlan {
    pub chunk: Vec<Chunk>,
}

impl BuildPlan {
    pub fn from_chunks(chunks: Vec<Chunk>) -> Self {
        Self { chunk: chunks }
    }

    pub fn task_count(&self) -> usize {
        self.chunk.iter().map(Chunk::len).sum()
    }
}

/// Everything one invocation emits
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedPlan {
    pub plan: BuildPlan,
    pub deletions: Vec<String>,
}

impl GeneratedPlan {
    pub fn new(discovery: &Discovery, build_type: &str, chunk_size: NonZeroUsize) -> Self {
        let tasks = discovery
            .identifiers()
            .into_iter()
            .map(|id| batch::task_label(&id, build_type));

        Self {
            plan: BuildPlan::from_chunks(batch::batch(tasks, chunk_size)),
            deletions: discovery.deletion_keys(),
        }
    }

    /// Human-readable report printed to stdout.
    pub fn render_report(&self) -> Result<String> {
        let plan = serde_json::to_string_pretty(&self.plan)
            .context("Failed to serialize build plan to JSON")?;
        let deletions = serde_json::to_string_pretty(&self.deletions)
            .context("Failed to serialize deletion list to JSON")?;

        Ok(format!(
            "{}\n{}\n\n{}\n{}",
            PLAN_HEADER, plan, DELETE_HEADER, deletions
        ))
    }

    /// The `matrix=` and `delete=` lines for the CI output sink.
    pub fn render_sink_lines(&self) -> Result<String> {
        let plan =
            serde_json::to_string(&self.plan).context("Failed to serialize build plan to JSON")?;
        let deletions = serde_json::to_string(&self.deletions)
            .context("Failed to serialize deletion list to JSON")?;

        Ok(format!("matrix={}\ndelete={}\n", plan, deletions))
    }
}

/// Append-only file the CI runner reads step outputs from
pub struct OutputSink {
    path: PathBuf,
}

impl OutputSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn append(&self, generated: &GeneratedPlan) -> Result<()> {
        // Serialize first so a failure leaves the sink untouched.
        let lines = generated.render_sink_lines()?;

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .with_context(|| format!("Failed to open CI output sink {}", self.path.display()))?;

        file.write_all(lines.as_bytes())
            .with_context(|| format!("Failed to write CI output sink {}", self.path.display()))?;

        info!(
            sink = %self.path.display(),
            chunks = generated.plan.chunk.len(),
            deletions = generated.deletions.len(),
            "Wrote build matrix to CI output sink"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::discovery::Module;
    use std::fs;
    use tempfile::TempDir;

    fn scenario() -> GeneratedPlan {
        let discovery = Discovery {
            modules: vec![
                Module::new("src", "kotlin", "foo"),
                Module::new("src", "kotlin", "bar"),
                Module::new("src", "en", "baz"),
            ],
            removed: Vec::new(),
        };
        GeneratedPlan::new(&discovery, "Release", NonZeroUsize::new(2).unwrap())
    }

    #[test]
    fn test_scenario_plan() {
        let generated = scenario();

        assert_eq!(
            generated.plan,
            BuildPlan::from_chunks(vec![
                Chunk {
                    number: 1,
                    modules: vec![
                        ":src:kotlin:foo:assembleRelease".to_string(),
                        ":src:kotlin:bar:assembleRelease".to_string(),
                    ],
                },
                Chunk {
                    number: 2,
                    modules: vec![":src:en:baz:assembleRelease".to_string()],
                },
            ])
        );
        assert_eq!(generated.deletions, vec!["kotlin.foo", "kotlin.bar", "en.baz"]);
        assert_eq!(generated.plan.task_count(), 3);
    }

    #[test]
    fn test_render_report_layout() {
        let report = scenario().render_report().unwrap();

        let expected = r#"Module chunks to build:
{
  "chunk": [
    {
      "number": 1,
      "modules": [
        ":src:kotlin:foo:assembleRelease",
        ":src:kotlin:bar:assembleRelease"
      ]
    },
    {
      "number": 2,
      "modules": [
        ":src:en:baz:assembleRelease"
      ]
    }
  ]
}

Module to delete:
[
  "kotlin.foo",
  "kotlin.bar",
  "en.baz"
]"#;
        assert_eq!(report, expected);
    }

    #[test]
    fn test_render_report_empty() {
        let generated = GeneratedPlan::new(
            &Discovery::default(),
            "Debug",
            NonZeroUsize::new(65).unwrap(),
        );
        let report = generated.render_report().unwrap();
        assert_eq!(
            report,
            "Module chunks to build:\n{\n  \"chunk\": []\n}\n\nModule to delete:\n[]"
        );
    }

    #[test]
    fn test_sink_lines_round_trip() {
        let generated = scenario();
        let lines = generated.render_sink_lines().unwrap();

        let mut iter = lines.lines();
        let matrix = iter.next().unwrap().strip_prefix("matrix=").unwrap();
        let delete = iter.next().unwrap().strip_prefix("delete=").unwrap();
        assert!(iter.next().is_none());
        assert!(lines.ends_with('\n'));

        let plan: BuildPlan = serde_json::from_str(matrix).unwrap();
        let deletions: Vec<String> = serde_json::from_str(delete).unwrap();
        assert_eq!(plan, generated.plan);
        assert_eq!(deletions, generated.deletions);
    }

    #[test]
    fn test_sink_appends() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("github_output");
        fs::write(&path, "previous=step\n").unwrap();

        let sink = OutputSink::new(&path);
        let generated = scenario();
        sink.append(&generated).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("previous=step\nmatrix={\"chunk\":"));
        assert!(content.ends_with("delete=[\"kotlin.foo\",\"kotlin.bar\",\"en.baz\"]\n"));
    }

    #[test]
    fn test_sink_creates_missing_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("new_output");

        OutputSink::new(&path).append(&scenario()).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap().lines().count(), 2);
    }

    #[test]
    fn test_sink_unwritable() {
        let temp = TempDir::new().unwrap();
        let sink = OutputSink::new(temp.path().join("missing-dir/output"));

        let err = sink.append(&scenario()).unwrap_err();
        assert!(err.to_string().contains("Failed to open CI output sink"));
    }
}
