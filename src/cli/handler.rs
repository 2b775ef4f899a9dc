//! Discover → partition → serialize, wired from parsed arguments

use super::CliArgs;
use crate::config::MatrixConfig;
use crate::discovery::{ChangeDetector, Discovery, ModuleDiscoverer};
use crate::fs::FileSystem;
use crate::plan::{GeneratedPlan, OutputSink};
use crate::runner::CommandRunner;
use anyhow::Result;
use std::io::Write;
use std::sync::Arc;
use tracing::{debug, info};

pub struct MatrixGenerator {
    fs: Arc<dyn FileSystem>,
    runner: Arc<dyn CommandRunner>,
}

impl MatrixGenerator {
    pub fn new(fs: Arc<dyn FileSystem>, runner: Arc<dyn CommandRunner>) -> Self {
        Self { fs, runner }
    }

    pub fn discover(&self, args: &CliArgs) -> Result<Discovery> {
        let discoverer = ModuleDiscoverer::new(self.fs.clone(), args.source_root.clone())
            .with_filter(args.discovery_filter());

        if args.changed_only {
            ChangeDetector::new(self.runner.clone(), discoverer).detect(&args.reference)
        } else {
            debug!(
                reference = %args.reference,
                "Reference ignored without --changed-only, planning all modules"
            );
            discoverer.discover_all()
        }
    }

    pub fn generate(&self, args: &CliArgs, config: &MatrixConfig) -> Result<GeneratedPlan> {
        let discovery = self.discover(args)?;
        let generated = GeneratedPlan::new(&discovery, &args.build_type, config.chunk_size);

        info!(
            modules = generated.plan.task_count(),
            chunks = generated.plan.chunk.len(),
            chunk_size = config.chunk_size.get(),
            "Build plan generated"
        );
        Ok(generated)
    }

    /// Generates the plan, prints the report to `out` and appends to the CI sink when active.
    pub fn run<W: Write>(&self, args: &CliArgs, config: &MatrixConfig, out: &mut W) -> Result<()> {
        let generated = self.generate(args, config)?;

        writeln!(out, "{}", generated.render_report()?)?;
        out.flush()?;

        if let Some(path) = config.active_sink() {
            OutputSink::new(path).append(&generated)?;
        }

        Ok(())
    }
}
