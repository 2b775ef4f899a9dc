//! matrixgen - build-matrix generator for chunked CI module builds
//!
//! Discovers buildable modules from a `<root>/<language>/<extension>` directory
//! layout, partitions their build tasks into fixed-size numbered chunks, and
//! serializes the resulting plan together with the deletion keys of every
//! module.
//!
//! # Example
//!
//! ```no_run
//! use matrixgen::discovery::ModuleDiscoverer;
//! use matrixgen::fs::RealFileSystem;
//! use matrixgen::plan::GeneratedPlan;
//! use matrixgen::MatrixConfig;
//! use std::sync::Arc;
//!
//! # fn main() -> anyhow::Result<()> {
//! let config = MatrixConfig::from_env()?;
//! let discovery = ModuleDiscoverer::new(Arc::new(RealFileSystem::new()), "src").discover_all()?;
//! let generated = GeneratedPlan::new(&discovery, "Release", config.chunk_size);
//! println!("{}", generated.render_report()?);
//! # Ok(())
//! # }
//! ```

pub mod batch;
pub mod cli;
pub mod config;
pub mod discovery;
pub mod fs;
pub mod plan;
pub mod runner;
pub mod util;

pub use batch::{batch, task_label, Chunk};
pub use config::{ConfigError, MatrixConfig};
pub use discovery::{Discovery, DiscoveryFilter, Module, ModuleDiscoverer};
pub use plan::{BuildPlan, GeneratedPlan, OutputSink};
pub use runner::{CommandError, CommandRunner, ShellCommandRunner};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_exists() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_name_is_matrixgen() {
        assert_eq!(NAME, "matrixgen");
    }
}
