use crate::discovery::DiscoveryFilter;
use clap::Parser;
use std::path::PathBuf;

/// Build-matrix generator for chunked CI module builds
#[derive(Parser, Debug)]
#[command(
    name = "matrixgen",
    about = "Build-matrix generator for chunked CI module builds",
    version,
    author,
    long_about = "matrixgen discovers buildable modules laid out as <source-root>/<language>/<extension>, \
                  splits their build tasks into fixed-size chunks for parallel CI jobs, and prints the \
                  build plan together with the deletion keys of every module.\n\n\
                  Examples:\n  \
                  matrixgen origin/main Release\n  \
                  CI_CHUNK_SIZE=20 matrixgen HEAD~1 Debug\n  \
                  matrixgen --changed-only origin/main Release"
)]
pub struct CliArgs {
    #[arg(
        value_name = "REFERENCE",
        help = "Git reference to diff against (only used with --changed-only)"
    )]
    pub reference: String,

    #[arg(
        value_name = "BUILD_TYPE",
        help = "Build type appended to each assemble task, e.g. Release"
    )]
    pub build_type: String,

    #[arg(
        long,
        value_name = "DIR",
        default_value = "src",
        help = "Directory containing one subdirectory per language"
    )]
    pub source_root: PathBuf,

    #[arg(
        long,
        help = "Only plan modules changed since REFERENCE (falls back to all modules on shared changes)"
    )]
    pub changed_only: bool,

    #[arg(long, help = "Skip entries whose name starts with a dot")]
    pub skip_hidden: bool,

    #[arg(long, help = "Skip entries that are not directories")]
    pub directories_only: bool,

    #[arg(long, value_name = "LEVEL", help = "Set logging level")]
    pub log_level: Option<String>,

    #[arg(short = 'v', long, help = "Enable debug logging")]
    pub verbose: bool,

    #[arg(
        short = 'q',
        long,
        conflicts_with = "verbose",
        help = "Quiet mode - suppress non-error logging"
    )]
    pub quiet: bool,
}

impl CliArgs {
    pub fn discovery_filter(&self) -> DiscoveryFilter {
        DiscoveryFilter {
            skip_hidden: self.skip_hidden,
            directories_only: self.directories_only,
        }
    }
}
