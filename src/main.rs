use matrixgen::cli::{CliArgs, MatrixGenerator};
use matrixgen::fs::RealFileSystem;
use matrixgen::util::{init_logging, LoggingConfig};
use matrixgen::{CommandError, MatrixConfig, ShellCommandRunner, VERSION};

use clap::Parser;
use std::io;
use std::sync::Arc;
use tracing::{debug, error};

fn main() {
    let args = CliArgs::parse();
    init_logging(LoggingConfig::from_flags(
        args.log_level.as_deref(),
        args.verbose,
        args.quiet,
    ));

    debug!("matrixgen v{} starting", VERSION);
    debug!("Arguments: {:?}", args);

    std::process::exit(match run(&args) {
        Ok(()) => 0,
        Err(err) => report_failure(&err),
    });
}

fn run(args: &CliArgs) -> anyhow::Result<()> {
    let config = MatrixConfig::from_env()?;
    debug!("{}", config);

    let generator = MatrixGenerator::new(
        Arc::new(RealFileSystem::new()),
        Arc::new(ShellCommandRunner::in_dir(&args.source_root)),
    );
    generator.run(args, &config, &mut io::stdout().lock())
}

/// Prints the failure and returns the process exit code for it.
fn report_failure(err: &anyhow::Error) -> i32 {
    if let Some(command_err) = err.downcast_ref::<CommandError>() {
        if let Some(stderr) = command_err.stderr() {
            eprintln!("{}", stderr);
        }
        error!(status = command_err.exit_code(), "{}", command_err);
        return command_err.exit_code();
    }

    error!("{:#}", err);
    eprintln!("Error: {:#}", err);
    1
}
