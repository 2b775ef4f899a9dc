//! Synchronous execution of external shell commands
//!
//! A failing child never terminates the process from here. The failure comes
//! back as [`CommandError::Failed`] carrying the child's exit status and
//! captured stderr, and only the binary's entry point decides to exit with it.

use std::io;
use std::path::PathBuf;
use std::process::Command;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Error)]
pub enum CommandError {
    #[error("Failed to spawn `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: io::Error,
    },

    #[error("Command `{command}` exited with status {status}")]
    Failed {
        command: String,
        status: i32,
        stderr: String,
    },
}

impl CommandError {
    /// Exit status the whole process should terminate with.
    pub fn exit_code(&self) -> i32 {
        match self {
            CommandError::Failed { status, .. } => *status,
            CommandError::Spawn { .. } => 1,
        }
    }

    pub fn stderr(&self) -> Option<&str> {
        match self {
            CommandError::Failed { stderr, .. } => Some(stderr),
            CommandError::Spawn { .. } => None,
        }
    }
}

pub trait CommandRunner: Send + Sync {
    /// Runs `command` and returns its stdout with trailing whitespace trimmed.
    fn run(&self, command: &str) -> Result<String, CommandError>;
}

/// Runs commands through `sh -c`
#[derive(Debug, Default, Clone)]
pub struct ShellCommandRunner {
    working_dir: Option<PathBuf>,
}

impl ShellCommandRunner {
    pub fn in_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            working_dir: Some(dir.into()),
        }
    }
}

impl CommandRunner for ShellCommandRunner {
    fn run(&self, command: &str) -> Result<String, CommandError> {
        debug!(command, "Running command");

        let mut cmd = Command::new("sh");
        cmd.arg("-c").arg(command);
        if let Some(dir) = &self.working_dir {
            cmd.current_dir(dir);
        }

        let output = cmd.output().map_err(|source| CommandError::Spawn {
            command: command.to_string(),
            source,
        })?;

        if !output.status.success() {
            // Killed by a signal: no code, report a generic failure.
            let status = output.status.code().unwrap_or(1);
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            warn!(command, status, "Command failed");
            return Err(CommandError::Failed {
                command: command.to_string(),
                status,
                stderr,
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim_end().to_string())
    }
}
