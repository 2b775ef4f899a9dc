//! Configuration for matrixgen
//!
//! All environment lookups happen once, in [`MatrixConfig::from_env`], at process
//! start. The resulting struct is passed by reference into the batcher and the
//! plan serializer so core logic never reads the environment itself.
//!
//! # Environment Variables
//!
//! - `CI_CHUNK_SIZE`: number of build tasks per chunk - default: `65`
//! - `CI`: when exactly `"true"`, the plan is also appended to the CI output sink
//! - `GITHUB_OUTPUT`: path of the CI output sink - **required** when `CI=true`

use std::env;
use std::fmt;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const CHUNK_SIZE_VAR: &str = "CI_CHUNK_SIZE";
pub const CI_VAR: &str = "CI";
pub const OUTPUT_SINK_VAR: &str = "GITHUB_OUTPUT";

pub const DEFAULT_CHUNK_SIZE: usize = 65;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid CI_CHUNK_SIZE '{value}': expected a positive integer")]
    InvalidChunkSize { value: String },

    #[error("CI is \"true\" but GITHUB_OUTPUT is not set")]
    MissingOutputSink,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatrixConfig {
    pub chunk_size: NonZeroUsize,
    pub ci: bool,
    pub output_sink: Option<PathBuf>,
}

impl Default for MatrixConfig {
    fn default() -> Self {
        Self {
            chunk_size: default_chunk_size(),
            ci: false,
            output_sink: None,
        }
    }
}

impl MatrixConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let chunk_size = match lookup(CHUNK_SIZE_VAR) {
            Some(value) => parse_chunk_size(&value)?,
            None => default_chunk_size(),
        };

        let ci = lookup(CI_VAR).as_deref() == Some("true");

        let output_sink = lookup(OUTPUT_SINK_VAR)
            .filter(|v| !v.is_empty())
            .map(PathBuf::from);

        let config = Self {
            chunk_size,
            ci,
            output_sink,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.ci && self.output_sink.is_none() {
            return Err(ConfigError::MissingOutputSink);
        }
        Ok(())
    }

    /// The sink to append to, present only when running under CI.
    pub fn active_sink(&self) -> Option<&Path> {
        if self.ci {
            self.output_sink.as_deref()
        } else {
            None
        }
    }
}

impl fmt::Display for MatrixConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Matrix Configuration:")?;
        writeln!(f, "  Chunk Size: {}", self.chunk_size)?;
        writeln!(f, "  CI: {}", self.ci)?;
        if let Some(ref sink) = self.output_sink {
            writeln!(f, "  Output Sink: {}", sink.display())?;
        }
        Ok(())
    }
}

fn default_chunk_size() -> NonZeroUsize {
    NonZeroUsize::new(DEFAULT_CHUNK_SIZE).unwrap_or(NonZeroUsize::MIN)
}

pub fn parse_chunk_size(value: &str) -> Result<NonZeroUsize, ConfigError> {
    let invalid = || ConfigError::InvalidChunkSize {
        value: value.to_string(),
    };

    let parsed = value.trim().parse::<i64>().map_err(|_| invalid())?;
    usize::try_from(parsed)
        .ok()
        .and_then(NonZeroUsize::new)
        .ok_or_else(invalid)
}
