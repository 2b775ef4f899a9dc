//! Utility modules for matrixgen

pub mod logging;

pub use logging::{init_logging, LoggingConfig};
