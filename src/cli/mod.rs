pub mod commands;
pub mod handler;

pub use commands::CliArgs;
pub use handler::MatrixGenerator;
