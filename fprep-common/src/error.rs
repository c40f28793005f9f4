//! Common error types for Festival Prep

use thiserror::Error;

/// Common result type for Festival Prep operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types shared by the Festival Prep crates
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),
}
