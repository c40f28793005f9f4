//! # Festival Prep Common Library
//!
//! Shared code for the Festival Prep crates:
//! - Error type and result alias
//! - Configuration file location and multi-tier setting resolution

pub mod config;
pub mod error;

pub use error::{Error, Result};
