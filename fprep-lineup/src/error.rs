//! Error types for fprep-lineup
//!
//! Lookup problems never surface here: the matcher and track fetcher collapse
//! them into "no match" / "no tracks". Only run-level failures are errors.

use crate::catalog::{AuthorizationStatus, CatalogError};
use thiserror::Error;

/// Run-level error
#[derive(Debug, Error)]
pub enum ScanError {
    /// Catalog access was not granted and the policy is `enforce`
    #[error("Catalog access not granted (status: {0})")]
    AuthorizationDenied(AuthorizationStatus),

    /// Catalog client could not be constructed
    #[error("Catalog client error: {0}")]
    Catalog(#[from] CatalogError),

    /// fprep-common error (configuration and friends)
    #[error("Common error: {0}")]
    Common(#[from] fprep_common::Error),
}

/// Result type for extraction runs
pub type ScanResult<T> = Result<T, ScanError>;
