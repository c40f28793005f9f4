//! Catalog access authorization
//!
//! Whether a denied status blocks the run is a configuration choice, see
//! [`AuthorizationPolicy`].

use serde::{Deserialize, Serialize};
use std::fmt;

/// Grant status for catalog access
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthorizationStatus {
    NotDetermined,
    Denied,
    Restricted,
    Authorized,
}

impl AuthorizationStatus {
    pub fn is_authorized(self) -> bool {
        self == AuthorizationStatus::Authorized
    }
}

impl fmt::Display for AuthorizationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AuthorizationStatus::NotDetermined => "not determined",
            AuthorizationStatus::Denied => "denied",
            AuthorizationStatus::Restricted => "restricted",
            AuthorizationStatus::Authorized => "authorized",
        };
        f.write_str(s)
    }
}

/// What to do when access is not granted
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthorizationPolicy {
    /// Request access, log a warning on denial, and proceed anyway
    #[default]
    Advisory,
    /// Abort the run before any catalog call unless access is granted
    Enforce,
}

/// Queries and requests catalog access
#[async_trait::async_trait]
pub trait CatalogAuthorizer: Send + Sync {
    async fn current_status(&self) -> AuthorizationStatus;

    /// Ask for access; returns the status after the request
    async fn request(&self) -> AuthorizationStatus;
}

/// Authorization backed by a configured developer token
///
/// There is no interactive prompt for a token-based REST catalog: access is
/// granted exactly when a non-empty token is configured.
#[derive(Debug, Clone)]
pub struct TokenAuthorizer {
    has_token: bool,
}

impl TokenAuthorizer {
    pub fn new(developer_token: Option<&str>) -> Self {
        Self {
            has_token: developer_token.map(|t| !t.trim().is_empty()).unwrap_or(false),
        }
    }
}

#[async_trait::async_trait]
impl CatalogAuthorizer for TokenAuthorizer {
    async fn current_status(&self) -> AuthorizationStatus {
        if self.has_token {
            AuthorizationStatus::Authorized
        } else {
            AuthorizationStatus::NotDetermined
        }
    }

    async fn request(&self) -> AuthorizationStatus {
        if self.has_token {
            AuthorizationStatus::Authorized
        } else {
            AuthorizationStatus::Denied
        }
    }
}

/// Query the current status and request access if not yet granted
pub async fn ensure_access(authorizer: &dyn CatalogAuthorizer) -> AuthorizationStatus {
    let current = authorizer.current_status().await;
    if current.is_authorized() {
        return current;
    }
    tracing::debug!(status = %current, "Catalog access not granted, requesting");
    authorizer.request().await
}
