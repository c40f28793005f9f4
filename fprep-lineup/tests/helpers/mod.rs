//! Test Helper Utilities
//!
//! Shared utilities for testing fprep-lineup

#![allow(dead_code)]

pub mod log_capture;
pub mod scripted_catalog;

pub use log_capture::{capture_logs, LogCapture};
pub use scripted_catalog::{artist, artist_id, ScriptedCatalog};

use fprep_lineup::catalog::{AuthorizationStatus, CatalogAuthorizer};
use fprep_lineup::services::{CatalogResolver, NamePolicy};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Festival poster sample used by end-to-end tests
pub const FESTIVAL_POSTER: &str = include_str!("../fixtures/festival_poster.txt");

/// Every performer on the sample poster, as a catalog would spell the terms
pub const POSTER_ARTISTS: &[&str] = &[
    "BTS", "BLACKPINK", "G-DRAGON", "NEWJEANS", "IVE", "EXO", "STRAY KIDS", "TWICE",
    "SEVENTEEN", "PARK HYE JIN", "ZICO", "THE BOYZ", "Ateez", "DAY6", "STAYC", "IU",
    "ENHYPEN", "SUNMI", "LE SSERAFIM", "TAEYANG", "J BALVIN", "LISA", "JAY PARK", "YOASOBI",
];

/// Authorizer with a fixed answer that counts requests
pub struct FixedAuthorizer {
    current: AuthorizationStatus,
    after_request: AuthorizationStatus,
    requests: AtomicUsize,
}

impl FixedAuthorizer {
    pub fn new(current: AuthorizationStatus, after_request: AuthorizationStatus) -> Self {
        Self {
            current,
            after_request,
            requests: AtomicUsize::new(0),
        }
    }

    pub fn granted() -> Self {
        Self::new(AuthorizationStatus::Authorized, AuthorizationStatus::Authorized)
    }

    pub fn denied() -> Self {
        Self::new(AuthorizationStatus::NotDetermined, AuthorizationStatus::Denied)
    }

    pub fn requests(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl CatalogAuthorizer for FixedAuthorizer {
    async fn current_status(&self) -> AuthorizationStatus {
        self.current
    }

    async fn request(&self) -> AuthorizationStatus {
        self.requests.fetch_add(1, Ordering::SeqCst);
        self.after_request
    }
}

pub fn resolver(catalog: Arc<ScriptedCatalog>) -> CatalogResolver {
    CatalogResolver::new(catalog, NamePolicy::Containment, Duration::from_secs(5))
}
