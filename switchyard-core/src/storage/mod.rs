//! External persistence interfaces.
//!
//! The engine consumes persistent storage through three narrow traits:
//! override links (read), provider health (read + push feed), and failure
//! reports (write, fire-and-forget). `rest` provides the production
//! PostgREST-style implementation; tests use in-memory mocks.

pub mod rest;

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::health::{HealthUpdate, ProviderHealth};
use crate::media::ContentIdentity;
use crate::sources::OverrideLinks;
use crate::telemetry::FailureReport;

pub use rest::RestStorage;

/// Errors from storage backends.
///
/// Callers in the engine swallow most of these by design: a failed
/// override fetch degrades to synthesized URLs, a failed health read
/// leaves providers unknown, and a failed report write is dropped.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Response decode error: {reason}")]
    Decode { reason: String },

    #[error("Backend error: {reason}")]
    Backend { reason: String },
}

/// Read access to operator-curated override links.
#[async_trait]
pub trait OverrideStore: Send + Sync {
    /// Fetches override links for one identity; empty map on miss.
    ///
    /// # Errors
    ///
    /// - `StorageError::Http` - Transport failure reaching the backend
    /// - `StorageError::Decode` - Backend rows could not be decoded
    async fn override_links(
        &self,
        identity: &ContentIdentity,
    ) -> Result<OverrideLinks, StorageError>;
}

/// Read access to provider health rows plus a live change feed.
#[async_trait]
pub trait HealthBackend: Send + Sync {
    /// Bulk read of every provider's last-known health (bootstrap).
    ///
    /// # Errors
    ///
    /// - `StorageError::Http` - Transport failure reaching the backend
    /// - `StorageError::Decode` - Backend rows could not be decoded
    async fn all_provider_health(
        &self,
    ) -> Result<HashMap<String, ProviderHealth>, StorageError>;

    /// Runs a long-lived push feed, sending point updates into `updates`.
    ///
    /// Implementations return when the receiving side closes or on a
    /// terminal backend error; transient errors are retried internally.
    ///
    /// # Errors
    ///
    /// - `StorageError::Http` - Terminal transport failure
    async fn run_health_feed(
        &self,
        updates: mpsc::UnboundedSender<HealthUpdate>,
    ) -> Result<(), StorageError>;
}

/// Write access for failure telemetry.
#[async_trait]
pub trait ReportSink: Send + Sync {
    /// Records one failure report.
    ///
    /// # Errors
    ///
    /// - `StorageError::Http` - Transport failure reaching the backend
    async fn record_failure(&self, report: &FailureReport) -> Result<(), StorageError>;
}
