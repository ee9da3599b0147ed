//! Failure report telemetry.
//!
//! When a viewer flags the active source as broken, the engine writes one
//! `FailureReport` and immediately rotates. The write is fire-and-forget:
//! it runs as its own task, its result is explicitly discarded, and it can
//! never block or fail playback rotation.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::config::TelemetryConfig;
use crate::media::ContentIdentity;
use crate::sources::Candidate;
use crate::storage::ReportSink;

/// Write-once record of a source flagged broken. Never read back here.
#[derive(Debug, Clone, Serialize)]
pub struct FailureReport {
    pub identity: ContentIdentity,
    pub provider_id: String,
    pub url: String,
    pub observed_at: DateTime<Utc>,
}

/// Issues fire-and-forget failure reports.
#[derive(Clone)]
pub struct FailureReporter {
    sink: Arc<dyn ReportSink>,
    enabled: bool,
}

impl FailureReporter {
    pub fn new(sink: Arc<dyn ReportSink>, config: &TelemetryConfig) -> Self {
        Self {
            sink,
            enabled: config.enabled,
        }
    }

    /// Spawns a best-effort report write for the given candidate.
    ///
    /// Returns immediately; the spawned task logs a failed write at `warn`
    /// and drops the result.
    pub fn report(&self, identity: &ContentIdentity, candidate: &Candidate) {
        if !self.enabled {
            return;
        }

        let report = FailureReport {
            identity: identity.clone(),
            provider_id: candidate.provider_id.clone(),
            url: candidate.url.clone(),
            observed_at: Utc::now(),
        };
        let sink = Arc::clone(&self.sink);

        tokio::spawn(async move {
            if let Err(e) = sink.record_failure(&report).await {
                tracing::warn!(
                    provider_id = %report.provider_id,
                    "Failure report write dropped: {e}"
                );
            }
        });
    }
}
