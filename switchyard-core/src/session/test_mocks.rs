//! Mock backends for session tests.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use super::handle::PlaybackSessionHandle;
use super::spawn_playback_session;
use crate::config::{SessionConfig, TelemetryConfig};
use crate::health::HealthStore;
use crate::media::ContentIdentity;
use crate::sources::catalog::{KindSupport, Provider, ProviderCatalog, UrlTemplateKind};
use crate::sources::{OverrideLinks, SourceListBuilder};
use crate::storage::{OverrideStore, ReportSink, StorageError};
use crate::telemetry::{FailureReport, FailureReporter};

/// Override store with per-identity links, optional delays, and failures.
#[derive(Default)]
pub(crate) struct MockOverrideStore {
    links: HashMap<ContentIdentity, OverrideLinks>,
    delays: HashMap<ContentIdentity, Duration>,
    fail: bool,
}

impl MockOverrideStore {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub(crate) fn with_links(mut self, identity: ContentIdentity, links: OverrideLinks) -> Self {
        self.links.insert(identity, links);
        self
    }

    /// Delays the fetch for one identity, for stale-response scenarios.
    pub(crate) fn with_delay(mut self, identity: ContentIdentity, delay: Duration) -> Self {
        self.delays.insert(identity, delay);
        self
    }
}

#[async_trait]
impl OverrideStore for MockOverrideStore {
    async fn override_links(
        &self,
        identity: &ContentIdentity,
    ) -> Result<OverrideLinks, StorageError> {
        if let Some(delay) = self.delays.get(identity) {
            tokio::time::sleep(*delay).await;
        }
        if self.fail {
            return Err(StorageError::Backend {
                reason: "mock override failure".to_string(),
            });
        }
        Ok(self.links.get(identity).cloned().unwrap_or_default())
    }
}

/// Report sink that records every attempt; optionally fails each write.
pub(crate) struct MockReportSink {
    reports: Mutex<Vec<FailureReport>>,
    fail: bool,
}

impl MockReportSink {
    pub(crate) fn new(fail: bool) -> Self {
        Self {
            reports: Mutex::new(Vec::new()),
            fail,
        }
    }

    pub(crate) fn recorded(&self) -> Vec<FailureReport> {
        self.reports.lock().unwrap().clone()
    }
}

#[async_trait]
impl ReportSink for MockReportSink {
    async fn record_failure(&self, report: &FailureReport) -> Result<(), StorageError> {
        self.reports.lock().unwrap().push(report.clone());
        if self.fail {
            Err(StorageError::Backend {
                reason: "mock report failure".to_string(),
            })
        } else {
            Ok(())
        }
    }
}

/// Three movie+series capable providers with predictable URLs.
pub(crate) fn small_catalog() -> ProviderCatalog {
    fn provider(id: &'static str, base_url: &'static str) -> Provider {
        Provider {
            id,
            display_name: id,
            template: UrlTemplateKind::PathSegments,
            base_url,
            rank_weight: 5,
            supports: KindSupport::Both,
            lang_hint: None,
        }
    }

    ProviderCatalog::from_providers(vec![
        provider("alpha", "https://alpha.example"),
        provider("beta", "https://beta.example"),
        provider("gamma", "https://gamma.example"),
    ])
}

/// A catalog that cannot address movies at all.
pub(crate) fn series_only_catalog() -> ProviderCatalog {
    ProviderCatalog::from_providers(vec![Provider {
        id: "episodes-r-us",
        display_name: "Episodes R Us",
        template: UrlTemplateKind::PathSegments,
        base_url: "https://episodes.example",
        rank_weight: 5,
        supports: KindSupport::SeriesOnly,
        lang_hint: None,
    }])
}

pub(crate) struct Harness {
    pub(crate) handle: PlaybackSessionHandle,
    pub(crate) health: Arc<HealthStore>,
    pub(crate) sink: Arc<MockReportSink>,
}

/// Wires a session actor with mock storage.
pub(crate) fn spawn_harness(
    catalog: ProviderCatalog,
    overrides: MockOverrideStore,
    stall_timeout: Duration,
    failing_sink: bool,
) -> Harness {
    let health = Arc::new(HealthStore::new(16));
    let sink = Arc::new(MockReportSink::new(failing_sink));
    let builder = Arc::new(SourceListBuilder::new(
        Arc::new(catalog),
        Arc::clone(&health),
        Arc::new(overrides),
    ));
    let reporter = FailureReporter::new(
        Arc::clone(&sink) as Arc<dyn ReportSink>,
        &TelemetryConfig::default(),
    );
    let config = SessionConfig {
        stall_timeout,
        ..SessionConfig::default()
    };

    let handle = spawn_playback_session(config, builder, Arc::clone(&health), reporter);
    Harness {
        handle,
        health,
        sink,
    }
}
