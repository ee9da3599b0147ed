//! PostgREST-style storage backend.
//!
//! Production implementation of the storage traits against a PostgREST
//! compatible API: override links from `title_links`, health rows from
//! `provider_health`, and failure reports inserted into `failure_reports`.
//! The health change feed polls and diffs; the trait boundary keeps push
//! semantics, so a websocket-backed implementation can replace this one
//! without touching the engine.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use url::Url;

use crate::config::StorageConfig;
use crate::health::{HealthStatus, HealthUpdate, ProviderHealth};
use crate::media::{ContentIdentity, MediaKind};
use crate::sources::OverrideLinks;
use crate::storage::{HealthBackend, OverrideStore, ReportSink, StorageError};
use crate::telemetry::FailureReport;

/// HTTP client for a PostgREST-compatible storage API.
pub struct RestStorage {
    client: reqwest::Client,
    base: Url,
    api_key: String,
    poll_interval: Duration,
}

#[derive(Debug, Deserialize)]
struct LinkRow {
    links: HashMap<String, String>,
}

#[derive(Debug, Deserialize)]
struct HealthRow {
    provider_id: String,
    status: HealthStatus,
    latency_ms: Option<u32>,
}

#[derive(Debug, Serialize)]
struct FailureRow<'a> {
    media_id: u32,
    kind: MediaKind,
    season: Option<u32>,
    episode: Option<u32>,
    provider_id: &'a str,
    url: &'a str,
    observed_at: chrono::DateTime<chrono::Utc>,
}

impl RestStorage {
    /// Creates a client from storage configuration.
    ///
    /// # Errors
    ///
    /// - `StorageError::Backend` - Base URL is not parseable
    /// - `StorageError::Http` - HTTP client construction failed
    pub fn new(config: &StorageConfig) -> Result<Self, StorageError> {
        let base = Url::parse(&config.base_url).map_err(|e| StorageError::Backend {
            reason: format!("invalid storage base url: {e}"),
        })?;
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;

        Ok(Self {
            client,
            base,
            api_key: config.api_key.clone(),
            poll_interval: config.health_poll_interval,
        })
    }

    fn table_url(&self, table: &str) -> Result<Url, StorageError> {
        self.base
            .join(&format!("rest/v1/{table}"))
            .map_err(|e| StorageError::Backend {
                reason: format!("invalid table path {table}: {e}"),
            })
    }

    fn authorized(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        request
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
    }

    async fn fetch_rows<T: serde::de::DeserializeOwned>(
        &self,
        url: Url,
    ) -> Result<Vec<T>, StorageError> {
        let response = self
            .authorized(self.client.get(url))
            .send()
            .await?
            .error_for_status()?;
        Ok(response.json().await?)
    }
}

#[async_trait]
impl OverrideStore for RestStorage {
    async fn override_links(
        &self,
        identity: &ContentIdentity,
    ) -> Result<OverrideLinks, StorageError> {
        let mut url = self.table_url("title_links")?;
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("select", "links");
            query.append_pair("media_id", &format!("eq.{}", identity.media_id));
            query.append_pair("kind", &format!("eq.{}", identity.kind));
            if let Some(season) = identity.season {
                query.append_pair("season", &format!("eq.{season}"));
            }
            if let Some(episode) = identity.episode {
                query.append_pair("episode", &format!("eq.{episode}"));
            }
            query.append_pair("limit", "1");
        }

        let rows: Vec<LinkRow> = self.fetch_rows(url).await?;
        Ok(rows.into_iter().next().map(|row| row.links).unwrap_or_default())
    }
}

#[async_trait]
impl HealthBackend for RestStorage {
    async fn all_provider_health(
        &self,
    ) -> Result<HashMap<String, ProviderHealth>, StorageError> {
        let mut url = self.table_url("provider_health")?;
        url.query_pairs_mut()
            .append_pair("select", "provider_id,status,latency_ms");

        let rows: Vec<HealthRow> = self.fetch_rows(url).await?;
        Ok(rows
            .into_iter()
            .map(|row| {
                (
                    row.provider_id,
                    ProviderHealth {
                        status: row.status,
                        latency_ms: row.latency_ms,
                    },
                )
            })
            .collect())
    }

    async fn run_health_feed(
        &self,
        updates: mpsc::UnboundedSender<HealthUpdate>,
    ) -> Result<(), StorageError> {
        // Seeded on the first successful poll; only changes are forwarded
        // after that. Bootstrap covers the initial state.
        let mut last: Option<HashMap<String, ProviderHealth>> = None;

        loop {
            tokio::time::sleep(self.poll_interval).await;
            if updates.is_closed() {
                return Ok(());
            }

            let next = match self.all_provider_health().await {
                Ok(rows) => rows,
                Err(e) => {
                    tracing::warn!("Health poll failed, keeping last-known values: {e}");
                    continue;
                }
            };

            if let Some(previous) = &last {
                for update in diff_health(previous, &next) {
                    if updates.send(update).is_err() {
                        return Ok(());
                    }
                }
            }
            last = Some(next);
        }
    }
}

#[async_trait]
impl ReportSink for RestStorage {
    async fn record_failure(&self, report: &FailureReport) -> Result<(), StorageError> {
        let row = FailureRow {
            media_id: report.identity.media_id,
            kind: report.identity.kind,
            season: report.identity.season,
            episode: report.identity.episode,
            provider_id: &report.provider_id,
            url: &report.url,
            observed_at: report.observed_at,
        };

        self.authorized(self.client.post(self.table_url("failure_reports")?))
            .header("Prefer", "return=minimal")
            .json(&row)
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }
}

/// Computes point updates between two health snapshots.
///
/// Providers that vanish from the table are reported as `Unknown` so a
/// deleted row does not leave a stale trust signal behind.
fn diff_health(
    previous: &HashMap<String, ProviderHealth>,
    next: &HashMap<String, ProviderHealth>,
) -> Vec<HealthUpdate> {
    let mut changes = Vec::new();

    for (provider_id, health) in next {
        if previous.get(provider_id) != Some(health) {
            changes.push(HealthUpdate {
                provider_id: provider_id.clone(),
                status: health.status,
                latency_ms: health.latency_ms,
            });
        }
    }

    for provider_id in previous.keys() {
        if !next.contains_key(provider_id) {
            changes.push(HealthUpdate {
                provider_id: provider_id.clone(),
                status: HealthStatus::Unknown,
                latency_ms: None,
            });
        }
    }

    changes
}
