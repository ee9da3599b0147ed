//! Provider health tracking.
//!
//! The health store is the only mutable state shared across concurrently
//! open playback sessions. It holds last-known status per provider id,
//! seeded by a one-shot bootstrap and kept current by a push feed. Sessions
//! never write it; they only read snapshots and react to its broadcast.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;

use crate::storage::HealthBackend;

/// Last-known availability of a provider.
///
/// Health is a property of the provider's infrastructure, not of any
/// specific title, so one status serves every open session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Online,
    Degraded,
    Offline,
    // serde requires the catch-all variant to be last
    #[default]
    #[serde(other)]
    Unknown,
}

/// Health row for one provider: status plus an optional probe latency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ProviderHealth {
    pub status: HealthStatus,
    pub latency_ms: Option<u32>,
}

/// A single point update pushed from the backend's change feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HealthUpdate {
    pub provider_id: String,
    pub status: HealthStatus,
    pub latency_ms: Option<u32>,
}

/// Shared, process-wide store of provider health.
///
/// Reads go through a `parking_lot::RwLock`; all writes funnel through
/// [`HealthStore::apply`], which also fans the update out to every
/// subscriber. Updates are last-write-wins per provider id.
pub struct HealthStore {
    statuses: RwLock<HashMap<String, ProviderHealth>>,
    updates: broadcast::Sender<HealthUpdate>,
}

impl HealthStore {
    /// Creates an empty store; every provider reads as `Unknown`.
    ///
    /// `update_buffer` is the broadcast channel depth; a subscriber that
    /// lags past it misses intermediate updates, which is harmless since
    /// only the latest value per provider matters.
    pub fn new(update_buffer: usize) -> Self {
        let (updates, _) = broadcast::channel(update_buffer);
        Self {
            statuses: RwLock::new(HashMap::new()),
            updates,
        }
    }

    /// One-shot bulk load of all provider statuses.
    ///
    /// A backend failure is logged and leaves every provider `Unknown`;
    /// candidates are still built and shown, just without a trust signal.
    pub async fn bootstrap(&self, backend: &dyn HealthBackend) {
        match backend.all_provider_health().await {
            Ok(rows) => {
                let count = rows.len();
                for (provider_id, health) in rows {
                    self.apply(HealthUpdate {
                        provider_id,
                        status: health.status,
                        latency_ms: health.latency_ms,
                    });
                }
                tracing::debug!("Health bootstrap loaded {count} provider rows");
            }
            Err(e) => {
                tracing::warn!("Health bootstrap failed, providers stay unknown: {e}");
            }
        }
    }

    /// Applies a point update and fans it out to all subscribers.
    pub fn apply(&self, update: HealthUpdate) {
        self.statuses.write().insert(
            update.provider_id.clone(),
            ProviderHealth {
                status: update.status,
                latency_ms: update.latency_ms,
            },
        );
        // Send fails only when nobody is subscribed, which is fine.
        let _ = self.updates.send(update);
    }

    /// Opens a live feed of health updates.
    pub fn subscribe(&self) -> broadcast::Receiver<HealthUpdate> {
        self.updates.subscribe()
    }

    /// Returns the last-known health for a provider, `Unknown` if never seen.
    pub fn health_of(&self, provider_id: &str) -> ProviderHealth {
        self.statuses
            .read()
            .get(provider_id)
            .copied()
            .unwrap_or_default()
    }

    /// Returns a point-in-time copy of the whole health map.
    pub fn snapshot(&self) -> HashMap<String, ProviderHealth> {
        self.statuses.read().clone()
    }

    /// Spawns the backend's push feed into this store.
    ///
    /// The returned guard aborts the feed tasks when dropped, so tying it
    /// to a screen's lifetime releases the channel on every exit path.
    pub fn attach(self: &Arc<Self>, backend: Arc<dyn HealthBackend>) -> HealthFeedGuard {
        let (tx, mut rx) = mpsc::unbounded_channel();

        let feed = tokio::spawn(async move {
            if let Err(e) = backend.run_health_feed(tx).await {
                tracing::warn!("Health feed terminated: {e}");
            }
        });

        let store = Arc::clone(self);
        let pump = tokio::spawn(async move {
            while let Some(update) = rx.recv().await {
                store.apply(update);
            }
        });

        HealthFeedGuard { feed, pump }
    }
}

/// Scoped handle to a running health feed.
///
/// Dropping the guard aborts both the backend feed task and the pump that
/// applies its updates.
pub struct HealthFeedGuard {
    feed: JoinHandle<()>,
    pump: JoinHandle<()>,
}

impl Drop for HealthFeedGuard {
    fn drop(&mut self) {
        self.feed.abort();
        self.pump.abort();
    }
}
