//! Source list construction.
//!
//! Joins the provider catalog, URL synthesis, operator overrides, and the
//! health store into an ordered candidate list for one content identity.
//! Health is informational only: it annotates candidates but never reorders
//! them, keeping rotation order predictable and operator-auditable.

use std::sync::Arc;

use crate::health::{HealthStatus, HealthStore, HealthUpdate};
use crate::media::ContentIdentity;
use crate::sources::catalog::ProviderCatalog;
use crate::sources::{OverrideLinks, synthesize};
use crate::storage::OverrideStore;

/// One playable source, derived and never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub provider_id: String,
    pub display_name: String,
    pub url: String,
    pub rank_weight: u8,
    pub status: HealthStatus,
    pub measured_latency_ms: Option<u32>,
}

/// Builds candidate lists for content identities.
pub struct SourceListBuilder {
    catalog: Arc<ProviderCatalog>,
    health: Arc<HealthStore>,
    overrides: Arc<dyn OverrideStore>,
}

impl SourceListBuilder {
    pub fn new(
        catalog: Arc<ProviderCatalog>,
        health: Arc<HealthStore>,
        overrides: Arc<dyn OverrideStore>,
    ) -> Self {
        Self {
            catalog,
            health,
            overrides,
        }
    }

    /// Fetches overrides and assembles the candidate list for `identity`.
    ///
    /// Override fetch failures degrade to an empty map: the viewer still
    /// gets synthesized sources, just without operator curation.
    pub async fn build(&self, identity: &ContentIdentity) -> Vec<Candidate> {
        let links = self.fetch_overrides(identity).await;
        self.assemble(identity, &links)
    }

    /// Fetches override links, swallowing backend errors to an empty map.
    pub async fn fetch_overrides(&self, identity: &ContentIdentity) -> OverrideLinks {
        match self.overrides.override_links(identity).await {
            Ok(links) => links,
            Err(e) => {
                tracing::warn!(
                    media_id = identity.media_id,
                    "Override fetch failed, using synthesized URLs only: {e}"
                );
                OverrideLinks::new()
            }
        }
    }

    /// Pure assembly step: synthesis, drop-on-none, health annotation.
    ///
    /// Split from [`build`](Self::build) so the session actor can run the
    /// override fetch itself behind its stale-response guard.
    pub fn assemble(&self, identity: &ContentIdentity, links: &OverrideLinks) -> Vec<Candidate> {
        self.catalog
            .providers()
            .iter()
            .filter_map(|provider| {
                let url = synthesize(provider, identity, links)?;
                let health = self.health.health_of(provider.id);
                Some(Candidate {
                    provider_id: provider.id.to_string(),
                    display_name: provider.display_name.to_string(),
                    url,
                    rank_weight: provider.rank_weight,
                    status: health.status,
                    measured_latency_ms: health.latency_ms,
                })
            })
            .collect()
    }
}

/// Applies a health update to an existing candidate list in place.
///
/// Touches only `status` and `measured_latency_ms`; list length and order
/// are never changed here.
pub fn annotate_candidates(candidates: &mut [Candidate], update: &HealthUpdate) {
    for candidate in candidates
        .iter_mut()
        .filter(|c| c.provider_id == update.provider_id)
    {
        candidate.status = update.status;
        candidate.measured_latency_ms = update.latency_ms;
    }
}
