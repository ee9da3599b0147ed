//! Candidate source resolution.
//!
//! This module turns a content identity into an ordered list of playable
//! candidates: a static provider catalog, a pure URL synthesizer honoring
//! operator overrides, and a builder that joins both with live health.

pub mod builder;
pub mod catalog;
pub mod synthesis;

use std::collections::HashMap;

pub use builder::{Candidate, SourceListBuilder, annotate_candidates};
pub use catalog::{KindSupport, Provider, ProviderCatalog, UrlTemplateKind};
pub use synthesis::synthesize;

/// Operator-curated override links for one identity, keyed by provider id.
///
/// A present entry fully replaces the synthesized URL for that provider;
/// it is never merged with template output. Empty is the common case.
pub type OverrideLinks = HashMap<String, String>;
