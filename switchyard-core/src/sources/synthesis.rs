//! Pure URL synthesis.
//!
//! `synthesize` maps one provider and one content identity to a concrete
//! playback URL. It has no side effects and no hidden state: the same
//! inputs always produce byte-identical output. A provider that cannot
//! address the identity yields `None` and is simply dropped from the
//! candidate list; that is an expected, frequent condition, not a fault.

use crate::media::{ContentIdentity, MediaKind};
use crate::sources::catalog::{Provider, UrlTemplateKind};
use crate::sources::OverrideLinks;

/// Synthesizes the playback URL for one provider, or `None` when the
/// provider cannot address this identity.
///
/// Priority order:
/// 1. An operator override for this provider id is returned verbatim and
///    bypasses all template logic, including capability checks.
/// 2. Otherwise the provider's template rule formats the identity.
/// 3. Kind/capability mismatches, and series identities missing season or
///    episode, yield `None`.
pub fn synthesize(
    provider: &Provider,
    identity: &ContentIdentity,
    overrides: &OverrideLinks,
) -> Option<String> {
    if let Some(url) = overrides.get(provider.id) {
        return Some(url.clone());
    }

    if !provider.supports.accepts(identity.kind) {
        return None;
    }

    // Every series grammar encodes season and episode; without both there
    // is nothing addressable.
    if identity.kind == MediaKind::Series && !identity.is_series_addressable() {
        return None;
    }

    let url = match identity.kind {
        MediaKind::Movie => movie_url(provider, identity),
        MediaKind::Series => {
            // Checked addressable above.
            let season = identity.season?;
            let episode = identity.episode?;
            series_url(provider, identity, season, episode)
        }
    };

    Some(append_lang_hint(url, provider.lang_hint))
}

fn movie_url(provider: &Provider, identity: &ContentIdentity) -> String {
    let base = provider.base_url;
    let id = identity.media_id;

    match provider.template {
        UrlTemplateKind::PathSegments => format!("{base}/movie/{id}"),
        UrlTemplateKind::QueryParams => format!("{base}/movie?tmdb={id}"),
        UrlTemplateKind::EmbedRoot => format!("{base}/{id}"),
        UrlTemplateKind::CategoryQuery => format!("{base}/?tmdb={id}&category=movie"),
        UrlTemplateKind::DashEpisode => format!("{base}/movie/tmdb/{id}"),
        UrlTemplateKind::ExternalIdPreferred => {
            format!("{base}/movie/{}", preferred_id(identity))
        }
    }
}

fn series_url(
    provider: &Provider,
    identity: &ContentIdentity,
    season: u32,
    episode: u32,
) -> String {
    let base = provider.base_url;
    let id = identity.media_id;

    match provider.template {
        UrlTemplateKind::PathSegments => format!("{base}/tv/{id}/{season}/{episode}"),
        UrlTemplateKind::QueryParams => {
            format!("{base}/tv?tmdb={id}&season={season}&episode={episode}")
        }
        UrlTemplateKind::EmbedRoot => format!("{base}/tv/{id}?s={season}&e={episode}"),
        UrlTemplateKind::CategoryQuery => {
            format!("{base}/?tmdb={id}&season={season}&episode={episode}&category=tv")
        }
        UrlTemplateKind::DashEpisode => format!("{base}/tv/tmdb/{id}-{season}x{episode}"),
        UrlTemplateKind::ExternalIdPreferred => {
            format!("{base}/tv/{}/{season}/{episode}", preferred_id(identity))
        }
    }
}

/// External identifier when available, numeric id otherwise.
///
/// External ids are caller-supplied strings, so they are percent-encoded
/// before landing in a path segment.
fn preferred_id(identity: &ContentIdentity) -> String {
    match &identity.external_id {
        Some(external) => urlencoding::encode(external).into_owned(),
        None => identity.media_id.to_string(),
    }
}

/// Appends a provider-specific language hint as the last query parameter.
fn append_lang_hint(url: String, hint: Option<&'static str>) -> String {
    match hint {
        Some(hint) if url.contains('?') => format!("{url}&{hint}"),
        Some(hint) => format!("{url}?{hint}"),
        None => url,
    }
}
