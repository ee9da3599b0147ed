//! Static provider catalog.
//!
//! The catalog is a fixed, ordered table of embed providers known to the
//! deployment. Catalog order is the default rotation order; health never
//! reorders it, so operators can audit exactly which source plays first.
//! Adding a provider is a data entry here plus, at most, a new template
//! variant in `synthesis`.

use crate::media::MediaKind;

/// Which URL grammar a provider speaks.
///
/// A closed enum instead of per-provider string comparisons: every variant
/// has exactly one formatting rule in `synthesis`, so the compiler tracks
/// grammar coverage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UrlTemplateKind {
    /// `{base}/movie/{id}` and `{base}/tv/{id}/{season}/{episode}`
    PathSegments,
    /// `{base}/movie?tmdb={id}` and `{base}/tv?tmdb={id}&season={s}&episode={e}`
    QueryParams,
    /// 2embed quirk: `{base}/{id}` for movies, `{base}/tv/{id}?s={s}&e={e}`
    EmbedRoot,
    /// embed.su quirk: everything in the query string plus a category marker
    CategoryQuery,
    /// autoembed quirk: `{base}/movie/tmdb/{id}` and `{base}/tv/tmdb/{id}-{s}x{e}`
    DashEpisode,
    /// Path segments, but the external id is preferred over the numeric id
    ExternalIdPreferred,
}

/// Which content kinds a provider can address at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KindSupport {
    Both,
    MovieOnly,
    SeriesOnly,
}

impl KindSupport {
    /// Returns true when a provider with this support can serve `kind`.
    pub fn accepts(self, kind: MediaKind) -> bool {
        match self {
            KindSupport::Both => true,
            KindSupport::MovieOnly => kind == MediaKind::Movie,
            KindSupport::SeriesOnly => kind == MediaKind::Series,
        }
    }
}

/// One embed provider: identity, grammar, and display metadata.
///
/// Immutable for the process lifetime.
#[derive(Debug, Clone, Copy)]
pub struct Provider {
    /// Stable slug, also the key for overrides and health rows
    pub id: &'static str,
    pub display_name: &'static str,
    pub template: UrlTemplateKind,
    pub base_url: &'static str,
    /// Tie-break / display-order seed; not used for rotation order
    pub rank_weight: u8,
    pub supports: KindSupport,
    /// Provider-specific language hint, appended last when present
    pub lang_hint: Option<&'static str>,
}

/// Ordered, fixed sequence of providers known at process start.
pub struct ProviderCatalog {
    providers: Vec<Provider>,
}

impl ProviderCatalog {
    /// Builds the catalog shipped with this deployment.
    pub fn builtin() -> Self {
        Self {
            providers: vec![
                Provider {
                    id: "vidsrc",
                    display_name: "VidSrc",
                    template: UrlTemplateKind::PathSegments,
                    base_url: "https://vidsrc.to/embed",
                    rank_weight: 10,
                    supports: KindSupport::Both,
                    lang_hint: Some("ds_lang=en"),
                },
                Provider {
                    id: "vidsrc_vip",
                    display_name: "VidSrc VIP",
                    template: UrlTemplateKind::PathSegments,
                    base_url: "https://vidsrc.vip/embed",
                    rank_weight: 9,
                    supports: KindSupport::Both,
                    lang_hint: None,
                },
                Provider {
                    id: "vidsrc_pro",
                    display_name: "VidSrc Pro",
                    template: UrlTemplateKind::PathSegments,
                    base_url: "https://vidsrc.pro/embed",
                    rank_weight: 9,
                    supports: KindSupport::Both,
                    lang_hint: None,
                },
                Provider {
                    id: "2embed",
                    display_name: "2Embed",
                    template: UrlTemplateKind::EmbedRoot,
                    base_url: "https://www.2embed.cc/embed",
                    rank_weight: 8,
                    supports: KindSupport::Both,
                    lang_hint: None,
                },
                Provider {
                    id: "embed_su",
                    display_name: "Embed.su",
                    template: UrlTemplateKind::CategoryQuery,
                    base_url: "https://embed.su",
                    rank_weight: 8,
                    supports: KindSupport::Both,
                    lang_hint: None,
                },
                Provider {
                    id: "autoembed",
                    display_name: "AutoEmbed",
                    template: UrlTemplateKind::DashEpisode,
                    base_url: "https://autoembed.to",
                    rank_weight: 7,
                    supports: KindSupport::Both,
                    lang_hint: None,
                },
                Provider {
                    id: "smashystream",
                    display_name: "SmashyStream",
                    template: UrlTemplateKind::QueryParams,
                    base_url: "https://player.smashy.stream",
                    rank_weight: 6,
                    supports: KindSupport::Both,
                    lang_hint: None,
                },
                Provider {
                    id: "superembed",
                    display_name: "SuperEmbed",
                    template: UrlTemplateKind::QueryParams,
                    base_url: "https://superembed.stream",
                    rank_weight: 6,
                    supports: KindSupport::Both,
                    lang_hint: None,
                },
                Provider {
                    id: "multiembed",
                    display_name: "MultiEmbed",
                    template: UrlTemplateKind::ExternalIdPreferred,
                    base_url: "https://multiembed.mov",
                    rank_weight: 5,
                    supports: KindSupport::Both,
                    lang_hint: None,
                },
                Provider {
                    id: "moviesapi",
                    display_name: "MoviesAPI",
                    template: UrlTemplateKind::PathSegments,
                    base_url: "https://moviesapi.club",
                    rank_weight: 5,
                    supports: KindSupport::Both,
                    lang_hint: None,
                },
                Provider {
                    id: "vidlink",
                    display_name: "VidLink",
                    template: UrlTemplateKind::PathSegments,
                    base_url: "https://vidlink.pro",
                    rank_weight: 4,
                    supports: KindSupport::Both,
                    lang_hint: None,
                },
                Provider {
                    id: "aniwave",
                    display_name: "AniWave",
                    template: UrlTemplateKind::PathSegments,
                    base_url: "https://aniwave.to/embed",
                    rank_weight: 3,
                    supports: KindSupport::SeriesOnly,
                    lang_hint: None,
                },
                Provider {
                    id: "warezcdn",
                    display_name: "WarezCDN",
                    template: UrlTemplateKind::ExternalIdPreferred,
                    base_url: "https://embed.warezcdn.com",
                    rank_weight: 2,
                    supports: KindSupport::MovieOnly,
                    lang_hint: None,
                },
            ],
        }
    }

    /// Builds a catalog from an explicit provider table (tests, staging).
    pub fn from_providers(providers: Vec<Provider>) -> Self {
        Self { providers }
    }

    /// Providers in rotation order.
    pub fn providers(&self) -> &[Provider] {
        &self.providers
    }

    /// Looks up a provider by its stable slug.
    pub fn provider(&self, id: &str) -> Option<&Provider> {
        self.providers.iter().find(|p| p.id == id)
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}
