//! Content identity types shared across the engine.
//!
//! A `ContentIdentity` names exactly one playable thing: a movie or a single
//! episode of a series. Identity equality is what drives candidate-list
//! rebuilds, so the type derives value equality and nothing hangs off
//! interior mutability.

use serde::Serialize;

/// Errors produced while resolving route parameters into an identity.
#[derive(Debug, Clone, thiserror::Error)]
pub enum MediaError {
    #[error("unknown media kind: {kind}")]
    UnknownKind { kind: String },

    #[error("invalid media id: {value}")]
    InvalidId { value: String },

    #[error("series identity requires season and episode")]
    MissingEpisode,
}

/// Whether an identity addresses a movie or a series episode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Movie,
    Series,
}

impl std::fmt::Display for MediaKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MediaKind::Movie => write!(f, "movie"),
            MediaKind::Series => write!(f, "series"),
        }
    }
}

/// Value identity of the title currently being played.
///
/// `season`/`episode` are meaningful only when `kind` is `Series`.
/// `external_id` carries a provider-neutral external identifier (IMDB style)
/// that some providers prefer over the internal numeric id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ContentIdentity {
    pub media_id: u32,
    pub kind: MediaKind,
    pub season: Option<u32>,
    pub episode: Option<u32>,
    pub external_id: Option<String>,
}

impl ContentIdentity {
    /// Creates a movie identity.
    pub fn movie(media_id: u32) -> Self {
        Self {
            media_id,
            kind: MediaKind::Movie,
            season: None,
            episode: None,
            external_id: None,
        }
    }

    /// Creates a series episode identity.
    pub fn episode(media_id: u32, season: u32, episode: u32) -> Self {
        Self {
            media_id,
            kind: MediaKind::Series,
            season: Some(season),
            episode: Some(episode),
            external_id: None,
        }
    }

    /// Attaches an external identifier, consuming self.
    pub fn with_external_id(mut self, external_id: impl Into<String>) -> Self {
        self.external_id = Some(external_id.into());
        self
    }

    /// Resolves URL route parameters into an identity.
    ///
    /// Accepts the kind segment (`movie`/`tv`/`series`), the numeric id, and
    /// optional season/episode segments. This is the engine-facing half of
    /// the metadata collaborator; full title lookup lives outside the engine.
    ///
    /// # Errors
    ///
    /// - `MediaError::UnknownKind` - Kind segment is not movie or series
    /// - `MediaError::InvalidId` - Id or season/episode segment is not numeric
    /// - `MediaError::MissingEpisode` - Series route without season + episode
    pub fn from_route(
        kind: &str,
        id: &str,
        season: Option<&str>,
        episode: Option<&str>,
    ) -> Result<Self, MediaError> {
        let media_id = parse_segment(id)?;

        match kind {
            "movie" | "movies" => Ok(Self::movie(media_id)),
            "tv" | "series" => {
                let (Some(season), Some(episode)) = (season, episode) else {
                    return Err(MediaError::MissingEpisode);
                };
                Ok(Self::episode(
                    media_id,
                    parse_segment(season)?,
                    parse_segment(episode)?,
                ))
            }
            other => Err(MediaError::UnknownKind {
                kind: other.to_string(),
            }),
        }
    }

    /// Returns true when this identity can be addressed as a series episode.
    pub fn is_series_addressable(&self) -> bool {
        self.kind == MediaKind::Series && self.season.is_some() && self.episode.is_some()
    }
}

fn parse_segment(value: &str) -> Result<u32, MediaError> {
    value.parse().map_err(|_| MediaError::InvalidId {
        value: value.to_string(),
    })
}
