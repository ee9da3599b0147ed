//! Switchyard Core - Playback source resolution and failover engine
//!
//! This crate provides the building blocks for multi-provider embed playback:
//! a static provider catalog, pure URL synthesis with operator overrides,
//! a shared provider-health store with live updates, and an actor-based
//! playback session that rotates through candidate sources on stall.

pub mod config;
pub mod health;
pub mod media;
pub mod session;
pub mod sources;
pub mod storage;
pub mod telemetry;
pub mod tracing_setup;

// Re-export main types for convenient access
pub use config::SwitchyardConfig;
pub use health::{HealthStatus, HealthStore, HealthUpdate};
pub use media::{ContentIdentity, MediaError, MediaKind};
pub use session::{
    PlaybackSessionHandle, SessionError, SessionPhase, SessionState, spawn_playback_session,
};
pub use sources::{Candidate, ProviderCatalog, SourceListBuilder};
pub use storage::StorageError;
pub use telemetry::{FailureReport, FailureReporter};

/// Core errors that can bubble up from any Switchyard subsystem.
#[derive(Debug, thiserror::Error)]
pub enum SwitchyardError {
    #[error("Media error: {0}")]
    Media(#[from] MediaError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    #[error("Configuration error: {reason}")]
    Configuration { reason: String },
}

impl SwitchyardError {
    /// Returns a user-friendly error message suitable for display.
    pub fn user_message(&self) -> String {
        match self {
            SwitchyardError::Media(e) => match e {
                MediaError::UnknownKind { kind } => {
                    format!("Unknown title kind: {kind}")
                }
                MediaError::InvalidId { value } => format!("Invalid title id: {value}"),
                MediaError::MissingEpisode => {
                    "Season and episode are required for series playback".to_string()
                }
            },
            SwitchyardError::Session(SessionError::NoViableSource) => {
                "No working source found for this title".to_string()
            }
            SwitchyardError::Session(_) => "Playback session error occurred".to_string(),
            SwitchyardError::Storage(_) => "Storage error occurred".to_string(),
            SwitchyardError::Configuration { .. } => "Configuration error occurred".to_string(),
        }
    }

    /// Checks if this error is due to user input validation.
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            SwitchyardError::Media(_) | SwitchyardError::Configuration { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, SwitchyardError>;
