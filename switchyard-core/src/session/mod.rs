//! Playback session: the selection / failover state machine.
//!
//! A session owns the candidate list and active index for one viewer
//! surface. It runs as an actor: commands are processed sequentially on a
//! single task, which makes the stall timer, stale-fetch guard, and state
//! transitions race-free without locks.

pub mod actor;
pub mod commands;
pub mod core;
pub mod handle;

#[cfg(test)]
mod integration_tests;
#[cfg(test)]
pub(crate) mod test_mocks;

pub use actor::spawn_playback_session;
pub use commands::{SessionCommand, SessionPhase, SessionState};
pub use core::PlaybackSession;
pub use handle::PlaybackSessionHandle;

/// Errors crossing the session boundary.
///
/// Everything else (stalls, fetch failures, telemetry outcomes) is
/// contained inside the engine; only these conditions reach callers.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    #[error("playback session shut down")]
    Shutdown,

    #[error("superseded by a newer title load")]
    Superseded,

    #[error("no viable playback source for this title")]
    NoViableSource,

    #[error("source index {index} out of range ({len} candidates)")]
    IndexOutOfRange { index: usize, len: usize },
}
