//! Command and state definitions for the playback session actor.

use tokio::sync::oneshot;

use super::SessionError;
use crate::media::ContentIdentity;
use crate::sources::{Candidate, OverrideLinks};

/// Commands that can be sent to the playback session actor.
///
/// Each command carries a response channel; the actor processes commands
/// one by one, so every transition observes a consistent state.
pub enum SessionCommand {
    /// Load a new content identity and rebuild the candidate list.
    LoadIdentity {
        identity: ContentIdentity,
        responder: oneshot::Sender<Result<SessionState, SessionError>>,
    },
    /// Manually rotate to the next candidate (wraps around).
    NextSource {
        responder: oneshot::Sender<Result<SessionState, SessionError>>,
    },
    /// Manually jump to a specific candidate index.
    SelectSource {
        index: usize,
        responder: oneshot::Sender<Result<SessionState, SessionError>>,
    },
    /// The rendering surface reports the active candidate loaded.
    LoadSucceeded { responder: oneshot::Sender<()> },
    /// The rendering surface reports a load failure; same effect as a stall.
    LoadFailed { responder: oneshot::Sender<()> },
    /// Flag the active candidate broken: report telemetry, then rotate.
    ReportBroken {
        responder: oneshot::Sender<Result<SessionState, SessionError>>,
    },
    /// Get the candidate the surface should render right now.
    ActiveSource {
        responder: oneshot::Sender<Option<Candidate>>,
    },
    /// Get a snapshot of the full session state.
    CurrentState {
        responder: oneshot::Sender<SessionState>,
    },
    /// Shutdown the session actor gracefully.
    Shutdown { responder: oneshot::Sender<()> },
}

/// Internal events the actor sends itself from spawned work.
#[derive(Debug)]
pub enum SessionEvent {
    /// Override links resolved for a load started at `generation`.
    ///
    /// Stale results (an older generation than the session's current one)
    /// are discarded on receipt; a slow fetch for a previous title can
    /// never clobber the current one.
    OverridesFetched {
        generation: u64,
        links: OverrideLinks,
    },
}

/// Lifecycle phase of the active candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// A candidate is being loaded; the stall timer is running.
    Loading,
    /// The active candidate loaded successfully.
    Ready,
    /// The active candidate stalled; an advance is imminent.
    Stalled,
    /// Every candidate was cycled without success, or none exist.
    /// Not auto-retried; explicit user action restarts rotation.
    Exhausted,
}

/// Snapshot of the session for callers.
#[derive(Debug, Clone)]
pub struct SessionState {
    pub candidates: Vec<Candidate>,
    pub active_index: usize,
    pub phase: SessionPhase,
}

impl SessionState {
    /// The candidate the surface should render, if any.
    pub fn active_candidate(&self) -> Option<&Candidate> {
        self.candidates.get(self.active_index)
    }
}
