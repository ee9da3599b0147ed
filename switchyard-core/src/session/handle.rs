//! Handle for communicating with the playback session actor.

use tokio::sync::{mpsc, oneshot};

use super::SessionError;
use super::commands::{SessionCommand, SessionState};
use crate::media::ContentIdentity;
use crate::sources::Candidate;

/// Handle for communicating with the playback session actor.
///
/// Provides an ergonomic async API for sending commands to the session
/// actor. It can be cloned and shared; the actor stops when every handle
/// is dropped or after an explicit [`shutdown`](Self::shutdown).
#[derive(Clone)]
pub struct PlaybackSessionHandle {
    sender: mpsc::Sender<SessionCommand>,
}

impl PlaybackSessionHandle {
    /// Creates a new handle with the given command sender.
    pub fn new(sender: mpsc::Sender<SessionCommand>) -> Self {
        Self { sender }
    }

    /// Loads a new content identity and rebuilds the candidate list.
    ///
    /// Resolves once the candidate list for this identity is installed;
    /// the returned state is at index 0 in `Loading` (or `Exhausted` when
    /// no provider can address the title).
    ///
    /// # Errors
    /// - `SessionError::Superseded` - A newer load replaced this one
    /// - `SessionError::Shutdown` - Actor is no longer running
    pub async fn load_identity(
        &self,
        identity: ContentIdentity,
    ) -> Result<SessionState, SessionError> {
        let (responder, rx) = oneshot::channel();
        let cmd = SessionCommand::LoadIdentity {
            identity,
            responder,
        };

        self.sender
            .send(cmd)
            .await
            .map_err(|_| SessionError::Shutdown)?;

        rx.await.map_err(|_| SessionError::Shutdown)?
    }

    /// Manually rotates to the next candidate, wrapping past the end.
    ///
    /// # Errors
    /// - `SessionError::NoViableSource` - Candidate list is empty
    /// - `SessionError::Shutdown` - Actor is no longer running
    pub async fn next_source(&self) -> Result<SessionState, SessionError> {
        let (responder, rx) = oneshot::channel();
        let cmd = SessionCommand::NextSource { responder };

        self.sender
            .send(cmd)
            .await
            .map_err(|_| SessionError::Shutdown)?;

        rx.await.map_err(|_| SessionError::Shutdown)?
    }

    /// Jumps straight to the candidate at `index`.
    ///
    /// # Errors
    /// - `SessionError::IndexOutOfRange` - Index past the candidate list
    /// - `SessionError::NoViableSource` - Candidate list is empty
    /// - `SessionError::Shutdown` - Actor is no longer running
    pub async fn select_source(&self, index: usize) -> Result<SessionState, SessionError> {
        let (responder, rx) = oneshot::channel();
        let cmd = SessionCommand::SelectSource { index, responder };

        self.sender
            .send(cmd)
            .await
            .map_err(|_| SessionError::Shutdown)?;

        rx.await.map_err(|_| SessionError::Shutdown)?
    }

    /// Signals that the active candidate loaded successfully.
    ///
    /// Cancels the stall timer and settles the session in `Ready`.
    ///
    /// # Errors
    /// - `SessionError::Shutdown` - Actor is no longer running
    pub async fn load_succeeded(&self) -> Result<(), SessionError> {
        let (responder, rx) = oneshot::channel();
        let cmd = SessionCommand::LoadSucceeded { responder };

        self.sender
            .send(cmd)
            .await
            .map_err(|_| SessionError::Shutdown)?;

        rx.await.map_err(|_| SessionError::Shutdown)
    }

    /// Signals that the active candidate failed; same effect as a stall.
    ///
    /// # Errors
    /// - `SessionError::Shutdown` - Actor is no longer running
    pub async fn load_failed(&self) -> Result<(), SessionError> {
        let (responder, rx) = oneshot::channel();
        let cmd = SessionCommand::LoadFailed { responder };

        self.sender
            .send(cmd)
            .await
            .map_err(|_| SessionError::Shutdown)?;

        rx.await.map_err(|_| SessionError::Shutdown)
    }

    /// Flags the active candidate broken and rotates.
    ///
    /// The telemetry write is fire-and-forget; rotation happens whether
    /// or not the write succeeds.
    ///
    /// # Errors
    /// - `SessionError::NoViableSource` - Candidate list is empty
    /// - `SessionError::Shutdown` - Actor is no longer running
    pub async fn report_broken(&self) -> Result<SessionState, SessionError> {
        let (responder, rx) = oneshot::channel();
        let cmd = SessionCommand::ReportBroken { responder };

        self.sender
            .send(cmd)
            .await
            .map_err(|_| SessionError::Shutdown)?;

        rx.await.map_err(|_| SessionError::Shutdown)?
    }

    /// Returns the candidate the surface should render right now.
    ///
    /// # Errors
    /// - `SessionError::Shutdown` - Actor is no longer running
    pub async fn active_source(&self) -> Result<Option<Candidate>, SessionError> {
        let (responder, rx) = oneshot::channel();
        let cmd = SessionCommand::ActiveSource { responder };

        self.sender
            .send(cmd)
            .await
            .map_err(|_| SessionError::Shutdown)?;

        rx.await.map_err(|_| SessionError::Shutdown)
    }

    /// Returns a snapshot of the full session state.
    ///
    /// # Errors
    /// - `SessionError::Shutdown` - Actor is no longer running
    pub async fn current_state(&self) -> Result<SessionState, SessionError> {
        let (responder, rx) = oneshot::channel();
        let cmd = SessionCommand::CurrentState { responder };

        self.sender
            .send(cmd)
            .await
            .map_err(|_| SessionError::Shutdown)?;

        rx.await.map_err(|_| SessionError::Shutdown)
    }

    /// Shuts down the session actor gracefully.
    ///
    /// # Errors
    /// - `SessionError::Shutdown` - Actor already stopped
    pub async fn shutdown(&self) -> Result<(), SessionError> {
        let (responder, rx) = oneshot::channel();
        let cmd = SessionCommand::Shutdown { responder };

        self.sender
            .send(cmd)
            .await
            .map_err(|_| SessionError::Shutdown)?;

        rx.await.map_err(|_| SessionError::Shutdown)
    }

    /// Checks if the session actor is still running.
    pub fn is_running(&self) -> bool {
        !self.sender.is_closed()
    }
}
