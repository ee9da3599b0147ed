//! Pure playback session state machine.
//!
//! `PlaybackSession` holds the candidates, active index, phase, and the
//! bookkeeping for the stale-fetch guard and exhaustion accounting. It
//! performs no I/O and owns no timers; the actor drives it and keeps the
//! single stall timer aligned with the phase.

use super::SessionError;
use super::commands::{SessionPhase, SessionState};
use crate::health::HealthUpdate;
use crate::media::ContentIdentity;
use crate::sources::{Candidate, annotate_candidates};

/// Outcome of an automatic advance after a stall.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdvanceOutcome {
    /// Moved to the next candidate; re-arm the stall timer.
    Advanced,
    /// One full cycle completed without a success; rotation stops.
    Exhausted,
}

/// Selection state for one viewer surface.
///
/// Invariant: `active_index < candidates.len()` whenever candidates is
/// non-empty; an installed empty list carries `Exhausted`. The window
/// between [`begin_load`](Self::begin_load) and
/// [`install_candidates`](Self::install_candidates) is the one exception:
/// the list is empty while the phase reads `Loading`, with nothing to
/// render and no stall timer wanted.
pub struct PlaybackSession {
    identity: Option<ContentIdentity>,
    candidates: Vec<Candidate>,
    active_index: usize,
    phase: SessionPhase,
    /// Bumped on every identity load; stamps in-flight fetches.
    generation: u64,
    /// Consecutive auto-advances without a successful load.
    consecutive_stalls: usize,
}

impl PlaybackSession {
    pub fn new() -> Self {
        Self {
            identity: None,
            candidates: Vec::new(),
            active_index: 0,
            phase: SessionPhase::Exhausted,
            generation: 0,
            consecutive_stalls: 0,
        }
    }

    /// Starts loading a new identity; returns the fetch generation.
    ///
    /// The old candidate list is discarded immediately: between this call
    /// and [`install_candidates`](Self::install_candidates) there is
    /// nothing to render.
    pub fn begin_load(&mut self, identity: ContentIdentity) -> u64 {
        self.generation += 1;
        self.identity = Some(identity);
        self.candidates.clear();
        self.active_index = 0;
        self.phase = SessionPhase::Loading;
        self.consecutive_stalls = 0;
        self.generation
    }

    /// Checks whether a fetch started at `generation` is still relevant.
    pub fn is_current(&self, generation: u64) -> bool {
        self.generation == generation
    }

    /// Installs a freshly built candidate list.
    ///
    /// Resets to index 0 and `Loading`; an empty list goes straight to
    /// `Exhausted` - there is nothing to rotate through.
    pub fn install_candidates(&mut self, candidates: Vec<Candidate>) {
        self.candidates = candidates;
        self.active_index = 0;
        self.consecutive_stalls = 0;
        self.phase = if self.candidates.is_empty() {
            SessionPhase::Exhausted
        } else {
            SessionPhase::Loading
        };
    }

    /// Marks the active candidate as successfully loaded.
    pub fn mark_ready(&mut self) {
        if self.phase == SessionPhase::Loading {
            self.phase = SessionPhase::Ready;
            self.consecutive_stalls = 0;
        }
    }

    /// Marks the active candidate as stalled.
    ///
    /// Returns true when the transition happened; a stall signal outside
    /// `Loading` (late surface event, already advanced) is ignored.
    pub fn mark_stalled(&mut self) -> bool {
        if self.phase == SessionPhase::Loading {
            self.phase = SessionPhase::Stalled;
            true
        } else {
            false
        }
    }

    /// Advances past a stalled candidate.
    ///
    /// Wraps past the last candidate; completing one full cycle without
    /// any success transitions to `Exhausted` instead of looping again.
    pub fn auto_advance(&mut self) -> AdvanceOutcome {
        if self.candidates.is_empty() {
            self.phase = SessionPhase::Exhausted;
            return AdvanceOutcome::Exhausted;
        }

        self.consecutive_stalls += 1;
        if self.consecutive_stalls >= self.candidates.len() {
            self.phase = SessionPhase::Exhausted;
            return AdvanceOutcome::Exhausted;
        }

        self.active_index = (self.active_index + 1) % self.candidates.len();
        self.phase = SessionPhase::Loading;
        AdvanceOutcome::Advanced
    }

    /// Manual rotate: next candidate with wraparound, back to `Loading`.
    ///
    /// Also restarts rotation out of `Exhausted` - manual action is the
    /// explicit retry the exhausted state waits for.
    ///
    /// # Errors
    ///
    /// - `SessionError::NoViableSource` - Candidate list is empty
    pub fn rotate(&mut self) -> Result<(), SessionError> {
        if self.candidates.is_empty() {
            return Err(SessionError::NoViableSource);
        }
        self.active_index = (self.active_index + 1) % self.candidates.len();
        self.phase = SessionPhase::Loading;
        self.consecutive_stalls = 0;
        Ok(())
    }

    /// Manual pick: jump straight to `index`, bypassing rotation order.
    ///
    /// # Errors
    ///
    /// - `SessionError::IndexOutOfRange` - Index past the candidate list
    /// - `SessionError::NoViableSource` - Candidate list is empty
    pub fn select(&mut self, index: usize) -> Result<(), SessionError> {
        if self.candidates.is_empty() {
            return Err(SessionError::NoViableSource);
        }
        if index >= self.candidates.len() {
            return Err(SessionError::IndexOutOfRange {
                index,
                len: self.candidates.len(),
            });
        }
        self.active_index = index;
        self.phase = SessionPhase::Loading;
        self.consecutive_stalls = 0;
        Ok(())
    }

    /// Re-annotates candidates with a health update, in place.
    ///
    /// Never changes list length, order, or the active index.
    pub fn apply_health_update(&mut self, update: &HealthUpdate) {
        annotate_candidates(&mut self.candidates, update);
    }

    pub fn identity(&self) -> Option<&ContentIdentity> {
        self.identity.as_ref()
    }

    pub fn active_candidate(&self) -> Option<&Candidate> {
        self.candidates.get(self.active_index)
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    /// True while a candidate is loading and a stall timer should run.
    pub fn wants_stall_timer(&self) -> bool {
        self.phase == SessionPhase::Loading && !self.candidates.is_empty()
    }

    pub fn state(&self) -> SessionState {
        SessionState {
            candidates: self.candidates.clone(),
            active_index: self.active_index,
            phase: self.phase,
        }
    }
}

impl Default for PlaybackSession {
    fn default() -> Self {
        Self::new()
    }
}
