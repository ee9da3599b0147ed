//! Actor implementation for the playback session.

use std::sync::Arc;

use tokio::sync::broadcast::error::RecvError;
use tokio::sync::{broadcast, mpsc, oneshot};
use tokio::time::Instant;

use super::SessionError;
use super::commands::{SessionCommand, SessionEvent, SessionState};
use super::core::{AdvanceOutcome, PlaybackSession};
use super::handle::PlaybackSessionHandle;
use crate::config::SessionConfig;
use crate::health::{HealthStore, HealthUpdate};
use crate::sources::SourceListBuilder;
use crate::telemetry::FailureReporter;

/// Spawns a playback session actor and returns its handle.
///
/// The actor owns all session state and the single stall timer. Commands
/// are processed sequentially; override fetches run as stamped side tasks
/// so a slow response for a previous title can never clobber the current
/// one. Dropping every handle stops the actor.
pub fn spawn_playback_session(
    config: SessionConfig,
    builder: Arc<SourceListBuilder>,
    health: Arc<HealthStore>,
    reporter: FailureReporter,
) -> PlaybackSessionHandle {
    let (sender, receiver) = mpsc::channel(config.command_buffer);
    let (events_tx, events_rx) = mpsc::unbounded_channel();
    let health_rx = health.subscribe();

    let actor = SessionActor {
        config,
        builder,
        reporter,
        events_tx,
        session: PlaybackSession::new(),
        pending_load: None,
        stall_deadline: None,
    };

    tokio::spawn(async move {
        run_actor_loop(actor, receiver, events_rx, health_rx).await;
    });

    PlaybackSessionHandle::new(sender)
}

struct SessionActor {
    config: SessionConfig,
    builder: Arc<SourceListBuilder>,
    reporter: FailureReporter,
    events_tx: mpsc::UnboundedSender<SessionEvent>,
    session: PlaybackSession,
    pending_load: Option<(u64, oneshot::Sender<Result<SessionState, SessionError>>)>,
    stall_deadline: Option<Instant>,
}

/// Runs the main actor message processing loop.
///
/// One `select!` multiplexes commands, internal events (override fetch
/// results), the health broadcast, and the stall timer. The timer is a
/// deadline option rather than a stored future, so there is structurally
/// at most one live timer and cancellation is a plain `None`.
async fn run_actor_loop(
    mut actor: SessionActor,
    mut receiver: mpsc::Receiver<SessionCommand>,
    mut events_rx: mpsc::UnboundedReceiver<SessionEvent>,
    mut health_rx: broadcast::Receiver<HealthUpdate>,
) {
    tracing::debug!("Playback session actor started");
    let mut health_open = true;

    loop {
        let deadline = actor.stall_deadline.unwrap_or_else(Instant::now);

        tokio::select! {
            Some(command) = receiver.recv() => {
                if !actor.handle_command(command) {
                    break;
                }
            }
            Some(event) = events_rx.recv() => {
                actor.handle_event(event);
            }
            update = health_rx.recv(), if health_open => {
                match update {
                    Ok(update) => actor.session.apply_health_update(&update),
                    Err(RecvError::Lagged(skipped)) => {
                        tracing::warn!("Health feed lagged, skipped {skipped} updates");
                    }
                    Err(RecvError::Closed) => health_open = false,
                }
            }
            _ = tokio::time::sleep_until(deadline), if actor.stall_deadline.is_some() => {
                actor.handle_stall_timeout();
            }
            else => break,
        }
    }

    tracing::debug!("Playback session actor stopped");
}

impl SessionActor {
    /// Handles a single command. Returns false to shut down.
    fn handle_command(&mut self, command: SessionCommand) -> bool {
        match command {
            SessionCommand::LoadIdentity {
                identity,
                responder,
            } => {
                self.cancel_stall_timer();
                if let Some((_, stale)) = self.pending_load.take() {
                    let _ = stale.send(Err(SessionError::Superseded));
                }

                let generation = self.session.begin_load(identity.clone());
                self.pending_load = Some((generation, responder));

                // The fetch runs off-actor; its result comes back through
                // the event channel stamped with this generation.
                let builder = Arc::clone(&self.builder);
                let events_tx = self.events_tx.clone();
                tokio::spawn(async move {
                    let links = builder.fetch_overrides(&identity).await;
                    let _ = events_tx.send(SessionEvent::OverridesFetched { generation, links });
                });
            }

            SessionCommand::NextSource { responder } => {
                let result = self.rotate();
                let _ = responder.send(result);
            }

            SessionCommand::SelectSource { index, responder } => {
                // Validate before touching the timer: a rejected select must
                // leave the running stall window intact.
                let result = self.session.select(index).map(|()| {
                    self.arm_stall_timer();
                    self.session.state()
                });
                let _ = responder.send(result);
            }

            SessionCommand::LoadSucceeded { responder } => {
                self.cancel_stall_timer();
                self.session.mark_ready();
                let _ = responder.send(());
            }

            SessionCommand::LoadFailed { responder } => {
                self.cancel_stall_timer();
                if self.session.mark_stalled() {
                    self.advance_past_stall();
                }
                let _ = responder.send(());
            }

            SessionCommand::ReportBroken { responder } => {
                if let (Some(identity), Some(candidate)) =
                    (self.session.identity(), self.session.active_candidate())
                {
                    // Fire-and-forget; rotation below never waits on it.
                    self.reporter.report(identity, candidate);
                }
                let result = self.rotate();
                let _ = responder.send(result);
            }

            SessionCommand::ActiveSource { responder } => {
                let _ = responder.send(self.session.active_candidate().cloned());
            }

            SessionCommand::CurrentState { responder } => {
                let _ = responder.send(self.session.state());
            }

            SessionCommand::Shutdown { responder } => {
                tracing::debug!("Playback session actor shutting down");
                let _ = responder.send(());
                return false;
            }
        }
        true
    }

    fn handle_event(&mut self, event: SessionEvent) {
        match event {
            SessionEvent::OverridesFetched { generation, links } => {
                if !self.session.is_current(generation) {
                    tracing::debug!("Discarding stale override fetch (generation {generation})");
                    return;
                }

                let Some(identity) = self.session.identity().cloned() else {
                    return;
                };
                let candidates = self.builder.assemble(&identity, &links);
                tracing::debug!(
                    media_id = identity.media_id,
                    "Built {} candidate sources",
                    candidates.len()
                );
                self.session.install_candidates(candidates);
                self.arm_stall_timer();

                if let Some((pending_generation, responder)) = self.pending_load.take() {
                    if pending_generation == generation {
                        let _ = responder.send(Ok(self.session.state()));
                    } else {
                        let _ = responder.send(Err(SessionError::Superseded));
                    }
                }
            }
        }
    }

    fn handle_stall_timeout(&mut self) {
        self.stall_deadline = None;
        if self.session.mark_stalled() {
            self.advance_past_stall();
        }
    }

    fn advance_past_stall(&mut self) {
        match self.session.auto_advance() {
            AdvanceOutcome::Advanced => {
                let provider = self
                    .session
                    .active_candidate()
                    .map(|c| c.provider_id.clone())
                    .unwrap_or_default();
                tracing::info!("Source stalled, advancing to {provider}");
                self.arm_stall_timer();
            }
            AdvanceOutcome::Exhausted => {
                tracing::info!("All candidate sources cycled without success");
            }
        }
    }

    /// Shared transition for manual rotate and report-broken.
    fn rotate(&mut self) -> Result<SessionState, SessionError> {
        self.cancel_stall_timer();
        self.session.rotate().map(|()| {
            self.arm_stall_timer();
            self.session.state()
        })
    }

    fn arm_stall_timer(&mut self) {
        self.stall_deadline = if self.session.wants_stall_timer() {
            Some(Instant::now() + self.config.stall_timeout)
        } else {
            None
        };
    }

    fn cancel_stall_timer(&mut self) {
        self.stall_deadline = None;
    }
}
