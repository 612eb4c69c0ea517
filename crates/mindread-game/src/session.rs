//! A running game: frame loop, elimination engine and event sink wired
//! together.
//!
//! # Flow
//! ```text
//!   FrameLoop ──on_zone──────────────► ZoneChanged
//!       │
//!       └──on_side_confirmed(side) ──► SideConfirmed
//!                                       │
//!                          EliminationEngine::confirm(side)
//!                          ├─ Advanced  ─► RoundAdvanced, reset dwell, keep looping
//!                          └─ Completed ─► GameComplete, stop loop
//! ```
//!
//! The first `RoundAdvanced` is published just before the first frame's
//! `ZoneChanged`, so a session that fails to start publishes nothing.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use mindread_models::{CandidateSet, GameEvent, Round, Side, Zone};
use mindread_vision::{
    FrameLoop, FrameLoopHandle, FrameObserver, LandmarkSource, LoopDirective, LoopStats,
    SharedCamera, StopReason, VisionError,
};
use tokio::sync::{mpsc, watch};
use tracing::{error, info, Instrument};

use crate::config::GameConfig;
use crate::elimination::{EliminationEngine, EngineState, RoundOutcome};
use crate::error::GameResult;
use crate::logging::{SessionId, SessionLogger};
use crate::metrics;

/// Receives game events for the UI shell.
///
/// Called synchronously on the frame loop task; implementations should hand
/// the event off rather than block.
pub trait GameEventSink: Send + Sync {
    fn publish(&self, event: GameEvent);
}

impl GameEventSink for mpsc::UnboundedSender<GameEvent> {
    fn publish(&self, event: GameEvent) {
        // A closed receiver means nobody is watching anymore.
        let _ = self.send(event);
    }
}

/// Adapts a closure into a `GameEventSink`.
pub struct EventFn<F>(pub F);

impl<F> GameEventSink for EventFn<F>
where
    F: Fn(GameEvent) + Send + Sync,
{
    fn publish(&self, event: GameEvent) {
        (self.0)(event)
    }
}

/// Theme label for sessions started on a caller-supplied word list.
pub const CUSTOM_LABEL: &str = "custom";

/// Where a session stands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionStatus {
    Running,
    Won(String),
    /// The loop ended without a winner.
    Ended(StopReason),
}

impl SessionStatus {
    pub fn winner(&self) -> Option<&str> {
        match self {
            SessionStatus::Won(winner) => Some(winner),
            _ => None,
        }
    }
}

struct SessionObserver {
    engine: Arc<Mutex<EliminationEngine>>,
    sink: Arc<dyn GameEventSink>,
    status: watch::Sender<SessionStatus>,
    logger: SessionLogger,
    announced: AtomicBool,
}

impl SessionObserver {
    fn announce_first_round(&self) {
        if self.announced.swap(true, Ordering::SeqCst) {
            return;
        }
        let round = match self.engine.lock() {
            Ok(engine) => engine.current_round().cloned(),
            Err(_) => None,
        };
        if let Some(round) = round {
            self.logger.log_round(round.index, round.candidate_count());
            self.sink.publish(GameEvent::round_advanced(&round));
        }
    }

    fn finish(&self, winner: String, rounds_played: u32) {
        metrics::record_game_completed(rounds_played);
        self.logger.log_completion(&winner, rounds_played);
        self.sink
            .publish(GameEvent::game_complete(winner.clone(), rounds_played));
        self.status.send_replace(SessionStatus::Won(winner));
    }
}

impl FrameObserver for SessionObserver {
    fn on_zone(&self, zone: Zone, elapsed_seconds: f64) {
        self.announce_first_round();
        self.sink
            .publish(GameEvent::zone_changed(zone, elapsed_seconds));
    }

    fn on_side_confirmed(&self, side: Side) -> LoopDirective {
        self.sink.publish(GameEvent::SideConfirmed { side });

        let outcome = match self.engine.lock() {
            Ok(mut engine) => engine.confirm(side),
            Err(_) => {
                error!(session_id = %self.logger.session_id(), "Elimination engine lock poisoned");
                return LoopDirective::Stop;
            }
        };

        match outcome {
            Ok(RoundOutcome::Advanced(round)) => {
                self.logger.log_round(round.index, round.candidate_count());
                self.sink.publish(GameEvent::round_advanced(&round));
                LoopDirective::ResetDetection
            }
            Ok(RoundOutcome::Completed {
                winner,
                rounds_played,
            }) => {
                self.finish(winner, rounds_played);
                LoopDirective::Stop
            }
            Err(e) => {
                error!(
                    session_id = %self.logger.session_id(),
                    side = %side,
                    error = %e,
                    "Failed to apply confirmed side"
                );
                LoopDirective::Stop
            }
        }
    }

    fn on_landmark_error(&self, error: &VisionError) {
        self.logger.log_warning(&error.to_string());
    }

    fn on_stopped(&self, reason: StopReason, _stats: &LoopStats) {
        self.status.send_if_modified(|status| {
            if *status == SessionStatus::Running {
                *status = SessionStatus::Ended(reason);
                true
            } else {
                false
            }
        });
    }
}

/// One game from first layout to winner.
pub struct GameSession {
    logger: SessionLogger,
    engine: Arc<Mutex<EliminationEngine>>,
    handle: Option<FrameLoopHandle>,
    status: watch::Receiver<SessionStatus>,
}

impl GameSession {
    /// Start a game on the configured theme's word list.
    pub async fn start(
        config: &GameConfig,
        camera: &SharedCamera,
        source: Arc<dyn LandmarkSource>,
        sink: Arc<dyn GameEventSink>,
    ) -> GameResult<Self> {
        let candidates = config.theme.candidates()?;
        Self::launch(config, candidates, config.theme.as_str(), camera, source, sink).await
    }

    /// Start a game on a caller-supplied word list.
    ///
    /// # Errors
    /// - `ConfigError` if the detection settings do not validate
    /// - `Vision` if the camera cannot be acquired
    ///
    /// Nothing is published when start fails. A single-word pool completes
    /// immediately without touching the camera.
    pub async fn start_with_candidates(
        config: &GameConfig,
        candidates: CandidateSet,
        camera: &SharedCamera,
        source: Arc<dyn LandmarkSource>,
        sink: Arc<dyn GameEventSink>,
    ) -> GameResult<Self> {
        Self::launch(config, candidates, CUSTOM_LABEL, camera, source, sink).await
    }

    async fn launch(
        config: &GameConfig,
        candidates: CandidateSet,
        label: &'static str,
        camera: &SharedCamera,
        source: Arc<dyn LandmarkSource>,
        sink: Arc<dyn GameEventSink>,
    ) -> GameResult<Self> {
        config.validate()?;

        let logger = SessionLogger::new(SessionId::new(), label);
        let candidate_count = candidates.len();
        let engine = Arc::new(Mutex::new(EliminationEngine::new(candidates, config.seed)));
        let (status_tx, status_rx) = watch::channel(SessionStatus::Running);

        let observer = Arc::new(SessionObserver {
            engine: Arc::clone(&engine),
            sink,
            status: status_tx,
            logger: logger.clone(),
            announced: AtomicBool::new(false),
        });

        let immediate = match engine.lock() {
            Ok(engine) => match engine.state() {
                EngineState::Done {
                    winner,
                    rounds_played,
                } => Some((winner.clone(), *rounds_played)),
                EngineState::Waiting(_) => None,
            },
            Err(_) => None,
        };
        if let Some((winner, rounds_played)) = immediate {
            metrics::record_game_started(label);
            observer.finish(winner, rounds_played);
            return Ok(Self {
                logger,
                engine,
                handle: None,
                status: status_rx,
            });
        }

        let handle = FrameLoop::new(config.detection.clone(), source)
            .start(camera, observer)
            .instrument(logger.create_span())
            .await?;

        metrics::record_game_started(label);
        logger.log_start(candidate_count, config.detection.detection_time_secs());

        Ok(Self {
            logger,
            engine,
            handle: Some(handle),
            status: status_rx,
        })
    }

    pub fn session_id(&self) -> &SessionId {
        self.logger.session_id()
    }

    pub fn status(&self) -> SessionStatus {
        self.status.borrow().clone()
    }

    /// Round currently on screen, if the game is still running.
    pub fn current_round(&self) -> Option<Round> {
        self.engine.lock().ok()?.current_round().cloned()
    }

    /// Discard any partial hold and start the dwell window again.
    pub fn reset_detection(&self) {
        if let Some(handle) = &self.handle {
            handle.reset_detection();
        }
    }

    /// Wait until the game finishes. `None` if the loop ended first.
    pub async fn wait_for_winner(&mut self) -> Option<String> {
        self.status
            .wait_for(|status| *status != SessionStatus::Running)
            .await
            .ok()
            .and_then(|status| status.winner().map(str::to_string))
    }

    /// Stop the loop, release the camera and return the loop statistics.
    pub async fn stop(self) -> LoopStats {
        let stats = match self.handle {
            Some(handle) => handle.stop().await,
            None => LoopStats::default(),
        };
        info!(
            session_id = %self.logger.session_id(),
            frames = stats.frames_processed,
            confirmations = stats.confirmations,
            "Game session stopped"
        );
        stats
    }
}
