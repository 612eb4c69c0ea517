//! Gaze-controlled quadrant elimination game.
//!
//! This crate provides:
//! - Shuffled quadrant layouts
//! - The binary elimination engine
//! - Game sessions wiring the frame loop to the engine and an event sink
//! - Environment configuration and tracing setup

pub mod config;
pub mod elimination;
pub mod error;
pub mod logging;
pub mod metrics;
pub mod partition;
pub mod session;

pub use config::GameConfig;
pub use elimination::{EliminationEngine, EngineState, RoundOutcome};
pub use error::{GameError, GameResult};
pub use logging::{init_tracing, SessionId, SessionLogger};
pub use partition::{partition, partition_seeded};
pub use session::{EventFn, GameEventSink, GameSession, SessionStatus};
