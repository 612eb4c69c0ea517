//! Structured session logging.
//!
//! Every game session gets a random `SessionId`; `SessionLogger` stamps it on
//! lifecycle lines and on the session span so a whole game can be filtered
//! out of interleaved logs.

use std::fmt;

use tracing::{info, warn, Span};
use tracing_subscriber::util::TryInitError;
use tracing_subscriber::{fmt as fmt_layer, prelude::*, EnvFilter};
use uuid::Uuid;

/// Filter used when `RUST_LOG` is unset.
pub const DEFAULT_LOG_FILTER: &str = "mindread_game=info,mindread_vision=info";

/// Install the global subscriber.
///
/// `LOG_FORMAT=json` switches to JSON lines; otherwise human-readable
/// colored output. Logs go to stderr. Fails if a subscriber is already
/// installed.
pub fn init_tracing() -> Result<(), TryInitError> {
    let use_json = std::env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    if use_json {
        tracing_subscriber::registry()
            .with(fmt_layer::layer().json().with_writer(std::io::stderr))
            .with(env_filter)
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(
                fmt_layer::layer()
                    .with_writer(std::io::stderr)
                    .with_ansi(true)
                    .with_target(true)
                    .with_thread_ids(false)
                    .with_file(false)
                    .with_line_number(false),
            )
            .with(env_filter)
            .try_init()
    }
}

/// Unique identifier for one game session.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionId(String);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Session logger with consistent contextual fields.
#[derive(Debug, Clone)]
pub struct SessionLogger {
    session_id: SessionId,
    theme: String,
}

impl SessionLogger {
    pub fn new(session_id: SessionId, theme: impl Into<String>) -> Self {
        Self {
            session_id,
            theme: theme.into(),
        }
    }

    pub fn session_id(&self) -> &SessionId {
        &self.session_id
    }

    pub fn log_start(&self, candidates: usize, detection_secs: f64) {
        info!(
            session_id = %self.session_id,
            theme = %self.theme,
            candidates,
            detection_secs,
            "Game session started"
        );
    }

    pub fn log_round(&self, round_index: u32, candidates: usize) {
        info!(
            session_id = %self.session_id,
            round = round_index,
            candidates,
            "Round started"
        );
    }

    pub fn log_warning(&self, message: &str) {
        warn!(
            session_id = %self.session_id,
            theme = %self.theme,
            "Session warning: {}", message
        );
    }

    pub fn log_completion(&self, winner: &str, rounds_played: u32) {
        info!(
            session_id = %self.session_id,
            theme = %self.theme,
            winner,
            rounds_played,
            "Game complete"
        );
    }

    /// Span covering the whole session, including the frame loop task.
    pub fn create_span(&self) -> Span {
        tracing::info_span!(
            "game_session",
            session_id = %self.session_id,
            theme = %self.theme
        )
    }
}
