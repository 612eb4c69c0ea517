//! Game error types.

use thiserror::Error;

pub type GameResult<T> = Result<T, GameError>;

#[derive(Debug, Error)]
pub enum GameError {
    #[error("Game already complete")]
    AlreadyComplete,

    #[error("Invariant violation: {0}")]
    InvariantViolation(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Candidate error: {0}")]
    Candidates(#[from] mindread_models::CandidateError),

    #[error("Vision error: {0}")]
    Vision(#[from] mindread_vision::VisionError),
}

impl GameError {
    pub fn invariant_violation(msg: impl Into<String>) -> Self {
        Self::InvariantViolation(msg.into())
    }

    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }

    /// Whether the player can fix this by granting or attaching a camera
    /// and starting again.
    pub fn is_capability_error(&self) -> bool {
        matches!(self, GameError::Vision(e) if e.is_capability_error())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mindread_models::CandidateError;
    use mindread_vision::VisionError;

    #[test]
    fn test_from_conversions() {
        let err: GameError = CandidateError::Empty.into();
        assert!(matches!(err, GameError::Candidates(CandidateError::Empty)));

        let err: GameError = VisionError::permission_denied("no").into();
        assert!(err.is_capability_error());

        let err: GameError = VisionError::invalid_config("bad").into();
        assert!(!err.is_capability_error());
    }

    #[test]
    fn test_display() {
        assert_eq!(
            GameError::config_error("MINDREAD_MODE").to_string(),
            "Configuration error: MINDREAD_MODE"
        );
    }
}
