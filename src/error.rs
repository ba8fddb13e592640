use thiserror::Error;

/// Everything that can go wrong in a round. None of these are fatal: the engine
/// degrades to "no effect" and keeps running.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GameError {
    /// Input rejected before a round could start (e.g. missing player name).
    #[error("{0}")]
    Validation(String),
    /// A click or timer refers to a target or round that no longer exists.
    #[error("event refers to a target or round that no longer exists")]
    StaleEvent,
    #[error("high score storage unavailable: {0}")]
    StoreUnavailable(String),
    #[error("invalid game configuration: {0}")]
    InvalidConfig(String),
}

impl GameError {
    pub fn missing_player_name() -> Self {
        GameError::Validation("Please enter your name first!".to_string())
    }
}

impl From<serde_json::Error> for GameError {
    fn from(err: serde_json::Error) -> Self {
        GameError::StoreUnavailable(err.to_string())
    }
}

pub type GameResult<T> = Result<T, GameError>;
