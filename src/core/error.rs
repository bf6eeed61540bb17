//! Domain errors for the game state machine

/// Everything that can go wrong while playing
#[derive(Debug, thiserror::Error)]
pub enum GameError {
    #[error("{0}")]
    InvalidInput(String),

    #[error("{0}")]
    NotFound(String),

    #[error("No guesses left")]
    NoGuessesLeft,

    #[error("Game is already completed")]
    AlreadyCompleted,

    #[error("No albums available")]
    NoAlbumsAvailable,

    #[error(transparent)]
    Store(#[from] anyhow::Error),
}
