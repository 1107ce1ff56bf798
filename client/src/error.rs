use scorebook_game::GameError;
use thiserror::Error;

/// Why a game could not be started
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StartError {
    #[error("Please select both home and away teams.")]
    SelectionRequired,
}

/// Failure of a session call
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error(transparent)]
    Game(#[from] GameError),

    #[error("Scoring session has shut down")]
    Closed,
}
