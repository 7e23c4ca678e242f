use std::time::Duration;

#[derive(thiserror::Error, Debug)]
pub enum GameError {
    #[error("Grid size must be at least 3, got {0}.")]
    GridTooSmall(usize),
    #[error("Input period {input:?} must be shorter than the simulation period {sim:?}.")]
    InvalidPeriods { input: Duration, sim: Duration },
    #[error("Game was interrupted by the user")]
    Interrupted,
    #[error("Terminal error: {0}")]
    Terminal(#[from] crossterm::ErrorKind),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type GameResult<T> = std::result::Result<T, GameError>;
