mod config;
mod error;
mod game;
mod grid;
mod render;
mod term;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use crate::config::GameConfig;
use crate::error::GameError;
use crate::game::{GameLoop, SystemClock};
use crate::grid::GridState;
use crate::term::{TermKeys, TermManager, TermScreen};

/// Grid position as (row, col).
pub type Coords = (usize, usize);

fn main() -> anyhow::Result<()> {
    // Frames go to stdout, logs to stderr
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("error")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = GameConfig::default();
    config.validate()?;

    let mut term = TermManager::new();
    term.setup().context("Failed to prepare the terminal")?;

    let state = GridState::new(config.grid_size);
    let mut game = GameLoop::new(state, TermKeys::new(), TermScreen::new(), SystemClock, &config);
    let outcome = game.run();

    // The terminal is restored before any outcome is reported
    term.restore().context("Failed to restore the terminal")?;

    match outcome {
        Ok(()) => {
            println!();
            tracing::info!(
                score = game.state().score(),
                length = game.state().snake().len(),
                "session finished"
            );
            Ok(())
        }
        Err(GameError::Interrupted) => {
            println!("\nGame was interrupted by the user");
            Ok(())
        }
        Err(err) => Err(err).context("Game stopped unexpectedly"),
    }
}
