use std::time::Duration;

use crate::error::{GameError, GameResult};

const GRID_SIZE: usize = 20;
const INPUT_HZ: u32 = 30;
const SIM_HZ: u32 = 6;

/// Compiled-in settings for a game session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameConfig {
    /// Side length of the square grid, border walls included
    pub grid_size: usize,
    /// How often the keyboard is sampled
    pub input_period: Duration,
    /// How often the snake moves and the frame is redrawn
    pub sim_period: Duration,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            grid_size: GRID_SIZE,
            input_period: Duration::from_secs(1) / INPUT_HZ,
            sim_period: Duration::from_secs(1) / SIM_HZ,
        }
    }
}

impl GameConfig {
    pub fn validate(&self) -> GameResult<()> {
        if self.grid_size < 3 {
            return Err(GameError::GridTooSmall(self.grid_size));
        }

        if self.input_period >= self.sim_period {
            return Err(GameError::InvalidPeriods {
                input: self.input_period,
                sim: self.sim_period,
            });
        }

        Ok(())
    }
}
