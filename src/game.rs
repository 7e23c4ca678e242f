use std::{thread::sleep, time::{Duration, Instant}};

use rand::Rng;
use tracing::{debug, info, trace};

use crate::config::GameConfig;
use crate::error::GameResult;
use crate::grid::{Direction, GridState};
use crate::render::Render;

/// Monotonic time source. Sleeping is the loop's only suspension point.
pub trait Clock {
    fn now(&self) -> Instant;
    fn sleep(&mut self, period: Duration);
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn sleep(&mut self, period: Duration) {
        sleep(period);
    }
}

/// Input capability: reports whether a direction key is currently held.
/// Returns `GameError::Interrupted` when the user asks to abort.
pub trait KeyInput {
    fn is_pressed(&mut self, key: Direction) -> GameResult<bool>;
}

/// Drives a `GridState` with two cadences: fast input sampling and slower
/// simulation ticks, each followed by a render.
pub struct GameLoop<R, I, D, C> {
    state: GridState<R>,
    input: I,
    display: D,
    clock: C,
    input_period: Duration,
    sim_period: Duration,
    last_input_sample: Instant,
    last_sim_tick: Instant,
}

impl<R, I, D, C> GameLoop<R, I, D, C>
where
    R: Rng,
    I: KeyInput,
    D: Render,
    C: Clock,
{
    pub fn new(state: GridState<R>, input: I, display: D, clock: C, config: &GameConfig) -> Self {
        let now = clock.now();

        GameLoop {
            state,
            input,
            display,
            clock,
            input_period: config.input_period,
            sim_period: config.sim_period,
            last_input_sample: now,
            last_sim_tick: now,
        }
    }

    /// Runs until the snake crashes, then draws the final frame.
    pub fn run(&mut self) -> GameResult<()> {
        info!(size = self.state.grid().size(), "game started");

        while !self.state.is_game_over() {
            let now = self.clock.now();

            // Input always precedes a tick due in the same iteration
            if now.duration_since(self.last_input_sample) >= self.input_period {
                self.sample_input()?;
                self.last_input_sample = now;
            }

            if now.duration_since(self.last_sim_tick) >= self.sim_period {
                let res = self.state.advance();
                trace!(
                    ?res,
                    direction = ?self.state.direction(),
                    food = ?self.state.food(),
                    "tick"
                );
                self.render()?;
                self.last_sim_tick = now;
            }

            self.clock.sleep(self.input_period);
        }

        info!(score = self.state.score(), "game over");
        self.render()
    }

    pub fn state(&self) -> &GridState<R> {
        &self.state
    }

    fn sample_input(&mut self) -> GameResult<()> {
        for &dir in Direction::ALL.iter() {
            if self.input.is_pressed(dir)? && self.state.accepts(dir) {
                debug!(?dir, "key held");
                self.state.set_direction(dir);
                break;
            }
        }

        Ok(())
    }

    fn render(&mut self) -> GameResult<()> {
        self.display.render(self.state.grid(), self.state.score(), self.state.is_game_over())
    }
}
