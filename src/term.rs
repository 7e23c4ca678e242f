use std::{io::{Stdout, Write, stdout}, time::{Duration, Instant}};

use crossterm::{cursor, execute, queue, style, terminal};
use crossterm::terminal::ClearType;
use crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers, read, poll};
use tracing::warn;

use crate::error::{GameError, GameResult};
use crate::game::KeyInput;
use crate::grid::{Direction, Grid};
use crate::render::{frame_lines, Render};

/// How long a key counts as held after its last press or auto-repeat event.
const HOLD_WINDOW: Duration = Duration::from_millis(150);

/// Puts the terminal into raw mode for the session and puts it back afterwards.
pub struct TermManager {
    stdout: Stdout,
}

impl TermManager {
    pub fn new() -> Self {
        TermManager { stdout: stdout() }
    }

    pub fn setup(&mut self) -> GameResult<()> {
        terminal::enable_raw_mode()?;
        execute!(self.stdout, cursor::Hide, terminal::Clear(ClearType::All))?;
        Ok(())
    }

    pub fn restore(&mut self) -> GameResult<()> {
        terminal::disable_raw_mode()?;
        execute!(self.stdout, cursor::Show)?;
        Ok(())
    }
}

/// Draws whole frames from the top-left corner, clearing the previous one first.
pub struct TermScreen {
    stdout: Stdout,
}

impl TermScreen {
    pub fn new() -> Self {
        TermScreen { stdout: stdout() }
    }
}

impl Render for TermScreen {
    fn render(&mut self, grid: &Grid, score: u32, game_over: bool) -> GameResult<()> {
        queue!(self.stdout, terminal::Clear(ClearType::All))?;

        // Raw mode does not return the carriage on newline, so position every line
        for (y, line) in frame_lines(grid, score, game_over).iter().enumerate() {
            queue!(self.stdout, cursor::MoveTo(0, y as u16), style::Print(line))?;
        }

        self.stdout.flush()?;
        Ok(())
    }
}

/// Keyboard state reconstructed from the terminal's key events. Terminals only
/// report presses and auto-repeats, so the latest direction key stays held for
/// `HOLD_WINDOW` after its last event.
pub struct TermKeys {
    held: Option<(Direction, Instant)>,
}

impl TermKeys {
    pub fn new() -> Self {
        TermKeys { held: None }
    }

    fn drain_events(&mut self) -> GameResult<()> {
        while poll(Duration::from_millis(0))? {
            if let Event::Key(ev) = read()? {
                if is_ctrl_c(&ev) {
                    warn!("interrupted from keyboard");
                    return Err(GameError::Interrupted);
                }

                if let Some(dir) = key_direction(ev.code) {
                    self.record(dir, Instant::now());
                }
            }
        }

        Ok(())
    }

    /// A new direction press releases whichever key was held before.
    fn record(&mut self, dir: Direction, at: Instant) {
        self.held = Some((dir, at));
    }

    fn held_at(&self, key: Direction, now: Instant) -> bool {
        matches!(self.held, Some((dir, at)) if dir == key && now.duration_since(at) < HOLD_WINDOW)
    }
}

impl KeyInput for TermKeys {
    fn is_pressed(&mut self, key: Direction) -> GameResult<bool> {
        self.drain_events()?;

        Ok(self.held_at(key, Instant::now()))
    }
}

fn key_direction(code: KeyCode) -> Option<Direction> {
    match code {
        KeyCode::Char('w') | KeyCode::Char('W') | KeyCode::Up => Some(Direction::Up),
        KeyCode::Char('s') | KeyCode::Char('S') | KeyCode::Down => Some(Direction::Down),
        KeyCode::Char('a') | KeyCode::Char('A') | KeyCode::Left => Some(Direction::Left),
        KeyCode::Char('d') | KeyCode::Char('D') | KeyCode::Right => Some(Direction::Right),
        _ => None,
    }
}

fn is_ctrl_c(ev: &KeyEvent) -> bool {
    ev.code == KeyCode::Char('c') && ev.modifiers.contains(KeyModifiers::CONTROL)
}
