use crate::error::GameResult;
use crate::grid::{Cell, Grid};

const EMPTY_CHAR: char = ' ';
const WALL_CHAR: char = '#';
const SNAKE_HEAD_CHAR: char = '●';
const SNAKE_BODY_CHAR: char = '○';
const FOOD_CHAR: char = '•';

/// Output capability: draws one complete frame, replacing whatever was drawn before.
pub trait Render {
    fn render(&mut self, grid: &Grid, score: u32, game_over: bool) -> GameResult<()>;
}

pub fn cell_char(cell: Cell) -> char {
    match cell {
        Cell::Empty => EMPTY_CHAR,
        Cell::Wall => WALL_CHAR,
        Cell::SnakeHead => SNAKE_HEAD_CHAR,
        Cell::SnakeBody => SNAKE_BODY_CHAR,
        Cell::Food => FOOD_CHAR,
    }
}

/// Text of a frame: the score line, one line per grid row, and a trailer once the game is over.
pub fn frame_lines(grid: &Grid, score: u32, game_over: bool) -> Vec<String> {
    let mut lines = Vec::with_capacity(grid.size() + 2);
    lines.push(format!("Score: {}", score));

    for row in grid.rows() {
        lines.push(row.iter().map(|c| cell_char(*c)).collect());
    }

    if game_over {
        lines.push(format!("Game Over! Your score: {}", score));
    }

    lines
}
