use std::collections::VecDeque;

use rand::{rngs::ThreadRng, seq::SliceRandom, Rng};
use tracing::{debug, info, warn};

use crate::Coords;
use Cell::*;
use Direction::*;
use MoveResult::*;

/// Occupant of a single grid position.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Cell {
    Empty,
    Wall,
    SnakeHead,
    SnakeBody,
    Food,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Input scan order: the first held key in this list wins.
    pub const ALL: [Direction; 4] = [Up, Down, Left, Right];

    fn step(self, (row, col): Coords) -> Coords {
        // Heads never sit on the border, so one step never leaves the grid
        match self {
            Up => (row - 1, col),
            Down => (row + 1, col),
            Left => (row, col - 1),
            Right => (row, col + 1),
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum MoveResult {
    /// `old_tail` is `None` when the snake ate and grew this step.
    Moved { new_head: Coords, old_head: Coords, old_tail: Option<Coords> },
    Crashed,
}

/// Square matrix of cells, stored row-major. The border ring is always `Wall`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    size: usize,
    cells: Vec<Cell>,
}

impl Grid {
    fn walled(size: usize) -> Self {
        let mut grid = Grid { size, cells: vec![Empty; size * size] };

        for i in 0..size {
            grid.set((0, i), Wall);
            grid.set((size - 1, i), Wall);
            grid.set((i, 0), Wall);
            grid.set((i, size - 1), Wall);
        }

        grid
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn get(&self, (row, col): Coords) -> Cell {
        self.cells[row * self.size + col]
    }

    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.cells.chunks(self.size)
    }

    pub fn positions_of(&self, cell: Cell) -> Vec<Coords> {
        self.cells.iter()
            .enumerate()
            .filter(|(_, c)| **c == cell)
            .map(|(i, _)| (i / self.size, i % self.size))
            .collect()
    }

    fn set(&mut self, (row, col): Coords, cell: Cell) {
        self.cells[row * self.size + col] = cell;
    }
}

/// Authoritative simulation state. All mutation goes through the methods below,
/// which keep the grid's snake cells in lockstep with the `snake` deque.
pub struct GridState<R = ThreadRng> {
    grid: Grid,
    snake: VecDeque<Coords>,
    food: Option<Coords>,
    direction: Direction,
    score: u32,
    game_over: bool,
    rng: R,
}

impl GridState<ThreadRng> {
    pub fn new(size: usize) -> Self {
        Self::with_rng(size, rand::thread_rng())
    }
}

impl<R: Rng> GridState<R> {
    /// Panics if `size < 3`, since the grid would have no interior.
    pub fn with_rng(size: usize, rng: R) -> Self {
        assert!(size >= 3, "grid of size {} has no interior", size);

        let mut grid = Grid::walled(size);
        let center = (size / 2, size / 2);
        grid.set(center, SnakeHead);

        let mut state = GridState {
            grid,
            snake: VecDeque::from(vec![center]),
            food: None,
            direction: Right,
            score: 0,
            game_over: false,
            rng,
        };

        state.spawn_food();
        state
    }

    /// Marks a uniformly chosen empty cell as food. Leaves food absent when the grid is full.
    pub fn spawn_food(&mut self) -> Option<Coords> {
        let choices = self.grid.positions_of(Empty);
        self.food = choices.choose(&mut self.rng).copied();

        match self.food {
            Some(pos) => {
                self.grid.set(pos, Food);
                debug!(?pos, "food spawned");
            }
            None => warn!("no empty cell left for food"),
        }

        self.food
    }

    pub fn accepts(&self, requested: Direction) -> bool {
        !matches!(
            (requested, self.direction),
            (Up, Down) | (Down, Up) | (Right, Left) | (Left, Right)
        )
    }

    /// Reversals are silently ignored.
    pub fn set_direction(&mut self, requested: Direction) {
        if self.accepts(requested) && requested != self.direction {
            debug!(from = ?self.direction, to = ?requested, "direction changed");
            self.direction = requested;
        }
    }

    pub fn advance(&mut self) -> MoveResult {
        if self.game_over {
            return Crashed;
        }

        let old_head = self.head();
        let new_head = self.direction.step(old_head);
        let target = self.grid.get(new_head);

        if matches!(target, Wall | SnakeBody) {
            self.game_over = true;
            info!(score = self.score, length = self.snake.len(), "snake crashed");
            return Crashed;
        }

        let ate = target == Food;

        self.snake.push_front(new_head);
        self.grid.set(old_head, SnakeBody);
        self.grid.set(new_head, SnakeHead);

        let old_tail = if ate { None } else { self.snake.pop_back() };

        if let Some(tail) = old_tail {
            self.grid.set(tail, Empty);
        } else {
            self.score += 1;
            self.food = None;
            info!(score = self.score, "food eaten");
            self.spawn_food();
        }

        Moved { new_head, old_head, old_tail }
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Head first, tail last.
    pub fn snake(&self) -> &VecDeque<Coords> {
        &self.snake
    }

    pub fn head(&self) -> Coords {
        self.snake[0]
    }

    pub fn food(&self) -> Option<Coords> {
        self.food
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    #[cfg(test)]
    pub(crate) fn place_food(&mut self, pos: Coords) {
        if let Some(old) = self.food.take() {
            self.grid.set(old, Empty);
        }

        assert_eq!(self.grid.get(pos), Empty, "food must go on an empty cell");
        self.grid.set(pos, Food);
        self.food = Some(pos);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    fn seeded(size: usize, seed: u64) -> GridState<StdRng> {
        GridState::with_rng(size, StdRng::seed_from_u64(seed))
    }

    fn assert_invariants<R: Rng>(state: &GridState<R>) {
        let grid = state.grid();
        let n = grid.size();

        for i in 0..n {
            for &pos in &[(0, i), (n - 1, i), (i, 0), (i, n - 1)] {
                assert_eq!(grid.get(pos), Wall, "border cell {:?} is not a wall", pos);
            }
        }

        let snake = state.snake();
        assert!(!snake.is_empty());

        for (i, &pos) in snake.iter().enumerate() {
            let expected = if i == 0 { SnakeHead } else { SnakeBody };
            assert_eq!(grid.get(pos), expected, "segment {} at {:?}", i, pos);
        }

        let marked = grid.positions_of(SnakeHead).len() + grid.positions_of(SnakeBody).len();
        assert_eq!(marked, snake.len());

        for (a, b) in snake.iter().zip(snake.iter().skip(1)) {
            let dist = (a.0 as isize - b.0 as isize).abs() + (a.1 as isize - b.1 as isize).abs();
            assert_eq!(dist, 1, "segments {:?} and {:?} are not adjacent", a, b);
        }

        let foods = grid.positions_of(Food);
        assert!(foods.len() <= 1);
        assert_eq!(foods.first().copied(), state.food());
    }

    #[test]
    fn test_initialize_small_grid() {
        let state = seeded(5, 1);
        assert_invariants(&state);

        assert_eq!(state.head(), (2, 2));
        assert_eq!(state.snake().len(), 1);
        assert_eq!(state.grid().get((2, 2)), SnakeHead);
        assert_eq!(state.direction(), Right);
        assert_eq!(state.score(), 0);
        assert!(!state.is_game_over());

        let food = state.food().expect("food should be placed");
        assert_ne!(food, (2, 2));
        assert!((1..4).contains(&food.0) && (1..4).contains(&food.1));
    }

    #[test]
    fn test_advance_without_food() {
        let mut state = seeded(5, 2);
        state.place_food((1, 1));

        let res = state.advance();

        assert_eq!(res, Moved { new_head: (2, 3), old_head: (2, 2), old_tail: Some((2, 2)) });
        assert_eq!(state.snake().iter().copied().collect::<Vec<_>>(), vec![(2, 3)]);
        assert_eq!(state.grid().get((2, 2)), Empty);
        assert_eq!(state.grid().get((2, 3)), SnakeHead);
        assert_eq!(state.score(), 0);
        assert_eq!(state.food(), Some((1, 1)));
        assert_invariants(&state);
    }

    #[test]
    fn test_advance_onto_food_grows() {
        let mut state = seeded(5, 3);
        state.place_food((2, 3));

        let res = state.advance();

        assert_eq!(res, Moved { new_head: (2, 3), old_head: (2, 2), old_tail: None });
        assert_eq!(state.snake().iter().copied().collect::<Vec<_>>(), vec![(2, 3), (2, 2)]);
        assert_eq!(state.grid().get((2, 2)), SnakeBody);
        assert_eq!(state.score(), 1);

        let food = state.food().expect("new food should be spawned");
        assert!(!state.snake().contains(&food));
        assert_invariants(&state);
    }

    #[test]
    fn test_wall_collision_leaves_state_untouched() {
        let mut state = seeded(5, 4);
        state.place_food((1, 1));

        assert!(matches!(state.advance(), Moved { .. }));
        let grid_before = state.grid().clone();
        let snake_before = state.snake().clone();

        assert_eq!(state.advance(), Crashed);
        assert!(state.is_game_over());
        assert_eq!(state.grid(), &grid_before);
        assert_eq!(state.snake(), &snake_before);
        assert_eq!(state.score(), 0);

        // Game over is terminal
        assert_eq!(state.advance(), Crashed);
        assert_eq!(state.snake(), &snake_before);
    }

    #[test]
    fn test_self_collision() {
        let mut state = seeded(7, 5);
        let path = [((3, 4), Right), ((3, 5), Right), ((4, 5), Down), ((4, 4), Left)];

        for &(food, dir) in path.iter() {
            state.set_direction(dir);
            state.place_food(food);
            assert!(matches!(state.advance(), Moved { old_tail: None, .. }));
        }

        assert_eq!(state.snake().len(), 5);
        assert_eq!(state.score(), 4);
        assert_invariants(&state);

        let snake_before = state.snake().clone();
        state.set_direction(Up);
        assert_eq!(state.advance(), Crashed);
        assert!(state.is_game_over());
        assert_eq!(state.snake(), &snake_before);
    }

    #[test]
    fn test_reverse_direction_is_ignored() {
        let mut state = seeded(9, 6);

        state.set_direction(Left);
        assert_eq!(state.direction(), Right);

        state.set_direction(Up);
        state.set_direction(Down);
        assert_eq!(state.direction(), Up);

        state.set_direction(Left);
        state.set_direction(Right);
        assert_eq!(state.direction(), Left);

        state.set_direction(Down);
        state.set_direction(Up);
        assert_eq!(state.direction(), Down);
    }

    #[test]
    fn test_multiple_changes_before_tick() {
        let mut state = seeded(9, 7);

        state.set_direction(Down);
        assert_eq!(state.direction(), Down);

        // No once-per-tick lock: the last accepted change wins
        state.set_direction(Left);
        assert_eq!(state.direction(), Left);
    }

    #[test]
    fn test_full_grid_leaves_food_absent() {
        let mut state = seeded(4, 8);
        assert_eq!(state.head(), (2, 2));

        state.set_direction(Up);
        state.place_food((1, 2));
        state.advance();

        state.set_direction(Left);
        state.place_food((1, 1));
        state.advance();

        // Only one empty cell remains, so the spawn is forced
        assert_eq!(state.food(), Some((2, 1)));

        state.set_direction(Down);
        assert!(matches!(state.advance(), Moved { old_tail: None, .. }));
        assert_eq!(state.food(), None);
        assert_eq!(state.snake().len(), 4);
        assert_eq!(state.score(), 3);
        assert_invariants(&state);

        assert_eq!(state.advance(), Crashed);
        assert!(state.is_game_over());
    }

    #[test]
    fn test_minimum_grid_has_no_room_for_food() {
        let mut state = seeded(3, 9);
        assert_eq!(state.food(), None);
        assert_eq!(state.advance(), Crashed);
    }

    #[test]
    #[should_panic]
    fn test_grid_without_interior_panics() {
        seeded(2, 0);
    }

    #[test]
    fn test_random_games_keep_invariants() {
        let mut steering = StdRng::seed_from_u64(42);

        for seed in 0..50 {
            let mut state = seeded(8, seed);

            for _ in 0..200 {
                let dir = Direction::ALL[steering.gen_range(0..4)];
                state.set_direction(dir);

                let (len, score) = (state.snake().len(), state.score());
                let snake_before = state.snake().clone();

                match state.advance() {
                    Moved { old_tail: None, .. } => {
                        assert_eq!(state.snake().len(), len + 1);
                        assert_eq!(state.score(), score + 1);
                    }
                    Moved { old_tail: Some(_), .. } => {
                        assert_eq!(state.snake().len(), len);
                        assert_eq!(state.score(), score);
                    }
                    Crashed => {
                        assert!(state.is_game_over());
                        assert_eq!(state.snake(), &snake_before);
                        assert_invariants(&state);
                        break;
                    }
                }

                assert_invariants(&state);
            }
        }
    }
}
