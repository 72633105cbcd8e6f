use log::{debug, info};
use rand::{seq::SliceRandom, Rng};

use crate::error::{GameError, Result};
use crate::worm::{Cell, Direction, Worm};

pub const INITIAL_WORM_LENGTH: usize = 5;

/// Playing field dimensions. Walls sit just outside it.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    pub rows: u16,
    pub cols: u16,
}

impl Grid {
    pub fn new(rows: u16, cols: u16) -> Self {
        Grid { rows, cols }
    }

    pub fn contains(&self, cell: Cell) -> bool {
        (0..self.rows as i32).contains(&cell.row) && (0..self.cols as i32).contains(&cell.col)
    }

    pub fn cells(&self) -> impl Iterator<Item = Cell> {
        let cols = self.cols as i32;
        (0..self.rows as i32).flat_map(move |row| (0..cols).map(move |col| Cell::new(row, col)))
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Status {
    Running,
    EndedByCollision,
    EndedByQuit,
}

#[derive(Clone, Debug)]
pub struct GameState {
    grid: Grid,
    worm: Worm,
    heading: Direction,
    food: Option<Cell>,
    eaten: u32,
    status: Status,
}

impl GameState {
    /// Fresh level layout: a worm of `INITIAL_WORM_LENGTH` centered on the
    /// middle row heading right, and food on a random free cell. Fails when
    /// the grid has no row to put the worm on.
    pub fn new<R: Rng + ?Sized>(grid: Grid, rng: &mut R) -> Result<Self> {
        let row = grid.rows as i32 / 2;
        let len = INITIAL_WORM_LENGTH as i32;
        let start = (grid.cols as i32 / 2 - len / 2).max(0);
        let head_col = (start + len - 1).min(grid.cols as i32 - 1);
        let length = (head_col + 1).min(len) as usize;

        let worm = Worm::straight(Cell::new(row, head_col), length, Direction::Right);
        let food = random_free_cell(&grid, &worm, rng);

        GameState::with_layout(grid, worm.cells().collect(), Direction::Right, food)
    }

    /// Builds a state from an explicit layout, cells listed head first.
    pub fn with_layout(
        grid: Grid,
        cells: Vec<Cell>,
        heading: Direction,
        food: Option<Cell>,
    ) -> Result<Self> {
        if cells.is_empty() {
            return Err(GameError::InvalidLayout("worm has no cells".into()));
        }
        if let Some(cell) = cells.iter().find(|c| !grid.contains(**c)) {
            return Err(GameError::InvalidLayout(format!("worm cell {:?} is off the grid", cell)));
        }
        for (i, cell) in cells.iter().enumerate() {
            if cells[..i].contains(cell) {
                return Err(GameError::InvalidLayout(format!("worm overlaps itself at {:?}", cell)));
            }
        }
        if let Some(food) = food {
            if !grid.contains(food) {
                return Err(GameError::InvalidLayout(format!("food {:?} is off the grid", food)));
            }
            if cells.contains(&food) {
                return Err(GameError::InvalidLayout(format!("food {:?} is on the worm", food)));
            }
        }

        let worm = Worm::from_cells(cells);
        Ok(GameState { grid, worm, heading, food, eaten: 0, status: Status::Running })
    }

    pub fn grid(&self) -> Grid {
        self.grid
    }

    pub fn worm(&self) -> &Worm {
        &self.worm
    }

    pub fn heading(&self) -> Direction {
        self.heading
    }

    /// `None` once every free cell is taken.
    pub fn food(&self) -> Option<Cell> {
        self.food
    }

    /// Food eaten since this state was created.
    pub fn eaten(&self) -> u32 {
        self.eaten
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn is_running(&self) -> bool {
        self.status == Status::Running
    }

    pub fn quit(&mut self) {
        if self.is_running() {
            self.status = Status::EndedByQuit;
        }
    }
}

/// Advances the worm one cell, turning towards `requested` unless that would
/// reverse it. Terminal states are returned untouched.
pub fn step<R: Rng + ?Sized>(mut state: GameState, requested: Direction, rng: &mut R) -> GameState {
    if !state.is_running() {
        return state;
    }

    if !requested.is_opposite(state.heading) {
        state.heading = requested;
    }

    let new_head = state.worm.head().shifted(state.heading);

    if !state.grid.contains(new_head) {
        info!("worm hit the wall at {:?}", new_head);
        state.status = Status::EndedByCollision;
        return state;
    }

    let growing = state.food == Some(new_head);

    if state.worm.blocks(new_head, growing) {
        info!("worm ran into itself at {:?}", new_head);
        state.status = Status::EndedByCollision;
        return state;
    }

    state.worm.advance(new_head, growing);

    if growing {
        state.eaten += 1;
        state.food = random_free_cell(&state.grid, &state.worm, rng);
        debug!("ate food at {:?}, length {}, next food {:?}", new_head, state.worm.len(), state.food);
    }

    state
}

/// Picks a cell not covered by the worm uniformly at random.
pub fn random_free_cell<R: Rng + ?Sized>(grid: &Grid, worm: &Worm, rng: &mut R) -> Option<Cell> {
    let choices: Vec<Cell> = grid.cells().filter(|cell| !worm.contains(*cell)).collect();
    choices.choose(rng).copied()
}
