use std::collections::VecDeque;

use Direction::*;

/// A position on the grid. Row 0 is the top row, column 0 the leftmost one.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Cell {
    pub row: i32,
    pub col: i32,
}

impl Cell {
    pub const fn new(row: i32, col: i32) -> Self {
        Cell { row, col }
    }

    /// The neighbouring cell one step along `direction`. May lie off the grid.
    pub fn shifted(self, direction: Direction) -> Cell {
        let (dr, dc) = direction.delta();
        Cell::new(self.row + dr, self.col + dc)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub fn opposite(self) -> Direction {
        match self {
            Up => Down,
            Down => Up,
            Left => Right,
            Right => Left,
        }
    }

    pub fn is_opposite(self, other: Direction) -> bool {
        self.opposite() == other
    }

    pub fn is_vertical(self) -> bool {
        matches!(self, Up | Down)
    }

    fn delta(self) -> (i32, i32) {
        match self {
            Up => (-1, 0),
            Down => (1, 0),
            Left => (0, -1),
            Right => (0, 1),
        }
    }
}

/// Ordered worm body, head first.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Worm {
    body: VecDeque<Cell>,
}

impl Worm {
    /// Builds a worm from cells listed head first. Callers guarantee the list
    /// is non-empty and free of duplicates.
    pub(crate) fn from_cells(cells: impl IntoIterator<Item = Cell>) -> Self {
        let worm = Worm { body: cells.into_iter().collect() };
        debug_assert!(!worm.is_empty());
        worm
    }

    /// A straight worm of `length` cells whose head is at `head`, trailing
    /// behind it opposite to `heading`.
    pub fn straight(head: Cell, length: usize, heading: Direction) -> Self {
        let back = heading.opposite();
        let mut cells = Vec::with_capacity(length);
        let mut cell = head;
        for _ in 0..length.max(1) {
            cells.push(cell);
            cell = cell.shifted(back);
        }
        Worm::from_cells(cells)
    }

    pub fn head(&self) -> Cell {
        self.body[0]
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    pub fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
        self.body.iter().copied()
    }

    pub fn contains(&self, cell: Cell) -> bool {
        self.body.contains(&cell)
    }

    /// Whether moving the head onto `cell` would hit the body. The tail cell
    /// only counts when the worm keeps it, i.e. when it is growing.
    pub fn blocks(&self, cell: Cell, growing: bool) -> bool {
        let checked = if growing { self.len() } else { self.len() - 1 };
        self.body.iter().take(checked).any(|&c| c == cell)
    }

    /// Prepends `new_head`. Keeps the tail when `grow` is set, drops it
    /// otherwise, returning the vacated cell.
    pub fn advance(&mut self, new_head: Cell, grow: bool) -> Option<Cell> {
        self.body.push_front(new_head);
        if grow {
            None
        } else {
            self.body.pop_back()
        }
    }

    pub fn head_char(heading: Direction) -> char {
        match heading {
            Up => '^',
            Down => 'v',
            Left => '<',
            Right => '>',
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opposites() {
        assert!(Up.is_opposite(Down));
        assert!(Left.is_opposite(Right));
        assert!(!Up.is_opposite(Left));
        assert!(!Right.is_opposite(Right));
    }

    #[test]
    fn shifting_can_leave_the_grid() {
        assert_eq!(Cell::new(0, 3).shifted(Up), Cell::new(-1, 3));
        assert_eq!(Cell::new(2, 0).shifted(Left), Cell::new(2, -1));
        assert_eq!(Cell::new(2, 2).shifted(Down), Cell::new(3, 2));
    }

    #[test]
    fn straight_worm_trails_behind_head() {
        let worm = Worm::straight(Cell::new(5, 5), 3, Right);
        let cells: Vec<_> = worm.cells().collect();
        assert_eq!(cells, vec![Cell::new(5, 5), Cell::new(5, 4), Cell::new(5, 3)]);
    }

    #[test]
    fn tail_does_not_block_unless_growing() {
        // Square loop: head at (0,0), tail at (1,0) right below it.
        let worm = Worm::from_cells([
            Cell::new(0, 0),
            Cell::new(0, 1),
            Cell::new(1, 1),
            Cell::new(1, 0),
        ]);
        assert!(!worm.blocks(Cell::new(1, 0), false));
        assert!(worm.blocks(Cell::new(1, 0), true));
        assert!(worm.blocks(Cell::new(1, 1), false));
    }

    #[test]
    fn advance_moves_or_grows() {
        let mut worm = Worm::straight(Cell::new(1, 2), 2, Right);
        assert_eq!(worm.advance(Cell::new(1, 3), false), Some(Cell::new(1, 1)));
        assert_eq!(worm.len(), 2);
        assert_eq!(worm.advance(Cell::new(1, 4), true), None);
        assert_eq!(worm.len(), 3);
        assert_eq!(worm.head(), Cell::new(1, 4));
        assert!(!worm.is_empty());
    }
}
