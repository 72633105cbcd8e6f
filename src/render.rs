use std::io::Write;

use crossterm::{cursor, queue, style, terminal};
use crossterm::terminal::ClearType;

use crate::error::Result;
use crate::level::Level;
use crate::state::{GameState, Status};
use crate::worm::Worm;

const WORM_BODY_CHAR: char = '█';
const FOOD_CHAR: char = 'O';
const DEAD_WORM_CHAR: char = 'X';

// The board starts below the HUD line.
const BOARD_TOP: usize = 1;

/// Numbers shown above the board.
#[derive(Copy, Clone, Debug)]
pub struct Hud {
    pub level: Level,
    pub score: u32,
    pub eaten: u32,
}

impl Hud {
    fn text(&self) -> String {
        format!(
            "Level {}  |  Speed {}  |  Food {}/{}  |  Score {}",
            self.level.number, self.level.speed, self.eaten, self.level.target, self.score
        )
    }
}

/// A fully composed screen: HUD, walls, worm, food and an optional message
/// box on top.
#[derive(Clone, Debug)]
pub struct Frame {
    board_width: usize,
    lines: Vec<Vec<char>>,
}

impl Frame {
    pub fn compose(state: &GameState, hud: &Hud) -> Self {
        let grid = state.grid();
        let (cols, rows) = (grid.cols as usize, grid.rows as usize);
        let hud_text = hud.text();
        let width = (cols + 2).max(hud_text.chars().count());
        let height = BOARD_TOP + rows + 2;

        let mut frame = Frame { board_width: cols + 2, lines: vec![vec![' '; width]; height] };

        for (x, ch) in hud_text.chars().enumerate() {
            frame.put(x, 0, ch);
        }
        frame.draw_borders(cols, rows);

        if let Some(food) = state.food() {
            frame.put_cell(food.row, food.col, FOOD_CHAR);
        }

        let dead = state.status() == Status::EndedByCollision;
        for (i, cell) in state.worm().cells().enumerate() {
            let ch = match (dead, i) {
                (true, _) => DEAD_WORM_CHAR,
                (false, 0) => Worm::head_char(state.heading()),
                (false, _) => WORM_BODY_CHAR,
            };
            frame.put_cell(cell.row, cell.col, ch);
        }

        frame
    }

    /// Draws a box with `lines` centered on the board, replacing whatever was
    /// underneath.
    pub fn overlay_message(&mut self, lines: &[&str]) {
        let msg_height = lines.len() + 2;
        let msg_width = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0) + 2;
        let center = (self.board_width / 2, self.lines.len() / 2);
        let top_left = (center.0.saturating_sub(msg_width / 2), center.1.saturating_sub(msg_height / 2));

        for y in [top_left.1, top_left.1 + msg_height - 1] {
            for x_diff in 0..msg_width {
                self.put(top_left.0 + x_diff, y, ' ');
            }
        }

        for (i, line) in lines.iter().enumerate() {
            let padded_line = format!("{line: ^width$}", line = line, width = msg_width);
            let y = top_left.1 + i + 1;
            for (x_diff, ch) in padded_line.chars().enumerate() {
                self.put(top_left.0 + x_diff, y, ch);
            }
        }
    }

    #[cfg(test)]
    pub fn lines(&self) -> Vec<String> {
        self.lines.iter().map(|line| line.iter().collect()).collect()
    }

    #[cfg(test)]
    pub fn char_at(&self, x: usize, y: usize) -> Option<char> {
        self.lines.get(y).and_then(|line| line.get(x)).copied()
    }

    fn draw_borders(&mut self, cols: usize, rows: usize) {
        let end_x = cols + 1;
        let end_y = BOARD_TOP + rows + 1;

        for x in 0..=end_x {
            let ch = if x == 0 || x == end_x { '+' } else { '-' };
            self.put(x, BOARD_TOP, ch);
            self.put(x, end_y, ch);
        }

        for y in BOARD_TOP + 1..end_y {
            self.put(0, y, '|');
            self.put(end_x, y, '|');
        }
    }

    fn put_cell(&mut self, row: i32, col: i32, ch: char) {
        if row >= 0 && col >= 0 {
            self.put(col as usize + 1, row as usize + BOARD_TOP + 1, ch);
        }
    }

    fn put(&mut self, x: usize, y: usize, ch: char) {
        if let Some(slot) = self.lines.get_mut(y).and_then(|line| line.get_mut(x)) {
            *slot = ch;
        }
    }
}

/// Writes frames to a terminal-like sink, clipped to the visible area.
pub struct Renderer<W: Write> {
    out: W,
    viewport: Option<(u16, u16)>,
}

impl<W: Write> Renderer<W> {
    /// Clips to the live terminal size, re-read on every draw.
    pub fn new(out: W) -> Self {
        Renderer { out, viewport: None }
    }

    /// Clips to a fixed (columns, rows) area.
    #[cfg(test)]
    pub fn with_viewport(out: W, viewport: (u16, u16)) -> Self {
        Renderer { out, viewport: Some(viewport) }
    }

    pub fn clear(&mut self) -> Result<()> {
        queue!(self.out, terminal::Clear(ClearType::All))?;
        self.out.flush()?;
        Ok(())
    }

    pub fn draw(&mut self, frame: &Frame) -> Result<()> {
        let (cols, rows) = self.viewport();

        for (y, line) in frame.lines.iter().enumerate().take(rows as usize) {
            let text: String = line.iter().take(cols as usize).collect();
            queue!(
                self.out,
                cursor::MoveTo(0, y as u16),
                style::Print(text),
                terminal::Clear(ClearType::UntilNewLine)
            )?;
        }

        self.out.flush()?;
        Ok(())
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.out
    }

    fn viewport(&self) -> (u16, u16) {
        // A failed size query only means we cannot clip; drawing goes on.
        self.viewport
            .or_else(|| terminal::size().ok())
            .unwrap_or((u16::MAX, u16::MAX))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::Grid;
    use crate::worm::{Cell, Direction::*};
    use rand::{rngs::StdRng, SeedableRng};

    fn hud() -> Hud {
        Hud { level: Level::first(20), score: 3, eaten: 1 }
    }

    fn sample_state() -> GameState {
        GameState::with_layout(
            Grid::new(3, 4),
            vec![Cell::new(1, 2), Cell::new(1, 1)],
            Right,
            Some(Cell::new(0, 3)),
        )
        .unwrap()
    }

    #[test]
    fn composes_board() {
        let frame = Frame::compose(&sample_state(), &hud());
        let lines = frame.lines();

        assert_eq!(lines.len(), 6);
        assert!(lines[0].starts_with("Level 1  |  Speed 20  |  Food 1/6  |  Score 3"));
        assert!(lines[1].starts_with("+----+"));
        assert!(lines[2].starts_with("|   O|"));
        assert!(lines[3].starts_with("| █> |"));
        assert!(lines[4].starts_with("|    |"));
        assert!(lines[5].starts_with("+----+"));
    }

    #[test]
    fn dead_worm_is_crossed_out() {
        let state = GameState::with_layout(Grid::new(2, 2), vec![Cell::new(0, 1), Cell::new(0, 0)], Right, None)
            .unwrap();
        let state = crate::state::step(state, Right, &mut StdRng::seed_from_u64(1));
        assert_eq!(state.status(), Status::EndedByCollision);

        let frame = Frame::compose(&state, &hud());
        assert_eq!(frame.char_at(1, 2), Some('X'));
        assert_eq!(frame.char_at(2, 2), Some('X'));
    }

    #[test]
    fn message_is_centered() {
        let state = GameState::new(Grid::new(10, 30), &mut StdRng::seed_from_u64(3)).unwrap();
        let mut frame = Frame::compose(&state, &hud());
        frame.overlay_message(&["Game over!", "Score: 3"]);

        let lines = frame.lines();
        let row = lines.iter().position(|l| l.contains("Game over!")).unwrap();
        assert!(lines[row + 1].contains("Score: 3"));
        assert!(row > 2 && row < lines.len() - 2);
    }

    #[test]
    fn oversized_message_is_clipped() {
        let mut frame = Frame::compose(&sample_state(), &hud());
        let long = "x".repeat(200);
        frame.overlay_message(&[&long, "a", "b", "c", "d", "e", "f", "g"]);
        assert_eq!(frame.lines().len(), 6);
    }

    #[test]
    fn draw_clips_to_viewport() {
        let frame = Frame::compose(&sample_state(), &hud());
        let mut renderer = Renderer::with_viewport(Vec::new(), (3, 2));
        renderer.draw(&frame).unwrap();

        let output = String::from_utf8(renderer.into_inner()).unwrap();
        assert!(output.contains("Lev"));
        assert!(output.contains("+--"));
        assert!(!output.contains("Level"));
        assert!(!output.contains('O'));
    }

    #[test]
    fn zero_sized_viewport_draws_nothing() {
        let frame = Frame::compose(&sample_state(), &hud());
        let mut renderer = Renderer::with_viewport(Vec::new(), (0, 0));
        renderer.draw(&frame).unwrap();
        assert!(renderer.into_inner().is_empty());
    }
}
