use std::fmt;
use std::io::Write;
use std::thread::sleep;
use std::time::Instant;

use log::{debug, info};
use rand::{rngs::StdRng, SeedableRng};

use crate::config::GameConfig;
use crate::error::Result;
use crate::input::{Input, InputSource};
use crate::level::Level;
use crate::render::{Frame, Hud, Renderer};
use crate::state::{step, GameState, Status};

const INTRO: &[&str] = &["Arrow keys to move", "q to quit", "", "Press any key to begin"];

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    Quit,
    Collision,
}

/// How a run ended.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Summary {
    pub outcome: Outcome,
    pub level: u32,
    pub score: u32,
    pub length: usize,
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let how = match self.outcome {
            Outcome::Quit => "Quit",
            Outcome::Collision => "Game over",
        };
        write!(f, "{} on level {} with score {} (worm length {})", how, self.level, self.score, self.length)
    }
}

pub struct Game<I: InputSource, W: Write> {
    config: GameConfig,
    input: I,
    renderer: Renderer<W>,
    rng: StdRng,
    level: Level,
    score: u32,
}

impl<I: InputSource, W: Write> Game<I, W> {
    pub fn new(config: GameConfig, input: I, renderer: Renderer<W>) -> Self {
        let rng = StdRng::seed_from_u64(config.seed);
        let level = Level::first(config.speed);
        Game { config, input, renderer, rng, level, score: 0 }
    }

    /// Plays until the worm crashes or the player quits.
    pub fn run(&mut self) -> Result<Summary> {
        let mut state = GameState::new(self.config.grid, &mut self.rng)?;
        info!("starting level {} at speed {}", self.level.number, self.level.speed);

        self.renderer.clear()?;
        if self.prompt(&state, INTRO)? == Input::Quit {
            state.quit();
            return Ok(self.summary(&state));
        }

        let mut next_tick = Instant::now();

        loop {
            let requested = match self.input.poll(state.heading())? {
                Input::Quit => {
                    state.quit();
                    break;
                }
                Input::Turn(direction) => direction,
                Input::Idle => state.heading(),
            };

            let eaten_before = state.eaten();
            state = step(state, requested, &mut self.rng);
            self.score += state.eaten() - eaten_before;

            if state.status() == Status::EndedByCollision {
                let score_line = format!("Score: {}", self.score);
                self.prompt(&state, &["Game over!", score_line.as_str(), "", "Press any key to exit"])?;
                break;
            }

            if level_cleared(&state, &self.level) {
                let cleared = format!("Level {} cleared!", self.level.number);
                let next = self.level.next(self.config.speed);
                let speed_line = format!("Next speed: {}", next.speed);
                if self.prompt(&state, &[cleared.as_str(), speed_line.as_str(), "", "Press any key to continue"])? == Input::Quit {
                    state.quit();
                    break;
                }

                self.level = next;
                state = GameState::new(self.config.grid, &mut self.rng)?;
                info!("starting level {} at speed {}", self.level.number, self.level.speed);
                self.renderer.clear()?;
                next_tick = Instant::now();
            }

            self.draw(&state, None)?;

            next_tick += self.level.tick_interval(state.heading().is_vertical());
            let now = Instant::now();
            if next_tick > now {
                sleep(next_tick - now);
            } else {
                // Running late; don't try to catch up with a burst of moves.
                next_tick = now;
            }
        }

        let summary = self.summary(&state);
        info!("{}", summary);
        Ok(summary)
    }

    /// Shows a message over the board and waits for a key.
    fn prompt(&mut self, state: &GameState, lines: &[&str]) -> Result<Input> {
        self.draw(state, Some(lines))?;
        let input = self.input.wait_for_key()?;
        debug!("prompt answered with {:?}", input);
        Ok(input)
    }

    fn draw(&mut self, state: &GameState, message: Option<&[&str]>) -> Result<()> {
        let hud = Hud { level: self.level, score: self.score, eaten: state.eaten() };
        let mut frame = Frame::compose(state, &hud);
        if let Some(lines) = message {
            frame.overlay_message(lines);
        }
        self.renderer.draw(&frame)
    }

    fn summary(&self, state: &GameState) -> Summary {
        let outcome = match state.status() {
            Status::EndedByCollision => Outcome::Collision,
            Status::EndedByQuit | Status::Running => Outcome::Quit,
        };
        Summary { outcome, level: self.level.number, score: self.score, length: state.worm().len() }
    }
}

/// A level ends once its food target is met, or when the worm fills the board
/// and no food can be placed.
fn level_cleared(state: &GameState, level: &Level) -> bool {
    state.eaten() >= level.target || state.food().is_none()
}
