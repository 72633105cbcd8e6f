use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use log::trace;

use crate::error::Result;
use crate::worm::Direction::{self, *};

/// What the player asked for since the previous poll.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Input {
    Idle,
    Turn(Direction),
    Quit,
}

/// Source of player input. The main loop only ever polls it, so its pacing
/// does not depend on how the keyboard is read.
pub trait InputSource {
    /// Consumes pending key presses without blocking. A quit request wins over
    /// directions, otherwise the latest direction that does not reverse
    /// `heading` is reported.
    fn poll(&mut self, heading: Direction) -> Result<Input>;

    /// Blocks until a key is pressed and reports what it maps to.
    fn wait_for_key(&mut self) -> Result<Input>;
}

/// Maps a key press to an input. `None` for keys the game ignores.
pub fn map_key(ev: &KeyEvent) -> Option<Input> {
    if ev.kind != KeyEventKind::Press {
        return None;
    }

    match ev.code {
        KeyCode::Up => Some(Input::Turn(Up)),
        KeyCode::Down => Some(Input::Turn(Down)),
        KeyCode::Left => Some(Input::Turn(Left)),
        KeyCode::Right => Some(Input::Turn(Right)),
        KeyCode::Char('q') | KeyCode::Char('Q') => Some(Input::Quit),
        KeyCode::Char('c') if ev.modifiers.contains(KeyModifiers::CONTROL) => Some(Input::Quit),
        _ => None,
    }
}

/// Folds a batch of key events into a single input. Turns back onto the
/// worm's own neck are dropped so they cannot mask an earlier valid turn.
pub fn collapse<'a>(events: impl IntoIterator<Item = &'a KeyEvent>, heading: Direction) -> Input {
    let mut input = Input::Idle;
    for ev in events {
        match map_key(ev) {
            Some(Input::Quit) => return Input::Quit,
            Some(Input::Turn(direction)) if direction.is_opposite(heading) => {
                trace!("ignoring reversal to {:?}", direction)
            }
            Some(turn) => input = turn,
            None => trace!("ignoring key {:?}", ev.code),
        }
    }
    input
}

/// Keyboard input from the controlling terminal. Expects raw mode to be on.
#[derive(Default)]
pub struct TerminalInput;

impl TerminalInput {
    pub fn new() -> Self {
        TerminalInput
    }

    fn read_key_events_queue(&self) -> Result<Vec<KeyEvent>> {
        let mut events = vec![];

        while event::poll(Duration::ZERO)? {
            if let Event::Key(ev) = event::read()? {
                events.push(ev);
            }
        }

        Ok(events)
    }
}

impl InputSource for TerminalInput {
    fn poll(&mut self, heading: Direction) -> Result<Input> {
        let events = self.read_key_events_queue()?;
        Ok(collapse(&events, heading))
    }

    fn wait_for_key(&mut self) -> Result<Input> {
        loop {
            if let Event::Key(ev) = event::read()? {
                if ev.kind == KeyEventKind::Press {
                    return Ok(map_key(&ev).unwrap_or(Input::Idle));
                }
            }
        }
    }
}
