use std::path::PathBuf;

use clap::Parser;
use log::{warn, LevelFilter};

use crate::error::{GameError, Result};
use crate::level::{DEFAULT_SPEED, SPEED_MAX, SPEED_MIN};
use crate::state::{Grid, INITIAL_WORM_LENGTH};

const MAX_DEFAULT_ROWS: u16 = 32;
const MAX_DEFAULT_COLS: u16 = 48;
const MIN_ROWS: u16 = 3;
const MAX_ROWS: u16 = 128;
const MAX_COLS: u16 = 256;
// Room for the starting worm plus a free cell on either side.
const MIN_COLS: u16 = INITIAL_WORM_LENGTH as u16 + 2;
// HUD line above the board and the two border lines.
const CHROME_ROWS: u16 = 3;
const CHROME_COLS: u16 = 2;

#[derive(Parser, Debug)]
#[command(name = "worm", version, about = "Steer a worm around the terminal and eat everything in sight")]
pub struct Cli {
    /// Grid rows (3 to 128). Defaults to whatever fits the terminal, at most 32
    #[arg(long)]
    pub rows: Option<u16>,

    /// Grid columns (7 to 256). Defaults to whatever fits the terminal, at most 48
    #[arg(long)]
    pub cols: Option<u16>,

    /// Starting speed in moves per second; every level adds 5
    #[arg(
        long,
        short,
        default_value_t = DEFAULT_SPEED,
        value_parser = clap::value_parser!(u32).range(SPEED_MIN as i64..=SPEED_MAX as i64)
    )]
    pub speed: u32,

    /// Seed for food placement, random when omitted
    #[arg(long)]
    pub seed: Option<u64>,

    /// Write logs to this file. Logging is off otherwise, since the game owns the screen
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Log filter level: off, error, warn, info, debug or trace
    #[arg(long, short, default_value = "info")]
    pub log_level: LevelFilter,
}

/// Validated settings for one run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GameConfig {
    pub grid: Grid,
    pub speed: u32,
    pub seed: u64,
}

impl GameConfig {
    /// Resolves CLI options against the terminal size, given as
    /// (columns, rows).
    pub fn resolve(cli: &Cli, terminal: (u16, u16), seed: u64) -> Result<Self> {
        let (term_cols, term_rows) = terminal;

        let rows = match cli.rows {
            Some(rows) => rows,
            None => fit(term_rows, CHROME_ROWS, MAX_DEFAULT_ROWS, MIN_ROWS, "rows")?,
        };
        let cols = match cli.cols {
            Some(cols) => cols,
            None => fit(term_cols, CHROME_COLS, MAX_DEFAULT_COLS, MIN_COLS, "columns")?,
        };

        if rows.saturating_add(CHROME_ROWS) > term_rows || cols.saturating_add(CHROME_COLS) > term_cols {
            warn!(
                "{}x{} grid does not fit a {}x{} terminal, it will be clipped",
                rows, cols, term_rows, term_cols
            );
        }

        GameConfig::new(Grid::new(rows, cols), cli.speed, seed)
    }

    pub fn new(grid: Grid, speed: u32, seed: u64) -> Result<Self> {
        if grid.rows < MIN_ROWS {
            return Err(GameError::InvalidConfig(format!(
                "grid needs at least {} rows, got {}",
                MIN_ROWS, grid.rows
            )));
        }
        if grid.cols < MIN_COLS {
            return Err(GameError::InvalidConfig(format!(
                "grid needs at least {} columns, got {}",
                MIN_COLS, grid.cols
            )));
        }
        if grid.rows > MAX_ROWS || grid.cols > MAX_COLS {
            return Err(GameError::InvalidConfig(format!(
                "grid can be at most {}x{}, got {}x{}",
                MAX_ROWS, MAX_COLS, grid.rows, grid.cols
            )));
        }
        if !(SPEED_MIN..=SPEED_MAX).contains(&speed) {
            return Err(GameError::InvalidConfig(format!(
                "speed must be between {} and {}, got {}",
                SPEED_MIN, SPEED_MAX, speed
            )));
        }

        Ok(GameConfig { grid, speed, seed })
    }
}

fn fit(available: u16, chrome: u16, max: u16, min: u16, what: &str) -> Result<u16> {
    let size = available.saturating_sub(chrome).min(max);
    if size < min {
        return Err(GameError::InvalidConfig(format!(
            "terminal too small: {} {} available, {} needed",
            size, what, min
        )));
    }
    Ok(size)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cli(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("worm").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn defaults() {
        let cli = cli(&[]);
        assert_eq!(cli.speed, DEFAULT_SPEED);
        assert_eq!(cli.rows, None);
        assert_eq!(cli.log_level, LevelFilter::Info);
        assert!(cli.log_file.is_none());
    }

    #[test]
    fn grid_is_derived_from_terminal() {
        let config = GameConfig::resolve(&cli(&[]), (80, 24), 1).unwrap();
        assert_eq!(config.grid, Grid::new(21, 48));

        let config = GameConfig::resolve(&cli(&[]), (30, 12), 1).unwrap();
        assert_eq!(config.grid, Grid::new(9, 28));
    }

    #[test]
    fn explicit_grid_wins() {
        let config = GameConfig::resolve(&cli(&["--rows", "10", "--cols", "12", "-s", "40"]), (80, 24), 9).unwrap();
        assert_eq!(config, GameConfig { grid: Grid::new(10, 12), speed: 40, seed: 9 });
    }

    #[test]
    fn tiny_terminal_is_rejected() {
        let err = GameConfig::resolve(&cli(&[]), (80, 5), 1).unwrap_err();
        assert!(matches!(err, GameError::InvalidConfig(_)));
    }

    #[test]
    fn tiny_grid_is_rejected() {
        assert!(GameConfig::new(Grid::new(2, 20), 20, 0).is_err());
        assert!(GameConfig::new(Grid::new(10, 6), 20, 0).is_err());
        assert!(GameConfig::new(Grid::new(3, 7), 20, 0).is_ok());
    }

    #[test]
    fn huge_grid_is_rejected() {
        let cli = cli(&["--rows", "65535", "--cols", "65535"]);
        let err = GameConfig::resolve(&cli, (80, 24), 1).unwrap_err();
        assert!(matches!(err, GameError::InvalidConfig(_)));

        assert!(GameConfig::new(Grid::new(129, 48), 20, 0).is_err());
        assert!(GameConfig::new(Grid::new(32, 257), 20, 0).is_err());
        assert!(GameConfig::new(Grid::new(128, 256), 20, 0).is_ok());
    }

    #[test]
    fn speed_out_of_range() {
        assert!(Cli::try_parse_from(["worm", "--speed", "0"]).is_err());
        assert!(Cli::try_parse_from(["worm", "--speed", "101"]).is_err());
        assert!(GameConfig::new(Grid::new(10, 10), 0, 0).is_err());
    }

    #[test]
    fn log_level_parses() {
        assert_eq!(cli(&["-l", "debug"]).log_level, LevelFilter::Debug);
        assert!(Cli::try_parse_from(["worm", "--log-level", "loud"]).is_err());
    }
}
