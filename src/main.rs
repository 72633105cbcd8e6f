mod config;
mod error;
mod game;
mod input;
mod level;
mod render;
mod state;
mod term;
mod worm;

use std::fs::OpenOptions;
use std::io::stdout;
use std::process::ExitCode;

use clap::Parser;
use log::{error, info, LevelFilter};
use rand::Rng;

use crate::config::{Cli, GameConfig};
use crate::error::{GameError, Result};
use crate::game::{Game, Summary};
use crate::input::TerminalInput;
use crate::render::Renderer;
use crate::term::TerminalGuard;

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(err) = init_logging(&cli) {
        eprintln!("worm: {}", err);
        return ExitCode::FAILURE;
    }

    match run(&cli) {
        Ok(summary) => {
            println!("{}", summary);
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!("{}", err);
            eprintln!("worm: {}", err);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<Summary> {
    let seed = cli.seed.unwrap_or_else(|| rand::thread_rng().gen());
    let config = GameConfig::resolve(cli, term::size()?, seed)?;
    info!(
        "{}x{} grid, starting speed {}, seed {}",
        config.grid.rows, config.grid.cols, config.speed, config.seed
    );

    term::install_panic_hook();
    // Dropped on every return path below, which puts the terminal back.
    let _guard = TerminalGuard::acquire()?;

    let mut game = Game::new(config, TerminalInput::new(), Renderer::new(stdout()));
    game.run()
}

/// Logs go to a file while the game owns the screen. Without one, logging is off.
fn init_logging(cli: &Cli) -> Result<()> {
    let mut builder = env_logger::Builder::new();

    match &cli.log_file {
        Some(path) => {
            let log_file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .map_err(|source| GameError::LogFile { path: path.clone(), source })?;

            builder
                .filter_level(cli.log_level)
                .target(env_logger::Target::Pipe(Box::new(log_file)));
        }
        None => {
            builder.filter_level(LevelFilter::Off);
        }
    }

    builder.init();
    Ok(())
}
