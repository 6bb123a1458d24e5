#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs Slide Game in a terminal.

mod input;

use std::io::{self, BufRead, Write};

use anyhow::{Context, Result};
use clap::Parser;
use input::Action;
use slide_game_core::{DimensionError, GridDimensions};
use slide_game_engine::{Config, Engine};
use slide_game_system_bootstrap::Bootstrap;
use tracing::info;
use tracing_subscriber::EnvFilter;

const PROMPT: &str = "> ";
const RESTART_PROMPT: &str = "Play again? [y/N] ";

#[derive(Debug, Parser)]
#[command(name = "slide-game", about = "Slide and merge numbered tiles in the terminal")]
struct CliArgs {
    /// Number of rows on the board (2-100).
    #[arg(value_name = "ROWS")]
    rows: Option<u32>,
    /// Number of columns on the board (2-100).
    #[arg(value_name = "COLUMNS", requires = "rows")]
    columns: Option<u32>,
    /// Number of rows on the board, as an alternative to the positional form.
    #[arg(long = "rows", value_name = "N", conflicts_with = "rows")]
    rows_flag: Option<u32>,
    /// Number of columns on the board, as an alternative to the positional form.
    #[arg(long = "columns", value_name = "N", conflicts_with = "columns")]
    columns_flag: Option<u32>,
    /// Seed for tile placement; a random seed is drawn when omitted.
    #[arg(long)]
    seed: Option<u64>,
    /// Skip printing the instructions on startup.
    #[arg(long)]
    no_instructions: bool,
}

impl CliArgs {
    /// Board size requested on the command line, if any extent was given.
    fn dimensions(&self) -> Option<Result<GridDimensions, DimensionError>> {
        let rows = self.rows.or(self.rows_flag);
        let columns = self.columns.or(self.columns_flag);
        if rows.is_none() && columns.is_none() {
            return None;
        }
        let default = GridDimensions::DEFAULT;
        Some(GridDimensions::new(
            rows.unwrap_or(default.rows()),
            columns.unwrap_or(default.columns()),
        ))
    }
}

/// Entry point for the Slide Game command-line interface.
fn main() -> Result<()> {
    init_tracing();

    let args = CliArgs::parse();
    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut input = stdin.lock();
    let mut output = stdout.lock();

    let dimensions = resolve_dimensions(args.dimensions(), &mut input, &mut output)?;
    let seed = args.seed.unwrap_or_else(rand::random);
    info!(%dimensions, seed, "starting session");

    let mut engine = Engine::new(Config::new(dimensions, seed));
    run(&mut engine, &Bootstrap, input, output, !args.no_instructions)
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn run(
    engine: &mut Engine,
    bootstrap: &Bootstrap,
    input: impl BufRead,
    mut output: impl Write,
    show_instructions: bool,
) -> Result<()> {
    writeln!(output, "{}", bootstrap.welcome_banner(engine.world()))?;
    if show_instructions {
        writeln!(output, "\n{}\n", bootstrap.instructions())?;
    }
    write!(output, "{}", engine.dump())?;

    let mut lines = input.lines();
    loop {
        if engine.is_terminal() {
            writeln!(output, "Game over! No more moves are possible.")?;
            prompt(&mut output, RESTART_PROMPT)?;
            let Some(answer) = lines.next() else {
                return Ok(());
            };
            let answer = answer.context("failed to read answer")?;
            if !matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes") {
                return Ok(());
            }
            start_new_game(engine, &mut output)?;
            continue;
        }

        prompt(&mut output, PROMPT)?;
        let Some(line) = lines.next() else {
            return Ok(());
        };
        let line = line.context("failed to read command")?;

        let mut redraw = false;
        for action in input::parse_line(&line) {
            match action {
                Action::Move(direction) => {
                    if engine.is_terminal() {
                        break;
                    }
                    let outcome = engine.apply_move(direction);
                    if !outcome.changed {
                        writeln!(output, "Nothing moved.")?;
                    }
                    redraw = true;
                }
                Action::NewGame => {
                    start_new_game(engine, &mut output)?;
                    redraw = false;
                }
                Action::Help => writeln!(output, "{}", bootstrap.instructions())?,
                Action::Quit => return Ok(()),
                Action::Unknown(token) => {
                    writeln!(output, "Unknown command '{token}'. Type h for help.")?;
                }
            }
        }

        if redraw {
            write!(output, "{}", engine.dump())?;
        }
    }
}

fn start_new_game(engine: &mut Engine, output: &mut impl Write) -> Result<()> {
    let snapshot = engine.reset(engine.dimensions());
    writeln!(output, "New game.")?;
    write!(output, "{snapshot}")?;
    Ok(())
}

/// Settles the board size, asking on `input` when the arguments gave none or a bad one.
fn resolve_dimensions(
    requested: Option<Result<GridDimensions, DimensionError>>,
    input: &mut impl BufRead,
    output: &mut impl Write,
) -> Result<GridDimensions> {
    match requested {
        Some(Ok(dimensions)) => return Ok(dimensions),
        Some(Err(error)) => writeln!(output, "{error}")?,
        None => {}
    }

    let default = GridDimensions::DEFAULT;
    let rows = ask_extent(input, output, "Number of rows", default.rows(), |rows| {
        GridDimensions::new(rows, default.columns())
    })?;
    let columns = ask_extent(input, output, "Number of columns", default.columns(), |columns| {
        GridDimensions::new(rows, columns)
    })?;
    GridDimensions::new(rows, columns).context("invalid board size")
}

/// Asks until the answer passes `validate`. A blank line or end of input keeps `default`.
fn ask_extent(
    input: &mut impl BufRead,
    output: &mut impl Write,
    label: &str,
    default: u32,
    validate: impl Fn(u32) -> Result<GridDimensions, DimensionError>,
) -> Result<u32> {
    let range = GridDimensions::MIN_EXTENT..=GridDimensions::MAX_EXTENT;
    loop {
        let question = format!("{label} ({}-{}) [{default}]: ", range.start(), range.end());
        prompt(output, &question)?;
        let mut answer = String::new();
        if input
            .read_line(&mut answer)
            .context("failed to read board size")?
            == 0
        {
            return Ok(default);
        }

        let answer = answer.trim();
        if answer.is_empty() {
            return Ok(default);
        }
        match answer.parse::<u32>() {
            Ok(value) => match validate(value) {
                Ok(_) => return Ok(value),
                Err(error) => writeln!(output, "Invalid input: {error}.")?,
            },
            Err(_) => writeln!(output, "Invalid input: '{answer}' is not a whole number.")?,
        }
    }
}

fn prompt(output: &mut impl Write, text: &str) -> Result<()> {
    write!(output, "{text}")?;
    output.flush().context("failed to flush prompt")
}
