//! Tree Life entry point
//!
//! Builds the initial board, then runs either the interactive terminal
//! session or a fixed number of headless generations.

use std::path::PathBuf;

use anyhow::{Context, Result, anyhow, bail};
use clap::{Parser, ValueEnum};

use tree_life::persistence;
use tree_life::settings::Settings;
use tree_life::sim::{CellTree, Seed, Simulation, Stats};
use tree_life::terminal::{self, Mode};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum StartMode {
    /// Start with generations advancing
    Run,
    /// Start paused with the edit cursor active
    Edit,
}

#[derive(Parser, Debug)]
#[command(
    name = "tree-life",
    version,
    about = "Conway's Game of Life on a wrap-around grid"
)]
struct Cli {
    #[arg(value_enum, default_value_t = StartMode::Run)]
    mode: StartMode,

    /// JSON settings file
    #[arg(long, env = "TREE_LIFE_SETTINGS")]
    settings: Option<PathBuf>,

    /// Load the board from a saved cell file instead of seeding it
    #[arg(long)]
    load: Option<PathBuf>,

    /// Write the board to this file on exit
    #[arg(long)]
    save: Option<PathBuf>,

    /// Seed pattern: gun, empty, soup, block, blinker, glider, glider-gun, spawner
    #[arg(long)]
    pattern: Option<String>,

    /// RNG seed for the soup pattern
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Run this many generations without a terminal and print the result as JSON
    #[arg(long)]
    generations: Option<u64>,
}

fn initial_board(cli: &Cli, settings: &Settings) -> Result<CellTree> {
    if let Some(path) = &cli.load {
        return persistence::load_file(path).context("failed to load board");
    }

    let seed = match &cli.pattern {
        Some(name) => Seed::from_name(name, cli.seed)
            .ok_or_else(|| anyhow!("unknown pattern '{}'", name))?,
        None => settings.seed.clone(),
    };
    let mut cells = CellTree::new();
    seed.apply(&mut cells).context("failed to seed board")?;
    Ok(cells)
}

fn print_stats(stats: &Stats) {
    println!("Generations progressed: {}", stats.generations);
    println!("Living cells remaining: {}", stats.live);
    println!("Total cells born: {}", stats.total_born);
    println!("Total cells died: {}", stats.total_died);
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let settings = Settings::load_or_default(cli.settings.as_deref());

    let mut sim = Simulation::from_cells(initial_board(&cli, &settings)?);
    log::info!("starting with {} live cells", sim.cells().len());

    if let Some(generations) = cli.generations {
        let report = sim.run(generations).context("simulation failed")?;
        println!("{}", serde_json::to_string(&report)?);
        if let Some(path) = &cli.save {
            persistence::save_file(path, sim.cells())?;
        }
        return Ok(());
    }

    let mode = match cli.mode {
        StartMode::Run => Mode::Run,
        StartMode::Edit => Mode::Edit,
    };
    let shared = sim.into_shared();
    let stats = terminal::run(shared.clone(), settings, mode)?;
    print_stats(&stats);

    if let Some(path) = &cli.save {
        let sim = match shared.read() {
            Ok(sim) => sim,
            Err(_) => bail!("simulation lock poisoned"),
        };
        persistence::save_file(path, sim.cells())?;
    }
    Ok(())
}
