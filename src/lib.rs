//! Tree Life - Conway's Game of Life on a sparse, wrap-around grid
//!
//! Core modules:
//! - `sim`: live-cell tree and generation engine (no I/O)
//! - `renderer`: text rendering of a viewport
//! - `editor`: cell toggling and the edit cursor
//! - `persistence`: byte-stream save/load of the live set
//! - `settings`: JSON configuration
//! - `terminal`: interactive crossterm front end

pub mod editor;
pub mod error;
pub mod persistence;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod terminal;

pub use error::{LifeError, Result};
pub use settings::Settings;
pub use sim::{CellTree, Coord, SharedSimulation, Simulation};
