//! Simulation core
//!
//! Everything here is single-threaded and free of terminal or file I/O:
//! - `coord`: coordinates, wrap-around and the linearized key
//! - `tree`: the live-cell binary search tree
//! - `neighbors`: per-cell rule evaluation
//! - `generation`: the step engine and shared simulation handle
//! - `patterns`: seed patterns

pub mod coord;
pub mod generation;
pub mod neighbors;
pub mod patterns;
pub mod tree;

pub use coord::{Component, Coord, Key, NEIGHBOR_OFFSETS, linearize};
pub use generation::{Phase, SharedSimulation, Simulation, Stats, StepReport};
pub use neighbors::{StepDecisions, check_candidate, check_neighbors, live_neighbors, next_state};
pub use patterns::{Pattern, Seed, Soup};
pub use tree::{CellRef, CellTree, NodeId, TraversalOrder};
