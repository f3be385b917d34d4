//! Moore-neighbourhood evaluation for a single cell
//!
//! Reads the live set only. Deaths and births are appended to a
//! [`StepDecisions`] and applied later by the generation engine.

use super::coord::Coord;
use super::tree::CellTree;
use crate::error::Result;

/// Deaths and births collected during one generation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StepDecisions {
    pub deaths: Vec<Coord>,
    pub births: Vec<Coord>,
}

impl StepDecisions {
    pub fn is_empty(&self) -> bool {
        self.deaths.is_empty() && self.births.is_empty()
    }
}

/// B3/S23: whether a cell is alive next generation
#[inline]
pub fn next_state(alive: bool, live_neighbors: u8) -> bool {
    matches!((alive, live_neighbors), (true, 2) | (_, 3))
}

/// Count live cells among the eight neighbours of `coord`
pub fn live_neighbors(live: &CellTree, coord: Coord) -> u8 {
    coord.neighbors().filter(|&n| live.contains(n)).count() as u8
}

/// Classify `coord` against the current board.
///
/// A live cell registers each dead neighbour in `explore` (once) and is
/// marked for death when it is under- or over-crowded. A dead cell is marked
/// for birth when it has exactly three live neighbours.
pub fn check_neighbors(
    live: &CellTree,
    explore: &mut CellTree,
    coord: Coord,
    decisions: &mut StepDecisions,
) -> Result<()> {
    if !live.contains(coord) {
        check_candidate(live, coord, decisions);
        return Ok(());
    }

    let mut count = 0u8;
    for neighbor in coord.neighbors() {
        if live.contains(neighbor) {
            count += 1;
        } else if !explore.contains(neighbor) {
            explore.insert(neighbor)?;
        }
    }
    if !next_state(true, count) {
        decisions.deaths.push(coord);
    }
    Ok(())
}

/// Dead-cell branch of [`check_neighbors`]; never touches the explore set
pub fn check_candidate(live: &CellTree, coord: Coord, decisions: &mut StepDecisions) {
    if next_state(false, live_neighbors(live, coord)) {
        decisions.births.push(coord);
    }
}
