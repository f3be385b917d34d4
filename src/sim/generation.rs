//! Generation engine
//!
//! One step classifies every live cell and every dead neighbour against the
//! pre-step board, then applies all deaths and births in one batch. Nothing
//! is mutated while a traversal of the live set is in flight.

use std::sync::{Arc, RwLock};

use serde::{Deserialize, Serialize};

use super::neighbors::{StepDecisions, check_candidate, check_neighbors};
use super::tree::CellTree;
use crate::error::Result;

/// Phase of the step state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Phase {
    #[default]
    Idle,
    /// Walking the live set: deaths and the explore set
    ScanningLive,
    /// Walking the explore set: births
    ScanningCandidates,
    /// Applying deaths, then births
    Committing,
}

impl Phase {
    /// Successor in the `Idle -> ... -> Committing -> Idle` cycle
    pub fn next(self) -> Phase {
        match self {
            Phase::Idle => Phase::ScanningLive,
            Phase::ScanningLive => Phase::ScanningCandidates,
            Phase::ScanningCandidates => Phase::Committing,
            Phase::Committing => Phase::Idle,
        }
    }
}

/// Outcome of a single generation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StepReport {
    /// Generation number after this step
    pub generation: u64,
    pub born: usize,
    pub died: usize,
    /// Live cells after this step
    pub live: usize,
}

/// Running totals over the life of a simulation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Stats {
    pub generations: u64,
    pub live: usize,
    pub total_born: u64,
    pub total_died: u64,
}

/// Board plus step bookkeeping
#[derive(Debug, Clone, Default)]
pub struct Simulation {
    cells: CellTree,
    phase: Phase,
    generation: u64,
    total_born: u64,
    total_died: u64,
}

/// Simulation shared between the stepper and the render/input loop.
///
/// The stepper holds the write guard for a whole [`Simulation::step`], so a
/// reader never observes a half-committed board.
pub type SharedSimulation = Arc<RwLock<Simulation>>;

impl Simulation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_cells(cells: CellTree) -> Self {
        Self {
            cells,
            ..Self::default()
        }
    }

    pub fn into_shared(self) -> SharedSimulation {
        Arc::new(RwLock::new(self))
    }

    pub fn cells(&self) -> &CellTree {
        &self.cells
    }

    /// Mutable board access for the editor and seeding; not for use mid-step
    pub fn cells_mut(&mut self) -> &mut CellTree {
        &mut self.cells
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn stats(&self) -> Stats {
        Stats {
            generations: self.generation,
            live: self.cells.len(),
            total_born: self.total_born,
            total_died: self.total_died,
        }
    }

    fn enter(&mut self, phase: Phase) {
        debug_assert_eq!(self.phase.next(), phase);
        log::trace!("generation {}: {:?} -> {:?}", self.generation, self.phase, phase);
        self.phase = phase;
    }

    /// Advance one generation.
    ///
    /// An error here is fatal: the board may be partly committed.
    pub fn step(&mut self) -> Result<StepReport> {
        self.enter(Phase::ScanningLive);
        let mut decisions = StepDecisions::default();
        let mut explore = CellTree::new();
        for coord in self.cells.iter() {
            check_neighbors(&self.cells, &mut explore, coord, &mut decisions)?;
        }

        self.enter(Phase::ScanningCandidates);
        for coord in explore.iter() {
            check_candidate(&self.cells, coord, &mut decisions);
        }
        drop(explore);

        self.enter(Phase::Committing);
        self.commit(&decisions)?;
        self.enter(Phase::Idle);

        self.generation += 1;
        self.total_born += decisions.births.len() as u64;
        self.total_died += decisions.deaths.len() as u64;

        let report = StepReport {
            generation: self.generation,
            born: decisions.births.len(),
            died: decisions.deaths.len(),
            live: self.cells.len(),
        };
        log::debug!(
            "generation {}: {} born, {} died, {} live",
            report.generation,
            report.born,
            report.died,
            report.live
        );
        Ok(report)
    }

    /// Deaths are removed by coordinate, never by a node captured earlier:
    /// successor-copy removal moves payloads between nodes.
    fn commit(&mut self, decisions: &StepDecisions) -> Result<()> {
        for &coord in &decisions.deaths {
            self.cells.remove(coord)?;
        }
        for &coord in &decisions.births {
            self.cells.insert(coord)?;
        }
        Ok(())
    }

    /// Step `generations` times, returning the last report
    pub fn run(&mut self, generations: u64) -> Result<StepReport> {
        let mut report = StepReport {
            generation: self.generation,
            live: self.cells.len(),
            ..StepReport::default()
        };
        for _ in 0..generations {
            report = self.step()?;
        }
        Ok(report)
    }
}
