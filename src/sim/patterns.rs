//! Seed patterns
//!
//! Named patterns are stamped onto a board at an origin, skipping cells that
//! are already live. The random soup is reproducible from its seed.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::coord::{Component, Coord};
use super::tree::CellTree;
use crate::error::Result;

/// A fixed arrangement of live cells relative to its origin
#[derive(Debug, Clone, Copy)]
pub struct Pattern {
    pub name: &'static str,
    pub cells: &'static [(Component, Component)],
}

pub const BLOCK: Pattern = Pattern {
    name: "block",
    cells: &[(0, 0), (1, 0), (0, 1), (1, 1)],
};

pub const BLINKER: Pattern = Pattern {
    name: "blinker",
    cells: &[(0, 0), (1, 0), (2, 0)],
};

pub const GLIDER: Pattern = Pattern {
    name: "glider",
    cells: &[(1, 0), (2, 1), (0, 2), (1, 2), (2, 2)],
};

/// Gosper glider gun
pub const GLIDER_GUN: Pattern = Pattern {
    name: "glider-gun",
    cells: &[
        (5, 9), (5, 10), (6, 9), (6, 10),
        (15, 9), (15, 10), (15, 11), (16, 8), (16, 12), (17, 7), (17, 13),
        (18, 7), (18, 13), (19, 10), (20, 8), (20, 12), (21, 9), (21, 10),
        (21, 11), (22, 10),
        (25, 7), (25, 8), (25, 9), (26, 7), (26, 8), (26, 9), (27, 6),
        (27, 10), (29, 5), (29, 6), (29, 10), (29, 11),
        (39, 7), (39, 8), (40, 7), (40, 8),
    ],
};

/// Thirteen-cell seed that spreads across the board
pub const SPAWNER: Pattern = Pattern {
    name: "spawner",
    cells: &[
        (70, 25), (70, 26), (70, 29), (71, 25), (71, 28), (72, 25), (72, 28),
        (72, 29), (73, 27), (74, 25), (74, 27), (74, 28), (74, 29),
    ],
};

pub const ALL: [Pattern; 5] = [BLOCK, BLINKER, GLIDER, GLIDER_GUN, SPAWNER];

impl Pattern {
    pub fn by_name(name: &str) -> Option<Pattern> {
        ALL.into_iter().find(|p| p.name.eq_ignore_ascii_case(name))
    }

    pub fn coords(&self, origin: Coord) -> impl Iterator<Item = Coord> + '_ {
        self.cells.iter().map(move |&(dx, dy)| origin.offset(dx, dy))
    }

    /// Add this pattern at `origin`; returns how many cells were newly set
    pub fn stamp(&self, cells: &mut CellTree, origin: Coord) -> Result<usize> {
        stamp_coords(cells, self.coords(origin))
    }
}

fn stamp_coords(cells: &mut CellTree, coords: impl Iterator<Item = Coord>) -> Result<usize> {
    let mut added = 0;
    for coord in coords {
        if cells.search(coord).is_none() {
            cells.insert(coord)?;
            added += 1;
        }
    }
    Ok(added)
}

/// Randomly filled rectangle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Soup {
    pub seed: u64,
    pub width: u8,
    pub height: u8,
    /// Probability that a cell starts live
    pub density: f64,
}

impl Default for Soup {
    fn default() -> Self {
        Self {
            seed: 0,
            width: 64,
            height: 32,
            density: 0.3,
        }
    }
}

impl Soup {
    pub fn stamp(&self, cells: &mut CellTree, origin: Coord) -> Result<usize> {
        let mut rng = Pcg32::seed_from_u64(self.seed);
        let density = self.density.clamp(0.0, 1.0);
        let mut picked = Vec::new();
        for dy in 0..self.height {
            for dx in 0..self.width {
                if rng.random_bool(density) {
                    picked.push(origin.offset(dx as Component, dy as Component));
                }
            }
        }
        stamp_coords(cells, picked.into_iter())
    }
}

/// What to put on the board at start-up
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum Seed {
    Empty,
    /// Glider gun and spawner together
    #[default]
    Gun,
    Named { name: String, origin: Coord },
    Soup(Soup),
}

impl Seed {
    /// Parse a command-line pattern name
    pub fn from_name(name: &str, seed: u64) -> Option<Seed> {
        match name.to_ascii_lowercase().as_str() {
            "empty" | "none" => Some(Seed::Empty),
            "gun" => Some(Seed::Gun),
            "soup" | "random" => Some(Seed::Soup(Soup {
                seed,
                ..Soup::default()
            })),
            other => Pattern::by_name(other).map(|p| Seed::Named {
                name: p.name.to_string(),
                origin: Coord::new(10, 10),
            }),
        }
    }

    /// Populate `cells`; returns how many cells were added
    pub fn apply(&self, cells: &mut CellTree) -> Result<usize> {
        let added = match self {
            Seed::Empty => 0,
            Seed::Gun => {
                GLIDER_GUN.stamp(cells, Coord::ORIGIN)? + SPAWNER.stamp(cells, Coord::ORIGIN)?
            }
            Seed::Named { name, origin } => match Pattern::by_name(name) {
                Some(p) => p.stamp(cells, *origin)?,
                None => {
                    log::warn!("unknown pattern '{}', leaving board empty", name);
                    0
                }
            },
            Seed::Soup(soup) => soup.stamp(cells, Coord::ORIGIN)?,
        };
        log::info!("seeded {} cells", added);
        Ok(added)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gun_seed_has_no_overlaps() {
        let mut cells = CellTree::new();
        let added = Seed::Gun.apply(&mut cells).unwrap();
        assert_eq!(added, GLIDER_GUN.cells.len() + SPAWNER.cells.len());
        assert_eq!(cells.len(), added);
    }

    #[test]
    fn test_stamp_skips_live_cells() {
        let mut cells = CellTree::new();
        assert_eq!(BLOCK.stamp(&mut cells, Coord::ORIGIN).unwrap(), 4);
        assert_eq!(BLOCK.stamp(&mut cells, Coord::new(1, 0)).unwrap(), 2);
        assert_eq!(cells.len(), 6);
    }

    #[test]
    fn test_stamp_wraps() {
        let mut cells = CellTree::new();
        BLINKER.stamp(&mut cells, Coord::new(127, 0)).unwrap();
        assert!(cells.contains(Coord::new(-128, 0)));
        assert!(cells.contains(Coord::new(-127, 0)));
    }

    #[test]
    fn test_soup_is_reproducible() {
        let soup = Soup {
            seed: 42,
            ..Soup::default()
        };
        let mut a = CellTree::new();
        let mut b = CellTree::new();
        soup.stamp(&mut a, Coord::ORIGIN).unwrap();
        soup.stamp(&mut b, Coord::ORIGIN).unwrap();
        assert!(!a.is_empty());
        assert!(a.iter().eq(b.iter()));

        let mut c = CellTree::new();
        Soup { seed: 43, ..soup }.stamp(&mut c, Coord::ORIGIN).unwrap();
        assert!(!a.iter().eq(c.iter()));
    }

    #[test]
    fn test_seed_from_name() {
        assert_eq!(Seed::from_name("GUN", 0), Some(Seed::Gun));
        assert!(matches!(Seed::from_name("glider", 0), Some(Seed::Named { .. })));
        assert!(matches!(Seed::from_name("soup", 7), Some(Seed::Soup(Soup { seed: 7, .. }))));
        assert_eq!(Seed::from_name("nope", 0), None);
    }

    #[test]
    fn test_seed_serde_shape() {
        let json = serde_json::to_string(&Seed::Gun).unwrap();
        assert_eq!(json, r#"{"kind":"gun"}"#);
        let parsed: Seed =
            serde_json::from_str(r#"{"kind":"named","name":"glider","origin":{"x":1,"y":2}}"#)
                .unwrap();
        assert_eq!(
            parsed,
            Seed::Named {
                name: "glider".into(),
                origin: Coord::new(1, 2)
            }
        );
    }
}
