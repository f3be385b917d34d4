//! Grid coordinates and the linearized tree key
//!
//! The grid is the full plane of `Component` values and wraps at the edges,
//! so every coordinate has exactly eight neighbours.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Signed type of one coordinate component
pub type Component = i8;

/// Unsigned tree key, twice the width of a component
pub type Key = u16;

/// Width of one component in bits
const COMPONENT_BITS: u32 = Component::BITS;

/// Moore neighbourhood offsets, in evaluation order
pub const NEIGHBOR_OFFSETS: [(Component, Component); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

/// Map `(x, y)` to its row-major tree key.
///
/// Components are reinterpreted as unsigned before widening so that a
/// negative `x` can never spill into the `y` half of the key.
#[inline]
pub fn linearize(x: Component, y: Component) -> Key {
    ((y as u8 as Key) << COMPONENT_BITS) | (x as u8 as Key)
}

/// A cell position on the grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Coord {
    pub x: Component,
    pub y: Component,
}

impl Coord {
    pub const ORIGIN: Coord = Coord { x: 0, y: 0 };

    pub const fn new(x: Component, y: Component) -> Self {
        Self { x, y }
    }

    /// Tree key for this coordinate
    #[inline]
    pub fn key(self) -> Key {
        linearize(self.x, self.y)
    }

    /// Inverse of [`Coord::key`]
    pub fn from_key(key: Key) -> Self {
        Self {
            x: (key & 0xff) as u8 as Component,
            y: (key >> COMPONENT_BITS) as u8 as Component,
        }
    }

    /// Offset with toroidal wrap-around at the component range
    #[inline]
    pub fn offset(self, dx: Component, dy: Component) -> Self {
        Self {
            x: self.x.wrapping_add(dx),
            y: self.y.wrapping_add(dy),
        }
    }

    /// The eight Moore neighbours in [`NEIGHBOR_OFFSETS`] order
    pub fn neighbors(self) -> impl Iterator<Item = Coord> {
        NEIGHBOR_OFFSETS
            .iter()
            .map(move |&(dx, dy)| self.offset(dx, dy))
    }
}

impl From<(Component, Component)> for Coord {
    fn from((x, y): (Component, Component)) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_is_row_major() {
        assert!(linearize(5, 0) < linearize(0, 1));
        assert!(linearize(0, 1) < linearize(1, 1));
        assert_eq!(linearize(0, 0), 0);
        assert_eq!(linearize(1, 0), 1);
        assert_eq!(linearize(0, 1), 256);
    }

    #[test]
    fn test_negative_components_do_not_collide() {
        // A widening multiply by u32::MAX style would map these to the same key.
        assert_ne!(linearize(-1, 0), linearize(0, 1));
        assert_eq!(linearize(-1, 0), 0x00ff);
        assert_eq!(linearize(0, -1), 0xff00);
    }

    #[test]
    fn test_linearize_is_injective() {
        let mut seen = std::collections::HashSet::new();
        for y in Component::MIN..=Component::MAX {
            for x in Component::MIN..=Component::MAX {
                assert!(seen.insert(linearize(x, y)), "collision at ({x}, {y})");
            }
        }
        assert_eq!(seen.len(), 1 << 16);
    }

    #[test]
    fn test_from_key_inverts_key() {
        for c in [Coord::new(-128, 127), Coord::new(3, -7), Coord::ORIGIN] {
            assert_eq!(Coord::from_key(c.key()), c);
        }
    }

    #[test]
    fn test_offsets_wrap_at_edges() {
        let edge = Coord::new(127, -128);
        assert_eq!(edge.offset(1, 0), Coord::new(-128, -128));
        assert_eq!(edge.offset(0, -1), Coord::new(127, 127));
    }

    #[test]
    fn test_neighbors_order() {
        let n: Vec<_> = Coord::new(10, 20).neighbors().collect();
        assert_eq!(n.len(), 8);
        assert_eq!(n[0], Coord::new(9, 19));
        assert_eq!(n[3], Coord::new(9, 20));
        assert_eq!(n[7], Coord::new(11, 21));
        assert!(!n.contains(&Coord::new(10, 20)));
    }
}
