//! Cell editor
//!
//! The only mutation path outside the generation engine. Callers hold the
//! simulation's write guard, so an edit never overlaps a step.

use crate::error::Result;
use crate::renderer::Viewport;
use crate::sim::{CellTree, Component, Coord, Simulation};

/// Cursor movement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub fn delta(self) -> (Component, Component) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }
}

/// Flip one cell: insert if dead, remove if live. Returns the new state.
pub fn toggle_cell(cells: &mut CellTree, coord: Coord) -> Result<bool> {
    if cells.search(coord).is_none() {
        cells.insert(coord)?;
        Ok(true)
    } else {
        cells.remove(coord)?;
        Ok(false)
    }
}

/// Editing cursor on the board
#[derive(Debug, Clone, Copy, Default)]
pub struct Editor {
    pub cursor: Coord,
    pub edits: u64,
}

impl Editor {
    pub fn new(cursor: Coord) -> Self {
        Self { cursor, edits: 0 }
    }

    /// Move the cursor and keep it inside `view`
    pub fn move_cursor(&mut self, dir: Direction, view: &mut Viewport) {
        let (dx, dy) = dir.delta();
        self.cursor = self.cursor.offset(dx, dy);
        view.follow(self.cursor);
    }

    pub fn toggle(&mut self, sim: &mut Simulation) -> Result<bool> {
        let alive = toggle_cell(sim.cells_mut(), self.cursor)?;
        self.edits += 1;
        log::debug!(
            "toggled {} -> {}",
            self.cursor,
            if alive { "live" } else { "dead" }
        );
        Ok(alive)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_cell_is_its_own_inverse() {
        let mut cells = CellTree::from_coords([Coord::new(1, 1), Coord::new(2, 2)]).unwrap();
        let before: Vec<_> = cells.iter().collect();
        assert!(toggle_cell(&mut cells, Coord::new(0, 0)).unwrap());
        assert_eq!(cells.len(), 3);
        assert!(!toggle_cell(&mut cells, Coord::new(0, 0)).unwrap());
        assert_eq!(cells.iter().collect::<Vec<_>>(), before);
    }

    #[test]
    fn test_toggle_removes_live_cell() {
        let mut sim = Simulation::from_cells(CellTree::from_coords([Coord::new(3, 4)]).unwrap());
        let mut editor = Editor::new(Coord::new(3, 4));
        assert!(!editor.toggle(&mut sim).unwrap());
        assert!(sim.cells().is_empty());
        assert_eq!(editor.edits, 1);
    }

    #[test]
    fn test_cursor_moves_and_view_follows() {
        let mut view = Viewport::new(Coord::ORIGIN, 2, 2);
        let mut editor = Editor::new(Coord::new(1, 1));
        editor.move_cursor(Direction::Right, &mut view);
        assert_eq!(editor.cursor, Coord::new(2, 1));
        assert_eq!(view.origin, Coord::new(1, 0));

        editor.move_cursor(Direction::Up, &mut view);
        editor.move_cursor(Direction::Up, &mut view);
        assert_eq!(editor.cursor, Coord::new(2, -1));
        assert_eq!(view.origin, Coord::new(1, -1));
    }
}
