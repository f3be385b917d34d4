//! Text rendering of a window onto the board
//!
//! The renderer only ever calls `search`; it never mutates the tree.

use serde::{Deserialize, Serialize};

use crate::sim::{CellTree, Component, Coord};

/// Characters used for live and dead cells
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Glyphs {
    pub live: char,
    pub dead: char,
}

impl Default for Glyphs {
    fn default() -> Self {
        Self {
            live: 'O',
            dead: ' ',
        }
    }
}

/// Visible rectangle, anchored at its top-left board coordinate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewport {
    pub origin: Coord,
    pub rows: u16,
    pub cols: u16,
}

impl Viewport {
    pub fn new(origin: Coord, rows: u16, cols: u16) -> Self {
        Self { origin, rows, cols }
    }

    /// Board coordinate shown at screen cell `(col, row)`; wraps like the board
    #[inline]
    pub fn board_coord(&self, col: u16, row: u16) -> Coord {
        self.origin.offset(col as Component, row as Component)
    }

    /// Screen cell showing `coord`, if it is visible
    pub fn screen_pos(&self, coord: Coord) -> Option<(u16, u16)> {
        let col = coord.x.wrapping_sub(self.origin.x) as u8 as u16;
        let row = coord.y.wrapping_sub(self.origin.y) as u8 as u16;
        (col < self.cols && row < self.rows).then_some((col, row))
    }

    pub fn scroll(&mut self, dx: Component, dy: Component) {
        self.origin = self.origin.offset(dx, dy);
    }

    pub fn resize(&mut self, rows: u16, cols: u16) {
        self.rows = rows;
        self.cols = cols;
    }

    /// Scroll the minimum amount needed to bring `coord` on screen
    pub fn follow(&mut self, coord: Coord) {
        if self.rows == 0 || self.cols == 0 || self.screen_pos(coord).is_some() {
            return;
        }
        let dx = coord.x.wrapping_sub(self.origin.x) as u8 as u16;
        let dy = coord.y.wrapping_sub(self.origin.y) as u8 as u16;
        if dx >= self.cols {
            // Left of the window if it is closer going backwards
            if dx > 128 {
                self.origin.x = coord.x;
            } else {
                self.origin.x = coord.x.wrapping_sub((self.cols - 1) as Component);
            }
        }
        if dy >= self.rows {
            if dy > 128 {
                self.origin.y = coord.y;
            } else {
                self.origin.y = coord.y.wrapping_sub((self.rows - 1) as Component);
            }
        }
    }

    /// One string per visible row
    pub fn render_rows(&self, cells: &CellTree, glyphs: Glyphs) -> Vec<String> {
        (0..self.rows)
            .map(|row| {
                (0..self.cols)
                    .map(|col| {
                        if cells.search(self.board_coord(col, row)).is_some() {
                            glyphs.live
                        } else {
                            glyphs.dead
                        }
                    })
                    .collect()
            })
            .collect()
    }

    /// The whole frame, rows separated by `\n`, no trailing newline
    pub fn render(&self, cells: &CellTree, glyphs: Glyphs) -> String {
        self.render_rows(cells, glyphs).join("\n")
    }
}
