//! Mutable cell storage for a running session.

use maze_chase_core::{CellKind, GridView, MazeLayout, TileIndex};

/// Outcome of attempting to consume whatever occupies a tile.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Consumed {
    /// The tile held nothing edible.
    Nothing,
    /// A regular dot was removed from the tile.
    Dot,
    /// A power dot was removed from the tile.
    PowerDot,
}

/// Row-major cell grid tracking which pellets remain.
#[derive(Clone, Debug)]
pub(crate) struct TileGrid {
    cells: Vec<CellKind>,
    width: usize,
    height: usize,
    pellets_remaining: usize,
}

impl TileGrid {
    pub(crate) fn from_layout(layout: &MazeLayout) -> Self {
        let height = layout.height();
        let width = layout.width();
        let mut cells = Vec::with_capacity(width * height);
        let mut pellets_remaining = 0;
        for row in &layout.cells {
            for &kind in row {
                if matches!(kind, CellKind::Dot | CellKind::PowerDot) {
                    pellets_remaining += 1;
                }
                cells.push(kind);
            }
        }
        Self {
            cells,
            width,
            height,
            pellets_remaining,
        }
    }

    pub(crate) const fn width(&self) -> usize {
        self.width
    }

    pub(crate) const fn height(&self) -> usize {
        self.height
    }

    pub(crate) const fn pellets_remaining(&self) -> usize {
        self.pellets_remaining
    }

    pub(crate) fn view(&self) -> GridView<'_> {
        GridView::new(&self.cells, self.width, self.height, self.pellets_remaining)
    }

    /// Kind of the cell at `tile` with both axes wrapped into the grid.
    ///
    /// Lookahead probes use this so tunnel rows stay traversable at the
    /// screen edge.
    pub(crate) fn kind_wrapped(&self, tile: TileIndex) -> CellKind {
        let row = tile.row().rem_euclid(self.height as i32) as usize;
        let col = tile.col().rem_euclid(self.width as i32) as usize;
        self.cells[row * self.width + col]
    }

    /// Removes and reports any pellet occupying `tile`.
    pub(crate) fn consume_at(&mut self, tile: TileIndex) -> Consumed {
        let Some(index) = self.index_of(tile) else {
            return Consumed::Nothing;
        };
        let consumed = match self.cells[index] {
            CellKind::Dot => Consumed::Dot,
            CellKind::PowerDot => Consumed::PowerDot,
            _ => return Consumed::Nothing,
        };
        self.cells[index] = CellKind::Empty;
        self.pellets_remaining -= 1;
        consumed
    }

    fn index_of(&self, tile: TileIndex) -> Option<usize> {
        if tile.row() < 0 || tile.col() < 0 {
            return None;
        }
        let (row, col) = (tile.row() as usize, tile.col() as usize);
        if row >= self.height || col >= self.width {
            return None;
        }
        Some(row * self.width + col)
    }
}
