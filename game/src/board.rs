use serde::{Deserialize, Serialize};

use crate::tile::{Position, TileId};

pub const GRID_SIZE: usize = 4;
pub const CELL_COUNT: usize = GRID_SIZE * GRID_SIZE;

/// Cell matrix indexed `[y][x]`; each cell holds at most one tile id.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    cells: [[Option<TileId>; GRID_SIZE]; GRID_SIZE],
}

impl Board {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `None` for empty cells and for positions off the grid.
    pub fn get(&self, pos: Position) -> Option<TileId> {
        self.cells.get(pos.y).and_then(|row| row.get(pos.x)).copied().flatten()
    }

    pub fn is_empty_at(&self, pos: Position) -> bool {
        self.get(pos).is_none()
    }

    /// Writes a cell; panics in debug builds if `pos` is off the grid.
    pub fn set(&mut self, pos: Position, id: Option<TileId>) {
        debug_assert!(pos.in_bounds(), "board write outside grid: {pos:?}");
        if let Some(cell) = self.cells.get_mut(pos.y).and_then(|row| row.get_mut(pos.x)) {
            *cell = id;
        }
    }

    pub fn rows(&self) -> &[[Option<TileId>; GRID_SIZE]; GRID_SIZE] {
        &self.cells
    }

    /// Occupied cells in row-major order (y outer, x inner).
    pub fn occupied(&self) -> impl Iterator<Item = (Position, TileId)> + '_ {
        self.cells.iter().enumerate().flat_map(|(y, row)| {
            row.iter()
                .enumerate()
                .filter_map(move |(x, cell)| cell.map(|id| (Position::new(x, y), id)))
        })
    }

    pub fn contains(&self, id: TileId) -> bool {
        self.occupied().any(|(_, cell)| cell == id)
    }

    pub fn tile_count(&self) -> usize {
        self.occupied().count()
    }

    pub fn is_full(&self) -> bool {
        self.tile_count() == CELL_COUNT
    }
}
