use std::fmt;

use serde::{Deserialize, Serialize};

use crate::board::GRID_SIZE;

/// Stable identity of a tile across moves. Allocated by the reducer, never reused
/// within one game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TileId(pub u32);

impl fmt::Display for TileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Grid coordinate: `x` is the column, `y` is the row, both 0-indexed from the
/// top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: usize,
    pub y: usize,
}

impl Position {
    pub const fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }

    pub fn in_bounds(self) -> bool {
        self.x < GRID_SIZE && self.y < GRID_SIZE
    }
}

impl From<(usize, usize)> for Position {
    fn from((x, y): (usize, usize)) -> Self {
        Self::new(x, y)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tile {
    pub id: TileId,
    pub position: Position,
    pub value: u32,
}

/// Payload of `create_tile`: everything but the identifier, which the reducer
/// assigns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTile {
    pub position: Position,
    pub value: u32,
}

impl NewTile {
    pub fn new(position: impl Into<Position>, value: u32) -> Self {
        Self {
            position: position.into(),
            value,
        }
    }
}

/// Values a tile may legally carry: powers of two from 2 upwards.
pub fn is_tile_value(value: u32) -> bool {
    value >= 2 && value.is_power_of_two()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tile_values_are_powers_of_two_from_two() {
        assert!(is_tile_value(2));
        assert!(is_tile_value(2048));
        assert!(!is_tile_value(0));
        assert!(!is_tile_value(1));
        assert!(!is_tile_value(6));
    }

    #[test]
    fn position_bounds_follow_grid_size() {
        assert!(Position::new(0, 0).in_bounds());
        assert!(Position::new(GRID_SIZE - 1, GRID_SIZE - 1).in_bounds());
        assert!(!Position::new(GRID_SIZE, 0).in_bounds());
        assert!(!Position::new(0, GRID_SIZE).in_bounds());
    }
}
