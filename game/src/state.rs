use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::board::Board;
use crate::tile::{Position, Tile, TileId};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameStatus {
    #[default]
    Ongoing,
    Won,
    Lost,
}

impl GameStatus {
    pub fn is_over(self) -> bool {
        !matches!(self, GameStatus::Ongoing)
    }
}

/// One immutable snapshot of a game. The reducer never edits a `GameState` in
/// place; every action yields a new value.
///
/// Between a move and the following `clean_up`, `tiles` may hold ghost tiles
/// that no board cell references. Presentation code reads them to animate the
/// merge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    pub board: Board,
    pub tiles: BTreeMap<TileId, Tile>,
    /// Insertion order of tile ids, used for stable render ordering.
    pub tile_order: Vec<TileId>,
    pub has_changed: bool,
    pub score: u32,
    pub status: GameStatus,
    #[serde(default = "first_tile_id")]
    pub next_tile_id: u32,
}

fn first_tile_id() -> u32 {
    1
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

impl GameState {
    pub fn new() -> Self {
        Self {
            board: Board::new(),
            tiles: BTreeMap::new(),
            tile_order: Vec::new(),
            has_changed: false,
            score: 0,
            status: GameStatus::Ongoing,
            next_tile_id: first_tile_id(),
        }
    }

    pub fn tile(&self, id: TileId) -> Option<&Tile> {
        self.tiles.get(&id)
    }

    /// The tile currently referenced by the board at `pos`.
    pub fn tile_at(&self, pos: Position) -> Option<&Tile> {
        self.board.get(pos).and_then(|id| self.tiles.get(&id))
    }

    pub fn value_at(&self, pos: Position) -> Option<u32> {
        self.tile_at(pos).map(|tile| tile.value)
    }

    /// Tiles in render order. Ids that a move already dropped from the
    /// collection are skipped.
    pub fn tiles(&self) -> Vec<Tile> {
        self.tile_order
            .iter()
            .filter_map(|id| self.tiles.get(id).copied())
            .collect()
    }

    /// Tiles kept only for merge animation: present in the collection but no
    /// longer on the board.
    pub fn ghost_tiles(&self) -> Vec<Tile> {
        self.tiles
            .values()
            .filter(|tile| !self.board.contains(tile.id))
            .copied()
            .collect()
    }

    pub fn max_value(&self) -> Option<u32> {
        self.board
            .occupied()
            .filter_map(|(_, id)| self.tiles.get(&id))
            .map(|tile| tile.value)
            .max()
    }

    /// Sum of values of board-referenced tiles.
    pub fn board_value_sum(&self) -> u64 {
        self.board
            .occupied()
            .filter_map(|(_, id)| self.tiles.get(&id))
            .map(|tile| u64::from(tile.value))
            .sum()
    }
}
