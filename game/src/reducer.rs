use std::collections::BTreeMap;

use thiserror::Error;

use crate::action::{Action, Direction};
use crate::board::{Board, GRID_SIZE};
use crate::state::GameState;
use crate::tile::{NewTile, Position, Tile, TileId, is_tile_value};

/// Caller-side contract violations for `create_tile`. `transition` itself never
/// fails; orchestration code checks these before dispatching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ActionError {
    #[error("position ({x}, {y}) is outside the {}x{} grid", GRID_SIZE, GRID_SIZE)]
    OutOfBounds { x: usize, y: usize },
    #[error("cell ({x}, {y}) is already occupied by tile {occupant}")]
    Occupied {
        x: usize,
        y: usize,
        occupant: TileId,
    },
    #[error("tile value {0} is not a power of two >= 2")]
    InvalidValue(u32),
    #[error("no tile ids left to assign")]
    IdsExhausted,
}

pub fn validate_new_tile(state: &GameState, tile: &NewTile) -> Result<(), ActionError> {
    let Position { x, y } = tile.position;
    if !tile.position.in_bounds() {
        return Err(ActionError::OutOfBounds { x, y });
    }
    if let Some(occupant) = state.board.get(tile.position) {
        return Err(ActionError::Occupied { x, y, occupant });
    }
    if !is_tile_value(tile.value) {
        return Err(ActionError::InvalidValue(tile.value));
    }
    if state.next_tile_id.checked_add(1).is_none() {
        return Err(ActionError::IdsExhausted);
    }
    Ok(())
}

/// The game's state-transition function.
///
/// Pure and total: the input state is never modified and every action yields a
/// new state. Moves leave merged-away tiles in `tiles` (but off the board)
/// until a later `Action::CleanUp` removes them.
///
/// `create_tile` misuse is defined as follows. A position off the grid, or a
/// state whose id counter is exhausted, returns the state unchanged. An
/// occupied cell is overwritten, leaving the previous occupant as a ghost for
/// the next clean-up. Both cases are logged as
/// warnings; use [`validate_new_tile`] to reject them up front.
pub fn transition(state: &GameState, action: &Action) -> GameState {
    match *action {
        Action::ResetGame => GameState::new(),
        Action::UpdateStatus { status } => {
            let mut next = state.clone();
            next.status = status;
            next
        }
        Action::CleanUp => clean_up(state),
        Action::CreateTile { tile } => create_tile(state, tile),
        Action::MoveUp => move_tiles(state, Direction::Up),
        Action::MoveDown => move_tiles(state, Direction::Down),
        Action::MoveLeft => move_tiles(state, Direction::Left),
        Action::MoveRight => move_tiles(state, Direction::Right),
    }
}

fn create_tile(state: &GameState, tile: NewTile) -> GameState {
    if !tile.position.in_bounds() {
        log::warn!(
            "create_tile ignored: {:?} is outside the {GRID_SIZE}x{GRID_SIZE} grid",
            tile.position
        );
        return state.clone();
    }
    let Some(following_id) = state.next_tile_id.checked_add(1) else {
        log::warn!("create_tile ignored: tile id counter exhausted");
        return state.clone();
    };
    if let Some(occupant) = state.board.get(tile.position) {
        log::warn!(
            "create_tile at {:?} replaces tile {occupant}; it stays a ghost until clean_up",
            tile.position
        );
    }
    if !is_tile_value(tile.value) {
        log::warn!("create_tile with non power-of-two value {}", tile.value);
    }

    let id = TileId(state.next_tile_id);
    let mut next = state.clone();
    next.board.set(tile.position, Some(id));
    next.tiles.insert(
        id,
        Tile {
            id,
            position: tile.position,
            value: tile.value,
        },
    );
    next.tile_order.push(id);
    next.next_tile_id = following_id;
    next
}

fn clean_up(state: &GameState) -> GameState {
    let mut tiles = BTreeMap::new();
    let mut tile_order = Vec::with_capacity(state.tiles.len());
    for (_, id) in state.board.occupied() {
        if let Some(tile) = state.tiles.get(&id) {
            tiles.insert(id, *tile);
            tile_order.push(id);
        }
    }

    GameState {
        board: state.board,
        tiles,
        tile_order,
        has_changed: false,
        score: state.score,
        status: state.status,
        next_tile_id: state.next_tile_id,
    }
}

/// Cells of one row/column, ordered from the edge tiles travel towards.
pub(crate) fn scan_line(direction: Direction, line: usize) -> [Position; GRID_SIZE] {
    let last = GRID_SIZE - 1;
    std::array::from_fn(|k| match direction {
        Direction::Up => Position::new(line, k),
        Direction::Down => Position::new(line, last - k),
        Direction::Left => Position::new(k, line),
        Direction::Right => Position::new(last - k, line),
    })
}

fn move_tiles(state: &GameState, direction: Direction) -> GameState {
    let mut board = Board::new();
    let mut tiles: BTreeMap<TileId, Tile> = BTreeMap::new();
    let mut has_changed = false;
    let mut score = state.score;

    for line in 0..GRID_SIZE {
        let cells = scan_line(direction, line);
        let mut cursor = 0;
        // Last tile written in this line that may still absorb an equal neighbour.
        let mut previous: Option<TileId> = None;

        for pos in cells {
            let Some(id) = state.board.get(pos) else {
                continue;
            };
            let Some(current) = state.tiles.get(&id).copied() else {
                log::warn!("board cell {pos:?} references unknown tile {id}; dropping it");
                has_changed = true;
                continue;
            };

            let merge_target = match previous {
                Some(prev) => tiles.get_mut(&prev).filter(|t| t.value == current.value),
                None => None,
            };
            if let Some(target) = merge_target {
                target.value = target.value.saturating_mul(2);
                score = score.saturating_add(target.value);
                let landing = target.position;
                tiles.insert(
                    id,
                    Tile {
                        position: landing,
                        ..current
                    },
                );
                previous = None;
                has_changed = true;
                continue;
            }

            let dest = cells[cursor];
            board.set(dest, Some(id));
            tiles.insert(
                id,
                Tile {
                    position: dest,
                    ..current
                },
            );
            if current.position != dest {
                has_changed = true;
            }
            previous = Some(id);
            cursor += 1;
        }
    }

    log::debug!(
        "move {direction:?}: changed={has_changed} score {} -> {score}",
        state.score
    );

    GameState {
        board,
        tiles,
        tile_order: state.tile_order.clone(),
        has_changed,
        score,
        status: state.status,
        next_tile_id: state.next_tile_id,
    }
}
