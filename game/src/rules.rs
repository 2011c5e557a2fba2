//! Terminal-state checks. The reducer never decides whether a game is won or
//! lost; orchestration code evaluates these after each settled move and
//! dispatches `update_status` itself.

use crate::board::GRID_SIZE;
use crate::state::{GameState, GameStatus};
use crate::tile::Position;

/// Empty cells in column-major order (x outer, y inner).
pub fn empty_cells(state: &GameState) -> Vec<Position> {
    let mut cells = Vec::new();
    for x in 0..GRID_SIZE {
        for y in 0..GRID_SIZE {
            let pos = Position::new(x, y);
            if state.board.is_empty_at(pos) {
                cells.push(pos);
            }
        }
    }
    cells
}

pub fn has_reached(state: &GameState, win_value: u32) -> bool {
    state.max_value().is_some_and(|max| max >= win_value)
}

/// Whether some direction could still change the board: an empty cell exists,
/// or two horizontally/vertically adjacent tiles share a value.
pub fn can_move(state: &GameState) -> bool {
    for y in 0..GRID_SIZE {
        for x in 0..GRID_SIZE {
            let Some(value) = state.value_at(Position::new(x, y)) else {
                return true;
            };
            if x + 1 < GRID_SIZE && state.value_at(Position::new(x + 1, y)) == Some(value) {
                return true;
            }
            if y + 1 < GRID_SIZE && state.value_at(Position::new(x, y + 1)) == Some(value) {
                return true;
            }
        }
    }
    false
}

pub fn is_lost(state: &GameState) -> bool {
    state.board.is_full() && !can_move(state)
}

/// Reaching `win_value` wins even on a board that is also stuck.
pub fn evaluate_status(state: &GameState, win_value: u32) -> GameStatus {
    if has_reached(state, win_value) {
        GameStatus::Won
    } else if is_lost(state) {
        GameStatus::Lost
    } else {
        GameStatus::Ongoing
    }
}
