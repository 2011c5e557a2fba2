pub mod action;
pub mod board;
pub mod logic;
pub mod reducer;
pub mod rules;
pub mod session;
pub mod settings;
pub mod state;
pub mod tile;

pub use action::{Action, Direction};
pub use board::{Board, GRID_SIZE};
pub use reducer::{ActionError, transition, validate_new_tile};
pub use state::{GameState, GameStatus};
pub use tile::{NewTile, Position, Tile, TileId};
