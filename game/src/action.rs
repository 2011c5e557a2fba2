use serde::{Deserialize, Serialize};

use crate::state::GameStatus;
use crate::tile::NewTile;

/// Everything the reducer understands. Serialized with a `type` tag so the
/// JSON form reads `{"type":"move_up"}` / `{"type":"create_tile","tile":{..}}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Action {
    ResetGame,
    CreateTile { tile: NewTile },
    MoveUp,
    MoveDown,
    MoveLeft,
    MoveRight,
    CleanUp,
    UpdateStatus { status: GameStatus },
}

impl Action {
    pub fn create_tile(tile: NewTile) -> Self {
        Action::CreateTile { tile }
    }

    pub fn direction(self) -> Option<Direction> {
        match self {
            Action::MoveUp => Some(Direction::Up),
            Action::MoveDown => Some(Direction::Down),
            Action::MoveLeft => Some(Direction::Left),
            Action::MoveRight => Some(Direction::Right),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Parses a single script character: `u/d/l/r`, case-insensitive.
    pub fn from_char(c: char) -> Option<Direction> {
        match c.to_ascii_lowercase() {
            'u' => Some(Direction::Up),
            'd' => Some(Direction::Down),
            'l' => Some(Direction::Left),
            'r' => Some(Direction::Right),
            _ => None,
        }
    }
}

impl From<Direction> for Action {
    fn from(direction: Direction) -> Self {
        match direction {
            Direction::Up => Action::MoveUp,
            Direction::Down => Action::MoveDown,
            Direction::Left => Action::MoveLeft,
            Direction::Right => Action::MoveRight,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tile::Position;

    #[test]
    fn json_form_uses_snake_case_type_tags() {
        let json = serde_json::to_string(&Action::MoveUp).expect("serialize");
        assert_eq!(json, r#"{"type":"move_up"}"#);

        let parsed: Action = serde_json::from_str(
            r#"{"type":"create_tile","tile":{"position":{"x":0,"y":1},"value":2}}"#,
        )
        .expect("parse create_tile");
        assert_eq!(
            parsed,
            Action::create_tile(NewTile {
                position: Position::new(0, 1),
                value: 2
            })
        );

        let parsed: Action = serde_json::from_str(r#"{"type":"update_status","status":"won"}"#)
            .expect("parse update_status");
        assert_eq!(
            parsed,
            Action::UpdateStatus {
                status: GameStatus::Won
            }
        );
    }

    #[test]
    fn directions_map_onto_move_actions() {
        for dir in Direction::ALL {
            assert_eq!(Action::from(dir).direction(), Some(dir));
        }
        assert_eq!(Action::CleanUp.direction(), None);
    }

    #[test]
    fn script_chars_parse_case_insensitively() {
        assert_eq!(Direction::from_char('U'), Some(Direction::Up));
        assert_eq!(Direction::from_char('r'), Some(Direction::Right));
        assert_eq!(Direction::from_char('x'), None);
    }
}
