use tiles2048::rules::{can_move, empty_cells, evaluate_status, has_reached, is_lost};
use tiles2048::{Action, GRID_SIZE, GameState, GameStatus, NewTile, Position, transition};

fn from_rows(rows: [[u32; GRID_SIZE]; GRID_SIZE]) -> GameState {
    let mut state = GameState::new();
    for (y, row) in rows.iter().enumerate() {
        for (x, &value) in row.iter().enumerate() {
            if value != 0 {
                state = transition(&state, &Action::create_tile(NewTile::new((x, y), value)));
            }
        }
    }
    state
}

const STUCK: [[u32; GRID_SIZE]; GRID_SIZE] = [
    [2, 4, 2, 4],
    [4, 2, 4, 2],
    [2, 4, 2, 4],
    [4, 2, 4, 2],
];

#[test]
fn empty_cells_are_listed_column_by_column() {
    let state = from_rows([
        [2, 0, 2, 2],
        [0, 2, 2, 2],
        [2, 2, 2, 2],
        [2, 2, 2, 2],
    ]);
    assert_eq!(
        empty_cells(&state),
        vec![Position::new(0, 1), Position::new(1, 0)]
    );
    assert_eq!(empty_cells(&GameState::new()).len(), GRID_SIZE * GRID_SIZE);
}

#[test]
fn checkerboard_full_board_is_lost() {
    let state = from_rows(STUCK);
    assert!(state.board.is_full());
    assert!(!can_move(&state));
    assert!(is_lost(&state));
    assert_eq!(evaluate_status(&state, 2048), GameStatus::Lost);
}

#[test]
fn full_board_with_vertical_pair_can_still_move() {
    let mut rows = STUCK;
    rows[3][3] = 4; // matches the 4 above it
    let state = from_rows(rows);
    assert!(state.board.is_full());
    assert!(can_move(&state));
    assert!(!is_lost(&state));
}

#[test]
fn full_board_with_horizontal_pair_can_still_move() {
    let mut rows = STUCK;
    rows[0][1] = 2; // matches its left neighbour
    let state = from_rows(rows);
    assert!(can_move(&state));
    assert_eq!(evaluate_status(&state, 2048), GameStatus::Ongoing);
}

#[test]
fn a_single_gap_is_never_lost() {
    let mut rows = STUCK;
    rows[2][1] = 0;
    let state = from_rows(rows);
    assert!(can_move(&state));
    assert!(!is_lost(&state));
}

#[test]
fn reaching_the_win_value_wins() {
    let state = from_rows([
        [0, 0, 0, 0],
        [0, 1024, 0, 0],
        [0, 0, 0, 0],
        [0, 0, 0, 2048],
    ]);
    assert!(has_reached(&state, 2048));
    assert!(!has_reached(&state, 4096));
    assert_eq!(evaluate_status(&state, 2048), GameStatus::Won);
    assert!(!has_reached(&GameState::new(), 2));
}

#[test]
fn winning_takes_priority_over_a_stuck_board() {
    let mut rows = STUCK;
    rows[0][0] = 64;
    let state = from_rows(rows);
    assert!(is_lost(&state));
    assert_eq!(evaluate_status(&state, 64), GameStatus::Won);
}

#[test]
fn ghost_tiles_do_not_count_towards_winning() {
    let merged = transition(
        &from_rows([
            [8, 8, 0, 0],
            [0, 0, 0, 0],
            [0, 0, 0, 0],
            [0, 0, 0, 0],
        ]),
        &Action::MoveLeft,
    );
    assert!(has_reached(&merged, 16));
    assert_eq!(merged.ghost_tiles().len(), 1);
    assert!(!has_reached(&merged, 32));
}
