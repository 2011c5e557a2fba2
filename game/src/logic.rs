use engine::{GameLogic, HeadlessRunner};

use crate::action::Action;
use crate::reducer::transition;
use crate::state::GameState;

/// Exposes the reducer through the engine's `GameLogic` seam so action
/// histories can be recorded, rewound and replayed.
#[derive(Debug, Clone, Copy, Default)]
pub struct TileGame;

impl GameLogic for TileGame {
    type State = GameState;
    type Input = Action;

    fn initial_state(&self) -> Self::State {
        GameState::new()
    }

    fn step(&self, state: &Self::State, input: Self::Input) -> Self::State {
        transition(state, &input)
    }
}

/// Folds `actions` through the reducer starting from an empty game, keeping
/// every intermediate state.
pub fn record_actions<I>(actions: I) -> HeadlessRunner<TileGame>
where
    I: IntoIterator<Item = Action>,
{
    let mut runner = HeadlessRunner::new(TileGame);
    runner.run(actions);
    runner
}

pub fn replay_actions(actions: &[Action]) -> GameState {
    actions
        .iter()
        .fold(GameState::new(), |state, action| transition(&state, action))
}
