use std::time::Duration;

use rand::{Rng, SeedableRng, rngs::StdRng};

use crate::action::{Action, Direction};
use crate::reducer::{transition, validate_new_tile};
use crate::rules::{empty_cells, evaluate_status};
use crate::settings::GameSettings;
use crate::state::GameState;
use crate::tile::{NewTile, Position};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    /// The board changed; clean-up, spawn and status check run once the
    /// animation window has elapsed.
    Moved,
    /// Accepted, but nothing could move in that direction.
    Unchanged,
    /// A previous move is still waiting for its clean-up.
    Busy,
    /// Arrived inside the input cooldown of the previous move.
    Throttled,
    GameOver,
}

/// Drives a game the way an interactive front end would: it owns the current
/// `GameState`, randomness for tile spawns, and the timing between a move and
/// its clean-up.
///
/// Time only advances through [`Session::advance`], so a session is fully
/// deterministic for a given seed and input sequence.
#[derive(Debug, Clone)]
pub struct Session {
    settings: GameSettings,
    state: GameState,
    rng: StdRng,
    actions: Vec<Action>,
    settle_in: Option<Duration>,
    cooldown: Duration,
}

impl Session {
    pub fn new(settings: GameSettings, seed: u64) -> Self {
        Self {
            settings,
            state: GameState::new(),
            rng: StdRng::seed_from_u64(seed),
            actions: Vec::new(),
            settle_in: None,
            cooldown: Duration::ZERO,
        }
    }

    /// Rebuilds a session from a saved action log. A log that stops between a
    /// move and its clean-up resumes with that settle pending.
    pub fn restore<I>(settings: GameSettings, seed: u64, actions: I) -> Self
    where
        I: IntoIterator<Item = Action>,
    {
        let mut session = Self::new(settings, seed);
        for action in actions {
            session.dispatch(action);
        }
        if session.state.has_changed && !session.state.status.is_over() {
            session.settle_in = Some(session.settings.merge_animation());
        }
        log::debug!(
            "restored {} actions, score {}",
            session.actions.len(),
            session.state.score
        );
        session
    }

    pub fn settings(&self) -> &GameSettings {
        &self.settings
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Every action dispatched so far, spawn positions included. Folding these
    /// through `transition` from `GameState::new()` reproduces `state()`.
    pub fn actions(&self) -> &[Action] {
        &self.actions
    }

    pub fn is_settling(&self) -> bool {
        self.settle_in.is_some()
    }

    /// Resets the board and drops in the configured number of starting tiles.
    pub fn start(&mut self) {
        self.settle_in = None;
        self.cooldown = Duration::ZERO;
        self.dispatch(Action::ResetGame);
        for _ in 0..self.settings.starting_tiles {
            if self.spawn_random_tile().is_none() {
                break;
            }
        }
        log::debug!("started game with {} tiles", self.state.board.tile_count());
    }

    pub fn request_move(&mut self, direction: Direction) -> MoveOutcome {
        if self.state.status.is_over() {
            return MoveOutcome::GameOver;
        }
        if self.settle_in.is_some() {
            return MoveOutcome::Busy;
        }
        if !self.cooldown.is_zero() {
            return MoveOutcome::Throttled;
        }

        self.dispatch(direction.into());
        self.cooldown = self.settings.input_cooldown();
        if self.state.has_changed {
            self.settle_in = Some(self.settings.merge_animation());
            MoveOutcome::Moved
        } else {
            MoveOutcome::Unchanged
        }
    }

    /// Advances the session clock. Returns true if a pending clean-up ran.
    pub fn advance(&mut self, dt: Duration) -> bool {
        self.cooldown = self.cooldown.saturating_sub(dt);
        let Some(remaining) = self.settle_in else {
            return false;
        };
        let remaining = remaining.saturating_sub(dt);
        if remaining.is_zero() {
            self.settle();
            true
        } else {
            self.settle_in = Some(remaining);
            false
        }
    }

    /// Runs a pending clean-up without waiting for the animation window.
    pub fn settle_now(&mut self) -> bool {
        if self.settle_in.is_none() {
            return false;
        }
        self.settle();
        true
    }

    fn settle(&mut self) {
        self.settle_in = None;
        self.dispatch(Action::CleanUp);
        self.spawn_random_tile();

        let status = evaluate_status(&self.state, self.settings.win_tile_value);
        if status != self.state.status {
            log::info!(
                "game status {:?} -> {status:?} (score {})",
                self.state.status,
                self.state.score
            );
            self.dispatch(Action::UpdateStatus { status });
        }
    }

    fn spawn_random_tile(&mut self) -> Option<Position> {
        let empty = empty_cells(&self.state);
        if empty.is_empty() {
            return None;
        }
        let position = empty[self.rng.gen_range(0..empty.len())];
        let tile = NewTile::new(position, self.settings.spawn_value);
        if let Err(e) = validate_new_tile(&self.state, &tile) {
            log::error!("refusing to spawn tile: {e}");
            return None;
        }
        self.dispatch(Action::create_tile(tile));
        Some(position)
    }

    fn dispatch(&mut self, action: Action) {
        self.state = transition(&self.state, &action);
        self.actions.push(action);
    }
}
