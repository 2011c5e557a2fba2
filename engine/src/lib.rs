pub mod replay;

use std::{
    fs,
    io::{self, Write},
    path::Path,
};

use serde::{Deserialize, Serialize, de::DeserializeOwned};

/// Linear frame history with a movable cursor.
///
/// Recording while rewound truncates everything after the cursor, so the
/// history always describes one branch of play.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeMachine<State> {
    states: Vec<State>,
    frame: usize,
}

impl<State> TimeMachine<State> {
    pub fn new(initial_state: State) -> Self {
        Self {
            states: vec![initial_state],
            frame: 0,
        }
    }

    pub fn frame(&self) -> usize {
        self.frame
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn state(&self) -> &State {
        &self.states[self.frame]
    }

    pub fn history(&self) -> &[State] {
        &self.states
    }

    pub fn rewind(&mut self, frames: usize) -> usize {
        self.frame = self.frame.saturating_sub(frames);
        self.frame
    }

    pub fn forward(&mut self, frames: usize) -> usize {
        let max_frame = self.states.len().saturating_sub(1);
        self.frame = (self.frame + frames).min(max_frame);
        self.frame
    }

    pub fn seek(&mut self, frame: usize) -> usize {
        let max_frame = self.states.len().saturating_sub(1);
        self.frame = frame.min(max_frame);
        self.frame
    }

    pub fn record(&mut self, state: State) -> usize {
        if self.frame + 1 < self.states.len() {
            self.states.truncate(self.frame + 1);
        }
        self.states.push(state);
        self.frame += 1;
        self.frame
    }
}

impl<State> TimeMachine<State>
where
    State: Serialize + DeserializeOwned,
{
    pub fn save_json_file(&self, path: impl AsRef<Path>) -> io::Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let file = fs::File::create(path)?;
        let mut writer = io::BufWriter::new(file);
        serde_json::to_writer(&mut writer, self)
            .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;
        writer.flush()
    }

    pub fn load_json_file(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref();
        let file = fs::File::open(path)?;
        let reader = io::BufReader::new(file);
        let tm: Self = serde_json::from_reader(reader).map_err(|e| {
            io::Error::new(
                io::ErrorKind::InvalidData,
                format!("failed parsing timemachine json {}: {e}", path.display()),
            )
        })?;
        if tm.states.is_empty() || tm.frame >= tm.states.len() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!(
                    "timemachine json {} has frame {} outside {} states",
                    path.display(),
                    tm.frame,
                    tm.states.len()
                ),
            ));
        }
        Ok(tm)
    }
}

/// A deterministic game: an initial state plus a pure step function.
pub trait GameLogic {
    type State;
    type Input;

    fn initial_state(&self) -> Self::State;
    fn step(&self, state: &Self::State, input: Self::Input) -> Self::State;
}

#[derive(Debug)]
pub struct HeadlessRunner<G: GameLogic> {
    game: G,
    timemachine: TimeMachine<G::State>,
}

impl<G: GameLogic> HeadlessRunner<G> {
    pub fn new(game: G) -> Self {
        let initial_state = game.initial_state();
        Self {
            game,
            timemachine: TimeMachine::new(initial_state),
        }
    }

    pub fn from_timemachine(game: G, timemachine: TimeMachine<G::State>) -> Self {
        Self { game, timemachine }
    }

    pub fn game(&self) -> &G {
        &self.game
    }

    pub fn frame(&self) -> usize {
        self.timemachine.frame()
    }

    pub fn state(&self) -> &G::State {
        self.timemachine.state()
    }

    pub fn history(&self) -> &[G::State] {
        self.timemachine.history()
    }

    pub fn timemachine(&self) -> &TimeMachine<G::State> {
        &self.timemachine
    }

    pub fn step(&mut self, input: G::Input) -> usize {
        let next_state = self.game.step(self.timemachine.state(), input);
        self.timemachine.record(next_state)
    }

    pub fn run<I>(&mut self, inputs: I) -> usize
    where
        I: IntoIterator<Item = G::Input>,
    {
        let mut last_frame = self.frame();
        for input in inputs {
            last_frame = self.step(input);
        }
        last_frame
    }

    pub fn rewind(&mut self, frames: usize) -> usize {
        self.timemachine.rewind(frames)
    }

    pub fn forward(&mut self, frames: usize) -> usize {
        self.timemachine.forward(frames)
    }

    pub fn seek(&mut self, frame: usize) -> usize {
        self.timemachine.seek(frame)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Counter;

    impl GameLogic for Counter {
        type State = u32;
        type Input = u32;

        fn initial_state(&self) -> Self::State {
            0
        }

        fn step(&self, state: &Self::State, input: Self::Input) -> Self::State {
            state.saturating_add(input)
        }
    }

    #[test]
    fn recording_after_rewind_drops_the_abandoned_branch() {
        let mut tm = TimeMachine::new(0);
        tm.record(1);
        tm.record(2);
        assert_eq!(tm.state(), &2);

        tm.rewind(1);
        assert_eq!(tm.state(), &1);

        tm.record(99);
        assert_eq!(tm.history(), &[0, 1, 99]);
        assert_eq!(tm.frame(), 2);
    }

    #[test]
    fn seek_clamps_to_last_recorded_frame() {
        let mut tm = TimeMachine::new('a');
        tm.record('b');
        tm.record('c');

        assert_eq!(tm.seek(0), 0);
        assert_eq!(tm.state(), &'a');
        assert_eq!(tm.seek(10), 2);
        assert_eq!(tm.state(), &'c');
    }

    #[test]
    fn runner_steps_and_seeks() {
        let mut runner = HeadlessRunner::new(Counter);
        runner.run([1, 2, 3]);
        assert_eq!(runner.frame(), 3);
        assert_eq!(runner.state(), &6);

        runner.rewind(2);
        assert_eq!(runner.state(), &1);

        runner.forward(1);
        assert_eq!(runner.state(), &3);

        runner.seek(0);
        assert_eq!(runner.state(), &0);
    }

    #[test]
    fn runner_resumes_from_saved_history() {
        let mut tm = TimeMachine::new(10);
        tm.record(12);

        let mut runner = HeadlessRunner::from_timemachine(Counter, tm);
        assert_eq!(runner.frame(), 1);
        runner.step(5);
        assert_eq!(runner.state(), &17);
        assert_eq!(runner.history(), &[10, 12, 17]);
    }
}
