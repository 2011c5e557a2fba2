//! Record/replay regression helpers.
//!
//! A scenario is run live through a `HeadlessRunner` and its history saved as
//! `TimeMachine` JSON. The file is then reloaded and the same inputs are
//! stepped again from its first frame. Frames are compared by the SHA-256 of
//! their serde_json encoding, which is also what golden files on disk hold.

use std::{
    fs,
    io::{self, Write},
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize, de::DeserializeOwned};
use sha2::{Digest, Sha256};

use crate::{GameLogic, HeadlessRunner, TimeMachine};

/// Set to `1`, `true`, `yes` or `on` to rewrite golden files instead of
/// checking them.
pub const UPDATE_GOLDENS_ENV: &str = "TILES2048_UPDATE_GOLDENS";

pub fn update_goldens_requested() -> bool {
    std::env::var(UPDATE_GOLDENS_ENV).is_ok_and(|v| {
        let v = v.trim();
        ["1", "true", "yes", "on"]
            .iter()
            .any(|flag| v.eq_ignore_ascii_case(flag))
    })
}

/// `<name>.json` with anything outside `[A-Za-z0-9_-]` turned into `_`.
pub fn artifact_file_name(name: &str) -> String {
    let stem: String = name
        .chars()
        .map(|c| match c {
            'a'..='z' | 'A'..='Z' | '0'..='9' | '-' | '_' => c,
            _ => '_',
        })
        .collect();
    format!("{stem}.json")
}

/// Path of a named golden under the calling crate's `tests/goldens/`.
#[macro_export]
macro_rules! hash_golden_path {
    ($name:expr) => {
        ::std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("tests")
            .join("goldens")
            .join($crate::replay::artifact_file_name($name))
    };
}

pub fn state_sha256_hex<S: Serialize>(state: &S) -> io::Result<String> {
    let bytes =
        serde_json::to_vec(state).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    Ok(hex::encode(Sha256::digest(&bytes)))
}

pub fn history_hashes<S: Serialize>(history: &[S]) -> io::Result<Vec<String>> {
    history.iter().map(state_sha256_hex).collect()
}

/// Index of the first frame where two hash lists disagree, counting a
/// length difference as a divergence at the shorter length.
pub fn first_divergence(expected: &[String], actual: &[String]) -> Option<usize> {
    expected
        .iter()
        .zip(actual)
        .position(|(a, b)| a != b)
        .or_else(|| (expected.len() != actual.len()).then(|| expected.len().min(actual.len())))
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StateHashGolden {
    pub version: u32,
    pub name: String,
    pub hash_alg: String,
    /// One hash per recorded frame, initial state included.
    pub hashes: Vec<String>,
}

impl StateHashGolden {
    pub const VERSION: u32 = 1;
    pub const HASH_ALG: &'static str = "sha256";

    pub fn new(name: impl Into<String>, hashes: Vec<String>) -> Self {
        Self {
            version: Self::VERSION,
            name: name.into(),
            hash_alg: Self::HASH_ALG.to_string(),
            hashes,
        }
    }

    /// Hashes every frame of `history`.
    pub fn from_history<S: Serialize>(name: impl Into<String>, history: &[S]) -> io::Result<Self> {
        Ok(Self::new(name, history_hashes(history)?))
    }

    pub fn load(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref();
        let bytes = fs::read(path)?;
        serde_json::from_slice(&bytes).map_err(|e| {
            io::Error::new(
                io::ErrorKind::InvalidData,
                format!("golden {} is not valid json: {e}", path.display()),
            )
        })
    }

    pub fn save(&self, path: impl AsRef<Path>) -> io::Result<()> {
        let path = path.as_ref();
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)?;
        }
        let mut text = serde_json::to_string_pretty(self)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        text.push('\n');
        fs::File::create(path)?.write_all(text.as_bytes())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GoldenCheck {
    Matched,
    Written,
    Updated,
}

/// Compares `actual` against the golden at `path`.
///
/// A missing golden is written. With `update` set an existing one is
/// overwritten. Otherwise any difference in format or hashes is an error
/// naming the first differing frame.
pub fn check_golden(
    path: impl AsRef<Path>,
    actual: &StateHashGolden,
    update: bool,
) -> io::Result<GoldenCheck> {
    let path = path.as_ref();
    if !path.exists() {
        actual.save(path)?;
        log::info!("wrote golden {}", path.display());
        return Ok(GoldenCheck::Written);
    }
    if update {
        actual.save(path)?;
        log::info!("updated golden {}", path.display());
        return Ok(GoldenCheck::Updated);
    }

    let expected = StateHashGolden::load(path)?;
    let hint = format!("rerun with {UPDATE_GOLDENS_ENV}=1 to accept the new output");
    if (expected.version, expected.hash_alg.as_str()) != (actual.version, actual.hash_alg.as_str())
    {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!(
                "golden {} is v{} {} but the run produced v{} {}; {hint}",
                path.display(),
                expected.version,
                expected.hash_alg,
                actual.version,
                actual.hash_alg
            ),
        ));
    }
    match first_divergence(&expected.hashes, &actual.hashes) {
        None => Ok(GoldenCheck::Matched),
        Some(frame) => Err(io::Error::other(format!(
            "golden {} differs at frame {frame} ({} expected frames, {} actual); {hint}",
            path.display(),
            expected.hashes.len(),
            actual.hashes.len()
        ))),
    }
}

#[derive(Debug, Clone)]
pub struct RecordReplayArtifacts {
    pub state_json: PathBuf,
    pub hashes: Vec<String>,
}

/// Runs `inputs` live and saves the history to `<out_dir>/<name>.json`.
///
/// The file is reloaded and checked twice: its stored frames must hash like
/// the live run, and stepping `inputs` again from its first frame must
/// reproduce the same hashes. A `step` that is not a pure function of state
/// and input fails the second check.
pub fn record_then_replay<G>(
    name: &str,
    out_dir: impl AsRef<Path>,
    game: G,
    inputs: impl IntoIterator<Item = G::Input>,
) -> io::Result<RecordReplayArtifacts>
where
    G: GameLogic + Clone,
    G::State: Serialize + DeserializeOwned,
    G::Input: Clone,
{
    let out_dir = out_dir.as_ref();
    fs::create_dir_all(out_dir)?;
    let state_json = out_dir.join(artifact_file_name(name));
    let inputs: Vec<G::Input> = inputs.into_iter().collect();

    let mut live = HeadlessRunner::new(game.clone());
    live.run(inputs.iter().cloned());
    let live_hashes = history_hashes(live.history())?;
    live.timemachine().save_json_file(&state_json)?;

    let tm = TimeMachine::<G::State>::load_json_file(&state_json)?;
    let stored_frames = tm.len();
    let diverged = |stage: &str, hashes: &[String]| {
        first_divergence(&live_hashes, hashes).map(|frame| {
            io::Error::new(
                io::ErrorKind::InvalidData,
                format!(
                    "{stage} of {} diverged at frame {frame} (live {} frames, {stage} {} frames)",
                    state_json.display(),
                    live_hashes.len(),
                    hashes.len()
                ),
            )
        })
    };
    if let Some(err) = diverged("reload", &history_hashes(tm.history())?) {
        return Err(err);
    }

    let mut replay = HeadlessRunner::from_timemachine(game, tm);
    replay.seek(0);
    replay.run(inputs);
    if let Some(err) = diverged("replay", &history_hashes(replay.history())?) {
        return Err(err);
    }
    log::debug!("replayed {stored_frames} frames of {}", state_json.display());

    Ok(RecordReplayArtifacts {
        state_json,
        hashes: live_hashes,
    })
}
