use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::board::CELL_COUNT;
use crate::tile::is_tile_value;

pub const DEFAULT_WIN_TILE_VALUE: u32 = 2048;
pub const DEFAULT_MERGE_ANIMATION_MS: u64 = 100;
pub const DEFAULT_SPAWN_VALUE: u32 = 2;
pub const DEFAULT_STARTING_TILES: usize = 2;

/// Tunables consumed by the orchestration layer. The reducer reads none of
/// these.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct GameSettings {
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default = "default_win_tile_value")]
    pub win_tile_value: u32,
    #[serde(default = "default_merge_animation_ms")]
    pub merge_animation_ms: u64,
    #[serde(default = "default_spawn_value")]
    pub spawn_value: u32,
    #[serde(default = "default_starting_tiles")]
    pub starting_tiles: usize,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            version: default_version(),
            win_tile_value: DEFAULT_WIN_TILE_VALUE,
            merge_animation_ms: DEFAULT_MERGE_ANIMATION_MS,
            spawn_value: DEFAULT_SPAWN_VALUE,
            starting_tiles: DEFAULT_STARTING_TILES,
        }
    }
}

impl GameSettings {
    pub fn sanitized(mut self) -> Self {
        self.version = default_version();
        if !is_tile_value(self.win_tile_value) || self.win_tile_value < 4 {
            self.win_tile_value = DEFAULT_WIN_TILE_VALUE;
        }
        if !is_tile_value(self.spawn_value) {
            self.spawn_value = DEFAULT_SPAWN_VALUE;
        }
        self.starting_tiles = self.starting_tiles.min(CELL_COUNT);
        self
    }

    pub fn merge_animation(&self) -> Duration {
        Duration::from_millis(self.merge_animation_ms)
    }

    /// Input is suppressed slightly longer than the animation so a held key
    /// cannot land a move before the previous clean-up.
    pub fn input_cooldown(&self) -> Duration {
        Duration::from_millis(self.merge_animation_ms.saturating_mul(105) / 100)
    }
}

fn default_version() -> u32 {
    1
}

fn default_win_tile_value() -> u32 {
    DEFAULT_WIN_TILE_VALUE
}

fn default_merge_animation_ms() -> u64 {
    DEFAULT_MERGE_ANIMATION_MS
}

fn default_spawn_value() -> u32 {
    DEFAULT_SPAWN_VALUE
}

fn default_starting_tiles() -> usize {
    DEFAULT_STARTING_TILES
}

#[derive(Debug, Clone)]
pub struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn from_env() -> Self {
        if let Some(explicit) = std::env::var_os("TILES2048_SETTINGS_PATH") {
            return Self::new(explicit);
        }

        let base = std::env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| {
                std::env::var_os("HOME").map(|home| {
                    let mut p = PathBuf::from(home);
                    p.push(".config");
                    p
                })
            })
            .unwrap_or_else(|| PathBuf::from("."));

        let mut path = base;
        path.push("tiles2048");
        path.push("settings.json");
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Missing or unreadable files fall back to defaults.
    pub fn load(&self) -> GameSettings {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) => {
                if e.kind() != io::ErrorKind::NotFound {
                    log::warn!("reading {}: {e}; using default settings", self.path.display());
                }
                return GameSettings::default();
            }
        };
        match serde_json::from_slice::<GameSettings>(&bytes) {
            Ok(settings) => settings.sanitized(),
            Err(e) => {
                log::warn!("parsing {}: {e}; using default settings", self.path.display());
                GameSettings::default()
            }
        }
    }

    pub fn save(&self, settings: &GameSettings) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let text = serde_json::to_string_pretty(settings)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        fs::write(&self.path, text)
    }
}
