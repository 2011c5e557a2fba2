use std::fmt::Write as _;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::Parser;
use env_logger::Env;
use tiles2048::logic::record_actions;
use tiles2048::session::{MoveOutcome, Session};
use tiles2048::settings::SettingsStore;
use tiles2048::{Direction, GRID_SIZE, GameState, Position};

#[derive(Debug, Parser)]
#[command(name = "tiles2048")]
#[command(about = "Plays a scripted, seeded 4x4 sliding-tile game headlessly")]
struct Cli {
    #[arg(long, default_value_t = 0)]
    seed: u64,
    /// Moves as `u/d/l/r` characters; whitespace is ignored.
    #[arg(long, default_value = "")]
    moves: String,
    /// Settings JSON; defaults to `TILES2048_SETTINGS_PATH` or the user config dir.
    #[arg(long)]
    settings: Option<PathBuf>,
    /// Print the final state as JSON instead of a text grid.
    #[arg(long, default_value_t = false)]
    json: bool,
    /// Save every intermediate reducer state as TimeMachine JSON.
    #[arg(long)]
    record: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    let store = match &cli.settings {
        Some(path) => SettingsStore::new(path),
        None => SettingsStore::from_env(),
    };
    let settings = store.load();
    let directions = parse_moves(&cli.moves)?;

    let mut session = Session::new(settings, cli.seed);
    session.start();

    for (i, direction) in directions.into_iter().enumerate() {
        let outcome = session.request_move(direction);
        log::debug!("move {i} {direction:?}: {outcome:?}");
        if outcome == MoveOutcome::GameOver {
            log::info!("game over after {i} moves");
            break;
        }
        session.advance(settings.input_cooldown());
    }

    if let Some(path) = &cli.record {
        let runner = record_actions(session.actions().iter().copied());
        runner
            .timemachine()
            .save_json_file(path)
            .with_context(|| format!("writing recording {}", path.display()))?;
        log::info!("recorded {} frames to {}", runner.history().len(), path.display());
    }

    let state = session.state();
    if cli.json {
        let text = serde_json::to_string_pretty(state).context("serializing final state")?;
        println!("{text}");
    } else {
        print!("{}", render_text(state));
    }
    Ok(())
}

fn parse_moves(script: &str) -> Result<Vec<Direction>> {
    let mut directions = Vec::new();
    for (i, c) in script.chars().enumerate() {
        if c.is_whitespace() {
            continue;
        }
        let Some(direction) = Direction::from_char(c) else {
            bail!("unknown move {c:?} at offset {i} (expected one of u/d/l/r)");
        };
        directions.push(direction);
    }
    Ok(directions)
}

fn render_text(state: &GameState) -> String {
    let mut out = String::new();
    for y in 0..GRID_SIZE {
        for x in 0..GRID_SIZE {
            match state.value_at(Position::new(x, y)) {
                Some(value) => {
                    let _ = write!(out, "{value:>6}");
                }
                None => out.push_str("     ."),
            }
        }
        out.push('\n');
    }
    let _ = writeln!(out, "score: {}  status: {:?}", state.score, state.status);
    out
}
