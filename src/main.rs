//! Serpent Grid entry point
//!
//! Headless native driver: runs one autopilot game to completion and keeps
//! the high scores up to date.
//!
//! Usage: `serpent-grid [seed] [data-dir] [preset]`

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::{SystemTime, UNIX_EPOCH};

use serpent_grid::persistence::Storage;
use serpent_grid::settings::DifficultyPreset;
use serpent_grid::sim::{SimulationEngine, TickOutcome, choose_heading};
use serpent_grid::{EngineSettings, HighScores};

/// Hard stop for demo runs that never die
const MAX_DEMO_TICKS: u64 = 20_000;

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Serpent Grid (native) starting...");

    let mut args = std::env::args().skip(1);
    let seed = args
        .next()
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or_else(now_ms);
    let data_dir = args
        .next()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(".serpent-grid"));
    let preset = args.next().and_then(|s| DifficultyPreset::from_str(&s));

    let storage = Storage::new(data_dir);
    log::info!("Data directory: {}", storage.dir().display());
    let mut settings = EngineSettings::load(&storage);
    if let Some(preset) = preset {
        settings.apply_preset(preset);
    }
    let mut scores = HighScores::load(&storage);
    if scores.is_empty() {
        log::info!("No runs recorded yet");
    }

    let mut engine = match SimulationEngine::new(settings, seed) {
        Ok(engine) => engine.with_best_score(scores.best),
        Err(e) => {
            log::error!("Invalid settings: {e}");
            return ExitCode::FAILURE;
        }
    };

    let mut simulated_ms: u64 = 0;
    loop {
        let heading = choose_heading(engine.state());
        if heading != engine.state().effective_heading() {
            engine.set_direction(heading);
        }

        simulated_ms += u64::from(engine.tick_interval_ms());
        match engine.step() {
            TickOutcome::Continue => {}
            TickOutcome::Scored { score, new_best } => {
                if new_best {
                    log::info!("New best score: {score}");
                } else {
                    log::debug!("Score: {score}");
                }
            }
            TickOutcome::Terminated { reason } => {
                log::info!("Snake died: {reason:?}");
                break;
            }
            TickOutcome::AlreadyTerminated => break,
        }

        if engine.state().time_ticks >= MAX_DEMO_TICKS {
            break;
        }
    }

    let snapshot = engine.snapshot();
    if !snapshot.is_terminal() {
        log::warn!("Demo stopped after {MAX_DEMO_TICKS} ticks");
    }
    log::info!(
        "Run over: score {}, length {}, {} ticks (~{}s at game speed), best {}",
        snapshot.score,
        snapshot.snake.len(),
        snapshot.time_ticks,
        simulated_ms / 1000,
        snapshot.best_score
    );

    // Only a new best is written back; other leaderboard changes stay in memory
    let new_best = scores.is_new_best(snapshot.best_score);
    if let Some(rank) = scores.potential_rank(snapshot.score) {
        log::info!("Leaderboard rank #{rank}");
    }
    scores.add_score(
        snapshot.score,
        snapshot.snake.len() as u32,
        snapshot.time_ticks,
        now_ms(),
    );
    if new_best {
        scores.record_best(snapshot.best_score);
        if let Err(e) = scores.save(&storage) {
            log::warn!("Could not save high scores: {e}");
        }
    }

    ExitCode::SUCCESS
}
