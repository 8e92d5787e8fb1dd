//! Slash Duel demo
//!
//! Plays one autopilot round, logs the result and state hash, then replays
//! the recording to confirm the run is deterministic.
//!
//! ```text
//! slash-duel [CONFIG.json] [--realtime]
//! ```

use anyhow::{bail, Context, Result};
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use slash_duel::{
    core::hash::short_hex,
    GameConfig, GameState, HeadlessController, LifecycleController, Recording, SimTime, VERSION,
    game::state::Scene,
    host::render::RenderSnapshot,
    host::sound::SoundBoard,
    host::transition::Fade,
    replay::Action,
    runtime::{simulate_round, Autopilot, Driver, HostCommand, WatchRenderer},
};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder().with_env_filter(filter).finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    let mut config_path = None;
    let mut realtime = false;
    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "--realtime" => realtime = true,
            flag if flag.starts_with("--") => bail!("unknown flag {flag}"),
            path => config_path = Some(path.to_owned()),
        }
    }

    let config = match &config_path {
        Some(path) => GameConfig::load(path).with_context(|| format!("loading {path}"))?,
        None => GameConfig::default(),
    };

    info!("Slash Duel v{}", VERSION);
    info!(
        "Round: {} s, melee range {}, damage {}, cooldown {} ms",
        config.arena.round_seconds,
        config.combat.melee_range,
        config.combat.damage,
        config.combat.cooldown_ms
    );

    let recording = if realtime {
        realtime_round(config).await?
    } else {
        simulated_round(config)
    };

    verify(&recording)
}

/// Autopilot round on simulated time.
fn simulated_round(config: GameConfig) -> Recording {
    info!("=== Simulated Round ===");
    let round = simulate_round(config, SimTime::from_secs(120));
    report(&round.controller);
    round.recording
}

fn report(controller: &HeadlessController) {
    let state = controller.state();
    info!("Scene: {}", state.scene);
    match controller.outcome() {
        Some(outcome) => info!("Outcome: {}", outcome.text()),
        None => warn!("Round did not finish"),
    }
    info!(
        "Player HP {} / Enemy HP {} / {} s left",
        state.player.health.get(),
        state.enemy.health.get(),
        state.timer
    );
    info!("Frames rendered: {}", controller.renderer().frames());
    info!("Sound cues: {}", controller.sound().total());
    info!("Final State Hash: {}", hex::encode(state.compute_hash()));
}

/// Autopilot round against the wall clock.
async fn realtime_round(config: GameConfig) -> Result<Recording> {
    info!("=== Real-Time Round ===");
    let initial = RenderSnapshot::capture(&GameState::new(config.arena.clone()));
    let (renderer, mut frames) = WatchRenderer::channel(initial);
    let controller = LifecycleController::new(
        config.clone(),
        SoundBoard::new(&config.audio),
        renderer,
        Fade::new(config.transition_ms),
    );

    let (tx, rx) = mpsc::channel(64);
    let driver = tokio::spawn(Driver::new(controller, rx).with_recording().run());

    let started = tokio::time::Instant::now();
    let mut pilot = Autopilot::for_config(&config);
    tx.send(HostCommand::Start).await?;

    let limit = Duration::from_millis(config.transition_ms * 3)
        + Duration::from_secs(u64::from(config.arena.round_seconds));
    while started.elapsed() < limit {
        if frames.changed().await.is_err() {
            break;
        }
        let frame = frames.borrow_and_update().clone();
        if frame.scene == Scene::GameOver {
            break;
        }
        let now = SimTime::from_millis(started.elapsed().as_millis() as u64);
        if let Some(Action::KeyDown(key)) = pilot.next_action(&frame, now) {
            tx.send(HostCommand::KeyDown(key)).await?;
        }
    }

    // Let the results fade finish before stopping.
    tokio::time::sleep(Duration::from_millis(config.transition_ms + 50)).await;
    tx.send(HostCommand::Shutdown).await?;
    let summary = driver.await?;

    info!("Scene: {}", summary.scene);
    match summary.outcome {
        Some(outcome) => info!("Outcome: {}", outcome.text()),
        None => warn!("Round did not finish"),
    }
    info!("Commands: {} ({} rejected)", summary.commands, summary.rejected);
    info!("Final State Hash: {}", hex::encode(summary.state_hash));

    summary.recording.context("driver returned no recording")
}

/// Round-trip the recording through bincode and replay it.
fn verify(recording: &Recording) -> Result<()> {
    info!("=== Verifying Determinism ===");
    let bytes = recording.to_bytes()?;
    info!("Recording {}: {} actions, {} bytes", recording.id, recording.entries.len(), bytes.len());
    info!("Input fingerprint: {}", short_hex(&recording.fingerprint()?));

    let decoded = Recording::from_bytes(&bytes)?;
    let replay = decoded.replay();
    info!("Replay State Hash: {}", hex::encode(replay.state_hash));

    if Some(replay.state_hash) == recording.final_hash {
        info!("DETERMINISM VERIFIED: Hashes match!");
        Ok(())
    } else {
        bail!("DETERMINISM FAILURE: Hashes differ!")
    }
}
