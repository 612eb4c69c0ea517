//! Simulated game against a scripted camera.
//!
//! A synthetic player picks a secret word and keeps turning toward whichever
//! side of the grid holds it. Events are printed to stdout as JSON lines;
//! logs go to stderr.
//!
//! Environment: the `MINDREAD_*` game settings, plus `MINDREAD_SECRET` to fix
//! the secret word, `MINDREAD_MAX_FRAMES` to bound the run,
//! `MINDREAD_PRINT_ZONES=1` to include per-frame zone events, and
//! `MINDREAD_METRICS=1` to dump Prometheus metrics at the end.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{bail, Context};
use async_trait::async_trait;
use mindread_game::metrics::init_metrics;
use mindread_game::{init_tracing, GameConfig, GameEventSink, GameSession};
use mindread_models::{GameEvent, LandmarkSet, QuadrantPartition, Zone};
use mindread_vision::synthetic::{synthetic_face, ScriptedCamera};
use mindread_vision::{LandmarkSource, SharedCamera, VideoFrame, VisionResult};
use rand::seq::IndexedRandom;
use serde::Serialize;
use tokio::sync::mpsc;
use tracing::info;

const DEFAULT_MAX_FRAMES: u64 = 20_000;

/// Player who always looks toward the side holding the secret.
struct SecretKeeper {
    secret: String,
    layout: Arc<Mutex<Option<QuadrantPartition>>>,
}

impl SecretKeeper {
    fn gaze(&self) -> Zone {
        let layout = match self.layout.lock() {
            Ok(layout) => layout,
            Err(_) => return Zone::None,
        };
        match layout.as_ref().and_then(|p| p.position_of(&self.secret)) {
            Some(position) => position.side().into(),
            None => Zone::Center,
        }
    }
}

#[async_trait]
impl LandmarkSource for SecretKeeper {
    async fn detect(&self, _frame: &VideoFrame) -> VisionResult<Option<LandmarkSet>> {
        Ok(synthetic_face(self.gaze()))
    }

    fn name(&self) -> &'static str {
        "secret_keeper"
    }
}

/// Tracks the on-screen layout for the player and forwards events.
struct LayoutTracker {
    layout: Arc<Mutex<Option<QuadrantPartition>>>,
    out: mpsc::UnboundedSender<GameEvent>,
}

impl GameEventSink for LayoutTracker {
    fn publish(&self, event: GameEvent) {
        if let GameEvent::RoundAdvanced { partition, .. } = &event {
            if let Ok(mut layout) = self.layout.lock() {
                *layout = Some(partition.clone());
            }
        }
        let _ = self.out.send(event);
    }
}

#[derive(Debug, Serialize)]
struct SimSummary {
    session_id: String,
    secret: String,
    winner: Option<String>,
    read_correctly: bool,
    frames: u64,
    confirmations: u64,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing().context("Failed to install tracing subscriber")?;

    let metrics = match std::env::var("MINDREAD_METRICS").as_deref() {
        Ok("1") | Ok("true") => Some(init_metrics().context("Failed to install metrics recorder")?),
        _ => None,
    };

    let config = GameConfig::from_env();
    config.validate()?;
    info!("Game config: {:?}", config);

    let candidates = config.theme.candidates()?;
    let secret = match std::env::var("MINDREAD_SECRET") {
        Ok(secret) => secret,
        Err(_) => candidates
            .words()
            .choose(&mut rand::rng())
            .cloned()
            .context("Theme has no words")?,
    };
    if !candidates.contains(&secret) {
        bail!("Secret word {secret:?} is not in the {} theme", config.theme);
    }

    let max_frames = std::env::var("MINDREAD_MAX_FRAMES")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(DEFAULT_MAX_FRAMES);

    let layout = Arc::new(Mutex::new(None));
    let player = Arc::new(SecretKeeper {
        secret: secret.clone(),
        layout: Arc::clone(&layout),
    });
    let (tx, mut rx) = mpsc::unbounded_channel();
    let sink = Arc::new(LayoutTracker { layout, out: tx });

    let camera = SharedCamera::new(Arc::new(ScriptedCamera::new(
        config.detection.frame_interval,
        max_frames,
    )));

    let printer = tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            if matches!(event, GameEvent::ZoneChanged { .. }) && !print_zone_events() {
                continue;
            }
            match serde_json::to_string(&event) {
                Ok(line) => println!("{line}"),
                Err(e) => tracing::warn!(error = %e, "Failed to serialize event"),
            }
        }
    });

    let mut session = GameSession::start(&config, &camera, player, sink).await?;
    let session_id = session.session_id().to_string();

    let winner = tokio::select! {
        winner = session.wait_for_winner() => winner,
        _ = tokio::signal::ctrl_c() => {
            info!("Received shutdown signal");
            None
        }
    };
    let stats = session.stop().await;

    // The sink is gone once the session is, which closes the channel.
    tokio::time::timeout(Duration::from_secs(1), printer).await.ok();

    let summary = SimSummary {
        session_id,
        read_correctly: winner.as_deref() == Some(secret.as_str()),
        secret,
        winner,
        frames: stats.frames_processed,
        confirmations: stats.confirmations,
    };
    println!("{}", serde_json::to_string(&summary)?);

    if let Some(handle) = metrics {
        eprintln!("{}", handle.render());
    }

    if !summary.read_correctly {
        bail!("Game ended without reading the secret");
    }
    Ok(())
}

fn print_zone_events() -> bool {
    matches!(
        std::env::var("MINDREAD_PRINT_ZONES").as_deref(),
        Ok("1") | Ok("true")
    )
}
