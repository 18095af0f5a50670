// Headless runner: plays the game against the synthetic camera and reports
// through the log. The windowed game with a real webcam is `camera_tester`.
//
// Usage: ball_game [seconds]     (RUST_LOG=debug for per-frame output)

use anyhow::Context;
use ball_game::presenter::{self, sync_toggle};
use ball_game::{CameraSession, Controls, GameConfig, LogPresenter, RenderSender, SyntheticCamera};
use std::time::Duration;
use tokio::sync::watch;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_thread_names(true)
        .init();

    let seconds: u64 = match std::env::args().nth(1) {
        Some(raw) => raw
            .parse()
            .with_context(|| format!("run length must be whole seconds, got {raw}"))?,
        None => 5,
    };

    // --- 1. Setup ---
    let config = GameConfig::from_env();
    let camera = SyntheticCamera::new(
        config.pipeline.field_width as u32,
        config.pipeline.field_height as u32,
    );
    // The synthetic target is a saturated red, outside the default yellow range.
    let controls = Controls {
        hue: (0, 10),
        saturation: (100, 255),
        ..Controls::default()
    };
    let (_controls_tx, controls_rx) = watch::channel(controls);
    let (render, mut render_rx) = RenderSender::channel(config.render_queue_depth);
    let mut session = CameraSession::new(config, camera, controls_rx, render);
    let mut presenter = LogPresenter::default();

    // --- 2. Play ---
    let state = session.toggle().await?;
    sync_toggle(&mut presenter, &mut render_rx, state);

    let deadline = tokio::time::Instant::now() + Duration::from_secs(seconds);
    let mut refresh = tokio::time::interval(Duration::from_millis(16));
    while tokio::time::Instant::now() < deadline {
        refresh.tick().await;
        presenter::drain(&mut render_rx, &mut presenter);
    }

    // --- 3. Shutdown ---
    let state = session.toggle().await?;
    sync_toggle(&mut presenter, &mut render_rx, state);

    let ball = session.ball();
    tracing::info!(
        ticks = session.ticks_processed(),
        frames_shown = presenter.frames_shown,
        ball_x = ball.x,
        ball_y = ball.y,
        "game over"
    );
    Ok(())
}
