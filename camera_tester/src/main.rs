// The windowed ball game on a real webcam.
//
// Keys: `s` or space starts/stops the camera, `q` or Esc quits.

mod camera;
mod window;

use anyhow::Context;
use ball_game::config::parse_field;
use ball_game::presenter::{self, sync_toggle};
use ball_game::{CameraSession, Controls, GameConfig, RenderRequest, RenderSender};
use camera::OpenCvCamera;
use clap::Parser;
use opencv::highgui;
use std::time::Duration;
use tokio::runtime::Runtime;
use tokio::sync::{mpsc, watch};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use window::HighGuiPresenter;

const KEY_ESC: i32 = 27;
/// How long each UI iteration waits for a key press.
const UI_POLL_MS: i32 = 15;

#[derive(Debug, Parser)]
#[command(name = "camera_tester", about = "Bounce a ball off anything the camera sees in color.")]
struct Cli {
    /// Capture device index (overrides BALL_GAME_DEVICE).
    #[clap(long, short)]
    device: Option<i32>,

    /// Tick period in milliseconds (overrides BALL_GAME_TICK_MS).
    #[clap(long)]
    tick_ms: Option<u64>,

    /// Play field as WIDTHxHEIGHT (overrides BALL_GAME_FIELD).
    #[clap(long)]
    field: Option<String>,

    /// Show the camera as-is instead of mirrored.
    #[clap(long, default_value = "false")]
    no_mirror: bool,

    /// Start the camera right away instead of waiting for `s`.
    #[clap(long, default_value = "false")]
    autostart: bool,

    #[clap(long, default_value = "info")]
    log_level: String,
}

impl Cli {
    fn apply(&self, mut config: GameConfig) -> anyhow::Result<GameConfig> {
        if let Some(device) = self.device {
            config.device_index = device;
        }
        if let Some(ms) = self.tick_ms.filter(|ms| *ms > 0) {
            config.tick_period = Duration::from_millis(ms);
        }
        if let Some(raw) = &self.field {
            let (width, height) = parse_field(raw)
                .ok_or_else(|| anyhow::anyhow!("--field expects WIDTHxHEIGHT, got {raw}"))?;
            config.pipeline.field_width = width;
            config.pipeline.field_height = height;
        }
        if self.no_mirror {
            config.pipeline.mirror = false;
        }
        Ok(config)
    }
}

/// Starts or stops the camera. A failed start is logged and leaves the game stopped.
fn toggle(
    runtime: &Runtime,
    session: &mut CameraSession<OpenCvCamera>,
    presenter: &mut HighGuiPresenter,
    render_rx: &mut mpsc::Receiver<RenderRequest>,
) {
    if let Err(e) = runtime.block_on(session.toggle()) {
        error!(error = %e, "camera toggle failed");
    }
    sync_toggle(presenter, render_rx, session.state());
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level)),
        )
        .with_thread_names(true)
        .init();

    // --- 1. Setup ---
    let config = cli.apply(GameConfig::from_env())?;
    info!(?config, "starting camera_tester");

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .thread_name("ball-game-worker")
        .build()
        .context("building the tick runtime")?;

    let (controls_tx, controls_rx) = watch::channel(Controls::default());
    let (render, mut render_rx) = RenderSender::channel(config.render_queue_depth);
    let mut session = CameraSession::new(config, OpenCvCamera::default(), controls_rx, render);
    let mut presenter = HighGuiPresenter::open().context("opening the game windows")?;
    sync_toggle(&mut presenter, &mut render_rx, session.state());

    if cli.autostart {
        toggle(&runtime, &mut session, &mut presenter, &mut render_rx);
    }

    // --- 2. UI Loop ---
    loop {
        let current = *controls_tx.borrow();
        let polled = presenter.read_controls(current);
        if polled != current {
            controls_tx.send_replace(polled);
        }

        presenter::drain(&mut render_rx, &mut presenter);

        match highgui::wait_key(UI_POLL_MS)? {
            key if key == 'q' as i32 || key == KEY_ESC => break,
            key if key == 's' as i32 || key == ' ' as i32 => {
                toggle(&runtime, &mut session, &mut presenter, &mut render_rx);
            }
            _ => {}
        }
    }

    // --- 3. Shutdown ---
    runtime.block_on(session.stop());
    highgui::destroy_all_windows().context("closing the game windows")?;
    info!(ticks = session.ticks_processed(), "camera_tester finished");
    Ok(())
}
