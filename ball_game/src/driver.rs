// THEORY:
// The driver is the tick loop of the game and the start/stop toggle around it.
//
// Key architectural principles:
// 1.  **Single Worker**: while the camera is active exactly one Tokio task owns
//     the tick timer. Each tick (grab → pipeline) runs on the blocking pool and
//     is awaited before the next tick fires, so two ticks never process at once.
// 2.  **Non-blocking Render**: the finished tick is posted to the presentation
//     thread with `try_send`. The worker never waits for the UI to paint.
// 3.  **Fail-soft Ticks**: an empty frame is skipped silently; a capture error
//     or even a panicking tick is logged and that tick is abandoned. The loop
//     keeps going.
// 4.  **Bounded Shutdown**: stopping signals the worker, waits at most the
//     grace period for the in-flight tick, then releases the device no matter
//     what. A tick that outlives the grace period finds the device closed.

use crate::capture::CaptureDevice;
use crate::config::GameConfig;
use crate::controls::{Controls, ToggleState};
use crate::core_modules::ball::Ball;
use crate::error::{GameError, Result};
use crate::pipeline::{BallGamePipeline, TickOutcome, TickOutput};
use crate::presenter::{RenderRequest, RenderSender};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info, trace, warn};

/// Locks a mutex, recovering the data if a panicking tick poisoned it.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

struct Worker {
    stop_tx: watch::Sender<bool>,
    handle: JoinHandle<()>,
}

/// The camera toggle: owns the device, the pipeline and, while active, the tick worker.
pub struct CameraSession<D: CaptureDevice> {
    config: GameConfig,
    device: Arc<Mutex<D>>,
    pipeline: Arc<Mutex<BallGamePipeline>>,
    controls: watch::Receiver<Controls>,
    render: RenderSender,
    state: ToggleState,
    worker: Option<Worker>,
}

impl<D: CaptureDevice> CameraSession<D> {
    pub fn new(
        config: GameConfig,
        device: D,
        controls: watch::Receiver<Controls>,
        render: RenderSender,
    ) -> Self {
        let pipeline = BallGamePipeline::new(config.pipeline.clone());
        Self {
            config,
            device: Arc::new(Mutex::new(device)),
            pipeline: Arc::new(Mutex::new(pipeline)),
            controls,
            render,
            state: ToggleState::Inactive,
            worker: None,
        }
    }

    pub fn state(&self) -> ToggleState {
        self.state
    }

    /// A copy of the current ball state.
    pub fn ball(&self) -> Ball {
        *lock(&self.pipeline).ball()
    }

    pub fn ticks_processed(&self) -> u64 {
        lock(&self.pipeline).ticks_processed()
    }

    /// Shared handle to the capture device.
    pub fn device(&self) -> Arc<Mutex<D>> {
        Arc::clone(&self.device)
    }

    /// Flips between active and inactive and returns the new state. A failed
    /// start leaves the session inactive.
    pub async fn toggle(&mut self) -> Result<ToggleState> {
        match self.state {
            ToggleState::Inactive => self.start().map(|()| self.state),
            ToggleState::Active => {
                self.stop().await;
                Ok(self.state)
            }
        }
    }

    /// Opens the device and spawns the tick worker. Must run inside a Tokio runtime.
    pub fn start(&mut self) -> Result<()> {
        if self.state == ToggleState::Active {
            return Ok(());
        }

        let index = self.config.device_index;
        let opened = {
            let mut device = lock(&self.device);
            device.open(index).inspect_err(|e| error!(error = %e, "camera open failed"))?
                && device.is_opened()
        };
        if !opened {
            error!(device = index, "Impossible to open the camera connection...");
            return Err(GameError::DeviceUnavailable { index });
        }

        let (stop_tx, stop_rx) = watch::channel(false);
        let handle = tokio::spawn(run_worker(
            Arc::clone(&self.device),
            Arc::clone(&self.pipeline),
            self.controls.clone(),
            self.render.clone(),
            self.config.tick_period,
            stop_rx,
        ));
        self.worker = Some(Worker { stop_tx, handle });
        self.state = ToggleState::Active;
        info!(
            device = index,
            period_ms = self.config.tick_period.as_millis() as u64,
            "camera started"
        );
        Ok(())
    }

    /// Stops the worker (waiting at most the grace period) and releases the device.
    pub async fn stop(&mut self) {
        self.state = ToggleState::Inactive;

        if let Some(worker) = self.worker.take() {
            let _ = worker.stop_tx.send(true);
            match tokio::time::timeout(self.config.shutdown_grace, worker.handle).await {
                Ok(Ok(())) => debug!("frame grabber stopped"),
                Ok(Err(e)) => error!(
                    error = %e,
                    "Exception in stopping the frame capture, trying to release the camera now..."
                ),
                Err(_) => warn!(
                    grace_ms = self.config.shutdown_grace.as_millis() as u64,
                    "frame grabber still busy, releasing the camera now..."
                ),
            }
        }

        let device = Arc::clone(&self.device);
        match tokio::task::spawn_blocking(move || lock(&device).release()).await {
            Ok(Ok(())) => info!("camera released"),
            Ok(Err(e)) => error!(error = %e, "camera release failed"),
            Err(e) => error!(error = %e, "camera release did not complete"),
        }
    }
}

impl<D: CaptureDevice> Drop for CameraSession<D> {
    fn drop(&mut self) {
        // Best effort: the worker exits on its next tick and the device is closed.
        if let Some(worker) = self.worker.take() {
            let _ = worker.stop_tx.send(true);
            if let Err(e) = lock(&self.device).release() {
                error!(error = %e, "camera release failed");
            }
        }
    }
}

async fn run_worker<D: CaptureDevice>(
    device: Arc<Mutex<D>>,
    pipeline: Arc<Mutex<BallGamePipeline>>,
    controls: watch::Receiver<Controls>,
    render: RenderSender,
    period: Duration,
    mut stop_rx: watch::Receiver<bool>,
) {
    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut tick: u64 = 0;

    loop {
        tokio::select! {
            biased;
            _ = stop_rx.changed() => break,
            _ = interval.tick() => {}
        }
        tick += 1;

        let snapshot = *controls.borrow();
        let device = Arc::clone(&device);
        let pipeline = Arc::clone(&pipeline);
        let result =
            tokio::task::spawn_blocking(move || grab_and_process(&device, &pipeline, &snapshot))
                .await;

        // A stop that arrived mid-tick has already cleared the surfaces.
        if *stop_rx.borrow() {
            trace!(tick, "stopped while processing, dropping the tick");
            break;
        }

        match result {
            Ok(Ok(Some(output))) => {
                if let Err(e) = render.post(RenderRequest { tick, output }) {
                    warn!(error = %e, "presentation gone, frame grabber exiting");
                    break;
                }
            }
            Ok(Ok(None)) => trace!(tick, "no frame this tick"),
            Ok(Err(e)) => error!(tick, error = %e, "Exception during the frame elaboration"),
            Err(e) => error!(
                tick,
                error = %GameError::WorkerFailed(e.to_string()),
                "tick abandoned"
            ),
        }
    }
    debug!(ticks = tick, "frame grabber exited");
}

/// One tick: read a frame and run it through the pipeline. `None` when there
/// was nothing to show (device closed or empty frame).
fn grab_and_process<D: CaptureDevice>(
    device: &Mutex<D>,
    pipeline: &Mutex<BallGamePipeline>,
    controls: &Controls,
) -> Result<Option<Box<TickOutput>>> {
    let frame = {
        let mut device = lock(device);
        if !device.is_opened() {
            return Ok(None);
        }
        device.read()?
    };

    match lock(pipeline).process_tick(frame, controls) {
        TickOutcome::Skipped => Ok(None),
        TickOutcome::Rendered(output) => Ok(Some(output)),
    }
}
