// THEORY:
// The presentation side owns every drawable surface: the live frame, the raw
// mask preview, the cleaned mask preview, the range text and the start/stop
// toggle. It runs on its own (UI) thread.
//
// The tick worker never calls into it directly. It posts `RenderRequest`s on a
// bounded channel with `try_send` and moves on, so a slow UI can drop frames
// but can never stall the tick loop. The UI thread drains the channel and
// applies each request to its `Presenter`.

use crate::core_modules::frame::{Frame, Mask};
use crate::controls::ToggleState;
use crate::error::{GameError, Result};
use crate::pipeline::{Label, TickOutput};
use tokio::sync::mpsc;
use tracing::{debug, info};

/// The drawable surfaces and labels of the game window.
pub trait Presenter {
    /// Shows the annotated frame; `labels` still need to be drawn on top of it.
    fn show_frame(&mut self, frame: &Frame, labels: &[Label]);
    fn show_mask(&mut self, mask: &Mask);
    fn show_cleaned(&mut self, mask: &Mask);
    fn set_range_text(&mut self, text: &str);
    fn set_toggle_label(&mut self, label: &str);
    /// Blanks all three surfaces.
    fn clear(&mut self);
}

/// One processed tick, on its way to the presentation thread.
#[derive(Debug, Clone)]
pub struct RenderRequest {
    /// Sequence number of the tick that produced `output`.
    pub tick: u64,
    pub output: Box<TickOutput>,
}

impl RenderRequest {
    /// Pushes every surface update of this tick into `presenter`.
    pub fn apply(&self, presenter: &mut dyn Presenter) {
        presenter.set_range_text(&self.output.range_text);
        presenter.show_mask(&self.output.mask);
        presenter.show_cleaned(&self.output.cleaned);
        presenter.show_frame(&self.output.frame, &self.output.labels);
    }
}

/// Brings the toggle and surfaces in line with the camera state after a
/// start/stop. Stopping blanks the surfaces and drops queued frames; the worker
/// discards any tick that completes after the stop.
pub fn sync_toggle(
    presenter: &mut dyn Presenter,
    rx: &mut mpsc::Receiver<RenderRequest>,
    state: ToggleState,
) {
    presenter.set_toggle_label(state.label());
    if state == ToggleState::Inactive {
        while rx.try_recv().is_ok() {}
        presenter.clear();
    }
}

/// The worker's handle for posting render requests.
#[derive(Debug, Clone)]
pub struct RenderSender {
    tx: mpsc::Sender<RenderRequest>,
}

impl RenderSender {
    /// Creates a sender/receiver pair holding at most `depth` pending requests.
    pub fn channel(depth: usize) -> (Self, mpsc::Receiver<RenderRequest>) {
        let (tx, rx) = mpsc::channel(depth.max(1));
        (Self { tx }, rx)
    }

    /// Posts without waiting. A full queue drops the request; a closed one is an error.
    pub fn post(&self, request: RenderRequest) -> Result<()> {
        match self.tx.try_send(request) {
            Ok(()) => Ok(()),
            Err(mpsc::error::TrySendError::Full(_)) => {
                debug!("presentation queue full, dropping render request");
                Ok(())
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {
                Err(GameError::Presentation("render channel closed".to_string()))
            }
        }
    }
}

/// Drains every request currently queued into `presenter`. Returns how many were applied.
pub fn drain(rx: &mut mpsc::Receiver<RenderRequest>, presenter: &mut dyn Presenter) -> usize {
    let mut applied = 0;
    while let Ok(request) = rx.try_recv() {
        request.apply(presenter);
        applied += 1;
    }
    applied
}

/// A presenter without a screen: it reports what it would show through the log.
#[derive(Debug, Default)]
pub struct LogPresenter {
    pub frames_shown: u64,
    pub last_range_text: String,
    pub toggle_label: String,
}

impl Presenter for LogPresenter {
    fn show_frame(&mut self, frame: &Frame, labels: &[Label]) {
        self.frames_shown += 1;
        for label in labels {
            debug!(text = %label.text, "label");
        }
        debug!(
            frame = self.frames_shown,
            width = frame.width(),
            height = frame.height(),
            objects = labels.len(),
            "frame shown"
        );
    }

    fn show_mask(&mut self, mask: &Mask) {
        let set = mask.pixels().filter(|p| p[0] > 0).count();
        debug!(set_pixels = set, "mask shown");
    }

    fn show_cleaned(&mut self, mask: &Mask) {
        let set = mask.pixels().filter(|p| p[0] > 0).count();
        debug!(set_pixels = set, "cleaned mask shown");
    }

    fn set_range_text(&mut self, text: &str) {
        if self.last_range_text != text {
            info!("{text}");
            self.last_range_text = text.to_string();
        }
    }

    fn set_toggle_label(&mut self, label: &str) {
        info!(toggle = label, "toggle label changed");
        self.toggle_label = label.to_string();
    }

    fn clear(&mut self) {
        info!("surfaces cleared");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controls::Controls;
    use crate::pipeline::{BallGamePipeline, PipelineConfig, TickOutcome};

    #[derive(Default)]
    struct Recorder {
        calls: Vec<String>,
    }

    impl Presenter for Recorder {
        fn show_frame(&mut self, _frame: &Frame, labels: &[Label]) {
            self.calls.push(format!("frame:{}", labels.len()));
        }
        fn show_mask(&mut self, _mask: &Mask) {
            self.calls.push("mask".into());
        }
        fn show_cleaned(&mut self, _mask: &Mask) {
            self.calls.push("cleaned".into());
        }
        fn set_range_text(&mut self, text: &str) {
            self.calls.push(format!("range:{text}"));
        }
        fn set_toggle_label(&mut self, label: &str) {
            self.calls.push(format!("toggle:{label}"));
        }
        fn clear(&mut self) {
            self.calls.push("clear".into());
        }
    }

    fn tick_output() -> Box<TickOutput> {
        let mut pipeline = BallGamePipeline::new(PipelineConfig::default());
        match pipeline.process_tick(Frame::new(64, 48), &Controls::default()) {
            TickOutcome::Rendered(output) => output,
            TickOutcome::Skipped => panic!("expected a rendered tick"),
        }
    }

    fn request() -> RenderRequest {
        RenderRequest {
            tick: 1,
            output: tick_output(),
        }
    }

    #[test]
    fn tick_request_updates_every_surface() {
        let mut recorder = Recorder::default();
        request().apply(&mut recorder);
        assert_eq!(
            recorder.calls,
            vec![
                "range:Hue range: 20-50. Sat. range: 60-200. Value range: 50-255".to_string(),
                "mask".to_string(),
                "cleaned".to_string(),
                "frame:0".to_string(),
            ]
        );
    }

    #[test]
    fn full_queue_drops_instead_of_blocking() {
        let (sender, mut rx) = RenderSender::channel(1);
        sender.post(request()).unwrap();
        sender.post(request()).unwrap();

        let mut recorder = Recorder::default();
        assert_eq!(drain(&mut rx, &mut recorder), 1);
    }

    #[test]
    fn closed_queue_is_reported() {
        let (sender, rx) = RenderSender::channel(2);
        drop(rx);
        assert!(matches!(sender.post(request()), Err(GameError::Presentation(_))));
    }

    #[test]
    fn stopping_clears_surfaces_and_drops_stale_frames() {
        let (sender, mut rx) = RenderSender::channel(4);
        sender.post(request()).unwrap();

        let mut recorder = Recorder::default();
        sync_toggle(&mut recorder, &mut rx, ToggleState::Inactive);

        assert_eq!(recorder.calls, vec!["toggle:Start Camera".to_string(), "clear".to_string()]);
        assert_eq!(drain(&mut rx, &mut recorder), 0);
    }

    #[test]
    fn starting_only_relabels_the_toggle() {
        let (_sender, mut rx) = RenderSender::channel(4);
        let mut recorder = Recorder::default();
        sync_toggle(&mut recorder, &mut rx, ToggleState::Active);
        assert_eq!(recorder.calls, vec!["toggle:Stop Camera".to_string()]);
    }
}
