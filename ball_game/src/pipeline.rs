// THEORY:
// The `pipeline` module is the top-level API for one tick of the ball game. It
// owns the only state that lives across ticks (the ball and its contact flag)
// and runs a captured frame through every stage in order:
//
//   mirror → segment → clean → extract → collide → speed → move → render
//
// The pipeline is a plain value: the tick driver hands it a frame and the
// current control snapshot, and gets back everything the presentation layer
// needs to update its surfaces. It never touches a device or a window.

use crate::controls::Controls;
use crate::core_modules::ball::{Ball, DEFAULT_RADIUS};
use crate::core_modules::collision::ContactState;
use crate::core_modules::contour_extractor::{self, Detection};
use crate::core_modules::frame::{self, Frame, Mask};
use crate::core_modules::morphology::Cleanup;
use crate::core_modules::render;
use crate::core_modules::segmentation;
use tracing::trace;

// Re-export key data structures for the public API.
pub use crate::core_modules::render::Label;

/// Configuration for the BallGamePipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineConfig {
    /// Width of the play field the ball bounces in, in frame pixels.
    pub field_width: i32,
    /// Height of the play field the ball bounces in, in frame pixels.
    pub field_height: i32,
    pub ball_radius: i32,
    /// Side of the square box blur applied before the HSV conversion.
    pub blur_size: u32,
    pub cleanup: Cleanup,
    /// Flip frames left-to-right before processing, so the player sees a mirror.
    pub mirror: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            field_width: 640,
            field_height: 480,
            ball_radius: DEFAULT_RADIUS,
            blur_size: 7,
            cleanup: Cleanup::default(),
            mirror: true,
        }
    }
}

/// Everything one processed tick produced.
#[derive(Debug, Clone)]
pub struct TickOutput {
    /// The annotated color frame for the main surface.
    pub frame: Frame,
    /// The raw threshold mask.
    pub mask: Mask,
    /// The mask after erode/dilate cleanup.
    pub cleaned: Mask,
    pub detections: Vec<Detection>,
    /// Text still to be drawn onto `frame` by the presenter.
    pub labels: Vec<Label>,
    /// Human readable HSV range that produced `mask`.
    pub range_text: String,
    /// Whether the ball reversed off a tracked object this tick.
    pub bounced: bool,
}

/// The outcome of feeding one frame to the pipeline.
#[derive(Debug, Clone)]
pub enum TickOutcome {
    /// The frame was empty; nothing changed.
    Skipped,
    Rendered(Box<TickOutput>),
}

/// The main, top-level struct for the game.
pub struct BallGamePipeline {
    config: PipelineConfig,
    ball: Ball,
    contact: ContactState,
    ticks_processed: u64,
}

impl BallGamePipeline {
    pub fn new(config: PipelineConfig) -> Self {
        let ball = Ball::with_radius(config.field_width, config.field_height, config.ball_radius);
        Self {
            config,
            ball,
            contact: ContactState::Idle,
            ticks_processed: 0,
        }
    }

    /// Runs one full tick. An empty frame is skipped without touching any state.
    pub fn process_tick(&mut self, mut frame: Frame, controls: &Controls) -> TickOutcome {
        if frame::is_empty(&frame) {
            trace!("empty frame, skipping tick");
            return TickOutcome::Skipped;
        }

        // --- 1. Input Orientation ---
        if self.config.mirror {
            frame::mirror(&mut frame);
        }

        // --- 2. Color Segmentation ---
        let range = controls.range();
        let mask = segmentation::segment(&frame, &range, self.config.blur_size);

        // --- 3. Morphological Cleanup ---
        let cleaned = self.config.cleanup.apply(&mask);

        // --- 4. Contour Extraction ---
        let detections = contour_extractor::extract(&cleaned);

        // --- 5. Collision, Speed, Movement ---
        let bounced = self.contact.resolve(&mut self.ball, &detections);
        self.ball.apply_speed(controls.speed());
        self.ball.step();

        // --- 6. Render ---
        let labels = render::render(&mut frame, &detections, &self.ball);

        self.ticks_processed += 1;
        trace!(
            tick = self.ticks_processed,
            detections = detections.len(),
            bounced,
            ball_x = self.ball.x,
            ball_y = self.ball.y,
            "tick processed"
        );

        TickOutcome::Rendered(Box::new(TickOutput {
            frame,
            mask,
            cleaned,
            detections,
            labels,
            range_text: range.describe(),
            bounced,
        }))
    }

    pub fn ball(&self) -> &Ball {
        &self.ball
    }

    /// Replaces the ball, e.g. to place it for a scripted scenario.
    pub fn set_ball(&mut self, ball: Ball) {
        self.ball = ball;
    }

    pub fn ticks_processed(&self) -> u64 {
        self.ticks_processed
    }
}
