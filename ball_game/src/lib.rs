// THEORY:
// This file is the main entry point for the `ball_game` library crate.
//
// The primary export is `BallGamePipeline`, which turns one camera frame plus the
// current slider values into everything the window shows for that tick. Around
// it sit the pieces that make it a live game: the `CaptureDevice` seam for
// cameras, the `Presenter` seam for windows, and the `CameraSession` that runs
// the tick loop between them. The image processing internals live in
// `core_modules` and are public for callers that want a single stage.

pub mod core_modules;
pub mod pipeline;
pub mod controls;
pub mod capture;
pub mod presenter;
pub mod driver;
pub mod config;
pub mod error;

pub use capture::{CaptureDevice, SyntheticCamera};
pub use config::GameConfig;
pub use controls::{Controls, ToggleState};
pub use driver::CameraSession;
pub use error::{GameError, Result};
pub use pipeline::{BallGamePipeline, PipelineConfig, TickOutcome, TickOutput};
pub use presenter::{LogPresenter, Presenter, RenderRequest, RenderSender};
