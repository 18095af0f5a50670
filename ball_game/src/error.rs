use thiserror::Error;

/// Every failure the ball game can report. None of them is fatal to the tick
/// loop: a failing tick is logged and abandoned, the next one runs normally.
#[derive(Debug, Error)]
pub enum GameError {
    /// The capture device at `index` could not be opened.
    #[error("impossible to open the camera connection (device {index})")]
    DeviceUnavailable { index: i32 },

    /// The capture backend failed while opening, reading or releasing.
    #[error("capture failed: {0}")]
    Capture(String),

    /// The presentation side is gone (its render channel was closed).
    #[error("presentation surface unavailable: {0}")]
    Presentation(String),

    /// A tick did not complete: it panicked or was cancelled mid-flight.
    #[error("frame elaboration failed: {0}")]
    WorkerFailed(String),
}

pub type Result<T> = std::result::Result<T, GameError>;
