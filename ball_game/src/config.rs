// THEORY:
// Start-up configuration. Everything the player tunes at runtime goes through
// the sliders (see `controls`); this covers what is fixed for a session: which
// camera to open, the tick cadence, and the pipeline constants.
//
// Defaults reproduce the classic game (device 0, ~30 ticks per second, a
// 640×480 field). Environment variables can override them, and the camera
// binary layers its command line flags on top.

use crate::pipeline::PipelineConfig;
use std::str::FromStr;
use std::time::Duration;
use tracing::warn;

pub const ENV_DEVICE: &str = "BALL_GAME_DEVICE";
pub const ENV_TICK_MS: &str = "BALL_GAME_TICK_MS";
pub const ENV_GRACE_MS: &str = "BALL_GAME_GRACE_MS";
pub const ENV_FIELD: &str = "BALL_GAME_FIELD";
pub const ENV_MIRROR: &str = "BALL_GAME_MIRROR";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameConfig {
    /// Index of the capture device to open.
    pub device_index: i32,
    /// Period of the tick timer.
    pub tick_period: Duration,
    /// How long stopping waits for an in-flight tick before releasing the device anyway.
    pub shutdown_grace: Duration,
    /// Render requests the presentation queue holds before dropping new ones.
    pub render_queue_depth: usize,
    pub pipeline: PipelineConfig,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            device_index: 0,
            tick_period: Duration::from_millis(33),
            shutdown_grace: Duration::from_millis(33),
            render_queue_depth: 2,
            pipeline: PipelineConfig::default(),
        }
    }
}

impl GameConfig {
    /// Defaults overlaid with any `BALL_GAME_*` environment variables.
    pub fn from_env() -> Self {
        Self::default().overlay(|key| std::env::var(key).ok())
    }

    /// Overlays values found through `lookup`. Unparseable values are logged and ignored.
    pub fn overlay(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(index) = parse_var::<i32>(&lookup, ENV_DEVICE) {
            self.device_index = index;
        }
        if let Some(ms) = parse_var::<u64>(&lookup, ENV_TICK_MS).filter(|ms| *ms > 0) {
            self.tick_period = Duration::from_millis(ms);
        }
        if let Some(ms) = parse_var::<u64>(&lookup, ENV_GRACE_MS) {
            self.shutdown_grace = Duration::from_millis(ms);
        }
        if let Some(raw) = lookup(ENV_FIELD) {
            match parse_field(&raw) {
                Some((width, height)) => {
                    self.pipeline.field_width = width;
                    self.pipeline.field_height = height;
                }
                None => warn!(var = ENV_FIELD, value = %raw, "expected WIDTHxHEIGHT, ignoring"),
            }
        }
        if let Some(mirror) = parse_var::<bool>(&lookup, ENV_MIRROR) {
            self.pipeline.mirror = mirror;
        }
        self
    }
}

fn parse_var<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T> {
    let raw = lookup(key)?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!(var = key, value = %raw, "unparseable value, ignoring");
            None
        }
    }
}

/// Parses `WIDTHxHEIGHT`, e.g. `640x480`.
pub fn parse_field(raw: &str) -> Option<(i32, i32)> {
    let (w, h) = raw.trim().split_once(['x', 'X'])?;
    let (w, h) = (w.trim().parse::<i32>().ok()?, h.trim().parse::<i32>().ok()?);
    (w > 0 && h > 0).then_some((w, h))
}
