// THEORY:
// Frame acquisition sits behind the `CaptureDevice` trait so the tick driver
// never depends on a particular camera backend. The OpenCV camera lives in the
// `camera_tester` crate; this module ships a synthetic camera that paints a red
// square drifting across a dark background, used by the headless demo runner
// and by the tests.

use crate::core_modules::frame::Frame;
use crate::error::Result;
use image::Rgb;

/// A source of color frames.
///
/// `read` may legitimately return an empty (zero-sized) frame when the device
/// had nothing to deliver; callers skip such ticks.
pub trait CaptureDevice: Send + 'static {
    /// Opens the device at `index`. `Ok(false)` means it is not available.
    fn open(&mut self, index: i32) -> Result<bool>;
    fn is_opened(&self) -> bool;
    fn read(&mut self) -> Result<Frame>;
    fn release(&mut self) -> Result<()>;
}

const BACKGROUND: Rgb<u8> = Rgb([30, 30, 30]);
const TARGET: Rgb<u8> = Rgb([220, 20, 20]);

/// A fake camera showing a red square that bounces around the frame.
#[derive(Debug, Clone)]
pub struct SyntheticCamera {
    width: u32,
    height: u32,
    square: u32,
    step: i32,
    available: bool,
    opened: bool,
    /// Every n-th read returns an empty frame, like a camera dropping a frame.
    empty_every: Option<u64>,
    frames_served: u64,
    position: (i32, i32),
    velocity: (i32, i32),
}

impl SyntheticCamera {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            square: 50,
            step: 4,
            available: true,
            opened: false,
            empty_every: None,
            frames_served: 0,
            position: (100, 100),
            velocity: (1, 1),
        }
    }

    /// A camera whose `open` always reports the device as missing.
    pub fn unavailable() -> Self {
        Self {
            available: false,
            ..Self::new(0, 0)
        }
    }

    pub fn with_square(mut self, size: u32, at: (i32, i32)) -> Self {
        self.square = size;
        self.position = at;
        self
    }

    /// Pixels the square moves per frame; 0 keeps it still.
    pub fn with_step(mut self, step: i32) -> Self {
        self.step = step;
        self
    }

    pub fn with_empty_every(mut self, n: u64) -> Self {
        self.empty_every = (n > 0).then_some(n);
        self
    }

    pub fn frames_served(&self) -> u64 {
        self.frames_served
    }

    fn advance(&mut self) {
        let max_x = self.width as i32 - self.square as i32;
        let max_y = self.height as i32 - self.square as i32;
        let (mut x, mut y) = (
            self.position.0 + self.velocity.0 * self.step,
            self.position.1 + self.velocity.1 * self.step,
        );
        if x < 0 || x > max_x {
            self.velocity.0 = -self.velocity.0;
            x = x.clamp(0, max_x.max(0));
        }
        if y < 0 || y > max_y {
            self.velocity.1 = -self.velocity.1;
            y = y.clamp(0, max_y.max(0));
        }
        self.position = (x, y);
    }

    fn paint(&self) -> Frame {
        let (x0, y0) = self.position;
        let size = self.square as i32;
        Frame::from_fn(self.width, self.height, |x, y| {
            let (x, y) = (x as i32, y as i32);
            if x >= x0 && x < x0 + size && y >= y0 && y < y0 + size {
                TARGET
            } else {
                BACKGROUND
            }
        })
    }
}

impl CaptureDevice for SyntheticCamera {
    fn open(&mut self, _index: i32) -> Result<bool> {
        self.opened = self.available;
        Ok(self.opened)
    }

    fn is_opened(&self) -> bool {
        self.opened
    }

    fn read(&mut self) -> Result<Frame> {
        if !self.opened {
            return Ok(Frame::new(0, 0));
        }
        self.frames_served += 1;
        if self.empty_every.is_some_and(|n| self.frames_served % n == 0) {
            return Ok(Frame::new(0, 0));
        }
        let frame = self.paint();
        self.advance();
        Ok(frame)
    }

    fn release(&mut self) -> Result<()> {
        self.opened = false;
        Ok(())
    }
}
