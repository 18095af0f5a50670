// THEORY:
// The frame module holds the plain data that flows through one tick: the color
// frame coming off the camera, the single-channel masks derived from it, and the
// small geometric types (points, rectangles, contours) extracted from the masks.
// Everything here is ephemeral: created fresh each tick, discarded after render.

use image::{GrayImage, RgbImage};

/// A 3-channel color frame, stored as RGB.
pub type Frame = RgbImage;

/// A single-channel binary mask: 0 is clear, [`MASK_SET`] is set.
pub type Mask = GrayImage;

pub const MASK_SET: u8 = 255;
pub const MASK_CLEAR: u8 = 0;

/// True when a capture returned no usable data.
pub fn is_empty(frame: &Frame) -> bool {
    frame.width() == 0 || frame.height() == 0
}

/// Mirrors the frame left-to-right so the preview behaves like a mirror.
pub fn mirror(frame: &mut Frame) {
    image::imageops::flip_horizontal_in_place(frame);
}

/// An integer point in frame coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// An axis-aligned rectangle. `width`/`height` count pixels, so a single pixel
/// has a 1×1 rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BoundingRect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl BoundingRect {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self { x, y, width, height }
    }

    /// The smallest rectangle enclosing every point. `None` for no points.
    pub fn enclosing(points: &[Point]) -> Option<Self> {
        let first = points.first()?;
        let (mut min_x, mut min_y, mut max_x, mut max_y) = (first.x, first.y, first.x, first.y);
        for p in &points[1..] {
            min_x = min_x.min(p.x);
            min_y = min_y.min(p.y);
            max_x = max_x.max(p.x);
            max_y = max_y.max(p.y);
        }
        Some(Self::new(min_x, min_y, max_x - min_x + 1, max_y - min_y + 1))
    }

    /// Rectangle-center approximation of the region's centroid.
    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2, self.y + self.height / 2)
    }

    /// True iff `p` lies strictly inside the rectangle; points on the edge do not count.
    pub fn contains_strictly(&self, p: Point) -> bool {
        p.x > self.x && p.x < self.x + self.width && p.y > self.y && p.y < self.y + self.height
    }
}

/// The ordered boundary points of one connected mask region.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Contour {
    pub points: Vec<Point>,
}

impl Contour {
    pub fn new(points: Vec<Point>) -> Self {
        Self { points }
    }

    pub fn bounding_rect(&self) -> Option<BoundingRect> {
        BoundingRect::enclosing(&self.points)
    }
}
