// THEORY:
// Rendering composites the tick's results onto the color frame shown to the
// player: the outline of every tracked region, a crosshair on each centroid and
// the ball itself. Drawing primitives come from `imageproc::drawing`.
//
// Text is the one thing not rasterized here: it needs a font, which only the
// presentation layer has. The renderer returns `Label`s instead and the
// presenter draws them on top of the frame.

use crate::core_modules::ball::Ball;
use crate::core_modules::contour_extractor::Detection;
use crate::core_modules::frame::{Frame, Point};
use image::Rgb;
use imageproc::drawing::{draw_filled_circle_mut, draw_hollow_circle_mut, draw_line_segment_mut};

pub const CONTOUR_COLOR: Rgb<u8> = Rgb([0, 0, 250]);
pub const CROSSHAIR_COLOR: Rgb<u8> = Rgb([0, 255, 0]);
pub const LABEL_COLOR: Rgb<u8> = Rgb([0, 0, 255]);
pub const BALL_COLOR: Rgb<u8> = Rgb([255, 0, 255]);

const CROSSHAIR_RADIUS: i32 = 20;
const CROSSHAIR_ARM: i32 = 25;
const STROKE: i32 = 2;

/// A piece of text the presentation layer should draw at `origin` (baseline start).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Label {
    pub text: String,
    pub origin: Point,
    pub color: Rgb<u8>,
}

/// Draws outlines, crosshairs and the ball onto `frame` and returns the text
/// labels that still need drawing.
pub fn render(frame: &mut Frame, detections: &[Detection], ball: &Ball) -> Vec<Label> {
    for detection in detections {
        draw_outline(frame, &detection.contour.points, CONTOUR_COLOR);
    }

    let mut labels = Vec::with_capacity(detections.len());
    for detection in detections {
        draw_crosshair(frame, detection.center);
        labels.push(Label {
            text: detection.label(),
            origin: detection.center,
            color: LABEL_COLOR,
        });
    }

    draw_filled_circle_mut(frame, (ball.x, ball.y), ball.radius, BALL_COLOR);
    labels
}

/// Closed polyline through `points`.
fn draw_outline(frame: &mut Frame, points: &[Point], color: Rgb<u8>) {
    match points {
        [] => {}
        [only] => draw_line_segment_mut(frame, as_f32(*only), as_f32(*only), color),
        _ => {
            for (a, b) in points.iter().zip(points.iter().cycle().skip(1)) {
                draw_line_segment_mut(frame, as_f32(*a), as_f32(*b), color);
            }
        }
    }
}

fn draw_crosshair(frame: &mut Frame, center: Point) {
    for t in 0..STROKE {
        draw_hollow_circle_mut(frame, (center.x, center.y), CROSSHAIR_RADIUS - t, CROSSHAIR_COLOR);
    }
    let arms = [
        Point::new(center.x, center.y - CROSSHAIR_ARM),
        Point::new(center.x, center.y + CROSSHAIR_ARM),
        Point::new(center.x - CROSSHAIR_ARM, center.y),
        Point::new(center.x + CROSSHAIR_ARM, center.y),
    ];
    for end in arms {
        draw_thick_line(frame, center, end, STROKE, CROSSHAIR_COLOR);
    }
}

/// Draws `thickness` parallel segments, offset across the dominant direction.
fn draw_thick_line(frame: &mut Frame, a: Point, b: Point, thickness: i32, color: Rgb<u8>) {
    let horizontal = (b.x - a.x).abs() >= (b.y - a.y).abs();
    for t in 0..thickness {
        let offset = t - thickness / 2;
        let (da, db) = if horizontal {
            (Point::new(a.x, a.y + offset), Point::new(b.x, b.y + offset))
        } else {
            (Point::new(a.x + offset, a.y), Point::new(b.x + offset, b.y))
        };
        draw_line_segment_mut(frame, as_f32(da), as_f32(db), color);
    }
}

fn as_f32(p: Point) -> (f32, f32) {
    (p.x as f32, p.y as f32)
}
