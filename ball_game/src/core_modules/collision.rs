// THEORY:
// Collision is a two-state machine evaluated once per tick.
//
// *   `Idle -> Contacted`: the ball position lies strictly inside some detected
//     bounding rectangle. The ball reverses (both velocity components negated)
//     exactly once, no matter how many rectangles contain it.
// *   `Contacted -> Idle`: unconditional, at the end of the same tick.
//
// The flag is not debounced per object. If the ball is still strictly inside a
// rectangle on the next tick it reverses again, which makes it wobble in place
// while the tracked object sits on top of it.

use crate::core_modules::ball::Ball;
use crate::core_modules::contour_extractor::Detection;
use crate::core_modules::frame::Point;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ContactState {
    #[default]
    Idle,
    Contacted,
}

impl ContactState {
    /// Checks the ball against every detection in order, reverses it on the
    /// first strict hit, and returns whether a reversal happened. The state is
    /// back to `Idle` when this returns.
    pub fn resolve(&mut self, ball: &mut Ball, detections: &[Detection]) -> bool {
        let position = Point::new(ball.x, ball.y);
        let mut bounced = false;

        for detection in detections {
            if *self == ContactState::Idle && detection.rect.contains_strictly(position) {
                ball.reverse();
                *self = ContactState::Contacted;
                bounced = true;
            }
        }

        *self = ContactState::Idle;
        bounced
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_modules::frame::{BoundingRect, Contour};

    fn detection(rect: BoundingRect) -> Detection {
        Detection {
            contour: Contour::default(),
            center: rect.center(),
            rect,
        }
    }

    #[test]
    fn ball_inside_a_rect_reverses() {
        let mut state = ContactState::Idle;
        let mut ball = Ball::new(640, 480);
        let hits = [detection(BoundingRect::new(80, 80, 50, 50))];

        assert!(state.resolve(&mut ball, &hits));
        assert_eq!((ball.dx, ball.dy), (-5, -5));
        assert_eq!(state, ContactState::Idle);
    }

    #[test]
    fn ball_on_the_edge_does_not_reverse() {
        let mut state = ContactState::Idle;
        let mut ball = Ball::new(640, 480);
        let edge = [detection(BoundingRect::new(100, 50, 50, 100))];

        assert!(!state.resolve(&mut ball, &edge));
        assert_eq!((ball.dx, ball.dy), (5, 5));
    }

    #[test]
    fn overlapping_rects_reverse_only_once_per_tick() {
        let mut state = ContactState::Idle;
        let mut ball = Ball::new(640, 480);
        let hits = [
            detection(BoundingRect::new(80, 80, 50, 50)),
            detection(BoundingRect::new(90, 90, 30, 30)),
        ];

        assert!(state.resolve(&mut ball, &hits));
        assert_eq!((ball.dx, ball.dy), (-5, -5));
    }

    #[test]
    fn sustained_overlap_retriggers_every_tick() {
        let mut state = ContactState::Idle;
        let mut ball = Ball::new(640, 480);
        ball.dx = 1;
        ball.dy = 1;
        let hits = [detection(BoundingRect::new(0, 0, 640, 480))];

        let mut reversals = 0;
        for _ in 0..5 {
            if state.resolve(&mut ball, &hits) {
                reversals += 1;
            }
            ball.step();
        }
        assert_eq!(reversals, 5);
        // Reversing every tick makes the ball oscillate around its start.
        assert!((ball.x - 100).abs() <= 1 && (ball.y - 100).abs() <= 1);
    }

    #[test]
    fn no_detections_leave_the_ball_alone() {
        let mut state = ContactState::Idle;
        let mut ball = Ball::new(640, 480);
        assert!(!state.resolve(&mut ball, &[]));
        assert_eq!(ball, Ball::new(640, 480));
    }
}
