// THEORY:
// The ball is the only piece of game state that outlives a tick. It moves by
// its velocity once per tick and bounces off the field edges.
//
// Bounces flip the velocity sign instead of clamping the position. The edge
// test runs on the already-moved position, so the ball may overshoot an edge by
// at most one step before heading back in.

pub const DEFAULT_RADIUS: i32 = 15;
pub const DEFAULT_POSITION: (i32, i32) = (100, 100);
pub const DEFAULT_VELOCITY: (i32, i32) = (5, 5);

/// Position, velocity and size of the ball plus the field it bounces in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ball {
    pub x: i32,
    pub y: i32,
    pub dx: i32,
    pub dy: i32,
    pub radius: i32,
    pub field_width: i32,
    pub field_height: i32,
}

impl Ball {
    /// A ball at the default start position, sized for the given field.
    pub fn new(field_width: i32, field_height: i32) -> Self {
        Self::with_radius(field_width, field_height, DEFAULT_RADIUS)
    }

    pub fn with_radius(field_width: i32, field_height: i32, radius: i32) -> Self {
        Self {
            x: DEFAULT_POSITION.0,
            y: DEFAULT_POSITION.1,
            dx: DEFAULT_VELOCITY.0,
            dy: DEFAULT_VELOCITY.1,
            radius,
            field_width,
            field_height,
        }
    }

    /// Overwrites the speed on both axes while keeping the direction:
    /// negative components stay negative, everything else becomes positive.
    pub fn apply_speed(&mut self, speed: i32) {
        let speed = speed.abs();
        self.dx = if self.dx < 0 { -speed } else { speed };
        self.dy = if self.dy < 0 { -speed } else { speed };
    }

    /// Bounces back the way it came.
    pub fn reverse(&mut self) {
        self.dx = -self.dx;
        self.dy = -self.dy;
    }

    /// Advances one tick and reflects the velocity of any axis that left the field.
    pub fn step(&mut self) {
        self.x += self.dx;
        self.y += self.dy;

        if self.x < self.radius {
            self.dx = -self.dx;
        }
        if self.x >= self.field_width - self.radius {
            self.dx = -self.dx;
        }
        if self.y < self.radius {
            self.dy = -self.dy;
        }
        if self.y >= self.field_height - self.radius {
            self.dy = -self.dy;
        }
    }

    pub fn position(&self) -> (i32, i32) {
        (self.x, self.y)
    }
}
