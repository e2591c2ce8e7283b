//! Physics bodies: Ball and Paddle.
//!
//! Playfield coordinates: origin at the bottom-left corner, y grows upward.
//! Both bodies are axis-aligned boxes described by their center.
//!
//! Each body only knows about the playfield walls. Ball/paddle contact and
//! the loss condition belong to the session step (see `sim::step`).

/// Ball diameter (the ball is drawn as a circle inside this box).
pub const BALL_SIZE: f32 = 20.0;
/// Per-tick speed on each axis before the speed multiplier is applied.
pub const BALL_BASE_SPEED: f32 = 5.0;

pub const PADDLE_W: f32 = 80.0;
pub const PADDLE_H: f32 = 20.0;

// ── Ball ──

#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Ball {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
}

impl Ball {
    /// New ball at `(x, y)` heading down and to the right.
    pub fn new(x: f32, y: f32, speed_multiplier: f32) -> Self {
        Ball {
            x,
            y,
            vx: BALL_BASE_SPEED * speed_multiplier,
            vy: -BALL_BASE_SPEED * speed_multiplier,
        }
    }

    pub fn left(&self) -> f32 { self.x - BALL_SIZE / 2.0 }
    pub fn right(&self) -> f32 { self.x + BALL_SIZE / 2.0 }
    pub fn top(&self) -> f32 { self.y + BALL_SIZE / 2.0 }
    pub fn bottom(&self) -> f32 { self.y - BALL_SIZE / 2.0 }

    /// Advance one tick and reflect off the side walls and the ceiling.
    ///
    /// There is no floor: a ball that leaves through the bottom stays gone.
    /// Returns true if any wall reflection happened this tick.
    pub fn update(&mut self, width: f32, height: f32) -> bool {
        self.x += self.vx;
        self.y += self.vy;

        let mut bounced = false;
        if self.left() <= 0.0 || self.right() >= width {
            self.vx = -self.vx;
            bounced = true;
        }
        if self.top() >= height {
            self.vy = -self.vy;
            bounced = true;
        }
        bounced
    }
}

// ── Paddle ──

/// The player's paddle. Moves horizontally only.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Paddle {
    pub x: f32,
    pub y: f32,
    /// Commanded horizontal velocity; kept as-is when the paddle hits a wall.
    pub vx: f32,
}

impl Paddle {
    pub fn new(x: f32, y: f32) -> Self {
        Paddle { x, y, vx: 0.0 }
    }

    pub fn left(&self) -> f32 { self.x - PADDLE_W / 2.0 }
    pub fn right(&self) -> f32 { self.x + PADDLE_W / 2.0 }
    pub fn top(&self) -> f32 { self.y + PADDLE_H / 2.0 }

    /// Advance one tick, then hard-stop at the side walls.
    pub fn update(&mut self, width: f32) {
        self.x += self.vx;
        if self.left() < 0.0 {
            self.x = PADDLE_W / 2.0;
        }
        if self.right() > width {
            self.x = width - PADDLE_W / 2.0;
        }
    }
}
