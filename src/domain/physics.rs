//! Contact rules between bodies and the playfield.
//!
//! These are pure queries. Applying their result (reflecting the ball,
//! ending the run) is the session step's job.

use super::entity::{Ball, Paddle};

/// Playfield size in field units.
pub const FIELD_W: f32 = 800.0;
pub const FIELD_H: f32 = 600.0;

/// Does the paddle catch the ball this tick?
///
/// The ball's bottom must be at or below the paddle's top edge and the
/// ball's center must lie within the paddle's span (inclusive).
/// There is deliberately no lower bound on the ball's height.
pub fn paddle_catches(ball: &Ball, paddle: &Paddle) -> bool {
    ball.bottom() <= paddle.top()
        && paddle.left() <= ball.x
        && ball.x <= paddle.right()
}

/// Has the ball completely left the field through the bottom?
pub fn ball_lost(ball: &Ball) -> bool {
    ball.top() < 0.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ball_at(x: f32, y: f32) -> Ball {
        Ball { x, y, vx: 0.0, vy: -5.0 }
    }

    #[test]
    fn catch_on_paddle_top() {
        let p = Paddle::new(400.0, 120.0); // top = 130
        assert!(paddle_catches(&ball_at(400.0, 140.0), &p));
        assert!(!paddle_catches(&ball_at(400.0, 140.5), &p));
    }

    #[test]
    fn catch_span_is_inclusive() {
        let p = Paddle::new(400.0, 120.0); // span 360..=440
        assert!(paddle_catches(&ball_at(360.0, 135.0), &p));
        assert!(paddle_catches(&ball_at(440.0, 135.0), &p));
        assert!(!paddle_catches(&ball_at(359.9, 135.0), &p));
        assert!(!paddle_catches(&ball_at(440.1, 135.0), &p));
    }

    #[test]
    fn catch_has_no_lower_bound() {
        let p = Paddle::new(400.0, 120.0);
        assert!(paddle_catches(&ball_at(400.0, 20.0), &p));
    }

    #[test]
    fn lost_only_when_fully_below() {
        assert!(!ball_lost(&ball_at(400.0, 0.0)));
        assert!(!ball_lost(&ball_at(400.0, -10.0))); // top exactly 0
        assert!(ball_lost(&ball_at(400.0, -10.5)));
    }
}
