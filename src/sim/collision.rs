//! Collision detection and response
//!
//! Pure functions over entity snapshots: circle vs. arena walls, circle vs.
//! paddle (with tunneling guards), circle vs. circle, and box overlap tests for
//! enemies. Nothing here mutates its inputs; callers apply the results.

use std::f32::consts::FRAC_PI_4;

use glam::Vec2;

use super::difficulty::DifficultyPhase;
use super::state::{Ball, Enemy, Paddle};
use crate::consts::*;
use crate::{slope_degrees, with_length};

/// Incidence band (degrees off the wall) that triggers the anti-farming deflection
const FARMING_BAND: std::ops::RangeInclusive<f32> = 85.0..=95.0;

/// Horizontal velocity added at the paddle edges (scaled by hit offset)
const PADDLE_ANGLE_EFFECT: f32 = 6.0;
/// Fraction of incoming speed kept on a paddle bounce
const PADDLE_DAMPING: f32 = 0.9;
/// Vertical floor as a fraction of the phase minimum speed
const PADDLE_VY_FLOOR: f32 = 0.7;
const FAILSAFE_VY_FLOOR: f32 = 0.8;
/// Extra reach of the failsafe catch above the paddle plane
const FAILSAFE_REACH: f32 = 5.0;

/// Ball-ball response tuning (energetic, not elastic)
const BALL_ENERGY_BOOST: f32 = 1.4;
const BALL_MIN_IMPULSE: f32 = 2.0;
const COINCIDENT_KICK: f32 = 1.5;
/// Rounding slack so a pair that `separate_balls` left touching still counts as touching
const CONTACT_SLOP: f32 = 1e-3;

/// New velocities for both balls of a colliding pair
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BallPairVelocities {
    pub first: Vec2,
    pub second: Vec2,
}

/// Which paddle test caught the ball
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaddleHitKind {
    /// Ball already overlaps the paddle's top edge
    Overlap,
    /// Swept path crosses the paddle plane this frame
    Swept,
    /// Last-resort proximity catch
    Failsafe,
}

/// Axis-aligned box
#[derive(Debug, Clone, Copy, PartialEq)]
struct Aabb {
    left: f32,
    right: f32,
    top: f32,
    bottom: f32,
}

impl Aabb {
    fn of_ball(ball: &Ball) -> Self {
        Self {
            left: ball.pos.x - ball.radius,
            right: ball.pos.x + ball.radius,
            top: ball.pos.y - ball.radius,
            bottom: ball.pos.y + ball.radius,
        }
    }

    fn of_enemy(enemy: &Enemy) -> Self {
        Self {
            left: enemy.pos.x - ENEMY_WIDTH / 2.0,
            right: enemy.pos.x + ENEMY_WIDTH / 2.0,
            top: enemy.pos.y - ENEMY_HEIGHT / 2.0,
            bottom: enemy.pos.y + ENEMY_HEIGHT / 2.0,
        }
    }
}

/// Y coordinate of the paddle's top edge
#[inline]
pub fn paddle_top(game_height: f32) -> f32 {
    game_height - PADDLE_FLOOR_OFFSET
}

/// Check a ball against the left, right and top walls.
///
/// Looks one tick ahead (`pos + vel`). Returns the new velocity, with the
/// component normal to each wall hit pointing back into the arena. The floor is
/// open. Near-parallel approaches (85-95 degrees off the wall) are bent to 45
/// degrees at the same speed so a ball cannot settle into a loop that never
/// reaches the paddle.
pub fn ball_wall_collision(ball: &Ball, width: f32, _height: f32) -> Option<Vec2> {
    let next = ball.pos + ball.vel;
    let mut vel = ball.vel;
    let mut hit = false;

    let hits_left = next.x - ball.radius <= 0.0;
    let hits_right = next.x + ball.radius >= width;
    if hits_left || hits_right {
        hit = true;
        let away = if hits_left { 1.0 } else { -1.0 };
        vel.x = ball.vel.x.abs() * away;

        if FARMING_BAND.contains(&slope_degrees(ball.vel.y, ball.vel.x)) {
            let speed = vel.length();
            let vertical = if ball.vel.y > 0.0 { 1.0 } else { -1.0 };
            vel = Vec2::new(
                FRAC_PI_4.cos() * speed * away,
                FRAC_PI_4.sin() * speed * vertical,
            );
        }
    }

    if next.y - ball.radius <= 0.0 {
        hit = true;
        vel.y = ball.vel.y.abs();

        if FARMING_BAND.contains(&slope_degrees(ball.vel.x, ball.vel.y)) {
            let speed = vel.length();
            // Keep any side-wall reflection from this same check
            let horizontal = vel.x.signum();
            vel = Vec2::new(
                FRAC_PI_4.cos() * speed * horizontal,
                FRAC_PI_4.sin() * speed,
            );
        }
    }

    hit.then_some(vel)
}

/// Check a downward-moving ball against the paddle's top edge.
///
/// Three passes in strict precedence guard against tunneling at high speed:
/// overlap, then swept time-of-impact, then a proximity failsafe. The bounce
/// never leaves the ball slower than `phase.min_ball_speed()`.
pub fn ball_paddle_collision(
    ball: &Ball,
    paddle: &Paddle,
    game_height: f32,
    phase: &DifficultyPhase,
) -> Option<Vec2> {
    ball_paddle_hit(ball, paddle, game_height, phase).map(|(vel, _)| vel)
}

/// Like [`ball_paddle_collision`], also reporting which pass fired
pub fn ball_paddle_hit(
    ball: &Ball,
    paddle: &Paddle,
    game_height: f32,
    phase: &DifficultyPhase,
) -> Option<(Vec2, PaddleHitKind)> {
    let top = paddle_top(game_height);

    // Moving up, or already past the paddle's top edge: moving away
    if ball.vel.y <= 0.0 {
        return None;
    }
    let bounds = Aabb::of_ball(ball);
    if bounds.top > top {
        return None;
    }

    let min_speed = phase.min_ball_speed();

    // Pass 1: overlap at the current position
    if bounds.bottom >= top && bounds.right >= paddle.x && bounds.left <= paddle.right() {
        let vel = paddle_bounce(ball, paddle, ball.pos.x, min_speed);
        return Some((vel, PaddleHitKind::Overlap));
    }

    // Pass 2: swept bottom edge crosses the paddle plane this frame. The ball
    // covers `vel * ball_speed_multiplier` per tick, so sweep that far.
    let travel = ball.vel * phase.ball_speed_multiplier;
    let next_bottom = bounds.bottom + travel.y;
    if bounds.bottom <= top && next_bottom >= top {
        let toi = ((top - bounds.bottom) / travel.y).clamp(0.0, 1.0);
        let hit_x = ball.pos.x + travel.x * toi;
        if hit_x + ball.radius >= paddle.x && hit_x - ball.radius <= paddle.right() {
            let vel = paddle_bounce(ball, paddle, hit_x, min_speed);
            return Some((vel, PaddleHitKind::Swept));
        }
    }

    // Pass 3: close enough to the plane and within the padded span
    if ball.pos.y >= top - ball.radius - FAILSAFE_REACH
        && ball.pos.x >= paddle.x - ball.radius
        && ball.pos.x <= paddle.right() + ball.radius
    {
        let vel = Vec2::new(
            ball.vel.x * PADDLE_DAMPING,
            -(min_speed * FAILSAFE_VY_FLOOR).max(ball.vel.y.abs() * PADDLE_DAMPING),
        );
        let vel = if vel.length() < min_speed {
            with_length(vel, min_speed)
        } else {
            vel
        };
        return Some((vel, PaddleHitKind::Failsafe));
    }

    None
}

/// Paddle response: steer by hit position, then restore at least `min_speed`
fn paddle_bounce(ball: &Ball, paddle: &Paddle, hit_x: f32, min_speed: f32) -> Vec2 {
    let normalized = if paddle.width > 0.0 {
        ((hit_x - paddle.x) / paddle.width).clamp(0.0, 1.0)
    } else {
        0.5
    };
    let angle_effect = (normalized - 0.5) * PADDLE_ANGLE_EFFECT;

    let vy = -(min_speed * PADDLE_VY_FLOOR).max(ball.vel.y.abs() * PADDLE_DAMPING);
    let vx = ball.vel.x + angle_effect;

    let target_speed = min_speed.max(ball.speed() * PADDLE_DAMPING);
    with_length(Vec2::new(vx, vy), target_speed)
}

/// Resolve two overlapping balls.
///
/// Fires whenever the circles touch, whatever their approach direction, so
/// balls moving in parallel still get pushed apart. The impulse has a floor and
/// an energy boost; momentum is not conserved.
pub fn ball_ball_collision(first: &Ball, second: &Ball) -> Option<BallPairVelocities> {
    let delta = second.pos - first.pos;
    let distance = delta.length();
    if distance > first.radius + second.radius + CONTACT_SLOP {
        return None;
    }

    if distance == 0.0 {
        return Some(BallPairVelocities {
            first: -first.vel * COINCIDENT_KICK,
            second: -second.vel * COINCIDENT_KICK,
        });
    }

    let normal = delta / distance;
    let approaching = (first.vel - second.vel).dot(normal);
    let impulse = BALL_MIN_IMPULSE.max(approaching.abs()) * BALL_ENERGY_BOOST;

    Some(BallPairVelocities {
        first: first.vel - normal * impulse,
        second: second.vel + normal * impulse,
    })
}

/// Push two overlapping balls apart so they just touch.
///
/// Each ball moves half the overlap along the center line. Coincident centers
/// separate along +x. Non-overlapping balls keep their positions.
pub fn separate_balls(first: &Ball, second: &Ball) -> (Vec2, Vec2) {
    let delta = second.pos - first.pos;
    let distance = delta.length();
    let min_distance = first.radius + second.radius;

    if distance >= min_distance {
        return (first.pos, second.pos);
    }

    let half_overlap = (min_distance - distance) / 2.0;
    let normal = if distance == 0.0 { Vec2::X } else { delta / distance };
    (
        first.pos - normal * half_overlap,
        second.pos + normal * half_overlap,
    )
}

/// Ball bounding box against the enemy's 80x30 box
pub fn ball_enemy_collision(ball: &Ball, enemy: &Enemy) -> bool {
    let b = Aabb::of_ball(ball);
    let e = Aabb::of_enemy(enemy);
    b.right > e.left && b.left < e.right && b.bottom > e.top && b.top < e.bottom
}

/// Enemy box against the paddle rectangle
pub fn enemy_paddle_collision(enemy: &Enemy, paddle: &Paddle, game_height: f32) -> bool {
    let top = paddle_top(game_height);
    let bottom = top + paddle.height;
    let e = Aabb::of_enemy(enemy);
    e.right > paddle.x && e.left < paddle.right() && e.bottom >= top && e.top <= bottom
}
