//! Fixed timestep simulation tick
//!
//! Core game loop that advances simulation deterministically. The caller
//! drives ticks at a fixed rate; each tick sub-steps ball motion and collision
//! resolution for stability at high speed, then does end-of-tick bookkeeping.

use std::cmp::Ordering;

use super::collision::{
    ball_ball_collision, ball_enemy_collision, ball_paddle_collision, ball_wall_collision,
    enemy_paddle_collision, separate_balls,
};
use super::difficulty::{DifficultyPhase, difficulty, enemy_speed};
use super::events::{EventSink, GameEvent, PunchlineEffect};
use super::jokes::PunchlineBook;
use super::state::{Ball, GameState, Paddle};
use crate::consts::*;

/// Input for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Clock reading for this tick (milliseconds)
    pub now_ms: f64,
    /// Where the input handler wants the paddle centered
    pub paddle_center: Option<f32>,
    /// Idle/demo mode - AI steers the paddle when no target is given
    pub idle_mode: bool,
}

impl TickInput {
    pub fn at(now_ms: f64) -> Self {
        Self {
            now_ms,
            ..Default::default()
        }
    }
}

/// Longest lead the autopilot will extrapolate a ball's path
const MAX_LEAD_TICKS: f32 = 600.0;

/// Ball IDs that already produced a bounce event this tick
#[derive(Debug)]
struct BounceSet {
    ids: Vec<u32>,
}

impl BounceSet {
    fn new() -> Self {
        Self {
            ids: Vec::with_capacity(MAX_BALLS),
        }
    }

    fn contains(&self, id: u32) -> bool {
        self.ids.contains(&id)
    }

    /// Returns true if the id was not yet present
    fn insert(&mut self, id: u32) -> bool {
        if self.contains(id) {
            return false;
        }
        self.ids.push(id);
        true
    }
}

/// Advance the game state by one tick
///
/// `state` is left untouched; the next state is returned. Events are reported
/// to `events` as they happen.
pub fn tick<E: EventSink + ?Sized>(
    state: &GameState,
    input: &TickInput,
    book: &PunchlineBook,
    events: &mut E,
) -> GameState {
    let now = input.now_ms;
    let mut next = state.clone();
    let width = next.tuning.arena_width;
    let height = next.tuning.arena_height;

    let paddle_target = input
        .paddle_center
        .or_else(|| input.idle_mode.then(|| autopilot_target(state, now)).flatten());
    if let Some(center) = paddle_target {
        next.paddle.move_to(center, width);
    }

    let phase = difficulty(now, next.game_start_ms).phase;
    let iterations = next.tuning.physics_iterations.max(1);
    let step_scale = phase.ball_speed_multiplier / iterations as f32;
    let mut bounced = BounceSet::new();

    for _ in 0..iterations {
        for ball in &mut next.balls {
            ball.pos += ball.vel * step_scale;
        }

        resolve_ball_pairs(&mut next.balls, &mut bounced, events);

        // Paddle checks use the pre-tick ball: the swept and failsafe passes
        // need the whole frame's trajectory, not a sub-step slice of it
        resolve_boundaries(
            &mut next.balls,
            &state.balls,
            &next.paddle,
            width,
            height,
            &phase,
            &mut bounced,
            events,
        );
    }

    // Undo any residual sub-step overshoot into the side walls or ceiling
    for ball in &mut next.balls {
        ball.pos.x = ball.pos.x.min(width - ball.radius).max(ball.radius);
        ball.pos.y = ball.pos.y.max(ball.radius);
    }

    remove_lost_balls(&mut next, events);
    update_enemies(&mut next, now, &phase, book, events);
    next.paddle.update_size(now);

    next
}

/// Separate and bounce every overlapping pair
fn resolve_ball_pairs<E: EventSink + ?Sized>(
    balls: &mut [Ball],
    bounced: &mut BounceSet,
    events: &mut E,
) {
    for j in 0..balls.len() {
        for k in (j + 1)..balls.len() {
            let (head, tail) = balls.split_at_mut(k);
            let first = &mut head[j];
            let second = &mut tail[0];

            let (first_pos, second_pos) = separate_balls(first, second);
            first.pos = first_pos;
            second.pos = second_pos;

            let Some(response) = ball_ball_collision(first, second) else {
                continue;
            };
            first.vel = response.first;
            second.vel = response.second;

            // One bounce per pair, and only while either ball is still fresh
            let first_fresh = !bounced.contains(first.id);
            let second_fresh = !bounced.contains(second.id);
            if first_fresh || second_fresh {
                let ball_id = if first_fresh { first.id } else { second.id };
                events.emit(GameEvent::Bounce { ball_id });
                bounced.insert(first.id);
                bounced.insert(second.id);
            }
        }
    }
}

/// Walls against the current ball, paddle against the pre-tick snapshot
#[allow(clippy::too_many_arguments)]
fn resolve_boundaries<E: EventSink + ?Sized>(
    balls: &mut [Ball],
    pre_tick: &[Ball],
    paddle: &Paddle,
    width: f32,
    height: f32,
    phase: &DifficultyPhase,
    bounced: &mut BounceSet,
    events: &mut E,
) {
    for (index, ball) in balls.iter_mut().enumerate() {
        let mut hit = false;

        if let Some(vel) = ball_wall_collision(ball, width, height) {
            ball.vel = vel;
            hit = true;
        }

        let paddle_vel = pre_tick
            .get(index)
            .and_then(|original| ball_paddle_collision(original, paddle, height, phase));
        if let Some(vel) = paddle_vel {
            ball.vel = vel;
            hit = true;
        }

        if hit && bounced.insert(ball.id) {
            events.emit(GameEvent::Bounce { ball_id: ball.id });
        }
    }
}

/// Drop balls that fell past the discard line, one life each
fn remove_lost_balls<E: EventSink + ?Sized>(state: &mut GameState, events: &mut E) {
    let discard_line = state.tuning.discard_line();
    let mut lost = Vec::new();
    state.balls.retain(|ball| {
        if ball.pos.y > discard_line {
            lost.push(ball.id);
            false
        } else {
            true
        }
    });

    for ball_id in lost {
        state.lives -= 1;
        log::debug!("Ball {} lost, {} lives left", ball_id, state.lives);
        events.emit(GameEvent::BallLost { ball_id });
    }
}

/// Paddle hits, ball hits, then fall - in spawn order
fn update_enemies<E: EventSink + ?Sized>(
    state: &mut GameState,
    now: f64,
    phase: &DifficultyPhase,
    book: &PunchlineBook,
    events: &mut E,
) {
    let height = state.tuning.arena_height;
    let discard_line = state.tuning.discard_line();
    let enemies = std::mem::take(&mut state.enemies);
    let mut remaining = Vec::with_capacity(enemies.len());

    for mut enemy in enemies {
        if enemy_paddle_collision(&enemy, &state.paddle, height) {
            let until = now + state.tuning.paddle_shrink_ms;
            state.paddle.shrink_until(until);
            log::debug!("Enemy {} ({}) hit the paddle", enemy.id, enemy.text);
            events.emit(GameEvent::PaddleHit {
                enemy_id: enemy.id,
                shrunk_until_ms: until,
            });
            continue;
        }

        if state.balls.iter().any(|ball| ball_enemy_collision(ball, &enemy)) {
            state.score += ENEMY_SCORE;

            let text = match book.punchline(&enemy.text) {
                Some(punchline) => punchline.to_string(),
                None => {
                    log::warn!("No punchline for setup {:?}", enemy.text);
                    enemy.text.clone()
                }
            };
            let effect_id = state.next_entity_id();
            events.emit(GameEvent::Punchline(PunchlineEffect {
                id: effect_id,
                text,
                pos: enemy.pos,
                spawned_at_ms: now,
            }));
            events.emit(GameEvent::Explosion {
                enemy_id: enemy.id,
                pos: enemy.pos,
            });
            log::debug!("Enemy {} destroyed, score {}", enemy.id, state.score);
            continue;
        }

        if enemy.pos.y < discard_line {
            enemy.pos.y += enemy_speed(enemy.speed, phase.enemy_speed_multiplier);
            remaining.push(enemy);
        }
    }

    state.enemies = remaining;
}

/// Paddle center an idle-mode player would aim for
///
/// Tracks the descending ball closest to the paddle, leading it to where it
/// will cross the paddle plane (folding off the side walls), with a slow
/// wobble so the hit point varies and rallies do not loop.
pub fn autopilot_target(state: &GameState, now_ms: f64) -> Option<f32> {
    let by_height = |a: &&Ball, b: &&Ball| a.pos.y.partial_cmp(&b.pos.y).unwrap_or(Ordering::Equal);
    let threat = state
        .balls
        .iter()
        .filter(|b| b.vel.y > 0.0)
        .max_by(by_height)
        .or_else(|| state.balls.iter().max_by(by_height))?;

    let width = state.tuning.arena_width;
    let paddle_top = state.tuning.paddle_top();
    let per_tick = threat.vel * state.current_phase.ball_speed_multiplier;
    let ticks_to_paddle = if per_tick.y > 0.0 {
        ((paddle_top - threat.radius - threat.pos.y) / per_tick.y).clamp(0.0, MAX_LEAD_TICKS)
    } else {
        0.0
    };
    let landing_x = fold_into_arena(
        threat.pos.x + per_tick.x * ticks_to_paddle,
        threat.radius,
        width,
    );

    let time_factor = (now_ms / 1000.0) as f32;
    let wobble = time_factor.sin() * 0.3 + (time_factor * 0.7).sin() * 0.15;
    Some(landing_x + wobble * state.paddle.width * 0.4)
}

/// Reflect an unbounded x coordinate back into `[radius, width - radius]`
fn fold_into_arena(x: f32, radius: f32, width: f32) -> f32 {
    let span = (width - 2.0 * radius).max(1.0);
    let period = 2.0 * span;
    let mut t = (x - radius).rem_euclid(period);
    if t > span {
        t = period - t;
    }
    radius + t
}
