//! Game state and core simulation types
//!
//! Everything a tick reads or writes lives here. Between ticks the caller owns
//! the `GameState` and may read or replace it freely.

use std::f32::consts::PI;

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::difficulty::{BASE_BALL_SPEED, DifficultyPhase, difficulty};
use crate::consts::*;
use crate::tuning::Tuning;

/// Which screen the front end is showing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Screen {
    Intro,
    Game,
    GameOver,
}

/// A ball entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ball {
    pub id: u32,
    pub pos: Vec2,
    /// Velocity in pixels per tick (before difficulty scaling)
    pub vel: Vec2,
    pub radius: f32,
}

impl Ball {
    pub fn new(id: u32, pos: Vec2, vel: Vec2) -> Self {
        Self {
            id,
            pos,
            vel,
            radius: BALL_RADIUS,
        }
    }

    #[inline]
    pub fn speed(&self) -> f32 {
        self.vel.length()
    }

    /// True if position and velocity are all finite numbers
    pub fn is_finite(&self) -> bool {
        self.pos.is_finite() && self.vel.is_finite()
    }
}

/// A falling enemy carrying a joke setup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Enemy {
    pub id: u32,
    /// Setup word shown on the enemy
    pub text: String,
    /// Center of the 80x30 hitbox
    pub pos: Vec2,
    /// Base fall speed (pixels/tick), scaled by the phase's enemy multiplier
    pub speed: f32,
}

/// Paddle size state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaddleSize {
    Normal,
    Shrunk,
}

impl PaddleSize {
    pub fn width(self) -> f32 {
        match self {
            PaddleSize::Normal => PADDLE_NORMAL_WIDTH,
            PaddleSize::Shrunk => PADDLE_SHRUNK_WIDTH,
        }
    }
}

/// The player's paddle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Paddle {
    /// Left edge
    pub x: f32,
    pub width: f32,
    pub height: f32,
    /// Clock reading at which the shrink effect wears off
    pub shrink_time_ms: f64,
}

impl Default for Paddle {
    fn default() -> Self {
        Self {
            x: (GAME_WIDTH - PADDLE_NORMAL_WIDTH) / 2.0,
            width: PADDLE_NORMAL_WIDTH,
            height: PADDLE_HEIGHT,
            shrink_time_ms: 0.0,
        }
    }
}

impl Paddle {
    /// Size the paddle should have at the given time
    pub fn size_at(&self, now_ms: f64) -> PaddleSize {
        if now_ms > self.shrink_time_ms {
            PaddleSize::Normal
        } else {
            PaddleSize::Shrunk
        }
    }

    /// Snap width to the shrink timer
    pub fn update_size(&mut self, now_ms: f64) {
        self.width = self.size_at(now_ms).width();
    }

    /// Start (or extend) the shrink effect
    pub fn shrink_until(&mut self, until_ms: f64) {
        self.shrink_time_ms = until_ms;
    }

    /// Center the paddle on `center_x`, keeping it inside the arena
    pub fn move_to(&mut self, center_x: f32, arena_width: f32) {
        let max_x = (arena_width - self.width).max(0.0);
        self.x = (center_x - self.width / 2.0).clamp(0.0, max_x);
    }

    #[inline]
    pub fn center(&self) -> f32 {
        self.x + self.width / 2.0
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }
}

/// Complete game state (deterministic, serializable)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    /// Current screen
    pub screen: Screen,
    /// Score (only ever increases)
    pub score: u64,
    /// Player lives (one per lost ball)
    pub lives: i32,
    /// Active balls (stable order)
    pub balls: Vec<Ball>,
    /// Active enemies (spawn order)
    pub enemies: Vec<Enemy>,
    /// Player paddle
    pub paddle: Paddle,
    /// Intro hold-to-start bookkeeping (owned by the front end)
    pub is_holding: bool,
    pub hold_progress: f32,
    /// Clock reading when the run started
    pub game_start_ms: f64,
    /// Last phase published by `refresh_phase`
    pub current_phase: DifficultyPhase,
    /// Balance knobs for this run
    pub tuning: Tuning,
    /// Next entity ID
    next_id: u32,
}

impl GameState {
    /// Start a run: two balls launched in opposite vertical directions
    pub fn new(seed: u64, now_ms: f64, tuning: Tuning) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let phase = difficulty(now_ms, now_ms).phase;
        let width = tuning.arena_width;
        let height = tuning.arena_height;

        let mut state = Self::empty(now_ms, tuning);
        state.current_phase = phase.clone();

        let launches = [(0.4, true), (0.6, false)];
        for (fraction, goes_up) in launches {
            let id = state.next_entity_id();
            let vel = launch_velocity(&mut rng, goes_up, phase.ball_speed_multiplier);
            state
                .balls
                .push(Ball::new(id, Vec2::new(width * fraction, height * 0.5), vel));
        }

        log::info!(
            "Game started with seed {} ({} balls, {} lives)",
            seed,
            state.balls.len(),
            state.lives
        );
        state
    }

    /// A run with no balls or enemies (useful for scripted setups)
    pub fn empty(now_ms: f64, tuning: Tuning) -> Self {
        let paddle = Paddle {
            x: (tuning.arena_width - PADDLE_NORMAL_WIDTH) / 2.0,
            ..Paddle::default()
        };
        Self {
            screen: Screen::Game,
            score: 0,
            lives: tuning.initial_lives,
            balls: Vec::with_capacity(INITIAL_BALLS),
            enemies: Vec::new(),
            paddle,
            is_holding: false,
            hold_progress: 0.0,
            game_start_ms: now_ms,
            current_phase: DifficultyPhase::default(),
            tuning,
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id = self.next_id.wrapping_add(1);
        id
    }

    /// Add a ball with a fresh ID, returning the ID
    pub fn add_ball(&mut self, pos: Vec2, vel: Vec2) -> u32 {
        let id = self.next_entity_id();
        self.balls.push(Ball::new(id, pos, vel));
        id
    }

    /// Add an enemy with a fresh ID, returning the ID
    pub fn add_enemy(&mut self, text: impl Into<String>, pos: Vec2, speed: f32) -> u32 {
        let id = self.next_entity_id();
        self.enemies.push(Enemy {
            id,
            text: text.into(),
            pos,
            speed,
        });
        id
    }

    /// Re-resolve the published difficulty phase. Returns true on a phase change.
    pub fn refresh_phase(&mut self, now_ms: f64) -> bool {
        let settings = difficulty(now_ms, self.game_start_ms);
        let changed = settings.phase.name != self.current_phase.name;
        if changed {
            log::info!(
                "Phase {} -> {} after {:.1}s",
                self.current_phase.name,
                settings.phase.name,
                settings.elapsed_ms / 1000.0
            );
        }
        self.current_phase = settings.phase;
        changed
    }

    /// The run is over once every ball is gone
    pub fn is_over(&self) -> bool {
        self.balls.is_empty()
    }

    /// Move to the game-over screen if no balls remain. Returns true if it did.
    pub fn finish_if_over(&mut self) -> bool {
        if self.screen == Screen::Game && self.is_over() {
            self.screen = Screen::GameOver;
            log::info!("Game over with score {}", self.score);
            return true;
        }
        false
    }
}

/// Random launch velocity between 30 and 60 degrees off horizontal
fn launch_velocity(rng: &mut Pcg32, goes_up: bool, speed_multiplier: f32) -> Vec2 {
    let speed = BASE_BALL_SPEED * speed_multiplier;
    let angle = rng.random_range(PI / 6.0..PI / 3.0);
    let horizontal = if rng.random_bool(0.5) { 1.0 } else { -1.0 };
    let vertical = if goes_up { -1.0 } else { 1.0 };
    Vec2::new(angle.cos() * speed * horizontal, angle.sin() * speed * vertical)
}
