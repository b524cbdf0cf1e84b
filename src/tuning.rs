//! Data-driven game balance
//!
//! Knobs that shape a run without changing the game's geometry. Embedded in
//! [`GameState`](crate::sim::GameState) so every tick reads the values of the
//! run it belongs to.

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Upper bound for sub-steps; beyond this extra iterations only cost time
const MAX_PHYSICS_ITERATIONS: u32 = 64;

/// Gameplay tuning parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Arena ===
    /// Arena width in pixels
    pub arena_width: f32,
    /// Arena height in pixels (paddle sits 80px above this)
    pub arena_height: f32,
    /// How far below the floor a ball or enemy may fall before removal
    pub offscreen_margin: f32,

    // === Physics ===
    /// Sub-steps per tick
    pub physics_iterations: u32,

    // === Rules ===
    /// Paddle shrink duration after an enemy reaches it
    pub paddle_shrink_ms: f64,
    /// Lives at game start
    pub initial_lives: i32,

    // === Effects ===
    /// How long a punchline effect stays on screen
    pub punchline_lifetime_ms: f64,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            arena_width: GAME_WIDTH,
            arena_height: GAME_HEIGHT,
            offscreen_margin: OFFSCREEN_MARGIN,

            physics_iterations: PHYSICS_ITERATIONS,

            paddle_shrink_ms: PADDLE_SHRINK_MS,
            initial_lives: INITIAL_LIVES,

            punchline_lifetime_ms: PUNCHLINE_LIFETIME_MS,
        }
    }
}

impl Tuning {
    /// Parse tuning from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let tuning: Tuning = serde_json::from_str(json)?;
        Ok(tuning.validated())
    }

    /// Serialize to pretty JSON
    pub fn to_json(&self) -> String {
        // Plain numeric struct; serialization cannot fail
        serde_json::to_string_pretty(self).unwrap_or_default()
    }

    /// Clamp out-of-range values back into something playable
    pub fn validated(mut self) -> Self {
        let defaults = Self::default();

        if self.physics_iterations == 0 || self.physics_iterations > MAX_PHYSICS_ITERATIONS {
            log::warn!(
                "physics_iterations {} out of range, using {}",
                self.physics_iterations,
                defaults.physics_iterations
            );
            self.physics_iterations = defaults.physics_iterations;
        }

        // Arena must fit the paddle and leave room above it
        let min_width = PADDLE_NORMAL_WIDTH + 2.0 * BALL_RADIUS;
        if !self.arena_width.is_finite() || self.arena_width < min_width {
            log::warn!(
                "arena_width {} too small, using {}",
                self.arena_width,
                defaults.arena_width
            );
            self.arena_width = defaults.arena_width;
        }
        let min_height = PADDLE_FLOOR_OFFSET + 4.0 * BALL_RADIUS;
        if !self.arena_height.is_finite() || self.arena_height < min_height {
            log::warn!(
                "arena_height {} too small, using {}",
                self.arena_height,
                defaults.arena_height
            );
            self.arena_height = defaults.arena_height;
        }

        if !self.offscreen_margin.is_finite() || self.offscreen_margin < 0.0 {
            log::warn!(
                "offscreen_margin {} invalid, using {}",
                self.offscreen_margin,
                defaults.offscreen_margin
            );
            self.offscreen_margin = defaults.offscreen_margin;
        }
        if !self.paddle_shrink_ms.is_finite() || self.paddle_shrink_ms < 0.0 {
            log::warn!(
                "paddle_shrink_ms {} invalid, using {}",
                self.paddle_shrink_ms,
                defaults.paddle_shrink_ms
            );
            self.paddle_shrink_ms = defaults.paddle_shrink_ms;
        }
        if !self.punchline_lifetime_ms.is_finite() || self.punchline_lifetime_ms < 0.0 {
            log::warn!(
                "punchline_lifetime_ms {} invalid, using {}",
                self.punchline_lifetime_ms,
                defaults.punchline_lifetime_ms
            );
            self.punchline_lifetime_ms = defaults.punchline_lifetime_ms;
        }
        if self.initial_lives < 0 {
            log::warn!("initial_lives {} negative, using 0", self.initial_lives);
            self.initial_lives = 0;
        }

        self
    }

    /// Y coordinate of the paddle's top edge
    #[inline]
    pub fn paddle_top(&self) -> f32 {
        self.arena_height - PADDLE_FLOOR_OFFSET
    }

    /// Y coordinate past which balls and enemies are discarded
    #[inline]
    pub fn discard_line(&self) -> f32 {
        self.arena_height + self.offscreen_margin
    }
}
