//! Crystal Pong - multi-ball paddle arcade physics
//!
//! Core modules:
//! - `sim`: Deterministic simulation (difficulty, collisions, tick engine, spawning)
//! - `tuning`: Data-driven game balance
//!
//! Rendering, input devices, audio and the leaderboard live outside this crate
//! and talk to it through [`sim::GameState`] and [`sim::EventSink`].

pub mod sim;
pub mod tuning;

pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Logical arena dimensions (pixels)
    pub const GAME_WIDTH: f32 = 800.0;
    pub const GAME_HEIGHT: f32 = 600.0;

    /// Fixed outer step the caller is expected to drive (~60 Hz)
    pub const TICK_MS: f64 = 16.0;
    /// Physics sub-steps per tick
    pub const PHYSICS_ITERATIONS: u32 = 8;

    /// Ball defaults
    pub const BALL_RADIUS: f32 = 12.0;
    pub const INITIAL_BALLS: usize = 2;
    /// Design cap on simultaneous balls (sizes per-tick scratch buffers)
    pub const MAX_BALLS: usize = 10;

    /// Paddle defaults - top edge sits this far above the arena floor
    pub const PADDLE_FLOOR_OFFSET: f32 = 80.0;
    pub const PADDLE_HEIGHT: f32 = 12.0;
    pub const PADDLE_NORMAL_WIDTH: f32 = 120.0;
    pub const PADDLE_SHRUNK_WIDTH: f32 = 60.0;
    /// Shrink duration after an enemy reaches the paddle
    pub const PADDLE_SHRINK_MS: f64 = 4000.0;

    /// Enemy hitbox (centered on enemy position)
    pub const ENEMY_WIDTH: f32 = 80.0;
    pub const ENEMY_HEIGHT: f32 = 30.0;
    pub const ENEMY_SCORE: u64 = 100;

    /// Distance below the arena floor before balls/enemies are discarded
    pub const OFFSCREEN_MARGIN: f32 = 50.0;

    /// Punchline effects stay visible this long
    pub const PUNCHLINE_LIFETIME_MS: f64 = 800.0;

    pub const INITIAL_LIVES: i32 = 2;
}

/// Rescale a vector to the given length, leaving zero vectors untouched
#[inline]
pub fn with_length(v: glam::Vec2, length: f32) -> glam::Vec2 {
    let current = v.length();
    if current > 0.0 { v * (length / current) } else { v }
}

/// Unsigned slope angle in degrees: `atan2(|rise|, |run|)`, in [0, 90]
#[inline]
pub fn slope_degrees(rise: f32, run: f32) -> f32 {
    rise.abs().atan2(run.abs()).to_degrees()
}
