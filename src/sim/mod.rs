//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed outer step, fixed sub-steps
//! - Injected clock and seeded RNG only
//! - Stable iteration order (insertion order by entity ID)
//! - No rendering, audio or platform dependencies

pub mod collision;
pub mod difficulty;
pub mod events;
pub mod jokes;
pub mod spawn;
pub mod state;
pub mod tick;

pub use collision::{
    BallPairVelocities, PaddleHitKind, ball_ball_collision, ball_enemy_collision,
    ball_paddle_collision, ball_paddle_hit, ball_wall_collision, enemy_paddle_collision,
    separate_balls,
};
pub use difficulty::{
    BASE_BALL_SPEED, BASE_ENEMY_SPEED, DifficultyPhase, DifficultySettings, difficulty,
    enemy_speed, should_double_spawn,
};
pub use events::{Discard, EventSink, GameEvent, PunchlineBoard, PunchlineEffect};
pub use jokes::{Joke, PunchlineBook};
pub use spawn::EnemySpawner;
pub use state::{Ball, Enemy, GameState, Paddle, PaddleSize, Screen};
pub use tick::{TickInput, autopilot_target, tick};
