//! Enemy spawn scheduler
//!
//! Runs beside the tick, not inside it: every `spawn_interval_ms` of the
//! current phase it drops one enemy (sometimes two) above the arena. Seeded,
//! so a run replays identically.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::difficulty::{BASE_ENEMY_SPEED, difficulty, should_double_spawn};
use super::jokes::PunchlineBook;
use super::state::GameState;

/// Keep spawned enemies this far from the side walls
const SPAWN_SIDE_MARGIN: f32 = 50.0;
/// First enemy starts just above the visible arena
const SPAWN_Y: f32 = -30.0;
/// Vertical spacing between enemies of a double spawn
const SPAWN_STACK_GAP: f32 = 40.0;

/// Deterministic enemy spawner
#[derive(Debug, Clone)]
pub struct EnemySpawner {
    rng: Pcg32,
    last_spawn_ms: f64,
}

impl EnemySpawner {
    /// Create a spawner whose first spawn is one interval after `now_ms`
    pub fn new(seed: u64, now_ms: f64) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
            last_spawn_ms: now_ms,
        }
    }

    /// Spawn enemies if the current phase's interval has elapsed.
    ///
    /// Returns how many enemies were added.
    pub fn update(&mut self, state: &mut GameState, book: &PunchlineBook, now_ms: f64) -> usize {
        let phase = difficulty(now_ms, state.game_start_ms).phase;
        if now_ms - self.last_spawn_ms < phase.spawn_interval_ms {
            return 0;
        }
        self.last_spawn_ms = now_ms;

        let count = if should_double_spawn(&mut self.rng, phase.double_spawn_chance) {
            2
        } else {
            1
        };

        let width = state.tuning.arena_width;
        let max_x = (width - SPAWN_SIDE_MARGIN).max(SPAWN_SIDE_MARGIN + 1.0);
        let mut spawned = 0;
        for i in 0..count {
            let Some(setup) = book.random_setup(&mut self.rng) else {
                log::warn!("Punchline book is empty, nothing to spawn");
                break;
            };
            let setup = setup.to_string();
            let x = self.rng.random_range(SPAWN_SIDE_MARGIN..max_x);
            let y = SPAWN_Y - SPAWN_STACK_GAP * i as f32;
            let id = state.add_enemy(setup, Vec2::new(x, y), BASE_ENEMY_SPEED);
            log::debug!("Spawned enemy {} at x={:.0} ({})", id, x, phase.name);
            spawned += 1;
        }
        spawned
    }
}
