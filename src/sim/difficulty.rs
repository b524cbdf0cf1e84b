//! Time-based difficulty ramp
//!
//! Difficulty is a pure function of elapsed time. Three hard cutovers, then a
//! continuous ramp once the run passes five minutes.

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Ball speed at multiplier 1.0 (pixels/tick)
pub const BASE_BALL_SPEED: f32 = 3.5;
/// Enemy fall speed at multiplier 1.0 (pixels/tick)
pub const BASE_ENEMY_SPEED: f32 = 1.5;

/// Phase boundaries in elapsed seconds
const HEATING_UP_AT_SECS: f64 = 45.0;
const PANIC_AT_SECS: f64 = 120.0;
const PROVING_GROUNDS_AT_SECS: f64 = 300.0;

/// Proving Grounds ramp limits
const MAX_EXTRA_BALL_SPEED: f64 = 0.5;
const EXTRA_BALL_SPEED_PER_MINUTE: f64 = 0.1;
const MIN_SPAWN_INTERVAL_MS: f64 = 500.0;
const SPAWN_INTERVAL_DROP_PER_MINUTE_MS: f64 = 50.0;

/// A named difficulty tier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DifficultyPhase {
    pub name: String,
    pub ball_speed_multiplier: f32,
    pub enemy_speed_multiplier: f32,
    /// Milliseconds between enemy spawns
    pub spawn_interval_ms: f64,
    /// Probability in [0, 1] that a spawn produces two enemies
    pub double_spawn_chance: f64,
}

impl DifficultyPhase {
    fn fixed(
        name: &str,
        ball_speed_multiplier: f32,
        enemy_speed_multiplier: f32,
        spawn_interval_ms: f64,
        double_spawn_chance: f64,
    ) -> Self {
        Self {
            name: name.to_string(),
            ball_speed_multiplier,
            enemy_speed_multiplier,
            spawn_interval_ms,
            double_spawn_chance,
        }
    }

    pub fn welcome_zone() -> Self {
        Self::fixed("The Welcome Zone", 1.0, 1.0, 3000.0, 0.0)
    }

    pub fn heating_up() -> Self {
        Self::fixed("Things Are Heating Up", 1.5, 1.25, 2000.0, 0.0)
    }

    pub fn panic_zone() -> Self {
        Self::fixed("The Panic Zone", 2.0, 1.5, 1500.0, 0.15)
    }

    /// The Proving Grounds at exactly the five minute mark
    pub fn proving_grounds() -> Self {
        Self::fixed("The Proving Grounds", 3.0, 2.0, 800.0, 0.4)
    }

    /// Paddle bounces never leave the ball slower than this
    #[inline]
    pub fn min_ball_speed(&self) -> f32 {
        BASE_BALL_SPEED * self.ball_speed_multiplier
    }
}

impl Default for DifficultyPhase {
    fn default() -> Self {
        Self::welcome_zone()
    }
}

/// Result of a difficulty query
#[derive(Debug, Clone, PartialEq)]
pub struct DifficultySettings {
    pub phase: DifficultyPhase,
    /// Milliseconds since game start
    pub elapsed_ms: f64,
}

/// Resolve the difficulty phase for the given clock reading
pub fn difficulty(now_ms: f64, game_start_ms: f64) -> DifficultySettings {
    let elapsed_ms = now_ms - game_start_ms;
    let secs = elapsed_ms / 1000.0;

    let phase = if secs < HEATING_UP_AT_SECS {
        DifficultyPhase::welcome_zone()
    } else if secs < PANIC_AT_SECS {
        DifficultyPhase::heating_up()
    } else if secs < PROVING_GROUNDS_AT_SECS {
        DifficultyPhase::panic_zone()
    } else {
        let base = DifficultyPhase::proving_grounds();
        let minutes_over = (secs - PROVING_GROUNDS_AT_SECS) / 60.0;
        let extra_speed = (minutes_over * EXTRA_BALL_SPEED_PER_MINUTE).min(MAX_EXTRA_BALL_SPEED);
        DifficultyPhase {
            ball_speed_multiplier: base.ball_speed_multiplier + extra_speed as f32,
            spawn_interval_ms: (base.spawn_interval_ms
                - minutes_over * SPAWN_INTERVAL_DROP_PER_MINUTE_MS)
                .max(MIN_SPAWN_INTERVAL_MS),
            ..base
        }
    };

    DifficultySettings { phase, elapsed_ms }
}

/// Roll whether a spawn should produce two enemies
pub fn should_double_spawn<R: Rng + ?Sized>(rng: &mut R, chance: f64) -> bool {
    rng.random::<f64>() < chance
}

/// Enemy fall speed for the current phase
#[inline]
pub fn enemy_speed(base_speed: f32, multiplier: f32) -> f32 {
    base_speed * multiplier
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    const START: f64 = 1_700_000_000_000.0;

    fn at_secs(secs: f64) -> DifficultyPhase {
        difficulty(START + secs * 1000.0, START).phase
    }

    #[test]
    fn test_phase_boundaries() {
        assert_eq!(at_secs(0.0).name, "The Welcome Zone");
        assert_eq!(at_secs(44.999).name, "The Welcome Zone");
        assert_eq!(at_secs(45.0).name, "Things Are Heating Up");
        assert_eq!(at_secs(119.9).name, "Things Are Heating Up");
        assert_eq!(at_secs(120.0).name, "The Panic Zone");
        assert_eq!(at_secs(299.9).name, "The Panic Zone");
        assert_eq!(at_secs(300.0).name, "The Proving Grounds");
    }

    #[test]
    fn test_clock_before_start_is_welcome_zone() {
        let phase = at_secs(-10.0);
        assert_eq!(phase, DifficultyPhase::welcome_zone());
    }

    #[test]
    fn test_fixed_phase_values() {
        let panic = at_secs(200.0);
        assert_eq!(panic.ball_speed_multiplier, 2.0);
        assert_eq!(panic.enemy_speed_multiplier, 1.5);
        assert_eq!(panic.spawn_interval_ms, 1500.0);
        assert_eq!(panic.double_spawn_chance, 0.15);
    }

    #[test]
    fn test_proving_grounds_ramps_smoothly() {
        let at_five = at_secs(300.0);
        assert!((at_five.ball_speed_multiplier - 3.0).abs() < 1e-6);
        assert_eq!(at_five.spawn_interval_ms, 800.0);

        // Two and a half minutes in: +0.25 speed, 125ms faster spawns
        let mid = at_secs(450.0);
        assert!((mid.ball_speed_multiplier - 3.25).abs() < 1e-5);
        assert!((mid.spawn_interval_ms - 675.0).abs() < 1e-9);
        assert_eq!(mid.enemy_speed_multiplier, 2.0);
        assert_eq!(mid.double_spawn_chance, 0.4);
    }

    #[test]
    fn test_proving_grounds_caps() {
        let late = at_secs(3600.0);
        assert!((late.ball_speed_multiplier - 3.5).abs() < 1e-6);
        assert_eq!(late.spawn_interval_ms, 500.0);
    }

    #[test]
    fn test_elapsed_reported() {
        let settings = difficulty(START + 1234.0, START);
        assert_eq!(settings.elapsed_ms, 1234.0);
    }

    #[test]
    fn test_min_ball_speed() {
        assert!((DifficultyPhase::heating_up().min_ball_speed() - 5.25).abs() < 1e-6);
    }

    #[test]
    fn test_should_double_spawn_extremes() {
        let mut rng = Pcg32::seed_from_u64(7);
        for _ in 0..100 {
            assert!(!should_double_spawn(&mut rng, 0.0));
            assert!(should_double_spawn(&mut rng, 1.0));
        }
    }

    #[test]
    fn test_should_double_spawn_rate() {
        let mut rng = Pcg32::seed_from_u64(42);
        let hits = (0..10_000)
            .filter(|_| should_double_spawn(&mut rng, 0.4))
            .count();
        assert!((3_500..4_500).contains(&hits), "hits = {hits}");
    }

    #[test]
    fn test_enemy_speed() {
        assert_eq!(enemy_speed(BASE_ENEMY_SPEED, 2.0), 3.0);
    }
}
