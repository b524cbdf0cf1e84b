//! Crystal Pong headless runner
//!
//! Plays a full run with the idle-mode autopilot on a simulated fixed-step
//! clock and logs what happens. Useful for soak testing balance changes.
//!
//! Usage: `crystal-pong [seed] [tuning.json]`

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use anyhow::{Context, Result};

    use crystal_pong::Tuning;
    use crystal_pong::consts::TICK_MS;
    use crystal_pong::sim::{
        EnemySpawner, EventSink, GameEvent, GameState, PunchlineBoard, PunchlineBook, TickInput,
        tick,
    };

    /// Stop after this many ticks even if the autopilot never drops a ball
    const MAX_TICKS: u64 = 60 * 60 * 10;
    /// How often the published phase is refreshed (matches the HUD timer)
    const PHASE_REFRESH_MS: f64 = 1000.0;

    /// Per-run counters fed by tick events
    #[derive(Debug, Default)]
    struct RunStats {
        bounces: u64,
        explosions: u64,
        balls_lost: u64,
        paddle_hits: u64,
        punchlines: PunchlineBoard,
    }

    impl EventSink for RunStats {
        fn emit(&mut self, event: GameEvent) {
            match &event {
                GameEvent::Bounce { .. } => self.bounces += 1,
                GameEvent::Explosion { .. } => self.explosions += 1,
                GameEvent::BallLost { ball_id } => {
                    self.balls_lost += 1;
                    log::info!("Lost ball {}", ball_id);
                }
                GameEvent::PaddleHit { .. } => self.paddle_hits += 1,
                GameEvent::Punchline(effect) => log::info!("\"{}\"", effect.text),
            }
            self.punchlines.emit(event);
        }
    }

    pub fn run() -> Result<()> {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

        let mut args = std::env::args().skip(1);
        let seed = match args.next() {
            Some(arg) => arg
                .parse::<u64>()
                .with_context(|| format!("seed must be an unsigned integer, got {arg:?}"))?,
            None => 0xC0FFEE,
        };
        let tuning = match args.next() {
            Some(path) => {
                let json = std::fs::read_to_string(&path)
                    .with_context(|| format!("reading tuning file {path}"))?;
                Tuning::from_json(&json).with_context(|| format!("parsing tuning file {path}"))?
            }
            None => Tuning::default(),
        };

        log::info!("Crystal Pong starting...");
        let book = PunchlineBook::default();
        let mut now = 0.0;
        let mut state = GameState::new(seed, now, tuning);
        let mut spawner = EnemySpawner::new(seed.wrapping_add(1), now);
        let mut stats = RunStats::default();
        let mut next_refresh = PHASE_REFRESH_MS;
        let mut ticks = 0u64;

        while ticks < MAX_TICKS {
            now += TICK_MS;
            ticks += 1;

            if now >= next_refresh {
                state.refresh_phase(now);
                next_refresh += PHASE_REFRESH_MS;
            }
            spawner.update(&mut state, &book, now);

            let input = TickInput {
                now_ms: now,
                idle_mode: true,
                ..Default::default()
            };
            state = tick(&state, &input, &book, &mut stats);
            stats.punchlines.prune(now, state.tuning.punchline_lifetime_ms);

            if state.finish_if_over() {
                break;
            }
        }

        log::info!(
            "Run finished after {} ticks ({:.1}s): score {}, lives {}, phase {}",
            ticks,
            now / 1000.0,
            state.score,
            state.lives,
            state.current_phase.name
        );
        log::info!(
            "Bounces {}, enemies destroyed {}, paddle hits {}, balls lost {}",
            stats.bounces,
            stats.explosions,
            stats.paddle_hits,
            stats.balls_lost
        );
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    native::run()
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Web builds drive the simulation from the host page through the library
}
