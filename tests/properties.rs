use glam::Vec2;
use proptest::prelude::*;

use crystal_pong::Tuning;
use crystal_pong::consts::{BALL_RADIUS, GAME_HEIGHT, GAME_WIDTH, TICK_MS};
use crystal_pong::sim::*;

const PADDLE_X: f32 = 340.0;
const PADDLE_W: f32 = 120.0;
const PADDLE_TOP: f32 = 520.0;

fn phases() -> [DifficultyPhase; 4] {
    [
        DifficultyPhase::welcome_zone(),
        DifficultyPhase::heating_up(),
        DifficultyPhase::panic_zone(),
        DifficultyPhase::proving_grounds(),
    ]
}

fn paddle() -> Paddle {
    Paddle {
        x: PADDLE_X,
        width: PADDLE_W,
        height: 12.0,
        shrink_time_ms: 0.0,
    }
}

fn ball(pos: Vec2, vel: Vec2) -> Ball {
    Ball::new(1, pos, vel)
}

proptest! {
    #[test]
    fn paddle_bounce_never_below_phase_minimum(
        phase_index in 0usize..4,
        offset in 0.0f32..=1.0,
        depth in -12.0f32..12.0,
        vx in -15.0f32..15.0,
        vy in 0.1f32..20.0,
    ) {
        let phase = &phases()[phase_index];
        let x = PADDLE_X + offset * PADDLE_W;
        let b = ball(Vec2::new(x, PADDLE_TOP + depth), Vec2::new(vx, vy));

        let vel = ball_paddle_collision(&b, &paddle(), GAME_HEIGHT, phase);
        prop_assert!(vel.is_some());
        let vel = vel.unwrap();
        prop_assert!(vel.y < 0.0);
        prop_assert!(vel.length() >= phase.min_ball_speed() - 1e-3);
    }

    #[test]
    fn fast_ball_cannot_tunnel_through_paddle(
        phase_index in 0usize..4,
        offset in 0.0f32..=1.0,
        vx in -4.0f32..4.0,
        vy in 1.0f32..=50.0,
        gap_fraction in 0.0f32..0.95,
    ) {
        let phase = &phases()[phase_index];
        let x = PADDLE_X + offset * PADDLE_W;
        // Within one tick's real travel of the paddle plane
        let gap = gap_fraction * vy * phase.ball_speed_multiplier;
        let b = ball(Vec2::new(x, PADDLE_TOP - BALL_RADIUS - gap), Vec2::new(vx, vy));

        let vel = ball_paddle_collision(&b, &paddle(), GAME_HEIGHT, phase);
        prop_assert!(vel.is_some(), "ball at {:?} moving {:?} slipped past", b.pos, b.vel);
        prop_assert!(vel.unwrap().y < 0.0);
    }

    #[test]
    fn fast_ball_turns_around_within_one_tick(
        now_ms in prop::sample::select(vec![TICK_MS, 60_000.0, 150_000.0, 400_000.0]),
        offset in 0.0f32..=1.0,
        vy in 1.0f32..=50.0,
        gap_fraction in 0.0f32..0.95,
    ) {
        let mut state = GameState::empty(0.0, Tuning::default());
        state.paddle = paddle();
        let x = PADDLE_X + offset * PADDLE_W;
        state.add_ball(
            Vec2::new(x, PADDLE_TOP - BALL_RADIUS - gap_fraction * vy),
            Vec2::new(0.0, vy),
        );

        let next = tick(&state, &TickInput::at(now_ms), &PunchlineBook::default(), &mut Discard);
        prop_assert_eq!(next.balls.len(), 1);
        prop_assert!(next.balls[0].vel.y < 0.0);
    }

    #[test]
    fn wall_response_points_back_into_arena(
        x in BALL_RADIUS..(GAME_WIDTH - BALL_RADIUS),
        y in BALL_RADIUS..(GAME_HEIGHT - BALL_RADIUS),
        vx in -20.0f32..20.0,
        vy in -20.0f32..20.0,
    ) {
        let b = ball(Vec2::new(x, y), Vec2::new(vx, vy));
        let next = b.pos + b.vel;

        match ball_wall_collision(&b, GAME_WIDTH, GAME_HEIGHT) {
            Some(vel) => {
                if next.x - b.radius <= 0.0 {
                    prop_assert!(vel.x >= 0.0);
                }
                if next.x + b.radius >= GAME_WIDTH {
                    prop_assert!(vel.x <= 0.0);
                }
                if next.y - b.radius <= 0.0 {
                    prop_assert!(vel.y >= 0.0);
                }
            }
            None => {
                prop_assert!(next.x - b.radius > 0.0);
                prop_assert!(next.x + b.radius < GAME_WIDTH);
                prop_assert!(next.y - b.radius > 0.0);
            }
        }
    }

    #[test]
    fn near_vertical_wall_approach_bends_to_45_degrees(
        degrees in 85.5f32..89.9,
        speed in 1.0f32..20.0,
        downward in any::<bool>(),
    ) {
        let angle = degrees.to_radians();
        let vy = if downward { speed * angle.sin() } else { -speed * angle.sin() };
        let b = ball(Vec2::new(BALL_RADIUS, 300.0), Vec2::new(-speed * angle.cos(), vy));

        let vel = ball_wall_collision(&b, GAME_WIDTH, GAME_HEIGHT);
        prop_assert!(vel.is_some());
        let vel = vel.unwrap();
        prop_assert!(vel.x > 0.0);
        prop_assert!((vel.x.abs() - vel.y.abs()).abs() < 1e-3);
        prop_assert!((vel.length() - speed).abs() < 1e-3 * speed);
        prop_assert_eq!(vel.y > 0.0, downward);
    }

    #[test]
    fn separated_balls_just_touch(
        cx in 100.0f32..700.0,
        cy in 100.0f32..500.0,
        distance in 0.0f32..24.0,
        theta in 0.0f32..std::f32::consts::TAU,
    ) {
        let first = Ball::new(1, Vec2::new(cx, cy), Vec2::ZERO);
        let second = Ball::new(
            2,
            first.pos + Vec2::new(theta.cos(), theta.sin()) * distance,
            Vec2::ZERO,
        );
        let midpoint = (first.pos + second.pos) / 2.0;

        let (a, b) = separate_balls(&first, &second);
        prop_assert!(((b - a).length() - 24.0).abs() < 1e-2);
        prop_assert!(((a + b) / 2.0 - midpoint).length() < 1e-2);

        // Already touching: a second pass barely moves them
        let (a2, b2) = separate_balls(
            &Ball::new(1, a, Vec2::ZERO),
            &Ball::new(2, b, Vec2::ZERO),
        );
        prop_assert!((a2 - a).length() < 1e-2);
        prop_assert!((b2 - b).length() < 1e-2);

        // Touching still counts as a collision
        prop_assert!(ball_ball_collision(
            &Ball::new(1, a, Vec2::ZERO),
            &Ball::new(2, b, Vec2::ZERO),
        ).is_some());
    }

    #[test]
    fn head_on_pair_leaves_faster_than_it_came(
        x in 100.0f32..600.0,
        distance in 1.0f32..23.0,
        speed in 0.5f32..10.0,
    ) {
        let first = Ball::new(1, Vec2::new(x, 300.0), Vec2::new(speed, 0.0));
        let second = Ball::new(2, Vec2::new(x + distance, 300.0), Vec2::new(-speed, 0.0));

        let response = ball_ball_collision(&first, &second);
        prop_assert!(response.is_some());
        let response = response.unwrap();
        prop_assert!(response.first.x.abs() > speed);
        prop_assert!(response.second.x.abs() > speed);
        prop_assert!(response.first.x < 0.0);
        prop_assert!(response.second.x > 0.0);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn thousand_ticks_stay_finite_and_in_bounds(
        seed in any::<u64>(),
        phase_start_ms in prop::sample::select(vec![0.0f64, 60_000.0, 150_000.0, 420_000.0]),
        idle_mode in any::<bool>(),
    ) {
        let book = PunchlineBook::default();
        let mut state = GameState::new(seed, 0.0, Tuning::default());
        let initial_balls = state.balls.len();

        for i in 1..=1000 {
            let input = TickInput {
                now_ms: phase_start_ms + i as f64 * TICK_MS,
                idle_mode,
                ..Default::default()
            };
            state = tick(&state, &input, &book, &mut Discard);

            prop_assert!(state.balls.len() <= initial_balls);
            for b in &state.balls {
                prop_assert!(b.is_finite(), "ball {} went non-finite: {:?}", b.id, b);
                prop_assert!(b.pos.x >= b.radius && b.pos.x <= GAME_WIDTH - b.radius);
                prop_assert!(b.pos.y >= b.radius);
            }
        }
    }
}
