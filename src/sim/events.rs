//! Physics events raised during a tick
//!
//! The tick reports what happened through an [`EventSink`]. Audio, effects and
//! UI hang off these; the simulation never waits on them.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// A punchline revealed where an enemy was destroyed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PunchlineEffect {
    pub id: u32,
    pub text: String,
    pub pos: Vec2,
    pub spawned_at_ms: f64,
}

impl PunchlineEffect {
    pub fn is_expired(&self, now_ms: f64, lifetime_ms: f64) -> bool {
        now_ms - self.spawned_at_ms >= lifetime_ms
    }
}

/// Something the front end may want to react to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// A ball bounced (walls, paddle or another ball). At most once per ball per tick.
    Bounce { ball_id: u32 },
    /// A ball destroyed an enemy
    Explosion { enemy_id: u32, pos: Vec2 },
    /// Punchline to show for a destroyed enemy
    Punchline(PunchlineEffect),
    /// A ball fell off the bottom (one life lost)
    BallLost { ball_id: u32 },
    /// An enemy reached the paddle and shrank it
    PaddleHit { enemy_id: u32, shrunk_until_ms: f64 },
}

/// Receiver for tick events. Called synchronously; must not block.
pub trait EventSink {
    fn emit(&mut self, event: GameEvent);
}

impl EventSink for Vec<GameEvent> {
    fn emit(&mut self, event: GameEvent) {
        self.push(event);
    }
}

/// Sink that drops every event
#[derive(Debug, Clone, Copy, Default)]
pub struct Discard;

impl EventSink for Discard {
    fn emit(&mut self, _event: GameEvent) {}
}

/// Punchlines currently on screen
#[derive(Debug, Clone, Default)]
pub struct PunchlineBoard {
    pub effects: Vec<PunchlineEffect>,
}

impl PunchlineBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop effects that have been visible for `lifetime_ms` or longer
    pub fn prune(&mut self, now_ms: f64, lifetime_ms: f64) {
        self.effects.retain(|e| !e.is_expired(now_ms, lifetime_ms));
    }

    pub fn len(&self) -> usize {
        self.effects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }
}

impl EventSink for PunchlineBoard {
    fn emit(&mut self, event: GameEvent) {
        if let GameEvent::Punchline(effect) = event {
            self.effects.push(effect);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn effect(id: u32, at: f64) -> PunchlineEffect {
        PunchlineEffect {
            id,
            text: "Joe Mama!".to_string(),
            pos: Vec2::new(100.0, 100.0),
            spawned_at_ms: at,
        }
    }

    #[test]
    fn test_board_collects_only_punchlines() {
        let mut board = PunchlineBoard::new();
        board.emit(GameEvent::Bounce { ball_id: 1 });
        board.emit(GameEvent::Punchline(effect(2, 0.0)));
        board.emit(GameEvent::Explosion {
            enemy_id: 3,
            pos: Vec2::ZERO,
        });
        assert_eq!(board.len(), 1);
    }

    #[test]
    fn test_board_prunes_expired() {
        let mut board = PunchlineBoard::new();
        board.emit(GameEvent::Punchline(effect(1, 0.0)));
        board.emit(GameEvent::Punchline(effect(2, 500.0)));

        board.prune(799.0, 800.0);
        assert_eq!(board.len(), 2);
        board.prune(800.0, 800.0);
        assert_eq!(board.len(), 1);
        assert_eq!(board.effects[0].id, 2);
        board.prune(1300.0, 800.0);
        assert!(board.is_empty());
    }

    #[test]
    fn test_vec_sink_records_in_order() {
        let mut events: Vec<GameEvent> = Vec::new();
        events.emit(GameEvent::Bounce { ball_id: 1 });
        events.emit(GameEvent::BallLost { ball_id: 1 });
        assert_eq!(
            events,
            vec![
                GameEvent::Bounce { ball_id: 1 },
                GameEvent::BallLost { ball_id: 1 }
            ]
        );
    }
}
