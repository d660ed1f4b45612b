//! Outbound notifications from the engine to renderers and HUDs

use serde::{Deserialize, Serialize};

use super::grid::TargetKind;

/// Engine-to-collaborator calls.
///
/// Every method defaults to a no-op so hosts only implement what they draw.
/// Implementations must not call back into the session.
pub trait SessionHooks {
    fn on_target_spawned(&mut self, _cell: usize, _kind: TargetKind) {}
    fn on_target_removed(&mut self, _cell: usize) {}
    fn on_score_changed(&mut self, _score: u32, _delta: i32) {}
    fn on_time_changed(&mut self, _remaining_secs: u32) {}
    fn on_achievement(&mut self, _message: &str, _duration_ms: u32) {}
    fn on_session_ended(&mut self, _is_win: bool, _message: &str, _celebrate: bool) {}
}

impl SessionHooks for () {}

/// Recorded form of a hook call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GameEvent {
    TargetSpawned { cell: usize, kind: TargetKind },
    TargetRemoved { cell: usize },
    ScoreChanged { score: u32, delta: i32 },
    TimeChanged { remaining_secs: u32 },
    Achievement { message: String, duration_ms: u32 },
    SessionEnded { is_win: bool, message: String, celebrate: bool },
}

/// Hooks that record every call as a [`GameEvent`]
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    pub events: Vec<GameEvent>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take all recorded events, leaving the log empty
    pub fn drain(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn count(&self, pred: impl Fn(&GameEvent) -> bool) -> usize {
        self.events.iter().filter(|e| pred(e)).count()
    }
}

impl SessionHooks for EventLog {
    fn on_target_spawned(&mut self, cell: usize, kind: TargetKind) {
        self.events.push(GameEvent::TargetSpawned { cell, kind });
    }

    fn on_target_removed(&mut self, cell: usize) {
        self.events.push(GameEvent::TargetRemoved { cell });
    }

    fn on_score_changed(&mut self, score: u32, delta: i32) {
        self.events.push(GameEvent::ScoreChanged { score, delta });
    }

    fn on_time_changed(&mut self, remaining_secs: u32) {
        self.events.push(GameEvent::TimeChanged { remaining_secs });
    }

    fn on_achievement(&mut self, message: &str, duration_ms: u32) {
        self.events.push(GameEvent::Achievement {
            message: message.to_string(),
            duration_ms,
        });
    }

    fn on_session_ended(&mut self, is_win: bool, message: &str, celebrate: bool) {
        self.events.push(GameEvent::SessionEnded {
            is_win,
            message: message.to_string(),
            celebrate,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_json_shape() {
        let json = serde_json::to_string(&GameEvent::TargetSpawned {
            cell: 4,
            kind: TargetKind::Obstacle,
        })
        .unwrap();
        assert_eq!(json, r#"{"type":"target_spawned","cell":4,"kind":"obstacle"}"#);
    }

    #[test]
    fn test_drain_empties_log() {
        let mut log = EventLog::new();
        log.on_time_changed(3);
        log.on_target_removed(1);
        assert_eq!(log.count(|e| matches!(e, GameEvent::TimeChanged { .. })), 1);
        assert_eq!(log.drain().len(), 2);
        assert!(log.events.is_empty());
    }
}
