//! Virtual-clock timer queue
//!
//! Holds the three kinds of pending timers a session uses: the periodic
//! countdown, the self-rescheduling spawn timeout, and one expiry timeout per
//! live target. Nothing here reads a wall clock; the owner moves time forward
//! through [`Scheduler::pop_due`] and [`Scheduler::advance_to`].

use crate::consts::COUNTDOWN_PERIOD_MS;

/// What a timer does when it fires
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerKind {
    Countdown,
    Spawn,
    Expiry { target_id: u32 },
}

#[derive(Debug, Clone)]
struct PendingTimer {
    /// Scheduling order, breaks ties between equal deadlines
    seq: u64,
    due_ms: u64,
    period_ms: Option<u64>,
    kind: TimerKind,
}

/// Pending timers, ordered by deadline then scheduling order
#[derive(Debug, Clone, Default)]
pub struct Scheduler {
    now_ms: u64,
    next_seq: u64,
    pending: Vec<PendingTimer>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current virtual time (ms)
    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    fn push(&mut self, kind: TimerKind, delay_ms: u64, period_ms: Option<u64>) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.pending.push(PendingTimer {
            seq,
            due_ms: self.now_ms + delay_ms,
            period_ms,
            kind,
        });
    }

    fn cancel_where(&mut self, pred: impl Fn(TimerKind) -> bool) {
        self.pending.retain(|t| !pred(t.kind));
    }

    /// (Re)arm the once-per-second countdown
    pub fn arm_countdown(&mut self) {
        self.cancel_countdown();
        self.push(TimerKind::Countdown, COUNTDOWN_PERIOD_MS, Some(COUNTDOWN_PERIOD_MS));
    }

    pub fn cancel_countdown(&mut self) {
        self.cancel_where(|k| k == TimerKind::Countdown);
    }

    /// (Re)arm the spawn timeout; any pending spawn is dropped
    pub fn arm_spawn(&mut self, delay_ms: u64) {
        self.cancel_spawn();
        self.push(TimerKind::Spawn, delay_ms, None);
    }

    pub fn cancel_spawn(&mut self) {
        self.cancel_where(|k| k == TimerKind::Spawn);
    }

    /// Schedule the one-shot expiry for a target
    pub fn schedule_expiry(&mut self, target_id: u32, delay_ms: u64) {
        self.cancel_expiry(target_id);
        self.push(TimerKind::Expiry { target_id }, delay_ms, None);
    }

    pub fn cancel_expiry(&mut self, target_id: u32) {
        self.cancel_where(|k| k == TimerKind::Expiry { target_id });
    }

    /// Drop every pending timer
    pub fn cancel_all(&mut self) {
        self.pending.clear();
    }

    /// Deadline of the pending spawn, if armed
    pub fn spawn_due_ms(&self) -> Option<u64> {
        self.due_of(TimerKind::Spawn)
    }

    /// Deadline of the next countdown tick, if armed
    pub fn countdown_due_ms(&self) -> Option<u64> {
        self.due_of(TimerKind::Countdown)
    }

    /// Deadline of a target's expiry, if scheduled
    pub fn expiry_due_ms(&self, target_id: u32) -> Option<u64> {
        self.due_of(TimerKind::Expiry { target_id })
    }

    fn due_of(&self, kind: TimerKind) -> Option<u64> {
        self.pending.iter().find(|t| t.kind == kind).map(|t| t.due_ms)
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Remove and return the earliest timer due at or before `until_ms`.
    ///
    /// The clock moves to the timer's deadline. Periodic timers are put back
    /// one period later.
    pub fn pop_due(&mut self, until_ms: u64) -> Option<TimerKind> {
        let idx = self
            .pending
            .iter()
            .enumerate()
            .filter(|(_, t)| t.due_ms <= until_ms)
            .min_by_key(|(_, t)| (t.due_ms, t.seq))
            .map(|(i, _)| i)?;

        let timer = self.pending.swap_remove(idx);
        self.now_ms = self.now_ms.max(timer.due_ms);

        if let Some(period) = timer.period_ms {
            let seq = self.next_seq;
            self.next_seq += 1;
            self.pending.push(PendingTimer {
                seq,
                due_ms: timer.due_ms + period,
                ..timer
            });
        }

        Some(timer.kind)
    }

    /// Move the clock forward once all due timers have been drained
    pub fn advance_to(&mut self, ms: u64) {
        self.now_ms = self.now_ms.max(ms);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fires_in_deadline_order() {
        let mut sched = Scheduler::new();
        sched.arm_spawn(600);
        sched.schedule_expiry(1, 300);
        sched.arm_countdown();

        assert_eq!(sched.pop_due(2000), Some(TimerKind::Expiry { target_id: 1 }));
        assert_eq!(sched.now_ms(), 300);
        assert_eq!(sched.pop_due(2000), Some(TimerKind::Spawn));
        assert_eq!(sched.pop_due(2000), Some(TimerKind::Countdown));
        assert_eq!(sched.now_ms(), 1000);
        // Countdown re-armed one period later
        assert_eq!(sched.pop_due(2000), Some(TimerKind::Countdown));
        assert_eq!(sched.now_ms(), 2000);
        assert_eq!(sched.pop_due(2000), None);
        assert_eq!(sched.countdown_due_ms(), Some(3000));
    }

    #[test]
    fn test_equal_deadlines_fire_in_scheduling_order() {
        let mut sched = Scheduler::new();
        sched.schedule_expiry(2, 500);
        sched.arm_spawn(500);
        sched.schedule_expiry(1, 500);

        assert_eq!(sched.pop_due(500), Some(TimerKind::Expiry { target_id: 2 }));
        assert_eq!(sched.pop_due(500), Some(TimerKind::Spawn));
        assert_eq!(sched.pop_due(500), Some(TimerKind::Expiry { target_id: 1 }));
    }

    #[test]
    fn test_rearm_spawn_replaces_pending() {
        let mut sched = Scheduler::new();
        sched.arm_spawn(900);
        sched.advance_to(100);
        sched.arm_spawn(400);
        assert_eq!(sched.spawn_due_ms(), Some(500));
        assert_eq!(sched.pending_count(), 1);
    }

    #[test]
    fn test_cancel_expiry_leaves_others() {
        let mut sched = Scheduler::new();
        sched.schedule_expiry(1, 100);
        sched.schedule_expiry(2, 100);
        sched.cancel_expiry(1);
        assert_eq!(sched.expiry_due_ms(1), None);
        assert_eq!(sched.expiry_due_ms(2), Some(100));
    }

    #[test]
    fn test_cancel_all() {
        let mut sched = Scheduler::new();
        sched.arm_countdown();
        sched.arm_spawn(10);
        sched.schedule_expiry(3, 10);
        sched.cancel_all();
        assert_eq!(sched.pending_count(), 0);
        assert_eq!(sched.pop_due(u64::MAX), None);
    }

    #[test]
    fn test_advance_never_rewinds() {
        let mut sched = Scheduler::new();
        sched.advance_to(500);
        sched.advance_to(200);
        assert_eq!(sched.now_ms(), 500);
    }
}
