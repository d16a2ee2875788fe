//! Session timer engine.
//!
//! The timer is a second-granularity countdown state machine. It does not
//! own a thread or a timer source - the caller invokes `tick()` once per
//! second while the session runs, and `from_snapshot()` reconciles whatever
//! wall-clock gap accumulated while no process was alive to tick.
//!
//! ## State Transitions
//!
//! ```text
//! Idle -> Running -> Paused -> Running -> Completed
//!   ^________________________________________|   (reset)
//! ```
//!
//! Completed is terminal until `reset`. The completion event is produced
//! exactly once per session: on the tick that reaches zero, on a forced
//! completion, or on reconciliation that consumes the remaining time.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::events::Event;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerState {
    Idle,
    Running,
    Paused,
    Completed,
}

/// Persisted form of the timer.
///
/// `last_updated` is the wall-clock moment (epoch milliseconds) the snapshot
/// was written; reconciliation charges the gap since then against
/// `seconds_left`, but only when `is_running` was set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimerSnapshot {
    pub initial_duration: u64,
    pub seconds_left: u64,
    pub is_running: bool,
    pub last_updated: u64,
}

impl TimerSnapshot {
    /// A snapshot that cannot have been produced by a live engine is
    /// treated as corrupt and discarded by the loader.
    pub fn is_sane(&self) -> bool {
        self.initial_duration > 0 && self.seconds_left <= self.initial_duration
    }
}

/// Core countdown state machine.
#[derive(Debug, Clone)]
pub struct SessionTimer {
    initial_duration_secs: u64,
    seconds_left: u64,
    state: TimerState,
}

impl SessionTimer {
    /// Create a fresh Idle timer for the given session length.
    pub fn new(duration_secs: u64) -> Self {
        Self {
            initial_duration_secs: duration_secs,
            seconds_left: duration_secs,
            state: TimerState::Idle,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> TimerState {
        self.state
    }

    pub fn seconds_left(&self) -> u64 {
        self.seconds_left
    }

    pub fn initial_duration_secs(&self) -> u64 {
        self.initial_duration_secs
    }

    pub fn is_running(&self) -> bool {
        self.state == TimerState::Running
    }

    /// Focus seconds consumed so far.
    pub fn elapsed_secs(&self) -> u64 {
        self.initial_duration_secs
            .saturating_sub(self.seconds_left)
    }

    /// 0.0 .. 1.0 progress through the configured interval.
    pub fn progress(&self) -> f64 {
        if self.initial_duration_secs == 0 {
            return 0.0;
        }
        self.elapsed_secs() as f64 / self.initial_duration_secs as f64
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Begin or resume the countdown. No-op while already running and once
    /// the remaining time has reached zero.
    pub fn start(&mut self) -> Option<Event> {
        match self.state {
            TimerState::Idle | TimerState::Paused if self.seconds_left > 0 => {
                self.state = TimerState::Running;
                Some(Event::SessionStarted {
                    duration_secs: self.initial_duration_secs,
                    seconds_left: self.seconds_left,
                    at: Utc::now(),
                })
            }
            _ => None,
        }
    }

    /// Freeze the countdown, preserving the remaining time. Idempotent.
    pub fn pause(&mut self) -> Option<Event> {
        match self.state {
            TimerState::Running => {
                self.state = TimerState::Paused;
                Some(Event::SessionPaused {
                    seconds_left: self.seconds_left,
                    at: Utc::now(),
                })
            }
            _ => None,
        }
    }

    /// Re-base the timer at a new duration. Always permitted; cancels any
    /// in-flight countdown and clears the terminal state.
    pub fn reset(&mut self, duration_secs: u64) -> Event {
        self.initial_duration_secs = duration_secs;
        self.seconds_left = duration_secs;
        self.state = TimerState::Idle;
        Event::SessionReset {
            duration_secs,
            at: Utc::now(),
        }
    }

    /// Advance the countdown by one second. The caller schedules this once
    /// per second while running; a tick that fires after the engine left
    /// Running (late cancellation) is a no-op by construction.
    pub fn tick(&mut self) -> Option<Event> {
        if self.state != TimerState::Running {
            return None;
        }
        self.seconds_left = self.seconds_left.saturating_sub(1);
        if self.seconds_left == 0 {
            self.state = TimerState::Completed;
            return Some(Event::SessionCompleted {
                elapsed_secs: self.initial_duration_secs,
                forced: false,
                at: Utc::now(),
            });
        }
        None
    }

    /// Force immediate completion regardless of remaining time (the video
    /// ended before the countdown ran out). Credits only the time actually
    /// spent. No-op once the session is already Completed.
    pub fn complete_now(&mut self) -> Option<Event> {
        if self.state == TimerState::Completed {
            return None;
        }
        let elapsed = self.elapsed_secs();
        self.seconds_left = 0;
        self.state = TimerState::Completed;
        Some(Event::SessionCompleted {
            elapsed_secs: elapsed,
            forced: true,
            at: Utc::now(),
        })
    }

    // ── Persistence ──────────────────────────────────────────────────

    /// Snapshot the current state for persistence, stamped with `now_ms`.
    pub fn snapshot(&self, now_ms: u64) -> TimerSnapshot {
        TimerSnapshot {
            initial_duration: self.initial_duration_secs,
            seconds_left: self.seconds_left,
            is_running: self.state == TimerState::Running,
            last_updated: now_ms,
        }
    }

    /// Rebuild a timer from a persisted snapshot, charging the wall-clock
    /// gap since `last_updated` against the remaining time when the
    /// snapshot was running. A paused snapshot never loses time to a gap.
    ///
    /// When the gap consumes all remaining time the session is Completed on
    /// arrival and the completion event is returned alongside the timer; the
    /// caller must not drop it.
    pub fn from_snapshot(snap: &TimerSnapshot, now_ms: u64) -> (Self, Option<Event>) {
        if snap.is_running {
            let gap_secs = now_ms.saturating_sub(snap.last_updated) / 1000;
            let seconds_left = snap.seconds_left.saturating_sub(gap_secs);
            if seconds_left == 0 {
                let timer = Self {
                    initial_duration_secs: snap.initial_duration,
                    seconds_left: 0,
                    state: TimerState::Completed,
                };
                let event = Event::SessionCompleted {
                    elapsed_secs: snap.initial_duration,
                    forced: false,
                    at: Utc::now(),
                };
                return (timer, Some(event));
            }
            let timer = Self {
                initial_duration_secs: snap.initial_duration,
                seconds_left,
                state: TimerState::Running,
            };
            return (timer, None);
        }

        let state = if snap.seconds_left == 0 {
            TimerState::Completed
        } else if snap.seconds_left == snap.initial_duration {
            TimerState::Idle
        } else {
            TimerState::Paused
        };
        let timer = Self {
            initial_duration_secs: snap.initial_duration,
            seconds_left: snap.seconds_left,
            state,
        };
        (timer, None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn reset_yields_idle_at_duration() {
        let mut timer = SessionTimer::new(60);
        timer.start();
        timer.tick();
        timer.reset(90);
        assert_eq!(timer.state(), TimerState::Idle);
        assert_eq!(timer.seconds_left(), 90);
        assert!(!timer.is_running());
    }

    #[test]
    fn start_pause_start() {
        let mut timer = SessionTimer::new(10);
        assert_eq!(timer.state(), TimerState::Idle);

        assert!(timer.start().is_some());
        assert_eq!(timer.state(), TimerState::Running);

        assert!(timer.pause().is_some());
        assert_eq!(timer.state(), TimerState::Paused);

        assert!(timer.start().is_some());
        assert_eq!(timer.state(), TimerState::Running);
    }

    #[test]
    fn start_is_noop_while_running() {
        let mut timer = SessionTimer::new(10);
        assert!(timer.start().is_some());
        assert!(timer.start().is_none());
        assert_eq!(timer.state(), TimerState::Running);
    }

    #[test]
    fn pause_is_idempotent() {
        let mut timer = SessionTimer::new(10);
        timer.start();
        timer.tick();
        assert!(timer.pause().is_some());
        let left = timer.seconds_left();
        assert!(timer.pause().is_none());
        assert_eq!(timer.seconds_left(), left);
        assert_eq!(timer.state(), TimerState::Paused);
    }

    #[test]
    fn counts_down_and_completes_exactly_once() {
        let mut timer = SessionTimer::new(3);
        timer.start();

        assert!(timer.tick().is_none());
        assert_eq!(timer.seconds_left(), 2);
        assert!(timer.tick().is_none());
        assert_eq!(timer.seconds_left(), 1);

        let done = timer.tick();
        assert!(matches!(
            done,
            Some(Event::SessionCompleted {
                elapsed_secs: 3,
                forced: false,
                ..
            })
        ));
        assert_eq!(timer.state(), TimerState::Completed);
        assert!(!timer.is_running());

        // Orphaned ticks after completion change nothing.
        assert!(timer.tick().is_none());
        assert_eq!(timer.seconds_left(), 0);
    }

    #[test]
    fn tick_is_noop_unless_running() {
        let mut timer = SessionTimer::new(10);
        assert!(timer.tick().is_none());
        assert_eq!(timer.seconds_left(), 10);

        timer.start();
        timer.tick();
        timer.pause();
        assert!(timer.tick().is_none());
        assert_eq!(timer.seconds_left(), 9);
    }

    #[test]
    fn start_is_noop_once_completed() {
        let mut timer = SessionTimer::new(1);
        timer.start();
        assert!(timer.tick().is_some());
        assert!(timer.start().is_none());
        assert_eq!(timer.state(), TimerState::Completed);
    }

    #[test]
    fn forced_completion_credits_elapsed_only() {
        let mut timer = SessionTimer::new(1800);
        timer.start();
        for _ in 0..300 {
            timer.tick();
        }
        let done = timer.complete_now();
        assert!(matches!(
            done,
            Some(Event::SessionCompleted {
                elapsed_secs: 300,
                forced: true,
                ..
            })
        ));
        assert_eq!(timer.state(), TimerState::Completed);
        // Exactly once.
        assert!(timer.complete_now().is_none());
    }

    #[test]
    fn forced_completion_before_any_start_credits_nothing() {
        let mut timer = SessionTimer::new(600);
        let done = timer.complete_now();
        assert!(matches!(
            done,
            Some(Event::SessionCompleted {
                elapsed_secs: 0,
                ..
            })
        ));
    }

    #[test]
    fn reconciles_running_gap_to_completion() {
        let t0 = 1_700_000_000_000u64;
        let snap = TimerSnapshot {
            initial_duration: 1800,
            seconds_left: 100,
            is_running: true,
            last_updated: t0,
        };
        let (timer, event) = SessionTimer::from_snapshot(&snap, t0 + 150_000);
        assert_eq!(timer.seconds_left(), 0);
        assert_eq!(timer.state(), TimerState::Completed);
        assert!(matches!(event, Some(Event::SessionCompleted { .. })));
    }

    #[test]
    fn reconciles_running_gap_partially() {
        let t0 = 1_700_000_000_000u64;
        let snap = TimerSnapshot {
            initial_duration: 1800,
            seconds_left: 100,
            is_running: true,
            last_updated: t0,
        };
        let (timer, event) = SessionTimer::from_snapshot(&snap, t0 + 40_000);
        assert_eq!(timer.seconds_left(), 60);
        assert_eq!(timer.state(), TimerState::Running);
        assert!(event.is_none());
    }

    #[test]
    fn paused_snapshot_never_loses_time() {
        let t0 = 1_700_000_000_000u64;
        let snap = TimerSnapshot {
            initial_duration: 1800,
            seconds_left: 100,
            is_running: false,
            last_updated: t0,
        };
        let (timer, event) = SessionTimer::from_snapshot(&snap, t0 + 150_000);
        assert_eq!(timer.seconds_left(), 100);
        assert_eq!(timer.state(), TimerState::Paused);
        assert!(event.is_none());
    }

    #[test]
    fn snapshot_roundtrip_preserves_state() {
        let mut timer = SessionTimer::new(300);
        timer.start();
        timer.tick();
        let now = 1_700_000_000_000u64;
        let snap = timer.snapshot(now);
        assert!(snap.is_sane());
        let (restored, event) = SessionTimer::from_snapshot(&snap, now);
        assert!(event.is_none());
        assert_eq!(restored.seconds_left(), 299);
        assert_eq!(restored.state(), TimerState::Running);
    }

    #[test]
    fn clock_regression_is_a_zero_gap() {
        let t0 = 1_700_000_000_000u64;
        let snap = TimerSnapshot {
            initial_duration: 600,
            seconds_left: 500,
            is_running: true,
            last_updated: t0,
        };
        // now earlier than last_updated: treat as no elapsed time.
        let (timer, event) = SessionTimer::from_snapshot(&snap, t0 - 10_000);
        assert_eq!(timer.seconds_left(), 500);
        assert!(event.is_none());
    }

    #[test]
    fn insane_snapshots_are_detected() {
        let bad = TimerSnapshot {
            initial_duration: 0,
            seconds_left: 0,
            is_running: false,
            last_updated: 0,
        };
        assert!(!bad.is_sane());
        let bad = TimerSnapshot {
            initial_duration: 60,
            seconds_left: 61,
            is_running: false,
            last_updated: 0,
        };
        assert!(!bad.is_sane());
    }

    proptest! {
        /// Reconciliation never produces more remaining time than was
        /// persisted, never goes negative, and charges gaps only against
        /// running snapshots.
        #[test]
        fn reconciliation_clamps(
            initial in 1u64..=7200,
            left_frac in 0u64..=7200,
            gap_ms in 0u64..1_000_000_000,
            running in proptest::bool::ANY,
        ) {
            let seconds_left = left_frac.min(initial);
            let t0 = 1_700_000_000_000u64;
            let snap = TimerSnapshot {
                initial_duration: initial,
                seconds_left,
                is_running: running,
                last_updated: t0,
            };
            let (timer, event) = SessionTimer::from_snapshot(&snap, t0 + gap_ms);
            prop_assert!(timer.seconds_left() <= seconds_left);
            if running {
                let expected = seconds_left.saturating_sub(gap_ms / 1000);
                prop_assert_eq!(timer.seconds_left(), expected);
                prop_assert_eq!(event.is_some(), expected == 0);
            } else {
                prop_assert_eq!(timer.seconds_left(), seconds_left);
                prop_assert!(event.is_none());
            }
        }

        /// Each tick removes exactly one second until zero, and exactly one
        /// completion event is produced no matter how many ticks fire.
        #[test]
        fn ticks_are_monotonic(duration in 1u64..=120, extra in 0u64..=120) {
            let mut timer = SessionTimer::new(duration);
            timer.start();
            let mut completions = 0u32;
            for i in 1..=(duration + extra) {
                if timer.tick().is_some() {
                    completions += 1;
                }
                prop_assert_eq!(timer.seconds_left(), duration.saturating_sub(i));
            }
            prop_assert_eq!(completions, 1);
            prop_assert_eq!(timer.state(), TimerState::Completed);
        }
    }
}
