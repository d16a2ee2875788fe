use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::timer::TimerState;

/// Every state change in the system produces an Event.
/// The CLI prints them; the watch-session coordinator consumes
/// `SessionCompleted` to drive accrual and the reflection gate.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    SessionStarted {
        duration_secs: u64,
        seconds_left: u64,
        at: DateTime<Utc>,
    },
    SessionPaused {
        seconds_left: u64,
        at: DateTime<Utc>,
    },
    SessionReset {
        duration_secs: u64,
        at: DateTime<Utc>,
    },
    /// The countdown reached zero, or an external end signal forced
    /// completion. Emitted at most once per session.
    SessionCompleted {
        /// Focus seconds actually spent before completion.
        elapsed_secs: u64,
        /// True when the video ended before the countdown ran out.
        forced: bool,
        at: DateTime<Utc>,
    },
    /// Watch time was credited to a goal (once per completed session).
    ProgressRecorded {
        goal_id: String,
        added_secs: u64,
        total_secs: u64,
        at: DateTime<Utc>,
    },
    /// A reflection record was appended.
    ReflectionSaved {
        video_id: String,
        created_at_ms: u64,
        at: DateTime<Utc>,
    },
    StateSnapshot {
        state: TimerState,
        seconds_left: u64,
        initial_duration_secs: u64,
        /// 0.0 .. 1.0 progress through the configured interval.
        progress: f64,
        awaiting_reflection: bool,
        at: DateTime<Utc>,
    },
}
