//! Timer snapshot persistence through the key-value port.
//!
//! The snapshot is written after every state mutation so that a concurrent
//! restart always observes the most recent logical state. Loading recovers
//! silently: a missing, unreadable, or insane snapshot yields a fresh Idle
//! timer at the configured duration and is never surfaced as an error.

use tracing::{debug, warn};

use crate::error::Result;
use crate::events::Event;
use crate::storage::KvStore;
use crate::timer::{SessionTimer, TimerSnapshot};

pub const TIMER_KEY: &str = "session_timer";

/// Load the persisted timer, reconciling the wall-clock gap since the last
/// snapshot. Returns the completion event when the gap consumed the rest of
/// a running session.
pub fn load_timer(
    store: &dyn KvStore,
    default_duration_secs: u64,
    now_ms: u64,
) -> (SessionTimer, Option<Event>) {
    let raw = match store.get(TIMER_KEY) {
        Ok(Some(raw)) => raw,
        Ok(None) => return (SessionTimer::new(default_duration_secs), None),
        Err(e) => {
            warn!(error = %e, "timer snapshot unreadable, starting fresh");
            return (SessionTimer::new(default_duration_secs), None);
        }
    };

    match serde_json::from_str::<TimerSnapshot>(&raw) {
        Ok(snap) if snap.is_sane() => {
            let (timer, completed) = SessionTimer::from_snapshot(&snap, now_ms);
            debug!(
                seconds_left = timer.seconds_left(),
                state = ?timer.state(),
                "timer restored"
            );
            (timer, completed)
        }
        Ok(_) => {
            warn!("timer snapshot failed sanity check, starting fresh");
            (SessionTimer::new(default_duration_secs), None)
        }
        Err(e) => {
            warn!(error = %e, "timer snapshot corrupt, starting fresh");
            (SessionTimer::new(default_duration_secs), None)
        }
    }
}

/// Persist the current timer state, stamped with `now_ms`.
pub fn save_timer(store: &dyn KvStore, timer: &SessionTimer, now_ms: u64) -> Result<()> {
    let snap = timer.snapshot(now_ms);
    let json = serde_json::to_string(&snap)?;
    store.set(TIMER_KEY, &json)?;
    Ok(())
}
