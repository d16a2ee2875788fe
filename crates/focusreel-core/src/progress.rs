//! Per-goal watch-time ledger.
//!
//! The ledger is a single persisted mapping `goal_id -> GoalProgress`,
//! updated with a read-modify-write of the whole collection. Accrual happens
//! exactly once per completed focus session, driven by the session
//! coordinator's completion path -- never by the tick loop.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::Result;
use crate::storage::KvStore;

pub const PROGRESS_KEY: &str = "goal_progress";

/// Cumulative watch time attributed to one learning goal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoalProgress {
    pub goal_id: String,
    /// Monotonically non-decreasing total of focused seconds.
    pub total_seconds: u64,
    /// Epoch milliseconds of the most recent accrual.
    pub last_watched_at: u64,
}

pub struct ProgressLedger<'s> {
    store: &'s dyn KvStore,
}

impl<'s> ProgressLedger<'s> {
    pub fn new(store: &'s dyn KvStore) -> Self {
        Self { store }
    }

    /// The full progress mapping. Missing or corrupt state is an empty
    /// ledger, never an error.
    pub fn all(&self) -> BTreeMap<String, GoalProgress> {
        let raw = match self.store.get(PROGRESS_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return BTreeMap::new(),
            Err(e) => {
                warn!(error = %e, "progress mapping unreadable, treating as empty");
                return BTreeMap::new();
            }
        };
        match serde_json::from_str(&raw) {
            Ok(map) => map,
            Err(e) => {
                warn!(error = %e, "progress mapping corrupt, treating as empty");
                BTreeMap::new()
            }
        }
    }

    pub fn for_goal(&self, goal_id: &str) -> Option<GoalProgress> {
        self.all().remove(goal_id)
    }

    /// Credit `seconds` of watch time to `goal_id`. Non-positive deltas are
    /// rejected as a no-op (`Ok(None)`); otherwise the updated entry is
    /// returned after the whole mapping has been persisted.
    pub fn add_watch_time(
        &self,
        goal_id: &str,
        seconds: i64,
        now_ms: u64,
    ) -> Result<Option<GoalProgress>> {
        if seconds <= 0 {
            debug!(goal_id, seconds, "rejecting non-positive watch-time delta");
            return Ok(None);
        }

        let mut progress = self.all();
        let entry = progress
            .entry(goal_id.to_string())
            .or_insert_with(|| GoalProgress {
                goal_id: goal_id.to_string(),
                total_seconds: 0,
                last_watched_at: now_ms,
            });
        entry.total_seconds += seconds as u64;
        entry.last_watched_at = now_ms;
        let updated = entry.clone();

        let json = serde_json::to_string(&progress)?;
        self.store.set(PROGRESS_KEY, &json)?;
        debug!(goal_id, added = seconds, total = updated.total_seconds, "watch time recorded");
        Ok(Some(updated))
    }
}
