//! The chosen focus-session length.
//!
//! One integer (minutes), persisted in the key-value store. Changing it
//! while the timer is idle re-bases the countdown immediately; changing it
//! mid-session is allowed but only applies on the next reset -- an
//! in-flight countdown is never rescaled.

use tracing::warn;

use crate::error::{Result, ValidationError};
use crate::storage::KvStore;

pub const DURATION_KEY: &str = "focus_minutes";

/// Session lengths offered by the picker. Any positive number of minutes is
/// accepted; these are just the one-tap choices.
pub const DURATION_PRESETS: [u32; 4] = [15, 30, 45, 60];

pub const DEFAULT_FOCUS_MINUTES: u32 = 30;

pub struct DurationStore<'s> {
    store: &'s dyn KvStore,
    default_minutes: u32,
}

impl<'s> DurationStore<'s> {
    pub fn new(store: &'s dyn KvStore) -> Self {
        Self {
            store,
            default_minutes: DEFAULT_FOCUS_MINUTES,
        }
    }

    /// Use a configured default instead of [`DEFAULT_FOCUS_MINUTES`].
    pub fn with_default(store: &'s dyn KvStore, default_minutes: u32) -> Self {
        Self {
            store,
            default_minutes,
        }
    }

    /// The chosen session length in minutes. Missing or corrupt state falls
    /// back to the default.
    pub fn minutes(&self) -> u32 {
        let raw = match self.store.get(DURATION_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return self.default_minutes,
            Err(e) => {
                warn!(error = %e, "configured duration unreadable, using default");
                return self.default_minutes;
            }
        };
        match raw.parse::<u32>() {
            Ok(m) if m > 0 => m,
            _ => {
                warn!(value = %raw, "configured duration invalid, using default");
                self.default_minutes
            }
        }
    }

    pub fn seconds(&self) -> u64 {
        u64::from(self.minutes()) * 60
    }

    /// Persist a new session length. Rejects non-positive values.
    pub fn set_minutes(&self, minutes: i64) -> Result<u32> {
        if minutes <= 0 || minutes > i64::from(u32::MAX) {
            return Err(ValidationError::InvalidDuration { minutes }.into());
        }
        self.store.set(DURATION_KEY, &minutes.to_string())?;
        Ok(minutes as u32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    #[test]
    fn defaults_until_set() {
        let store = MemoryStore::new();
        let durations = DurationStore::new(&store);
        assert_eq!(durations.minutes(), DEFAULT_FOCUS_MINUTES);

        durations.set_minutes(45).unwrap();
        assert_eq!(durations.minutes(), 45);
        assert_eq!(durations.seconds(), 45 * 60);
    }

    #[test]
    fn non_positive_minutes_are_rejected() {
        let store = MemoryStore::new();
        let durations = DurationStore::new(&store);
        assert!(durations.set_minutes(0).is_err());
        assert!(durations.set_minutes(-15).is_err());
        assert_eq!(durations.minutes(), DEFAULT_FOCUS_MINUTES);
    }

    #[test]
    fn corrupt_value_falls_back_to_default() {
        let store = MemoryStore::new();
        store.set(DURATION_KEY, "soon").unwrap();
        let durations = DurationStore::with_default(&store, 25);
        assert_eq!(durations.minutes(), 25);
    }
}
