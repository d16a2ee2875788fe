//! Append-only reflection records.
//!
//! A session is not closed until the viewer writes down what they actually
//! learned. Records are immutable once created: each lives under its own
//! key `reflection:{video_id}:{created_at_ms}`, so several reflections on
//! the same video over time coexist and a double submit can only ever add a
//! second record, never corrupt one.

use chrono::{Local, TimeZone};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{Result, ValidationError};
use crate::session::VideoMeta;
use crate::storage::KvStore;

pub const REFLECTION_PREFIX: &str = "reflection:";

/// Minimum reflection length in characters, after trimming.
pub const MIN_REFLECTION_CHARS: usize = 20;

/// One reflection on one watched video.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reflection {
    pub video_id: String,
    pub title: String,
    pub channel: String,
    /// Display string, e.g. "12:34".
    pub duration: String,
    pub text: String,
    /// Epoch milliseconds; with `video_id`, the record's identity.
    pub created_at: u64,
}

impl Reflection {
    fn key(&self) -> String {
        format!("{REFLECTION_PREFIX}{}:{}", self.video_id, self.created_at)
    }

    /// Plain-text export block, suitable for saving alongside notes.
    pub fn export_text(&self) -> String {
        let watched_on = Local
            .timestamp_millis_opt(self.created_at as i64)
            .single()
            .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_default();
        format!(
            "Title      : {}\n\
             Channel    : {}\n\
             Duration   : {}\n\
             Watched on : {}\n\
             \n\
             ----------------------------------------\n\
             \n\
             Reflection:\n\
             {}",
            self.title, self.channel, self.duration, watched_on, self.text
        )
    }
}

pub struct ReflectionLog<'s> {
    store: &'s dyn KvStore,
    min_chars: usize,
}

impl<'s> ReflectionLog<'s> {
    pub fn new(store: &'s dyn KvStore) -> Self {
        Self {
            store,
            min_chars: MIN_REFLECTION_CHARS,
        }
    }

    /// Override the length gate (configured via `session.min_reflection_chars`).
    pub fn with_min_chars(store: &'s dyn KvStore, min_chars: usize) -> Self {
        Self { store, min_chars }
    }

    /// Append a reflection for the given video. The text is trimmed first;
    /// anything shorter than the gate is rejected and nothing is persisted.
    pub fn submit(&self, meta: &VideoMeta, text: &str, now_ms: u64) -> Result<Reflection> {
        let trimmed = text.trim();
        if trimmed.chars().count() < self.min_chars {
            return Err(ValidationError::ReflectionTooShort {
                required: self.min_chars,
                actual: trimmed.chars().count(),
            }
            .into());
        }

        let reflection = Reflection {
            video_id: meta.video_id.clone(),
            title: meta.title.clone(),
            channel: meta.channel.clone(),
            duration: meta.duration.clone(),
            text: trimmed.to_string(),
            created_at: now_ms,
        };
        let json = serde_json::to_string(&reflection)?;
        self.store.set(&reflection.key(), &json)?;
        Ok(reflection)
    }

    /// All reflections, newest first. Corrupt entries are skipped.
    pub fn list(&self) -> Vec<Reflection> {
        let entries = match self.store.scan_prefix(REFLECTION_PREFIX) {
            Ok(entries) => entries,
            Err(e) => {
                warn!(error = %e, "reflections unreadable, listing none");
                return Vec::new();
            }
        };

        let mut reflections: Vec<Reflection> = entries
            .into_iter()
            .filter_map(|(key, raw)| match serde_json::from_str(&raw) {
                Ok(r) => Some(r),
                Err(e) => {
                    warn!(key = %key, error = %e, "skipping corrupt reflection record");
                    None
                }
            })
            .collect();
        reflections.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        reflections
    }
}
