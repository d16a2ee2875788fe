//! # Focusreel Core Library
//!
//! Core business logic for Focusreel, a focus-session video-viewing tool:
//! commit to a bounded focus interval, watch with a restricted control
//! surface, and record a reflection plus cumulative watch-time per learning
//! goal. Everything persists locally; there is no backend database.
//!
//! The library is CLI-first: all operations are available through the
//! `focusreel` binary, which is a thin layer over this crate.
//!
//! ## Architecture
//!
//! - **Timer Engine**: a second-granularity countdown state machine that
//!   requires the caller to invoke `tick()` once per second, and reconciles
//!   wall-clock gaps (restarts, suspensions) from its persisted snapshot
//! - **Playback Bridge**: translates external player state changes into
//!   timer commands and exposes the restricted control surface
//! - **Storage**: SQLite key-value persistence behind a `KvStore` port,
//!   plus TOML-based configuration
//! - **Watch Session**: the coordinator that wires completion to progress
//!   accrual and the reflection gate
//!
//! ## Key Components
//!
//! - [`SessionTimer`]: core countdown state machine
//! - [`WatchSession`]: session lifecycle coordinator
//! - [`ProgressLedger`]: per-goal watch-time accrual
//! - [`ReflectionLog`]: append-only, length-gated reflections
//! - [`Database`]: local key-value persistence

pub mod bridge;
pub mod duration;
pub mod error;
pub mod events;
pub mod goals;
pub mod player;
pub mod progress;
pub mod reflection;
pub mod session;
pub mod storage;
pub mod timer;

pub use bridge::{PlaybackBridge, RATE_PRESETS};
pub use duration::{DurationStore, DEFAULT_FOCUS_MINUTES, DURATION_PRESETS};
pub use error::{ConfigError, CoreError, StorageError, ValidationError};
pub use events::Event;
pub use goals::{GoalBook, LearningGoal, MAX_GOALS};
pub use player::{PlayerCall, PlayerHandle, PlayerSignal, ScriptedPlayer};
pub use progress::{GoalProgress, ProgressLedger};
pub use reflection::{Reflection, ReflectionLog, MIN_REFLECTION_CHARS};
pub use session::{SessionContext, VideoMeta, WatchSession};
pub use storage::{Config, Database, KvStore, MemoryStore};
pub use timer::{SessionTimer, TimerSnapshot, TimerState};

/// Current wall-clock time as whole milliseconds since the Unix epoch.
pub fn now_ms() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}
