//! Watch-session coordination.
//!
//! [`WatchSession`] is the single owner of one viewing session: the timer,
//! the playback bridge, and the session context (which video, which goal).
//! It is the only consumer of the timer's completion event, and the only
//! caller of the progress ledger, so accrual happens exactly once per
//! session no matter how the completion arrived -- a tick reaching zero, an
//! external end signal, or reconciliation after a restart.
//!
//! One instance exists per process; the persisted context carries the
//! at-most-once accrual marker across restarts.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::bridge::PlaybackBridge;
use crate::duration::DurationStore;
use crate::error::{Result, ValidationError};
use crate::events::Event;
use crate::player::{PlayerHandle, PlayerSignal};
use crate::progress::ProgressLedger;
use crate::reflection::{Reflection, ReflectionLog};
use crate::storage::{Config, KvStore};
use crate::timer::{load_timer, save_timer, SessionTimer, TimerState};

pub const SESSION_KEY: &str = "watch_session";

/// Identity of the video being watched, carried into reflections.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoMeta {
    pub video_id: String,
    pub title: String,
    pub channel: String,
    /// Display string, e.g. "12:34".
    pub duration: String,
}

/// Persisted per-session state beyond the timer itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionContext {
    pub goal_id: Option<String>,
    pub video: VideoMeta,
    /// Accrual marker: set when the completion pipeline ran.
    pub progress_recorded: bool,
    /// The reflection gate: the session stays open until a reflection
    /// is accepted.
    pub awaiting_reflection: bool,
}

pub struct WatchSession<'s> {
    store: &'s dyn KvStore,
    timer: SessionTimer,
    bridge: PlaybackBridge,
    context: Option<SessionContext>,
    default_minutes: u32,
    min_reflection_chars: usize,
}

impl<'s> WatchSession<'s> {
    /// Restore the session from persisted state, reconciling the timer
    /// against the wall clock. A completion consumed by the gap (the user
    /// comes back after the countdown would have finished) is processed
    /// here, so it is never silently dropped; the returned events describe
    /// everything that happened.
    pub fn open(
        store: &'s dyn KvStore,
        config: &Config,
        now_ms: u64,
    ) -> Result<(Self, Vec<Event>)> {
        let context = load_context(store);
        let duration_secs =
            DurationStore::with_default(store, config.session.default_minutes).seconds();
        let (timer, completed) = load_timer(store, duration_secs, now_ms);

        let mut session = Self {
            store,
            timer,
            bridge: PlaybackBridge::new(config.player.seek_step_secs),
            context,
            default_minutes: config.session.default_minutes,
            min_reflection_chars: config.session.min_reflection_chars,
        };

        let mut events = Vec::new();
        if let Some(event) = completed {
            if let Event::SessionCompleted { elapsed_secs, .. } = event {
                events.push(event);
                events.extend(session.handle_completion(elapsed_secs, now_ms)?);
            }
            save_timer(store, &session.timer, now_ms)?;
        }
        Ok((session, events))
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn timer(&self) -> &SessionTimer {
        &self.timer
    }

    pub fn context(&self) -> Option<&SessionContext> {
        self.context.as_ref()
    }

    pub fn awaiting_reflection(&self) -> bool {
        self.context
            .as_ref()
            .is_some_and(|ctx| ctx.awaiting_reflection)
    }

    /// Full state snapshot event for status output.
    pub fn state_snapshot(&self) -> Event {
        Event::StateSnapshot {
            state: self.timer.state(),
            seconds_left: self.timer.seconds_left(),
            initial_duration_secs: self.timer.initial_duration_secs(),
            progress: self.timer.progress(),
            awaiting_reflection: self.awaiting_reflection(),
            at: Utc::now(),
        }
    }

    // ── Session lifecycle ────────────────────────────────────────────

    /// Begin watching a video: record the session context and re-base the
    /// countdown at the chosen duration.
    pub fn begin(
        &mut self,
        goal_id: Option<String>,
        video: VideoMeta,
        now_ms: u64,
    ) -> Result<Event> {
        self.context = Some(SessionContext {
            goal_id,
            video,
            progress_recorded: false,
            awaiting_reflection: false,
        });
        let duration_secs =
            DurationStore::with_default(self.store, self.default_minutes).seconds();
        let event = self.timer.reset(duration_secs);
        self.save_context()?;
        save_timer(self.store, &self.timer, now_ms)?;
        Ok(event)
    }

    pub fn start(&mut self, now_ms: u64) -> Result<Option<Event>> {
        let event = self.timer.start();
        save_timer(self.store, &self.timer, now_ms)?;
        Ok(event)
    }

    pub fn pause(&mut self, now_ms: u64) -> Result<Option<Event>> {
        let event = self.timer.pause();
        save_timer(self.store, &self.timer, now_ms)?;
        Ok(event)
    }

    /// Cancel any in-flight countdown and re-base at the chosen duration.
    /// An abandoned session accrues nothing.
    pub fn reset(&mut self, now_ms: u64) -> Result<Event> {
        let duration_secs =
            DurationStore::with_default(self.store, self.default_minutes).seconds();
        let event = self.timer.reset(duration_secs);
        save_timer(self.store, &self.timer, now_ms)?;
        Ok(event)
    }

    /// Advance the countdown by one second and run the completion pipeline
    /// when it reaches zero.
    pub fn tick(&mut self, now_ms: u64) -> Result<Vec<Event>> {
        let event = self.timer.tick();
        self.absorb(event, now_ms)
    }

    /// Persist a new session length and re-base the countdown unless a
    /// session is actively running -- a running countdown is never rescaled;
    /// the change applies on the next reset.
    pub fn set_duration(&mut self, minutes: i64, now_ms: u64) -> Result<Option<Event>> {
        let durations = DurationStore::with_default(self.store, self.default_minutes);
        let minutes = durations.set_minutes(minutes)?;
        if self.timer.is_running() {
            debug!(minutes, "duration change deferred until next reset");
            return Ok(None);
        }
        let event = self.timer.reset(u64::from(minutes) * 60);
        save_timer(self.store, &self.timer, now_ms)?;
        Ok(Some(event))
    }

    /// Walk away from the current watch without completing it: clears the
    /// context and re-bases the timer. Nothing is accrued.
    pub fn abandon(&mut self, now_ms: u64) -> Result<Event> {
        self.context = None;
        self.save_context()?;
        self.reset(now_ms)
    }

    // ── Player ───────────────────────────────────────────────────────

    /// Hand the external player to the bridge once it is ready.
    pub fn attach_player(&mut self, player: Box<dyn PlayerHandle>, start_muted: bool) {
        self.bridge.attach(player, start_muted);
    }

    pub fn controls(&mut self) -> &mut PlaybackBridge {
        &mut self.bridge
    }

    /// Route a playback-state transition through the bridge into the timer:
    /// `Playing` starts the countdown, `Ended` completes the session early
    /// and runs the same pipeline as a natural completion.
    pub fn player_signal(&mut self, signal: PlayerSignal, now_ms: u64) -> Result<Vec<Event>> {
        let event = self.bridge.on_signal(&mut self.timer, signal);
        self.absorb(event, now_ms)
    }

    // ── Reflection gate ──────────────────────────────────────────────

    /// Submit the closing reflection. Requires an active, completed session;
    /// on success the reflection is appended and the session context is
    /// cleared -- the session is closed.
    pub fn reflect(&mut self, text: &str, now_ms: u64) -> Result<(Reflection, Event)> {
        let ctx = self
            .context
            .as_ref()
            .ok_or(ValidationError::NoActiveSession)?;
        if self.timer.state() != TimerState::Completed {
            return Err(ValidationError::SessionNotCompleted.into());
        }

        let log = ReflectionLog::with_min_chars(self.store, self.min_reflection_chars);
        let reflection = log.submit(&ctx.video, text, now_ms)?;
        let event = Event::ReflectionSaved {
            video_id: reflection.video_id.clone(),
            created_at_ms: reflection.created_at,
            at: Utc::now(),
        };

        self.context = None;
        self.save_context()?;
        Ok((reflection, event))
    }

    // ── Internal ─────────────────────────────────────────────────────

    /// Consume a timer event: persist the new state, and when it is the
    /// completion, run accrual and arm the reflection gate.
    fn absorb(&mut self, event: Option<Event>, now_ms: u64) -> Result<Vec<Event>> {
        let mut events = Vec::new();
        if let Some(event) = event {
            if let Event::SessionCompleted { elapsed_secs, .. } = event {
                events.push(event);
                events.extend(self.handle_completion(elapsed_secs, now_ms)?);
            } else {
                events.push(event);
            }
        }
        save_timer(self.store, &self.timer, now_ms)?;
        Ok(events)
    }

    /// The completion pipeline. Runs at most once per session: the accrual
    /// marker in the persisted context survives restarts.
    fn handle_completion(&mut self, elapsed_secs: u64, now_ms: u64) -> Result<Vec<Event>> {
        let Some(ctx) = self.context.as_mut() else {
            debug!("completion without session context, nothing to accrue");
            return Ok(Vec::new());
        };
        if ctx.progress_recorded {
            debug!("completion already processed for this session");
            return Ok(Vec::new());
        }
        ctx.progress_recorded = true;
        ctx.awaiting_reflection = true;
        let goal_id = ctx.goal_id.clone();
        // The marker goes durable before the ledger write: a crash between
        // the two loses the accrual, never doubles it.
        self.save_context()?;

        let mut events = Vec::new();
        if let Some(goal_id) = goal_id {
            let ledger = ProgressLedger::new(self.store);
            if let Some(updated) = ledger.add_watch_time(&goal_id, elapsed_secs as i64, now_ms)? {
                events.push(Event::ProgressRecorded {
                    goal_id,
                    added_secs: elapsed_secs,
                    total_secs: updated.total_seconds,
                    at: Utc::now(),
                });
            }
        }
        Ok(events)
    }

    fn save_context(&self) -> Result<()> {
        match &self.context {
            Some(ctx) => {
                let json = serde_json::to_string(ctx)?;
                self.store.set(SESSION_KEY, &json)?;
            }
            None => self.store.remove(SESSION_KEY)?,
        }
        Ok(())
    }
}

fn load_context(store: &dyn KvStore) -> Option<SessionContext> {
    let raw = match store.get(SESSION_KEY) {
        Ok(Some(raw)) => raw,
        Ok(None) => return None,
        Err(e) => {
            warn!(error = %e, "session context unreadable, treating as absent");
            return None;
        }
    };
    match serde_json::from_str(&raw) {
        Ok(ctx) => Some(ctx),
        Err(e) => {
            warn!(error = %e, "session context corrupt, treating as absent");
            None
        }
    }
}
