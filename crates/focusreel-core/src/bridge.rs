//! Playback event bridge and restricted control surface.
//!
//! Translates the player's state transitions into timer commands: `Playing`
//! starts the countdown (idempotent), `Ended` force-completes the session
//! so the video finishing early still closes the session in the viewer's
//! favor. The control methods mirror the deliberately small surface the
//! viewer gets during a focus session: play/pause, ±seek, mute, rate.
//!
//! The bridge tolerates operating before a player is attached: every
//! control call is then a no-op, and signals still reach the timer.

use tracing::debug;

use crate::events::Event;
use crate::player::{PlayerHandle, PlayerSignal};
use crate::timer::SessionTimer;

/// Playback rates offered by the restricted control surface.
pub const RATE_PRESETS: [f64; 6] = [0.5, 1.0, 1.25, 1.5, 1.75, 2.0];

pub struct PlaybackBridge {
    player: Option<Box<dyn PlayerHandle>>,
    playing: bool,
    muted: bool,
    seek_step_secs: u64,
}

impl PlaybackBridge {
    pub fn new(seek_step_secs: u64) -> Self {
        Self {
            player: None,
            playing: false,
            muted: false,
            seek_step_secs,
        }
    }

    /// Hand the external player to the bridge once it is ready.
    pub fn attach(&mut self, mut player: Box<dyn PlayerHandle>, start_muted: bool) {
        if start_muted {
            player.mute();
        }
        self.muted = start_muted;
        self.player = Some(player);
    }

    pub fn is_attached(&self) -> bool {
        self.player.is_some()
    }

    // ── Signals ──────────────────────────────────────────────────────

    /// Route a playback-state transition into the timer. Returns the timer
    /// event it produced, if any; `Ended` yields the (at most one)
    /// completion event the session owner must consume.
    pub fn on_signal(&mut self, timer: &mut SessionTimer, signal: PlayerSignal) -> Option<Event> {
        debug!(?signal, "player signal");
        match signal {
            PlayerSignal::Playing => {
                self.playing = true;
                timer.start()
            }
            PlayerSignal::Ended => {
                self.playing = false;
                timer.complete_now()
            }
        }
    }

    // ── Restricted control surface ───────────────────────────────────

    /// Toggle between playing and paused. No-op without a player.
    pub fn toggle_play(&mut self) {
        let Some(player) = self.player.as_mut() else {
            return;
        };
        if self.playing {
            player.pause();
        } else {
            player.play();
        }
        self.playing = !self.playing;
    }

    /// Jump backwards by the configured step, clamped at the start.
    pub fn seek_back(&mut self) {
        self.seek_by(-(self.seek_step_secs as f64));
    }

    /// Jump forwards by the configured step.
    pub fn seek_forward(&mut self) {
        self.seek_by(self.seek_step_secs as f64);
    }

    fn seek_by(&mut self, delta_secs: f64) {
        let Some(player) = self.player.as_mut() else {
            return;
        };
        let target = (player.current_time() + delta_secs).max(0.0);
        player.seek_to(target);
    }

    /// Toggle between muted and unmuted. No-op without a player.
    pub fn toggle_mute(&mut self) {
        let Some(player) = self.player.as_mut() else {
            return;
        };
        if self.muted {
            player.unmute();
        } else {
            player.mute();
        }
        self.muted = !self.muted;
    }

    /// Change playback speed. Rejects non-positive rates; no-op without a
    /// player.
    pub fn set_rate(&mut self, rate: f64) {
        if rate <= 0.0 {
            return;
        }
        if let Some(player) = self.player.as_mut() {
            player.set_playback_rate(rate);
        }
    }
}
