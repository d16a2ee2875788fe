//! The external video-player capability.
//!
//! The application never owns the real player; it is an external
//! collaborator reached through this minimal surface. The bridge depends
//! only on [`PlayerHandle`] plus the [`PlayerSignal`] transitions the
//! player reports, which keeps the core independent of any concrete
//! embedding and lets tests substitute [`ScriptedPlayer`].

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use serde::{Deserialize, Serialize};

/// Playback-state transitions reported by the external player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlayerSignal {
    /// Playback started or resumed.
    Playing,
    /// The video reached its natural end.
    Ended,
}

/// Minimal control contract the external player must expose.
pub trait PlayerHandle {
    fn play(&mut self);
    fn pause(&mut self);
    fn mute(&mut self);
    fn unmute(&mut self);
    /// Jump to an absolute position in seconds.
    fn seek_to(&mut self, seconds: f64);
    fn set_playback_rate(&mut self, rate: f64);
    /// Current playback position in seconds.
    fn current_time(&self) -> f64;
}

/// Recorded invocation on a [`ScriptedPlayer`].
#[derive(Debug, Clone, PartialEq)]
pub enum PlayerCall {
    Play,
    Pause,
    Mute,
    Unmute,
    SeekTo(f64),
    SetRate(f64),
}

/// Player test double.
///
/// Records every call and plays back a scripted position. Clones share the
/// same call log, so a test can keep one handle while the bridge owns the
/// other.
#[derive(Debug, Clone, Default)]
pub struct ScriptedPlayer {
    calls: Rc<RefCell<Vec<PlayerCall>>>,
    position: Rc<Cell<f64>>,
}

impl ScriptedPlayer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn at_position(position: f64) -> Self {
        let player = Self::default();
        player.position.set(position);
        player
    }

    pub fn calls(&self) -> Vec<PlayerCall> {
        self.calls.borrow().clone()
    }

    pub fn last_call(&self) -> Option<PlayerCall> {
        self.calls.borrow().last().cloned()
    }
}

impl PlayerHandle for ScriptedPlayer {
    fn play(&mut self) {
        self.calls.borrow_mut().push(PlayerCall::Play);
    }

    fn pause(&mut self) {
        self.calls.borrow_mut().push(PlayerCall::Pause);
    }

    fn mute(&mut self) {
        self.calls.borrow_mut().push(PlayerCall::Mute);
    }

    fn unmute(&mut self) {
        self.calls.borrow_mut().push(PlayerCall::Unmute);
    }

    fn seek_to(&mut self, seconds: f64) {
        self.position.set(seconds);
        self.calls.borrow_mut().push(PlayerCall::SeekTo(seconds));
    }

    fn set_playback_rate(&mut self, rate: f64) {
        self.calls.borrow_mut().push(PlayerCall::SetRate(rate));
    }

    fn current_time(&self) -> f64 {
        self.position.get()
    }
}
