// Copyright 2025 the Wayfind Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Suspension of the context chain while a sub-widget owns the keyboard.
//!
//! Dropdown lists, pickers and similar widgets run their own keyboard
//! navigation once open. While one is engaged the controller owns input
//! routing: confirm keys are reported consumed even though the widget has
//! not closed yet, exit keys close it, and everything else passes through
//! untouched so the host can deliver it natively.
//!
//! ## Phases
//!
//! `Idle → Engaged → ExitRequested → Idle`.
//!
//! - [`SuspensionController::sync`] runs once per tick with the host's
//!   currently open sub-widget. It engages on a new open signal and returns
//!   to idle once the widget reports closed.
//! - [`SuspensionController::request_exit`] queues a collapse command and a
//!   resync instruction; the phase returns to idle when the widget confirms.
//! - [`SuspensionController::suppress_reentry`] ignores a stale open signal
//!   for one widget until that signal flips to closed. This is how a widget
//!   the host auto-opened and the engine collapsed programmatically avoids
//!   re-engaging on the frames before the host catches up.
//! - After the widget closes from a confirm key, confirm keys stay blocked
//!   for `block_frames` ticks so the same press is not handled twice.

use smallvec::{SmallVec, smallvec};
use tracing::{debug, trace};
use wayfind_navigator::{Command, Effects, NavEvent};

use crate::input::{InputEvent, Key};

/// Suspension configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SuspensionConfig {
    /// Keys the widget handles itself; reported consumed while engaged.
    pub confirm_keys: SmallVec<[Key; 4]>,
    /// Keys that close the widget.
    pub exit_keys: SmallVec<[Key; 4]>,
    /// Ticks after a close during which confirm keys stay blocked.
    pub block_frames: u8,
}

impl Default for SuspensionConfig {
    fn default() -> Self {
        Self {
            confirm_keys: smallvec![Key::Enter, Key::Space],
            exit_keys: smallvec![Key::Escape, Key::Backspace],
            block_frames: 1,
        }
    }
}

/// Current phase.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub enum SuspensionPhase<K> {
    /// Input flows to the context chain.
    #[default]
    Idle,
    /// The widget owns input.
    Engaged(K),
    /// Close requested; waiting for the widget to confirm.
    ExitRequested(K),
}

/// What the controller decided for one input event.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Verdict {
    /// Not claimed; route through the context chain.
    Declined,
    /// Claimed and consumed.
    Consumed,
    /// Belongs to the widget; skip the chain and report unconsumed.
    Passthrough,
}

/// Owns input routing while a sub-widget is open.
#[derive(Clone, Debug)]
pub struct SuspensionController<K> {
    config: SuspensionConfig,
    phase: SuspensionPhase<K>,
    suppressed: Option<K>,
    block_left: u8,
}

impl<K> Default for SuspensionController<K> {
    fn default() -> Self {
        Self::new(SuspensionConfig::default())
    }
}

impl<K> SuspensionController<K> {
    /// Create an idle controller.
    pub fn new(config: SuspensionConfig) -> Self {
        Self {
            config,
            phase: SuspensionPhase::Idle,
            suppressed: None,
            block_left: 0,
        }
    }

    /// Configuration.
    pub fn config(&self) -> &SuspensionConfig {
        &self.config
    }

    /// Current phase.
    pub fn phase(&self) -> &SuspensionPhase<K> {
        &self.phase
    }

    /// Whether a widget owns input.
    pub fn is_engaged(&self) -> bool {
        matches!(self.phase, SuspensionPhase::Engaged(_))
    }

    /// Whether confirm keys are still blocked after a close.
    pub fn blocks_outer_confirm(&self) -> bool {
        self.block_left > 0
    }

    /// Widget whose open signal is currently ignored.
    pub fn suppressed(&self) -> Option<&K> {
        self.suppressed.as_ref()
    }
}

impl<K: Clone + PartialEq + core::fmt::Debug> SuspensionController<K> {
    /// Hand input to `widget`. Refused while not idle or while `widget` is suppressed.
    pub fn engage(&mut self, widget: K) -> bool {
        if self.phase != SuspensionPhase::Idle || self.suppressed.as_ref() == Some(&widget) {
            return false;
        }
        debug!(?widget, "suspension engaged");
        self.phase = SuspensionPhase::Engaged(widget);
        true
    }

    /// Close the engaged widget and resume navigation.
    ///
    /// Queues [`Command::Collapse`] and [`NavEvent::Resync`]. Returns `false`
    /// when nothing is engaged.
    pub fn request_exit(&mut self, fx: &mut Effects<K>) -> bool {
        let SuspensionPhase::Engaged(widget) = &self.phase else {
            return false;
        };
        let widget = widget.clone();
        debug!(?widget, "suspension exit requested");
        fx.command(Command::Collapse(widget.clone()));
        fx.event(NavEvent::Resync);
        self.phase = SuspensionPhase::ExitRequested(widget);
        true
    }

    /// Ignore `widget`'s open signal until it reports closed.
    pub fn suppress_reentry(&mut self, widget: K) {
        debug!(?widget, "suspension re-entry suppressed");
        self.suppressed = Some(widget);
    }

    /// Collapse the engaged widget and keep its stale open signal from re-engaging.
    pub fn dismiss(&mut self, fx: &mut Effects<K>) -> bool {
        let SuspensionPhase::Engaged(widget) = &self.phase else {
            return false;
        };
        let widget = widget.clone();
        self.request_exit(fx);
        self.suppress_reentry(widget);
        true
    }

    /// Reconcile with the host's open sub-widget. Call once per tick.
    pub fn sync(&mut self, open: Option<&K>, fx: &mut Effects<K>) {
        self.block_left = self.block_left.saturating_sub(1);

        if let Some(s) = &self.suppressed
            && open != Some(s)
        {
            trace!(widget = ?s, "suppressed widget reported closed");
            self.suppressed = None;
        }

        match &self.phase {
            SuspensionPhase::Idle => {
                if let Some(w) = open {
                    self.engage(w.clone());
                }
            }
            SuspensionPhase::Engaged(w) if open != Some(w) => {
                debug!(widget = ?w, "engaged widget closed itself");
                self.phase = SuspensionPhase::Idle;
                self.block_left = self.config.block_frames;
                fx.event(NavEvent::Resync);
                fx.request_rescan();
            }
            SuspensionPhase::ExitRequested(w) if open != Some(w) => {
                debug!(widget = ?w, "suspension released");
                self.phase = SuspensionPhase::Idle;
                fx.request_rescan();
            }
            SuspensionPhase::Engaged(_) | SuspensionPhase::ExitRequested(_) => {}
        }
    }

    /// Decide what happens to `input`.
    pub fn handle_input(&mut self, input: &InputEvent, fx: &mut Effects<K>) -> Verdict {
        let confirm = self.config.confirm_keys.contains(&input.key);
        match self.phase {
            SuspensionPhase::Idle if confirm && self.blocks_outer_confirm() => {
                trace!(key = ?input.key, "confirm blocked after close");
                Verdict::Consumed
            }
            SuspensionPhase::Idle | SuspensionPhase::ExitRequested(_) => Verdict::Declined,
            SuspensionPhase::Engaged(_) => {
                if self.config.exit_keys.contains(&input.key) {
                    self.request_exit(fx);
                    Verdict::Consumed
                } else if confirm {
                    Verdict::Consumed
                } else {
                    Verdict::Passthrough
                }
            }
        }
    }
}
