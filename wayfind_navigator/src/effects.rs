// Copyright 2025 the Wayfind Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Side effects requested during a tick.
//!
//! Navigation never calls the host directly. Every state transition appends
//! to an [`Effects`] buffer, and the caller flushes it once per tick:
//! commands go to the activation collaborator, events to the observer.

use alloc::string::String;
use alloc::vec::Vec;

/// A value written without user-visible side effects.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Value {
    /// A toggle state.
    Bool(bool),
    /// A selection index.
    Index(usize),
    /// Text content.
    Text(String),
}

/// A request for the activation collaborator.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command<K> {
    /// Activate (click) an element.
    Activate(K),
    /// Close a sub-widget or collapse a disclosure widget.
    Collapse(K),
    /// Set a value without triggering the host's change handlers.
    SetValueSilently(K, Value),
}

/// Which end of a sequence was hit.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Edge {
    /// Before the first item.
    Start,
    /// Past the last item.
    End,
}

/// Something the observer should hear about.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum NavEvent {
    /// The cursor moved to a new element or group.
    CursorChanged,
    /// A move was refused at an end; the cursor did not change.
    Boundary(Edge),
    /// There is nothing to navigate.
    Empty,
    /// The group just entered has no members.
    GroupEmpty,
    /// Navigation resumes; move the cursor to the externally focused element.
    Resync,
}

/// Buffered commands, events, and the rescan flag for one tick.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Effects<K> {
    commands: Vec<Command<K>>,
    events: Vec<NavEvent>,
    rescan: bool,
}

impl<K> Default for Effects<K> {
    fn default() -> Self {
        Self {
            commands: Vec::new(),
            events: Vec::new(),
            rescan: false,
        }
    }
}

impl<K> Effects<K> {
    /// Create an empty buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a command.
    pub fn command(&mut self, command: Command<K>) {
        self.commands.push(command);
    }

    /// Queue an event.
    pub fn event(&mut self, event: NavEvent) {
        self.events.push(event);
    }

    /// Ask for a rescan at the next opportunity.
    pub fn request_rescan(&mut self) {
        self.rescan = true;
    }

    /// Queued commands.
    pub fn commands(&self) -> &[Command<K>] {
        &self.commands
    }

    /// Queued events.
    pub fn events(&self) -> &[NavEvent] {
        &self.events
    }

    /// Whether a rescan was requested.
    pub fn rescan_requested(&self) -> bool {
        self.rescan
    }

    /// Whether nothing was queued.
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty() && self.events.is_empty() && !self.rescan
    }

    /// Take the queued commands.
    pub fn take_commands(&mut self) -> Vec<Command<K>> {
        core::mem::take(&mut self.commands)
    }

    /// Take the queued events.
    pub fn take_events(&mut self) -> Vec<NavEvent> {
        core::mem::take(&mut self.events)
    }

    /// Take and clear the rescan flag.
    pub fn take_rescan(&mut self) -> bool {
        core::mem::take(&mut self.rescan)
    }

    /// Drop everything queued.
    pub fn clear(&mut self) {
        self.commands.clear();
        self.events.clear();
        self.rescan = false;
    }
}
