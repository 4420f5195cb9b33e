// Copyright 2025 the Wayfind Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Priority-ordered context dispatch.

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::fmt::Debug;

use tracing::{debug, trace};
use wayfind_navigator::{Effects, Navigator};

use crate::context::{Context, Frame, InputCx};
use crate::input::{InputEvent, KeyMap};
use crate::suspension::{SuspensionConfig, SuspensionController, Verdict};

struct Registered<K: Clone + PartialEq + Debug> {
    priority: i32,
    context: Box<dyn Context<K>>,
}

/// Routes input through the suspension controller and the active context.
///
/// Contexts are kept sorted by descending priority; equal priorities keep
/// registration order. Readiness is re-evaluated on every dispatch, so a
/// context stays active only as long as no higher-priority context is ready
/// and its own predicate holds.
pub struct Dispatcher<K: Clone + PartialEq + Debug> {
    contexts: Vec<Registered<K>>,
    active: Option<usize>,
    suspension: SuspensionController<K>,
    keymap: KeyMap,
}

impl<K: Clone + PartialEq + Debug> Debug for Dispatcher<K> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let names: Vec<(&str, i32)> = self
            .contexts
            .iter()
            .map(|r| (r.context.name(), r.priority))
            .collect();
        f.debug_struct("Dispatcher")
            .field("contexts", &names)
            .field("active", &self.active_name())
            .field("suspension", &self.suspension)
            .field("keymap", &self.keymap)
            .finish()
    }
}

impl<K: Clone + PartialEq + Debug> Default for Dispatcher<K> {
    fn default() -> Self {
        Self::new(KeyMap::default(), SuspensionConfig::default())
    }
}

impl<K: Clone + PartialEq + Debug> Dispatcher<K> {
    /// Create a dispatcher with no contexts.
    pub fn new(keymap: KeyMap, suspension: SuspensionConfig) -> Self {
        Self {
            contexts: Vec::new(),
            active: None,
            suspension: SuspensionController::new(suspension),
            keymap,
        }
    }

    /// Register a context. Higher priority is asked first.
    pub fn register(&mut self, context: impl Context<K> + 'static, priority: i32) {
        let at = self
            .contexts
            .iter()
            .position(|r| r.priority < priority)
            .unwrap_or(self.contexts.len());
        if let Some(a) = self.active
            && at <= a
        {
            self.active = Some(a + 1);
        }
        self.contexts.insert(
            at,
            Registered {
                priority,
                context: Box::new(context),
            },
        );
    }

    /// Number of registered contexts.
    pub fn len(&self) -> usize {
        self.contexts.len()
    }

    /// Whether no context is registered.
    pub fn is_empty(&self) -> bool {
        self.contexts.is_empty()
    }

    /// Name of the context active after the last dispatch.
    pub fn active_name(&self) -> Option<&str> {
        self.active
            .and_then(|i| self.contexts.get(i))
            .map(|r| r.context.name())
    }

    /// Key map.
    pub fn keymap(&self) -> &KeyMap {
        &self.keymap
    }

    /// Replace the key map.
    pub fn set_keymap(&mut self, keymap: KeyMap) {
        self.keymap = keymap;
    }

    /// Suspension controller.
    pub fn suspension(&self) -> &SuspensionController<K> {
        &self.suspension
    }

    /// Mutable suspension controller, for contexts driving engage/dismiss from outside.
    pub fn suspension_mut(&mut self) -> &mut SuspensionController<K> {
        &mut self.suspension
    }

    /// Re-evaluate readiness and fire activation hooks on a switch.
    pub fn refresh(&mut self, frame: &Frame<'_, K>, fx: &mut Effects<K>) {
        let next = self
            .contexts
            .iter_mut()
            .position(|r| r.context.detect_active(frame));
        if next == self.active {
            return;
        }
        if let Some(old) = self.active.and_then(|i| self.contexts.get_mut(i)) {
            old.context.on_deactivate();
        }
        if let Some(new) = next.and_then(|i| self.contexts.get_mut(i)) {
            debug!(context = new.context.name(), "context activated");
            new.context.on_activate(frame, fx);
        } else {
            debug!("no context active");
        }
        self.active = next;
    }

    /// Route one input event. Returns whether it was consumed.
    ///
    /// The suspension controller sees the event first. If it declines, the
    /// active context handles it. With no active context the event is
    /// dropped.
    pub fn dispatch(
        &mut self,
        input: &InputEvent,
        panel: Option<&K>,
        now: u64,
        navigator: &mut Navigator<K>,
        fx: &mut Effects<K>,
    ) -> bool {
        let frame = Frame {
            active_panel: panel,
            groups: navigator.groups(),
            now,
        };
        self.refresh(&frame, fx);

        match self.suspension.handle_input(input, fx) {
            Verdict::Consumed => return true,
            Verdict::Passthrough => return false,
            Verdict::Declined => {}
        }

        let Some(registered) = self.active.and_then(|i| self.contexts.get_mut(i)) else {
            trace!(key = ?input.key, "no active context; input dropped");
            return false;
        };
        let mut cx = InputCx {
            navigator,
            effects: fx,
            keymap: &self.keymap,
        };
        let consumed = registered.context.handle_input(input, &mut cx);
        trace!(
            context = registered.context.name(),
            key = ?input.key,
            consumed,
            "input routed"
        );
        consumed
    }
}
