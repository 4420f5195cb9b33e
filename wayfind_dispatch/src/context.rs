// Copyright 2025 the Wayfind Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The context contract.

use core::fmt::Debug;

use wayfind_groups::GroupSet;
use wayfind_navigator::{Effects, Navigator};

use crate::input::{InputEvent, KeyMap};

/// Read-only view of the committed state handed to context predicates.
#[derive(Debug)]
pub struct Frame<'a, K> {
    /// Active panel after this tick's reconciliation.
    pub active_panel: Option<&'a K>,
    /// Groups the navigator currently exposes.
    pub groups: &'a GroupSet<K>,
    /// Host time of this tick.
    pub now: u64,
}

/// Mutable state a context may act on while handling input.
#[derive(Debug)]
pub struct InputCx<'a, K> {
    /// The grouped navigator.
    pub navigator: &'a mut Navigator<K>,
    /// This tick's effect buffer.
    pub effects: &'a mut Effects<K>,
    /// Key map used to translate keys into navigation intents.
    pub keymap: &'a KeyMap,
}

impl<K: Clone + PartialEq + Debug> InputCx<'_, K> {
    /// Translate `input` with the key map and apply it to the navigator.
    ///
    /// Returns whether the navigator consumed it.
    pub fn offer_to_navigator(&mut self, input: &InputEvent) -> bool {
        let Some(nav) = self.keymap.navigation_for(input) else {
            return false;
        };
        self.navigator.navigate(nav, self.effects)
    }
}

/// One screen- or mode-specific input handler.
///
/// Contexts are registered with a priority. Every tick the dispatcher asks
/// them in priority order whether they are ready; the first that says yes is
/// active for that tick and receives input.
pub trait Context<K: Clone + PartialEq + Debug> {
    /// Name used in logs.
    fn name(&self) -> &str;

    /// Whether this context should handle input this tick.
    fn detect_active(&mut self, frame: &Frame<'_, K>) -> bool;

    /// Handle one input event. Returns whether it was consumed.
    ///
    /// The default offers the event to the grouped navigator first, then
    /// to [`handle_domain_input`](Self::handle_domain_input).
    fn handle_input(&mut self, input: &InputEvent, cx: &mut InputCx<'_, K>) -> bool {
        cx.offer_to_navigator(input) || self.handle_domain_input(input, cx)
    }

    /// Context-specific handling for input the navigator did not consume.
    fn handle_domain_input(&mut self, input: &InputEvent, cx: &mut InputCx<'_, K>) -> bool {
        let _ = (input, cx);
        false
    }

    /// Called when this context becomes active.
    fn on_activate(&mut self, frame: &Frame<'_, K>, fx: &mut Effects<K>) {
        let _ = (frame, fx);
    }

    /// Called when this context stops being active.
    fn on_deactivate(&mut self) {}
}
