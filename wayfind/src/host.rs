// Copyright 2025 the Wayfind Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Host collaborators.
//!
//! The engine never reaches into the host on its own. Each tick it receives
//! a [`Host`] bundling the three collaborators it may use, and it holds none
//! of them once the tick returns.

use wayfind_groups::{NavigableElement, TreeProvider};
use wayfind_navigator::{Edge, Value};

/// Performs actions on host elements.
pub trait ActivationService<K> {
    /// Activate (click) an element.
    fn activate(&mut self, element: &K);

    /// Write a value without triggering the host's change handlers.
    fn set_value_silently(&mut self, element: &K, value: &Value);

    /// Close a sub-widget or collapse a disclosure widget.
    fn collapse(&mut self, widget: &K);
}

/// Urgency of an announcement.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum Priority {
    /// Queue behind everything else.
    Low,
    /// Regular navigation feedback.
    #[default]
    Normal,
    /// Interrupts lower priorities.
    High,
}

/// Speech or braille output. FIFO within one priority.
pub trait Announcer {
    /// Queue `text`.
    fn announce(&mut self, text: &str, priority: Priority);
}

/// Receives navigation state changes, at most once per kind per tick.
pub trait Observer<K> {
    /// The active panel changed.
    fn on_active_panel_changed(&mut self, old: Option<&K>, new: Option<&K>) {
        let _ = (old, new);
    }

    /// The cursor moved. `element` is `None` while on a group at the group list.
    fn on_cursor_changed(&mut self, element: Option<&NavigableElement<K>>, group_label: &str) {
        let _ = (element, group_label);
    }

    /// A move was refused at an end.
    fn on_boundary(&mut self, edge: Edge) {
        let _ = edge;
    }

    /// There is nothing to navigate.
    fn on_empty(&mut self) {}

    /// The group just entered has no members.
    fn on_group_empty(&mut self, group_label: &str) {
        let _ = group_label;
    }
}

/// Observer that ignores everything.
impl<K> Observer<K> for () {}

/// Collaborators lent to the engine for one tick.
pub struct Host<'a, K> {
    /// The host's element tree.
    pub tree: &'a dyn TreeProvider<K>,
    /// Action sink.
    pub activation: &'a mut dyn ActivationService<K>,
    /// State change sink.
    pub observer: &'a mut dyn Observer<K>,
}

impl<K> core::fmt::Debug for Host<'_, K> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Host").finish_non_exhaustive()
    }
}
