// Copyright 2025 the Wayfind Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A minimal structural narrator.

use alloc::format;
use alloc::string::String;

use wayfind_groups::NavigableElement;
use wayfind_navigator::Edge;

use crate::host::{Announcer, Observer, Priority};

/// Fixed phrases used by [`Narrator`]. Hosts supply their own translations.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Wording {
    /// Spoken when a move is refused at the start.
    pub top: String,
    /// Spoken when a move is refused at the end.
    pub bottom: String,
    /// Spoken when nothing is navigable.
    pub empty: String,
    /// Appended to a group label when the group has no members.
    pub group_empty: String,
}

impl Default for Wording {
    fn default() -> Self {
        Self {
            top: String::from("Top"),
            bottom: String::from("Bottom"),
            empty: String::from("Nothing to navigate"),
            group_empty: String::from("empty"),
        }
    }
}

/// Forwards element labels, group labels and boundary markers to an [`Announcer`].
///
/// Domain-specific wording is out of its reach; wrap or replace it for that.
#[derive(Clone, Debug)]
pub struct Narrator<A> {
    announcer: A,
    wording: Wording,
}

impl<A: Announcer> Narrator<A> {
    /// Narrate through `announcer` with default wording.
    pub fn new(announcer: A) -> Self {
        Self::with_wording(announcer, Wording::default())
    }

    /// Narrate with custom wording.
    pub fn with_wording(announcer: A, wording: Wording) -> Self {
        Self { announcer, wording }
    }

    /// The wrapped announcer.
    pub fn announcer(&self) -> &A {
        &self.announcer
    }

    /// The wrapped announcer, mutably.
    pub fn announcer_mut(&mut self) -> &mut A {
        &mut self.announcer
    }

    /// Unwrap the announcer.
    pub fn into_inner(self) -> A {
        self.announcer
    }
}

impl<K, A: Announcer> Observer<K> for Narrator<A> {
    fn on_cursor_changed(&mut self, element: Option<&NavigableElement<K>>, group_label: &str) {
        match element {
            Some(e) => self.announcer.announce(&e.label, Priority::Normal),
            None => self.announcer.announce(group_label, Priority::Normal),
        }
    }

    fn on_boundary(&mut self, edge: Edge) {
        let text = match edge {
            Edge::Start => &self.wording.top,
            Edge::End => &self.wording.bottom,
        };
        self.announcer.announce(text, Priority::Low);
    }

    fn on_empty(&mut self) {
        self.announcer.announce(&self.wording.empty, Priority::Normal);
    }

    fn on_group_empty(&mut self, group_label: &str) {
        let text = format!("{group_label}, {}", self.wording.group_empty);
        self.announcer.announce(&text, Priority::Normal);
    }
}
