// Copyright 2025 the Wayfind Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Navigation cursor.

use alloc::string::String;
use wayfind_groups::GroupKey;

/// Which level of the two-level model the cursor is on.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum Level {
    /// Moving between groups.
    #[default]
    GroupList,
    /// Moving between the members of one group.
    WithinGroup,
}

/// A group to enter once a rescan populates it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PendingEntry<K> {
    /// Group to enter.
    pub key: GroupKey<K>,
    /// Its label at the time of the request.
    pub label: String,
    /// Rescans left before the request is abandoned.
    pub ttl: u8,
}

/// Position in the current group set.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Cursor<K> {
    /// Current level.
    pub level: Level,
    /// Group index.
    pub group: usize,
    /// Member index; meaningful at [`Level::WithinGroup`].
    pub element: usize,
    /// Deferred entry waiting for a rescan.
    pub pending: Option<PendingEntry<K>>,
}

impl<K> Default for Cursor<K> {
    fn default() -> Self {
        Self {
            level: Level::GroupList,
            group: 0,
            element: 0,
            pending: None,
        }
    }
}

impl<K> Cursor<K> {
    /// Move to the group list at `group`.
    pub(crate) fn at_group(&mut self, group: usize) {
        self.level = Level::GroupList;
        self.group = group;
        self.element = 0;
    }

    /// Move inside `group` at `element`.
    pub(crate) fn within(&mut self, group: usize, element: usize) {
        self.level = Level::WithinGroup;
        self.group = group;
        self.element = element;
    }
}
