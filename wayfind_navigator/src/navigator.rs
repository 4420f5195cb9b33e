// Copyright 2025 the Wayfind Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The grouped navigator state machine.

use alloc::string::String;
use core::fmt::Debug;

use kurbo::Rect;
use tracing::{debug, trace, warn};
use wayfind_groups::{GroupDescriptor, GroupKey, GroupSet, NavigableElement};

use crate::cursor::{Cursor, Level, PendingEntry};
use crate::effects::{Command, Edge, Effects, NavEvent};

/// Navigation intent, already decoupled from concrete keys.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Navigation {
    /// Next group or member.
    Next,
    /// Previous group or member.
    Prev,
    /// First group or member.
    First,
    /// Last group or member.
    Last,
    /// Enter the group, or activate the element.
    Select,
    /// Leave the group.
    Exit,
    /// Trigger the element's secondary action.
    Alternate,
}

/// Navigator configuration.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NavigatorConfig {
    /// Rescans a pending folder entry survives before it is abandoned.
    pub pending_ttl: u8,
}

impl Default for NavigatorConfig {
    fn default() -> Self {
        Self { pending_ttl: 3 }
    }
}

/// How a rescan was applied.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RescanOutcome {
    /// Same element count and roles; cursor kept, nothing announced.
    Silent,
    /// Structure changed; the cursor was restored and announced.
    Announced,
    /// Nothing to navigate.
    Empty,
}

/// Where the cursor was before a rescan.
#[derive(Clone, Debug)]
struct Anchor<K> {
    key: GroupKey<K>,
    group_label: String,
    level: Level,
    element: usize,
    target: Option<(K, String, Option<Rect>)>,
}

/// Two-level navigator over a [`GroupSet`].
///
/// At [`Level::GroupList`] the user moves between groups; selecting one
/// enters it. At [`Level::WithinGroup`] the user moves between members;
/// exit returns to the group list. Neither level wraps.
///
/// Entering a collapsed folder activates its disclosure widget and records a
/// [`PendingEntry`]; the next rescan that shows members enters the folder
/// instead of restoring the old position.
#[derive(Clone, Debug)]
pub struct Navigator<K> {
    groups: GroupSet<K>,
    cursor: Cursor<K>,
    config: NavigatorConfig,
    primed: bool,
}

impl<K> Default for Navigator<K> {
    fn default() -> Self {
        Self::new(NavigatorConfig::default())
    }
}

impl<K> Navigator<K> {
    /// Create a navigator with no groups.
    pub fn new(config: NavigatorConfig) -> Self {
        Self {
            groups: GroupSet::default(),
            cursor: Cursor::default(),
            config,
            primed: false,
        }
    }

    /// Configuration.
    pub fn config(&self) -> &NavigatorConfig {
        &self.config
    }

    /// Current groups.
    pub fn groups(&self) -> &GroupSet<K> {
        &self.groups
    }

    /// Current cursor.
    pub fn cursor(&self) -> &Cursor<K> {
        &self.cursor
    }

    /// Current level.
    pub fn level(&self) -> Level {
        self.cursor.level
    }

    /// Group under the cursor.
    pub fn current_group(&self) -> Option<&GroupDescriptor<K>> {
        self.groups.get(self.cursor.group)
    }

    /// Element under the cursor.
    ///
    /// At the group list this is only set for a standalone group, whose
    /// single member is exposed directly.
    pub fn current_element(&self) -> Option<&NavigableElement<K>> {
        let g = self.current_group()?;
        match self.cursor.level {
            Level::WithinGroup => g.members.get(self.cursor.element),
            Level::GroupList if g.standalone => g.members.first(),
            Level::GroupList => None,
        }
    }
}

impl<K: Clone + PartialEq + Debug> Navigator<K> {
    /// Replace the group set with a fresh classification pass.
    ///
    /// Order of precedence: a pending folder entry that can now be resolved,
    /// a silent update when the structure is unchanged, then restoration of
    /// the previous position by group key, element identity, label and
    /// proximity. Anything else falls back to the first valid position.
    pub fn apply_rescan(&mut self, set: GroupSet<K>, fx: &mut Effects<K>) -> RescanOutcome {
        let anchor = self.anchor();
        let previous = core::mem::replace(&mut self.groups, set);
        let primed = core::mem::replace(&mut self.primed, true);

        if self.groups.is_empty() {
            self.cursor.at_group(0);
            self.age_pending(fx);
            if !primed || !previous.is_empty() {
                fx.event(NavEvent::Empty);
            }
            debug!("rescan found nothing to navigate");
            return RescanOutcome::Empty;
        }

        if self.resolve_pending(fx) {
            fx.event(NavEvent::CursorChanged);
            return RescanOutcome::Announced;
        }

        if primed
            && previous.len() == self.groups.len()
            && previous.roles() == self.groups.roles()
        {
            self.clamp();
            trace!(groups = self.groups.len(), "rescan applied silently");
            return RescanOutcome::Silent;
        }

        self.restore(anchor);
        debug!(
            groups = self.groups.len(),
            elements = self.groups.element_count(),
            level = ?self.cursor.level,
            group = self.cursor.group,
            element = self.cursor.element,
            "rescan applied"
        );
        fx.event(NavEvent::CursorChanged);
        RescanOutcome::Announced
    }

    /// Apply one navigation intent. Returns whether it was consumed.
    ///
    /// [`Navigation::Exit`] at the group list and [`Navigation::Alternate`]
    /// without a secondary action are left to the caller.
    pub fn navigate(&mut self, nav: Navigation, fx: &mut Effects<K>) -> bool {
        if self.groups.is_empty() {
            if matches!(nav, Navigation::Exit | Navigation::Alternate) {
                return false;
            }
            fx.event(NavEvent::Empty);
            return true;
        }
        trace!(?nav, level = ?self.cursor.level, "navigate");
        match self.cursor.level {
            Level::GroupList => self.navigate_groups(nav, fx),
            Level::WithinGroup => self.navigate_members(nav, fx),
        }
    }

    /// Move the cursor to element `id`, if it is exposed.
    pub fn focus_element(&mut self, id: &K, fx: &mut Effects<K>) -> bool {
        let Some((gi, slot)) = self.groups.locate(id) else {
            return false;
        };
        let before = (self.cursor.level, self.cursor.group, self.cursor.element);
        let standalone = self.groups.get(gi).is_some_and(|g| g.standalone);
        match slot {
            Some(mi) if !standalone => self.cursor.within(gi, mi),
            _ => self.cursor.at_group(gi),
        }
        if before != (self.cursor.level, self.cursor.group, self.cursor.element) {
            fx.event(NavEvent::CursorChanged);
        }
        true
    }

    fn navigate_groups(&mut self, nav: Navigation, fx: &mut Effects<K>) -> bool {
        let current = self.cursor.group;
        match nav {
            Navigation::Next | Navigation::Prev | Navigation::First | Navigation::Last => {
                if let Some(target) = step(current, self.groups.len(), nav, fx) {
                    self.cursor.at_group(target);
                    fx.event(NavEvent::CursorChanged);
                }
                true
            }
            Navigation::Select => self.enter(fx),
            Navigation::Exit => false,
            Navigation::Alternate => {
                let alternate = self
                    .current_element()
                    .and_then(|e| e.alternate.clone());
                activate_alternate(alternate, fx)
            }
        }
    }

    fn navigate_members(&mut self, nav: Navigation, fx: &mut Effects<K>) -> bool {
        let gi = self.cursor.group;
        let Some(g) = self.groups.get(gi) else {
            self.cursor.at_group(0);
            return false;
        };
        match nav {
            Navigation::Next | Navigation::Prev | Navigation::First | Navigation::Last => {
                if let Some(target) = step(self.cursor.element, g.members.len(), nav, fx) {
                    self.cursor.within(gi, target);
                    fx.event(NavEvent::CursorChanged);
                }
                true
            }
            Navigation::Select => {
                let Some(member) = g.members.get(self.cursor.element) else {
                    return false;
                };
                fx.command(Command::Activate(member.id.clone()));
                fx.request_rescan();
                true
            }
            Navigation::Alternate => {
                let alternate = g
                    .members
                    .get(self.cursor.element)
                    .and_then(|m| m.alternate.clone());
                activate_alternate(alternate, fx)
            }
            Navigation::Exit => {
                if g.is_folder()
                    && let Some(toggle) = &g.toggle
                {
                    fx.command(Command::Collapse(toggle.id.clone()));
                    fx.request_rescan();
                }
                self.cursor.at_group(gi);
                fx.event(NavEvent::CursorChanged);
                true
            }
        }
    }

    fn enter(&mut self, fx: &mut Effects<K>) -> bool {
        let gi = self.cursor.group;
        let Some(g) = self.groups.get(gi) else {
            return false;
        };
        if g.standalone {
            if let Some(only) = g.members.first() {
                fx.command(Command::Activate(only.id.clone()));
                fx.request_rescan();
            }
            return true;
        }
        if g.is_folder() && (!g.expanded() || g.is_empty()) {
            let waiting = self
                .cursor
                .pending
                .as_ref()
                .is_some_and(|p| p.key == g.key);
            match &g.toggle {
                // Already clicked; another click would fold it back up.
                Some(_) if waiting => fx.request_rescan(),
                Some(toggle) => {
                    if !g.expanded() {
                        fx.command(Command::Activate(toggle.id.clone()));
                    }
                    fx.request_rescan();
                    debug!(group = %g.label, "folder entry deferred until rescan");
                    self.cursor.pending = Some(PendingEntry {
                        key: g.key.clone(),
                        label: g.label.clone(),
                        ttl: self.config.pending_ttl,
                    });
                }
                None => fx.event(NavEvent::GroupEmpty),
            }
            return true;
        }
        if g.is_empty() {
            fx.event(NavEvent::GroupEmpty);
            return true;
        }
        self.cursor.within(gi, 0);
        fx.event(NavEvent::CursorChanged);
        true
    }

    fn anchor(&self) -> Option<Anchor<K>> {
        let g = self.current_group()?;
        let target = match self.cursor.level {
            Level::WithinGroup => g
                .members
                .get(self.cursor.element)
                .map(|m| (m.id.clone(), m.label.clone(), m.bounds)),
            Level::GroupList => None,
        };
        Some(Anchor {
            key: g.key.clone(),
            group_label: g.label.clone(),
            level: self.cursor.level,
            element: self.cursor.element,
            target,
        })
    }

    fn resolve_pending(&mut self, fx: &mut Effects<K>) -> bool {
        let Some(pending) = self.cursor.pending.take() else {
            return false;
        };
        let found = self
            .groups
            .position_of(&pending.key)
            .or_else(|| self.groups.iter().position(|g| g.label == pending.label));
        if let Some(gi) = found
            && self.groups.get(gi).is_some_and(|g| !g.is_empty())
        {
            debug!(group = %pending.label, "pending entry resolved");
            self.cursor.within(gi, 0);
            return true;
        }
        self.cursor.pending = Some(pending);
        self.age_pending(fx);
        false
    }

    fn age_pending(&mut self, fx: &mut Effects<K>) {
        let Some(pending) = &mut self.cursor.pending else {
            return;
        };
        pending.ttl = pending.ttl.saturating_sub(1);
        if pending.ttl == 0 {
            warn!(group = %pending.label, "pending entry expired unresolved");
            self.cursor.pending = None;
        } else {
            fx.request_rescan();
        }
    }

    fn restore(&mut self, anchor: Option<Anchor<K>>) {
        let Some(anchor) = anchor else {
            self.cursor.at_group(0);
            self.normalize();
            return;
        };
        let group = self
            .groups
            .position_of(&anchor.key)
            .or_else(|| self.groups.iter().position(|g| g.label == anchor.group_label));

        if anchor.level == Level::WithinGroup
            && let Some((id, label, bounds)) = &anchor.target
        {
            if let Some((gi, Some(mi))) = self.groups.locate(id) {
                self.cursor.within(gi, mi);
            } else if let Some(gi) = group {
                let len = self.groups.get(gi).map_or(0, |g| g.members.len());
                match self.match_member(gi, label, *bounds) {
                    Some(mi) => self.cursor.within(gi, mi),
                    None if len > 0 => self.cursor.within(gi, anchor.element.min(len - 1)),
                    None => self.cursor.at_group(gi),
                }
            } else {
                self.cursor.at_group(0);
            }
        } else {
            self.cursor.at_group(group.unwrap_or(0));
        }
        self.normalize();
    }

    /// Best member of `group` labeled `label`, nearest to `bounds` when several match.
    fn match_member(&self, group: usize, label: &str, bounds: Option<Rect>) -> Option<usize> {
        let g = self.groups.get(group)?;
        let mut best: Option<(usize, f64)> = None;
        for (i, m) in g.members.iter().enumerate() {
            if m.label != label {
                continue;
            }
            let d = match (bounds, m.bounds) {
                (Some(a), Some(b)) => (a.center() - b.center()).hypot2(),
                _ => f64::INFINITY,
            };
            if best.is_none_or(|(_, bd)| d < bd) {
                best = Some((i, d));
            }
        }
        best.map(|(i, _)| i)
    }

    /// Bring the cursor back onto a live position after the set changed shape.
    fn clamp(&mut self) {
        let last = self.groups.len().saturating_sub(1);
        if self.cursor.group > last {
            self.cursor.at_group(last);
        }
        if self.cursor.level == Level::WithinGroup {
            let len = self.current_group().map_or(0, |g| g.members.len());
            if len == 0 {
                self.cursor.at_group(self.cursor.group);
            } else if self.cursor.element >= len {
                self.cursor.element = len - 1;
            }
        }
    }

    /// Apply the standalone and auto-enter rules to the restored position.
    fn normalize(&mut self) {
        self.clamp();
        let Some(g) = self.current_group() else {
            return;
        };
        let (standalone, auto_enter, empty) = (g.standalone, g.auto_enter, g.is_empty());
        match self.cursor.level {
            Level::WithinGroup if standalone || empty => self.cursor.at_group(self.cursor.group),
            Level::GroupList if auto_enter && !standalone => self.cursor.within(self.cursor.group, 0),
            _ => {}
        }
    }
}

/// Target index for a movement intent, or `None` after emitting a boundary marker.
fn step<K>(current: usize, len: usize, nav: Navigation, fx: &mut Effects<K>) -> Option<usize> {
    let last = len.saturating_sub(1);
    let (target, edge) = match nav {
        Navigation::Next => (current + 1, Edge::End),
        Navigation::Prev => (current.wrapping_sub(1), Edge::Start),
        Navigation::First => (0, Edge::Start),
        Navigation::Last => (last, Edge::End),
        _ => return None,
    };
    if target > last || target == current || len == 0 {
        fx.event(NavEvent::Boundary(edge));
        return None;
    }
    Some(target)
}

fn activate_alternate<K>(alternate: Option<K>, fx: &mut Effects<K>) -> bool {
    let Some(alternate) = alternate else {
        return false;
    };
    fx.command(Command::Activate(alternate));
    fx.request_rescan();
    true
}
