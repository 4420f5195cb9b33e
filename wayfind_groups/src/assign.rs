// Copyright 2025 the Wayfind Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Group assignment: turns a [`Snapshot`] into an ordered [`GroupSet`].

use alloc::string::String;
use alloc::vec::Vec;
use core::fmt::Debug;
use core::hash::Hash;

use hashbrown::{HashMap, HashSet};
use tracing::{debug, warn};

use crate::classify::classify;
use crate::provider::Snapshot;
use crate::rules::{GroupKind, RuleTable};
use crate::types::{NavigableElement, NodeFlags, RawNode, Role};

/// Identity of a group, stable across rescans while the structure is stable.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum GroupKey<K> {
    /// Group of the rule at this index.
    Rule(usize),
    /// One folder instance: the folder rule and the ancestor that matched it.
    Folder {
        /// Rule index.
        rule: usize,
        /// Matching ancestor.
        root: K,
    },
    /// Elements no rule matched.
    CatchAll,
}

impl<K> GroupKey<K> {
    /// Declaration slot used for ordering; the catch-all sorts last.
    fn slot(&self) -> usize {
        match self {
            Self::Rule(i) | Self::Folder { rule: i, .. } => *i,
            Self::CatchAll => usize::MAX,
        }
    }
}

/// Where one node landed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Assignment<K> {
    /// Target group.
    pub key: GroupKey<K>,
    /// The node is the disclosure widget of a folder group.
    pub toggle: bool,
}

/// Presentation class of a group.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum GroupClass {
    /// A plain group.
    Ordinary,
    /// The overlay-exclusive group currently hiding all others.
    Overlay {
        /// Declared priority.
        priority: i32,
    },
    /// A folder; members appear after its toggle is activated.
    Folder,
}

/// One navigable group.
#[derive(Clone, Debug, PartialEq)]
pub struct GroupDescriptor<K> {
    /// Group identity.
    pub key: GroupKey<K>,
    /// Presentation class.
    pub class: GroupClass,
    /// Label to present.
    pub label: String,
    /// Members, in document order.
    pub members: Vec<NavigableElement<K>>,
    /// Disclosure widget of a folder.
    pub toggle: Option<NavigableElement<K>>,
    /// The group's single member is exposed directly at group-list level.
    pub standalone: bool,
    /// The group is entered automatically after a rescan.
    pub auto_enter: bool,
}

impl<K> GroupDescriptor<K> {
    /// Whether this is a folder group.
    pub fn is_folder(&self) -> bool {
        self.class == GroupClass::Folder
    }

    /// Whether a folder's disclosure widget reports expanded.
    ///
    /// Folders without a captured toggle count as expanded once they have
    /// members. Non-folders are always expanded.
    pub fn expanded(&self) -> bool {
        match (&self.toggle, self.is_folder()) {
            (_, false) => true,
            (Some(t), true) => t.is_active(),
            (None, true) => !self.members.is_empty(),
        }
    }

    /// Number of members.
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Whether the group has no members.
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

/// Ordered groups produced by one classification pass.
#[derive(Clone, Debug, PartialEq)]
pub struct GroupSet<K> {
    groups: Vec<GroupDescriptor<K>>,
}

impl<K> Default for GroupSet<K> {
    fn default() -> Self {
        Self { groups: Vec::new() }
    }
}

impl<K> GroupSet<K> {
    /// Number of groups.
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// Whether there is nothing to navigate.
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Group at `index`.
    pub fn get(&self, index: usize) -> Option<&GroupDescriptor<K>> {
        self.groups.get(index)
    }

    /// Groups in presentation order.
    pub fn iter(&self) -> core::slice::Iter<'_, GroupDescriptor<K>> {
        self.groups.iter()
    }

    /// Every exposed element: each group's toggle, then its members.
    pub fn elements(&self) -> impl Iterator<Item = &NavigableElement<K>> + '_ {
        self.groups
            .iter()
            .flat_map(|g| g.toggle.iter().chain(g.members.iter()))
    }

    /// Number of exposed elements, folder toggles included.
    pub fn element_count(&self) -> usize {
        self.groups
            .iter()
            .map(|g| g.members.len() + usize::from(g.toggle.is_some()))
            .sum()
    }

    /// Role sequence over [`elements`](Self::elements).
    pub fn roles(&self) -> Vec<Role> {
        self.elements().map(|e| e.role).collect()
    }

    /// The overlay-exclusive group, if one is exposed.
    pub fn overlay(&self) -> Option<&GroupDescriptor<K>> {
        self.groups
            .iter()
            .find(|g| matches!(g.class, GroupClass::Overlay { .. }))
    }
}

impl<K: PartialEq> GroupSet<K> {
    /// Index of the group with `key`.
    pub fn position_of(&self, key: &GroupKey<K>) -> Option<usize> {
        self.groups.iter().position(|g| g.key == *key)
    }

    /// Group index and member index of element `id`.
    ///
    /// The member index is `None` when `id` is a folder toggle.
    pub fn locate(&self, id: &K) -> Option<(usize, Option<usize>)> {
        self.groups.iter().enumerate().find_map(|(gi, g)| {
            if g.toggle.as_ref().is_some_and(|t| t.id == *id) {
                return Some((gi, None));
            }
            g.members
                .iter()
                .position(|m| m.id == *id)
                .map(|mi| (gi, Some(mi)))
        })
    }
}

impl<'a, K> IntoIterator for &'a GroupSet<K> {
    type Item = &'a GroupDescriptor<K>;
    type IntoIter = core::slice::Iter<'a, GroupDescriptor<K>>;

    fn into_iter(self) -> Self::IntoIter {
        self.groups.iter()
    }
}

/// Assigns captured nodes to groups using a [`RuleTable`].
#[derive(Clone, Debug, Default)]
pub struct GroupAssigner {
    rules: RuleTable,
}

impl GroupAssigner {
    /// Create an assigner over `rules`.
    pub fn new(rules: RuleTable) -> Self {
        Self { rules }
    }

    /// The rule table.
    pub fn rules(&self) -> &RuleTable {
        &self.rules
    }

    /// Assign one node.
    ///
    /// Ancestors are tried from the parent upwards; the first one any rule
    /// matches decides, and among rules matching that ancestor the most
    /// specific one wins. No match lands in the catch-all group.
    pub fn assign_one<K: Clone>(&self, raw: &RawNode<K>) -> Assignment<K> {
        for ancestor in raw.path.iter().rev() {
            let Some(rule) = self.rules.best_match(&ancestor.name) else {
                continue;
            };
            let Some(def) = self.rules.get(rule) else {
                break;
            };
            return match &def.kind {
                GroupKind::Folder { toggle } => Assignment {
                    key: GroupKey::Folder {
                        rule,
                        root: ancestor.id.clone(),
                    },
                    toggle: toggle.matches(&raw.name),
                },
                GroupKind::Ordinary | GroupKind::Overlay { .. } => Assignment {
                    key: GroupKey::Rule(rule),
                    toggle: false,
                },
            };
        }
        Assignment {
            key: GroupKey::CatchAll,
            toggle: false,
        }
    }

    /// Build the group set for a snapshot.
    ///
    /// Filtering drops duplicate identities (first occurrence wins), nodes
    /// outside `scope`, nodes without bounds, and decoration. Every remaining
    /// node lands in exactly one group, as a member or as a folder toggle.
    pub fn build<K>(&self, snapshot: &Snapshot<K>, scope: Option<&K>) -> GroupSet<K>
    where
        K: Clone + Eq + Hash + Debug,
    {
        let mut seen: HashSet<K> = HashSet::with_capacity(snapshot.nodes.len());
        let mut index: HashMap<GroupKey<K>, usize> = HashMap::new();
        let mut groups: Vec<GroupDescriptor<K>> = Vec::new();

        for raw in &snapshot.nodes {
            if !seen.insert(raw.id.clone()) {
                continue;
            }
            if let Some(root) = scope
                && !raw.is_within(root)
            {
                continue;
            }
            if !raw.flags.contains(NodeFlags::BOUNDED) {
                continue;
            }
            let role = classify(raw);
            if role == Role::Decoration {
                continue;
            }

            let Assignment { key, toggle } = self.assign_one(raw);
            let slot = *index.entry(key.clone()).or_insert_with(|| {
                groups.push(self.descriptor(key));
                groups.len() - 1
            });
            let element = NavigableElement::from_raw(raw, role);
            let group = &mut groups[slot];
            if toggle && group.toggle.is_none() {
                group.label.clone_from(&element.label);
                group.toggle = Some(element);
            } else {
                group.members.push(element);
            }
        }

        let groups = Self::resolve_overlays(groups);
        let mut set = GroupSet { groups };
        set.groups.sort_by_key(|g| g.key.slot());
        if let [only] = set.groups.as_mut_slice()
            && !only.is_folder()
        {
            only.standalone = only.members.len() == 1;
            only.auto_enter = !only.members.is_empty();
        }
        debug!(
            groups = set.len(),
            elements = set.element_count(),
            "group set built"
        );
        set
    }

    fn descriptor<K>(&self, key: GroupKey<K>) -> GroupDescriptor<K> {
        let rule = match &key {
            GroupKey::Rule(i) | GroupKey::Folder { rule: i, .. } => self.rules.get(*i),
            GroupKey::CatchAll => None,
        };
        let (class, label) = match rule {
            Some(r) => (
                match r.kind {
                    GroupKind::Ordinary => GroupClass::Ordinary,
                    GroupKind::Overlay { priority } => GroupClass::Overlay { priority },
                    GroupKind::Folder { .. } => GroupClass::Folder,
                },
                r.label.clone(),
            ),
            None => (GroupClass::Ordinary, String::from(self.rules.catch_all_label())),
        };
        GroupDescriptor {
            key,
            class,
            label,
            members: Vec::new(),
            toggle: None,
            standalone: false,
            auto_enter: false,
        }
    }

    /// Keep only the winning overlay group when any overlay is present.
    ///
    /// Ties go to the earlier declaration.
    fn resolve_overlays<K>(groups: Vec<GroupDescriptor<K>>) -> Vec<GroupDescriptor<K>> {
        let mut overlays = 0_usize;
        let mut winner: Option<(i32, GroupDescriptor<K>)> = None;
        let mut rest = Vec::with_capacity(groups.len());
        for g in groups {
            let GroupClass::Overlay { priority } = g.class else {
                rest.push(g);
                continue;
            };
            overlays += 1;
            let replace = winner.as_ref().is_none_or(|(p, w)| {
                priority > *p || (priority == *p && g.key.slot() < w.key.slot())
            });
            if replace {
                winner = Some((priority, g));
            }
        }
        let Some((priority, winner)) = winner else {
            return rest;
        };
        if overlays > 1 {
            warn!(
                overlays,
                priority,
                winner = %winner.label,
                "conflicting overlay groups; keeping the highest priority"
            );
        }
        alloc::vec![winner]
    }
}
