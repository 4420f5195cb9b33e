// Copyright 2025 the Wayfind Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Wayfind Groups: from a raw element snapshot to navigable groups.
//!
//! ## Overview
//!
//! The host interface is a flat, constantly changing set of elements. This
//! crate turns one moment of it into a stable two-level model.
//!
//! - [`TreeProvider`]: the narrow read-only contract the host implements.
//! - [`capture`]: freezes the provider's answers into an owned [`Snapshot`].
//! - [`classify`]: assigns each captured node a coarse [`Role`].
//! - [`RuleTable`]: a validated declarative table of structural patterns.
//! - [`GroupAssigner`]: filters the snapshot and assigns every surviving
//!   element to exactly one group, producing an ordered [`GroupSet`].
//!
//! ## Grouping
//!
//! Each element's ancestry is matched against the rule table, nearest
//! ancestor first. The most specific rule matching that ancestor wins;
//! elements no rule claims go to a catch-all group presented last.
//!
//! - Overlay rules are exclusive: when any element lands in one, every other
//!   group is hidden. Among several, the highest priority wins.
//! - Folder rules produce one group per matching ancestor. The element that
//!   matches the toggle pattern is the folder's disclosure widget.
//!
//! ## Minimal example
//!
//! ```rust
//! use wayfind_groups::{
//!     Ancestor, GroupAssigner, GroupRule, NodeFlags, Pattern, RawNode, RoleHint, RuleTable,
//!     Snapshot,
//! };
//!
//! let rules = RuleTable::new(vec![GroupRule::ordinary("Hand", Pattern::Prefix("Hand".into()))])
//!     .unwrap();
//! let card = RawNode {
//!     id: 2_u32,
//!     name: "Card".into(),
//!     label: "Strike".into(),
//!     path: [Ancestor { id: 1, name: "HandArea".into() }].into_iter().collect(),
//!     flags: NodeFlags::BOUNDED,
//!     hint: RoleHint::Button,
//!     bounds: None,
//!     alternate: None,
//! };
//! let snapshot = Snapshot { nodes: vec![card], ..Snapshot::default() };
//!
//! let groups = GroupAssigner::new(rules).build(&snapshot, None);
//! assert_eq!(groups.len(), 1);
//! assert!(groups.get(0).unwrap().standalone);
//! ```
//!
//! ## Features
//!
//! - `std` (default): forwards to `kurbo/std`.
//! - `libm`: float math for `no_std` targets via `kurbo/libm`.
//! - `serde`: derives `Serialize`/`Deserialize` for rules and hints.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod assign;
mod classify;
mod provider;
mod rules;
mod types;

pub use assign::{Assignment, GroupAssigner, GroupClass, GroupDescriptor, GroupKey, GroupSet};
pub use classify::classify;
pub use provider::{Snapshot, TreeProvider, capture};
pub use rules::{GroupKind, GroupRule, Pattern, RuleError, RuleTable};
pub use types::{Ancestor, AncestryPath, NavigableElement, NodeFlags, RawNode, Role, RoleHint};
