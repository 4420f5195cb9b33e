// Copyright 2025 the Wayfind Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Wayfind Navigator: the two-level grouped navigation state machine.
//!
//! ## Overview
//!
//! - [`Navigator`] holds the current [`GroupSet`](wayfind_groups::GroupSet)
//!   and a [`Cursor`]. It moves between groups ([`Level::GroupList`]) and
//!   within one group ([`Level::WithinGroup`]) in response to
//!   [`Navigation`] intents.
//! - Every transition appends to an [`Effects`] buffer: [`Command`]s for the
//!   activation collaborator, [`NavEvent`]s for the observer, and a rescan
//!   request flag. The navigator itself never touches the host.
//! - [`RescanScheduler`] debounces rescan requests against host time.
//!
//! ## Semantics
//!
//! - Groups keep their declaration order; members keep document order.
//! - Moving past either end is a no-op that emits [`NavEvent::Boundary`].
//! - A standalone group exposes its single element at the group list;
//!   selecting it activates the element directly.
//! - A sole group with members is entered automatically after a rescan.
//! - Entering a collapsed folder activates its disclosure widget and defers
//!   the entry until a rescan shows the folder's members.
//! - A rescan whose role sequence is unchanged is applied silently and keeps
//!   the cursor where it was.
//!
//! ## Minimal example
//!
//! ```rust
//! use wayfind_groups::GroupSet;
//! use wayfind_navigator::{Effects, Navigation, NavEvent, Navigator, RescanOutcome};
//!
//! let mut nav: Navigator<u32> = Navigator::default();
//! let mut fx = Effects::new();
//!
//! assert_eq!(nav.apply_rescan(GroupSet::default(), &mut fx), RescanOutcome::Empty);
//! assert!(nav.navigate(Navigation::Next, &mut fx));
//! assert_eq!(fx.take_events(), vec![NavEvent::Empty, NavEvent::Empty]);
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod cursor;
mod effects;
mod navigator;
mod rescan;

pub use cursor::{Cursor, Level, PendingEntry};
pub use effects::{Command, Edge, Effects, NavEvent, Value};
pub use navigator::{Navigation, Navigator, NavigatorConfig, RescanOutcome};
pub use rescan::{RescanConfig, RescanScheduler};
