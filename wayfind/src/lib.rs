// Copyright 2025 the Wayfind Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Wayfind: an assistive navigation state engine.
//!
//! Wayfind sits on top of a graphical interface it does not own. It works out
//! which panel is in front, turns the elements on screen into a stable
//! two-level model of groups and members, and lets a keyboard user move
//! through that model and act on it while the host keeps animating,
//! opening, closing and re-parenting things underneath.
//!
//! ## Crates
//!
//! - [`panels`]: detector contract, detector adapters, and the panel
//!   reconciler that picks the single active panel each tick.
//! - [`groups`]: tree-provider contract, snapshot capture, classification,
//!   and declarative group assignment.
//! - [`navigator`]: the grouped navigator and rescan debouncing.
//! - [`dispatch`]: input model, priority-ordered contexts, and sub-widget
//!   suspension.
//!
//! This crate adds the [`Engine`] that runs them in a fixed order each tick,
//! the host collaborator traits ([`ActivationService`], [`Observer`],
//! [`Announcer`]), and a minimal [`Narrator`].
//!
//! ## Minimal example
//!
//! ```rust
//! use wayfind::groups::{RoleHint, RuleTable, TreeProvider};
//! use wayfind::navigator::Value;
//! use wayfind::{ActivationService, Engine, EngineConfig, Host};
//!
//! /// A host with a single button.
//! struct OneButton;
//!
//! impl TreeProvider<u32> for OneButton {
//!     fn snapshot(&self, _root: Option<&u32>) -> Vec<u32> {
//!         vec![1]
//!     }
//!     fn name(&self, _node: &u32) -> String {
//!         "Continue".into()
//!     }
//!     fn ancestry(&self, _node: &u32) -> Vec<u32> {
//!         vec![]
//!     }
//!     fn is_active(&self, _node: &u32) -> bool {
//!         false
//!     }
//!     fn role_hint(&self, _node: &u32) -> RoleHint {
//!         RoleHint::Button
//!     }
//!     fn has_bounds(&self, _node: &u32) -> bool {
//!         true
//!     }
//! }
//!
//! #[derive(Default)]
//! struct Clicks(Vec<u32>);
//!
//! impl ActivationService<u32> for Clicks {
//!     fn activate(&mut self, element: &u32) {
//!         self.0.push(*element);
//!     }
//!     fn set_value_silently(&mut self, _element: &u32, _value: &Value) {}
//!     fn collapse(&mut self, _widget: &u32) {}
//! }
//!
//! struct Always;
//!
//! impl wayfind::dispatch::Context<u32> for Always {
//!     fn name(&self) -> &str {
//!         "always"
//!     }
//!     fn detect_active(&mut self, _frame: &wayfind::dispatch::Frame<'_, u32>) -> bool {
//!         true
//!     }
//! }
//!
//! let mut engine = Engine::new(EngineConfig::default(), RuleTable::default());
//! engine.register_context(Always, 0);
//!
//! let mut clicks = Clicks::default();
//! let mut host = Host { tree: &OneButton, activation: &mut clicks, observer: &mut () };
//! assert!(engine.handle_input(0, &wayfind::dispatch::Key::Enter.into(), &mut host));
//! assert_eq!(clicks.0, vec![1]);
//! ```
//!
//! ## Features
//!
//! - `std` (default): forwards to the member crates.
//! - `libm`: float math for `no_std` targets.
//! - `serde`: derives `Serialize`/`Deserialize` for [`EngineConfig`] and every
//!   configuration and rule type it contains.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod config;
mod engine;
mod host;
mod narrator;

pub use wayfind_dispatch as dispatch;
pub use wayfind_groups as groups;
pub use wayfind_navigator as navigator;
pub use wayfind_panels as panels;

pub use config::EngineConfig;
pub use engine::Engine;
pub use host::{ActivationService, Announcer, Host, Observer, Priority};
pub use narrator::{Narrator, Wording};
