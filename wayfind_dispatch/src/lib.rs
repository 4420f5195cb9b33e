// Copyright 2025 the Wayfind Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Wayfind Dispatch: priority-ordered input contexts with modal suspension.
//!
//! ## Overview
//!
//! - [`InputEvent`] and [`KeyMap`]: keys, modifiers, and their mapping to
//!   [`Navigation`](wayfind_navigator::Navigation) intents.
//! - [`Context`]: one screen- or mode-specific handler with a readiness
//!   predicate. By default it offers every key to the grouped navigator
//!   before its own domain handling.
//! - [`SuspensionController`]: owns input exclusively while a sub-widget such
//!   as a dropdown list is open.
//! - [`Dispatcher`]: evaluates context readiness in priority order every
//!   tick and routes input: suspension first, then the active context.
//!
//! ## Routing
//!
//! 1. Context predicates run in descending priority; the first ready one is
//!    active for this tick. Switching fires `on_deactivate` then
//!    `on_activate`.
//! 2. The suspension controller sees the event. It may consume it, pass it
//!    through to the host, or decline.
//! 3. A declined event goes to the active context. With none active the
//!    event is dropped; that is not an error.
//!
//! ## Minimal example
//!
//! ```rust
//! use wayfind_dispatch::{Context, Dispatcher, Frame, Key};
//! use wayfind_navigator::{Effects, Navigator};
//!
//! struct Always;
//!
//! impl Context<u32> for Always {
//!     fn name(&self) -> &str {
//!         "always"
//!     }
//!     fn detect_active(&mut self, _frame: &Frame<'_, u32>) -> bool {
//!         true
//!     }
//! }
//!
//! let mut dispatcher = Dispatcher::default();
//! dispatcher.register(Always, 0);
//!
//! let mut nav: Navigator<u32> = Navigator::default();
//! let mut fx = Effects::new();
//! // Nothing to navigate: the navigator consumes the key and reports emptiness.
//! assert!(dispatcher.dispatch(&Key::Down.into(), None, 0, &mut nav, &mut fx));
//! assert_eq!(dispatcher.active_name(), Some("always"));
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod context;
mod dispatcher;
mod input;
mod suspension;

pub use context::{Context, Frame, InputCx};
pub use dispatcher::Dispatcher;
pub use input::{Binding, InputEvent, Key, KeyMap, Modifiers};
pub use suspension::{SuspensionConfig, SuspensionController, SuspensionPhase, Verdict};
