// Copyright 2025 the Wayfind Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Wayfind Panels: deterministic panel lifecycle reconciliation.
//!
//! ## Overview
//!
//! A host interface can be foregrounding any of several surfaces ("panels") at
//! once: a content screen, a popup over it, a modal over both. No single
//! signal tells reliably which one is in front. This crate merges several
//! imperfect signals into one authoritative answer.
//!
//! - [`Detector`]: one strategy observing one kind of host signal. Ready-made
//!   strategies live in [`adapters`].
//! - [`PanelRecord`]: what the reconciler believes about one panel.
//! - [`Reconciler`]: owns the records, audits them, and selects the single
//!   active panel once per tick.
//!
//! ## Selection
//!
//! The active panel is the [`Liveness::Open`] record with the highest
//! priority. Equal priorities resolve to the most recent report. Before
//! selecting, every record whose detector can re-check it is audited, so a
//! panel that disappeared without a close signal cannot shadow a newer one.
//!
//! ## Minimal example
//!
//! ```rust
//! use wayfind_panels::{DetectorId, PanelChange, PanelKind, PanelSpec, Reconciler};
//!
//! const HOST: DetectorId = DetectorId(0);
//!
//! let mut reconciler: Reconciler<u32> = Reconciler::default();
//! reconciler.report_opened(HOST, PanelSpec::open(1, PanelKind::Content));
//! reconciler.tick();
//!
//! reconciler.report_opened(HOST, PanelSpec::open(2, PanelKind::Modal));
//! assert_eq!(
//!     reconciler.tick(),
//!     Some(PanelChange { old: Some(1), new: Some(2) })
//! );
//! ```
//!
//! ## Features
//!
//! - `serde`: derives `Serialize`/`Deserialize` for configuration types and
//!   panel specs so hosts can load them from static tables.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

pub mod adapters;
mod detector;
mod reconciler;
mod record;

pub use detector::{Detector, DetectorReport};
pub use reconciler::{Reconciler, ReconcilerConfig};
pub use record::{DetectorId, Liveness, PanelChange, PanelKind, PanelRecord, PanelSpec, PanelState};
