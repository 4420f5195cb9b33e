// Copyright 2025 the Wayfind Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The detector contract.
//!
//! A detector observes exactly one kind of host signal. It buffers whatever it
//! saw since the previous tick and hands it over in [`Detector::drain`]; the
//! reconciler never reads a detector mid-frame.

use alloc::vec::Vec;

use crate::record::{DetectorId, PanelSpec, PanelState};

/// A lifecycle fact observed by a detector.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DetectorReport<K> {
    /// A panel opened (or was seen open for the first time).
    Opened(PanelSpec<K>),
    /// A panel started closing but is still visible.
    Closing(K),
    /// A panel closed.
    Closed(K),
}

/// One strategy for inferring panel lifecycle from the host.
pub trait Detector<K> {
    /// Identifier recorded as [`PanelRecord::reported_by`](crate::PanelRecord::reported_by).
    fn id(&self) -> DetectorId;

    /// Move all reports buffered since the previous call into `out`.
    fn drain(&mut self, out: &mut Vec<DetectorReport<K>>);

    /// Re-check a single panel this detector reported.
    fn try_report_state(&mut self, panel: &K) -> PanelState;

    /// Whether [`Detector::try_report_state`] is meaningful for audits.
    ///
    /// Detectors that can only see open notifications return `false`; their
    /// records disappear only through explicit close reports.
    fn audits(&self) -> bool {
        true
    }

    /// The reconciler dropped its record of `panel` after an audit.
    ///
    /// Detectors that report edges must forget the panel here, so the next
    /// time it is seen open it is reported as opened again.
    fn evicted(&mut self, panel: &K) {
        let _ = panel;
    }
}
