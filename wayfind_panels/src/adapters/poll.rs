// Copyright 2025 the Wayfind Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Detector that polls a boolean "is open" probe for a fixed set of panels.

use alloc::vec::Vec;

use crate::detector::{Detector, DetectorReport};
use crate::record::{DetectorId, PanelSpec, PanelState};

#[derive(Clone, Debug)]
struct Watched<K> {
    spec: PanelSpec<K>,
    last: bool,
}

/// Polls `probe` for every watched panel and reports edges.
///
/// The probe returns `Some(true)` when the panel is open, `Some(false)` when
/// it is closed, and `None` when the host cannot answer (for example while
/// the panel object is being rebuilt). `None` never produces an edge.
pub struct PollDetector<K, F> {
    id: DetectorId,
    watched: Vec<Watched<K>>,
    probe: F,
}

impl<K: core::fmt::Debug, F> core::fmt::Debug for PollDetector<K, F> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("PollDetector")
            .field("id", &self.id)
            .field("watched", &self.watched.len())
            .finish_non_exhaustive()
    }
}

impl<K, F> PollDetector<K, F>
where
    K: Clone + PartialEq,
    F: FnMut(&K) -> Option<bool>,
{
    /// Create a detector with no watched panels.
    pub fn new(id: DetectorId, probe: F) -> Self {
        Self {
            id,
            watched: Vec::new(),
            probe,
        }
    }

    /// Watch a panel. `spec` is reported verbatim when the probe sees it open.
    pub fn watch(mut self, spec: PanelSpec<K>) -> Self {
        self.watched.push(Watched { spec, last: false });
        self
    }

    /// Number of watched panels.
    pub fn len(&self) -> usize {
        self.watched.len()
    }

    /// Whether nothing is watched.
    pub fn is_empty(&self) -> bool {
        self.watched.is_empty()
    }
}

impl<K, F> Detector<K> for PollDetector<K, F>
where
    K: Clone + PartialEq,
    F: FnMut(&K) -> Option<bool>,
{
    fn id(&self) -> DetectorId {
        self.id
    }

    fn drain(&mut self, out: &mut Vec<DetectorReport<K>>) {
        for w in &mut self.watched {
            let Some(now) = (self.probe)(&w.spec.id) else {
                continue;
            };
            match (w.last, now) {
                (false, true) => out.push(DetectorReport::Opened(w.spec.clone())),
                (true, false) => out.push(DetectorReport::Closed(w.spec.id.clone())),
                _ => {}
            }
            w.last = now;
        }
    }

    fn try_report_state(&mut self, panel: &K) -> PanelState {
        match (self.probe)(panel) {
            Some(true) => PanelState::Open,
            Some(false) => PanelState::Closed,
            None => PanelState::Unknown,
        }
    }

    fn evicted(&mut self, panel: &K) {
        for w in self.watched.iter_mut().filter(|w| w.spec.id == *panel) {
            w.last = false;
        }
    }
}
