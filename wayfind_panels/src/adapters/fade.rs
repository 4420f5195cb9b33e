// Copyright 2025 the Wayfind Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Detector that infers panel lifecycle from an animated opacity value.
//!
//! Many hosts never announce a panel; they fade a canvas group in and out.
//! [`FadeDetector`] samples that opacity once per tick:
//!
//! - crossing [`FadeThresholds::open_at`] upwards reports the panel opened,
//! - dropping below `open_at` reports it closing,
//! - reaching [`FadeThresholds::closed_at`] reports it closed.
//!
//! Audits use the same thresholds; mid-fade values answer
//! [`PanelState::Unknown`].

use alloc::vec::Vec;

use crate::detector::{Detector, DetectorReport};
use crate::record::{DetectorId, PanelSpec, PanelState};

/// Opacity thresholds for [`FadeDetector`].
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FadeThresholds {
    /// Opacity at or above which a panel counts as open.
    pub open_at: f32,
    /// Opacity at or below which a panel counts as closed.
    pub closed_at: f32,
}

impl Default for FadeThresholds {
    fn default() -> Self {
        Self {
            open_at: 0.5,
            closed_at: 0.01,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Phase {
    Hidden,
    Shown,
    Fading,
}

#[derive(Clone, Debug)]
struct Watched<K> {
    spec: PanelSpec<K>,
    phase: Phase,
}

/// Samples an opacity probe for every watched panel.
pub struct FadeDetector<K, F> {
    id: DetectorId,
    thresholds: FadeThresholds,
    watched: Vec<Watched<K>>,
    probe: F,
}

impl<K: core::fmt::Debug, F> core::fmt::Debug for FadeDetector<K, F> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("FadeDetector")
            .field("id", &self.id)
            .field("thresholds", &self.thresholds)
            .field("watched", &self.watched.len())
            .finish_non_exhaustive()
    }
}

impl<K, F> FadeDetector<K, F>
where
    K: Clone + PartialEq,
    F: FnMut(&K) -> Option<f32>,
{
    /// Create a detector with default thresholds.
    pub fn new(id: DetectorId, probe: F) -> Self {
        Self::with_thresholds(id, FadeThresholds::default(), probe)
    }

    /// Create a detector with custom thresholds.
    pub fn with_thresholds(id: DetectorId, thresholds: FadeThresholds, probe: F) -> Self {
        Self {
            id,
            thresholds,
            watched: Vec::new(),
            probe,
        }
    }

    /// Watch a panel.
    pub fn watch(mut self, spec: PanelSpec<K>) -> Self {
        self.watched.push(Watched {
            spec,
            phase: Phase::Hidden,
        });
        self
    }

    fn state_for(&self, alpha: f32) -> PanelState {
        if alpha >= self.thresholds.open_at {
            PanelState::Open
        } else if alpha <= self.thresholds.closed_at {
            PanelState::Closed
        } else {
            PanelState::Unknown
        }
    }
}

impl<K, F> Detector<K> for FadeDetector<K, F>
where
    K: Clone + PartialEq,
    F: FnMut(&K) -> Option<f32>,
{
    fn id(&self) -> DetectorId {
        self.id
    }

    fn drain(&mut self, out: &mut Vec<DetectorReport<K>>) {
        let FadeThresholds { open_at, closed_at } = self.thresholds;
        for w in &mut self.watched {
            let Some(alpha) = (self.probe)(&w.spec.id) else {
                continue;
            };
            let next = if alpha >= open_at {
                Phase::Shown
            } else if alpha <= closed_at {
                Phase::Hidden
            } else if w.phase == Phase::Hidden {
                // Fading in; nothing to report until it crosses `open_at`.
                Phase::Hidden
            } else {
                Phase::Fading
            };
            match (w.phase, next) {
                (Phase::Hidden, Phase::Shown) | (Phase::Fading, Phase::Shown) => {
                    out.push(DetectorReport::Opened(w.spec.clone()));
                }
                (Phase::Shown, Phase::Fading) => {
                    out.push(DetectorReport::Closing(w.spec.id.clone()));
                }
                (Phase::Shown, Phase::Hidden) | (Phase::Fading, Phase::Hidden) => {
                    out.push(DetectorReport::Closed(w.spec.id.clone()));
                }
                _ => {}
            }
            w.phase = next;
        }
    }

    fn try_report_state(&mut self, panel: &K) -> PanelState {
        match (self.probe)(panel) {
            Some(alpha) => self.state_for(alpha),
            None => PanelState::Unknown,
        }
    }

    fn evicted(&mut self, panel: &K) {
        for w in self.watched.iter_mut().filter(|w| w.spec.id == *panel) {
            w.phase = Phase::Hidden;
        }
    }
}
