// Copyright 2025 the Wayfind Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Reconciler implementation.
//!
//! ## Overview
//!
//! Merges reports from every registered [`Detector`] into one record per
//! panel identity and selects exactly one active panel.
//!
//! ## Selection
//!
//! - Only records whose liveness is [`Liveness::Open`] are candidates.
//! - Higher `priority` wins.
//! - Equal priorities resolve to the most recent report (last writer wins).
//!
//! ## Tick order
//!
//! 1. Drain buffered detector reports and apply them.
//! 2. Audit every record whose owning detector supports re-checks. The
//!    owning detector is told about every eviction.
//! 3. Recompute the active panel and emit at most one [`PanelChange`].
//!
//! Auditing before selection keeps a record whose panel vanished without a
//! close signal from shadowing a newer panel of equal priority.

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::fmt::Debug;
use core::hash::Hash;

use hashbrown::HashMap;

use crate::detector::{Detector, DetectorReport};
use crate::record::{DetectorId, Liveness, PanelChange, PanelRecord, PanelSpec, PanelState};

/// Reconciler configuration.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ReconcilerConfig {
    /// Consecutive [`PanelState::Unknown`] audit answers after which a record is evicted.
    ///
    /// Values below 1 are treated as 1.
    pub max_failed_audits: u8,
}

impl Default for ReconcilerConfig {
    fn default() -> Self {
        Self {
            max_failed_audits: 3,
        }
    }
}

/// Authoritative stack of panel records.
///
/// ## Usage
///
/// - Register detectors with [`Reconciler::add_detector`]; their buffered
///   reports are consumed at each [`Reconciler::tick`].
/// - Hosts that observe a signal directly may call
///   [`Reconciler::report_opened`] / [`Reconciler::report_closed`] instead.
/// - Call [`Reconciler::tick`] once per host frame. Readers should use
///   [`Reconciler::active`], which only changes at tick boundaries.
pub struct Reconciler<K> {
    records: HashMap<K, PanelRecord<K>>,
    detectors: Vec<Box<dyn Detector<K>>>,
    committed: Option<PanelRecord<K>>,
    next_seq: u64,
    config: ReconcilerConfig,
    scratch: Vec<DetectorReport<K>>,
}

impl<K: Debug> Debug for Reconciler<K> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Reconciler")
            .field("records", &self.records.len())
            .field("detectors", &self.detectors.len())
            .field("active", &self.committed.as_ref().map(|r| &r.id))
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl<K: Copy + Eq + Hash + Debug> Default for Reconciler<K> {
    fn default() -> Self {
        Self::new(ReconcilerConfig::default())
    }
}

impl<K: Copy + Eq + Hash + Debug> Reconciler<K> {
    /// Create an empty reconciler.
    pub fn new(config: ReconcilerConfig) -> Self {
        Self {
            records: HashMap::new(),
            detectors: Vec::new(),
            committed: None,
            next_seq: 0,
            config,
            scratch: Vec::new(),
        }
    }

    /// Current configuration.
    pub fn config(&self) -> &ReconcilerConfig {
        &self.config
    }

    /// Register a detector. Its reports are drained at every tick, in registration order.
    pub fn add_detector(&mut self, detector: Box<dyn Detector<K>>) {
        tracing::debug!(detector = detector.id().0, "detector registered");
        self.detectors.push(detector);
    }

    /// Upsert a record for an open report.
    pub fn report_opened(&mut self, detector: DetectorId, spec: PanelSpec<K>) {
        self.next_seq += 1;
        let seq = self.next_seq;
        match self.records.get_mut(&spec.id) {
            Some(rec) => {
                rec.kind = spec.kind;
                rec.priority = spec.priority;
                rec.filters_siblings = spec.filters_siblings;
                rec.reported_by = detector;
                // A repeated unverified report does not demote a confirmed record.
                if !(rec.liveness == Liveness::Open && spec.liveness == Liveness::Unknown) {
                    rec.liveness = spec.liveness;
                }
                rec.failed_audits = 0;
                rec.seq = seq;
            }
            None => {
                tracing::debug!(
                    panel = ?spec.id,
                    priority = spec.priority,
                    detector = detector.0,
                    "panel opened"
                );
                let id = spec.id;
                self.records
                    .insert(id, PanelRecord::from_spec(spec, detector, seq));
            }
        }
    }

    /// Mark a record as closing. It stays in the stack but can no longer be active.
    pub fn report_closing(&mut self, detector: DetectorId, id: K) {
        if let Some(rec) = self.records.get_mut(&id) {
            tracing::debug!(panel = ?id, detector = detector.0, "panel closing");
            rec.liveness = Liveness::Closing;
        }
    }

    /// Remove a record on an explicit close report.
    pub fn report_closed(&mut self, detector: DetectorId, id: K) {
        if self.records.remove(&id).is_some() {
            tracing::debug!(panel = ?id, detector = detector.0, "panel closed");
        }
    }

    /// Run one reconciliation pass.
    ///
    /// Returns the transition of the active panel, if any. At most one
    /// transition is produced per call, no matter how many reports arrived.
    pub fn tick(&mut self) -> Option<PanelChange<K>> {
        let mut buf = core::mem::take(&mut self.scratch);
        for i in 0..self.detectors.len() {
            let detector = self.detectors[i].id();
            self.detectors[i].drain(&mut buf);
            for report in buf.drain(..) {
                self.apply(detector, report);
            }
        }
        self.scratch = buf;

        self.audit();

        let next = self.compute_active();
        let old = self.committed.as_ref().map(|r| r.id);
        let new = next.as_ref().map(|r| r.id);
        self.committed = next;
        if old == new {
            return None;
        }
        tracing::debug!(old = ?old, new = ?new, "active panel changed");
        Some(PanelChange { old, new })
    }

    /// The active panel as of the last completed tick.
    pub fn active(&self) -> Option<&PanelRecord<K>> {
        self.committed.as_ref()
    }

    /// Look up a record by identity.
    pub fn record(&self, id: &K) -> Option<&PanelRecord<K>> {
        self.records.get(id)
    }

    /// All records ordered by selection rank (highest priority, then most recent, first).
    pub fn stack(&self) -> Vec<&PanelRecord<K>> {
        let mut out: Vec<&PanelRecord<K>> = self.records.values().collect();
        out.sort_by(|a, b| b.priority.cmp(&a.priority).then(b.seq.cmp(&a.seq)));
        out
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether no panel is currently recorded.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    fn apply(&mut self, detector: DetectorId, report: DetectorReport<K>) {
        match report {
            DetectorReport::Opened(spec) => self.report_opened(detector, spec),
            DetectorReport::Closing(id) => self.report_closing(detector, id),
            DetectorReport::Closed(id) => self.report_closed(detector, id),
        }
    }

    fn audit(&mut self) {
        let max = self.config.max_failed_audits.max(1);
        let mut evicted: Vec<K> = Vec::new();
        for rec in self.records.values_mut() {
            let Some(detector) = self
                .detectors
                .iter_mut()
                .find(|d| d.id() == rec.reported_by)
            else {
                continue;
            };
            if !detector.audits() {
                continue;
            }
            match detector.try_report_state(&rec.id) {
                PanelState::Open => {
                    rec.failed_audits = 0;
                    rec.liveness = Liveness::Open;
                }
                PanelState::Closed => {
                    tracing::debug!(panel = ?rec.id, "audit: panel gone");
                    detector.evicted(&rec.id);
                    evicted.push(rec.id);
                }
                PanelState::Unknown => {
                    rec.failed_audits = rec.failed_audits.saturating_add(1);
                    if rec.failed_audits >= max {
                        tracing::warn!(
                            panel = ?rec.id,
                            detector = rec.reported_by.0,
                            failed = rec.failed_audits,
                            "audit: evicting uncorroborated panel"
                        );
                        detector.evicted(&rec.id);
                        evicted.push(rec.id);
                    }
                }
            }
        }
        for id in evicted {
            self.records.remove(&id);
        }
    }

    fn compute_active(&self) -> Option<PanelRecord<K>> {
        self.records
            .values()
            .filter(|r| r.is_open())
            .max_by(|a, b| a.priority.cmp(&b.priority).then(a.seq.cmp(&b.seq)))
            .cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::PanelKind;
    use alloc::collections::BTreeMap;
    use alloc::rc::Rc;
    use alloc::vec;
    use core::cell::RefCell;

    #[derive(Default)]
    struct Script {
        reports: Vec<DetectorReport<u32>>,
        states: BTreeMap<u32, PanelState>,
        audits: bool,
    }

    struct Scripted(DetectorId, Rc<RefCell<Script>>);

    impl Detector<u32> for Scripted {
        fn id(&self) -> DetectorId {
            self.0
        }
        fn drain(&mut self, out: &mut Vec<DetectorReport<u32>>) {
            out.append(&mut self.1.borrow_mut().reports);
        }
        fn try_report_state(&mut self, panel: &u32) -> PanelState {
            self.1
                .borrow()
                .states
                .get(panel)
                .copied()
                .unwrap_or(PanelState::Unknown)
        }
        fn audits(&self) -> bool {
            self.1.borrow().audits
        }
    }

    fn scripted(r: &mut Reconciler<u32>, id: u32) -> Rc<RefCell<Script>> {
        let script = Rc::new(RefCell::new(Script {
            audits: true,
            ..Script::default()
        }));
        r.add_detector(Box::new(Scripted(DetectorId(id), script.clone())));
        script
    }

    fn open(script: &Rc<RefCell<Script>>, id: u32, priority: i32) {
        let mut s = script.borrow_mut();
        s.reports.push(DetectorReport::Opened(
            PanelSpec::open(id, PanelKind::Content).with_priority(priority),
        ));
        s.states.insert(id, PanelState::Open);
    }

    #[test]
    fn higher_priority_becomes_active() {
        let mut r = Reconciler::default();
        let d = scripted(&mut r, 1);
        open(&d, 10, 100);
        assert_eq!(
            r.tick(),
            Some(PanelChange {
                old: None,
                new: Some(10)
            })
        );
        open(&d, 20, 1000);
        assert_eq!(
            r.tick(),
            Some(PanelChange {
                old: Some(10),
                new: Some(20)
            })
        );
        assert_eq!(r.tick(), None);
        assert_eq!(r.active().map(|p| p.id), Some(20));
    }

    #[test]
    fn many_reports_in_one_tick_emit_one_change() {
        let mut r = Reconciler::default();
        let d = scripted(&mut r, 1);
        open(&d, 1, 100);
        open(&d, 2, 200);
        open(&d, 3, 300);
        let change = r.tick();
        assert_eq!(
            change,
            Some(PanelChange {
                old: None,
                new: Some(3)
            })
        );
    }

    #[test]
    fn equal_priority_last_report_wins() {
        let mut r = Reconciler::default();
        let d = scripted(&mut r, 1);
        open(&d, 1, 100);
        r.tick();
        open(&d, 2, 100);
        r.tick();
        assert_eq!(r.active().map(|p| p.id), Some(2));
        // Re-reporting the first panel makes it the most recent.
        open(&d, 1, 100);
        r.tick();
        assert_eq!(r.active().map(|p| p.id), Some(1));
    }

    #[test]
    fn silently_closed_panel_is_evicted_before_selection() {
        let mut r = Reconciler::default();
        let d = scripted(&mut r, 1);
        open(&d, 1, 100);
        r.tick();
        open(&d, 2, 100);
        r.tick();
        assert_eq!(r.active().map(|p| p.id), Some(2));

        // Panel 2 disappears without a close report; its detector can tell.
        d.borrow_mut().states.insert(2, PanelState::Closed);
        let change = r.tick();
        assert_eq!(
            change,
            Some(PanelChange {
                old: Some(2),
                new: Some(1)
            })
        );
        assert!(r.record(&2).is_none());
    }

    #[test]
    fn uncorroborated_record_is_evicted_after_bounded_audits() {
        let mut r = Reconciler::new(ReconcilerConfig {
            max_failed_audits: 3,
        });
        let d = scripted(&mut r, 1);
        open(&d, 1, 100);
        open(&d, 2, 500);
        r.tick();
        assert_eq!(r.active().map(|p| p.id), Some(2));

        d.borrow_mut().states.insert(2, PanelState::Unknown);
        let mut changes = vec![];
        for _ in 0..3 {
            if let Some(c) = r.tick() {
                changes.push(c);
            }
        }
        assert_eq!(
            changes,
            vec![PanelChange {
                old: Some(2),
                new: Some(1)
            }]
        );
        assert_eq!(r.len(), 1);
    }

    #[test]
    fn corroboration_resets_failed_audits() {
        let mut r = Reconciler::default();
        let d = scripted(&mut r, 1);
        open(&d, 1, 100);
        r.tick();
        d.borrow_mut().states.insert(1, PanelState::Unknown);
        r.tick();
        r.tick();
        assert_eq!(r.record(&1).map(|p| p.failed_audits), Some(2));
        d.borrow_mut().states.insert(1, PanelState::Open);
        r.tick();
        assert_eq!(r.record(&1).map(|p| p.failed_audits), Some(0));
    }

    #[test]
    fn unverified_record_waits_for_audit() {
        let mut r = Reconciler::default();
        let d = scripted(&mut r, 1);
        d.borrow_mut().reports.push(DetectorReport::Opened(
            PanelSpec::open(7, PanelKind::Popup).unverified(),
        ));
        d.borrow_mut().states.insert(7, PanelState::Unknown);
        assert_eq!(r.tick(), None);
        assert!(r.active().is_none());

        d.borrow_mut().states.insert(7, PanelState::Open);
        assert_eq!(
            r.tick(),
            Some(PanelChange {
                old: None,
                new: Some(7)
            })
        );
    }

    #[test]
    fn closing_record_is_not_active() {
        let mut r = Reconciler::default();
        let d = scripted(&mut r, 1);
        d.borrow_mut().audits = false;
        open(&d, 1, 100);
        open(&d, 2, 200);
        r.tick();
        d.borrow_mut().reports.push(DetectorReport::Closing(2));
        assert_eq!(
            r.tick(),
            Some(PanelChange {
                old: Some(2),
                new: Some(1)
            })
        );
        assert_eq!(r.len(), 2);
    }

    #[test]
    fn non_auditing_detector_keeps_record_until_closed() {
        let mut r = Reconciler::default();
        let d = scripted(&mut r, 1);
        d.borrow_mut().audits = false;
        open(&d, 1, 100);
        d.borrow_mut().states.clear();
        for _ in 0..10 {
            r.tick();
        }
        assert_eq!(r.active().map(|p| p.id), Some(1));

        r.report_closed(DetectorId(1), 1);
        assert_eq!(
            r.tick(),
            Some(PanelChange {
                old: Some(1),
                new: None
            })
        );
        assert!(r.is_empty());
    }

    #[test]
    fn active_only_changes_at_tick_boundaries() {
        let mut r: Reconciler<u32> = Reconciler::default();
        r.report_opened(DetectorId(9), PanelSpec::open(1, PanelKind::Content));
        assert!(r.active().is_none());
        r.tick();
        assert_eq!(r.active().map(|p| p.id), Some(1));
        r.report_closed(DetectorId(9), 1);
        assert_eq!(r.active().map(|p| p.id), Some(1));
        r.tick();
        assert!(r.active().is_none());
    }

    #[test]
    fn stack_is_ordered_by_rank() {
        let mut r: Reconciler<u32> = Reconciler::default();
        r.report_opened(
            DetectorId(1),
            PanelSpec::open(1, PanelKind::Content).with_priority(100),
        );
        r.report_opened(DetectorId(1), PanelSpec::open(2, PanelKind::Modal));
        r.report_opened(
            DetectorId(1),
            PanelSpec::open(3, PanelKind::Content).with_priority(100),
        );
        let ids: Vec<u32> = r.stack().iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![2, 3, 1]);
    }
}
