// Copyright 2025 the Wayfind Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Detector fed by explicit host notifications.
//!
//! Hosts often fire "panel opened" callbacks from inside their own frame. The
//! [`Notifier`] half can be cloned into those callbacks; it only appends to a
//! buffer, which the [`NotifyDetector`] hands to the reconciler at the next tick.
//!
//! Notifications cannot observe a panel that vanishes without a close callback.
//! Attach a liveness probe with [`NotifyDetector::with_probe`] to let the
//! reconciler audit such records.
//!
//! ```
//! use wayfind_panels::adapters::notify::NotifyDetector;
//! use wayfind_panels::{DetectorId, PanelKind, PanelSpec, Reconciler};
//!
//! let (detector, notifier) = NotifyDetector::<u32>::new(DetectorId(1));
//! let mut reconciler = Reconciler::default();
//! reconciler.add_detector(Box::new(detector));
//!
//! notifier.opened(PanelSpec::open(5, PanelKind::Modal));
//! assert!(reconciler.active().is_none());
//! reconciler.tick();
//! assert_eq!(reconciler.active().map(|p| p.id), Some(5));
//! ```

use alloc::boxed::Box;
use alloc::rc::Rc;
use alloc::vec::Vec;
use core::cell::RefCell;

use crate::detector::{Detector, DetectorReport};
use crate::record::{DetectorId, PanelSpec, PanelState};

type Probe<K> = Box<dyn FnMut(&K) -> PanelState>;

/// Detector that relays buffered host notifications.
pub struct NotifyDetector<K> {
    id: DetectorId,
    inbox: Rc<RefCell<Vec<DetectorReport<K>>>>,
    probe: Option<Probe<K>>,
}

impl<K> core::fmt::Debug for NotifyDetector<K> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("NotifyDetector")
            .field("id", &self.id)
            .field("pending", &self.inbox.borrow().len())
            .field("probe", &self.probe.is_some())
            .finish()
    }
}

/// Cloneable sending half of a [`NotifyDetector`].
pub struct Notifier<K> {
    inbox: Rc<RefCell<Vec<DetectorReport<K>>>>,
}

impl<K> Clone for Notifier<K> {
    fn clone(&self) -> Self {
        Self {
            inbox: self.inbox.clone(),
        }
    }
}

impl<K> core::fmt::Debug for Notifier<K> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Notifier")
            .field("pending", &self.inbox.borrow().len())
            .finish()
    }
}

impl<K> Notifier<K> {
    /// Buffer an open notification.
    pub fn opened(&self, spec: PanelSpec<K>) {
        self.inbox.borrow_mut().push(DetectorReport::Opened(spec));
    }

    /// Buffer a "started closing" notification.
    pub fn closing(&self, id: K) {
        self.inbox.borrow_mut().push(DetectorReport::Closing(id));
    }

    /// Buffer a close notification.
    pub fn closed(&self, id: K) {
        self.inbox.borrow_mut().push(DetectorReport::Closed(id));
    }
}

impl<K> NotifyDetector<K> {
    /// Create a detector and the notifier that feeds it.
    pub fn new(id: DetectorId) -> (Self, Notifier<K>) {
        let inbox = Rc::new(RefCell::new(Vec::new()));
        (
            Self {
                id,
                inbox: inbox.clone(),
                probe: None,
            },
            Notifier { inbox },
        )
    }

    /// Attach a liveness probe used for audits.
    pub fn with_probe(mut self, probe: impl FnMut(&K) -> PanelState + 'static) -> Self {
        self.probe = Some(Box::new(probe));
        self
    }

    /// Number of notifications waiting for the next tick.
    pub fn pending(&self) -> usize {
        self.inbox.borrow().len()
    }
}

impl<K> Detector<K> for NotifyDetector<K> {
    fn id(&self) -> DetectorId {
        self.id
    }

    fn drain(&mut self, out: &mut Vec<DetectorReport<K>>) {
        out.append(&mut self.inbox.borrow_mut());
    }

    fn try_report_state(&mut self, panel: &K) -> PanelState {
        match &mut self.probe {
            Some(probe) => probe(panel),
            None => PanelState::Unknown,
        }
    }

    fn audits(&self) -> bool {
        self.probe.is_some()
    }
}
