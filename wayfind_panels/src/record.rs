// Copyright 2025 the Wayfind Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public types for the panel stack: identifiers, kinds, liveness, and records.

/// Identifier for a detector strategy registered with a [`Reconciler`](crate::Reconciler).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DetectorId(pub u32);

/// Coarse classification of a host surface.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PanelKind {
    /// Regular screen content (a menu screen, a map, a shop).
    Content,
    /// A transient popup attached to some other surface.
    Popup,
    /// A full-screen overlay drawn over content.
    Overlay,
    /// A modal dialog that blocks everything beneath it.
    Modal,
}

impl PanelKind {
    /// Priority used when a detector does not supply one explicitly.
    pub const fn default_priority(self) -> i32 {
        match self {
            Self::Content => 100,
            Self::Popup => 500,
            Self::Overlay => 700,
            Self::Modal => 1000,
        }
    }
}

/// Liveness of a record as currently believed by the reconciler.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Liveness {
    /// The panel is open and eligible to become active.
    Open,
    /// The panel started closing (for example a fade-out) but is still on screen.
    Closing,
    /// The panel was reported but no detector has corroborated it yet.
    Unknown,
}

/// Answer of a detector when asked about a specific panel.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum PanelState {
    /// The detector can see the panel open.
    Open,
    /// The detector can see the panel is gone.
    Closed,
    /// The detector cannot tell right now.
    Unknown,
}

/// A candidate record supplied with an open report.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PanelSpec<K> {
    /// Stable identity of the panel. Also the root of its element subtree.
    pub id: K,
    /// Coarse kind.
    pub kind: PanelKind,
    /// Rank; higher wins.
    pub priority: i32,
    /// When active, elements outside this panel's subtree are dropped from snapshots.
    pub filters_siblings: bool,
    /// Liveness the record starts with.
    pub liveness: Liveness,
}

impl<K> PanelSpec<K> {
    /// An open panel of `kind` with the kind's default priority.
    pub fn open(id: K, kind: PanelKind) -> Self {
        Self {
            id,
            kind,
            priority: kind.default_priority(),
            filters_siblings: matches!(kind, PanelKind::Modal | PanelKind::Overlay),
            liveness: Liveness::Open,
        }
    }

    /// Override the priority.
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    /// Set whether the panel restricts snapshots to its subtree.
    pub fn filtering(mut self, filters_siblings: bool) -> Self {
        self.filters_siblings = filters_siblings;
        self
    }

    /// Mark the record as reported but not yet corroborated.
    ///
    /// Unverified records never become active until an audit answers [`PanelState::Open`].
    pub fn unverified(mut self) -> Self {
        self.liveness = Liveness::Unknown;
        self
    }
}

/// One surface of the host interface currently believed open.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PanelRecord<K> {
    /// Stable identity.
    pub id: K,
    /// Coarse kind.
    pub kind: PanelKind,
    /// Rank; higher wins.
    pub priority: i32,
    /// Whether this panel restricts the element snapshot to its subtree while active.
    pub filters_siblings: bool,
    /// Detector that most recently reported this panel.
    pub reported_by: DetectorId,
    /// Current liveness.
    pub liveness: Liveness,
    /// Consecutive audits that could not corroborate the record.
    pub failed_audits: u8,
    /// Report sequence number; larger is more recent.
    pub(crate) seq: u64,
}

impl<K> PanelRecord<K> {
    pub(crate) fn from_spec(spec: PanelSpec<K>, reported_by: DetectorId, seq: u64) -> Self {
        Self {
            id: spec.id,
            kind: spec.kind,
            priority: spec.priority,
            filters_siblings: spec.filters_siblings,
            reported_by,
            liveness: spec.liveness,
            failed_audits: 0,
            seq,
        }
    }

    /// Sequence number of the most recent report for this record.
    pub fn report_seq(&self) -> u64 {
        self.seq
    }

    /// Whether the record may become the active panel.
    pub fn is_open(&self) -> bool {
        self.liveness == Liveness::Open
    }
}

/// Transition of the active panel, emitted at most once per tick.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PanelChange<K> {
    /// Previously active panel.
    pub old: Option<K>,
    /// Newly active panel.
    pub new: Option<K>,
}
