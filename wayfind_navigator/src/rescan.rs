// Copyright 2025 the Wayfind Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Rescan debouncing.

/// Debounce configuration.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RescanConfig {
    /// Minimum host time between two completed rescans.
    pub debounce_window: u64,
}

impl Default for RescanConfig {
    fn default() -> Self {
        Self {
            debounce_window: 150,
        }
    }
}

/// Coalesces rescan requests.
///
/// Any number of requests made within `debounce_window` of the previous
/// completed rescan collapse into one rescan that becomes due when the
/// window elapses. Time is whatever monotonic unit the host feeds in.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RescanScheduler {
    window: u64,
    last_run: Option<u64>,
    requested: Option<u64>,
}

impl Default for RescanScheduler {
    fn default() -> Self {
        Self::new(RescanConfig::default())
    }
}

impl RescanScheduler {
    /// Create a scheduler. The first request is due immediately.
    pub fn new(config: RescanConfig) -> Self {
        Self {
            window: config.debounce_window,
            last_run: None,
            requested: None,
        }
    }

    /// Record a request. Repeated requests keep the earliest timestamp.
    pub fn request(&mut self, now: u64) {
        self.requested.get_or_insert(now);
    }

    /// Whether a request is outstanding.
    pub fn is_pending(&self) -> bool {
        self.requested.is_some()
    }

    /// Time of the earliest outstanding request.
    pub fn requested_at(&self) -> Option<u64> {
        self.requested
    }

    /// Whether a rescan should run now.
    pub fn due(&self, now: u64) -> bool {
        self.requested.is_some()
            && self
                .last_run
                .is_none_or(|t| now.saturating_sub(t) >= self.window)
    }

    /// Record a completed rescan and clear outstanding requests.
    pub fn complete(&mut self, now: u64) {
        self.last_run = Some(now);
        self.requested = None;
    }
}
