// Copyright 2025 the Wayfind Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Engine configuration.

use wayfind_dispatch::{KeyMap, SuspensionConfig};
use wayfind_navigator::{NavigatorConfig, RescanConfig};
use wayfind_panels::ReconcilerConfig;

/// Everything tunable in one place.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EngineConfig {
    /// Panel audit settings.
    pub reconciler: ReconcilerConfig,
    /// Rescan debounce window.
    pub rescan: RescanConfig,
    /// Pending-entry lifetime.
    pub navigator: NavigatorConfig,
    /// Keys to navigation intents.
    pub keymap: KeyMap,
    /// Sub-widget suspension keys and hold frames.
    pub suspension: SuspensionConfig,
}
