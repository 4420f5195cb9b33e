// Copyright 2025 the Wayfind Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Coarse role classification.

use crate::types::{RawNode, Role, RoleHint};

/// Map a captured node to a coarse [`Role`].
///
/// Text without a label carries nothing worth announcing and is treated as
/// decoration, like images and bare containers. A node the host could not
/// describe is still something it reported as interactive, so it stays
/// navigable as a button and lands in whatever group its ancestry selects.
pub fn classify<K>(raw: &RawNode<K>) -> Role {
    match raw.hint {
        RoleHint::Button | RoleHint::Clickable | RoleHint::Unknown => Role::Button,
        RoleHint::Toggle => Role::Toggle,
        RoleHint::TextField => Role::Input,
        RoleHint::Dropdown => Role::Dropdown,
        RoleHint::Slider => Role::Slider,
        RoleHint::Stepper => Role::Carousel,
        RoleHint::Text if !raw.label.trim().is_empty() => Role::Informational,
        RoleHint::Text | RoleHint::Image | RoleHint::Container => Role::Decoration,
    }
}
