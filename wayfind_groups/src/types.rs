// Copyright 2025 the Wayfind Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public types for captured nodes and classified elements.

use alloc::string::String;
use kurbo::Rect;
use smallvec::SmallVec;

bitflags::bitflags! {
    /// Node state flags captured from the tree provider.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    pub struct NodeFlags: u8 {
        /// Node reports an active state (toggle on, disclosure expanded, item selected).
        const ACTIVE  = 0b0000_0001;
        /// Node has on-screen bounds.
        const BOUNDED = 0b0000_0010;
    }
}

/// Role hint exposed by the tree provider.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RoleHint {
    /// A push button.
    Button,
    /// Something with a click handler that is not styled as a button.
    Clickable,
    /// A two-state switch or checkbox. Also used for disclosure widgets.
    Toggle,
    /// Editable text.
    TextField,
    /// A collapsed selection list.
    Dropdown,
    /// A continuous value control.
    Slider,
    /// A previous/next value stepper.
    Stepper,
    /// Static text.
    Text,
    /// A picture.
    Image,
    /// A layout container.
    Container,
    /// The provider could not tell.
    #[default]
    Unknown,
}

/// Coarse role assigned by [`classify`](crate::classify).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Role {
    /// Activates something.
    Button,
    /// Flips between two states.
    Toggle,
    /// Accepts text.
    Input,
    /// Opens a selection list.
    Dropdown,
    /// Adjusts a continuous value.
    Slider,
    /// Cycles through discrete values.
    Carousel,
    /// Read-only information.
    Informational,
    /// Nothing a user needs to hear; dropped during filtering.
    Decoration,
}

impl Role {
    /// Whether the role can be activated.
    pub const fn is_actionable(self) -> bool {
        !matches!(self, Self::Informational | Self::Decoration)
    }
}

/// One ancestor on a captured ancestry path.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Ancestor<K> {
    /// Node identity.
    pub id: K,
    /// Structural name used by pattern matching.
    pub name: String,
}

/// Ancestry path, root first, parent last.
pub type AncestryPath<K> = SmallVec<[Ancestor<K>; 8]>;

/// A node frozen from the tree provider at capture time.
#[derive(Clone, Debug, PartialEq)]
pub struct RawNode<K> {
    /// Node identity, stable within one capture.
    pub id: K,
    /// Structural name.
    pub name: String,
    /// Human-readable label, falling back to the name.
    pub label: String,
    /// Ancestry, root first.
    pub path: AncestryPath<K>,
    /// Captured state.
    pub flags: NodeFlags,
    /// Provider role hint.
    pub hint: RoleHint,
    /// Bounds, when the provider exposes them.
    pub bounds: Option<Rect>,
    /// Secondary action target (for example "rename" next to "select").
    pub alternate: Option<K>,
}

impl<K: PartialEq> RawNode<K> {
    /// Whether `root` is this node or one of its ancestors.
    pub fn is_within(&self, root: &K) -> bool {
        self.id == *root || self.path.iter().any(|a| a.id == *root)
    }
}

/// A classified element exposed to navigation.
#[derive(Clone, Debug, PartialEq)]
pub struct NavigableElement<K> {
    /// Node identity.
    pub id: K,
    /// Label to present.
    pub label: String,
    /// Assigned role.
    pub role: Role,
    /// Captured state.
    pub flags: NodeFlags,
    /// Bounds used for best-effort matching across rescans.
    pub bounds: Option<Rect>,
    /// Secondary action target.
    pub alternate: Option<K>,
}

impl<K: Clone> NavigableElement<K> {
    pub(crate) fn from_raw(raw: &RawNode<K>, role: Role) -> Self {
        Self {
            id: raw.id.clone(),
            label: raw.label.clone(),
            role,
            flags: raw.flags,
            bounds: raw.bounds,
            alternate: raw.alternate.clone(),
        }
    }
}

impl<K> NavigableElement<K> {
    /// Whether the element reports an active state.
    pub fn is_active(&self) -> bool {
        self.flags.contains(NodeFlags::ACTIVE)
    }
}
