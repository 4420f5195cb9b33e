// Copyright 2025 the Wayfind Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The tree provider contract and snapshot capture.
//!
//! The provider is the only way Wayfind looks at the host interface. It must
//! be callable repeatedly without side effects. [`capture`] asks it every
//! question once and freezes the answers into a [`Snapshot`], so nothing
//! downstream keeps a reference into the host tree across ticks.

use alloc::string::String;
use alloc::vec::Vec;
use kurbo::Rect;

use crate::types::{Ancestor, AncestryPath, NodeFlags, RawNode, RoleHint};

/// Read-only queries against the host's element tree.
pub trait TreeProvider<K> {
    /// Candidate element handles under `root` (or the whole interface), in document order.
    fn snapshot(&self, root: Option<&K>) -> Vec<K>;

    /// Structural name of a node, used for pattern matching.
    fn name(&self, node: &K) -> String;

    /// Ancestors of a node, root first, parent last.
    fn ancestry(&self, node: &K) -> Vec<K>;

    /// Whether the node reports an active state.
    fn is_active(&self, node: &K) -> bool;

    /// Role hint for the node.
    fn role_hint(&self, node: &K) -> RoleHint;

    /// Whether the node currently has on-screen bounds.
    fn has_bounds(&self, node: &K) -> bool;

    /// Human-readable label. Defaults to the structural name.
    fn label(&self, node: &K) -> Option<String> {
        let _ = node;
        None
    }

    /// Bounds of the node, if the provider can compute them.
    fn bounds(&self, node: &K) -> Option<Rect> {
        let _ = node;
        None
    }

    /// Secondary action target for the node.
    fn alternate(&self, node: &K) -> Option<K> {
        let _ = node;
        None
    }

    /// The node that currently holds the host's own keyboard focus.
    fn focused(&self) -> Option<K> {
        None
    }

    /// A sub-widget (dropdown list, picker) that is currently open and runs its own navigation.
    fn open_sub_widget(&self) -> Option<K> {
        None
    }
}

/// Immutable capture of the provider's answers.
#[derive(Clone, Debug, PartialEq)]
pub struct Snapshot<K> {
    /// Captured nodes, in document order.
    pub nodes: Vec<RawNode<K>>,
    /// Externally focused node at capture time.
    pub focused: Option<K>,
    /// Sub-widget that was open at capture time.
    pub open_sub_widget: Option<K>,
}

impl<K> Default for Snapshot<K> {
    fn default() -> Self {
        Self {
            nodes: Vec::new(),
            focused: None,
            open_sub_widget: None,
        }
    }
}

impl<K> Snapshot<K> {
    /// Number of captured nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether nothing was captured.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// Capture a snapshot of everything under `root`.
pub fn capture<K, P>(provider: &P, root: Option<&K>) -> Snapshot<K>
where
    K: Clone,
    P: TreeProvider<K> + ?Sized,
{
    let nodes = provider
        .snapshot(root)
        .into_iter()
        .map(|id| capture_node(provider, id))
        .collect();
    Snapshot {
        nodes,
        focused: provider.focused(),
        open_sub_widget: provider.open_sub_widget(),
    }
}

fn capture_node<K, P>(provider: &P, id: K) -> RawNode<K>
where
    K: Clone,
    P: TreeProvider<K> + ?Sized,
{
    let name = provider.name(&id);
    let label = provider.label(&id).unwrap_or_else(|| name.clone());
    let path: AncestryPath<K> = provider
        .ancestry(&id)
        .into_iter()
        .map(|a| Ancestor {
            name: provider.name(&a),
            id: a,
        })
        .collect();
    let mut flags = NodeFlags::empty();
    flags.set(NodeFlags::ACTIVE, provider.is_active(&id));
    flags.set(NodeFlags::BOUNDED, provider.has_bounds(&id));
    RawNode {
        name,
        label,
        path,
        flags,
        hint: provider.role_hint(&id),
        bounds: provider.bounds(&id),
        alternate: provider.alternate(&id),
        id,
    }
}
