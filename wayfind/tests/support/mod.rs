// Copyright 2025 the Wayfind Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A scripted host shared by the integration tests.
//!
//! The world is a flat list of nodes with parent links. Tests mutate it
//! between ticks to play the part of the host application; the activation
//! service mutates it the way a real host would react to clicks.

#![allow(
    dead_code,
    unreachable_pub,
    reason = "shared by several test binaries, each using a subset"
)]

use std::cell::RefCell;
use std::rc::Rc;

use wayfind::dispatch::{Context, Frame, InputEvent, Key};
use wayfind::groups::{GroupRule, Pattern, RoleHint, RuleTable, TreeProvider};
use wayfind::navigator::{Edge, Value};
use wayfind::{ActivationService, Engine, EngineConfig, Host, Observer};

#[derive(Clone, Debug)]
pub struct Node {
    pub id: u32,
    pub name: &'static str,
    pub label: &'static str,
    pub parent: Option<u32>,
    pub hint: RoleHint,
    pub active: bool,
    pub visible: bool,
}

#[derive(Debug, Default)]
pub struct World {
    pub nodes: Vec<Node>,
    pub focused: Option<u32>,
    pub open_widget: Option<u32>,
    /// Folder toggles and the container whose children they reveal.
    pub folders: Vec<(u32, u32)>,
    /// Everything the activation service was asked to do.
    pub log: Vec<String>,
    /// Collapsing leaves `open_widget` set, like a host whose open signal
    /// trails the real widget by a few frames.
    pub lagging_close: bool,
}

pub type Shared = Rc<RefCell<World>>;

impl World {
    pub fn shared(self) -> Shared {
        Rc::new(RefCell::new(self))
    }

    pub fn add(
        &mut self,
        id: u32,
        name: &'static str,
        label: &'static str,
        parent: Option<u32>,
        hint: RoleHint,
    ) -> &mut Self {
        self.nodes.push(Node {
            id,
            name,
            label,
            parent,
            hint,
            active: false,
            visible: true,
        });
        self
    }

    pub fn node_mut(&mut self, id: u32) -> Option<&mut Node> {
        self.nodes.iter_mut().find(|n| n.id == id)
    }

    fn node(&self, id: u32) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// Show or hide `id` and everything below it.
    pub fn set_visible(&mut self, id: u32, visible: bool) {
        let below: Vec<u32> = self
            .nodes
            .iter()
            .filter(|n| n.id == id || self.ancestors(n.id).contains(&id))
            .map(|n| n.id)
            .collect();
        for n in self.nodes.iter_mut().filter(|n| below.contains(&n.id)) {
            n.visible = visible;
        }
    }

    /// Ancestors of `id`, root first.
    pub fn ancestors(&self, id: u32) -> Vec<u32> {
        let mut out = Vec::new();
        let mut at = self.node(id).and_then(|n| n.parent);
        while let Some(p) = at {
            out.push(p);
            at = self.node(p).and_then(|n| n.parent);
        }
        out.reverse();
        out
    }

    fn expand(&mut self, toggle: u32, expanded: bool) {
        let Some(&(_, container)) = self.folders.iter().find(|(t, _)| *t == toggle) else {
            return;
        };
        let children: Vec<u32> = self
            .nodes
            .iter()
            .filter(|n| n.parent == Some(container) && n.id != toggle)
            .map(|n| n.id)
            .collect();
        for id in children {
            self.set_visible(id, expanded);
        }
        if let Some(t) = self.node_mut(toggle) {
            t.active = expanded;
        }
    }
}

pub struct Tree(pub Shared);

impl TreeProvider<u32> for Tree {
    fn snapshot(&self, root: Option<&u32>) -> Vec<u32> {
        let world = self.0.borrow();
        world
            .nodes
            .iter()
            .filter(|n| n.visible)
            .filter(|n| root.is_none_or(|r| n.id == *r || world.ancestors(n.id).contains(r)))
            .map(|n| n.id)
            .collect()
    }

    fn name(&self, node: &u32) -> String {
        let world = self.0.borrow();
        world.node(*node).map_or_else(String::new, |n| n.name.to_string())
    }

    fn label(&self, node: &u32) -> Option<String> {
        let world = self.0.borrow();
        world.node(*node).map(|n| n.label.to_string())
    }

    fn ancestry(&self, node: &u32) -> Vec<u32> {
        self.0.borrow().ancestors(*node)
    }

    fn is_active(&self, node: &u32) -> bool {
        self.0.borrow().node(*node).is_some_and(|n| n.active)
    }

    fn role_hint(&self, node: &u32) -> RoleHint {
        self.0.borrow().node(*node).map_or(RoleHint::Unknown, |n| n.hint)
    }

    fn has_bounds(&self, node: &u32) -> bool {
        self.0.borrow().node(*node).is_some_and(|n| n.visible)
    }

    fn focused(&self) -> Option<u32> {
        self.0.borrow().focused
    }

    fn open_sub_widget(&self) -> Option<u32> {
        self.0.borrow().open_widget
    }
}

pub struct Actions(pub Shared);

impl ActivationService<u32> for Actions {
    fn activate(&mut self, element: &u32) {
        let mut world = self.0.borrow_mut();
        world.log.push(format!("activate:{element}"));
        if world.folders.iter().any(|(t, _)| t == element) {
            world.expand(*element, true);
        } else if world
            .node(*element)
            .is_some_and(|n| n.hint == RoleHint::Dropdown)
        {
            world.open_widget = Some(*element);
        }
    }

    fn set_value_silently(&mut self, element: &u32, value: &Value) {
        self.0
            .borrow_mut()
            .log
            .push(format!("set:{element}:{value:?}"));
    }

    fn collapse(&mut self, widget: &u32) {
        let mut world = self.0.borrow_mut();
        world.log.push(format!("collapse:{widget}"));
        if world.folders.iter().any(|(t, _)| t == widget) {
            world.expand(*widget, false);
        } else if world.open_widget == Some(*widget) && !world.lagging_close {
            world.open_widget = None;
        }
    }
}

/// Records every observer callback as readable text.
#[derive(Debug, Default)]
pub struct Recorder {
    pub panels: Vec<(Option<u32>, Option<u32>)>,
    pub spoken: Vec<String>,
    pub boundaries: Vec<Edge>,
    pub empty: usize,
    pub group_empty: Vec<String>,
}

impl Recorder {
    pub fn last_spoken(&self) -> Option<&str> {
        self.spoken.last().map(String::as_str)
    }
}

impl Observer<u32> for Recorder {
    fn on_active_panel_changed(&mut self, old: Option<&u32>, new: Option<&u32>) {
        self.panels.push((old.copied(), new.copied()));
    }

    fn on_cursor_changed(
        &mut self,
        element: Option<&wayfind::groups::NavigableElement<u32>>,
        group_label: &str,
    ) {
        let text = element.map_or(group_label, |e| e.label.as_str());
        self.spoken.push(text.to_string());
    }

    fn on_boundary(&mut self, edge: Edge) {
        self.boundaries.push(edge);
    }

    fn on_empty(&mut self) {
        self.empty += 1;
    }

    fn on_group_empty(&mut self, group_label: &str) {
        self.group_empty.push(group_label.to_string());
    }
}

/// Context that is active whenever `panel` is (or always, for `None`).
pub struct Screen {
    pub name: &'static str,
    pub panel: Option<u32>,
}

impl Context<u32> for Screen {
    fn name(&self) -> &str {
        self.name
    }

    fn detect_active(&mut self, frame: &Frame<'_, u32>) -> bool {
        self.panel.is_none_or(|p| frame.active_panel == Some(&p))
    }
}

/// Engine plus the world it drives.
pub struct Rig {
    pub engine: Engine<u32>,
    pub world: Shared,
    pub seen: Recorder,
}

impl Rig {
    pub fn new(world: World, rules: Vec<GroupRule>) -> Self {
        let rules = RuleTable::new(rules).expect("valid rules");
        let mut engine = Engine::new(EngineConfig::default(), rules);
        engine.register_context(
            Screen {
                name: "screen",
                panel: None,
            },
            0,
        );
        Self {
            engine,
            world: world.shared(),
            seen: Recorder::default(),
        }
    }

    pub fn tick(&mut self, now: u64) {
        let tree = Tree(self.world.clone());
        let mut actions = Actions(self.world.clone());
        let mut host = Host {
            tree: &tree,
            activation: &mut actions,
            observer: &mut self.seen,
        };
        self.engine.tick(now, &mut host);
    }

    pub fn press(&mut self, now: u64, key: Key) -> bool {
        let tree = Tree(self.world.clone());
        let mut actions = Actions(self.world.clone());
        let mut host = Host {
            tree: &tree,
            activation: &mut actions,
            observer: &mut self.seen,
        };
        self.engine
            .handle_input(now, &InputEvent::key(key), &mut host)
    }

    pub fn dismiss(&mut self, now: u64) -> bool {
        let tree = Tree(self.world.clone());
        let mut actions = Actions(self.world.clone());
        let mut host = Host {
            tree: &tree,
            activation: &mut actions,
            observer: &mut self.seen,
        };
        self.engine.dismiss_sub_widget(now, &mut host)
    }

    pub fn log(&self) -> Vec<String> {
        self.world.borrow().log.clone()
    }
}

pub fn ordinary(label: &str, prefix: &str) -> GroupRule {
    GroupRule::ordinary(label, Pattern::Prefix(prefix.to_string()))
}
