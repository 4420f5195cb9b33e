// Copyright 2025 the Wayfind Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The per-tick engine.

use alloc::vec::Vec;
use core::fmt::Debug;
use core::hash::Hash;

use tracing::debug;
use wayfind_dispatch::{Context, Dispatcher, Frame, InputEvent, SuspensionController};
use wayfind_groups::{GroupAssigner, RuleTable, capture};
use wayfind_navigator::{Command, Effects, NavEvent, Navigator, RescanScheduler};
use wayfind_panels::Reconciler;

use crate::config::EngineConfig;
use crate::host::Host;

/// Ties reconciliation, grouping, navigation and dispatch into one tick.
///
/// Each tick runs, in order:
///
/// 1. the panel reconciler; a change of active panel is reported and
///    requests a rescan,
/// 2. the suspension controller, against the host's open sub-widget,
/// 3. a rescan if one is due: the tree is captured (scoped to the active
///    panel when it filters its siblings), grouped, and handed to the
///    navigator,
/// 4. input dispatch,
/// 5. the effect flush: commands to the activation service, events to the
///    observer once per kind, resync to the host's focused element, and
///    rescan requests to the debounce scheduler.
///
/// Every piece of state is owned here; collaborators are only borrowed for
/// the duration of a tick.
pub struct Engine<K: Copy + Eq + Hash + Debug> {
    reconciler: Reconciler<K>,
    assigner: GroupAssigner,
    navigator: Navigator<K>,
    dispatcher: Dispatcher<K>,
    scheduler: RescanScheduler,
    effects: Effects<K>,
}

impl<K: Copy + Eq + Hash + Debug> Debug for Engine<K> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Engine")
            .field("reconciler", &self.reconciler)
            .field("navigator", &self.navigator)
            .field("dispatcher", &self.dispatcher)
            .field("scheduler", &self.scheduler)
            .finish_non_exhaustive()
    }
}

impl<K: Copy + Eq + Hash + Debug> Engine<K> {
    /// Create an engine. The first tick always rescans.
    pub fn new(config: EngineConfig, rules: RuleTable) -> Self {
        let mut scheduler = RescanScheduler::new(config.rescan);
        scheduler.request(0);
        Self {
            reconciler: Reconciler::new(config.reconciler),
            assigner: GroupAssigner::new(rules),
            navigator: Navigator::new(config.navigator),
            dispatcher: Dispatcher::new(config.keymap, config.suspension),
            scheduler,
            effects: Effects::new(),
        }
    }

    /// Register an input context. Higher priority is asked first.
    pub fn register_context(&mut self, context: impl Context<K> + 'static, priority: i32) {
        self.dispatcher.register(context, priority);
    }

    /// The panel reconciler.
    pub fn reconciler(&self) -> &Reconciler<K> {
        &self.reconciler
    }

    /// The panel reconciler, for registering detectors and direct reports.
    pub fn reconciler_mut(&mut self) -> &mut Reconciler<K> {
        &mut self.reconciler
    }

    /// The suspension controller.
    pub fn suspension(&self) -> &SuspensionController<K> {
        self.dispatcher.suspension()
    }

    /// The suspension controller, mutably.
    pub fn suspension_mut(&mut self) -> &mut SuspensionController<K> {
        self.dispatcher.suspension_mut()
    }

    /// The grouped navigator.
    pub fn navigator(&self) -> &Navigator<K> {
        &self.navigator
    }

    /// The input dispatcher.
    pub fn dispatcher(&self) -> &Dispatcher<K> {
        &self.dispatcher
    }

    /// Collapse the engaged sub-widget from code.
    ///
    /// The collapse is sent to the activation service right away, and the
    /// widget's open signal is ignored until the host reports it closed.
    /// Returns `false` when no sub-widget is engaged.
    pub fn dismiss_sub_widget(&mut self, now: u64, host: &mut Host<'_, K>) -> bool {
        let dismissed = self
            .dispatcher
            .suspension_mut()
            .dismiss(&mut self.effects);
        self.flush(now, host);
        dismissed
    }

    /// Ask for a rescan. Coalesced with other requests inside the debounce window.
    pub fn request_rescan(&mut self, now: u64) {
        self.scheduler.request(now);
    }

    /// Whether a rescan is waiting for its debounce window.
    pub fn rescan_pending(&self) -> bool {
        self.scheduler.is_pending()
    }

    /// Run a tick without input.
    pub fn tick(&mut self, now: u64, host: &mut Host<'_, K>) {
        self.run(now, None, host);
    }

    /// Run a tick and route `input`. Returns whether it was consumed.
    pub fn handle_input(&mut self, now: u64, input: &InputEvent, host: &mut Host<'_, K>) -> bool {
        self.run(now, Some(input), host)
    }

    fn run(&mut self, now: u64, input: Option<&InputEvent>, host: &mut Host<'_, K>) -> bool {
        if let Some(change) = self.reconciler.tick() {
            host.observer
                .on_active_panel_changed(change.old.as_ref(), change.new.as_ref());
            self.scheduler.request(now);
        }

        let open = host.tree.open_sub_widget();
        self.dispatcher
            .suspension_mut()
            .sync(open.as_ref(), &mut self.effects);
        if self.effects.take_rescan() {
            self.scheduler.request(now);
        }

        if self.scheduler.due(now) {
            self.rescan(now, host);
        }

        let panel = self.reconciler.active().map(|r| r.id);
        let consumed = match input {
            Some(input) => self.dispatcher.dispatch(
                input,
                panel.as_ref(),
                now,
                &mut self.navigator,
                &mut self.effects,
            ),
            None => {
                let frame = Frame {
                    active_panel: panel.as_ref(),
                    groups: self.navigator.groups(),
                    now,
                };
                self.dispatcher.refresh(&frame, &mut self.effects);
                false
            }
        };

        self.flush(now, host);
        consumed
    }

    fn rescan(&mut self, now: u64, host: &mut Host<'_, K>) {
        let scope = self
            .reconciler
            .active()
            .filter(|r| r.filters_siblings)
            .map(|r| r.id);
        let snapshot = capture(host.tree, scope.as_ref());
        let set = self.assigner.build(&snapshot, scope.as_ref());
        let outcome = self.navigator.apply_rescan(set, &mut self.effects);
        self.scheduler.complete(now);
        debug!(?scope, ?outcome, nodes = snapshot.len(), "rescan executed");
    }

    fn flush(&mut self, now: u64, host: &mut Host<'_, K>) {
        for command in self.effects.take_commands() {
            match command {
                Command::Activate(id) => host.activation.activate(&id),
                Command::Collapse(id) => host.activation.collapse(&id),
                Command::SetValueSilently(id, value) => {
                    host.activation.set_value_silently(&id, &value);
                }
            }
        }

        let mut events = self.effects.take_events();
        if events.contains(&NavEvent::Resync) {
            if let Some(focused) = host.tree.focused() {
                self.navigator.focus_element(&focused, &mut self.effects);
                events.append(&mut self.effects.take_events());
            }
            self.scheduler.request(now);
        }

        let mut seen: Vec<NavEvent> = Vec::with_capacity(events.len());
        for event in events {
            if seen.contains(&event) {
                continue;
            }
            seen.push(event);
            let label = self
                .navigator
                .current_group()
                .map_or("", |g| g.label.as_str());
            match event {
                NavEvent::CursorChanged => host
                    .observer
                    .on_cursor_changed(self.navigator.current_element(), label),
                NavEvent::Boundary(edge) => host.observer.on_boundary(edge),
                NavEvent::Empty => host.observer.on_empty(),
                NavEvent::GroupEmpty => host.observer.on_group_empty(label),
                NavEvent::Resync => {}
            }
        }

        if self.effects.take_rescan() {
            self.scheduler.request(now);
        }
    }
}
