// Copyright 2025 the Wayfind Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Property-based tests for the engine's structural guarantees.
//!
//! 1. **Partition**: after filtering, every node lands in exactly one group,
//!    as a member or as a folder toggle.
//! 2. **Overlay exclusivity**: a matched overlay group replaces every other
//!    group.
//! 3. **Single active panel**: after each tick the active panel is the open
//!    record with the highest priority, most recent report first, and a
//!    change is reported exactly when it moves.
//! 4. **Eviction**: an uncorroborated panel is gone after the configured
//!    number of failed audits, producing exactly one change.
//! 5. **Debounce**: requests inside the window collapse into one rescan.
//! 6. **Idempotent rescan**: applying the same group set twice is silent.
//! 7. **Boundary**: a refused move changes nothing and marks the edge.

use std::cell::Cell;
use std::collections::{BTreeMap, HashSet};
use std::rc::Rc;

use proptest::prelude::*;
use wayfind::groups::{
    Ancestor, GroupAssigner, GroupClass, GroupRule, NodeFlags, Pattern, RawNode, Role, RoleHint,
    RuleTable, Snapshot, classify,
};
use wayfind::navigator::{
    Edge, Effects, NavEvent, Navigation, Navigator, NavigatorConfig, RescanConfig,
    RescanOutcome, RescanScheduler,
};
use wayfind::panels::adapters::poll::PollDetector;
use wayfind::panels::{DetectorId, PanelKind, PanelSpec, Reconciler, ReconcilerConfig};

// ── Snapshot generation ─────────────────────────────────────────────────

const PARENTS: [&str; 5] = ["HandArea", "MenuBar", "SectionAudio", "Misc", "PopupReward"];

const HINTS: [RoleHint; 11] = [
    RoleHint::Button,
    RoleHint::Clickable,
    RoleHint::Toggle,
    RoleHint::TextField,
    RoleHint::Dropdown,
    RoleHint::Slider,
    RoleHint::Stepper,
    RoleHint::Text,
    RoleHint::Image,
    RoleHint::Container,
    RoleHint::Unknown,
];

#[derive(Clone, Debug)]
struct NodeSeed {
    id: u32,
    parent: usize,
    hint: usize,
    bounded: bool,
    toggle_name: bool,
}

fn node_seed(parents: usize) -> impl Strategy<Value = NodeSeed> {
    (0u32..40, 0..parents, 0..HINTS.len(), any::<bool>(), any::<bool>()).prop_map(
        |(id, parent, hint, bounded, toggle_name)| NodeSeed {
            id,
            parent,
            hint,
            bounded,
            toggle_name,
        },
    )
}

fn raw(seed: &NodeSeed) -> RawNode<u32> {
    let parent = Ancestor {
        id: 1000 + seed.parent as u32,
        name: PARENTS[seed.parent].to_string(),
    };
    let name = if seed.toggle_name {
        format!("Header{}", seed.id)
    } else {
        format!("Node{}", seed.id)
    };
    let mut flags = NodeFlags::empty();
    if seed.bounded {
        flags |= NodeFlags::BOUNDED;
    }
    RawNode {
        id: seed.id,
        label: format!("Label {}", seed.id),
        name,
        path: [parent].into_iter().collect(),
        flags,
        hint: HINTS[seed.hint],
        bounds: None,
        alternate: None,
    }
}

fn snapshot(seeds: &[NodeSeed]) -> Snapshot<u32> {
    Snapshot {
        nodes: seeds.iter().map(raw).collect(),
        ..Snapshot::default()
    }
}

/// Nodes the assigner must expose: first occurrence, bounded, not decoration.
fn navigable(snapshot: &Snapshot<u32>) -> Vec<&RawNode<u32>> {
    let mut seen = HashSet::new();
    snapshot
        .nodes
        .iter()
        .filter(|n| seen.insert(n.id))
        .filter(|n| n.flags.contains(NodeFlags::BOUNDED) && classify(*n) != Role::Decoration)
        .collect()
}

fn plain_rules() -> RuleTable {
    RuleTable::new(vec![
        GroupRule::ordinary("Hand", Pattern::Prefix("Hand".into())),
        GroupRule::ordinary("Menu", Pattern::Exact("MenuBar".into())),
        GroupRule::folder(
            "Options",
            Pattern::Prefix("Section".into()),
            Pattern::Contains("Header".into()),
        ),
    ])
    .expect("valid rules")
}

fn overlay_rules() -> RuleTable {
    RuleTable::new(vec![
        GroupRule::ordinary("Hand", Pattern::Prefix("Hand".into())),
        GroupRule::overlay("Reward", Pattern::Prefix("Popup".into()), 5),
    ])
    .expect("valid rules")
}

proptest! {
    #[test]
    fn every_navigable_node_lands_in_exactly_one_group(
        seeds in prop::collection::vec(node_seed(4), 0..40),
    ) {
        let snap = snapshot(&seeds);
        let set = GroupAssigner::new(plain_rules()).build(&snap, None);

        let mut exposed: Vec<u32> = set.elements().map(|e| e.id).collect();
        let mut expected: Vec<u32> = navigable(&snap).iter().map(|n| n.id).collect();
        prop_assert_eq!(exposed.len(), set.element_count());
        exposed.sort_unstable();
        expected.sort_unstable();
        prop_assert_eq!(exposed, expected);
    }

    #[test]
    fn matched_overlay_replaces_every_other_group(
        seeds in prop::collection::vec(node_seed(PARENTS.len()), 0..40),
    ) {
        let snap = snapshot(&seeds);
        let set = GroupAssigner::new(overlay_rules()).build(&snap, None);

        let overlaid = navigable(&snap)
            .iter()
            .any(|n| n.path.iter().any(|a| a.name == "PopupReward"));
        if overlaid {
            prop_assert_eq!(set.len(), 1);
            prop_assert!(matches!(
                set.get(0).map(|g| g.class),
                Some(GroupClass::Overlay { priority: 5 })
            ), "expected single Overlay group with priority 5");
        } else {
            prop_assert!(set.overlay().is_none());
        }
    }
}

// ── Panel reconciliation ────────────────────────────────────────────────

#[derive(Clone, Debug)]
enum Report {
    Opened { panel: u32, priority: i32 },
    Closed { panel: u32 },
}

fn report() -> impl Strategy<Value = Report> {
    prop_oneof![
        3 => (0u32..6, 0i32..4).prop_map(|(panel, p)| Report::Opened { panel, priority: p * 100 }),
        2 => (0u32..6).prop_map(|panel| Report::Closed { panel }),
    ]
}

proptest! {
    #[test]
    fn active_panel_is_the_best_open_record(
        ticks in prop::collection::vec(prop::collection::vec(report(), 0..4), 1..30),
    ) {
        const HOST: DetectorId = DetectorId(9);
        let mut r = Reconciler::<u32>::default();
        // panel -> (priority, report order)
        let mut model: BTreeMap<u32, (i32, u64)> = BTreeMap::new();
        let mut order = 0_u64;
        let mut previous: Option<u32> = None;

        for reports in ticks {
            for report in reports {
                match report {
                    Report::Opened { panel, priority } => {
                        order += 1;
                        model.insert(panel, (priority, order));
                        r.report_opened(
                            HOST,
                            PanelSpec::open(panel, PanelKind::Content).with_priority(priority),
                        );
                    }
                    Report::Closed { panel } => {
                        model.remove(&panel);
                        r.report_closed(HOST, panel);
                    }
                }
            }
            let change = r.tick();
            let expected = model
                .iter()
                .max_by_key(|(_, rank)| **rank)
                .map(|(id, _)| *id);

            prop_assert_eq!(r.active().map(|p| p.id), expected);
            prop_assert_eq!(change.is_some(), expected != previous);
            if let Some(change) = change {
                prop_assert_eq!(change.old, previous);
                prop_assert_eq!(change.new, expected);
            }
            previous = expected;
        }
    }

    #[test]
    fn uncorroborated_panel_is_evicted_with_one_change(
        max_failed in 1u8..6,
        background in any::<bool>(),
    ) {
        const POPUP: u32 = 7;
        const SCREEN: u32 = 1;
        let answer = Rc::new(Cell::new(Some(true)));
        let probe = {
            let answer = Rc::clone(&answer);
            move |_: &u32| answer.get()
        };
        let detector = PollDetector::new(DetectorId(1), probe)
            .watch(PanelSpec::open(POPUP, PanelKind::Popup));

        let mut r = Reconciler::new(ReconcilerConfig { max_failed_audits: max_failed });
        r.add_detector(Box::new(detector));
        if background {
            r.report_opened(DetectorId(0), PanelSpec::open(SCREEN, PanelKind::Content));
        }
        let fallback = background.then_some(SCREEN);

        prop_assert!(r.tick().is_some());
        prop_assert_eq!(r.active().map(|p| p.id), Some(POPUP));

        // The host loses track of the popup.
        answer.set(None);
        let mut changes = Vec::new();
        for tick in 1..=u32::from(max_failed) * 2 + 2 {
            if let Some(change) = r.tick() {
                changes.push((tick, change));
            }
        }
        prop_assert_eq!(changes.len(), 1);
        let (tick, change) = &changes[0];
        prop_assert_eq!(*tick, u32::from(max_failed));
        prop_assert_eq!(change.old, Some(POPUP));
        prop_assert_eq!(change.new, fallback);
        prop_assert!(r.record(&POPUP).is_none());
    }
}

// ── Rescan scheduling and navigation ────────────────────────────────────

proptest! {
    #[test]
    fn requests_inside_the_window_collapse_into_one_rescan(
        window in 10u64..500,
        offsets in prop::collection::vec(0u64..1000, 1..20),
    ) {
        let mut s = RescanScheduler::new(RescanConfig { debounce_window: window });
        s.request(0);
        prop_assert!(s.due(0));
        s.complete(0);

        let mut times: Vec<u64> = offsets.into_iter().map(|o| o % window).collect();
        times.sort_unstable();
        let mut runs = 0;
        for t in times {
            s.request(t);
            if s.due(t) {
                runs += 1;
                s.complete(t);
            }
        }
        prop_assert_eq!(runs, 0);
        prop_assert!(s.is_pending());
        prop_assert!(s.due(window));
        s.complete(window);
        prop_assert!(!s.is_pending());
    }

    #[test]
    fn identical_rescan_is_silent(
        seeds in prop::collection::vec(node_seed(4), 0..30),
    ) {
        let snap = snapshot(&seeds);
        let assigner = GroupAssigner::new(plain_rules());
        let mut nav = Navigator::new(NavigatorConfig::default());
        let mut fx = Effects::new();

        nav.apply_rescan(assigner.build(&snap, None), &mut fx);
        let cursor = nav.cursor().clone();
        fx.clear();

        let outcome = nav.apply_rescan(assigner.build(&snap, None), &mut fx);
        let expected = if nav.groups().is_empty() {
            RescanOutcome::Empty
        } else {
            RescanOutcome::Silent
        };
        prop_assert_eq!(outcome, expected);
        prop_assert!(fx.events().is_empty());
        prop_assert_eq!(nav.cursor(), &cursor);
    }

    #[test]
    fn refused_move_is_a_marked_no_op(
        seeds in prop::collection::vec(node_seed(4), 1..30),
        backwards in any::<bool>(),
    ) {
        let snap = snapshot(&seeds);
        let set = GroupAssigner::new(plain_rules()).build(&snap, None);
        prop_assume!(!set.is_empty());

        let mut nav = Navigator::new(NavigatorConfig::default());
        let mut fx = Effects::new();
        nav.apply_rescan(set, &mut fx);

        let (jump, step, edge) = if backwards {
            (Navigation::First, Navigation::Prev, Edge::Start)
        } else {
            (Navigation::Last, Navigation::Next, Edge::End)
        };
        nav.navigate(jump, &mut fx);
        let cursor = nav.cursor().clone();
        fx.clear();

        prop_assert!(nav.navigate(step, &mut fx));
        prop_assert_eq!(nav.cursor(), &cursor);
        prop_assert_eq!(fx.events(), &[NavEvent::Boundary(edge)][..]);
        prop_assert!(fx.commands().is_empty());
    }
}
