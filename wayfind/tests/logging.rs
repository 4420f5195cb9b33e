// Copyright 2025 the Wayfind Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Warnings the engine emits when it has to make a lossy decision.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use tracing::{Level, Subscriber};
use tracing_subscriber::Layer;
use tracing_subscriber::layer::{Context, SubscriberExt};
use wayfind::groups::{
    Ancestor, GroupAssigner, GroupRule, NodeFlags, Pattern, RawNode, RoleHint, RuleTable, Snapshot,
};
use wayfind::panels::adapters::notify::NotifyDetector;
use wayfind::panels::{DetectorId, PanelKind, PanelSpec, PanelState, Reconciler};

#[derive(Debug, Default)]
struct Captured {
    message: String,
    fields: BTreeMap<String, String>,
}

impl tracing::field::Visit for Captured {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        let text = format!("{value:?}");
        if field.name() == "message" {
            self.message = text;
        } else {
            self.fields.insert(field.name().to_owned(), text);
        }
    }
}

#[derive(Clone, Default)]
struct WarnCapture {
    events: Arc<Mutex<Vec<Captured>>>,
}

impl<S> Layer<S> for WarnCapture
where
    S: Subscriber + for<'lookup> tracing_subscriber::registry::LookupSpan<'lookup>,
{
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
        if *event.metadata().level() != Level::WARN {
            return;
        }
        let mut captured = Captured::default();
        event.record(&mut captured);
        self.events.lock().expect("capture lock").push(captured);
    }
}

fn warnings(run: impl FnOnce()) -> Vec<Captured> {
    let capture = WarnCapture::default();
    let subscriber = tracing_subscriber::registry().with(capture.clone());
    tracing::subscriber::with_default(subscriber, run);
    std::mem::take(&mut *capture.events.lock().expect("capture lock"))
}

fn node(id: u32, parent: &str) -> RawNode<u32> {
    RawNode {
        id,
        name: format!("Node{id}"),
        label: format!("Item {id}"),
        path: [Ancestor {
            id: 100 + id,
            name: parent.to_owned(),
        }]
        .into_iter()
        .collect(),
        flags: NodeFlags::BOUNDED,
        hint: RoleHint::Button,
        bounds: None,
        alternate: None,
    }
}

#[test]
fn conflicting_overlays_are_reported() {
    let rules = RuleTable::new(vec![
        GroupRule::overlay("Reward", Pattern::Prefix("Reward".into()), 5),
        GroupRule::overlay("Tooltip", Pattern::Prefix("Tooltip".into()), 9),
    ])
    .expect("valid rules");
    let snapshot = Snapshot {
        nodes: vec![node(1, "RewardScreen"), node(2, "TooltipBox")],
        ..Snapshot::default()
    };

    let mut labels = Vec::new();
    let warned = warnings(|| {
        let set = GroupAssigner::new(rules).build(&snapshot, None);
        labels = set.iter().map(|g| g.label.clone()).collect();
    });

    assert_eq!(labels, vec!["Tooltip"]);
    assert_eq!(warned.len(), 1);
    assert!(warned[0].message.contains("conflicting overlay groups"));
    assert_eq!(warned[0].fields.get("winner").map(String::as_str), Some("Tooltip"));
    assert_eq!(warned[0].fields.get("overlays").map(String::as_str), Some("2"));
}

#[test]
fn evicting_an_uncorroborated_panel_is_reported() {
    let (detector, notifier) = NotifyDetector::new(DetectorId(4));
    let detector = detector.with_probe(|_| PanelState::Unknown);
    let mut reconciler = Reconciler::default();
    reconciler.add_detector(Box::new(detector));
    notifier.opened(PanelSpec::open(12_u32, PanelKind::Popup));

    let warned = warnings(|| {
        for _ in 0..reconciler.config().max_failed_audits {
            reconciler.tick();
        }
    });

    assert!(reconciler.is_empty());
    assert_eq!(warned.len(), 1);
    assert!(warned[0].message.contains("evicting uncorroborated panel"));
    assert_eq!(warned[0].fields.get("panel").map(String::as_str), Some("12"));
    assert_eq!(warned[0].fields.get("detector").map(String::as_str), Some("4"));
}
