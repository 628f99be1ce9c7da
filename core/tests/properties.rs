use cardpath_core::{
    Choice, FlowData, FlowEditor, Node, NodeId, layout, traverse::breadth_first,
};
use proptest::prelude::*;
use proptest::test_runner::Config;

fn id(i: usize) -> NodeId {
    NodeId::from(format!("n{i}").as_str())
}

/// `target == n` stands for a dangling reference.
type NodeSpec = (usize, Vec<Option<usize>>, String);

fn build(specs: Vec<NodeSpec>, start: Option<usize>) -> FlowData {
    let n = specs.len();
    let to_target = |t: Option<usize>| {
        t.map(|t| if t == n { NodeId::from("ghost") } else { id(t) })
    };
    let nodes = specs.into_iter().enumerate().map(|(i, (kind, targets, text))| {
        let first = to_target(targets.first().copied().flatten());
        let node = match kind {
            0 => Node::question(id(i)).with_options(
                targets
                    .into_iter()
                    .enumerate()
                    .map(|(j, t)| Choice::new(format!("o{j}"), to_target(t)))
                    .collect(),
            ),
            1 => Node::end(id(i)),
            2 => Node::callout(id(i)),
            _ => Node::infocard(id(i)),
        };
        let node = match first {
            Some(target) if kind >= 2 => node.with_target(target),
            _ => node,
        };
        node.with_text(text)
    });
    FlowData::from_nodes(start.map(id), nodes.collect::<Vec<_>>()).unwrap()
}

fn arb_flow() -> impl Strategy<Value = FlowData> {
    (1usize..9)
        .prop_flat_map(|n| {
            let node = (
                0usize..4,
                prop::collection::vec(prop::option::of(0..=n), 0..4),
                "[a-z ]{0,8}",
            );
            (prop::collection::vec(node, n), prop::option::of(0..n))
        })
        .prop_map(|(specs, start)| build(specs, start))
}

/// Shortest edge distances from `start` by relaxation, independent of the
/// queue-based traversal under test.
fn distances(flow: &FlowData, start: &str) -> Vec<(NodeId, usize)> {
    let mut dist: Vec<(NodeId, Option<usize>)> = flow
        .ids()
        .map(|i| (i.clone(), (i.as_str() == start).then_some(0)))
        .collect();
    for _ in 0..flow.len() {
        for k in 0..dist.len() {
            let Some(d) = dist[k].1 else { continue };
            let Some(node) = flow.get(dist[k].0.as_str()) else { continue };
            for target in node.outgoing_targets() {
                if let Some(entry) = dist.iter_mut().find(|(i, _)| i == target) {
                    if entry.1.is_none_or(|old| d + 1 < old) {
                        entry.1 = Some(d + 1);
                    }
                }
            }
        }
    }
    dist.into_iter()
        .filter_map(|(i, d)| d.map(|d| (i, d)))
        .collect()
}

proptest! {
    #![proptest_config(Config::with_cases(128))]

    #[test]
    fn delete_clears_every_reference(flow in arb_flow(), pick in any::<prop::sample::Index>()) {
        let ids: Vec<NodeId> = flow.ids().cloned().collect();
        let victim = pick.get(&ids).clone();
        let mut editor = FlowEditor::new(flow);
        editor.delete_node(victim.as_str()).unwrap();

        let after = editor.snapshot();
        prop_assert!(!after.contains(victim.as_str()));
        prop_assert!(after.start() != Some(&victim));
        for node in after.nodes() {
            prop_assert!(node.outgoing_targets().iter().all(|t| **t != victim));
        }
    }

    #[test]
    fn layout_positions_every_node(flow in arb_flow()) {
        let positions = layout(&flow);
        prop_assert_eq!(positions.len(), flow.len());
        for node_id in flow.ids() {
            let p = positions.get(node_id.as_str());
            prop_assert!(p.is_some());
            let p = p.unwrap();
            prop_assert!(p.x.is_finite() && p.y.is_finite());
        }
    }

    #[test]
    fn layout_level_is_shortest_distance(flow in arb_flow()) {
        prop_assume!(flow.start_node().is_some());
        let start = flow.start().unwrap().clone();
        let positions = layout(&flow);
        let expected = distances(&flow, start.as_str());
        prop_assert_eq!(expected.len(), breadth_first(&flow, start.as_str()).len());
        for (node_id, d) in expected {
            prop_assert_eq!(positions.get(node_id.as_str()).unwrap().level, d);
        }
    }

    #[test]
    fn json_round_trip_is_lossless(flow in arb_flow()) {
        let json = flow.to_json().unwrap();
        let back = FlowData::from_json(&json).unwrap();
        prop_assert_eq!(&back, &flow);
        let order: Vec<&NodeId> = back.ids().collect();
        let original: Vec<&NodeId> = flow.ids().collect();
        prop_assert_eq!(order, original);
    }
}
