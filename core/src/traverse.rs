//! Iterative traversal over outgoing targets.
//!
//! Flows are cyclic by design (callouts, self-looping challenge options), so
//! every walk here is a queue plus a visited set. No recursion.

use crate::flow::FlowData;
use crate::id::NodeId;
use ahash::AHashSet;
use std::collections::VecDeque;

/// Breadth-first order from `start`, paired with each node's depth.
///
/// A node keeps the depth at which it was first discovered. Targets that do
/// not resolve are skipped. Returns an empty list if `start` is not a node.
pub fn breadth_first<'a>(flow: &'a FlowData, start: &str) -> Vec<(&'a NodeId, usize)> {
    let Some(root) = flow.get(start) else {
        return Vec::new();
    };

    let mut visited: AHashSet<&str> = AHashSet::with_capacity(flow.len());
    let mut queue: VecDeque<(&NodeId, usize)> = VecDeque::new();
    let mut order = Vec::with_capacity(flow.len());

    visited.insert(root.id.as_str());
    queue.push_back((&root.id, 0));

    while let Some((id, depth)) = queue.pop_front() {
        order.push((id, depth));
        let Some(node) = flow.get(id.as_str()) else {
            continue;
        };
        for target in node.outgoing_targets() {
            let Some(next) = flow.get(target.as_str()) else {
                continue;
            };
            if visited.insert(next.id.as_str()) {
                queue.push_back((&next.id, depth + 1));
            }
        }
    }

    order
}

/// Ids reachable from `start`, including `start` itself.
pub fn reachable_from<'a>(flow: &'a FlowData, start: &str) -> AHashSet<&'a str> {
    breadth_first(flow, start)
        .into_iter()
        .map(|(id, _)| id.as_str())
        .collect()
}
