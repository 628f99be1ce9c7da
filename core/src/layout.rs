//! Auto-Layout Engine - deterministic 2-D positions for the visual editor.
//!
//! Nodes are levelled breadth-first from the start node and centred within
//! their level. Unreached nodes land on level 0 after the reached ones, so
//! every node gets exactly one position.
//!
//! The layout is recomputed from scratch on every structural change. That is
//! fine for narrative graphs (tens of nodes); it is the scalability ceiling
//! for anything much larger.

use crate::flow::FlowData;
use crate::id::NodeId;
use crate::traverse::breadth_first;
use ahash::{AHashMap, AHashSet};
use serde::{Deserialize, Serialize};

/// Spacing knobs, in editor units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub node_width: f64,
    pub gutter: f64,
    pub level_height: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            node_width: 250.0,
            gutter: 50.0,
            level_height: 150.0,
        }
    }
}

/// Position of one node.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
    pub level: usize,
}

/// Result of [`layout`]: one position per node plus the per-level order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Layout {
    positions: AHashMap<NodeId, Position>,
    levels: Vec<Vec<NodeId>>,
}

impl Layout {
    pub fn get(&self, id: &str) -> Option<&Position> {
        self.positions.get(id)
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Node ids per level, left to right.
    pub fn levels(&self) -> &[Vec<NodeId>] {
        &self.levels
    }

    /// Positions level by level, left to right.
    pub fn iter(&self) -> impl Iterator<Item = (&NodeId, &Position)> {
        self.levels
            .iter()
            .flatten()
            .filter_map(|id| self.positions.get(id.as_str()).map(|p| (id, p)))
    }
}

/// Lay out `flow` with default spacing.
pub fn layout(flow: &FlowData) -> Layout {
    layout_with(flow, &LayoutConfig::default())
}

pub fn layout_with(flow: &FlowData, config: &LayoutConfig) -> Layout {
    // Free-form editing tolerates graphs without a (valid) start yet.
    let root = flow
        .start_node()
        .or_else(|| flow.nodes().next())
        .map(|n| n.id.as_str());

    let mut levels: Vec<Vec<NodeId>> = Vec::new();
    let mut placed: AHashSet<&str> = AHashSet::with_capacity(flow.len());

    let place = |levels: &mut Vec<Vec<NodeId>>, id: &NodeId, level: usize| {
        if levels.len() <= level {
            levels.resize_with(level + 1, Vec::new);
        }
        levels[level].push(id.clone());
    };

    if let Some(root) = root {
        for (id, level) in breadth_first(flow, root) {
            placed.insert(id.as_str());
            place(&mut levels, id, level);
        }
    }
    for node in flow.nodes() {
        if placed.insert(node.id.as_str()) {
            place(&mut levels, &node.id, 0);
        }
    }

    let step = config.node_width + config.gutter;
    let mut positions = AHashMap::with_capacity(flow.len());
    for (level, ids) in levels.iter().enumerate() {
        let centre = (ids.len() as f64 - 1.0) / 2.0;
        for (index, id) in ids.iter().enumerate() {
            positions.insert(
                id.clone(),
                Position {
                    x: (index as f64 - centre) * step,
                    y: level as f64 * config.level_height,
                    level,
                },
            );
        }
    }

    tracing::trace!(nodes = positions.len(), levels = levels.len(), "Layout computed");

    Layout { positions, levels }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::{Choice, Node};

    fn fan_out() -> FlowData {
        FlowData::from_nodes(
            Some("q1".into()),
            vec![
                Node::question("q1").with_options(vec![
                    Choice::new("a", Some("e1".into())),
                    Choice::new("b", Some("e2".into())),
                    Choice::new("c", Some("q1".into())),
                ]),
                Node::end("e1"),
                Node::end("e2"),
                Node::end("orphan"),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_levels_and_centering() {
        let l = layout(&fan_out());
        assert_eq!(l.len(), 4);

        // Level 0 holds the start node and the orphan packed after it.
        let q1 = l.get("q1").unwrap();
        let orphan = l.get("orphan").unwrap();
        assert_eq!((q1.level, orphan.level), (0, 0));
        assert_eq!(q1.x, -150.0);
        assert_eq!(orphan.x, 150.0);
        assert_eq!(q1.y, 0.0);

        let e1 = l.get("e1").unwrap();
        let e2 = l.get("e2").unwrap();
        assert_eq!((e1.level, e2.level), (1, 1));
        assert_eq!((e1.x, e2.x), (-150.0, 150.0));
        assert_eq!(e1.y, 150.0);
    }

    #[test]
    fn test_single_node_centered() {
        let flow = FlowData::from_nodes(None, vec![Node::end("solo")]).unwrap();
        let l = layout(&flow);
        assert_eq!(l.get("solo"), Some(&Position { x: 0.0, y: 0.0, level: 0 }));
    }

    #[test]
    fn test_no_start_uses_first_node() {
        let mut flow = fan_out();
        flow.set_start(None);
        let l = layout(&flow);
        assert_eq!(l.get("e1").unwrap().level, 1);

        flow.set_start(Some("ghost".into()));
        assert_eq!(layout(&flow).get("e2").unwrap().level, 1);
    }

    #[test]
    fn test_custom_spacing() {
        let config = LayoutConfig {
            node_width: 100.0,
            gutter: 0.0,
            level_height: 10.0,
        };
        let l = layout_with(&fan_out(), &config);
        assert_eq!(l.get("e2").unwrap().x, 50.0);
        assert_eq!(l.get("e2").unwrap().y, 10.0);
        let order: Vec<&str> = l.iter().map(|(id, _)| id.as_str()).collect();
        assert_eq!(order, vec!["q1", "orphan", "e1", "e2"]);
    }

    #[test]
    fn test_empty_flow() {
        assert!(layout(&FlowData::empty()).is_empty());
    }
}
