//! Graph projection for canvas editors.
//!
//! Node boxes are placed by the auto-layout and styled purely by node type.
//! Edges are styled by the type of their source. References to missing nodes
//! are not drawn; they are counted in `dangling_edges` so an editor can flag
//! them.

use crate::text_preview;
use cardpath_core::{FlowData, LayoutConfig, NodeId, NodeKind, Position, TargetSlot, layout_with};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeStyle {
    pub color: &'static str,
    pub icon: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum LineStyle {
    Solid,
    Dashed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EdgeStyle {
    pub color: &'static str,
    pub line: LineStyle,
}

pub fn node_style(kind: NodeKind) -> NodeStyle {
    match kind {
        NodeKind::Question => NodeStyle {
            color: "#3b82f6",
            icon: "help-circle",
        },
        NodeKind::End => NodeStyle {
            color: "#6b7280",
            icon: "flag",
        },
        NodeKind::Callout => NodeStyle {
            color: "#ef4444",
            icon: "alert-triangle",
        },
        NodeKind::Infocard => NodeStyle {
            color: "#22c55e",
            icon: "info",
        },
    }
}

/// Style of an edge leaving a node of `source` type.
pub fn edge_style(source: NodeKind) -> EdgeStyle {
    match source {
        NodeKind::Question | NodeKind::End => EdgeStyle {
            color: "gray",
            line: LineStyle::Solid,
        },
        NodeKind::Callout => EdgeStyle {
            color: "red",
            line: LineStyle::Dashed,
        },
        NodeKind::Infocard => EdgeStyle {
            color: "green",
            line: LineStyle::Solid,
        },
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphNode {
    pub id: NodeId,
    #[serde(rename = "type")]
    pub kind: NodeKind,
    pub label: String,
    pub position: Position,
    pub style: NodeStyle,
    pub is_start: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphEdge {
    /// `<source>:<field>`, unique within one projection
    pub id: String,
    pub source: NodeId,
    pub target: NodeId,
    /// The source field holding the reference, e.g. `options[1].nextNodeId`
    pub field: String,
    pub label: Option<String>,
    pub style: EdgeStyle,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphProjection {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
    pub dangling_edges: usize,
}

/// Project with default layout spacing.
pub fn graph_projection(flow: &FlowData) -> GraphProjection {
    project_graph(flow, &LayoutConfig::default())
}

pub fn project_graph(flow: &FlowData, config: &LayoutConfig) -> GraphProjection {
    let positions = layout_with(flow, config);
    let mut nodes = Vec::with_capacity(flow.len());
    let mut edges = Vec::new();
    let mut dangling_edges = 0;

    for node in flow.nodes() {
        let kind = node.kind();
        // Layout positions every node.
        let position = positions.get(node.id.as_str()).copied().unwrap_or(Position {
            x: 0.0,
            y: 0.0,
            level: 0,
        });
        nodes.push(GraphNode {
            id: node.id.clone(),
            kind,
            label: text_preview(&node.text),
            position,
            style: node_style(kind),
            is_start: flow.start() == Some(&node.id),
        });

        for (slot, target) in node.slots() {
            let Some(target) = target else { continue };
            if !flow.contains(target.as_str()) {
                dangling_edges += 1;
                continue;
            }
            let label = match slot {
                TargetSlot::Option(i) => node.options().get(i).map(|c| c.label.clone()),
                TargetSlot::ReturnTo | TargetSlot::Next => node.button_label().map(str::to_string),
            };
            edges.push(GraphEdge {
                id: format!("{}:{}", node.id, slot),
                source: node.id.clone(),
                target: target.clone(),
                field: slot.to_string(),
                label,
                style: edge_style(kind),
            });
        }
    }

    if dangling_edges > 0 {
        tracing::debug!(dangling_edges, "Graph projection skipped dangling edges");
    }

    GraphProjection {
        nodes,
        edges,
        dangling_edges,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cardpath_core::{Choice, Node};

    fn flow() -> FlowData {
        FlowData::from_nodes(
            Some("q1".into()),
            vec![
                Node::question("q1").with_text("Pick").with_options(vec![
                    Choice::new("Wrong", Some("c1".into())),
                    Choice::new("Right", Some("i1".into())),
                    Choice::new("Lost", Some("ghost".into())),
                ]),
                Node::callout("c1").with_text("Hm").with_target("q1"),
                Node::infocard("i1").with_text("Yes").with_target("e1"),
                Node::end("e1").with_text("Bye"),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_nodes_positioned_and_styled() {
        let projection = graph_projection(&flow());
        assert_eq!(projection.nodes.len(), 4);
        let q1 = &projection.nodes[0];
        assert!(q1.is_start);
        assert_eq!(q1.style, node_style(NodeKind::Question));
        assert_eq!(q1.position.level, 0);
        let e1 = projection.nodes.iter().find(|n| n.id == "e1").unwrap();
        assert_eq!(e1.position.level, 2);
        assert!(!e1.is_start);
    }

    #[test]
    fn test_edges_styled_by_source() {
        let projection = graph_projection(&flow());
        assert_eq!(projection.edges.len(), 4);
        assert_eq!(projection.dangling_edges, 1);

        let back = projection.edges.iter().find(|e| e.source == "c1").unwrap();
        assert_eq!(back.target, "q1");
        assert_eq!(back.style.line, LineStyle::Dashed);
        assert_eq!(back.style.color, "red");
        assert_eq!(back.label.as_deref(), Some("Go back"));

        let right = projection
            .edges
            .iter()
            .find(|e| e.id == "q1:options[1].nextNodeId")
            .unwrap();
        assert_eq!(right.label.as_deref(), Some("Right"));
        assert_eq!(right.style, edge_style(NodeKind::Question));

        let forward = projection.edges.iter().find(|e| e.source == "i1").unwrap();
        assert_eq!(forward.style.color, "green");
    }

    #[test]
    fn test_serialized_shape() {
        let value = serde_json::to_value(graph_projection(&flow())).unwrap();
        assert_eq!(value["danglingEdges"], 1);
        assert_eq!(value["nodes"][0]["type"], "question");
        assert_eq!(value["nodes"][0]["isStart"], true);
        assert_eq!(value["edges"][0]["style"]["line"], "solid");
    }
}
