//! Persisted JSON layout of a flow.
//!
//! ```json
//! { "startNodeId": "q1",
//!   "nodes": { "q1": { "id": "q1", "type": "question", "text": "...",
//!                      "options": [{ "label": "A", "nextNodeId": "e1" }] } } }
//! ```
//!
//! This is the only place the empty-string "no destination" convention
//! exists. Object key order is preserved in both directions.
//!
//! Nodes without a `type` tag come from the pre-typed format and are migrated
//! on load by looking at which fields they carry.

use crate::error::FlowError;
use crate::flow::FlowData;
use crate::id::{NodeId, is_blank, target_to_wire};
use crate::node::{Choice, Node, NodeBody, NodeKind};
use schemars::JsonSchema;
use serde::de::{MapAccess, Visitor};
use serde::ser::{SerializeMap, SerializeStruct};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;

/// One node as stored on disk.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct WireNode {
    /// Must equal the key the node is stored under. Taken from the key when absent.
    #[serde(default)]
    pub id: String,
    /// `question`, `end`, `callout` or `infocard`. Absent in legacy data.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default)]
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<WireOption>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub return_to_node_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_node_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub button_label: Option<String>,
}

/// One option of a question as stored on disk. `""` means no destination.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct WireOption {
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub next_node_id: String,
}

/// Schema-only mirror of the persisted flow, for `schemars` export.
#[derive(JsonSchema)]
#[serde(rename_all = "camelCase")]
#[allow(dead_code)]
struct FlowDataSchema {
    start_node_id: String,
    nodes: BTreeMap<String, WireNode>,
}

/// JSON Schema of the persisted flow layout.
pub fn flow_json_schema() -> schemars::Schema {
    schemars::schema_for!(FlowDataSchema)
}

impl From<&Node> for WireNode {
    fn from(node: &Node) -> Self {
        let mut wire = WireNode {
            id: node.id.to_string(),
            kind: Some(node.kind().as_str().to_string()),
            text: node.text.clone(),
            ..Default::default()
        };
        match &node.body {
            NodeBody::Question { options } => {
                wire.options = Some(
                    options
                        .iter()
                        .map(|c| WireOption {
                            label: c.label.clone(),
                            next_node_id: target_to_wire(c.next.as_ref()),
                        })
                        .collect(),
                );
            }
            NodeBody::End => {}
            NodeBody::Callout {
                return_to,
                button_label,
            } => {
                wire.return_to_node_id = Some(target_to_wire(return_to.as_ref()));
                wire.button_label = button_label.clone();
            }
            NodeBody::Infocard { next, button_label } => {
                wire.next_node_id = Some(target_to_wire(next.as_ref()));
                wire.button_label = button_label.clone();
            }
        }
        wire
    }
}

impl WireNode {
    /// Type of this node, migrating untagged legacy nodes by shape.
    pub fn resolved_kind(&self) -> Result<NodeKind, FlowError> {
        match &self.kind {
            Some(tag) => tag.parse::<NodeKind>().map_err(|found| FlowError::UnknownType {
                node: self.id.clone(),
                found,
            }),
            None if self.options.is_some() => Ok(NodeKind::Question),
            None if self.return_to_node_id.is_some() => Ok(NodeKind::Callout),
            None if self.next_node_id.is_some() => Ok(NodeKind::Infocard),
            None => Ok(NodeKind::End),
        }
    }

    /// Convert to a model node stored under `key`.
    pub fn into_node(mut self, key: &str) -> Result<Node, FlowError> {
        if is_blank(key) {
            return Err(FlowError::EmptyNodeId);
        }
        if self.id.is_empty() {
            self.id = key.to_string();
        } else if self.id != key {
            return Err(FlowError::KeyMismatch {
                key: key.to_string(),
                id: self.id,
            });
        }
        let kind = self.resolved_kind()?;
        let body = match kind {
            NodeKind::Question => NodeBody::Question {
                options: self
                    .options
                    .unwrap_or_default()
                    .into_iter()
                    .map(|o| Choice::new(o.label, NodeId::parse(o.next_node_id)))
                    .collect(),
            },
            NodeKind::End => NodeBody::End,
            NodeKind::Callout => NodeBody::Callout {
                return_to: self.return_to_node_id.and_then(NodeId::parse),
                button_label: self.button_label,
            },
            NodeKind::Infocard => NodeBody::Infocard {
                next: self.next_node_id.and_then(NodeId::parse),
                button_label: self.button_label,
            },
        };
        Ok(Node {
            id: NodeId::from(key),
            text: self.text,
            body,
        })
    }
}

impl FlowData {
    /// Decode the persisted JSON layout.
    pub fn from_json(json: &str) -> Result<Self, FlowError> {
        let raw: RawFlow = serde_json::from_str(json)?;
        raw.into_flow()
    }

    /// Decode from an already parsed JSON value.
    pub fn from_json_value(value: serde_json::Value) -> Result<Self, FlowError> {
        let raw: RawFlow = serde_json::from_value(value)?;
        raw.into_flow()
    }

    pub fn to_json(&self) -> Result<String, FlowError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn to_json_pretty(&self) -> Result<String, FlowError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

struct WireNodes<'a>(&'a FlowData);

impl Serialize for WireNodes<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for node in self.0.nodes() {
            map.serialize_entry(node.id.as_str(), &WireNode::from(node))?;
        }
        map.end()
    }
}

impl Serialize for FlowData {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("FlowData", 2)?;
        state.serialize_field("startNodeId", &target_to_wire(self.start()))?;
        state.serialize_field("nodes", &WireNodes(self))?;
        state.end()
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawFlow {
    #[serde(default)]
    start_node_id: Option<String>,
    #[serde(default)]
    nodes: OrderedNodes,
}

impl RawFlow {
    fn into_flow(self) -> Result<FlowData, FlowError> {
        let mut nodes = Vec::with_capacity(self.nodes.0.len());
        for (key, wire) in self.nodes.0 {
            nodes.push(wire.into_node(&key)?);
        }
        let start = self.start_node_id.and_then(NodeId::parse);
        FlowData::from_nodes(start, nodes)
    }
}

/// Node map in document order. Duplicate keys are kept so that
/// [`FlowData::from_nodes`] can reject them.
#[derive(Default)]
struct OrderedNodes(Vec<(String, WireNode)>);

impl<'de> Deserialize<'de> for OrderedNodes {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct NodesVisitor;

        impl<'de> Visitor<'de> for NodesVisitor {
            type Value = OrderedNodes;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of node id to node")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut entries = Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((key, node)) = access.next_entry::<String, WireNode>()? {
                    entries.push((key, node));
                }
                Ok(OrderedNodes(entries))
            }
        }

        deserializer.deserialize_map(NodesVisitor)
    }
}

impl<'de> Deserialize<'de> for FlowData {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        RawFlow::deserialize(deserializer)?
            .into_flow()
            .map_err(serde::de::Error::custom)
    }
}
