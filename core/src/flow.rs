//! FlowData - the whole narrative graph.
//!
//! Nodes are kept in insertion order; the order is observable (layout
//! tie-breaks, list projection, JSON key order) and survives a round-trip
//! through the wire format.
//!
//! Cycles are legal. Nothing in this module recurses over edges.

use crate::error::FlowError;
use crate::id::NodeId;
use crate::node::{Node, NodeKind};
use ahash::AHashMap;

/// The directed graph of nodes plus its start pointer.
///
/// Invariant: every node is indexed under its own id, and ids are unique.
/// Targets may dangle; the [validator](crate::validate) reports them.
#[derive(Debug, Clone, Default)]
pub struct FlowData {
    nodes: Vec<Node>,
    index: AHashMap<NodeId, usize>,
    start: Option<NodeId>,
}

/// An empty flow with no start node.
pub fn empty_flow() -> FlowData {
    FlowData::empty()
}

/// Every node id `node` references, in stable order.
pub fn outgoing_targets(node: &Node) -> Vec<&NodeId> {
    node.outgoing_targets()
}

impl FlowData {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a flow from nodes in order. Fails on blank or duplicate ids.
    /// A blank start is read as no start.
    pub fn from_nodes(
        start: Option<NodeId>,
        nodes: impl IntoIterator<Item = Node>,
    ) -> Result<Self, FlowError> {
        let mut flow = FlowData::empty();
        for node in nodes {
            if node.id.is_blank() {
                return Err(FlowError::EmptyNodeId);
            }
            if flow.contains(node.id.as_str()) {
                return Err(FlowError::DuplicateNode(node.id.into_string()));
            }
            flow.push_unchecked(node);
        }
        flow.start = NodeId::target(start);
        Ok(flow)
    }

    pub fn start(&self) -> Option<&NodeId> {
        self.start.as_ref()
    }

    /// Set the start pointer without checking that it exists. The editor
    /// checks; decoding keeps whatever was persisted so the validator can
    /// report it.
    pub fn set_start(&mut self, start: Option<NodeId>) {
        self.start = NodeId::target(start);
    }

    /// The start node, if the start pointer is set and resolves.
    pub fn start_node(&self) -> Option<&Node> {
        self.start.as_ref().and_then(|id| self.get(id.as_str()))
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn get(&self, id: &str) -> Option<&Node> {
        self.index.get(id).map(|&i| &self.nodes[i])
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut Node> {
        match self.index.get(id) {
            Some(&i) => self.nodes.get_mut(i),
            None => None,
        }
    }

    /// Position of a node in insertion order.
    pub fn position(&self, id: &str) -> Option<usize> {
        self.index.get(id).copied()
    }

    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter()
    }

    pub(crate) fn nodes_mut(&mut self) -> impl Iterator<Item = &mut Node> {
        self.nodes.iter_mut()
    }

    pub fn ids(&self) -> impl Iterator<Item = &NodeId> {
        self.nodes.iter().map(|n| &n.id)
    }

    /// Type of the node `id`, if present.
    pub fn kind_of(&self, id: &str) -> Option<NodeKind> {
        self.get(id).map(Node::kind)
    }

    /// Number of nodes of `kind`.
    pub fn count_kind(&self, kind: NodeKind) -> usize {
        self.nodes.iter().filter(|n| n.kind() == kind).count()
    }

    /// Append a node. Returns the node back if its id is blank or already
    /// taken.
    pub fn insert(&mut self, node: Node) -> Result<(), Node> {
        if node.id.is_blank() || self.contains(node.id.as_str()) {
            return Err(node);
        }
        self.push_unchecked(node);
        Ok(())
    }

    fn push_unchecked(&mut self, node: Node) {
        self.index.insert(node.id.clone(), self.nodes.len());
        self.nodes.push(node);
    }

    /// Remove a node, keeping the relative order of the rest.
    /// References to it are left untouched; see
    /// [`FlowEditor::delete_node`](crate::edit::FlowEditor::delete_node) for
    /// the cascading variant.
    pub fn remove(&mut self, id: &str) -> Option<Node> {
        let position = self.index.remove(id)?;
        let node = self.nodes.remove(position);
        for (i, n) in self.nodes.iter().enumerate().skip(position) {
            self.index.insert(n.id.clone(), i);
        }
        Some(node)
    }

    /// Replace the node stored under `node.id`, keeping its position.
    /// Returns the node back if no node with that id exists.
    pub fn replace(&mut self, node: Node) -> Result<Node, Node> {
        match self.index.get(node.id.as_str()) {
            Some(&i) => Ok(std::mem::replace(&mut self.nodes[i], node)),
            None => Err(node),
        }
    }

    /// Ids of every node that references `id`, in flow order.
    pub fn referrers(&self, id: &str) -> Vec<&NodeId> {
        self.nodes
            .iter()
            .filter(|n| n.outgoing_targets().iter().any(|t| t.as_str() == id))
            .map(|n| &n.id)
            .collect()
    }
}

impl PartialEq for FlowData {
    fn eq(&self, other: &Self) -> bool {
        self.start == other.start && self.nodes == other.nodes
    }
}

impl Eq for FlowData {}
