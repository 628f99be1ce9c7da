//! Identifiers for nodes and stories.
//!
//! A `NodeId` is never empty. The "no destination" case is modelled as
//! `Option<NodeId>::None`; the empty string only exists on the wire.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;
use uuid::Uuid;

/// Identifier of a node inside one [`FlowData`](crate::flow::FlowData).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    /// Wrap a raw id. Returns `None` for an empty or whitespace-only string;
    /// the empty string is the wire encoding of "no destination".
    pub fn parse(raw: impl Into<String>) -> Option<Self> {
        let raw = raw.into();
        if is_blank(&raw) { None } else { Some(NodeId(raw)) }
    }

    /// Whether this id is empty or whitespace-only. `From<&str>` can build
    /// one; the model refuses to store it.
    pub fn is_blank(&self) -> bool {
        is_blank(&self.0)
    }

    /// Drop a blank target, so "no destination" is always `None`.
    pub fn target(target: Option<NodeId>) -> Option<NodeId> {
        target.filter(|id| !id.is_blank())
    }

    /// Generate a fresh id. Generated ids are never reused, even after the
    /// node that carried one is deleted.
    pub fn generate() -> Self {
        NodeId(format!("node_{}", Uuid::new_v4().simple()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

/// One rule for node ids everywhere: not empty after trimming.
pub(crate) fn is_blank(raw: &str) -> bool {
    raw.trim().is_empty()
}

/// Encode an optional target the way the persisted JSON expects it.
pub fn target_to_wire(target: Option<&NodeId>) -> String {
    target.map(|id| id.0.clone()).unwrap_or_default()
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for NodeId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for NodeId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// Convenience for literals. A blank literal still produces an id; the model
// treats a blank target as `None` and rejects a blank node id.
impl From<&str> for NodeId {
    fn from(raw: &str) -> Self {
        NodeId(raw.to_string())
    }
}

impl PartialEq<str> for NodeId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for NodeId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// Identifier of a [`Story`](crate::story::Story).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StoryId(pub Uuid);

impl StoryId {
    pub fn new() -> Self {
        StoryId(Uuid::new_v4())
    }
}

impl Default for StoryId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for StoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl std::str::FromStr for StoryId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(StoryId)
    }
}
