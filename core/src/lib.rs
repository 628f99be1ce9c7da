//! # cardpath-core
//!
//! The branching flow model behind cardpath: nodes and the graph that holds
//! them, the JSON wire format, validation, auto-layout and the editing
//! engine. Everything here is synchronous and in-memory except the
//! [`FlowStore`] port.

pub mod config;
pub mod edit;
pub mod error;
pub mod flow;
pub mod id;
pub mod layout;
pub mod node;
pub mod store;
pub mod story;
pub mod traverse;
pub mod validate;
pub mod wire;

pub use config::CardpathConfig;
pub use edit::{EditorConfig, FlowDocument, FlowEditor, OptionEdit};
pub use error::{ConfigError, EditError, ErrorCategory, FlowError, StoreError};
pub use flow::{FlowData, empty_flow, outgoing_targets};
pub use id::{NodeId, StoryId};
pub use layout::{Layout, LayoutConfig, Position, layout, layout_with};
pub use node::{Choice, Node, NodeBody, NodeDefaults, NodeKind, TargetSlot};
pub use store::FlowStore;
pub use story::Story;
pub use validate::{
    ErrorKind, ValidationError, ValidationOptions, ValidationResult, ValidationWarning,
    WarningKind, validate, validate_with,
};
pub use wire::flow_json_schema;

/// Construction helpers named after the node variants.
pub fn new_question_node(id: impl Into<NodeId>) -> Node {
    Node::question(id)
}

pub fn new_end_node(id: impl Into<NodeId>) -> Node {
    Node::end(id)
}

pub fn new_callout_node(id: impl Into<NodeId>) -> Node {
    Node::callout(id)
}

pub fn new_infocard_node(id: impl Into<NodeId>) -> Node {
    Node::infocard(id)
}
