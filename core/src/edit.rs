//! Graph Mutation Engine.
//!
//! [`FlowEditor`] is the only code path that produces a new version of a
//! [`FlowDocument`]. Every public operation is atomic: it runs against a
//! working copy and commits only on success, so a failed call leaves both
//! the flow and its version untouched. Each committed operation is one undo
//! unit, compound ones included.
//!
//! Mutations do not validate. Incomplete states (an option without a
//! destination, a callout without a return target) are normal while
//! authoring; [`FlowEditor::check_save`] is the enforcement point.

use crate::error::EditError;
use crate::flow::FlowData;
use crate::id::NodeId;
use crate::node::{Choice, Node, NodeBody, NodeDefaults, NodeKind, TargetSlot};
use crate::validate::{ValidationOptions, validate_with};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use tracing::{debug, info_span};

/// Editor knobs. Loaded from the `[editor]` table of the config file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    #[serde(flatten)]
    pub defaults: NodeDefaults,
    /// Number of operations kept for undo. `0` disables undo.
    pub undo_depth: usize,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            defaults: NodeDefaults::default(),
            undo_depth: 100,
        }
    }
}

/// A flow plus a version counter bumped on every committed change.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FlowDocument {
    flow: FlowData,
    version: u64,
}

impl FlowDocument {
    pub fn new(flow: FlowData) -> Self {
        Self { flow, version: 0 }
    }

    pub fn flow(&self) -> &FlowData {
        &self.flow
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn into_flow(self) -> FlowData {
        self.flow
    }
}

/// Field edited by [`FlowEditor::set_option`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptionEdit {
    Label(String),
    /// `None` clears the destination.
    Target(Option<NodeId>),
}

/// Single-writer editing session over one flow.
#[derive(Debug, Clone)]
pub struct FlowEditor {
    doc: FlowDocument,
    config: EditorConfig,
    undo: VecDeque<FlowData>,
    redo: Vec<FlowData>,
}

impl FlowEditor {
    pub fn new(flow: FlowData) -> Self {
        Self::with_config(flow, EditorConfig::default())
    }

    pub fn with_config(flow: FlowData, config: EditorConfig) -> Self {
        Self {
            doc: FlowDocument::new(flow),
            config,
            undo: VecDeque::new(),
            redo: Vec::new(),
        }
    }

    /// Immutable view for readers (layout, projections, validator).
    pub fn snapshot(&self) -> &FlowData {
        &self.doc.flow
    }

    pub fn document(&self) -> &FlowDocument {
        &self.doc
    }

    pub fn version(&self) -> u64 {
        self.doc.version
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    pub fn into_flow(self) -> FlowData {
        self.doc.flow
    }

    /// Run `op` against a working copy and commit it if it succeeds.
    fn apply<T>(
        &mut self,
        name: &'static str,
        op: impl FnOnce(&mut FlowData, &NodeDefaults) -> Result<T, EditError>,
    ) -> Result<T, EditError> {
        let _span = info_span!("Edit", cardpath.op = name).entered();

        let mut working = self.doc.flow.clone();
        let out = match op(&mut working, &self.config.defaults) {
            Ok(out) => out,
            Err(e) => {
                debug!(error = %e, "Edit rejected");
                return Err(e);
            }
        };

        let previous = std::mem::replace(&mut self.doc.flow, working);
        self.push_undo(previous);
        self.redo.clear();
        self.doc.version += 1;
        debug!(version = self.doc.version, nodes = self.doc.flow.len(), "Edit committed");
        Ok(out)
    }

    fn push_undo(&mut self, flow: FlowData) {
        if self.config.undo_depth == 0 {
            return;
        }
        self.undo.push_back(flow);
        while self.undo.len() > self.config.undo_depth {
            self.undo.pop_front();
        }
    }

    /// Insert a default-shaped node of `kind`.
    pub fn create_node(&mut self, kind: NodeKind, id: NodeId) -> Result<(), EditError> {
        self.apply("create_node", |flow, defaults| {
            insert_new(flow, kind, id, defaults)
        })
    }

    /// Insert a default-shaped node under a freshly generated id.
    pub fn create_node_generated(&mut self, kind: NodeKind) -> Result<NodeId, EditError> {
        let id = NodeId::generate();
        self.create_node(kind, id.clone())?;
        Ok(id)
    }

    /// Remove a node and clear every reference to it. If it was the start
    /// node, the start pointer is cleared. Returns the removed node.
    pub fn delete_node(&mut self, id: &str) -> Result<Node, EditError> {
        self.apply("delete_node", |flow, _| {
            let removed = flow
                .remove(id)
                .ok_or_else(|| EditError::UnknownNode(NodeId::from(id)))?;
            let cleared: usize = flow
                .nodes_mut()
                .map(|n| n.clear_references_to(&removed.id))
                .sum();
            let was_start = flow.start() == Some(&removed.id);
            if was_start {
                flow.set_start(None);
            }
            debug!(node = %removed.id, cleared, was_start, "Node deleted");
            Ok(removed)
        })
    }

    pub fn update_node_text(&mut self, id: &str, text: impl Into<String>) -> Result<(), EditError> {
        let text = text.into();
        self.apply("update_node_text", |flow, _| {
            node_mut(flow, id)?.text = text;
            Ok(())
        })
    }

    /// Re-initialise the node's type-specific fields to `kind`'s defaults.
    /// Text and id survive; options and targets do not.
    pub fn change_node_type(&mut self, id: &str, kind: NodeKind) -> Result<(), EditError> {
        self.apply("change_node_type", |flow, defaults| {
            let node = node_mut(flow, id)?;
            debug!(node = %node.id, from = %node.kind(), to = %kind, "Node type reset");
            node.body = defaults.body(kind);
            Ok(())
        })
    }

    pub fn set_option(&mut self, id: &str, index: usize, edit: OptionEdit) -> Result<(), EditError> {
        self.apply("set_option", |flow, _| {
            let choice = option_mut(flow, id, index, "set_option")?;
            match edit {
                OptionEdit::Label(label) => choice.label = label,
                OptionEdit::Target(next) => choice.next = NodeId::target(next),
            }
            Ok(())
        })
    }

    /// Append a placeholder option. Returns its index.
    pub fn add_option(&mut self, id: &str) -> Result<usize, EditError> {
        self.apply("add_option", |flow, defaults| {
            let options = options_mut(flow, id, "add_option")?;
            let index = options.len();
            options.push(Choice::placeholder(defaults.option_label(index)));
            Ok(index)
        })
    }

    pub fn remove_option(&mut self, id: &str, index: usize) -> Result<Choice, EditError> {
        self.apply("remove_option", |flow, _| {
            let options = options_mut(flow, id, "remove_option")?;
            check_index(id, index, options.len())?;
            Ok(options.remove(index))
        })
    }

    /// Move the option at `from` so that it ends up at `to`. A move, not a swap.
    pub fn reorder_options(&mut self, id: &str, from: usize, to: usize) -> Result<(), EditError> {
        self.apply("reorder_options", |flow, _| {
            let options = options_mut(flow, id, "reorder_options")?;
            check_index(id, from, options.len())?;
            check_index(id, to, options.len())?;
            let moved = options.remove(from);
            options.insert(to, moved);
            Ok(())
        })
    }

    /// Wire `source` to `target`.
    ///
    /// For a question, `option` selects the option to rewire (its label is
    /// replaced when `label` is given); without an index a new option is
    /// appended. Callouts and infocards get their single exit set and ignore
    /// `label`. End nodes have nothing to connect.
    pub fn connect(
        &mut self,
        source: &str,
        target: &str,
        option: Option<usize>,
        label: Option<String>,
    ) -> Result<(), EditError> {
        self.apply("connect", |flow, defaults| {
            let target = existing(flow, target)?;
            let node = node_mut(flow, source)?;
            let kind = node.kind();
            match (&mut node.body, option) {
                (NodeBody::Question { options }, Some(index)) => {
                    check_index(source, index, options.len())?;
                    let choice = &mut options[index];
                    choice.next = Some(target);
                    if let Some(label) = label {
                        choice.label = label;
                    }
                }
                (NodeBody::Question { options }, None) => {
                    let label = label.unwrap_or_else(|| defaults.option_label(options.len()));
                    options.push(Choice::new(label, Some(target)));
                }
                (NodeBody::Callout { return_to: exit, .. }, None)
                | (NodeBody::Infocard { next: exit, .. }, None) => *exit = Some(target),
                (NodeBody::Callout { .. } | NodeBody::Infocard { .. }, Some(index)) => {
                    return Err(EditError::InvalidSlot {
                        slot: TargetSlot::Option(index).to_string(),
                        reason: format!("{kind} nodes have no options"),
                    });
                }
                (NodeBody::End, _) => return Err(wrong_kind(source, kind, "connect")),
            }
            debug!(source, "Nodes connected");
            Ok(())
        })
    }

    /// Create a node and point `field` of `source` at it, as one unit.
    /// `field` uses the persisted field names, e.g. `options[0].nextNodeId`.
    pub fn create_and_connect(
        &mut self,
        source: &str,
        kind: NodeKind,
        new_id: NodeId,
        field: &str,
    ) -> Result<(), EditError> {
        let slot: TargetSlot = field.parse().map_err(|slot| EditError::InvalidSlot {
            slot,
            reason: "expected `options[N].nextNodeId`, `returnToNodeId` or `nextNodeId`"
                .to_string(),
        })?;
        self.create_and_connect_slot(source, kind, new_id, slot)
    }

    pub fn create_and_connect_slot(
        &mut self,
        source: &str,
        kind: NodeKind,
        new_id: NodeId,
        slot: TargetSlot,
    ) -> Result<(), EditError> {
        self.apply("create_and_connect", |flow, defaults| {
            let source_node = node_mut(flow, source)?;
            let source_kind = source_node.kind();
            let exit = source_node
                .target_mut(slot)
                .ok_or_else(|| EditError::InvalidSlot {
                    slot: slot.to_string(),
                    reason: format!("{source_kind} node `{source}` has no such field"),
                })?;
            *exit = Some(new_id.clone());
            // The working copy is discarded if the insert fails, wiring included.
            insert_new(flow, kind, new_id, defaults)
        })
    }

    /// Point the start at an existing node, or clear it.
    pub fn set_start(&mut self, start: Option<&str>) -> Result<(), EditError> {
        self.apply("set_start", |flow, _| {
            let start = start.map(|id| existing(flow, id)).transpose()?;
            flow.set_start(start);
            Ok(())
        })
    }

    /// Set or clear the single exit of a callout or infocard.
    pub fn set_target(&mut self, id: &str, target: Option<&str>) -> Result<(), EditError> {
        self.apply("set_target", |flow, _| {
            let target = target.map(|t| existing(flow, t)).transpose()?;
            let node = node_mut(flow, id)?;
            let slot = match node.kind() {
                NodeKind::Callout => TargetSlot::ReturnTo,
                NodeKind::Infocard => TargetSlot::Next,
                kind @ (NodeKind::Question | NodeKind::End) => {
                    return Err(wrong_kind(id, kind, "set_target"));
                }
            };
            if let Some(exit) = node.target_mut(slot) {
                *exit = target;
            }
            Ok(())
        })
    }

    pub fn set_button_label(&mut self, id: &str, label: Option<String>) -> Result<(), EditError> {
        self.apply("set_button_label", |flow, _| {
            let node = node_mut(flow, id)?;
            let kind = node.kind();
            match &mut node.body {
                NodeBody::Callout { button_label, .. } | NodeBody::Infocard { button_label, .. } => {
                    *button_label = label;
                    Ok(())
                }
                NodeBody::Question { .. } | NodeBody::End => {
                    Err(wrong_kind(id, kind, "set_button_label"))
                }
            }
        })
    }

    pub fn undo(&mut self) -> Result<(), EditError> {
        let previous = self.undo.pop_back().ok_or(EditError::NothingToUndo)?;
        let current = std::mem::replace(&mut self.doc.flow, previous);
        self.redo.push(current);
        self.doc.version += 1;
        debug!(version = self.doc.version, "Edit undone");
        Ok(())
    }

    pub fn redo(&mut self) -> Result<(), EditError> {
        let next = self.redo.pop().ok_or(EditError::NothingToRedo)?;
        let current = std::mem::replace(&mut self.doc.flow, next);
        self.undo.push_back(current);
        self.doc.version += 1;
        debug!(version = self.doc.version, "Edit redone");
        Ok(())
    }

    /// The save gate: refuses while the flow has missing text, too few
    /// options, or a callout/infocard without its exit.
    pub fn check_save(&self) -> Result<&FlowData, EditError> {
        let result = validate_with(
            &self.doc.flow,
            &ValidationOptions {
                require_start: false,
            },
        );
        if result.blocks_save() {
            let blocking = result
                .errors
                .into_iter()
                .filter(|e| e.kind.blocks_save())
                .collect();
            return Err(EditError::SaveBlocked(blocking));
        }
        Ok(&self.doc.flow)
    }
}

fn insert_new(
    flow: &mut FlowData,
    kind: NodeKind,
    id: NodeId,
    defaults: &NodeDefaults,
) -> Result<(), EditError> {
    if id.is_blank() {
        return Err(EditError::EmptyNodeId);
    }
    let node = Node::with_defaults(kind, id, defaults);
    flow.insert(node)
        .map_err(|rejected| EditError::DuplicateNode(rejected.id))?;
    Ok(())
}

fn existing(flow: &FlowData, id: &str) -> Result<NodeId, EditError> {
    flow.get(id)
        .map(|n| n.id.clone())
        .ok_or_else(|| EditError::UnknownNode(NodeId::from(id)))
}

fn node_mut<'a>(flow: &'a mut FlowData, id: &str) -> Result<&'a mut Node, EditError> {
    flow.get_mut(id)
        .ok_or_else(|| EditError::UnknownNode(NodeId::from(id)))
}

fn wrong_kind(id: &str, kind: NodeKind, operation: &'static str) -> EditError {
    EditError::WrongKind {
        node: NodeId::from(id),
        kind,
        operation,
    }
}

fn options_mut<'a>(
    flow: &'a mut FlowData,
    id: &str,
    operation: &'static str,
) -> Result<&'a mut Vec<Choice>, EditError> {
    let node = node_mut(flow, id)?;
    let kind = node.kind();
    match &mut node.body {
        NodeBody::Question { options } => Ok(options),
        NodeBody::End | NodeBody::Callout { .. } | NodeBody::Infocard { .. } => {
            Err(wrong_kind(id, kind, operation))
        }
    }
}

fn option_mut<'a>(
    flow: &'a mut FlowData,
    id: &str,
    index: usize,
    operation: &'static str,
) -> Result<&'a mut Choice, EditError> {
    let options = options_mut(flow, id, operation)?;
    check_index(id, index, options.len())?;
    Ok(&mut options[index])
}

fn check_index(id: &str, index: usize, len: usize) -> Result<(), EditError> {
    if index < len {
        Ok(())
    } else {
        Err(EditError::OptionOutOfRange {
            node: NodeId::from(id),
            index,
            len,
        })
    }
}
