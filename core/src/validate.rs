//! Graph Validator - decides whether a flow is good enough to save or play.
//!
//! Validation never fails fast: every problem in the flow is reported in one
//! pass so an author sees all of them at once. Mutations do not call into
//! this module; it is invoked explicitly at save and play time.

use crate::error::ErrorCategory;
use crate::flow::FlowData;
use crate::id::NodeId;
use crate::node::{NodeBody, TargetSlot};
use crate::traverse::reachable_from;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// What a [`ValidationError`] is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    /// A node's text is empty or whitespace-only
    MissingText,
    /// A question has fewer than two options
    TooFewOptions,
    /// An option label is empty or whitespace-only
    EmptyOptionLabel,
    /// A target is set but does not name a node
    DanglingReference,
    /// A callout without `returnToNodeId` or an infocard without `nextNodeId`
    MissingRequiredTarget,
    /// The start pointer is empty or does not name a node
    InvalidStart,
}

impl ErrorKind {
    pub fn category(&self) -> ErrorCategory {
        match self {
            ErrorKind::MissingText | ErrorKind::TooFewOptions | ErrorKind::EmptyOptionLabel => {
                ErrorCategory::UserInput
            }
            ErrorKind::DanglingReference
            | ErrorKind::MissingRequiredTarget
            | ErrorKind::InvalidStart => ErrorCategory::Structural,
        }
    }

    /// Whether the editor refuses to save while this error is present.
    pub fn blocks_save(&self) -> bool {
        matches!(
            self,
            ErrorKind::TooFewOptions | ErrorKind::MissingText | ErrorKind::MissingRequiredTarget
        )
    }
}

/// One problem found in a flow.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[error("{message}")]
#[serde(rename_all = "camelCase")]
pub struct ValidationError {
    pub kind: ErrorKind,
    /// The node the problem belongs to. `None` for flow-level problems.
    pub node_id: Option<NodeId>,
    /// The offending field, for target and option problems.
    pub slot: Option<TargetSlot>,
    pub message: String,
}

impl ValidationError {
    pub fn category(&self) -> ErrorCategory {
        self.kind.category()
    }
}

/// Non-blocking observations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WarningKind {
    /// No path leads from the start node to this node
    UnreachableNode,
    /// A question option has no destination yet
    UnsetOptionTarget,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationWarning {
    pub kind: WarningKind,
    pub node_id: NodeId,
    pub slot: Option<TargetSlot>,
    pub message: String,
}

/// Knobs for [`validate_with`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidationOptions {
    /// Report [`ErrorKind::InvalidStart`]. On for graphs intended for play;
    /// the free-form editor may turn it off for graphs without a start yet.
    pub require_start: bool,
}

impl Default for ValidationOptions {
    fn default() -> Self {
        Self {
            require_start: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub valid: bool,
    pub errors: Vec<ValidationError>,
    #[serde(default)]
    pub warnings: Vec<ValidationWarning>,
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// True if any error is one the save path refuses.
    pub fn blocks_save(&self) -> bool {
        self.errors.iter().any(|e| e.kind.blocks_save())
    }

    pub fn count(&self, kind: ErrorKind) -> usize {
        self.errors.iter().filter(|e| e.kind == kind).count()
    }

    pub fn errors_for<'a>(&'a self, node: &'a str) -> impl Iterator<Item = &'a ValidationError> {
        self.errors
            .iter()
            .filter(move |e| e.node_id.as_ref().is_some_and(|id| id.as_str() == node))
    }
}

/// Validate a flow intended for play.
pub fn validate(flow: &FlowData) -> ValidationResult {
    validate_with(flow, &ValidationOptions::default())
}

pub fn validate_with(flow: &FlowData, options: &ValidationOptions) -> ValidationResult {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    if options.require_start {
        match flow.start() {
            None => errors.push(ValidationError {
                kind: ErrorKind::InvalidStart,
                node_id: None,
                slot: None,
                message: "no start node is set".to_string(),
            }),
            Some(start) if !flow.contains(start.as_str()) => errors.push(ValidationError {
                kind: ErrorKind::InvalidStart,
                node_id: None,
                slot: None,
                message: format!("start node `{start}` does not exist"),
            }),
            Some(_) => {}
        }
    }

    for node in flow.nodes() {
        let error = |kind: ErrorKind, slot: Option<TargetSlot>, message: String| ValidationError {
            kind,
            node_id: Some(node.id.clone()),
            slot,
            message,
        };

        if node.text.trim().is_empty() {
            errors.push(error(
                ErrorKind::MissingText,
                None,
                format!("{} `{}` has no text", node.kind(), node.id),
            ));
        }

        match &node.body {
            NodeBody::Question { options } => {
                if options.len() < 2 {
                    errors.push(error(
                        ErrorKind::TooFewOptions,
                        None,
                        format!(
                            "question `{}` has {} option(s), at least 2 are required",
                            node.id,
                            options.len()
                        ),
                    ));
                }
                for (i, choice) in options.iter().enumerate() {
                    if choice.label.trim().is_empty() {
                        errors.push(error(
                            ErrorKind::EmptyOptionLabel,
                            Some(TargetSlot::Option(i)),
                            format!("option {} of question `{}` has no label", i + 1, node.id),
                        ));
                    }
                    if choice.next.is_none() {
                        warnings.push(ValidationWarning {
                            kind: WarningKind::UnsetOptionTarget,
                            node_id: node.id.clone(),
                            slot: Some(TargetSlot::Option(i)),
                            message: format!(
                                "option {} of question `{}` has no destination",
                                i + 1,
                                node.id
                            ),
                        });
                    }
                }
            }
            NodeBody::End => {}
            NodeBody::Callout { return_to: None, .. } => errors.push(error(
                ErrorKind::MissingRequiredTarget,
                Some(TargetSlot::ReturnTo),
                format!("callout `{}` has no return target", node.id),
            )),
            NodeBody::Infocard { next: None, .. } => errors.push(error(
                ErrorKind::MissingRequiredTarget,
                Some(TargetSlot::Next),
                format!("infocard `{}` has no next target", node.id),
            )),
            NodeBody::Callout { .. } | NodeBody::Infocard { .. } => {}
        }

        for (slot, target) in node.slots() {
            if let Some(target) = target {
                if !flow.contains(target.as_str()) {
                    errors.push(error(
                        ErrorKind::DanglingReference,
                        Some(slot),
                        format!("`{}` {} points to missing node `{}`", node.id, slot, target),
                    ));
                }
            }
        }
    }

    if let Some(start) = flow.start_node() {
        let reachable = reachable_from(flow, start.id.as_str());
        for node in flow.nodes() {
            if !reachable.contains(node.id.as_str()) {
                warnings.push(ValidationWarning {
                    kind: WarningKind::UnreachableNode,
                    node_id: node.id.clone(),
                    slot: None,
                    message: format!("`{}` cannot be reached from the start node", node.id),
                });
            }
        }
    }

    tracing::debug!(
        errors = errors.len(),
        warnings = warnings.len(),
        nodes = flow.len(),
        "Flow validated"
    );

    ValidationResult {
        valid: errors.is_empty(),
        errors,
        warnings,
    }
}
