//! Transition - what a node lets the player do next.
//!
//! Every move is either progression (counts as forward narrative progress and
//! records the node being left in history) or a challenge (a loop back that
//! does not).

use cardpath_core::{Node, NodeBody, NodeDefaults, NodeId, TargetSlot};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MoveKind {
    Progression,
    Challenge,
}

impl MoveKind {
    pub fn from_challenge(is_challenge: bool) -> Self {
        if is_challenge {
            MoveKind::Challenge
        } else {
            MoveKind::Progression
        }
    }

    pub fn is_challenge(&self) -> bool {
        *self == MoveKind::Challenge
    }
}

/// One choice available at the current node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Action {
    pub label: String,
    /// Where the action leads. `None` if the author has not set it yet.
    pub target: Option<NodeId>,
    pub kind: MoveKind,
    pub slot: TargetSlot,
}

/// Actions of `node`, in display order.
///
/// - question: one per option; an option pointing back at the question is a challenge
/// - infocard: a single progression to its next node
/// - callout: a single challenge back to its return node
/// - end: none
pub fn actions_for(node: &Node) -> Vec<Action> {
    let defaults = NodeDefaults::default();
    match &node.body {
        NodeBody::Question { options } => options
            .iter()
            .enumerate()
            .map(|(i, choice)| Action {
                label: choice.label.clone(),
                target: choice.next.clone(),
                kind: MoveKind::from_challenge(choice.next.as_ref() == Some(&node.id)),
                slot: TargetSlot::Option(i),
            })
            .collect(),
        NodeBody::End => Vec::new(),
        NodeBody::Callout {
            return_to,
            button_label,
        } => vec![Action {
            label: button_label
                .clone()
                .unwrap_or(defaults.callout_button_label),
            target: return_to.clone(),
            kind: MoveKind::Challenge,
            slot: TargetSlot::ReturnTo,
        }],
        NodeBody::Infocard { next, button_label } => vec![Action {
            label: button_label
                .clone()
                .unwrap_or(defaults.infocard_button_label),
            target: next.clone(),
            kind: MoveKind::Progression,
            slot: TargetSlot::Next,
        }],
    }
}
