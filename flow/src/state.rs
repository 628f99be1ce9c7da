//! PlayerState - where a session stands.
//!
//! `history` holds previously visited nodes only; it starts empty and never
//! contains the current node. Challenge moves leave it untouched.

use crate::error::PlayError;
use crate::transition::MoveKind;
use cardpath_core::NodeId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerState {
    pub current_node_id: NodeId,
    pub history: Vec<NodeId>,
}

impl PlayerState {
    /// Fresh state at `start` with empty history.
    pub fn new(start: NodeId) -> Self {
        Self {
            current_node_id: start,
            history: Vec::new(),
        }
    }

    /// Apply one move. The caller has already checked that `to` exists.
    pub fn advance(&mut self, to: NodeId, kind: MoveKind) {
        let from = std::mem::replace(&mut self.current_node_id, to);
        if kind == MoveKind::Progression {
            self.history.push(from);
        }
    }

    /// History followed by the current node.
    pub fn visited(&self) -> impl Iterator<Item = &NodeId> {
        self.history.iter().chain(std::iter::once(&self.current_node_id))
    }
}

/// What the presentation layer should show for the current node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionStatus {
    /// The current node offers at least one action
    Active,
    /// The current node is an end node; only restart remains
    Terminal,
    /// The last attempted move hit a broken reference
    Broken(PlayError),
}

impl SessionStatus {
    pub fn is_active(&self) -> bool {
        matches!(self, SessionStatus::Active)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, SessionStatus::Terminal)
    }

    pub fn is_broken(&self) -> bool {
        matches!(self, SessionStatus::Broken(_))
    }
}

/// Derived progress through the questions of a flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Progress {
    /// Distinct question nodes visited so far, current node included
    pub current_step: usize,
    /// Question nodes in the flow
    pub total_steps: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_advance() {
        let mut state = PlayerState::new("q1".into());
        state.advance("q1".into(), MoveKind::Challenge);
        assert!(state.history.is_empty());

        state.advance("i1".into(), MoveKind::Progression);
        state.advance("e1".into(), MoveKind::Progression);
        assert_eq!(state.current_node_id, "e1");
        assert_eq!(state.history, vec![NodeId::from("q1"), NodeId::from("i1")]);
        assert_eq!(state.visited().count(), 3);
    }

    #[test]
    fn test_serialized_field_names() {
        let state = PlayerState::new("q1".into());
        let json = serde_json::to_string(&state).unwrap();
        assert_eq!(json, r#"{"currentNodeId":"q1","history":[]}"#);
    }
}
