//! Player - the runtime traversal engine.
//!
//! A player borrows a flow for the whole session and moves through it one
//! `answer` at a time. Every transition is synchronous and either applies
//! completely or not at all; a target that does not resolve is reported as a
//! broken story and never entered.

use crate::error::PlayError;
use crate::state::{PlayerState, Progress, SessionStatus};
use crate::timeline::{PlayEvent, Timeline, now_ms};
use crate::transition::{Action, MoveKind, actions_for};
use ahash::AHashSet;
use cardpath_core::{FlowData, Node, NodeId, NodeKind};
use tracing::{debug, info, info_span, warn};

/// Progress of `state` through `flow`.
///
/// Counts distinct question nodes among the visited ones, so looping back to
/// a question never inflates the step. Recomputed from the live graph on
/// every call.
pub fn progress(flow: &FlowData, state: &PlayerState) -> Progress {
    let visited: AHashSet<&str> = state
        .visited()
        .filter(|id| flow.kind_of(id.as_str()) == Some(NodeKind::Question))
        .map(NodeId::as_str)
        .collect();
    Progress {
        current_step: visited.len(),
        total_steps: flow.count_kind(NodeKind::Question),
    }
}

/// One play session over a borrowed flow.
#[derive(Debug)]
pub struct Player<'f> {
    flow: &'f FlowData,
    start: NodeId,
    state: PlayerState,
    status: SessionStatus,
    timeline: Timeline,
}

impl<'f> Player<'f> {
    /// Begin a session at the flow's start node.
    pub fn start(flow: &'f FlowData) -> Result<Self, PlayError> {
        let start = flow.start().cloned().ok_or(PlayError::NoStart)?;
        if !flow.contains(start.as_str()) {
            warn!(start = %start, "Refusing to play: start node missing");
            return Err(PlayError::StartNotFound(start));
        }

        let mut timeline = Timeline::new();
        timeline.push(PlayEvent::Started {
            node_id: start.clone(),
            timestamp: now_ms(),
        });
        info!(start = %start, nodes = flow.len(), "Play session started");

        let mut player = Self {
            flow,
            state: PlayerState::new(start.clone()),
            start,
            status: SessionStatus::Active,
            timeline,
        };
        player.status = player.resting_status();
        Ok(player)
    }

    pub fn flow(&self) -> &'f FlowData {
        self.flow
    }

    pub fn state(&self) -> &PlayerState {
        &self.state
    }

    pub fn current_node_id(&self) -> &NodeId {
        &self.state.current_node_id
    }

    /// The node the session is on. Always present: the flow is borrowed
    /// immutably and only resolved ids are ever entered.
    pub fn current_node(&self) -> Option<&'f Node> {
        self.flow.get(self.state.current_node_id.as_str())
    }

    pub fn history(&self) -> &[NodeId] {
        &self.state.history
    }

    pub fn status(&self) -> &SessionStatus {
        &self.status
    }

    pub fn is_terminal(&self) -> bool {
        self.current_node().map(Node::kind) == Some(NodeKind::End)
    }

    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    pub fn into_timeline(self) -> Timeline {
        self.timeline
    }

    pub fn progress(&self) -> Progress {
        progress(self.flow, &self.state)
    }

    /// Actions offered by the current node. Empty at an end node.
    pub fn actions(&self) -> Vec<Action> {
        self.current_node().map(actions_for).unwrap_or_default()
    }

    /// Move to `next`. A challenge move leaves history untouched; a
    /// progression move records the node being left.
    pub fn answer(&mut self, next: &str, is_challenge: bool) -> Result<&PlayerState, PlayError> {
        let kind = MoveKind::from_challenge(is_challenge);
        let from = self.state.current_node_id.clone();
        let _span = info_span!("Play", cardpath.node = %from, cardpath.kind = ?kind).entered();

        if self.is_terminal() {
            return Err(PlayError::Terminal(from));
        }
        let Some(to) = NodeId::parse(next) else {
            return Err(self.broken(PlayError::MissingTarget { node: from }));
        };
        if !self.flow.contains(to.as_str()) {
            return Err(self.broken(PlayError::DanglingTarget { from, target: to }));
        }

        self.state.advance(to.clone(), kind);
        self.timeline.push(PlayEvent::Moved {
            from,
            to,
            kind,
            timestamp: now_ms(),
        });
        self.status = self.resting_status();
        debug!(
            to = %self.state.current_node_id,
            history = self.state.history.len(),
            "Moved"
        );
        if self.status.is_terminal() {
            let progress = self.progress();
            info!(
                end = %self.state.current_node_id,
                step = progress.current_step,
                total = progress.total_steps,
                "Play session finished"
            );
        }
        Ok(&self.state)
    }

    /// Perform the action at `index` of [`Player::actions`].
    pub fn choose(&mut self, index: usize) -> Result<&PlayerState, PlayError> {
        let current = self.state.current_node_id.clone();
        if self.is_terminal() {
            return Err(PlayError::Terminal(current));
        }
        let mut actions = self.actions();
        if index >= actions.len() {
            return Err(PlayError::ActionOutOfRange {
                node: current,
                index,
                len: actions.len(),
            });
        }
        let action = actions.swap_remove(index);
        match action.target {
            Some(target) => self.answer(target.as_str(), action.kind.is_challenge()),
            None => Err(self.broken(PlayError::MissingTarget { node: current })),
        }
    }

    /// Back to the start node with empty history.
    pub fn restart(&mut self) -> &PlayerState {
        self.state = PlayerState::new(self.start.clone());
        self.status = self.resting_status();
        self.timeline.push(PlayEvent::Restarted {
            node_id: self.start.clone(),
            timestamp: now_ms(),
        });
        info!(start = %self.start, "Play session restarted");
        &self.state
    }

    fn resting_status(&self) -> SessionStatus {
        if self.is_terminal() {
            SessionStatus::Terminal
        } else {
            SessionStatus::Active
        }
    }

    fn broken(&mut self, error: PlayError) -> PlayError {
        warn!(at = %self.state.current_node_id, error = %error, "Broken story");
        self.timeline.push(PlayEvent::Broken {
            at: self.state.current_node_id.clone(),
            reason: error.to_string(),
            timestamp: now_ms(),
        });
        self.status = SessionStatus::Broken(error.clone());
        error
    }
}
