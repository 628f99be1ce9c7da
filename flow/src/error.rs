use cardpath_core::{ErrorCategory, NodeId};
use thiserror::Error;

/// A transition the player refused to make.
///
/// The session state is never changed by a refused transition.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlayError {
    #[error("the flow has no start node")]
    NoStart,
    #[error("start node `{0}` does not exist")]
    StartNotFound(NodeId),
    #[error("`{from}` leads to `{target}`, which does not exist")]
    DanglingTarget { from: NodeId, target: NodeId },
    #[error("`{node}` has no destination for this action")]
    MissingTarget { node: NodeId },
    #[error("`{0}` is an end node; only restart is possible")]
    Terminal(NodeId),
    #[error("action {index} does not exist at `{node}` ({len} available)")]
    ActionOutOfRange {
        node: NodeId,
        index: usize,
        len: usize,
    },
    #[error("recorded move from `{recorded}` does not match current node `{current}`")]
    Diverged { recorded: NodeId, current: NodeId },
}

impl PlayError {
    pub fn category(&self) -> ErrorCategory {
        ErrorCategory::RuntimePath
    }

    /// True if the story itself is broken, as opposed to the caller asking
    /// for a move that does not exist.
    pub fn is_broken_story(&self) -> bool {
        matches!(
            self,
            PlayError::NoStart
                | PlayError::StartNotFound(_)
                | PlayError::DanglingTarget { .. }
                | PlayError::MissingTarget { .. }
        )
    }
}
