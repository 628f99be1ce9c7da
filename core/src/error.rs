//! Error taxonomy.
//!
//! Validation findings are data ([`ValidationError`](crate::validate::ValidationError)),
//! not failures; the enums here are for operations that refuse to proceed.

use crate::id::{NodeId, StoryId};
use crate::node::NodeKind;
use crate::validate::ValidationError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// Coarse classification shared by every error and validation finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ErrorCategory {
    /// Dangling reference, missing start, key/type mismatch
    Structural,
    /// Empty text, too few options, empty option label
    UserInput,
    /// The player reached a node that does not exist or an empty target
    RuntimePath,
    /// An editor operation was called with arguments that do not fit the graph
    Edit,
    /// The persistence collaborator failed
    Storage,
}

/// Failure to decode a persisted flow.
#[derive(Error, Debug)]
pub enum FlowError {
    #[error("node stored under key `{key}` declares id `{id}`")]
    KeyMismatch { key: String, id: String },
    #[error("node id `{0}` appears more than once")]
    DuplicateNode(String),
    #[error("node `{node}` has unknown type `{found}`")]
    UnknownType { node: String, found: String },
    #[error("node stored under an empty key")]
    EmptyNodeId,
    #[error("malformed flow JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl FlowError {
    pub fn category(&self) -> ErrorCategory {
        ErrorCategory::Structural
    }
}

/// An editor operation whose arguments do not fit the current graph.
///
/// Structurally incomplete states (empty targets, empty text) are never
/// reported here; only calls that cannot be applied at all.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EditError {
    #[error("no node with id `{0}`")]
    UnknownNode(NodeId),
    #[error("a node with id `{0}` already exists")]
    DuplicateNode(NodeId),
    #[error("node ids must not be empty")]
    EmptyNodeId,
    #[error("option index {index} is out of range for node `{node}` ({len} options)")]
    OptionOutOfRange {
        node: NodeId,
        index: usize,
        len: usize,
    },
    #[error("`{operation}` does not apply to {kind} node `{node}`")]
    WrongKind {
        node: NodeId,
        kind: NodeKind,
        operation: &'static str,
    },
    #[error("`{slot}` is not a valid target field: {reason}")]
    InvalidSlot { slot: String, reason: String },
    #[error("nothing to undo")]
    NothingToUndo,
    #[error("nothing to redo")]
    NothingToRedo,
    #[error("save blocked by {} validation error(s)", .0.len())]
    SaveBlocked(Vec<ValidationError>),
}

impl EditError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            EditError::SaveBlocked(_) => ErrorCategory::UserInput,
            _ => ErrorCategory::Edit,
        }
    }
}

/// Failure of the persistence collaborator.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("story `{0}` not found")]
    NotFound(StoryId),
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("stored story is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Codec(#[from] FlowError),
}

impl StoreError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            StoreError::Codec(e) => e.category(),
            _ => ErrorCategory::Storage,
        }
    }
}

/// Failure to load configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}
