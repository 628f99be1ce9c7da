use crate::transition::MoveKind;
use cardpath_core::NodeId;
use serde::{Deserialize, Serialize};

/// Represents a discrete event in a play session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum PlayEvent {
    /// Session began at the start node
    Started { node_id: NodeId, timestamp: u64 },
    /// A transition was applied
    Moved {
        from: NodeId,
        to: NodeId,
        kind: MoveKind,
        timestamp: u64,
    },
    /// Session reset to the start node
    Restarted { node_id: NodeId, timestamp: u64 },
    /// A move was refused because the story is broken at `at`
    Broken {
        at: NodeId,
        reason: String,
        timestamp: u64,
    },
}

impl PlayEvent {
    /// Milliseconds since the Unix epoch.
    pub fn timestamp(&self) -> u64 {
        match self {
            PlayEvent::Started { timestamp, .. }
            | PlayEvent::Moved { timestamp, .. }
            | PlayEvent::Restarted { timestamp, .. }
            | PlayEvent::Broken { timestamp, .. } => *timestamp,
        }
    }
}

/// A sequential record of a play session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Timeline {
    pub events: Vec<PlayEvent>,
}

impl Timeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: PlayEvent) {
        self.events.push(event);
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PlayEvent> {
        self.events.iter()
    }

    /// Moves that counted as progress.
    pub fn progression_count(&self) -> usize {
        self.events
            .iter()
            .filter(|e| {
                matches!(
                    e,
                    PlayEvent::Moved {
                        kind: MoveKind::Progression,
                        ..
                    }
                )
            })
            .count()
    }

    /// Sort events by timestamp. Stable, so same-millisecond events keep
    /// their recorded order.
    pub fn sort(&mut self) {
        self.events.sort_by_key(PlayEvent::timestamp);
    }
}

pub(crate) fn now_ms() -> u64 {
    u64::try_from(chrono::Utc::now().timestamp_millis()).unwrap_or_default()
}
