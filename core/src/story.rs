use crate::flow::FlowData;
use crate::id::StoryId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A named, timestamped container for one flow.
///
/// Owned by the persistence layer. The core only swaps `flow_data` and bumps
/// `updated_at`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Story {
    pub id: StoryId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub flow_data: FlowData,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Story {
    /// A fresh story with an empty flow.
    pub fn new(name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: StoryId::new(),
            name: name.into(),
            description: None,
            flow_data: FlowData::empty(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_description(mut self, desc: impl Into<String>) -> Self {
        self.description = Some(desc.into());
        self
    }

    pub fn with_flow(mut self, flow: FlowData) -> Self {
        self.flow_data = flow;
        self
    }

    /// Swap in a new flow and bump `updated_at`.
    pub fn replace_flow(&mut self, flow: FlowData) {
        self.flow_data = flow;
        self.touch();
    }

    pub fn touch(&mut self) {
        // Never move backwards, even if the clock does.
        self.updated_at = Utc::now().max(self.updated_at);
    }
}
