//! Persistence port.
//!
//! The core hands a flow to storage and takes one back; it does not retry.
//! Last write wins. Adapters live in `cardpath-store`.

use crate::error::StoreError;
use crate::flow::FlowData;
use crate::id::StoryId;
use crate::story::Story;
use async_trait::async_trait;

/// Story storage.
#[async_trait]
pub trait FlowStore: Send + Sync {
    async fn load_story(&self, id: StoryId) -> Result<Story, StoreError>;

    /// Insert or overwrite.
    async fn save_story(&self, story: &Story) -> Result<(), StoreError>;

    async fn list_stories(&self) -> Result<Vec<Story>, StoreError>;

    /// Returns whether a story was removed.
    async fn delete_story(&self, id: StoryId) -> Result<bool, StoreError>;

    async fn load_flow(&self, id: StoryId) -> Result<FlowData, StoreError> {
        Ok(self.load_story(id).await?.flow_data)
    }

    /// Replace the flow of an existing story and bump its `updated_at`.
    async fn save_flow(&self, id: StoryId, flow: FlowData) -> Result<(), StoreError> {
        let mut story = self.load_story(id).await?;
        story.replace_flow(flow);
        self.save_story(&story).await?;
        tracing::info!(story = %id, nodes = story.flow_data.len(), "Flow saved");
        Ok(())
    }
}
