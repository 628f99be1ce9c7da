use ahash::AHashMap;
use async_trait::async_trait;
use cardpath_core::{FlowStore, StoreError, Story, StoryId};
use parking_lot::RwLock;

/// In-memory story store.
#[derive(Debug, Default)]
pub struct MemoryFlowStore {
    stories: RwLock<AHashMap<StoryId, Story>>,
}

impl MemoryFlowStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.stories.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.stories.read().is_empty()
    }
}

#[async_trait]
impl FlowStore for MemoryFlowStore {
    async fn load_story(&self, id: StoryId) -> Result<Story, StoreError> {
        self.stories
            .read()
            .get(&id)
            .cloned()
            .ok_or(StoreError::NotFound(id))
    }

    async fn save_story(&self, story: &Story) -> Result<(), StoreError> {
        self.stories.write().insert(story.id, story.clone());
        tracing::debug!(story = %story.id, "Stored story in memory");
        Ok(())
    }

    /// Newest first.
    async fn list_stories(&self) -> Result<Vec<Story>, StoreError> {
        let mut stories: Vec<Story> = self.stories.read().values().cloned().collect();
        stories.sort_by(|a, b| b.updated_at.cmp(&a.updated_at).then_with(|| a.name.cmp(&b.name)));
        Ok(stories)
    }

    async fn delete_story(&self, id: StoryId) -> Result<bool, StoreError> {
        Ok(self.stories.write().remove(&id).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cardpath_core::{FlowData, Node};

    #[tokio::test]
    async fn test_round_trip_and_last_write_wins() {
        let store = MemoryFlowStore::new();
        let mut story = Story::new("Draft");
        store.save_story(&story).await.unwrap();

        story.name = "Final".to_string();
        store.save_story(&story).await.unwrap();
        assert_eq!(store.len(), 1);
        assert_eq!(store.load_story(story.id).await.unwrap().name, "Final");

        let flow = FlowData::from_nodes(Some("e1".into()), vec![Node::end("e1").with_text("Fin")])
            .unwrap();
        store.save_flow(story.id, flow.clone()).await.unwrap();
        assert_eq!(store.load_flow(story.id).await.unwrap(), flow);
    }

    #[tokio::test]
    async fn test_delete_and_missing() {
        let store = MemoryFlowStore::new();
        let story = Story::new("Gone");
        store.save_story(&story).await.unwrap();
        assert!(store.delete_story(story.id).await.unwrap());
        assert!(store.is_empty());
        assert!(matches!(
            store.load_flow(story.id).await,
            Err(StoreError::NotFound(_))
        ));
        assert!(store.list_stories().await.unwrap().is_empty());
    }
}
