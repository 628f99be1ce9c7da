//! Filesystem story store.
//!
//! Layout: `<root>/<story-id>.json`, pretty-printed. Writes go to a sibling
//! temp file first and are renamed into place, so a crash mid-write never
//! leaves a truncated story behind.

use async_trait::async_trait;
use cardpath_core::{FlowStore, StoreError, Story, StoryId};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;

#[derive(Debug, Clone)]
pub struct FsFlowStore {
    root: PathBuf,
}

impl FsFlowStore {
    /// The directory is created on first save.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn story_path(&self, id: StoryId) -> PathBuf {
        self.root.join(format!("{id}.json"))
    }
}

#[async_trait]
impl FlowStore for FsFlowStore {
    async fn load_story(&self, id: StoryId) -> Result<Story, StoreError> {
        let raw = match fs::read_to_string(self.story_path(id)).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Err(StoreError::NotFound(id)),
            Err(e) => return Err(e.into()),
        };
        Ok(serde_json::from_str(&raw)?)
    }

    async fn save_story(&self, story: &Story) -> Result<(), StoreError> {
        fs::create_dir_all(&self.root).await?;
        let json = serde_json::to_string_pretty(story)?;

        let path = self.story_path(story.id);
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, json.as_bytes()).await?;
        fs::rename(&tmp, &path).await?;

        tracing::info!(story = %story.id, name = %story.name, path = %path.display(), "Saved story");
        Ok(())
    }

    /// Newest first. Files that fail to parse are skipped with a warning.
    async fn list_stories(&self) -> Result<Vec<Story>, StoreError> {
        let mut entries = match fs::read_dir(&self.root).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut stories = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().is_none_or(|ext| ext != "json") {
                continue;
            }
            let raw = fs::read_to_string(&path).await?;
            match serde_json::from_str::<Story>(&raw) {
                Ok(story) => stories.push(story),
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "Skipping unreadable story");
                }
            }
        }

        stories.sort_by(|a, b| b.updated_at.cmp(&a.updated_at).then_with(|| a.name.cmp(&b.name)));
        Ok(stories)
    }

    async fn delete_story(&self, id: StoryId) -> Result<bool, StoreError> {
        match fs::remove_file(self.story_path(id)).await {
            Ok(()) => {
                tracing::info!(story = %id, "Deleted story");
                Ok(true)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cardpath_core::{Choice, FlowData, Node};

    fn flow() -> FlowData {
        FlowData::from_nodes(
            Some("q1".into()),
            vec![
                Node::question("q1").with_text("Pick").with_options(vec![
                    Choice::new("A", Some("q1".into())),
                    Choice::new("B", Some("e1".into())),
                ]),
                Node::end("e1").with_text("Done"),
            ],
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsFlowStore::new(dir.path().join("stories"));

        let story = Story::new("Intro").with_flow(flow());
        store.save_story(&story).await.unwrap();
        assert!(dir.path().join("stories").join(format!("{}.json", story.id)).is_file());

        let loaded = store.load_story(story.id).await.unwrap();
        assert_eq!(loaded, story);
        assert_eq!(store.load_flow(story.id).await.unwrap(), flow());
    }

    #[tokio::test]
    async fn test_save_flow_bumps_updated_at() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsFlowStore::new(dir.path());
        let story = Story::new("Intro");
        store.save_story(&story).await.unwrap();

        store.save_flow(story.id, flow()).await.unwrap();
        let loaded = store.load_story(story.id).await.unwrap();
        assert_eq!(loaded.flow_data, flow());
        assert!(loaded.updated_at >= story.updated_at);
    }

    #[tokio::test]
    async fn test_list_skips_garbage_and_delete() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsFlowStore::new(dir.path());
        assert!(store.list_stories().await.unwrap().is_empty());

        let a = Story::new("A");
        let b = Story::new("B");
        store.save_story(&a).await.unwrap();
        store.save_story(&b).await.unwrap();
        std::fs::write(dir.path().join("broken.json"), "{not json").unwrap();
        std::fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let listed = store.list_stories().await.unwrap();
        assert_eq!(listed.len(), 2);

        assert!(store.delete_story(a.id).await.unwrap());
        assert!(!store.delete_story(a.id).await.unwrap());
        assert!(matches!(
            store.load_story(a.id).await,
            Err(StoreError::NotFound(id)) if id == a.id
        ));
    }

    #[tokio::test]
    async fn test_missing_root_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsFlowStore::new(dir.path().join("nope"));
        assert!(store.list_stories().await.unwrap().is_empty());
        assert!(!store.delete_story(StoryId::new()).await.unwrap());
    }
}
