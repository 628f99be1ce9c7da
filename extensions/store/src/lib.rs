//! # cardpath Story Stores
//!
//! Adapters for the [`FlowStore`](cardpath_core::FlowStore) port:
//!
//! - [`FsFlowStore`]: one pretty-printed JSON file per story
//! - [`MemoryFlowStore`]: a map behind a lock, for tests and embedding
//!
//! Both are last-write-wins; neither retries.

pub mod fs;
pub mod memory;

pub use fs::FsFlowStore;
pub use memory::MemoryFlowStore;

// Prelude module
pub mod prelude {
    pub use crate::fs::FsFlowStore;
    pub use crate::memory::MemoryFlowStore;
    pub use cardpath_core::{FlowStore, StoreError, Story, StoryId};
}
