//! # cardpath
//!
//! One dependency for the whole stack: the flow model and editor
//! (`cardpath-core`), the player (`cardpath-flow`), editor projections
//! (`cardpath-inspector`) and story storage (`cardpath-store`).

// Re-export the member crates
pub use cardpath_core as model;
pub use cardpath_flow as play;
pub use cardpath_inspector as inspector;
pub use cardpath_store as store;

pub use cardpath_core::{FlowData, FlowEditor, Node, NodeId, Story, validate};
pub use cardpath_flow::Player;

pub mod prelude {
    pub use cardpath_core::{
        CardpathConfig, Choice, EditError, ErrorCategory, ErrorKind, FlowData, FlowEditor,
        FlowError, FlowStore, Layout, LayoutConfig, Node, NodeId, NodeKind, OptionEdit, Story,
        StoryId, TargetSlot, ValidationResult, layout, validate,
    };
    pub use cardpath_flow::{
        Action, MoveKind, PlayError, PlayEvent, Player, PlayerState, Progress, ReplayEngine,
        SessionStatus, Timeline,
    };
    pub use cardpath_inspector::{
        GraphProjection, ListRow, Relation, graph_projection, project_list, to_dot,
    };
    pub use cardpath_store::{FsFlowStore, MemoryFlowStore};
}
