//! Read-only projections of a flow for editors.
//!
//! - [`graph`]: positioned nodes and styled edges for a canvas editor
//! - [`list`]: flat rows tagged relative to a selected node
//! - [`dot`]: Graphviz export of the graph projection
//!
//! Projections are recomputed from a flow snapshot on demand and never stored.

pub mod dot;
pub mod graph;
pub mod list;

pub use dot::to_dot;
pub use graph::{
    EdgeStyle, GraphEdge, GraphNode, GraphProjection, LineStyle, NodeStyle, edge_style,
    graph_projection, node_style, project_graph,
};
pub use list::{ListRow, Relation, project_list};

const PREVIEW_CHARS: usize = 40;

/// First line of `text`, cut to a fixed number of characters.
pub fn text_preview(text: &str) -> String {
    let line = text.lines().next().unwrap_or_default().trim();
    if line.chars().count() <= PREVIEW_CHARS {
        return line.to_string();
    }
    let mut cut: String = line.chars().take(PREVIEW_CHARS).collect();
    cut.push_str("...");
    cut
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_preview() {
        assert_eq!(text_preview("  Pick one\nmore detail"), "Pick one");
        assert_eq!(text_preview(""), "");
        let long = "ä".repeat(50);
        let preview = text_preview(&long);
        assert_eq!(preview.chars().count(), 43);
        assert!(preview.ends_with("..."));
    }
}
