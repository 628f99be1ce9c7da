use crate::graph::{GraphProjection, LineStyle};
use std::fmt::Write;

/// Render a graph projection as a Graphviz `digraph`.
pub fn to_dot(projection: &GraphProjection) -> String {
    let mut out = String::new();
    out.push_str("digraph flow {\n");
    out.push_str("  rankdir=TB;\n");
    out.push_str("  node [shape=box, style=\"rounded,filled\", fontcolor=white];\n");

    for node in &projection.nodes {
        let label = if node.label.is_empty() {
            node.id.to_string()
        } else {
            format!("{}\n{}", node.id, node.label)
        };
        let _ = writeln!(
            out,
            "  \"{}\" [label=\"{}\", fillcolor=\"{}\"{}];",
            escape(node.id.as_str()),
            escape(&label),
            node.style.color,
            if node.is_start { ", penwidth=3" } else { "" },
        );
    }

    for edge in &projection.edges {
        let style = match edge.style.line {
            LineStyle::Solid => "solid",
            LineStyle::Dashed => "dashed",
        };
        let _ = write!(
            out,
            "  \"{}\" -> \"{}\" [color={}, style={}",
            escape(edge.source.as_str()),
            escape(edge.target.as_str()),
            edge.style.color,
            style,
        );
        if let Some(label) = &edge.label {
            let _ = write!(out, ", label=\"{}\"", escape(label));
        }
        out.push_str("];\n");
    }

    out.push_str("}\n");
    out
}

fn escape(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '"' => escaped.push_str("\\\""),
            '\\' => escaped.push_str("\\\\"),
            '\n' => escaped.push_str("\\n"),
            _ => escaped.push(c),
        }
    }
    escaped
}
