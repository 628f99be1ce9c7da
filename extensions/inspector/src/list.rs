//! List projection: every node in flow order, tagged by its relation to the
//! node currently selected in the editor.

use crate::text_preview;
use cardpath_core::{FlowData, NodeId, NodeKind};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Relation {
    /// The selected node itself
    Selected,
    /// The selected node moves forward to this one
    Next,
    /// The selected callout returns to this one
    Return,
    /// This node points at the selected one
    PointsTo,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListRow {
    pub id: NodeId,
    #[serde(rename = "type")]
    pub kind: NodeKind,
    pub preview: String,
    pub targets: Vec<NodeId>,
    pub is_start: bool,
    pub relation: Option<Relation>,
}

pub fn project_list(flow: &FlowData, selected: Option<&str>) -> Vec<ListRow> {
    let selected = selected.and_then(|id| flow.get(id));

    flow.nodes()
        .map(|node| {
            let relation = selected.and_then(|sel| {
                if sel.id == node.id {
                    Some(Relation::Selected)
                } else if sel.outgoing_targets().contains(&&node.id) {
                    Some(match sel.kind() {
                        NodeKind::Callout => Relation::Return,
                        _ => Relation::Next,
                    })
                } else if node.outgoing_targets().contains(&&sel.id) {
                    Some(Relation::PointsTo)
                } else {
                    None
                }
            });
            ListRow {
                id: node.id.clone(),
                kind: node.kind(),
                preview: text_preview(&node.text),
                targets: node.outgoing_targets().into_iter().cloned().collect(),
                is_start: flow.start() == Some(&node.id),
                relation,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use cardpath_core::{Choice, Node};

    fn flow() -> FlowData {
        FlowData::from_nodes(
            Some("q1".into()),
            vec![
                Node::question("q1").with_text("Pick").with_options(vec![
                    Choice::new("Wrong", Some("c1".into())),
                    Choice::new("Right", Some("e1".into())),
                ]),
                Node::callout("c1").with_text("Hm").with_target("q1"),
                Node::end("e1").with_text("Bye"),
                Node::end("e2").with_text("Unused"),
            ],
        )
        .unwrap()
    }

    fn relations(rows: &[ListRow]) -> Vec<Option<Relation>> {
        rows.iter().map(|r| r.relation).collect()
    }

    #[test]
    fn test_no_selection() {
        let rows = project_list(&flow(), None);
        assert_eq!(rows.len(), 4);
        assert!(rows.iter().all(|r| r.relation.is_none()));
        assert!(rows[0].is_start);
        assert_eq!(rows[0].targets, vec![NodeId::from("c1"), NodeId::from("e1")]);
        assert_eq!(project_list(&flow(), Some("ghost")), rows);
    }

    #[test]
    fn test_question_selected() {
        let rows = project_list(&flow(), Some("q1"));
        assert_eq!(
            relations(&rows),
            vec![Some(Relation::Selected), Some(Relation::Next), Some(Relation::Next), None]
        );
    }

    #[test]
    fn test_callout_selected() {
        let rows = project_list(&flow(), Some("c1"));
        assert_eq!(
            relations(&rows),
            vec![Some(Relation::Return), Some(Relation::Selected), None, None]
        );

        let rows = project_list(&flow(), Some("e1"));
        assert_eq!(
            relations(&rows),
            vec![Some(Relation::PointsTo), None, Some(Relation::Selected), None]
        );
    }
}
