//! Node - the atomic unit of narrative content.
//!
//! A node is a closed sum over four variants. Every consumer (validator,
//! layout, editor, player, projections) matches on [`NodeBody`] exhaustively,
//! so adding a variant is a compile error everywhere it matters.

use crate::id::NodeId;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The `type` discriminant of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    /// Presents text and an ordered list of choices
    Question,
    /// Terminal, no outgoing edges
    End,
    /// Interstitial that loops back to another node
    Callout,
    /// Interstitial that advances forward to another node
    Infocard,
}

impl NodeKind {
    pub const ALL: [NodeKind; 4] = [
        NodeKind::Question,
        NodeKind::End,
        NodeKind::Callout,
        NodeKind::Infocard,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            NodeKind::Question => "question",
            NodeKind::End => "end",
            NodeKind::Callout => "callout",
            NodeKind::Infocard => "infocard",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NodeKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "question" => Ok(NodeKind::Question),
            "end" => Ok(NodeKind::End),
            "callout" => Ok(NodeKind::Callout),
            "infocard" => Ok(NodeKind::Infocard),
            other => Err(other.to_string()),
        }
    }
}

/// A labelled choice on a question node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Choice {
    pub label: String,
    /// `None` means "no destination yet". May point at the owning question
    /// itself (a challenge option).
    pub next: Option<NodeId>,
}

impl Choice {
    pub fn new(label: impl Into<String>, next: Option<NodeId>) -> Self {
        Self {
            label: label.into(),
            next: NodeId::target(next),
        }
    }

    /// A choice with a label and no destination.
    pub fn placeholder(label: impl Into<String>) -> Self {
        Self::new(label, None)
    }
}

/// Variant-specific payload of a node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeBody {
    Question {
        options: Vec<Choice>,
    },
    End,
    Callout {
        return_to: Option<NodeId>,
        button_label: Option<String>,
    },
    Infocard {
        next: Option<NodeId>,
        button_label: Option<String>,
    },
}

/// Placeholder values used when a node is created or its type is changed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeDefaults {
    /// Labels of the placeholder options of a fresh question. A question
    /// always starts with exactly two options; missing labels are numbered.
    pub question_option_labels: Vec<String>,
    pub callout_button_label: String,
    pub infocard_button_label: String,
}

impl Default for NodeDefaults {
    fn default() -> Self {
        Self {
            question_option_labels: vec!["Option 1".to_string(), "Option 2".to_string()],
            callout_button_label: "Go back".to_string(),
            infocard_button_label: "Continue".to_string(),
        }
    }
}

impl NodeDefaults {
    /// Placeholder label for the option at `index`.
    pub fn option_label(&self, index: usize) -> String {
        self.question_option_labels
            .get(index)
            .cloned()
            .unwrap_or_else(|| format!("Option {}", index + 1))
    }

    /// Default body for a node of `kind`.
    pub fn body(&self, kind: NodeKind) -> NodeBody {
        match kind {
            NodeKind::Question => NodeBody::Question {
                options: (0..2).map(|i| Choice::placeholder(self.option_label(i))).collect(),
            },
            NodeKind::End => NodeBody::End,
            NodeKind::Callout => NodeBody::Callout {
                return_to: None,
                button_label: Some(self.callout_button_label.clone()),
            },
            NodeKind::Infocard => NodeBody::Infocard {
                next: None,
                button_label: Some(self.infocard_button_label.clone()),
            },
        }
    }
}

/// Addresses one outgoing reference of a node.
///
/// Textual form matches the persisted field names: `options[N].nextNodeId`,
/// `returnToNodeId`, `nextNodeId`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TargetSlot {
    /// `nextNodeId` of the option at this index
    Option(usize),
    /// A callout's `returnToNodeId`
    ReturnTo,
    /// An infocard's `nextNodeId`
    Next,
}

impl fmt::Display for TargetSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TargetSlot::Option(i) => write!(f, "options[{i}].nextNodeId"),
            TargetSlot::ReturnTo => f.write_str("returnToNodeId"),
            TargetSlot::Next => f.write_str("nextNodeId"),
        }
    }
}

impl FromStr for TargetSlot {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "returnToNodeId" => return Ok(TargetSlot::ReturnTo),
            "nextNodeId" => return Ok(TargetSlot::Next),
            _ => {}
        }
        s.trim()
            .strip_prefix("options[")
            .and_then(|rest| rest.strip_suffix("].nextNodeId"))
            .and_then(|index| index.parse::<usize>().ok())
            .map(TargetSlot::Option)
            .ok_or_else(|| s.to_string())
    }
}

/// One unit of narrative content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub id: NodeId,
    pub text: String,
    pub body: NodeBody,
}

impl Node {
    /// A default-shaped node of `kind` with empty text.
    pub fn new(kind: NodeKind, id: NodeId) -> Self {
        Self::with_defaults(kind, id, &NodeDefaults::default())
    }

    pub fn with_defaults(kind: NodeKind, id: NodeId, defaults: &NodeDefaults) -> Self {
        Self {
            id,
            text: String::new(),
            body: defaults.body(kind),
        }
    }

    /// A question with two placeholder options.
    pub fn question(id: impl Into<NodeId>) -> Self {
        Self::new(NodeKind::Question, id.into())
    }

    pub fn end(id: impl Into<NodeId>) -> Self {
        Self::new(NodeKind::End, id.into())
    }

    /// A callout with no return target and the default button label.
    pub fn callout(id: impl Into<NodeId>) -> Self {
        Self::new(NodeKind::Callout, id.into())
    }

    /// An infocard with no next target and the default button label.
    pub fn infocard(id: impl Into<NodeId>) -> Self {
        Self::new(NodeKind::Infocard, id.into())
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    /// Replace the options of a question. Has no effect on other variants.
    pub fn with_options(mut self, choices: Vec<Choice>) -> Self {
        if let NodeBody::Question { options } = &mut self.body {
            *options = choices;
        }
        self
    }

    /// Set the single exit of a callout or infocard. Has no effect on other
    /// variants. A blank target leaves the exit unset.
    pub fn with_target(mut self, target: impl Into<NodeId>) -> Self {
        let target = NodeId::target(Some(target.into()));
        match &mut self.body {
            NodeBody::Callout { return_to, .. } => *return_to = target,
            NodeBody::Infocard { next, .. } => *next = target,
            NodeBody::Question { .. } | NodeBody::End => {}
        }
        self
    }

    pub fn kind(&self) -> NodeKind {
        match self.body {
            NodeBody::Question { .. } => NodeKind::Question,
            NodeBody::End => NodeKind::End,
            NodeBody::Callout { .. } => NodeKind::Callout,
            NodeBody::Infocard { .. } => NodeKind::Infocard,
        }
    }

    pub fn options(&self) -> &[Choice] {
        match &self.body {
            NodeBody::Question { options } => options,
            _ => &[],
        }
    }

    pub fn button_label(&self) -> Option<&str> {
        match &self.body {
            NodeBody::Callout { button_label, .. } | NodeBody::Infocard { button_label, .. } => {
                button_label.as_deref()
            }
            NodeBody::Question { .. } | NodeBody::End => None,
        }
    }

    /// Every slot of this node together with its current target, including
    /// empty slots. Order: options in order, then the single exit.
    pub fn slots(&self) -> Vec<(TargetSlot, Option<&NodeId>)> {
        match &self.body {
            NodeBody::Question { options } => options
                .iter()
                .enumerate()
                .map(|(i, c)| (TargetSlot::Option(i), c.next.as_ref()))
                .collect(),
            NodeBody::End => Vec::new(),
            NodeBody::Callout { return_to, .. } => vec![(TargetSlot::ReturnTo, return_to.as_ref())],
            NodeBody::Infocard { next, .. } => vec![(TargetSlot::Next, next.as_ref())],
        }
    }

    /// Every node id this node references, in stable order.
    pub fn outgoing_targets(&self) -> Vec<&NodeId> {
        self.slots().into_iter().filter_map(|(_, t)| t).collect()
    }

    /// Current target of `slot` (`Some(None)` if the slot is empty), or
    /// `None` if the slot does not exist on this node.
    pub fn target(&self, slot: TargetSlot) -> Option<Option<&NodeId>> {
        match (&self.body, slot) {
            (NodeBody::Question { options }, TargetSlot::Option(i)) => {
                options.get(i).map(|c| c.next.as_ref())
            }
            (NodeBody::Callout { return_to, .. }, TargetSlot::ReturnTo) => Some(return_to.as_ref()),
            (NodeBody::Infocard { next, .. }, TargetSlot::Next) => Some(next.as_ref()),
            _ => None,
        }
    }

    /// Mutable access to the target stored in `slot`, if the slot exists.
    pub fn target_mut(&mut self, slot: TargetSlot) -> Option<&mut Option<NodeId>> {
        match (&mut self.body, slot) {
            (NodeBody::Question { options }, TargetSlot::Option(i)) => {
                options.get_mut(i).map(|c| &mut c.next)
            }
            (NodeBody::Callout { return_to, .. }, TargetSlot::ReturnTo) => Some(return_to),
            (NodeBody::Infocard { next, .. }, TargetSlot::Next) => Some(next),
            _ => None,
        }
    }

    /// Clear every reference to `id` back to "no destination".
    /// Returns how many references were cleared.
    pub fn clear_references_to(&mut self, id: &NodeId) -> usize {
        let mut cleared = 0;
        let mut clear = |target: &mut Option<NodeId>| {
            if target.as_ref() == Some(id) {
                *target = None;
                cleared += 1;
            }
        };
        match &mut self.body {
            NodeBody::Question { options } => options.iter_mut().for_each(|c| clear(&mut c.next)),
            NodeBody::End => {}
            NodeBody::Callout { return_to, .. } => clear(return_to),
            NodeBody::Infocard { next, .. } => clear(next),
        }
        cleared
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_shapes() {
        let q = Node::question("q1");
        assert_eq!(q.kind(), NodeKind::Question);
        assert_eq!(q.options().len(), 2);
        assert!(q.options().iter().all(|c| c.next.is_none()));
        assert_eq!(q.options()[1].label, "Option 2");

        let c = Node::callout("c1");
        assert_eq!(c.button_label(), Some("Go back"));
        assert_eq!(c.target(TargetSlot::ReturnTo), Some(None));

        let i = Node::infocard("i1");
        assert_eq!(i.button_label(), Some("Continue"));
        assert!(Node::end("e1").slots().is_empty());
    }

    #[test]
    fn test_outgoing_targets_order() {
        let q = Node::question("q1").with_options(vec![
            Choice::new("A", Some("q1".into())),
            Choice::placeholder("B"),
            Choice::new("C", Some("e1".into())),
        ]);
        let targets: Vec<&str> = q.outgoing_targets().iter().map(|t| t.as_str()).collect();
        assert_eq!(targets, vec!["q1", "e1"]);

        let c = Node::callout("c1").with_target("q1");
        assert_eq!(c.outgoing_targets(), vec![&NodeId::from("q1")]);
        assert!(Node::end("e1").outgoing_targets().is_empty());
    }

    #[test]
    fn test_target_slot_parsing() {
        assert_eq!("options[0].nextNodeId".parse(), Ok(TargetSlot::Option(0)));
        assert_eq!("options[12].nextNodeId".parse(), Ok(TargetSlot::Option(12)));
        assert_eq!("returnToNodeId".parse(), Ok(TargetSlot::ReturnTo));
        assert_eq!("nextNodeId".parse(), Ok(TargetSlot::Next));
        assert!("options[x].nextNodeId".parse::<TargetSlot>().is_err());
        assert!("label".parse::<TargetSlot>().is_err());
        assert_eq!(TargetSlot::Option(3).to_string(), "options[3].nextNodeId");
    }

    #[test]
    fn test_slot_must_fit_variant() {
        let q = Node::question("q1");
        assert!(q.target(TargetSlot::ReturnTo).is_none());
        assert!(q.target(TargetSlot::Option(5)).is_none());
        let mut e = Node::end("e1");
        assert!(e.target_mut(TargetSlot::Next).is_none());
    }

    #[test]
    fn test_clear_references() {
        let mut q = Node::question("q1").with_options(vec![
            Choice::new("A", Some("x".into())),
            Choice::new("B", Some("x".into())),
            Choice::new("C", Some("y".into())),
        ]);
        assert_eq!(q.clear_references_to(&"x".into()), 2);
        assert_eq!(q.outgoing_targets(), vec![&NodeId::from("y")]);
    }

    #[test]
    fn test_blank_target_is_unset() {
        let c = Node::callout("c1").with_target("");
        assert_eq!(c.target(TargetSlot::ReturnTo), Some(None));
        let i = Node::infocard("i1").with_target(" ");
        assert_eq!(i.target(TargetSlot::Next), Some(None));
        assert_eq!(Choice::new("A", Some("".into())).next, None);
    }
}
