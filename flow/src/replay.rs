use crate::error::PlayError;
use crate::state::PlayerState;
use crate::timeline::{PlayEvent, Timeline};
use cardpath_core::FlowData;

/// ReplayEngine reconstructs player states from a recorded Timeline.
///
/// Each recorded move is checked against the flow it is replayed on, so a
/// timeline recorded against an older version of the flow stops at the first
/// step that no longer fits.
pub struct ReplayEngine<'f> {
    flow: &'f FlowData,
    timeline: Timeline,
    cursor: usize,
    state: Option<PlayerState>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplayFrame {
    pub event: PlayEvent,
    /// State after the event. `None` before the first `Started` event.
    pub state: Option<PlayerState>,
}

impl<'f> ReplayEngine<'f> {
    pub fn new(flow: &'f FlowData, timeline: Timeline) -> Self {
        Self {
            flow,
            timeline,
            cursor: 0,
            state: None,
        }
    }

    pub fn state(&self) -> Option<&PlayerState> {
        self.state.as_ref()
    }

    pub fn is_finished(&self) -> bool {
        self.cursor >= self.timeline.events.len()
    }

    /// Advance the replay by one event.
    /// Returns `None` once every event has been replayed.
    pub fn next_step(&mut self) -> Option<Result<ReplayFrame, PlayError>> {
        let event = self.timeline.events.get(self.cursor)?.clone();
        if let Err(e) = self.apply(&event) {
            return Some(Err(e));
        }
        self.cursor += 1;
        Some(Ok(ReplayFrame {
            event,
            state: self.state.clone(),
        }))
    }

    /// Replay every remaining event and return the final state.
    pub fn run_to_end(&mut self) -> Result<Option<PlayerState>, PlayError> {
        while let Some(step) = self.next_step() {
            step?;
        }
        Ok(self.state.clone())
    }

    /// Reset replay to start
    pub fn reset(&mut self) {
        self.cursor = 0;
        self.state = None;
    }

    fn apply(&mut self, event: &PlayEvent) -> Result<(), PlayError> {
        match event {
            PlayEvent::Started { node_id, .. } | PlayEvent::Restarted { node_id, .. } => {
                if !self.flow.contains(node_id.as_str()) {
                    return Err(PlayError::StartNotFound(node_id.clone()));
                }
                self.state = Some(PlayerState::new(node_id.clone()));
            }
            PlayEvent::Moved { from, to, kind, .. } => {
                let state = self.state.as_mut().ok_or(PlayError::NoStart)?;
                if state.current_node_id != *from {
                    return Err(PlayError::Diverged {
                        recorded: from.clone(),
                        current: state.current_node_id.clone(),
                    });
                }
                if !self.flow.contains(to.as_str()) {
                    return Err(PlayError::DanglingTarget {
                        from: from.clone(),
                        target: to.clone(),
                    });
                }
                state.advance(to.clone(), *kind);
            }
            // A refused move changed nothing when it was recorded.
            PlayEvent::Broken { .. } => {}
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::player::Player;
    use cardpath_core::{Choice, Node, NodeId};

    fn flow() -> FlowData {
        FlowData::from_nodes(
            Some("q1".into()),
            vec![
                Node::question("q1").with_text("Pick").with_options(vec![
                    Choice::new("A", Some("q1".into())),
                    Choice::new("B", Some("i1".into())),
                ]),
                Node::infocard("i1").with_text("Info").with_target("e1"),
                Node::end("e1").with_text("Done"),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_replay_reconstructs_session() {
        let flow = flow();
        let mut player = Player::start(&flow).unwrap();
        player.choose(0).unwrap();
        player.choose(1).unwrap();
        let _ = player.answer("ghost", false);
        player.choose(0).unwrap();
        let expected = player.state().clone();
        let timeline = player.into_timeline();

        let mut replay = ReplayEngine::new(&flow, timeline.clone());
        let frames: Vec<ReplayFrame> = std::iter::from_fn(|| replay.next_step())
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(frames.len(), timeline.len());
        assert_eq!(frames[1].state.as_ref().unwrap().history, Vec::<NodeId>::new());
        assert_eq!(frames.last().unwrap().state.as_ref(), Some(&expected));
        assert!(replay.is_finished());

        replay.reset();
        assert_eq!(replay.run_to_end().unwrap(), Some(expected));
    }

    #[test]
    fn test_replay_against_changed_flow() {
        let flow = flow();
        let mut player = Player::start(&flow).unwrap();
        player.choose(1).unwrap();
        let timeline = player.into_timeline();

        let edited = FlowData::from_nodes(
            Some("q1".into()),
            vec![Node::question("q1").with_text("Pick")],
        )
        .unwrap();
        let mut replay = ReplayEngine::new(&edited, timeline);
        assert!(replay.next_step().unwrap().is_ok());
        assert_eq!(
            replay.next_step().unwrap().unwrap_err(),
            PlayError::DanglingTarget {
                from: "q1".into(),
                target: "i1".into()
            }
        );
        assert!(!replay.is_finished());
    }

    #[test]
    fn test_moves_must_follow_on() {
        let flow = flow();
        let mut timeline = Timeline::new();
        timeline.push(PlayEvent::Started {
            node_id: "q1".into(),
            timestamp: 1,
        });
        timeline.push(PlayEvent::Moved {
            from: "i1".into(),
            to: "e1".into(),
            kind: crate::MoveKind::Progression,
            timestamp: 2,
        });
        let err = ReplayEngine::new(&flow, timeline).run_to_end().unwrap_err();
        assert!(matches!(err, PlayError::Diverged { .. }));
    }
}
