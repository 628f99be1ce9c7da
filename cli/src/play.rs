//! `cardpath play`: an interactive session on a line-oriented terminal.
//!
//! Numbers pick an action, `r` restarts, `q` (or end of input) quits. A broken
//! story ends the session with a message instead of entering the bad node.

use anyhow::{Context, Result};
use cardpath_core::FlowData;
use cardpath_flow::{PlayError, Player, SessionStatus, Timeline};
use std::io::{BufRead, Write};

/// How a session ended.
#[derive(Debug)]
pub struct PlayOutcome {
    pub status: SessionStatus,
    pub timeline: Timeline,
}

pub fn play_session<R: BufRead, W: Write>(
    flow: &FlowData,
    mut input: R,
    out: &mut W,
) -> Result<PlayOutcome> {
    let mut player = Player::start(flow).context("Story cannot be played")?;
    let mut line = String::new();

    loop {
        render(&player, out)?;

        line.clear();
        if input.read_line(&mut line).context("Failed to read input")? == 0 {
            break;
        }
        match line.trim() {
            "q" | "quit" => break,
            "r" | "restart" => {
                player.restart();
            }
            choice => {
                let Ok(number) = choice.parse::<usize>() else {
                    writeln!(out, "? enter a number, r or q")?;
                    continue;
                };
                match player.choose(number.wrapping_sub(1)) {
                    Ok(_) => {}
                    Err(PlayError::ActionOutOfRange { len, .. }) => {
                        writeln!(out, "? pick 1 to {len}")?;
                    }
                    Err(PlayError::Terminal(_)) => {
                        writeln!(out, "? the story is over, r to restart")?;
                    }
                    Err(e) if e.is_broken_story() => {
                        writeln!(out, "!! This story is broken: {e}")?;
                        break;
                    }
                    Err(e) => return Err(e.into()),
                }
            }
        }
    }

    out.flush()?;
    Ok(PlayOutcome {
        status: player.status().clone(),
        timeline: player.into_timeline(),
    })
}

fn render<W: Write>(player: &Player<'_>, out: &mut W) -> Result<()> {
    let progress = player.progress();
    writeln!(out)?;
    writeln!(
        out,
        "[{}/{}] {}",
        progress.current_step,
        progress.total_steps,
        player.current_node_id()
    )?;
    if let Some(node) = player.current_node() {
        writeln!(out, "{}", node.text)?;
    }

    if player.is_terminal() {
        writeln!(out, "-- The end. r) restart  q) quit")?;
        return Ok(());
    }
    for (i, action) in player.actions().iter().enumerate() {
        writeln!(out, "  {}) {}", i + 1, action.label)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use cardpath_core::{Choice, Node};
    use std::io::Cursor;

    fn quiz() -> FlowData {
        FlowData::from_nodes(
            Some("q1".into()),
            vec![
                Node::question("q1").with_text("Pick").with_options(vec![
                    Choice::new("Again", Some("q1".into())),
                    Choice::new("Onward", Some("e1".into())),
                    Choice::new("Lost", Some("ghost".into())),
                ]),
                Node::end("e1").with_text("Done"),
            ],
        )
        .unwrap()
    }

    fn run(flow: &FlowData, keys: &str) -> (PlayOutcome, String) {
        let mut out = Vec::new();
        let outcome = play_session(flow, Cursor::new(keys.to_string()), &mut out).unwrap();
        (outcome, String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_reaches_the_end() {
        let (outcome, out) = run(&quiz(), "1\n9\nx\n2\nq\n");
        assert!(outcome.status.is_terminal());
        assert_eq!(outcome.timeline.progression_count(), 1);
        assert!(out.contains("[1/1] q1\nPick\n  1) Again\n  2) Onward\n  3) Lost\n"));
        assert!(out.contains("? pick 1 to 3"));
        assert!(out.contains("? enter a number, r or q"));
        assert!(out.contains("-- The end."));
    }

    #[test]
    fn test_broken_story_stops_the_session() {
        let (outcome, out) = run(&quiz(), "3\n");
        assert!(outcome.status.is_broken());
        assert!(out.contains("!! This story is broken"));
    }

    #[test]
    fn test_restart_and_eof() {
        let (outcome, _) = run(&quiz(), "2\nr\n");
        assert!(outcome.status.is_active());
        assert_eq!(outcome.timeline.len(), 3);
    }

    #[test]
    fn test_unplayable_flow() {
        let flow = FlowData::from_nodes(None, vec![Node::end("e1")]).unwrap();
        assert!(play_session(&flow, Cursor::new(String::new()), &mut Vec::new()).is_err());
    }
}
