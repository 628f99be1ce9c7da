use cardpath::prelude::*;

fn author() -> FlowData {
    let mut editor = FlowEditor::new(FlowData::empty());
    editor.create_node(NodeKind::Question, "intro".into()).unwrap();
    editor.set_start(Some("intro")).unwrap();
    editor.update_node_text("intro", "Is the earth flat?").unwrap();
    editor
        .create_and_connect("intro", NodeKind::Callout, "rethink".into(), "options[0].nextNodeId")
        .unwrap();
    editor
        .create_and_connect("intro", NodeKind::Infocard, "facts".into(), "options[1].nextNodeId")
        .unwrap();
    editor
        .create_and_connect("facts", NodeKind::End, "done".into(), "nextNodeId")
        .unwrap();
    editor.connect("rethink", "intro", None, None).unwrap();
    editor.connect("intro", "intro", None, Some("Shake".to_string())).unwrap();
    for (id, text) in [("rethink", "Look again."), ("facts", "It is round."), ("done", "Well done")] {
        editor.update_node_text(id, text).unwrap();
    }
    editor.check_save().unwrap().clone()
}

#[tokio::test]
async fn authored_flow_survives_storage_and_plays_to_the_end() {
    let dir = tempfile::tempdir().unwrap();
    let store = FsFlowStore::new(dir.path());
    let story = Story::new("Shapes");
    store.save_story(&story).await.unwrap();
    store.save_flow(story.id, author()).await.unwrap();

    let flow = store.load_flow(story.id).await.unwrap();
    assert!(validate(&flow).valid);

    let mut player = Player::start(&flow).unwrap();
    player.choose(0).unwrap(); // wrong answer
    player.choose(0).unwrap(); // callout back
    player.choose(2).unwrap(); // shake
    player.choose(1).unwrap(); // right answer
    player.choose(0).unwrap(); // continue
    assert!(player.is_terminal());
    assert_eq!(
        player.history(),
        &[NodeId::from("intro"), NodeId::from("intro"), NodeId::from("facts")]
    );
    assert_eq!(
        player.progress(),
        Progress {
            current_step: 1,
            total_steps: 1
        }
    );

    let played = player.state().clone();
    let mut replay = ReplayEngine::new(&flow, player.into_timeline());
    assert_eq!(replay.run_to_end().unwrap(), Some(played));
}

#[test]
fn editor_views_agree_with_the_flow() {
    let flow = author();

    let graph = graph_projection(&flow);
    assert_eq!(graph.nodes.len(), 4);
    assert_eq!(graph.edges.len(), 5);
    assert_eq!(graph.dangling_edges, 0);
    assert!(to_dot(&graph).starts_with("digraph flow {"));

    let rows = project_list(&flow, Some("facts"));
    let relations: Vec<_> = rows.iter().map(|r| r.relation).collect();
    assert_eq!(
        relations,
        vec![
            Some(Relation::PointsTo),
            None,
            Some(Relation::Selected),
            Some(Relation::Next)
        ]
    );
}

#[tokio::test]
async fn memory_store_lists_newest_first() {
    let store = MemoryFlowStore::new();
    let older = Story::new("Older");
    store.save_story(&older).await.unwrap();
    let newer = Story::new("Newer");
    store.save_story(&newer).await.unwrap();
    store.save_flow(newer.id, author()).await.unwrap();

    let listed = store.list_stories().await.unwrap();
    assert_eq!(listed[0].id, newer.id);
    assert_eq!(listed[1].id, older.id);
}
