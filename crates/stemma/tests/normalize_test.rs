use stemma::{EdgeLabel, LayoutGraph, NodeKind, NodeLabel, normalize};

fn ranked_graph(nodes: &[(&str, i32)], edges: &[(&str, &str, &str)]) -> LayoutGraph {
    let mut g = LayoutGraph::new();
    for (n, rank) in nodes {
        g.add_node(
            *n,
            NodeLabel {
                rank: Some(*rank),
                ..Default::default()
            },
        )
        .unwrap();
    }
    for (id, s, t) in edges {
        g.add_edge(Some(id), s, t, EdgeLabel::default()).unwrap();
    }
    g
}

fn dummies(g: &LayoutGraph) -> Vec<String> {
    g.node_ids()
        .into_iter()
        .filter(|id| g.node(id).unwrap().is_dummy())
        .collect()
}

#[test]
fn normalize_leaves_unit_length_edges_alone() {
    let mut g = ranked_graph(&[("a", 0), ("b", 1)], &[("ab", "a", "b")]);
    normalize::run(&mut g).unwrap();
    assert!(dummies(&g).is_empty());
    assert!(g.edge("ab").is_some());
}

#[test]
fn normalize_splits_multi_rank_edges_into_unit_chains() {
    let mut g = ranked_graph(&[("a", 0), ("b", 3)], &[("ab", "a", "b")]);
    normalize::run(&mut g).unwrap();

    assert!(g.edge("ab").is_none());
    assert_eq!(dummies(&g).len(), 2);
    for e in g.edge_ids() {
        let s = g.node(g.source(&e).unwrap()).unwrap().rank.unwrap();
        let t = g.node(g.target(&e).unwrap()).unwrap().rank.unwrap();
        assert_eq!(t - s, 1);
    }
}

#[test]
fn normalize_marks_first_and_last_dummies_as_bends() {
    let mut g = ranked_graph(&[("a", 0), ("b", 4)], &[("ab", "a", "b")]);
    normalize::run(&mut g).unwrap();

    let mut bends = Vec::new();
    for id in dummies(&g) {
        if let Some(NodeLabel {
            kind: NodeKind::Dummy(info),
            ..
        }) = g.node(&id)
        {
            if let Some(idx) = info.bend_index {
                bends.push((id, idx));
            }
        }
    }
    bends.sort_by_key(|(_, idx)| *idx);
    assert_eq!(bends.len(), 2);
    assert_eq!(bends[0].1, 0);
    assert_eq!(bends[1].1, 1);
}

#[test]
fn normalize_gives_a_single_dummy_chain_one_bend() {
    let mut g = ranked_graph(&[("a", 0), ("b", 2)], &[("ab", "a", "b")]);
    normalize::run(&mut g).unwrap();

    let ds = dummies(&g);
    assert_eq!(ds.len(), 1);
    match &g.node(&ds[0]).unwrap().kind {
        NodeKind::Dummy(info) => assert_eq!(info.bend_index, Some(0)),
        NodeKind::Real => panic!("expected dummy"),
    }
}

#[test]
fn normalize_dummies_reserve_edge_label_space() {
    let mut g = ranked_graph(&[("a", 0), ("b", 2)], &[]);
    g.add_edge(
        Some("ab"),
        "a",
        "b",
        EdgeLabel {
            width: 80.0,
            height: 20.0,
            ..Default::default()
        },
    )
    .unwrap();
    normalize::run(&mut g).unwrap();

    let ds = dummies(&g);
    let lbl = g.node(&ds[0]).unwrap();
    assert_eq!(lbl.width, 80.0);
    assert_eq!(lbl.height, 20.0);
}

#[test]
fn normalize_undo_restores_the_original_edge_with_bend_points() {
    let mut g = ranked_graph(&[("a", 0), ("b", 3)], &[("ab", "a", "b")]);
    normalize::run(&mut g).unwrap();

    // Simulate positioning so the bends have coordinates to contribute.
    for (i, id) in dummies(&g).iter().enumerate() {
        let lbl = g.node_mut(id).unwrap();
        lbl.x = Some(10.0 * (i as f64 + 1.0));
        lbl.y = Some(100.0 * (i as f64 + 1.0));
    }
    normalize::undo(&mut g).unwrap();

    assert!(dummies(&g).is_empty());
    assert_eq!(g.node_ids(), vec!["a".to_string(), "b".to_string()]);
    let label = g.edge("ab").unwrap();
    assert_eq!(label.points.len(), 2);
    assert!(label.points[0].y < label.points[1].y);
    assert_eq!(g.source("ab").unwrap(), "a");
    assert_eq!(g.target("ab").unwrap(), "b");
}
