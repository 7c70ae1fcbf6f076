use stemma::{EdgeLabel, LayoutGraph, NodeLabel, acyclic};

fn graph(nodes: &[&str], edges: &[(&str, &str, &str)]) -> LayoutGraph {
    let mut g = LayoutGraph::new();
    for n in nodes {
        g.add_node(*n, NodeLabel::default()).unwrap();
    }
    for (id, s, t) in edges {
        g.add_edge(Some(id), s, t, EdgeLabel::default()).unwrap();
    }
    g
}

fn is_acyclic(g: &LayoutGraph) -> bool {
    // Kahn's algorithm: all nodes drain iff there is no cycle.
    let mut in_degree: std::collections::HashMap<String, usize> = g
        .node_ids()
        .into_iter()
        .map(|id| {
            let d = g.in_edges(&id).len();
            (id, d)
        })
        .collect();
    let mut queue: Vec<String> = in_degree
        .iter()
        .filter(|(_, d)| **d == 0)
        .map(|(id, _)| id.clone())
        .collect();
    let mut drained = 0;
    while let Some(u) = queue.pop() {
        drained += 1;
        for e in g.out_edges(&u) {
            let t = g.target(&e).unwrap().to_string();
            let d = in_degree.get_mut(&t).unwrap();
            *d -= 1;
            if *d == 0 {
                queue.push(t);
            }
        }
    }
    drained == g.node_count()
}

#[test]
fn acyclic_run_leaves_a_dag_untouched() {
    let mut g = graph(&["a", "b", "c"], &[("ab", "a", "b"), ("bc", "b", "c")]);
    acyclic::run(&mut g).unwrap();
    assert!(!g.edge("ab").unwrap().reversed);
    assert!(!g.edge("bc").unwrap().reversed);
    assert_eq!(g.source("ab").unwrap(), "a");
}

#[test]
fn acyclic_run_breaks_cycles_in_the_input_graph() {
    let mut g = graph(
        &["a", "b", "c"],
        &[("ab", "a", "b"), ("bc", "b", "c"), ("ca", "c", "a")],
    );
    acyclic::run(&mut g).unwrap();
    assert!(is_acyclic(&g));

    let reversed: Vec<String> = g
        .edge_ids()
        .into_iter()
        .filter(|e| g.edge(e).unwrap().reversed)
        .collect();
    assert_eq!(reversed.len(), 1);
}

#[test]
fn acyclic_run_handles_self_referencing_components_independently() {
    let mut g = graph(
        &["a", "b", "x", "y"],
        &[
            ("ab", "a", "b"),
            ("ba", "b", "a"),
            ("xy", "x", "y"),
        ],
    );
    acyclic::run(&mut g).unwrap();
    assert!(is_acyclic(&g));
    assert!(!g.edge("xy").unwrap().reversed);
}

#[test]
fn acyclic_undo_restores_original_edge_directions() {
    let mut g = graph(
        &["a", "b", "c"],
        &[("ab", "a", "b"), ("bc", "b", "c"), ("ca", "c", "a")],
    );
    acyclic::run(&mut g).unwrap();
    acyclic::undo(&mut g).unwrap();

    assert_eq!(g.source("ab").unwrap(), "a");
    assert_eq!(g.target("ab").unwrap(), "b");
    assert_eq!(g.source("bc").unwrap(), "b");
    assert_eq!(g.source("ca").unwrap(), "c");
    assert_eq!(g.target("ca").unwrap(), "a");
    for e in g.edge_ids() {
        assert!(!g.edge(&e).unwrap().reversed);
    }
}
