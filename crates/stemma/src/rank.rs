//! Rank assignment.
//!
//! A priority-queue longest-path pass seeds every node with a feasible rank,
//! then each connected component is tightened with a feasible tree: a minimum
//! spanning tree over edge slack pulls loosely ranked nodes as close together
//! as their `minlen` constraints allow. Finally ranks are shifted so the
//! smallest rank in each component is zero.

use crate::data::PriorityQueue;
use crate::{LayoutError, LayoutGraph};
use rustc_hash::{FxHashMap, FxHashSet};

pub fn run(g: &mut LayoutGraph) -> Result<(), LayoutError> {
    init_rank(g)?;
    let components = crate::graphlib::alg::components(g);
    for component in components {
        let mut subgraph = g.subgraph(&component);
        feasible_tree(&mut subgraph)?;
        normalize(&mut subgraph);
        for id in subgraph.node_ids() {
            let rank = subgraph.node(&id).and_then(|lbl| lbl.rank);
            if let Some(lbl) = g.node_mut(&id) {
                lbl.rank = rank;
            }
        }
    }
    Ok(())
}

/// Longest-path ranking driven by a priority queue keyed on the number of
/// unranked predecessors. Extracting a node with positive priority means a
/// cycle survived the acyclic transform, which is reported as an error.
/// A pre-set rank on a node's label is its starting accumulated minimum, so
/// callers can pin a node at least that far down.
fn init_rank(g: &mut LayoutGraph) -> Result<(), LayoutError> {
    let mut pq = PriorityQueue::new();
    for id in g.node_ids() {
        pq.add(&id, g.in_edges(&id).len() as i64);
    }

    while let Some(id) = pq.min().map(str::to_string) {
        if pq.priority(&id).unwrap_or(0) > 0 {
            return Err(LayoutError::NotAcyclic(id));
        }
        pq.remove_min();
        let mut rank: i32 = g.node(&id).and_then(|lbl| lbl.rank).unwrap_or(0);
        for e in g.in_edges(&id) {
            let source = g.source(&e)?.to_string();
            let source_rank = g.node(&source).and_then(|lbl| lbl.rank).unwrap_or(0);
            let minlen = g.edge(&e).map(|lbl| lbl.minlen as i32).unwrap_or(1);
            rank = rank.max(source_rank + minlen);
        }
        if let Some(lbl) = g.node_mut(&id) {
            lbl.rank = Some(rank);
        }
        for e in g.out_edges(&id) {
            let target = g.target(&e)?.to_string();
            if let Some(priority) = pq.priority(&target) {
                pq.decrease(&target, priority - 1)?;
            }
        }
    }
    Ok(())
}

fn feasible_tree(g: &mut LayoutGraph) -> Result<(), LayoutError> {
    let node_ids = g.node_ids();
    if node_ids.len() <= 1 {
        return Ok(());
    }

    // Largest minlen over all parallel edges between a node pair, either
    // direction. The tree must respect the tightest constraint.
    let min_len = |g: &LayoutGraph, u: &str, v: &str| -> usize {
        let mut len = 1usize;
        for e in g.edges_between(u, v).into_iter().chain(g.edges_between(v, u)) {
            if let Some(lbl) = g.edge(&e) {
                len = len.max(lbl.minlen);
            }
        }
        len
    };
    let rank_of = |g: &LayoutGraph, u: &str| -> i32 {
        g.node(u).and_then(|lbl| lbl.rank).unwrap_or(0)
    };
    let slack = |g: &LayoutGraph, u: &str, v: &str| -> i64 {
        (rank_of(g, u) - rank_of(g, v)).abs() as i64 - min_len(g, u, v) as i64
    };

    // Prim's algorithm over slack yields a tight spanning tree: every tree
    // edge ends up with zero slack once ranks are re-derived from it.
    let tree = prim(g, &slack);

    let root = node_ids[0].clone();
    let mut visited: FxHashSet<String> = FxHashSet::default();
    visited.insert(root.clone());
    let mut stack: Vec<(String, i32)> = vec![(root, 0)];
    while let Some((u, rank)) = stack.pop() {
        if let Some(lbl) = g.node_mut(&u) {
            lbl.rank = Some(rank);
        }
        if let Some(neighbors) = tree.get(&u) {
            for v in neighbors {
                if visited.insert(v.clone()) {
                    let len = min_len(g, &u, v) as i32;
                    let child_rank = if g.edges_between(&u, v).is_empty() {
                        rank - len
                    } else {
                        rank + len
                    };
                    stack.push((v.clone(), child_rank));
                }
            }
        }
    }
    Ok(())
}

/// Undirected minimum spanning tree, returned as an adjacency map.
fn prim(
    g: &LayoutGraph,
    weight: &dyn Fn(&LayoutGraph, &str, &str) -> i64,
) -> FxHashMap<String, Vec<String>> {
    let node_ids = g.node_ids();
    let mut tree: FxHashMap<String, Vec<String>> = FxHashMap::default();
    for id in &node_ids {
        tree.insert(id.clone(), Vec::new());
    }
    if node_ids.is_empty() {
        return tree;
    }

    let mut pq = PriorityQueue::new();
    let mut parents: FxHashMap<String, String> = FxHashMap::default();
    for id in &node_ids {
        pq.add(id, i64::MAX);
    }

    let mut init = false;
    while let Some(u) = pq.remove_min() {
        if !init {
            init = true;
        } else if let Some(parent) = parents.get(&u).cloned() {
            if let Some(vs) = tree.get_mut(&u) {
                vs.push(parent.clone());
            }
            if let Some(vs) = tree.get_mut(&parent) {
                vs.push(u.clone());
            }
        }
        for v in g.neighbors(&u) {
            if let Some(priority) = pq.priority(v) {
                let w = weight(g, &u, v);
                if w < priority {
                    parents.insert(v.to_string(), u.clone());
                    // Weight can only shrink here, so decrease cannot fail.
                    let _ = pq.decrease(v, w);
                }
            }
        }
    }
    tree
}

/// Shifts ranks so the smallest becomes zero.
fn normalize(g: &mut LayoutGraph) {
    let min = g
        .node_ids()
        .iter()
        .filter_map(|id| g.node(id).and_then(|lbl| lbl.rank))
        .min()
        .unwrap_or(0);
    for id in g.node_ids() {
        if let Some(lbl) = g.node_mut(&id) {
            if let Some(rank) = lbl.rank {
                lbl.rank = Some(rank - min);
            }
        }
    }
}
