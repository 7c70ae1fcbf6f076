//! Crossing minimization.
//!
//! Starting from the nodes' graph-iteration order, alternating top-down and
//! bottom-up barycenter sweeps reorder each layer by the average position of
//! its neighbors in the adjacent layer. The best layering seen (by crossing
//! count) is kept; the search stops after four sweeps without improvement,
//! when the iteration cap is reached, or when no crossings remain.

mod cross_count;
mod strategy;

pub use cross_count::{bilayer_cross_count, cross_count};
pub use strategy::{DefaultOrder, OrderStrategy};

use crate::LayoutGraph;
use rustc_hash::FxHashMap;

/// Sweeps that may go by without improvement before the search stops.
const STALL_LIMIT: usize = 4;

pub fn run(g: &mut LayoutGraph, iterations: usize) {
    let mut layering = init_order(g);
    let mut best_layering = layering.clone();
    let mut best_cc = cross_count(g, &layering);

    let mut i = 0;
    let mut last_best = 0;
    while last_best < STALL_LIMIT && i < iterations && best_cc > 0 {
        let cc = sweep(g, i, &mut layering);
        if cc < best_cc {
            best_layering = layering.clone();
            best_cc = cc;
            last_best = 0;
        }
        last_best += 1;
        i += 1;
    }
    tracing::debug!(iterations = i, crossings = best_cc, "ordering settled");

    apply_layering(g, &best_layering);
}

/// Writes each node's position within its layer back onto the labels.
pub fn apply_layering(g: &mut LayoutGraph, layering: &[Vec<String>]) {
    for layer in layering {
        for (i, u) in layer.iter().enumerate() {
            if let Some(lbl) = g.node_mut(u) {
                lbl.order = Some(i);
            }
        }
    }
}

/// Seeds each layer with graph iteration order.
pub fn init_order(g: &LayoutGraph) -> Vec<Vec<String>> {
    let max_rank = crate::util::max_rank(g).unwrap_or(0);
    let mut layering: Vec<Vec<String>> = vec![Vec::new(); max_rank as usize + 1];
    for id in g.node_ids() {
        if let Some(rank) = g.node(&id).and_then(|lbl| lbl.rank) {
            layering[rank as usize].push(id);
        }
    }
    layering
}

fn sweep(g: &LayoutGraph, iter: usize, layering: &mut [Vec<String>]) -> usize {
    if iter % 2 == 0 {
        for i in 1..layering.len() {
            let weights = layer_pos(&layering[i - 1]);
            let neighbors = multi_predecessors(g, &layering[i]);
            sort_layer(&mut layering[i], &neighbors, &weights);
        }
    } else {
        for i in (0..layering.len().saturating_sub(1)).rev() {
            let weights = layer_pos(&layering[i + 1]);
            let neighbors = multi_successors(g, &layering[i]);
            sort_layer(&mut layering[i], &neighbors, &weights);
        }
    }
    cross_count(g, layering)
}

/// Predecessors with one entry per incident edge, so parallel edges weight
/// the barycenter more heavily than `Graph::predecessors` (a set) would.
fn multi_predecessors(g: &LayoutGraph, layer: &[String]) -> FxHashMap<String, Vec<String>> {
    let mut out = FxHashMap::default();
    for u in layer {
        let mut preds = Vec::new();
        for e in g.in_edges(u) {
            if let Ok(source) = g.source(&e) {
                preds.push(source.to_string());
            }
        }
        out.insert(u.clone(), preds);
    }
    out
}

fn multi_successors(g: &LayoutGraph, layer: &[String]) -> FxHashMap<String, Vec<String>> {
    let mut out = FxHashMap::default();
    for u in layer {
        let mut sucs = Vec::new();
        for e in g.out_edges(u) {
            if let Ok(target) = g.target(&e) {
                sucs.push(target.to_string());
            }
        }
        out.insert(u.clone(), sucs);
    }
    out
}

/// Sorts a layer by barycenter, breaking ties by current position. Nodes
/// without neighbors in the fixed layer (barycenter -1) keep their slots; the
/// sorted remainder is poured back into the free positions from the right.
fn sort_layer(
    nodes: &mut [String],
    neighbors: &FxHashMap<String, Vec<String>>,
    weights: &FxHashMap<String, usize>,
) {
    let pos = layer_pos(nodes);
    let bs = barycenters(nodes, neighbors, weights);

    let mut to_sort: Vec<String> = nodes
        .iter()
        .filter(|u| bs.get(*u).copied().unwrap_or(-1.0) != -1.0)
        .cloned()
        .collect();
    to_sort.sort_by(|x, y| {
        let bx = bs.get(x).copied().unwrap_or(-1.0);
        let by = bs.get(y).copied().unwrap_or(-1.0);
        bx.partial_cmp(&by)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| pos[x].cmp(&pos[y]))
    });

    for i in (0..nodes.len()).rev() {
        if bs.get(&nodes[i]).copied().unwrap_or(-1.0) != -1.0 {
            if let Some(u) = to_sort.pop() {
                nodes[i] = u;
            }
        }
    }
}

/// Average fixed-layer position of each node's neighbors; -1 marks a node
/// with no neighbors in the fixed layer.
fn barycenters(
    nodes: &[String],
    neighbors: &FxHashMap<String, Vec<String>>,
    weights: &FxHashMap<String, usize>,
) -> FxHashMap<String, f64> {
    let mut bs = FxHashMap::default();
    for u in nodes {
        let vs = neighbors.get(u).map(Vec::as_slice).unwrap_or(&[]);
        let b = if vs.is_empty() {
            -1.0
        } else {
            let sum: f64 = vs
                .iter()
                .map(|v| weights.get(v).copied().unwrap_or(0) as f64)
                .sum();
            sum / vs.len() as f64
        };
        bs.insert(u.clone(), b);
    }
    bs
}

pub(crate) fn layer_pos(layer: &[String]) -> FxHashMap<String, usize> {
    layer
        .iter()
        .enumerate()
        .map(|(i, u)| (u.clone(), i))
        .collect()
}
