//! Small helpers shared across phases.

use crate::LayoutGraph;

/// Groups node ids by rank. Within a layer, nodes are sorted by their `order`
/// field when set, otherwise they keep graph insertion order.
pub fn build_layer_matrix(g: &LayoutGraph) -> Vec<Vec<String>> {
    let max_rank = match max_rank(g) {
        Some(r) => r,
        None => return Vec::new(),
    };
    let mut layering: Vec<Vec<String>> = vec![Vec::new(); max_rank as usize + 1];
    for id in g.node_ids() {
        if let Some(rank) = g.node(&id).and_then(|lbl| lbl.rank) {
            layering[rank as usize].push(id);
        }
    }
    for layer in &mut layering {
        layer.sort_by_key(|id| g.node(id).and_then(|lbl| lbl.order).unwrap_or(0));
    }
    layering
}

pub fn max_rank(g: &LayoutGraph) -> Option<i32> {
    g.node_ids()
        .iter()
        .filter_map(|id| g.node(id).and_then(|lbl| lbl.rank))
        .max()
}
