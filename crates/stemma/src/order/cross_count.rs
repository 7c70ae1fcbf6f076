//! Edge crossing counts for a ranked, ordered layering.

use super::layer_pos;
use crate::LayoutGraph;

/// Total crossings between every pair of adjacent layers.
pub fn cross_count(g: &LayoutGraph, layering: &[Vec<String>]) -> usize {
    layering
        .windows(2)
        .map(|w| bilayer_cross_count(g, &w[0], &w[1]))
        .sum()
}

/// Crossings between two adjacent layers, counted with the accumulator tree
/// from Barth et al., "Bilayer Cross Counting", JGAA 8(2), 2004.
pub fn bilayer_cross_count(g: &LayoutGraph, north: &[String], south: &[String]) -> usize {
    let south_pos = layer_pos(south);

    let mut indices: Vec<usize> = Vec::new();
    for u in north {
        let mut node_indices: Vec<usize> = g
            .out_edges(u)
            .iter()
            .filter_map(|e| g.target(e).ok().and_then(|t| south_pos.get(t).copied()))
            .collect();
        node_indices.sort_unstable();
        indices.extend(node_indices);
    }

    let mut first_index = 1usize;
    while first_index < south.len() {
        first_index <<= 1;
    }
    let tree_size = 2 * first_index - 1;
    first_index -= 1;
    let mut tree = vec![0usize; tree_size];

    let mut cc = 0usize;
    for i in indices {
        let mut tree_index = i + first_index;
        tree[tree_index] += 1;
        while tree_index > 0 {
            if tree_index % 2 == 1 {
                cc += tree[tree_index + 1];
            }
            tree_index = (tree_index - 1) >> 1;
            tree[tree_index] += 1;
        }
    }
    cc
}
