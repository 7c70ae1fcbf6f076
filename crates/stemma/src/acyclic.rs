//! Break cycles by reversing back-edges.
//!
//! A depth-first traversal from every unvisited node classifies any edge whose
//! target is still on the traversal stack as a back-edge; those edges are
//! re-inserted with swapped endpoints and marked `reversed`, so `undo` can
//! restore the original direction after layout. The traversal uses an explicit
//! stack so deep graphs cannot overflow the call stack.

use crate::{LayoutError, LayoutGraph};
use rustc_hash::FxHashSet;

pub fn run(g: &mut LayoutGraph) -> Result<(), LayoutError> {
    let mut visited: FxHashSet<String> = FxHashSet::default();
    let mut on_stack: FxHashSet<String> = FxHashSet::default();
    let mut back_edges: Vec<String> = Vec::new();

    struct Frame {
        node: String,
        out: Vec<String>,
        next: usize,
    }

    for root in g.node_ids() {
        if visited.contains(&root) {
            continue;
        }
        visited.insert(root.clone());
        on_stack.insert(root.clone());
        let mut stack: Vec<Frame> = vec![Frame {
            out: g.out_edges(&root),
            node: root,
            next: 0,
        }];

        while let Some(frame) = stack.last_mut() {
            if frame.next >= frame.out.len() {
                on_stack.remove(&frame.node);
                stack.pop();
                continue;
            }
            let e = frame.out[frame.next].clone();
            frame.next += 1;

            let target = g.target(&e)?.to_string();
            if on_stack.contains(&target) {
                back_edges.push(e);
            } else if visited.insert(target.clone()) {
                on_stack.insert(target.clone());
                stack.push(Frame {
                    out: g.out_edges(&target),
                    node: target,
                    next: 0,
                });
            }
        }
    }

    tracing::debug!(reversed = back_edges.len(), "acyclic transform");
    for e in back_edges {
        reverse_edge(g, &e, true)?;
    }
    Ok(())
}

/// Restores the original direction of every reversed edge. Computed routes are
/// left untouched; the driver reverses them during de-normalization.
pub fn undo(g: &mut LayoutGraph) -> Result<(), LayoutError> {
    for e in g.edge_ids() {
        let is_reversed = g.edge(&e).map(|lbl| lbl.reversed).unwrap_or(false);
        if is_reversed {
            reverse_edge(g, &e, false)?;
        }
    }
    Ok(())
}

fn reverse_edge(g: &mut LayoutGraph, e: &str, reversed: bool) -> Result<(), LayoutError> {
    let source = g.source(e)?.to_string();
    let target = g.target(e)?.to_string();
    let mut label = g.remove_edge(e)?;
    label.reversed = reversed;
    g.add_edge(Some(e), &target, &source, label)?;
    Ok(())
}
