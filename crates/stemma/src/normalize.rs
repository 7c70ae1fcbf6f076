//! Break multi-rank edges into chains of unit-length segments.
//!
//! Every edge spanning more than one rank is replaced by a chain of dummy
//! nodes, one per intermediate rank. Each dummy remembers the original edge so
//! `undo` can reconstruct it after positioning, with the coordinates of the
//! bend dummies folded into the edge's route.

use crate::model::{DummyInfo, NodeKind, NodeLabel, OriginalEdge, Point};
use crate::{EdgeLabel, LayoutError, LayoutGraph};

pub fn run(g: &mut LayoutGraph) -> Result<(), LayoutError> {
    let mut dummy_count = 0usize;
    for e in g.edge_ids() {
        let source = g.source(&e)?.to_string();
        let target = g.target(&e)?.to_string();
        let source_rank = g.node(&source).and_then(|lbl| lbl.rank).unwrap_or(0);
        let target_rank = g.node(&target).and_then(|lbl| lbl.rank).unwrap_or(0);
        if source_rank + 1 >= target_rank {
            continue;
        }

        let label = g.remove_edge(&e)?;
        let origin = OriginalEdge {
            id: e.clone(),
            source: source.clone(),
            target: target.clone(),
            label: label.clone(),
        };

        let mut prev = source;
        let mut i = 0usize;
        for rank in (source_rank + 1)..target_rank {
            dummy_count += 1;
            let id = format!("_D{dummy_count}");

            // Bends become route control points: the first dummy of a chain,
            // and the last one when the chain has more than one dummy.
            let bend_index = if i == 0 {
                Some(0)
            } else if rank + 1 == target_rank {
                Some(1)
            } else {
                None
            };

            g.add_node(
                &id,
                NodeLabel {
                    width: label.width,
                    height: label.height,
                    rank: Some(rank),
                    kind: NodeKind::Dummy(DummyInfo {
                        origin: origin.clone(),
                        bend_index,
                    }),
                    ..Default::default()
                },
            )?;
            g.add_edge(None, &prev, &id, EdgeLabel::default())?;
            prev = id;
            i += 1;
        }
        g.add_edge(None, &prev, &target, EdgeLabel::default())?;
    }
    tracing::debug!(dummies = dummy_count, "normalized long edges");
    Ok(())
}

/// Removes every dummy node and restores the original long edges. Bend dummies
/// contribute their coordinates to the restored edge's route; chain order
/// guarantees the first bend lands before the last.
pub fn undo(g: &mut LayoutGraph) -> Result<(), LayoutError> {
    for u in g.node_ids() {
        let info = match g.node(&u) {
            Some(NodeLabel {
                kind: NodeKind::Dummy(info),
                ..
            }) => info.clone(),
            _ => continue,
        };

        if info.bend_index.is_some() {
            if g.edge(&info.origin.id).is_none() {
                let mut label = info.origin.label.clone();
                label.points.clear();
                g.add_edge(
                    Some(&info.origin.id),
                    &info.origin.source,
                    &info.origin.target,
                    label,
                )?;
            }
            let (x, y) = g
                .node(&u)
                .map(|lbl| (lbl.x.unwrap_or(0.0), lbl.y.unwrap_or(0.0)))
                .unwrap_or((0.0, 0.0));
            if let Some(label) = g.edge_mut(&info.origin.id) {
                label.points.push(Point { x, y });
            }
        }
        g.remove_node(&u)?;
    }
    Ok(())
}

/// Restores route direction for edges the acyclic transform reversed.
pub fn fixup_edge_points(g: &mut LayoutGraph) {
    for e in g.edge_ids() {
        if let Some(label) = g.edge_mut(&e) {
            if label.reversed {
                label.points.reverse();
            }
        }
    }
}
