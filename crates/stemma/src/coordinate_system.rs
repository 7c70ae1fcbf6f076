//! Rank-direction handling.
//!
//! The pipeline always lays out top-to-bottom. For the other directions,
//! `adjust` swaps node dimensions before layout and `undo` maps the finished
//! coordinates (including edge route points) into the requested system.

use crate::model::RankDir;
use crate::LayoutGraph;

pub fn adjust(g: &mut LayoutGraph, rank_dir: RankDir) {
    if matches!(rank_dir, RankDir::LR | RankDir::RL) {
        swap_width_height(g);
    }
}

pub fn undo(g: &mut LayoutGraph, rank_dir: RankDir) {
    if matches!(rank_dir, RankDir::BT | RankDir::RL) {
        reverse_y(g);
    }
    if matches!(rank_dir, RankDir::LR | RankDir::RL) {
        swap_xy(g);
        swap_width_height(g);
    }
}

fn swap_width_height(g: &mut LayoutGraph) {
    for id in g.node_ids() {
        if let Some(lbl) = g.node_mut(&id) {
            std::mem::swap(&mut lbl.width, &mut lbl.height);
        }
    }
    for id in g.edge_ids() {
        if let Some(lbl) = g.edge_mut(&id) {
            std::mem::swap(&mut lbl.width, &mut lbl.height);
        }
    }
}

fn reverse_y(g: &mut LayoutGraph) {
    for id in g.node_ids() {
        if let Some(lbl) = g.node_mut(&id) {
            if let Some(y) = lbl.y {
                lbl.y = Some(-y);
            }
        }
    }
    for id in g.edge_ids() {
        if let Some(lbl) = g.edge_mut(&id) {
            for p in &mut lbl.points {
                p.y = -p.y;
            }
        }
    }
}

fn swap_xy(g: &mut LayoutGraph) {
    for id in g.node_ids() {
        if let Some(lbl) = g.node_mut(&id) {
            std::mem::swap(&mut lbl.x, &mut lbl.y);
        }
    }
    for id in g.edge_ids() {
        if let Some(lbl) = g.edge_mut(&id) {
            for p in &mut lbl.points {
                std::mem::swap(&mut p.x, &mut p.y);
            }
        }
    }
}
