//! Coordinate assignment.
//!
//! Horizontal coordinates follow Brandes and Köpf, "Fast and Simple
//! Horizontal Coordinate Assignment": four alignment/compaction passes
//! (up/down × left/right) each produce a candidate x per node, the four
//! candidate sets are shifted onto the narrowest one, and each node takes the
//! mean of its two middle candidates. The compaction step accounts for node
//! sizes and carries the fix from Carstens, "Node and Label Placement in a
//! Layered Layout Algorithm". Vertical coordinates come straight from the
//! ranks: each layer is as tall as its tallest node, layers are separated by
//! `rank_sep`.

use crate::{Config, LayoutGraph, util};
use rustc_hash::{FxHashMap, FxHashSet};

#[derive(Clone, Copy, PartialEq)]
enum Vert {
    Up,
    Down,
}

#[derive(Clone, Copy, PartialEq)]
enum Horiz {
    Left,
    Right,
}

pub fn run(g: &mut LayoutGraph, config: &Config) {
    let layering = util::build_layer_matrix(g);
    let conflicts = find_conflicts(g, &layering);

    // Candidate coordinates in the order ul, ur, dl, dr.
    let mut xss: Vec<FxHashMap<String, f64>> = Vec::with_capacity(4);
    let mut work = layering.clone();
    for vert in [Vert::Up, Vert::Down] {
        if vert == Vert::Down {
            work.reverse();
        }
        for horiz in [Horiz::Left, Horiz::Right] {
            if horiz == Horiz::Right {
                reverse_inner_order(&mut work);
            }
            let alignment = vertical_alignment(g, &work, &conflicts, vert);
            let mut xs = horizontal_compaction(g, config, &work, &alignment);
            if horiz == Horiz::Right {
                for x in xs.values_mut() {
                    *x = -*x;
                }
                reverse_inner_order(&mut work);
            }
            xss.push(xs);
        }
        if vert == Vert::Down {
            work.reverse();
        }
    }

    balance(&layering, &mut xss);

    for v in g.node_ids() {
        let mut xs: Vec<f64> = xss.iter().map(|m| m.get(&v).copied().unwrap_or(0.0)).collect();
        xs.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
        if let Some(lbl) = g.node_mut(&v) {
            lbl.x = Some((xs[1] + xs[2]) / 2.0);
        }
    }

    // Shift so the bounding box starts at x = 0.
    let min_x = g
        .node_ids()
        .iter()
        .filter_map(|u| {
            let lbl = g.node(u)?;
            Some(lbl.x.unwrap_or(0.0) - lbl.width / 2.0)
        })
        .fold(f64::INFINITY, f64::min);
    if min_x.is_finite() {
        for u in g.node_ids() {
            if let Some(lbl) = g.node_mut(&u) {
                lbl.x = Some(lbl.x.unwrap_or(0.0) - min_x);
            }
        }
    }

    // y from rank heights.
    let mut pos_y = 0.0;
    for layer in &layering {
        let max_height = layer
            .iter()
            .filter_map(|u| g.node(u).map(|lbl| lbl.height))
            .fold(0.0_f64, f64::max);
        pos_y += max_height / 2.0;
        for u in layer {
            if let Some(lbl) = g.node_mut(u) {
                lbl.y = Some(pos_y);
            }
        }
        pos_y += max_height / 2.0 + config.rank_sep;
    }
}

/// Undirected id shared by both orientations of an edge between `u` and `v`.
fn undir_edge_id(u: &str, v: &str) -> String {
    if u < v {
        format!("{}:{}-{}", u.len(), u, v)
    } else {
        format!("{}:{}-{}", v.len(), v, u)
    }
}

/// Marks type-1 conflicts: non-inner segments that cross an inner segment
/// (one between two dummies). Alignment refuses to merge across these, so
/// long-edge chains stay straight.
fn find_conflicts(g: &LayoutGraph, layering: &[Vec<String>]) -> FxHashSet<String> {
    let mut conflicts = FxHashSet::default();
    let mut pos: FxHashMap<String, usize> = FxHashMap::default();

    if layering.len() <= 2 {
        return conflicts;
    }

    for (i, u) in layering[1].iter().enumerate() {
        pos.insert(u.clone(), i);
    }
    for i in 1..layering.len() - 1 {
        let prev_layer = &layering[i];
        let curr_layer = &layering[i + 1];
        let mut k0 = 0usize;
        let mut l = 0usize;

        for l1 in 0..curr_layer.len() {
            let u = &curr_layer[l1];
            pos.insert(u.clone(), l1);

            // Position of the next inner segment endpoint in the previous
            // layer, or the previous layer's last slot when scanning out.
            let mut k1: Option<usize> = None;
            if g.node(u).map(|lbl| lbl.is_dummy()).unwrap_or(false) {
                if let Some(&u_pred) = g.predecessors(u).first() {
                    if g.node(u_pred).map(|lbl| lbl.is_dummy()).unwrap_or(false) {
                        k1 = pos.get(u_pred).copied();
                    }
                }
            }
            if k1.is_none() && l1 == curr_layer.len() - 1 {
                k1 = Some(prev_layer.len().saturating_sub(1));
            }

            if let Some(k1) = k1 {
                while l <= l1 {
                    for v in g.predecessors(&curr_layer[l]) {
                        if let Some(&k) = pos.get(v) {
                            if k < k0 || k > k1 {
                                conflicts.insert(undir_edge_id(&curr_layer[l], v));
                            }
                        }
                    }
                    l += 1;
                }
                k0 = k1;
            }
        }
    }
    conflicts
}

struct Alignment {
    pos: FxHashMap<String, usize>,
    root: FxHashMap<String, String>,
    align: FxHashMap<String, String>,
}

/// Chains each node to the median neighbor in the fixed adjacent layer,
/// forming vertical blocks that share an x coordinate.
fn vertical_alignment(
    g: &LayoutGraph,
    layering: &[Vec<String>],
    conflicts: &FxHashSet<String>,
    vert: Vert,
) -> Alignment {
    let mut pos = FxHashMap::default();
    let mut root = FxHashMap::default();
    let mut align = FxHashMap::default();

    for layer in layering {
        for (i, u) in layer.iter().enumerate() {
            root.insert(u.clone(), u.clone());
            align.insert(u.clone(), u.clone());
            pos.insert(u.clone(), i);
        }
    }

    for layer in layering {
        let mut prev_idx: Option<usize> = None;
        for v in layer {
            let mut related: Vec<String> = match vert {
                Vert::Up => g.predecessors(v),
                Vert::Down => g.successors(v),
            }
            .into_iter()
            .map(str::to_string)
            .collect();
            if related.is_empty() {
                continue;
            }
            related.sort_by_key(|x| pos.get(x).copied().unwrap_or(0));
            let mid = (related.len() - 1) as f64 / 2.0;
            let lo = mid.floor() as usize;
            let hi = mid.ceil() as usize;
            for u in &related[lo..=hi] {
                if align.get(v).map(String::as_str) == Some(v.as_str()) {
                    let u_pos = pos.get(u).copied().unwrap_or(0);
                    let ahead = prev_idx.map(|p| p < u_pos).unwrap_or(true);
                    if !conflicts.contains(&undir_edge_id(u, v)) && ahead {
                        align.insert(u.clone(), v.clone());
                        let u_root = root.get(u).cloned().unwrap_or_else(|| u.clone());
                        root.insert(v.clone(), u_root.clone());
                        align.insert(v.clone(), u_root);
                        prev_idx = Some(u_pos);
                    }
                }
            }
        }
    }

    Alignment { pos, root, align }
}

struct Compaction<'a> {
    g: &'a LayoutGraph,
    config: &'a Config,
    pos: &'a FxHashMap<String, usize>,
    root: &'a FxHashMap<String, String>,
    align: &'a FxHashMap<String, String>,
    sink: FxHashMap<String, String>,
    shift: FxHashMap<String, f64>,
    pred: FxHashMap<String, String>,
    xs: FxHashMap<String, f64>,
}

impl Compaction<'_> {
    /// Half the space a node claims from the gap to its neighbor.
    fn sep(&self, u: &str) -> f64 {
        if let Some(sep) = self.config.universal_sep {
            return sep;
        }
        let lbl = match self.g.node(u) {
            Some(lbl) => lbl,
            None => return 0.0,
        };
        let s = if lbl.is_dummy() {
            self.config.edge_sep
        } else {
            self.config.node_sep
        };
        (lbl.width + s) / 2.0
    }

    fn place_block(&mut self, v: &str) {
        if self.xs.contains_key(v) {
            return;
        }
        self.xs.insert(v.to_string(), 0.0);
        let mut w = v.to_string();
        loop {
            if self.pos.get(&w).copied().unwrap_or(0) > 0 {
                let pred = self.pred[&w].clone();
                let u = self.root[&pred].clone();
                self.place_block(&u);
                if self.sink[v] == v {
                    let u_sink = self.sink[&u].clone();
                    self.sink.insert(v.to_string(), u_sink);
                }
                let delta = self.sep(&pred) + self.sep(&w);
                if self.sink[v] != self.sink[&u] {
                    let u_sink = self.sink[&u].clone();
                    let candidate = self.xs[v] - self.xs[&u] - delta;
                    let entry = self.shift.entry(u_sink).or_insert(f64::INFINITY);
                    *entry = entry.min(candidate);
                } else {
                    let placed = (self.xs[v]).max(self.xs[&u] + delta);
                    self.xs.insert(v.to_string(), placed);
                }
            }
            w = self.align[&w].clone();
            if w == v {
                break;
            }
        }
    }
}

fn horizontal_compaction(
    g: &LayoutGraph,
    config: &Config,
    layering: &[Vec<String>],
    alignment: &Alignment,
) -> FxHashMap<String, f64> {
    let mut c = Compaction {
        g,
        config,
        pos: &alignment.pos,
        root: &alignment.root,
        align: &alignment.align,
        sink: FxHashMap::default(),
        shift: FxHashMap::default(),
        pred: FxHashMap::default(),
        xs: FxHashMap::default(),
    };

    for layer in layering {
        for (i, u) in layer.iter().enumerate() {
            c.sink.insert(u.clone(), u.clone());
            if i > 0 {
                c.pred.insert(u.clone(), layer[i - 1].clone());
            }
        }
    }

    // Root coordinates relative to their sink.
    let roots: Vec<String> = alignment.root.values().cloned().collect();
    for v in roots {
        c.place_block(&v);
    }

    // Absolute coordinates.
    let mut xs = FxHashMap::default();
    for layer in layering {
        for v in layer {
            let root = &alignment.root[v];
            let mut x = c.xs.get(root).copied().unwrap_or(0.0);
            if root == v {
                if let Some(&delta) = c.shift.get(&c.sink[v]) {
                    if delta < f64::INFINITY {
                        x += delta;
                    }
                }
            }
            xs.insert(v.clone(), x);
        }
    }
    xs
}

fn reverse_inner_order(layering: &mut [Vec<String>]) {
    for layer in layering {
        layer.reverse();
    }
}

/// Shifts the four candidate sets onto the narrowest one: left-biased
/// alignments line up on its left edge, right-biased ones on its right edge.
fn balance(layering: &[Vec<String>], xss: &mut [FxHashMap<String, f64>]) {
    let mut mins = [0.0f64; 4];
    let mut maxs = [0.0f64; 4];
    let mut smallest = f64::INFINITY;
    let mut smallest_idx = 0;
    for (a, xs) in xss.iter().enumerate() {
        mins[a] = layering
            .iter()
            .filter_map(|layer| layer.first().and_then(|u| xs.get(u)).copied())
            .fold(f64::INFINITY, f64::min);
        maxs[a] = layering
            .iter()
            .filter_map(|layer| layer.last().and_then(|u| xs.get(u)).copied())
            .fold(f64::NEG_INFINITY, f64::max);
        let w = maxs[a] - mins[a];
        if w < smallest {
            smallest = w;
            smallest_idx = a;
        }
    }

    // Alignments ul, ur, dl, dr: odd indices are right-biased.
    for a in 0..4 {
        let shift = if a % 2 == 0 {
            mins[smallest_idx] - mins[a]
        } else {
            maxs[smallest_idx] - maxs[a]
        };
        if shift != 0.0 {
            for x in xss[a].values_mut() {
                *x += shift;
            }
        }
    }
}
