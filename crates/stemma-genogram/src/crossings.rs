//! Genogram-aware crossing minimization.
//!
//! The built-in barycenter ordering works on the dummy-augmented graph and
//! knows nothing about families. This strategy runs it as a seed and then
//! refines the result in four phases: barycenter sweeps with genealogical
//! tie-breaking, bounded greedy relocation of single nodes, a repair pass for
//! crossings among the real parent→child edges that couple containers hide
//! from the dummy graph, and finally multiple-birth sibling consolidation.

use rustc_hash::FxHashMap;
use stemma::{LayoutGraph, OrderStrategy};

use crate::model::Person;

/// Tuning knobs for the refinement phases. The defaults are heuristic
/// trade-offs, not correctness requirements; the rank-width cutoff exists
/// because greedy relocation is quadratic in rank width.
#[derive(Debug, Clone, Copy)]
pub struct CrossingOptions {
    /// Cap on barycenter sweep rounds (both the tie-breaking phase and the
    /// real-edge repair phase).
    pub max_barycenter_iterations: usize,
    /// Cap on full greedy-relocation passes over all ranks.
    pub max_relocation_passes: usize,
    /// Ranks wider than this are skipped by greedy relocation.
    pub max_relocation_rank_width: usize,
}

impl Default for CrossingOptions {
    fn default() -> Self {
        Self {
            max_barycenter_iterations: 24,
            max_relocation_passes: 10,
            max_relocation_rank_width: 50,
        }
    }
}

#[derive(Clone, Copy, PartialEq)]
enum Direction {
    Up,
    Down,
}

/// Ordering strategy used by the genogram driver. Node ids here are layout
/// ids: couple-container ids for coupled persons, person ids for solo ones.
pub struct GenogramOrder {
    /// Person metadata keyed by layout node id; only solo persons appear.
    pub(crate) persons: FxHashMap<String, Person>,
    /// Layout node id → canonical identical-sibling group key.
    pub(crate) identical_group: FxHashMap<String, String>,
    /// Layout node id → `parentLayoutId|multiple` sibling-group key.
    pub(crate) node_multiple_group: FxHashMap<String, String>,
    /// Deduplicated parent→child edges at the layout-id level.
    pub(crate) real_edges: Vec<(String, String)>,
    pub(crate) options: CrossingOptions,
}

impl OrderStrategy for GenogramOrder {
    fn assign_order(
        &mut self,
        g: &mut LayoutGraph,
        default_order: &mut dyn FnMut(&mut LayoutGraph),
    ) {
        default_order(g);

        let mut pass = Pass::from_seeded_graph(g);
        self.refine_barycenter(g, &mut pass);
        self.relocate_greedily(g, &mut pass);
        self.repair_real_edge_crossings(g, &mut pass);
        self.consolidate_sibling_groups(&mut pass);

        for (id, order) in &pass.orders {
            if let Some(lbl) = g.node_mut(id) {
                lbl.order = Some(*order);
            }
        }
    }
}

impl GenogramOrder {
    fn identical_group_of(&self, node: &str) -> Option<&str> {
        self.identical_group.get(node).map(String::as_str)
    }

    /// Barycenter sweeps over the full (dummy-augmented) graph, breaking
    /// barycenter ties by birth date, then identical group, then the current
    /// order. Keeps the best ordering by total crossings.
    fn refine_barycenter(&self, g: &LayoutGraph, pass: &mut Pass) {
        let mut best_crossings = pass.total_crossings(g);
        let mut best_order = pass.orders.clone();

        for _ in 0..self.options.max_barycenter_iterations {
            let ranks = pass.ranks.clone();
            for &rank in &ranks {
                self.reorder_by_barycenter(g, pass, rank, Direction::Up);
            }
            for &rank in ranks.iter().rev() {
                self.reorder_by_barycenter(g, pass, rank, Direction::Down);
            }

            let crossings = pass.total_crossings(g);
            if crossings < best_crossings {
                best_crossings = crossings;
                best_order = pass.orders.clone();
            }
            if crossings == 0 {
                break;
            }
        }

        pass.restore(best_order);
        tracing::debug!(crossings = best_crossings, "barycenter refinement done");
    }

    fn reorder_by_barycenter(&self, g: &LayoutGraph, pass: &mut Pass, rank: i32, dir: Direction) {
        let mut nodes = match pass.nodes_by_rank.get(&rank) {
            Some(nodes) if nodes.len() > 1 => nodes.clone(),
            _ => return,
        };

        let mut barycenters: FxHashMap<String, f64> = FxHashMap::default();
        for id in &nodes {
            let neighbors: Vec<&str> = match dir {
                Direction::Up => g.predecessors(id),
                Direction::Down => g.successors(id),
            };
            let b = if neighbors.is_empty() {
                pass.orders[id] as f64
            } else {
                let sum: f64 = neighbors.iter().map(|n| pass.orders[*n] as f64).sum();
                sum / neighbors.len() as f64
            };
            barycenters.insert(id.clone(), b);
        }

        nodes.sort_by(|a, b| {
            let ba = barycenters[a];
            let bb = barycenters[b];
            if ba != bb {
                return ba.partial_cmp(&bb).unwrap_or(std::cmp::Ordering::Equal);
            }
            if let (Some(pa), Some(pb)) = (self.persons.get(a), self.persons.get(b)) {
                let birth = pa
                    .dob
                    .as_deref()
                    .unwrap_or("")
                    .cmp(pb.dob.as_deref().unwrap_or(""));
                if birth != std::cmp::Ordering::Equal {
                    return birth;
                }
                let ga = self.identical_group_of(a).unwrap_or(pa.id.as_str());
                let gb = self.identical_group_of(b).unwrap_or(pb.id.as_str());
                if ga != gb {
                    return ga.cmp(gb);
                }
            }
            pass.orders[a].cmp(&pass.orders[b])
        });

        pass.set_rank_order(rank, nodes);
    }

    /// For each node in a rank, tries every insertion position and keeps the
    /// one minimizing total crossings. Repeats until a pass changes nothing
    /// or the pass cap is hit; wide ranks are skipped entirely.
    fn relocate_greedily(&self, g: &LayoutGraph, pass: &mut Pass) {
        let mut relocated = true;
        for _ in 0..self.options.max_relocation_passes {
            if !relocated {
                break;
            }
            relocated = false;
            if pass.total_crossings(g) == 0 {
                break;
            }

            let ranks = pass.ranks.clone();
            for rank in ranks {
                let width = pass.nodes_by_rank[&rank].len();
                if width <= 1 || width > self.options.max_relocation_rank_width {
                    continue;
                }

                for i in 0..width {
                    let mut nodes = pass.nodes_by_rank[&rank].clone();
                    let id = nodes[i].clone();
                    let mut best_pos = i;
                    let mut best_cost = pass.total_crossings(g);
                    if best_cost == 0 {
                        break;
                    }

                    nodes.remove(i);
                    for j in 0..=nodes.len() {
                        nodes.insert(j, id.clone());
                        pass.set_rank_order(rank, nodes.clone());
                        let cost = pass.total_crossings(g);
                        if cost < best_cost {
                            best_cost = cost;
                            best_pos = j;
                        }
                        nodes.remove(j);
                    }

                    nodes.insert(best_pos, id);
                    pass.set_rank_order(rank, nodes);
                    if best_pos != i {
                        relocated = true;
                    }
                }
            }
        }
    }

    /// The dummy graph can hide crossings between real multi-rank edges
    /// behind couple containers. Re-sweeps with real-edge adjacency for real
    /// nodes (dummies keep their graph neighbors, preserving route quality),
    /// scoring by crossings among same-span real edges only. Checks after
    /// each sweep direction separately, because a bottom-up sweep can undo a
    /// fix made by the preceding top-down sweep.
    fn repair_real_edge_crossings(&self, g: &LayoutGraph, pass: &mut Pass) {
        let mut real_succ: FxHashMap<&str, Vec<&str>> = FxHashMap::default();
        let mut real_pred: FxHashMap<&str, Vec<&str>> = FxHashMap::default();
        for (s, t) in &self.real_edges {
            if g.node(s).is_none() || g.node(t).is_none() {
                continue;
            }
            real_succ.entry(s).or_default().push(t);
            real_pred.entry(t).or_default().push(s);
        }
        let is_real = |id: &str| real_succ.contains_key(id) || real_pred.contains_key(id);

        let mut best_cc = self.real_edge_crossings(g, pass);
        let mut best_order = pass.orders.clone();

        let mut iter = 0;
        while iter < self.options.max_barycenter_iterations && best_cc > 0 {
            let ranks = pass.ranks.clone();
            for &rank in &ranks {
                self.real_barycenter(g, pass, rank, Direction::Up, &real_pred, &real_succ, &is_real);
            }
            let mut cc = self.real_edge_crossings(g, pass);
            if cc < best_cc {
                best_cc = cc;
                best_order = pass.orders.clone();
            }
            if cc == 0 {
                break;
            }

            for &rank in ranks.iter().rev() {
                self.real_barycenter(g, pass, rank, Direction::Down, &real_pred, &real_succ, &is_real);
            }
            cc = self.real_edge_crossings(g, pass);
            if cc < best_cc {
                best_cc = cc;
                best_order = pass.orders.clone();
            }
            if cc == 0 {
                break;
            }
            iter += 1;
        }

        pass.restore(best_order);
        tracing::debug!(crossings = best_cc, "real-edge repair done");
    }

    #[allow(clippy::too_many_arguments)]
    fn real_barycenter(
        &self,
        g: &LayoutGraph,
        pass: &mut Pass,
        rank: i32,
        dir: Direction,
        real_pred: &FxHashMap<&str, Vec<&str>>,
        real_succ: &FxHashMap<&str, Vec<&str>>,
        is_real: &dyn Fn(&str) -> bool,
    ) {
        let mut nodes = match pass.nodes_by_rank.get(&rank) {
            Some(nodes) if nodes.len() > 1 => nodes.clone(),
            _ => return,
        };

        let mut barycenters: FxHashMap<String, f64> = FxHashMap::default();
        for id in &nodes {
            let neighbors: Vec<&str> = if is_real(id) {
                match dir {
                    Direction::Up => real_pred.get(id.as_str()).cloned().unwrap_or_default(),
                    Direction::Down => real_succ.get(id.as_str()).cloned().unwrap_or_default(),
                }
            } else {
                match dir {
                    Direction::Up => g.predecessors(id),
                    Direction::Down => g.successors(id),
                }
            };
            let b = if neighbors.is_empty() {
                pass.orders[id] as f64
            } else {
                let sum: f64 = neighbors.iter().map(|n| pass.orders[*n] as f64).sum();
                sum / neighbors.len() as f64
            };
            barycenters.insert(id.clone(), b);
        }

        nodes.sort_by(|a, b| {
            let ba = barycenters[a];
            let bb = barycenters[b];
            ba.partial_cmp(&bb)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| pass.orders[a].cmp(&pass.orders[b]))
        });
        pass.set_rank_order(rank, nodes);
    }

    /// Crossings among real edges sharing the same source and target ranks.
    fn real_edge_crossings(&self, g: &LayoutGraph, pass: &Pass) -> usize {
        struct RealEdge {
            src_rank: i32,
            tgt_rank: i32,
            src_order: usize,
            tgt_order: usize,
        }
        let mut edges = Vec::new();
        for (s, t) in &self.real_edges {
            let (Some(sn), Some(tn)) = (g.node(s), g.node(t)) else {
                continue;
            };
            let (Some(sr), Some(tr)) = (sn.rank, tn.rank) else {
                continue;
            };
            edges.push(RealEdge {
                src_rank: sr,
                tgt_rank: tr,
                src_order: pass.orders[s],
                tgt_order: pass.orders[t],
            });
        }

        let mut crossings = 0;
        for i in 0..edges.len() {
            for j in i + 1..edges.len() {
                let (ei, ej) = (&edges[i], &edges[j]);
                if ei.src_rank != ej.src_rank || ei.tgt_rank != ej.tgt_rank {
                    continue;
                }
                let src = ei.src_order as i64 - ej.src_order as i64;
                let tgt = ei.tgt_order as i64 - ej.tgt_order as i64;
                if src * tgt < 0 {
                    crossings += 1;
                }
            }
        }
        crossings
    }

    /// Pulls each multiple-birth group into consecutive positions at the
    /// slot of its leftmost member, sub-ordered by identical group then
    /// birth date.
    fn consolidate_sibling_groups(&self, pass: &mut Pass) {
        let ranks = pass.ranks.clone();
        for rank in ranks {
            let nodes = pass.nodes_by_rank[&rank].clone();
            if nodes.len() <= 1 {
                continue;
            }

            let mut group_members: FxHashMap<&str, Vec<String>> = FxHashMap::default();
            for id in &nodes {
                if let Some(key) = self.node_multiple_group.get(id) {
                    group_members.entry(key).or_default().push(id.clone());
                }
            }

            let mut reordered = nodes;
            let mut changed = false;
            let mut groups: Vec<(&str, Vec<String>)> = group_members.into_iter().collect();
            groups.sort_by(|a, b| a.0.cmp(b.0));
            for (_, mut members) in groups {
                if members.len() <= 1 {
                    continue;
                }

                members.sort_by(|a, b| {
                    let (pa, pb) = match (self.persons.get(a), self.persons.get(b)) {
                        (Some(pa), Some(pb)) => (pa, pb),
                        _ => return std::cmp::Ordering::Equal,
                    };
                    let ga = self.identical_group_of(a).unwrap_or(pa.id.as_str());
                    let gb = self.identical_group_of(b).unwrap_or(pb.id.as_str());
                    ga.cmp(gb).then_with(|| {
                        pa.dob
                            .as_deref()
                            .unwrap_or("")
                            .cmp(pb.dob.as_deref().unwrap_or(""))
                    })
                });

                let member_set: std::collections::HashSet<&str> =
                    members.iter().map(String::as_str).collect();
                let insert_at = match reordered.iter().position(|n| member_set.contains(n.as_str())) {
                    Some(i) => i,
                    None => continue,
                };
                let mut filtered: Vec<String> = reordered
                    .iter()
                    .filter(|n| !member_set.contains(n.as_str()))
                    .cloned()
                    .collect();
                for (k, m) in members.iter().enumerate() {
                    filtered.insert(insert_at + k, m.clone());
                }
                reordered = filtered;
                changed = true;
            }

            if changed {
                pass.set_rank_order(rank, reordered);
            }
        }
    }
}

/// Mutable ordering state shared by the refinement phases: the per-rank node
/// sequences and the order index they imply.
struct Pass {
    ranks: Vec<i32>,
    nodes_by_rank: FxHashMap<i32, Vec<String>>,
    orders: FxHashMap<String, usize>,
}

impl Pass {
    fn from_seeded_graph(g: &LayoutGraph) -> Self {
        let mut nodes_by_rank: FxHashMap<i32, Vec<String>> = FxHashMap::default();
        let mut orders = FxHashMap::default();
        for id in g.node_ids() {
            let Some(lbl) = g.node(&id) else { continue };
            let Some(rank) = lbl.rank else { continue };
            orders.insert(id.clone(), lbl.order.unwrap_or(0));
            nodes_by_rank.entry(rank).or_default().push(id);
        }
        let mut ranks: Vec<i32> = nodes_by_rank.keys().copied().collect();
        ranks.sort_unstable();
        let mut pass = Self {
            ranks,
            nodes_by_rank,
            orders,
        };
        pass.sort_ranks_by_order();
        pass
    }

    fn sort_ranks_by_order(&mut self) {
        for nodes in self.nodes_by_rank.values_mut() {
            nodes.sort_by_key(|id| self.orders[id]);
        }
    }

    fn set_rank_order(&mut self, rank: i32, nodes: Vec<String>) {
        for (i, id) in nodes.iter().enumerate() {
            self.orders.insert(id.clone(), i);
        }
        self.nodes_by_rank.insert(rank, nodes);
    }

    fn restore(&mut self, orders: FxHashMap<String, usize>) {
        self.orders = orders;
        self.sort_ranks_by_order();
    }

    /// Crossings between `upper` and the rank below it, counted over the
    /// successor edges of the dummy-augmented graph.
    fn count_crossings(&self, g: &LayoutGraph, upper: i32, lower: i32) -> usize {
        let upper_nodes = match self.nodes_by_rank.get(&upper) {
            Some(nodes) => nodes,
            None => return 0,
        };

        let mut edges: Vec<(usize, usize)> = Vec::new();
        for u in upper_nodes {
            let u_order = self.orders[u];
            for s in g.successors(u) {
                let at_lower = g.node(s).and_then(|lbl| lbl.rank) == Some(lower);
                if at_lower {
                    edges.push((u_order, self.orders[s]));
                }
            }
        }

        let mut crossings = 0;
        for i in 0..edges.len() {
            for j in i + 1..edges.len() {
                let src = edges[i].0 as i64 - edges[j].0 as i64;
                let tgt = edges[i].1 as i64 - edges[j].1 as i64;
                if src * tgt < 0 {
                    crossings += 1;
                }
            }
        }
        crossings
    }

    fn total_crossings(&self, g: &LayoutGraph) -> usize {
        self.ranks
            .windows(2)
            .map(|w| self.count_crossings(g, w[0], w[1]))
            .sum()
    }
}
