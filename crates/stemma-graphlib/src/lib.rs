//! Directed multigraph container used by the `stemma` layout crates.
//!
//! The graph keeps nodes and edges in insertion order (layout phases rely on a
//! stable iteration order for determinism) and maintains per-node adjacency
//! indices keyed by neighbor id, then by edge id, so parallel edges between the
//! same pair of nodes are supported.

use rustc_hash::FxBuildHasher;
use std::collections::BTreeMap;
use thiserror::Error;

type HashMap<K, V> = hashbrown::HashMap<K, V, FxBuildHasher>;

/// Structural errors. These indicate malformed input or an internal invariant
/// breach and abort the current operation; nothing is retried.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
    #[error("graph already has node `{0}`")]
    DuplicateNode(String),
    #[error("graph already has edge `{0}`")]
    DuplicateEdge(String),
    #[error("node `{0}` is not in the graph")]
    MissingNode(String),
    #[error("edge `{0}` is not in the graph")]
    MissingEdge(String),
}

#[derive(Debug, Clone)]
struct NodeEntry<N> {
    id: String,
    label: N,
}

#[derive(Debug, Clone)]
struct EdgeEntry<E> {
    id: String,
    source: String,
    target: String,
    label: E,
}

/// Adjacency index: neighbor id -> edge ids, in insertion order.
type AdjMap = BTreeMap<String, Vec<String>>;

pub struct Graph<N, E> {
    nodes: Vec<NodeEntry<N>>,
    node_index: HashMap<String, usize>,

    edges: Vec<EdgeEntry<E>>,
    edge_index: HashMap<String, usize>,

    out_adj: HashMap<String, AdjMap>,
    in_adj: HashMap<String, AdjMap>,

    next_anon_id: usize,
}

impl<N, E> Default for Graph<N, E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<N, E> Graph<N, E> {
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            node_index: HashMap::default(),
            edges: Vec::new(),
            edge_index: HashMap::default(),
            out_adj: HashMap::default(),
            in_adj: HashMap::default(),
            next_anon_id: 0,
        }
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn has_node(&self, id: &str) -> bool {
        self.node_index.contains_key(id)
    }

    pub fn add_node(&mut self, id: impl Into<String>, label: N) -> Result<(), GraphError> {
        let id = id.into();
        if self.node_index.contains_key(&id) {
            return Err(GraphError::DuplicateNode(id));
        }
        let idx = self.nodes.len();
        self.node_index.insert(id.clone(), idx);
        self.out_adj.insert(id.clone(), AdjMap::new());
        self.in_adj.insert(id.clone(), AdjMap::new());
        self.nodes.push(NodeEntry { id, label });
        Ok(())
    }

    pub fn node(&self, id: &str) -> Option<&N> {
        self.node_index.get(id).map(|&idx| &self.nodes[idx].label)
    }

    pub fn node_mut(&mut self, id: &str) -> Option<&mut N> {
        self.node_index
            .get(id)
            .copied()
            .map(move |idx| &mut self.nodes[idx].label)
    }

    /// Removes a node and every edge incident on it.
    pub fn remove_node(&mut self, id: &str) -> Result<N, GraphError> {
        if !self.node_index.contains_key(id) {
            return Err(GraphError::MissingNode(id.to_string()));
        }

        for e in self.incident_edges(id) {
            let _ = self.remove_edge(&e)?;
        }

        let idx = self
            .node_index
            .remove(id)
            .ok_or_else(|| GraphError::MissingNode(id.to_string()))?;
        self.out_adj.remove(id);
        self.in_adj.remove(id);
        let entry = self.nodes.remove(idx);

        // Re-derive the dense index table after the shift.
        self.node_index.clear();
        for (i, n) in self.nodes.iter().enumerate() {
            self.node_index.insert(n.id.clone(), i);
        }

        Ok(entry.label)
    }

    /// Node ids in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = &str> {
        self.nodes.iter().map(|n| n.id.as_str())
    }

    pub fn node_ids(&self) -> Vec<String> {
        self.nodes.iter().map(|n| n.id.clone()).collect()
    }

    pub fn has_edge(&self, id: &str) -> bool {
        self.edge_index.contains_key(id)
    }

    /// Adds an edge between two existing nodes. With `id: None` a fresh
    /// `_anonN` id is generated and returned.
    pub fn add_edge(
        &mut self,
        id: Option<&str>,
        source: &str,
        target: &str,
        label: E,
    ) -> Result<String, GraphError> {
        if !self.node_index.contains_key(source) {
            return Err(GraphError::MissingNode(source.to_string()));
        }
        if !self.node_index.contains_key(target) {
            return Err(GraphError::MissingNode(target.to_string()));
        }

        let id = match id {
            Some(id) => {
                if self.edge_index.contains_key(id) {
                    return Err(GraphError::DuplicateEdge(id.to_string()));
                }
                id.to_string()
            }
            None => loop {
                self.next_anon_id += 1;
                let candidate = format!("_anon{}", self.next_anon_id);
                if !self.edge_index.contains_key(&candidate) {
                    break candidate;
                }
            },
        };

        let idx = self.edges.len();
        self.edge_index.insert(id.clone(), idx);
        self.out_adj
            .get_mut(source)
            .expect("adjacency entry exists for every node")
            .entry(target.to_string())
            .or_default()
            .push(id.clone());
        self.in_adj
            .get_mut(target)
            .expect("adjacency entry exists for every node")
            .entry(source.to_string())
            .or_default()
            .push(id.clone());
        self.edges.push(EdgeEntry {
            id: id.clone(),
            source: source.to_string(),
            target: target.to_string(),
            label,
        });
        Ok(id)
    }

    pub fn edge(&self, id: &str) -> Option<&E> {
        self.edge_index.get(id).map(|&idx| &self.edges[idx].label)
    }

    pub fn edge_mut(&mut self, id: &str) -> Option<&mut E> {
        self.edge_index
            .get(id)
            .copied()
            .map(move |idx| &mut self.edges[idx].label)
    }

    pub fn source(&self, id: &str) -> Result<&str, GraphError> {
        self.edge_index
            .get(id)
            .map(|&idx| self.edges[idx].source.as_str())
            .ok_or_else(|| GraphError::MissingEdge(id.to_string()))
    }

    pub fn target(&self, id: &str) -> Result<&str, GraphError> {
        self.edge_index
            .get(id)
            .map(|&idx| self.edges[idx].target.as_str())
            .ok_or_else(|| GraphError::MissingEdge(id.to_string()))
    }

    pub fn remove_edge(&mut self, id: &str) -> Result<E, GraphError> {
        let idx = self
            .edge_index
            .remove(id)
            .ok_or_else(|| GraphError::MissingEdge(id.to_string()))?;
        let entry = self.edges.remove(idx);

        self.edge_index.clear();
        for (i, e) in self.edges.iter().enumerate() {
            self.edge_index.insert(e.id.clone(), i);
        }

        if let Some(adj) = self.out_adj.get_mut(&entry.source) {
            prune_adj(adj, &entry.target, id);
        }
        if let Some(adj) = self.in_adj.get_mut(&entry.target) {
            prune_adj(adj, &entry.source, id);
        }

        Ok(entry.label)
    }

    /// Edge ids in insertion order.
    pub fn edges(&self) -> impl Iterator<Item = &str> {
        self.edges.iter().map(|e| e.id.as_str())
    }

    pub fn edge_ids(&self) -> Vec<String> {
        self.edges.iter().map(|e| e.id.clone()).collect()
    }

    /// Ids of all edges leaving `v`.
    pub fn out_edges(&self, v: &str) -> Vec<String> {
        self.out_adj
            .get(v)
            .map(|adj| adj.values().flatten().cloned().collect())
            .unwrap_or_default()
    }

    /// Ids of all edges entering `v`.
    pub fn in_edges(&self, v: &str) -> Vec<String> {
        self.in_adj
            .get(v)
            .map(|adj| adj.values().flatten().cloned().collect())
            .unwrap_or_default()
    }

    /// Ids of all edges from `u` to `v`, in insertion order.
    pub fn edges_between(&self, u: &str, v: &str) -> Vec<String> {
        self.out_adj
            .get(u)
            .and_then(|adj| adj.get(v))
            .cloned()
            .unwrap_or_default()
    }

    /// Successor node ids. Parallel edges collapse to one logical neighbor.
    pub fn successors(&self, v: &str) -> Vec<&str> {
        self.out_adj
            .get(v)
            .map(|adj| adj.keys().map(|s| s.as_str()).collect())
            .unwrap_or_default()
    }

    /// Predecessor node ids. Parallel edges collapse to one logical neighbor.
    pub fn predecessors(&self, v: &str) -> Vec<&str> {
        self.in_adj
            .get(v)
            .map(|adj| adj.keys().map(|s| s.as_str()).collect())
            .unwrap_or_default()
    }

    /// Undirected neighbors of `v`, successors first.
    pub fn neighbors(&self, v: &str) -> Vec<&str> {
        let mut out: Vec<&str> = self.successors(v);
        for u in self.predecessors(v) {
            if !out.contains(&u) {
                out.push(u);
            }
        }
        out
    }

    fn incident_edges(&self, v: &str) -> Vec<String> {
        let mut out = self.out_edges(v);
        for e in self.in_edges(v) {
            if !out.contains(&e) {
                out.push(e);
            }
        }
        out
    }
}

impl<N: Clone, E: Clone> Graph<N, E> {
    /// Induced subgraph over `ids`: the named nodes plus every edge whose
    /// endpoints are both in the subset. Labels are cloned; callers that
    /// mutate the subgraph copy results back themselves.
    pub fn subgraph(&self, ids: &[String]) -> Graph<N, E> {
        let mut g: Graph<N, E> = Graph::new();
        for id in ids {
            if let Some(label) = self.node(id) {
                let _ = g.add_node(id.clone(), label.clone());
            }
        }
        for e in &self.edges {
            if g.has_node(&e.source) && g.has_node(&e.target) {
                let _ = g.add_edge(Some(&e.id), &e.source, &e.target, e.label.clone());
            }
        }
        g
    }
}

fn prune_adj(adj: &mut AdjMap, neighbor: &str, edge_id: &str) {
    if let Some(ids) = adj.get_mut(neighbor) {
        ids.retain(|e| e != edge_id);
        if ids.is_empty() {
            adj.remove(neighbor);
        }
    }
}

pub mod alg {
    use super::Graph;
    use rustc_hash::FxHashSet;

    /// Connected components under undirected traversal, using an explicit
    /// stack so deep graphs cannot overflow the call stack. Components and
    /// their members come out in node insertion order.
    pub fn components<N, E>(g: &Graph<N, E>) -> Vec<Vec<String>> {
        let mut seen: FxHashSet<String> = FxHashSet::default();
        let mut out: Vec<Vec<String>> = Vec::new();

        for start in g.node_ids() {
            if !seen.insert(start.clone()) {
                continue;
            }
            let mut component: Vec<String> = Vec::new();
            let mut stack: Vec<String> = vec![start];
            while let Some(v) = stack.pop() {
                for n in g.neighbors(&v) {
                    if seen.insert(n.to_string()) {
                        stack.push(n.to_string());
                    }
                }
                component.push(v);
            }
            out.push(component);
        }

        out
    }
}
