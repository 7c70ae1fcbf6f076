//! Label types carried on the working graph.

use serde::{Deserialize, Serialize};

/// Direction ranks grow in. The pipeline computes top-to-bottom internally;
/// [`crate::coordinate_system`] maps the result into the other directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RankDir {
    #[default]
    TB,
    BT,
    LR,
    RL,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NodeLabel {
    pub width: f64,
    pub height: f64,
    /// Layer index, set by rank assignment.
    pub rank: Option<i32>,
    /// Position within the rank, set by ordering.
    pub order: Option<usize>,
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub kind: NodeKind,
}

impl NodeLabel {
    pub fn is_dummy(&self) -> bool {
        matches!(self.kind, NodeKind::Dummy(_))
    }
}

/// Real nodes come from the caller; dummy nodes only exist between
/// normalization and de-normalization, and carry the data needed to rebuild
/// the original edge. Keeping this a tagged variant stops dummy-only fields
/// from leaking into real-node code paths.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum NodeKind {
    #[default]
    Real,
    Dummy(DummyInfo),
}

#[derive(Debug, Clone, PartialEq)]
pub struct DummyInfo {
    /// The multi-rank edge this dummy stands in for.
    pub origin: OriginalEdge,
    /// `Some(0)` on the first dummy of a chain, `Some(1)` on the last: the
    /// two route-bearing dummies whose coordinates become the edge's bend
    /// points. Interior dummies carry `None`.
    pub bend_index: Option<usize>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OriginalEdge {
    pub id: String,
    pub source: String,
    pub target: String,
    pub label: EdgeLabel,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EdgeLabel {
    /// Minimum number of ranks this edge must span.
    pub minlen: usize,
    /// Label box reserved along the route.
    pub width: f64,
    pub height: f64,
    /// Set by the acyclic transform when the edge was flipped to break a cycle.
    pub reversed: bool,
    /// Bend points, populated during de-normalization.
    pub points: Vec<Point>,
}

impl Default for EdgeLabel {
    fn default() -> Self {
        Self {
            minlen: 1,
            width: 0.0,
            height: 0.0,
            reversed: false,
            points: Vec::new(),
        }
    }
}
