//! Public layout API and the phase driver.

use serde::{Deserialize, Serialize};

use crate::model::{EdgeLabel, NodeLabel, Point, RankDir};
use crate::order::{DefaultOrder, OrderStrategy};
use crate::{LayoutError, LayoutGraph, acyclic, coordinate_system, normalize, order, position, rank};

/// Layout tuning knobs. The defaults match what most diagram styles want;
/// `universal_sep` overrides both separations with a flat value that ignores
/// node widths.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Vertical gap between adjacent ranks.
    pub rank_sep: f64,
    /// Horizontal gap contributed by a real node.
    pub node_sep: f64,
    /// Horizontal gap contributed by a dummy (edge) node.
    pub edge_sep: f64,
    /// When set, used as the full per-node separation regardless of widths.
    pub universal_sep: Option<f64>,
    pub rank_dir: RankDir,
    /// Cap on barycenter sweeps during ordering.
    pub order_iterations: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            rank_sep: 30.0,
            node_sep: 50.0,
            edge_sep: 10.0,
            universal_sep: None,
            rank_dir: RankDir::TB,
            order_iterations: 24,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InputNode {
    pub id: String,
    pub width: f64,
    pub height: f64,
    /// Starting minimum for rank assignment. The node never ranks below this,
    /// though tree tightening may still move it relative to its neighbors.
    #[serde(default)]
    pub rank: Option<i32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputEdge {
    pub id: String,
    pub source: String,
    pub target: String,
    /// Minimum number of ranks the edge must span.
    #[serde(default = "default_minlen")]
    pub minlen: usize,
    /// Space reserved for an edge label along the route.
    #[serde(default)]
    pub label_width: f64,
    #[serde(default)]
    pub label_height: f64,
}

fn default_minlen() -> usize {
    1
}

impl Default for InputEdge {
    fn default() -> Self {
        Self {
            id: String::new(),
            source: String::new(),
            target: String::new(),
            minlen: 1,
            label_width: 0.0,
            label_height: 0.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacedNode {
    pub id: String,
    pub rank: i32,
    pub order: usize,
    /// Center coordinates.
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoutedEdge {
    pub id: String,
    /// Bend points, excluding the endpoints themselves. Empty for edges that
    /// span a single rank and for self-loops.
    pub points: Vec<Point>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Layout {
    pub nodes: Vec<PlacedNode>,
    pub edges: Vec<RoutedEdge>,
}

/// Lays out the graph with the built-in barycenter ordering.
pub fn layout(
    nodes: &[InputNode],
    edges: &[InputEdge],
    config: &Config,
) -> Result<Layout, LayoutError> {
    layout_with_strategy(nodes, edges, config, &mut DefaultOrder)
}

/// Lays out the graph with a caller-supplied ordering strategy.
pub fn layout_with_strategy(
    nodes: &[InputNode],
    edges: &[InputEdge],
    config: &Config,
    strategy: &mut dyn OrderStrategy,
) -> Result<Layout, LayoutError> {
    let mut g: LayoutGraph = LayoutGraph::new();
    let mut self_loops: Vec<String> = Vec::new();

    for n in nodes {
        g.add_node(
            &n.id,
            NodeLabel {
                width: n.width,
                height: n.height,
                rank: n.rank,
                ..Default::default()
            },
        )?;
    }
    for e in edges {
        // A self-loop contributes nothing to ranking or ordering; it comes
        // back in the output with an empty route.
        if e.source == e.target {
            if g.node(&e.source).is_none() {
                return Err(stemma_graphlib::GraphError::MissingNode(e.source.clone()).into());
            }
            self_loops.push(e.id.clone());
            continue;
        }
        g.add_edge(
            Some(&e.id),
            &e.source,
            &e.target,
            EdgeLabel {
                minlen: e.minlen,
                width: e.label_width,
                height: e.label_height,
                ..Default::default()
            },
        )?;
    }

    tracing::debug!(
        nodes = nodes.len(),
        edges = edges.len(),
        rank_dir = ?config.rank_dir,
        "layout start"
    );

    coordinate_system::adjust(&mut g, config.rank_dir);
    acyclic::run(&mut g)?;
    rank::run(&mut g)?;
    normalize::run(&mut g)?;
    strategy.assign_order(&mut g, &mut |g| order::run(g, config.order_iterations));
    position::run(&mut g, config);
    normalize::undo(&mut g)?;
    normalize::fixup_edge_points(&mut g);
    acyclic::undo(&mut g)?;
    coordinate_system::undo(&mut g, config.rank_dir);
    translate_to_origin(&mut g);

    let mut out = Layout::default();
    for id in g.node_ids() {
        if let Some(lbl) = g.node(&id) {
            out.nodes.push(PlacedNode {
                id,
                rank: lbl.rank.unwrap_or(0),
                order: lbl.order.unwrap_or(0),
                x: lbl.x.unwrap_or(0.0),
                y: lbl.y.unwrap_or(0.0),
            });
        }
    }
    for id in g.edge_ids() {
        if let Some(lbl) = g.edge(&id) {
            out.edges.push(RoutedEdge {
                id,
                points: lbl.points.clone(),
            });
        }
    }
    for id in self_loops {
        out.edges.push(RoutedEdge {
            id,
            points: Vec::new(),
        });
    }
    Ok(out)
}

/// Shifts everything so the bounding box's top-left corner sits at (0, 0).
/// Rank directions other than top-to-bottom can leave negative coordinates
/// behind after the coordinate-system mapping.
fn translate_to_origin(g: &mut LayoutGraph) {
    let mut min_x = f64::INFINITY;
    let mut min_y = f64::INFINITY;
    for id in g.node_ids() {
        if let Some(lbl) = g.node(&id) {
            min_x = min_x.min(lbl.x.unwrap_or(0.0) - lbl.width / 2.0);
            min_y = min_y.min(lbl.y.unwrap_or(0.0) - lbl.height / 2.0);
        }
    }
    if !min_x.is_finite() || !min_y.is_finite() {
        return;
    }
    if min_x == 0.0 && min_y == 0.0 {
        return;
    }
    for id in g.node_ids() {
        if let Some(lbl) = g.node_mut(&id) {
            lbl.x = Some(lbl.x.unwrap_or(0.0) - min_x);
            lbl.y = Some(lbl.y.unwrap_or(0.0) - min_y);
        }
    }
    for id in g.edge_ids() {
        if let Some(lbl) = g.edge_mut(&id) {
            for p in &mut lbl.points {
                p.x -= min_x;
                p.y -= min_y;
            }
        }
    }
}
