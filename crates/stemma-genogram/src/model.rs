//! Input and output types.

use serde::{Deserialize, Serialize};
use stemma::Point;

/// One person in the genogram. `mother`/`father` are used to decide which
/// partner sits on which side of a couple and to group siblings; `multiple`
/// marks a multiple-birth group (same value for all twins/triplets of one
/// pregnancy); `identical` names the identical sibling, on both ends.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Person {
    pub id: String,
    #[serde(default)]
    pub mother: Option<String>,
    #[serde(default)]
    pub father: Option<String>,
    /// Chronological sort key, compared lexically ("YYYY-MM-DD" works).
    #[serde(default)]
    pub dob: Option<String>,
    #[serde(default)]
    pub multiple: Option<u32>,
    #[serde(default)]
    pub identical: Option<String>,
}

/// Two partners to be kept side by side on the same rank.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatePair {
    pub a: String,
    pub b: String,
}

/// A parent→child relation; one per parent, so a child with two known
/// parents appears in two relations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Relation {
    pub parent: String,
    pub child: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LinkStyle {
    /// Curved routes through the couple midpoint.
    #[default]
    Fan,
    /// Axis-aligned routes; couples get extra container width and an inset
    /// so the vertical runs stay clear of the symbols.
    Orthogonal,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct Sizes {
    /// Width of one person symbol.
    pub symbol_width: f64,
    pub symbol_height: f64,
    /// Horizontal gap between the two partners of a couple.
    pub couple_gap: f64,
    /// Horizontal gap between unrelated symbols on a rank.
    pub symbol_gap: f64,
    /// Vertical gap between generations.
    pub level_gap: f64,
}

impl Default for Sizes {
    fn default() -> Self {
        Self {
            symbol_width: 80.0,
            symbol_height: 80.0,
            couple_gap: 40.0,
            symbol_gap: 40.0,
            level_gap: 120.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacedPerson {
    pub id: String,
    /// Center coordinates.
    pub x: f64,
    pub y: f64,
}

/// A routed parent→child connection. Vertices are interior route points;
/// the route starts at the parent's center and ends at the top edge of the
/// child symbol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChildLink {
    pub parent: String,
    pub child: String,
    pub vertices: Vec<Point>,
}

/// Horizontal partner connection, anchored at both symbol centers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MateLink {
    pub a: String,
    pub b: String,
}

/// Connects the child links of two identical siblings. The anchors are
/// ratios along each link's polyline (0 at the parent end, 1 at the child),
/// placed a fixed vertical offset above the children.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdenticalLink {
    pub child_a: String,
    pub child_b: String,
    pub ratio_a: f64,
    pub ratio_b: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GenogramLayout {
    pub persons: Vec<PlacedPerson>,
    pub child_links: Vec<ChildLink>,
    pub mate_links: Vec<MateLink>,
    pub identical_links: Vec<IdenticalLink>,
}
