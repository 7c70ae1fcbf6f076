//! Layered ("hierarchical") directed-graph layout.
//!
//! Given nodes with intrinsic sizes and directed edges, the pipeline assigns
//! each node an integer rank (layer) and order (position within its layer),
//! concrete center coordinates, and a polyline route per edge, while keeping
//! edge crossings low. The phases run in a fixed sequence:
//!
//! 1. [`acyclic`] reverses back-edges so the working graph is a DAG.
//! 2. [`rank`] assigns ranks (longest path + per-component tree tightening).
//! 3. [`normalize`] splits multi-rank edges into unit-length dummy chains.
//! 4. [`order`] minimizes crossings with barycenter sweeps; callers can swap
//!    in their own [`OrderStrategy`].
//! 5. [`position`] assigns coordinates (four-direction Brandes-Köpf).
//! 6. De-normalization folds dummy positions into edge routes and the
//!    back-edge reversal is undone.
//!
//! Everything is synchronous, single-threaded, and deterministic; no state
//! survives between [`layout`] calls.

pub use stemma_graphlib as graphlib;

pub mod acyclic;
pub mod coordinate_system;
pub mod data;
mod error;
mod layout;
pub mod model;
pub mod normalize;
pub mod order;
pub mod position;
pub mod rank;
pub mod util;

pub use error::LayoutError;
pub use layout::{Config, InputEdge, InputNode, Layout, PlacedNode, RoutedEdge, layout, layout_with_strategy};
pub use model::{DummyInfo, EdgeLabel, NodeKind, NodeLabel, OriginalEdge, Point, RankDir};
pub use order::{DefaultOrder, OrderStrategy};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// The working graph every phase operates on.
pub type LayoutGraph = graphlib::Graph<NodeLabel, EdgeLabel>;
