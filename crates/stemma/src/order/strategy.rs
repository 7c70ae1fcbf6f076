//! Pluggable ordering.

use crate::LayoutGraph;

/// Assigns every node's `order` field. Implementations receive the working
/// graph after normalization (ranks set, dummies present) and a handle to the
/// built-in barycenter ordering, which they can run as a building block or
/// skip entirely. Whatever the strategy does, every ranked node must end up
/// with a contiguous `order` starting at 0 within its rank.
pub trait OrderStrategy {
    fn assign_order(
        &mut self,
        g: &mut LayoutGraph,
        default_order: &mut dyn FnMut(&mut LayoutGraph),
    );
}

/// Runs the built-in barycenter ordering unchanged.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultOrder;

impl OrderStrategy for DefaultOrder {
    fn assign_order(
        &mut self,
        g: &mut LayoutGraph,
        default_order: &mut dyn FnMut(&mut LayoutGraph),
    ) {
        default_order(g);
    }
}
