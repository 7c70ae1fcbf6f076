use thiserror::Error;

/// Fatal layout errors. A well-formed input (consistent ids, acyclic after the
/// acyclic transform) never produces one of these; when they do occur the
/// layout call aborts rather than attempting recovery.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LayoutError {
    #[error(transparent)]
    Graph(#[from] crate::graphlib::GraphError),

    /// Rank assignment needed to extract a node whose in-degree had not
    /// drained to zero, meaning the acyclic invariant was violated upstream.
    #[error("input graph is not acyclic at node `{0}`")]
    NotAcyclic(String),

    /// A min-heap decrease-key was asked to move a priority upwards.
    #[error("cannot decrease priority of `{key}` from {current} to {requested}")]
    PriorityIncrease {
        key: String,
        current: i64,
        requested: i64,
    },
}
