//! Genogram (family-tree) layout on top of the `stemma` ranked-layout core.
//!
//! The hard part of laying out a genogram with a layered algorithm is that
//! partners must sit side by side on the same generation while the layout
//! only reasons about single nodes. This crate solves that with couple
//! containers: each mated pair is fed to the core as one wide node, a
//! genogram-aware ordering strategy minimizes crossings the dummy graph
//! cannot see, and the containers are dissolved again during post-processing
//! when partners, child-link routes, and sibling connections get their final
//! geometry.

pub mod crossings;
mod error;
mod layout;
pub mod model;
mod routing;

pub use crossings::{CrossingOptions, GenogramOrder};
pub use error::GenogramError;
pub use layout::{layout_genogram, layout_genogram_with_options};
pub use model::{
    ChildLink, GenogramLayout, IdenticalLink, LinkStyle, MateLink, MatePair, Person, PlacedPerson,
    Relation, Sizes,
};
