//! Lookup structures consumed by the engine.

pub mod neighborhood;

pub use neighborhood::{builtin_points, NeighborhoodTable, ReferencePoint};
