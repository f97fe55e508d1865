//! MODI Directory - The ordered set of live modules
//!
//! Modules are ordered by their place in the physical chain:
//! 1. hop distance from the network module
//! 2. left to right
//! 3. top to bottom
//!
//! Topology is learned one neighbour report at a time, so the order is
//! recomputed from a fresh snapshot on every query.

pub mod topology;
pub mod directory;

pub use topology::*;
pub use directory::*;
