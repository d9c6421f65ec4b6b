//! Board topology: cells, rooms and the relations constraints are built on.
//!
//! - `Cell`: coordinates, room membership, symmetric adjacency
//! - `Room`: ordered set of cells
//! - `Board`: arena of cells and rooms with distance, adjacency,
//!   visibility and alignment queries
//! - `BoardBuilder`: declarative layout with walls and doors

mod builder;
mod cell;
mod topology;

pub use builder::BoardBuilder;
pub use cell::{Cell, Room};
pub use topology::{Board, UNREACHABLE};

#[cfg(test)]
pub(crate) use topology::fixtures;
