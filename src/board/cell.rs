//! Cells and rooms.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::{CellId, RoomId};

/// A square of the board.
///
/// Adjacency is fixed when the board is built: it is symmetric and a cell
/// is never adjacent to itself. `room` is a plain id, the owning `Room`
/// lives in the board's room arena.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    pub id: CellId,
    pub x: i32,
    pub y: i32,
    pub room: RoomId,
    pub(crate) adjacent: SmallVec<[CellId; 4]>,
}

impl Cell {
    /// Cells reachable in one step.
    #[must_use]
    pub fn adjacent(&self) -> &[CellId] {
        &self.adjacent
    }

    /// Whether this cell shares a row or a column with `other`.
    #[must_use]
    pub fn is_aligned_with(&self, other: &Cell) -> bool {
        self.x == other.x || self.y == other.y
    }
}

/// A room: an ordered set of cells.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    pub id: RoomId,
    pub name: String,
    pub(crate) cells: Vec<CellId>,
}

impl Room {
    /// Cells in declaration order.
    #[must_use]
    pub fn cells(&self) -> &[CellId] {
        &self.cells
    }

    #[must_use]
    pub fn contains(&self, cell: CellId) -> bool {
        self.cells.contains(&cell)
    }
}
