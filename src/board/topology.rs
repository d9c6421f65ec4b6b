//! Board topology queries: adjacency, distance, visibility, alignment.
//!
//! Every query takes cell ids produced by the same board. An id the board
//! does not know is reported as `EngineError::UnknownCell`; an empty player
//! position never reaches this layer (it fails earlier as `NullCell`).

use std::collections::VecDeque;

use rustc_hash::FxHashMap;

use crate::core::{CellId, EngineError, Result, RoomId};

use super::cell::{Cell, Room};

/// Distance reported for cells with no path between them.
pub const UNREACHABLE: u32 = u32::MAX;

/// An immutable, room-partitioned board.
#[derive(Clone, Debug)]
pub struct Board {
    cells: Vec<Cell>,
    rooms: Vec<Room>,
    by_coord: FxHashMap<(i32, i32), CellId>,
}

impl Board {
    pub(crate) fn from_parts(
        cells: Vec<Cell>,
        rooms: Vec<Room>,
        by_coord: FxHashMap<(i32, i32), CellId>,
    ) -> Self {
        Self {
            cells,
            rooms,
            by_coord,
        }
    }

    /// Look up a cell.
    pub fn cell(&self, id: CellId) -> Result<&Cell> {
        self.cells.get(id.index()).ok_or(EngineError::UnknownCell(id))
    }

    /// Look up a room.
    #[must_use]
    pub fn room(&self, id: RoomId) -> Option<&Room> {
        self.rooms.get(id.index())
    }

    /// Cell at the given coordinates.
    #[must_use]
    pub fn cell_at(&self, x: i32, y: i32) -> Option<CellId> {
        self.by_coord.get(&(x, y)).copied()
    }

    /// All cells in id order.
    pub fn cells(&self) -> impl Iterator<Item = &Cell> {
        self.cells.iter()
    }

    /// All rooms in id order.
    pub fn rooms(&self) -> impl Iterator<Item = &Room> {
        self.rooms.iter()
    }

    /// Room containing `cell`.
    pub fn room_of(&self, cell: CellId) -> Result<RoomId> {
        Ok(self.cell(cell)?.room)
    }

    /// Cells of `room`, empty for an unknown room.
    #[must_use]
    pub fn cells_in(&self, room: RoomId) -> &[CellId] {
        self.room(room).map(Room::cells).unwrap_or(&[])
    }

    /// Cells one step away from `cell`.
    pub fn neighbours(&self, cell: CellId) -> Result<&[CellId]> {
        Ok(self.cell(cell)?.adjacent())
    }

    /// Whether `b` is one step away from `a`.
    pub fn is_adjacent(&self, a: CellId, b: CellId) -> Result<bool> {
        self.cell(b)?;
        Ok(self.cell(a)?.adjacent.contains(&b))
    }

    /// Shortest-path step count from `a` to `b`.
    ///
    /// Returns 0 for `a == b` and [`UNREACHABLE`] when no path exists.
    pub fn distance(&self, a: CellId, b: CellId) -> Result<u32> {
        self.cell(a)?;
        self.cell(b)?;
        if a == b {
            return Ok(0);
        }

        let mut seen = vec![false; self.cells.len()];
        let mut queue = VecDeque::new();
        seen[a.index()] = true;
        queue.push_back((a, 0u32));

        while let Some((current, steps)) = queue.pop_front() {
            for &next in self.cells[current.index()].adjacent() {
                if next == b {
                    return Ok(steps + 1);
                }
                if !seen[next.index()] {
                    seen[next.index()] = true;
                    queue.push_back((next, steps + 1));
                }
            }
        }

        Ok(UNREACHABLE)
    }

    /// Cells whose distance from `origin` lies in `min..=max`.
    pub fn cells_within(&self, origin: CellId, min: u32, max: u32) -> Result<Vec<CellId>> {
        let mut result = Vec::new();
        for cell in &self.cells {
            let d = self.distance(origin, cell.id)?;
            if d >= min && d <= max {
                result.push(cell.id);
            }
        }
        Ok(result)
    }

    /// Whether a player standing on `from` can see `room`.
    ///
    /// A room is visible when it is the viewer's own room or the room of
    /// any cell adjacent to the viewer (looking through a door).
    pub fn can_see_room(&self, from: CellId, room: RoomId) -> Result<bool> {
        let origin = self.cell(from)?;
        if origin.room == room {
            return Ok(true);
        }
        for &next in origin.adjacent() {
            if self.cell(next)?.room == room {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Whether a player standing on `a` can see cell `b`.
    pub fn can_see(&self, a: CellId, b: CellId) -> Result<bool> {
        if a == b {
            self.cell(a)?;
            return Ok(true);
        }
        let target_room = self.room_of(b)?;
        self.can_see_room(a, target_room)
    }

    /// Whether `a` and `b` share a row or a column.
    pub fn is_aligned(&self, a: CellId, b: CellId) -> Result<bool> {
        Ok(self.cell(a)?.is_aligned_with(self.cell(b)?))
    }

    /// Whether `gate` lies strictly between `source` and `drain` on a
    /// straight cardinal line.
    pub fn is_between(&self, source: CellId, gate: CellId, drain: CellId) -> Result<bool> {
        let s = self.cell(source)?;
        let g = self.cell(gate)?;
        let d = self.cell(drain)?;

        let strictly = |lo: i32, mid: i32, hi: i32| (lo < mid && mid < hi) || (hi < mid && mid < lo);

        if s.x == g.x && g.x == d.x {
            Ok(strictly(s.y, g.y, d.y))
        } else if s.y == g.y && g.y == d.y {
            Ok(strictly(s.x, g.x, d.x))
        } else {
            Ok(false)
        }
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::Board;
    use crate::board::BoardBuilder;

    /// Three rooms on a 4x2 grid.
    ///
    /// ```text
    ///   x:   0     1     2     3
    /// y=0  [R]   [R]   [R] | [Y]
    ///       ||                |
    /// y=1  [B]   [B] | [Y]   [Y]
    /// ```
    ///
    /// Doors: (0,0)-(0,1) and (2,0)-(2,1).
    pub(crate) fn three_rooms() -> Board {
        BoardBuilder::new()
            .room("red", &[(0, 0), (1, 0), (2, 0)])
            .room("blue", &[(0, 1), (1, 1)])
            .room("yellow", &[(2, 1), (3, 1), (3, 0)])
            .door((0, 0), (0, 1))
            .door((2, 0), (2, 1))
            .build()
            .expect("fixture board is valid")
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::three_rooms;
    use super::*;

    fn at(board: &Board, x: i32, y: i32) -> CellId {
        board.cell_at(x, y).unwrap()
    }

    #[test]
    fn test_distance_basics() {
        let board = three_rooms();
        let origin = at(&board, 0, 0);

        assert_eq!(board.distance(origin, origin).unwrap(), 0);
        assert_eq!(board.distance(origin, at(&board, 1, 0)).unwrap(), 1);
        assert_eq!(board.distance(origin, at(&board, 1, 1)).unwrap(), 2);
        // Through the red room and the second door.
        assert_eq!(board.distance(origin, at(&board, 3, 1)).unwrap(), 4);
        assert_eq!(board.distance(at(&board, 1, 1), at(&board, 2, 1)).unwrap(), 5);
    }

    #[test]
    fn test_unreachable() {
        let board = crate::board::BoardBuilder::new()
            .room("a", &[(0, 0)])
            .room("b", &[(5, 5)])
            .build()
            .unwrap();
        let a = at(&board, 0, 0);
        let b = at(&board, 5, 5);
        assert_eq!(board.distance(a, b).unwrap(), UNREACHABLE);
    }

    #[test]
    fn test_visibility() {
        let board = three_rooms();
        let origin = at(&board, 0, 0);

        assert!(board.can_see(origin, origin).unwrap());
        assert!(board.can_see(origin, at(&board, 2, 0)).unwrap());
        assert!(board.can_see(origin, at(&board, 1, 1)).unwrap());
        assert!(!board.can_see(origin, at(&board, 3, 1)).unwrap());

        // (1,0) has no door: only its own room is visible.
        let inner = at(&board, 1, 0);
        assert!(!board.can_see(inner, at(&board, 0, 1)).unwrap());
    }

    #[test]
    fn test_alignment_and_betweenness() {
        let board = three_rooms();
        let a = at(&board, 0, 0);
        let b = at(&board, 1, 0);
        let c = at(&board, 2, 0);

        assert!(board.is_aligned(a, a).unwrap());
        assert!(board.is_aligned(a, at(&board, 0, 1)).unwrap());
        assert!(!board.is_aligned(a, at(&board, 1, 1)).unwrap());

        assert!(board.is_between(a, b, c).unwrap());
        assert!(board.is_between(c, b, a).unwrap());
        assert!(!board.is_between(a, c, b).unwrap());
        assert!(!board.is_between(a, a, c).unwrap());
    }

    #[test]
    fn test_unknown_cell() {
        let board = three_rooms();
        let bogus = CellId::new(99);
        assert_eq!(
            board.distance(bogus, at(&board, 0, 0)),
            Err(EngineError::UnknownCell(bogus))
        );
        assert!(board.can_see(at(&board, 0, 0), bogus).is_err());
    }

    #[test]
    fn test_cells_within() {
        let board = three_rooms();
        let origin = at(&board, 0, 0);
        let ring = board.cells_within(origin, 1, 1).unwrap();
        assert_eq!(ring, vec![at(&board, 1, 0), at(&board, 0, 1)]);
    }
}
