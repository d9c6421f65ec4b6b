//! Board construction.

use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use tracing::debug;

use crate::core::{BoardError, CellId, RoomId};

use super::cell::{Cell, Room};
use super::topology::Board;

const MAX_ROOMS: usize = u8::MAX as usize + 1;
const MAX_CELLS: usize = u16::MAX as usize + 1;

/// Builder for a room-partitioned board.
///
/// Orthogonally neighbouring cells of the same room are joined
/// automatically. Cells of different rooms are only joined through doors.
///
/// ## Example
///
/// ```
/// use rust_arena::board::BoardBuilder;
///
/// let board = BoardBuilder::new()
///     .room("red", &[(0, 0), (1, 0)])
///     .room("blue", &[(0, 1), (1, 1)])
///     .door((0, 0), (0, 1))
///     .build()
///     .unwrap();
///
/// let a = board.cell_at(1, 0).unwrap();
/// let b = board.cell_at(1, 1).unwrap();
/// assert!(!board.is_adjacent(a, b).unwrap());
/// assert_eq!(board.distance(a, b).unwrap(), 3);
/// ```
#[derive(Clone, Debug, Default)]
pub struct BoardBuilder {
    rooms: Vec<(String, Vec<(i32, i32)>)>,
    doors: Vec<((i32, i32), (i32, i32))>,
}

impl BoardBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a room and its cells.
    #[must_use]
    pub fn room(mut self, name: impl Into<String>, cells: &[(i32, i32)]) -> Self {
        self.rooms.push((name.into(), cells.to_vec()));
        self
    }

    /// Open a door between two orthogonally neighbouring cells.
    #[must_use]
    pub fn door(mut self, a: (i32, i32), b: (i32, i32)) -> Self {
        self.doors.push((a, b));
        self
    }

    /// Validate the layout and build the board.
    pub fn build(self) -> Result<Board, BoardError> {
        if self.rooms.is_empty() {
            return Err(BoardError::Empty);
        }

        let mut cells: Vec<Cell> = Vec::new();
        let mut rooms: Vec<Room> = Vec::with_capacity(self.rooms.len());
        let mut by_coord: FxHashMap<(i32, i32), CellId> = FxHashMap::default();

        for (room_index, (name, coords)) in self.rooms.into_iter().enumerate() {
            let room_id = u8::try_from(room_index)
                .map(RoomId::new)
                .map_err(|_| BoardError::TooManyRooms(MAX_ROOMS))?;
            let mut members = Vec::with_capacity(coords.len());

            for (x, y) in coords {
                if by_coord.contains_key(&(x, y)) {
                    return Err(BoardError::DuplicateCell(x, y));
                }
                let id = u16::try_from(cells.len())
                    .map(CellId::new)
                    .map_err(|_| BoardError::TooManyCells(MAX_CELLS))?;
                by_coord.insert((x, y), id);
                cells.push(Cell {
                    id,
                    x,
                    y,
                    room: room_id,
                    adjacent: SmallVec::new(),
                });
                members.push(id);
            }

            rooms.push(Room {
                id: room_id,
                name,
                cells: members,
            });
        }

        // Walls everywhere except inside rooms and through doors.
        for index in 0..cells.len() {
            let (id, x, y, room) = (cells[index].id, cells[index].x, cells[index].y, cells[index].room);
            for (dx, dy) in [(1, 0), (0, 1)] {
                if let Some(&other) = by_coord.get(&(x + dx, y + dy)) {
                    if cells[other.index()].room == room {
                        link(&mut cells, id, other);
                    }
                }
            }
        }

        for ((ax, ay), (bx, by)) in self.doors {
            if (ax - bx).abs() + (ay - by).abs() != 1 {
                return Err(BoardError::NotNeighbours(ax, ay, bx, by));
            }
            let a = *by_coord.get(&(ax, ay)).ok_or(BoardError::MissingCell(ax, ay))?;
            let b = *by_coord.get(&(bx, by)).ok_or(BoardError::MissingCell(bx, by))?;
            link(&mut cells, a, b);
        }

        debug!(cells = cells.len(), rooms = rooms.len(), "board built");
        Ok(Board::from_parts(cells, rooms, by_coord))
    }
}

fn link(cells: &mut [Cell], a: CellId, b: CellId) {
    if a == b || cells[a.index()].adjacent.contains(&b) {
        return;
    }
    cells[a.index()].adjacent.push(b);
    cells[b.index()].adjacent.push(a);
}
