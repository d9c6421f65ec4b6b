//! Evaluation context shared by constraints and targets.

use crate::board::Board;
use crate::core::{CellId, EngineError, PlayerId, Result, RoomId};
use crate::players::Roster;

use super::coordinate::{Coordinate, TargetRef};
use super::value::{TargetKind, TargetValue};

/// Lookup of targets already resolved in the current firing.
///
/// Implemented by `AttackPattern`, whose module arena owns every target.
pub trait ResolvedTargets {
    /// Value bound to `target`, or an error if it does not exist or is
    /// still unresolved.
    fn resolved(&self, target: TargetRef) -> Result<TargetValue>;
}

/// Read-only view of the game used to evaluate constraints.
#[derive(Clone, Copy)]
pub struct FilterContext<'a> {
    pub board: &'a Board,
    pub roster: &'a Roster,
    pub author: PlayerId,
    pub resolved: &'a dyn ResolvedTargets,
}

impl<'a> FilterContext<'a> {
    pub fn new(
        board: &'a Board,
        roster: &'a Roster,
        author: PlayerId,
        resolved: &'a dyn ResolvedTargets,
    ) -> Self {
        Self {
            board,
            roster,
            author,
            resolved,
        }
    }

    /// Resolve a concrete coordinate.
    ///
    /// `AnyOther` has no value of its own; asking for one is an invalid
    /// filter invocation.
    pub fn value_of(&self, coordinate: Coordinate) -> Result<TargetValue> {
        match coordinate {
            Coordinate::Author => Ok(TargetValue::Player(self.author)),
            Coordinate::AuthorSavedPosition => {
                Ok(TargetValue::Cell(self.roster.saved_position_of(self.author)?))
            }
            Coordinate::AnyOther => Err(EngineError::InvalidFilter { found: 1 }),
            Coordinate::Target(r) => self.resolved.resolved(r),
        }
    }

    /// Cell a value stands for. Rooms have none.
    pub fn cell_of(&self, value: TargetValue, constraint: &'static str) -> Result<CellId> {
        match value {
            TargetValue::Player(p) => self.roster.position_of(p),
            TargetValue::Cell(c) => Ok(c),
            TargetValue::Room(_) => Err(EngineError::RoomNotPositional(constraint)),
        }
    }

    /// Room a value belongs to.
    pub fn room_of(&self, value: TargetValue) -> Result<RoomId> {
        match value {
            TargetValue::Room(r) => Ok(r),
            other => self.board.room_of(self.cell_of(other, "room")?),
        }
    }

    /// Every entity of `kind` that could fill a target, before constraints.
    ///
    /// Players must be on the board and are never the author.
    #[must_use]
    pub fn universe(&self, kind: TargetKind) -> Vec<TargetValue> {
        match kind {
            TargetKind::Player => self
                .roster
                .iter()
                .filter(|(id, p)| *id != self.author && p.position().is_some())
                .map(|(id, _)| TargetValue::Player(id))
                .collect(),
            TargetKind::Cell => self.board.cells().map(|c| TargetValue::Cell(c.id)).collect(),
            TargetKind::Room => self.board.rooms().map(|r| TargetValue::Room(r.id)).collect(),
        }
    }
}

/// Resolver for patterns that have nothing resolved yet.
pub struct NothingResolved;

impl ResolvedTargets for NothingResolved {
    fn resolved(&self, target: TargetRef) -> Result<TargetValue> {
        Err(EngineError::UnresolvedReference(target))
    }
}
