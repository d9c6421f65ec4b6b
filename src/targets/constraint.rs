//! Constraints: predicates over board and player relations.
//!
//! Each constraint names its operands through [`Coordinate`]s. Two
//! operations:
//!
//! - `verify`: evaluate with every operand already resolved.
//! - `filter`: exactly one operand is `AnyOther`; enumerate the entities
//!   that would make the constraint hold when bound to that operand.
//!
//! Constraints never mutate the game.

use serde::{Deserialize, Serialize};
use smallvec::{smallvec, SmallVec};
use tracing::trace;

use crate::core::{EngineError, Result};

use super::context::FilterContext;
use super::coordinate::Coordinate;
use super::value::{TargetKind, TargetValue};

/// A predicate restricting which entities may fill a target.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Constraint {
    /// Source and drain share a row or a column.
    Alignment {
        source: Coordinate,
        drain: Coordinate,
        truth: bool,
    },
    /// Shortest-path distance between source and drain is within bounds.
    Distance {
        source: Coordinate,
        drain: Coordinate,
        #[serde(rename = "lowerBound")]
        lower_bound: u32,
        /// `None` means unbounded; authored as a negative number.
        #[serde(rename = "upperBound", with = "upper_bound")]
        upper_bound: Option<u32>,
    },
    /// Source and drain are the same entity.
    Identity {
        source: Coordinate,
        drain: Coordinate,
        truth: bool,
    },
    /// Gate lies strictly between source and drain on a cardinal line.
    Order {
        source: Coordinate,
        gate: Coordinate,
        drain: Coordinate,
    },
    /// Source and drain are in the same room.
    Room {
        source: Coordinate,
        drain: Coordinate,
        truth: bool,
    },
    /// Drain is visible from source.
    Visibility {
        source: Coordinate,
        drain: Coordinate,
        truth: bool,
    },
}

impl Constraint {
    pub fn alignment(source: Coordinate, drain: Coordinate, truth: bool) -> Self {
        Self::Alignment { source, drain, truth }
    }

    pub fn distance(source: Coordinate, drain: Coordinate, lower_bound: u32, upper_bound: Option<u32>) -> Self {
        Self::Distance {
            source,
            drain,
            lower_bound,
            upper_bound,
        }
    }

    pub fn identity(source: Coordinate, drain: Coordinate, truth: bool) -> Self {
        Self::Identity { source, drain, truth }
    }

    pub fn order(source: Coordinate, gate: Coordinate, drain: Coordinate) -> Self {
        Self::Order { source, gate, drain }
    }

    pub fn room(source: Coordinate, drain: Coordinate, truth: bool) -> Self {
        Self::Room { source, drain, truth }
    }

    pub fn visibility(source: Coordinate, drain: Coordinate, truth: bool) -> Self {
        Self::Visibility { source, drain, truth }
    }

    /// Type tag, as authored.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Alignment { .. } => "alignment",
            Self::Distance { .. } => "distance",
            Self::Identity { .. } => "identity",
            Self::Order { .. } => "order",
            Self::Room { .. } => "room",
            Self::Visibility { .. } => "visibility",
        }
    }

    /// Whether the constraint needs a position on every operand.
    #[must_use]
    pub fn is_positional(&self) -> bool {
        matches!(self, Self::Alignment { .. } | Self::Distance { .. } | Self::Order { .. })
    }

    /// Operands in evaluation order: source, drain, then gate for `Order`.
    #[must_use]
    pub fn coordinates(&self) -> SmallVec<[Coordinate; 3]> {
        match self {
            Self::Alignment { source, drain, .. }
            | Self::Distance { source, drain, .. }
            | Self::Identity { source, drain, .. }
            | Self::Room { source, drain, .. }
            | Self::Visibility { source, drain, .. } => smallvec![*source, *drain],
            Self::Order { source, gate, drain } => smallvec![*source, *drain, *gate],
        }
    }

    /// Operands read as a position, which a room cannot provide.
    #[must_use]
    pub fn positioned_operands(&self) -> SmallVec<[Coordinate; 3]> {
        match self {
            Self::Alignment { .. } | Self::Distance { .. } | Self::Order { .. } => self.coordinates(),
            Self::Visibility { source, .. } => smallvec![*source],
            Self::Identity { .. } | Self::Room { .. } => SmallVec::new(),
        }
    }

    /// Number of `AnyOther` operands.
    #[must_use]
    pub fn open_sides(&self) -> usize {
        self.coordinates().iter().filter(|c| c.is_any_other()).count()
    }

    /// Evaluate with every operand already resolved.
    pub fn verify(&self, ctx: &FilterContext<'_>) -> Result<bool> {
        let open = self.open_sides();
        if open > 0 {
            return Err(EngineError::InvalidFilter { found: open });
        }
        let values = self
            .coordinates()
            .into_iter()
            .map(|c| ctx.value_of(c))
            .collect::<Result<SmallVec<[TargetValue; 3]>>>()?;
        self.holds(ctx, &values)
    }

    /// Entities of `kind` that satisfy the constraint when bound to the
    /// `AnyOther` operand. The author is never a candidate.
    pub fn filter(&self, ctx: &FilterContext<'_>, kind: TargetKind) -> Result<Vec<TargetValue>> {
        let coordinates = self.coordinates();
        let open = self.open_sides();
        if open != 1 {
            return Err(EngineError::InvalidFilter { found: open });
        }

        let mut slot = 0;
        let mut values: SmallVec<[TargetValue; 3]> = SmallVec::new();
        for (i, coordinate) in coordinates.iter().enumerate() {
            if coordinate.is_any_other() {
                slot = i;
                // Placeholder, overwritten per candidate.
                values.push(TargetValue::Player(ctx.author));
            } else {
                values.push(ctx.value_of(*coordinate)?);
            }
        }

        let mut accepted = Vec::new();
        for candidate in ctx.universe(kind) {
            values[slot] = candidate;
            if self.holds(ctx, &values)? {
                accepted.push(candidate);
            }
        }

        trace!(constraint = self.name(), ?kind, accepted = accepted.len(), "filtered");
        Ok(accepted)
    }

    fn holds(&self, ctx: &FilterContext<'_>, values: &[TargetValue]) -> Result<bool> {
        let name = self.name();
        match self {
            Self::Alignment { truth, .. } => {
                let a = ctx.cell_of(values[0], name)?;
                let b = ctx.cell_of(values[1], name)?;
                Ok(ctx.board.is_aligned(a, b)? == *truth)
            }
            Self::Distance {
                lower_bound,
                upper_bound,
                ..
            } => {
                let a = ctx.cell_of(values[0], name)?;
                let b = ctx.cell_of(values[1], name)?;
                let d = ctx.board.distance(a, b)?;
                Ok(d >= *lower_bound && upper_bound.map_or(true, |upper| d <= upper))
            }
            Self::Identity { truth, .. } => {
                let (a, b) = (values[0], values[1]);
                if a.kind() != b.kind() {
                    return Err(EngineError::KindMismatch {
                        expected: a.kind(),
                        found: b.kind(),
                    });
                }
                Ok((a == b) == *truth)
            }
            Self::Order { .. } => {
                let source = ctx.cell_of(values[0], name)?;
                let drain = ctx.cell_of(values[1], name)?;
                let gate = ctx.cell_of(values[2], name)?;
                ctx.board.is_between(source, gate, drain)
            }
            Self::Room { truth, .. } => {
                let a = ctx.room_of(values[0])?;
                let b = ctx.room_of(values[1])?;
                Ok((a == b) == *truth)
            }
            Self::Visibility { truth, .. } => {
                let from = ctx.cell_of(values[0], name)?;
                let seen = match values[1] {
                    TargetValue::Room(room) => ctx.board.can_see_room(from, room)?,
                    other => ctx.board.can_see(from, ctx.cell_of(other, name)?)?,
                };
                Ok(seen == *truth)
            }
        }
    }
}

/// Negative upper bounds mean "no upper bound" on the wire.
mod upper_bound {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Option<u32>, serializer: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(v) => serializer.serialize_i64(i64::from(*v)),
            None => serializer.serialize_i64(-1),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u32>, D::Error> {
        let raw = i64::deserialize(deserializer)?;
        if raw < 0 {
            Ok(None)
        } else {
            u32::try_from(raw).map(Some).map_err(serde::de::Error::custom)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{fixtures, Board};
    use crate::core::{CellId, PlayerId};
    use crate::players::Roster;
    use crate::targets::context::NothingResolved;

    const AUTHOR: PlayerId = PlayerId::new(0);

    fn cell(board: &Board, x: i32, y: i32) -> CellId {
        board.cell_at(x, y).unwrap()
    }

    /// Author at (0,0); P1 same cell, P2 (1,0), P3 (2,0), P4 (1,1), P5 (3,1).
    fn table(board: &Board) -> Roster {
        let mut roster = Roster::new(["author", "p1", "p2", "p3", "p4", "p5"]);
        let spots = [(0, 0), (0, 0), (1, 0), (2, 0), (1, 1), (3, 1)];
        for (i, (x, y)) in spots.into_iter().enumerate() {
            roster.place(PlayerId::new(i as u8), Some(cell(board, x, y))).unwrap();
        }
        roster
    }

    fn players(ids: &[u8]) -> Vec<TargetValue> {
        ids.iter().map(|&i| TargetValue::Player(PlayerId::new(i))).collect()
    }

    #[test]
    fn test_visibility_filter() {
        let board = fixtures::three_rooms();
        let roster = table(&board);
        let ctx = FilterContext::new(&board, &roster, AUTHOR, &NothingResolved);

        let seen = Constraint::visibility(Coordinate::Author, Coordinate::AnyOther, true)
            .filter(&ctx, TargetKind::Player)
            .unwrap();
        assert_eq!(seen, players(&[1, 2, 3, 4]));

        let hidden = Constraint::visibility(Coordinate::Author, Coordinate::AnyOther, false)
            .filter(&ctx, TargetKind::Player)
            .unwrap();
        assert_eq!(hidden, players(&[5]));
    }

    #[test]
    fn test_identity_and_room_never_offer_author() {
        let board = fixtures::three_rooms();
        let roster = table(&board);
        let ctx = FilterContext::new(&board, &roster, AUTHOR, &NothingResolved);

        let same = Constraint::identity(Coordinate::Author, Coordinate::AnyOther, true)
            .filter(&ctx, TargetKind::Player)
            .unwrap();
        assert!(same.is_empty());

        let same_room = Constraint::room(Coordinate::AnyOther, Coordinate::Author, true)
            .filter(&ctx, TargetKind::Player)
            .unwrap();
        assert_eq!(same_room, players(&[1, 2, 3]));
    }

    #[test]
    fn test_distance_filter_on_cells() {
        let board = fixtures::three_rooms();
        let roster = table(&board);
        let ctx = FilterContext::new(&board, &roster, AUTHOR, &NothingResolved);

        let ring = Constraint::distance(Coordinate::Author, Coordinate::AnyOther, 1, Some(1))
            .filter(&ctx, TargetKind::Cell)
            .unwrap();
        assert_eq!(
            ring,
            vec![TargetValue::Cell(cell(&board, 1, 0)), TargetValue::Cell(cell(&board, 0, 1))]
        );

        let far = Constraint::distance(Coordinate::Author, Coordinate::AnyOther, 4, None)
            .filter(&ctx, TargetKind::Player)
            .unwrap();
        assert_eq!(far, players(&[5]));
    }

    #[test]
    fn test_alignment_and_order() {
        let board = fixtures::three_rooms();
        let roster = table(&board);
        let ctx = FilterContext::new(&board, &roster, AUTHOR, &NothingResolved);

        let aligned = Constraint::alignment(Coordinate::Author, Coordinate::AnyOther, true)
            .filter(&ctx, TargetKind::Player)
            .unwrap();
        assert_eq!(aligned, players(&[1, 2, 3]));

        // Cells strictly between the author and (2,0).
        let mut roster = roster;
        roster.get_mut(AUTHOR).unwrap().save_position();
        roster.place(AUTHOR, Some(cell(&board, 2, 0))).unwrap();
        let ctx = FilterContext::new(&board, &roster, AUTHOR, &NothingResolved);
        let gates = Constraint::order(Coordinate::AuthorSavedPosition, Coordinate::AnyOther, Coordinate::Author)
            .filter(&ctx, TargetKind::Cell)
            .unwrap();
        assert_eq!(gates, vec![TargetValue::Cell(cell(&board, 1, 0))]);
    }

    #[test]
    fn test_visibility_of_rooms() {
        let board = fixtures::three_rooms();
        let roster = table(&board);
        let ctx = FilterContext::new(&board, &roster, AUTHOR, &NothingResolved);

        let rooms = Constraint::visibility(Coordinate::Author, Coordinate::AnyOther, true)
            .filter(&ctx, TargetKind::Room)
            .unwrap();
        let ids: Vec<_> = rooms.iter().map(|r| r.to_string()).collect();
        assert_eq!(ids, vec!["Room(0)", "Room(1)"]);
    }

    #[test]
    fn test_invalid_filter_invocations() {
        let board = fixtures::three_rooms();
        let roster = table(&board);
        let ctx = FilterContext::new(&board, &roster, AUTHOR, &NothingResolved);

        let closed = Constraint::identity(Coordinate::Author, Coordinate::Author, true);
        assert_eq!(
            closed.filter(&ctx, TargetKind::Player),
            Err(EngineError::InvalidFilter { found: 0 })
        );
        assert_eq!(closed.verify(&ctx), Ok(true));

        let open = Constraint::identity(Coordinate::AnyOther, Coordinate::AnyOther, true);
        assert_eq!(
            open.filter(&ctx, TargetKind::Player),
            Err(EngineError::InvalidFilter { found: 2 })
        );
        assert_eq!(open.verify(&ctx), Err(EngineError::InvalidFilter { found: 2 }));
    }

    #[test]
    fn test_unresolved_and_positional_errors() {
        let board = fixtures::three_rooms();
        let roster = table(&board);
        let ctx = FilterContext::new(&board, &roster, AUTHOR, &NothingResolved);

        let dangling = Constraint::identity(Coordinate::target(0, 0), Coordinate::AnyOther, false);
        assert!(matches!(
            dangling.filter(&ctx, TargetKind::Player),
            Err(EngineError::UnresolvedReference(_))
        ));

        let on_rooms = Constraint::distance(Coordinate::Author, Coordinate::AnyOther, 0, None);
        assert_eq!(
            on_rooms.filter(&ctx, TargetKind::Room),
            Err(EngineError::RoomNotPositional("distance"))
        );
    }

    #[test]
    fn test_author_off_board_is_null_cell() {
        let board = fixtures::three_rooms();
        let mut roster = table(&board);
        roster.place(AUTHOR, None).unwrap();
        let ctx = FilterContext::new(&board, &roster, AUTHOR, &NothingResolved);

        let c = Constraint::visibility(Coordinate::Author, Coordinate::AnyOther, true);
        assert_eq!(c.filter(&ctx, TargetKind::Player), Err(EngineError::NullCell(AUTHOR)));
    }

    #[test]
    fn test_descriptor_form() {
        let json = r#"{"type":"distance","source":[-1,-1],"drain":[-3,-3],"lowerBound":1,"upperBound":-1}"#;
        let c: Constraint = serde_json::from_str(json).unwrap();
        assert_eq!(c, Constraint::distance(Coordinate::Author, Coordinate::AnyOther, 1, None));

        let json = r#"{"type":"order","source":"author","gate":[0,0],"drain":"other"}"#;
        let c: Constraint = serde_json::from_str(json).unwrap();
        assert_eq!(c.open_sides(), 1);
        assert!(c.is_positional());

        let missing_truth = r#"{"type":"room","source":[-1,-1],"drain":[-3,-3]}"#;
        assert!(serde_json::from_str::<Constraint>(missing_truth).is_err());
        let unknown = r#"{"type":"telepathy","source":[-1,-1],"drain":[-3,-3]}"#;
        assert!(serde_json::from_str::<Constraint>(unknown).is_err());
    }
}
