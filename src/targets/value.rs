//! Target kinds and resolved values.

use serde::{Deserialize, Serialize};

use crate::core::{CellId, PlayerId, RoomId};

/// What a target slot accepts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetKind {
    Player,
    Cell,
    Room,
}

impl std::fmt::Display for TargetKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            TargetKind::Player => "player",
            TargetKind::Cell => "cell",
            TargetKind::Room => "room",
        };
        f.write_str(name)
    }
}

/// A concrete board entity bound to a target slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetValue {
    Player(PlayerId),
    Cell(CellId),
    Room(RoomId),
}

impl TargetValue {
    #[must_use]
    pub fn kind(&self) -> TargetKind {
        match self {
            TargetValue::Player(_) => TargetKind::Player,
            TargetValue::Cell(_) => TargetKind::Cell,
            TargetValue::Room(_) => TargetKind::Room,
        }
    }

    #[must_use]
    pub fn as_player(&self) -> Option<PlayerId> {
        match self {
            TargetValue::Player(p) => Some(*p),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_cell(&self) -> Option<CellId> {
        match self {
            TargetValue::Cell(c) => Some(*c),
            _ => None,
        }
    }
}

impl std::fmt::Display for TargetValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TargetValue::Player(p) => write!(f, "{}", p),
            TargetValue::Cell(c) => write!(f, "{}", c),
            TargetValue::Room(r) => write!(f, "{}", r),
        }
    }
}
