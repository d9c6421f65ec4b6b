//! Effect definitions.
//!
//! Effects are the state mutations an attack module performs once its
//! targets are resolved. Each names what it applies to through a
//! [`Coordinate`]; the firing author is bound when the effect is applied.

use serde::{Deserialize, Serialize};

use crate::core::{CellId, PlayerId};
use crate::players::DamageReport;
use crate::targets::Coordinate;

/// An atomic weapon effect.
///
/// ## Recipients
///
/// `target` / `mover` coordinates resolve to players as follows:
/// - a player value: that player
/// - a cell value: every player on the cell except the author
/// - a room value: every player in the room except the author
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Effect {
    /// Deal `amount` damage, then convert the author's markings.
    Damage { amount: u32, target: Coordinate },

    /// Add up to `amount` markings, capped per author.
    Mark { amount: u32, target: Coordinate },

    /// Move a player to a cell at most `max_distance` steps away.
    ForceMove {
        #[serde(rename = "maxDistance")]
        max_distance: u32,
        mover: Coordinate,
        destination: Coordinate,
    },
}

impl Effect {
    pub fn damage(amount: u32, target: Coordinate) -> Self {
        Self::Damage { amount, target }
    }

    pub fn mark(amount: u32, target: Coordinate) -> Self {
        Self::Mark { amount, target }
    }

    pub fn force_move(max_distance: u32, mover: Coordinate, destination: Coordinate) -> Self {
        Self::ForceMove {
            max_distance,
            mover,
            destination,
        }
    }

    /// Type tag, as authored.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Damage { .. } => "damage",
            Self::Mark { .. } => "mark",
            Self::ForceMove { .. } => "forceMove",
        }
    }

    /// Every coordinate the effect reads.
    #[must_use]
    pub fn coordinates(&self) -> Vec<Coordinate> {
        match self {
            Self::Damage { target, .. } | Self::Mark { target, .. } => vec![*target],
            Self::ForceMove {
                mover, destination, ..
            } => vec![*mover, *destination],
        }
    }
}

/// What applying one effect did to one player.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EffectOutcome {
    Damaged { player: PlayerId, report: DamageReport },
    Marked { player: PlayerId, landed: usize },
    Moved { player: PlayerId, from: CellId, to: CellId },
}

impl EffectOutcome {
    #[must_use]
    pub fn player(&self) -> PlayerId {
        match self {
            Self::Damaged { player, .. } | Self::Marked { player, .. } | Self::Moved { player, .. } => *player,
        }
    }
}
