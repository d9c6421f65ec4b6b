//! Effect resolution - executing effects on the player ledger.
//!
//! Resolution happens in two steps per effect:
//!
//! 1. `bind`: read the coordinates against the current view of the game
//!    and produce a concrete [`BoundEffect`].
//! 2. `apply`: perform the mutation on a roster.
//!
//! Binding each effect right before it is applied lets later effects of a
//! module see the positions earlier effects produced.

use tracing::debug;

use crate::core::{CellId, EngineError, PlayerId, Result};
use crate::players::Roster;
use crate::targets::{Coordinate, FilterContext, TargetKind, TargetValue};

use super::effect::{Effect, EffectOutcome};

/// An effect with every coordinate resolved.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BoundEffect {
    Damage { victims: Vec<PlayerId>, amount: u32 },
    Mark { victims: Vec<PlayerId>, amount: u32 },
    Move { player: PlayerId, to: CellId, max_distance: u32 },
}

/// Applies effects to the roster.
pub struct EffectResolver;

impl EffectResolver {
    /// Resolve an effect's coordinates into concrete recipients.
    pub fn bind(effect: &Effect, ctx: &FilterContext<'_>) -> Result<BoundEffect> {
        match effect {
            Effect::Damage { amount, target } => Ok(BoundEffect::Damage {
                victims: Self::recipients(*target, ctx)?,
                amount: *amount,
            }),
            Effect::Mark { amount, target } => Ok(BoundEffect::Mark {
                victims: Self::recipients(*target, ctx)?,
                amount: *amount,
            }),
            Effect::ForceMove {
                max_distance,
                mover,
                destination,
            } => {
                let player = match ctx.value_of(*mover)? {
                    TargetValue::Player(p) => p,
                    other => {
                        return Err(EngineError::KindMismatch {
                            expected: TargetKind::Player,
                            found: other.kind(),
                        })
                    }
                };
                let to = match ctx.value_of(*destination)? {
                    TargetValue::Cell(c) => c,
                    other => {
                        return Err(EngineError::KindMismatch {
                            expected: TargetKind::Cell,
                            found: other.kind(),
                        })
                    }
                };
                Ok(BoundEffect::Move {
                    player,
                    to,
                    max_distance: *max_distance,
                })
            }
        }
    }

    /// Apply a bound effect on behalf of `author`.
    ///
    /// Moves are re-checked against the board: a destination farther than
    /// the allowance is an `IllegalMove`.
    pub fn apply(
        roster: &mut Roster,
        board: &crate::board::Board,
        author: PlayerId,
        bound: &BoundEffect,
    ) -> Result<Vec<EffectOutcome>> {
        let mut outcomes = Vec::new();

        match bound {
            BoundEffect::Damage { victims, amount } => {
                for &victim in victims {
                    let report = roster.damage(victim, author, *amount as usize)?;
                    debug!(%author, %victim, amount, converted = report.converted, "damage applied");
                    outcomes.push(EffectOutcome::Damaged { player: victim, report });
                }
            }
            BoundEffect::Mark { victims, amount } => {
                for &victim in victims {
                    let landed = roster.mark(victim, author, *amount as usize)?;
                    debug!(%author, %victim, amount, landed, "marks applied");
                    outcomes.push(EffectOutcome::Marked { player: victim, landed });
                }
            }
            BoundEffect::Move {
                player,
                to,
                max_distance,
            } => {
                let from = roster.position_of(*player)?;
                board.cell(*to)?;
                if board.distance(from, *to)? > *max_distance {
                    return Err(EngineError::IllegalMove {
                        player: *player,
                        to: *to,
                        max_distance: *max_distance,
                    });
                }
                let moved = roster.get_mut(*player)?;
                moved.save_position();
                moved.set_position(Some(*to));
                debug!(%author, %player, %from, %to, "player moved");
                outcomes.push(EffectOutcome::Moved {
                    player: *player,
                    from,
                    to: *to,
                });
            }
        }

        Ok(outcomes)
    }

    /// Players an effect lands on.
    fn recipients(coordinate: Coordinate, ctx: &FilterContext<'_>) -> Result<Vec<PlayerId>> {
        let value = ctx.value_of(coordinate)?;
        let everyone_but_author = |ids: Vec<PlayerId>| -> Vec<PlayerId> {
            ids.into_iter().filter(|&p| p != ctx.author).collect()
        };
        match value {
            TargetValue::Player(p) => Ok(vec![p]),
            TargetValue::Cell(c) => Ok(everyone_but_author(ctx.roster.players_on(c))),
            TargetValue::Room(r) => Ok(everyone_but_author(ctx.roster.players_in_room(ctx.board, r)?)),
        }
    }
}
