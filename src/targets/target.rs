//! Target slots.

use serde::{Deserialize, Serialize};

use crate::core::{EngineError, Result};

use super::constraint::Constraint;
use super::context::FilterContext;
use super::coordinate::TargetRef;
use super::value::{TargetKind, TargetValue};

/// A slot of an attack module to be filled with a player, cell or room.
///
/// The slot is unresolved when the weapon is loaded, resolved exactly once
/// per firing, and cleared when its pattern is reset.
///
/// ## Example
///
/// ```
/// use rust_arena::targets::{Constraint, Coordinate, Target, TargetKind};
///
/// // "One player you can see."
/// let target = Target::new(TargetKind::Player)
///     .with_constraint(Constraint::visibility(Coordinate::Author, Coordinate::AnyOther, true));
///
/// assert!(!target.is_resolved());
/// assert_eq!(target.constraints.len(), 1);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Target {
    #[serde(rename = "type")]
    pub kind: TargetKind,
    #[serde(default)]
    pub constraints: Vec<Constraint>,
    #[serde(skip)]
    value: Option<TargetValue>,
}

impl Target {
    /// An unconstrained slot.
    #[must_use]
    pub fn new(kind: TargetKind) -> Self {
        Self {
            kind,
            constraints: Vec::new(),
            value: None,
        }
    }

    /// Add a constraint (builder pattern).
    #[must_use]
    pub fn with_constraint(mut self, constraint: Constraint) -> Self {
        self.constraints.push(constraint);
        self
    }

    #[must_use]
    pub fn value(&self) -> Option<TargetValue> {
        self.value
    }

    #[must_use]
    pub fn is_resolved(&self) -> bool {
        self.value.is_some()
    }

    /// Entities that satisfy every constraint, in board/seat order.
    ///
    /// An empty result is a normal outcome: the slot cannot be filled.
    pub fn candidates(&self, ctx: &FilterContext<'_>) -> Result<Vec<TargetValue>> {
        let mut constraints = self.constraints.iter();
        let mut pool = match constraints.next() {
            Some(first) => first.filter(ctx, self.kind)?,
            None => ctx.universe(self.kind),
        };

        for constraint in constraints {
            if pool.is_empty() {
                break;
            }
            let allowed = constraint.filter(ctx, self.kind)?;
            pool.retain(|v| allowed.contains(v));
        }

        Ok(pool)
    }

    /// Bind the slot. `at` is this slot's own address, used in errors.
    pub(crate) fn resolve(&mut self, value: TargetValue, at: TargetRef) -> Result<()> {
        if self.value.is_some() {
            return Err(EngineError::TargetAlreadyResolved(at));
        }
        if value.kind() != self.kind {
            return Err(EngineError::KindMismatch {
                expected: self.kind,
                found: value.kind(),
            });
        }
        self.value = Some(value);
        Ok(())
    }

    pub(crate) fn reset(&mut self) {
        self.value = None;
    }
}
