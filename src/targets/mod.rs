//! Target model and constraint evaluator.
//!
//! - `Coordinate`: author, author's saved position, "any other", or an
//!   earlier target of the same pattern
//! - `Constraint`: Alignment, Distance, Identity, Order, Room, Visibility
//! - `Target`: a Player/Cell/Room slot holding its constraints and value
//! - `FilterContext`: read-only view of board, roster and resolved targets
//!
//! A target's candidates are the intersection of every constraint's filter
//! result. Constraints that point at other targets read them through
//! `ResolvedTargets`, which the attack pattern implements over its module
//! arena.

mod constraint;
mod context;
mod coordinate;
mod target;
mod value;

pub use constraint::Constraint;
pub use context::{FilterContext, NothingResolved, ResolvedTargets};
pub use coordinate::{Coordinate, TargetRef};
pub use target::Target;
pub use value::{TargetKind, TargetValue};
