//! Weapon effects.
//!
//! - `Effect`: Damage, Mark and ForceMove as authored in descriptors
//! - `EffectResolver`: binds an effect's coordinates and applies it to the
//!   roster on behalf of the firing author
//!
//! Effects never decide who they hit on their own: every recipient comes
//! from a coordinate, so what a module does is fully determined by the
//! targets resolved before it is applied.

mod effect;
mod resolver;

pub use effect::{Effect, EffectOutcome};
pub use resolver::{BoundEffect, EffectResolver};
