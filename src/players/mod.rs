//! Player ledger: damage, markings, ammo, position, deaths and score.
//!
//! - `Player`: one participant's ledger and mutation primitives
//! - `Roster`: all participants plus the rule constants, death scoring
//! - `AmmoCubes`: costs and ammo pools
//!
//! Only effect application mutates the ledger; constraint evaluation reads
//! it through shared references.

mod ammo;
mod ledger;
mod roster;

pub use ammo::AmmoCubes;
pub use ledger::{DamageReport, Player};
pub use roster::Roster;
