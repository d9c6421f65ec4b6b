//! Attack modules, patterns and the firing driver.
//!
//! A weapon is an `AttackPattern`: an arena of `AttackModule`s plus the
//! ids of its entry modules. Firing walks the module graph:
//!
//! 1. `prepare(author)` binds the author and offers the entry modules
//! 2. the controller selects an offered module
//! 3. each of its targets is resolved, in declaration order, from the
//!    candidates the constraints allow
//! 4. the module's cost is paid and its effects applied atomically
//! 5. its unused successors are offered; with none left the firing ends
//!
//! `fire` runs these steps against a `Dispatcher`. Descriptors are loaded
//! from JSON through `AttackPattern::from_json` or a `WeaponRegistry`.

mod descriptor;
mod dispatch;
mod firing;
mod module;
mod pattern;
mod registry;

pub use descriptor::WeaponDescriptor;
pub use dispatch::{Choice, ChoiceRequest, Dispatcher, RandomDispatcher, ScriptedDispatcher};
pub use firing::{fire, FiringOutcome, FiringReport};
pub use module::AttackModule;
pub use pattern::{AttackPattern, ModuleReport, Phase};
pub use registry::WeaponRegistry;
