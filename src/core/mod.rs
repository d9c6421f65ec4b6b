//! Core engine types: identifiers, per-player storage, rule constants,
//! RNG, and error types.

pub mod ids;
pub mod player;
pub mod rng;
pub mod config;
pub mod error;

pub use ids::{CellId, ModuleId, RoomId};
pub use player::{PlayerId, PlayerMap};
pub use rng::GameRng;
pub use config::{RulesConfig, ScoringMode};
pub use error::{BoardError, EngineError, LoadError, Result};
