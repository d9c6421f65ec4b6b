//! # rust-arena
//!
//! Rule-resolution core for a grid-based combat board game: weapons are
//! declarative attack patterns whose targets are filtered by constraints
//! over the board and whose effects write to the players' damage ledgers.
//!
//! ## Design Principles
//!
//! 1. **Data-Driven Weapons**: Weapons are JSON descriptors. Constraint,
//!    target and effect kinds are closed enums selected by their type tag.
//!
//! 2. **No Hidden State**: Every choice comes from an explicit
//!    `Dispatcher` passed by the caller. The engine holds no globals.
//!
//! 3. **Atomic Modules**: A module's cost and effects are staged on a
//!    cheap persistent copy of the roster (`im-rs`) and committed together,
//!    so an aborted firing never leaves a half-applied module behind.
//!
//! ## Modules
//!
//! - `core`: ids, `PlayerMap`, rules configuration, RNG, errors
//! - `board`: cells, rooms, distance/visibility/alignment queries
//! - `players`: damage and marking ledger, ammo, death scoring
//! - `targets`: coordinates, constraints, target slots
//! - `effects`: damage, marking and forced movement
//! - `attack`: attack modules and patterns, descriptors, firing driver
//!
//! ## Example
//!
//! ```
//! use rust_arena::{fire, AttackPattern, BoardBuilder, PlayerId, Roster, ScriptedDispatcher};
//!
//! let board = BoardBuilder::new()
//!     .room("red", &[(0, 0), (1, 0)])
//!     .build()
//!     .unwrap();
//!
//! let mut roster = Roster::new(["author", "victim"]);
//! roster.place(PlayerId::new(0), board.cell_at(0, 0)).unwrap();
//! roster.place(PlayerId::new(1), board.cell_at(1, 0)).unwrap();
//!
//! let mut pattern = AttackPattern::from_json(r#"{
//!   "first": [0],
//!   "content": [{
//!     "id": 0, "name": "basic", "description": "2 damage to a visible player",
//!     "summonCost": {"red": 0, "yellow": 0, "blue": 0},
//!     "targets": [{"type": "player", "constraints": [
//!       {"type": "visibility", "source": "author", "drain": "other", "truth": true}
//!     ]}],
//!     "effects": [{"type": "damage", "amount": 2, "target": [0, 0]}],
//!     "next": []
//!   }]
//! }"#).unwrap();
//!
//! let mut dispatcher = ScriptedDispatcher::picks([0, 0]);
//! fire(&mut pattern, &board, &mut roster, PlayerId::new(0), &mut dispatcher).unwrap();
//!
//! assert_eq!(roster.get(PlayerId::new(1)).unwrap().damage().len(), 2);
//! ```

pub mod core;
pub mod board;
pub mod players;
pub mod targets;
pub mod effects;
pub mod attack;

// Re-export commonly used types
pub use crate::core::{
    CellId, RoomId, ModuleId,
    PlayerId, PlayerMap,
    GameRng,
    RulesConfig, ScoringMode,
    BoardError, EngineError, LoadError, Result,
};

pub use crate::board::{Board, BoardBuilder, Cell, Room};

pub use crate::players::{AmmoCubes, DamageReport, Player, Roster};

pub use crate::targets::{Constraint, Coordinate, FilterContext, Target, TargetKind, TargetRef, TargetValue};

pub use crate::effects::{Effect, EffectOutcome, EffectResolver};

pub use crate::attack::{
    fire, AttackModule, AttackPattern, Choice, ChoiceRequest, Dispatcher,
    FiringOutcome, FiringReport, RandomDispatcher, ScriptedDispatcher,
    WeaponRegistry,
};
