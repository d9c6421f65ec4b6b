//! Error types for the attack-resolution engine.
//!
//! Three families:
//! - `EngineError`: runtime contract violations. A caller misused the
//!   engine; these are never a normal gameplay outcome.
//! - `LoadError`: malformed weapon descriptors, raised at load time.
//! - `BoardError`: inconsistent board layouts, raised at build time.
//!
//! Recoverable gameplay conditions (no valid targets, unaffordable cost)
//! are reported through ordinary return values, not through these types.

use crate::core::{CellId, ModuleId, PlayerId};
use crate::targets::{TargetKind, TargetRef};

/// Runtime contract violations.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    #[error("null cell operation: {0} is not on the board")]
    NullCell(PlayerId),

    #[error("null cell operation: {0} has no saved position")]
    NoSavedPosition(PlayerId),

    #[error("invalid filter invocation: expected exactly one `other` coordinate, found {found}")]
    InvalidFilter { found: usize },

    #[error("attack pattern has no bound author")]
    NoAuthor,

    #[error("target {0} is already resolved")]
    TargetAlreadyResolved(TargetRef),

    #[error("target {0} is referenced before it was resolved")]
    UnresolvedReference(TargetRef),

    #[error("target {0} does not exist")]
    UnknownTarget(TargetRef),

    #[error("target {target} resolved before earlier target {pending}")]
    TargetOutOfOrder { target: TargetRef, pending: TargetRef },

    #[error("value chosen for target {0} is not an eligible candidate")]
    IneligibleTarget(TargetRef),

    #[error("unknown attack module {0}")]
    UnknownModule(ModuleId),

    #[error("{0} is not currently offered")]
    ModuleNotOffered(ModuleId),

    #[error("{0} still has unresolved targets")]
    ModuleIncomplete(ModuleId),

    #[error("operation not allowed while the pattern is {0}")]
    WrongPhase(&'static str),

    #[error("a room has no position: {0} constraints are undefined on rooms")]
    RoomNotPositional(&'static str),

    #[error("expected a {expected} value, found a {found} value")]
    KindMismatch { expected: TargetKind, found: TargetKind },

    #[error("{player} cannot be moved to {to}: farther than {max_distance} steps")]
    IllegalMove {
        player: PlayerId,
        to: CellId,
        max_distance: u32,
    },

    #[error("unknown player {0}")]
    UnknownPlayer(PlayerId),

    #[error("unknown cell {0}")]
    UnknownCell(CellId),

    #[error("{0} cannot pay the ammo cost of {1}")]
    Unaffordable(PlayerId, ModuleId),

    #[error("dispatcher picked option {index} out of {options}")]
    InvalidChoice { index: usize, options: usize },
}

/// Errors raised while loading weapon descriptors.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("malformed weapon descriptor: {0}")]
    Json(#[from] serde_json::Error),

    #[error("module ids must be dense and in order: position {position} holds id {found}")]
    NonDenseModuleId { position: usize, found: ModuleId },

    #[error("weapon has no entry modules")]
    NoEntryModules,

    #[error("{from} links to unknown module {to}")]
    DanglingLink { from: &'static str, to: ModuleId },

    #[error("coordinate ({0}, {1}) is not a valid sentinel or target reference")]
    InvalidCoordinate(i32, i32),

    #[error("unknown coordinate name `{0}`")]
    UnknownSentinel(String),

    #[error("coordinate in {location} refers to missing target {target}")]
    DanglingReference { location: String, target: TargetRef },

    #[error("coordinate in {location} refers to target {target} that is not resolved earlier")]
    ForwardReference { location: String, target: TargetRef },

    #[error("constraint in {location} must have exactly one `other` coordinate, found {found}")]
    NotFilterable { location: String, found: usize },

    #[error("{constraint} constraint in {location} is undefined on room targets")]
    PositionalOnRoom {
        location: String,
        constraint: &'static str,
    },

    #[error("identity constraint in {location} compares a {left} value with a {right} value")]
    IdentityKindMismatch {
        location: String,
        left: TargetKind,
        right: TargetKind,
    },

    #[error("effect in {location} uses a sentinel that cannot receive effects")]
    InvalidEffectCoordinate { location: String },

    #[error("weapon `{0}` is already registered")]
    DuplicateWeapon(String),
}

/// Errors raised while building a board.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum BoardError {
    #[error("cell ({0}, {1}) declared twice")]
    DuplicateCell(i32, i32),

    #[error("no cell at ({0}, {1})")]
    MissingCell(i32, i32),

    #[error("door ({0}, {1}) - ({2}, {3}) does not join orthogonal neighbours")]
    NotNeighbours(i32, i32, i32, i32),

    #[error("board has no rooms")]
    Empty,

    #[error("board has more than {0} rooms")]
    TooManyRooms(usize),

    #[error("board has more than {0} cells")]
    TooManyCells(usize),
}

/// Result alias for engine operations.
pub type Result<T> = std::result::Result<T, EngineError>;
