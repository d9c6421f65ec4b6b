//! Coordinates: how a constraint or effect names the value it talks about.
//!
//! Descriptors author coordinates as integer pairs where negative values are
//! sentinels:
//!
//! | pair | coordinate |
//! |---|---|
//! | `[-3, -3]` | `AnyOther`, the side being filtered |
//! | `[-2, -2]` | `AuthorSavedPosition` |
//! | `[-1, -1]` | `Author` |
//! | `[m, t]` | target `t` of module `m` in the same pattern |
//!
//! The names `"other"`, `"authorSaved"` and `"author"` are accepted too.
//! Everything is converted into [`Coordinate`] at load time.

use serde::{Deserialize, Serialize};

use crate::core::{LoadError, ModuleId};

/// Address of a target slot inside an attack pattern.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TargetRef {
    pub module: ModuleId,
    pub target: usize,
}

impl TargetRef {
    #[must_use]
    pub const fn new(module: ModuleId, target: usize) -> Self {
        Self { module, target }
    }
}

impl std::fmt::Display for TargetRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.module.raw(), self.target)
    }
}

/// A reference to a participant, a position, or an earlier target.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawCoordinate", into = "RawCoordinate")]
pub enum Coordinate {
    /// The player firing the weapon.
    Author,
    /// The cell the author stood on when their position was last saved.
    AuthorSavedPosition,
    /// Any entity other than the author: the side a filter enumerates.
    AnyOther,
    /// A target of the same pattern that must already be resolved.
    Target(TargetRef),
}

impl Coordinate {
    /// Shorthand for a module-target reference.
    #[must_use]
    pub const fn target(module: u8, target: usize) -> Self {
        Self::Target(TargetRef::new(ModuleId::new(module), target))
    }

    #[must_use]
    pub fn is_any_other(&self) -> bool {
        matches!(self, Self::AnyOther)
    }

    #[must_use]
    pub fn as_target(&self) -> Option<TargetRef> {
        match self {
            Self::Target(r) => Some(*r),
            _ => None,
        }
    }
}

/// Wire form of a coordinate.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(untagged)]
enum RawCoordinate {
    Pair([i32; 2]),
    Name(String),
}

impl TryFrom<RawCoordinate> for Coordinate {
    type Error = LoadError;

    fn try_from(raw: RawCoordinate) -> Result<Self, Self::Error> {
        match raw {
            RawCoordinate::Pair([-1, -1]) => Ok(Self::Author),
            RawCoordinate::Pair([-2, -2]) => Ok(Self::AuthorSavedPosition),
            RawCoordinate::Pair([-3, -3]) => Ok(Self::AnyOther),
            RawCoordinate::Pair([m, t]) if (0..=i32::from(u8::MAX)).contains(&m) && t >= 0 => {
                Ok(Self::target(m as u8, t as usize))
            }
            RawCoordinate::Pair([m, t]) => Err(LoadError::InvalidCoordinate(m, t)),
            RawCoordinate::Name(name) => match name.as_str() {
                "author" => Ok(Self::Author),
                "authorSaved" => Ok(Self::AuthorSavedPosition),
                "other" => Ok(Self::AnyOther),
                _ => Err(LoadError::UnknownSentinel(name)),
            },
        }
    }
}

impl From<Coordinate> for RawCoordinate {
    fn from(coordinate: Coordinate) -> Self {
        match coordinate {
            Coordinate::Author => Self::Pair([-1, -1]),
            Coordinate::AuthorSavedPosition => Self::Pair([-2, -2]),
            Coordinate::AnyOther => Self::Pair([-3, -3]),
            Coordinate::Target(r) => Self::Pair([i32::from(r.module.raw()), r.target as i32]),
        }
    }
}
