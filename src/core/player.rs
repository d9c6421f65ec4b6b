//! Player identification and per-seat storage.
//!
//! ## PlayerId
//!
//! Seat index at the table, 0-based, at most 255 seats.
//!
//! ## PlayerMap
//!
//! One entry per seat backed by a `Vec`. The `Roster` of player ledgers
//! is built on top of it.

use serde::{Deserialize, Serialize};
use std::ops::Index;

/// Seat index of a player, in turn order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(pub u8);

impl PlayerId {
    #[must_use]
    pub const fn new(id: u8) -> Self {
        Self(id)
    }

    /// Raw seat index.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Player {}", self.0)
    }
}

/// Per-seat data.
///
/// ```
/// use rust_arena::core::{PlayerId, PlayerMap};
///
/// let names = PlayerMap::from_vec(vec!["dozer", "violet", "sprog"]);
/// assert_eq!(names[PlayerId::new(1)], "violet");
/// assert_eq!(names.get(PlayerId::new(7)), None);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerMap<T> {
    seats: Vec<T>,
}

impl<T> PlayerMap<T> {
    /// Build from seats in turn order.
    ///
    /// Panics on an empty table or more than 255 seats.
    pub fn from_vec(seats: Vec<T>) -> Self {
        assert!(!seats.is_empty(), "Must have at least 1 player");
        assert!(seats.len() <= 255, "At most 255 players supported");
        Self { seats }
    }

    #[must_use]
    pub fn player_count(&self) -> usize {
        self.seats.len()
    }

    /// Whether `player` has a seat at this table.
    #[must_use]
    pub fn contains(&self, player: PlayerId) -> bool {
        player.index() < self.seats.len()
    }

    #[must_use]
    pub fn get(&self, player: PlayerId) -> Option<&T> {
        self.seats.get(player.index())
    }

    pub fn get_mut(&mut self, player: PlayerId) -> Option<&mut T> {
        self.seats.get_mut(player.index())
    }

    /// Seats in turn order.
    pub fn iter(&self) -> impl Iterator<Item = (PlayerId, &T)> {
        self.seats
            .iter()
            .enumerate()
            .map(|(i, v)| (PlayerId(i as u8), v))
    }

    pub fn player_ids(&self) -> impl Iterator<Item = PlayerId> {
        (0..self.seats.len() as u8).map(PlayerId)
    }
}

impl<T> Index<PlayerId> for PlayerMap<T> {
    type Output = T;

    fn index(&self, player: PlayerId) -> &Self::Output {
        &self.seats[player.index()]
    }
}
