//! Per-player damage and marking ledger.
//!
//! Damage and markings are stored as ordered lists of attackers, one entry
//! per point, in infliction order. The order matters for scoring: the first
//! entry is first blood and ties in the ranking are broken by first
//! appearance.
//!
//! Lists are `im::Vector` so cloning a `Player` (and the `Roster`) is cheap.

use im::Vector;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::core::{CellId, PlayerId, RulesConfig};

use super::ammo::AmmoCubes;

/// What a damage application actually did.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DamageReport {
    /// Points that landed from the damage itself.
    pub dealt: usize,
    /// Markings consumed by the hit.
    pub converted: usize,
    /// Points that landed from converted markings.
    pub converted_dealt: usize,
}

impl DamageReport {
    /// Total points added to the damage list.
    #[must_use]
    pub fn total(&self) -> usize {
        self.dealt + self.converted_dealt
    }
}

/// A participant's ledger: damage, markings, position, deaths and score.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub name: String,
    damage: Vector<PlayerId>,
    marks: Vector<PlayerId>,
    deaths: u32,
    score: u32,
    overkilled: bool,
    position: Option<CellId>,
    saved_position: Option<CellId>,
    pub ammo: AmmoCubes,
}

impl Player {
    /// Create a player off the board with an empty ledger.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            damage: Vector::new(),
            marks: Vector::new(),
            deaths: 0,
            score: 0,
            overkilled: false,
            position: None,
            saved_position: None,
            ammo: AmmoCubes::free(),
        }
    }

    // === Ledger views ===

    /// Damage list, one attacker per point, oldest first.
    #[must_use]
    pub fn damage(&self) -> &Vector<PlayerId> {
        &self.damage
    }

    /// Marking list, one attacker per marking, oldest first.
    #[must_use]
    pub fn marks(&self) -> &Vector<PlayerId> {
        &self.marks
    }

    #[must_use]
    pub fn damage_from(&self, author: PlayerId) -> usize {
        self.damage.iter().filter(|&&p| p == author).count()
    }

    #[must_use]
    pub fn marks_from(&self, author: PlayerId) -> usize {
        self.marks.iter().filter(|&&p| p == author).count()
    }

    /// Dealer of the first damage point, if any.
    #[must_use]
    pub fn first_blood(&self) -> Option<PlayerId> {
        self.damage.front().copied()
    }

    #[must_use]
    pub fn is_killed(&self, rules: &RulesConfig) -> bool {
        self.damage.len() > rules.kill_threshold
    }

    /// Whether a damage point arrived after the damage list was full.
    #[must_use]
    pub fn is_overkilled(&self) -> bool {
        self.overkilled
    }

    #[must_use]
    pub fn deaths(&self) -> u32 {
        self.deaths
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.score
    }

    // === Position ===

    #[must_use]
    pub fn position(&self) -> Option<CellId> {
        self.position
    }

    #[must_use]
    pub fn saved_position(&self) -> Option<CellId> {
        self.saved_position
    }

    pub fn set_position(&mut self, cell: Option<CellId>) {
        self.position = cell;
    }

    /// Snapshot the current position as the origin of the next movement.
    pub fn save_position(&mut self) {
        self.saved_position = self.position;
    }

    // === Mutation primitives ===

    /// Append up to `amount` damage points from `author`.
    ///
    /// Points beyond the damage cap are dropped and flag the player as
    /// overkilled. Returns the number of points that landed.
    pub fn append_damage(&mut self, author: PlayerId, amount: usize, rules: &RulesConfig) -> usize {
        let room = rules.damage_cap.saturating_sub(self.damage.len());
        let landed = amount.min(room);
        for _ in 0..landed {
            self.damage.push_back(author);
        }
        if landed < amount {
            self.overkilled = true;
        }
        landed
    }

    /// Append up to `amount` markings from `author`, stopping at the
    /// per-author cap. Excess markings are dropped. Returns how many landed.
    pub fn append_marks(&mut self, author: PlayerId, amount: usize, rules: &RulesConfig) -> usize {
        let held = self.marks_from(author);
        let landed = amount.min(rules.mark_cap.saturating_sub(held));
        for _ in 0..landed {
            self.marks.push_back(author);
        }
        landed
    }

    /// Apply a damage hit: `amount` points from `author`, then every
    /// marking `author` holds on this player turns into one more point.
    ///
    /// Markings are consumed even when the damage cap swallows the points.
    pub fn take_damage(&mut self, author: PlayerId, amount: usize, rules: &RulesConfig) -> DamageReport {
        let dealt = self.append_damage(author, amount, rules);

        let converted = self.marks_from(author);
        let converted_dealt = if converted > 0 {
            self.marks.retain(|&p| p != author);
            trace!(%author, converted, "markings converted into damage");
            self.append_damage(author, converted, rules)
        } else {
            0
        };

        DamageReport {
            dealt,
            converted,
            converted_dealt,
        }
    }

    pub fn give_score(&mut self, points: u32) {
        self.score += points;
    }

    /// Close out a death: count it and wipe the damage track.
    ///
    /// Markings survive death. The player stays off the board until
    /// `respawn_at` places them again.
    pub fn clear_after_death(&mut self) {
        self.deaths += 1;
        self.damage.clear();
        self.overkilled = false;
        self.position = None;
        self.saved_position = None;
    }

    pub fn respawn_at(&mut self, cell: CellId) {
        self.position = Some(cell);
    }
}
