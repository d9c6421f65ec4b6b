//! Rule constants for damage, marking and scoring.
//!
//! Every ledger and scoring operation reads its thresholds from a
//! `RulesConfig` instead of hardcoding them. `RulesConfig::default()`
//! carries the standard table values.

use serde::{Deserialize, Serialize};

/// Scoring mode in effect when a player dies.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ScoringMode {
    /// Regular play.
    #[default]
    Standard,
    /// End-game final frenzy.
    FinalFrenzy,
}

/// Rule constants shared by the ledger and the scoring algorithm.
///
/// ## Example
///
/// ```
/// use rust_arena::core::{RulesConfig, ScoringMode};
///
/// let rules = RulesConfig::default().with_mark_cap(2);
/// assert_eq!(rules.mark_cap, 2);
/// assert_eq!(rules.scoreboard(ScoringMode::Standard), &[8, 6, 4, 2, 1, 1]);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RulesConfig {
    /// A player is killed once their damage list is longer than this.
    pub kill_threshold: usize,

    /// Maximum length of a damage list. Points beyond it are dropped
    /// and flag the player as overkilled.
    pub damage_cap: usize,

    /// Maximum markings a single author may hold against one player.
    pub mark_cap: usize,

    /// Points paid out per ranking position in regular play.
    pub standard_scoreboard: Vec<u32>,

    /// Points paid out per ranking position during final frenzy.
    pub frenzy_scoreboard: Vec<u32>,

    /// Extra points for the dealer of the first damage point.
    pub first_blood_bonus: u32,

    /// Maximum cubes of each ammo colour a player can hold.
    pub max_ammo: u8,
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            kill_threshold: 10,
            damage_cap: 11,
            mark_cap: 3,
            standard_scoreboard: vec![8, 6, 4, 2, 1, 1],
            frenzy_scoreboard: vec![2, 1, 1, 1],
            first_blood_bonus: 1,
            max_ammo: 3,
        }
    }
}

impl RulesConfig {
    /// Scoreboard used for the given mode.
    #[must_use]
    pub fn scoreboard(&self, mode: ScoringMode) -> &[u32] {
        match mode {
            ScoringMode::Standard => &self.standard_scoreboard,
            ScoringMode::FinalFrenzy => &self.frenzy_scoreboard,
        }
    }

    /// Set the per-author marking cap.
    #[must_use]
    pub fn with_mark_cap(mut self, cap: usize) -> Self {
        self.mark_cap = cap;
        self
    }

    /// Set kill threshold and damage cap together.
    #[must_use]
    pub fn with_damage_limits(mut self, kill_threshold: usize, damage_cap: usize) -> Self {
        assert!(
            damage_cap > kill_threshold,
            "Damage cap must exceed the kill threshold"
        );
        self.kill_threshold = kill_threshold;
        self.damage_cap = damage_cap;
        self
    }

    /// Replace the standard scoreboard.
    #[must_use]
    pub fn with_standard_scoreboard(mut self, board: impl Into<Vec<u32>>) -> Self {
        self.standard_scoreboard = board.into();
        self
    }

    /// Replace the final-frenzy scoreboard.
    #[must_use]
    pub fn with_frenzy_scoreboard(mut self, board: impl Into<Vec<u32>>) -> Self {
        self.frenzy_scoreboard = board.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let rules = RulesConfig::default();
        assert_eq!(rules.kill_threshold, 10);
        assert_eq!(rules.damage_cap, 11);
        assert_eq!(rules.mark_cap, 3);
        assert_eq!(rules.scoreboard(ScoringMode::FinalFrenzy), &[2, 1, 1, 1]);
        assert_eq!(rules.first_blood_bonus, 1);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let rules: RulesConfig = serde_json::from_str(r#"{ "markCap": 2 }"#).unwrap();
        assert_eq!(rules.mark_cap, 2);
        assert_eq!(rules.damage_cap, 11);
        assert_eq!(rules.standard_scoreboard, vec![8, 6, 4, 2, 1, 1]);
    }

    #[test]
    fn test_builder() {
        let rules = RulesConfig::default()
            .with_damage_limits(5, 6)
            .with_frenzy_scoreboard([1, 1]);
        assert_eq!(rules.kill_threshold, 5);
        assert_eq!(rules.damage_cap, 6);
        assert_eq!(rules.frenzy_scoreboard, vec![1, 1]);
    }

    #[test]
    #[should_panic(expected = "Damage cap must exceed")]
    fn test_invalid_damage_limits() {
        let _ = RulesConfig::default().with_damage_limits(10, 10);
    }
}
