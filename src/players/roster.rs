//! The table of players and death scoring.

use rustc_hash::FxHashMap;
use tracing::info;

use crate::board::Board;
use crate::core::{CellId, EngineError, PlayerId, PlayerMap, Result, RoomId, RulesConfig, ScoringMode};

use super::ledger::{DamageReport, Player};

/// Every participant's ledger plus the rule constants they are scored by.
///
/// Cloning a roster is cheap (ledger lists are persistent vectors); the
/// attack engine stages effects on a clone and commits it in one step.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Roster {
    players: PlayerMap<Player>,
    rules: RulesConfig,
}

impl Roster {
    /// Seat the given players, in order, under the default rules.
    pub fn new<S: Into<String>>(names: impl IntoIterator<Item = S>) -> Self {
        Self::with_rules(names, RulesConfig::default())
    }

    pub fn with_rules<S: Into<String>>(names: impl IntoIterator<Item = S>, rules: RulesConfig) -> Self {
        let players = names.into_iter().map(Player::new).collect();
        Self {
            players: PlayerMap::from_vec(players),
            rules,
        }
    }

    #[must_use]
    pub fn rules(&self) -> &RulesConfig {
        &self.rules
    }

    #[must_use]
    pub fn player_count(&self) -> usize {
        self.players.player_count()
    }

    pub fn ids(&self) -> impl Iterator<Item = PlayerId> {
        self.players.player_ids()
    }

    pub fn iter(&self) -> impl Iterator<Item = (PlayerId, &Player)> {
        self.players.iter()
    }

    pub fn get(&self, id: PlayerId) -> Result<&Player> {
        self.players.get(id).ok_or(EngineError::UnknownPlayer(id))
    }

    pub fn get_mut(&mut self, id: PlayerId) -> Result<&mut Player> {
        self.players.get_mut(id).ok_or(EngineError::UnknownPlayer(id))
    }

    /// Current cell of `id`; a player off the board is a null-cell error.
    pub fn position_of(&self, id: PlayerId) -> Result<CellId> {
        self.get(id)?.position().ok_or(EngineError::NullCell(id))
    }

    /// Saved movement origin of `id`.
    pub fn saved_position_of(&self, id: PlayerId) -> Result<CellId> {
        self.get(id)?
            .saved_position()
            .ok_or(EngineError::NoSavedPosition(id))
    }

    /// Place `id` on `cell`, or take them off the board with `None`.
    pub fn place(&mut self, id: PlayerId, cell: Option<CellId>) -> Result<()> {
        self.get_mut(id)?.set_position(cell);
        Ok(())
    }

    /// Players standing on `cell`, in seat order.
    #[must_use]
    pub fn players_on(&self, cell: CellId) -> Vec<PlayerId> {
        self.players
            .iter()
            .filter(|(_, p)| p.position() == Some(cell))
            .map(|(id, _)| id)
            .collect()
    }

    /// Players standing anywhere in `room`, in seat order.
    pub fn players_in_room(&self, board: &Board, room: RoomId) -> Result<Vec<PlayerId>> {
        let mut result = Vec::new();
        for (id, player) in self.players.iter() {
            if let Some(cell) = player.position() {
                if board.room_of(cell)? == room {
                    result.push(id);
                }
            }
        }
        Ok(result)
    }

    // === Mutation primitives ===

    pub fn damage(&mut self, target: PlayerId, author: PlayerId, amount: usize) -> Result<DamageReport> {
        let Self { players, rules } = self;
        let player = players.get_mut(target).ok_or(EngineError::UnknownPlayer(target))?;
        Ok(player.take_damage(author, amount, rules))
    }

    pub fn mark(&mut self, target: PlayerId, author: PlayerId, amount: usize) -> Result<usize> {
        let Self { players, rules } = self;
        let player = players.get_mut(target).ok_or(EngineError::UnknownPlayer(target))?;
        Ok(player.append_marks(author, amount, rules))
    }

    pub fn give_score(&mut self, id: PlayerId, points: u32) -> Result<()> {
        self.get_mut(id)?.give_score(points);
        Ok(())
    }

    pub fn is_killed(&self, id: PlayerId) -> Result<bool> {
        Ok(self.get(id)?.is_killed(&self.rules))
    }

    // === Scoring ===

    /// Attackers of `victim` ranked by damage dealt, most first.
    ///
    /// Ties go to whoever appears first in the damage list.
    pub fn ranking(&self, victim: PlayerId) -> Result<Vec<PlayerId>> {
        let damage = self.get(victim)?.damage();

        let mut order: Vec<PlayerId> = Vec::new();
        let mut hits: FxHashMap<PlayerId, usize> = FxHashMap::default();
        for &attacker in damage.iter() {
            let count = hits.entry(attacker).or_insert(0);
            if *count == 0 {
                order.push(attacker);
            }
            *count += 1;
        }

        // Stable sort keeps first-appearance order among equal counts.
        order.sort_by(|a, b| hits[b].cmp(&hits[a]));
        Ok(order)
    }

    /// Pay out the points for killing `victim` and return the awards.
    ///
    /// Ranked attackers take scoreboard slots starting at the victim's death
    /// count, so repeated deaths skip the slots already paid. The dealer of
    /// first blood gets the bonus on top. Call before the victim respawns.
    pub fn score_upon_death(&mut self, victim: PlayerId, mode: ScoringMode) -> Result<Vec<(PlayerId, u32)>> {
        let ranking = self.ranking(victim)?;
        let dying = self.get(victim)?;
        let first_blood = dying.first_blood();
        let offset = dying.deaths() as usize;

        let board = self.rules.scoreboard(mode);
        let mut awards: Vec<(PlayerId, u32)> = ranking
            .iter()
            .enumerate()
            .map(|(rank, &attacker)| (attacker, board.get(offset + rank).copied().unwrap_or(0)))
            .collect();

        if let Some(dealer) = first_blood {
            if let Some(entry) = awards.iter_mut().find(|(p, _)| *p == dealer) {
                entry.1 += self.rules.first_blood_bonus;
            }
        }

        for &(attacker, _) in &awards {
            self.get(attacker)?;
        }
        for &(attacker, points) in &awards {
            self.get_mut(attacker)?.give_score(points);
        }

        info!(%victim, ?mode, ?awards, "death scored");
        Ok(awards)
    }
}
