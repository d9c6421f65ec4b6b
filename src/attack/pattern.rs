//! Attack patterns: the module graph of a weapon and its firing state.

use smallvec::SmallVec;
use tracing::{debug, warn};

use crate::board::Board;
use crate::core::{EngineError, ModuleId, PlayerId, Result};
use crate::effects::{EffectOutcome, EffectResolver};
use crate::players::Roster;
use crate::targets::{FilterContext, ResolvedTargets, TargetRef, TargetValue};

use super::module::AttackModule;

/// Where a firing stands.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Phase {
    /// No author bound yet.
    #[default]
    Idle,
    /// Waiting for the controller to pick one of the offered modules.
    AwaitingModule,
    /// A module is selected and its targets are being filled.
    ResolvingTargets(ModuleId),
    /// The firing is over. Only a reset leaves this phase.
    Terminal,
}

impl Phase {
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Phase::Idle => "idle",
            Phase::AwaitingModule => "awaiting a module",
            Phase::ResolvingTargets(_) => "resolving targets",
            Phase::Terminal => "terminal",
        }
    }
}

/// What applying a module did.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ModuleReport {
    pub module: ModuleId,
    pub outcomes: Vec<EffectOutcome>,
}

/// A weapon's directed graph of attack modules.
///
/// The pattern owns every module in an arena indexed by `ModuleId`.
/// Targets of one module that refer to targets of another are looked up
/// through the pattern (see [`ResolvedTargets`]).
///
/// ## Firing
///
/// ```text
/// prepare(author)
///   -> AwaitingModule --select_module--> ResolvingTargets
///   -> resolve_target (per slot) --apply_module--> AwaitingModule | Terminal
/// ```
///
/// `reset_all_modules` clears every used flag and target and returns a
/// prepared pattern to its entry modules.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AttackPattern {
    first: SmallVec<[ModuleId; 4]>,
    content: Vec<AttackModule>,
    author: Option<PlayerId>,
    phase: Phase,
    offered: SmallVec<[ModuleId; 4]>,
}

impl AttackPattern {
    /// Assemble a pattern from parts that were already validated.
    pub(crate) fn from_parts(first: SmallVec<[ModuleId; 4]>, content: Vec<AttackModule>) -> Self {
        Self {
            first,
            content,
            author: None,
            phase: Phase::Idle,
            offered: SmallVec::new(),
        }
    }

    // === Accessors ===

    #[must_use]
    pub fn first(&self) -> &[ModuleId] {
        &self.first
    }

    #[must_use]
    pub fn modules(&self) -> &[AttackModule] {
        &self.content
    }

    pub fn module(&self, id: ModuleId) -> Result<&AttackModule> {
        self.content.get(id.index()).ok_or(EngineError::UnknownModule(id))
    }

    fn module_mut(&mut self, id: ModuleId) -> Result<&mut AttackModule> {
        self.content.get_mut(id.index()).ok_or(EngineError::UnknownModule(id))
    }

    #[must_use]
    pub fn author(&self) -> Option<PlayerId> {
        self.author
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Modules currently on offer, before usage and cost filtering.
    #[must_use]
    pub fn offered(&self) -> &[ModuleId] {
        &self.offered
    }

    #[must_use]
    pub fn is_terminal(&self) -> bool {
        self.phase == Phase::Terminal
    }

    fn bound_author(&self) -> Result<PlayerId> {
        self.author.ok_or(EngineError::NoAuthor)
    }

    // === Lifecycle ===

    /// Bind `author` and offer the entry modules.
    pub fn prepare(&mut self, author: PlayerId) {
        self.author = Some(author);
        self.reset_all_modules();
        debug!(%author, first = ?self.first, "attack pattern prepared");
    }

    /// Clear every used flag and resolved target.
    ///
    /// A pattern with a bound author goes back to its entry modules; the
    /// author stays bound.
    pub fn reset_all_modules(&mut self) {
        for module in &mut self.content {
            module.reset();
        }
        if self.author.is_some() {
            self.phase = Phase::AwaitingModule;
            self.offered = self.first.clone();
        } else {
            self.phase = Phase::Idle;
            self.offered.clear();
        }
    }

    /// End the firing without applying anything further.
    ///
    /// Targets of a module that was being resolved are cleared; modules
    /// already applied stay applied.
    pub fn terminate(&mut self) {
        if let Phase::ResolvingTargets(id) = self.phase {
            if let Some(module) = self.content.get_mut(id.index()) {
                module.clear_targets();
            }
            warn!(module = %id, "firing terminated with a module in flight");
        }
        self.phase = Phase::Terminal;
        self.offered.clear();
    }

    // === Module choice ===

    /// Offered modules the author can fire now: not yet used and affordable.
    pub fn available_modules(&self, roster: &Roster) -> Result<Vec<ModuleId>> {
        self.expect_phase(Phase::AwaitingModule)?;
        let ammo = roster.get(self.bound_author()?)?.ammo;

        let mut available = Vec::new();
        for &id in &self.offered {
            let module = self.module(id)?;
            if !module.is_used() && ammo.can_afford(&module.summon_cost) {
                available.push(id);
            }
        }
        Ok(available)
    }

    /// Pick an offered module and start resolving its targets.
    pub fn select_module(&mut self, id: ModuleId) -> Result<()> {
        self.expect_phase(Phase::AwaitingModule)?;
        self.bound_author()?;
        if self.module(id)?.is_used() || !self.offered.contains(&id) {
            return Err(EngineError::ModuleNotOffered(id));
        }
        self.phase = Phase::ResolvingTargets(id);
        debug!(module = %id, "module selected");
        Ok(())
    }

    /// Give up on the selected module without applying it.
    ///
    /// The module is withdrawn from the current offer. The firing ends if
    /// nothing else is offered.
    pub fn abandon_module(&mut self) -> Result<()> {
        let id = self.selected()?;
        self.module_mut(id)?.clear_targets();
        self.offered.retain(|m| *m != id);
        self.phase = if self.offered.is_empty() {
            Phase::Terminal
        } else {
            Phase::AwaitingModule
        };
        debug!(module = %id, "module abandoned");
        Ok(())
    }

    // === Targets ===

    /// Next slot of the selected module that needs a value.
    #[must_use]
    pub fn next_unresolved_target(&self) -> Option<TargetRef> {
        match self.phase {
            Phase::ResolvingTargets(id) => self.content.get(id.index()).and_then(AttackModule::next_unresolved),
            _ => None,
        }
    }

    /// Values that may fill `target` right now.
    ///
    /// Works for any module of the pattern once an author is bound. An
    /// empty vector means the slot cannot be filled.
    pub fn target_candidates(&self, board: &Board, roster: &Roster, target: TargetRef) -> Result<Vec<TargetValue>> {
        let author = self.bound_author()?;
        let slot = self
            .module(target.module)?
            .targets
            .get(target.target)
            .ok_or(EngineError::UnknownTarget(target))?;
        let ctx = FilterContext::new(board, roster, author, self);
        slot.candidates(&ctx)
    }

    /// Bind a value to the next unresolved slot of the selected module.
    ///
    /// Slots are filled in declaration order and each exactly once. The
    /// value must be one of the slot's current candidates.
    pub fn resolve_target(
        &mut self,
        board: &Board,
        roster: &Roster,
        target: TargetRef,
        value: TargetValue,
    ) -> Result<()> {
        let id = self.selected()?;
        let slot = self
            .module(target.module)?
            .targets
            .get(target.target)
            .ok_or(EngineError::UnknownTarget(target))?;
        if slot.is_resolved() {
            return Err(EngineError::TargetAlreadyResolved(target));
        }
        match self.module(id)?.next_unresolved() {
            Some(pending) if pending == target => {}
            Some(pending) => return Err(EngineError::TargetOutOfOrder { target, pending }),
            None => return Err(EngineError::ModuleNotOffered(target.module)),
        }

        if !self.target_candidates(board, roster, target)?.contains(&value) {
            return Err(EngineError::IneligibleTarget(target));
        }

        self.module_mut(id)?.targets[target.target].resolve(value, target)?;
        debug!(%target, %value, "target resolved");
        Ok(())
    }

    // === Effects ===

    /// Pay the selected module's cost and apply its effects in order.
    ///
    /// Effects are staged on a copy of the roster and committed together:
    /// if any of them fails, `roster` is left untouched and the module
    /// stays selected. On success the module is marked used and its unused
    /// successors are offered; the firing ends when there are none.
    pub fn apply_module(&mut self, board: &Board, roster: &mut Roster) -> Result<ModuleReport> {
        let id = self.selected()?;
        let author = self.bound_author()?;
        let module = self.module(id)?;
        if !module.is_complete() {
            return Err(EngineError::ModuleIncomplete(id));
        }

        let mut staged = roster.clone();
        if !staged.get_mut(author)?.ammo.pay(&module.summon_cost) {
            return Err(EngineError::Unaffordable(author, id));
        }

        let mut outcomes = Vec::new();
        for effect in &module.effects {
            let bound = {
                let ctx = FilterContext::new(board, &staged, author, &*self);
                EffectResolver::bind(effect, &ctx)?
            };
            outcomes.extend(EffectResolver::apply(&mut staged, board, author, &bound)?);
        }
        *roster = staged;

        let next: SmallVec<[ModuleId; 4]> = module.next.clone();
        self.module_mut(id)?.mark_used();
        self.offered = next
            .into_iter()
            .filter(|m| self.content.get(m.index()).is_some_and(|module| !module.is_used()))
            .collect();
        self.phase = if self.offered.is_empty() {
            Phase::Terminal
        } else {
            Phase::AwaitingModule
        };

        debug!(module = %id, %author, effects = outcomes.len(), next = ?self.offered, "module applied");
        Ok(ModuleReport { module: id, outcomes })
    }

    // === Helpers ===

    fn expect_phase(&self, expected: Phase) -> Result<()> {
        if self.phase == expected {
            Ok(())
        } else {
            Err(EngineError::WrongPhase(self.phase.name()))
        }
    }

    fn selected(&self) -> Result<ModuleId> {
        match self.phase {
            Phase::ResolvingTargets(id) => Ok(id),
            other => Err(EngineError::WrongPhase(other.name())),
        }
    }
}

impl ResolvedTargets for AttackPattern {
    fn resolved(&self, target: TargetRef) -> Result<TargetValue> {
        let slot = self
            .content
            .get(target.module.index())
            .and_then(|m| m.targets.get(target.target))
            .ok_or(EngineError::UnknownTarget(target))?;
        slot.value().ok_or(EngineError::UnresolvedReference(target))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::fixtures;
    use crate::effects::Effect;
    use crate::players::AmmoCubes;
    use crate::targets::{Constraint, Coordinate, Target, TargetKind};

    const AUTHOR: PlayerId = PlayerId::new(0);
    const NEAR: PlayerId = PlayerId::new(1);
    const FAR: PlayerId = PlayerId::new(2);

    fn m(id: u8) -> ModuleId {
        ModuleId::new(id)
    }

    fn visible_player() -> Target {
        Target::new(TargetKind::Player)
            .with_constraint(Constraint::visibility(Coordinate::Author, Coordinate::AnyOther, true))
    }

    /// Module 0 hits one visible player; module 1 (costs a red cube) marks
    /// a different one.
    fn pattern() -> AttackPattern {
        let hit = AttackModule::new(m(0), "hit")
            .with_target(visible_player())
            .with_effect(Effect::damage(2, Coordinate::target(0, 0)))
            .with_next(m(1));
        let mark = AttackModule::new(m(1), "mark")
            .with_cost(AmmoCubes::new(1, 0, 0))
            .with_target(visible_player().with_constraint(Constraint::identity(
                Coordinate::AnyOther,
                Coordinate::target(0, 0),
                false,
            )))
            .with_effect(Effect::mark(1, Coordinate::target(1, 0)));
        AttackPattern::from_parts(SmallVec::from_slice(&[m(0)]), vec![hit, mark])
    }

    fn table() -> (Board, Roster) {
        let board = fixtures::three_rooms();
        let mut roster = Roster::new(["author", "near", "far"]);
        roster.place(AUTHOR, board.cell_at(0, 0)).unwrap();
        roster.place(NEAR, board.cell_at(1, 0)).unwrap();
        roster.place(FAR, board.cell_at(2, 0)).unwrap();
        roster.get_mut(AUTHOR).unwrap().ammo = AmmoCubes::new(1, 0, 0);
        (board, roster)
    }

    #[test]
    fn test_requires_author() {
        let mut pattern = pattern();
        assert_eq!(pattern.phase(), Phase::Idle);
        assert_eq!(pattern.select_module(m(0)), Err(EngineError::WrongPhase("idle")));

        let (board, roster) = table();
        assert_eq!(
            pattern.target_candidates(&board, &roster, TargetRef::new(m(0), 0)),
            Err(EngineError::NoAuthor)
        );
    }

    #[test]
    fn test_full_firing() {
        let (board, mut roster) = table();
        let mut pattern = pattern();
        pattern.prepare(AUTHOR);
        assert_eq!(pattern.available_modules(&roster).unwrap(), vec![m(0)]);

        pattern.select_module(m(0)).unwrap();
        let slot = pattern.next_unresolved_target().unwrap();
        assert_eq!(
            pattern.target_candidates(&board, &roster, slot).unwrap(),
            vec![TargetValue::Player(NEAR), TargetValue::Player(FAR)]
        );
        pattern.resolve_target(&board, &roster, slot, TargetValue::Player(NEAR)).unwrap();

        let report = pattern.apply_module(&board, &mut roster).unwrap();
        assert_eq!(report.outcomes.len(), 1);
        assert_eq!(roster.get(NEAR).unwrap().damage_from(AUTHOR), 2);
        assert_eq!(pattern.phase(), Phase::AwaitingModule);
        assert_eq!(pattern.available_modules(&roster).unwrap(), vec![m(1)]);

        pattern.select_module(m(1)).unwrap();
        let slot = pattern.next_unresolved_target().unwrap();
        assert_eq!(
            pattern.target_candidates(&board, &roster, slot).unwrap(),
            vec![TargetValue::Player(FAR)]
        );
        pattern.resolve_target(&board, &roster, slot, TargetValue::Player(FAR)).unwrap();
        pattern.apply_module(&board, &mut roster).unwrap();

        assert_eq!(roster.get(FAR).unwrap().marks_from(AUTHOR), 1);
        assert_eq!(roster.get(AUTHOR).unwrap().ammo, AmmoCubes::free());
        assert!(pattern.is_terminal());
    }

    #[test]
    fn test_resolution_is_checked() {
        let (board, roster) = table();
        let mut pattern = pattern();
        pattern.prepare(AUTHOR);
        pattern.select_module(m(0)).unwrap();
        let slot = TargetRef::new(m(0), 0);

        assert_eq!(
            pattern.resolve_target(&board, &roster, slot, TargetValue::Player(AUTHOR)),
            Err(EngineError::IneligibleTarget(slot))
        );
        assert_eq!(
            pattern.resolve_target(&board, &roster, TargetRef::new(m(0), 3), TargetValue::Player(NEAR)),
            Err(EngineError::UnknownTarget(TargetRef::new(m(0), 3)))
        );

        pattern.resolve_target(&board, &roster, slot, TargetValue::Player(NEAR)).unwrap();
        assert_eq!(
            pattern.resolve_target(&board, &roster, slot, TargetValue::Player(FAR)),
            Err(EngineError::TargetAlreadyResolved(slot))
        );
    }

    #[test]
    fn test_cross_module_reference_needs_resolution() {
        let (board, roster) = table();
        let mut pattern = pattern();
        pattern.prepare(AUTHOR);
        assert_eq!(
            pattern.target_candidates(&board, &roster, TargetRef::new(m(1), 0)),
            Err(EngineError::UnresolvedReference(TargetRef::new(m(0), 0)))
        );
    }

    #[test]
    fn test_apply_requires_complete_module() {
        let (board, mut roster) = table();
        let mut pattern = pattern();
        pattern.prepare(AUTHOR);
        pattern.select_module(m(0)).unwrap();

        assert_eq!(pattern.apply_module(&board, &mut roster), Err(EngineError::ModuleIncomplete(m(0))));
    }

    #[test]
    fn test_unaffordable_leaves_roster_untouched() {
        let (board, mut roster) = table();
        let mut pattern = pattern();
        pattern.prepare(AUTHOR);
        pattern.select_module(m(0)).unwrap();
        pattern
            .resolve_target(&board, &roster, TargetRef::new(m(0), 0), TargetValue::Player(NEAR))
            .unwrap();
        pattern.apply_module(&board, &mut roster).unwrap();

        roster.get_mut(AUTHOR).unwrap().ammo = AmmoCubes::free();
        assert!(pattern.available_modules(&roster).unwrap().is_empty());

        // Selecting anyway fails at payment, with nothing applied.
        pattern.select_module(m(1)).unwrap();
        pattern
            .resolve_target(&board, &roster, TargetRef::new(m(1), 0), TargetValue::Player(FAR))
            .unwrap();
        let before = roster.clone();
        assert_eq!(
            pattern.apply_module(&board, &mut roster),
            Err(EngineError::Unaffordable(AUTHOR, m(1)))
        );
        assert_eq!(roster, before);
    }

    #[test]
    fn test_abandon_and_terminate() {
        let (board, roster) = table();
        let mut pattern = pattern();
        pattern.prepare(AUTHOR);
        pattern.select_module(m(0)).unwrap();
        pattern
            .resolve_target(&board, &roster, TargetRef::new(m(0), 0), TargetValue::Player(NEAR))
            .unwrap();

        pattern.abandon_module().unwrap();
        assert!(pattern.is_terminal());
        assert!(!pattern.modules()[0].targets[0].is_resolved());
        assert_eq!(pattern.abandon_module(), Err(EngineError::WrongPhase("terminal")));

        pattern.reset_all_modules();
        assert_eq!(pattern.phase(), Phase::AwaitingModule);
        pattern.select_module(m(0)).unwrap();
        pattern.terminate();
        assert!(pattern.is_terminal());
        assert!(pattern.offered().is_empty());
    }

    #[test]
    fn test_reset_all_modules() {
        let (board, mut roster) = table();
        let mut pattern = pattern();
        pattern.prepare(AUTHOR);
        pattern.select_module(m(0)).unwrap();
        pattern
            .resolve_target(&board, &roster, TargetRef::new(m(0), 0), TargetValue::Player(FAR))
            .unwrap();
        pattern.apply_module(&board, &mut roster).unwrap();

        pattern.reset_all_modules();
        assert!(pattern.modules().iter().all(|m| !m.is_used()));
        assert!(pattern.modules().iter().flat_map(|m| &m.targets).all(|t| !t.is_resolved()));
        assert_eq!(pattern.offered(), &[m(0)]);
        assert_eq!(pattern.author(), Some(AUTHOR));
    }
}
