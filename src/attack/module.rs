//! Attack modules: the atomic steps of a weapon's firing sequence.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::ModuleId;
use crate::effects::Effect;
use crate::players::AmmoCubes;
use crate::targets::{Target, TargetRef};

/// One step of an attack pattern: a cost, target slots, effects and the
/// steps that may follow it.
///
/// Modules live in their pattern's arena; `id` is their index there and
/// the only way other modules refer to them.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttackModule {
    pub id: ModuleId,
    pub name: String,
    pub description: String,
    pub summon_cost: AmmoCubes,
    pub targets: Vec<Target>,
    pub effects: Vec<Effect>,
    pub next: SmallVec<[ModuleId; 4]>,
    #[serde(skip)]
    used: bool,
}

impl AttackModule {
    /// A free module with no targets, effects or successors.
    #[must_use]
    pub fn new(id: ModuleId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            description: String::new(),
            summon_cost: AmmoCubes::free(),
            targets: Vec::new(),
            effects: Vec::new(),
            next: SmallVec::new(),
            used: false,
        }
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    #[must_use]
    pub fn with_cost(mut self, cost: AmmoCubes) -> Self {
        self.summon_cost = cost;
        self
    }

    #[must_use]
    pub fn with_target(mut self, target: Target) -> Self {
        self.targets.push(target);
        self
    }

    #[must_use]
    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }

    #[must_use]
    pub fn with_next(mut self, next: ModuleId) -> Self {
        self.next.push(next);
        self
    }

    /// Whether the module already fired in the current attack.
    #[must_use]
    pub fn is_used(&self) -> bool {
        self.used
    }

    /// Address of the first unresolved target, in declaration order.
    #[must_use]
    pub fn next_unresolved(&self) -> Option<TargetRef> {
        self.targets
            .iter()
            .position(|t| !t.is_resolved())
            .map(|t| TargetRef::new(self.id, t))
    }

    /// True once every target holds a value. Trivially true without targets.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.targets.iter().all(Target::is_resolved)
    }

    pub(crate) fn mark_used(&mut self) {
        self.used = true;
    }

    pub(crate) fn clear_targets(&mut self) {
        for target in &mut self.targets {
            target.reset();
        }
    }

    pub(crate) fn reset(&mut self) {
        self.used = false;
        self.clear_targets();
    }
}
