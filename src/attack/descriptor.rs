//! Weapon descriptors: the JSON form of an attack pattern.
//!
//! ```json
//! {
//!   "first": [0],
//!   "content": [
//!     { "id": 0, "name": "basic mode", "description": "...",
//!       "summonCost": { "red": 0, "yellow": 0, "blue": 0 },
//!       "targets": [ { "type": "player", "constraints": [ ... ] } ],
//!       "effects": [ { "type": "damage", "amount": 2, "target": [0, 0] } ],
//!       "next": [1] }
//!   ]
//! }
//! ```
//!
//! Parsing rejects unknown type tags and missing fields. `validate` then
//! checks the rules serde cannot express: dense ids, links to existing
//! modules, coordinates that refer to targets resolved earlier, filterable
//! constraints and effect recipients.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use tracing::debug;

use crate::core::{LoadError, ModuleId};
use crate::targets::{Constraint, Coordinate, TargetKind, TargetRef};

use super::module::AttackModule;
use super::pattern::AttackPattern;

/// The authored form of a weapon.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeaponDescriptor {
    pub first: SmallVec<[ModuleId; 4]>,
    pub content: Vec<AttackModule>,
}

impl WeaponDescriptor {
    pub fn from_json(json: &str) -> Result<Self, LoadError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Check the descriptor and build its pattern.
    pub fn build(self) -> Result<AttackPattern, LoadError> {
        self.validate()?;
        debug!(modules = self.content.len(), first = ?self.first, "weapon descriptor loaded");
        Ok(AttackPattern::from_parts(self.first, self.content))
    }

    pub fn validate(&self) -> Result<(), LoadError> {
        for (position, module) in self.content.iter().enumerate() {
            if module.id.index() != position {
                return Err(LoadError::NonDenseModuleId {
                    position,
                    found: module.id,
                });
            }
        }

        if self.first.is_empty() {
            return Err(LoadError::NoEntryModules);
        }
        for &to in &self.first {
            self.check_link("first", to)?;
        }
        for module in &self.content {
            for &to in &module.next {
                self.check_link("next", to)?;
            }
        }

        for module in &self.content {
            self.validate_targets(module)?;
            self.validate_effects(module)?;
        }
        Ok(())
    }

    fn check_link(&self, from: &'static str, to: ModuleId) -> Result<(), LoadError> {
        if to.index() < self.content.len() {
            Ok(())
        } else {
            Err(LoadError::DanglingLink { from, to })
        }
    }

    fn validate_targets(&self, module: &AttackModule) -> Result<(), LoadError> {
        for (t, target) in module.targets.iter().enumerate() {
            let location = format!("module {} target {}", module.id.raw(), t);

            for constraint in &target.constraints {
                let open = constraint.open_sides();
                if open != 1 {
                    return Err(LoadError::NotFilterable { location, found: open });
                }
                for coordinate in constraint.coordinates() {
                    if let Some(r) = coordinate.as_target() {
                        self.check_reference(module.id, t, r, &location)?;
                    }
                }

                let positioned_room = constraint
                    .positioned_operands()
                    .into_iter()
                    .any(|c| self.kind_of(c, target.kind) == TargetKind::Room);
                if positioned_room || (target.kind == TargetKind::Room && constraint.is_positional()) {
                    return Err(LoadError::PositionalOnRoom {
                        location,
                        constraint: constraint.name(),
                    });
                }

                if let Constraint::Identity { source, drain, .. } = constraint {
                    let (left, right) = (self.kind_of(*source, target.kind), self.kind_of(*drain, target.kind));
                    if left != right {
                        return Err(LoadError::IdentityKindMismatch { location, left, right });
                    }
                }
            }
        }
        Ok(())
    }

    /// Kind of value `coordinate` yields inside a slot of kind `slot`.
    ///
    /// References must already have been checked to exist.
    fn kind_of(&self, coordinate: Coordinate, slot: TargetKind) -> TargetKind {
        match coordinate {
            Coordinate::Author => TargetKind::Player,
            Coordinate::AuthorSavedPosition => TargetKind::Cell,
            Coordinate::AnyOther => slot,
            Coordinate::Target(r) => self
                .content
                .get(r.module.index())
                .and_then(|m| m.targets.get(r.target))
                .map_or(slot, |t| t.kind),
        }
    }

    fn validate_effects(&self, module: &AttackModule) -> Result<(), LoadError> {
        let own_targets = module.targets.len();
        for (e, effect) in module.effects.iter().enumerate() {
            let location = format!("module {} effect {}", module.id.raw(), e);

            for coordinate in effect.coordinates() {
                match coordinate {
                    Coordinate::AnyOther => return Err(LoadError::InvalidEffectCoordinate { location }),
                    // Every target of the module is resolved by the time
                    // effects run.
                    Coordinate::Target(r) => self.check_reference(module.id, own_targets, r, &location)?,
                    Coordinate::Author | Coordinate::AuthorSavedPosition => {}
                }
            }
        }
        Ok(())
    }

    /// `target` is read while resolving slot `slot` of `module`: it must
    /// exist and be filled before that slot is.
    fn check_reference(
        &self,
        module: ModuleId,
        slot: usize,
        target: TargetRef,
        location: &str,
    ) -> Result<(), LoadError> {
        let exists = self
            .content
            .get(target.module.index())
            .is_some_and(|m| target.target < m.targets.len());
        if !exists {
            return Err(LoadError::DanglingReference {
                location: location.to_string(),
                target,
            });
        }

        let earlier = if target.module == module {
            target.target < slot
        } else {
            self.leads_to(target.module, module)
        };
        if earlier {
            Ok(())
        } else {
            Err(LoadError::ForwardReference {
                location: location.to_string(),
                target,
            })
        }
    }

    /// Whether `to` can be reached from `from` along `next` links.
    fn leads_to(&self, from: ModuleId, to: ModuleId) -> bool {
        let mut seen = vec![false; self.content.len()];
        let mut queue = VecDeque::from([from]);
        seen[from.index()] = true;

        while let Some(current) = queue.pop_front() {
            for &next in &self.content[current.index()].next {
                if next == to {
                    return true;
                }
                if !seen[next.index()] {
                    seen[next.index()] = true;
                    queue.push_back(next);
                }
            }
        }
        false
    }
}

impl AttackPattern {
    /// Parse and validate a weapon descriptor.
    ///
    /// ## Example
    ///
    /// ```
    /// use rust_arena::attack::AttackPattern;
    ///
    /// let json = r#"{
    ///   "first": [0],
    ///   "content": [{
    ///     "id": 0, "name": "punch", "description": "1 damage to a player on your cell",
    ///     "summonCost": {"red": 0, "yellow": 0, "blue": 0},
    ///     "targets": [{"type": "player", "constraints": [
    ///       {"type": "distance", "source": "author", "drain": "other", "lowerBound": 0, "upperBound": 0}
    ///     ]}],
    ///     "effects": [{"type": "damage", "amount": 1, "target": [0, 0]}],
    ///     "next": []
    ///   }]
    /// }"#;
    ///
    /// let pattern = AttackPattern::from_json(json).unwrap();
    /// assert_eq!(pattern.modules().len(), 1);
    /// ```
    pub fn from_json(json: &str) -> Result<Self, LoadError> {
        WeaponDescriptor::from_json(json)?.build()
    }

    /// The descriptor this pattern was built from, without firing state.
    #[must_use]
    pub fn to_descriptor(&self) -> WeaponDescriptor {
        let mut content = self.modules().to_vec();
        for module in &mut content {
            module.reset();
        }
        WeaponDescriptor {
            first: SmallVec::from_slice(self.first()),
            content,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effects::Effect;
    use crate::targets::Target;

    fn m(id: u8) -> ModuleId {
        ModuleId::new(id)
    }

    fn visible() -> Constraint {
        Constraint::visibility(Coordinate::Author, Coordinate::AnyOther, true)
    }

    fn descriptor(content: Vec<AttackModule>) -> WeaponDescriptor {
        WeaponDescriptor {
            first: SmallVec::from_slice(&[m(0)]),
            content,
        }
    }

    #[test]
    fn test_ids_must_be_dense() {
        let d = descriptor(vec![AttackModule::new(m(1), "a")]);
        assert!(matches!(
            d.validate(),
            Err(LoadError::NonDenseModuleId { position: 0, .. })
        ));
    }

    #[test]
    fn test_links_must_exist() {
        let d = descriptor(vec![AttackModule::new(m(0), "a").with_next(m(4))]);
        assert!(matches!(
            d.validate(),
            Err(LoadError::DanglingLink { from: "next", .. })
        ));

        let mut d = descriptor(vec![AttackModule::new(m(0), "a")]);
        d.first.clear();
        assert!(matches!(d.validate(), Err(LoadError::NoEntryModules)));
    }

    #[test]
    fn test_forward_reference_in_module() {
        let module = AttackModule::new(m(0), "a").with_target(
            Target::new(TargetKind::Player).with_constraint(Constraint::identity(
                Coordinate::AnyOther,
                Coordinate::target(0, 0),
                false,
            )),
        );
        assert!(matches!(
            descriptor(vec![module]).validate(),
            Err(LoadError::ForwardReference { .. })
        ));
    }

    #[test]
    fn test_cross_module_reference_follows_links() {
        let first = AttackModule::new(m(0), "a").with_target(Target::new(TargetKind::Player).with_constraint(visible()));
        let second = AttackModule::new(m(1), "b").with_target(
            Target::new(TargetKind::Player)
                .with_constraint(visible())
                .with_constraint(Constraint::identity(Coordinate::AnyOther, Coordinate::target(0, 0), false)),
        );

        // Not linked: module 1 cannot rely on module 0.
        assert!(matches!(
            descriptor(vec![first.clone(), second.clone()]).validate(),
            Err(LoadError::ForwardReference { .. })
        ));
        assert!(descriptor(vec![first.with_next(m(1)), second]).validate().is_ok());
    }

    #[test]
    fn test_dangling_reference() {
        let module = AttackModule::new(m(0), "a")
            .with_target(Target::new(TargetKind::Player).with_constraint(visible()))
            .with_effect(Effect::damage(1, Coordinate::target(0, 3)));
        assert!(matches!(
            descriptor(vec![module]).validate(),
            Err(LoadError::DanglingReference { .. })
        ));
    }

    #[test]
    fn test_constraint_shape() {
        let closed = AttackModule::new(m(0), "a").with_target(
            Target::new(TargetKind::Player).with_constraint(Constraint::visibility(
                Coordinate::Author,
                Coordinate::AuthorSavedPosition,
                true,
            )),
        );
        assert!(matches!(
            descriptor(vec![closed]).validate(),
            Err(LoadError::NotFilterable { found: 0, .. })
        ));

        let room = AttackModule::new(m(0), "a").with_target(
            Target::new(TargetKind::Room).with_constraint(Constraint::alignment(
                Coordinate::Author,
                Coordinate::AnyOther,
                true,
            )),
        );
        assert!(matches!(
            descriptor(vec![room]).validate(),
            Err(LoadError::PositionalOnRoom { constraint: "alignment", .. })
        ));
    }

    #[test]
    fn test_room_cannot_be_seen_from() {
        let seen_from_room = AttackModule::new(m(0), "a").with_target(
            Target::new(TargetKind::Room).with_constraint(Constraint::visibility(
                Coordinate::AnyOther,
                Coordinate::Author,
                true,
            )),
        );
        assert!(matches!(
            descriptor(vec![seen_from_room]).validate(),
            Err(LoadError::PositionalOnRoom { constraint: "visibility", .. })
        ));

        // A room picked earlier cannot be a distance operand either.
        let via_reference = AttackModule::new(m(0), "a")
            .with_target(Target::new(TargetKind::Room).with_constraint(visible()))
            .with_target(Target::new(TargetKind::Cell).with_constraint(Constraint::distance(
                Coordinate::target(0, 0),
                Coordinate::AnyOther,
                0,
                Some(1),
            )));
        assert!(matches!(
            descriptor(vec![via_reference]).validate(),
            Err(LoadError::PositionalOnRoom { constraint: "distance", .. })
        ));

        // Seeing into a room is fine.
        let seen_room = AttackModule::new(m(0), "a").with_target(Target::new(TargetKind::Room).with_constraint(visible()));
        assert!(descriptor(vec![seen_room]).validate().is_ok());
    }

    #[test]
    fn test_identity_compares_same_kind() {
        let mixed = AttackModule::new(m(0), "a")
            .with_target(Target::new(TargetKind::Player).with_constraint(visible()))
            .with_target(
                Target::new(TargetKind::Cell)
                    .with_constraint(visible())
                    .with_constraint(Constraint::identity(Coordinate::AnyOther, Coordinate::target(0, 0), false)),
            );
        assert!(matches!(
            descriptor(vec![mixed]).validate(),
            Err(LoadError::IdentityKindMismatch {
                left: TargetKind::Cell,
                right: TargetKind::Player,
                ..
            })
        ));

        let saved_cell = AttackModule::new(m(0), "a").with_target(
            Target::new(TargetKind::Cell)
                .with_constraint(Constraint::identity(Coordinate::AnyOther, Coordinate::AuthorSavedPosition, false)),
        );
        assert!(descriptor(vec![saved_cell]).validate().is_ok());
    }

    #[test]
    fn test_effects_cannot_target_other() {
        let module = AttackModule::new(m(0), "a").with_effect(Effect::damage(1, Coordinate::AnyOther));
        assert!(matches!(
            descriptor(vec![module]).validate(),
            Err(LoadError::InvalidEffectCoordinate { .. })
        ));
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(AttackPattern::from_json("{\"first\": [0]}"), Err(LoadError::Json(_))));
        assert!(matches!(AttackPattern::from_json("not json"), Err(LoadError::Json(_))));
    }

    #[test]
    fn test_descriptor_survives_serialization() {
        let module = AttackModule::new(m(0), "a")
            .with_target(Target::new(TargetKind::Player).with_constraint(visible()))
            .with_effect(Effect::damage(2, Coordinate::target(0, 0)));
        let pattern = descriptor(vec![module]).build().unwrap();

        let json = serde_json::to_string(&pattern.to_descriptor()).unwrap();
        assert_eq!(AttackPattern::from_json(&json).unwrap(), pattern);
    }
}
