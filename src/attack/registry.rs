//! Weapon registry for pattern lookup.
//!
//! The `WeaponRegistry` stores every weapon of a game by name. Lookups hand
//! out clones so each firing works on its own copy of the pattern.

use rustc_hash::FxHashMap;

use crate::core::LoadError;

use super::pattern::AttackPattern;

/// Registry of weapon patterns.
///
/// ## Example
///
/// ```
/// use rust_arena::attack::WeaponRegistry;
///
/// let mut registry = WeaponRegistry::new();
/// registry
///     .load_json("Punch", r#"{"first":[0],"content":[{
///         "id":0,"name":"punch","description":"",
///         "summonCost":{"red":0,"yellow":0,"blue":0},
///         "targets":[],"effects":[],"next":[]}]}"#)
///     .unwrap();
///
/// assert!(registry.contains("Punch"));
/// assert_eq!(registry.instantiate("Punch").unwrap().modules().len(), 1);
/// ```
#[derive(Clone, Debug, Default)]
pub struct WeaponRegistry {
    weapons: FxHashMap<String, AttackPattern>,
}

impl WeaponRegistry {
    /// Create a new empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a weapon under `name`.
    ///
    /// Names are unique; registering one twice is an error.
    pub fn register(&mut self, name: impl Into<String>, pattern: AttackPattern) -> Result<(), LoadError> {
        let name = name.into();
        if self.weapons.contains_key(&name) {
            return Err(LoadError::DuplicateWeapon(name));
        }
        self.weapons.insert(name, pattern);
        Ok(())
    }

    /// Parse a descriptor and register it under `name`.
    pub fn load_json(&mut self, name: impl Into<String>, json: &str) -> Result<(), LoadError> {
        let pattern = AttackPattern::from_json(json)?;
        self.register(name, pattern)
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&AttackPattern> {
        self.weapons.get(name)
    }

    /// A fresh, unprepared copy of the named weapon.
    #[must_use]
    pub fn instantiate(&self, name: &str) -> Option<AttackPattern> {
        self.weapons.get(name).cloned()
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.weapons.contains_key(name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.weapons.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.weapons.is_empty()
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.weapons.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}
