//! Ammo cubes: module costs and player pools.

use serde::{Deserialize, Serialize};

/// A bundle of red, yellow and blue ammo cubes.
///
/// Used both as a module's `summonCost` and as a player's ammo pool.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AmmoCubes {
    pub red: u8,
    pub yellow: u8,
    pub blue: u8,
}

impl AmmoCubes {
    #[must_use]
    pub const fn new(red: u8, yellow: u8, blue: u8) -> Self {
        Self { red, yellow, blue }
    }

    /// No cubes at all.
    #[must_use]
    pub const fn free() -> Self {
        Self::new(0, 0, 0)
    }

    #[must_use]
    pub fn is_free(&self) -> bool {
        *self == Self::free()
    }

    #[must_use]
    pub fn total(&self) -> u32 {
        u32::from(self.red) + u32::from(self.yellow) + u32::from(self.blue)
    }

    /// Whether this pool covers `cost`.
    #[must_use]
    pub fn can_afford(&self, cost: &AmmoCubes) -> bool {
        self.red >= cost.red && self.yellow >= cost.yellow && self.blue >= cost.blue
    }

    /// Pay `cost` from this pool.
    ///
    /// Returns `false` and leaves the pool untouched when it cannot cover
    /// the cost.
    pub fn pay(&mut self, cost: &AmmoCubes) -> bool {
        if !self.can_afford(cost) {
            return false;
        }
        self.red -= cost.red;
        self.yellow -= cost.yellow;
        self.blue -= cost.blue;
        true
    }

    /// Add cubes, keeping each colour at or below `max`.
    pub fn add(&mut self, cubes: &AmmoCubes, max: u8) {
        self.red = self.red.saturating_add(cubes.red).min(max);
        self.yellow = self.yellow.saturating_add(cubes.yellow).min(max);
        self.blue = self.blue.saturating_add(cubes.blue).min(max);
    }
}

impl std::fmt::Display for AmmoCubes {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}R {}Y {}B", self.red, self.yellow, self.blue)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pay_and_refuse() {
        let mut pool = AmmoCubes::new(1, 1, 0);

        assert!(!pool.pay(&AmmoCubes::new(0, 0, 1)));
        assert_eq!(pool, AmmoCubes::new(1, 1, 0));

        assert!(pool.pay(&AmmoCubes::new(1, 0, 0)));
        assert_eq!(pool, AmmoCubes::new(0, 1, 0));

        assert!(pool.pay(&AmmoCubes::free()));
    }

    #[test]
    fn test_add_is_capped() {
        let mut pool = AmmoCubes::new(2, 0, 3);
        pool.add(&AmmoCubes::new(2, 1, 1), 3);
        assert_eq!(pool, AmmoCubes::new(3, 1, 3));
        assert_eq!(pool.total(), 7);
    }

    #[test]
    fn test_descriptor_field_names() {
        let cost: AmmoCubes = serde_json::from_str(r#"{"red":1,"yellow":0,"blue":2}"#).unwrap();
        assert_eq!(cost, AmmoCubes::new(1, 0, 2));
        assert!(!cost.is_free());
        assert_eq!(format!("{}", cost), "1R 0Y 2B");
    }
}
