//! Catch-value contract for the inventory sink
//!
//! Storage and slots belong to the host. This module only fixes how a
//! caught fish is valued so end-to-end runs agree on the numbers.

use serde::{Deserialize, Serialize};

use crate::world::FishCandidate;

/// Value used when a fish carries no base value of its own
pub const DEFAULT_BASE_VALUE: f32 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Rarity {
    #[default]
    Common,
    Uncommon,
    Rare,
    Epic,
    Legendary,
}

impl Rarity {
    pub fn multiplier(&self) -> f32 {
        match self {
            Rarity::Common => 1.0,
            Rarity::Uncommon => 2.0,
            Rarity::Rare => 4.0,
            Rarity::Epic => 8.0,
            Rarity::Legendary => 16.0,
        }
    }
}

/// What the inventory stores for a caught fish
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatchRecord {
    pub species_id: String,
    pub size_multiplier: f32,
    pub rarity: Rarity,
    pub base_value: f32,
}

impl CatchRecord {
    pub fn from_candidate(fish: &FishCandidate) -> Self {
        Self {
            species_id: fish.species_id.clone(),
            size_multiplier: fish.size_scale,
            rarity: fish.rarity,
            base_value: fish.base_value,
        }
    }

    /// baseValue × size × rarity, rounded
    pub fn stored_value(&self) -> u32 {
        let base = if self.base_value > 0.0 {
            self.base_value
        } else {
            DEFAULT_BASE_VALUE
        };
        (base * self.size_multiplier * self.rarity.multiplier())
            .round()
            .max(0.0) as u32
    }
}

/// Host-side receiver of caught fish
pub trait InventorySink {
    /// Returns false when the catch could not be stored (e.g. full)
    fn accept(&mut self, record: CatchRecord) -> bool;
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    #[test]
    fn test_default_base_value() {
        let fish = FishCandidate::new("perch", Vec2::ZERO);
        assert_eq!(CatchRecord::from_candidate(&fish).stored_value(), 10);
    }

    #[test]
    fn test_value_scales_with_size_and_rarity() {
        let fish = FishCandidate {
            size_scale: 1.5,
            rarity: Rarity::Rare,
            base_value: 25.0,
            ..FishCandidate::new("pike", Vec2::ZERO)
        };
        // 25 * 1.5 * 4
        assert_eq!(CatchRecord::from_candidate(&fish).stored_value(), 150);

        let legendary = CatchRecord {
            species_id: "leviathan".into(),
            size_multiplier: 1.0,
            rarity: Rarity::Legendary,
            base_value: 0.0,
        };
        assert_eq!(legendary.stored_value(), 160);
    }
}
