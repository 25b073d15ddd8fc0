//! Seams to externally owned collaborators
//!
//! The session never owns fish or stats. Fish are reached through a
//! [`FishHandle`] and looked up again every tick; a failed lookup means the
//! fish is gone.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::inventory::Rarity;

/// Read-only numeric modifiers derived from the player's equipment
pub trait StatsProvider {
    fn cast_distance(&self) -> f32;
    fn cast_accuracy(&self) -> f32;
    fn reel_speed(&self) -> f32;
    fn tension_resistance(&self) -> f32;
    fn lure_attraction(&self) -> f32;
}

/// Plain stats block, the unequipped defaults
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FishingStats {
    pub cast_distance: f32,
    pub cast_accuracy: f32,
    pub reel_speed: f32,
    pub tension_resistance: f32,
    pub lure_attraction: f32,
}

impl Default for FishingStats {
    fn default() -> Self {
        Self {
            cast_distance: 10.0,
            cast_accuracy: 1.0,
            reel_speed: 1.0,
            tension_resistance: 1.0,
            lure_attraction: 1.0,
        }
    }
}

impl StatsProvider for FishingStats {
    fn cast_distance(&self) -> f32 {
        self.cast_distance
    }
    fn cast_accuracy(&self) -> f32 {
        self.cast_accuracy
    }
    fn reel_speed(&self) -> f32 {
        self.reel_speed
    }
    fn tension_resistance(&self) -> f32 {
        self.tension_resistance
    }
    fn lure_attraction(&self) -> f32 {
        self.lure_attraction
    }
}

/// Non-owning reference to a fish in the world
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FishHandle(pub u32);

/// Snapshot of a fish as seen by the lure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FishCandidate {
    pub handle: FishHandle,
    pub species_id: String,
    /// Body scale, compared against lure size
    pub size_scale: f32,
    /// 0 = sated, 1 = starving
    pub hunger: f32,
    /// Pull strength while hooked
    pub force_multiplier: f32,
    pub position: Vec2,
    pub rarity: Rarity,
    /// Catch value before size/rarity multipliers (<= 0 means default)
    pub base_value: f32,
    /// Already on some lure's hook
    pub engaged: bool,
}

impl FishCandidate {
    pub fn new(species_id: impl Into<String>, position: Vec2) -> Self {
        Self {
            handle: FishHandle(0),
            species_id: species_id.into(),
            size_scale: 1.0,
            hunger: 0.5,
            force_multiplier: 1.0,
            position,
            rarity: Rarity::Common,
            base_value: 0.0,
            engaged: false,
        }
    }
}

/// Query surface of the fish population
pub trait WorldQuery {
    /// Snapshot of fish within `radius` of `position`, in stable order (may be empty)
    fn find_candidates_near(&self, position: Vec2, radius: f32) -> Vec<FishCandidate>;

    /// Current snapshot of one fish, `None` once it has left the world
    fn candidate(&self, handle: FishHandle) -> Option<FishCandidate>;

    /// Mark a fish as hooked so other lures ignore it
    fn engage(&mut self, _handle: FishHandle) {}

    /// Release a fish that got away so lures may take it again
    fn disengage(&mut self, _handle: FishHandle) {}

    /// Drag a hooked fish along with the lure
    fn tow(&mut self, _handle: FishHandle, _position: Vec2) {}
}

/// In-memory fish population
#[derive(Debug, Clone, Default)]
pub struct FishRegistry {
    /// Sorted by handle for deterministic scans
    fish: Vec<FishCandidate>,
    next_id: u32,
}

impl FishRegistry {
    pub fn new() -> Self {
        Self {
            fish: Vec::new(),
            next_id: 1,
        }
    }

    /// Add a fish, assigning it a fresh handle
    pub fn spawn(&mut self, mut fish: FishCandidate) -> FishHandle {
        let handle = FishHandle(self.next_id.max(1));
        self.next_id = handle.0 + 1;
        fish.handle = handle;
        self.fish.push(fish);
        handle
    }

    pub fn remove(&mut self, handle: FishHandle) -> Option<FishCandidate> {
        let idx = self.fish.iter().position(|f| f.handle == handle)?;
        Some(self.fish.remove(idx))
    }

    pub fn get(&self, handle: FishHandle) -> Option<&FishCandidate> {
        self.fish.iter().find(|f| f.handle == handle)
    }

    pub fn get_mut(&mut self, handle: FishHandle) -> Option<&mut FishCandidate> {
        self.fish.iter_mut().find(|f| f.handle == handle)
    }

    pub fn len(&self) -> usize {
        self.fish.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fish.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FishCandidate> {
        self.fish.iter()
    }
}

impl WorldQuery for FishRegistry {
    fn find_candidates_near(&self, position: Vec2, radius: f32) -> Vec<FishCandidate> {
        self.fish
            .iter()
            .filter(|f| f.position.distance(position) <= radius)
            .cloned()
            .collect()
    }

    fn candidate(&self, handle: FishHandle) -> Option<FishCandidate> {
        self.get(handle).cloned()
    }

    fn engage(&mut self, handle: FishHandle) {
        if let Some(fish) = self.get_mut(handle) {
            fish.engaged = true;
        }
    }

    fn disengage(&mut self, handle: FishHandle) {
        if let Some(fish) = self.get_mut(handle) {
            fish.engaged = false;
        }
    }

    fn tow(&mut self, handle: FishHandle, position: Vec2) {
        if let Some(fish) = self.get_mut(handle) {
            fish.position = position;
        }
    }
}
