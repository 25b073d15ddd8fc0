//! Fish attraction model
//!
//! Pure functions deciding how interested a fish is in the lure and how
//! likely it is to bite. The operation order is fixed so results are
//! bit-identical across runs.

use glam::Vec2;

use crate::clamp01;
use crate::world::FishCandidate;

/// Depth (below the surface) at which fish reach full caution
pub const CAUTION_DEPTH: f32 = 10.0;

/// The lure attributes the model reads
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LureProfile {
    pub attraction_multiplier: f32,
    pub size_multiplier: f32,
    pub interest_radius: f32,
    pub base_bite_chance: f32,
}

/// 1 when sizes match, falling to 0 at a difference of 1 or more
#[inline]
pub fn size_compatibility(fish_size: f32, lure_size: f32) -> f32 {
    1.0 - clamp01((fish_size - lure_size).abs())
}

/// Interest of `fish` in a lure at `lure_pos`
pub fn interest(lure: &LureProfile, lure_pos: Vec2, fish: &FishCandidate) -> f32 {
    let mut interest = 0.5;
    interest *= lure.attraction_multiplier;

    // Closer fish are more interested
    let distance = lure_pos.distance(fish.position);
    let distance_factor = 1.0 - clamp01(distance / lure.interest_radius);
    interest *= distance_factor;

    let compat = size_compatibility(fish.size_scale, lure.size_multiplier);
    interest *= 0.5 + compat * 0.5;

    interest
}

/// Probability in [0, 1] that `fish` bites; `depth` is metres below the surface
pub fn bite_chance(lure: &LureProfile, fish: &FishCandidate, depth: f32) -> f32 {
    let mut chance = lure.base_bite_chance;
    chance *= lure.attraction_multiplier;

    let compat = size_compatibility(fish.size_scale, lure.size_multiplier);
    chance *= 0.5 + compat * 0.5;

    // Deep fish are more cautious, up to -30%
    let depth_factor = clamp01(depth / CAUTION_DEPTH);
    chance *= 1.0 - depth_factor * 0.3;

    // Hungry fish bite more
    chance *= 0.7 + fish.hunger * 0.3;

    clamp01(chance)
}
