//! Lure Line - timed skill-based fishing
//!
//! Core modules:
//! - `sim`: Deterministic simulation (cast, lure agent, bite decisions, tension, session FSM)
//! - `world`: Seams to externally owned collaborators (stats, fish population)
//! - `inventory`: Catch-value contract for the inventory sink
//! - `tuning`: Data-driven balance

pub mod error;
pub mod inventory;
pub mod sim;
pub mod tuning;
pub mod world;

pub use error::ConfigError;
pub use inventory::{CatchRecord, InventorySink, Rarity};
pub use tuning::{FishingTuning, LureTemplate};
pub use world::{FishCandidate, FishHandle, FishRegistry, FishingStats, StatsProvider, WorldQuery};

use glam::Vec2;

/// Default balance constants
pub mod consts {
    /// Fixed simulation timestep used by the demo runner (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;

    /// Casting
    pub const MAX_CAST_POWER: f32 = 10.0;
    pub const CAST_POWER_BUILDUP_RATE: f32 = 2.0;
    pub const MAX_AIM_ANGLE_DEG: f32 = 45.0;
    /// Release below this power doesn't launch the lure
    pub const MIN_RELEASE_POWER: f32 = 0.1;
    /// Stats cast distance that maps power 1:1 onto impulse
    pub const REFERENCE_CAST_DISTANCE: f32 = 10.0;
    /// Per-axis direction jitter at cast accuracy 1.0
    pub const ACCURACY_JITTER: f32 = 0.1;

    /// Settle phase
    pub const SETTLE_TIMEOUT: f32 = 2.0;
    pub const SETTLE_SPEED: f32 = 0.1;

    /// Bite and reel
    pub const BITE_DURATION: f32 = 1.5;
    pub const CATCH_DISTANCE: f32 = 1.5;
    pub const MAX_TENSION: f32 = 100.0;
    pub const TENSION_GAIN: f32 = 10.0;
    pub const TENSION_RELIEF: f32 = 5.0;
    /// Reel speed fraction while the reel input is released
    pub const SLACK_REEL_FACTOR: f32 = 0.3;

    /// Terminal state auto-revert delays (seconds)
    pub const CAUGHT_REVERT_DELAY: f32 = 1.0;
    pub const LINE_BROKE_REVERT_DELAY: f32 = 1.0;
    pub const CUT_LINE_REVERT_DELAY: f32 = 0.5;

    /// Lure physics
    pub const GRAVITY: f32 = 9.81;
    pub const AIR_DRAG: f32 = 1.0;
    pub const WATER_DRAG: f32 = 3.0;
    pub const WATER_GRAVITY_SCALE: f32 = 0.5;
    pub const WATER_LEVEL: f32 = 0.0;
    pub const BOTTOM_DEPTH: f32 = 10.0;
}

/// Clamp to [0, 1]
#[inline]
pub fn clamp01(v: f32) -> f32 {
    v.clamp(0.0, 1.0)
}

/// Move `current` toward `target` by at most `max_delta`, never overshooting
#[inline]
pub fn move_towards(current: Vec2, target: Vec2, max_delta: f32) -> Vec2 {
    let delta = target - current;
    let dist = delta.length();
    if dist <= max_delta || dist == 0.0 {
        target
    } else {
        current + delta / dist * max_delta
    }
}

/// Signed angle (radians) from `from` to `to`, in [-π, π]
#[inline]
pub fn signed_angle(from: Vec2, to: Vec2) -> f32 {
    from.perp_dot(to).atan2(from.dot(to))
}

/// Unit vector for an angle measured from +X
#[inline]
pub fn angle_to_dir(theta: f32) -> Vec2 {
    Vec2::new(theta.cos(), theta.sin())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn test_move_towards_does_not_overshoot() {
        let p = move_towards(Vec2::new(0.0, 0.0), Vec2::new(1.0, 0.0), 5.0);
        assert_eq!(p, Vec2::new(1.0, 0.0));

        let p = move_towards(Vec2::new(0.0, 0.0), Vec2::new(10.0, 0.0), 2.0);
        assert!((p.x - 2.0).abs() < 1e-6);
        assert_eq!(p.y, 0.0);
    }

    #[test]
    fn test_signed_angle() {
        assert!((signed_angle(Vec2::X, Vec2::Y) - FRAC_PI_2).abs() < 1e-6);
        assert!((signed_angle(Vec2::X, -Vec2::Y) + FRAC_PI_2).abs() < 1e-6);
        assert!(signed_angle(Vec2::X, Vec2::new(3.0, 0.0)).abs() < 1e-6);
    }
}
