//! Cast resolution
//!
//! Turns held-input power, a raw aim vector and the player's stats into the
//! impulse that launches the lure.

use glam::Vec2;
use rand::Rng;

use crate::tuning::FishingTuning;
use crate::world::StatsProvider;
use crate::{angle_to_dir, signed_angle};

/// Accuracy floor so a zero stat can't blow the jitter up to infinity
const MIN_ACCURACY: f32 = 0.01;

/// Everything decided at the moment of release
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CastParameters {
    pub power: f32,
    /// Final launch direction (unit length, jitter applied)
    pub direction: Vec2,
    /// Per-axis jitter half-range that was applied
    pub accuracy_jitter: f32,
    /// Velocity given to the lure
    pub impulse: Vec2,
}

#[derive(Debug, Clone, Copy)]
pub struct CastResolver {
    pub max_cast_power: f32,
    pub buildup_rate: f32,
    /// Radians
    pub max_aim_angle: f32,
    pub reference_distance: f32,
    pub jitter: f32,
}

impl CastResolver {
    pub fn from_tuning(tuning: &FishingTuning) -> Self {
        Self {
            max_cast_power: tuning.max_cast_power,
            buildup_rate: tuning.cast_power_buildup_rate,
            max_aim_angle: tuning.max_aim_angle(),
            reference_distance: tuning.reference_cast_distance,
            jitter: tuning.accuracy_jitter,
        }
    }

    /// Power after holding the cast input for `duration` seconds from zero
    pub fn power_for_hold(&self, duration: f32) -> f32 {
        (duration.max(0.0) * self.buildup_rate).clamp(0.0, self.max_cast_power)
    }

    /// One tick of power: ramps while held, decays while released
    pub fn ramp(&self, power: f32, held: bool, dt: f32) -> f32 {
        let delta = self.buildup_rate * dt;
        if held {
            (power + delta).min(self.max_cast_power)
        } else {
            (power - delta).max(0.0)
        }
    }

    /// Clamp a raw aim vector to ± max angle from forward. Zero vectors yield `None`.
    pub fn clamp_aim(&self, raw: Vec2) -> Option<Vec2> {
        if raw.length_squared() <= f32::EPSILON {
            return None;
        }
        let angle = signed_angle(Vec2::X, raw).clamp(-self.max_aim_angle, self.max_aim_angle);
        Some(angle_to_dir(angle).normalize())
    }

    /// Resolve the launch. Jitter is drawn once from `rng`.
    pub fn resolve<R: Rng>(
        &self,
        power: f32,
        aim: Vec2,
        stats: &dyn StatsProvider,
        rng: &mut R,
    ) -> CastParameters {
        let power = power.clamp(0.0, self.max_cast_power);
        let effective = power * stats.cast_distance() / self.reference_distance;

        let accuracy_jitter = self.jitter / stats.cast_accuracy().max(MIN_ACCURACY);
        let jittered = aim
            + Vec2::new(
                rng.random_range(-accuracy_jitter..=accuracy_jitter),
                rng.random_range(-accuracy_jitter..=accuracy_jitter),
            );
        let direction = jittered.try_normalize().unwrap_or(aim);

        CastParameters {
            power,
            direction,
            accuracy_jitter,
            impulse: direction * effective,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::FishingStats;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn resolver() -> CastResolver {
        CastResolver::from_tuning(&FishingTuning::default())
    }

    #[test]
    fn test_power_ramp_and_decay() {
        let r = resolver();
        assert_eq!(r.power_for_hold(1.0), 2.0);
        assert_eq!(r.power_for_hold(60.0), 10.0);
        assert_eq!(r.ramp(9.5, true, 1.0), 10.0);
        assert_eq!(r.ramp(0.5, false, 1.0), 0.0);
    }

    #[test]
    fn test_aim_is_clamped() {
        let r = resolver();
        let up = r.clamp_aim(Vec2::Y).unwrap();
        let expected = angle_to_dir(45f32.to_radians());
        assert!((up - expected).length() < 1e-5);

        let slight = r.clamp_aim(Vec2::new(1.0, 0.2)).unwrap();
        assert!((slight - Vec2::new(1.0, 0.2).normalize()).length() < 1e-5);

        assert!(r.clamp_aim(Vec2::ZERO).is_none());
    }

    #[test]
    fn test_resolve_scales_by_cast_distance() {
        let r = CastResolver {
            jitter: 0.0,
            ..resolver()
        };
        let stats = FishingStats {
            cast_distance: 20.0,
            ..FishingStats::default()
        };
        let mut rng = Pcg32::seed_from_u64(1);
        let cast = r.resolve(4.0, Vec2::X, &stats, &mut rng);
        assert_eq!(cast.direction, Vec2::X);
        assert!((cast.impulse - Vec2::new(8.0, 0.0)).length() < 1e-5);
    }

    #[test]
    fn test_resolve_is_deterministic_per_seed() {
        let r = resolver();
        let stats = FishingStats {
            cast_accuracy: 0.5,
            ..FishingStats::default()
        };
        let aim = r.clamp_aim(Vec2::new(1.0, 0.3)).unwrap();

        let a = r.resolve(6.0, aim, &stats, &mut Pcg32::seed_from_u64(77));
        let b = r.resolve(6.0, aim, &stats, &mut Pcg32::seed_from_u64(77));
        assert_eq!(a, b);
        assert!((a.direction.length() - 1.0).abs() < 1e-5);
        assert!((a.accuracy_jitter - 0.2).abs() < 1e-6);
    }

    proptest! {
        #[test]
        fn cast_power_stays_in_bounds(
            holds in prop::collection::vec((any::<bool>(), 0.0f32..1.0), 1..200)
        ) {
            let r = resolver();
            let mut power = 0.0;
            for (held, dt) in holds {
                power = r.ramp(power, held, dt);
                prop_assert!(power >= 0.0 && power <= r.max_cast_power);
            }
        }

        #[test]
        fn held_duration_power_is_clamped(duration in -10.0f32..1000.0) {
            let r = resolver();
            let p = r.power_for_hold(duration);
            prop_assert!(p >= 0.0 && p <= r.max_cast_power);
        }
    }
}
