//! The lure agent
//!
//! The lure is the session's probe in the water. It integrates its own
//! sink physics, watches for a fish to take interest, and decides when that
//! fish bites. It reports through returned [`LureSignal`]s rather than
//! callbacks, so nothing outlives the lure.

use glam::Vec2;
use rand::Rng;

use super::attraction::{self, LureProfile};
use crate::move_towards;
use crate::tuning::{FishingTuning, LureTemplate};
use crate::world::{FishCandidate, FishHandle, WorldQuery};

/// What the lure has to tell the session this tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LureSignal {
    /// A fish latched on as the interested fish
    Interested(FishHandle),
    /// The interested fish bit
    Bite(FishHandle),
    /// The interested fish swam off, declined, or left the world
    InterestLost { fish: FishHandle, vanished: bool },
}

/// Countdown until the interested fish decides whether to bite
#[derive(Debug, Clone, Copy, PartialEq)]
struct BiteWait {
    elapsed: f32,
    duration: f32,
}

#[derive(Debug, Clone)]
pub struct LureAgent {
    pub position: Vec2,
    pub velocity: Vec2,
    /// One-way: set on first entry below the water level
    pub is_in_water: bool,
    /// A fish is hooked, no more interest detection
    pub is_occupied: bool,
    pub interested_fish: Option<FishHandle>,
    pub bite_window_active: bool,
    profile: LureProfile,
    template: LureTemplate,
    bite_wait: Option<BiteWait>,
    drag: f32,
    gravity_scale: f32,
}

impl LureAgent {
    /// Spawn a lure at `position` moving with `impulse`
    pub fn new(
        position: Vec2,
        impulse: Vec2,
        template: &LureTemplate,
        attraction_multiplier: f32,
        tuning: &FishingTuning,
    ) -> Self {
        let profile = LureProfile {
            attraction_multiplier,
            size_multiplier: template.size_multiplier,
            interest_radius: template.interest_radius,
            base_bite_chance: template.base_bite_chance,
        };
        let mut lure = Self {
            position,
            velocity: impulse,
            is_in_water: false,
            is_occupied: false,
            interested_fish: None,
            bite_window_active: false,
            profile,
            template: template.clone(),
            bite_wait: None,
            drag: tuning.air_drag,
            gravity_scale: 1.0,
        };
        if position.y <= tuning.water_level {
            lure.enter_water(tuning);
        }
        lure
    }

    pub fn profile(&self) -> &LureProfile {
        &self.profile
    }

    pub fn speed(&self) -> f32 {
        self.velocity.length()
    }

    /// Seconds left before the pending bite decision, if one is scheduled
    pub fn bite_wait_remaining(&self) -> Option<f32> {
        self.bite_wait.map(|w| (w.duration - w.elapsed).max(0.0))
    }

    fn enter_water(&mut self, tuning: &FishingTuning) {
        if self.is_in_water {
            return;
        }
        self.is_in_water = true;
        self.apply_water_physics(tuning);
        log::debug!("Lure entered water at ({:.2}, {:.2})", self.position.x, self.position.y);
    }

    /// Switch to underwater drag and sink rate
    pub fn apply_water_physics(&mut self, tuning: &FishingTuning) {
        self.drag = tuning.water_drag;
        self.gravity_scale = tuning.water_gravity_scale;
    }

    /// Integrate gravity and drag for one tick
    pub fn step_physics(&mut self, tuning: &FishingTuning, dt: f32) {
        self.velocity.y -= tuning.gravity * self.gravity_scale * dt;
        self.velocity *= 1.0 / (1.0 + self.drag * dt);
        self.position += self.velocity * dt;

        if !self.is_in_water && self.position.y <= tuning.water_level {
            self.enter_water(tuning);
        }

        // Resting on the bottom
        let bottom = tuning.bottom_y();
        if self.is_in_water && self.position.y <= bottom {
            self.position.y = bottom;
            self.velocity = Vec2::ZERO;
        }
    }

    /// Pull the lure straight toward `anchor`
    pub fn reel_towards(&mut self, anchor: Vec2, max_delta: f32) {
        self.position = move_towards(self.position, anchor, max_delta);
        self.velocity = Vec2::ZERO;
    }

    /// A fish is on the hook: stop looking for others
    pub fn occupy(&mut self) {
        self.is_occupied = true;
        self.bite_window_active = false;
        self.bite_wait = None;
    }

    /// Forget the interested fish and any pending bite decision
    pub fn release_interest(&mut self) {
        self.interested_fish = None;
        self.bite_window_active = false;
        self.bite_wait = None;
    }

    fn schedule_bite_wait<R: Rng>(&mut self, rng: &mut R) {
        let duration = rng.random_range(self.template.min_bite_time..=self.template.max_bite_time);
        self.bite_wait = Some(BiteWait {
            elapsed: 0.0,
            duration,
        });
    }

    /// Detection and bite timing for one tick
    pub fn update<W: WorldQuery, R: Rng>(
        &mut self,
        world: &W,
        water_level: f32,
        rng: &mut R,
        dt: f32,
    ) -> Option<LureSignal> {
        if !self.is_in_water || self.is_occupied {
            return None;
        }

        let Some(handle) = self.interested_fish else {
            return self.scan(world, rng);
        };

        let Some(fish) = world.candidate(handle) else {
            log::debug!("Interested fish {:?} left the world", handle);
            self.release_interest();
            return Some(LureSignal::InterestLost {
                fish: handle,
                vanished: true,
            });
        };

        if self.position.distance(fish.position) > self.template.interest_radius {
            log::debug!("Fish {} swam out of range", fish.species_id);
            self.release_interest();
            return Some(LureSignal::InterestLost {
                fish: handle,
                vanished: false,
            });
        }

        let wait = self.bite_wait.as_mut()?;
        wait.elapsed += dt;
        if wait.elapsed < wait.duration {
            return None;
        }
        self.bite_wait = None;
        self.evaluate_bite(&fish, water_level, rng)
    }

    /// Look for the first unengaged fish above the interest threshold
    fn scan<W: WorldQuery, R: Rng>(&mut self, world: &W, rng: &mut R) -> Option<LureSignal> {
        let candidates = world.find_candidates_near(self.position, self.template.interest_radius);
        for fish in candidates.iter().filter(|f| !f.engaged) {
            let level = attraction::interest(&self.profile, self.position, fish);
            if level > self.template.interest_threshold {
                self.interested_fish = Some(fish.handle);
                self.schedule_bite_wait(rng);
                log::debug!(
                    "Fish {} interested in lure (interest {:.3})",
                    fish.species_id,
                    level
                );
                return Some(LureSignal::Interested(fish.handle));
            }
        }
        None
    }

    /// Roll whether `fish` bites now; on a miss it may wait for another go
    pub fn evaluate_bite<R: Rng>(
        &mut self,
        fish: &FishCandidate,
        water_level: f32,
        rng: &mut R,
    ) -> Option<LureSignal> {
        let depth = water_level - fish.position.y;
        let chance = attraction::bite_chance(&self.profile, fish, depth);
        let roll: f32 = rng.random();

        if roll < chance {
            self.bite_window_active = true;
            log::debug!("Fish {} bites (roll {:.3} < {:.3})", fish.species_id, roll, chance);
            return Some(LureSignal::Bite(fish.handle));
        }

        if rng.random::<f32>() < self.template.stay_interested_chance {
            self.schedule_bite_wait(rng);
            None
        } else {
            log::debug!("Fish {} lost interest", fish.species_id);
            self.release_interest();
            Some(LureSignal::InterestLost {
                fish: fish.handle,
                vanished: false,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::FishRegistry;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn underwater_lure(attraction: f32) -> LureAgent {
        LureAgent::new(
            Vec2::new(0.0, -2.0),
            Vec2::ZERO,
            &LureTemplate::default(),
            attraction,
            &FishingTuning::default(),
        )
    }

    #[test]
    fn test_water_entry_is_one_way() {
        let tuning = FishingTuning::default();
        let mut lure = LureAgent::new(
            Vec2::new(0.0, 1.0),
            Vec2::new(2.0, 0.0),
            &LureTemplate::default(),
            1.0,
            &tuning,
        );
        assert!(!lure.is_in_water);

        for _ in 0..120 {
            lure.step_physics(&tuning, 1.0 / 60.0);
        }
        assert!(lure.is_in_water);
        assert!(lure.position.y < tuning.water_level);

        // Even if thrown back above the surface it stays "in water"
        lure.position.y = 5.0;
        lure.step_physics(&tuning, 1.0 / 60.0);
        assert!(lure.is_in_water);
    }

    #[test]
    fn test_lure_rests_on_bottom() {
        let tuning = FishingTuning::default();
        let mut lure = underwater_lure(1.0);
        for _ in 0..2000 {
            lure.step_physics(&tuning, 1.0 / 60.0);
        }
        assert_eq!(lure.position.y, tuning.bottom_y());
        assert_eq!(lure.speed(), 0.0);
    }

    #[test]
    fn test_no_detection_out_of_water_or_occupied() {
        let mut world = FishRegistry::new();
        world.spawn(FishCandidate::new("perch", Vec2::new(0.0, 1.0)));
        let mut rng = Pcg32::seed_from_u64(3);

        let mut dry = LureAgent::new(
            Vec2::new(0.0, 1.0),
            Vec2::ZERO,
            &LureTemplate::default(),
            3.0,
            &FishingTuning::default(),
        );
        assert_eq!(dry.update(&world, 0.0, &mut rng, 0.1), None);

        let mut lure = underwater_lure(3.0);
        lure.occupy();
        assert_eq!(lure.update(&world, 0.0, &mut rng, 0.1), None);
    }

    #[test]
    fn test_first_match_wins_not_nearest() {
        let mut world = FishRegistry::new();
        let first = world.spawn(FishCandidate::new("perch", Vec2::new(2.0, -2.0)));
        let _nearer = world.spawn(FishCandidate::new("carp", Vec2::new(0.5, -2.0)));
        let mut rng = Pcg32::seed_from_u64(3);

        let mut lure = underwater_lure(3.0);
        let signal = lure.update(&world, 0.0, &mut rng, 0.1);
        assert_eq!(signal, Some(LureSignal::Interested(first)));
        assert_eq!(lure.interested_fish, Some(first));
        let wait = lure.bite_wait_remaining().unwrap();
        assert!((2.0..=10.0).contains(&wait));
    }

    #[test]
    fn test_engaged_and_weak_interest_are_skipped() {
        let mut world = FishRegistry::new();
        let engaged = world.spawn(FishCandidate::new("pike", Vec2::new(0.5, -2.0)));
        world.engage(engaged);
        world.spawn(FishCandidate::new("perch", Vec2::new(1.0, -2.0)));
        let mut rng = Pcg32::seed_from_u64(3);

        // Default attraction never clears the 0.5 threshold
        let mut plain = underwater_lure(1.0);
        assert_eq!(plain.update(&world, 0.0, &mut rng, 0.1), None);

        let mut boosted = underwater_lure(3.0);
        match boosted.update(&world, 0.0, &mut rng, 0.1) {
            Some(LureSignal::Interested(h)) => assert_ne!(h, engaged),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_interest_lost_when_fish_leaves_radius() {
        let mut world = FishRegistry::new();
        let h = world.spawn(FishCandidate::new("perch", Vec2::new(1.0, -2.0)));
        let mut rng = Pcg32::seed_from_u64(3);
        let mut lure = underwater_lure(3.0);
        lure.update(&world, 0.0, &mut rng, 0.1);

        world.tow(h, Vec2::new(50.0, -2.0));
        assert_eq!(
            lure.update(&world, 0.0, &mut rng, 0.1),
            Some(LureSignal::InterestLost {
                fish: h,
                vanished: false
            })
        );
        assert_eq!(lure.interested_fish, None);
    }

    #[test]
    fn test_vanished_fish_reported() {
        let mut world = FishRegistry::new();
        let h = world.spawn(FishCandidate::new("perch", Vec2::new(1.0, -2.0)));
        let mut rng = Pcg32::seed_from_u64(3);
        let mut lure = underwater_lure(3.0);
        lure.update(&world, 0.0, &mut rng, 0.1);

        world.remove(h);
        assert_eq!(
            lure.update(&world, 0.0, &mut rng, 0.1),
            Some(LureSignal::InterestLost {
                fish: h,
                vanished: true
            })
        );
    }

    #[test]
    fn test_certain_bite_after_wait() {
        let mut world = FishRegistry::new();
        let h = world.spawn(FishCandidate {
            hunger: 1.0,
            ..FishCandidate::new("perch", Vec2::new(0.5, -0.1))
        });
        let mut template = LureTemplate::default();
        template.base_bite_chance = 1.0;
        let mut lure = LureAgent::new(
            Vec2::new(0.0, -0.1),
            Vec2::ZERO,
            &template,
            3.0,
            &FishingTuning::default(),
        );
        let mut rng = Pcg32::seed_from_u64(9);

        assert_eq!(
            lure.update(&world, 0.0, &mut rng, 0.1),
            Some(LureSignal::Interested(h))
        );
        let mut signal = None;
        for _ in 0..200 {
            signal = lure.update(&world, 0.0, &mut rng, 0.1);
            if signal.is_some() {
                break;
            }
        }
        assert_eq!(signal, Some(LureSignal::Bite(h)));
        assert!(lure.bite_window_active);
    }

    #[test]
    fn test_declined_bite_retries_or_releases() {
        let fish = FishCandidate {
            hunger: 0.0,
            ..FishCandidate::new("perch", Vec2::new(0.5, -2.0))
        };
        let mut template = LureTemplate::default();
        template.base_bite_chance = 0.0;

        // Across seeds both outcomes show up, and nothing ever bites
        let mut retried = 0;
        let mut released = 0;
        for seed in 0..64 {
            let mut lure = LureAgent::new(
                Vec2::new(0.0, -2.0),
                Vec2::ZERO,
                &template,
                1.0,
                &FishingTuning::default(),
            );
            lure.interested_fish = Some(fish.handle);
            let mut rng = Pcg32::seed_from_u64(seed);
            match lure.evaluate_bite(&fish, 0.0, &mut rng) {
                None => {
                    retried += 1;
                    assert!(lure.bite_wait_remaining().is_some());
                    assert_eq!(lure.interested_fish, Some(fish.handle));
                }
                Some(LureSignal::InterestLost { .. }) => {
                    released += 1;
                    assert_eq!(lure.interested_fish, None);
                }
                Some(other) => panic!("unexpected {:?}", other),
            }
        }
        assert!(retried > 0 && released > 0);
    }
}
