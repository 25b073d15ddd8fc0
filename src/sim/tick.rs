//! Per-tick session update
//!
//! One `advance` call per frame: input commands first, then the update for
//! whatever state the session is in afterwards. All waits are countdowns on
//! the session, so stepping with an explicit `dt` is fully deterministic.

use glam::Vec2;

use super::cast::CastResolver;
use super::lure::{LureAgent, LureSignal};
use super::state::{Affordance, FailReason, FishingEvent, FishingSession, FishingState};
use crate::world::{FishCandidate, StatsProvider, WorldQuery};

/// Discrete player commands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    CastDown,
    CastHeld,
    CastRelease,
    Hook,
    ReelDown,
    ReelHeld,
    ReelUp,
    /// Abort a cast, or cut the line while a fish is on
    Cancel,
}

/// Input for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Applied in order
    pub commands: Vec<Command>,
    /// Raw aim vector (from the player toward the cursor)
    pub aim: Option<Vec2>,
}

impl TickInput {
    pub fn command(command: Command) -> Self {
        Self {
            commands: vec![command],
            aim: None,
        }
    }

    pub fn with(mut self, command: Command) -> Self {
        self.commands.push(command);
        self
    }

    pub fn aim(mut self, aim: Vec2) -> Self {
        self.aim = Some(aim);
        self
    }
}

impl FishingSession {
    /// Advance the session by `dt` seconds
    pub fn advance<W: WorldQuery>(&mut self, world: &mut W, input: &TickInput, dt: f32) {
        if self.config_error.is_some() {
            return;
        }
        let Some(stats_rc) = self.stats.clone() else {
            return;
        };
        let stats: &dyn StatsProvider = &*stats_rc;
        let prior = self.state;

        for command in &input.commands {
            self.handle_command(*command, world, stats);
        }

        match self.state {
            FishingState::Idle => {}
            FishingState::Aiming => self.update_aiming(input.aim, dt),
            FishingState::Casting => self.update_casting(dt),
            FishingState::Waiting | FishingState::FishInterested | FishingState::Biting => {
                self.update_watching(world, dt)
            }
            FishingState::Hooked | FishingState::Reeling => self.update_reeling(world, stats, dt),
            // The revert delay starts counting on the tick after entry
            FishingState::Caught | FishingState::Failed if prior == self.state => {
                self.revert_timer -= dt;
                if self.revert_timer <= 0.0 {
                    self.change_state(FishingState::Idle);
                }
            }
            FishingState::Caught | FishingState::Failed => {}
        }
    }

    fn handle_command<W: WorldQuery>(
        &mut self,
        command: Command,
        world: &mut W,
        stats: &dyn StatsProvider,
    ) {
        match (command, self.state) {
            (Command::CastDown, FishingState::Idle) => {
                self.change_state(FishingState::Aiming);
                self.cast_held = true;
            }
            (Command::CastDown | Command::CastHeld, FishingState::Aiming) => {
                self.cast_held = true;
            }
            (Command::CastRelease, FishingState::Aiming) => {
                self.cast_held = false;
                if self.cast_power > self.tuning.min_release_power {
                    self.perform_cast(stats);
                }
            }
            (Command::Hook, FishingState::Biting) => self.attempt_hook(world),
            (
                Command::ReelDown,
                FishingState::Waiting | FishingState::FishInterested | FishingState::Biting,
            ) => {
                self.reel_held = true;
                self.reel_in_empty("reel started");
            }
            (Command::ReelDown | Command::ReelHeld, FishingState::Hooked) => {
                self.reel_held = true;
                self.change_state(FishingState::Reeling);
            }
            (Command::ReelDown | Command::ReelHeld, FishingState::Reeling) => {
                self.reel_held = true;
            }
            (Command::ReelUp, FishingState::Reeling) => {
                self.reel_held = false;
                if self.hooked_fish.is_some() {
                    self.change_state(FishingState::Hooked);
                }
            }
            (Command::ReelUp, _) => self.reel_held = false,
            (Command::Cancel, FishingState::Aiming) => {
                log::info!("Cast cancelled");
                self.cast_power = 0.0;
                self.change_state(FishingState::Idle);
            }
            (Command::Cancel, FishingState::Hooked | FishingState::Reeling) => {
                log::info!("Line cut manually");
                self.fail(world, FailReason::LineCut);
            }
            _ => {}
        }
    }

    fn update_aiming(&mut self, aim: Option<Vec2>, dt: f32) {
        let resolver = CastResolver::from_tuning(&self.tuning);
        self.cast_power = resolver.ramp(self.cast_power, self.cast_held, dt);

        if self.cast_held {
            if let Some(dir) = aim.and_then(|raw| resolver.clamp_aim(raw)) {
                self.aim_direction = dir;
            }
        } else if self.cast_power <= 0.0 {
            self.change_state(FishingState::Idle);
        }
    }

    fn perform_cast(&mut self, stats: &dyn StatsProvider) {
        let Some(template) = self.lure_template.as_ref() else {
            return;
        };
        let resolver = CastResolver::from_tuning(&self.tuning);
        let cast = resolver.resolve(self.cast_power, self.aim_direction, stats, &mut self.rng);
        let lure = LureAgent::new(
            self.anchor,
            cast.impulse,
            template,
            stats.lure_attraction(),
            &self.tuning,
        );

        log::info!(
            "Cast: power {:.2}, direction ({:.3}, {:.3})",
            cast.power,
            cast.direction.x,
            cast.direction.y
        );
        self.lure = Some(lure);
        self.last_cast = Some(cast);
        self.settle_timer = 0.0;
        self.events.push(FishingEvent::Affordance {
            kind: Affordance::FishingLine,
            visible: true,
        });
        self.change_state(FishingState::Casting);
    }

    fn update_casting(&mut self, dt: f32) {
        let Some(lure) = self.lure.as_mut() else {
            return;
        };
        lure.step_physics(&self.tuning, dt);
        self.settle_timer += dt;

        if self.settle_timer >= self.tuning.settle_timeout || lure.speed() < self.tuning.settle_speed {
            lure.apply_water_physics(&self.tuning);
            self.change_state(FishingState::Waiting);
        }
    }

    /// Waiting, FishInterested and Biting: the lure is out, fish decide
    fn update_watching<W: WorldQuery>(&mut self, world: &mut W, dt: f32) {
        let was_biting = self.state == FishingState::Biting;

        if let Some(handle) = self.hooked_fish {
            if world.candidate(handle).is_none() {
                log::info!("Biting fish vanished");
                self.reel_in_empty("fish vanished");
                return;
            }
        }

        let water_level = self.tuning.water_level;
        let Some(lure) = self.lure.as_mut() else {
            return;
        };
        lure.step_physics(&self.tuning, dt);
        let signal = lure.update(&*world, water_level, &mut self.rng, dt);
        if let Some(signal) = signal {
            self.apply_lure_signal(signal, &*world);
        }

        if was_biting && self.state == FishingState::Biting {
            self.bite_timer -= dt;
            if self.bite_timer <= 0.0 {
                log::info!("Fish lost interest");
                self.drop_bite();
            }
        }
    }

    /// React to what the lure reported this tick
    pub(crate) fn apply_lure_signal<W: WorldQuery>(&mut self, signal: LureSignal, world: &W) {
        match (signal, self.state) {
            (LureSignal::Interested(handle), FishingState::Waiting) => {
                if let Some(fish) = world.candidate(handle) {
                    log::info!("Fish is interested in lure: {}", fish.species_id);
                }
                self.change_state(FishingState::FishInterested);
            }
            (
                LureSignal::Bite(handle),
                FishingState::Waiting | FishingState::FishInterested,
            ) => {
                if let Some(fish) = world.candidate(handle) {
                    log::info!("Fish is biting: {}", fish.species_id);
                }
                self.hooked_fish = Some(handle);
                self.bite_timer = self.tuning.bite_duration;
                self.change_state(FishingState::Biting);
            }
            (
                LureSignal::InterestLost { vanished: true, .. },
                FishingState::FishInterested | FishingState::Biting,
            ) => self.reel_in_empty("fish vanished"),
            (LureSignal::InterestLost { .. }, FishingState::FishInterested) => {
                self.change_state(FishingState::Waiting);
            }
            (LureSignal::InterestLost { .. }, FishingState::Biting) => {
                log::info!("Biting fish swam off");
                self.drop_bite();
            }
            (signal, state) => {
                log::warn!("Ignoring lure signal {:?} in {:?}", signal, state);
            }
        }
    }

    /// Bite window closed without a hook
    fn drop_bite(&mut self) {
        self.hooked_fish = None;
        self.bite_timer = 0.0;
        if let Some(lure) = self.lure.as_mut() {
            lure.release_interest();
        }
        self.change_state(FishingState::Waiting);
    }

    fn attempt_hook<W: WorldQuery>(&mut self, world: &mut W) {
        let Some(handle) = self.hooked_fish else {
            return;
        };
        let Some(fish) = world.candidate(handle) else {
            self.reel_in_empty("fish vanished");
            return;
        };

        log::info!("Fish hooked: {}", fish.species_id);
        world.engage(handle);
        if let Some(lure) = self.lure.as_mut() {
            lure.occupy();
        }
        self.bite_timer = 0.0;
        self.change_state(FishingState::Hooked);
    }

    /// Any fish on or near the lure is gone; wind the empty line in
    fn reel_in_empty(&mut self, why: &str) {
        let had_fish = self.hooked_fish.take().is_some()
            || self.lure.as_ref().is_some_and(|l| l.interested_fish.is_some());
        if had_fish {
            log::info!("Fish escaped ({})", why);
        }
        self.bite_timer = 0.0;
        if let Some(lure) = self.lure.as_mut() {
            lure.release_interest();
        }
        self.change_state(FishingState::Reeling);
    }

    /// Hooked and Reeling: pull the lure in, fight the fish
    fn update_reeling<W: WorldQuery>(&mut self, world: &mut W, stats: &dyn StatsProvider, dt: f32) {
        let fish: Option<FishCandidate> = match self.hooked_fish {
            Some(handle) => match world.candidate(handle) {
                Some(fish) => Some(fish),
                None => {
                    log::info!("Hooked fish escaped");
                    self.hooked_fish = None;
                    self.change_state(FishingState::Reeling);
                    None
                }
            },
            None => None,
        };

        let factor = if self.reel_held {
            1.0
        } else {
            self.tuning.slack_reel_factor
        };
        let anchor = self.anchor;
        let Some(lure) = self.lure.as_mut() else {
            return;
        };
        lure.reel_towards(anchor, stats.reel_speed() * factor * dt);
        let lure_pos = lure.position;

        if let Some(fish) = &fish {
            let params = self.tension_params();
            let broke = self.tension.step(
                self.reel_held,
                fish.force_multiplier,
                stats.tension_resistance(),
                &params,
                dt,
            );
            if broke {
                log::info!("Line broke due to tension!");
                self.fail(world, FailReason::LineBroke);
                return;
            }
            world.tow(fish.handle, lure_pos);
        }

        if lure_pos.distance(anchor) <= self.tuning.catch_distance {
            match fish {
                Some(mut fish) => {
                    fish.position = lure_pos;
                    self.catch_fish(fish);
                }
                None => {
                    log::info!("Lure reeled in empty");
                    self.cleanup();
                    self.change_state(FishingState::Idle);
                }
            }
        }
    }

    fn catch_fish(&mut self, fish: FishCandidate) {
        log::info!("Fish caught: {}", fish.species_id);
        self.events.push(FishingEvent::FishCaught(fish));
        self.cleanup();
        self.revert_timer = self.tuning.caught_revert_delay;
        self.change_state(FishingState::Caught);
    }

    /// The fish got away: hand it back to the world before tearing down
    fn fail<W: WorldQuery>(&mut self, world: &mut W, reason: FailReason) {
        if let Some(handle) = self.hooked_fish {
            world.disengage(handle);
        }
        self.events.push(FishingEvent::FishingFailed(reason));
        self.cleanup();
        self.revert_timer = match reason {
            FailReason::LineBroke => self.tuning.line_broke_revert_delay,
            FailReason::LineCut => self.tuning.cut_line_revert_delay,
        };
        self.change_state(FishingState::Failed);
    }
}
