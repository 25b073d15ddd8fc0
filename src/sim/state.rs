//! Fishing session state
//!
//! Everything one fishing attempt needs lives on [`FishingSession`]. Nothing
//! here is persisted; the session is rebuilt per fishing spot.

use std::rc::Rc;

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::cast::CastParameters;
use super::lure::LureAgent;
use super::tension::{TensionParams, TensionState};
use crate::error::ConfigError;
use crate::tuning::{FishingTuning, LureTemplate};
use crate::world::{FishCandidate, FishHandle, StatsProvider};

/// Where the player stands (the rod tip) unless configured otherwise
pub const DEFAULT_ANCHOR: Vec2 = Vec2::new(0.0, 2.0);

/// Phase of the fishing interaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FishingState {
    Idle,
    /// Cast input held, power building
    Aiming,
    /// Lure in flight, waiting to settle
    Casting,
    Waiting,
    FishInterested,
    /// Bite window open, hook now
    Biting,
    Hooked,
    Reeling,
    /// Transient, reverts to Idle
    Caught,
    /// Transient, reverts to Idle
    Failed,
}

impl FishingState {
    /// States in which the session may hold a fish reference
    pub fn may_hold_fish(&self) -> bool {
        matches!(
            self,
            FishingState::Biting | FishingState::Hooked | FishingState::Reeling
        )
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, FishingState::Caught | FishingState::Failed)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FailReason {
    LineBroke,
    LineCut,
}

/// Presentation toggles the host mirrors in its UI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Affordance {
    CastingMeter,
    BiteIndicator,
    TensionMeter,
    FishingLine,
}

/// Fire-and-forget notifications for the host
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FishingEvent {
    StateChanged { from: FishingState, to: FishingState },
    FishCaught(FishCandidate),
    FishingFailed(FailReason),
    Affordance { kind: Affordance, visible: bool },
}

/// Collaborators and tuning a session is built from
#[derive(Clone, Default)]
pub struct SessionConfig {
    pub tuning: FishingTuning,
    pub lure: Option<LureTemplate>,
    pub stats: Option<Rc<dyn StatsProvider>>,
    pub seed: u64,
    pub anchor: Option<Vec2>,
}

impl SessionConfig {
    pub fn new(stats: Rc<dyn StatsProvider>) -> Self {
        Self {
            tuning: FishingTuning::default(),
            lure: Some(LureTemplate::default()),
            stats: Some(stats),
            seed: 0,
            anchor: None,
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_tuning(mut self, tuning: FishingTuning) -> Self {
        self.tuning = tuning;
        self
    }

    pub fn with_lure(mut self, lure: LureTemplate) -> Self {
        self.lure = Some(lure);
        self
    }

    pub fn with_anchor(mut self, anchor: Vec2) -> Self {
        self.anchor = Some(anchor);
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.stats.is_none() {
            return Err(ConfigError::MissingStats);
        }
        let lure = self.lure.as_ref().ok_or(ConfigError::MissingLureTemplate)?;
        self.tuning.validate()?;
        lure.validate()
    }
}

/// The fishing state machine
pub struct FishingSession {
    pub(crate) tuning: FishingTuning,
    pub(crate) lure_template: Option<LureTemplate>,
    pub(crate) stats: Option<Rc<dyn StatsProvider>>,
    pub(crate) config_error: Option<ConfigError>,
    pub(crate) seed: u64,
    pub(crate) rng: Pcg32,

    pub(crate) state: FishingState,
    pub(crate) cast_power: f32,
    pub(crate) aim_direction: Vec2,
    pub(crate) tension: TensionState,
    pub(crate) bite_timer: f32,
    pub(crate) hooked_fish: Option<FishHandle>,
    pub(crate) lure: Option<LureAgent>,
    pub(crate) anchor: Vec2,
    pub(crate) last_cast: Option<CastParameters>,

    /// Input latches (down sets, release clears)
    pub(crate) cast_held: bool,
    pub(crate) reel_held: bool,

    /// Countdowns advanced by `advance`
    pub(crate) settle_timer: f32,
    pub(crate) revert_timer: f32,

    pub(crate) events: Vec<FishingEvent>,
}

impl FishingSession {
    /// Build a session. A bad config is logged once and leaves the session inert.
    pub fn new(config: SessionConfig) -> Self {
        let config_error = config.validate().err();
        if let Some(err) = &config_error {
            log::error!("Fishing session disabled: {}", err);
        }

        Self {
            tuning: config.tuning,
            lure_template: config.lure,
            stats: config.stats,
            config_error,
            seed: config.seed,
            rng: Pcg32::seed_from_u64(config.seed),
            state: FishingState::Idle,
            cast_power: 0.0,
            aim_direction: Vec2::X,
            tension: TensionState::default(),
            bite_timer: 0.0,
            hooked_fish: None,
            lure: None,
            anchor: config.anchor.unwrap_or(DEFAULT_ANCHOR),
            last_cast: None,
            cast_held: false,
            reel_held: false,
            settle_timer: 0.0,
            revert_timer: 0.0,
            events: Vec::new(),
        }
    }

    pub fn state(&self) -> FishingState {
        self.state
    }

    pub fn cast_power(&self) -> f32 {
        self.cast_power
    }

    pub fn aim_direction(&self) -> Vec2 {
        self.aim_direction
    }

    pub fn tension(&self) -> f32 {
        self.tension.value
    }

    pub fn bite_timer(&self) -> f32 {
        self.bite_timer
    }

    pub fn hooked_fish(&self) -> Option<FishHandle> {
        self.hooked_fish
    }

    pub fn lure(&self) -> Option<&LureAgent> {
        self.lure.as_ref()
    }

    pub fn anchor(&self) -> Vec2 {
        self.anchor
    }

    /// Move the player; takes effect on the next tick
    pub fn set_anchor(&mut self, anchor: Vec2) {
        self.anchor = anchor;
    }

    pub fn tuning(&self) -> &FishingTuning {
        &self.tuning
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn last_cast(&self) -> Option<&CastParameters> {
        self.last_cast.as_ref()
    }

    pub fn config_error(&self) -> Option<&ConfigError> {
        self.config_error.as_ref()
    }

    pub fn events(&self) -> &[FishingEvent] {
        &self.events
    }

    /// Hand all pending events to the host
    pub fn drain_events(&mut self) -> Vec<FishingEvent> {
        std::mem::take(&mut self.events)
    }

    pub(crate) fn tension_params(&self) -> TensionParams {
        TensionParams {
            max_tension: self.tuning.max_tension,
            gain: self.tuning.tension_gain,
            relief: self.tuning.tension_relief,
        }
    }

    fn emit_affordance(&mut self, kind: Affordance, visible: bool) {
        self.events.push(FishingEvent::Affordance { kind, visible });
    }

    /// Switch state, running exit/entry side effects and notifying the host
    pub(crate) fn change_state(&mut self, to: FishingState) {
        let from = self.state;
        if from == to {
            return;
        }
        let tension_phase = |s: FishingState| matches!(s, FishingState::Hooked | FishingState::Reeling);

        match from {
            FishingState::Aiming => self.emit_affordance(Affordance::CastingMeter, false),
            FishingState::Biting => self.emit_affordance(Affordance::BiteIndicator, false),
            s if tension_phase(s) && !tension_phase(to) => {
                self.emit_affordance(Affordance::TensionMeter, false)
            }
            _ => {}
        }

        self.state = to;

        match to {
            FishingState::Idle => {
                self.cast_power = 0.0;
                self.tension.reset();
                self.cast_held = false;
            }
            FishingState::Aiming => {
                self.cast_power = 0.0;
                self.emit_affordance(Affordance::CastingMeter, true);
            }
            FishingState::Biting => self.emit_affordance(Affordance::BiteIndicator, true),
            s if tension_phase(s) && !tension_phase(from) => {
                self.emit_affordance(Affordance::TensionMeter, true)
            }
            _ => {}
        }

        self.events.push(FishingEvent::StateChanged { from, to });
        log::info!("Fishing state changed: {:?} -> {:?}", from, to);
    }

    /// Tear down the lure and everything tied to it, in one step
    pub(crate) fn cleanup(&mut self) {
        if self.lure.take().is_some() {
            self.emit_affordance(Affordance::FishingLine, false);
        }
        self.hooked_fish = None;
        self.tension.reset();
        self.bite_timer = 0.0;
        self.settle_timer = 0.0;
        self.reel_held = false;
    }

    /// Session invariants, checked by tests after every tick
    pub fn invariants_hold(&self) -> bool {
        let fish_ok = self.hooked_fish.is_none() || self.state.may_hold_fish();
        let power_ok = (0.0..=self.tuning.max_cast_power).contains(&self.cast_power);
        let tension_ok = (0.0..=self.tuning.max_tension).contains(&self.tension.value);
        let lure_ok = match self.state {
            FishingState::Idle | FishingState::Aiming => self.lure.is_none(),
            s if s.is_terminal() => self.lure.is_none(),
            _ => self.lure.is_some(),
        };
        fish_ok && power_ok && tension_ok && lure_ok
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::FishingStats;

    #[test]
    fn test_new_session_is_idle() {
        let session = FishingSession::new(SessionConfig::new(Rc::new(FishingStats::default())));
        assert_eq!(session.state(), FishingState::Idle);
        assert!(session.config_error().is_none());
        assert!(session.invariants_hold());
        assert_eq!(session.anchor(), DEFAULT_ANCHOR);
    }

    #[test]
    fn test_missing_collaborators_reported() {
        let session = FishingSession::new(SessionConfig::default());
        assert_eq!(session.config_error(), Some(&ConfigError::MissingStats));

        let mut config = SessionConfig::new(Rc::new(FishingStats::default()));
        config.lure = None;
        assert_eq!(config.validate(), Err(ConfigError::MissingLureTemplate));
    }

    #[test]
    fn test_change_state_emits_entry_and_exit() {
        let mut session = FishingSession::new(SessionConfig::new(Rc::new(FishingStats::default())));
        session.change_state(FishingState::Aiming);
        session.change_state(FishingState::Idle);
        assert_eq!(
            session.drain_events(),
            vec![
                FishingEvent::Affordance {
                    kind: Affordance::CastingMeter,
                    visible: true
                },
                FishingEvent::StateChanged {
                    from: FishingState::Idle,
                    to: FishingState::Aiming
                },
                FishingEvent::Affordance {
                    kind: Affordance::CastingMeter,
                    visible: false
                },
                FishingEvent::StateChanged {
                    from: FishingState::Aiming,
                    to: FishingState::Idle
                },
            ]
        );
        // Same-state transition is silent
        session.change_state(FishingState::Idle);
        assert!(session.events().is_empty());
    }

    #[test]
    fn test_event_stream_serializes_for_replay() {
        let events = vec![
            FishingEvent::StateChanged {
                from: FishingState::Biting,
                to: FishingState::Hooked,
            },
            FishingEvent::Affordance {
                kind: Affordance::TensionMeter,
                visible: true,
            },
            FishingEvent::FishCaught(FishCandidate::new("perch", Vec2::new(1.0, -2.0))),
            FishingEvent::FishingFailed(FailReason::LineCut),
        ];
        let json = serde_json::to_string(&events).unwrap();
        assert!(json.contains("LineCut"));
        let replayed: Vec<FishingEvent> = serde_json::from_str(&json).unwrap();
        assert_eq!(replayed, events);
    }

    #[test]
    fn test_tension_meter_survives_hooked_reeling_toggle() {
        let mut session = FishingSession::new(SessionConfig::new(Rc::new(FishingStats::default())));
        session.state = FishingState::Hooked;
        session.change_state(FishingState::Reeling);
        session.change_state(FishingState::Hooked);
        assert!(
            session
                .events()
                .iter()
                .all(|e| !matches!(e, FishingEvent::Affordance { .. }))
        );
    }
}
