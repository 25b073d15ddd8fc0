//! Line tension
//!
//! Reeling against a fish builds tension, slack lets it bleed off. Hitting
//! the maximum breaks the line.

use serde::{Deserialize, Serialize};

/// Bounded line tension
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct TensionState {
    pub value: f32,
}

/// Inputs for one tension step
#[derive(Debug, Clone, Copy)]
pub struct TensionParams {
    pub max_tension: f32,
    /// Tension per (force · second) while reeling
    pub gain: f32,
    /// Relief per (resistance · second) while slack
    pub relief: f32,
}

impl TensionState {
    /// Advance one tick. Returns true when the line breaks this tick.
    pub fn step(
        &mut self,
        reel_held: bool,
        fish_force: f32,
        tension_resistance: f32,
        params: &TensionParams,
        dt: f32,
    ) -> bool {
        if reel_held {
            self.value += fish_force * dt * params.gain;
        } else {
            self.value -= tension_resistance * dt * params.relief;
        }
        self.value = self.value.clamp(0.0, params.max_tension);
        self.is_broken(params.max_tension)
    }

    pub fn is_broken(&self, max_tension: f32) -> bool {
        self.value >= max_tension
    }

    pub fn reset(&mut self) {
        self.value = 0.0;
    }
}
