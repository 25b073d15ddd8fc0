//! Data-driven fishing balance
//!
//! Every number the session and lure read lives here so balance can be
//! tweaked from JSON without touching the simulation.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::ConfigError;

/// Session-wide tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FishingTuning {
    // === Casting ===
    pub max_cast_power: f32,
    /// Power gained per second while the cast input is held
    pub cast_power_buildup_rate: f32,
    /// Aim is clamped to ± this many degrees from forward (+X)
    pub max_aim_angle_deg: f32,
    pub min_release_power: f32,
    pub reference_cast_distance: f32,
    pub accuracy_jitter: f32,

    // === Settle ===
    pub settle_timeout: f32,
    pub settle_speed: f32,

    // === Bite / reel ===
    pub bite_duration: f32,
    pub catch_distance: f32,
    pub max_tension: f32,
    pub tension_gain: f32,
    pub tension_relief: f32,
    pub slack_reel_factor: f32,

    // === Terminal delays ===
    pub caught_revert_delay: f32,
    pub line_broke_revert_delay: f32,
    pub cut_line_revert_delay: f32,

    // === Lure physics ===
    pub gravity: f32,
    pub air_drag: f32,
    pub water_drag: f32,
    pub water_gravity_scale: f32,
    /// World Y of the water surface
    pub water_level: f32,
    /// Distance from surface to bottom
    pub bottom_depth: f32,
}

impl Default for FishingTuning {
    fn default() -> Self {
        Self {
            max_cast_power: MAX_CAST_POWER,
            cast_power_buildup_rate: CAST_POWER_BUILDUP_RATE,
            max_aim_angle_deg: MAX_AIM_ANGLE_DEG,
            min_release_power: MIN_RELEASE_POWER,
            reference_cast_distance: REFERENCE_CAST_DISTANCE,
            accuracy_jitter: ACCURACY_JITTER,

            settle_timeout: SETTLE_TIMEOUT,
            settle_speed: SETTLE_SPEED,

            bite_duration: BITE_DURATION,
            catch_distance: CATCH_DISTANCE,
            max_tension: MAX_TENSION,
            tension_gain: TENSION_GAIN,
            tension_relief: TENSION_RELIEF,
            slack_reel_factor: SLACK_REEL_FACTOR,

            caught_revert_delay: CAUGHT_REVERT_DELAY,
            line_broke_revert_delay: LINE_BROKE_REVERT_DELAY,
            cut_line_revert_delay: CUT_LINE_REVERT_DELAY,

            gravity: GRAVITY,
            air_drag: AIR_DRAG,
            water_drag: WATER_DRAG,
            water_gravity_scale: WATER_GRAVITY_SCALE,
            water_level: WATER_LEVEL,
            bottom_depth: BOTTOM_DEPTH,
        }
    }
}

impl FishingTuning {
    /// Max aim angle in radians
    pub fn max_aim_angle(&self) -> f32 {
        self.max_aim_angle_deg.to_radians()
    }

    /// World Y of the lake bottom
    pub fn bottom_y(&self) -> f32 {
        self.water_level - self.bottom_depth
    }

    /// Reject values that would make the state machine misbehave
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_cast_power <= 0.0 {
            return Err(ConfigError::InvalidTuning(
                "max_cast_power must be positive".into(),
            ));
        }
        if self.max_tension <= 0.0 {
            return Err(ConfigError::InvalidTuning(
                "max_tension must be positive".into(),
            ));
        }
        if self.reference_cast_distance <= 0.0 {
            return Err(ConfigError::InvalidTuning(
                "reference_cast_distance must be positive".into(),
            ));
        }
        if !self.accuracy_jitter.is_finite() || self.accuracy_jitter < 0.0 {
            return Err(ConfigError::InvalidTuning(
                "accuracy_jitter must be a finite, non-negative number".into(),
            ));
        }
        let delays = [
            self.bite_duration,
            self.settle_timeout,
            self.caught_revert_delay,
            self.line_broke_revert_delay,
            self.cut_line_revert_delay,
        ];
        if delays.iter().any(|d| d.is_nan() || *d < 0.0) {
            return Err(ConfigError::InvalidTuning(
                "durations must not be negative".into(),
            ));
        }
        Ok(())
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let tuning: Self =
            serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        tuning.validate()?;
        Ok(tuning)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        serde_json::to_string_pretty(self).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Load tuning from a JSON file, falling back to defaults
    pub fn load_or_default(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(json) => match Self::from_json(&json) {
                Ok(tuning) => {
                    log::info!("Loaded tuning from {}", path.display());
                    tuning
                }
                Err(e) => {
                    log::warn!("Ignoring tuning file {}: {}", path.display(), e);
                    Self::default()
                }
            },
            Err(_) => {
                log::info!("Using default tuning");
                Self::default()
            }
        }
    }
}

/// Attributes of the lure spawned on each cast
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LureTemplate {
    /// Lure size compared against fish size for compatibility
    pub size_multiplier: f32,
    /// Carried for hosts that render or filter lures; the attraction model ignores it
    pub visibility_multiplier: f32,
    pub interest_radius: f32,
    /// Carried for hosts; interest is re-validated against `interest_radius` only
    pub bite_radius: f32,
    pub base_bite_chance: f32,
    /// Bite wait is drawn uniformly from [min_bite_time, max_bite_time]
    pub min_bite_time: f32,
    pub max_bite_time: f32,
    pub interest_threshold: f32,
    /// Chance a fish that declined to bite waits for another try
    pub stay_interested_chance: f32,
}

impl Default for LureTemplate {
    fn default() -> Self {
        Self {
            size_multiplier: 1.0,
            visibility_multiplier: 1.0,
            interest_radius: 8.0,
            bite_radius: 2.0,
            base_bite_chance: 0.3,
            min_bite_time: 2.0,
            max_bite_time: 10.0,
            interest_threshold: 0.5,
            stay_interested_chance: 0.4,
        }
    }
}

impl LureTemplate {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.interest_radius.is_nan() || self.interest_radius <= 0.0 {
            return Err(ConfigError::InvalidTuning(
                "interest_radius must be positive".into(),
            ));
        }
        // Sampling the wait panics on NaN or unbounded ranges
        if !self.min_bite_time.is_finite()
            || !self.max_bite_time.is_finite()
            || self.min_bite_time < 0.0
            || self.max_bite_time < self.min_bite_time
        {
            return Err(ConfigError::InvalidTuning(format!(
                "bite wait range [{}, {}] is invalid",
                self.min_bite_time, self.max_bite_time
            )));
        }
        Ok(())
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let template: Self =
            serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        template.validate()?;
        Ok(template)
    }
}
