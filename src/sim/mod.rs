//! Deterministic simulation module
//!
//! All fishing logic lives here. This module must be pure and deterministic:
//! - Explicit `dt` only, no wall clock
//! - Seeded RNG only
//! - Stable iteration order (fish scanned in world order)
//! - No rendering or platform dependencies

pub mod attraction;
pub mod cast;
pub mod lure;
pub mod state;
pub mod tension;
pub mod tick;

pub use attraction::{LureProfile, bite_chance, interest, size_compatibility};
pub use cast::{CastParameters, CastResolver};
pub use lure::{LureAgent, LureSignal};
pub use state::{
    Affordance, DEFAULT_ANCHOR, FailReason, FishingEvent, FishingSession, FishingState,
    SessionConfig,
};
pub use tension::{TensionParams, TensionState};
pub use tick::{Command, TickInput};
