//! Configuration errors
//!
//! Gameplay failures are never errors; they are session states. These only
//! describe a session that was wired up wrong.

/// Reported once when a session is built from an unusable configuration
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("no stats provider configured")]
    MissingStats,

    #[error("no lure template configured")]
    MissingLureTemplate,

    #[error("invalid tuning: {0}")]
    InvalidTuning(String),

    #[error("tuning parse failed: {0}")]
    Parse(String),
}
