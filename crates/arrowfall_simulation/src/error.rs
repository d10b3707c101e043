//! Ошибки конфигурации и построения уровня
//!
//! `ConfigError` фатальна для уровня целиком, `PlacementError` только для одного врага.
//! Гейты геймплея (cooldown, нет прыжков) ошибками не являются.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("required capability is not installed: {0}")]
    MissingCapability(&'static str),
    #[error("malformed level data: {0}")]
    MalformedLevel(#[from] ron::error::SpannedError),
    #[error("level serialization failed: {0}")]
    Serialize(#[from] ron::Error),
    #[error("invalid level bounds {width}x{height}")]
    InvalidBounds { width: f32, height: f32 },
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum PlacementError {
    #[error("unknown enemy archetype '{0}'")]
    UnknownArchetype(String),
    #[error("enemy #{index}: patrol needs at least two waypoints, got {count}")]
    TooFewWaypoints { index: usize, count: usize },
    #[error("enemy #{index}: patrol waypoints coincide")]
    ZeroExtent { index: usize },
    #[error("archetype '{archetype}': invalid {stat}")]
    InvalidStat { archetype: String, stat: &'static str },
}
