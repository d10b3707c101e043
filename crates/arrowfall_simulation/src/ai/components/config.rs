//! Параметры врагов и реестр архетипов

use std::collections::BTreeMap;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::PlacementError;

/// Как мерить дистанцию до героя
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DistanceMetric {
    /// Между центрами
    Center,
    /// Минимальный зазор между AABB (0 при пересечении)
    #[default]
    EdgeToEdge,
}

/// Как враг замечает героя вне attack range
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PerceptionStrategy {
    /// distance ≤ chase_range
    Range,
    /// Конус лучей по направлению взгляда; стены закрывают обзор
    ConeRaycast {
        patrol_cone_deg: f32,
        search_cone_deg: f32,
        length: f32,
        rays: u32,
    },
}

/// Механика разворота в патруле
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PatrolMechanic {
    /// Идём пока впереди нет стены/обрыва
    VelocityPace { probe_ahead: f32, check_ledges: bool },
    /// Качаемся между origin и origin + extent (из waypoints уровня)
    WaypointOscillate { tolerance: f32 },
}

impl PatrolMechanic {
    pub fn needs_waypoints(&self) -> bool {
        matches!(self, PatrolMechanic::WaypointOscillate { .. })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KnockbackConfig {
    /// Горизонтальная скорость отброса
    pub strength: f32,
    /// Через сколько ms вернуть скорость движения
    pub restore_ms: u64,
}

/// Параметры врага (immutable после spawn)
#[derive(Component, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnemyConfig {
    pub max_health: u32,
    pub chase_speed: f32,
    pub patrol_speed: f32,
    pub attack_range: f32,
    pub chase_range: f32,
    pub attack_cooldown_ms: u64,
    pub damage: u32,
    pub hitbox_width: f32,
    pub hitbox_height: f32,
    pub half_width: f32,
    pub half_height: f32,
    #[serde(default)]
    pub distance_metric: DistanceMetric,
    pub perception: PerceptionStrategy,
    pub patrol: PatrolMechanic,
    #[serde(default)]
    pub knockback: Option<KnockbackConfig>,
}

impl Default for EnemyConfig {
    /// Pixie из первого уровня
    fn default() -> Self {
        Self {
            max_health: 30,
            chase_speed: 80.0,
            patrol_speed: 40.0,
            attack_range: 30.0,
            chase_range: 200.0,
            attack_cooldown_ms: 1000,
            damage: 1,
            hitbox_width: 30.0,
            hitbox_height: 32.0,
            half_width: 12.0,
            half_height: 12.0,
            distance_metric: DistanceMetric::EdgeToEdge,
            perception: PerceptionStrategy::Range,
            patrol: PatrolMechanic::VelocityPace {
                probe_ahead: 4.0,
                check_ledges: true,
            },
            knockback: Some(KnockbackConfig {
                strength: 150.0,
                restore_ms: 400,
            }),
        }
    }
}

impl EnemyConfig {
    pub fn hitbox_size(&self) -> Vec2 {
        Vec2::new(self.hitbox_width, self.hitbox_height)
    }

    pub fn validate(&self, archetype: &str) -> Result<(), PlacementError> {
        let invalid = |stat: &'static str| PlacementError::InvalidStat {
            archetype: archetype.to_string(),
            stat,
        };

        if self.max_health == 0 {
            return Err(invalid("max_health"));
        }
        if !non_negative(self.chase_speed) {
            return Err(invalid("chase_speed"));
        }
        if !non_negative(self.patrol_speed) {
            return Err(invalid("patrol_speed"));
        }
        if !non_negative(self.attack_range) {
            return Err(invalid("attack_range"));
        }
        if !non_negative(self.chase_range) {
            return Err(invalid("chase_range"));
        }
        if !(positive(self.hitbox_width) && positive(self.hitbox_height)) {
            return Err(invalid("hitbox"));
        }
        if !(positive(self.half_width) && positive(self.half_height)) {
            return Err(invalid("body"));
        }
        if let PerceptionStrategy::ConeRaycast { rays, length, .. } = self.perception {
            if rays == 0 || !positive(length) {
                return Err(invalid("perception"));
            }
        }
        Ok(())
    }
}

fn non_negative(value: f32) -> bool {
    value.is_finite() && value >= 0.0
}

fn positive(value: f32) -> bool {
    value.is_finite() && value > 0.0
}

/// Реестр архетипов врагов: имя из данных уровня → EnemyConfig
#[derive(Resource, Debug, Clone, Serialize, Deserialize)]
pub struct ArchetypeRegistry {
    pub archetypes: BTreeMap<String, EnemyConfig>,
}

impl Default for ArchetypeRegistry {
    fn default() -> Self {
        let pixie = EnemyConfig::default();

        let pixie_sentry = EnemyConfig {
            perception: PerceptionStrategy::ConeRaycast {
                patrol_cone_deg: 30.0,
                search_cone_deg: 90.0,
                length: 200.0,
                rays: 7,
            },
            ..pixie.clone()
        };

        let wisp = EnemyConfig {
            max_health: 20,
            patrol: PatrolMechanic::WaypointOscillate { tolerance: 1.0 },
            knockback: None,
            ..pixie.clone()
        };

        let mut archetypes = BTreeMap::new();
        archetypes.insert("pixie".to_string(), pixie);
        archetypes.insert("pixie_sentry".to_string(), pixie_sentry);
        archetypes.insert("wisp".to_string(), wisp);
        Self { archetypes }
    }
}

impl ArchetypeRegistry {
    pub fn get(&self, archetype: &str) -> Result<&EnemyConfig, PlacementError> {
        self.archetypes
            .get(archetype)
            .ok_or_else(|| PlacementError::UnknownArchetype(archetype.to_string()))
    }

    pub fn insert(&mut self, archetype: impl Into<String>, config: EnemyConfig) {
        self.archetypes.insert(archetype.into(), config);
    }
}
