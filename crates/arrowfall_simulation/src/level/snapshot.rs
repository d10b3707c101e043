//! Snapshot состояния врага
//!
//! Сохраняет то, от чего зависит следующее решение AI: позиция, поведение,
//! здоровье, направление. `patrolling` восстанавливается из поведения.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::ai::{BehaviorState, Enemy, PatrolState};
use crate::components::{position_2d, Facing, Health};
use crate::error::ConfigError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnemySnapshot {
    pub archetype: String,
    pub x: f32,
    pub y: f32,
    pub behavior: BehaviorState,
    pub health: Health,
    pub facing: Facing,
}

impl EnemySnapshot {
    pub fn capture(world: &World, entity: Entity) -> Option<Self> {
        let entity = world.get_entity(entity).ok()?;
        let enemy = entity.get::<Enemy>()?;
        let position = position_2d(entity.get::<Transform>()?);

        Some(Self {
            archetype: enemy.archetype.clone(),
            x: position.x,
            y: position.y,
            behavior: *entity.get::<BehaviorState>()?,
            health: *entity.get::<Health>()?,
            facing: *entity.get::<Facing>()?,
        })
    }

    /// Применить snapshot к существующему врагу. false если entity не враг.
    pub fn restore(&self, world: &mut World, entity: Entity) -> bool {
        let Ok(mut entity) = world.get_entity_mut(entity) else {
            return false;
        };
        if !entity.contains::<Enemy>() {
            return false;
        }

        if let Some(mut transform) = entity.get_mut::<Transform>() {
            transform.translation.x = self.x;
            transform.translation.y = self.y;
        }
        if let Some(mut behavior) = entity.get_mut::<BehaviorState>() {
            *behavior = self.behavior;
        }
        if let Some(mut health) = entity.get_mut::<Health>() {
            *health = self.health;
        }
        if let Some(mut facing) = entity.get_mut::<Facing>() {
            *facing = self.facing;
        }
        if let Some(mut patrol) = entity.get_mut::<PatrolState>() {
            patrol.patrolling = self.behavior == BehaviorState::Patrolling;
        }
        true
    }

    pub fn to_ron(&self) -> Result<String, ConfigError> {
        Ok(ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())?)
    }

    pub fn from_ron(text: &str) -> Result<Self, ConfigError> {
        Ok(ron::from_str(text)?)
    }
}
