//! Hero module
//!
//! Управляемый игроком лучник: ходьба, double jump, стрельба, hurt/death.
//! Input приходит через `ActionInput` resource, решения принимает `HeroCtx`.

use bevy::prelude::*;
use bevy_rapier2d::prelude::{Collider, LockedAxes, RigidBody, Velocity};
use serde::{Deserialize, Serialize};

use crate::animation::{AnimationId, PlayOptions, SpriteAnimator};
use crate::components::{BodySize, Facing, Grounded, Health};
use crate::SimSet;

pub mod input;
pub mod state;
pub mod systems;

pub use input::{quadrant_action, ActionInput, HeroButton};
pub use state::{
    HeroAction, HeroActionState, HeroCtx, HeroQuery, HeroQueryItem, HeroStats, Invincibility, JumpCharges,
};

/// Маркер героя
///
/// AI использует `With<Hero>` как цель, hit resolution: как допустимую цель hitbox'а.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct Hero;

/// Параметры героя (одинаковы для всех уровней)
#[derive(Resource, Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HeroConfig {
    pub stats: HeroStats,
    pub max_health: u32,
    pub max_jumps: u32,
    pub half_width: f32,
    pub half_height: f32,
}

impl Default for HeroConfig {
    fn default() -> Self {
        Self {
            stats: HeroStats::default(),
            max_health: 5,
            max_jumps: 2,
            half_width: 10.0,
            half_height: 16.0,
        }
    }
}

/// Spawn героя
///
/// Стоит на земле; в Kinematic режиме `Grounded` пересчитается в первом тике.
pub fn spawn_hero(commands: &mut Commands, config: &HeroConfig, position: Vec2) -> Entity {
    let mut animator = SpriteAnimator::default();
    animator.play(AnimationId::HeroIdle, PlayOptions::default(), 0);

    commands
        .spawn((
            Hero,
            Transform::from_translation(position.extend(0.0)),
            BodySize::new(config.half_width, config.half_height),
            Grounded(true),
            config.stats,
            HeroActionState::default(),
            Facing::Right,
            animator,
            JumpCharges::new(config.max_jumps),
            Health::new(config.max_health),
            Invincibility::default(),
            // Rapier
            Velocity::zero(),
            RigidBody::Dynamic,
            LockedAxes::ROTATION_LOCKED,
            Collider::cuboid(config.half_width, config.half_height),
        ))
        .id()
}

/// Hero Plugin
pub struct HeroPlugin;

impl Plugin for HeroPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<HeroConfig>()
            .add_systems(FixedUpdate, systems::hero_control.in_set(SimSet::Hero));
    }
}
