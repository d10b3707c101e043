//! Enemy AI module
//!
//! FSM врага: Patrolling ⇄ Chasing → Attacking, Hurt, Dead.
//! Параметры приходят из `ArchetypeRegistry`, поведение по архетипу различается
//! стратегиями (метрика дистанции, восприятие, патруль, knockback), а не подклассами.

use bevy::prelude::*;
use bevy_rapier2d::prelude::{ActiveEvents, Collider, ColliderDisabled, LockedAxes, RigidBody, Sensor, Velocity};

use crate::animation::{AnimationId, PlayOptions, SpriteAnimator};
use crate::combat::{AttackHitbox, HitboxLink};
use crate::components::{BodySize, Facing, Grounded, Health};
use crate::SimSet;

pub mod behavior;
pub mod components;
pub mod patrol;
pub mod perception;
pub mod systems;

// Re-export основных типов
pub use behavior::{EnemyCtx, EnemyQuery, EnemyQueryItem};
pub use components::{
    ArchetypeRegistry, AttackGates, BehaviorState, DistanceMetric, Enemy, EnemyConfig, KnockbackConfig,
    PatrolMechanic, PatrolState, PerceptionStrategy, TargetHero,
};
pub use perception::HeroView;

/// Параметры spawn'а одного врага
#[derive(Debug, Clone)]
pub struct EnemySpawn<'a> {
    pub archetype: &'a str,
    pub config: &'a EnemyConfig,
    pub position: Vec2,
    pub facing: Facing,
    /// Смещение второй точки патруля (WaypointOscillate)
    pub patrol_extent: Option<f32>,
    pub target: Entity,
}

/// Spawn врага вместе с его attack hitbox (отдельный entity, выключен)
pub fn spawn_enemy(commands: &mut Commands, spawn: &EnemySpawn) -> Entity {
    let config = spawn.config;

    let mut animator = SpriteAnimator::default();
    animator.play(
        AnimationId::EnemyIdle,
        PlayOptions {
            flip_x: Some(spawn.facing.flip_x()),
            ..Default::default()
        },
        0,
    );

    let enemy = commands
        .spawn((
            (
                Enemy {
                    archetype: spawn.archetype.to_string(),
                },
                Transform::from_translation(spawn.position.extend(0.0)),
                BodySize::new(config.half_width, config.half_height),
                Grounded(true),
                config.clone(),
                Health::new(config.max_health),
                spawn.facing,
                animator,
            ),
            (
                BehaviorState::Patrolling,
                AttackGates::default(),
                PatrolState {
                    patrolling: false,
                    origin: spawn.position,
                    extent: spawn.patrol_extent,
                },
                TargetHero(spawn.target),
            ),
            // Rapier
            (
                Velocity::zero(),
                RigidBody::Dynamic,
                LockedAxes::ROTATION_LOCKED,
                Collider::cuboid(config.half_width, config.half_height),
            ),
        ))
        .id();

    let size = config.hitbox_size();
    let hitbox = commands
        .spawn((
            AttackHitbox::new(enemy, size, config.damage),
            Transform::from_translation(spawn.position.extend(0.0)),
            Collider::cuboid(size.x / 2.0, size.y / 2.0),
            Sensor,
            ActiveEvents::COLLISION_EVENTS,
            ColliderDisabled,
        ))
        .id();

    commands.entity(enemy).insert(HitboxLink(hitbox));
    enemy
}

/// AI Plugin
///
/// Порядок выполнения:
/// 1. Reactions: конец атаки (AnimationFinished), восстановление после knockback (TimerFired)
/// 2. Enemy: решение на тик, `AttackStarted`
pub struct AIPlugin;

impl Plugin for AIPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ArchetypeRegistry>()
            .add_systems(
                FixedUpdate,
                (systems::finish_enemy_attacks, systems::restore_knockback_velocity)
                    .chain()
                    .in_set(SimSet::Reactions),
            )
            .add_systems(FixedUpdate, systems::enemy_ai_tick.in_set(SimSet::Enemy));
    }
}
