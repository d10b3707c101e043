//! Стрелы героя
//!
//! Жизненный цикл:
//! - spawn из `HeroCtx::shoot` (скорость = facing × projectile_speed, без gravity)
//! - попадание во врага → урон, немедленный despawn
//! - попадание в стену → остановка, despawn через `PROJECTILE_WALL_GRACE_MS`
//! - вылет за границы уровня → despawn
//!
//! `spent` гарантирует что стрела наносит урон не больше одного раза.

use bevy::prelude::*;
use bevy_rapier2d::prelude::{ActiveEvents, Collider, GravityScale, RigidBody, Sensor, Velocity};

use crate::ai::Enemy;
use crate::clock::{DelayedAction, DelayedCalls, SimClock, TimerFired};
use crate::components::{position_2d, BodySize, Facing, Health};
use crate::level::LevelBounds;
use crate::logger;

use super::damage::DamageEvent;

/// Сколько стрела торчит в стене
pub const PROJECTILE_WALL_GRACE_MS: u64 = 4000;

/// Полуразмеры стрелы
pub const PROJECTILE_HALF_EXTENTS: Vec2 = Vec2::new(6.0, 2.0);

#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct Projectile {
    pub shooter: Entity,
    pub damage: u32,
    /// Уже попала (во врага или стену)
    pub spent: bool,
}

/// Маркер: стрела воткнулась в стену
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct StuckInWall;

/// Запрос на spawn стрелы (собирается во время обработки действий героя)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectileSpawn {
    pub shooter: Entity,
    pub position: Vec2,
    pub velocity: Vec2,
    pub damage: u32,
}

#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProjectileHit {
    pub projectile: Entity,
    pub target: Entity,
}

#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProjectileStruckWall {
    pub projectile: Entity,
}

pub fn spawn_projectile(commands: &mut Commands, spawn: &ProjectileSpawn) -> Entity {
    let facing = Facing::from_delta(spawn.velocity.x, Facing::Right);

    commands
        .spawn((
            Projectile {
                shooter: spawn.shooter,
                damage: spawn.damage,
                spent: false,
            },
            Transform::from_translation(spawn.position.extend(0.0)),
            BodySize::new(PROJECTILE_HALF_EXTENTS.x, PROJECTILE_HALF_EXTENTS.y),
            facing,
            Velocity::linear(spawn.velocity),
            // Rapier
            RigidBody::Dynamic,
            GravityScale(0.0),
            Collider::cuboid(PROJECTILE_HALF_EXTENTS.x, PROJECTILE_HALF_EXTENTS.y),
            Sensor,
            ActiveEvents::COLLISION_EVENTS,
        ))
        .id()
}

/// Система: стрела попала во врага
pub fn resolve_projectile_hits(
    mut commands: Commands,
    mut hits: EventReader<ProjectileHit>,
    mut projectiles: Query<(&mut Projectile, &Transform)>,
    targets: Query<&Health, With<Enemy>>,
    mut damage_events: EventWriter<DamageEvent>,
) {
    for hit in hits.read() {
        let Ok((mut projectile, transform)) = projectiles.get_mut(hit.projectile) else {
            continue;
        };
        if projectile.spent {
            continue;
        }

        // Мёртвый враг (доигрывает death animation) стрелу не поглощает
        let target_alive = targets.get(hit.target).is_ok_and(|health| health.is_alive());
        if !target_alive {
            continue;
        }

        projectile.spent = true;
        commands.entity(hit.projectile).despawn();

        damage_events.write(DamageEvent {
            source: projectile.shooter,
            target: hit.target,
            amount: projectile.damage,
            knockback_from: Some(position_2d(transform)),
        });
    }
}

/// Система: стрела воткнулась в стену
pub fn resolve_projectile_walls(
    mut commands: Commands,
    clock: Res<SimClock>,
    mut calls: ResMut<DelayedCalls>,
    mut hits: EventReader<ProjectileStruckWall>,
    mut projectiles: Query<(&mut Projectile, &mut Velocity)>,
) {
    for hit in hits.read() {
        let Ok((mut projectile, mut velocity)) = projectiles.get_mut(hit.projectile) else {
            continue;
        };
        if projectile.spent {
            continue;
        }

        projectile.spent = true;
        velocity.linvel = Vec2::ZERO;
        commands.entity(hit.projectile).insert(StuckInWall);
        calls.schedule(
            &clock,
            PROJECTILE_WALL_GRACE_MS,
            DelayedAction::DespawnProjectile {
                entity: hit.projectile,
            },
        );
    }
}

/// Система: отложенный despawn (стрела могла уже исчезнуть)
pub fn despawn_projectiles_on_timer(
    mut commands: Commands,
    mut timers: EventReader<TimerFired>,
    projectiles: Query<(), With<Projectile>>,
) {
    for timer in timers.read() {
        let DelayedAction::DespawnProjectile { entity } = timer.action else {
            continue;
        };
        if projectiles.contains(entity) {
            commands.entity(entity).despawn();
        }
    }
}

/// Система: стрелы за границами уровня
pub fn despawn_out_of_bounds_projectiles(
    mut commands: Commands,
    bounds: Option<Res<LevelBounds>>,
    projectiles: Query<(Entity, &Transform), With<Projectile>>,
) {
    let Some(bounds) = bounds else {
        return;
    };

    for (entity, transform) in projectiles.iter() {
        if !bounds.contains(position_2d(transform)) {
            logger::log(&format!("projectile {:?} left the level", entity));
            commands.entity(entity).despawn();
        }
    }
}
