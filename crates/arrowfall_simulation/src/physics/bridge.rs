//! Мост "физика → combat события"
//!
//! Combat ядро не знает кто детектит коллизии. Оно читает три события:
//! `HitboxOverlap`, `ProjectileHit`, `ProjectileStruckWall`.
//!
//! Источники:
//! - `bridge_rapier_collisions`: `CollisionEvent::Started` от Rapier
//! - `detect_aabb_overlaps`: headless AABB проверка (тесты, runner)

use bevy::prelude::*;
use bevy_rapier2d::prelude::CollisionEvent;

use crate::ai::Enemy;
use crate::combat::{AttackHitbox, HitboxOverlap, Projectile, ProjectileHit, ProjectileStruckWall};
use crate::components::{position_2d, BodySize, Health};
use crate::hero::Hero;

use super::probes::{aabb_overlaps, StaticColliders};
use super::StaticBody;

/// Rapier CollisionEvent → combat события
///
/// Пары приходят в произвольном порядке (a, b), проверяем обе перестановки.
pub fn bridge_rapier_collisions(
    mut collisions: EventReader<CollisionEvent>,
    hitboxes: Query<(), With<AttackHitbox>>,
    projectiles: Query<(), With<Projectile>>,
    heroes: Query<(), With<Hero>>,
    enemies: Query<(), With<Enemy>>,
    statics: Query<(), With<StaticBody>>,
    mut hitbox_overlaps: EventWriter<HitboxOverlap>,
    mut projectile_hits: EventWriter<ProjectileHit>,
    mut wall_hits: EventWriter<ProjectileStruckWall>,
) {
    for event in collisions.read() {
        let CollisionEvent::Started(a, b, _) = *event else {
            continue;
        };

        for (first, second) in [(a, b), (b, a)] {
            if hitboxes.contains(first) && heroes.contains(second) {
                hitbox_overlaps.write(HitboxOverlap {
                    hitbox: first,
                    target: second,
                });
            } else if projectiles.contains(first) && enemies.contains(second) {
                projectile_hits.write(ProjectileHit {
                    projectile: first,
                    target: second,
                });
            } else if projectiles.contains(first) && statics.contains(second) {
                wall_hits.write(ProjectileStruckWall { projectile: first });
            }
        }
    }
}

/// Headless детекция пересечений по AABB
///
/// В отличие от Rapier (только Started), пишет overlap каждый тик пока тела
/// пересекаются. Повторные попадания отсекает hit resolution (hit list окна атаки,
/// spent флаг снаряда).
pub fn detect_aabb_overlaps(
    statics: Res<StaticColliders>,
    hitboxes: Query<(Entity, &AttackHitbox, &Transform)>,
    heroes: Query<(Entity, &Transform, &BodySize, &Health), With<Hero>>,
    enemies: Query<(Entity, &Transform, &BodySize, &Health), With<Enemy>>,
    projectiles: Query<(Entity, &Projectile, &Transform, &BodySize)>,
    mut hitbox_overlaps: EventWriter<HitboxOverlap>,
    mut projectile_hits: EventWriter<ProjectileHit>,
    mut wall_hits: EventWriter<ProjectileStruckWall>,
) {
    for (hitbox_entity, hitbox, transform) in hitboxes.iter() {
        if !hitbox.enabled {
            continue;
        }
        let area = hitbox.aabb(position_2d(transform));

        for (hero, hero_transform, body, health) in heroes.iter() {
            if health.is_alive() && aabb_overlaps(&area, &body.aabb(position_2d(hero_transform))) {
                hitbox_overlaps.write(HitboxOverlap {
                    hitbox: hitbox_entity,
                    target: hero,
                });
            }
        }
    }

    for (projectile_entity, projectile, transform, body) in projectiles.iter() {
        if projectile.spent {
            continue;
        }
        let area = body.aabb(position_2d(transform));

        // Один снаряд = максимум одно попадание за тик
        let struck = enemies.iter().find(|(_, enemy_transform, enemy_body, health)| {
            health.is_alive() && aabb_overlaps(&area, &enemy_body.aabb(position_2d(enemy_transform)))
        });

        if let Some((enemy, ..)) = struck {
            projectile_hits.write(ProjectileHit {
                projectile: projectile_entity,
                target: enemy,
            });
        } else if statics.overlaps(&area) {
            wall_hits.write(ProjectileStruckWall {
                projectile: projectile_entity,
            });
        }
    }
}
