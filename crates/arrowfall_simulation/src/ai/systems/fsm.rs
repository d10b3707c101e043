use bevy::prelude::*;

use crate::ai::behavior::EnemyQuery;
use crate::ai::components::Enemy;
use crate::ai::perception::HeroView;
use crate::clock::SimClock;
use crate::combat::{AttackHitbox, AttackStarted};
use crate::components::{position_2d, BodySize, Health};
use crate::hero::Hero;
use crate::logger;
use crate::physics::StaticColliders;

/// Система: решение врагов на тик
///
/// Герой, которого нет или который мертв, для врага не существует: враг патрулирует.
pub fn enemy_ai_tick(
    clock: Res<SimClock>,
    statics: Res<StaticColliders>,
    heroes: Query<(&Transform, &BodySize, &Health), With<Hero>>,
    mut enemies: Query<EnemyQuery, (With<Enemy>, Without<Hero>)>,
    mut hitboxes: Query<(&mut AttackHitbox, &mut Transform), (Without<Enemy>, Without<Hero>)>,
    mut attack_started: EventWriter<AttackStarted>,
) {
    for mut enemy in enemies.iter_mut() {
        let hero = heroes
            .get(enemy.target.0)
            .ok()
            .filter(|(_, _, health)| health.is_alive())
            .map(|(transform, body, _)| HeroView {
                entity: enemy.target.0,
                aabb: body.aabb(position_2d(transform)),
            });

        let hitbox_entity = enemy.hitbox.0;
        let Ok((mut hitbox, mut hitbox_transform)) = hitboxes.get_mut(hitbox_entity) else {
            logger::log_error(&format!("enemy {:?}: hitbox {:?} missing", enemy.entity, hitbox_entity));
            continue;
        };

        let mut ctx = enemy.ctx(*clock);
        if ctx.tick(hero.as_ref(), &statics, &mut hitbox, &mut hitbox_transform) {
            attack_started.write(AttackStarted {
                attacker: ctx.entity,
                hitbox: hitbox_entity,
                window_id: hitbox.window_id,
            });
        }
    }
}
