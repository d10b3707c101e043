use bevy::prelude::*;
use bevy_rapier2d::prelude::RigidBodyDisabled;

use crate::ai::behavior::EnemyQuery;
use crate::ai::components::Enemy;
use crate::animation::{AnimationFinished, AnimationId};
use crate::clock::{DelayedAction, SimClock, TimerFired};
use crate::combat::AttackHitbox;

/// Система: EnemyAttack доиграла → hitbox выключен, cooldown
pub fn finish_enemy_attacks(
    clock: Res<SimClock>,
    mut finished: EventReader<AnimationFinished>,
    mut enemies: Query<EnemyQuery, With<Enemy>>,
    mut hitboxes: Query<&mut AttackHitbox>,
) {
    for event in finished.read() {
        if event.animation != AnimationId::EnemyAttack {
            continue;
        }
        let Ok(mut enemy) = enemies.get_mut(event.entity) else {
            continue;
        };

        let mut hitbox = hitboxes.get_mut(enemy.hitbox.0).ok();
        enemy.ctx(*clock).finish_attack(hitbox.as_deref_mut());
    }
}

/// Система: таймер knockback истёк → скорость движения обратно
///
/// Враг мог умереть или исчезнуть за время knockback: таймер не отменяется,
/// проверка здесь.
pub fn restore_knockback_velocity(
    clock: Res<SimClock>,
    mut fired: EventReader<TimerFired>,
    mut enemies: Query<EnemyQuery, (With<Enemy>, Without<RigidBodyDisabled>)>,
) {
    for event in fired.read() {
        let DelayedAction::RestoreVelocity { entity } = event.action else {
            continue;
        };
        if let Ok(mut enemy) = enemies.get_mut(entity) {
            enemy.ctx(*clock).restore_after_knockback();
        }
    }
}
