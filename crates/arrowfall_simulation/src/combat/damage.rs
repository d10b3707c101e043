//! Damage application
//!
//! Все источники урона (hitbox врага, стрела героя) сходятся в `DamageEvent`.
//! Урон применяет сама цель через свой путь (`HeroCtx::receive_damage`,
//! `EnemyCtx::receive_damage`): invincibility, hurt/death переходы, knockback.

use bevy::prelude::*;
use bevy_rapier2d::prelude::RigidBodyDisabled;

use crate::ai::{Enemy, EnemyQuery};
use crate::animation::{AnimationFinished, AnimationId};
use crate::clock::{DelayedAction, DelayedCalls, SimClock};
use crate::components::Health;
use crate::hero::{Hero, HeroQuery};
use crate::logger;

use super::hitbox::{AttackHitbox, HitboxLink};

/// Событие: урон цели
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct DamageEvent {
    pub source: Entity,
    pub target: Entity,
    pub amount: u32,
    /// Позиция источника для направления knockback
    pub knockback_from: Option<Vec2>,
}

/// Событие: entity умер (health дошёл до 0)
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntityDied {
    pub entity: Entity,
    pub killer: Option<Entity>,
}

/// Событие: death animation героя доиграла, герой удалён
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeroDefeated {
    pub hero: Entity,
}

/// Компонент-маркер: entity мертв, доигрывает death animation
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct Dead;

/// Чем закончилась попытка нанести урон
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DamageOutcome {
    /// Цель уже мертва
    Ignored,
    /// Отклонено (invincibility окно)
    Rejected,
    Hurt { knockback: bool },
    Killed,
}

/// Система: DamageEvent → путь урона цели
pub fn apply_damage_events(
    mut commands: Commands,
    clock: Res<SimClock>,
    mut calls: ResMut<DelayedCalls>,
    mut damage_events: EventReader<DamageEvent>,
    mut heroes: Query<HeroQuery, With<Hero>>,
    mut enemies: Query<EnemyQuery, (With<Enemy>, Without<Hero>)>,
    mut hitboxes: Query<&mut AttackHitbox>,
    mut died: EventWriter<EntityDied>,
) {
    for event in damage_events.read() {
        if let Ok(mut hero) = heroes.get_mut(event.target) {
            let mut ctx = hero.ctx(*clock);
            let outcome = ctx.receive_damage(event.amount);

            if outcome == DamageOutcome::Killed {
                commands.entity(event.target).insert(Dead);
                died.write(EntityDied {
                    entity: event.target,
                    killer: Some(event.source),
                });
                logger::log_info(&format!("hero {:?} killed by {:?}", event.target, event.source));
            }
            continue;
        }

        let Ok(mut enemy) = enemies.get_mut(event.target) else {
            logger::log_warning(&format!("DamageEvent: target {:?} is not a combat entity", event.target));
            continue;
        };

        let mut hitbox = hitboxes.get_mut(enemy.hitbox.0).ok();
        let restore_ms = enemy.config.knockback.map(|knockback| knockback.restore_ms);
        let mut ctx = enemy.ctx(*clock);
        let outcome = ctx.receive_damage(event.amount, event.knockback_from, hitbox.as_deref_mut());

        match outcome {
            DamageOutcome::Killed => {
                commands.entity(event.target).insert((RigidBodyDisabled, Dead));
                died.write(EntityDied {
                    entity: event.target,
                    killer: Some(event.source),
                });
                logger::log_info(&format!("enemy {:?} killed by {:?}", event.target, event.source));
            }
            DamageOutcome::Hurt { knockback: true } => {
                if let Some(restore_ms) = restore_ms {
                    calls.schedule(
                        &clock,
                        restore_ms,
                        DelayedAction::RestoreVelocity { entity: event.target },
                    );
                }
            }
            _ => {}
        }
    }
}

/// Система: удаление после death animation
///
/// Враг удаляется вместе со своим hitbox. Герой → `HeroDefeated`.
pub fn despawn_after_death_animation(
    mut commands: Commands,
    mut finished: EventReader<AnimationFinished>,
    heroes: Query<&Health, With<Hero>>,
    enemies: Query<(&Health, &HitboxLink), With<Enemy>>,
    mut defeated: EventWriter<HeroDefeated>,
) {
    for event in finished.read() {
        match event.animation {
            AnimationId::EnemyDeath => {
                let Ok((health, hitbox)) = enemies.get(event.entity) else {
                    continue;
                };
                if health.is_alive() {
                    continue;
                }
                commands.entity(hitbox.0).despawn();
                commands.entity(event.entity).despawn();
                logger::log(&format!("enemy {:?} despawned", event.entity));
            }
            AnimationId::HeroDie => {
                let Ok(health) = heroes.get(event.entity) else {
                    continue;
                };
                if health.is_alive() {
                    continue;
                }
                commands.entity(event.entity).despawn();
                defeated.write(HeroDefeated { hero: event.entity });
                logger::log_info(&format!("hero {:?} defeated", event.entity));
            }
            _ => {}
        }
    }
}
