//! Attack hitbox врага
//!
//! Архитектура:
//! - Hitbox это отдельная entity (не child), позиция выставляется в момент старта атаки
//!   и не следует за владельцем
//! - Живёт всё время жизни врага, между атаками выключен (`enabled = false`)
//! - Каждое включение = новое окно атаки (`window_id`), hit list сбрасывается
//! - Одна цель получает урон максимум один раз за окно

use bevy::math::bounding::Aabb2d;
use bevy::prelude::*;
use bevy_rapier2d::prelude::ColliderDisabled;

use crate::ai::Enemy;
use crate::components::Health;
use crate::hero::Hero;
use crate::logger;

use super::damage::DamageEvent;

/// Hitbox атаки (sensor)
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct AttackHitbox {
    /// Кто атакует (non-owning)
    pub owner: Entity,
    /// Полный размер прямоугольника
    pub size: Vec2,
    pub damage: u32,
    pub enabled: bool,
    /// Номер текущего окна атаки
    pub window_id: u32,
    /// Кого уже ударили в этом окне
    pub hit_targets: Vec<Entity>,
}

impl AttackHitbox {
    pub fn new(owner: Entity, size: Vec2, damage: u32) -> Self {
        Self {
            owner,
            size,
            damage,
            enabled: false,
            window_id: 0,
            hit_targets: Vec::new(),
        }
    }

    /// Открыть новое окно атаки
    pub fn enable(&mut self) {
        self.enabled = true;
        self.window_id += 1;
        self.hit_targets.clear();
    }

    pub fn disable(&mut self) {
        self.enabled = false;
    }

    /// Зарегистрировать попадание. false если окно закрыто или цель уже ударена.
    pub fn register_hit(&mut self, target: Entity) -> bool {
        if !self.enabled || self.hit_targets.contains(&target) {
            return false;
        }
        self.hit_targets.push(target);
        true
    }

    pub fn aabb(&self, center: Vec2) -> Aabb2d {
        Aabb2d::new(center, self.size * 0.5)
    }
}

/// Ссылка врага на его hitbox entity
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct HitboxLink(pub Entity);

/// Событие: враг начал атаку (окно hitbox открыто)
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttackStarted {
    pub attacker: Entity,
    pub hitbox: Entity,
    pub window_id: u32,
}

/// Событие: hitbox пересёкся с героем (от physics bridge)
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct HitboxOverlap {
    pub hitbox: Entity,
    pub target: Entity,
}

/// Система: HitboxOverlap → DamageEvent
///
/// Игнорируется если: hitbox выключен, владелец мёртв/удалён, цель мертва,
/// цель уже ударена в этом окне.
pub fn resolve_hitbox_overlaps(
    mut overlaps: EventReader<HitboxOverlap>,
    mut hitboxes: Query<&mut AttackHitbox>,
    owners: Query<(&Health, &Transform), With<Enemy>>,
    targets: Query<&Health, With<Hero>>,
    mut damage_events: EventWriter<DamageEvent>,
) {
    for overlap in overlaps.read() {
        let Ok(mut hitbox) = hitboxes.get_mut(overlap.hitbox) else {
            continue;
        };
        if !hitbox.enabled {
            continue;
        }

        let Ok((owner_health, owner_transform)) = owners.get(hitbox.owner) else {
            continue;
        };
        if !owner_health.is_alive() {
            continue;
        }

        let target_alive = targets.get(overlap.target).is_ok_and(|health| health.is_alive());
        if !target_alive {
            continue;
        }

        if !hitbox.register_hit(overlap.target) {
            continue;
        }

        logger::log(&format!(
            "hitbox {:?} (owner {:?}) hit {:?} in window {}",
            overlap.hitbox, hitbox.owner, overlap.target, hitbox.window_id
        ));

        damage_events.write(DamageEvent {
            source: hitbox.owner,
            target: overlap.target,
            amount: hitbox.damage,
            knockback_from: Some(owner_transform.translation.truncate()),
        });
    }
}

/// Система: синхронизация `ColliderDisabled` с флагом `enabled` (для Rapier)
pub fn sync_hitbox_colliders(
    mut commands: Commands,
    hitboxes: Query<(Entity, &AttackHitbox, Has<ColliderDisabled>), Changed<AttackHitbox>>,
) {
    for (entity, hitbox, collider_disabled) in hitboxes.iter() {
        if hitbox.enabled && collider_disabled {
            commands.entity(entity).remove::<ColliderDisabled>();
        } else if !hitbox.enabled && !collider_disabled {
            commands.entity(entity).insert(ColliderDisabled);
        }
    }
}
