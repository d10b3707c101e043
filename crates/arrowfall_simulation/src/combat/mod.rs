//! Combat system module
//!
//! Hit resolution protocol:
//! - физика сообщает пересечения: `HitboxOverlap`, `ProjectileHit`, `ProjectileStruckWall`
//! - правила combat фильтруют их (окно атаки, hit list, spent, живость цели)
//! - итог: `DamageEvent`, который применяет сама цель
//!
//! Смерть: `EntityDied` сразу, despawn после death animation.

use bevy::prelude::*;

use crate::SimSet;

pub mod damage;
pub mod hitbox;
pub mod projectile;

// Re-export основных типов
pub use damage::{DamageEvent, DamageOutcome, Dead, EntityDied, HeroDefeated};
pub use hitbox::{AttackHitbox, AttackStarted, HitboxLink, HitboxOverlap};
pub use projectile::{
    spawn_projectile, Projectile, ProjectileHit, ProjectileSpawn, ProjectileStruckWall, StuckInWall,
    PROJECTILE_WALL_GRACE_MS,
};

/// Combat Plugin
///
/// Порядок выполнения:
/// 1. Reactions: despawn после death animation, отложенный despawn стрел
/// 2. Resolve: overlaps/hits → DamageEvent → применение → sync collider флагов
/// 3. Cleanup: стрелы за границами уровня
pub struct CombatPlugin;

impl Plugin for CombatPlugin {
    fn build(&self, app: &mut App) {
        // Регистрация событий
        app.add_event::<DamageEvent>()
            .add_event::<EntityDied>()
            .add_event::<HeroDefeated>()
            .add_event::<AttackStarted>()
            .add_event::<HitboxOverlap>()
            .add_event::<ProjectileHit>()
            .add_event::<ProjectileStruckWall>();

        app.add_systems(
            FixedUpdate,
            (
                damage::despawn_after_death_animation,
                projectile::despawn_projectiles_on_timer,
            )
                .in_set(SimSet::Reactions),
        )
        .add_systems(
            FixedUpdate,
            (
                hitbox::resolve_hitbox_overlaps,
                projectile::resolve_projectile_hits,
                projectile::resolve_projectile_walls,
                damage::apply_damage_events,
                hitbox::sync_hitbox_colliders,
            )
                .chain()
                .in_set(SimSet::Resolve),
        )
        .add_systems(
            FixedUpdate,
            projectile::despawn_out_of_bounds_projectiles.in_set(SimSet::Cleanup),
        );
    }
}
