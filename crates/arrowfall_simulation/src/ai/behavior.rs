//! Enemy behavior: решение на тик, атака, урон, knockback
//!
//! `EnemyCtx` собирает компоненты одного врага на время обработки. Системы
//! (`ai::systems`, `combat::damage`) только достают компоненты и вызывают методы.

use bevy::ecs::query::QueryData;
use bevy::prelude::*;
use bevy_rapier2d::prelude::Velocity;

use crate::animation::{AnimationId, PlayOptions, SpriteAnimator};
use crate::clock::SimClock;
use crate::combat::{AttackHitbox, DamageOutcome, HitboxLink};
use crate::components::{position_2d, BodySize, Facing, Health};
use crate::logger;
use crate::physics::StaticColliders;

use super::components::{
    AttackGates, BehaviorState, EnemyConfig, PatrolMechanic, PatrolState, TargetHero,
};
use super::patrol::{pace_turnaround, waypoint_turnaround};
use super::perception::{distance_to_hero, perceives_hero, HeroView};

/// Анимации, которые не перебивает EnemyMoving
const MOVING_EXCEPT: &[AnimationId] = &[
    AnimationId::EnemyDeath,
    AnimationId::EnemyHurt,
    AnimationId::EnemyAttack,
];

#[derive(QueryData)]
#[query_data(mutable)]
pub struct EnemyQuery {
    pub entity: Entity,
    pub transform: &'static Transform,
    pub body: &'static BodySize,
    pub config: &'static EnemyConfig,
    pub target: &'static TargetHero,
    pub hitbox: &'static HitboxLink,
    pub behavior: &'static mut BehaviorState,
    pub gates: &'static mut AttackGates,
    pub patrol: &'static mut PatrolState,
    pub velocity: &'static mut Velocity,
    pub facing: &'static mut Facing,
    pub animator: &'static mut SpriteAnimator,
    pub health: &'static mut Health,
}

impl EnemyQueryItem<'_> {
    pub fn ctx(&mut self, clock: SimClock) -> EnemyCtx<'_> {
        EnemyCtx {
            entity: self.entity,
            clock,
            position: position_2d(self.transform),
            body: self.body,
            config: self.config,
            behavior: &mut *self.behavior,
            gates: &mut *self.gates,
            patrol: &mut *self.patrol,
            velocity: &mut *self.velocity,
            facing: &mut *self.facing,
            animator: &mut *self.animator,
            health: &mut *self.health,
        }
    }
}

pub struct EnemyCtx<'a> {
    pub entity: Entity,
    pub clock: SimClock,
    pub position: Vec2,
    pub body: &'a BodySize,
    pub config: &'a EnemyConfig,
    pub behavior: &'a mut BehaviorState,
    pub gates: &'a mut AttackGates,
    pub patrol: &'a mut PatrolState,
    pub velocity: &'a mut Velocity,
    pub facing: &'a mut Facing,
    pub animator: &'a mut SpriteAnimator,
    pub health: &'a mut Health,
}

impl EnemyCtx<'_> {
    fn is_active(&self) -> bool {
        self.health.is_alive() && *self.behavior != BehaviorState::Dead
    }

    fn play(&mut self, id: AnimationId, except_if_playing: &[AnimationId], restart: bool) {
        let options = PlayOptions {
            except_if_playing,
            restart,
            flip_x: Some(self.facing.flip_x()),
        };
        self.animator.play(id, options, self.clock.tick);
    }

    /// Решение на тик. Возвращает true если началась атака.
    ///
    /// Приоритет: attack range → восприятие (chase) → патруль.
    pub fn tick(
        &mut self,
        hero: Option<&HeroView>,
        statics: &StaticColliders,
        hitbox: &mut AttackHitbox,
        hitbox_transform: &mut Transform,
    ) -> bool {
        if !self.is_active() || self.gates.is_attacking || self.gates.staggered {
            return false;
        }
        self.gates.cooldown.refresh(self.clock.tick);

        let own = self.body.aabb(self.position);
        let mut attacked = false;

        match hero {
            Some(hero) => {
                let distance = distance_to_hero(self.config.distance_metric, &own, hero);

                if distance <= self.config.attack_range {
                    self.stop_patrol();
                    attacked = self.try_attack(hero, hitbox, hitbox_transform);
                    if !attacked {
                        self.hold_position(hero);
                    }
                } else if perceives_hero(
                    &self.config.perception,
                    self.config.chase_range,
                    distance,
                    &own,
                    *self.facing,
                    self.patrol.patrolling,
                    statics,
                    hero,
                ) {
                    self.stop_patrol();
                    self.chase(hero);
                } else {
                    self.keep_patrolling();
                }
            }
            None => self.keep_patrolling(),
        }

        if self.patrol.patrolling {
            self.update_patrol(statics);
        }

        self.play(AnimationId::EnemyMoving, MOVING_EXCEPT, false);
        attacked
    }

    /// Начать атаку: hitbox перед врагом, скорость 0, EnemyAttack
    pub fn try_attack(
        &mut self,
        hero: &HeroView,
        hitbox: &mut AttackHitbox,
        hitbox_transform: &mut Transform,
    ) -> bool {
        if !self.gates.can_attack(self.clock.tick) {
            return false;
        }

        *self.facing = Facing::from_delta(hero.position().x - self.position.x, *self.facing);

        let offset = self.facing.sign() * hitbox.size.x;
        hitbox_transform.translation.x = self.position.x + offset;
        hitbox_transform.translation.y = self.position.y;
        hitbox.enable();

        self.gates.is_attacking = true;
        self.velocity.linvel.x = 0.0;
        *self.behavior = BehaviorState::Attacking;
        self.play(AnimationId::EnemyAttack, &[], true);

        logger::log(&format!(
            "enemy {:?}: attack window {} at x={:.1}",
            self.entity, hitbox.window_id, hitbox_transform.translation.x
        ));
        true
    }

    /// EnemyAttack доиграла: hitbox выключен, старт cooldown
    pub fn finish_attack(&mut self, hitbox: Option<&mut AttackHitbox>) {
        if let Some(hitbox) = hitbox {
            hitbox.disable();
        }
        if !self.gates.is_attacking {
            return;
        }
        self.gates.is_attacking = false;

        if !self.is_active() {
            return;
        }

        let cooldown = self.clock.ms_to_ticks(self.config.attack_cooldown_ms);
        self.gates.cooldown.open(self.clock.tick, cooldown);
        self.play(AnimationId::EnemyIdle, &[], true);
    }

    /// В attack range, но атака на cooldown: стоим лицом к герою
    fn hold_position(&mut self, hero: &HeroView) {
        *self.facing = Facing::from_delta(hero.position().x - self.position.x, *self.facing);
        self.velocity.linvel.x = 0.0;
        *self.behavior = BehaviorState::Attacking;
    }

    pub fn chase(&mut self, hero: &HeroView) {
        *self.facing = Facing::from_delta(hero.position().x - self.position.x, *self.facing);
        self.velocity.linvel.x = self.facing.sign() * self.config.chase_speed;
        if *self.behavior != BehaviorState::Chasing {
            logger::log(&format!("enemy {:?}: chasing {:?}", self.entity, hero.entity));
        }
        *self.behavior = BehaviorState::Chasing;
    }

    pub fn start_patrol(&mut self) {
        self.patrol.patrolling = true;
        *self.behavior = BehaviorState::Patrolling;
        self.velocity.linvel.x = self.facing.sign() * self.config.patrol_speed;
        self.play(AnimationId::EnemyMoving, MOVING_EXCEPT, false);
    }

    pub fn stop_patrol(&mut self) {
        self.patrol.patrolling = false;
    }

    /// Героя не видно: начать патруль или продолжить текущий
    fn keep_patrolling(&mut self) {
        if self.patrol.patrolling {
            *self.behavior = BehaviorState::Patrolling;
        } else {
            self.start_patrol();
        }
    }

    /// Разворот по механике архетипа, скорость патруля по facing
    pub fn update_patrol(&mut self, statics: &StaticColliders) {
        let turn = match self.config.patrol {
            PatrolMechanic::VelocityPace {
                probe_ahead,
                check_ledges,
            } => pace_turnaround(
                self.position,
                self.body.half_extents,
                *self.facing,
                probe_ahead,
                check_ledges,
                statics,
            ),
            PatrolMechanic::WaypointOscillate { tolerance } => self.patrol.extent.is_some_and(|extent| {
                waypoint_turnaround(self.position.x, self.patrol.origin.x, extent, *self.facing, tolerance)
            }),
        };

        if turn {
            *self.facing = self.facing.flipped();
            self.animator.flip_x = self.facing.flip_x();
        }
        self.velocity.linvel.x = self.facing.sign() * self.config.patrol_speed;
    }

    /// Урон врагу. `source`: позиция источника для knockback.
    pub fn receive_damage(
        &mut self,
        amount: u32,
        source: Option<Vec2>,
        hitbox: Option<&mut AttackHitbox>,
    ) -> DamageOutcome {
        if !self.is_active() {
            return DamageOutcome::Ignored;
        }

        self.health.take_damage(amount);
        logger::log(&format!(
            "enemy {:?}: took {} damage, health {}/{}",
            self.entity, amount, self.health.current, self.health.max
        ));

        // Урон прерывает атаку: EnemyAttack больше не доиграет
        if self.gates.is_attacking {
            self.finish_attack(hitbox);
        } else if let Some(hitbox) = hitbox {
            hitbox.disable();
        }

        if !self.health.is_alive() {
            *self.behavior = BehaviorState::Dead;
            self.velocity.linvel.x = 0.0;
            self.gates.staggered = false;
            self.patrol.patrolling = false;
            self.play(AnimationId::EnemyDeath, &[], true);
            return DamageOutcome::Killed;
        }

        // patrolling == (behavior == Patrolling): следующий тик решает заново
        *self.behavior = BehaviorState::Hurt;
        self.patrol.patrolling = false;
        self.play(AnimationId::EnemyHurt, &[], true);

        let knockback = match (self.config.knockback, source) {
            (Some(knockback), Some(source)) => {
                let away = Facing::from_delta(self.position.x - source.x, self.facing.flipped());
                self.velocity.linvel.x = away.sign() * knockback.strength;
                self.gates.staggered = true;
                true
            }
            _ => false,
        };

        DamageOutcome::Hurt { knockback }
    }

    /// Отложенное восстановление скорости после knockback
    ///
    /// Knockback бывает только из Hurt, патруль к этому моменту снят. Поведение
    /// выбирает `tick` в том же кадре (`SimSet::Enemy` после `Reactions`).
    pub fn restore_after_knockback(&mut self) {
        self.gates.staggered = false;
        if !self.is_active() || self.gates.is_attacking {
            return;
        }
        self.velocity.linvel.x = self.facing.sign() * self.config.chase_speed;
    }
}
