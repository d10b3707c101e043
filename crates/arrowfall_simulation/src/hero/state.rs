//! Hero controller FSM
//!
//! Каждый кадр input превращается в упорядоченный список действий, и каждое
//! проходит через `HeroCtx::set`. `set` не батчит: обработчик действия
//! выполняется сразу, поэтому два `set(Jumping)` в одном кадре тратят два заряда.
//!
//! `Dying` терминален: после него `set` ничего не делает.

use bevy::ecs::query::QueryData;
use bevy::prelude::*;
use bevy_rapier2d::prelude::Velocity;
use serde::{Deserialize, Serialize};

use crate::animation::{AnimationId, PlayOptions, SpriteAnimator};
use crate::clock::{SimClock, TickWindow};
use crate::combat::{DamageOutcome, ProjectileSpawn};
use crate::components::{position_2d, Facing, Grounded, Health};
use crate::logger;

use super::input::{ActionInput, HeroButton};

/// Действия героя
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Reflect, Serialize, Deserialize)]
pub enum HeroAction {
    #[default]
    Idle,
    MovingLeft,
    MovingRight,
    Jumping,
    Shooting,
    Hurt,
    Dying,
}

/// Текущее действие героя
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
pub struct HeroActionState {
    pub current: HeroAction,
    pub changed_at_tick: u64,
}

/// Боевые параметры героя
#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect, Serialize, Deserialize)]
#[reflect(Component)]
pub struct HeroStats {
    pub move_speed: f32,
    pub jump_speed: f32,
    pub projectile_speed: f32,
    pub projectile_damage: u32,
    pub invincibility_ms: u64,
    /// Заряды прыжка восстанавливаются не раньше чем через столько ms после прыжка
    pub jump_restore_ms: u64,
}

impl Default for HeroStats {
    fn default() -> Self {
        Self {
            move_speed: 160.0,
            jump_speed: 360.0,
            projectile_speed: 600.0,
            projectile_damage: 15,
            invincibility_ms: 1000,
            jump_restore_ms: 100,
        }
    }
}

/// Заряды прыжка (double jump)
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Reflect)]
#[reflect(Component)]
pub struct JumpCharges {
    pub remaining: u32,
    pub max: u32,
    pub last_jump_tick: Option<u64>,
    /// Был прыжок, приземление ещё не засчитано
    pub airborne: bool,
}

impl JumpCharges {
    pub fn new(max: u32) -> Self {
        Self {
            remaining: max,
            max,
            last_jump_tick: None,
            airborne: false,
        }
    }
}

/// Окно неуязвимости после урона
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
pub struct Invincibility {
    pub window: TickWindow,
}

/// Всё что нужно обработчикам действий героя
#[derive(QueryData)]
#[query_data(mutable)]
pub struct HeroQuery {
    pub entity: Entity,
    pub transform: &'static Transform,
    pub grounded: &'static Grounded,
    pub stats: &'static HeroStats,
    pub state: &'static mut HeroActionState,
    pub velocity: &'static mut Velocity,
    pub facing: &'static mut Facing,
    pub animator: &'static mut SpriteAnimator,
    pub charges: &'static mut JumpCharges,
    pub health: &'static mut Health,
    pub invincibility: &'static mut Invincibility,
}

impl HeroQueryItem<'_> {
    pub fn ctx(&mut self, clock: SimClock) -> HeroCtx<'_> {
        HeroCtx {
            entity: self.entity,
            clock,
            position: position_2d(self.transform),
            grounded: self.grounded.0,
            stats: self.stats,
            state: &mut *self.state,
            velocity: &mut *self.velocity,
            facing: &mut *self.facing,
            animator: &mut *self.animator,
            charges: &mut *self.charges,
            health: &mut *self.health,
            invincibility: &mut *self.invincibility,
            projectiles: Vec::new(),
        }
    }
}

/// Контекст героя на один кадр
pub struct HeroCtx<'a> {
    pub entity: Entity,
    pub clock: SimClock,
    pub position: Vec2,
    pub grounded: bool,
    pub stats: &'a HeroStats,
    pub state: &'a mut HeroActionState,
    pub velocity: &'a mut Velocity,
    pub facing: &'a mut Facing,
    pub animator: &'a mut SpriteAnimator,
    pub charges: &'a mut JumpCharges,
    pub health: &'a mut Health,
    pub invincibility: &'a mut Invincibility,
    /// Стрелы, выпущенные в этом кадре (spawn делает система)
    pub projectiles: Vec<ProjectileSpawn>,
}

impl HeroCtx<'_> {
    /// Записать действие и сразу выполнить его обработчик
    pub fn set(&mut self, action: HeroAction) {
        if self.state.current == HeroAction::Dying {
            return;
        }

        let previous = self.state.current;
        self.state.current = action;

        match action {
            HeroAction::Idle => self.idle(),
            HeroAction::MovingLeft => self.walk(Facing::Left),
            HeroAction::MovingRight => self.walk(Facing::Right),
            HeroAction::Jumping => {
                // Без зарядов прыжок: no-op, действие не меняется
                if !self.jump() {
                    self.state.current = previous;
                }
            }
            HeroAction::Shooting => self.shoot(),
            HeroAction::Hurt => self.hurt(),
            HeroAction::Dying => self.die(),
        }

        if self.state.current != previous {
            self.state.changed_at_tick = self.clock.tick;
            logger::log(&format!(
                "hero {:?}: {:?} → {:?}",
                self.entity, previous, self.state.current
            ));
        }
    }

    /// Один кадр управления: input → упорядоченные `set` вызовы
    pub fn drive(&mut self, input: &ActionInput) {
        self.invincibility.window.refresh(self.clock.tick);
        self.restore_jump_charges();

        if !self.health.is_alive() {
            self.set(HeroAction::Dying);
            return;
        }
        if self.state.current == HeroAction::Dying {
            return;
        }

        // Движение: клавиатура, затем удержание pointer'а
        let keyboard_move = if input.is_held(HeroButton::MoveLeft) {
            Some(HeroAction::MovingLeft)
        } else if input.is_held(HeroButton::MoveRight) {
            Some(HeroAction::MovingRight)
        } else {
            None
        };
        let pointer_move = input.pointer_hold();

        if let Some(action) = keyboard_move {
            self.set(action);
        }
        if let Some(action) = pointer_move {
            self.set(action);
        }
        if keyboard_move.is_none() && pointer_move.is_none() && self.grounded {
            self.set(HeroAction::Idle);
        }

        // Импульсы: клавиатура, затем tap
        if input.just_pressed(HeroButton::Jump) {
            self.set(HeroAction::Jumping);
        }
        if input.just_pressed(HeroButton::Shoot) {
            self.set(HeroAction::Shooting);
        }
        if let Some(action) = input.pointer_tap() {
            self.set(action);
        }

        if self.velocity.linvel == Vec2::ZERO && self.state.current != HeroAction::Idle {
            self.set(HeroAction::Idle);
        }
    }

    /// Урон герою. Во время invincibility окна отклоняется.
    pub fn receive_damage(&mut self, amount: u32) -> DamageOutcome {
        if self.state.current == HeroAction::Dying || !self.health.is_alive() {
            return DamageOutcome::Ignored;
        }

        let duration = self.clock.ms_to_ticks(self.stats.invincibility_ms);
        if !self.invincibility.window.open_if_expired(self.clock.tick, duration) {
            logger::log(&format!("hero {:?}: damage rejected (invincible)", self.entity));
            return DamageOutcome::Rejected;
        }

        self.health.take_damage(amount);
        logger::log(&format!(
            "hero {:?}: took {} damage, health {}/{}",
            self.entity, amount, self.health.current, self.health.max
        ));

        if self.health.is_alive() {
            self.set(HeroAction::Hurt);
            DamageOutcome::Hurt { knockback: false }
        } else {
            self.set(HeroAction::Dying);
            DamageOutcome::Killed
        }
    }

    /// Приземлились не раньше `jump_restore_ms` после прыжка → заряды полные
    pub fn restore_jump_charges(&mut self) {
        if !self.grounded || !self.charges.airborne {
            return;
        }
        let settled = self
            .charges
            .last_jump_tick
            .is_none_or(|tick| self.clock.ms_since(tick) > self.stats.jump_restore_ms);
        if settled {
            self.charges.remaining = self.charges.max;
            self.charges.airborne = false;
        }
    }

    fn flip(&self) -> Option<bool> {
        Some(self.facing.flip_x())
    }

    fn idle(&mut self) {
        let options = PlayOptions {
            flip_x: self.flip(),
            ..PlayOptions::except(&[
                AnimationId::HeroJump,
                AnimationId::HeroShoot,
                AnimationId::HeroHurt,
                AnimationId::HeroDie,
            ])
        };
        self.animator.play(AnimationId::HeroIdle, options, self.clock.tick);
        self.velocity.linvel.x = 0.0;
    }

    fn walk(&mut self, facing: Facing) {
        *self.facing = facing;
        self.velocity.linvel.x = facing.sign() * self.stats.move_speed;

        if self.grounded {
            let options = PlayOptions {
                flip_x: self.flip(),
                ..PlayOptions::except(&[AnimationId::HeroShoot, AnimationId::HeroHurt, AnimationId::HeroDie])
            };
            self.animator.play(AnimationId::HeroWalk, options, self.clock.tick);
        } else {
            self.animator.flip_x = facing.flip_x();
        }
    }

    fn jump(&mut self) -> bool {
        if self.charges.remaining == 0 {
            return false;
        }

        self.charges.remaining -= 1;
        self.charges.airborne = true;
        self.charges.last_jump_tick = Some(self.clock.tick);
        self.grounded = false;
        self.velocity.linvel.y = self.stats.jump_speed;

        let options = PlayOptions {
            flip_x: self.flip(),
            ..Default::default()
        };
        self.animator.play(AnimationId::HeroJump, options, self.clock.tick);
        true
    }

    fn shoot(&mut self) {
        let options = PlayOptions {
            flip_x: self.flip(),
            ..PlayOptions::restart()
        };
        self.animator.play(AnimationId::HeroShoot, options, self.clock.tick);

        self.projectiles.push(ProjectileSpawn {
            shooter: self.entity,
            position: self.position,
            velocity: Vec2::new(self.facing.sign() * self.stats.projectile_speed, 0.0),
            damage: self.stats.projectile_damage,
        });
    }

    fn hurt(&mut self) {
        let options = PlayOptions {
            flip_x: self.flip(),
            ..PlayOptions::restart()
        };
        self.animator.play(AnimationId::HeroHurt, options, self.clock.tick);
    }

    fn die(&mut self) {
        let options = PlayOptions {
            flip_x: self.flip(),
            ..PlayOptions::restart()
        };
        self.animator.play(AnimationId::HeroDie, options, self.clock.tick);
        self.velocity.linvel.x = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Parts {
        stats: HeroStats,
        state: HeroActionState,
        velocity: Velocity,
        facing: Facing,
        animator: SpriteAnimator,
        charges: JumpCharges,
        health: Health,
        invincibility: Invincibility,
    }

    impl Parts {
        fn new() -> Self {
            Self {
                stats: HeroStats::default(),
                state: HeroActionState::default(),
                velocity: Velocity::zero(),
                facing: Facing::Right,
                animator: SpriteAnimator::default(),
                charges: JumpCharges::new(2),
                health: Health::new(5),
                invincibility: Invincibility::default(),
            }
        }

        fn ctx(&mut self, tick: u64, grounded: bool) -> HeroCtx<'_> {
            HeroCtx {
                entity: Entity::from_raw(1),
                clock: SimClock { tick, ..Default::default() },
                position: Vec2::new(100.0, 100.0),
                grounded,
                stats: &self.stats,
                state: &mut self.state,
                velocity: &mut self.velocity,
                facing: &mut self.facing,
                animator: &mut self.animator,
                charges: &mut self.charges,
                health: &mut self.health,
                invincibility: &mut self.invincibility,
                projectiles: Vec::new(),
            }
        }
    }

    #[test]
    fn test_jump_consumes_charges() {
        let mut parts = Parts::new();
        let mut ctx = parts.ctx(1, true);

        ctx.set(HeroAction::Jumping);
        ctx.set(HeroAction::Jumping);
        assert_eq!(ctx.charges.remaining, 0);
        assert_eq!(ctx.velocity.linvel.y, 360.0);

        // Третий прыжок: no-op
        ctx.velocity.linvel.y = 10.0;
        ctx.set(HeroAction::Idle);
        ctx.set(HeroAction::Jumping);
        assert_eq!(ctx.charges.remaining, 0);
        assert_eq!(ctx.velocity.linvel.y, 10.0);
        assert_eq!(ctx.state.current, HeroAction::Idle);
    }

    #[test]
    fn test_charges_restore_after_landing() {
        let mut parts = Parts::new();
        parts.ctx(10, true).set(HeroAction::Jumping);
        assert_eq!(parts.charges.remaining, 1);

        // 100ms ровно: ещё рано
        parts.ctx(16, true).restore_jump_charges();
        assert_eq!(parts.charges.remaining, 1);

        // в воздухе: не восстанавливаем
        parts.ctx(30, false).restore_jump_charges();
        assert_eq!(parts.charges.remaining, 1);

        parts.ctx(31, true).restore_jump_charges();
        assert_eq!(parts.charges.remaining, 2);
        assert!(!parts.charges.airborne);
    }

    #[test]
    fn test_walk_sets_velocity_and_facing() {
        let mut parts = Parts::new();
        let mut ctx = parts.ctx(1, true);
        ctx.set(HeroAction::MovingLeft);

        assert_eq!(ctx.velocity.linvel.x, -160.0);
        assert_eq!(*ctx.facing, Facing::Left);
        assert!(ctx.animator.is_playing(AnimationId::HeroWalk));
        assert!(ctx.animator.flip_x);
    }

    #[test]
    fn test_shoot_spawns_projectile_in_facing_direction() {
        let mut parts = Parts::new();
        parts.facing = Facing::Left;
        let mut ctx = parts.ctx(1, true);
        ctx.set(HeroAction::Shooting);

        assert_eq!(ctx.projectiles.len(), 1);
        assert_eq!(ctx.projectiles[0].velocity, Vec2::new(-600.0, 0.0));
        assert_eq!(ctx.projectiles[0].damage, 15);
        assert!(ctx.animator.is_playing(AnimationId::HeroShoot));
    }

    #[test]
    fn test_idle_does_not_interrupt_shoot_animation() {
        let mut parts = Parts::new();
        let mut ctx = parts.ctx(1, true);
        ctx.set(HeroAction::Shooting);
        ctx.set(HeroAction::Idle);

        assert_eq!(ctx.state.current, HeroAction::Idle);
        assert!(ctx.animator.is_playing(AnimationId::HeroShoot));
    }

    #[test]
    fn test_invincibility_rejects_second_hit() {
        let mut parts = Parts::new();

        assert_eq!(parts.ctx(1, true).receive_damage(1), DamageOutcome::Hurt { knockback: false });
        assert_eq!(parts.ctx(30, true).receive_damage(1), DamageOutcome::Rejected);
        assert_eq!(parts.health.current, 4);

        // 1000ms = 60 тиков
        assert_eq!(parts.ctx(61, true).receive_damage(1), DamageOutcome::Hurt { knockback: false });
        assert_eq!(parts.health.current, 3);
    }

    #[test]
    fn test_dying_is_terminal() {
        let mut parts = Parts::new();
        parts.health = Health::new(1);

        assert_eq!(parts.ctx(1, true).receive_damage(1), DamageOutcome::Killed);
        assert_eq!(parts.state.current, HeroAction::Dying);
        assert_eq!(parts.velocity.linvel.x, 0.0);

        let mut ctx = parts.ctx(2, true);
        ctx.set(HeroAction::MovingRight);
        ctx.set(HeroAction::Jumping);
        assert_eq!(ctx.state.current, HeroAction::Dying);
        assert_eq!(ctx.velocity.linvel.x, 0.0);
        assert_eq!(ctx.charges.remaining, 2);
        assert!(ctx.animator.is_playing(AnimationId::HeroDie));

        assert_eq!(parts.ctx(200, true).receive_damage(1), DamageOutcome::Ignored);
    }

    #[test]
    fn test_drive_double_jump_hazard() {
        // Клавиша и tap в одном кадре: два независимых прыжка
        let mut parts = Parts::new();
        let mut input = ActionInput::with_viewport(Vec2::new(800.0, 600.0));
        input.press(HeroButton::Jump);
        input.pointer_down(Vec2::new(10.0, 10.0));

        parts.ctx(1, true).drive(&input);
        assert_eq!(parts.charges.remaining, 0);
        assert_eq!(parts.state.current, HeroAction::Jumping);
    }

    #[test]
    fn test_drive_idle_when_still() {
        let mut parts = Parts::new();
        parts.state.current = HeroAction::MovingRight;
        parts.velocity.linvel = Vec2::new(160.0, 0.0);

        parts.ctx(1, true).drive(&ActionInput::default());
        assert_eq!(parts.state.current, HeroAction::Idle);
        assert_eq!(parts.velocity.linvel.x, 0.0);
    }

    #[test]
    fn test_drive_dead_hero_enters_dying() {
        let mut parts = Parts::new();
        parts.health.current = 0;

        let mut input = ActionInput::default();
        input.press(HeroButton::MoveRight);
        parts.ctx(1, true).drive(&input);

        assert_eq!(parts.state.current, HeroAction::Dying);
        assert_eq!(parts.velocity.linvel.x, 0.0);
    }
}
