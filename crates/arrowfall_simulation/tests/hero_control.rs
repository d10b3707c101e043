//! Hero controller integration (Kinematic backend: gravity + AABB resolve)

mod common;

use bevy::prelude::*;
use bevy_rapier2d::prelude::Velocity;
use arrowfall_simulation::combat::StuckInWall;
use arrowfall_simulation::hero::{HeroActionState, JumpCharges};
use arrowfall_simulation::*;

use common::*;

fn meadow(enemies: Vec<EnemyPlacement>) -> (App, Entity) {
    // Стена слева x ∈ [20, 36]
    let wall = StaticRect {
        x: 20.0,
        y: 88.0,
        width: 16.0,
        height: 100.0,
    };
    let data = level((100.0, 104.0), vec![floor(), wall], enemies);
    let (app, report) = setup(PhysicsBackend::Kinematic, &data);
    let hero = hero_of(&report);
    (app, hero)
}

fn projectiles(app: &mut App) -> Vec<Entity> {
    let world = app.world_mut();
    world
        .query_filtered::<Entity, With<Projectile>>()
        .iter(world)
        .collect()
}

#[test]
fn test_walk_right_then_idle() {
    let (mut app, hero) = meadow(vec![]);

    input(&mut app).press(HeroButton::MoveRight);
    advance_ticks(&mut app, 60);

    let x = position(&app, hero).x;
    assert!((x - 260.0).abs() < 0.5, "hero x = {}", x);
    assert_eq!(position(&app, hero).y, 104.0);
    assert_eq!(get::<HeroActionState>(&app, hero).current, HeroAction::MovingRight);
    assert!(get::<SpriteAnimator>(&app, hero).is_playing(AnimationId::HeroWalk));
    assert!(get::<Grounded>(&app, hero).0);

    input(&mut app).release(HeroButton::MoveRight);
    advance_ticks(&mut app, 1);

    assert_eq!(get::<HeroActionState>(&app, hero).current, HeroAction::Idle);
    assert_eq!(get::<Velocity>(&app, hero).linvel, Vec2::ZERO);
}

#[test]
fn test_walk_left_blocked_by_wall() {
    let (mut app, hero) = meadow(vec![]);

    input(&mut app).press(HeroButton::MoveLeft);
    advance_ticks(&mut app, 60);

    // Стена кончается на x = 36, полуширина героя 10
    assert!(position(&app, hero).x >= 46.0);
    assert!(position(&app, hero).x < 50.0);
    assert_eq!(get::<Facing>(&app, hero), Facing::Left);
}

#[test]
fn test_double_jump_then_no_op_then_restore() {
    let (mut app, hero) = meadow(vec![]);

    input(&mut app).press(HeroButton::Jump);
    advance_ticks(&mut app, 1);
    assert_eq!(get::<JumpCharges>(&app, hero).remaining, 1);
    assert_eq!(get::<HeroActionState>(&app, hero).current, HeroAction::Jumping);

    input(&mut app).release(HeroButton::Jump);
    advance_ticks(&mut app, 1);
    input(&mut app).press(HeroButton::Jump);
    advance_ticks(&mut app, 1);
    let charges = get::<JumpCharges>(&app, hero);
    assert_eq!(charges.remaining, 0);
    let second_jump = charges.last_jump_tick;

    // Третий прыжок без зарядов: импульса нет
    input(&mut app).release(HeroButton::Jump);
    advance_ticks(&mut app, 1);
    input(&mut app).press(HeroButton::Jump);
    advance_ticks(&mut app, 1);
    let charges = get::<JumpCharges>(&app, hero);
    assert_eq!(charges.remaining, 0);
    assert_eq!(charges.last_jump_tick, second_jump);
    assert!(get::<Velocity>(&app, hero).linvel.y < 340.0);

    input(&mut app).release(HeroButton::Jump);
    advance_ticks(&mut app, 120);

    assert!(get::<Grounded>(&app, hero).0);
    assert_eq!(position(&app, hero).y, 104.0);
    assert_eq!(get::<JumpCharges>(&app, hero).remaining, 2);
}

#[test]
fn test_projectile_hits_enemy() {
    let (mut app, hero) = meadow(vec![enemy("pixie", 400.0, 100.0)]);
    let pixie = app
        .world_mut()
        .query_filtered::<Entity, With<Enemy>>()
        .single(app.world())
        .unwrap();

    input(&mut app).press(HeroButton::Shoot);
    advance_ticks(&mut app, 1);
    assert_eq!(projectiles(&mut app).len(), 1);
    assert!(get::<SpriteAnimator>(&app, hero).is_playing(AnimationId::HeroShoot));

    advance_ticks(&mut app, 40);
    assert!(projectiles(&mut app).is_empty());
    assert_eq!(get::<Health>(&app, pixie).current, 15);
}

#[test]
fn test_projectile_sticks_in_wall_then_despawns() {
    let (mut app, hero) = meadow(vec![]);
    *app.world_mut().get_mut::<Facing>(hero).unwrap() = Facing::Left;

    input(&mut app).press(HeroButton::Shoot);
    advance_ticks(&mut app, 10);

    let arrows = projectiles(&mut app);
    assert_eq!(arrows.len(), 1);
    let arrow = arrows[0];
    assert!(app.world().get::<StuckInWall>(arrow).is_some());
    assert!(get::<Projectile>(&app, arrow).spent);
    assert_eq!(get::<Velocity>(&app, arrow).linvel, Vec2::ZERO);

    // Торчит в стене 4000ms
    advance_ticks(&mut app, 200);
    assert_eq!(projectiles(&mut app).len(), 1);
    advance_ticks(&mut app, 50);
    assert!(projectiles(&mut app).is_empty());
}

#[test]
fn test_projectile_leaving_level_is_removed() {
    let (mut app, _hero) = meadow(vec![]);

    input(&mut app).press(HeroButton::Shoot);
    advance_ticks(&mut app, 1);
    assert_eq!(projectiles(&mut app).len(), 1);

    // 600 px/s от x = 100 до края уровня x = 1000
    advance_ticks(&mut app, 100);
    assert!(projectiles(&mut app).is_empty());
}

#[test]
fn test_pointer_tap_shoots_and_hold_walks() {
    let (mut app, hero) = meadow(vec![]);
    input(&mut app).viewport = Vec2::new(800.0, 600.0);

    input(&mut app).pointer_down(Vec2::new(700.0, 100.0));
    advance_ticks(&mut app, 1);
    assert_eq!(projectiles(&mut app).len(), 1);

    // Удержание в том же месте не стреляет снова
    advance_ticks(&mut app, 5);
    assert_eq!(projectiles(&mut app).len(), 1);

    input(&mut app).pointer_up();
    input(&mut app).pointer_down(Vec2::new(700.0, 500.0));
    advance_ticks(&mut app, 30);
    assert_eq!(get::<HeroActionState>(&app, hero).current, HeroAction::MovingRight);
    assert!(position(&app, hero).x > 170.0);
}

#[test]
fn test_invincibility_window() {
    let (mut app, hero) = meadow(vec![]);
    let hit = DamageEvent {
        source: hero,
        target: hero,
        amount: 1,
        knockback_from: None,
    };

    app.world_mut().send_event(hit);
    advance_ticks(&mut app, 1);
    assert_eq!(get::<Health>(&app, hero).current, 4);
    assert_eq!(get::<HeroActionState>(&app, hero).current, HeroAction::Hurt);

    app.world_mut().send_event(hit);
    advance_ticks(&mut app, 1);
    assert_eq!(get::<Health>(&app, hero).current, 4);

    // 1000ms = 60 тиков от первого удара
    advance_ticks(&mut app, 59);
    app.world_mut().send_event(hit);
    advance_ticks(&mut app, 1);
    assert_eq!(get::<Health>(&app, hero).current, 3);
}
