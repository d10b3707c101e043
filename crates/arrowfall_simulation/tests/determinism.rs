//! Детерминизм: одинаковый уровень + одинаковый input → одинаковый мир
//!
//! Input генерируется seeded RNG, каждый прогон получает ту же последовательность.

use bevy::prelude::*;
use bevy_rapier2d::prelude::Velocity;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use arrowfall_simulation::*;

const FOREST: &str = include_str!("../levels/forest.ron");

#[derive(Debug, PartialEq)]
struct WorldState {
    tick: u64,
    hero: Option<(Vec2, Vec2, u32)>,
    enemies: Vec<EnemySnapshot>,
    projectiles: usize,
}

fn capture(app: &mut App) -> WorldState {
    let tick = current_tick(app);
    let world = app.world_mut();

    let hero = world
        .query_filtered::<(&Transform, &Velocity, &Health), With<Hero>>()
        .iter(world)
        .next()
        .map(|(transform, velocity, health)| (transform.translation.truncate(), velocity.linvel, health.current));

    let mut enemies: Vec<Entity> = world.query_filtered::<Entity, With<Enemy>>().iter(world).collect();
    enemies.sort_by_key(|entity| entity.index());
    let enemies = enemies
        .into_iter()
        .filter_map(|entity| EnemySnapshot::capture(world, entity))
        .collect();

    let projectiles = world.query::<&Projectile>().iter(world).count();

    WorldState {
        tick,
        hero,
        enemies,
        projectiles,
    }
}

fn run_simulation(seed: u64, ticks: u64) -> WorldState {
    let mut app = create_headless_app(PhysicsBackend::Kinematic);
    let level = LevelData::from_ron(FOREST).unwrap();
    spawn_level(app.world_mut(), &level).unwrap();

    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let buttons = [HeroButton::MoveLeft, HeroButton::MoveRight, HeroButton::Jump, HeroButton::Shoot];

    for _ in 0..ticks / 10 {
        {
            let mut input = app.world_mut().resource_mut::<ActionInput>();
            input.release_all();
            for button in buttons {
                if rng.gen_bool(0.4) {
                    input.press(button);
                }
            }
        }
        advance_ticks(&mut app, 10);
    }

    capture(&mut app)
}

#[test]
fn test_determinism_same_seed() {
    const SEED: u64 = 12345;

    let first = run_simulation(SEED, 600);
    let second = run_simulation(SEED, 600);

    assert_eq!(first.tick, 600);
    assert_eq!(
        first, second,
        "Симуляция с одинаковым seed ({}) дала разные результаты!",
        SEED
    );
}

#[test]
fn test_determinism_multiple_runs() {
    const SEED: u64 = 42;

    let runs: Vec<_> = (0..3).map(|_| run_simulation(SEED, 300)).collect();

    for (i, run) in runs.iter().enumerate().skip(1) {
        assert_eq!(runs[0], *run, "Прогон {} дал результат отличный от прогона 0", i);
    }
}
