//! Headless симуляция Arrowfall
//!
//! Грузит встроенный уровень, ведёт героя вправо со стрельбой и логирует
//! состояние каждую секунду.

use bevy::prelude::*;

use arrowfall_simulation::{
    advance_ticks, create_headless_app, current_tick, logger, spawn_level, ActionInput, BehaviorState, Enemy,
    Health, Hero, HeroButton, LevelData, PhysicsBackend,
};

const FOREST: &str = include_str!("../levels/forest.ron");
const SECONDS: u64 = 20;

fn main() {
    let mut app = create_headless_app(PhysicsBackend::Kinematic);

    let level = match LevelData::from_ron(FOREST) {
        Ok(level) => level,
        Err(err) => {
            logger::log_error(&format!("forest.ron: {}", err));
            std::process::exit(1);
        }
    };

    let report = match spawn_level(app.world_mut(), &level) {
        Ok(report) => report,
        Err(err) => {
            logger::log_error(&format!("spawn_level: {}", err));
            std::process::exit(1);
        }
    };
    logger::log_info(&format!(
        "Starting Arrowfall headless simulation: {} enemies",
        report.enemies.len()
    ));

    for second in 0..SECONDS {
        {
            let mut input = app.world_mut().resource_mut::<ActionInput>();
            input.press(HeroButton::MoveRight);
            // Стрельба по фронту: отпустить и нажать раз в секунду
            if second % 2 == 0 {
                input.press(HeroButton::Shoot);
            } else {
                input.release(HeroButton::Shoot);
            }
        }

        advance_ticks(&mut app, 60);

        let world = app.world_mut();
        let hero = world
            .query_filtered::<(&Transform, &Health), With<Hero>>()
            .iter(world)
            .next()
            .map(|(transform, health)| (transform.translation.x, health.current));
        let alive = world
            .query::<(&Enemy, &BehaviorState)>()
            .iter(world)
            .filter(|(_, behavior)| **behavior != BehaviorState::Dead)
            .count();

        logger::log_info(&format!(
            "tick {}: hero {:?}, enemies alive {}",
            current_tick(&app),
            hero,
            alive
        ));

        if hero.is_none() {
            logger::log_info("hero defeated");
            break;
        }
    }

    logger::log_info("Simulation complete!");
}
