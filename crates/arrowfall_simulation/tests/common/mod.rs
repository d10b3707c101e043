//! Общие helpers для интеграционных тестов

#![allow(dead_code)]

use bevy::prelude::*;
use arrowfall_simulation::combat::HitboxLink;
use arrowfall_simulation::*;

/// Пол на всю ширину, верх на y = 88
pub fn floor() -> StaticRect {
    StaticRect {
        x: 0.0,
        y: 56.0,
        width: 1000.0,
        height: 32.0,
    }
}

pub fn level(hero: (f32, f32), statics: Vec<StaticRect>, enemies: Vec<EnemyPlacement>) -> LevelData {
    LevelData {
        bounds: LevelBounds {
            width: 1000.0,
            height: 600.0,
        },
        hero_spawn: SpawnPoint { x: hero.0, y: hero.1 },
        statics,
        enemies,
    }
}

pub fn enemy(archetype: &str, x: f32, y: f32) -> EnemyPlacement {
    EnemyPlacement {
        archetype: archetype.to_string(),
        x,
        y,
        patrol: None,
    }
}

/// App + загруженный уровень
pub fn setup(backend: PhysicsBackend, data: &LevelData) -> (App, LevelReport) {
    let mut app = create_headless_app(backend);
    let report = spawn_level(app.world_mut(), data).unwrap();
    (app, report)
}

pub fn hero_of(report: &LevelReport) -> Entity {
    report.hero.unwrap()
}

pub fn get<T: Component + Clone>(app: &App, entity: Entity) -> T {
    app.world().get::<T>(entity).unwrap().clone()
}

pub fn position(app: &App, entity: Entity) -> Vec2 {
    app.world().get::<Transform>(entity).unwrap().translation.truncate()
}

pub fn set_position(app: &mut App, entity: Entity, position: Vec2) {
    let mut transform = app.world_mut().get_mut::<Transform>(entity).unwrap();
    transform.translation.x = position.x;
    transform.translation.y = position.y;
}

pub fn hitbox_of(app: &App, enemy: Entity) -> Entity {
    app.world().get::<HitboxLink>(enemy).unwrap().0
}

pub fn input(app: &mut App) -> Mut<'_, ActionInput> {
    app.world_mut().resource_mut::<ActionInput>()
}

/// Считает события типа `E` (система после всех фаз тика)
#[derive(Resource)]
pub struct Recorded<E: Event + Clone>(pub Vec<E>);

fn record<E: Event + Clone>(mut reader: EventReader<E>, mut recorded: ResMut<Recorded<E>>) {
    recorded.0.extend(reader.read().cloned());
}

pub fn record_events<E: Event + Clone>(app: &mut App) {
    app.insert_resource(Recorded::<E>(Vec::new()))
        .add_systems(FixedUpdate, record::<E>.after(SimSet::Cleanup));
}

pub fn recorded<E: Event + Clone>(app: &App) -> Vec<E> {
    app.world().resource::<Recorded<E>>().0.clone()
}
