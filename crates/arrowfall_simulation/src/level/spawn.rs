//! Построение уровня в World

use bevy::prelude::*;
use bevy_rapier2d::prelude::{Collider, RigidBody};

use crate::ai::{spawn_enemy, ArchetypeRegistry, EnemySpawn};
use crate::components::Facing;
use crate::error::{ConfigError, PlacementError};
use crate::hero::{spawn_hero, ActionInput, HeroConfig};
use crate::logger;
use crate::physics::{StaticBody, StaticColliders};

use super::data::{EnemyPlacement, LevelData};

/// Итог построения уровня
#[derive(Debug, Clone, Default)]
pub struct LevelReport {
    pub hero: Option<Entity>,
    pub enemies: Vec<Entity>,
    /// (индекс в `LevelData::enemies`, причина)
    pub failures: Vec<(usize, PlacementError)>,
}

/// Spawn уровня: статика, герой, враги
///
/// Враг с ошибкой размещения пропускается (логируется и попадает в `failures`),
/// остальной уровень строится.
pub fn spawn_level(world: &mut World, data: &LevelData) -> Result<LevelReport, ConfigError> {
    if !world.contains_resource::<ActionInput>() {
        logger::log_error("spawn_level: ActionInput resource is not installed");
        return Err(ConfigError::MissingCapability("ActionInput"));
    }
    if !data.bounds.is_valid() {
        logger::log_error(&format!(
            "spawn_level: invalid bounds {}x{}",
            data.bounds.width, data.bounds.height
        ));
        return Err(ConfigError::InvalidBounds {
            width: data.bounds.width,
            height: data.bounds.height,
        });
    }

    world.insert_resource(data.bounds);

    {
        let mut statics = world.get_resource_or_insert_with(StaticColliders::default);
        for rect in &data.statics {
            statics.add_rect(rect.min(), rect.size());
        }
    }

    let hero_config = *world.get_resource_or_insert_with(HeroConfig::default);
    let registry = world.get_resource_or_insert_with(ArchetypeRegistry::default).clone();

    let mut report = LevelReport::default();
    let hero_position = Vec2::from(data.hero_spawn);

    {
        let mut commands = world.commands();

        for rect in &data.statics {
            let half = rect.size() / 2.0;
            commands.spawn((
                StaticBody,
                Transform::from_translation(rect.center().extend(0.0)),
                RigidBody::Fixed,
                Collider::cuboid(half.x, half.y),
            ));
        }

        let hero = spawn_hero(&mut commands, &hero_config, hero_position);
        report.hero = Some(hero);

        for (index, placement) in data.enemies.iter().enumerate() {
            match place_enemy(&mut commands, &registry, index, placement, hero, hero_position) {
                Ok(enemy) => report.enemies.push(enemy),
                Err(error) => {
                    logger::log_error(&format!("spawn_level: skipping enemy #{}: {}", index, error));
                    report.failures.push((index, error));
                }
            }
        }
    }

    world.flush();

    logger::log_info(&format!(
        "level spawned: {} statics, {} enemies, {} failed",
        data.statics.len(),
        report.enemies.len(),
        report.failures.len()
    ));
    Ok(report)
}

fn place_enemy(
    commands: &mut Commands,
    registry: &ArchetypeRegistry,
    index: usize,
    placement: &EnemyPlacement,
    hero: Entity,
    hero_position: Vec2,
) -> Result<Entity, PlacementError> {
    let config = registry.get(&placement.archetype)?;
    config.validate(&placement.archetype)?;

    let patrol_extent = match &placement.patrol {
        Some(points) if points.len() < 2 => {
            return Err(PlacementError::TooFewWaypoints {
                index,
                count: points.len(),
            });
        }
        Some(points) => {
            let extent = points[1] - points[0];
            if extent == 0.0 {
                return Err(PlacementError::ZeroExtent { index });
            }
            Some(extent)
        }
        None if config.patrol.needs_waypoints() => {
            return Err(PlacementError::TooFewWaypoints { index, count: 0 });
        }
        None => None,
    };

    let position = Vec2::new(placement.x, placement.y);
    // Изначально смотрит на героя
    let facing = Facing::from_delta(hero_position.x - position.x, Facing::Right);

    Ok(spawn_enemy(
        commands,
        &EnemySpawn {
            archetype: &placement.archetype,
            config,
            position,
            facing,
            patrol_extent,
            target: hero,
        },
    ))
}
