//! Physics facade
//!
//! Ядро требует от физики немного: позиция/скорость тел, статическая геометрия
//! для probes и raycast, и события пересечений. Кто их поставляет: решает хост:
//!
//! - `PhysicsBackend::Rapier`: хост добавляет `RapierPhysicsPlugin`, мы только
//!   переводим `CollisionEvent` в combat события
//! - `PhysicsBackend::Kinematic`: headless gravity + AABB resolve + AABB overlaps
//! - `PhysicsBackend::Scripted`: тела двигает сам хост (тесты), overlaps по AABB

use bevy::prelude::*;
use bevy_rapier2d::prelude::CollisionEvent;

use crate::SimSet;

pub mod bridge;
pub mod kinematics;
pub mod probes;

pub use bridge::{bridge_rapier_collisions, detect_aabb_overlaps};
pub use kinematics::KinematicSettings;
pub use probes::{
    aabb_overlaps, cast_cone, edge_to_edge_distance, SolidProbe, StaticColliders,
};

/// Кто двигает тела и детектит пересечения
#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PhysicsBackend {
    /// Позиции выставляет хост, overlaps считаем по AABB
    Scripted,
    /// Headless kinematics + AABB overlaps
    #[default]
    Kinematic,
    /// Rapier (хост добавляет RapierPhysicsPlugin)
    Rapier,
}

/// Маркер статического коллайдера уровня (стена/пол) для Rapier режима
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct StaticBody;

/// Physics Plugin
///
/// Detect: источник combat событий пересечений (по backend).
/// Physics: интеграция (только Kinematic).
pub struct PhysicsPlugin {
    pub backend: PhysicsBackend,
}

impl Plugin for PhysicsPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(self.backend)
            .init_resource::<StaticColliders>()
            .init_resource::<KinematicSettings>()
            .add_event::<CollisionEvent>();

        match self.backend {
            PhysicsBackend::Rapier => {
                app.add_systems(FixedUpdate, bridge_rapier_collisions.in_set(SimSet::Detect));
            }
            PhysicsBackend::Scripted => {
                app.add_systems(FixedUpdate, detect_aabb_overlaps.in_set(SimSet::Detect));
            }
            PhysicsBackend::Kinematic => {
                app.add_systems(FixedUpdate, detect_aabb_overlaps.in_set(SimSet::Detect))
                    .add_systems(
                        FixedUpdate,
                        (
                            kinematics::apply_gravity,
                            kinematics::integrate_bodies,
                            kinematics::integrate_free_bodies,
                        )
                            .chain()
                            .in_set(SimSet::Physics),
                    );
            }
        }
    }
}
