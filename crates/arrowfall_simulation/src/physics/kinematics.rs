//! Headless kinematics (без Rapier)
//!
//! - Gravity для тел с `Grounded`
//! - Интеграция velocity → Transform по осям раздельно
//! - Axis-separated AABB resolve против `StaticColliders`
//!
//! Снаряды (без `Grounded`) летят насквозь: стену для них детектит overlap-система.

use bevy::prelude::*;
use bevy_rapier2d::prelude::{RigidBodyDisabled, Velocity};

use crate::combat::StuckInWall;
use crate::components::{BodySize, Grounded};

use super::probes::{SolidProbe, StaticColliders};

/// Параметры headless kinematics
#[derive(Resource, Debug, Clone, Copy, Reflect)]
#[reflect(Resource)]
pub struct KinematicSettings {
    /// Ускорение свободного падения (px/s², y вверх → отрицательное)
    pub gravity: f32,
    /// Насколько ниже ног проверяем опору
    pub ground_probe: f32,
}

impl Default for KinematicSettings {
    fn default() -> Self {
        Self {
            gravity: -800.0,
            ground_probe: 0.5,
        }
    }
}

/// Gravity только для тел в воздухе
pub fn apply_gravity(
    settings: Res<KinematicSettings>,
    time: Res<Time<Fixed>>,
    mut bodies: Query<(&Grounded, &mut Velocity), Without<RigidBodyDisabled>>,
) {
    let delta = time.delta_secs();

    for (grounded, mut velocity) in bodies.iter_mut() {
        if !grounded.0 {
            velocity.linvel.y += settings.gravity * delta;
        }
    }
}

/// Интеграция тел с коллизией против статики (герой, враги)
pub fn integrate_bodies(
    statics: Res<StaticColliders>,
    settings: Res<KinematicSettings>,
    time: Res<Time<Fixed>>,
    mut bodies: Query<
        (&BodySize, &mut Transform, &mut Velocity, &mut Grounded),
        Without<RigidBodyDisabled>,
    >,
) {
    let delta = time.delta_secs();

    for (body, mut transform, mut velocity, mut grounded) in bodies.iter_mut() {
        let mut position = transform.translation.truncate();

        // X: упёрлись в стену → откат шага
        position.x += velocity.linvel.x * delta;
        if statics.overlaps(&body.aabb(position)) {
            position.x -= velocity.linvel.x * delta;
            velocity.linvel.x = 0.0;
        }

        // Y: при падении встаём на верх коллайдера, при взлёте упираемся в потолок
        position.y += velocity.linvel.y * delta;
        if let Some(hit) = statics.first_overlap(&body.aabb(position)) {
            if velocity.linvel.y <= 0.0 {
                position.y = hit.max.y + body.half_extents.y;
            } else {
                position.y = hit.min.y - body.half_extents.y;
            }
            velocity.linvel.y = 0.0;
        }

        let feet = Vec2::new(position.x, position.y - body.half_extents.y - settings.ground_probe);
        let on_ground = velocity.linvel.y <= 0.0 && statics.is_solid_at(feet);
        if grounded.0 != on_ground {
            grounded.0 = on_ground;
        }

        transform.translation.x = position.x;
        transform.translation.y = position.y;
    }
}

/// Интеграция свободных тел (снаряды)
pub fn integrate_free_bodies(
    time: Res<Time<Fixed>>,
    mut bodies: Query<
        (&Velocity, &mut Transform),
        (Without<Grounded>, Without<RigidBodyDisabled>, Without<StuckInWall>),
    >,
) {
    let delta = time.delta_secs();

    for (velocity, mut transform) in bodies.iter_mut() {
        transform.translation += (velocity.linvel * delta).extend(0.0);
    }
}
