//! Восприятие героя врагом

use bevy::math::bounding::{Aabb2d, BoundingVolume};
use bevy::prelude::*;

use crate::components::Facing;
use crate::physics::{cast_cone, edge_to_edge_distance, StaticColliders};

use super::components::{DistanceMetric, PerceptionStrategy};

/// Что враг знает о герое в этом тике
#[derive(Debug, Clone, Copy)]
pub struct HeroView {
    pub entity: Entity,
    pub aabb: Aabb2d,
}

impl HeroView {
    pub fn position(&self) -> Vec2 {
        self.aabb.center()
    }
}

pub fn distance_to_hero(metric: DistanceMetric, own: &Aabb2d, hero: &HeroView) -> f32 {
    match metric {
        DistanceMetric::Center => own.center().distance(hero.position()),
        DistanceMetric::EdgeToEdge => edge_to_edge_distance(own, &hero.aabb),
    }
}

/// Видит ли враг героя (вне attack range)
///
/// `patrolling` сужает конус: в патруле враг смотрит прямо, в поиске: шире.
pub fn perceives_hero(
    strategy: &PerceptionStrategy,
    chase_range: f32,
    distance: f32,
    own: &Aabb2d,
    facing: Facing,
    patrolling: bool,
    statics: &StaticColliders,
    hero: &HeroView,
) -> bool {
    match *strategy {
        PerceptionStrategy::Range => distance <= chase_range,
        PerceptionStrategy::ConeRaycast {
            patrol_cone_deg,
            search_cone_deg,
            length,
            rays,
        } => {
            let cone = if patrolling { patrol_cone_deg } else { search_cone_deg };
            cast_cone(own.center(), facing, cone, length, rays, statics, &hero.aabb)
        }
    }
}
