//! Геометрические probes поверх статической геометрии уровня
//!
//! Все функции чистые: на вход AABB/точки/`SolidProbe`, на выход bool/f32.
//! Это позволяет тестировать patrol turnaround и line-of-sight без physics движка.

use bevy::math::bounding::{Aabb2d, RayCast2d};
use bevy::prelude::*;

use crate::components::Facing;

/// "Есть ли статический коллайдер в точке"
pub trait SolidProbe {
    fn is_solid_at(&self, point: Vec2) -> bool;
}

/// Статическая геометрия уровня (стены, пол, платформы)
#[derive(Resource, Debug, Clone, Default)]
pub struct StaticColliders {
    pub colliders: Vec<Aabb2d>,
}

impl StaticColliders {
    pub fn new(colliders: Vec<Aabb2d>) -> Self {
        Self { colliders }
    }

    /// Прямоугольник по min-углу и размеру (y вверх)
    pub fn add_rect(&mut self, min: Vec2, size: Vec2) {
        let half = size * 0.5;
        self.colliders.push(Aabb2d::new(min + half, half));
    }

    pub fn overlaps(&self, aabb: &Aabb2d) -> bool {
        self.colliders.iter().any(|collider| aabb_overlaps(collider, aabb))
    }

    /// Первый статический коллайдер, пересекающий `aabb`
    pub fn first_overlap(&self, aabb: &Aabb2d) -> Option<&Aabb2d> {
        self.colliders.iter().find(|collider| aabb_overlaps(collider, aabb))
    }

    /// Расстояние до ближайшего статического попадания луча
    pub fn raycast(&self, ray: &RayCast2d) -> Option<f32> {
        self.colliders
            .iter()
            .filter_map(|collider| ray.aabb_intersection_at(collider))
            .min_by(|a, b| a.total_cmp(b))
    }
}

impl SolidProbe for StaticColliders {
    fn is_solid_at(&self, point: Vec2) -> bool {
        self.colliders.iter().any(|collider| aabb_contains(collider, point))
    }
}

/// Строгое пересечение: касание гранями не считается
pub fn aabb_overlaps(a: &Aabb2d, b: &Aabb2d) -> bool {
    a.min.x < b.max.x && a.max.x > b.min.x && a.min.y < b.max.y && a.max.y > b.min.y
}

pub fn aabb_contains(aabb: &Aabb2d, point: Vec2) -> bool {
    point.cmpge(aabb.min).all() && point.cmple(aabb.max).all()
}

/// Минимальное расстояние между двумя AABB (0 если пересекаются)
pub fn edge_to_edge_distance(a: &Aabb2d, b: &Aabb2d) -> f32 {
    let dx = (b.min.x - a.max.x).max(a.min.x - b.max.x).max(0.0);
    let dy = (b.min.y - a.max.y).max(a.min.y - b.max.y).max(0.0);
    Vec2::new(dx, dy).length()
}

/// Cone raycast: `rays` лучей равномерно в секторе `cone_deg` вокруг facing.
///
/// Цель видна если хотя бы один луч попадает в `target` раньше, чем в статику.
pub fn cast_cone(
    origin: Vec2,
    facing: Facing,
    cone_deg: f32,
    length: f32,
    rays: u32,
    statics: &StaticColliders,
    target: &Aabb2d,
) -> bool {
    let center = if facing == Facing::Right { 0.0 } else { std::f32::consts::PI };
    let spread = cone_deg.to_radians();

    for angle in cone_angles(center, spread, rays) {
        let Ok(direction) = Dir2::new(Vec2::from_angle(angle)) else {
            continue;
        };
        let ray = RayCast2d::new(origin, direction, length);

        let Some(target_hit) = ray.aabb_intersection_at(target) else {
            continue;
        };

        match statics.raycast(&ray) {
            Some(wall_hit) if wall_hit < target_hit => continue,
            _ => return true,
        }
    }

    false
}

fn cone_angles(center: f32, spread: f32, rays: u32) -> Vec<f32> {
    if rays <= 1 || spread <= 0.0 {
        return vec![center];
    }
    let step = spread / (rays - 1) as f32;
    (0..rays)
        .map(|i| center - spread * 0.5 + step * i as f32)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn floor_and_wall() -> StaticColliders {
        let mut statics = StaticColliders::default();
        statics.add_rect(Vec2::new(0.0, 56.0), Vec2::new(1000.0, 32.0)); // top y = 88
        statics.add_rect(Vec2::new(300.0, 88.0), Vec2::new(20.0, 100.0));
        statics
    }

    #[test]
    fn test_edge_to_edge_overlapping_is_zero() {
        let a = Aabb2d::new(Vec2::new(0.0, 0.0), Vec2::splat(10.0));
        let b = Aabb2d::new(Vec2::new(15.0, 0.0), Vec2::splat(10.0));
        assert_eq!(edge_to_edge_distance(&a, &b), 0.0);
    }

    #[test]
    fn test_edge_to_edge_horizontal_gap() {
        let a = Aabb2d::new(Vec2::new(0.0, 0.0), Vec2::splat(10.0));
        let b = Aabb2d::new(Vec2::new(50.0, 0.0), Vec2::splat(10.0));
        assert_eq!(edge_to_edge_distance(&a, &b), 30.0);
        assert_eq!(edge_to_edge_distance(&b, &a), 30.0);
    }

    #[test]
    fn test_edge_to_edge_diagonal_gap() {
        let a = Aabb2d::new(Vec2::ZERO, Vec2::splat(1.0));
        let b = Aabb2d::new(Vec2::new(5.0, 6.0), Vec2::splat(1.0));
        // gap (3, 4) → 5
        assert!((edge_to_edge_distance(&a, &b) - 5.0).abs() < 1e-5);
    }

    #[test]
    fn test_touching_is_not_overlap() {
        let floor = Aabb2d::new(Vec2::new(0.0, 0.0), Vec2::splat(10.0));
        let standing = Aabb2d::new(Vec2::new(0.0, 20.0), Vec2::splat(10.0));
        assert!(!aabb_overlaps(&floor, &standing));

        let sunk = Aabb2d::new(Vec2::new(0.0, 19.0), Vec2::splat(10.0));
        assert!(aabb_overlaps(&floor, &sunk));
    }

    #[test]
    fn test_point_probe() {
        let statics = floor_and_wall();
        assert!(statics.is_solid_at(Vec2::new(10.0, 87.0)));
        assert!(!statics.is_solid_at(Vec2::new(10.0, 89.0)));
        assert!(statics.is_solid_at(Vec2::new(310.0, 120.0)));
    }

    #[test]
    fn test_cone_sees_target_in_front() {
        let statics = floor_and_wall();
        let target = Aabb2d::new(Vec2::new(200.0, 100.0), Vec2::new(10.0, 16.0));
        assert!(cast_cone(Vec2::new(100.0, 100.0), Facing::Right, 30.0, 200.0, 5, &statics, &target));
    }

    #[test]
    fn test_cone_ignores_target_behind() {
        let statics = floor_and_wall();
        let target = Aabb2d::new(Vec2::new(40.0, 100.0), Vec2::new(10.0, 16.0));
        assert!(!cast_cone(Vec2::new(100.0, 100.0), Facing::Right, 30.0, 200.0, 5, &statics, &target));
    }

    #[test]
    fn test_cone_blocked_by_wall() {
        let statics = floor_and_wall();
        let target = Aabb2d::new(Vec2::new(360.0, 100.0), Vec2::new(10.0, 16.0));
        assert!(!cast_cone(Vec2::new(250.0, 100.0), Facing::Right, 30.0, 200.0, 5, &statics, &target));
    }

    #[test]
    fn test_cone_out_of_length() {
        let statics = StaticColliders::default();
        let target = Aabb2d::new(Vec2::new(500.0, 100.0), Vec2::new(10.0, 16.0));
        assert!(!cast_cone(Vec2::new(100.0, 100.0), Facing::Right, 90.0, 200.0, 7, &statics, &target));
    }
}
