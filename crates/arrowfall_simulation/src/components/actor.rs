//! Базовые компоненты combat entity: Health, Facing, BodySize, Grounded

use bevy::math::bounding::Aabb2d;
use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Здоровье
///
/// Инвариант: 0 ≤ current ≤ max. current == 0 → entity мертв и больше не участвует
/// в AI/коллизиях (даже пока доигрывает death animation).
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Reflect, Serialize, Deserialize)]
#[reflect(Component)]
pub struct Health {
    pub current: u32,
    pub max: u32,
}

impl Default for Health {
    fn default() -> Self {
        Self::new(30)
    }
}

impl Health {
    pub fn new(max: u32) -> Self {
        Self { current: max, max }
    }

    pub fn is_alive(&self) -> bool {
        self.current > 0
    }

    /// current = max(0, current - amount)
    pub fn take_damage(&mut self, amount: u32) {
        self.current = self.current.saturating_sub(amount);
    }

    pub fn heal(&mut self, amount: u32) {
        self.current = self.current.saturating_add(amount).min(self.max);
    }
}

/// Направление взгляда: +1 вправо, -1 влево
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Reflect, Serialize, Deserialize)]
#[reflect(Component)]
pub enum Facing {
    Left,
    Right,
}

impl Default for Facing {
    fn default() -> Self {
        Self::Right
    }
}

impl Facing {
    pub fn sign(&self) -> f32 {
        match self {
            Facing::Left => -1.0,
            Facing::Right => 1.0,
        }
    }

    /// Направление по знаку dx; при dx == 0 остаётся `fallback`
    pub fn from_delta(dx: f32, fallback: Facing) -> Facing {
        if dx > 0.0 {
            Facing::Right
        } else if dx < 0.0 {
            Facing::Left
        } else {
            fallback
        }
    }

    pub fn flipped(&self) -> Facing {
        match self {
            Facing::Left => Facing::Right,
            Facing::Right => Facing::Left,
        }
    }

    /// Спрайты нарисованы лицом вправо
    pub fn flip_x(&self) -> bool {
        matches!(self, Facing::Left)
    }
}

/// Полуразмеры AABB тела (центр = Transform.translation)
#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect)]
#[reflect(Component)]
pub struct BodySize {
    pub half_extents: Vec2,
}

impl Default for BodySize {
    fn default() -> Self {
        Self::new(12.0, 12.0)
    }
}

impl BodySize {
    pub fn new(half_width: f32, half_height: f32) -> Self {
        Self {
            half_extents: Vec2::new(half_width, half_height),
        }
    }

    pub fn aabb(&self, center: Vec2) -> Aabb2d {
        Aabb2d::new(center, self.half_extents)
    }
}

/// Контакт с поверхностью снизу. Пишется physics-хостом.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Eq, Reflect)]
#[reflect(Component)]
pub struct Grounded(pub bool);

/// Позиция entity в 2D
pub fn position_2d(transform: &Transform) -> Vec2 {
    transform.translation.truncate()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_health_damage() {
        let mut health = Health::new(30);
        health.take_damage(15);
        assert_eq!(health.current, 15);
        assert!(health.is_alive());

        health.take_damage(100); // saturating
        assert_eq!(health.current, 0);
        assert!(!health.is_alive());
    }

    #[test]
    fn test_health_heal_clamped() {
        let mut health = Health::new(5);
        health.take_damage(3);
        health.heal(1);
        assert_eq!(health.current, 3);

        health.heal(u32::MAX);
        assert_eq!(health.current, 5);
    }

    #[test]
    fn test_facing_from_delta() {
        assert_eq!(Facing::from_delta(3.0, Facing::Left), Facing::Right);
        assert_eq!(Facing::from_delta(-0.5, Facing::Right), Facing::Left);
        assert_eq!(Facing::from_delta(0.0, Facing::Left), Facing::Left);
        assert_eq!(Facing::Left.flipped().sign(), 1.0);
    }
}
