//! Описание уровня

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Границы уровня: `[0, width] × [0, height]`
#[derive(Resource, Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LevelBounds {
    pub width: f32,
    pub height: f32,
}

impl LevelBounds {
    pub fn contains(&self, point: Vec2) -> bool {
        (0.0..=self.width).contains(&point.x) && (0.0..=self.height).contains(&point.y)
    }

    pub fn is_valid(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpawnPoint {
    pub x: f32,
    pub y: f32,
}

impl From<SpawnPoint> for Vec2 {
    fn from(point: SpawnPoint) -> Self {
        Vec2::new(point.x, point.y)
    }
}

/// Прямоугольник статической геометрии (min угол + размер, y вверх)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StaticRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl StaticRect {
    pub fn min(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    pub fn center(&self) -> Vec2 {
        self.min() + self.size() / 2.0
    }
}

/// Враг на уровне
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnemyPlacement {
    pub archetype: String,
    pub x: f32,
    pub y: f32,
    /// X-координаты точек патруля (для WaypointOscillate)
    #[serde(default)]
    pub patrol: Option<Vec<f32>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelData {
    pub bounds: LevelBounds,
    pub hero_spawn: SpawnPoint,
    #[serde(default)]
    pub statics: Vec<StaticRect>,
    #[serde(default)]
    pub enemies: Vec<EnemyPlacement>,
}

impl LevelData {
    pub fn from_ron(text: &str) -> Result<Self, ConfigError> {
        Ok(ron::from_str(text)?)
    }
}
