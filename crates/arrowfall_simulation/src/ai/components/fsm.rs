//! FSM AI components (behavior state, attack gates, patrol).

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::clock::TickWindow;

/// Маркер врага + имя архетипа (для логов и snapshot'ов)
#[derive(Component, Debug, Clone, PartialEq, Eq, Default)]
pub struct Enemy {
    pub archetype: String,
}

/// Поведение врага
///
/// Переходы:
/// - Patrolling ⇄ Chasing по восприятию героя
/// - * → Attacking когда герой в attack range
/// - * → Hurt при уроне (следующий тик снова решает)
/// - * → Dead при health == 0 (терминально)
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Default, Reflect, Serialize, Deserialize)]
#[reflect(Component)]
pub enum BehaviorState {
    #[default]
    Patrolling,
    Chasing,
    Attacking,
    Hurt,
    Dead,
}

/// Гейты атаки
///
/// Инвариант: `is_attacking` ⇔ hitbox включён ⇔ играет EnemyAttack.
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
pub struct AttackGates {
    pub is_attacking: bool,
    /// Открывается по завершении атаки
    pub cooldown: TickWindow,
    /// Knockback в процессе: решения AI заморожены до восстановления скорости
    pub staggered: bool,
}

impl AttackGates {
    pub fn can_attack(&self, now: u64) -> bool {
        !self.is_attacking && !self.cooldown.is_active(now)
    }
}

/// Состояние патруля
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
pub struct PatrolState {
    pub patrolling: bool,
    /// Точка spawn'а
    pub origin: Vec2,
    /// Смещение второй точки патруля по X (WaypointOscillate)
    pub extent: Option<f32>,
}

/// Цель врага (non-owning: герой может исчезнуть)
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct TargetHero(pub Entity);
