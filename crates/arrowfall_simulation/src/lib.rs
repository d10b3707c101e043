//! Arrowfall Simulation Core
//!
//! Боевое ядро 2D платформера на Bevy 0.16: герой-лучник, враги с FSM,
//! hit resolution. Без рендера: хост читает компоненты (`Transform`,
//! `SpriteAnimator`, `Facing`) и пишет input (`ActionInput`).
//!
//! Один логический тик = один FixedUpdate (60Hz). Порядок внутри тика
//! задаётся цепочкой `SimSet`.

use std::time::Duration;

use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;

// Публичные модули
pub mod ai;
pub mod animation;
pub mod clock;
pub mod combat;
pub mod components;
pub mod error;
pub mod hero;
pub mod level;
pub mod logger;
pub mod physics;

// Re-export основных типов
pub use ai::{AIPlugin, ArchetypeRegistry, BehaviorState, Enemy, EnemyConfig};
pub use animation::{AnimationFinished, AnimationId, AnimationLibrary, PlayOptions, SpriteAnimator};
pub use clock::{DelayedAction, DelayedCalls, SimClock, TickWindow, TimerFired, TICK_HZ};
pub use combat::{AttackHitbox, AttackStarted, CombatPlugin, DamageEvent, Dead, EntityDied, HeroDefeated, Projectile};
pub use components::*;
pub use error::{ConfigError, PlacementError};
pub use hero::{ActionInput, Hero, HeroAction, HeroButton, HeroConfig, HeroPlugin};
pub use level::{spawn_level, EnemyPlacement, EnemySnapshot, LevelBounds, LevelData, LevelReport, SpawnPoint, StaticRect};
pub use logger::init_logger;
pub use physics::{PhysicsBackend, PhysicsPlugin, StaticColliders};

/// Фазы логического тика (выполняются строго по порядку)
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SimSet {
    /// +1 тик, созревшие таймеры → `TimerFired`
    Clock,
    /// Продвижение анимаций → `AnimationFinished`
    Animation,
    /// Реакции на события прошлой фазы (конец атаки, knockback, despawn)
    Reactions,
    /// Input → действия героя
    Hero,
    /// Решения врагов
    Enemy,
    /// Пересечения → combat события
    Detect,
    /// Combat события → урон
    Resolve,
    /// Интеграция тел (Kinematic backend)
    Physics,
    /// Уборка (стрелы за границами)
    Cleanup,
}

/// Главный plugin симуляции (объединяет все подсистемы)
#[derive(Default)]
pub struct SimulationPlugin {
    pub backend: PhysicsBackend,
}

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        app
            // Fixed timestep 60Hz: один логический тик
            .insert_resource(Time::<Fixed>::from_hz(TICK_HZ as f64))
            .init_resource::<SimClock>()
            .init_resource::<DelayedCalls>()
            .init_resource::<AnimationLibrary>()
            .add_event::<TimerFired>()
            .add_event::<AnimationFinished>()
            .configure_sets(
                FixedUpdate,
                (
                    SimSet::Clock,
                    SimSet::Animation,
                    SimSet::Reactions,
                    SimSet::Hero,
                    SimSet::Enemy,
                    SimSet::Detect,
                    SimSet::Resolve,
                    SimSet::Physics,
                    SimSet::Cleanup,
                )
                    .chain(),
            )
            .add_systems(
                FixedUpdate,
                (clock::advance_clock, clock::fire_delayed_calls)
                    .chain()
                    .in_set(SimSet::Clock),
            )
            .add_systems(FixedUpdate, animation::tick_animations.in_set(SimSet::Animation))
            // Подсистемы
            .add_plugins((
                PhysicsPlugin { backend: self.backend },
                CombatPlugin,
                HeroPlugin,
                AIPlugin,
            ));
    }
}

/// Создаёт minimal Bevy App для headless симуляции
///
/// Время двигается вручную: каждый `app.update()` = 1/60 s. Input установлен
/// (пустой), уровень загружается отдельно через `spawn_level`.
pub fn create_headless_app(backend: PhysicsBackend) -> App {
    let mut app = App::new();
    init_logger();
    app.add_plugins(MinimalPlugins)
        .insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_secs_f64(
            1.0 / TICK_HZ as f64,
        )))
        .insert_resource(ActionInput::default())
        .add_plugins(SimulationPlugin { backend });

    app
}

/// Прогнать ровно `ticks` логических тиков
///
/// `app.update()` не гарантирует ровно один FixedUpdate (накопление времени
/// во float), поэтому считаем по `SimClock`.
pub fn advance_ticks(app: &mut App, ticks: u64) {
    let target = app.world().resource::<SimClock>().tick + ticks;
    let mut guard = 0;
    while app.world().resource::<SimClock>().tick < target && guard < ticks * 4 + 8 {
        app.update();
        guard += 1;
    }
}

/// Текущий тик симуляции
pub fn current_tick(app: &App) -> u64 {
    app.world().resource::<SimClock>().tick
}
