//! Animation controller
//!
//! Симуляция не рисует спрайты: она только знает какая анимация играет,
//! когда она началась и когда закончится. Рендер-хост читает `SpriteAnimator`
//! и выставляет кадр/flip.
//!
//! Завершение конечной анимации: это `AnimationFinished` событие в общей
//! event-очереди тика, а не callback изнутри анимационной подсистемы.

use std::collections::HashMap;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::clock::SimClock;

/// Все анимации, о которых знает ядро
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Reflect, Serialize, Deserialize)]
pub enum AnimationId {
    HeroIdle,
    HeroWalk,
    HeroJump,
    HeroShoot,
    HeroHurt,
    HeroDie,
    EnemyIdle,
    EnemyMoving,
    EnemyAttack,
    EnemyHurt,
    EnemyDeath,
}

/// Описание клипа (кадры берутся из frame-table хоста, здесь только тайминг)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnimationClip {
    pub frames: u32,
    pub frame_ms: u64,
    pub looping: bool,
}

impl AnimationClip {
    pub const fn once(frames: u32, frame_ms: u64) -> Self {
        Self { frames, frame_ms, looping: false }
    }

    pub const fn looped(frames: u32, frame_ms: u64) -> Self {
        Self { frames, frame_ms, looping: true }
    }

    pub fn duration_ms(&self) -> u64 {
        self.frames as u64 * self.frame_ms
    }
}

/// Таблица клипов. Хост может заменить resource своей.
#[derive(Resource, Debug, Clone)]
pub struct AnimationLibrary {
    clips: HashMap<AnimationId, AnimationClip>,
}

impl Default for AnimationLibrary {
    fn default() -> Self {
        // frameRate из оригинальных sprite sheets: idle 5fps, walk 10fps, jump 7fps, shoot 15fps
        let mut clips = HashMap::new();
        clips.insert(AnimationId::HeroIdle, AnimationClip::looped(4, 200));
        clips.insert(AnimationId::HeroWalk, AnimationClip::looped(4, 100));
        clips.insert(AnimationId::HeroJump, AnimationClip::once(3, 143));
        clips.insert(AnimationId::HeroShoot, AnimationClip::once(5, 67));
        clips.insert(AnimationId::HeroHurt, AnimationClip::once(3, 100));
        clips.insert(AnimationId::HeroDie, AnimationClip::once(6, 100));
        clips.insert(AnimationId::EnemyIdle, AnimationClip::looped(4, 150));
        clips.insert(AnimationId::EnemyMoving, AnimationClip::looped(4, 100));
        clips.insert(AnimationId::EnemyAttack, AnimationClip::once(6, 100));
        clips.insert(AnimationId::EnemyHurt, AnimationClip::once(3, 100));
        clips.insert(AnimationId::EnemyDeath, AnimationClip::once(6, 100));
        Self { clips }
    }
}

impl AnimationLibrary {
    pub fn get(&self, id: AnimationId) -> Option<&AnimationClip> {
        self.clips.get(&id)
    }

    pub fn insert(&mut self, id: AnimationId, clip: AnimationClip) {
        self.clips.insert(id, clip);
    }
}

/// Параметры `play`
#[derive(Debug, Clone, Copy, Default)]
pub struct PlayOptions<'a> {
    /// Если сейчас играет одна из этих анимаций: вызов игнорируется
    pub except_if_playing: &'a [AnimationId],
    /// Перезапустить, даже если эта же анимация уже играет
    pub restart: bool,
    /// Flip по X; применяется всегда, независимо от выбора анимации
    pub flip_x: Option<bool>,
}

impl<'a> PlayOptions<'a> {
    pub fn except(except_if_playing: &'a [AnimationId]) -> Self {
        Self {
            except_if_playing,
            ..Default::default()
        }
    }

    pub fn restart() -> Self {
        Self {
            restart: true,
            ..Default::default()
        }
    }
}

/// Текущее состояние анимации entity
#[derive(Component, Debug, Clone, Default, Reflect)]
#[reflect(Component)]
pub struct SpriteAnimator {
    pub current: Option<AnimationId>,
    pub started_at_tick: u64,
    /// false после завершения конечного клипа
    pub playing: bool,
    pub flip_x: bool,
}

impl SpriteAnimator {
    /// Играть `id` с учётом приоритетов. Возвращает true если анимация (пере)запущена.
    pub fn play(&mut self, id: AnimationId, options: PlayOptions, now: u64) -> bool {
        if let Some(flip) = options.flip_x {
            self.flip_x = flip;
        }

        if let Some(current) = self.current {
            if self.playing && options.except_if_playing.contains(&current) {
                return false;
            }
            if current == id && self.playing && !options.restart {
                return false;
            }
        }

        self.current = Some(id);
        self.started_at_tick = now;
        self.playing = true;
        true
    }

    pub fn is_playing(&self, id: AnimationId) -> bool {
        self.playing && self.current == Some(id)
    }

    /// Продвинуть на текущий тик. Возвращает Some(id) ровно один раз, когда конечный клип
    /// дошёл до последнего кадра.
    pub fn advance(&mut self, clock: &SimClock, library: &AnimationLibrary) -> Option<AnimationId> {
        let current = self.current?;
        if !self.playing {
            return None;
        }
        let clip = library.get(current)?;
        if clip.looping {
            return None;
        }

        let duration_ticks = clock.ms_to_ticks(clip.duration_ms());
        if clock.tick.saturating_sub(self.started_at_tick) >= duration_ticks {
            self.playing = false;
            return Some(current);
        }
        None
    }

    /// Номер кадра для рендера
    pub fn frame_index(&self, clock: &SimClock, library: &AnimationLibrary) -> u32 {
        let Some(clip) = self.current.and_then(|id| library.get(id)) else {
            return 0;
        };
        if clip.frames == 0 || clip.frame_ms == 0 {
            return 0;
        }
        let frame = clock.ms_since(self.started_at_tick) / clip.frame_ms;
        if clip.looping {
            (frame % clip.frames as u64) as u32
        } else {
            (frame as u32).min(clip.frames - 1)
        }
    }
}

/// Событие: конечная анимация доиграла
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnimationFinished {
    pub entity: Entity,
    pub animation: AnimationId,
}

/// Система: продвигает все аниматоры и публикует AnimationFinished
pub fn tick_animations(
    clock: Res<SimClock>,
    library: Res<AnimationLibrary>,
    mut animators: Query<(Entity, &mut SpriteAnimator)>,
    mut finished: EventWriter<AnimationFinished>,
) {
    for (entity, mut animator) in animators.iter_mut() {
        if let Some(animation) = animator.advance(&clock, &library) {
            finished.write(AnimationFinished { entity, animation });
        }
    }
}
