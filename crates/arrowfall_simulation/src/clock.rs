//! Timer/Scheduler facade
//!
//! Всё время симуляции: монотонный счётчик тиков (`SimClock`).
//! Никаких wall-clock callback'ов: окна (invincibility, attack cooldown)
//! хранятся как `TickWindow { active, expires_at_tick }`, отложенные действия
//! как `DelayedCalls` очередь, которая при срабатывании пишет `TimerFired` событие.
//!
//! Потребители `TimerFired` обязаны проверять что target entity ещё существует:
//! между schedule и fire entity мог быть уничтожен.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Частота simulation tick (совпадает с Time<Fixed>)
pub const TICK_HZ: u64 = 60;

/// Монотонные часы симуляции
#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimClock {
    /// Номер текущего тика (0 до первого FixedUpdate)
    pub tick: u64,
    /// Тиков в секунду
    pub hz: u64,
}

impl Default for SimClock {
    fn default() -> Self {
        Self { tick: 0, hz: TICK_HZ }
    }
}

impl SimClock {
    /// Миллисекунды с начала симуляции (целочисленно, округление вниз)
    pub fn now_ms(&self) -> u64 {
        self.ticks_to_ms(self.tick)
    }

    pub fn ticks_to_ms(&self, ticks: u64) -> u64 {
        ticks * 1000 / self.hz
    }

    /// Длительность в тиках, округление вверх (минимум 1 тик для ненулевого ms)
    pub fn ms_to_ticks(&self, ms: u64) -> u64 {
        (ms * self.hz).div_ceil(1000)
    }

    /// Сколько ms прошло с указанного тика
    pub fn ms_since(&self, tick: u64) -> u64 {
        self.ticks_to_ms(self.tick.saturating_sub(tick))
    }
}

/// Окно времени, проверяемое по тику: `{active, expires_at_tick}`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Reflect, Serialize, Deserialize)]
pub struct TickWindow {
    pub active: bool,
    pub expires_at_tick: u64,
}

impl TickWindow {
    /// Открыть окно на `duration_ticks` начиная с `now`
    pub fn open(&mut self, now: u64, duration_ticks: u64) {
        self.active = true;
        self.expires_at_tick = now + duration_ticks;
    }

    /// Открыть окно только если предыдущее уже истекло. Возвращает true если открыли.
    pub fn open_if_expired(&mut self, now: u64, duration_ticks: u64) -> bool {
        if self.is_active(now) {
            return false;
        }
        self.open(now, duration_ticks);
        true
    }

    pub fn is_active(&self, now: u64) -> bool {
        self.active && now < self.expires_at_tick
    }

    /// Сбросить флаг если окно истекло (чтобы `active` в snapshot не врал)
    pub fn refresh(&mut self, now: u64) {
        if self.active && now >= self.expires_at_tick {
            self.active = false;
        }
    }
}

/// Отложенное действие (аналог `delayedCall(ms, callback)`)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DelayedAction {
    /// Вернуть скорость врагу после knockback
    RestoreVelocity { entity: Entity },
    /// Удалить стрелу, воткнувшуюся в стену
    DespawnProjectile { entity: Entity },
}

#[derive(Debug, Clone, Copy)]
struct ScheduledCall {
    due_tick: u64,
    seq: u64,
    action: DelayedAction,
}

/// Очередь отложенных действий (не отменяемых: получатель проверяет guard сам)
#[derive(Resource, Debug, Default)]
pub struct DelayedCalls {
    pending: Vec<ScheduledCall>,
    next_seq: u64,
}

impl DelayedCalls {
    pub fn schedule(&mut self, clock: &SimClock, delay_ms: u64, action: DelayedAction) {
        let due_tick = clock.tick + clock.ms_to_ticks(delay_ms);
        self.pending.push(ScheduledCall {
            due_tick,
            seq: self.next_seq,
            action,
        });
        self.next_seq += 1;
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Забрать все созревшие действия в порядке (due_tick, seq)
    pub fn drain_due(&mut self, now: u64) -> Vec<DelayedAction> {
        let mut due: Vec<ScheduledCall> = Vec::new();
        self.pending.retain(|call| {
            if call.due_tick <= now {
                due.push(*call);
                false
            } else {
                true
            }
        });
        due.sort_by_key(|call| (call.due_tick, call.seq));
        due.into_iter().map(|call| call.action).collect()
    }
}

/// Событие: отложенное действие созрело
#[derive(Event, Debug, Clone, Copy)]
pub struct TimerFired {
    pub action: DelayedAction,
}

/// Система: +1 тик
pub fn advance_clock(mut clock: ResMut<SimClock>) {
    clock.tick += 1;
}

/// Система: конвертирует созревшие DelayedCalls в TimerFired события
pub fn fire_delayed_calls(
    clock: Res<SimClock>,
    mut calls: ResMut<DelayedCalls>,
    mut fired: EventWriter<TimerFired>,
) {
    for action in calls.drain_due(clock.tick) {
        fired.write(TimerFired { action });
    }
}
