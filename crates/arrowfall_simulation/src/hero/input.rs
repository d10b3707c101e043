//! Input героя
//!
//! Хост (клавиатура, touch, тест) пишет в `ActionInput` до тика симуляции.
//! Симуляция читает held/edge состояние и в конце тика фиксирует "предыдущий кадр".
//!
//! Pointer (touch) режим: экран делится на квадранты:
//!
//! ```text
//! ┌────────────┬────────────┐
//! │  Jumping   │  Shooting  │   tap (pointer down)
//! ├────────────┼────────────┤
//! │ MovingLeft │ MovingRight│   hold
//! └────────────┴────────────┘
//! ```
//! Координаты pointer'а: экранные: (0, 0) слева сверху.

use bevy::prelude::*;

use super::state::HeroAction;

/// Логические кнопки героя
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HeroButton {
    MoveLeft,
    MoveRight,
    Jump,
    Shoot,
}

impl HeroButton {
    pub const ALL: [HeroButton; 4] = [
        HeroButton::MoveLeft,
        HeroButton::MoveRight,
        HeroButton::Jump,
        HeroButton::Shoot,
    ];

    fn index(self) -> usize {
        match self {
            HeroButton::MoveLeft => 0,
            HeroButton::MoveRight => 1,
            HeroButton::Jump => 2,
            HeroButton::Shoot => 3,
        }
    }
}

/// Input capability. Без этого resource уровень не загружается.
#[derive(Resource, Debug, Clone, Default)]
pub struct ActionInput {
    held: [bool; 4],
    previous: [bool; 4],
    pointer: Option<Vec2>,
    pointer_was_down: bool,
    /// Размер экрана для pointer квадрантов
    pub viewport: Vec2,
}

impl ActionInput {
    pub fn with_viewport(viewport: Vec2) -> Self {
        Self {
            viewport,
            ..Default::default()
        }
    }

    pub fn press(&mut self, button: HeroButton) {
        self.held[button.index()] = true;
    }

    pub fn release(&mut self, button: HeroButton) {
        self.held[button.index()] = false;
    }

    pub fn release_all(&mut self) {
        self.held = [false; 4];
    }

    pub fn is_held(&self, button: HeroButton) -> bool {
        self.held[button.index()]
    }

    /// Нажата в этом кадре (edge)
    pub fn just_pressed(&self, button: HeroButton) -> bool {
        self.held[button.index()] && !self.previous[button.index()]
    }

    pub fn pointer_down(&mut self, position: Vec2) {
        self.pointer = Some(position);
    }

    pub fn pointer_up(&mut self) {
        self.pointer = None;
    }

    /// Действие по tap'у в верхней половине экрана (только в кадре нажатия)
    pub fn pointer_tap(&self) -> Option<HeroAction> {
        if self.pointer_was_down {
            return None;
        }
        let position = self.pointer?;
        match quadrant_action(position, self.viewport) {
            action @ (HeroAction::Jumping | HeroAction::Shooting) => Some(action),
            _ => None,
        }
    }

    /// Движение пока pointer удерживается в нижней половине экрана
    pub fn pointer_hold(&self) -> Option<HeroAction> {
        let position = self.pointer?;
        match quadrant_action(position, self.viewport) {
            action @ (HeroAction::MovingLeft | HeroAction::MovingRight) => Some(action),
            _ => None,
        }
    }

    /// Конец кадра: текущее состояние становится предыдущим
    pub fn end_frame(&mut self) {
        self.previous = self.held;
        self.pointer_was_down = self.pointer.is_some();
    }
}

/// Квадрант экрана → действие
pub fn quadrant_action(position: Vec2, viewport: Vec2) -> HeroAction {
    let left = position.x < viewport.x * 0.5;
    let top = position.y < viewport.y * 0.5;

    match (top, left) {
        (true, true) => HeroAction::Jumping,
        (true, false) => HeroAction::Shooting,
        (false, true) => HeroAction::MovingLeft,
        (false, false) => HeroAction::MovingRight,
    }
}
