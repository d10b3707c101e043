//! AI systems
//!
//! - `fsm`: решение на тик для каждого врага
//! - `reactions`: реакции на события (конец атаки, восстановление после knockback)

pub mod fsm;
pub mod reactions;

pub use fsm::enemy_ai_tick;
pub use reactions::{finish_enemy_attacks, restore_knockback_velocity};
