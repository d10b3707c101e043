//! ECS Components общие для hero и врагов
//!
//! - actor: health, facing, размер тела, grounded

pub mod actor;

pub use actor::*;
