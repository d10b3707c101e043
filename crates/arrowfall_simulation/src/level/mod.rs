//! Level module
//!
//! Данные уровня (RON) → entities: статическая геометрия, герой, враги.
//! Плюс snapshot'ы врагов для сохранения/восстановления.

pub mod data;
pub mod snapshot;
pub mod spawn;

pub use data::{EnemyPlacement, LevelBounds, LevelData, SpawnPoint, StaticRect};
pub use snapshot::EnemySnapshot;
pub use spawn::{spawn_level, LevelReport};
