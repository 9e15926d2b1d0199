//! Frame-driven simulation module
//!
//! All gameplay logic lives here, with no rendering or platform dependencies:
//! - Variable timestep, one synchronous pass per frame
//! - Seeded RNG only
//! - Stable iteration order (spawn order for enemies, acquisition order for weapons)
//! - Rendering requests leave as `VisualCommand`s, never as direct calls

pub mod arsenal;
pub mod collision;
pub mod effect;
pub mod enemy;
pub mod entity;
pub mod obstacle;
pub mod selection;
pub mod state;
pub mod status;
pub mod tick;
pub mod weapon;

pub use arsenal::Arsenal;
pub use collision::{Hit, HitPayload};
pub use effect::{VisualCommand, VisualKey, VisualKind, VisualUpdate};
pub use enemy::{EnemyController, spawn_interval};
pub use entity::{Enemy, EnemyId, Player};
pub use obstacle::{Obstacle, ObstacleShape};
pub use state::{GameEvent, GamePhase, GameState};
pub use status::{SlowSpec, apply_slow};
pub use tick::{TickInput, restart, select_weapon, start, tick};
pub use weapon::{Category, Weapon, WeaponKind};
