//! Visual commands emitted by the simulation
//!
//! The simulation never touches render resources. It queues commands keyed by
//! what they depict; the platform layer maps keys to renderer handles.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::entity::EnemyId;

/// Identifies the simulation object a visual belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VisualKey {
    Player,
    Enemy(EnemyId),
    /// Transient effect owned by a weapon (`local` is unique within the weapon)
    Effect { weapon: u32, local: u32 },
}

/// What to draw
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum VisualKind {
    Player { color: u32 },
    Enemy,
    Bolt,
    Icicle,
    Fireball,
    BurnPatch { radius: f32 },
    /// Lightning impact (real target or decoy)
    Strike,
    Beam { length: f32, width: f32 },
    Tendril { length: f32, width: f32 },
    Wall { length: f32, thickness: f32 },
}

/// Partial update for a live visual
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct VisualUpdate {
    pub pos: Option<Vec2>,
    pub opacity: Option<f32>,
    pub scale: Option<f32>,
}

impl VisualUpdate {
    pub fn moved_to(pos: Vec2) -> Self {
        Self {
            pos: Some(pos),
            ..Default::default()
        }
    }
}

/// A rendering request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum VisualCommand {
    /// Create a visual. With a `lifetime` the renderer owns the fade-out and
    /// removal; without one the visual lives until a matching `Despawn`.
    Spawn {
        key: VisualKey,
        kind: VisualKind,
        pos: Vec2,
        /// Heading on the ground plane (radians)
        orientation: f32,
        lifetime: Option<f32>,
    },
    Update {
        key: VisualKey,
        update: VisualUpdate,
    },
    Despawn {
        key: VisualKey,
    },
}

impl VisualCommand {
    pub fn key(&self) -> VisualKey {
        match self {
            VisualCommand::Spawn { key, .. }
            | VisualCommand::Update { key, .. }
            | VisualCommand::Despawn { key } => *key,
        }
    }
}
