//! Player and enemy records

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::status::SlowState;
use crate::consts::*;

/// Stable enemy identifier (never reused within a session)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EnemyId(pub u32);

/// The player character
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    /// Position on the ground plane (x, z)
    pub pos: Vec2,
    /// Movement speed (units per second)
    pub speed: f32,
    pub radius: f32,
    /// Health in [0, 100]
    pub health: f32,
    /// Last non-zero movement direction
    pub facing: Vec2,
    /// Cosmetic colour from settings
    pub color: u32,
}

impl Player {
    pub fn new(color: u32) -> Self {
        Self {
            pos: Vec2::ZERO,
            speed: PLAYER_SPEED,
            radius: PLAYER_RADIUS,
            health: PLAYER_MAX_HEALTH,
            facing: Vec2::X,
            color,
        }
    }

    /// Displacement for one frame of movement intent (diagonals normalized)
    pub fn step_for(&self, intent: Vec2, dt: f32) -> Vec2 {
        let dir = intent.normalize_or_zero();
        dir * self.speed * dt
    }

    /// Remember the heading of a non-zero intent
    pub fn face(&mut self, intent: Vec2) {
        if let Some(dir) = intent.try_normalize() {
            self.facing = dir;
        }
    }

    /// Lose health, clamped at zero. Returns true if the player is now dead
    pub fn take_damage(&mut self, amount: f32) -> bool {
        self.health = (self.health - amount).max(0.0);
        self.health <= 0.0
    }

    /// Restore health, clamped to the maximum
    pub fn heal(&mut self, amount: f32) {
        self.health = super::status::clamp_health(self.health + amount);
    }

    pub fn is_dead(&self) -> bool {
        self.health <= 0.0
    }
}

/// An enemy pursuing the player
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub id: EnemyId,
    pub pos: Vec2,
    /// Unmodified speed; never overwritten by status effects
    pub base_speed: f32,
    /// Speed used for movement this frame (base * slow multiplier)
    pub speed: f32,
    pub health: f32,
    pub radius: f32,
    pub alive: bool,
    /// Score awarded on death
    pub value: u64,
    /// Active slow, if any
    pub slow: Option<SlowState>,
}

impl Enemy {
    pub fn new(id: EnemyId, pos: Vec2, base_speed: f32, health: f32) -> Self {
        Self {
            id,
            pos,
            base_speed,
            speed: base_speed,
            health,
            radius: ENEMY_RADIUS,
            alive: true,
            value: ENEMY_SCORE_VALUE,
            slow: None,
        }
    }

    /// Apply damage. Returns true only on the hit that kills the enemy;
    /// damaging an already-dead enemy does nothing.
    pub fn take_damage(&mut self, amount: f32) -> bool {
        if !self.alive {
            return false;
        }
        self.health -= amount;
        if self.health <= 0.0 {
            self.alive = false;
            return true;
        }
        false
    }

    pub fn is_slowed(&self) -> bool {
        self.slow.is_some()
    }
}
