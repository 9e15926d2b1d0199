//! Obstacles that block movement and optionally damage on contact

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::{sd_box, sd_circle};
use super::entity::EnemyId;

/// Extra slack for contact damage, so an enemy held back by the blocking rule
/// still counts as touching
pub const CONTACT_MARGIN: f32 = 0.1;

/// Collision geometry of an obstacle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ObstacleShape {
    Circle { radius: f32 },
    /// Rotated box; the obstacle's `rotation` orients the local x axis
    Box { half_extents: Vec2 },
}

/// Damage dealt to enemies touching an obstacle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ContactDamage {
    pub damage: f32,
    pub knockback: f32,
    /// Minimum seconds between two contacts with the same enemy
    pub cooldown: f32,
}

/// A static obstacle in the arena
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub pos: Vec2,
    /// Heading of the local x axis (radians)
    pub rotation: f32,
    pub shape: ObstacleShape,
    /// Seconds left before the obstacle crumbles
    pub ttl: f32,
    pub blocks_movement: bool,
    pub contact: Option<ContactDamage>,
    /// Enemies recently damaged, with the time they may be damaged again
    #[serde(default)]
    pub contact_cooldowns: Vec<(EnemyId, f32)>,
}

impl Obstacle {
    pub fn circle(pos: Vec2, radius: f32, ttl: f32) -> Self {
        Self {
            pos,
            rotation: 0.0,
            shape: ObstacleShape::Circle { radius },
            ttl,
            blocks_movement: true,
            contact: None,
            contact_cooldowns: Vec::new(),
        }
    }

    pub fn wall(pos: Vec2, rotation: f32, length: f32, thickness: f32, ttl: f32) -> Self {
        Self {
            pos,
            rotation,
            shape: ObstacleShape::Box {
                half_extents: Vec2::new(length / 2.0, thickness / 2.0),
            },
            ttl,
            blocks_movement: true,
            contact: None,
            contact_cooldowns: Vec::new(),
        }
    }

    pub fn with_contact(mut self, contact: ContactDamage) -> Self {
        self.contact = Some(contact);
        self
    }

    /// Signed distance from a point to the obstacle surface
    pub fn distance_to(&self, point: Vec2) -> f32 {
        match self.shape {
            ObstacleShape::Circle { radius } => sd_circle(point, self.pos, radius),
            ObstacleShape::Box { half_extents } => sd_box(point, self.pos, half_extents, self.rotation),
        }
    }

    /// Radius of the bounding circle
    pub fn collision_radius(&self) -> f32 {
        match self.shape {
            ObstacleShape::Circle { radius } => radius,
            ObstacleShape::Box { half_extents } => half_extents.length(),
        }
    }

    /// Point-in-obstacle test
    pub fn contains_point(&self, point: Vec2) -> bool {
        self.distance_to(point) <= 0.0
    }

    /// Would a body of `radius` centred at `point` overlap this obstacle?
    pub fn blocks(&self, point: Vec2, radius: f32) -> bool {
        if !self.blocks_movement {
            return false;
        }
        // Bounding circle first
        if point.distance(self.pos) >= self.collision_radius() + radius {
            return false;
        }
        self.distance_to(point) < radius
    }

    /// Is a body of `radius` at `point` touching the obstacle surface?
    pub fn touches(&self, point: Vec2, radius: f32) -> bool {
        self.distance_to(point) <= radius + CONTACT_MARGIN
    }

    /// Count down lifetime and contact cooldowns
    pub fn advance(&mut self, dt: f32, now: f32) {
        self.ttl -= dt;
        self.contact_cooldowns.retain(|&(_, until)| until > now);
    }

    pub fn expired(&self) -> bool {
        self.ttl <= 0.0
    }

    /// Record a contact if the enemy is off cooldown; returns whether it counts
    pub fn try_contact(&mut self, enemy: EnemyId, now: f32) -> bool {
        let Some(contact) = self.contact else {
            return false;
        };
        if self.contact_cooldowns.iter().any(|&(id, until)| id == enemy && until > now) {
            return false;
        }
        self.contact_cooldowns.push((enemy, now + contact.cooldown));
        true
    }
}

/// Accept a move only if the destination is clear of every blocking obstacle
///
/// There is no sliding: a blocked move leaves the body where it was.
pub fn resolve_move(from: Vec2, to: Vec2, radius: f32, obstacles: &[Obstacle]) -> Vec2 {
    if obstacles.iter().any(|o| o.blocks(to, radius)) {
        from
    } else {
        to
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    #[test]
    fn test_circle_blocking_threshold() {
        let obstacles = [Obstacle::circle(Vec2::ZERO, 1.0, 10.0)];
        let from = Vec2::new(3.0, 0.0);

        let blocked = resolve_move(from, Vec2::new(1.4, 0.0), 0.5, &obstacles);
        assert_eq!(blocked, from);

        let accepted = resolve_move(from, Vec2::new(1.6, 0.0), 0.5, &obstacles);
        assert_eq!(accepted, Vec2::new(1.6, 0.0));
    }

    #[test]
    fn test_non_blocking_obstacle_lets_through() {
        let mut o = Obstacle::circle(Vec2::ZERO, 1.0, 10.0);
        o.blocks_movement = false;
        assert_eq!(resolve_move(Vec2::X * 3.0, Vec2::ZERO, 0.5, &[o]), Vec2::ZERO);
    }

    #[test]
    fn test_wall_geometry() {
        // Wall facing +x: long axis along y
        let wall = Obstacle::wall(Vec2::new(5.0, 0.0), PI / 2.0, 3.0, 0.5, 5.0);
        assert!(wall.contains_point(Vec2::new(5.0, 1.2)));
        assert!(!wall.contains_point(Vec2::new(5.5, 0.0)));
        assert!(wall.blocks(Vec2::new(5.5, 0.0), 0.4));
        assert!(!wall.blocks(Vec2::new(5.8, 0.0), 0.4));
        assert!(wall.touches(Vec2::new(5.7, 0.0), 0.4));
        assert!((wall.collision_radius() - Vec2::new(1.5, 0.25).length()).abs() < 1e-6);
    }

    #[test]
    fn test_contact_cooldown() {
        let contact = ContactDamage {
            damage: 20.0,
            knockback: 3.0,
            cooldown: 0.5,
        };
        let mut wall = Obstacle::wall(Vec2::ZERO, 0.0, 3.0, 0.5, 5.0).with_contact(contact);
        let id = EnemyId(7);
        assert!(wall.try_contact(id, 1.0));
        assert!(!wall.try_contact(id, 1.2));
        assert!(wall.try_contact(EnemyId(8), 1.2));
        wall.advance(0.4, 1.6);
        assert!(wall.try_contact(id, 1.6));
    }

    #[test]
    fn test_ttl_expiry() {
        let mut o = Obstacle::circle(Vec2::ZERO, 1.0, 0.5);
        o.advance(0.3, 0.3);
        assert!(!o.expired());
        o.advance(0.3, 0.6);
        assert!(o.expired());
    }
}
