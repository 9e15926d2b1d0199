//! Hit detection and hit records
//!
//! Everything here is radius based: circle/circle for projectiles and bodies,
//! point/segment for beams and tendrils, signed distances for obstacles.
//! Weapons never mutate enemies; they report `Hit`s and the tick loop applies
//! them in order.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::entity::{Enemy, EnemyId};
use super::status::SlowSpec;

/// Signed distance to a circle
#[inline]
pub fn sd_circle(p: Vec2, center: Vec2, radius: f32) -> f32 {
    (p - center).length() - radius
}

/// Signed distance to a rotated box
///
/// `rotation` is the box's heading in radians; `half_extents` are measured
/// along the box's local x (length) and y (thickness) axes.
pub fn sd_box(p: Vec2, center: Vec2, half_extents: Vec2, rotation: f32) -> f32 {
    let local = Vec2::from_angle(-rotation).rotate(p - center);
    let q = local.abs() - half_extents;
    q.max(Vec2::ZERO).length() + q.x.max(q.y).min(0.0)
}

/// Closest distance from `p` to segment `a..b`, with the segment parameter
/// `t` in [0, 1] of the closest point
pub fn point_segment_distance(p: Vec2, a: Vec2, b: Vec2) -> (f32, f32) {
    let ab = b - a;
    let len_sq = ab.length_squared();
    if len_sq < 1e-8 {
        // Degenerate segment
        return ((p - a).length(), 0.0);
    }
    let t = ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    ((p - (a + ab * t)).length(), t)
}

/// First point along a polyline within `reach` of `p`
///
/// Returns the path parameter (segment index + t) so callers can order
/// several candidates by how far along the path they were touched.
pub fn polyline_contact(p: Vec2, points: &[Vec2], reach: f32) -> Option<f32> {
    points.windows(2).enumerate().find_map(|(i, seg)| {
        let (dist, t) = point_segment_distance(p, seg[0], seg[1]);
        (dist <= reach).then_some(i as f32 + t)
    })
}

/// Circle overlap test
#[inline]
pub fn circles_overlap(a: Vec2, ra: f32, b: Vec2, rb: f32) -> bool {
    a.distance_squared(b) < (ra + rb) * (ra + rb)
}

/// Status carried by a hit
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum HitPayload {
    /// Slow the target
    Slow(SlowSpec),
    /// Shove the target `distance` units away from `origin`
    Knockback { origin: Vec2, distance: f32 },
}

/// A single damage event reported by a weapon
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hit {
    pub enemy: EnemyId,
    pub damage: f32,
    /// Where the hit landed
    pub pos: Vec2,
    pub payload: Option<HitPayload>,
}

impl Hit {
    pub fn new(enemy: EnemyId, damage: f32, pos: Vec2) -> Self {
        Self {
            enemy,
            damage,
            pos,
            payload: None,
        }
    }

    pub fn with_payload(mut self, payload: Option<HitPayload>) -> Self {
        self.payload = payload;
        self
    }
}

/// First living enemy (in list order) overlapping a circle
pub fn first_overlap<'a>(enemies: &'a [Enemy], pos: Vec2, radius: f32) -> Option<&'a Enemy> {
    enemies
        .iter()
        .filter(|e| e.alive)
        .find(|e| circles_overlap(pos, radius, e.pos, e.radius))
}

/// Nearest living enemy to a point
pub fn nearest_enemy(enemies: &[Enemy], from: Vec2) -> Option<&Enemy> {
    enemies.iter().filter(|e| e.alive).min_by(|a, b| {
        a.pos
            .distance_squared(from)
            .partial_cmp(&b.pos.distance_squared(from))
            .unwrap_or(std::cmp::Ordering::Equal)
    })
}

/// Living enemies ordered by distance to a point (closest first)
pub fn enemies_by_distance(enemies: &[Enemy], from: Vec2) -> Vec<&Enemy> {
    let mut living: Vec<&Enemy> = enemies.iter().filter(|e| e.alive).collect();
    living.sort_by(|a, b| {
        a.pos
            .distance_squared(from)
            .partial_cmp(&b.pos.distance_squared(from))
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    living
}
